use crate::domain::{ArchiveSnapshot, JokeRecord};
use crate::error::Result;
use crate::favorites::Favorites;

pub trait JokeRepository {
    /// Returns the whole collection in the order jokes were added
    fn load_jokes(&self) -> Result<Vec<JokeRecord>>;

    /// Appends to the end of the collection; existing jokes are untouched
    fn append_jokes(&self, jokes: &[JokeRecord]) -> Result<()>;
}

/// Key/value persistence for the user's favorite list
pub trait FavoritesStore {
    fn load_favorites(&self) -> Result<Favorites>;
    fn save_favorites(&self, favorites: &Favorites) -> Result<()>;
}

/// Trait for writing an archive export
/// This is a port (interface) that defines how the core communicates with output adapters
pub trait ArchiveWriter: Send + Sync {
    fn write(&self, snapshot: &ArchiveSnapshot) -> Result<()>;
}
