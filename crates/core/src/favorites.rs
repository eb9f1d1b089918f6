use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage key the favorites list lives under.
pub const FAVORITES_KEY: &str = "jokeFavorites";

/// Favorite joke ids in the order they were starred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: Vec<Uuid>,
}

impl Favorites {
    pub fn from_ids(ids: impl IntoIterator<Item = Uuid>) -> Self {
        let mut favorites = Favorites::default();
        for id in ids {
            if !favorites.contains(id) {
                favorites.ids.push(id);
            }
        }
        favorites
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    /// Flips the favorite state of `id` and returns whether it is now a favorite.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if let Some(pos) = self.ids.iter().position(|fav| *fav == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
