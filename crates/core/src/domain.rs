use crate::error::ArchiveError;
use crate::favorites::Favorites;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The three people whose jokes make up the archive.
///
/// Serialized with the full display name so exported files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Author {
    #[serde(rename = "Amiram Zocowitzky")]
    Amiram,
    #[serde(rename = "David Raskin")]
    David,
    #[serde(rename = "Shoval Nachum")]
    Shoval,
}

/// Static configuration attached to each author.
#[derive(Debug)]
pub struct AuthorProfile {
    pub author: Author,
    pub display_name: &'static str,
    /// Lowercase fragments matched against chat speaker names, including the Hebrew spelling
    pub name_fragments: &'static [&'static str],
    pub avatar: &'static str,
    pub accent: &'static str,
}

/// Lookup order matters: the importer takes the first profile with a matching fragment.
pub static AUTHOR_PROFILES: [AuthorProfile; 3] = [
    AuthorProfile {
        author: Author::Amiram,
        display_name: "Amiram Zocowitzky",
        name_fragments: &["amiram", "עמירם"],
        avatar: "./avatars/amiram.jpg",
        accent: "blue",
    },
    AuthorProfile {
        author: Author::David,
        display_name: "David Raskin",
        name_fragments: &["david", "דוד", "raskin"],
        avatar: "./avatars/david.jpg",
        accent: "green",
    },
    AuthorProfile {
        author: Author::Shoval,
        display_name: "Shoval Nachum",
        name_fragments: &["shoval", "שובל"],
        avatar: "./avatars/shoval.jpg",
        accent: "purple",
    },
];

impl Author {
    pub const ALL: [Author; 3] = [Author::Amiram, Author::David, Author::Shoval];

    pub fn profile(self) -> &'static AuthorProfile {
        match self {
            Author::Amiram => &AUTHOR_PROFILES[0],
            Author::David => &AUTHOR_PROFILES[1],
            Author::Shoval => &AUTHOR_PROFILES[2],
        }
    }

    pub fn display_name(self) -> &'static str {
        self.profile().display_name
    }

    pub fn first_name(self) -> &'static str {
        self.display_name()
            .split(' ')
            .next()
            .unwrap_or_else(|| self.display_name())
    }

    /// Resolves a free-form speaker name by case-insensitive fragment match.
    pub fn resolve(speaker: &str) -> Option<Author> {
        let lower = speaker.to_lowercase();
        AUTHOR_PROFILES
            .iter()
            .find(|profile| profile.name_fragments.iter().any(|f| lower.contains(f)))
            .map(|profile| profile.author)
    }

    /// Exact inverse of `display_name`, used when reading stored records back.
    pub fn from_display_name(name: &str) -> Option<Author> {
        Author::ALL.into_iter().find(|a| a.display_name() == name)
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Author {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Author::resolve(s.trim())
            .ok_or_else(|| ArchiveError::InvalidArgument(format!("unknown author '{}'", s)))
    }
}

/// A single joke as stored, listed and exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JokeRecord {
    pub id: Uuid,
    pub content: String,
    pub author: Author,
    /// dd/mm/yyyy
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl JokeRecord {
    /// Creates a record with a freshly generated id.
    pub fn new(date: impl Into<String>, author: Author, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            author,
            date: date.into(),
            context: None,
        }
    }
}

pub const ARCHIVE_TITLE: &str = "The Wordplay Archive Database";
pub const ARCHIVE_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveMeta {
    pub title: String,
    pub exported_at: DateTime<Utc>,
    pub total_jokes: usize,
    pub version: String,
}

/// Everything an export writer needs: the collection plus the user's favorites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSnapshot {
    pub meta: ArchiveMeta,
    pub jokes: Vec<JokeRecord>,
    pub user_favorites: Favorites,
}

impl ArchiveSnapshot {
    pub fn new(jokes: Vec<JokeRecord>, favorites: Favorites, exported_at: DateTime<Utc>) -> Self {
        Self {
            meta: ArchiveMeta {
                title: ARCHIVE_TITLE.to_string(),
                exported_at,
                total_jokes: jokes.len(),
                version: ARCHIVE_VERSION.to_string(),
            },
            jokes,
            user_favorites: favorites,
        }
    }
}
