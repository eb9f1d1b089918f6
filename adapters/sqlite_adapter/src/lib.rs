use archive_core::domain::{Author, JokeRecord};
use archive_core::favorites::{Favorites, FAVORITES_KEY};
use archive_core::ports::{FavoritesStore, JokeRepository};
use archive_core::{ArchiveError, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use tracing::{debug, warn};
use uuid::Uuid;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS jokes (
        position INTEGER PRIMARY KEY AUTOINCREMENT,
        id       TEXT NOT NULL UNIQUE,
        date     TEXT NOT NULL,
        author   TEXT NOT NULL,
        content  TEXT NOT NULL,
        context  TEXT
    );
    CREATE TABLE IF NOT EXISTS settings (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
"#;

/// SQLite implementation of the JokeRepository and FavoritesStore traits
pub struct SqliteArchiveStore {
    db_path: PathBuf,
}

impl SqliteArchiveStore {
    /// Creates a new SqliteArchiveStore for the given database path.
    /// The file and schema are created on first use.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self { db_path: db_path.into() }
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path).map_err(ArchiveError::storage)?;
        conn.execute_batch(SCHEMA).map_err(ArchiveError::storage)?;
        Ok(conn)
    }

    fn read_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.connect()?;
        conn.query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .map_err(ArchiveError::storage)
    }

    fn write_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(ArchiveError::storage)?;
        Ok(())
    }
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(ArchiveError::Corrupt(message)))
}

fn joke_from_row(row: &Row) -> rusqlite::Result<JokeRecord> {
    let raw_id: String = row.get(0)?;
    let id = Uuid::parse_str(&raw_id).map_err(|e| conversion_error(0, format!("bad id '{}': {}", raw_id, e)))?;

    let raw_author: String = row.get(2)?;
    let author = Author::from_display_name(&raw_author)
        .ok_or_else(|| conversion_error(2, format!("unknown author '{}'", raw_author)))?;

    Ok(JokeRecord {
        id,
        date: row.get(1)?,
        author,
        content: row.get(3)?,
        context: row.get(4)?,
    })
}

impl JokeRepository for SqliteArchiveStore {
    fn load_jokes(&self) -> Result<Vec<JokeRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, date, author, content, context FROM jokes ORDER BY position ASC")
            .map_err(ArchiveError::storage)?;

        let jokes = stmt
            .query_map([], joke_from_row)
            .map_err(ArchiveError::storage)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()
            .map_err(ArchiveError::storage)?;

        debug!(count = jokes.len(), "loaded jokes");
        Ok(jokes)
    }

    fn append_jokes(&self, jokes: &[JokeRecord]) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction().map_err(ArchiveError::storage)?;
        {
            let mut stmt = tx
                .prepare("INSERT INTO jokes (id, date, author, content, context) VALUES (?1, ?2, ?3, ?4, ?5)")
                .map_err(ArchiveError::storage)?;
            for joke in jokes {
                stmt.execute(params![
                    joke.id.to_string(),
                    joke.date,
                    joke.author.display_name(),
                    joke.content,
                    joke.context,
                ])
                .map_err(ArchiveError::storage)?;
            }
        }
        tx.commit().map_err(ArchiveError::storage)?;
        debug!(count = jokes.len(), "appended jokes");
        Ok(())
    }
}

impl FavoritesStore for SqliteArchiveStore {
    fn load_favorites(&self) -> Result<Favorites> {
        let Some(raw) = self.read_setting(FAVORITES_KEY)? else {
            return Ok(Favorites::default());
        };
        // An unreadable list counts as empty
        match serde_json::from_str(&raw) {
            Ok(favorites) => Ok(favorites),
            Err(e) => {
                warn!(error = %e, "failed to load favorites, starting with none");
                Ok(Favorites::default())
            }
        }
    }

    fn save_favorites(&self, favorites: &Favorites) -> Result<()> {
        self.write_setting(FAVORITES_KEY, &serde_json::to_string(favorites)?)
    }
}
