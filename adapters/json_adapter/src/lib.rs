use archive_core::domain::ArchiveSnapshot;
use archive_core::ports::ArchiveWriter;
use archive_core::Result;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Writes the archive as a single pretty-printed JSON document
pub struct JsonArchiveWriter {
    output_path: PathBuf,
}

impl JsonArchiveWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }
}

impl ArchiveWriter for JsonArchiveWriter {
    fn write(&self, snapshot: &ArchiveSnapshot) -> Result<()> {
        if let Some(parent) = self.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.output_path, json)?;
        debug!(path = %self.output_path.display(), "wrote json export");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archive_core::domain::{Author, JokeRecord};
    use archive_core::favorites::Favorites;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_writes_export_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exports").join("archive.json");
        let jokes = vec![JokeRecord::new("12/05/2022", Author::Amiram, "חידה")];
        let favorites = Favorites::from_ids([jokes[0].id]);
        let snapshot = ArchiveSnapshot::new(jokes, favorites, Utc::now());

        JsonArchiveWriter::new(&path).write(&snapshot).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["meta"]["title"], "The Wordplay Archive Database");
        assert_eq!(value["meta"]["totalJokes"], 1);
        assert_eq!(value["jokes"][0]["author"], "Amiram Zocowitzky");
        assert_eq!(value["jokes"][0]["content"], "חידה");
        assert_eq!(value["userFavorites"][0], snapshot.jokes[0].id.to_string());

        let back: ArchiveSnapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, snapshot);
    }
}
