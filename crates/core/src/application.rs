use crate::catalog::{self, BrowseQuery};
use crate::domain::{ArchiveSnapshot, Author, JokeRecord};
use crate::error::{ArchiveError, Result};
use crate::importer::ChatLogImporter;
use crate::ports::{ArchiveWriter, FavoritesStore, JokeRepository};
use crate::utils::share_text;
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

/// Result of importing one chat export
#[derive(Debug)]
pub struct ImportSummary {
    pub imported: Vec<JokeRecord>,
    pub media_skipped: usize,
    pub unknown_speakers: usize,
    /// Lines before the first recognized message
    pub orphan_lines: usize,
}

/// Owned result of a catalog query, joined with favorite state
#[derive(Debug)]
pub struct BrowseResult {
    pub jokes: Vec<(JokeRecord, bool)>,
    pub total: usize,
    pub author_counts: BTreeMap<Author, usize>,
}

/// Application service tying the importer, catalog and favorites to storage
pub struct ArchiveService {
    repository: Box<dyn JokeRepository>,
    favorites: Box<dyn FavoritesStore>,
    importer: ChatLogImporter,
}

impl ArchiveService {
    /// Creates a new ArchiveService with the given dependencies
    pub fn new(repository: Box<dyn JokeRepository>, favorites: Box<dyn FavoritesStore>) -> Self {
        Self {
            repository,
            favorites,
            importer: ChatLogImporter::new(),
        }
    }

    /// Parses a chat export and appends the recognized jokes to the collection.
    /// Nothing is written when no jokes were found.
    pub fn import_chat(&self, text: &str) -> Result<ImportSummary> {
        let report = self.importer.parse_with_report(text);
        if !report.records.is_empty() {
            self.repository.append_jokes(&report.records)?;
            info!(count = report.records.len(), "imported jokes");
        }
        Ok(ImportSummary {
            imported: report.records,
            media_skipped: report.media_skipped,
            unknown_speakers: report.unknown_speakers,
            orphan_lines: report.orphan_lines,
        })
    }

    pub fn browse(&self, query: &BrowseQuery) -> Result<BrowseResult> {
        let jokes = self.repository.load_jokes()?;
        let favorites = self.favorites.load_favorites()?;
        let page = catalog::browse(&jokes, query, &favorites);
        Ok(BrowseResult {
            jokes: page
                .jokes
                .into_iter()
                .map(|joke| (joke.clone(), favorites.contains(joke.id)))
                .collect(),
            total: page.total,
            author_counts: page.author_counts,
        })
    }

    /// Flips the favorite flag of a joke and returns the new state
    pub fn toggle_favorite(&self, id: Uuid) -> Result<bool> {
        self.find(id)?;
        let mut favorites = self.favorites.load_favorites()?;
        let now_favorite = favorites.toggle(id);
        self.favorites.save_favorites(&favorites)?;
        Ok(now_favorite)
    }

    pub fn share(&self, id: Uuid) -> Result<String> {
        Ok(share_text(&self.find(id)?))
    }

    /// Builds a snapshot of the archive and hands it to `writer`
    pub fn export(&self, writer: &dyn ArchiveWriter) -> Result<ArchiveSnapshot> {
        let snapshot = ArchiveSnapshot::new(
            self.repository.load_jokes()?,
            self.favorites.load_favorites()?,
            Utc::now(),
        );
        writer.write(&snapshot)?;
        info!(jokes = snapshot.meta.total_jokes, "exported archive");
        Ok(snapshot)
    }

    fn find(&self, id: Uuid) -> Result<JokeRecord> {
        self.repository
            .load_jokes()?
            .into_iter()
            .find(|joke| joke.id == id)
            .ok_or(ArchiveError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::Favorites;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct MemoryStore {
        jokes: Rc<RefCell<Vec<JokeRecord>>>,
        favorites: Rc<RefCell<Favorites>>,
    }

    impl JokeRepository for MemoryStore {
        fn load_jokes(&self) -> Result<Vec<JokeRecord>> {
            Ok(self.jokes.borrow().clone())
        }

        fn append_jokes(&self, jokes: &[JokeRecord]) -> Result<()> {
            self.jokes.borrow_mut().extend_from_slice(jokes);
            Ok(())
        }
    }

    impl FavoritesStore for MemoryStore {
        fn load_favorites(&self) -> Result<Favorites> {
            Ok(self.favorites.borrow().clone())
        }

        fn save_favorites(&self, favorites: &Favorites) -> Result<()> {
            *self.favorites.borrow_mut() = favorites.clone();
            Ok(())
        }
    }

    #[derive(Default)]
    struct CapturingWriter {
        written: Mutex<Vec<ArchiveSnapshot>>,
    }

    impl ArchiveWriter for CapturingWriter {
        fn write(&self, snapshot: &ArchiveSnapshot) -> Result<()> {
            self.written.lock().unwrap().push(snapshot.clone());
            Ok(())
        }
    }

    fn service() -> (ArchiveService, MemoryStore) {
        let store = MemoryStore::default();
        let service = ArchiveService::new(Box::new(store.clone()), Box::new(store.clone()));
        (service, store)
    }

    const CHAT: &str = "12/05/2022, 10:30 - Amiram: Why did the chicken cross the road?\n\
                        [01/01/23, 09:15:00] David: Top line\n\
                        Second line\n\
                        01/01/2023, 09:16 - David: <Media omitted>\n\
                        01/01/2023, 09:17 - Someone Else: hello";

    #[test]
    fn test_import_appends_to_collection() {
        let (service, store) = service();
        let summary = service.import_chat(CHAT).unwrap();
        assert_eq!(summary.imported.len(), 2);
        assert_eq!(summary.media_skipped, 1);
        assert_eq!(summary.unknown_speakers, 1);
        assert_eq!(summary.orphan_lines, 0);
        assert_eq!(store.jokes.borrow().len(), 2);

        service.import_chat(CHAT).unwrap();
        assert_eq!(store.jokes.borrow().len(), 4);
    }

    #[test]
    fn test_import_of_nothing_writes_nothing() {
        let (service, store) = service();
        let summary = service.import_chat("no chat here").unwrap();
        assert!(summary.imported.is_empty());
        assert_eq!(summary.orphan_lines, 1);
        assert!(store.jokes.borrow().is_empty());
    }

    #[test]
    fn test_toggle_favorite_and_browse() {
        let (service, _store) = service();
        let imported = service.import_chat(CHAT).unwrap().imported;
        let david = imported[1].id;

        assert!(service.toggle_favorite(david).unwrap());
        let query = BrowseQuery { favorites_only: true, ..Default::default() };
        let result = service.browse(&query).unwrap();
        assert_eq!(result.jokes.len(), 1);
        assert_eq!(result.jokes[0].0.id, david);
        assert!(result.jokes[0].1);

        assert!(!service.toggle_favorite(david).unwrap());
        assert!(service.browse(&query).unwrap().jokes.is_empty());
    }

    #[test]
    fn test_toggle_unknown_id_is_not_found() {
        let (service, store) = service();
        let err = service.toggle_favorite(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound(_)));
        assert!(store.favorites.borrow().is_empty());
    }

    #[test]
    fn test_share() {
        let (service, _store) = service();
        let imported = service.import_chat(CHAT).unwrap().imported;
        let text = service.share(imported[0].id).unwrap();
        assert_eq!(
            text,
            "Why did the chicken cross the road?\n\n- Amiram Zocowitzky (12/05/2022)"
        );
    }

    #[test]
    fn test_export_hands_snapshot_to_writer() {
        let (service, _store) = service();
        let imported = service.import_chat(CHAT).unwrap().imported;
        service.toggle_favorite(imported[0].id).unwrap();

        let writer = CapturingWriter::default();
        let snapshot = service.export(&writer).unwrap();
        assert_eq!(snapshot.meta.total_jokes, 2);
        assert_eq!(snapshot.user_favorites.ids(), &[imported[0].id]);
        assert_eq!(writer.written.lock().unwrap().len(), 1);
    }
}
