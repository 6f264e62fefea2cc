//! UI-independent application state
//!
//! `QuoteManager` turns UI events and sync events into store operations and
//! tells the window what to show. Nothing here touches egui.

use crate::constants::*;
use crate::db::{Database, Persistence};
use crate::error::{QuoteError, StorageError};
use crate::session::SessionStore;
use crate::store::{pick_random, Applied, QuoteStore};
use crate::sync::SyncEvent;
use crate::types::{CategoryFilter, Notice, Quote};
use crate::utils::format_count;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// User actions coming from the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ShowRandom,
    SelectCategory(CategoryFilter),
    AddQuote { text: String, category: String },
    ImportFile(PathBuf),
    ExportFile(PathBuf),
}

/// What the quote card currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Showing {
    #[default]
    Nothing,
    Quote(Quote),
    /// The last pick found nothing in the selected category
    NoQuotes,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub notices: Vec<Notice>,
    /// Quote to post to the server
    pub publish: Option<Quote>,
}

impl Outcome {
    fn notice(notice: Notice) -> Self {
        Self {
            notices: vec![notice],
            publish: None,
        }
    }

    /// Notice for an applied change, plus a banner when it was not saved
    fn applied(notice: Option<Notice>, unsaved: Option<StorageError>) -> Self {
        let mut notices: Vec<Notice> = notice.into_iter().collect();
        if let Some(e) = unsaved {
            notices.push(notice_for(&QuoteError::Storage(e)));
        }
        Self {
            notices,
            publish: None,
        }
    }
}

/// Alerts for problems the user can fix, banners for everything else
fn notice_for(err: &QuoteError) -> Notice {
    match err {
        QuoteError::Validation(_) | QuoteError::Format(_) => Notice::alert(err.to_string()),
        QuoteError::Remote(_) | QuoteError::Storage(_) => Notice::banner_error(err.to_string()),
    }
}

pub struct QuoteManager<P = Database> {
    store: QuoteStore<P>,
    session: SessionStore,
    filter: CategoryFilter,
    showing: Showing,
    last_sync: Option<DateTime<Local>>,
}

impl<P: Persistence> QuoteManager<P> {
    /// Restores the saved category filter and the quote last viewed this session
    pub fn new(store: QuoteStore<P>, session: SessionStore) -> Self {
        let filter = store.last_category();
        let showing = match session.get(LAST_VIEWED_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Quote>(&json) {
                Ok(quote) => {
                    debug!("Restored last viewed quote");
                    Showing::Quote(quote)
                }
                Err(e) => {
                    warn!(error = %e, "Ignoring malformed last viewed quote");
                    Showing::Nothing
                }
            },
            Ok(None) => Showing::Nothing,
            Err(e) => {
                warn!(error = %e, "Failed to read session");
                Showing::Nothing
            }
        };

        Self {
            store,
            session,
            filter,
            showing,
            last_sync: None,
        }
    }

    pub fn quotes(&self) -> &[Quote] {
        self.store.quotes()
    }

    pub fn categories(&self) -> &[String] {
        self.store.categories()
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn showing(&self) -> &Showing {
        &self.showing
    }

    pub fn last_sync(&self) -> Option<DateTime<Local>> {
        self.last_sync
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn handle(&mut self, event: UiEvent) -> Outcome {
        match event {
            UiEvent::ShowRandom => {
                self.show_random();
                Outcome::default()
            }
            UiEvent::SelectCategory(filter) => self.select_category(filter),
            UiEvent::AddQuote { text, category } => match self.store.add(&text, &category) {
                Ok(Applied { value, unsaved }) => Outcome {
                    publish: Some(value),
                    ..Outcome::applied(Some(Notice::alert(MSG_QUOTE_ADDED)), unsaved)
                },
                Err(e) => {
                    debug!(error = %e, "Quote not added");
                    Outcome::notice(notice_for(&e))
                }
            },
            UiEvent::ImportFile(path) => self.import_file(path),
            UiEvent::ExportFile(path) => self.export_file(path),
        }
    }

    pub fn apply_sync(&mut self, event: SyncEvent) -> Outcome {
        match event {
            SyncEvent::Fetched(quotes) => {
                self.last_sync = Some(Local::now());
                let Applied { value: changed, unsaved } = self.store.merge_remote(&quotes);
                let notice = changed.then(|| Notice::banner(MSG_SYNCED));
                Outcome::applied(notice, unsaved)
            }
            SyncEvent::FetchFailed(message) => {
                Outcome::notice(Notice::banner_error(format!("Sync failed. {}", message)))
            }
            SyncEvent::Published(quote) => {
                debug!(category = %quote.category, "Server accepted quote");
                Outcome::default()
            }
            SyncEvent::PublishFailed(message) => Outcome::notice(Notice::banner_error(format!(
                "Could not post quote. {}",
                message
            ))),
        }
    }

    fn show_random(&mut self) {
        let filtered = self.store.filtered(&self.filter);
        let picked = pick_random(&filtered, &mut rand::thread_rng()).cloned();

        self.showing = match picked {
            Some(quote) => {
                match serde_json::to_string(&quote) {
                    Ok(json) => {
                        if let Err(e) = self.session.set(LAST_VIEWED_KEY, &json) {
                            warn!(error = %e, "Failed to remember last viewed quote");
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to serialize quote"),
                }
                Showing::Quote(quote)
            }
            None => Showing::NoQuotes,
        };
    }

    fn select_category(&mut self, filter: CategoryFilter) -> Outcome {
        debug!(category = %filter.as_str(), "Category selected");
        self.filter = filter;
        let saved = self.store.set_last_category(&self.filter);
        self.show_random();

        match saved {
            Ok(()) => Outcome::default(),
            Err(e) => Outcome::notice(notice_for(&e)),
        }
    }

    fn import_file(&mut self, path: PathBuf) -> Outcome {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to read import file");
                return Outcome::notice(Notice::alert(format!("Could not read file: {}", e)));
            }
        };

        match self.store.import_json(&content) {
            Ok(Applied { value, unsaved }) => {
                info!(count = value, path = %path.display(), "Imported quotes from file");
                Outcome::applied(Some(Notice::alert(MSG_IMPORTED)), unsaved)
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Import rejected");
                Outcome::notice(notice_for(&e))
            }
        }
    }

    fn export_file(&mut self, path: PathBuf) -> Outcome {
        let result = self
            .store
            .export_json()
            .and_then(|json| std::fs::write(&path, json).map_err(|e| QuoteError::Storage(e.into())));

        match result {
            Ok(()) => {
                info!(count = self.store.len(), path = %path.display(), "Exported quotes");
                Outcome::notice(Notice::banner(format!(
                    "Exported {}",
                    format_count(self.store.len(), "quote", "quotes")
                )))
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Export failed");
                Outcome::notice(notice_for(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::default_quotes;
    use crate::store::tests::MemoryBackend;
    use crate::types::NoticeKind;
    use tempfile::TempDir;

    fn manager() -> QuoteManager<MemoryBackend> {
        QuoteManager::new(
            QuoteStore::load(MemoryBackend::default()),
            SessionStore::in_memory(),
        )
    }

    fn category(name: &str) -> CategoryFilter {
        CategoryFilter::Category(name.to_string())
    }

    #[test]
    fn test_starts_with_defaults_and_all_filter() {
        let manager = manager();
        assert_eq!(manager.quotes(), default_quotes().as_slice());
        assert_eq!(manager.filter(), &CategoryFilter::All);
        assert_eq!(manager.showing(), &Showing::Nothing);
        assert_eq!(manager.last_sync(), None);
    }

    #[test]
    fn test_select_category_shows_matching_quote() {
        let mut manager = manager();
        let outcome = manager.handle(UiEvent::SelectCategory(category("Life")));
        assert_eq!(outcome, Outcome::default());

        match manager.showing() {
            Showing::Quote(q) => assert_eq!(q.category, "Life"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_category_reports_no_quotes() {
        let mut manager = manager();
        manager.handle(UiEvent::SelectCategory(category("Missing")));
        assert_eq!(manager.showing(), &Showing::NoQuotes);
    }

    #[test]
    fn test_category_restored_on_next_start() {
        let backend = MemoryBackend::default();
        let mut manager =
            QuoteManager::new(QuoteStore::load(backend.clone()), SessionStore::in_memory());
        manager.handle(UiEvent::SelectCategory(category("Motivation")));

        let restarted = QuoteManager::new(QuoteStore::load(backend), SessionStore::in_memory());
        assert_eq!(restarted.filter(), &category("Motivation"));
    }

    #[test]
    fn test_last_viewed_restored_from_session() {
        let temp = TempDir::new().unwrap();
        let backend = MemoryBackend::default();
        {
            let mut manager =
                QuoteManager::new(QuoteStore::load(backend.clone()), SessionStore::open(temp.path()));
            manager.handle(UiEvent::SelectCategory(category("Inspiration")));
        }

        let restored =
            QuoteManager::new(QuoteStore::load(backend.clone()), SessionStore::open(temp.path()));
        assert_eq!(
            restored.showing(),
            &Showing::Quote(Quote::new("Stay hungry, stay foolish.", "Inspiration"))
        );

        restored.session().clear();
        let fresh = QuoteManager::new(QuoteStore::load(backend), SessionStore::open(temp.path()));
        assert_eq!(fresh.showing(), &Showing::Nothing);
    }

    #[test]
    fn test_add_quote_alerts_and_publishes() {
        let mut manager = manager();
        let outcome = manager.handle(UiEvent::AddQuote {
            text: "Ship it.".into(),
            category: "Work".into(),
        });

        assert_eq!(outcome.notices, vec![Notice::alert(MSG_QUOTE_ADDED)]);
        assert_eq!(outcome.publish, Some(Quote::new("Ship it.", "Work")));
        assert!(manager.categories().contains(&"Work".to_string()));
    }

    #[test]
    fn test_add_empty_field_alerts_without_change() {
        let mut manager = manager();
        let outcome = manager.handle(UiEvent::AddQuote {
            text: "".into(),
            category: "Work".into(),
        });

        assert_eq!(outcome.notices, vec![Notice::alert(MSG_FILL_BOTH)]);
        assert_eq!(outcome.publish, None);
        assert_eq!(manager.quotes().len(), 3);
    }

    #[test]
    fn test_sync_merge_reports_change_once() {
        let mut manager = manager();
        let remote = vec![
            Quote::new("Stay hungry, stay foolish.", "Inspiration"),
            Quote::new("New one", "Server"),
        ];

        let outcome = manager.apply_sync(SyncEvent::Fetched(remote.clone()));
        assert_eq!(outcome.notices, vec![Notice::banner(MSG_SYNCED)]);
        assert_eq!(manager.quotes().len(), 4);
        assert!(manager.last_sync().is_some());

        let outcome = manager.apply_sync(SyncEvent::Fetched(remote));
        assert_eq!(outcome, Outcome::default());
        assert_eq!(manager.quotes().len(), 4);
    }

    #[test]
    fn test_sync_failures_become_error_banners() {
        let mut manager = manager();
        for event in [
            SyncEvent::FetchFailed("Server error: HTTP 503".into()),
            SyncEvent::PublishFailed("Server error: timed out".into()),
        ] {
            let notice = manager.apply_sync(event).notices[0].clone();
            assert_eq!(notice.kind, NoticeKind::BannerError);
        }
        assert_eq!(manager.quotes().len(), 3);
        assert_eq!(manager.last_sync(), None);
    }

    #[test]
    fn test_export_then_import_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(EXPORT_FILE_NAME);

        let mut source = manager();
        let outcome = source.handle(UiEvent::ExportFile(path.clone()));
        assert_eq!(outcome.notices, vec![Notice::banner("Exported 3 quotes")]);

        let mut target = manager();
        let outcome = target.handle(UiEvent::ImportFile(path));
        assert_eq!(outcome.notices, vec![Notice::alert(MSG_IMPORTED)]);
        assert_eq!(target.quotes().len(), 6);
        assert_eq!(&target.quotes()[3..], source.quotes());
    }

    #[test]
    fn test_unsaved_changes_still_report_success() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("one.json");
        std::fs::write(&path, r#"[{"text":"Once","category":"Disk"}]"#).unwrap();

        let backend = MemoryBackend {
            fail_writes: true,
            ..Default::default()
        };
        let mut manager = QuoteManager::new(QuoteStore::load(backend), SessionStore::in_memory());

        let outcome = manager.handle(UiEvent::ImportFile(path));
        assert_eq!(outcome.notices.len(), 2);
        assert_eq!(outcome.notices[0], Notice::alert(MSG_IMPORTED));
        assert_eq!(outcome.notices[1].kind, NoticeKind::BannerError);
        assert!(outcome.notices[1].message.starts_with("Storage error"));
        assert_eq!(manager.quotes().len(), 4);

        let outcome = manager.handle(UiEvent::AddQuote {
            text: "Not on disk".into(),
            category: "Disk".into(),
        });
        assert_eq!(outcome.notices[0], Notice::alert(MSG_QUOTE_ADDED));
        assert_eq!(outcome.notices[1].kind, NoticeKind::BannerError);
        assert_eq!(outcome.publish, Some(Quote::new("Not on disk", "Disk")));
        assert_eq!(manager.quotes().len(), 5);

        let outcome = manager.apply_sync(SyncEvent::Fetched(vec![Quote::new("Remote", "Server")]));
        assert_eq!(outcome.notices[0], Notice::banner(MSG_SYNCED));
        assert_eq!(outcome.notices[1].kind, NoticeKind::BannerError);
        assert_eq!(manager.quotes().len(), 6);
    }

    #[test]
    fn test_import_not_an_array_alerts() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        std::fs::write(&path, r#""not an array""#).unwrap();

        let mut manager = manager();
        let notice = manager.handle(UiEvent::ImportFile(path)).notices[0].clone();
        assert_eq!(notice.kind, NoticeKind::Alert);
        assert!(notice.message.starts_with("Invalid file format"));
        assert_eq!(manager.quotes().len(), 3);
    }

    #[test]
    fn test_import_missing_file_alerts() {
        let temp = TempDir::new().unwrap();
        let mut manager = manager();
        let notice = manager
            .handle(UiEvent::ImportFile(temp.path().join("nope.json")))
            .notices[0]
            .clone();
        assert_eq!(notice.kind, NoticeKind::Alert);
        assert_eq!(manager.quotes().len(), 3);
    }
}
