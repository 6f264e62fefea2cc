//! Quote store: the in-memory collection and the operations on it
//!
//! The collection functions are pure and work on slices; `QuoteStore` wraps
//! them with persistence so every mutation is written through to the backend.

use crate::constants::*;
use crate::db::Persistence;
use crate::error::{QuoteError, Result, StorageError};
use crate::types::{CategoryFilter, Quote};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// The fixed seed collection
pub fn default_quotes() -> Vec<Quote> {
    DEFAULT_QUOTES
        .iter()
        .map(|(text, category)| Quote::new(*text, *category))
        .collect()
}

/// Quotes matching `filter`, in collection order
pub fn filter_by_category<'a>(quotes: &'a [Quote], filter: &CategoryFilter) -> Vec<&'a Quote> {
    quotes.iter().filter(|q| filter.matches(q)).collect()
}

/// Uniform pick, `None` when there is nothing to pick from
pub fn pick_random<'a, R: Rng + ?Sized>(quotes: &[&'a Quote], rng: &mut R) -> Option<&'a Quote> {
    quotes.choose(rng).copied()
}

/// Distinct categories in order of first appearance
pub fn categories_of(quotes: &[Quote]) -> Vec<String> {
    let mut seen = HashSet::new();
    quotes
        .iter()
        .filter(|q| seen.insert(q.category.as_str()))
        .map(|q| q.category.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub merged: Vec<Quote>,
    pub changed: bool,
}

/// Append every remote quote whose text is not already present.
/// Local quotes are never replaced or removed.
pub fn merge_remote(local: &[Quote], remote: &[Quote]) -> MergeOutcome {
    let mut merged = local.to_vec();
    let mut known: HashSet<String> = local.iter().map(|q| q.text.clone()).collect();

    for quote in remote {
        if known.insert(quote.text.clone()) {
            merged.push(quote.clone());
        }
    }

    let changed = merged.len() > local.len();
    MergeOutcome { merged, changed }
}

/// Append every element of `incoming`, which must be a JSON array.
/// Records are neither de-duplicated nor checked for shape.
pub fn import_bulk(collection: &[Quote], incoming: &str) -> Result<Vec<Quote>> {
    let value: Value =
        serde_json::from_str(incoming).map_err(|e| QuoteError::Format(e.to_string()))?;

    let Value::Array(records) = value else {
        return Err(QuoteError::Format(
            "expected a JSON array of quotes".to_string(),
        ));
    };

    let mut result = collection.to_vec();
    result.extend(
        records
            .iter()
            .map(|record| Quote::new(record_field(record, "text"), record_field(record, "category"))),
    );
    Ok(result)
}

/// Strings as they are, other values in their JSON form, missing as empty
fn record_field(record: &Value, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Pretty-printed JSON array, the same shape `import_bulk` accepts
pub fn export_json(quotes: &[Quote]) -> Result<String> {
    serde_json::to_string_pretty(quotes).map_err(|e| StorageError::Json(e).into())
}

/// A change that is already applied in memory. `unsaved` carries the write
/// failure when it could not be persisted.
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    pub unsaved: Option<StorageError>,
}

pub struct QuoteStore<P> {
    backend: P,
    quotes: Vec<Quote>,
    categories: Vec<String>,
}

impl<P: Persistence> QuoteStore<P> {
    /// Load the persisted collection, falling back to the seed quotes when
    /// nothing is stored or the stored value cannot be read
    pub fn load(backend: P) -> Self {
        let quotes = match backend.get(QUOTES_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Quote>>(&json) {
                Ok(quotes) => {
                    debug!(count = quotes.len(), "Quotes loaded");
                    quotes
                }
                Err(e) => {
                    warn!(error = %e, "Persisted quotes are malformed, using defaults");
                    default_quotes()
                }
            },
            Ok(None) => {
                debug!("No persisted quotes, using defaults");
                default_quotes()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted quotes, using defaults");
                default_quotes()
            }
        };

        let categories = categories_of(&quotes);
        Self {
            backend,
            quotes,
            categories,
        }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        filter_by_category(&self.quotes, filter)
    }

    /// Validate and append a quote from user input
    pub fn add(&mut self, text: &str, category: &str) -> Result<Applied<Quote>> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(QuoteError::Validation(MSG_FILL_BOTH.to_string()));
        }

        let quote = Quote::new(text, category);
        self.quotes.push(quote.clone());
        info!(category = %quote.category, "Quote added");
        Ok(self.write_through(quote))
    }

    /// Merge remote quotes in, the value says whether anything was appended
    pub fn merge_remote(&mut self, remote: &[Quote]) -> Applied<bool> {
        let outcome = merge_remote(&self.quotes, remote);
        if !outcome.changed {
            debug!(remote = remote.len(), "Nothing new from server");
            return Applied {
                value: false,
                unsaved: None,
            };
        }

        let added = outcome.merged.len() - self.quotes.len();
        self.quotes = outcome.merged;
        info!(added = added, total = self.quotes.len(), "Merged server quotes");
        self.write_through(true)
    }

    /// Import a JSON array, the value is the number of quotes appended.
    /// The collection is untouched when the content is rejected.
    pub fn import_json(&mut self, content: &str) -> Result<Applied<usize>> {
        let merged = import_bulk(&self.quotes, content)?;
        let added = merged.len() - self.quotes.len();
        self.quotes = merged;
        info!(added = added, total = self.quotes.len(), "Quotes imported");
        Ok(self.write_through(added))
    }

    pub fn export_json(&self) -> Result<String> {
        export_json(&self.quotes)
    }

    pub fn last_category(&self) -> CategoryFilter {
        match self.backend.get(LAST_CATEGORY_KEY) {
            Ok(Some(value)) => CategoryFilter::parse(&value),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                warn!(error = %e, "Failed to read last category");
                CategoryFilter::All
            }
        }
    }

    pub fn set_last_category(&self, filter: &CategoryFilter) -> Result<()> {
        self.backend.set(LAST_CATEGORY_KEY, &filter.to_stored())?;
        Ok(())
    }

    /// Persist after an in-memory change, keeping the change either way
    fn write_through<T>(&mut self, value: T) -> Applied<T> {
        let unsaved = self.persist().err();
        if let Some(e) = &unsaved {
            warn!(error = %e, total = self.quotes.len(), "Change kept in memory but not saved");
        }
        Applied { value, unsaved }
    }

    /// Write the full collection and refresh the category view
    fn persist(&mut self) -> std::result::Result<(), StorageError> {
        self.categories = categories_of(&self.quotes);
        let json = serde_json::to_string(&self.quotes)?;
        self.backend.set(QUOTES_KEY, &json)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// In-memory backend whose contents stay inspectable after being moved
    /// into a store
    #[derive(Clone, Default)]
    pub(crate) struct MemoryBackend {
        pub values: Rc<RefCell<HashMap<String, String>>>,
        pub fail_writes: bool,
    }

    impl Persistence for MemoryBackend {
        fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn q(text: &str, category: &str) -> Quote {
        Quote::new(text, category)
    }

    #[test]
    fn test_load_defaults_when_empty() {
        let store = QuoteStore::load(MemoryBackend::default());
        assert_eq!(store.quotes(), default_quotes().as_slice());
        assert_eq!(store.len(), 3);
        assert_eq!(store.categories(), ["Motivation", "Life", "Inspiration"]);
    }

    #[test]
    fn test_load_persisted_quotes() {
        let backend = MemoryBackend::default();
        backend
            .set(QUOTES_KEY, r#"[{"text":"Only one","category":"Solo"}]"#)
            .unwrap();

        let store = QuoteStore::load(backend);
        assert_eq!(store.quotes(), [q("Only one", "Solo")]);
    }

    #[test]
    fn test_load_malformed_falls_back_to_defaults() {
        let backend = MemoryBackend::default();
        backend.set(QUOTES_KEY, "{not json").unwrap();

        let store = QuoteStore::load(backend.clone());
        assert_eq!(store.quotes(), default_quotes().as_slice());
        // Nothing is rewritten until the next mutation
        assert_eq!(backend.get(QUOTES_KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_add_trims_and_persists() {
        let backend = MemoryBackend::default();
        let mut store = QuoteStore::load(backend.clone());

        let added = store.add("  Keep going.  ", " Grit ").unwrap();
        assert_eq!(added.value, q("Keep going.", "Grit"));
        assert!(added.unsaved.is_none());
        assert_eq!(store.len(), 4);
        assert!(store.categories().contains(&"Grit".to_string()));

        let persisted: Vec<Quote> =
            serde_json::from_str(&backend.get(QUOTES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, store.quotes());
    }

    #[test]
    fn test_add_rejects_empty_fields() {
        let backend = MemoryBackend::default();
        let mut store = QuoteStore::load(backend.clone());

        for (text, category) in [("", "x"), ("x", ""), ("   ", "x"), ("x", "\t")] {
            let err = store.add(text, category).unwrap_err();
            assert!(matches!(err, QuoteError::Validation(_)));
        }
        assert_eq!(store.quotes(), default_quotes().as_slice());
        assert_eq!(backend.get(QUOTES_KEY).unwrap(), None);
    }

    #[test]
    fn test_add_keeps_quote_when_persist_fails() {
        let backend = MemoryBackend {
            fail_writes: true,
            ..Default::default()
        };
        let mut store = QuoteStore::load(backend);

        let added = store.add("Still here", "Memory").unwrap();
        assert_eq!(added.value, q("Still here", "Memory"));
        assert!(matches!(added.unsaved, Some(StorageError::Io(_))));
        assert_eq!(store.len(), 4);
        assert!(store.categories().contains(&"Memory".to_string()));
    }

    #[test]
    fn test_import_and_merge_keep_changes_when_persist_fails() {
        let backend = MemoryBackend {
            fail_writes: true,
            ..Default::default()
        };
        let mut store = QuoteStore::load(backend);

        let imported = store
            .import_json(r#"[{"text":"Kept anyway","category":"Memory"}]"#)
            .unwrap();
        assert_eq!(imported.value, 1);
        assert!(imported.unsaved.is_some());
        assert_eq!(store.len(), 4);

        let merged = store.merge_remote(&[q("From afar", "Server")]);
        assert!(merged.value);
        assert!(merged.unsaved.is_some());
        assert_eq!(store.len(), 5);

        // Nothing new means nothing to write, so nothing can fail
        let merged = store.merge_remote(&[q("From afar", "Server")]);
        assert!(!merged.value);
        assert!(merged.unsaved.is_none());
    }

    #[test]
    fn test_add_allows_duplicate_text() {
        let mut store = QuoteStore::load(MemoryBackend::default());
        store.add("Stay hungry, stay foolish.", "Inspiration").unwrap();
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_filter_all_is_identity() {
        let quotes = default_quotes();
        let filtered = filter_by_category(&quotes, &CategoryFilter::All);
        let filtered: Vec<Quote> = filtered.into_iter().cloned().collect();
        assert_eq!(filtered, quotes);
    }

    #[test]
    fn test_filter_exact_match() {
        let quotes = vec![q("a", "Life"), q("b", "life"), q("c", "Life")];
        let filtered = filter_by_category(&quotes, &CategoryFilter::Category("Life".into()));
        let texts: Vec<&str> = filtered.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, ["a", "c"]);
    }

    #[test]
    fn test_filter_absent_category_is_empty() {
        let quotes = default_quotes();
        let filtered = filter_by_category(&quotes, &CategoryFilter::Category("Nope".into()));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_pick_random_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_random(&[], &mut rng), None);
    }

    #[test]
    fn test_pick_random_covers_every_quote() {
        let quotes = default_quotes();
        let refs: Vec<&Quote> = quotes.iter().collect();
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let picked = pick_random(&refs, &mut rng).unwrap();
            seen.insert(picked.text.clone());
        }
        assert_eq!(seen.len(), quotes.len());
    }

    #[test]
    fn test_merge_appends_unknown_text() {
        let local = vec![q("Stay hungry...", "Inspiration")];
        let remote = vec![q("Stay hungry...", "Inspiration"), q("New one", "Server")];

        let outcome = merge_remote(&local, &remote);
        assert_eq!(outcome.merged.len(), 2);
        assert!(outcome.changed);
        assert_eq!(outcome.merged[1], q("New one", "Server"));
    }

    #[test]
    fn test_merge_never_touches_local() {
        let local = vec![q("Shared", "Mine"), q("Local only", "Mine")];
        let remote = vec![q("Shared", "Server")];

        let outcome = merge_remote(&local, &remote);
        assert!(!outcome.changed);
        assert_eq!(outcome.merged, local);
    }

    #[test]
    fn test_merge_dedups_within_remote() {
        let remote = vec![q("Twice", "Server"), q("Twice", "Server")];
        let outcome = merge_remote(&[], &remote);
        assert_eq!(outcome.merged, [q("Twice", "Server")]);
        assert!(outcome.changed);
    }

    #[test]
    fn test_store_merge_persists_only_on_change() {
        let backend = MemoryBackend::default();
        let mut store = QuoteStore::load(backend.clone());

        assert!(!store.merge_remote(&default_quotes()).value);
        assert_eq!(backend.get(QUOTES_KEY).unwrap(), None);

        assert!(store.merge_remote(&[q("From afar", "Server")]).value);
        assert_eq!(store.len(), 4);
        assert!(store.categories().contains(&"Server".to_string()));
        assert!(backend.get(QUOTES_KEY).unwrap().is_some());
    }

    #[test]
    fn test_import_rejects_non_array() {
        let collection = default_quotes();
        for content in [r#""not an array""#, "not an array", r#"{"text":"a","category":"b"}"#] {
            let err = import_bulk(&collection, content).unwrap_err();
            assert!(matches!(err, QuoteError::Format(_)), "{content}");
        }
    }

    #[test]
    fn test_import_keeps_records_of_any_shape() {
        let result = import_bulk(
            &[],
            r#"[{"text":"a"},{"category":"b","extra":true},{"text":7,"category":null},"loose"]"#,
        )
        .unwrap();
        assert_eq!(
            result,
            [q("a", ""), q("", "b"), q("7", ""), q("", "")]
        );
    }

    #[test]
    fn test_import_appends_without_dedup() {
        let collection = vec![q("a", "x")];
        let result = import_bulk(&collection, r#"[{"text":"a","category":"x"},{"text":"b","category":"y"}]"#)
            .unwrap();
        assert_eq!(result, [q("a", "x"), q("a", "x"), q("b", "y")]);
    }

    #[test]
    fn test_store_import_failure_leaves_collection() {
        let mut store = QuoteStore::load(MemoryBackend::default());
        assert!(store.import_json("not an array").is_err());
        assert_eq!(store.quotes(), default_quotes().as_slice());
    }

    #[test]
    fn test_export_import_round_trip() {
        let quotes = vec![q("first", "A"), q("second", "B"), q("third", "A")];
        let exported = export_json(&quotes).unwrap();
        assert!(exported.contains('\n'));

        let imported = import_bulk(&[], &exported).unwrap();
        assert_eq!(imported, quotes);
    }

    #[test]
    fn test_last_category_round_trip() {
        let backend = MemoryBackend::default();
        let store = QuoteStore::load(backend.clone());
        assert_eq!(store.last_category(), CategoryFilter::All);

        let life = CategoryFilter::Category("Life".into());
        store.set_last_category(&life).unwrap();
        assert_eq!(
            backend.get(LAST_CATEGORY_KEY).unwrap().as_deref(),
            Some("Life")
        );
        assert_eq!(QuoteStore::load(backend).last_category(), life);
    }

    #[test]
    fn test_category_named_all_is_not_the_sentinel() {
        let backend = MemoryBackend::default();
        let store = QuoteStore::load(backend.clone());

        let named_all = CategoryFilter::Category("all".into());
        store.set_last_category(&named_all).unwrap();
        assert_ne!(backend.get(LAST_CATEGORY_KEY).unwrap().as_deref(), Some("all"));
        assert_eq!(QuoteStore::load(backend.clone()).last_category(), named_all);

        store.set_last_category(&CategoryFilter::All).unwrap();
        assert_eq!(backend.get(LAST_CATEGORY_KEY).unwrap().as_deref(), Some("all"));
        assert_eq!(QuoteStore::load(backend).last_category(), CategoryFilter::All);
    }
}
