//! Session-scoped state stored as session.json in the cache directory.
//! Survives a crash or restart, and is removed on a clean shutdown.

use crate::db::Persistence;
use crate::error::StorageError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct SessionStore {
    path: Option<PathBuf>,
    values: RefCell<HashMap<String, String>>,
}

impl SessionStore {
    /// Open the session file in `dir`, starting empty if it is missing or unreadable
    pub fn open(dir: &Path) -> Self {
        let path = dir.join("session.json");
        let values = match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(values) => {
                    debug!(path = %path.display(), "Session restored");
                    values
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse session, starting fresh");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            path: Some(path),
            values: RefCell::new(values),
        }
    }

    /// Session that never touches disk
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: RefCell::new(HashMap::new()),
        }
    }

    /// End the session, forgetting everything
    pub fn clear(&self) {
        self.values.borrow_mut().clear();
        if let Some(path) = &self.path {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(error = %e, "Failed to remove session file");
                }
            }
        }
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string(&*self.values.borrow())?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }
}

impl Persistence for SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_session_survives_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let session = SessionStore::open(temp.path());
            session.set("lastViewedQuote", "{}").unwrap();
        }
        let session = SessionStore::open(temp.path());
        assert_eq!(session.get("lastViewedQuote").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_clear_removes_file() {
        let temp = TempDir::new().unwrap();
        let session = SessionStore::open(temp.path());
        session.set("lastViewedQuote", "{}").unwrap();
        session.clear();

        assert!(!temp.path().join("session.json").exists());
        assert_eq!(SessionStore::open(temp.path()).get("lastViewedQuote").unwrap(), None);
    }

    #[test]
    fn test_corrupt_session_starts_empty() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("session.json"), "not json").unwrap();
        let session = SessionStore::open(temp.path());
        assert_eq!(session.get("lastViewedQuote").unwrap(), None);
    }
}
