//! Client-local persistence of the "logged in" flag.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use serde_json::{Map, Value};
use thiserror::Error;

/// Key the flag is stored under.
pub const SESSION_KEY: &str = "isLoggedIn";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub trait SessionStore: Send + Sync {
    /// Whether a logged-in flag is currently persisted.
    fn load(&self) -> Result<bool, SessionError>;

    fn persist(&self) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

/// Stores the flag in a small JSON object on disk, surviving restarts.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| SessionError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), SessionError> {
        let raw = serde_json::to_string_pretty(entries).map_err(|source| SessionError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, raw).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<bool, SessionError> {
        let entries = self.read_entries()?;
        Ok(match entries.get(SESSION_KEY) {
            Some(Value::String(flag)) => flag == "true",
            Some(Value::Bool(flag)) => *flag,
            _ => false,
        })
    }

    fn persist(&self) -> Result<(), SessionError> {
        let mut entries = self.read_entries()?;
        entries.insert(SESSION_KEY.into(), Value::from("true"));
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut entries = self.read_entries()?;
        if entries.remove(SESSION_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

/// Process-local flag, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    logged_in: Mutex<bool>,
}

impl MemorySessionStore {
    pub fn new(logged_in: bool) -> Self {
        Self {
            logged_in: Mutex::new(logged_in),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<bool, SessionError> {
        Ok(*self.logged_in.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn persist(&self) -> Result<(), SessionError> {
        *self.logged_in.lock().unwrap_or_else(PoisonError::into_inner) = true;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.logged_in.lock().unwrap_or_else(PoisonError::into_inner) = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session_in(dir: &TempDir) -> PathBuf {
        dir.path().join("session.json")
    }

    #[test]
    fn missing_file_means_logged_out() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(session_in(&dir));
        assert!(!store.load().unwrap());
        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn flag_survives_a_new_store_instance() {
        let dir = TempDir::new().unwrap();
        let path = session_in(&dir);
        FileSessionStore::new(&path).persist().unwrap();
        assert!(FileSessionStore::new(&path).load().unwrap());

        FileSessionStore::new(&path).clear().unwrap();
        assert!(!FileSessionStore::new(&path).load().unwrap());
    }

    #[test]
    fn unrelated_keys_are_preserved() {
        let dir = TempDir::new().unwrap();
        let path = session_in(&dir);
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();
        let store = FileSessionStore::new(&path);
        store.persist().unwrap();
        store.clear().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let entries: Map<String, Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.get("theme"), Some(&Value::from("dark")));
        assert!(!entries.contains_key(SESSION_KEY));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = session_in(&dir);
        fs::write(&path, "not json").unwrap();
        let err = FileSessionStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SessionError::Json { .. }));
    }

    #[test]
    fn memory_store_round_trips_flag() {
        let store = MemorySessionStore::default();
        assert!(!store.load().unwrap());
        store.persist().unwrap();
        assert!(store.load().unwrap());
        store.clear().unwrap();
        assert!(!store.load().unwrap());
    }
}
