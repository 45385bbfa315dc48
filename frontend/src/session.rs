//! Persisted session state.
//!
//! The store is a flat key/value map with the same two keys the browser build
//! kept in local storage: `token` and `adminAuth`. Reading the flag is the
//! only thing the route guard does, so it is a convenience gate, not
//! security; the API re-validates the bearer token on every call.

use std::{
    collections::{BTreeMap, HashMap},
    fmt, fs,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;

use crate::error::{ApiError, ApiResult};

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the `"true"` authentication flag.
pub const AUTH_FLAG_KEY: &str = "adminAuth";

/// Authenticated session as seen by the client.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token.
    pub token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"***").finish()
    }
}

/// Process-wide persistent key/value store for session state.
pub trait SessionStore: Send + Sync {
    /// Read a key. Storage failures read as absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a key.
    fn set(&self, key: &str, value: &str) -> ApiResult<()>;

    /// Delete a key; deleting a missing key succeeds.
    fn remove(&self, key: &str) -> ApiResult<()>;

    /// Stored bearer token, if any.
    fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Whether the authentication flag is set. No token check, no network.
    fn is_authenticated(&self) -> bool {
        self.get(AUTH_FLAG_KEY).as_deref() == Some("true")
    }

    /// Current session when the flag is set and a token is present.
    fn session(&self) -> Option<Session> {
        if !self.is_authenticated() {
            return None;
        }
        self.token().map(|token| Session {
            token,
        })
    }

    /// Persist a fresh login. The token is written before the flag so the
    /// flag never points at a missing token.
    fn begin(&self, token: &str) -> ApiResult<()> {
        self.set(TOKEN_KEY, token)?;
        self.set(AUTH_FLAG_KEY, "true")
    }

    /// Drop both keys. Both removals are attempted even if the first fails.
    fn end(&self) -> ApiResult<()> {
        let flag = self.remove(AUTH_FLAG_KEY);
        let token = self.remove(TOKEN_KEY);
        flag.and(token)
    }
}

/// In-memory store, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Store persisted as a JSON object on disk.
///
/// Every read goes to disk so separate processes (one CLI invocation per
/// command) observe each other's logins and logouts. Writes replace the file
/// through a temporary sibling.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Store backed by `path`; the file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(err) => {
                tracing::warn!("failed to read session file {}: {err}", self.path.display());
                return BTreeMap::new();
            },
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("ignoring malformed session file {}: {err}", self.path.display());
                BTreeMap::new()
            },
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> ApiResult<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                ApiError::Storage(format!("failed to create {}: {err}", parent.display()))
            })?;
        }
        let body = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .map_err(|err| ApiError::Storage(format!("failed to write {}: {err}", tmp.display())))?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            ApiError::Storage(format!("failed to replace {}: {err}", self.path.display()))
        })
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> ApiResult<()> {
        let _guard = self.write_lock.lock();
        let mut entries = self.read_entries();
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entries().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_and_end_round_trip_both_keys() {
        let store = MemorySessionStore::new();
        assert!(!store.is_authenticated());
        assert!(store.session().is_none());

        store.begin("tok-1").expect("begin");
        assert!(store.is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("tok-1"));
        assert_eq!(store.get(AUTH_FLAG_KEY).as_deref(), Some("true"));
        assert_eq!(
            store.session(),
            Some(Session {
                token: "tok-1".to_string()
            })
        );

        store.end().expect("end");
        assert!(store.get(TOKEN_KEY).is_none());
        assert!(store.get(AUTH_FLAG_KEY).is_none());
    }

    #[test]
    fn flag_alone_passes_the_weak_check() {
        let store = MemorySessionStore::new();
        store.set(AUTH_FLAG_KEY, "true").expect("set flag");
        assert!(store.is_authenticated());
        assert!(store.session().is_none());

        store.set(AUTH_FLAG_KEY, "yes").expect("set flag");
        assert!(!store.is_authenticated());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("session.json");

        FileSessionStore::new(&path)
            .begin("tok-file")
            .expect("begin");

        let reopened = FileSessionStore::new(&path);
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.token().as_deref(), Some("tok-file"));

        reopened.end().expect("end");
        assert!(!FileSessionStore::new(&path).is_authenticated());
        assert!(path.exists());
    }

    #[test]
    fn malformed_file_reads_as_logged_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").expect("write garbage");

        let store = FileSessionStore::new(&path);
        assert!(!store.is_authenticated());
        store.begin("tok").expect("begin overwrites garbage");
        assert!(store.is_authenticated());
    }
}
