//! Durable session state: bearer token and role cache.
//!
//! The session is a tiny key/value store persisted across restarts. Only two
//! keys are recognized (see [`keys`]). The role stored here is a routing
//! convenience; the backend authorizes every request on its own.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use serde_json::Value;

use mealdash_core::Role;

use crate::config::ClientConfig;

/// Session storage keys.
pub mod keys {
    /// Key for the bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the cached role.
    pub const ROLE: &str = "role";
}

/// The .NET-style role claim URI some backends embed instead of `role`.
const MS_ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// Claim names tried, in order, when deriving a role from a token.
const ROLE_CLAIMS: [&str; 4] = ["role", "roleName", MS_ROLE_CLAIM, "roles"];

// =============================================================================
// Storage
// =============================================================================

/// A durable string key/value store for session state.
///
/// Mirrors the shape of a browser's local storage: infallible from the
/// caller's perspective, with persistence failures handled (and logged)
/// internally.
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&self, key: &str, value: &str);

    /// Remove a value.
    fn remove(&self, key: &str);

    /// Remove several values as one operation.
    ///
    /// Implementations that persist should do so once, after all removals.
    fn remove_many(&self, remove_keys: &[&str]) {
        for key in remove_keys {
            self.remove(key);
        }
    }
}

/// In-memory storage. Sessions are lost on restart; used in tests and when
/// no session file is configured.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}

/// File-backed storage: a JSON object persisted write-through to one path.
///
/// I/O failures are logged and otherwise swallowed; a broken disk must not
/// take the session API down with it.
pub struct FileStorage {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or initialize) the store at `path`.
    ///
    /// A missing file starts an empty session; an unreadable or corrupt file
    /// is logged and treated the same way.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        let values = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Corrupt session file, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read session file, starting empty");
                HashMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        }
    }

    fn persist(&self, values: &HashMap<String, String>) {
        let serialized = match serde_json::to_string_pretty(values) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize session state");
                return;
            }
        };

        if let Some(parent) = self.path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to create session directory");
            return;
        }

        if let Err(e) = std::fs::write(&self.path, serialized) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to write session file");
        }
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
            self.persist(&values);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
            self.persist(&values);
        }
    }

    fn remove_many(&self, remove_keys: &[&str]) {
        if let Ok(mut values) = self.values.lock() {
            for key in remove_keys {
                values.remove(*key);
            }
            self.persist(&values);
        }
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Handle to the current authentication state.
///
/// Cheaply cloneable; all clones share the same underlying storage, so a
/// token set after login is immediately visible to every holder (including
/// the API client's request path).
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Create a store over any storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Create an in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Create a store persisted at `path`.
    #[must_use]
    pub fn with_file(path: &Path) -> Self {
        Self::new(Arc::new(FileStorage::open(path)))
    }

    /// Create a store from configuration: file-backed when a session file is
    /// configured, in-memory otherwise.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        match &config.session_file {
            Some(path) => Self::with_file(path),
            None => Self::in_memory(),
        }
    }

    /// Store the bearer token. Effective immediately for subsequent requests.
    pub fn set_token(&self, token: &str) {
        self.storage.set(keys::TOKEN, token);
    }

    /// The current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get(keys::TOKEN)
    }

    /// Cache the user's role, independent of what the token claims carry.
    pub fn set_role(&self, role: Role) {
        self.storage.set(keys::ROLE, role.as_str());
    }

    /// The cached role, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.storage
            .get(keys::ROLE)
            .map(|raw| Role::normalize(&raw))
    }

    /// Whether a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Erase token and role as one operation.
    pub fn clear(&self) {
        self.storage.remove_many(&[keys::TOKEN, keys::ROLE]);
    }

    /// Try to derive a role from a token's claims.
    ///
    /// Parses the second dot-separated segment as base64url-encoded JSON and
    /// probes the known role claim names. Any failure - not a JWT shape, bad
    /// base64, bad JSON, no recognized claim - yields `None`; malformed or
    /// foreign-format tokens must never crash the caller.
    #[must_use]
    pub fn decode_role_from_token(token: &str) -> Option<Role> {
        let payload = token.split('.').nth(1)?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| URL_SAFE.decode(payload))
            .ok()?;

        let claims: Value = serde_json::from_slice(&bytes).ok()?;

        for claim in ROLE_CLAIMS {
            let Some(value) = claims.get(claim) else {
                continue;
            };

            if let Some(s) = value.as_str() {
                return Some(Role::normalize(s));
            }

            // Some backends emit the role claim as an array.
            if let Some(first) = value.as_array().and_then(|a| a.first())
                && let Some(s) = first.as_str()
            {
                return Some(Role::normalize(s));
            }
        }

        None
    }
}
