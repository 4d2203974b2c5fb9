//! Durable client-side state: the session token and the dark-mode
//! preference, both of which must survive a restart of the client.
//!
//! The store keeps the state cached in memory and writes the whole file
//! through on every mutation. Reads never touch the filesystem, which keeps
//! the route guard a pure function of in-memory state.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const STATE_FILE: &str = "state.json";
const APP_DIR: &str = "screener";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no usable config directory for client state")]
    NoStateDir,

    #[error("failed to read client state from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write client state to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("client state file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Opaque credential proving authenticated admin identity. The client never
/// inspects it; validity is only ever decided by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    token: Option<SessionToken>,
    #[serde(default)]
    dark_mode: bool,
}

/// File-backed session and preference store.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    state: Mutex<PersistedState>,
}

impl SessionStore {
    /// Opens the store, creating the state directory and an empty state on
    /// first use. A missing file is not an error; a corrupt one is.
    pub fn open(dir_override: Option<&Path>) -> Result<Self, StorageError> {
        let dir = match dir_override {
            Some(dir) => dir.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(StorageError::NoStateDir)?
                .join(APP_DIR),
        };
        fs::create_dir_all(&dir).map_err(|source| StorageError::Write {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(STATE_FILE);

        let state = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| StorageError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                path: path.clone(),
                source,
            })?
        } else {
            PersistedState::default()
        };

        debug!(path = %path.display(), "opened client state");
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Stores the token and makes it durable. Overwrites any previous session.
    pub fn set_session(&self, token: SessionToken) -> Result<(), StorageError> {
        let mut state = self.lock();
        state.token = Some(token);
        self.persist(&state)
    }

    /// Pure read of the current session; no side effects.
    pub fn session(&self) -> Option<SessionToken> {
        self.lock().token.clone()
    }

    /// Removes the token. Guarded views must re-evaluate on their next check.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        let mut state = self.lock();
        state.token = None;
        self.persist(&state)
    }

    pub fn dark_mode(&self) -> bool {
        self.lock().dark_mode
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), StorageError> {
        let mut state = self.lock();
        state.dark_mode = enabled;
        self.persist(&state)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PersistedState> {
        self.state.lock().expect("client state lock poisoned")
    }

    fn persist(&self, state: &PersistedState) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(state).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, raw).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
