//! Session providers
//!
//! The transport asks a [`SessionProvider`] for the bearer token on every
//! request instead of reading global storage.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use shared::client::Session;

use crate::ClientResult;

/// Source of the current authenticated session
pub trait SessionProvider: Send + Sync {
    fn session(&self) -> Option<Session>;

    fn store(&self, session: Session) -> ClientResult<()>;

    fn clear(&self) -> ClientResult<()>;

    fn token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }

    fn is_authenticated(&self) -> bool {
        self.session().is_some_and(|s| !s.token.is_empty())
    }
}

/// Session held in memory only
#[derive(Debug, Default)]
pub struct MemorySession {
    slot: RwLock<Option<Session>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            slot: RwLock::new(Some(session)),
        }
    }
}

impl SessionProvider for MemorySession {
    fn session(&self) -> Option<Session> {
        self.slot.read().clone()
    }

    fn store(&self, session: Session) -> ClientResult<()> {
        *self.slot.write() = Some(session);
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.slot.write() = None;
        Ok(())
    }
}

/// Session persisted as a JSON file
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl SessionProvider for FileSession {
    /// A missing file means logged out; a corrupt one is logged and ignored
    fn session(&self) -> Option<Session> {
        if !self.path.exists() {
            return None;
        }
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to read session file: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Failed to parse session file: {}", e);
                None
            }
        }
    }

    fn store(&self, session: Session) -> ClientResult<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(&session)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
