use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::session::Session;
use crate::routes::Route;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Source of truth for the current session's credentials.
///
/// Implementations keep an in-memory copy so `get` never fails; writes go
/// through to durable storage. Last write wins.
pub trait TokenStore: Send + Sync {
    /// Current credentials. Missing values are `None`.
    fn get(&self) -> Session;

    /// Replace the access token, keeping the refresh token.
    fn set_access_token(&self, token: &str) -> Result<()>;

    /// Replace both credentials (sign-in).
    fn set_session(&self, session: Session) -> Result<()>;

    /// Drop both credentials and return where the user should go next.
    ///
    /// The in-memory session is emptied even when removing the persisted
    /// copy fails.
    fn clear(&self) -> Result<Route>;
}

/// Token store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: RwLock<Session>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Session {
        self.session.read().clone()
    }

    fn set_access_token(&self, token: &str) -> Result<()> {
        self.session.write().access_token = Some(token.to_string());
        Ok(())
    }

    fn set_session(&self, session: Session) -> Result<()> {
        *self.session.write() = session;
        Ok(())
    }

    fn clear(&self) -> Result<Route> {
        *self.session.write() = Session::default();
        Ok(Route::Login)
    }
}

/// Token store persisted as JSON in the cache directory
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    session: RwLock<Session>,
}

impl FileTokenStore {
    /// Open the session file in `cache_dir`, starting empty if it is
    /// missing or unreadable.
    pub fn new(cache_dir: &Path) -> Self {
        Self::open(cache_dir.join(SESSION_FILE))
    }

    pub fn open(path: PathBuf) -> Self {
        let session = match Self::load(&path) {
            Ok(Some(session)) => {
                debug!(path = %path.display(), "Session loaded");
                session
            }
            Ok(None) => Session::default(),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Ignoring unreadable session file");
                Session::default()
            }
        };
        Self {
            path,
            session: RwLock::new(session),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Option<Session>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).context("Failed to read session file")?;
        let session = serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, contents).context("Failed to write session file")?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Session {
        self.session.read().clone()
    }

    fn set_access_token(&self, token: &str) -> Result<()> {
        let mut session = self.session.write();
        session.access_token = Some(token.to_string());
        self.save(&session)
    }

    fn set_session(&self, session: Session) -> Result<()> {
        let mut current = self.session.write();
        *current = session;
        self.save(&current)
    }

    fn clear(&self) -> Result<Route> {
        *self.session.write() = Session::default();
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(Route::Login)
    }
}
