//! Session provider capability and built-in providers.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use super::{Session, SessionStatus};

/// Errors produced by session providers.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading persisted state failed.
    #[error("failed to read session: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted state is not a valid session document.
    #[error("failed to parse session: {0}")]
    Parse(#[from] serde_json::Error),

    /// Internal lock was poisoned.
    #[error("session storage lock poisoned")]
    LockPoisoned,

    /// Provider-specific failure.
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the persisted session.
///
/// `get_session` may return `None` even after `has_valid_session` returned
/// `true`; callers must tolerate the race.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Whether a persisted, unexpired session exists.
    async fn has_valid_session(&self) -> Result<bool, SessionError>;

    /// Read the persisted session, if any.
    async fn get_session(&self) -> Result<Option<Session>, SessionError>;
}

/// In-memory session provider.
#[derive(Debug, Default)]
pub struct MemorySessionProvider {
    session: RwLock<Option<Session>>,
}

impl MemorySessionProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding `session`.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }

    /// Replace the stored session.
    pub fn store(&self, session: Session) -> Result<(), SessionError> {
        let mut slot = self
            .session
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        *slot = Some(session);
        Ok(())
    }

    /// Remove the stored session, returning it.
    pub fn clear(&self) -> Result<Option<Session>, SessionError> {
        let mut slot = self
            .session
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        Ok(slot.take())
    }

    /// Clone of the stored session.
    pub fn current(&self) -> Result<Option<Session>, SessionError> {
        let slot = self
            .session
            .read()
            .map_err(|_| SessionError::LockPoisoned)?;
        Ok(slot.clone())
    }
}

#[async_trait]
impl SessionProvider for MemorySessionProvider {
    async fn has_valid_session(&self) -> Result<bool, SessionError> {
        Ok(self
            .current()?
            .is_some_and(|s| s.status() == SessionStatus::Valid))
    }

    async fn get_session(&self) -> Result<Option<Session>, SessionError> {
        self.current()
    }
}

/// Session provider backed by a JSON file.
///
/// A missing file means no session. Any other read or parse failure is
/// reported as an error.
#[derive(Debug, Clone)]
pub struct FileSessionProvider {
    path: PathBuf,
}

impl FileSessionProvider {
    /// Create a provider reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Option<Session>, SessionError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted session");
                return Ok(None);
            }
            Err(e) => return Err(SessionError::Io(e)),
        };
        let session = serde_json::from_str(&content)?;
        Ok(Some(session))
    }
}

#[async_trait]
impl SessionProvider for FileSessionProvider {
    async fn has_valid_session(&self) -> Result<bool, SessionError> {
        Ok(self
            .load()
            .await?
            .is_some_and(|s| s.status() == SessionStatus::Valid))
    }

    async fn get_session(&self) -> Result<Option<Session>, SessionError> {
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ProfileStage;
    use chrono::{Duration, Utc};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_memory_provider_empty() {
        let provider = MemorySessionProvider::new();
        assert!(!provider.has_valid_session().await.unwrap());
        assert!(provider.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_provider_store_and_clear() {
        let provider = MemorySessionProvider::new();
        provider
            .store(Session::new("tok").with_stage(ProfileStage::Complete))
            .unwrap();
        assert!(provider.has_valid_session().await.unwrap());

        let cleared = provider.clear().unwrap();
        assert_eq!(cleared.unwrap().profile_stage, ProfileStage::Complete);
        assert!(!provider.has_valid_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_provider_expired() {
        let expired = Session::new("tok").with_expiry(Utc::now() - Duration::hours(1));
        let provider = MemorySessionProvider::with_session(expired);
        assert!(!provider.has_valid_session().await.unwrap());
        // The expired session is still readable
        assert!(provider.get_session().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_file_provider_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileSessionProvider::new(dir.path().join("session.json"));
        assert!(!provider.has_valid_session().await.unwrap());
        assert!(provider.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_provider_reads_session() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"token":"abc","profile_stage":"complete"}"#)
            .unwrap();

        let provider = FileSessionProvider::new(file.path());
        assert!(provider.has_valid_session().await.unwrap());
        let session = provider.get_session().await.unwrap().unwrap();
        assert_eq!(session.profile_stage, ProfileStage::Complete);
    }

    #[tokio::test]
    async fn test_file_provider_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();

        let provider = FileSessionProvider::new(file.path());
        let err = provider.has_valid_session().await.unwrap_err();
        assert!(matches!(err, SessionError::Parse(_)));
    }
}
