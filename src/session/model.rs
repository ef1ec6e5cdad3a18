//! Persisted session model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How far onboarding has progressed for the signed-in account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStage {
    /// Company details have not been submitted yet.
    #[default]
    NeedsCompanyInfo,
    /// Company details are in, supporting documents are missing.
    NeedsDocuments,
    /// Everything is submitted and awaiting review.
    PendingApproval,
    /// Onboarding finished.
    Complete,
}

/// Validity classification of a session at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No usable credential.
    Absent,
    /// Credential present and not expired.
    Valid,
    /// Credential present but past its expiry.
    Expired,
}

/// A previously persisted session.
///
/// Sessions are owned by a [`SessionProvider`](super::SessionProvider); the
/// gate only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Opaque credential.
    pub token: Option<String>,
    /// Expiry instant. `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Onboarding progress.
    pub profile_stage: ProfileStage,
}

impl Session {
    /// Create a non-expiring session with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Set the onboarding stage.
    pub fn with_stage(mut self, stage: ProfileStage) -> Self {
        self.profile_stage = stage;
        self
    }

    /// Set the expiry instant.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether a non-empty token is present.
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Classify the session at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> SessionStatus {
        if !self.has_token() {
            return SessionStatus::Absent;
        }
        match self.expires_at {
            Some(expiry) if expiry <= now => SessionStatus::Expired,
            _ => SessionStatus::Valid,
        }
    }

    /// Classify the session against the current wall clock.
    pub fn status(&self) -> SessionStatus {
        self.status_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_tokenless_is_absent() {
        let session = Session::default();
        assert_eq!(session.status(), SessionStatus::Absent);

        let empty = Session::new("");
        assert_eq!(empty.status(), SessionStatus::Absent);
    }

    #[test]
    fn test_no_expiry_is_valid() {
        let session = Session::new("tok");
        assert_eq!(session.status(), SessionStatus::Valid);
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let session = Session::new("tok").with_expiry(now);
        assert_eq!(session.status_at(now), SessionStatus::Expired);
        assert_eq!(
            session.status_at(now - Duration::seconds(1)),
            SessionStatus::Valid
        );
    }

    #[test]
    fn test_deserialize_snake_case_stage() {
        let json = r#"{"token":"abc","profile_stage":"pending_approval"}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.profile_stage, ProfileStage::PendingApproval);
        assert!(session.expires_at.is_none());
    }

    #[test]
    fn test_deserialize_defaults() {
        let session: Session = serde_json::from_str("{}").unwrap();
        assert!(session.token.is_none());
        assert_eq!(session.profile_stage, ProfileStage::NeedsCompanyInfo);
    }

    #[test]
    fn test_deserialize_rfc3339_expiry() {
        let json = r#"{"token":"abc","expires_at":"2001-01-01T00:00:00Z"}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.status(), SessionStatus::Expired);
    }
}
