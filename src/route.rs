//! Route paths and landing-route resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GateError;
use crate::session::{ProfileStage, Session};

/// An absolute navigation path such as `/home`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(String);

impl RoutePath {
    /// Parse a route, requiring a leading `/`.
    pub fn new(path: impl Into<String>) -> crate::Result<Self> {
        let path = path.into();
        if path.starts_with('/') {
            Ok(Self(path))
        } else {
            Err(GateError::InvalidRoute(path))
        }
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_static(path: &'static str) -> Self {
        debug_assert!(path.starts_with('/'));
        Self(path.to_string())
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoutePath {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RoutePath {
    type Error = GateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoutePath> for String {
    fn from(route: RoutePath) -> Self {
        route.0
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Maps a session to the screen the user should land on.
///
/// Implementations must be pure and total: `None` and malformed sessions
/// map to the welcome route instead of panicking.
pub trait RouteResolver: Send + Sync {
    /// Compute the landing route for `session`.
    fn next_route(&self, session: Option<&Session>) -> RoutePath;
}

impl<F> RouteResolver for F
where
    F: Fn(Option<&Session>) -> RoutePath + Send + Sync,
{
    fn next_route(&self, session: Option<&Session>) -> RoutePath {
        self(session)
    }
}

/// Landing routes keyed by onboarding stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    /// Unauthenticated entry point.
    pub welcome: RoutePath,
    /// Company details form.
    pub company_info: RoutePath,
    /// Document upload.
    pub documents: RoutePath,
    /// Waiting for account review.
    pub pending_approval: RoutePath,
    /// Main screen for fully onboarded accounts.
    pub home: RoutePath,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            welcome: RoutePath::from_static("/welcome"),
            company_info: RoutePath::from_static("/company-info"),
            documents: RoutePath::from_static("/documents"),
            pending_approval: RoutePath::from_static("/pending-approval"),
            home: RoutePath::from_static("/home"),
        }
    }
}

impl RouteTable {
    /// Replace the route used for missing or tokenless sessions.
    pub fn with_welcome(mut self, welcome: RoutePath) -> Self {
        self.welcome = welcome;
        self
    }

    /// Route for a given onboarding stage.
    pub fn for_stage(&self, stage: ProfileStage) -> &RoutePath {
        match stage {
            ProfileStage::NeedsCompanyInfo => &self.company_info,
            ProfileStage::NeedsDocuments => &self.documents,
            ProfileStage::PendingApproval => &self.pending_approval,
            ProfileStage::Complete => &self.home,
        }
    }
}

impl RouteResolver for RouteTable {
    fn next_route(&self, session: Option<&Session>) -> RoutePath {
        match session {
            Some(session) if session.has_token() => self.for_stage(session.profile_stage).clone(),
            _ => self.welcome.clone(),
        }
    }
}
