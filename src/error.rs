//! Error types for route-gate.

use thiserror::Error;

use crate::gate::GateState;

/// Main error type for route gate operations.
///
/// The first four variants are gate failures: they are recorded for
/// diagnostics and never escape [`RouteGate::run`](crate::RouteGate::run).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// A session provider call failed.
    #[error("session query failed: {0}")]
    SessionQuery(String),

    /// The provider reported a valid session but could not produce one.
    #[error("session read race: {0}")]
    SessionReadRace(String),

    /// Issuing navigation failed.
    #[error("navigation to {route} failed: {reason}")]
    Navigator { route: String, reason: String },

    /// Dismissing the splash surface failed.
    #[error("splash dismissal failed: {0}")]
    Splash(String),

    /// Invalid state transition attempted.
    #[error("invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition { from: GateState, to: GateState },

    /// A route path that does not start with `/`.
    #[error("invalid route: '{0}'")]
    InvalidRoute(String),

    /// The spawned gate task did not complete.
    #[error("gate task failed: {0}")]
    Join(String),
}

impl GateError {
    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionQuery(_) => "session_query",
            Self::SessionReadRace(_) => "session_read_race",
            Self::Navigator { .. } => "navigator",
            Self::Splash(_) => "splash",
            Self::InvalidStateTransition { .. } => "invalid_state_transition",
            Self::InvalidRoute(_) => "invalid_route",
            Self::Join(_) => "join",
        }
    }

    /// Build a navigator failure for `route`.
    pub fn navigator(route: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Navigator {
            route: route.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience Result type for route gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
