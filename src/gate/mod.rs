//! Startup route gate.
//!
//! A launch surface builds a [`Launch`] from its capabilities and hands it
//! to a shared [`RouteGate`]. The gate reads the persisted session, picks a
//! destination, holds the splash for the configured minimum, and issues a
//! single `replace` unless the surface's [`Liveness`] was cancelled first.

mod diagnostics;
mod liveness;
mod options;
mod runner;
mod state;
mod surface;

pub use diagnostics::{DiagnosticsSink, TracingDiagnostics};
pub use liveness::{Liveness, TeardownGuard};
pub use options::{
    DecisionReason, GateOptions, RouteDecision, DEFAULT_INVALID_DELAY, DEFAULT_VALID_DELAY,
};
pub use runner::{GateHandle, GateOutcome, GateReport, Launch, RouteGate};
pub use state::GateState;
pub use surface::{LaunchSurface, Navigator, NoSplash, SplashScreen};
