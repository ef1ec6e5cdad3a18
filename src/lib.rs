//! # route-gate
//!
//! Startup session resolution and route gating for launch surfaces.
//!
//! On launch, each entry point (a bootstrap surface and a branded splash
//! surface) asks the same [`RouteGate`] where the user should land. The gate
//! checks whether a persisted session is still valid, maps it to a landing
//! route, holds the splash for a minimum duration, and navigates exactly once.
//! If the surface is torn down first, nothing is navigated.
//!
//! ## Features
//!
//! - **Fail-safe**: provider errors and read races fall back to a safe route
//! - **Cancellable**: every side effect is gated on the surface's [`Liveness`]
//! - **Shared configuration**: both surfaces use one [`GateOptions`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use route_gate::{
//!     GateOptions, Launch, LaunchSurface, MemorySessionProvider, Navigator, RouteGate,
//!     RoutePath, Session,
//! };
//!
//! struct PrintNavigator;
//!
//! impl Navigator for PrintNavigator {
//!     fn replace(&self, route: &RoutePath) -> route_gate::Result<()> {
//!         println!("-> {}", route);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> route_gate::Result<()> {
//!     route_gate::logging::try_init().ok();
//!
//!     let sessions = Arc::new(MemorySessionProvider::with_session(Session::new("token")));
//!     let gate = RouteGate::new(GateOptions::default());
//!
//!     let launch = Launch::new(LaunchSurface::Bootstrap, Arc::new(PrintNavigator), sessions);
//!     let report = gate.resolve_and_navigate(launch).join().await?;
//!     println!("{:?}", report.outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod logging;
pub mod route;
pub mod session;

// Re-export commonly used types
pub use error::{GateError, Result};
pub use gate::{
    DiagnosticsSink, GateHandle, GateOptions, GateOutcome, GateReport, GateState, Launch,
    LaunchSurface, Liveness, Navigator, NoSplash, RouteDecision, RouteGate, SplashScreen,
};
pub use route::{RoutePath, RouteResolver, RouteTable};
pub use session::{
    FileSessionProvider, MemorySessionProvider, ProfileStage, Session, SessionError,
    SessionProvider, SessionStatus,
};
