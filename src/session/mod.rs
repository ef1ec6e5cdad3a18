//! Persisted session access.
//!
//! This module provides the read-only session model the gate inspects at
//! boot and the [`SessionProvider`] capability it queries.

mod model;
mod provider;

pub use model::{ProfileStage, Session, SessionStatus};
pub use provider::{FileSessionProvider, MemorySessionProvider, SessionError, SessionProvider};
