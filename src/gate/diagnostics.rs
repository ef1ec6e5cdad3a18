//! Failure reporting for the gate.

use tracing::warn;

use super::LaunchSurface;
use crate::error::GateError;

/// Receives every failure the gate absorbs.
pub trait DiagnosticsSink: Send + Sync {
    /// Record a failure observed on `surface`.
    fn record(&self, surface: LaunchSurface, failure: &GateError);
}

/// Emits failures as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn record(&self, surface: LaunchSurface, failure: &GateError) {
        warn!(%surface, kind = failure.kind(), error = %failure, "route gate failure");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_sink_does_not_panic() {
        let _ = crate::logging::try_init();
        TracingDiagnostics.record(
            LaunchSurface::Splash,
            &GateError::SessionQuery("offline".into()),
        );
    }
}
