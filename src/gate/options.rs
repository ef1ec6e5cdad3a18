//! Gate options and per-invocation route decisions.

use std::time::Duration;

use crate::route::RoutePath;

/// Default minimum splash hold when a session is valid.
pub const DEFAULT_VALID_DELAY: Duration = Duration::from_millis(1500);

/// Default minimum splash hold otherwise.
pub const DEFAULT_INVALID_DELAY: Duration = Duration::from_millis(2000);

/// Timing and fallback configuration shared by every launch surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOptions {
    /// Minimum hold before navigating to a resolved destination.
    pub valid_delay: Duration,
    /// Minimum hold before navigating to the fallback.
    pub invalid_delay: Duration,
    /// Destination when the session is invalid or resolution fails.
    pub fallback_route: RoutePath,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            valid_delay: DEFAULT_VALID_DELAY,
            invalid_delay: DEFAULT_INVALID_DELAY,
            fallback_route: RoutePath::from_static("/welcome"),
        }
    }
}

impl GateOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the valid-session hold.
    pub fn with_valid_delay(mut self, delay: Duration) -> Self {
        self.valid_delay = delay;
        self
    }

    /// Set the fallback hold.
    pub fn with_invalid_delay(mut self, delay: Duration) -> Self {
        self.invalid_delay = delay;
        self
    }

    /// Set the fallback destination.
    pub fn with_fallback_route(mut self, route: RoutePath) -> Self {
        self.fallback_route = route;
        self
    }

    pub(crate) fn valid(&self, destination: RoutePath) -> RouteDecision {
        RouteDecision {
            destination,
            delay: self.valid_delay,
            reason: DecisionReason::ValidSession,
        }
    }

    pub(crate) fn invalid(&self) -> RouteDecision {
        RouteDecision {
            destination: self.fallback_route.clone(),
            delay: self.invalid_delay,
            reason: DecisionReason::InvalidSession,
        }
    }

    pub(crate) fn fallback(&self) -> RouteDecision {
        RouteDecision {
            reason: DecisionReason::Fallback,
            ..self.invalid()
        }
    }
}

/// Why a destination was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// A valid session was read and resolved.
    ValidSession,
    /// No valid session exists.
    InvalidSession,
    /// Resolution failed and the gate fell back.
    Fallback,
}

/// Where to navigate and how long to hold the splash first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    /// Target route.
    pub destination: RoutePath,
    /// Minimum hold measured from invocation start.
    pub delay: Duration,
    /// Why this destination was chosen.
    pub reason: DecisionReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GateOptions::default();
        assert_eq!(options.valid_delay, Duration::from_millis(1500));
        assert_eq!(options.invalid_delay, Duration::from_millis(2000));
        assert_eq!(options.fallback_route.as_str(), "/welcome");
    }

    #[test]
    fn test_builders() {
        let options = GateOptions::new()
            .with_valid_delay(Duration::from_millis(10))
            .with_invalid_delay(Duration::from_millis(20))
            .with_fallback_route(RoutePath::new("/login").unwrap());
        assert_eq!(options.valid_delay, Duration::from_millis(10));
        assert_eq!(options.invalid_delay, Duration::from_millis(20));
        assert_eq!(options.fallback_route.as_str(), "/login");
    }

    #[test]
    fn test_decisions() {
        let options = GateOptions::default();

        let valid = options.valid(RoutePath::new("/home").unwrap());
        assert_eq!(valid.delay, options.valid_delay);
        assert_eq!(valid.reason, DecisionReason::ValidSession);

        let invalid = options.invalid();
        assert_eq!(invalid.destination, options.fallback_route);
        assert_eq!(invalid.delay, options.invalid_delay);

        let fallback = options.fallback();
        assert_eq!(fallback.destination, options.fallback_route);
        assert_eq!(fallback.reason, DecisionReason::Fallback);
    }
}
