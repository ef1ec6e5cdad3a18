//! Capabilities a launch surface hands to the gate.

use std::fmt;
use std::str::FromStr;

use crate::error::GateError;
use crate::route::RoutePath;
use crate::Result;

/// Which launch entry point invoked the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LaunchSurface {
    /// Bootstrap entry point.
    #[default]
    Bootstrap,
    /// Branded splash screen.
    Splash,
}

impl fmt::Display for LaunchSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap => f.write_str("bootstrap"),
            Self::Splash => f.write_str("splash"),
        }
    }
}

impl FromStr for LaunchSurface {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bootstrap" => Ok(Self::Bootstrap),
            "splash" => Ok(Self::Splash),
            other => Err(other.to_string()),
        }
    }
}

/// Navigation capability.
///
/// The gate issues at most one successful `replace` per invocation.
pub trait Navigator: Send + Sync {
    /// Replace the current screen with `route`.
    fn replace(&self, route: &RoutePath) -> Result<()>;

    /// Push `route` on top of the current screen.
    fn push(&self, route: &RoutePath) -> Result<()> {
        Err(GateError::navigator(
            route.as_str(),
            "push navigation not supported",
        ))
    }
}

/// Host-shell handle for the splash or loading surface.
pub trait SplashScreen: Send + Sync {
    /// Dismiss the splash. Best effort.
    fn hide(&self) -> Result<()>;
}

/// Splash handle for surfaces without a native splash.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSplash;

impl SplashScreen for NoSplash {
    fn hide(&self) -> Result<()> {
        Ok(())
    }
}
