//! Command-line interface for route-gate.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::gate::LaunchSurface;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Path to the persisted session file.
    pub session: Option<PathBuf>,
    /// Launch surface to simulate.
    pub surface: LaunchSurface,
    /// Valid-session splash hold in milliseconds.
    pub valid_delay_ms: Option<u64>,
    /// Fallback splash hold in milliseconds.
    pub invalid_delay_ms: Option<u64>,
    /// Fallback route.
    pub fallback_route: Option<String>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

fn parse_millis(name: &'static str, value: String) -> Result<u64, ArgsError> {
    value
        .parse()
        .map_err(|_| ArgsError::InvalidValue(name, value))
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("session") => {
                result.session = Some(parser.value()?.parse()?);
            }
            Long("surface") => {
                let value: String = parser.value()?.parse()?;
                result.surface = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidValue("surface", value))?;
            }
            Long("valid-delay-ms") => {
                let value: String = parser.value()?.parse()?;
                result.valid_delay_ms = Some(parse_millis("valid-delay-ms", value)?);
            }
            Long("invalid-delay-ms") => {
                let value: String = parser.value()?.parse()?;
                result.invalid_delay_ms = Some(parse_millis("invalid-delay-ms", value)?);
            }
            Short('f') | Long("fallback") => {
                let value: String = parser.value()?.parse()?;
                if !value.starts_with('/') {
                    return Err(ArgsError::InvalidValue("fallback", value));
                }
                result.fallback_route = Some(value);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"route-gate {version}
Resolve the persisted session and print the landing route

USAGE:
    route-gate [OPTIONS]

OPTIONS:
    -c, --config <FILE>          Path to configuration file (JSON)
    -s, --session <FILE>         Path to the persisted session (JSON)
        --surface <NAME>         Launch surface: bootstrap or splash [default: bootstrap]
        --valid-delay-ms <MS>    Splash hold with a valid session [default: 1500]
        --invalid-delay-ms <MS>  Splash hold otherwise [default: 2000]
    -f, --fallback <ROUTE>       Fallback and welcome route [default: routes.welcome]
    -l, --log-level <LVL>        route-gate log level (error, warn, info, debug, trace)
    -h, --help                   Print help
    -V, --version                Print version

ENVIRONMENT VARIABLES:
    ROUTE_GATE_VALID_DELAY_MS    Valid-session hold (overrides config)
    ROUTE_GATE_INVALID_DELAY_MS  Fallback hold (overrides config)
    ROUTE_GATE_FALLBACK_ROUTE    Fallback route (overrides config)
    ROUTE_GATE_SESSION_FILE      Session file (overrides config)
    ROUTE_GATE_LOG_LEVEL         Log level (overrides config)
    RUST_LOG                     Full tracing filter, used as-is when no level is set

EXAMPLES:
    # Resolve ./session.json from the bootstrap surface
    route-gate

    # Resolve a specific session from the splash surface without delays
    route-gate -s ~/.app/session.json --surface splash --valid-delay-ms 0 --invalid-delay-ms 0
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("route-gate {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    /// Lexopt parsing error.
    #[error(transparent)]
    Lexopt(#[from] lexopt::Error),
    /// Invalid argument value.
    #[error("invalid value for --{0}: '{1}'")]
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    #[error("unexpected argument: '{0}'")]
    UnexpectedArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("route-gate")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert_eq!(result.surface, LaunchSurface::Bootstrap);
        assert!(result.session.is_none());
        assert!(result.valid_delay_ms.is_none());
    }

    #[test]
    fn test_session_and_surface() {
        let result =
            parse_args_from(args(&["-s", "/tmp/session.json", "--surface", "splash"])).unwrap();
        assert_eq!(result.session, Some(PathBuf::from("/tmp/session.json")));
        assert_eq!(result.surface, LaunchSurface::Splash);
    }

    #[test]
    fn test_delays() {
        let result = parse_args_from(args(&[
            "--valid-delay-ms",
            "10",
            "--invalid-delay-ms",
            "20",
        ]))
        .unwrap();
        assert_eq!(result.valid_delay_ms, Some(10));
        assert_eq!(result.invalid_delay_ms, Some(20));
    }

    #[test]
    fn test_invalid_delay() {
        let result = parse_args_from(args(&["--valid-delay-ms", "soon"]));
        assert!(matches!(
            result,
            Err(ArgsError::InvalidValue("valid-delay-ms", _))
        ));
    }

    #[test]
    fn test_fallback_requires_slash() {
        let result = parse_args_from(args(&["-f", "/start"])).unwrap();
        assert_eq!(result.fallback_route, Some("/start".to_string()));

        assert!(parse_args_from(args(&["-f", "start"])).is_err());
    }

    #[test]
    fn test_invalid_surface() {
        let result = parse_args_from(args(&["--surface", "modal"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_help_and_version() {
        assert!(parse_args_from(args(&["-h"])).unwrap().help);
        assert!(parse_args_from(args(&["--version"])).unwrap().version);
    }

    #[test]
    fn test_unexpected_positional() {
        let result = parse_args_from(args(&["extra"]));
        assert!(matches!(result, Err(ArgsError::UnexpectedArgument(_))));
    }
}
