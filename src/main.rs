//! route-gate binary entry point.
//!
//! Simulates one launch surface: resolves the persisted session file and
//! prints the route the app would land on.

use std::process::ExitCode;
use std::sync::Arc;

use route_gate::cli::{self, Args};
use route_gate::config::Config;
use route_gate::{
    logging, FileSessionProvider, GateOutcome, Launch, Navigator, RouteGate, RoutePath,
    SplashScreen,
};
use tracing::{error, info};

/// Prints the destination instead of switching screens.
struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn replace(&self, route: &RoutePath) -> route_gate::Result<()> {
        println!("{}", route);
        Ok(())
    }
}

struct ConsoleSplash;

impl SplashScreen for ConsoleSplash {
    fn hide(&self) -> route_gate::Result<()> {
        info!("splash dismissed");
        Ok(())
    }
}

async fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = Config::load(&args)?;
    match config.log_filter() {
        Some(level) => logging::init_with_level(level),
        None => logging::try_init(),
    }
    .ok();

    info!("route-gate v{}", env!("CARGO_PKG_VERSION"));

    let gate = RouteGate::new(config.to_options()?).with_resolver(config.route_table()?);
    let sessions = Arc::new(FileSessionProvider::new(config.session.path.clone()));
    info!(path = %sessions.path().display(), surface = %args.surface, "resolving session");

    let launch = Launch::new(args.surface, Arc::new(ConsoleNavigator), sessions)
        .with_splash(Arc::new(ConsoleSplash));
    let handle = gate.resolve_and_navigate(launch);
    let liveness = handle.liveness().clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, tearing down launch surface");
            liveness.cancel();
        }
    });

    let report = handle.join().await?;
    match report.outcome {
        GateOutcome::Navigated { .. } => Ok(ExitCode::SUCCESS),
        GateOutcome::Cancelled { during } => {
            info!(state = %during, "launch cancelled");
            Ok(ExitCode::from(130))
        }
        outcome => {
            error!(?outcome, failures = report.failures.len(), "launch did not navigate");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Try 'route-gate --help' for more information.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
