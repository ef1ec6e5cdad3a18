//! The route gate: resolve the persisted session once, hold the splash,
//! then navigate exactly once unless the owning surface was torn down.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, info_span, Instrument};

use super::{
    DiagnosticsSink, GateOptions, GateState, LaunchSurface, Liveness, Navigator, NoSplash,
    RouteDecision, SplashScreen, TracingDiagnostics,
};
use crate::error::GateError;
use crate::route::{RoutePath, RouteResolver, RouteTable};
use crate::session::{SessionProvider, SessionStatus};
use crate::Result;

/// One invocation's capabilities, supplied by the launch surface.
pub struct Launch {
    surface: LaunchSurface,
    navigator: Arc<dyn Navigator>,
    sessions: Arc<dyn SessionProvider>,
    splash: Arc<dyn SplashScreen>,
    liveness: Liveness,
    state: watch::Sender<GateState>,
}

impl Launch {
    /// Create a launch with no splash handle and a fresh liveness token.
    pub fn new(
        surface: LaunchSurface,
        navigator: Arc<dyn Navigator>,
        sessions: Arc<dyn SessionProvider>,
    ) -> Self {
        let (state, _) = watch::channel(GateState::Idle);
        Self {
            surface,
            navigator,
            sessions,
            splash: Arc::new(NoSplash),
            liveness: Liveness::new(),
            state,
        }
    }

    /// Attach the host shell's splash handle.
    pub fn with_splash(mut self, splash: Arc<dyn SplashScreen>) -> Self {
        self.splash = splash;
        self
    }

    /// Use an existing liveness token owned by the surface.
    pub fn with_liveness(mut self, liveness: Liveness) -> Self {
        self.liveness = liveness;
        self
    }

    /// Token the surface cancels on teardown.
    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    /// Observe gate state changes for this launch.
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state.subscribe()
    }
}

/// How a gate invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// `replace` was issued successfully.
    Navigated { route: RoutePath },
    /// The owner was torn down; nothing was navigated.
    Cancelled { during: GateState },
    /// Both the destination and the fallback navigation failed.
    NavigationFailed,
    /// A state-machine error stopped the gate before navigating.
    Aborted { during: GateState },
}

/// Summary of one gate invocation.
#[derive(Debug, Clone)]
pub struct GateReport {
    /// Surface that ran the gate.
    pub surface: LaunchSurface,
    /// Last destination decided, if the gate got that far.
    pub decision: Option<RouteDecision>,
    /// How the invocation ended.
    pub outcome: GateOutcome,
    /// Final gate state.
    pub state: GateState,
    /// Failures absorbed along the way.
    pub failures: Vec<GateError>,
    /// Time from invocation to completion.
    pub elapsed: Duration,
}

impl GateReport {
    /// Route navigated to, if any.
    pub fn navigated_to(&self) -> Option<&RoutePath> {
        match &self.outcome {
            GateOutcome::Navigated { route } => Some(route),
            _ => None,
        }
    }

    /// Whether the invocation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, GateOutcome::Cancelled { .. })
    }
}

/// Handle to a gate running in the background.
#[derive(Debug)]
pub struct GateHandle {
    liveness: Liveness,
    state: watch::Receiver<GateState>,
    task: JoinHandle<GateReport>,
}

impl GateHandle {
    /// Tear down the owner: no navigation will be issued after this.
    pub fn cancel(&self) {
        self.liveness.cancel();
    }

    /// The invocation's liveness token.
    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    /// Latest gate state.
    pub fn state(&self) -> GateState {
        *self.state.borrow()
    }

    /// Whether the gate task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the gate to finish.
    pub async fn join(self) -> Result<GateReport> {
        self.task.await.map_err(|e| GateError::Join(e.to_string()))
    }
}

/// Startup session-resolution and route-gating procedure.
///
/// One `RouteGate` is configured once and shared by every launch surface so
/// timing and fallback behavior cannot diverge between them.
#[derive(Clone)]
pub struct RouteGate {
    options: GateOptions,
    resolver: Arc<dyn RouteResolver>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl Default for RouteGate {
    fn default() -> Self {
        Self::new(GateOptions::default())
    }
}

impl std::fmt::Debug for RouteGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGate")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RouteGate {
    /// Create a gate using [`RouteTable::default`] and tracing diagnostics.
    ///
    /// The table's welcome route is the fallback route.
    pub fn new(options: GateOptions) -> Self {
        let table = RouteTable::default().with_welcome(options.fallback_route.clone());
        Self {
            options,
            resolver: Arc::new(table),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Use a custom landing-route resolver.
    pub fn with_resolver(mut self, resolver: impl RouteResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Send absorbed failures to `diagnostics`.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// The gate's options.
    pub fn options(&self) -> &GateOptions {
        &self.options
    }

    /// Spawn the gate for `launch` and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn resolve_and_navigate(&self, launch: Launch) -> GateHandle {
        let gate = self.clone();
        let liveness = launch.liveness.clone();
        let state = launch.subscribe();
        let task = tokio::spawn(async move { gate.run(&launch).await });
        GateHandle {
            liveness,
            state,
            task,
        }
    }

    /// Run the gate to completion. Never fails; failures land in the report.
    pub async fn run(&self, launch: &Launch) -> GateReport {
        let span = info_span!("route_gate", surface = %launch.surface);
        Run::new(self, launch).execute().instrument(span).await
    }
}

/// Mutable state owned by a single invocation.
struct Run<'a> {
    gate: &'a RouteGate,
    launch: &'a Launch,
    state: GateState,
    started: Instant,
    decision: Option<RouteDecision>,
    failures: Vec<GateError>,
}

impl<'a> Run<'a> {
    fn new(gate: &'a RouteGate, launch: &'a Launch) -> Self {
        Self {
            gate,
            launch,
            state: GateState::Idle,
            started: Instant::now(),
            decision: None,
            failures: Vec::new(),
        }
    }

    async fn execute(mut self) -> GateReport {
        let outcome = match self.drive().await {
            Ok(outcome) => outcome,
            Err(e) => {
                let during = self.state;
                self.fail(e);
                GateOutcome::Aborted { during }
            }
        };
        self.into_report(outcome)
    }

    fn advance(&mut self, next: GateState) -> Result<()> {
        self.state.transition_to(next)?;
        debug!(state = %next, "gate transition");
        self.launch.state.send_replace(next);
        Ok(())
    }

    fn fail(&mut self, failure: GateError) {
        self.gate.diagnostics.record(self.launch.surface, &failure);
        self.failures.push(failure);
    }

    fn cancelled(&self) -> GateOutcome {
        debug!(state = %self.state, "owner torn down, gate stopped");
        GateOutcome::Cancelled { during: self.state }
    }

    async fn drive(&mut self) -> Result<GateOutcome> {
        let launch = self.launch;
        let gate = self.gate;
        let options = &gate.options;
        let liveness = &launch.liveness;

        if liveness.is_cancelled() {
            return Ok(self.cancelled());
        }

        self.advance(GateState::Checking)?;
        let valid = tokio::select! {
            biased;
            _ = liveness.cancelled() => return Ok(self.cancelled()),
            result = launch.sessions.has_valid_session() => result,
        };
        let valid = match valid {
            Ok(valid) => valid,
            Err(e) => {
                self.fail(GateError::SessionQuery(e.to_string()));
                false
            }
        };
        if liveness.is_cancelled() {
            return Ok(self.cancelled());
        }

        self.advance(GateState::Deciding)?;
        let decision = if valid {
            let session = tokio::select! {
                biased;
                _ = liveness.cancelled() => return Ok(self.cancelled()),
                result = launch.sessions.get_session() => result,
            };
            if liveness.is_cancelled() {
                return Ok(self.cancelled());
            }
            match session {
                Ok(Some(session)) => match session.status() {
                    SessionStatus::Valid => {
                        options.valid(gate.resolver.next_route(Some(&session)))
                    }
                    status => {
                        self.fail(GateError::SessionReadRace(format!(
                            "session read back as {:?}",
                            status
                        )));
                        options.fallback()
                    }
                },
                Ok(None) => {
                    self.fail(GateError::SessionReadRace(
                        "no session after a successful validity check".into(),
                    ));
                    options.fallback()
                }
                Err(e) => {
                    self.fail(GateError::SessionQuery(e.to_string()));
                    options.fallback()
                }
            }
        } else {
            options.invalid()
        };
        debug!(
            destination = %decision.destination,
            delay_ms = decision.delay.as_millis() as u64,
            reason = ?decision.reason,
            "route decided"
        );

        let outcome = self.navigate(decision).await?;
        if matches!(outcome, GateOutcome::Cancelled { .. }) {
            return Ok(outcome);
        }

        self.advance(GateState::Done)?;
        if let Err(e) = launch.splash.hide() {
            self.fail(GateError::Splash(e.to_string()));
        }
        Ok(outcome)
    }

    /// Hold until `deadline`. Returns `false` if the owner went away.
    async fn hold(&self, deadline: Instant) -> bool {
        let liveness = &self.launch.liveness;
        tokio::select! {
            biased;
            _ = liveness.cancelled() => false,
            _ = sleep_until(deadline) => liveness.is_alive(),
        }
    }

    async fn navigate(&mut self, decision: RouteDecision) -> Result<GateOutcome> {
        let launch = self.launch;
        let navigator = &launch.navigator;
        let gate = self.gate;
        let fallback_route = &gate.options.fallback_route;

        self.decision = Some(decision.clone());
        self.advance(GateState::Waiting)?;
        if !self.hold(self.started + decision.delay).await {
            return Ok(self.cancelled());
        }

        self.advance(GateState::Navigating)?;
        let err = match navigator.replace(&decision.destination) {
            Ok(()) => {
                info!(route = %decision.destination, "navigated");
                return Ok(GateOutcome::Navigated {
                    route: decision.destination,
                });
            }
            Err(e) => e,
        };
        self.fail(as_navigator_failure(&decision.destination, err));
        if &decision.destination == fallback_route {
            return Ok(GateOutcome::NavigationFailed);
        }

        let fallback = gate.options.fallback();
        self.decision = Some(fallback.clone());
        self.advance(GateState::Waiting)?;
        if !self.hold(Instant::now() + fallback.delay).await {
            return Ok(self.cancelled());
        }

        self.advance(GateState::Navigating)?;
        match navigator.replace(&fallback.destination) {
            Ok(()) => {
                info!(route = %fallback.destination, "navigated to fallback");
                Ok(GateOutcome::Navigated {
                    route: fallback.destination,
                })
            }
            Err(e) => {
                self.fail(as_navigator_failure(&fallback.destination, e));
                Ok(GateOutcome::NavigationFailed)
            }
        }
    }

    fn into_report(self, outcome: GateOutcome) -> GateReport {
        GateReport {
            surface: self.launch.surface,
            decision: self.decision,
            outcome,
            state: self.state,
            failures: self.failures,
            elapsed: self.started.elapsed(),
        }
    }
}

fn as_navigator_failure(route: &RoutePath, err: GateError) -> GateError {
    match err {
        GateError::Navigator { .. } => err,
        other => GateError::navigator(route.as_str(), other.to_string()),
    }
}
