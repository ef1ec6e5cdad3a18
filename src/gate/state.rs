//! Gate state machine.

use std::fmt;

/// Lifecycle state of one gate invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// Created, nothing queried yet.
    #[default]
    Idle,
    /// Waiting on the session validity check.
    Checking,
    /// Reading the session and choosing a destination.
    Deciding,
    /// Holding the splash for the minimum delay.
    Waiting,
    /// Issuing the navigation call.
    Navigating,
    /// Navigation issued and splash released.
    Done,
}

impl GateState {
    /// Check if transition to target state is valid.
    ///
    /// Valid transitions:
    /// - Idle -> Checking
    /// - Checking -> Deciding
    /// - Deciding -> Waiting
    /// - Waiting -> Navigating
    /// - Navigating -> Done
    /// - Navigating -> Waiting (fallback after a navigator failure)
    pub fn can_transition_to(&self, target: GateState) -> bool {
        use GateState::*;
        matches!(
            (*self, target),
            (Idle, Checking)
                | (Checking, Deciding)
                | (Deciding, Waiting)
                | (Waiting, Navigating)
                | (Navigating, Done)
                | (Navigating, Waiting)
        )
    }

    /// Attempt to transition to a new state.
    pub fn transition_to(&mut self, target: GateState) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::GateError::InvalidStateTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GateState::Done)
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
