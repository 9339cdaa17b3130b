//! Run state shared by every frame-driven simulation.
//!
//! A simulation is created idle, becomes running on `start`, and once stopped it
//! never runs again: `frame` calls after `stop` must return without touching state.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Stopped,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Lifecycle {
    state: RunState,
}

impl Lifecycle {
    /// Returns `true` when this call moved the lifecycle into `Running`.
    pub fn start(&mut self) -> bool {
        if self.state == RunState::Idle {
            self.state = RunState::Running;
            true
        } else {
            false
        }
    }

    /// Idempotent; returns `true` only for the call that actually stopped it.
    pub fn stop(&mut self) -> bool {
        if self.state == RunState::Stopped {
            return false;
        }
        self.state = RunState::Stopped;
        true
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn state(&self) -> RunState {
        self.state
    }
}
