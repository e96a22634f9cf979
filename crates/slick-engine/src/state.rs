//! Engine lifecycle state and the simulation clock.

use std::fmt;

use slick_core::StepId;

/// Lifecycle state of a [`SimulationEngine`](crate::SimulationEngine).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Constructed; no quantities yet.
    Uninitialized,
    /// Initialized or restored; no step taken yet.
    Ready,
    /// At least one step taken.
    Running,
    /// A `run_to` call completed. Further `run_to` calls are no-ops.
    Finished,
    /// A step produced a non-finite quantity. Terminal.
    Failed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// The simulation clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationState {
    /// Current simulation time.
    pub time: f64,
    /// Current step index.
    pub step: StepId,
    /// Time-step size, fixed for the run.
    pub dt: f64,
    /// Steps executed by this engine instance (excludes steps inherited
    /// from a restart record).
    pub elapsed_steps: u64,
}

impl SimulationState {
    pub(crate) fn start(time: f64, step: StepId, dt: f64) -> Self {
        Self {
            time,
            step,
            dt,
            elapsed_steps: 0,
        }
    }
}
