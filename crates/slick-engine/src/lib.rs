//! Finite-volume time-stepping engine for Slick oil-spill simulations.
//!
//! [`SimulationEngine`] owns the per-cell oil quantities and advances them
//! through the flux pipeline one step at a time, recording snapshots into
//! a [`ResultAccumulator`]. Each step reads only the previous state and
//! commits all new values at once; a step that produces a non-finite value
//! commits nothing and leaves the engine in [`EngineState::Failed`].
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──initialize/restore──▶ Ready ──step──▶ Running ──run_to──▶ Finished
//!                                                          │
//!                                                          └──non-finite──▶ Failed
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod config;
pub mod engine;
pub mod initial;
pub mod metrics;
pub mod results;
pub mod state;

pub use cell::CellView;
pub use config::{ConfigError, SimulationConfig};
pub use engine::{EngineError, SimulationEngine};
pub use initial::{InitialCondition, SpillSource, StartCondition};
pub use metrics::StepMetrics;
pub use results::{ResultAccumulator, ResultSnapshot, Snapshots};
pub use state::{EngineState, SimulationState};
