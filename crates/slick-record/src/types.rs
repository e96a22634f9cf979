//! Data types stored in solution files.

use slick_core::{RestartRecord, SnapshotAccess, StepId};

/// Run parameters stored at the start of a solution file.
///
/// # Examples
///
/// ```
/// use slick_record::SolutionHeader;
///
/// let header = SolutionHeader {
///     config_hash: 0xDEAD_BEEF,
///     cell_count: 128,
///     t_origin: 0.0,
///     dt: 0.01,
///     version: "0.1.0".into(),
/// };
///
/// assert_eq!(header.cell_count, 128);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolutionHeader {
    /// Hash of the mesh, cell count, and time step (see
    /// [`config_hash`](crate::config_hash)).
    pub config_hash: u64,
    /// Number of cells in every frame.
    pub cell_count: u64,
    /// Start time of the run that produced the file.
    pub t_origin: f64,
    /// Time-step size of that run.
    pub dt: f64,
    /// Version of the crate that wrote the file.
    pub version: String,
}

impl SolutionHeader {
    /// Header stamped with this crate's version.
    pub fn new(config_hash: u64, cell_count: u64, t_origin: f64, dt: f64) -> Self {
        Self {
            config_hash,
            cell_count,
            t_origin,
            dt,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// One recorded instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Step index.
    pub step: u64,
    /// Simulation time.
    pub time: f64,
    /// Oil quantity per cell, indexed by cell id.
    pub quantities: Vec<f64>,
    /// FNV-1a hash of `quantities` (see [`snapshot_hash`](crate::snapshot_hash)).
    pub snapshot_hash: u64,
}

impl Frame {
    /// Convert into a record the engine can restore from.
    pub fn into_restart_record(self) -> RestartRecord {
        RestartRecord {
            step: StepId(self.step),
            time: self.time,
            quantities: self.quantities,
        }
    }
}

impl SnapshotAccess for Frame {
    fn time(&self) -> f64 {
        self.time
    }

    fn step(&self) -> StepId {
        StepId(self.step)
    }

    fn quantities(&self) -> &[f64] {
        &self.quantities
    }
}
