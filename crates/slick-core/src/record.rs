//! The persisted restart contract.

use crate::id::{CellId, StepId};
use crate::traits::SnapshotAccess;

/// Per-cell quantities at one instant, sufficient to resume a run.
///
/// `quantities[i]` is the oil quantity of `CellId(i)`. Restoring a record
/// and taking a snapshot without stepping reproduces it exactly.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RestartRecord {
    /// Step index at which the record was taken.
    pub step: StepId,
    /// Simulation time at which the record was taken.
    pub time: f64,
    /// Oil quantity per cell, indexed by cell id.
    pub quantities: Vec<f64>,
}

impl RestartRecord {
    /// Capture any snapshot-like value as a restart record.
    pub fn from_snapshot<S: SnapshotAccess + ?Sized>(snapshot: &S) -> Self {
        Self {
            step: snapshot.step(),
            time: snapshot.time(),
            quantities: snapshot.quantities().to_vec(),
        }
    }
}

impl SnapshotAccess for RestartRecord {
    fn time(&self) -> f64 {
        self.time
    }

    fn step(&self) -> StepId {
        self.step
    }

    fn quantities(&self) -> &[f64] {
        &self.quantities
    }
}
