//! Read access to recorded simulation state.

use crate::id::{CellId, StepId};

/// Read-only view of per-cell quantities at one instant.
///
/// Implemented by the engine's result snapshots and by restart records,
/// so exporters, comparators, and summary collaborators accept either.
pub trait SnapshotAccess {
    /// Simulation time of the snapshot.
    fn time(&self) -> f64;

    /// Step index of the snapshot.
    fn step(&self) -> StepId;

    /// Oil quantity per cell, indexed by cell id.
    fn quantities(&self) -> &[f64];

    /// Quantity in a single cell, or `None` if the id is out of range.
    fn quantity(&self, cell: CellId) -> Option<f64> {
        self.quantities().get(cell.index()).copied()
    }

    /// Number of cells covered.
    fn cell_count(&self) -> usize {
        self.quantities().len()
    }

    /// Sum of quantities over a subset of cells. Out-of-range ids are skipped.
    fn total_over(&self, cells: &[CellId]) -> f64 {
        let q = self.quantities();
        cells.iter().filter_map(|c| q.get(c.index())).sum()
    }
}
