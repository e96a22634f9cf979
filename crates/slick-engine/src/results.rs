//! Recorded snapshots and their accumulator.
//!
//! The accumulator is append-only and strictly ordered in time. Readers
//! iterate it through [`Snapshots`], which can be cloned or re-created to
//! restart iteration without copying any data.

use std::iter::FusedIterator;
use std::slice;

use serde::{Deserialize, Serialize};
use slick_core::{CellId, OutOfOrderSnapshotError, RestartRecord, SnapshotAccess, StepId};
use slick_mesh::Mesh;

// ── ResultSnapshot ─────────────────────────────────────────────────

/// Per-cell quantities at one recorded instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultSnapshot {
    /// Simulation time.
    pub time: f64,
    /// Step index.
    pub step: StepId,
    /// Oil quantity per cell, indexed by cell id.
    pub quantities: Vec<f64>,
}

impl ResultSnapshot {
    /// Convert into a record the engine can restore from.
    pub fn to_restart_record(&self) -> RestartRecord {
        RestartRecord::from_snapshot(self)
    }
}

impl SnapshotAccess for ResultSnapshot {
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

impl From<RestartRecord> for ResultSnapshot {
    fn from(r: RestartRecord) -> Self {
        Self {
            time: r.time,
            step: r.step,
            quantities: r.quantities,
        }
    }
}

// ── ResultAccumulator ──────────────────────────────────────────────

/// Time-ordered collection of snapshots from one run.
#[derive(Clone, Debug, Default)]
pub struct ResultAccumulator {
    snapshots: Vec<ResultSnapshot>,
    fishing_cells: Vec<CellId>,
}

impl ResultAccumulator {
    /// Empty accumulator summing fishing totals over `fishing_cells`.
    pub fn new(fishing_cells: Vec<CellId>) -> Self {
        Self {
            snapshots: Vec::new(),
            fishing_cells,
        }
    }

    /// Empty accumulator for the fishing ground of `mesh`.
    pub fn for_mesh(mesh: &Mesh) -> Self {
        Self::new(mesh.fishing_cells().to_vec())
    }

    /// Append a snapshot.
    ///
    /// Fails if its time is not strictly after the last recorded time.
    pub fn record(&mut self, snapshot: ResultSnapshot) -> Result<(), OutOfOrderSnapshotError> {
        if let Some(last) = self.snapshots.last() {
            // Negated comparison also rejects NaN.
            if !(snapshot.time > last.time) {
                return Err(OutOfOrderSnapshotError {
                    last: last.time,
                    offered: snapshot.time,
                });
            }
        }
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Iterate snapshots in time order.
    pub fn snapshots(&self) -> Snapshots<'_> {
        Snapshots {
            inner: self.snapshots.iter(),
        }
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot by position.
    pub fn get(&self, index: usize) -> Option<&ResultSnapshot> {
        self.snapshots.get(index)
    }

    /// Most recent snapshot.
    pub fn last(&self) -> Option<&ResultSnapshot> {
        self.snapshots.last()
    }

    /// Snapshot whose time is closest to `time`; the earlier one on ties.
    pub fn closest_to(&self, time: f64) -> Option<&ResultSnapshot> {
        self.snapshots
            .iter()
            .min_by(|a, b| (a.time - time).abs().total_cmp(&(b.time - time).abs()))
    }

    /// Cells summed by [`fishing_ground_totals`](Self::fishing_ground_totals).
    pub fn fishing_cells(&self) -> &[CellId] {
        &self.fishing_cells
    }

    /// `(time, Σ quantity over fishing-ground cells)` per snapshot.
    pub fn fishing_ground_totals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.snapshots
            .iter()
            .map(|s| (s.time, s.total_over(&self.fishing_cells)))
    }

    /// Take ownership of the snapshots.
    pub fn into_snapshots(self) -> Vec<ResultSnapshot> {
        self.snapshots
    }
}

/// Borrowing iterator over recorded snapshots.
#[derive(Clone, Debug)]
pub struct Snapshots<'a> {
    inner: slice::Iter<'a, ResultSnapshot>,
}

impl<'a> Iterator for Snapshots<'a> {
    type Item = &'a ResultSnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Snapshots<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Snapshots<'_> {}
impl FusedIterator for Snapshots<'_> {}
