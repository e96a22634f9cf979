//! Strongly-typed identifiers and the [`NeighborList`] alias.

use smallvec::SmallVec;
use std::fmt;

/// Identifies a cell within a mesh.
///
/// `CellId(n)` is the n-th cell in load order. Identifiers are stable for
/// the lifetime of a mesh and index every per-cell array in the engine.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct CellId(pub u32);

impl CellId {
    /// The identifier as a `usize` array index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CellId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing step counter.
///
/// Incremented each time the simulation advances one time increment.
/// A run resumed from a restart record continues the recorded count.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct StepId(pub u64);

impl StepId {
    /// The step that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Ordered neighbour slots of a cell, one per polygon edge.
///
/// `None` marks an edge on the domain boundary. Inline capacity covers
/// triangles and quadrilaterals without heap allocation.
pub type NeighborList = SmallVec<[Option<CellId>; 4]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_id_index_and_display() {
        let id = CellId::from(7);
        assert_eq!(id.index(), 7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn step_id_next_increments() {
        assert_eq!(StepId(41).next(), StepId(42));
        assert_eq!(StepId::default(), StepId(0));
    }
}
