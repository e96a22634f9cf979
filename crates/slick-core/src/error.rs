//! Error types shared across the Slick workspace.
//!
//! Organized by the phase in which each can occur: mesh loading,
//! initial-condition construction, result recording, and stepping.
//! Configuration and pipeline errors live with the crates that validate
//! them (`slick-engine`, `slick-flux`).

use thiserror::Error;

use crate::id::{CellId, StepId};

/// Malformed geometry, surfaced before any simulation starts.
#[derive(Debug, Error)]
pub enum MeshLoadError {
    /// The geometry source could not be read.
    #[error("cannot read mesh source: {0}")]
    Io(#[from] std::io::Error),

    /// The geometry source is syntactically invalid.
    #[error("parse error at line {line}: {reason}")]
    Parse {
        /// 1-based line number, or 0 when not line-oriented.
        line: usize,
        /// Human-readable description.
        reason: String,
    },

    /// The source defines no cells.
    #[error("mesh contains no cells")]
    Empty,

    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {vertex} has a non-finite coordinate")]
    NonFiniteVertex {
        /// Offending vertex index.
        vertex: usize,
    },

    /// A cell references a vertex index that does not exist.
    #[error("cell {cell} references missing vertex {vertex}")]
    DanglingVertex {
        /// Offending cell.
        cell: usize,
        /// The out-of-range vertex index.
        vertex: u32,
    },

    /// A cell has fewer than three distinct vertices.
    #[error("cell {cell} has {vertex_count} distinct vertices, need at least 3")]
    DegenerateCell {
        /// Offending cell.
        cell: usize,
        /// Number of distinct vertices found.
        vertex_count: usize,
    },

    /// A cell's polygon encloses (numerically) zero area.
    #[error("cell {cell} has zero area ({area})")]
    ZeroArea {
        /// Offending cell.
        cell: usize,
        /// The computed area.
        area: f64,
    },

    /// An edge is shared by more than two cells.
    #[error("edge ({a}, {b}) is shared by {cell_count} cells")]
    NonManifoldEdge {
        /// First vertex of the edge.
        a: u32,
        /// Second vertex of the edge.
        b: u32,
        /// Number of cells that use the edge.
        cell_count: usize,
    },

    /// A boundary marker names an edge that is not on the domain boundary.
    #[error("boundary marker ({a}, {b}) does not match a boundary edge")]
    UnknownBoundaryEdge {
        /// First vertex of the marked edge.
        a: u32,
        /// Second vertex of the marked edge.
        b: u32,
    },

    /// A fishing-ground marker names a cell that does not exist.
    #[error("fishing-ground marker references missing cell {cell}")]
    UnknownFishingCell {
        /// The out-of-range cell index.
        cell: u32,
    },
}

/// An initial-condition rule that cannot be applied to the mesh.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InitialConditionError {
    /// A spill source references a cell that does not exist.
    #[error("spill source references cell {cell}, mesh has {cell_count} cells")]
    UnknownCell {
        /// The referenced cell.
        cell: CellId,
        /// Number of cells in the mesh.
        cell_count: usize,
    },

    /// An initial quantity is negative.
    #[error("initial quantity {value} for cell {cell} is negative")]
    NegativeQuantity {
        /// The offending cell.
        cell: CellId,
        /// The offending value.
        value: f64,
    },

    /// An initial quantity is NaN or infinite.
    #[error("initial quantity for cell {cell} is not finite")]
    NonFiniteQuantity {
        /// The offending cell.
        cell: CellId,
    },

    /// A per-cell vector does not have one entry per mesh cell.
    #[error("expected {expected} per-cell quantities, found {found}")]
    LengthMismatch {
        /// Mesh cell count.
        expected: usize,
        /// Entries supplied.
        found: usize,
    },
}

/// A snapshot offered to an accumulator out of time order.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error("snapshot at t = {offered} is not after last recorded t = {last}")]
pub struct OutOfOrderSnapshotError {
    /// Time of the most recently recorded snapshot.
    pub last: f64,
    /// Time of the rejected snapshot.
    pub offered: f64,
}

/// A non-finite oil quantity produced during a step.
///
/// Terminal: the engine enters its failed state and keeps the last
/// committed quantities for inspection.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error("non-finite quantity {value} in cell {cell} at step {step}")]
pub struct NumericalInstabilityError {
    /// First offending cell in index order.
    pub cell: CellId,
    /// The step that was being computed.
    pub step: StepId,
    /// The offending value.
    pub value: f64,
}
