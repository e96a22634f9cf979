//! Core types and traits for the Slick oil-spill simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Slick workspace:
//! cell and step identifiers, planar vectors, boundary classification,
//! the error taxonomy, and the snapshot access trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod error;
pub mod geom;
pub mod id;
pub mod record;
pub mod traits;

pub use boundary::{BoundaryKind, EdgeKind};
pub use error::{
    InitialConditionError, MeshLoadError, NumericalInstabilityError, OutOfOrderSnapshotError,
};
pub use geom::Vec2;
pub use id::{CellId, NeighborList, StepId};
pub use record::RestartRecord;
pub use traits::SnapshotAccess;
