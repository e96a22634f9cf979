//! Unstructured polygon meshes for Slick simulations.
//!
//! A [`Mesh`] is loaded once from a [`MeshGeometry`] (parsed from a Gmsh
//! `.msh` file or a JSON document) and is immutable thereafter. Loading
//! validates the geometry, derives cell adjacency from shared edges,
//! precomputes every per-edge quantity the flux schemes need, and
//! classifies boundary cells.
//!
//! # Layout
//!
//! Cells and edges are stored in flat arrays indexed by [`CellId`]
//! (arena style), so a `Mesh` is `Send + Sync` and can be shared across
//! any number of readers behind an `Arc`.
//!
//! [`CellId`]: slick_core::CellId

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod geometry;
pub mod gmsh;
pub mod mesh;

#[cfg(test)]
pub(crate) mod compliance;

pub use geometry::{BoundaryMarker, EdgeMarker, LoadOptions, MeshGeometry, Rect};
pub use mesh::{CellGeometry, EdgeGeometry, Mesh};
