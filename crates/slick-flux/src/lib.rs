//! Flux terms and step context for Slick simulations.
//!
//! A [`FluxTerm`] computes the signed rate at which oil crosses each cell
//! edge, reading only the previous step's quantities through a
//! [`FluxContext`]. The engine sums every term's contribution before
//! writing any new value, so results never depend on cell visit order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod fields;
pub mod pipeline;
pub mod term;

pub use context::FluxContext;
pub use fields::CellFields;
pub use pipeline::{stability_bound, validate_terms, PipelineError, StabilityReport};
pub use term::{explicit_limit, FluxTerm};
