//! Reference flux schemes for Slick simulations.
//!
//! Provides the two transport processes of the default pipeline and the
//! field specifications that parameterize them:
//!
//! 1. [`UpwindAdvection`]: first-order donor-cell advection with the face
//!    velocity taken as the mean of the two adjacent cell velocities.
//! 2. [`LinearDiffusion`]: two-point flux diffusion proportional to the
//!    quantity difference across each edge.
//!
//! [`VelocityField`] and [`DiffusionField`] describe the physical fields
//! in scenario files and are sampled at cell centroids.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod advection;
pub mod diffusion;
pub mod fields;

use slick_flux::FluxTerm;

pub use advection::UpwindAdvection;
pub use diffusion::LinearDiffusion;
pub use fields::{DiffusionField, VelocityField};

/// The default pipeline: advection followed by diffusion.
pub fn default_terms() -> Vec<Box<dyn FluxTerm>> {
    vec![Box::new(UpwindAdvection), Box::new(LinearDiffusion)]
}
