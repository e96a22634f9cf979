//! Slick: finite-volume oil-spill transport over unstructured meshes.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Slick sub-crates. For most users, adding `slick` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use slick::prelude::*;
//!
//! // Unit square split into two triangles, coastline all around.
//! let geometry = MeshGeometry {
//!     vertices: vec![
//!         Vec2::new(0.0, 0.0),
//!         Vec2::new(1.0, 0.0),
//!         Vec2::new(1.0, 1.0),
//!         Vec2::new(0.0, 1.0),
//!     ],
//!     cells: vec![vec![0, 1, 2], vec![0, 2, 3]],
//!     ..Default::default()
//! };
//! let mesh = Arc::new(Mesh::load(&geometry, &LoadOptions::default()).unwrap());
//!
//! let config = SimulationConfig::new(
//!     0.5,
//!     VelocityField::bay_circulation(),
//!     DiffusionField::Uniform { coefficient: 0.01 },
//! );
//! let mut engine = SimulationEngine::new(mesh, config);
//! engine
//!     .initialize(InitialCondition::PerCell { values: vec![1.0, 0.0] })
//!     .unwrap();
//! engine.run().unwrap();
//!
//! assert_eq!(engine.state(), EngineState::Finished);
//! assert!(engine.quantities().iter().all(|q| *q >= 0.0));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `slick-core` | IDs, vectors, boundary kinds, errors, snapshot trait |
//! | [`mesh`] | `slick-mesh` | Mesh loading, geometry, Gmsh reader |
//! | [`flux`] | `slick-flux` | Flux term trait and pipeline validation |
//! | [`schemes`] | `slick-schemes` | Upwind advection, linear diffusion, field specs |
//! | [`engine`] | `slick-engine` | Simulation engine, configuration, results |
//! | [`record`] | `slick-record` | Solution files, restart lookup, export |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`slick-core`).
///
/// Contains [`types::CellId`], [`types::Vec2`], the boundary
/// classification, the error taxonomy, and [`types::SnapshotAccess`].
pub use slick_core as types;

/// Mesh loading and geometry (`slick-mesh`).
///
/// [`mesh::Mesh::load`] validates raw geometry; [`mesh::Mesh::from_path`]
/// reads Gmsh `.msh` or JSON files.
pub use slick_mesh as mesh;

/// Flux term trait and pipeline validation (`slick-flux`).
///
/// The [`flux::FluxTerm`] trait is the extension point for additional
/// transport processes.
pub use slick_flux as flux;

/// Reference flux schemes and field specifications (`slick-schemes`).
pub use slick_schemes as schemes;

/// The simulation engine (`slick-engine`).
pub use slick_engine as engine;

/// Solution files, restart lookup, and export (`slick-record`).
pub use slick_record as record;

/// Common imports for typical Slick usage.
///
/// ```rust
/// use slick::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use slick_core::{BoundaryKind, CellId, RestartRecord, SnapshotAccess, StepId, Vec2};

    // Errors
    pub use slick_core::{InitialConditionError, MeshLoadError, NumericalInstabilityError};

    // Mesh
    pub use slick_mesh::{LoadOptions, Mesh, MeshGeometry, Rect};

    // Flux
    pub use slick_flux::{FluxContext, FluxTerm};

    // Schemes
    pub use slick_schemes::{DiffusionField, VelocityField};

    // Engine
    pub use slick_engine::{
        ConfigError, EngineError, EngineState, InitialCondition, ResultAccumulator,
        ResultSnapshot, SimulationConfig, SimulationEngine, StartCondition, StepMetrics,
    };

    // Record
    pub use slick_record::{load_restart, RecordError, SolutionReader, SolutionWriter};
}
