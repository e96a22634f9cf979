//! Benchmark profiles for the Slick oil-spill simulator.
//!
//! - [`bay_geometry`]: triangulated unit square, open sea along `x = 1`
//! - [`reference_profile`]: 100x100 grid (20K triangles) with the bay
//!   circulation and light diffusion
//! - [`stress_profile`]: 224x224 grid (~100K triangles), same physics

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use slick_core::MeshLoadError;
use slick_engine::{EngineError, InitialCondition, SimulationConfig, SimulationEngine};
use slick_mesh::{BoundaryMarker, EdgeMarker, LoadOptions, Mesh, MeshGeometry, Rect};
use slick_schemes::{DiffusionField, VelocityField};
use slick_test_utils::fixtures;

/// End time far beyond anything a benchmark reaches, so `step()` never
/// finishes the run.
const OPEN_ENDED: f64 = 1.0e6;

/// Triangulated `n × n` unit-square grid whose `x = 1` side is open sea.
/// The other sides fall back to the load default (coast).
pub fn bay_geometry(n: u32) -> MeshGeometry {
    let mut geometry = fixtures::grid_geometry(n, n, true);
    let v = |j: u32| j * (n + 1) + n;
    geometry.boundary_edges = (0..n)
        .map(|j| BoundaryMarker {
            vertices: [v(j), v(j + 1)],
            kind: EdgeMarker::OpenSea,
        })
        .collect();
    geometry
}

/// Load options with the fishing ground in the lower-left corner.
pub fn bay_options() -> LoadOptions {
    LoadOptions {
        fishing_ground: Some(Rect {
            x_range: [0.0, 0.45],
            y_range: [0.0, 0.2],
        }),
        default_boundary: EdgeMarker::Coast,
    }
}

/// Load the `n × n` bay mesh.
pub fn bay_mesh(n: u32) -> Result<Mesh, MeshLoadError> {
    Mesh::load(&bay_geometry(n), &bay_options())
}

fn bay_config() -> SimulationConfig {
    SimulationConfig::new(
        OPEN_ENDED,
        VelocityField::bay_circulation(),
        DiffusionField::Uniform { coefficient: 1.0e-4 },
    )
    .with_record_every(u64::MAX)
}

/// Initialize an engine on `mesh` with the Gaussian bay slick.
pub fn ready_engine(mesh: Mesh) -> Result<SimulationEngine, EngineError> {
    let mut engine = SimulationEngine::new(Arc::new(mesh), bay_config());
    engine.initialize(InitialCondition::bay_slick())?;
    Ok(engine)
}

/// Initialized engine on the 100x100 bay mesh.
pub fn reference_profile() -> SimulationEngine {
    let mesh = bay_mesh(100).unwrap();
    ready_engine(mesh).unwrap()
}

/// Initialized engine on the 224x224 bay mesh.
pub fn stress_profile() -> SimulationEngine {
    let mesh = bay_mesh(224).unwrap();
    ready_engine(mesh).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slick_core::{BoundaryKind, CellId};

    #[test]
    fn open_sea_runs_along_the_right_side() {
        let mesh = bay_mesh(4).unwrap();
        // Row-major triangles: the first lower triangle of the last column
        // touches x = 1.
        assert_eq!(mesh.boundary_kind(CellId(6)), BoundaryKind::OpenSea);
        assert!(!mesh.fishing_cells().is_empty());
    }

    #[test]
    fn reference_profile_steps() {
        let mut engine = ready_engine(bay_mesh(10).unwrap()).unwrap();
        engine.step().unwrap();
        assert_eq!(engine.results().len(), 1);
    }
}
