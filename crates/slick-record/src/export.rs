//! Result export for external plotting tools.
//!
//! [`write_json`] stores the whole solution history together with the cell
//! geometry a plotter needs; [`write_fishing_csv`] stores the fishing-ground
//! series as `time,oil` rows.

use std::io::Write;

use serde::{Deserialize, Serialize};
use slick_core::{BoundaryKind, CellId, Vec2};
use slick_engine::{ResultAccumulator, ResultSnapshot};
use slick_mesh::Mesh;

use crate::error::RecordError;

/// Per-cell geometry written alongside the history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Polygon vertex coordinates in traversal order.
    pub polygon: Vec<Vec2>,
    /// Centroid.
    pub centroid: Vec2,
    /// Area.
    pub area: f64,
    /// Boundary classification.
    pub boundary: BoundaryKind,
}

/// A complete solution history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolutionDocument {
    /// Cell geometry, indexed by cell id.
    pub cells: Vec<CellRecord>,
    /// Fishing-ground cells.
    pub fishing_cells: Vec<CellId>,
    /// Recorded snapshots in time order.
    pub snapshots: Vec<ResultSnapshot>,
}

impl SolutionDocument {
    /// Gather the geometry of `mesh` and every snapshot of `results`.
    pub fn new(mesh: &Mesh, results: &ResultAccumulator) -> Self {
        let vertices = mesh.vertices();
        let cells = mesh
            .cells()
            .iter()
            .map(|c| CellRecord {
                polygon: c.vertices().iter().map(|&v| vertices[v as usize]).collect(),
                centroid: c.centroid(),
                area: c.area(),
                boundary: c.boundary_kind(),
            })
            .collect();
        Self {
            cells,
            fishing_cells: mesh.fishing_cells().to_vec(),
            snapshots: results.snapshots().cloned().collect(),
        }
    }
}

/// Write the solution history of a run as pretty-printed JSON.
pub fn write_json<W: Write>(
    writer: W,
    mesh: &Mesh,
    results: &ResultAccumulator,
) -> Result<(), RecordError> {
    let doc = SolutionDocument::new(mesh, results);
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

/// Write `time,fishing_ground_oil` rows, one per recorded snapshot.
pub fn write_fishing_csv<W: Write>(
    mut writer: W,
    results: &ResultAccumulator,
) -> Result<(), RecordError> {
    writeln!(writer, "time,fishing_ground_oil")?;
    for (time, total) in results.fishing_ground_totals() {
        writeln!(writer, "{time:.15e},{total:.15e}")?;
    }
    writer.flush()?;
    Ok(())
}
