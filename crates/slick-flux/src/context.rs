//! Read-only view of the previous step handed to flux terms.

use slick_core::{CellId, Vec2};
use slick_mesh::Mesh;

use crate::fields::CellFields;

/// Everything a [`FluxTerm`](crate::FluxTerm) may read during a step.
///
/// `previous` holds the quantities committed by the last step. No value
/// written during the current step is visible through this context.
#[derive(Clone, Copy)]
pub struct FluxContext<'a> {
    mesh: &'a Mesh,
    fields: &'a CellFields,
    previous: &'a [f64],
    dt: f64,
}

impl<'a> FluxContext<'a> {
    /// Bundle the step inputs.
    pub fn new(mesh: &'a Mesh, fields: &'a CellFields, previous: &'a [f64], dt: f64) -> Self {
        Self {
            mesh,
            fields,
            previous,
            dt,
        }
    }

    /// The mesh.
    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }

    /// Per-cell physical parameters.
    pub fn fields(&self) -> &'a CellFields {
        self.fields
    }

    /// Quantities at the start of the step.
    pub fn previous(&self) -> &'a [f64] {
        self.previous
    }

    /// Quantity of one cell at the start of the step.
    pub fn quantity(&self, cell: CellId) -> f64 {
        self.previous[cell.index()]
    }

    /// Velocity of one cell.
    pub fn velocity(&self, cell: CellId) -> Vec2 {
        self.fields.velocity(cell)
    }

    /// Diffusion coefficient of one cell.
    pub fn diffusion(&self, cell: CellId) -> f64 {
        self.fields.diffusion(cell)
    }

    /// Time-step size.
    pub fn dt(&self) -> f64 {
        self.dt
    }
}
