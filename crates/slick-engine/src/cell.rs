//! Read-only per-cell views.

use slick_core::{BoundaryKind, CellId, NeighborList, Vec2};
use slick_mesh::{CellGeometry, Mesh};

/// One cell's geometry together with its current quantity and fields.
///
/// Borrowed from the engine; reflects the last committed step.
#[derive(Clone, Copy, Debug)]
pub struct CellView<'a> {
    pub(crate) id: CellId,
    pub(crate) mesh: &'a Mesh,
    pub(crate) geometry: &'a CellGeometry,
    pub(crate) oil: f64,
    pub(crate) velocity: Vec2,
    pub(crate) diffusion: f64,
}

impl<'a> CellView<'a> {
    /// Cell identifier.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Polygon centroid.
    pub fn centroid(&self) -> Vec2 {
        self.geometry.centroid()
    }

    /// Polygon area.
    pub fn area(&self) -> f64 {
        self.geometry.area()
    }

    /// Neighbours in edge order; `None` marks a domain boundary edge.
    pub fn neighbors(&self) -> NeighborList {
        self.mesh.neighbors_of(self.id)
    }

    /// `(neighbour, shared edge length)` in edge order.
    pub fn neighbor_edges(&self) -> impl Iterator<Item = (Option<CellId>, f64)> + 'a {
        self.geometry
            .edges()
            .iter()
            .map(|e| (e.link.neighbor(), e.length))
    }

    /// Boundary classification.
    pub fn boundary_kind(&self) -> BoundaryKind {
        self.geometry.boundary_kind()
    }

    /// Current oil quantity.
    pub fn oil_quantity(&self) -> f64 {
        self.oil
    }

    /// Oil mass: quantity times area.
    pub fn oil_mass(&self) -> f64 {
        self.oil * self.geometry.area()
    }

    /// Velocity sampled at initialization.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Diffusion coefficient sampled at initialization.
    pub fn diffusion_coefficient(&self) -> f64 {
        self.diffusion
    }

    /// Full geometry record.
    pub fn geometry(&self) -> &'a CellGeometry {
        self.geometry
    }
}
