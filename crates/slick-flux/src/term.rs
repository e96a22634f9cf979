//! The [`FluxTerm`] trait.

use slick_core::CellId;
use slick_mesh::{CellGeometry, EdgeGeometry, Mesh};

use crate::context::FluxContext;
use crate::fields::CellFields;

/// One transport process contributing to the oil flux across cell edges.
///
/// # Contract
///
/// - `edge_flux` returns the rate (quantity × area per unit time) at which
///   oil leaves `cell` across `edge`; negative values are inflow.
/// - For an interior edge, the flux seen from the two sides must be exact
///   negations, so that what one cell loses the other gains.
/// - Terms are stateless (`&self`) and read only through the context, so
///   cells may be evaluated in any order or in parallel.
///
/// # Examples
///
/// A term that moves nothing:
///
/// ```
/// use slick_core::CellId;
/// use slick_flux::{FluxContext, FluxTerm};
/// use slick_mesh::EdgeGeometry;
///
/// struct Frozen;
///
/// impl FluxTerm for Frozen {
///     fn name(&self) -> &str { "frozen" }
///     fn edge_flux(&self, _: &FluxContext<'_>, _: CellId, _: &EdgeGeometry) -> f64 { 0.0 }
/// }
///
/// assert_eq!(Frozen.name(), "frozen");
/// ```
pub trait FluxTerm: Send + Sync + 'static {
    /// Human-readable name for error reporting and metrics.
    fn name(&self) -> &str;

    /// Largest stable time step for this term alone.
    ///
    /// Called once at initialization. Return `None` to impose no
    /// constraint (for example when every coefficient is zero).
    fn max_dt(&self, mesh: &Mesh, fields: &CellFields) -> Option<f64> {
        let _ = (mesh, fields);
        None
    }

    /// Signed outflow rate of `cell` across one of its edges.
    fn edge_flux(&self, ctx: &FluxContext<'_>, cell: CellId, edge: &EdgeGeometry) -> f64;

    /// Net outflow rate of `cell` summed over all of its edges.
    fn net_outflow(&self, ctx: &FluxContext<'_>, cell: CellId) -> f64 {
        ctx.mesh()
            .edges_of(cell)
            .iter()
            .map(|edge| self.edge_flux(ctx, cell, edge))
            .sum()
    }
}

/// Largest stable step of an explicit operator whose outflow coefficient
/// for each cell is `rate(cell)` (per unit time, area-weighted).
///
/// Returns `None` when every rate is zero.
pub fn explicit_limit<F>(mesh: &Mesh, mut rate: F) -> Option<f64>
where
    F: FnMut(CellId, &CellGeometry) -> f64,
{
    let mut limit = f64::INFINITY;
    for (i, cell) in mesh.cells().iter().enumerate() {
        let r = rate(CellId(i as u32), cell);
        if r > 0.0 {
            limit = limit.min(cell.area() / r);
        }
    }
    limit.is_finite().then_some(limit)
}
