//! Two-point flux linear diffusion.

use slick_core::{CellId, EdgeKind};
use slick_flux::{explicit_limit, CellFields, FluxContext, FluxTerm};
use slick_mesh::{EdgeGeometry, Mesh};

/// Diffusion driven by the quantity difference across each edge.
///
/// For an interior edge of length `L` between centroids a distance `d`
/// apart, with face coefficient `D_f = (D_self + D_neighbor) / 2`:
///
/// ```text
/// flux = D_f * L / d * (q_self - q_neighbor)
/// ```
///
/// Open-sea edges diffuse toward an oil-free ghost cell mirrored across the
/// edge. Coast edges carry nothing.
///
/// Stability: `dt <= min_i A_i / Σ_e D_f L / d` over each cell's
/// non-coast edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearDiffusion;

impl LinearDiffusion {
    fn conductance(fields: &CellFields, cell: CellId, edge: &EdgeGeometry) -> f64 {
        let d_face = match edge.link {
            EdgeKind::Coast => return 0.0,
            EdgeKind::OpenSea => fields.diffusion(cell),
            EdgeKind::Interior(nb) => 0.5 * (fields.diffusion(cell) + fields.diffusion(nb)),
        };
        d_face * edge.length / edge.distance
    }
}

impl FluxTerm for LinearDiffusion {
    fn name(&self) -> &str {
        "linear_diffusion"
    }

    fn max_dt(&self, mesh: &Mesh, fields: &CellFields) -> Option<f64> {
        explicit_limit(mesh, |id, cell| {
            cell.edges()
                .iter()
                .map(|e| Self::conductance(fields, id, e))
                .sum()
        })
    }

    fn edge_flux(&self, ctx: &FluxContext<'_>, cell: CellId, edge: &EdgeGeometry) -> f64 {
        let k = Self::conductance(ctx.fields(), cell, edge);
        match edge.link {
            EdgeKind::Coast => 0.0,
            EdgeKind::OpenSea => k * ctx.quantity(cell),
            EdgeKind::Interior(nb) => k * (ctx.quantity(cell) - ctx.quantity(nb)),
        }
    }
}
