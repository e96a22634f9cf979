//! First-order upwind advection.

use slick_core::{CellId, EdgeKind};
use slick_flux::{CellFields, FluxContext, FluxTerm};
use slick_mesh::{EdgeGeometry, Mesh};

/// Donor-cell advection across cell edges.
///
/// For an interior edge with outward normal `n` and length `L`, the face
/// velocity is the mean of the two cell velocities and the normal flow is
/// `f = (v_face · n) L`. The donor is the cell the flow leaves:
///
/// ```text
/// flux = q_self     * f   if f > 0
///        q_neighbor * f   otherwise
/// ```
///
/// Open-sea edges use the cell's own velocity and pass outflow only.
/// Coast edges carry nothing.
///
/// Stability: `dt <= min_cell_size / max |v|`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UpwindAdvection;

impl FluxTerm for UpwindAdvection {
    fn name(&self) -> &str {
        "upwind_advection"
    }

    fn max_dt(&self, mesh: &Mesh, fields: &CellFields) -> Option<f64> {
        let speed = fields.max_speed();
        (speed > 0.0).then(|| mesh.min_cell_size() / speed)
    }

    fn edge_flux(&self, ctx: &FluxContext<'_>, cell: CellId, edge: &EdgeGeometry) -> f64 {
        match edge.link {
            EdgeKind::Coast => 0.0,
            EdgeKind::OpenSea => {
                let f = ctx.velocity(cell).dot(edge.normal) * edge.length;
                if f > 0.0 {
                    ctx.quantity(cell) * f
                } else {
                    0.0
                }
            }
            EdgeKind::Interior(neighbor) => {
                let face = (ctx.velocity(cell) + ctx.velocity(neighbor)) * 0.5;
                let f = face.dot(edge.normal) * edge.length;
                if f > 0.0 {
                    ctx.quantity(cell) * f
                } else {
                    ctx.quantity(neighbor) * f
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use slick_core::Vec2;
    use slick_test_utils::fixtures;

    fn diagonal_flow(mesh: &Mesh) -> CellFields {
        let v = Vec2::new(-1.0, 1.0) * std::f64::consts::FRAC_1_SQRT_2;
        CellFields::new(mesh.cell_count(), vec![v; 2], vec![0.0; 2]).unwrap()
    }

    #[test]
    fn donor_cell_loses_what_acceptor_gains() {
        let mesh = fixtures::two_cell_square();
        let fields = diagonal_flow(&mesh);
        let q = [100.0, 0.0];
        let ctx = FluxContext::new(&mesh, &fields, &q, 0.1);

        let out_a = UpwindAdvection.net_outflow(&ctx, CellId(0));
        let out_b = UpwindAdvection.net_outflow(&ctx, CellId(1));
        assert!((out_a - 100.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
        assert_eq!(out_b, -out_a);
    }

    #[test]
    fn reverse_flow_draws_from_neighbor() {
        let mesh = fixtures::two_cell_square();
        let fields = diagonal_flow(&mesh);
        // Flow runs A -> B, but only B holds oil: nothing moves.
        let q = [0.0, 50.0];
        let ctx = FluxContext::new(&mesh, &fields, &q, 0.1);
        assert_eq!(UpwindAdvection.net_outflow(&ctx, CellId(0)), 0.0);
        assert_eq!(UpwindAdvection.net_outflow(&ctx, CellId(1)), 0.0);
    }

    #[test]
    fn open_sea_passes_outflow_only() {
        let mesh = fixtures::open_tri_grid(1, 1);
        let east = CellFields::new(2, vec![Vec2::new(1.0, 0.0); 2], vec![0.0; 2]).unwrap();
        let q = [1.0, 1.0];
        let ctx = FluxContext::new(&mesh, &east, &q, 0.1);

        // Cell 0 owns the east edge (length 1): one unit leaves, none enters
        // through the west edge of cell 1.
        let total: f64 = mesh
            .cell_ids()
            .map(|c| UpwindAdvection.net_outflow(&ctx, c))
            .sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn coast_blocks_flow() {
        let mesh = fixtures::tri_grid(1, 1);
        let east = CellFields::new(2, vec![Vec2::new(1.0, 0.0); 2], vec![0.0; 2]).unwrap();
        let q = [1.0, 1.0];
        let ctx = FluxContext::new(&mesh, &east, &q, 0.1);
        let total: f64 = mesh
            .cell_ids()
            .map(|c| UpwindAdvection.net_outflow(&ctx, c))
            .sum();
        assert!(total.abs() < 1e-12);
    }

    #[test]
    fn max_dt_is_cell_size_over_speed() {
        let mesh = fixtures::quad_grid(4, 4);
        let fields =
            CellFields::new(16, vec![Vec2::new(0.0, 2.0); 16], vec![0.0; 16]).unwrap();
        let dt = UpwindAdvection.max_dt(&mesh, &fields).unwrap();
        assert!((dt - 0.125 / 2.0).abs() < 1e-12);
        assert_eq!(UpwindAdvection.max_dt(&mesh, &CellFields::still(16)), None);
    }

    proptest! {
        #[test]
        fn closed_domain_conserves(q in prop::collection::vec(0.0f64..10.0, 18)) {
            let mesh = fixtures::tri_grid(3, 3);
            let v = mesh
                .cells()
                .iter()
                .map(|c| Vec2::new(c.centroid().y - 0.2 * c.centroid().x, -c.centroid().x))
                .collect();
            let fields = CellFields::new(18, v, vec![0.0; 18]).unwrap();
            let ctx = FluxContext::new(&mesh, &fields, &q, 0.01);
            let total: f64 = mesh.cell_ids().map(|c| UpwindAdvection.net_outflow(&ctx, c)).sum();
            prop_assert!(total.abs() < 1e-9);
        }
    }
}
