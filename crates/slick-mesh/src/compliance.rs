//! Mesh invariant test helpers.
//!
//! These functions verify that a loaded [`Mesh`] satisfies the adjacency
//! and geometry invariants the flux schemes rely on. Reused across the
//! unit tests of this crate.

use slick_core::{CellId, Vec2};

use crate::geometry::MeshGeometry;
use crate::mesh::Mesh;

/// Unit-square grid of `nx × ny` quads, optionally split into triangles
/// along each quad's rising diagonal. Cells are numbered row-major from the
/// bottom-left corner.
pub fn grid_geometry(nx: u32, ny: u32, triangulate: bool) -> MeshGeometry {
    let v = |i: u32, j: u32| j * (nx + 1) + i;
    let mut vertices = Vec::new();
    for j in 0..=ny {
        for i in 0..=nx {
            vertices.push(Vec2::new(i as f64 / nx as f64, j as f64 / ny as f64));
        }
    }
    let mut cells = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            let (a, b, c, d) = (v(i, j), v(i + 1, j), v(i + 1, j + 1), v(i, j + 1));
            if triangulate {
                cells.push(vec![a, b, c]);
                cells.push(vec![a, c, d]);
            } else {
                cells.push(vec![a, b, c, d]);
            }
        }
    }
    MeshGeometry {
        vertices,
        cells,
        ..Default::default()
    }
}

/// Assert that `b in neighbors_of(a)` implies `a in neighbors_of(b)`.
pub fn assert_neighbors_symmetric(mesh: &Mesh) {
    for id in mesh.cell_ids() {
        for nb in mesh.neighbors_of(id).into_iter().flatten() {
            assert!(
                mesh.neighbors_of(nb).contains(&Some(id)),
                "neighbour symmetry violated: {nb} in N({id}) but {id} not in N({nb})"
            );
        }
    }
}

/// Assert one neighbour slot per polygon edge.
pub fn assert_slot_per_edge(mesh: &Mesh) {
    for (i, cell) in mesh.cells().iter().enumerate() {
        let id = CellId(i as u32);
        assert_eq!(
            mesh.neighbors_of(id).len(),
            cell.vertices().len(),
            "cell {id} slot count differs from its edge count"
        );
    }
}

/// Assert `is_boundary` agrees with the presence of an empty slot.
pub fn assert_boundary_consistent(mesh: &Mesh) {
    for id in mesh.cell_ids() {
        let has_empty = mesh.neighbors_of(id).iter().any(Option::is_none);
        assert_eq!(mesh.is_boundary(id), has_empty, "cell {id}");
    }
}

/// Assert that both sides of every interior edge see the same edge with
/// exactly opposite normals.
pub fn assert_interior_edges_antisymmetric(mesh: &Mesh) {
    for id in mesh.cell_ids() {
        for edge in mesh.edges_of(id) {
            let Some(nb) = edge.link.neighbor() else {
                continue;
            };
            let back = mesh
                .edges_of(nb)
                .iter()
                .find(|e| e.link.neighbor() == Some(id))
                .unwrap_or_else(|| panic!("cell {nb} has no edge back to {id}"));
            assert_eq!(back.normal, -edge.normal, "normals of {id}|{nb}");
            assert_eq!(back.length, edge.length, "lengths of {id}|{nb}");
            assert_eq!(back.distance, edge.distance, "distances of {id}|{nb}");
        }
    }
}

/// Assert normals point away from the centroid (convex cells only).
pub fn assert_normals_outward(mesh: &Mesh) {
    for id in mesh.cell_ids() {
        let c = mesh.centroid(id);
        for edge in mesh.edges_of(id) {
            let d = edge.normal.dot(edge.midpoint - c);
            assert!(d > 0.0, "cell {id}: normal {:?} points inward", edge.normal);
        }
    }
}

/// Assert each polygon is closed: the scaled normals sum to zero.
pub fn assert_polygons_closed(mesh: &Mesh) {
    for (i, cell) in mesh.cells().iter().enumerate() {
        let sum = cell
            .edges()
            .iter()
            .fold(Vec2::ZERO, |acc, e| acc + e.scaled_normal());
        assert!(
            sum.norm() < 1e-12 * cell.perimeter().max(1.0),
            "cell {i}: scaled normals sum to {sum:?}"
        );
    }
}

/// Run all compliance checks.
pub fn run_full_compliance(mesh: &Mesh) {
    assert_neighbors_symmetric(mesh);
    assert_slot_per_edge(mesh);
    assert_boundary_consistent(mesh);
    assert_interior_edges_antisymmetric(mesh);
    assert_normals_outward(mesh);
    assert_polygons_closed(mesh);
}
