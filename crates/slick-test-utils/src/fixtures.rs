//! Reusable mesh fixtures.
//!
//! All fixtures are deterministic. Geometry builders return a
//! [`MeshGeometry`] so tests can add markers before loading; the mesh
//! constructors load with coast boundaries unless stated otherwise.

use slick_core::Vec2;
use slick_mesh::{EdgeMarker, LoadOptions, Mesh, MeshGeometry};

/// Unit square split along its rising diagonal into two equal triangles.
///
/// Cell 0 lies below the diagonal, cell 1 above it. The only interior
/// edge is the diagonal; its outward normal from cell 0 is `(-1, 1) / √2`.
pub fn two_cell_square_geometry() -> MeshGeometry {
    MeshGeometry {
        vertices: vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ],
        cells: vec![vec![0, 1, 2], vec![0, 2, 3]],
        ..Default::default()
    }
}

/// [`two_cell_square_geometry`] loaded with coast boundaries.
pub fn two_cell_square() -> Mesh {
    load(&two_cell_square_geometry(), EdgeMarker::Coast)
}

/// Unit-square grid of `nx × ny` quads, optionally split into triangles
/// along each quad's rising diagonal. Cells are numbered row-major from the
/// bottom-left corner.
pub fn grid_geometry(nx: u32, ny: u32, triangulate: bool) -> MeshGeometry {
    let v = |i: u32, j: u32| j * (nx + 1) + i;
    let mut vertices = Vec::with_capacity(((nx + 1) * (ny + 1)) as usize);
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

/// Quad grid with coast boundaries.
pub fn quad_grid(nx: u32, ny: u32) -> Mesh {
    load(&grid_geometry(nx, ny, false), EdgeMarker::Coast)
}

/// Triangulated grid with coast boundaries.
pub fn tri_grid(nx: u32, ny: u32) -> Mesh {
    load(&grid_geometry(nx, ny, true), EdgeMarker::Coast)
}

/// Triangulated grid whose whole boundary is open sea.
pub fn open_tri_grid(nx: u32, ny: u32) -> Mesh {
    load(&grid_geometry(nx, ny, true), EdgeMarker::OpenSea)
}

/// Triangulated grid with interior vertices displaced by up to
/// `jitter` cell widths along each axis.
///
/// Displacements come from a fixed integer hash of the vertex index, so
/// the same arguments always produce the same mesh. Keep `jitter` below
/// 0.3 to preserve positive cell areas.
pub fn perturbed_tri_grid(nx: u32, ny: u32, jitter: f64) -> Mesh {
    let mut g = grid_geometry(nx, ny, true);
    let (hx, hy) = (1.0 / nx as f64, 1.0 / ny as f64);
    for j in 1..ny {
        for i in 1..nx {
            let k = j * (nx + 1) + i;
            let (ox, oy) = (unit_hash(k, 1), unit_hash(k, 2));
            let p = &mut g.vertices[k as usize];
            p.x += jitter * hx * ox;
            p.y += jitter * hy * oy;
        }
    }
    load(&g, EdgeMarker::Coast)
}

/// Deterministic value in `[-1, 1)` derived from `k` and `salt`.
fn unit_hash(k: u32, salt: u32) -> f64 {
    let mut h = k.wrapping_mul(0x9E37_79B9) ^ salt.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7FEB_352D);
    h ^= h >> 15;
    (h as f64 / u32::MAX as f64) * 2.0 - 1.0
}

fn load(geometry: &MeshGeometry, default_boundary: EdgeMarker) -> Mesh {
    let options = LoadOptions {
        default_boundary,
        ..Default::default()
    };
    Mesh::load(geometry, &options).expect("fixture geometry must load")
}

/// Gaussian bump `peak * exp(-|c - center|² / width)` sampled at each
/// cell centroid.
pub fn gaussian(mesh: &Mesh, center: Vec2, peak: f64, width: f64) -> Vec<f64> {
    mesh.cells()
        .iter()
        .map(|c| {
            let d = c.centroid() - center;
            peak * (-d.dot(d) / width).exp()
        })
        .collect()
}
