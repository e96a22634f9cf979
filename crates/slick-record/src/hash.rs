//! Hashing utilities for snapshot and configuration comparison.
//!
//! Uses FNV-1a for fast, deterministic hashing. These hashes are not
//! cryptographically secure; they detect corruption and mismatched runs.

use slick_core::{EdgeKind, SnapshotAccess};
use slick_engine::SimulationEngine;
use slick_mesh::Mesh;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_u32(mut hash: u64, v: u32) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Hash every cell quantity of a snapshot by bit pattern.
///
/// The cell count is folded in first, so a prefix of a snapshot never
/// shares its hash. Returns a value derived from `FNV_OFFSET` for an
/// empty snapshot.
pub fn snapshot_hash(snapshot: &dyn SnapshotAccess) -> u64 {
    let q = snapshot.quantities();
    let mut hash = fnv1a_u64(FNV_OFFSET, q.len() as u64);
    for &v in q {
        hash = fnv1a_u64(hash, v.to_bits());
    }
    hash
}

/// Hash a mesh's geometry and boundary links.
///
/// Covers vertex coordinates (by bit pattern), cell vertex lists, and the
/// kind of every edge link, so meshes that differ only in boundary
/// markers hash differently.
pub fn mesh_hash(mesh: &Mesh) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_u64(hash, mesh.vertex_count() as u64);
    for v in mesh.vertices() {
        hash = fnv1a_u64(hash, v.x.to_bits());
        hash = fnv1a_u64(hash, v.y.to_bits());
    }
    hash = fnv1a_u64(hash, mesh.cell_count() as u64);
    for cell in mesh.cells() {
        hash = fnv1a_u32(hash, cell.vertices().len() as u32);
        for &v in cell.vertices() {
            hash = fnv1a_u32(hash, v);
        }
        for edge in cell.edges() {
            let tag = match edge.link {
                EdgeKind::Interior(_) => 0,
                EdgeKind::OpenSea => 1,
                EdgeKind::Coast => 2,
            };
            hash = fnv1a_byte(hash, tag);
        }
    }
    hash
}

/// Hash the sampled per-cell velocity and diffusion of an engine.
///
/// Hashes the values the scheme actually sees, so two field specifications
/// that sample identically on the mesh hash the same.
pub fn fields_hash(engine: &SimulationEngine) -> u64 {
    let mut hash = FNV_OFFSET;
    for cell in engine.cells() {
        let v = cell.velocity();
        hash = fnv1a_u64(hash, v.x.to_bits());
        hash = fnv1a_u64(hash, v.y.to_bits());
        hash = fnv1a_u64(hash, cell.diffusion_coefficient().to_bits());
    }
    hash
}

/// Hash the parameters a restart must agree on.
///
/// Hashes the mesh hash, cell count, time step (as bits), and the
/// [`fields_hash`]. Restarting with a different mesh, step size, velocity,
/// or diffusion changes the hash.
pub fn config_hash(mesh_hash: u64, cell_count: u64, dt_bits: u64, fields_hash: u64) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_u64(hash, mesh_hash);
    hash = fnv1a_u64(hash, cell_count);
    hash = fnv1a_u64(hash, dt_bits);
    hash = fnv1a_u64(hash, fields_hash);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use slick_engine::{InitialCondition, SimulationConfig};
    use slick_mesh::{EdgeMarker, LoadOptions};
    use slick_schemes::{DiffusionField, VelocityField};
    use slick_test_utils::{fixtures, MockSnapshot};

    #[test]
    fn same_data_same_hash() {
        let a = MockSnapshot::new(1, 0.1, vec![1.0, 2.0, 3.0]);
        let b = MockSnapshot::new(9, 0.9, vec![1.0, 2.0, 3.0]);
        assert_eq!(snapshot_hash(&a), snapshot_hash(&b));
    }

    #[test]
    fn different_data_different_hash() {
        let a = MockSnapshot::new(1, 0.1, vec![1.0, 2.0, 3.0]);
        let mut b = a.clone();
        b.set(2, 3.0000000000000004);
        assert_ne!(snapshot_hash(&a), snapshot_hash(&b));
    }

    #[test]
    fn prefix_hashes_differ() {
        let a = MockSnapshot::new(0, 0.0, vec![0.0, 0.0]);
        let b = MockSnapshot::new(0, 0.0, vec![0.0]);
        assert_ne!(snapshot_hash(&a), snapshot_hash(&b));
    }

    #[test]
    fn mesh_hash_sees_boundary_kind() {
        let geometry = fixtures::grid_geometry(3, 3, true);
        let coast = Mesh::load(&geometry, &LoadOptions::default()).unwrap();
        let open = Mesh::load(
            &geometry,
            &LoadOptions {
                default_boundary: EdgeMarker::OpenSea,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(mesh_hash(&coast), mesh_hash(&fixtures::tri_grid(3, 3)));
        assert_ne!(mesh_hash(&coast), mesh_hash(&open));
    }

    #[test]
    fn config_hash_tracks_dt() {
        let m = mesh_hash(&fixtures::quad_grid(2, 2));
        let h1 = config_hash(m, 4, 0.01f64.to_bits(), 7);
        let h2 = config_hash(m, 4, 0.01f64.to_bits(), 7);
        let h3 = config_hash(m, 4, 0.02f64.to_bits(), 7);
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn fields_hash_tracks_velocity_and_diffusion() {
        let mesh = Arc::new(fixtures::tri_grid(3, 3));
        let engine = |velocity, diffusion| {
            let config = SimulationConfig::new(0.1, velocity, diffusion).with_num_steps(10);
            let mut engine = SimulationEngine::new(Arc::clone(&mesh), config);
            engine.initialize(InitialCondition::bay_slick()).unwrap();
            engine
        };
        let base = fields_hash(&engine(
            VelocityField::bay_circulation(),
            DiffusionField::Uniform { coefficient: 0.01 },
        ));
        let same = fields_hash(&engine(
            VelocityField::bay_circulation(),
            DiffusionField::Uniform { coefficient: 0.01 },
        ));
        let other_velocity = fields_hash(&engine(
            VelocityField::still(),
            DiffusionField::Uniform { coefficient: 0.01 },
        ));
        let other_diffusion = fields_hash(&engine(
            VelocityField::bay_circulation(),
            DiffusionField::Uniform { coefficient: 0.02 },
        ));
        assert_eq!(base, same);
        assert_ne!(base, other_velocity);
        assert_ne!(base, other_diffusion);
    }
}
