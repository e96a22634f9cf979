//! Velocity and diffusion field specifications.

use serde::{Deserialize, Serialize};
use slick_core::Vec2;
use slick_mesh::Mesh;

/// Velocity field over the bay.
///
/// ```json
/// { "kind": "linear", "matrix": [[-0.2, 1.0], [-1.0, 0.0]], "offset": [0, 0] }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VelocityField {
    /// Same velocity everywhere.
    Uniform {
        /// The velocity.
        velocity: Vec2,
    },
    /// Affine field `v(p) = M p + offset`, with `M` given row by row.
    Linear {
        /// Rows of the matrix `M`.
        matrix: [[f64; 2]; 2],
        /// Constant offset.
        #[serde(default)]
        offset: Vec2,
    },
    /// One velocity per cell, indexed by cell id.
    PerCell {
        /// The velocities.
        values: Vec<Vec2>,
    },
}

impl VelocityField {
    /// Zero velocity everywhere.
    pub fn still() -> Self {
        Self::Uniform {
            velocity: Vec2::ZERO,
        }
    }

    /// The bay circulation `v(x, y) = (y - 0.2 x, -x)`.
    pub fn bay_circulation() -> Self {
        Self::Linear {
            matrix: [[-0.2, 1.0], [-1.0, 0.0]],
            offset: Vec2::ZERO,
        }
    }

    /// Value at a point, or `None` for per-cell fields.
    pub fn at(&self, p: Vec2) -> Option<Vec2> {
        match self {
            Self::Uniform { velocity } => Some(*velocity),
            Self::Linear { matrix, offset } => Some(Vec2::new(
                matrix[0][0] * p.x + matrix[0][1] * p.y + offset.x,
                matrix[1][0] * p.x + matrix[1][1] * p.y + offset.y,
            )),
            Self::PerCell { .. } => None,
        }
    }

    /// Sample at every cell centroid.
    ///
    /// Per-cell values are returned as given; their length is checked when
    /// they are bundled into [`CellFields`](slick_flux::CellFields).
    pub fn sample(&self, mesh: &Mesh) -> Vec<Vec2> {
        match self {
            Self::PerCell { values } => values.clone(),
            _ => mesh
                .cells()
                .iter()
                .map(|c| self.at(c.centroid()).unwrap_or(Vec2::ZERO))
                .collect(),
        }
    }
}

/// Diffusion coefficient over the bay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffusionField {
    /// Same coefficient everywhere.
    Uniform {
        /// The coefficient.
        coefficient: f64,
    },
    /// One coefficient per cell, indexed by cell id.
    PerCell {
        /// The coefficients.
        values: Vec<f64>,
    },
}

impl DiffusionField {
    /// No diffusion.
    pub fn none() -> Self {
        Self::Uniform { coefficient: 0.0 }
    }

    /// Sample at every cell.
    pub fn sample(&self, mesh: &Mesh) -> Vec<f64> {
        match self {
            Self::Uniform { coefficient } => vec![*coefficient; mesh.cell_count()],
            Self::PerCell { values } => values.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slick_test_utils::fixtures;

    #[test]
    fn bay_circulation_matches_formula() {
        let v = VelocityField::bay_circulation()
            .at(Vec2::new(0.5, 0.25))
            .unwrap();
        assert!((v.x - (0.25 - 0.1)).abs() < 1e-15);
        assert_eq!(v.y, -0.5);
    }

    #[test]
    fn sample_uses_centroids() {
        let mesh = fixtures::two_cell_square();
        let field = VelocityField::Linear {
            matrix: [[1.0, 0.0], [0.0, 1.0]],
            offset: Vec2::ZERO,
        };
        let v = field.sample(&mesh);
        assert_eq!(v.len(), 2);
        assert!((v[0].x - 2.0 / 3.0).abs() < 1e-12);
        assert!((v[0].y - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn per_cell_passes_through() {
        let mesh = fixtures::two_cell_square();
        let field = DiffusionField::PerCell {
            values: vec![0.1, 0.2, 0.3],
        };
        assert_eq!(field.sample(&mesh).len(), 3);
        assert_eq!(VelocityField::PerCell { values: vec![] }.at(Vec2::ZERO), None);
    }

    #[test]
    fn parses_tagged_json() {
        let v: VelocityField = serde_json::from_str(
            r#"{"kind": "linear", "matrix": [[-0.2, 1.0], [-1.0, 0.0]]}"#,
        )
        .unwrap();
        assert_eq!(v, VelocityField::bay_circulation());

        let d: DiffusionField =
            serde_json::from_str(r#"{"kind": "uniform", "coefficient": 0.001}"#).unwrap();
        assert_eq!(d, DiffusionField::Uniform { coefficient: 0.001 });
    }
}
