//! Per-cell physical parameters.

use slick_core::{CellId, Vec2};

use crate::pipeline::PipelineError;

/// Velocity and diffusion coefficient of every cell, sampled once at
/// initialization and fixed for the run.
#[derive(Clone, Debug, PartialEq)]
pub struct CellFields {
    velocity: Vec<Vec2>,
    diffusion: Vec<f64>,
}

impl CellFields {
    /// Build from per-cell vectors, checking lengths and values.
    ///
    /// Velocities must be finite; diffusion coefficients must be finite
    /// and non-negative.
    pub fn new(
        cell_count: usize,
        velocity: Vec<Vec2>,
        diffusion: Vec<f64>,
    ) -> Result<Self, PipelineError> {
        if velocity.len() != cell_count {
            return Err(PipelineError::FieldLength {
                field: "velocity",
                expected: cell_count,
                found: velocity.len(),
            });
        }
        if diffusion.len() != cell_count {
            return Err(PipelineError::FieldLength {
                field: "diffusion",
                expected: cell_count,
                found: diffusion.len(),
            });
        }
        if let Some(i) = velocity.iter().position(|v| !v.is_finite()) {
            return Err(PipelineError::InvalidFieldValue {
                field: "velocity",
                cell: CellId(i as u32),
                value: velocity[i].norm(),
            });
        }
        if let Some(i) = diffusion.iter().position(|d| !(d.is_finite() && *d >= 0.0)) {
            return Err(PipelineError::InvalidFieldValue {
                field: "diffusion",
                cell: CellId(i as u32),
                value: diffusion[i],
            });
        }
        Ok(Self {
            velocity,
            diffusion,
        })
    }

    /// Zero velocity and zero diffusion everywhere.
    pub fn still(cell_count: usize) -> Self {
        Self {
            velocity: vec![Vec2::ZERO; cell_count],
            diffusion: vec![0.0; cell_count],
        }
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.velocity.len()
    }

    /// Whether the fields cover zero cells.
    pub fn is_empty(&self) -> bool {
        self.velocity.is_empty()
    }

    /// Velocity of one cell.
    pub fn velocity(&self, cell: CellId) -> Vec2 {
        self.velocity[cell.index()]
    }

    /// Diffusion coefficient of one cell.
    pub fn diffusion(&self, cell: CellId) -> f64 {
        self.diffusion[cell.index()]
    }

    /// All velocities, indexed by cell id.
    pub fn velocities(&self) -> &[Vec2] {
        &self.velocity
    }

    /// All diffusion coefficients, indexed by cell id.
    pub fn diffusions(&self) -> &[f64] {
        &self.diffusion
    }

    /// Largest velocity magnitude over all cells.
    pub fn max_speed(&self) -> f64 {
        self.velocity.iter().map(|v| v.norm()).fold(0.0, f64::max)
    }
}
