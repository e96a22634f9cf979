//! Initial conditions and restart sources.

use serde::{Deserialize, Serialize};
use slick_core::{CellId, InitialConditionError, RestartRecord, Vec2};
use slick_mesh::Mesh;

/// A point release of oil into one cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpillSource {
    /// Receiving cell.
    pub cell: CellId,
    /// Quantity added to the cell.
    pub quantity: f64,
}

fn default_spill_center() -> Vec2 {
    Vec2::new(0.35, 0.45)
}

fn default_peak() -> f64 {
    1.0
}

fn default_width() -> f64 {
    0.01
}

/// Rule producing the oil quantity of every cell at the start of a run.
///
/// ```json
/// { "kind": "gaussian", "center": [0.35, 0.45], "peak": 1.0, "width": 0.01 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialCondition {
    /// Same quantity in every cell.
    Uniform {
        /// The quantity.
        value: f64,
    },
    /// Clean water plus point releases. Sources in the same cell add up.
    Spill {
        /// The releases.
        sources: Vec<SpillSource>,
    },
    /// `peak · exp(-|c - center|² / width)` evaluated at each centroid `c`.
    Gaussian {
        /// Centre of the slick.
        #[serde(default = "default_spill_center")]
        center: Vec2,
        /// Quantity at the centre.
        #[serde(default = "default_peak")]
        peak: f64,
        /// Spread, in squared length units.
        #[serde(default = "default_width")]
        width: f64,
    },
    /// One quantity per cell, indexed by cell id.
    PerCell {
        /// The quantities.
        values: Vec<f64>,
    },
}

impl InitialCondition {
    /// The Gaussian slick centred at `(0.35, 0.45)` with unit peak.
    pub fn bay_slick() -> Self {
        Self::Gaussian {
            center: default_spill_center(),
            peak: default_peak(),
            width: default_width(),
        }
    }

    /// Per-cell quantities on `mesh`.
    ///
    /// Every value must be finite and non-negative.
    pub fn quantities(&self, mesh: &Mesh) -> Result<Vec<f64>, InitialConditionError> {
        let n = mesh.cell_count();
        let values = match self {
            Self::Uniform { value } => vec![*value; n],
            Self::Spill { sources } => {
                let mut values = vec![0.0; n];
                for source in sources {
                    let slot = values.get_mut(source.cell.index()).ok_or(
                        InitialConditionError::UnknownCell {
                            cell: source.cell,
                            cell_count: n,
                        },
                    )?;
                    check_value(source.cell, source.quantity)?;
                    *slot += source.quantity;
                }
                values
            }
            Self::Gaussian {
                center,
                peak,
                width,
            } => mesh
                .cells()
                .iter()
                .map(|cell| {
                    let d = cell.centroid() - *center;
                    peak * (-d.dot(d) / width).exp()
                })
                .collect(),
            Self::PerCell { values } => {
                if values.len() != n {
                    return Err(InitialConditionError::LengthMismatch {
                        expected: n,
                        found: values.len(),
                    });
                }
                values.clone()
            }
        };
        check_all(&values)?;
        Ok(values)
    }
}

/// Where a run's quantities come from.
#[derive(Clone, Debug, PartialEq)]
pub enum StartCondition {
    /// Evaluate an initial condition at `t_start`, step 0.
    Initial(InitialCondition),
    /// Continue from a persisted record.
    Restart {
        /// The record to restore.
        record: RestartRecord,
        /// Clock value to resume at. `None` resumes at the record's time.
        resume_time: Option<f64>,
    },
}

impl From<InitialCondition> for StartCondition {
    fn from(ic: InitialCondition) -> Self {
        Self::Initial(ic)
    }
}

fn check_value(cell: CellId, value: f64) -> Result<(), InitialConditionError> {
    if !value.is_finite() {
        return Err(InitialConditionError::NonFiniteQuantity { cell });
    }
    if value < 0.0 {
        return Err(InitialConditionError::NegativeQuantity { cell, value });
    }
    Ok(())
}

pub(crate) fn check_all(values: &[f64]) -> Result<(), InitialConditionError> {
    values
        .iter()
        .enumerate()
        .try_for_each(|(i, &v)| check_value(CellId(i as u32), v))
}
