//! Simulation configuration, validation, and error types.
//!
//! [`SimulationConfig`] carries the time window and the physical fields of
//! a run. [`validate()`](SimulationConfig::validate) checks everything that
//! does not need the mesh; mesh-dependent checks (per-cell field lengths,
//! the stability bound) run when the engine is initialized.

use serde::{Deserialize, Serialize};
use slick_flux::{PipelineError, StabilityReport};
use slick_schemes::{DiffusionField, VelocityField};
use thiserror::Error;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a [`SimulationConfig`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A required parameter was not supplied.
    #[error("missing required parameter '{name}'")]
    MissingParameter {
        /// Parameter name as it appears in the configuration file.
        name: &'static str,
    },

    /// A parameter is present but out of range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the configuration file.
        name: &'static str,
        /// Human-readable description.
        reason: String,
    },

    /// Flux pipeline validation failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

// ── SimulationConfig ───────────────────────────────────────────────

fn default_cfl() -> f64 {
    0.9
}

fn default_record_every() -> u64 {
    1
}

/// Time window and physical parameters of a run.
///
/// ```json
/// {
///   "t_end": 0.5,
///   "num_steps": 500,
///   "velocity": { "kind": "linear", "matrix": [[-0.2, 1.0], [-1.0, 0.0]] },
///   "diffusion": { "kind": "uniform", "coefficient": 0.0 }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Start time of a fresh run. Default: 0.
    #[serde(default)]
    pub t_start: f64,
    /// End time of the run. Required.
    #[serde(default)]
    pub t_end: Option<f64>,
    /// Fixed number of steps over `[t_start, t_end]`. When `None`, the step
    /// size is `cfl` times the stability bound.
    #[serde(default)]
    pub num_steps: Option<u64>,
    /// Fraction of the stability bound used when `num_steps` is `None`.
    /// Must lie in `(0, 1]`. Default: 0.9.
    #[serde(default = "default_cfl")]
    pub cfl: f64,
    /// Record a snapshot every this many steps. Default: 1.
    #[serde(default = "default_record_every")]
    pub record_every: u64,
    /// Velocity field. Required.
    #[serde(default)]
    pub velocity: Option<VelocityField>,
    /// Diffusion coefficient field. Required.
    #[serde(default)]
    pub diffusion: Option<DiffusionField>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            t_start: 0.0,
            t_end: None,
            num_steps: None,
            cfl: default_cfl(),
            record_every: default_record_every(),
            velocity: None,
            diffusion: None,
        }
    }
}

impl SimulationConfig {
    /// A complete configuration over `[0, t_end]` with the given fields.
    pub fn new(t_end: f64, velocity: VelocityField, diffusion: DiffusionField) -> Self {
        Self {
            t_end: Some(t_end),
            velocity: Some(velocity),
            diffusion: Some(diffusion),
            ..Self::default()
        }
    }

    /// Use a fixed number of steps.
    pub fn with_num_steps(mut self, num_steps: u64) -> Self {
        self.num_steps = Some(num_steps);
        self
    }

    /// Record every `n` steps.
    pub fn with_record_every(mut self, n: u64) -> Self {
        self.record_every = n;
        self
    }

    /// Check the mesh-independent parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Required parameters.
        let t_end = self.t_end.ok_or(ConfigError::MissingParameter { name: "t_end" })?;
        if self.velocity.is_none() {
            return Err(ConfigError::MissingParameter { name: "velocity" });
        }
        if self.diffusion.is_none() {
            return Err(ConfigError::MissingParameter { name: "diffusion" });
        }

        // 2. Time window.
        if !self.t_start.is_finite() {
            return Err(invalid("t_start", format!("must be finite, got {}", self.t_start)));
        }
        if !t_end.is_finite() || t_end <= self.t_start {
            return Err(invalid(
                "t_end",
                format!("must be finite and after t_start = {}, got {t_end}", self.t_start),
            ));
        }

        // 3. Step count.
        if self.num_steps == Some(0) {
            return Err(invalid("num_steps", "must be at least 1".into()));
        }

        // 4. CFL fraction.
        if !(self.cfl > 0.0 && self.cfl <= 1.0) {
            return Err(invalid("cfl", format!("must lie in (0, 1], got {}", self.cfl)));
        }

        // 5. Recording interval.
        if self.record_every == 0 {
            return Err(invalid("record_every", "must be at least 1".into()));
        }

        Ok(())
    }

    /// Length of the time window, or 0 when `t_end` is missing.
    pub fn duration(&self) -> f64 {
        self.t_end.map_or(0.0, |end| end - self.t_start)
    }

    /// Step size for a validated configuration.
    ///
    /// With `num_steps` the window is split evenly; the pipeline check then
    /// rejects a step above the stability bound. Otherwise the step is
    /// `cfl × bound`, capped at the whole window, and a pipeline with no
    /// bound takes the whole window in one step.
    pub fn plan_dt(&self, stability: &StabilityReport) -> f64 {
        let duration = self.duration();
        match (self.num_steps, stability.bound) {
            (Some(n), _) => duration / n as f64,
            (None, Some(bound)) => (self.cfl * bound).min(duration),
            (None, None) => duration,
        }
    }
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidParameter { name, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SimulationConfig {
        SimulationConfig::new(1.0, VelocityField::still(), DiffusionField::none())
    }

    fn report(bound: Option<f64>) -> StabilityReport {
        StabilityReport {
            limits: bound.map(|b| ("t".to_string(), b)).into_iter().collect(),
            bound,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn missing_t_end_fails() {
        let cfg = SimulationConfig {
            t_end: None,
            ..valid()
        };
        match cfg.validate() {
            Err(ConfigError::MissingParameter { name: "t_end" }) => {}
            other => panic!("expected MissingParameter(t_end), got {other:?}"),
        }
    }

    #[test]
    fn missing_velocity_fails() {
        let cfg = SimulationConfig {
            velocity: None,
            ..valid()
        };
        match cfg.validate() {
            Err(ConfigError::MissingParameter { name: "velocity" }) => {}
            other => panic!("expected MissingParameter(velocity), got {other:?}"),
        }
    }

    #[test]
    fn empty_window_fails() {
        let cfg = SimulationConfig {
            t_start: 1.0,
            ..valid()
        };
        match cfg.validate() {
            Err(ConfigError::InvalidParameter { name: "t_end", .. }) => {}
            other => panic!("expected InvalidParameter(t_end), got {other:?}"),
        }
    }

    #[test]
    fn zero_steps_fails() {
        let cfg = valid().with_num_steps(0);
        match cfg.validate() {
            Err(ConfigError::InvalidParameter {
                name: "num_steps", ..
            }) => {}
            other => panic!("expected InvalidParameter(num_steps), got {other:?}"),
        }
    }

    #[test]
    fn cfl_out_of_range_fails() {
        for cfl in [0.0, -0.5, 1.5, f64::NAN] {
            let cfg = SimulationConfig { cfl, ..valid() };
            assert!(
                matches!(
                    cfg.validate(),
                    Err(ConfigError::InvalidParameter { name: "cfl", .. })
                ),
                "cfl = {cfl} accepted"
            );
        }
    }

    #[test]
    fn zero_record_interval_fails() {
        let cfg = valid().with_record_every(0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidParameter {
                name: "record_every",
                ..
            })
        ));
    }

    #[test]
    fn pipeline_error_converts() {
        let e: ConfigError = PipelineError::EmptyPipeline.into();
        match e {
            ConfigError::Pipeline(PipelineError::EmptyPipeline) => {}
            other => panic!("expected Pipeline(EmptyPipeline), got {other:?}"),
        }
    }

    #[test]
    fn plan_dt_splits_window_evenly() {
        let cfg = valid().with_num_steps(4);
        assert_eq!(cfg.plan_dt(&report(Some(0.01))), 0.25);
    }

    #[test]
    fn plan_dt_uses_cfl_fraction() {
        let cfg = valid();
        let dt = cfg.plan_dt(&report(Some(0.1)));
        assert!((dt - 0.09).abs() < 1e-15);
    }

    #[test]
    fn plan_dt_without_bound_takes_whole_window() {
        assert_eq!(valid().plan_dt(&report(None)), 1.0);
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "t_end": 2.0,
            "velocity": { "kind": "uniform", "velocity": [1.0, 0.0] },
            "diffusion": { "kind": "uniform", "coefficient": 0.1 }
        }"#;
        let cfg: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.t_start, 0.0);
        assert_eq!(cfg.t_end, Some(2.0));
        assert_eq!(cfg.cfl, 0.9);
        assert_eq!(cfg.record_every, 1);
        assert!(cfg.validate().is_ok());
    }
}
