//! Per-step metrics for the simulation engine.
//!
//! [`StepMetrics`] captures timing and numerical diagnostics for a single
//! step, plus running totals since initialization.

/// Timing and diagnostic metrics collected during a single step.
///
/// All durations are in microseconds. Masses are area-weighted
/// quantities (`quantity × cell area`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Per-term flux evaluation times: `(name, microseconds)`.
    pub term_us: Vec<(String, u64)>,
    /// Time spent applying the update and checking values, in microseconds.
    pub update_us: u64,
    /// Cells whose new quantity was negative and clamped to zero.
    pub clamped_cells: u32,
    /// Mass added by clamping this step.
    pub clamped_mass: f64,
    /// Mass that left the domain across open-sea edges this step.
    pub open_sea_outflow: f64,
    /// Cumulative clamped cells since initialization.
    pub cumulative_clamped_cells: u64,
    /// Cumulative clamped mass since initialization.
    pub cumulative_clamped_mass: f64,
    /// Cumulative open-sea outflow since initialization.
    pub cumulative_open_sea_outflow: f64,
}
