//! The simulation engine.
//!
//! [`SimulationEngine`] owns the committed per-cell quantities. Each
//! [`step`](SimulationEngine::step) runs in two phases: every flux term
//! reads the committed state and accumulates per-cell net outflow, then the
//! update is written to a staging buffer that replaces the committed state
//! only if every value is finite. Cells never observe a neighbour's
//! partially updated value, so the result does not depend on evaluation
//! order or on the `parallel` feature.

use std::sync::Arc;
use std::time::Instant;

use slick_core::{
    CellId, EdgeKind, InitialConditionError, NumericalInstabilityError, OutOfOrderSnapshotError,
    RestartRecord, StepId,
};
use slick_flux::{
    stability_bound, validate_terms, CellFields, FluxContext, FluxTerm, StabilityReport,
};
use slick_mesh::Mesh;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::cell::CellView;
use crate::config::{ConfigError, SimulationConfig};
use crate::initial::{check_all, StartCondition};
use crate::metrics::StepMetrics;
use crate::results::{ResultAccumulator, ResultSnapshot};
use crate::state::{EngineState, SimulationState};

/// Steps stop once the clock is within this fraction of `dt` of the
/// target, so accumulated rounding never adds an extra step.
const TIME_TOLERANCE: f64 = 1e-6;

/// Fraction of the stability bound above which a chosen step is reported.
const NEAR_BOUND: f64 = 0.95;

// ── EngineError ────────────────────────────────────────────────────

/// Errors returned by [`SimulationEngine`] operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid configuration, field, or pipeline.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The initial condition or restart record cannot be applied.
    #[error(transparent)]
    InitialCondition(#[from] InitialConditionError),

    /// A step produced a non-finite quantity. The engine is now failed.
    #[error(transparent)]
    NumericalInstability(#[from] NumericalInstabilityError),

    /// A snapshot was recorded out of time order.
    #[error(transparent)]
    OutOfOrderSnapshot(#[from] OutOfOrderSnapshotError),

    /// The operation is not allowed in the engine's current state.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// The state the engine was in.
        state: EngineState,
    },
}

// ── SimulationEngine ───────────────────────────────────────────────

/// Explicit finite-volume integrator for oil transport over a mesh.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use slick_core::Vec2;
/// use slick_engine::{EngineState, InitialCondition, SimulationConfig, SimulationEngine};
/// use slick_mesh::{LoadOptions, Mesh, MeshGeometry};
/// use slick_schemes::{DiffusionField, VelocityField};
///
/// let geometry = MeshGeometry {
///     vertices: vec![
///         Vec2::new(0.0, 0.0),
///         Vec2::new(1.0, 0.0),
///         Vec2::new(1.0, 1.0),
///         Vec2::new(0.0, 1.0),
///     ],
///     cells: vec![vec![0, 1, 2], vec![0, 2, 3]],
///     ..Default::default()
/// };
/// let mesh = Arc::new(Mesh::load(&geometry, &LoadOptions::default()).unwrap());
/// let config = SimulationConfig::new(
///     1.0,
///     VelocityField::still(),
///     DiffusionField::Uniform { coefficient: 0.1 },
/// );
///
/// let mut engine = SimulationEngine::new(mesh, config);
/// engine.initialize(InitialCondition::Uniform { value: 1.0 }).unwrap();
/// engine.run().unwrap();
///
/// assert_eq!(engine.state(), EngineState::Finished);
/// assert!((engine.total_mass() - 1.0).abs() < 1e-12);
/// ```
pub struct SimulationEngine {
    mesh: Arc<Mesh>,
    config: SimulationConfig,
    terms: Vec<Box<dyn FluxTerm>>,
    fields: CellFields,
    quantities: Vec<f64>,
    outflow: Vec<f64>,
    staging: Vec<f64>,
    open_sea_edges: Vec<(CellId, usize)>,
    state: EngineState,
    clock: SimulationState,
    origin: (StepId, f64),
    stability: Option<StabilityReport>,
    results: ResultAccumulator,
    last_recorded: Option<StepId>,
    last_metrics: StepMetrics,
}

impl SimulationEngine {
    /// Construct an uninitialized engine with the default flux terms
    /// (upwind advection and linear diffusion).
    pub fn new(mesh: Arc<Mesh>, config: SimulationConfig) -> Self {
        let n = mesh.cell_count();
        let open_sea_edges = mesh
            .cells()
            .iter()
            .enumerate()
            .flat_map(|(i, cell)| {
                cell.edges()
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.link == EdgeKind::OpenSea)
                    .map(move |(k, _)| (CellId(i as u32), k))
            })
            .collect();
        let clock = SimulationState::start(config.t_start, StepId(0), 0.0);
        Self {
            results: ResultAccumulator::for_mesh(&mesh),
            fields: CellFields::still(n),
            quantities: vec![0.0; n],
            outflow: vec![0.0; n],
            staging: vec![0.0; n],
            open_sea_edges,
            terms: slick_schemes::default_terms(),
            state: EngineState::Uninitialized,
            origin: (StepId(0), config.t_start),
            clock,
            stability: None,
            last_recorded: None,
            last_metrics: StepMetrics::default(),
            config,
            mesh,
        }
    }

    /// Replace the flux terms. Takes effect at initialization.
    pub fn with_terms(mut self, terms: Vec<Box<dyn FluxTerm>>) -> Self {
        self.terms = terms;
        self
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Validate the configuration, fix the time step, and load the
    /// starting quantities.
    ///
    /// Records the starting state as the first snapshot. Allowed only
    /// while uninitialized.
    pub fn initialize(&mut self, start: impl Into<StartCondition>) -> Result<(), EngineError> {
        self.require("initialize", &[EngineState::Uninitialized])?;
        let n = self.mesh.cell_count();

        // 1. Mesh-independent parameters.
        self.config.validate()?;

        // 2. Per-cell fields.
        let velocity = self
            .config
            .velocity
            .as_ref()
            .ok_or(ConfigError::MissingParameter { name: "velocity" })?
            .sample(&self.mesh);
        let diffusion = self
            .config
            .diffusion
            .as_ref()
            .ok_or(ConfigError::MissingParameter { name: "diffusion" })?
            .sample(&self.mesh);
        let fields = CellFields::new(n, velocity, diffusion).map_err(ConfigError::from)?;

        // 3. Time step against the combined stability bound.
        let bound = stability_bound(&self.terms, &self.mesh, &fields).map_err(ConfigError::from)?;
        let dt = self.config.plan_dt(&bound);
        let report =
            validate_terms(&self.terms, &self.mesh, &fields, dt).map_err(ConfigError::from)?;
        if let Some(bound) = report.bound {
            if dt > NEAR_BOUND * bound {
                warn!(dt, bound, "time step is close to the stability bound");
            }
        }

        // 4. Starting quantities.
        let (quantities, step, time) = match start.into() {
            StartCondition::Initial(ic) => {
                (ic.quantities(&self.mesh)?, StepId(0), self.config.t_start)
            }
            StartCondition::Restart {
                record,
                resume_time,
            } => {
                if record.quantities.len() != n {
                    return Err(InitialConditionError::LengthMismatch {
                        expected: n,
                        found: record.quantities.len(),
                    }
                    .into());
                }
                check_all(&record.quantities)?;
                let time = resume_time.unwrap_or(record.time);
                if !time.is_finite() {
                    return Err(ConfigError::InvalidParameter {
                        name: "resume_time",
                        reason: format!("must be finite, got {time}"),
                    }
                    .into());
                }
                if (time - record.time).abs() > 0.5 * dt {
                    warn!(
                        record_time = record.time,
                        resume_time = time,
                        "resuming away from the restart record's own time"
                    );
                }
                info!(step = %record.step, resume_time = time, "restoring from restart record");
                (record.quantities, record.step, time)
            }
        };

        // 5. Commit.
        self.fields = fields;
        self.quantities = quantities;
        self.clock = SimulationState::start(time, step, dt);
        self.origin = (step, time);
        self.state = EngineState::Ready;
        self.record_current()?;

        info!(
            cells = n,
            dt,
            time,
            step = %step,
            bound = ?report.bound,
            constraining_term = report.constraining_term().unwrap_or("none"),
            mass = self.total_mass(),
            "simulation initialized"
        );
        self.stability = Some(report);
        Ok(())
    }

    /// Initialize from a persisted record.
    ///
    /// With `resume_time` the clock resumes at that time instead of the
    /// record's own. Allowed only while uninitialized.
    pub fn restore(
        &mut self,
        record: RestartRecord,
        resume_time: Option<f64>,
    ) -> Result<(), EngineError> {
        self.initialize(StartCondition::Restart {
            record,
            resume_time,
        })
    }

    /// Advance one time step.
    ///
    /// On a non-finite result the engine enters [`EngineState::Failed`]
    /// and keeps the previous committed quantities.
    pub fn step(&mut self) -> Result<&StepMetrics, EngineError> {
        self.require("step", &[EngineState::Ready, EngineState::Running])?;
        let step_start = Instant::now();
        let next = self.clock.step.next();
        let dt = self.clock.dt;
        let mut metrics = StepMetrics::default();

        // 1. Net outflow of every cell from the committed state.
        self.outflow.fill(0.0);
        let ctx = FluxContext::new(&self.mesh, &self.fields, &self.quantities, dt);
        let mut open_sea = 0.0;
        for term in &self.terms {
            let term_start = Instant::now();
            accumulate(term.as_ref(), &ctx, &mut self.outflow);
            for &(cell, edge) in &self.open_sea_edges {
                open_sea += term.edge_flux(&ctx, cell, &self.mesh.edges_of(cell)[edge]);
            }
            metrics.term_us.push((
                term.name().to_string(),
                term_start.elapsed().as_micros() as u64,
            ));
        }

        // 2. Update into staging, rejecting non-finite values.
        let update_start = Instant::now();
        for (i, cell) in self.mesh.cells().iter().enumerate() {
            let area = cell.area();
            let value = self.quantities[i] - self.outflow[i] * dt / area;
            if !value.is_finite() {
                self.state = EngineState::Failed;
                let err = NumericalInstabilityError {
                    cell: CellId(i as u32),
                    step: next,
                    value,
                };
                error!(%err, time = self.clock.time, "step rejected; last committed state kept");
                return Err(err.into());
            }
            if value < 0.0 {
                metrics.clamped_cells += 1;
                metrics.clamped_mass -= value * area;
                self.staging[i] = 0.0;
            } else {
                self.staging[i] = value;
            }
        }

        // 3. Commit.
        std::mem::swap(&mut self.quantities, &mut self.staging);
        self.clock.step = next;
        self.clock.time = self.origin.1 + (next.0 - self.origin.0 .0) as f64 * dt;
        self.clock.elapsed_steps += 1;
        self.state = EngineState::Running;
        metrics.update_us = update_start.elapsed().as_micros() as u64;

        metrics.open_sea_outflow = open_sea * dt;
        metrics.cumulative_clamped_cells =
            self.last_metrics.cumulative_clamped_cells + u64::from(metrics.clamped_cells);
        metrics.cumulative_clamped_mass =
            self.last_metrics.cumulative_clamped_mass + metrics.clamped_mass;
        metrics.cumulative_open_sea_outflow =
            self.last_metrics.cumulative_open_sea_outflow + metrics.open_sea_outflow;
        if metrics.clamped_cells > 0 {
            debug!(
                step = %next,
                cells = metrics.clamped_cells,
                mass = metrics.clamped_mass,
                "clamped negative quantities"
            );
        }

        // 4. Record on the configured interval.
        if next.0 % self.config.record_every == 0 {
            self.record_current()?;
        }

        metrics.total_us = step_start.elapsed().as_micros() as u64;
        self.last_metrics = metrics;
        Ok(&self.last_metrics)
    }

    /// Step until the clock reaches `end_time`, record the final state,
    /// and finish.
    ///
    /// A no-op on a finished engine. Stepping stops at the first step whose
    /// time is at or past `end_time`; the last step is not shortened.
    pub fn run_to(&mut self, end_time: f64) -> Result<(), EngineError> {
        match self.state {
            EngineState::Finished => {
                debug!(end_time, "run already finished");
                return Ok(());
            }
            EngineState::Ready | EngineState::Running => {}
            state => {
                return Err(EngineError::InvalidState {
                    operation: "run",
                    state,
                })
            }
        }
        if !end_time.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "end_time",
                reason: format!("must be finite, got {end_time}"),
            }
            .into());
        }

        let run_start = Instant::now();
        let start_step = self.clock.step;
        let target = end_time - TIME_TOLERANCE * self.clock.dt;
        while self.clock.time < target {
            self.step()?;
        }
        self.record_current()?;
        self.state = EngineState::Finished;

        info!(
            steps = self.clock.step.0 - start_step.0,
            time = self.clock.time,
            mass = self.total_mass(),
            fishing_ground = self.fishing_ground_total(),
            open_sea_outflow = self.last_metrics.cumulative_open_sea_outflow,
            clamped_mass = self.last_metrics.cumulative_clamped_mass,
            elapsed_ms = run_start.elapsed().as_millis() as u64,
            "simulation finished"
        );
        Ok(())
    }

    /// [`run_to`](Self::run_to) the configured end time.
    pub fn run(&mut self) -> Result<(), EngineError> {
        let end = self
            .config
            .t_end
            .ok_or(ConfigError::MissingParameter { name: "t_end" })?;
        self.run_to(end)
    }

    // ── Observation ────────────────────────────────────────────────

    /// Lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The simulation clock.
    pub fn simulation_state(&self) -> SimulationState {
        self.clock
    }

    /// Copy of the committed state.
    pub fn snapshot(&self) -> ResultSnapshot {
        ResultSnapshot {
            time: self.clock.time,
            step: self.clock.step,
            quantities: self.quantities.clone(),
        }
    }

    /// The committed state as a record that [`restore`](Self::restore)
    /// accepts.
    pub fn restart_record(&self) -> RestartRecord {
        RestartRecord {
            step: self.clock.step,
            time: self.clock.time,
            quantities: self.quantities.clone(),
        }
    }

    /// View of one cell, or `None` if the id is out of range.
    pub fn cell(&self, id: CellId) -> Option<CellView<'_>> {
        let geometry = self.mesh.cell(id)?;
        Some(CellView {
            id,
            mesh: &self.mesh,
            geometry,
            oil: self.quantities[id.index()],
            velocity: self.fields.velocity(id),
            diffusion: self.fields.diffusion(id),
        })
    }

    /// Views of every cell in id order.
    pub fn cells(&self) -> impl Iterator<Item = CellView<'_>> + '_ {
        self.mesh.cell_ids().filter_map(move |id| self.cell(id))
    }

    /// Committed quantities, indexed by cell id.
    pub fn quantities(&self) -> &[f64] {
        &self.quantities
    }

    /// Total oil mass `Σ quantity × area`.
    pub fn total_mass(&self) -> f64 {
        self.mesh
            .cells()
            .iter()
            .zip(&self.quantities)
            .map(|(c, q)| q * c.area())
            .sum()
    }

    /// Sum of quantities over the fishing-ground cells.
    pub fn fishing_ground_total(&self) -> f64 {
        self.mesh
            .fishing_cells()
            .iter()
            .map(|c| self.quantities[c.index()])
            .sum()
    }

    /// Recorded snapshots.
    pub fn results(&self) -> &ResultAccumulator {
        &self.results
    }

    /// Take the recorded snapshots, consuming the engine.
    pub fn into_results(self) -> ResultAccumulator {
        self.results
    }

    /// Metrics of the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Stability limits computed at initialization.
    pub fn stability(&self) -> Option<&StabilityReport> {
        self.stability.as_ref()
    }

    /// The mesh.
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// The configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    // ── Internals ──────────────────────────────────────────────────

    fn require(&self, operation: &'static str, allowed: &[EngineState]) -> Result<(), EngineError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(EngineError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn record_current(&mut self) -> Result<(), EngineError> {
        if self.last_recorded == Some(self.clock.step) {
            return Ok(());
        }
        self.results.record(self.snapshot())?;
        self.last_recorded = Some(self.clock.step);
        debug!(step = %self.clock.step, time = self.clock.time, "snapshot recorded");
        Ok(())
    }
}

#[cfg(not(feature = "parallel"))]
fn accumulate(term: &dyn FluxTerm, ctx: &FluxContext<'_>, out: &mut [f64]) {
    for (i, slot) in out.iter_mut().enumerate() {
        *slot += term.net_outflow(ctx, CellId(i as u32));
    }
}

#[cfg(feature = "parallel")]
fn accumulate(term: &dyn FluxTerm, ctx: &FluxContext<'_>, out: &mut [f64]) {
    use rayon::prelude::*;
    out.par_iter_mut()
        .enumerate()
        .for_each(|(i, slot)| *slot += term.net_outflow(ctx, CellId(i as u32)));
}
