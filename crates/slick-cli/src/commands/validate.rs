//! Scenario validation.
//!
//! Loads the scenario and its mesh and initializes an engine without
//! stepping it, reporting every problem found along the way.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use slick_core::EdgeKind;
use slick_engine::SimulationEngine;
use tracing::{error, info, warn};

use crate::scenario::Scenario;

/// Arguments of `slick validate`.
#[derive(Args)]
pub struct ValidateArgs {
    /// Scenario file.
    #[arg(short, long)]
    pub scenario: PathBuf,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && !(strict && !self.warnings.is_empty())
    }
}

/// Execute `slick validate`.
pub fn execute(args: ValidateArgs) -> Result<()> {
    let result = check(&args.scenario);
    for msg in &result.warnings {
        warn!("{msg}");
    }
    for msg in &result.errors {
        error!("{msg}");
    }
    if !result.is_ok(args.strict) {
        bail!(
            "{} failed validation: {} errors, {} warnings",
            args.scenario.display(),
            result.errors.len(),
            result.warnings.len()
        );
    }
    info!(scenario = %args.scenario.display(), warnings = result.warnings.len(), "scenario is valid");
    Ok(())
}

fn check(path: &std::path::Path) -> ValidationResult {
    let mut result = ValidationResult::default();

    // 1. Scenario document.
    let scenario = match Scenario::load(path) {
        Ok(s) => s,
        Err(e) => {
            result.add_error(format!("{e:#}"));
            return result;
        }
    };

    // 2. Mesh and its classification.
    let mesh = match scenario.load_mesh() {
        Ok(m) => m,
        Err(e) => {
            result.add_error(format!("{e:#}"));
            return result;
        }
    };
    if mesh.fishing_cells().is_empty() {
        result.add_warning("the fishing ground contains no cells");
    }
    let open_sea = mesh
        .cells()
        .iter()
        .flat_map(|c| c.edges())
        .any(|e| e.link == EdgeKind::OpenSea);
    if !open_sea {
        result.add_warning("the mesh has no open-sea boundary; no oil can leave the domain");
    }

    // 3. Restart source.
    if let Some(p) = &scenario.file.output.restart_file {
        let p = scenario.resolve(p);
        if !p.is_file() {
            result.add_error(format!("restart file {} does not exist", p.display()));
        }
    }

    // 4. Parameters, initial condition, and stability.
    let mut engine = SimulationEngine::new(Arc::new(mesh), scenario.config());
    match engine.initialize(scenario.file.initial.clone()) {
        Ok(()) => {
            let dt = engine.simulation_state().dt;
            let bound = engine.stability().and_then(|s| s.bound);
            info!(dt, bound = ?bound, "time step planned");
        }
        Err(e) => result.add_error(e.to_string()),
    }

    result
}
