//! Run a scenario.
//!
//! Loads the mesh, starts from the scenario's initial condition or from a
//! restart file, runs to `t_end`, and writes the requested outputs into
//! `<output>/<scenario>_results/`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use slick_engine::SimulationEngine;
use slick_record::{
    config_hash, export, fields_hash, load_restart, mesh_hash, summary, RecordError,
    SolutionHeader, SolutionReader, SolutionWriter,
};
use tracing::info;

use crate::scenario::Scenario;

/// File name of the stored solution inside the results directory.
pub const SOLUTION_FILE: &str = "solution.slk";

/// Arguments of `slick run`.
#[derive(Args)]
pub struct RunArgs {
    /// Scenario file.
    #[arg(short, long)]
    pub scenario: PathBuf,

    /// Write every recorded snapshot to a solution file.
    #[arg(long)]
    pub store_solution: bool,

    /// Solution file to restart from. Overrides the scenario's `restart_file`.
    #[arg(long)]
    pub restart: Option<PathBuf>,

    /// Time to restart at. Overrides the scenario's `resume_time`.
    #[arg(long)]
    pub start_time: Option<f64>,

    /// Export the solution history as JSON and the fishing-ground series as CSV.
    #[arg(long)]
    pub export_json: bool,

    /// Log the fishing-ground summary and write it to `<log_name>.txt`.
    #[arg(long)]
    pub log_summary: bool,

    /// Parent directory of the results directory.
    #[arg(short, long, default_value = "results")]
    pub output: PathBuf,
}

/// Execute `slick run`.
pub fn execute(args: RunArgs) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let engine = simulate(&scenario, &args)?;
    write_outputs(&scenario, &args, &engine)?;
    Ok(())
}

/// Header describing a run's solution file.
pub fn solution_header(engine: &SimulationEngine) -> SolutionHeader {
    let mesh = engine.mesh();
    let cell_count = mesh.cell_count() as u64;
    let dt = engine.simulation_state().dt;
    SolutionHeader::new(
        config_hash(
            mesh_hash(mesh),
            cell_count,
            dt.to_bits(),
            fields_hash(engine),
        ),
        cell_count,
        engine.config().t_start,
        dt,
    )
}

/// Build, initialize, and run the engine for `scenario`.
pub fn simulate(scenario: &Scenario, args: &RunArgs) -> Result<SimulationEngine> {
    let mesh = Arc::new(scenario.load_mesh()?);
    info!(
        cells = mesh.cell_count(),
        fishing_cells = mesh.fishing_cells().len(),
        "mesh loaded"
    );

    let mut engine = SimulationEngine::new(mesh, scenario.config());

    let restart = args
        .restart
        .clone()
        .or_else(|| scenario.file.output.restart_file.as_deref().map(|p| scenario.resolve(p)));
    match restart {
        Some(path) => {
            let resume_time = args.start_time.or(scenario.file.output.resume_time);
            let reader = SolutionReader::open_path(&path)
                .with_context(|| format!("failed to open restart file {}", path.display()))?;
            let recorded = reader.header().config_hash;
            let record = load_restart(reader, resume_time)?;
            engine.restore(record, None)?;
            let current = solution_header(&engine).config_hash;
            if recorded != current {
                return Err(RecordError::ConfigMismatch { recorded, current }).with_context(|| {
                    format!("restart file {} was written by another setup", path.display())
                });
            }
        }
        None => engine.initialize(scenario.file.initial.clone())?,
    }

    let started = Instant::now();
    engine.run()?;
    let elapsed = started.elapsed();

    let state = engine.simulation_state();
    info!(
        steps = state.elapsed_steps,
        time = state.time,
        snapshots = engine.results().len(),
        mass = engine.total_mass(),
        fishing_ground = engine.fishing_ground_total(),
        seconds = elapsed.as_secs_f64(),
        "run complete"
    );
    Ok(engine)
}

/// Write the outputs `args` asks for.
pub fn write_outputs(scenario: &Scenario, args: &RunArgs, engine: &SimulationEngine) -> Result<()> {
    if !(args.store_solution || args.export_json || args.log_summary) {
        return Ok(());
    }
    let dir = scenario.results_dir(&args.output);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let results = engine.results();

    if args.store_solution {
        let path = dir.join(SOLUTION_FILE);
        let mut writer = SolutionWriter::create(&path, &solution_header(engine))?;
        writer.write_results(results)?;
        writer.flush()?;
        info!(path = %path.display(), frames = writer.frames_written(), "solution stored");
    }

    if args.export_json {
        let path = dir.join("solution.json");
        export::write_json(BufWriter::new(create(&path)?), engine.mesh(), results)?;
        let csv = dir.join("fishing_ground.csv");
        export::write_fishing_csv(BufWriter::new(create(&csv)?), results)?;
        info!(json = %path.display(), csv = %csv.display(), "results exported");
    }

    if args.log_summary {
        summary::log_fishing_summary(results);
        let path = dir.join(format!("{}.txt", scenario.file.output.log_name));
        summary::write_fishing_summary(BufWriter::new(create(&path)?), results)?;
    }
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}
