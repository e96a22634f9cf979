//! Slick command-line interface.
//!
//! Runs oil-spill scenarios described by a JSON scenario file, validates
//! scenarios, and reports mesh statistics.

mod commands;
mod scenario;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Oil-spill transport on unstructured meshes.
#[derive(Parser)]
#[command(name = "slick")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Oil-spill finite-volume simulator", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario.
    Run(commands::run::RunArgs),
    /// Check a scenario without running it.
    Validate(commands::validate::ValidateArgs),
    /// Print mesh statistics.
    Info(commands::info::InfoArgs),
}

fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_level(&cli.log_level).as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Info(args) => commands::info::execute(args),
    }
}
