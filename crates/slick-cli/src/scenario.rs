//! Scenario files.
//!
//! A scenario bundles everything a run needs: the mesh to load, how to
//! classify it, the simulation parameters, the initial slick, and output
//! settings.
//!
//! ```json
//! {
//!   "mesh": "bay.msh",
//!   "load": { "fishing_ground": { "x_range": [0.0, 0.45], "y_range": [0.0, 0.2] } },
//!   "simulation": {
//!     "t_end": 0.5,
//!     "num_steps": 500,
//!     "velocity": { "kind": "linear", "matrix": [[-0.2, 1.0], [-1.0, 0.0]] },
//!     "diffusion": { "kind": "uniform", "coefficient": 0.0 }
//!   },
//!   "initial": { "kind": "gaussian" },
//!   "output": { "write_frequency": 10, "log_name": "bay" }
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slick_engine::{InitialCondition, SimulationConfig};
use slick_mesh::{LoadOptions, Mesh};

fn default_log_name() -> String {
    "log".to_string()
}

/// Output settings of a scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Record every this many steps. Overrides `simulation.record_every`.
    pub write_frequency: Option<u64>,
    /// Stem of the fishing-ground summary log.
    pub log_name: String,
    /// Solution file to restart from.
    pub restart_file: Option<PathBuf>,
    /// Time to restart at. The closest stored frame is used.
    pub resume_time: Option<f64>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            write_frequency: None,
            log_name: default_log_name(),
            restart_file: None,
            resume_time: None,
        }
    }
}

/// The on-disk scenario document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    /// Mesh file, relative to the scenario file.
    pub mesh: PathBuf,
    /// Fishing ground and default boundary type.
    #[serde(default)]
    pub load: LoadOptions,
    /// Time window and physical fields.
    pub simulation: SimulationConfig,
    /// Starting oil distribution. Default: the Gaussian bay slick.
    #[serde(default = "InitialCondition::bay_slick")]
    pub initial: InitialCondition,
    /// Output settings.
    #[serde(default)]
    pub output: OutputOptions,
}

/// A parsed scenario together with where it came from.
#[derive(Clone, Debug)]
pub struct Scenario {
    /// Parsed contents.
    pub file: ScenarioFile,
    /// Directory relative paths resolve against.
    pub dir: PathBuf,
    /// File stem, used to name the results directory.
    pub name: String,
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open scenario {}", path.display()))?;
        let file: ScenarioFile = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse scenario {}", path.display()))?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("scenario")
            .to_string();
        Ok(Self { file, dir, name })
    }

    /// Resolve a path from the scenario against the scenario's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }

    /// Load and classify the mesh.
    pub fn load_mesh(&self) -> Result<Mesh> {
        let path = self.resolve(&self.file.mesh);
        Mesh::from_path(&path, &self.file.load)
            .with_context(|| format!("failed to load mesh {}", path.display()))
    }

    /// Simulation parameters with the output settings applied.
    pub fn config(&self) -> SimulationConfig {
        let mut config = self.file.simulation.clone();
        if let Some(n) = self.file.output.write_frequency {
            config.record_every = n;
        }
        config
    }

    /// Directory the run's outputs land in.
    pub fn results_dir(&self, output: &Path) -> PathBuf {
        output.join(format!("{}_results", self.name))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use slick_schemes::{DiffusionField, VelocityField};
    use slick_test_utils::fixtures;

    /// Fresh empty directory under the system temp dir.
    pub(crate) fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("slick-cli-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write a small grid mesh and a bay scenario into `dir`.
    pub(crate) fn write_scenario(dir: &Path) -> PathBuf {
        let geometry = fixtures::grid_geometry(6, 6, true);
        std::fs::write(
            dir.join("grid.json"),
            serde_json::to_vec(&geometry).unwrap(),
        )
        .unwrap();

        let scenario = ScenarioFile {
            mesh: PathBuf::from("grid.json"),
            load: LoadOptions {
                fishing_ground: Some(slick_mesh::Rect {
                    x_range: [0.0, 0.45],
                    y_range: [0.0, 0.2],
                }),
                ..LoadOptions::default()
            },
            simulation: SimulationConfig::new(
                0.2,
                VelocityField::bay_circulation(),
                DiffusionField::Uniform { coefficient: 0.001 },
            )
            .with_num_steps(20),
            initial: InitialCondition::bay_slick(),
            output: OutputOptions {
                write_frequency: Some(5),
                ..OutputOptions::default()
            },
        };
        let path = dir.join("bay.json");
        std::fs::write(&path, serde_json::to_vec_pretty(&scenario).unwrap()).unwrap();
        path
    }

    #[test]
    fn minimal_scenario_uses_defaults() {
        let json = r#"{
            "mesh": "bay.msh",
            "simulation": {
                "t_end": 1.0,
                "velocity": { "kind": "uniform", "velocity": [0.0, 0.0] },
                "diffusion": { "kind": "uniform", "coefficient": 0.0 }
            }
        }"#;
        let file: ScenarioFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.initial, InitialCondition::bay_slick());
        assert_eq!(file.output, OutputOptions::default());
        assert_eq!(file.output.log_name, "log");
        assert_eq!(file.load, LoadOptions::default());
    }

    #[test]
    fn load_resolves_mesh_next_to_scenario() {
        let dir = scratch_dir("scenario-load");
        let path = write_scenario(&dir);
        let scenario = Scenario::load(&path).unwrap();
        assert_eq!(scenario.name, "bay");
        assert_eq!(scenario.resolve(Path::new("grid.json")), dir.join("grid.json"));
        let mesh = scenario.load_mesh().unwrap();
        assert_eq!(mesh.cell_count(), 72);
        assert!(!mesh.fishing_cells().is_empty());
        assert_eq!(scenario.results_dir(Path::new("out")), Path::new("out/bay_results"));
    }

    #[test]
    fn write_frequency_overrides_record_interval() {
        let dir = scratch_dir("scenario-frequency");
        let scenario = Scenario::load(&write_scenario(&dir)).unwrap();
        assert_eq!(scenario.file.simulation.record_every, 1);
        assert_eq!(scenario.config().record_every, 5);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Scenario::load(Path::new("/nonexistent/slick/scenario.json")).unwrap_err();
        assert!(err.to_string().contains("failed to open scenario"));
    }
}
