//! Mesh statistics.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use slick_core::{BoundaryKind, EdgeKind};
use slick_mesh::{EdgeMarker, LoadOptions, Mesh, Rect};
use tracing::info;

/// Arguments of `slick info`.
#[derive(Args)]
pub struct InfoArgs {
    /// Mesh file (`.msh` or JSON geometry).
    #[arg(short, long)]
    pub mesh: PathBuf,

    /// Fishing-ground x range, as `MIN,MAX`.
    #[arg(long, value_delimiter = ',', requires = "fishing_y")]
    pub fishing_x: Option<Vec<f64>>,

    /// Fishing-ground y range, as `MIN,MAX`.
    #[arg(long, value_delimiter = ',', requires = "fishing_x")]
    pub fishing_y: Option<Vec<f64>>,

    /// Treat unmarked boundary edges as open sea instead of coast.
    #[arg(long)]
    pub open_boundary: bool,
}

/// Counts gathered from a loaded mesh.
#[derive(Debug, Default, PartialEq)]
struct MeshStats {
    cells: usize,
    vertices: usize,
    total_area: f64,
    min_cell_size: f64,
    interior_edges: usize,
    coast_edges: usize,
    open_sea_edges: usize,
    kinds: [usize; 4],
}

impl MeshStats {
    fn of(mesh: &Mesh) -> Self {
        let mut stats = Self {
            cells: mesh.cell_count(),
            vertices: mesh.vertex_count(),
            total_area: mesh.total_area(),
            min_cell_size: mesh.min_cell_size(),
            ..Self::default()
        };
        for cell in mesh.cells() {
            stats.kinds[kind_slot(cell.boundary_kind())] += 1;
            for edge in cell.edges() {
                match edge.link {
                    EdgeKind::Interior(_) => stats.interior_edges += 1,
                    EdgeKind::Coast => stats.coast_edges += 1,
                    EdgeKind::OpenSea => stats.open_sea_edges += 1,
                }
            }
        }
        // Each interior edge is seen from both sides.
        stats.interior_edges /= 2;
        stats
    }
}

const KINDS: [BoundaryKind; 4] = [
    BoundaryKind::None,
    BoundaryKind::OpenSea,
    BoundaryKind::Coast,
    BoundaryKind::FishingGround,
];

fn kind_slot(kind: BoundaryKind) -> usize {
    match kind {
        BoundaryKind::None => 0,
        BoundaryKind::OpenSea => 1,
        BoundaryKind::Coast => 2,
        BoundaryKind::FishingGround => 3,
    }
}

fn range(name: &str, values: &[f64]) -> Result<[f64; 2]> {
    match values {
        [min, max] if min <= max => Ok([*min, *max]),
        _ => bail!("--{name} takes MIN,MAX with MIN <= MAX, got {values:?}"),
    }
}

fn load_options(args: &InfoArgs) -> Result<LoadOptions> {
    let fishing_ground = match (&args.fishing_x, &args.fishing_y) {
        (Some(x), Some(y)) => Some(Rect {
            x_range: range("fishing-x", x)?,
            y_range: range("fishing-y", y)?,
        }),
        _ => None,
    };
    Ok(LoadOptions {
        fishing_ground,
        default_boundary: if args.open_boundary {
            EdgeMarker::OpenSea
        } else {
            EdgeMarker::Coast
        },
    })
}

/// Execute `slick info`.
pub fn execute(args: InfoArgs) -> Result<()> {
    let mesh = Mesh::from_path(&args.mesh, &load_options(&args)?)
        .with_context(|| format!("failed to load mesh {}", args.mesh.display()))?;
    info!(mesh = %args.mesh.display(), "mesh loaded");

    let stats = MeshStats::of(&mesh);
    println!("=== Mesh ===");
    println!("file:           {}", args.mesh.display());
    println!("cells:          {}", stats.cells);
    println!("vertices:       {}", stats.vertices);
    println!("total area:     {:.6}", stats.total_area);
    println!("min cell size:  {:.6}", stats.min_cell_size);
    println!();
    println!("=== Edges ===");
    println!("interior:       {}", stats.interior_edges);
    println!("coast:          {}", stats.coast_edges);
    println!("open sea:       {}", stats.open_sea_edges);
    println!();
    println!("=== Cells by kind ===");
    for kind in KINDS {
        println!("{:<16}{}", format!("{kind}:"), stats.kinds[kind_slot(kind)]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slick_test_utils::fixtures;

    #[test]
    fn stats_of_closed_quad_grid() {
        let stats = MeshStats::of(&fixtures::quad_grid(3, 3));
        assert_eq!(stats.cells, 9);
        assert_eq!(stats.vertices, 16);
        assert!((stats.total_area - 1.0).abs() < 1e-12);
        assert_eq!(stats.interior_edges, 12);
        assert_eq!(stats.coast_edges, 12);
        assert_eq!(stats.open_sea_edges, 0);
        // Eight cells touch the coast, the centre one does not.
        assert_eq!(stats.kinds, [1, 0, 8, 0]);
    }

    #[test]
    fn options_from_flags() {
        let args = InfoArgs {
            mesh: PathBuf::from("bay.msh"),
            fishing_x: Some(vec![0.0, 0.45]),
            fishing_y: Some(vec![0.0, 0.2]),
            open_boundary: true,
        };
        let options = load_options(&args).unwrap();
        assert_eq!(options.default_boundary, EdgeMarker::OpenSea);
        assert_eq!(
            options.fishing_ground,
            Some(Rect {
                x_range: [0.0, 0.45],
                y_range: [0.0, 0.2],
            })
        );
    }

    #[test]
    fn reversed_range_is_rejected() {
        let args = InfoArgs {
            mesh: PathBuf::from("bay.msh"),
            fishing_x: Some(vec![0.5, 0.1]),
            fishing_y: Some(vec![0.0, 0.2]),
            open_boundary: false,
        };
        assert!(load_options(&args).is_err());
    }
}
