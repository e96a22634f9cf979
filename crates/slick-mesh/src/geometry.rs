//! Raw geometry sources and load options.

use serde::{Deserialize, Serialize};
use slick_core::Vec2;

/// Boundary type assigned to a domain-boundary edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeMarker {
    /// Coastline: zero flux.
    #[default]
    Coast,
    /// Open sea: outflow leaves the domain.
    OpenSea,
}

/// Marks one boundary edge, identified by its two vertex indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryMarker {
    /// The edge's endpoints, in either order.
    pub vertices: [u32; 2],
    /// Boundary type of the edge.
    pub kind: EdgeMarker,
}

/// Vertex/polygon description of a mesh, before validation.
///
/// This is the interchange form: the Gmsh reader produces it, and it can be
/// deserialized directly from JSON.
///
/// ```json
/// {
///   "vertices": [[0,0], [1,0], [1,1], [0,1]],
///   "cells": [[0,1,2], [0,2,3]],
///   "boundary_edges": [{ "vertices": [0,1], "kind": "open_sea" }],
///   "fishing_cells": [1]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshGeometry {
    /// Vertex coordinates.
    pub vertices: Vec<Vec2>,
    /// Cell polygons as ordered vertex-index lists (either winding).
    pub cells: Vec<Vec<u32>>,
    /// Explicit boundary-edge markers. Unmarked boundary edges take
    /// [`LoadOptions::default_boundary`].
    #[serde(default)]
    pub boundary_edges: Vec<BoundaryMarker>,
    /// Cells explicitly tagged as fishing ground.
    #[serde(default)]
    pub fishing_cells: Vec<u32>,
}

/// Closed axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Inclusive `[min, max]` along x.
    pub x_range: [f64; 2],
    /// Inclusive `[min, max]` along y.
    pub y_range: [f64; 2],
}

impl Rect {
    /// Whether `p` lies inside or on the rectangle.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x_range[0]
            && p.x <= self.x_range[1]
            && p.y >= self.y_range[0]
            && p.y <= self.y_range[1]
    }
}

/// Options applied while turning a [`MeshGeometry`] into a [`Mesh`](crate::Mesh).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Cells with any vertex inside this rectangle join the fishing ground,
    /// in addition to cells tagged in the geometry.
    pub fishing_ground: Option<Rect>,
    /// Boundary type for boundary edges without an explicit marker.
    pub default_boundary: EdgeMarker,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_closed() {
        let r = Rect {
            x_range: [0.0, 0.45],
            y_range: [0.0, 0.2],
        };
        assert!(r.contains(Vec2::new(0.45, 0.2)));
        assert!(r.contains(Vec2::new(0.1, 0.1)));
        assert!(!r.contains(Vec2::new(0.46, 0.1)));
    }

    #[test]
    fn geometry_from_json_defaults() {
        let g: MeshGeometry = serde_json::from_str(
            r#"{"vertices": [[0,0],[1,0],[0,1]], "cells": [[0,1,2]]}"#,
        )
        .unwrap();
        assert_eq!(g.vertices.len(), 3);
        assert!(g.boundary_edges.is_empty());
        assert!(g.fishing_cells.is_empty());
        assert_eq!(LoadOptions::default().default_boundary, EdgeMarker::Coast);
    }
}
