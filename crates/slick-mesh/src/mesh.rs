//! The immutable [`Mesh`] and its per-cell and per-edge geometry.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexMap;
use smallvec::SmallVec;
use slick_core::{BoundaryKind, CellId, EdgeKind, MeshLoadError, NeighborList, Vec2};

use crate::geometry::{EdgeMarker, LoadOptions, MeshGeometry, Rect};
use crate::gmsh;

/// Cells whose area falls below this fraction of their squared perimeter
/// are rejected as degenerate.
const MIN_RELATIVE_AREA: f64 = 1e-12;

// ── Geometry records ───────────────────────────────────────────────

/// One edge of a cell polygon, seen from that cell.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeGeometry {
    /// Endpoints in the cell's traversal order.
    pub vertices: [u32; 2],
    /// Edge length.
    pub length: f64,
    /// Unit normal pointing out of the cell.
    ///
    /// For an interior edge the two adjacent cells hold exact negations
    /// of each other's normal.
    pub normal: Vec2,
    /// Edge midpoint.
    pub midpoint: Vec2,
    /// What lies across the edge.
    pub link: EdgeKind,
    /// Centroid-to-centroid distance for interior edges; twice the
    /// centroid-to-midpoint distance (a mirrored ghost cell) on the boundary.
    pub distance: f64,
}

impl EdgeGeometry {
    /// Outward normal scaled by the edge length.
    pub fn scaled_normal(&self) -> Vec2 {
        self.normal * self.length
    }
}

/// Geometric attributes of one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellGeometry {
    vertices: SmallVec<[u32; 4]>,
    centroid: Vec2,
    area: f64,
    perimeter: f64,
    edges: SmallVec<[EdgeGeometry; 4]>,
    boundary: BoundaryKind,
}

impl CellGeometry {
    /// Polygon vertex indices in load order.
    pub fn vertices(&self) -> &[u32] {
        &self.vertices
    }

    /// Area centroid.
    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    /// Polygon area (always positive).
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Polygon perimeter.
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Characteristic size `2 * area / perimeter`.
    ///
    /// Equals the inscribed radius for triangles and half the side length
    /// for squares.
    pub fn size(&self) -> f64 {
        2.0 * self.area / self.perimeter
    }

    /// Edges in polygon order; edge `k` joins vertex `k` to vertex `k + 1`.
    pub fn edges(&self) -> &[EdgeGeometry] {
        &self.edges
    }

    /// Boundary classification.
    pub fn boundary_kind(&self) -> BoundaryKind {
        self.boundary
    }
}

// ── Mesh ───────────────────────────────────────────────────────────

/// Validated, immutable unstructured mesh.
///
/// All per-cell data is indexed by [`CellId`]. Query methods taking a
/// `CellId` panic if it is out of range, the same way slice indexing does;
/// use [`Mesh::cell`] for a checked lookup.
#[derive(Clone, Debug)]
pub struct Mesh {
    vertices: Vec<Vec2>,
    cells: Vec<CellGeometry>,
    fishing: Vec<CellId>,
    min_cell_size: f64,
}

impl Mesh {
    /// Validate `geometry` and build the mesh.
    ///
    /// Checks performed:
    ///
    /// 1. At least one cell.
    /// 2. Every vertex coordinate is finite.
    /// 3. Every cell references existing vertices, has at least three
    ///    distinct vertices, and encloses non-zero area.
    /// 4. No edge is shared by more than two cells.
    /// 5. Every boundary marker names an edge used by exactly one cell.
    /// 6. Every fishing-ground tag names an existing cell.
    pub fn load(geometry: &MeshGeometry, options: &LoadOptions) -> Result<Self, MeshLoadError> {
        let vertices = &geometry.vertices;
        let n_cells = geometry.cells.len();

        // 1. Non-empty
        if n_cells == 0 {
            return Err(MeshLoadError::Empty);
        }

        // 2. Finite vertices
        if let Some(vertex) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(MeshLoadError::NonFiniteVertex { vertex });
        }

        // 3. Polygon checks and shape
        let mut shapes = Vec::with_capacity(n_cells);
        for (cell, poly) in geometry.cells.iter().enumerate() {
            if let Some(&vertex) = poly.iter().find(|&&v| v as usize >= vertices.len()) {
                return Err(MeshLoadError::DanglingVertex { cell, vertex });
            }
            let mut distinct: SmallVec<[u32; 4]> = poly.iter().copied().collect();
            distinct.sort_unstable();
            distinct.dedup();
            if distinct.len() < 3 || distinct.len() != poly.len() {
                return Err(MeshLoadError::DegenerateCell {
                    cell,
                    vertex_count: distinct.len(),
                });
            }
            let points: SmallVec<[Vec2; 4]> =
                poly.iter().map(|&v| vertices[v as usize]).collect();
            let shape = Shape::of(&points);
            if !(shape.area() > MIN_RELATIVE_AREA * shape.perimeter * shape.perimeter) {
                return Err(MeshLoadError::ZeroArea {
                    cell,
                    area: shape.area(),
                });
            }
            shapes.push(shape);
        }

        // 4. Edge usage
        let mut edge_users: IndexMap<(u32, u32), SmallVec<[u32; 2]>> = IndexMap::new();
        for (cell, poly) in geometry.cells.iter().enumerate() {
            for (a, b) in polygon_edges(poly) {
                edge_users.entry(edge_key(a, b)).or_default().push(cell as u32);
            }
        }
        if let Some((&(a, b), users)) = edge_users.iter().find(|(_, users)| users.len() > 2) {
            return Err(MeshLoadError::NonManifoldEdge {
                a,
                b,
                cell_count: users.len(),
            });
        }

        // 5. Boundary markers
        let mut markers: IndexMap<(u32, u32), EdgeMarker> = IndexMap::new();
        for marker in &geometry.boundary_edges {
            let key = edge_key(marker.vertices[0], marker.vertices[1]);
            match edge_users.get(&key) {
                Some(users) if users.len() == 1 => {
                    markers.insert(key, marker.kind);
                }
                _ => {
                    return Err(MeshLoadError::UnknownBoundaryEdge { a: key.0, b: key.1 });
                }
            }
        }

        // 6. Fishing ground
        let mut fishing = vec![false; n_cells];
        for &cell in &geometry.fishing_cells {
            match fishing.get_mut(cell as usize) {
                Some(flag) => *flag = true,
                None => return Err(MeshLoadError::UnknownFishingCell { cell }),
            }
        }
        if let Some(rect) = &options.fishing_ground {
            for (cell, poly) in geometry.cells.iter().enumerate() {
                if poly.iter().any(|&v| rect.contains(vertices[v as usize])) {
                    fishing[cell] = true;
                }
            }
        }

        // 7. Edge geometry and classification
        let mut cells = Vec::with_capacity(n_cells);
        for (cell, poly) in geometry.cells.iter().enumerate() {
            let shape = &shapes[cell];
            let counter_clockwise = shape.signed_area > 0.0;
            let mut edges: SmallVec<[EdgeGeometry; 4]> = SmallVec::with_capacity(poly.len());
            for (a, b) in polygon_edges(poly) {
                let (lo, hi) = edge_key(a, b);
                let (p_lo, p_hi) = (vertices[lo as usize], vertices[hi as usize]);
                let along = p_hi - p_lo;
                let length = along.norm();
                // Derived from the sorted endpoint pair so both sides agree bit for bit.
                let canonical = along.perp_cw() * (1.0 / length);
                let normal = if (a == lo) == counter_clockwise {
                    canonical
                } else {
                    -canonical
                };
                let midpoint = p_lo.midpoint(p_hi);
                let other = edge_users
                    .get(&(lo, hi))
                    .and_then(|users| users.iter().copied().find(|&u| u as usize != cell));
                let link = match other {
                    Some(other) => EdgeKind::Interior(CellId(other)),
                    None => match markers
                        .get(&(lo, hi))
                        .copied()
                        .unwrap_or(options.default_boundary)
                    {
                        EdgeMarker::Coast => EdgeKind::Coast,
                        EdgeMarker::OpenSea => EdgeKind::OpenSea,
                    },
                };
                let distance = match link {
                    EdgeKind::Interior(other) => {
                        shape.centroid.distance(shapes[other.index()].centroid)
                    }
                    EdgeKind::OpenSea | EdgeKind::Coast => {
                        2.0 * shape.centroid.distance(midpoint)
                    }
                };
                edges.push(EdgeGeometry {
                    vertices: [a, b],
                    length,
                    normal,
                    midpoint,
                    link,
                    distance,
                });
            }

            let boundary = classify(fishing[cell], &edges);
            cells.push(CellGeometry {
                vertices: poly.iter().copied().collect(),
                centroid: shape.centroid,
                area: shape.area(),
                perimeter: shape.perimeter,
                edges,
                boundary,
            });
        }

        let min_cell_size = cells
            .iter()
            .map(CellGeometry::size)
            .fold(f64::INFINITY, f64::min);
        let fishing = fishing
            .iter()
            .enumerate()
            .filter(|(_, &f)| f)
            .map(|(i, _)| CellId(i as u32))
            .collect::<Vec<_>>();

        let mesh = Mesh {
            vertices: vertices.clone(),
            cells,
            fishing,
            min_cell_size,
        };
        tracing::debug!(
            cells = mesh.cell_count(),
            vertices = mesh.vertex_count(),
            fishing_cells = mesh.fishing.len(),
            min_cell_size = mesh.min_cell_size,
            "mesh loaded"
        );
        Ok(mesh)
    }

    /// Read and load a mesh file.
    ///
    /// `.msh` files are parsed as Gmsh ASCII (format 2.2 or 4.1); anything
    /// else is parsed as a JSON [`MeshGeometry`].
    pub fn from_path<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self, MeshLoadError> {
        let path = path.as_ref();
        let is_gmsh = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("msh"));
        let geometry = if is_gmsh {
            gmsh::read_path(path)?
        } else {
            let reader = BufReader::new(File::open(path)?);
            serde_json::from_reader(reader).map_err(|e| MeshLoadError::Parse {
                line: e.line(),
                reason: e.to_string(),
            })?
        };
        Self::load(&geometry, options)
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex coordinates.
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// All cells in id order.
    pub fn cells(&self) -> &[CellGeometry] {
        &self.cells
    }

    /// Checked cell lookup.
    pub fn cell(&self, id: CellId) -> Option<&CellGeometry> {
        self.cells.get(id.index())
    }

    /// Iterate over every cell id in order.
    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        (0..self.cells.len() as u32).map(CellId)
    }

    /// Neighbour slots of a cell, one per edge, in polygon order.
    ///
    /// `None` marks a domain-boundary edge.
    pub fn neighbors_of(&self, id: CellId) -> NeighborList {
        self.cells[id.index()]
            .edges
            .iter()
            .map(|e| e.link.neighbor())
            .collect()
    }

    /// Edges of a cell in polygon order.
    pub fn edges_of(&self, id: CellId) -> &[EdgeGeometry] {
        &self.cells[id.index()].edges
    }

    /// Whether any edge of the cell lies on the domain boundary.
    pub fn is_boundary(&self, id: CellId) -> bool {
        self.cells[id.index()]
            .edges
            .iter()
            .any(|e| e.link.is_boundary())
    }

    /// Boundary classification of a cell.
    pub fn boundary_kind(&self, id: CellId) -> BoundaryKind {
        self.cells[id.index()].boundary
    }

    /// Area centroid of a cell.
    pub fn centroid(&self, id: CellId) -> Vec2 {
        self.cells[id.index()].centroid
    }

    /// Area of a cell.
    pub fn area(&self, id: CellId) -> f64 {
        self.cells[id.index()].area
    }

    /// Smallest characteristic cell size ([`CellGeometry::size`]) in the mesh.
    pub fn min_cell_size(&self) -> f64 {
        self.min_cell_size
    }

    /// Sum of all cell areas.
    pub fn total_area(&self) -> f64 {
        self.cells.iter().map(|c| c.area).sum()
    }

    /// Cells classified as fishing ground, in id order.
    pub fn fishing_cells(&self) -> &[CellId] {
        &self.fishing
    }

    /// Cells with at least one vertex inside `rect`.
    pub fn cells_in_rect(&self, rect: &Rect) -> Vec<CellId> {
        self.cell_ids()
            .filter(|&id| {
                self.cells[id.index()]
                    .vertices
                    .iter()
                    .any(|&v| rect.contains(self.vertices[v as usize]))
            })
            .collect()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

struct Shape {
    signed_area: f64,
    centroid: Vec2,
    perimeter: f64,
}

impl Shape {
    /// Shoelace area and area centroid, computed relative to the first
    /// vertex to limit cancellation.
    fn of(points: &[Vec2]) -> Self {
        let origin = points[0];
        let mut twice_area = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        let mut perimeter = 0.0;
        for (i, &p) in points.iter().enumerate() {
            let q = points[(i + 1) % points.len()];
            perimeter += p.distance(q);
            let (p, q) = (p - origin, q - origin);
            let cross = p.x * q.y - q.x * p.y;
            twice_area += cross;
            cx += (p.x + q.x) * cross;
            cy += (p.y + q.y) * cross;
        }
        let centroid = if twice_area != 0.0 {
            origin + Vec2::new(cx, cy) * (1.0 / (3.0 * twice_area))
        } else {
            origin
        };
        Shape {
            signed_area: 0.5 * twice_area,
            centroid,
            perimeter,
        }
    }

    fn area(&self) -> f64 {
        self.signed_area.abs()
    }
}

fn polygon_edges(poly: &[u32]) -> impl Iterator<Item = (u32, u32)> + '_ {
    (0..poly.len()).map(move |k| (poly[k], poly[(k + 1) % poly.len()]))
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn classify(fishing: bool, edges: &[EdgeGeometry]) -> BoundaryKind {
    if fishing {
        BoundaryKind::FishingGround
    } else if edges.iter().any(|e| e.link == EdgeKind::OpenSea) {
        BoundaryKind::OpenSea
    } else if edges.iter().any(|e| e.link == EdgeKind::Coast) {
        BoundaryKind::Coast
    } else {
        BoundaryKind::None
    }
}
