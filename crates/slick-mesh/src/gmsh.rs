//! Gmsh ASCII mesh reader.
//!
//! Supports the 2.2 and 4.1 ASCII formats. Triangles and quadrilaterals
//! (including their higher-order variants, reduced to corner nodes) become
//! cells; line elements become boundary markers. Physical-group names
//! decide the markers: see [`BoundaryKind::from_name`].
//!
//! | Element dim | Physical name matches | Result |
//! |-------------|-----------------------|--------|
//! | 1 | open/sea/ocean/outflow | open-sea marker |
//! | 1 | coast/land/shore/wall | coast marker |
//! | 2 | fish | fishing-ground cell |
//!
//! Anything else is left to [`LoadOptions`](crate::LoadOptions) defaults.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use smallvec::SmallVec;
use slick_core::{BoundaryKind, MeshLoadError, Vec2};

use crate::geometry::{BoundaryMarker, EdgeMarker, MeshGeometry};

/// Read a `.msh` file.
pub fn read_path<P: AsRef<Path>>(path: P) -> Result<MeshGeometry, MeshLoadError> {
    let file = File::open(path.as_ref())?;
    read(BufReader::new(file))
}

/// Read Gmsh ASCII content from any buffered reader.
pub fn read<R: BufRead>(reader: R) -> Result<MeshGeometry, MeshLoadError> {
    let raw = RawMesh::parse(reader)?;
    raw.into_geometry()
}

// ── Line cursor ────────────────────────────────────────────────────

struct Cursor<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> Cursor<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, MeshLoadError> {
        match self.lines.next() {
            None => Ok(None),
            Some(line) => {
                self.line_no += 1;
                Ok(Some(line?))
            }
        }
    }

    fn expect_line(&mut self, section: &str) -> Result<String, MeshLoadError> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(self.error(format!("unexpected end of file in {section}"))),
        }
    }

    fn skip_to(&mut self, end: &str) -> Result<(), MeshLoadError> {
        loop {
            match self.next_line()? {
                Some(line) if line.trim() == end => return Ok(()),
                Some(_) => {}
                None => return Err(self.error(format!("missing {end}"))),
            }
        }
    }

    fn numbers<T: FromStr>(&self, line: &str) -> Result<Vec<T>, MeshLoadError> {
        line.split_whitespace()
            .map(|tok| {
                tok.parse::<T>()
                    .map_err(|_| self.error(format!("invalid number '{tok}'")))
            })
            .collect()
    }

    fn error(&self, reason: impl Into<String>) -> MeshLoadError {
        MeshLoadError::Parse {
            line: self.line_no,
            reason: reason.into(),
        }
    }
}

// ── Raw file contents ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Version {
    V2,
    V4,
}

struct RawElement {
    dim: u32,
    physical: Option<i32>,
    nodes: SmallVec<[u64; 4]>,
}

struct RawMesh {
    physical_names: HashMap<(u32, i32), String>,
    node_index: HashMap<u64, u32>,
    vertices: Vec<Vec2>,
    elements: Vec<RawElement>,
    skipped_elements: usize,
}

/// Upper bound on capacity reserved from a count declared in the file.
const RESERVE_CAP: usize = 1 << 20;

/// `(dimension, corner count)` for supported element types.
fn element_shape(element_type: u32) -> Option<(u32, usize)> {
    match element_type {
        15 => Some((0, 1)),
        1 | 8 => Some((1, 2)),
        2 | 9 => Some((2, 3)),
        3 | 10 | 16 => Some((2, 4)),
        _ => None,
    }
}

impl RawMesh {
    fn parse<R: BufRead>(reader: R) -> Result<Self, MeshLoadError> {
        let mut cur = Cursor::new(reader);
        let mut raw = RawMesh {
            physical_names: HashMap::new(),
            node_index: HashMap::new(),
            vertices: Vec::new(),
            elements: Vec::new(),
            skipped_elements: 0,
        };
        let mut version = Version::V2;
        let mut entity_physicals: HashMap<(u32, i32), Vec<i32>> = HashMap::new();

        while let Some(line) = cur.next_line()? {
            match line.trim() {
                "$MeshFormat" => {
                    version = Self::parse_format(&mut cur)?;
                }
                "$PhysicalNames" => {
                    raw.parse_physical_names(&mut cur)?;
                }
                "$Entities" => {
                    entity_physicals = Self::parse_entities(&mut cur)?;
                }
                "$Nodes" => match version {
                    Version::V2 => raw.parse_nodes_v2(&mut cur)?,
                    Version::V4 => raw.parse_nodes_v4(&mut cur)?,
                },
                "$Elements" => match version {
                    Version::V2 => raw.parse_elements_v2(&mut cur)?,
                    Version::V4 => raw.parse_elements_v4(&mut cur, &entity_physicals)?,
                },
                section if section.starts_with('$') && !section.starts_with("$End") => {
                    let end = format!("$End{}", &section[1..]);
                    cur.skip_to(&end)?;
                }
                _ => {}
            }
        }
        Ok(raw)
    }

    fn parse_format<R: BufRead>(cur: &mut Cursor<R>) -> Result<Version, MeshLoadError> {
        let line = cur.expect_line("$MeshFormat")?;
        let mut parts = line.split_whitespace();
        let version: f64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| cur.error("missing format version"))?;
        if parts.next() != Some("0") {
            return Err(cur.error("binary Gmsh files are not supported"));
        }
        cur.skip_to("$EndMeshFormat")?;
        if (2.0..3.0).contains(&version) {
            Ok(Version::V2)
        } else if (4.0..5.0).contains(&version) {
            Ok(Version::V4)
        } else {
            Err(cur.error(format!("unsupported format version {version}")))
        }
    }

    fn parse_physical_names<R: BufRead>(&mut self, cur: &mut Cursor<R>) -> Result<(), MeshLoadError> {
        cur.expect_line("$PhysicalNames")?;
        loop {
            let line = cur.expect_line("$PhysicalNames")?;
            let t = line.trim();
            if t == "$EndPhysicalNames" {
                return Ok(());
            }
            let mut parts = t.splitn(3, char::is_whitespace);
            let (Some(dim), Some(tag), Some(name)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(cur.error("malformed physical name"));
            };
            let dim = dim.parse().map_err(|_| cur.error("invalid physical dimension"))?;
            let tag = tag.parse().map_err(|_| cur.error("invalid physical tag"))?;
            self.physical_names
                .insert((dim, tag), name.trim().trim_matches('"').to_string());
        }
    }

    fn parse_entities<R: BufRead>(
        cur: &mut Cursor<R>,
    ) -> Result<HashMap<(u32, i32), Vec<i32>>, MeshLoadError> {
        let header = cur.expect_line("$Entities")?;
        let counts: Vec<usize> = cur.numbers(&header)?;
        if counts.len() < 4 {
            return Err(cur.error("bad $Entities header"));
        }
        let mut map = HashMap::new();
        for (dim, &count) in counts.iter().take(4).enumerate() {
            // Points carry one coordinate triple, higher entities a bounding box.
            let phys_at = if dim == 0 { 4 } else { 7 };
            for _ in 0..count {
                let line = cur.expect_line("$Entities")?;
                let tokens: Vec<&str> = line.split_whitespace().collect();
                let tag: i32 = tokens
                    .first()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| cur.error("invalid entity tag"))?;
                let n_phys: usize = tokens
                    .get(phys_at)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| cur.error("invalid entity physical count"))?;
                let physicals = tokens
                    .iter()
                    .skip(phys_at + 1)
                    .take(n_phys)
                    .map(|s| s.parse().map_err(|_| cur.error("invalid physical tag")))
                    .collect::<Result<Vec<i32>, _>>()?;
                map.insert((dim as u32, tag), physicals);
            }
        }
        cur.skip_to("$EndEntities")?;
        Ok(map)
    }

    fn push_node<R: BufRead>(
        &mut self,
        cur: &Cursor<R>,
        tag: u64,
        coords: &[f64],
    ) -> Result<(), MeshLoadError> {
        if coords.len() < 2 {
            return Err(cur.error("node needs at least two coordinates"));
        }
        if self.node_index.insert(tag, self.vertices.len() as u32).is_some() {
            return Err(cur.error(format!("duplicate node tag {tag}")));
        }
        self.vertices.push(Vec2::new(coords[0], coords[1]));
        Ok(())
    }

    fn parse_nodes_v2<R: BufRead>(&mut self, cur: &mut Cursor<R>) -> Result<(), MeshLoadError> {
        let count: usize = cur
            .expect_line("$Nodes")?
            .trim()
            .parse()
            .map_err(|_| cur.error("invalid node count"))?;
        self.vertices.reserve(count.min(RESERVE_CAP));
        for _ in 0..count {
            let line = cur.expect_line("$Nodes")?;
            let fields: Vec<f64> = cur.numbers(&line)?;
            let Some((&tag, coords)) = fields.split_first() else {
                return Err(cur.error("empty node line"));
            };
            self.push_node(cur, tag as u64, coords)?;
        }
        cur.skip_to("$EndNodes")
    }

    fn parse_nodes_v4<R: BufRead>(&mut self, cur: &mut Cursor<R>) -> Result<(), MeshLoadError> {
        let line = cur.expect_line("$Nodes")?;
        let header: Vec<u64> = cur.numbers(&line)?;
        if header.len() < 4 {
            return Err(cur.error("bad $Nodes header"));
        }
        let declared = usize::try_from(header[1]).unwrap_or(usize::MAX);
        self.vertices.reserve(declared.min(RESERVE_CAP));
        for _ in 0..header[0] {
            let line = cur.expect_line("$Nodes")?;
            let block: Vec<u64> = cur.numbers(&line)?;
            if block.len() < 4 {
                return Err(cur.error("bad node block header"));
            }
            let n = block[3];
            let mut tags = Vec::with_capacity(usize::try_from(n).unwrap_or(0).min(RESERVE_CAP));
            for _ in 0..n {
                let line = cur.expect_line("$Nodes")?;
                tags.push(
                    line.trim()
                        .parse::<u64>()
                        .map_err(|_| cur.error("invalid node tag"))?,
                );
            }
            for tag in tags {
                let line = cur.expect_line("$Nodes")?;
                let coords: Vec<f64> = cur.numbers(&line)?;
                self.push_node(cur, tag, &coords)?;
            }
        }
        cur.skip_to("$EndNodes")
    }

    fn parse_elements_v2<R: BufRead>(&mut self, cur: &mut Cursor<R>) -> Result<(), MeshLoadError> {
        let count: usize = cur
            .expect_line("$Elements")?
            .trim()
            .parse()
            .map_err(|_| cur.error("invalid element count"))?;
        for _ in 0..count {
            let line = cur.expect_line("$Elements")?;
            let fields: Vec<i64> = cur.numbers(&line)?;
            if fields.len() < 3 {
                return Err(cur.error("element line too short"));
            }
            let Some((dim, corners)) = element_shape(fields[1] as u32) else {
                self.skipped_elements += 1;
                continue;
            };
            let n_tags = usize::try_from(fields[2])
                .map_err(|_| cur.error(format!("invalid tag count {}", fields[2])))?;
            let end = n_tags
                .checked_add(3 + corners)
                .ok_or_else(|| cur.error(format!("invalid tag count {n_tags}")))?;
            let start = end - corners;
            if fields.len() < end {
                return Err(cur.error("element has too few nodes"));
            }
            let physical = if n_tags > 0 && fields[3] != 0 {
                Some(fields[3] as i32)
            } else {
                None
            };
            self.elements.push(RawElement {
                dim,
                physical,
                nodes: fields[start..end]
                    .iter()
                    .map(|&n| n as u64)
                    .collect(),
            });
        }
        cur.skip_to("$EndElements")
    }

    fn parse_elements_v4<R: BufRead>(
        &mut self,
        cur: &mut Cursor<R>,
        entity_physicals: &HashMap<(u32, i32), Vec<i32>>,
    ) -> Result<(), MeshLoadError> {
        let line = cur.expect_line("$Elements")?;
        let header: Vec<u64> = cur.numbers(&line)?;
        if header.len() < 4 {
            return Err(cur.error("bad $Elements header"));
        }
        for _ in 0..header[0] {
            let line = cur.expect_line("$Elements")?;
            let block: Vec<i64> = cur.numbers(&line)?;
            if block.len() < 4 {
                return Err(cur.error("bad element block header"));
            }
            let (entity_dim, entity_tag) = (block[0] as u32, block[1] as i32);
            let shape = element_shape(block[2] as u32);
            let physical = entity_physicals
                .get(&(entity_dim, entity_tag))
                .and_then(|p| p.first().copied());
            for _ in 0..block[3] {
                let line = cur.expect_line("$Elements")?;
                let Some((dim, corners)) = shape else {
                    self.skipped_elements += 1;
                    continue;
                };
                let fields: Vec<u64> = cur.numbers(&line)?;
                if fields.len() < 1 + corners {
                    return Err(cur.error("element has too few nodes"));
                }
                self.elements.push(RawElement {
                    dim,
                    physical,
                    nodes: fields[1..1 + corners].iter().copied().collect(),
                });
            }
        }
        cur.skip_to("$EndElements")
    }

    fn into_geometry(self) -> Result<MeshGeometry, MeshLoadError> {
        let kind_of = |dim: u32, physical: Option<i32>| {
            physical
                .and_then(|tag| self.physical_names.get(&(dim, tag)))
                .and_then(|name| BoundaryKind::from_name(name))
        };
        let resolve = |nodes: &[u64]| -> Result<Vec<u32>, MeshLoadError> {
            nodes
                .iter()
                .map(|tag| {
                    self.node_index
                        .get(tag)
                        .copied()
                        .ok_or_else(|| MeshLoadError::Parse {
                            line: 0,
                            reason: format!("element references unknown node {tag}"),
                        })
                })
                .collect()
        };

        let mut geometry = MeshGeometry {
            vertices: self.vertices.clone(),
            ..Default::default()
        };
        for element in &self.elements {
            match element.dim {
                2 => {
                    let cell = resolve(&element.nodes)?;
                    if kind_of(2, element.physical) == Some(BoundaryKind::FishingGround) {
                        geometry.fishing_cells.push(geometry.cells.len() as u32);
                    }
                    geometry.cells.push(cell);
                }
                1 => {
                    let kind = match kind_of(1, element.physical) {
                        Some(BoundaryKind::OpenSea) => EdgeMarker::OpenSea,
                        Some(BoundaryKind::Coast) => EdgeMarker::Coast,
                        _ => continue,
                    };
                    let ends = resolve(&element.nodes)?;
                    geometry.boundary_edges.push(BoundaryMarker {
                        vertices: [ends[0], ends[1]],
                        kind,
                    });
                }
                _ => {}
            }
        }

        if self.skipped_elements > 0 {
            tracing::warn!(
                skipped = self.skipped_elements,
                "ignored unsupported Gmsh element types"
            );
        }
        tracing::debug!(
            vertices = geometry.vertices.len(),
            cells = geometry.cells.len(),
            markers = geometry.boundary_edges.len(),
            "parsed Gmsh mesh"
        );
        Ok(geometry)
    }
}
