//! Boundary classification for cells and edges.

use std::fmt;

use crate::id::CellId;

/// Boundary classification of a cell.
///
/// A cell touching several boundary kinds reports the first in the order
/// `FishingGround`, `OpenSea`, `Coast`. Fishing-ground cells transport oil
/// like interior cells; the flag only selects them for aggregate reporting.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Interior cell with a neighbour across every edge.
    #[default]
    None,
    /// Touches an open-sea edge; oil crossing it leaves the domain.
    OpenSea,
    /// Touches a coastline edge; no oil crosses it.
    Coast,
    /// Member of the fishing ground.
    FishingGround,
}

impl BoundaryKind {
    /// Infer a boundary kind from a physical-group name.
    ///
    /// Matching is case-insensitive and substring-based. Unrecognised
    /// names return `None` so the caller can apply its own default.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();

        const PATTERNS: &[(&[&str], BoundaryKind)] = &[
            (&["fish"], BoundaryKind::FishingGround),
            (&["open", "sea", "ocean", "outflow"], BoundaryKind::OpenSea),
            (&["coast", "land", "shore", "wall"], BoundaryKind::Coast),
        ];

        for (patterns, kind) in PATTERNS {
            if patterns.iter().any(|pat| lower.contains(pat)) {
                return Some(*kind);
            }
        }
        None
    }

    /// Stable lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OpenSea => "open_sea",
            Self::Coast => "coast",
            Self::FishingGround => "fishing_ground",
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What lies on the other side of a cell edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Shared with another cell.
    Interior(CellId),
    /// Domain boundary open to the sea (outflow only).
    OpenSea,
    /// Domain boundary along the coast (zero flux).
    Coast,
}

impl EdgeKind {
    /// The neighbouring cell, if the edge is interior.
    pub fn neighbor(&self) -> Option<CellId> {
        match self {
            Self::Interior(id) => Some(*id),
            Self::OpenSea | Self::Coast => None,
        }
    }

    /// Whether the edge lies on the domain boundary.
    pub fn is_boundary(&self) -> bool {
        !matches!(self, Self::Interior(_))
    }
}
