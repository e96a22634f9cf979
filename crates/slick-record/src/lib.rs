//! Solution files, restart lookup, and result export for Slick simulations.
//!
//! Persists recorded snapshots in a compact binary format, locates the
//! frame to resume from, and exports results for external tools.
//!
//! # Architecture
//!
//! - [`SolutionWriter`] streams frames to any `Write` sink
//! - [`SolutionReader`] reads them back from any `Read` source
//! - [`load_restart`] picks the frame closest to a requested resume time
//! - [`compare_snapshot`] and [`compare_results`] check two runs agree
//! - [`export`] writes JSON histories and fishing-ground CSV series
//! - [`summary`] reports the fishing-ground series through `tracing` or
//!   as a plain-text log
//!
//! # Format
//!
//! ```text
//! [MAGIC "SLCK"] [VERSION u8] [SolutionHeader]
//! [Frame 1] [Frame 2] ... [Frame N]
//! ```
//!
//! Each frame holds the step, the time, every cell quantity bit-exact, and
//! an FNV-1a hash of those quantities.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod compare;
pub mod error;
pub mod export;
pub mod hash;
pub mod reader;
pub mod restart;
pub mod summary;
pub mod types;
pub mod writer;

pub use compare::{compare_results, compare_snapshot, CellDivergence, DivergenceReport};
pub use error::RecordError;
pub use hash::{config_hash, fields_hash, mesh_hash, snapshot_hash};
pub use reader::{FrameIter, SolutionReader};
pub use restart::load_restart;
pub use types::{Frame, SolutionHeader};
pub use writer::SolutionWriter;

/// Magic bytes at the start of every solution file.
pub const MAGIC: [u8; 4] = *b"SLCK";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;
