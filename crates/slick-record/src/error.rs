//! Error types for solution files and export.

use std::io;

use thiserror::Error;

/// Errors from writing, reading, or exporting recorded results.
#[derive(Debug, Error)]
pub enum RecordError {
    /// An I/O error occurred during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream does not start with the `b"SLCK"` magic bytes.
    #[error("invalid magic bytes (expected b\"SLCK\")")]
    InvalidMagic,

    /// The format version is not supported by this build.
    #[error("unsupported format version {found}")]
    UnsupportedVersion {
        /// The version found in the file.
        found: u8,
    },

    /// A frame or header could not be decoded (truncated or corrupt data).
    #[error("malformed frame: {detail}")]
    MalformedFrame {
        /// Human-readable description of what went wrong.
        detail: String,
    },

    /// A snapshot does not cover the cell count declared in the header.
    #[error("snapshot has {found} cells, file declares {expected}")]
    CellCountMismatch {
        /// Cell count from the header.
        expected: u64,
        /// Cell count of the offending snapshot or frame.
        found: u64,
    },

    /// The file was written for a different mesh or time step.
    #[error("config hash mismatch: recorded={recorded:#018x}, current={current:#018x}")]
    ConfigMismatch {
        /// Hash from the file header.
        recorded: u64,
        /// Hash computed from the current setup.
        current: u64,
    },

    /// A frame's stored hash does not match its quantities.
    #[error("snapshot hash mismatch at step {step}: stored={stored:#018x}, computed={computed:#018x}")]
    SnapshotMismatch {
        /// Step of the corrupt frame.
        step: u64,
        /// Hash stored in the frame.
        stored: u64,
        /// Hash of the decoded quantities.
        computed: u64,
    },

    /// The file holds no frames to restart from.
    #[error("solution file contains no frames")]
    NoFrames,

    /// The requested resume time is not a finite number.
    #[error("resume time must be finite, got {0}")]
    InvalidResumeTime(f64),

    /// JSON export failed.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}
