//! Restart lookup.

use std::io::Read;

use slick_core::RestartRecord;
use tracing::{info, warn};

use crate::error::RecordError;
use crate::hash::snapshot_hash;
use crate::reader::SolutionReader;
use crate::types::Frame;

/// Pick the frame to resume from.
///
/// With `resume_time`, returns the frame whose time is closest to it (the
/// earlier one on ties); otherwise the last frame. Every frame's stored
/// hash is verified on the way.
pub fn load_restart<R: Read>(
    reader: SolutionReader<R>,
    resume_time: Option<f64>,
) -> Result<RestartRecord, RecordError> {
    if let Some(t) = resume_time {
        if !t.is_finite() {
            return Err(RecordError::InvalidResumeTime(t));
        }
    }

    let mut best: Option<Frame> = None;
    for frame in reader.frames() {
        let frame = frame?;
        let computed = snapshot_hash(&frame);
        if computed != frame.snapshot_hash {
            return Err(RecordError::SnapshotMismatch {
                step: frame.step,
                stored: frame.snapshot_hash,
                computed,
            });
        }
        let better = match (&best, resume_time) {
            (None, _) | (Some(_), None) => true,
            (Some(b), Some(t)) => (frame.time - t).abs() < (b.time - t).abs(),
        };
        if better {
            best = Some(frame);
        }
    }

    let frame = best.ok_or(RecordError::NoFrames)?;
    if let Some(t) = resume_time {
        if frame.time != t {
            warn!(
                requested = t,
                found = frame.time,
                step = frame.step,
                "no frame at the requested time; using the closest"
            );
        }
    }
    info!(step = frame.step, time = frame.time, "restart frame loaded");
    Ok(frame.into_restart_record())
}
