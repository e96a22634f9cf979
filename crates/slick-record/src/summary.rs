//! Fishing-ground summary reporting.
//!
//! The same series is available as `tracing` events
//! ([`log_fishing_summary`]) or as a plain-text log
//! ([`write_fishing_summary`]).

use std::io::Write;

use slick_core::SnapshotAccess;
use slick_engine::ResultAccumulator;
use tracing::info;

use crate::error::RecordError;

/// Emit one `info` event per recorded snapshot with the oil in the
/// fishing ground, preceded by a header event.
pub fn log_fishing_summary(results: &ResultAccumulator) {
    info!(
        cells = results.fishing_cells().len(),
        snapshots = results.len(),
        "fishing ground summary"
    );
    for snapshot in results.snapshots() {
        info!(
            step = snapshot.step.0,
            time = snapshot.time,
            oil = snapshot.total_over(results.fishing_cells()),
            "oil in fishing ground"
        );
    }
}

/// Write the summary as text, one `Time step N (t = T): Oil in Fishing
/// Ground = X` line per recorded snapshot.
pub fn write_fishing_summary<W: Write>(
    mut writer: W,
    results: &ResultAccumulator,
) -> Result<(), RecordError> {
    writeln!(
        writer,
        "Fishing ground: {} cells, {} recorded snapshots",
        results.fishing_cells().len(),
        results.len()
    )?;
    for snapshot in results.snapshots() {
        writeln!(
            writer,
            "Time step {} (t = {:.6}): Oil in Fishing Ground = {}",
            snapshot.step,
            snapshot.time,
            snapshot.total_over(results.fishing_cells())
        )?;
    }
    writer.flush()?;
    Ok(())
}
