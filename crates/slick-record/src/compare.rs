//! Snapshot and run comparison.
//!
//! Bit-identical snapshots short-circuit; otherwise every cell is checked
//! against an absolute tolerance.

use slick_core::{CellId, SnapshotAccess};
use slick_engine::ResultAccumulator;

use crate::error::RecordError;
use crate::reader::SolutionReader;

/// One cell whose quantities differ by more than the tolerance.
#[derive(Clone, Debug, PartialEq)]
pub struct CellDivergence {
    /// The cell.
    pub cell: CellId,
    /// Value in the reference snapshot.
    pub expected: f64,
    /// Value in the snapshot under test.
    pub actual: f64,
}

/// Differences between two snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct DivergenceReport {
    /// Step of the reference snapshot.
    pub step: u64,
    /// `(reference time, tested time)` when they differ beyond tolerance.
    pub time_mismatch: Option<(f64, f64)>,
    /// `(reference cell count, tested cell count)` when they differ.
    pub length_mismatch: Option<(usize, usize)>,
    /// Cells over tolerance, in id order.
    pub divergences: Vec<CellDivergence>,
}

/// Compare `actual` against `expected`.
///
/// Returns `None` when times and every quantity agree within `tolerance`
/// (use 0 for bit-exact comparison of finite values).
pub fn compare_snapshot(
    expected: &dyn SnapshotAccess,
    actual: &dyn SnapshotAccess,
    tolerance: f64,
) -> Option<DivergenceReport> {
    let (e, a) = (expected.quantities(), actual.quantities());
    if expected.time() == actual.time() && e == a {
        return None;
    }

    let time_mismatch = ((expected.time() - actual.time()).abs() > tolerance)
        .then_some((expected.time(), actual.time()));
    let length_mismatch = (e.len() != a.len()).then_some((e.len(), a.len()));
    let divergences: Vec<CellDivergence> = e
        .iter()
        .zip(a)
        .enumerate()
        // Negated so that NaN on either side counts as divergent.
        .filter(|(_, (x, y))| !((*x - *y).abs() <= tolerance))
        .map(|(i, (&x, &y))| CellDivergence {
            cell: CellId(i as u32),
            expected: x,
            actual: y,
        })
        .collect();

    if time_mismatch.is_none() && length_mismatch.is_none() && divergences.is_empty() {
        return None;
    }
    Some(DivergenceReport {
        step: expected.step().0,
        time_mismatch,
        length_mismatch,
        divergences,
    })
}

/// Compare a recorded file against the snapshots of a run.
///
/// Frames are matched to snapshots by step; frames with no matching
/// snapshot are skipped. Returns the first divergence.
pub fn compare_results<R: std::io::Read>(
    reader: SolutionReader<R>,
    results: &ResultAccumulator,
    tolerance: f64,
) -> Result<Option<DivergenceReport>, RecordError> {
    for frame in reader.frames() {
        let frame = frame?;
        let Some(snapshot) = results.snapshots().find(|s| s.step.0 == frame.step) else {
            continue;
        };
        if let Some(report) = compare_snapshot(&frame, snapshot, tolerance) {
            return Ok(Some(report));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slick_test_utils::MockSnapshot;

    #[test]
    fn identical_snapshots_match() {
        let a = MockSnapshot::new(3, 0.3, vec![1.0, 2.0]);
        assert!(compare_snapshot(&a, &a.clone(), 0.0).is_none());
    }

    #[test]
    fn within_tolerance_matches() {
        let a = MockSnapshot::new(3, 0.3, vec![1.0, 2.0]);
        let b = MockSnapshot::new(3, 0.3, vec![1.0 + 1e-13, 2.0]);
        assert!(compare_snapshot(&a, &b, 1e-12).is_none());
        assert!(compare_snapshot(&a, &b, 0.0).is_some());
    }

    #[test]
    fn reports_divergent_cells() {
        let a = MockSnapshot::new(5, 0.5, vec![1.0, 2.0, 3.0]);
        let b = MockSnapshot::new(5, 0.5, vec![1.0, 2.5, f64::NAN]);
        let report = compare_snapshot(&a, &b, 1e-9).unwrap();
        assert_eq!(report.step, 5);
        assert!(report.time_mismatch.is_none());
        let cells: Vec<CellId> = report.divergences.iter().map(|d| d.cell).collect();
        assert_eq!(cells, vec![CellId(1), CellId(2)]);
        assert_eq!(report.divergences[0].actual, 2.5);
    }

    #[test]
    fn reports_length_and_time_mismatch() {
        let a = MockSnapshot::new(1, 0.1, vec![1.0, 2.0]);
        let b = MockSnapshot::new(1, 0.2, vec![1.0]);
        let report = compare_snapshot(&a, &b, 1e-9).unwrap();
        assert_eq!(report.length_mismatch, Some((2, 1)));
        assert_eq!(report.time_mismatch, Some((0.1, 0.2)));
        assert!(report.divergences.is_empty());
    }
}
