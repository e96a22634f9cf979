//! Solution file writer.
//!
//! [`SolutionWriter`] streams frames to any `Write` sink. The header is
//! written immediately on construction.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use slick_core::SnapshotAccess;
use slick_engine::ResultAccumulator;

use crate::codec::{encode_frame, encode_header};
use crate::error::RecordError;
use crate::hash::snapshot_hash;
use crate::types::{Frame, SolutionHeader};

/// Writes recorded snapshots to a byte stream.
///
/// Generic over `W: Write` so tests can use `Vec<u8>` and production
/// code can use `BufWriter<File>`.
///
/// # Examples
///
/// ```
/// use slick_record::{SolutionHeader, SolutionReader, SolutionWriter};
/// use slick_core::RestartRecord;
/// use slick_core::StepId;
///
/// let header = SolutionHeader::new(7, 2, 0.0, 0.5);
/// let mut buf = Vec::new();
/// let mut writer = SolutionWriter::new(&mut buf, &header).unwrap();
/// for step in 0..3u64 {
///     let record = RestartRecord {
///         step: StepId(step),
///         time: step as f64 * 0.5,
///         quantities: vec![1.0, step as f64],
///     };
///     writer.write_snapshot(&record).unwrap();
/// }
/// assert_eq!(writer.frames_written(), 3);
/// drop(writer);
///
/// let reader = SolutionReader::open(buf.as_slice()).unwrap();
/// assert_eq!(reader.header(), &header);
/// let steps: Vec<u64> = reader.frames().map(|f| f.unwrap().step).collect();
/// assert_eq!(steps, vec![0, 1, 2]);
/// ```
pub struct SolutionWriter<W: Write> {
    writer: W,
    cell_count: u64,
    frames_written: u64,
}

impl SolutionWriter<BufWriter<File>> {
    /// Create (or truncate) a file and write the header.
    pub fn create<P: AsRef<Path>>(path: P, header: &SolutionHeader) -> Result<Self, RecordError> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), header)
    }
}

impl<W: Write> SolutionWriter<W> {
    /// Create a new writer, immediately writing the header.
    pub fn new(mut writer: W, header: &SolutionHeader) -> Result<Self, RecordError> {
        encode_header(&mut writer, header)?;
        Ok(Self {
            writer,
            cell_count: header.cell_count,
            frames_written: 0,
        })
    }

    /// Hash and write one snapshot.
    pub fn write_snapshot(&mut self, snapshot: &dyn SnapshotAccess) -> Result<(), RecordError> {
        let found = snapshot.cell_count() as u64;
        if found != self.cell_count {
            return Err(RecordError::CellCountMismatch {
                expected: self.cell_count,
                found,
            });
        }
        let frame = Frame {
            step: snapshot.step().0,
            time: snapshot.time(),
            quantities: snapshot.quantities().to_vec(),
            snapshot_hash: snapshot_hash(snapshot),
        };
        self.write_frame(&frame)
    }

    /// Write every snapshot of a run in order.
    pub fn write_results(&mut self, results: &ResultAccumulator) -> Result<(), RecordError> {
        for snapshot in results.snapshots() {
            self.write_snapshot(snapshot)?;
        }
        Ok(())
    }

    /// Write a pre-built frame as is.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), RecordError> {
        encode_frame(&mut self.writer, frame)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), RecordError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Consume the writer and return the underlying `Write` sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slick_test_utils::MockSnapshot;

    #[test]
    fn rejects_wrong_cell_count() {
        let header = SolutionHeader::new(0, 3, 0.0, 0.1);
        let mut writer = SolutionWriter::new(Vec::new(), &header).unwrap();
        let snap = MockSnapshot::new(1, 0.1, vec![1.0, 2.0]);
        match writer.write_snapshot(&snap) {
            Err(RecordError::CellCountMismatch {
                expected: 3,
                found: 2,
            }) => {}
            other => panic!("expected CellCountMismatch, got {other:?}"),
        }
        assert_eq!(writer.frames_written(), 0);
    }

    #[test]
    fn frame_carries_snapshot_hash() {
        let header = SolutionHeader::new(0, 2, 0.0, 0.1);
        let mut writer = SolutionWriter::new(Vec::new(), &header).unwrap();
        let snap = MockSnapshot::new(4, 0.4, vec![0.5, 0.25]);
        writer.write_snapshot(&snap).unwrap();
        let buf = writer.into_inner();

        let reader = crate::SolutionReader::open(buf.as_slice()).unwrap();
        let frame = reader.frames().next().unwrap().unwrap();
        assert_eq!(frame.snapshot_hash, snapshot_hash(&snap));
        assert_eq!(frame.step, 4);
    }
}
