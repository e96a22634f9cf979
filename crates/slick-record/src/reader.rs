//! Solution file reader.
//!
//! [`SolutionReader`] reads frames from any `Read` source. The header is
//! validated on construction.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::codec::{decode_frame, decode_header};
use crate::error::RecordError;
use crate::types::{Frame, SolutionHeader};

/// Reads recorded frames from a byte stream.
///
/// Generic over `R: Read` so tests can use `&[u8]` and production
/// code can use `BufReader<File>`.
pub struct SolutionReader<R: Read> {
    reader: R,
    header: SolutionHeader,
    frames_read: u64,
}

impl SolutionReader<BufReader<File>> {
    /// Open a file, reading and validating the header.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        let file = File::open(path)?;
        Self::open(BufReader::new(file))
    }
}

impl<R: Read> SolutionReader<R> {
    /// Open a stream, reading and validating the header.
    pub fn open(mut reader: R) -> Result<Self, RecordError> {
        let header = decode_header(&mut reader)?;
        Ok(Self {
            reader,
            header,
            frames_read: 0,
        })
    }

    /// The file header.
    pub fn header(&self) -> &SolutionHeader {
        &self.header
    }

    /// Fail unless the file was written with the given configuration hash.
    pub fn expect_config(&self, current: u64) -> Result<(), RecordError> {
        if self.header.config_hash != current {
            return Err(RecordError::ConfigMismatch {
                recorded: self.header.config_hash,
                current,
            });
        }
        Ok(())
    }

    /// Read the next frame, or `None` if the stream is exhausted.
    ///
    /// Frames whose cell count disagrees with the header are rejected.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, RecordError> {
        let frame = decode_frame(&mut self.reader)?;
        if let Some(f) = &frame {
            check_cell_count(&self.header, f)?;
            self.frames_read += 1;
        }
        Ok(frame)
    }

    /// Number of frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Convert into a frame iterator.
    pub fn frames(self) -> FrameIter<R> {
        FrameIter {
            reader: self.reader,
            header: self.header,
            done: false,
        }
    }
}

fn check_cell_count(header: &SolutionHeader, frame: &Frame) -> Result<(), RecordError> {
    let found = frame.quantities.len() as u64;
    if found != header.cell_count {
        return Err(RecordError::CellCountMismatch {
            expected: header.cell_count,
            found,
        });
    }
    Ok(())
}

/// Iterator adapter over recorded frames. Stops after the first error.
pub struct FrameIter<R: Read> {
    reader: R,
    header: SolutionHeader,
    done: bool,
}

impl<R: Read> FrameIter<R> {
    /// The file header.
    pub fn header(&self) -> &SolutionHeader {
        &self.header
    }
}

impl<R: Read> Iterator for FrameIter<R> {
    type Item = Result<Frame, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match decode_frame(&mut self.reader) {
            Ok(Some(frame)) => check_cell_count(&self.header, &frame).map(|()| Some(frame)),
            other => other,
        };
        match item {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::SolutionWriter;
    use slick_test_utils::MockSnapshot;

    fn write(frames: u64, cells: usize) -> Vec<u8> {
        let header = SolutionHeader::new(99, cells as u64, 0.0, 0.1);
        let mut writer = SolutionWriter::new(Vec::new(), &header).unwrap();
        for k in 0..frames {
            let snap = MockSnapshot::new(k, k as f64 * 0.1, vec![k as f64; cells]);
            writer.write_snapshot(&snap).unwrap();
        }
        writer.into_inner()
    }

    #[test]
    fn roundtrip_write_read_frames() {
        let buf = write(5, 4);
        let mut reader = SolutionReader::open(buf.as_slice()).unwrap();
        assert_eq!(reader.header().cell_count, 4);
        let mut steps = Vec::new();
        while let Some(frame) = reader.next_frame().unwrap() {
            assert_eq!(frame.quantities, vec![frame.step as f64; 4]);
            steps.push(frame.step);
        }
        assert_eq!(steps, vec![0, 1, 2, 3, 4]);
        assert_eq!(reader.frames_read(), 5);
    }

    #[test]
    fn header_only_file_has_no_frames() {
        let buf = write(0, 2);
        let reader = SolutionReader::open(buf.as_slice()).unwrap();
        assert_eq!(reader.frames().count(), 0);
    }

    #[test]
    fn config_check() {
        let buf = write(1, 2);
        let reader = SolutionReader::open(buf.as_slice()).unwrap();
        assert!(reader.expect_config(99).is_ok());
        match reader.expect_config(100) {
            Err(RecordError::ConfigMismatch {
                recorded: 99,
                current: 100,
            }) => {}
            other => panic!("expected ConfigMismatch, got {other:?}"),
        }
    }

    #[test]
    fn iterator_stops_after_truncation() {
        let mut buf = write(3, 2);
        buf.truncate(buf.len() - 4);
        let results: Vec<_> = SolutionReader::open(buf.as_slice())
            .unwrap()
            .frames()
            .collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(matches!(results[2], Err(RecordError::MalformedFrame { .. })));
    }

    #[test]
    fn header_cell_count_enforced_on_read() {
        let header = SolutionHeader::new(0, 3, 0.0, 0.1);
        let mut writer = SolutionWriter::new(Vec::new(), &header).unwrap();
        writer
            .write_frame(&Frame {
                step: 0,
                time: 0.0,
                quantities: vec![1.0],
                snapshot_hash: 0,
            })
            .unwrap();
        let buf = writer.into_inner();
        let mut reader = SolutionReader::open(buf.as_slice()).unwrap();
        assert!(matches!(
            reader.next_frame(),
            Err(RecordError::CellCountMismatch { .. })
        ));
    }
}
