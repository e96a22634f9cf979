//! Binary encode/decode for solution files.
//!
//! All integers and floats are little-endian; floats are stored by bit
//! pattern so values round-trip exactly. Strings are prefixed with a `u32`
//! length. There is no compression or padding.

use std::io::{ErrorKind, Read, Write};

use crate::error::RecordError;
use crate::types::{Frame, SolutionHeader};
use crate::{FORMAT_VERSION, MAGIC};

// ── Primitive writers ──────────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), RecordError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), RecordError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), RecordError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), RecordError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a length-prefixed UTF-8 string (u32 length + bytes).
pub fn write_length_prefixed_str(w: &mut dyn Write, s: &str) -> Result<(), RecordError> {
    write_u32_le(w, s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

// ── Primitive readers ──────────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, RecordError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, RecordError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, RecordError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub fn read_f64_le(r: &mut dyn Read) -> Result<f64, RecordError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// Read a length-prefixed UTF-8 string.
pub fn read_length_prefixed_str(r: &mut dyn Read) -> Result<String, RecordError> {
    let len = read_u32_le(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| RecordError::MalformedFrame {
        detail: format!("invalid UTF-8 string: {e}"),
    })
}

// ── Header ─────────────────────────────────────────────────────────

/// Encode the file header (magic, version, run parameters).
pub fn encode_header(w: &mut dyn Write, header: &SolutionHeader) -> Result<(), RecordError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    write_u64_le(w, header.config_hash)?;
    write_u64_le(w, header.cell_count)?;
    write_f64_le(w, header.t_origin)?;
    write_f64_le(w, header.dt)?;
    write_length_prefixed_str(w, &header.version)?;
    Ok(())
}

/// Decode and validate the file header.
pub fn decode_header(r: &mut dyn Read) -> Result<SolutionHeader, RecordError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(RecordError::InvalidMagic);
    }

    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(RecordError::UnsupportedVersion { found: version });
    }

    Ok(SolutionHeader {
        config_hash: read_u64_le(r)?,
        cell_count: read_u64_le(r)?,
        t_origin: read_f64_le(r)?,
        dt: read_f64_le(r)?,
        version: read_length_prefixed_str(r)?,
    })
}

// ── Frames ─────────────────────────────────────────────────────────

/// Encode one frame.
pub fn encode_frame(w: &mut dyn Write, frame: &Frame) -> Result<(), RecordError> {
    write_u64_le(w, frame.step)?;
    write_f64_le(w, frame.time)?;
    write_u32_le(w, frame.quantities.len() as u32)?;
    for &q in &frame.quantities {
        write_f64_le(w, q)?;
    }
    write_u64_le(w, frame.snapshot_hash)?;
    Ok(())
}

/// Decode one frame, or `None` at a clean end of stream.
///
/// A stream that ends partway through a frame is malformed.
pub fn decode_frame(r: &mut dyn Read) -> Result<Option<Frame>, RecordError> {
    // Read the step field byte-by-byte to tell a clean EOF (zero bytes)
    // from truncation (1-7 bytes).
    let mut step_buf = [0u8; 8];
    let mut filled = 0;
    while filled < 8 {
        match r.read(&mut step_buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(RecordError::MalformedFrame {
                    detail: format!("truncated frame header: got {filled} of 8 bytes for step"),
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(RecordError::Io(e)),
        }
    }
    let step = u64::from_le_bytes(step_buf);

    match decode_frame_body(r, step) {
        Ok(frame) => Ok(Some(frame)),
        Err(RecordError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => {
            Err(RecordError::MalformedFrame {
                detail: format!("frame for step {step} is truncated"),
            })
        }
        Err(e) => Err(e),
    }
}

fn decode_frame_body(r: &mut dyn Read, step: u64) -> Result<Frame, RecordError> {
    let time = read_f64_le(r)?;
    let n = read_u32_le(r)? as usize;
    let mut quantities = Vec::with_capacity(n.min(1 << 20));
    for _ in 0..n {
        quantities.push(read_f64_le(r)?);
    }
    let snapshot_hash = read_u64_le(r)?;
    Ok(Frame {
        step,
        time,
        quantities,
        snapshot_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> SolutionHeader {
        SolutionHeader::new(0x1234, 3, 0.0, 0.01)
    }

    fn frame(step: u64) -> Frame {
        Frame {
            step,
            time: step as f64 * 0.01,
            quantities: vec![0.1, 1.0 / 3.0, f64::MIN_POSITIVE],
            snapshot_hash: 42,
        }
    }

    #[test]
    fn header_roundtrip() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        assert_eq!(&buf[..4], b"SLCK");
        let decoded = decode_header(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, header());
    }

    #[test]
    fn frame_values_are_bit_exact() {
        let mut buf = Vec::new();
        encode_frame(&mut buf, &frame(7)).unwrap();
        let decoded = decode_frame(&mut buf.as_slice()).unwrap().unwrap();
        assert_eq!(decoded, frame(7));
        for (a, b) in decoded.quantities.iter().zip(&frame(7).quantities) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn empty_stream_is_clean_eof() {
        let mut empty: &[u8] = &[];
        assert!(decode_frame(&mut empty).unwrap().is_none());
    }

    #[test]
    fn bad_magic_rejected() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        buf[0] = b'X';
        assert!(matches!(
            decode_header(&mut buf.as_slice()),
            Err(RecordError::InvalidMagic)
        ));
    }

    #[test]
    fn future_version_rejected() {
        let mut buf = Vec::new();
        encode_header(&mut buf, &header()).unwrap();
        buf[4] = 99;
        match decode_header(&mut buf.as_slice()) {
            Err(RecordError::UnsupportedVersion { found: 99 }) => {}
            other => panic!("expected UnsupportedVersion(99), got {other:?}"),
        }
    }

    #[test]
    fn truncated_step_is_malformed() {
        let mut buf = Vec::new();
        encode_frame(&mut buf, &frame(1)).unwrap();
        let mut cut: &[u8] = &buf[..5];
        assert!(matches!(
            decode_frame(&mut cut),
            Err(RecordError::MalformedFrame { .. })
        ));
    }

    #[test]
    fn truncated_body_is_malformed() {
        let mut buf = Vec::new();
        encode_frame(&mut buf, &frame(1)).unwrap();
        let mut cut: &[u8] = &buf[..buf.len() - 3];
        match decode_frame(&mut cut) {
            Err(RecordError::MalformedFrame { detail }) => assert!(detail.contains("step 1")),
            other => panic!("expected MalformedFrame, got {other:?}"),
        }
    }
}
