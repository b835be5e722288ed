//! XDR encode side: the append-only [`XdrWriter`] and the free `encode_*`
//! functions that produce the bytes of a single scalar.
//!
//! ## Wire format summary
//! - All values are big-endian (network byte order)
//! - Integers: 4 bytes (signed or unsigned), Hyper: 8 bytes
//! - Booleans: 4-byte 0 or 1
//! - Fixed opaque: data + 0–3 zero-padding bytes, no length prefix
//! - Variable opaque / strings: 4-byte length prefix + data + 0–3 zero-padding bytes
//! - Arrays: 4-byte count prefix + elements
//! - Unions: 4-byte discriminant + the selected arm

use crate::cursor::padding_len;
use crate::error::{Error, Result};
use num_bigint::BigInt;
use std::io::{self, Read, Write};

/// Appends XDR-encoded values to any `W: Write`.
///
/// ```rust
/// use ledger_xdr::XdrWriter;
///
/// let mut w = XdrWriter::new(Vec::new());
/// w.write_u32(1).unwrap();
/// w.write_string("ab", None).unwrap();
/// assert_eq!(w.into_inner(), [0, 0, 0, 1, 0, 0, 0, 2, b'a', b'b', 0, 0]);
/// ```
pub struct XdrWriter<W: Write> {
    writer: W,
}

impl<W: Write> XdrWriter<W> {
    pub fn new(writer: W) -> Self {
        XdrWriter { writer }
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.writer.write_all(bytes)?)
    }

    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.write_all(&v.to_be_bytes())
    }

    /// Two's-complement bytes, most significant first.
    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.write_all(&v.to_be_bytes())
    }

    pub fn write_u64(&mut self, v: u64) -> Result<()> {
        self.write_all(&v.to_be_bytes())
    }

    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        self.write_all(&v.to_be_bytes())
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        self.write_all(&v.to_be_bytes())
    }

    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        self.write_all(&v.to_be_bytes())
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_u32(if v { 1 } else { 0 })
    }

    /// Write `bytes` followed by enough zero bytes to reach a 4-byte boundary.
    pub fn write_padded(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_all(bytes)?;
        let pad = [0u8; 3];
        self.write_all(&pad[..padding_len(bytes.len())])
    }

    /// Fixed-length opaque of `expected_len` bytes.
    ///
    /// A shorter `value` is right-padded with zeros up to `expected_len` when
    /// `allow_pad` is set; otherwise any length difference is an error.
    pub fn write_opaque_fixed(
        &mut self,
        value: &[u8],
        expected_len: usize,
        allow_pad: bool,
    ) -> Result<()> {
        let actual = value.len();
        if actual > expected_len || (actual != expected_len && !allow_pad) {
            return Err(Error::LengthMismatch {
                expected: expected_len,
                actual,
            });
        }
        self.write_all(value)?;
        let zeros = (expected_len - actual + padding_len(expected_len)) as u64;
        io::copy(&mut io::repeat(0).take(zeros), &mut self.writer)?;
        Ok(())
    }

    /// XDR variable-length opaque: 4-byte length + padded data.
    pub fn write_variable_opaque(&mut self, bytes: &[u8], max: Option<u32>) -> Result<()> {
        let len = u32::try_from(bytes.len()).map_err(|_| Error::ValueTooLong(bytes.len()))?;
        if let Some(max) = max {
            if len > max {
                return Err(Error::LengthExceedsMaximum { max, got: len });
            }
        }
        self.write_u32(len)?;
        self.write_padded(bytes)
    }

    pub fn write_string(&mut self, s: &str, max: Option<u32>) -> Result<()> {
        self.write_variable_opaque(s.as_bytes(), max)
    }

    /// Array element count, which must fit a non-negative 32-bit signed integer.
    pub fn write_count(&mut self, count: usize) -> Result<()> {
        let count = i32::try_from(count).map_err(|_| Error::ValueTooLong(count))?;
        self.write_i32(count)
    }

    /// Union discriminant.
    pub fn write_discriminant(&mut self, discriminant: i32) -> Result<()> {
        self.write_i32(discriminant)
    }

    pub fn write_fixed_width_bigint(
        &mut self,
        value: &BigInt,
        width: usize,
        signed: bool,
    ) -> Result<()> {
        let bytes = crate::bigint::encode_fixed_width_bigint(value, width, signed)?;
        self.write_all(&bytes)
    }
}

// ── Free scalar encoders ───────────────────────────────────────────────────

fn collect(f: impl FnOnce(&mut XdrWriter<Vec<u8>>) -> Result<()>) -> Result<Vec<u8>> {
    let mut w = XdrWriter::new(Vec::new());
    f(&mut w)?;
    Ok(w.into_inner())
}

pub fn encode_u32(v: u32) -> [u8; 4] {
    v.to_be_bytes()
}

pub fn encode_i32(v: i32) -> [u8; 4] {
    v.to_be_bytes()
}

pub fn encode_u64(v: u64) -> [u8; 8] {
    v.to_be_bytes()
}

pub fn encode_i64(v: i64) -> [u8; 8] {
    v.to_be_bytes()
}

pub fn encode_bool(v: bool) -> [u8; 4] {
    encode_u32(v as u32)
}

/// See [`XdrWriter::write_opaque_fixed`].
pub fn encode_opaque_fixed(value: &[u8], expected_len: usize, allow_pad: bool) -> Result<Vec<u8>> {
    collect(|w| w.write_opaque_fixed(value, expected_len, allow_pad))
}

pub fn encode_variable_opaque(value: &[u8]) -> Result<Vec<u8>> {
    collect(|w| w.write_variable_opaque(value, None))
}

pub fn encode_string(value: &str) -> Result<Vec<u8>> {
    collect(|w| w.write_string(value, None))
}
