//! Bounds-checked read cursor over an immutable XDR byte sequence.

use crate::config::Limits;
use crate::error::{Error, Result};
use num_bigint::BigInt;

/// Number of zero bytes that follow `n` bytes of data to reach a 4-byte boundary.
pub const fn padding_len(n: usize) -> usize {
    (4 - n % 4) % 4
}

/// Read cursor over a borrowed byte slice.
///
/// Every read checks the remaining length before moving the position, so a
/// failed read leaves the cursor where it was. All multi-byte values are read
/// big-endian.
///
/// ```rust
/// use ledger_xdr::ByteCursor;
///
/// let mut cur = ByteCursor::new(&[0, 0, 0, 2, b'a', b'b', 0, 0]);
/// assert_eq!(cur.read_string(None).unwrap(), "ab");
/// assert!(cur.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    input: &'a [u8],
    pos: usize,
    limits: Limits,
    depth: u32,
}

impl<'a> ByteCursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_limits(input, Limits::none())
    }

    pub fn with_limits(input: &'a [u8], limits: Limits) -> Self {
        ByteCursor {
            input,
            pos: 0,
            limits,
            depth: 0,
        }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying input.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// True once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos == self.input.len()
    }

    /// Returns the unconsumed portion of the input.
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Fails with [`Error::TrailingBytes`] unless the whole input was consumed.
    pub fn finish(&self) -> Result<()> {
        let left = self.input.len() - self.pos;
        if left != 0 {
            tracing::debug!(trailing = left, "input not fully consumed");
            return Err(Error::TrailingBytes(left));
        }
        Ok(())
    }

    /// Consume exactly `n` bytes.
    pub fn read_fixed(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = match self.pos.checked_add(n) {
            Some(end) if end <= self.input.len() => end,
            _ => {
                return Err(Error::UnexpectedEndOfData {
                    position: self.pos,
                    needed: n,
                });
            }
        };
        let slice = &self.input[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_fixed(N)?);
        Ok(out)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Unsigned hyper integer.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Hyper integer.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    /// A 4-byte integer restricted to 0 or 1.
    pub fn read_bool(&mut self) -> Result<bool> {
        let start = self.pos;
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            v => {
                self.pos = start;
                Err(Error::InvalidBooleanValue(v))
            }
        }
    }

    /// Exactly `n` bytes of fixed opaque data. Padding is not skipped; see
    /// [`skip_padding`](Self::skip_padding) and
    /// [`read_opaque_fixed_padded`](Self::read_opaque_fixed_padded).
    pub fn read_opaque_fixed(&mut self, n: usize) -> Result<&'a [u8]> {
        self.read_fixed(n)
    }

    /// Skip the 0–3 padding bytes that follow `data_len` bytes of data.
    /// Padding contents are not checked.
    pub fn skip_padding(&mut self, data_len: usize) -> Result<()> {
        self.read_fixed(padding_len(data_len)).map(|_| ())
    }

    /// `n` bytes of fixed opaque data followed by their padding.
    pub fn read_opaque_fixed_padded(&mut self, n: usize) -> Result<&'a [u8]> {
        let start = self.pos;
        let data = self.read_fixed(n)?;
        if let Err(e) = self.skip_padding(n) {
            self.pos = start;
            return Err(e);
        }
        Ok(data)
    }

    /// Validate a length or count against a per-call maximum and the cursor limits.
    pub fn check_len(&self, len: u32, max: Option<u32>) -> Result<()> {
        let max = max.map_or(self.limits.len, |m| m.min(self.limits.len));
        if len > max {
            tracing::debug!(len, max, position = self.pos, "length exceeds maximum");
            return Err(Error::LengthExceedsMaximum { max, got: len });
        }
        Ok(())
    }

    /// 4-byte length, that many bytes, then padding to a 4-byte boundary.
    pub fn read_variable_opaque(&mut self, max: Option<u32>) -> Result<&'a [u8]> {
        let start = self.pos;
        let result = self.read_u32().and_then(|len| {
            self.check_len(len, max)?;
            self.read_opaque_fixed_padded(len as usize)
        });
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    /// Same wire form as variable opaque, validated as UTF-8.
    pub fn read_string(&mut self, max: Option<u32>) -> Result<&'a str> {
        let start = self.pos;
        let bytes = self.read_variable_opaque(max)?;
        std::str::from_utf8(bytes).map_err(|_| {
            self.pos = start;
            Error::InvalidUtf8
        })
    }

    /// Array element count: a signed 32-bit value that must not be negative.
    pub fn read_count(&mut self, max: Option<u32>) -> Result<usize> {
        let start = self.pos;
        let count = self.read_i32()?;
        if count < 0 {
            tracing::debug!(count, position = start, "negative array count");
            self.pos = start;
            return Err(Error::NegativeLength(count));
        }
        if let Err(e) = self.check_len(count as u32, max) {
            self.pos = start;
            return Err(e);
        }
        Ok(count as usize)
    }

    /// Fixed-width two's-complement big integer of `width` bytes.
    pub fn read_fixed_width_bigint(&mut self, width: usize, signed: bool) -> Result<BigInt> {
        let bytes = self.read_fixed(width)?;
        Ok(crate::bigint::decode_fixed_width_bigint(bytes, signed))
    }

    /// Run `f` one nesting level deeper, enforcing [`Limits::depth`].
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.enter()?;
        let result = f(self);
        self.leave();
        result
    }

    pub(crate) fn enter(&mut self) -> Result<()> {
        if self.depth >= self.limits.depth {
            tracing::debug!(depth = self.depth, position = self.pos, "depth limit exceeded");
            return Err(Error::DepthLimitExceeded);
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }
}
