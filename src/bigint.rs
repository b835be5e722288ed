//! Fixed-width two's-complement packing of arbitrary-precision integers, and
//! the 128/256-bit integer records built from consecutive hyper slots.

use crate::convention::{XdrDecode, XdrEncode};
use crate::cursor::ByteCursor;
use crate::encode::XdrWriter;
use crate::error::{Error, Result};
use num_bigint::{BigInt, Sign};
use std::io::Write;

/// Project `value` onto exactly `width` big-endian bytes.
///
/// Signed values use two's complement and are sign-extended with `0xFF`;
/// non-negative values are left-padded with `0x00`. Unsigned encodings reject
/// negative values.
///
/// ```rust
/// use ledger_xdr::bigint::encode_fixed_width_bigint;
/// use num_bigint::BigInt;
///
/// let bytes = encode_fixed_width_bigint(&BigInt::from(-1), 8, true).unwrap();
/// assert_eq!(bytes, [0xFF; 8]);
/// ```
pub fn encode_fixed_width_bigint(value: &BigInt, width: usize, signed: bool) -> Result<Vec<u8>> {
    let negative = value.sign() == Sign::Minus;
    if negative && !signed {
        return Err(Error::IntegerOutOfRange { width });
    }

    let mut bytes = if signed {
        value.to_signed_bytes_be()
    } else {
        value.to_bytes_be().1
    };

    // Drop redundant leading sign bytes until the value fits. A negative value
    // always keeps at least one byte; only zero has an empty encoding.
    let fill = if negative { 0xFF } else { 0x00 };
    let mut skip = 0;
    while bytes.len() - skip > width && bytes[skip] == fill {
        let next_sign = match bytes.get(skip + 1) {
            Some(b) => b & 0x80 != 0,
            None if negative => break,
            None => false,
        };
        if signed && next_sign != negative {
            break;
        }
        skip += 1;
    }
    bytes.drain(..skip);

    if bytes.len() > width {
        tracing::debug!(width, signed, "integer does not fit fixed width");
        return Err(Error::IntegerOutOfRange { width });
    }

    let mut out = vec![fill; width - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}

/// Inverse of [`encode_fixed_width_bigint`]. When `signed`, the top bit of the
/// first byte is the sign.
pub fn decode_fixed_width_bigint(bytes: &[u8], signed: bool) -> BigInt {
    if signed {
        BigInt::from_signed_bytes_be(bytes)
    } else {
        BigInt::from_bytes_be(Sign::Plus, bytes)
    }
}

/// 256-bit unsigned integer carried as opaque bytes.
pub type Uint256 = [u8; 32];

/// 32-byte hash, also fixed opaque.
pub type Hash = [u8; 32];

macro_rules! hyper_parts {
    (
        $(#[$meta:meta])*
        $name:ident, width = $width:literal, signed = $signed:literal,
        { $first:ident: $first_ty:ty $(, $rest:ident)* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name {
            pub $first: $first_ty,
            $(pub $rest: u64,)*
        }

        impl $name {
            pub const WIDTH: usize = $width;

            /// Big-endian two's-complement bytes of the whole value.
            pub fn to_be_bytes(&self) -> [u8; $width] {
                let mut out = [0u8; $width];
                let mut chunks = out.chunks_exact_mut(8);
                if let Some(c) = chunks.next() {
                    c.copy_from_slice(&self.$first.to_be_bytes());
                }
                $(
                    if let Some(c) = chunks.next() {
                        c.copy_from_slice(&self.$rest.to_be_bytes());
                    }
                )*
                out
            }

            pub fn from_be_bytes(bytes: [u8; $width]) -> Self {
                let mut slots = bytes.chunks_exact(8).map(|c| {
                    let mut b = [0u8; 8];
                    b.copy_from_slice(c);
                    b
                });
                let mut next = || slots.next().unwrap_or_default();
                $name {
                    $first: <$first_ty>::from_be_bytes(next()),
                    $($rest: u64::from_be_bytes(next()),)*
                }
            }

            pub fn to_bigint(&self) -> BigInt {
                decode_fixed_width_bigint(&self.to_be_bytes(), $signed)
            }
        }

        impl TryFrom<&BigInt> for $name {
            type Error = Error;

            fn try_from(value: &BigInt) -> Result<Self> {
                let bytes = encode_fixed_width_bigint(value, $width, $signed)?;
                let mut fixed = [0u8; $width];
                fixed.copy_from_slice(&bytes);
                Ok($name::from_be_bytes(fixed))
            }
        }

        impl From<$name> for BigInt {
            fn from(v: $name) -> BigInt {
                v.to_bigint()
            }
        }

        impl XdrEncode for $name {
            fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
                w.write_all(&self.to_be_bytes())
            }
        }

        impl XdrDecode for $name {
            fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
                let mut fixed = [0u8; $width];
                fixed.copy_from_slice(cursor.read_fixed($width)?);
                Ok($name::from_be_bytes(fixed))
            }
        }
    };
}

hyper_parts!(
    /// Signed 128-bit integer as a signed high hyper and unsigned low hyper.
    Int128Parts, width = 16, signed = true, { hi: i64, lo }
);

hyper_parts!(
    UInt128Parts, width = 16, signed = false, { hi: u64, lo }
);

hyper_parts!(
    /// Signed 256-bit integer as four hypers, most significant first. Only the
    /// top slot carries the sign.
    Int256Parts, width = 32, signed = true, { hi_hi: i64, hi_lo, lo_hi, lo_lo }
);

hyper_parts!(
    UInt256Parts, width = 32, signed = false, { hi_hi: u64, hi_lo, lo_hi, lo_lo }
);

impl From<i128> for Int128Parts {
    fn from(v: i128) -> Self {
        Int128Parts::from_be_bytes(v.to_be_bytes())
    }
}

impl From<Int128Parts> for i128 {
    fn from(v: Int128Parts) -> i128 {
        i128::from_be_bytes(v.to_be_bytes())
    }
}

impl From<u128> for UInt128Parts {
    fn from(v: u128) -> Self {
        UInt128Parts::from_be_bytes(v.to_be_bytes())
    }
}

impl From<UInt128Parts> for u128 {
    fn from(v: UInt128Parts) -> u128 {
        u128::from_be_bytes(v.to_be_bytes())
    }
}
