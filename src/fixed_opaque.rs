//! `#[serde(with = "ledger_xdr::fixed_opaque")]` for `[u8; N]` fields.
//!
//! Hashes, public keys, asset codes and signature hints are fixed opaque in
//! the ledger schema: `N` raw bytes and 0-3 zero bytes of padding, with no
//! length prefix. Plain serde would treat `[u8; N]` as a tuple of `N` integers
//! (4 bytes each on the wire), so such fields opt in to this module.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use ledger_xdr::{from_bytes, to_bytes};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! pub struct AlphaNum4 {
//!     #[serde(with = "ledger_xdr::fixed_opaque")]
//!     pub asset_code: [u8; 4],
//!     #[serde(with = "ledger_xdr::fixed_opaque")]
//!     pub issuer: [u8; 32],
//! }
//!
//! let asset = AlphaNum4 { asset_code: *b"USD\0", issuer: [7; 32] };
//! let bytes = to_bytes(&asset).unwrap();
//! assert_eq!(bytes.len(), 36);
//! assert_eq!(&bytes[..4], b"USD\0");
//! assert_eq!(from_bytes::<AlphaNum4>(&bytes).unwrap(), asset);
//! ```
//!
//! Any `N` works, including sizes serde has no array impls for. Other serde
//! formats see a newtype around a byte string.

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserializer, Serialize, Serializer};
use std::fmt;

/// Newtype name the XDR serializer and deserializer watch for.
pub(crate) const FIXED_OPAQUE_TOKEN: &str = "$ledger_xdr::FixedOpaque";

/// Raw bytes handed to the serializer under [`FIXED_OPAQUE_TOKEN`].
struct RawBytes<'a>(&'a [u8]);

impl Serialize for RawBytes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

pub fn serialize<const N: usize, S: Serializer>(
    value: &[u8; N],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_newtype_struct(FIXED_OPAQUE_TOKEN, &RawBytes(value))
}

pub fn deserialize<'de, const N: usize, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<[u8; N], D::Error> {
    deserializer.deserialize_newtype_struct(FIXED_OPAQUE_TOKEN, ArrayVisitor::<N>)
}

struct ArrayVisitor<const N: usize>;

impl<'de, const N: usize> Visitor<'de> for ArrayVisitor<N> {
    type Value = [u8; N];

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{N} bytes of fixed opaque data")
    }

    // The XDR deserializer answers a tuple request with the N raw bytes.
    fn visit_newtype_struct<D: Deserializer<'de>>(self, de: D) -> Result<[u8; N], D::Error> {
        de.deserialize_tuple(N, self)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<[u8; N], E> {
        v.try_into().map_err(|_| E::invalid_length(v.len(), &self))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<[u8; N], E> {
        self.visit_bytes(&v)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<[u8; N], A::Error> {
        let mut out = [0u8; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(i, &self))?;
        }
        Ok(out)
    }
}
