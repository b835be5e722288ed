//! # ledger-xdr
//!
//! The XDR (eXternal Data Representation, RFC 4506) codec core shared by every
//! record of a versioned ledger data model: ledger entries, transactions,
//! contract values and configuration settings.
//!
//! ## Overview
//!
//! All values are big-endian (network byte order), and every item occupies a
//! multiple of 4 bytes (padded with zeroes as needed). Decoding walks a
//! [`ByteCursor`] over the input; encoding appends to an [`XdrWriter`].
//! Records are built from the same few pieces:
//!
//! | Piece | XDR encoding |
//! |-------|--------------|
//! | `bool` | 4-byte unsigned int: 0 (false) or 1 (true), anything else rejected |
//! | `i32`, `u32` | 4-byte integer |
//! | `i64`, `u64` | 8-byte hyper integer |
//! | [`Int128Parts`] … [`UInt256Parts`] | 2 or 4 consecutive hypers, two's complement |
//! | `[u8; N]` | fixed opaque: N bytes + 0-3 zero-padding bytes |
//! | [`BytesM`], [`StringM`], `String` | 4-byte length + bytes + 0-3 zero-padding bytes |
//! | `Option<T>` | 4-byte bool flag + optional encoded T |
//! | `Vec<T>`, [`VecM`] | 4-byte non-negative count + encoded elements |
//! | `()` | 0 bytes (XDR void) |
//! | union ([`xdr_union!`]) | 4-byte discriminant + the selected arm |
//!
//! Types implement [`XdrEncode`] / [`XdrDecode`] by hand or through
//! [`xdr_union!`]. Records whose unions use the dense discriminants `0..n`
//! can instead derive serde traits and go through [`to_bytes`] /
//! [`from_bytes`].
//!
//! ## Example
//!
//! ```rust
//! use ledger_xdr::{ByteCursor, XdrDecode, XdrEncode, XdrWriter, Result};
//! use std::io::Write;
//!
//! #[derive(Debug, PartialEq)]
//! struct Price {
//!     n: i32,
//!     d: i32,
//! }
//!
//! impl XdrEncode for Price {
//!     fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
//!         self.n.encode_to(w)?;
//!         self.d.encode_to(w)
//!     }
//! }
//!
//! impl XdrDecode for Price {
//!     fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
//!         Ok(Price {
//!             n: i32::decode_from(cursor)?,
//!             d: i32::decode_from(cursor)?,
//!         })
//!     }
//! }
//!
//! let price = Price { n: 3, d: -2 };
//! let bytes = price.to_xdr().unwrap();
//! assert_eq!(bytes, [0, 0, 0, 3, 0xFF, 0xFF, 0xFF, 0xFE]);
//! assert_eq!(Price::from_xdr(&bytes).unwrap(), price);
//! ```

pub mod bigint;
pub mod config;
pub mod convention;
pub mod cursor;
pub mod de;
pub mod encode;
pub mod error;
pub mod fixed_opaque;
pub mod ser;
pub mod transport;

pub use bigint::{
    Hash, Int128Parts, Int256Parts, UInt128Parts, UInt256Parts, Uint256,
    decode_fixed_width_bigint, encode_fixed_width_bigint,
};
pub use config::Limits;
pub use convention::{
    BytesM, StringM, VecM, XdrDecode, XdrEncode, XdrUnion, read_discriminant,
    unknown_discriminant,
};
pub use cursor::ByteCursor;
pub use de::{Deserializer, from_bytes, from_bytes_partial, from_bytes_with_limits};
pub use encode::{
    XdrWriter, encode_bool, encode_i32, encode_i64, encode_opaque_fixed, encode_string,
    encode_u32, encode_u64, encode_variable_opaque,
};
pub use error::{Error, Result};
pub use ser::{Serializer, to_bytes, to_writer};
pub use transport::{decode_base64, encode_base64};

pub use serde::{Deserialize, Serialize};
