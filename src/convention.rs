//! The structural conventions every XDR record is built from.
//!
//! Records implement [`XdrEncode`] and [`XdrDecode`] by calling the field
//! codecs in schema order. Two framings recur everywhere:
//!
//! - **Optional / array framing**: `Option<T>` is a 4-byte 0/1 flag followed by
//!   the payload when present; `Vec<T>` and [`VecM`] are a non-negative 4-byte
//!   count followed by that many elements.
//! - **Union dispatch**: a 4-byte discriminant selects exactly one arm. The
//!   set of arms is closed; any other discriminant fails with
//!   [`Error::UnknownDiscriminant`]. [`xdr_union!`](crate::xdr_union) generates
//!   the enum and both codec impls.
//!
//! ```rust
//! use ledger_xdr::{XdrDecode, XdrEncode, xdr_union};
//!
//! xdr_union! {
//!     #[derive(Debug, PartialEq)]
//!     pub enum Memo {
//!         None = 0,
//!         Id(u64) = 2,
//!         Hash([u8; 32]) = 3,
//!     }
//! }
//!
//! let bytes = Memo::Id(7).to_xdr().unwrap();
//! assert_eq!(bytes, [0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 7]);
//! assert_eq!(Memo::from_xdr(&bytes).unwrap(), Memo::Id(7));
//! assert!(Memo::from_xdr(&[0, 0, 0, 1]).is_err());
//! ```

use crate::config::Limits;
use crate::cursor::ByteCursor;
use crate::encode::XdrWriter;
use crate::error::{Error, Result};
use std::io::Write;
use std::ops::Deref;

/// A value with an XDR encoding.
pub trait XdrEncode {
    /// Append this value's encoding to `w`.
    fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()>;

    /// Encode into a freshly allocated buffer.
    fn to_xdr(&self) -> Result<Vec<u8>> {
        let mut w = XdrWriter::new(Vec::new());
        self.encode_to(&mut w)?;
        Ok(w.into_inner())
    }

    fn to_xdr_base64(&self) -> Result<String> {
        Ok(crate::transport::encode_base64(&self.to_xdr()?))
    }
}

/// A value that can be decoded from XDR.
pub trait XdrDecode: Sized {
    /// Read one value at the cursor's position.
    fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self>;

    /// Decode a value that must span the whole of `bytes`.
    fn from_xdr(bytes: &[u8]) -> Result<Self> {
        Self::from_xdr_with_limits(bytes, Limits::none())
    }

    fn from_xdr_with_limits(bytes: &[u8], limits: Limits) -> Result<Self> {
        tracing::trace!(len = bytes.len(), "decoding XDR value");
        let mut cursor = ByteCursor::with_limits(bytes, limits);
        let value = Self::decode_from(&mut cursor)?;
        cursor.finish()?;
        Ok(value)
    }

    /// Decode a value from the front of `bytes`, returning the unread tail.
    fn from_xdr_partial(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let mut cursor = ByteCursor::new(bytes);
        let value = Self::decode_from(&mut cursor)?;
        Ok((value, cursor.remaining()))
    }

    fn from_xdr_base64(text: &str) -> Result<Self> {
        Self::from_xdr(&crate::transport::decode_base64(text)?)
    }
}

// ── Scalars ────────────────────────────────────────────────────────────────

macro_rules! scalar_codec {
    ($($t:ty => $write:ident, $read:ident;)*) => {
        $(
            impl XdrEncode for $t {
                fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
                    w.$write(*self)
                }
            }

            impl XdrDecode for $t {
                fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
                    cursor.$read()
                }
            }
        )*
    };
}

scalar_codec! {
    i32 => write_i32, read_i32;
    u32 => write_u32, read_u32;
    i64 => write_i64, read_i64;
    u64 => write_u64, read_u64;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
    bool => write_bool, read_bool;
}

/// XDR void.
impl XdrEncode for () {
    fn encode_to<W: Write>(&self, _w: &mut XdrWriter<W>) -> Result<()> {
        Ok(())
    }
}

impl XdrDecode for () {
    fn decode_from(_cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(())
    }
}

/// Fixed-length opaque: `N` bytes plus padding, no length prefix.
impl<const N: usize> XdrEncode for [u8; N] {
    fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        w.write_padded(self)
    }
}

impl<const N: usize> XdrDecode for [u8; N] {
    fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let mut out = [0u8; N];
        out.copy_from_slice(cursor.read_opaque_fixed_padded(N)?);
        Ok(out)
    }
}

/// Unbounded UTF-8 string.
impl XdrEncode for String {
    fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        w.write_string(self, None)
    }
}

impl XdrDecode for String {
    fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(cursor.read_string(None)?.to_owned())
    }
}

impl<T: XdrEncode> XdrEncode for Box<T> {
    fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        (**self).encode_to(w)
    }
}

impl<T: XdrDecode> XdrDecode for Box<T> {
    fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        T::decode_from(cursor).map(Box::new)
    }
}

// ── Optional / array framing ───────────────────────────────────────────────

impl<T: XdrEncode> XdrEncode for Option<T> {
    fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        match self {
            None => w.write_bool(false),
            Some(v) => {
                w.write_bool(true)?;
                v.encode_to(w)
            }
        }
    }
}

impl<T: XdrDecode> XdrDecode for Option<T> {
    fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        cursor.nested(|c| {
            if c.read_bool()? {
                T::decode_from(c).map(Some)
            } else {
                Ok(None)
            }
        })
    }
}

fn encode_elements<T: XdrEncode, W: Write>(items: &[T], w: &mut XdrWriter<W>) -> Result<()> {
    w.write_count(items.len())?;
    items.iter().try_for_each(|item| item.encode_to(w))
}

fn decode_elements<T: XdrDecode>(cursor: &mut ByteCursor<'_>, max: Option<u32>) -> Result<Vec<T>> {
    cursor.nested(|c| {
        let count = c.read_count(max)?;
        // The count is untrusted; never reserve more than the input could hold.
        let mut items = Vec::with_capacity(count.min(c.remaining().len() / 4));
        for _ in 0..count {
            items.push(T::decode_from(c)?);
        }
        Ok(items)
    })
}

/// Variable-length array with no bound other than the cursor limits.
impl<T: XdrEncode> XdrEncode for Vec<T> {
    fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        encode_elements(self, w)
    }
}

impl<T: XdrDecode> XdrDecode for Vec<T> {
    fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        decode_elements(cursor, None)
    }
}

fn check_max(len: usize, max: u32) -> Result<()> {
    match u32::try_from(len) {
        Ok(got) if got <= max => Ok(()),
        Ok(got) => Err(Error::LengthExceedsMaximum { max, got }),
        Err(_) => Err(Error::ValueTooLong(len)),
    }
}

/// Variable-length array `T<MAX>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VecM<T, const MAX: u32>(Vec<T>);

impl<T, const MAX: u32> VecM<T, MAX> {
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T, const MAX: u32> Deref for VecM<T, MAX> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T, const MAX: u32> TryFrom<Vec<T>> for VecM<T, MAX> {
    type Error = Error;

    fn try_from(items: Vec<T>) -> Result<Self> {
        check_max(items.len(), MAX)?;
        Ok(VecM(items))
    }
}

impl<T: XdrEncode, const MAX: u32> XdrEncode for VecM<T, MAX> {
    fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        encode_elements(&self.0, w)
    }
}

impl<T: XdrDecode, const MAX: u32> XdrDecode for VecM<T, MAX> {
    fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        decode_elements(cursor, Some(MAX)).map(VecM)
    }
}

/// Variable-length opaque `opaque<MAX>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BytesM<const MAX: u32>(Vec<u8>);

impl<const MAX: u32> BytesM<MAX> {
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl<const MAX: u32> Deref for BytesM<MAX> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl<const MAX: u32> TryFrom<Vec<u8>> for BytesM<MAX> {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        check_max(bytes.len(), MAX)?;
        Ok(BytesM(bytes))
    }
}

impl<const MAX: u32> TryFrom<&[u8]> for BytesM<MAX> {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        bytes.to_vec().try_into()
    }
}

impl<const MAX: u32> XdrEncode for BytesM<MAX> {
    fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        w.write_variable_opaque(&self.0, Some(MAX))
    }
}

impl<const MAX: u32> XdrDecode for BytesM<MAX> {
    fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(BytesM(cursor.read_variable_opaque(Some(MAX))?.to_vec()))
    }
}

/// `string<MAX>`. The contents are kept as raw bytes since ledger strings
/// are not guaranteed to be UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StringM<const MAX: u32>(Vec<u8>);

impl<const MAX: u32> StringM<MAX> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_utf8_string(&self) -> Result<String> {
        String::from_utf8(self.0.clone()).map_err(|_| Error::InvalidUtf8)
    }

    /// Lossy view for display and logs.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl<const MAX: u32> TryFrom<Vec<u8>> for StringM<MAX> {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        check_max(bytes.len(), MAX)?;
        Ok(StringM(bytes))
    }
}

impl<const MAX: u32> TryFrom<&str> for StringM<MAX> {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.as_bytes().to_vec().try_into()
    }
}

impl<const MAX: u32> XdrEncode for StringM<MAX> {
    fn encode_to<W: Write>(&self, w: &mut XdrWriter<W>) -> Result<()> {
        w.write_variable_opaque(&self.0, Some(MAX))
    }
}

impl<const MAX: u32> XdrDecode for StringM<MAX> {
    fn decode_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(StringM(cursor.read_variable_opaque(Some(MAX))?.to_vec()))
    }
}

// ── Union dispatch ─────────────────────────────────────────────────────────

/// A discriminated union with a closed set of arms.
pub trait XdrUnion {
    /// Every discriminant with an arm, in declaration order.
    const DISCRIMINANTS: &'static [i32];

    /// Discriminant of the populated arm.
    fn discriminant(&self) -> i32;
}

pub fn read_discriminant(cursor: &mut ByteCursor<'_>) -> Result<i32> {
    cursor.read_i32()
}

/// Error for a discriminant outside the arms of `type_name`.
pub fn unknown_discriminant(type_name: &'static str, value: i32) -> Error {
    tracing::debug!(type_name, value, "unknown union discriminant");
    Error::UnknownDiscriminant { type_name, value }
}

/// Declare an XDR union: a Rust enum whose arms carry explicit `i32`
/// discriminants and at most one payload each. Arms without a payload are
/// void.
///
/// Generates the enum plus [`XdrUnion`], [`XdrEncode`] and [`XdrDecode`]
/// impls. Decoding any discriminant not listed fails with
/// [`Error::UnknownDiscriminant`].
#[macro_export]
macro_rules! xdr_union {
    (@pat $name:ident $variant:ident $bind:ident) => { $name::$variant };
    (@pat $name:ident $variant:ident $bind:ident $payload:ty) => { $name::$variant($bind) };

    (@encode $w:ident $bind:ident) => { Ok(()) };
    (@encode $w:ident $bind:ident $payload:ty) => {
        $crate::XdrEncode::encode_to($bind, $w)
    };

    (@decode $name:ident $variant:ident $c:ident) => { $name::$variant };
    (@decode $name:ident $variant:ident $c:ident $payload:ty) => {
        $name::$variant(<$payload as $crate::XdrDecode>::decode_from($c)?)
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$arm_meta:meta])*
                $variant:ident $( ( $payload:ty ) )? = $disc:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$arm_meta])*
                $variant $( ($payload) )?,
            )+
        }

        impl $crate::XdrUnion for $name {
            const DISCRIMINANTS: &'static [i32] = &[$($disc),+];

            fn discriminant(&self) -> i32 {
                match self {
                    $( $crate::xdr_union!(@pat $name $variant _v $($payload)?) => $disc, )+
                }
            }
        }

        impl $crate::XdrEncode for $name {
            fn encode_to<W: ::std::io::Write>(
                &self,
                w: &mut $crate::XdrWriter<W>,
            ) -> $crate::Result<()> {
                w.write_discriminant($crate::XdrUnion::discriminant(self))?;
                match self {
                    $(
                        $crate::xdr_union!(@pat $name $variant v $($payload)?) => {
                            $crate::xdr_union!(@encode w v $($payload)?)
                        }
                    )+
                }
            }
        }

        impl $crate::XdrDecode for $name {
            fn decode_from(cursor: &mut $crate::ByteCursor<'_>) -> $crate::Result<Self> {
                cursor.nested(|c| {
                    match $crate::read_discriminant(c)? {
                        $( $disc => Ok($crate::xdr_union!(@decode $name $variant c $($payload)?)), )+
                        other => Err($crate::unknown_discriminant(stringify!($name), other)),
                    }
                })
            }
        }
    };
}
