//! XDR Serializer (RFC 4506) for serde-derived records.
//!
//! The [`Serializer`] writes through an [`XdrWriter`], so it is generic over
//! any `W: std::io::Write` and produces exactly the bytes the
//! [`XdrEncode`](crate::XdrEncode) impls do for the same shapes.
//!
//! ## serde mapping
//! - Structs/Tuples: fields encoded consecutively, no length prefix
//! - Options: 4-byte bool flag (0=None, 1=Some) + optional value
//! - Sequences and maps: 4-byte count prefix + elements
//! - Enums: 4-byte discriminant (the variant index) + encoded arm

use crate::encode::XdrWriter;
use crate::error::{Error, Result};
use crate::fixed_opaque::FIXED_OPAQUE_TOKEN;
use serde::ser::{self, Impossible, Serialize};
use std::io::Write;

// ── Public entry points ────────────────────────────────────────────────────

/// Serialize `value` into a freshly allocated `Vec<u8>` of XDR bytes.
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut ser = Serializer::new(Vec::new());
    value.serialize(&mut ser)?;
    Ok(ser.into_writer())
}

/// Serialize `value` as XDR bytes, writing directly into `writer`.
pub fn to_writer<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<()> {
    let mut ser = Serializer::new(&mut writer);
    value.serialize(&mut ser)
}

// ── Serializer ─────────────────────────────────────────────────────────────

/// The XDR serializer.
///
/// ```rust
/// use ledger_xdr::ser::Serializer;
/// use serde::Serialize;
///
/// let mut buf = Vec::new();
/// let mut ser = Serializer::new(&mut buf);
/// 42u32.serialize(&mut ser).unwrap();
/// assert_eq!(buf, [0, 0, 0, 42]);
/// ```
pub struct Serializer<W: Write> {
    out: XdrWriter<W>,
}

impl<W: Write> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Serializer {
            out: XdrWriter::new(writer),
        }
    }

    /// Consume the serializer and return the inner writer.
    pub fn into_writer(self) -> W {
        self.out.into_inner()
    }

    fn variant(&mut self, variant_index: u32) -> Result<()> {
        let discriminant =
            i32::try_from(variant_index).map_err(|_| Error::ValueTooLong(variant_index as usize))?;
        self.out.write_discriminant(discriminant)
    }
}

// ── serde::Serializer impl ─────────────────────────────────────────────────

impl<'a, W: Write> ser::Serializer for &'a mut Serializer<W> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.out.write_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.out.write_i32(v as i32)
    }
    fn serialize_i16(self, v: i16) -> Result<()> {
        self.out.write_i32(v as i32)
    }
    fn serialize_i32(self, v: i32) -> Result<()> {
        self.out.write_i32(v)
    }
    /// Hyper integer
    fn serialize_i64(self, v: i64) -> Result<()> {
        self.out.write_i64(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.out.write_u32(v as u32)
    }
    fn serialize_u16(self, v: u16) -> Result<()> {
        self.out.write_u32(v as u32)
    }
    fn serialize_u32(self, v: u32) -> Result<()> {
        self.out.write_u32(v)
    }
    /// Unsigned hyper integer
    fn serialize_u64(self, v: u64) -> Result<()> {
        self.out.write_u64(v)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.out.write_f32(v)
    }
    fn serialize_f64(self, v: f64) -> Result<()> {
        self.out.write_f64(v)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.out.write_u32(v as u32)
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.out.write_string(v, None)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.out.write_variable_opaque(v, None)
    }

    fn serialize_none(self) -> Result<()> {
        self.out.write_bool(false)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<()> {
        self.out.write_bool(true)?;
        value.serialize(self)
    }

    /// XDR void: 0 bytes
    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        self.variant(variant_index)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<()> {
        if name == FIXED_OPAQUE_TOKEN {
            value.serialize(FixedOpaqueSerializer(self))
        } else {
            value.serialize(self)
        }
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<()> {
        self.variant(variant_index)?;
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.out.write_count(len.ok_or(Error::LengthRequired)?)?;
        Ok(self)
    }

    /// Fixed-length array or structure: elements without a length prefix
    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(self)
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.variant(variant_index)?;
        Ok(self)
    }

    /// Map → 4-byte pair count + alternating key/value pairs
    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        self.out.write_count(len.ok_or(Error::LengthRequired)?)?;
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.variant(variant_index)?;
        Ok(self)
    }
}

// ── Compound serializer impls ──────────────────────────────────────────────

macro_rules! forward_serialize_element {
    ($t:ty, $method:ident) => {
        impl<W: Write> $t for &mut Serializer<W> {
            type Ok = ();
            type Error = Error;
            fn $method<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
                value.serialize(&mut **self)
            }
            fn end(self) -> Result<()> {
                Ok(())
            }
        }
    };
}

macro_rules! forward_serialize_field {
    ($t:ty) => {
        impl<W: Write> $t for &mut Serializer<W> {
            type Ok = ();
            type Error = Error;
            fn serialize_field<T: Serialize + ?Sized>(
                &mut self,
                _key: &'static str,
                value: &T,
            ) -> Result<()> {
                value.serialize(&mut **self)
            }
            fn end(self) -> Result<()> {
                Ok(())
            }
        }
    };
}

forward_serialize_element!(ser::SerializeSeq, serialize_element);
forward_serialize_element!(ser::SerializeTuple, serialize_element);
forward_serialize_element!(ser::SerializeTupleStruct, serialize_field);
forward_serialize_element!(ser::SerializeTupleVariant, serialize_field);
forward_serialize_field!(ser::SerializeStruct);
forward_serialize_field!(ser::SerializeStructVariant);

impl<W: Write> ser::SerializeMap for &mut Serializer<W> {
    type Ok = ();
    type Error = Error;
    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        key.serialize(&mut **self)
    }
    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }
    fn end(self) -> Result<()> {
        Ok(())
    }
}

// ── FixedOpaqueSerializer ──────────────────────────────────────────────────
//
// Accepts only the `serialize_bytes` call made by `fixed_opaque::serialize`
// and writes the bytes padded, without a length prefix.

struct FixedOpaqueSerializer<'a, W: Write>(&'a mut Serializer<W>);

fn not_bytes() -> Error {
    Error::Unsupported("fixed opaque data other than bytes")
}

macro_rules! reject_scalars {
    ($($method:ident($t:ty)),* $(,)?) => {
        $(
            fn $method(self, _v: $t) -> Result<()> {
                Err(not_bytes())
            }
        )*
    };
}

impl<W: Write> ser::Serializer for FixedOpaqueSerializer<'_, W> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Impossible<(), Error>;
    type SerializeStruct = Impossible<(), Error>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.0.out.write_padded(v)
    }

    reject_scalars!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_unit_struct(&'static str),
    );

    fn serialize_none(self) -> Result<()> {
        Err(not_bytes())
    }
    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<()> {
        Err(not_bytes())
    }
    fn serialize_unit(self) -> Result<()> {
        Err(not_bytes())
    }
    fn serialize_unit_variant(self, _n: &'static str, _i: u32, _v: &'static str) -> Result<()> {
        Err(not_bytes())
    }
    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _n: &'static str,
        _v: &T,
    ) -> Result<()> {
        Err(not_bytes())
    }
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _n: &'static str,
        _i: u32,
        _var: &'static str,
        _v: &T,
    ) -> Result<()> {
        Err(not_bytes())
    }
    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(not_bytes())
    }
    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(not_bytes())
    }
    fn serialize_tuple_struct(
        self,
        _n: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(not_bytes())
    }
    fn serialize_tuple_variant(
        self,
        _n: &'static str,
        _i: u32,
        _var: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(not_bytes())
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(not_bytes())
    }
    fn serialize_struct(self, _n: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(not_bytes())
    }
    fn serialize_struct_variant(
        self,
        _n: &'static str,
        _i: u32,
        _var: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(not_bytes())
    }
}
