//! XDR Deserializer (RFC 4506) for serde-derived records.
//!
//! Reads through a [`ByteCursor`], so bounds checks, length limits and nesting
//! limits are the same as for [`XdrDecode`](crate::XdrDecode) types. Enum
//! variants are selected by their index; an index outside the enum's variant
//! list fails with [`Error::UnknownDiscriminant`].

use crate::config::Limits;
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use serde::de::{
    self, Deserialize, DeserializeOwned, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    VariantAccess, Visitor,
};

/// Deserialize a value that must span the whole of `input`.
pub fn from_bytes<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    from_bytes_with_limits(input, Limits::none())
}

pub fn from_bytes_with_limits<T: DeserializeOwned>(input: &[u8], limits: Limits) -> Result<T> {
    tracing::trace!(len = input.len(), "deserializing XDR value");
    let mut de = Deserializer::with_limits(input, limits);
    let value = T::deserialize(&mut de)?;
    de.cursor.finish()?;
    Ok(value)
}

/// Deserialize a value from XDR bytes, also returning remaining unconsumed bytes.
pub fn from_bytes_partial<'de, T: Deserialize<'de>>(input: &'de [u8]) -> Result<(T, &'de [u8])> {
    let mut de = Deserializer::new(input);
    let value = T::deserialize(&mut de)?;
    Ok((value, de.remaining()))
}

/// The XDR deserializer.
pub struct Deserializer<'de> {
    cursor: ByteCursor<'de>,
}

impl<'de> Deserializer<'de> {
    pub fn new(input: &'de [u8]) -> Self {
        Self::with_limits(input, Limits::none())
    }

    pub fn with_limits(input: &'de [u8], limits: Limits) -> Self {
        Deserializer {
            cursor: ByteCursor::with_limits(input, limits),
        }
    }

    /// Returns the unconsumed portion of the input buffer.
    pub fn remaining(&self) -> &'de [u8] {
        self.cursor.remaining()
    }

    /// A 4-byte integer that must fit a narrower `T`. Out-of-range values are
    /// rejected and the cursor is left before them.
    fn narrow<S, T: TryFrom<S>>(
        &mut self,
        read: fn(&mut ByteCursor<'de>) -> Result<S>,
        width: usize,
    ) -> Result<T> {
        let start = self.cursor.clone();
        T::try_from(read(&mut self.cursor)?).map_err(|_| {
            self.cursor = start;
            Error::IntegerOutOfRange { width }
        })
    }
}

// ── Main Deserializer impl ─────────────────────────────────────────────────

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported(
            "deserialize_any (XDR is not self-describing)",
        ))
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.cursor.read_bool()?)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.narrow(ByteCursor::read_i32, 1)?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.narrow(ByteCursor::read_i32, 2)?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.cursor.read_i32()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.cursor.read_i64()?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.narrow(ByteCursor::read_u32, 1)?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.narrow(ByteCursor::read_u32, 2)?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.cursor.read_u32()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.cursor.read_u64()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.cursor.read_f32()?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.cursor.read_f64()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.cursor.read_u32()?;
        visitor.visit_char(char::from_u32(v).ok_or(Error::InvalidUtf8)?)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.cursor.read_string(None)?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_bytes(self.cursor.read_variable_opaque(None)?)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    /// Optional data: a boolean flag, then the value when the flag is set.
    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if !self.cursor.read_bool()? {
            return visitor.visit_none();
        }
        self.cursor.enter()?;
        let value = visitor.visit_some(&mut *self);
        self.cursor.leave();
        value
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name == crate::fixed_opaque::FIXED_OPAQUE_TOKEN {
            visitor.visit_newtype_struct(FixedOpaqueDeserializer(self))
        } else {
            visitor.visit_newtype_struct(self)
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let count = self.cursor.read_count(None)?;
        self.cursor.enter()?;
        let value = visitor.visit_seq(SeqDeserializer::new(&mut *self, count));
        self.cursor.leave();
        value
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        // Fixed-length: no count prefix
        visitor.visit_seq(SeqDeserializer::new(self, len))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self, len))
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let count = self.cursor.read_count(None)?;
        self.cursor.enter()?;
        let value = visitor.visit_map(MapDeserializer::new(&mut *self, count));
        self.cursor.leave();
        value
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        // XDR structure: fields in order, no count prefix
        visitor.visit_seq(SeqDeserializer::new(self, fields.len()))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let start = self.cursor.position();
        let discriminant = self.cursor.read_i32()?;
        match usize::try_from(discriminant) {
            Ok(index) if index < variants.len() => {}
            _ => {
                tracing::debug!(position = start, "enum discriminant out of range");
                return Err(crate::convention::unknown_discriminant(name, discriminant));
            }
        }
        self.cursor.enter()?;
        let value = visitor.visit_enum(EnumDeserializer {
            de: &mut *self,
            index: discriminant as u32,
        });
        self.cursor.leave();
        value
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        // Identifiers are discriminants here
        visitor.visit_u32(self.cursor.read_u32()?)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported(
            "deserialize_ignored_any (XDR is not self-describing)",
        ))
    }
}

// ── SeqDeserializer: fixed count ───────────────────────────────────────────

struct SeqDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'a, 'de> SeqDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>, count: usize) -> Self {
        SeqDeserializer {
            de,
            remaining: count,
        }
    }
}

impl<'de> SeqAccess<'de> for SeqDeserializer<'_, 'de> {
    type Error = Error;

    fn next_element_seed<T: de::DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        // Untrusted counts only bound the hint by what the input could hold.
        Some(self.remaining.min(self.de.remaining().len()))
    }
}

// ── MapDeserializer ────────────────────────────────────────────────────────

struct MapDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'a, 'de> MapDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>, count: usize) -> Self {
        MapDeserializer {
            de,
            remaining: count,
        }
    }
}

impl<'de> MapAccess<'de> for MapDeserializer<'_, 'de> {
    type Error = Error;

    fn next_key_seed<K: de::DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: de::DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }
}

// ── EnumDeserializer ───────────────────────────────────────────────────────

/// Enum access with the discriminant already read and range-checked.
struct EnumDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    index: u32,
}

impl<'a, 'de> EnumAccess<'de> for EnumDeserializer<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: de::DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant)> {
        let de: de::value::U32Deserializer<Error> = self.index.into_deserializer();
        let val = seed.deserialize(de)?;
        Ok((val, self))
    }
}

impl<'de> VariantAccess<'de> for EnumDeserializer<'_, 'de> {
    type Error = Error;

    /// Void arm: no data follows the discriminant
    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T: de::DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.de, len))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self.de, fields.len()))
    }
}

// ── FixedOpaqueDeserializer ────────────────────────────────────────────────
//
// Handed to the `fixed_opaque` visitor in place of the main deserializer.
// `[u8; N]` asks for a tuple of N elements; this reads N raw bytes plus their
// padding instead of N four-byte integers.

struct FixedOpaqueDeserializer<'a, 'de>(&'a mut Deserializer<'de>);

impl<'de> de::Deserializer<'de> for FixedOpaqueDeserializer<'_, 'de> {
    type Error = Error;

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        let data = self.0.cursor.read_opaque_fixed_padded(len)?;
        visitor.visit_seq(de::value::SeqDeserializer::<_, Error>::new(
            data.iter().copied(),
        ))
    }

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported("fixed opaque data other than [u8; N]"))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq
        tuple_struct map struct enum identifier ignored_any
    }
}
