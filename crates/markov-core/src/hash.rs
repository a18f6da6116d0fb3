//! Content fingerprints of networks and tables.
//!
//! A fingerprint is the SHA-256 of a tagged binary encoding of a value:
//! every scalar is written as a tag byte followed by its little-endian
//! payload, strings are length-prefixed, and compound values are framed by
//! open and close tags. Floats are hashed by their bit pattern, so NaN and
//! both infinities stay distinct from each other and from every finite
//! value. All NaN payloads hash alike. The edit engine compares fingerprints
//! taken before and after a rolled-back edit.

use std::fmt::Display;

use serde::ser::{self, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// A 32-byte SHA-256 digest.
pub type Fingerprint = [u8; 32];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot fingerprint value: {0}")]
pub struct FingerprintError(pub String);

impl ser::Error for FingerprintError {
    fn custom<T: Display>(msg: T) -> Self {
        FingerprintError(msg.to_string())
    }
}

/// Fingerprint any serializable value.
pub fn fingerprint<T: Serialize + ?Sized>(value: &T) -> Result<Fingerprint, FingerprintError> {
    let mut feed = Feed {
        hasher: Sha256::new(),
    };
    value.serialize(&mut feed)?;
    Ok(feed.hasher.finalize().into())
}

/// Lowercase hex rendering of a fingerprint.
pub fn fingerprint_hex(digest: &Fingerprint) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

mod tag {
    pub const BOOL: u8 = 0x01;
    pub const INT: u8 = 0x02;
    pub const UINT: u8 = 0x03;
    pub const FLOAT: u8 = 0x04;
    pub const CHAR: u8 = 0x05;
    pub const STR: u8 = 0x06;
    pub const BYTES: u8 = 0x07;
    pub const NONE: u8 = 0x08;
    pub const SOME: u8 = 0x09;
    pub const UNIT: u8 = 0x0a;
    pub const VARIANT: u8 = 0x0b;
    pub const SEQ: u8 = 0x10;
    pub const MAP: u8 = 0x11;
    pub const STRUCT: u8 = 0x12;
    pub const FIELD: u8 = 0x13;
    pub const END: u8 = 0x1f;
}

/// Streams the encoding straight into the hasher.
struct Feed {
    hasher: Sha256,
}

impl Feed {
    fn tag(&mut self, tag: u8) {
        self.hasher.update([tag]);
    }

    fn bytes(&mut self, tag: u8, bytes: &[u8]) {
        self.tag(tag);
        self.hasher.update((bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
    }

    fn float(&mut self, v: f64) {
        let bits = if v.is_nan() { f64::NAN.to_bits() } else { v.to_bits() };
        self.tag(tag::FLOAT);
        self.hasher.update(bits.to_le_bytes());
    }

    fn variant(&mut self, index: u32) {
        self.tag(tag::VARIANT);
        self.hasher.update(index.to_le_bytes());
    }
}

type Result<T = (), E = FingerprintError> = std::result::Result<T, E>;

impl ser::Serializer for &mut Feed {
    type Ok = ();
    type Error = FingerprintError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, v: bool) -> Result {
        self.tag(tag::BOOL);
        self.hasher.update([u8::from(v)]);
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result {
        self.tag(tag::INT);
        self.hasher.update(v.to_le_bytes());
        Ok(())
    }

    fn serialize_u8(self, v: u8) -> Result {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result {
        self.tag(tag::UINT);
        self.hasher.update(v.to_le_bytes());
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result {
        self.float(f64::from(v));
        Ok(())
    }

    fn serialize_f64(self, v: f64) -> Result {
        self.float(v);
        Ok(())
    }

    fn serialize_char(self, v: char) -> Result {
        self.tag(tag::CHAR);
        self.hasher.update(u32::from(v).to_le_bytes());
        Ok(())
    }

    fn serialize_str(self, v: &str) -> Result {
        self.bytes(tag::STR, v.as_bytes());
        Ok(())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result {
        self.bytes(tag::BYTES, v);
        Ok(())
    }

    fn serialize_none(self) -> Result {
        self.tag(tag::NONE);
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result {
        self.tag(tag::SOME);
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result {
        self.tag(tag::UNIT);
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
    ) -> Result {
        self.variant(variant_index);
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result {
        self.variant(variant_index);
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self> {
        self.tag(tag::SEQ);
        Ok(self)
    }

    fn serialize_tuple(self, len: usize) -> Result<Self> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<Self> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        len: usize,
    ) -> Result<Self> {
        self.variant(variant_index);
        self.serialize_seq(Some(len))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self> {
        self.tag(tag::MAP);
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self> {
        self.tag(tag::STRUCT);
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        len: usize,
    ) -> Result<Self> {
        self.variant(variant_index);
        self.serialize_struct("", len)
    }
}

impl ser::SerializeSeq for &mut Feed {
    type Ok = ();
    type Error = FingerprintError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result {
        self.tag(tag::END);
        Ok(())
    }
}

impl ser::SerializeTuple for &mut Feed {
    type Ok = ();
    type Error = FingerprintError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result {
        self.tag(tag::END);
        Ok(())
    }
}

impl ser::SerializeTupleStruct for &mut Feed {
    type Ok = ();
    type Error = FingerprintError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result {
        self.tag(tag::END);
        Ok(())
    }
}

impl ser::SerializeTupleVariant for &mut Feed {
    type Ok = ();
    type Error = FingerprintError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result {
        self.tag(tag::END);
        Ok(())
    }
}

impl ser::SerializeMap for &mut Feed {
    type Ok = ();
    type Error = FingerprintError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result {
        self.tag(tag::END);
        Ok(())
    }
}

impl ser::SerializeStruct for &mut Feed {
    type Ok = ();
    type Error = FingerprintError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result {
        self.bytes(tag::FIELD, key.as_bytes());
        value.serialize(&mut **self)
    }

    fn skip_field(&mut self, key: &'static str) -> Result {
        self.bytes(tag::FIELD, key.as_bytes());
        self.tag(tag::NONE);
        Ok(())
    }

    fn end(self) -> Result {
        self.tag(tag::END);
        Ok(())
    }
}

impl ser::SerializeStructVariant for &mut Feed {
    type Ok = ();
    type Error = FingerprintError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result {
        ser::SerializeStruct::serialize_field(self, key, value)
    }

    fn end(self) -> Result {
        self.tag(tag::END);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::{PotentialRole, TablePotential};
    use crate::variable::Variable;

    fn table() -> TablePotential {
        let a = Variable::chance("A", ["a0", "a1"]);
        TablePotential::new(vec![a], PotentialRole::ConditionalProbability).unwrap()
    }

    #[test]
    fn equal_tables_share_a_fingerprint() {
        assert_eq!(fingerprint(&table()).unwrap(), fingerprint(&table()).unwrap());
    }

    #[test]
    fn any_cell_change_is_visible() {
        let t1 = table();
        let mut t2 = t1.clone();
        t2.values_mut()[0] = 0.4;
        let f1 = fingerprint(&t1).unwrap();
        assert_ne!(f1, fingerprint(&t2).unwrap());
        assert_eq!(fingerprint_hex(&f1).len(), 64);
    }

    #[test]
    fn non_finite_cells_stay_distinct() {
        let cells = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.5];
        let prints: Vec<Fingerprint> = cells
            .iter()
            .map(|&v| {
                let mut t = table();
                t.values_mut()[0] = v;
                fingerprint(&t).unwrap()
            })
            .collect();
        for (i, a) in prints.iter().enumerate() {
            for b in &prints[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn nan_payloads_hash_alike() {
        let quiet = f64::NAN;
        let other = f64::from_bits(quiet.to_bits() | 1);
        assert!(other.is_nan());
        assert_eq!(fingerprint(&quiet).unwrap(), fingerprint(&other).unwrap());
    }

    #[test]
    fn framing_separates_adjacent_strings() {
        let split = fingerprint(&("ab", "c")).unwrap();
        let joined = fingerprint(&("a", "bc")).unwrap();
        assert_ne!(split, joined);
    }

    #[test]
    fn custom_errors_propagate() {
        struct Refuses;
        impl Serialize for Refuses {
            fn serialize<S: ser::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
                Err(ser::Error::custom("refused"))
            }
        }
        assert_eq!(
            fingerprint(&Refuses),
            Err(FingerprintError("refused".to_string()))
        );
    }
}
