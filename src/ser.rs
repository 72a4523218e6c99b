//! Serde serialization into records.
//!
//! This module maps Rust values onto [`Record`]s, which the crate-level
//! [`to_string`](crate::to_string) family then writes out with a
//! [`Writer`](crate::Writer).
//!
//! ## Accepted shapes
//!
//! - A sequence (`Vec`, slice, tuple) of structs or maps becomes one record
//!   per element
//! - A single struct or map becomes one record
//! - Field values must be scalars: strings, numbers, booleans and chars are
//!   written with their `Display` form; `None` and `()` become empty values
//!   (and are therefore skipped unless `force_empty` is set)
//!
//! Nested sequences or maps inside a field are rejected with
//! [`Error::UnsupportedType`].
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde::Serialize;
//! use serde_stanza::Serializer;
//!
//! #[derive(Serialize)]
//! struct Province { name: &'static str, category: &'static str }
//!
//! let mut serializer = Serializer::new();
//! vec![Province { name: "Salta", category: "Province" }]
//!     .serialize(&mut serializer)
//!     .unwrap();
//!
//! let records = serializer.into_records();
//! assert_eq!(records[0].get("name"), Some("Salta"));
//! ```

use crate::{Error, Record, Result};
use serde::ser::{self, Impossible, Serialize};

const TOP_LEVEL: &str = "expected a sequence of records or a single record";
const FIELD_VALUE: &str = "field values must be scalars";

/// Collects serialized values as records.
#[derive(Default)]
pub struct Serializer {
    records: Vec<Record>,
}

impl Serializer {
    pub fn new() -> Self {
        Serializer {
            records: Vec::new(),
        }
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = SeqSerializer<'a>;
    type SerializeTupleStruct = SeqSerializer<'a>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = TopRecordSerializer<'a>;
    type SerializeStruct = TopRecordSerializer<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, _v: bool) -> Result<()> {
        Err(Error::unsupported_type(TOP_LEVEL))
    }

    fn serialize_i64(self, _v: i64) -> Result<()> {
        Err(Error::unsupported_type(TOP_LEVEL))
    }

    fn serialize_u64(self, _v: u64) -> Result<()> {
        Err(Error::unsupported_type(TOP_LEVEL))
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_f32(self, _v: f32) -> Result<()> {
        Err(Error::unsupported_type(TOP_LEVEL))
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(Error::unsupported_type(TOP_LEVEL))
    }

    fn serialize_char(self, _v: char) -> Result<()> {
        Err(Error::unsupported_type(TOP_LEVEL))
    }

    fn serialize_str(self, _v: &str) -> Result<()> {
        Err(Error::unsupported_type(TOP_LEVEL))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(Error::unsupported_type(TOP_LEVEL))
    }

    fn serialize_none(self) -> Result<()> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        Err(Error::unsupported_type(TOP_LEVEL))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type(TOP_LEVEL))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        if let Some(len) = len {
            self.records.reserve(len);
        }
        Ok(SeqSerializer { ser: self })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type(TOP_LEVEL))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(TopRecordSerializer {
            ser: self,
            builder: RecordBuilder::new(len.unwrap_or(0)),
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type(TOP_LEVEL))
    }
}

pub struct SeqSerializer<'a> {
    ser: &'a mut Serializer,
}

impl<'a> SeqSerializer<'a> {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(record) = value.serialize(RecordSerializer)? {
            self.ser.records.push(record);
        }
        Ok(())
    }
}

impl<'a> ser::SerializeSeq for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a> ser::SerializeTuple for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a> ser::SerializeTupleStruct for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// A struct or map serialized directly at the top level: one record.
pub struct TopRecordSerializer<'a> {
    ser: &'a mut Serializer,
    builder: RecordBuilder,
}

impl<'a> ser::SerializeMap for TopRecordSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeMap::serialize_key(&mut self.builder, key)
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeMap::serialize_value(&mut self.builder, value)
    }

    fn end(self) -> Result<()> {
        self.ser.records.push(self.builder.record);
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for TopRecordSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeStruct::serialize_field(&mut self.builder, key, value)
    }

    fn end(self) -> Result<()> {
        self.ser.records.push(self.builder.record);
        Ok(())
    }
}

/// Serializes one sequence element into a record. `None` yields no record.
struct RecordSerializer;

impl ser::Serializer for RecordSerializer {
    type Ok = Option<Record>;
    type Error = Error;

    type SerializeSeq = Impossible<Option<Record>, Error>;
    type SerializeTuple = Impossible<Option<Record>, Error>;
    type SerializeTupleStruct = Impossible<Option<Record>, Error>;
    type SerializeTupleVariant = Impossible<Option<Record>, Error>;
    type SerializeMap = RecordBuilder;
    type SerializeStruct = RecordBuilder;
    type SerializeStructVariant = Impossible<Option<Record>, Error>;

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok> {
        Err(Error::unsupported_type("records must be structs or maps"))
    }

    fn serialize_i64(self, _v: i64) -> Result<Self::Ok> {
        Err(Error::unsupported_type("records must be structs or maps"))
    }

    fn serialize_u64(self, _v: u64) -> Result<Self::Ok> {
        Err(Error::unsupported_type("records must be structs or maps"))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok> {
        Err(Error::unsupported_type("records must be structs or maps"))
    }

    fn serialize_char(self, _v: char) -> Result<Self::Ok> {
        Err(Error::unsupported_type("records must be structs or maps"))
    }

    fn serialize_str(self, _v: &str) -> Result<Self::Ok> {
        Err(Error::unsupported_type("records must be structs or maps"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok> {
        Err(Error::unsupported_type("records must be structs or maps"))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok> {
        Err(Error::unsupported_type("records must be structs or maps"))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type("enum records are not supported"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::unsupported_type("nested sequences are not supported"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::unsupported_type("nested sequences are not supported"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::unsupported_type("nested sequences are not supported"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type("enum records are not supported"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(RecordBuilder::new(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(RecordBuilder::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type("enum records are not supported"))
    }
}

/// Accumulates the fields of one struct or map.
struct RecordBuilder {
    record: Record,
    key: Option<String>,
}

impl RecordBuilder {
    fn new(capacity: usize) -> Self {
        RecordBuilder {
            record: Record::with_capacity(capacity),
            key: None,
        }
    }

    fn insert<T>(&mut self, name: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = value.serialize(FieldSerializer)?.unwrap_or_default();
        if self.record.insert(name, value).is_some() {
            return Err(Error::custom(format!(
                "field {:?} appears more than once after normalization",
                name
            )));
        }
        Ok(())
    }
}

impl ser::SerializeMap for RecordBuilder {
    type Ok = Option<Record>;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(FieldSerializer)? {
            Some(key) => {
                self.key = Some(key);
                Ok(())
            }
            None => Err(Error::unsupported_type("field names must not be empty")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match self.key.take() {
            Some(key) => self.insert(&key, value),
            None => Err(Error::custom("serialize_value called before serialize_key")),
        }
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Some(self.record))
    }
}

impl ser::SerializeStruct for RecordBuilder {
    type Ok = Option<Record>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Some(self.record))
    }
}

/// Renders a scalar as field text. `None` stands for an empty value.
struct FieldSerializer;

impl ser::Serializer for FieldSerializer {
    type Ok = Option<String>;
    type Error = Error;

    type SerializeSeq = Impossible<Option<String>, Error>;
    type SerializeTuple = Impossible<Option<String>, Error>;
    type SerializeTupleStruct = Impossible<Option<String>, Error>;
    type SerializeTupleVariant = Impossible<Option<String>, Error>;
    type SerializeMap = Impossible<Option<String>, Error>;
    type SerializeStruct = Impossible<Option<String>, Error>;
    type SerializeStructVariant = Impossible<Option<String>, Error>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        Ok(Some(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        Ok(Some(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        Ok(Some(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        Ok(Some(v.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
        Ok(Some(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        Ok(Some(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Ok(Some(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok> {
        Err(Error::unsupported_type("byte strings cannot be field values"))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        Ok(Some(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type(FIELD_VALUE))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::unsupported_type(FIELD_VALUE))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::unsupported_type(FIELD_VALUE))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::unsupported_type(FIELD_VALUE))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type(FIELD_VALUE))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::unsupported_type(FIELD_VALUE))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Error::unsupported_type(FIELD_VALUE))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type(FIELD_VALUE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    fn records<T: Serialize + ?Sized>(value: &T) -> Result<Vec<Record>> {
        let mut serializer = Serializer::new();
        value.serialize(&mut serializer)?;
        Ok(serializer.into_records())
    }

    #[derive(Serialize)]
    struct Country {
        name: String,
        #[serde(rename = "ISO 3166")]
        iso: String,
        population: u64,
        capital: Option<String>,
    }

    #[test]
    fn test_struct_fields_become_strings() {
        let country = Country {
            name: "Argentina".to_string(),
            iso: "AR".to_string(),
            population: 45_000_000,
            capital: None,
        };
        let out = records(&country).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("iso-3166"), Some("AR"));
        assert_eq!(out[0].get("population"), Some("45000000"));
        assert_eq!(out[0].get("capital"), Some(""));
    }

    #[test]
    fn test_sequence_of_maps() {
        let mut a = BTreeMap::new();
        a.insert("name", "Salta");
        let mut b = BTreeMap::new();
        b.insert("name", "Jujuy");
        let out = records(&vec![a, b]).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].get("name"), Some("Jujuy"));
    }

    #[test]
    fn test_nested_values_are_rejected() {
        #[derive(Serialize)]
        struct Nested {
            tags: Vec<String>,
        }
        let err = records(&Nested { tags: vec![] }).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn test_top_level_scalar_is_rejected() {
        assert!(matches!(records(&42), Err(Error::UnsupportedType(_))));
        assert!(matches!(records(&vec![1, 2]), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_colliding_names_are_rejected() {
        let mut map = BTreeMap::new();
        map.insert("Name", "a");
        map.insert("name", "b");
        assert!(records(&map).is_err());
    }
}
