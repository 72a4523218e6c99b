//! Serde deserialization from records.
//!
//! The [`Deserializer`] reads a stanza stream with a [`Reader`] and presents
//! it to serde as a sequence of maps from field name to field value.
//!
//! ## Overview
//!
//! - **Sequences**: `Vec<T>`, tuples and other sequence types receive one
//!   element per record
//! - **Single records**: structs and maps read exactly one record; a stream
//!   holding more than one record is an error
//! - **Field values**: always text, but scalar targets (`bool`, integers,
//!   floats, `char`, unit-variant enums) are parsed from it
//!
//! Field names arrive normalized (`ISO 3166` becomes `iso-3166`), so struct
//! fields usually need `#[serde(rename = "...")]` for names with `-`.
//!
//! ## Usage
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_stanza::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Province {
//!     name: String,
//!     #[serde(rename = "iso3166-2")]
//!     code: String,
//! }
//!
//! let input = "ISO3166-2: AR-K\nName: Catamarca\n%%\nISO3166-2: AR-H\nName: Chaco\n%%\n";
//! let provinces: Vec<Province> = from_str(input).unwrap();
//! assert_eq!(provinces.len(), 2);
//! assert_eq!(provinces[1].code, "AR-H");
//! ```

use crate::{Error, Reader, ReaderOptions, Record, Result};
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;
use std::io::Read;
use std::str::FromStr;

/// Presents a stanza stream to serde.
///
/// Created with [`Deserializer::new`] or [`Deserializer::with_options`].
pub struct Deserializer<R> {
    reader: Reader<R>,
}

impl<R: Read> Deserializer<R> {
    /// Creates a deserializer reading `source` with default options.
    pub fn new(source: R) -> Self {
        Deserializer {
            reader: Reader::new(source),
        }
    }

    /// Creates a deserializer reading `source` with the given options.
    ///
    /// With `keep_empty`, empty fields reach the target type as empty
    /// strings, which `Option` fields see as `None`.
    pub fn with_options(source: R, options: ReaderOptions) -> Self {
        Deserializer {
            reader: Reader::with_options(source, options),
        }
    }

    /// Checks that no records remain after a value was deserialized.
    pub fn end(&mut self) -> Result<()> {
        match self.reader.decode_next()? {
            Some(_) => Err(Error::custom(format!(
                "trailing record before line {}",
                self.reader.line()
            ))),
            None => Ok(()),
        }
    }

    fn single_record(&mut self) -> Result<Record> {
        Ok(self.reader.decode_next()?.unwrap_or_default())
    }
}

impl<'de, 'a, R: Read> de::Deserializer<'de> for &'a mut Deserializer<R> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(RecordSeq {
            reader: &mut self.reader,
        })
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let record = self.single_record()?;
        visitor.visit_map(FieldMap::new(record))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit_struct enum identifier ignored_any
    }
}

struct RecordSeq<'a, R> {
    reader: &'a mut Reader<R>,
}

impl<'de, 'a, R: Read> de::SeqAccess<'de> for RecordSeq<'a, R> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.reader.decode_next()? {
            Some(record) => seed.deserialize(RecordDeserializer { record }).map(Some),
            None => Ok(None),
        }
    }
}

/// One record, seen by serde as a map.
struct RecordDeserializer {
    record: Record,
}

impl<'de> de::Deserializer<'de> for RecordDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(FieldMap::new(self.record))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct enum
        identifier ignored_any
    }
}

struct FieldMap {
    iter: indexmap::map::IntoIter<String, String>,
    value: Option<String>,
}

impl FieldMap {
    fn new(record: Record) -> Self {
        FieldMap {
            iter: record.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for FieldMap {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((name, value)) => {
                self.value = Some(value);
                seed.deserialize(FieldDeserializer::new(name)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(FieldDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

/// A field name or value. Scalars are parsed out of the text on demand.
struct FieldDeserializer {
    value: String,
}

impl FieldDeserializer {
    fn new(value: String) -> Self {
        FieldDeserializer { value }
    }

    fn parse<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let text = self.value.trim();
        text.parse()
            .map_err(|e| Error::custom(format!("invalid field value {:?}: {}", text, e)))
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident,)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(self.parse()?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for FieldDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.value)
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool,
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_i128 => visit_i128,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_u128 => visit_u128,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
        deserialize_char => visit_char,
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.value.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.value.trim().is_empty() {
            visitor.visit_unit()
        } else {
            Err(Error::custom(format!("expected an empty value, found {:?}", self.value)))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let variant: de::value::StringDeserializer<Error> =
            self.value.trim().to_string().into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("field values cannot hold sequences"))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("field values cannot hold maps"))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    forward_to_deserialize_any! {
        str string bytes byte_buf identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    fn decode<T: for<'de> Deserialize<'de>>(input: &str) -> Result<T> {
        let mut de = Deserializer::new(input.as_bytes());
        let value = T::deserialize(&mut de)?;
        de.end()?;
        Ok(value)
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Province {
        name: String,
        population: u32,
        capital: Option<String>,
    }

    #[test]
    fn test_scalars_are_parsed_from_text() {
        let out: Vec<Province> = decode("name: Salta\npopulation: 1424397\n%%\n").unwrap();
        assert_eq!(
            out,
            vec![Province {
                name: "Salta".to_string(),
                population: 1_424_397,
                capital: None,
            }]
        );
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let out: Result<Vec<Province>> = decode("name: Salta\npopulation: many\n%%\n");
        assert!(out.unwrap_err().to_string().contains("many"));
    }

    #[test]
    fn test_single_struct() {
        let out: Province = decode("name: Jujuy\npopulation: 811611\ncapital: San Salvador\n").unwrap();
        assert_eq!(out.capital.as_deref(), Some("San Salvador"));
    }

    #[test]
    fn test_single_struct_rejects_trailing_records() {
        let out: Result<Province> = decode("name: a\npopulation: 1\n%%\nname: b\npopulation: 2\n%%\n");
        assert!(out.is_err());
    }

    #[test]
    fn test_maps_and_enums() {
        #[derive(Deserialize, Debug, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Category {
            City,
            Province,
        }

        #[derive(Deserialize, Debug)]
        struct Row {
            category: Category,
        }

        let rows: Vec<Row> = decode("category: city\n%%\ncategory: province\n%%\n").unwrap();
        assert_eq!(rows[0].category, Category::City);
        assert_eq!(rows[1].category, Category::Province);

        let maps: Vec<BTreeMap<String, String>> = decode("A: 1\nB: 2\n%%\n").unwrap();
        assert_eq!(maps[0].get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_empty_stream_is_empty_sequence() {
        let out: Vec<Record> = decode("# nothing here\n\n%%\n").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_keep_empty_fields_read_as_none() {
        let input = "name: Chubut
population: 603120
capital
%%
";
        let options = ReaderOptions::new().with_keep_empty(true);
        let mut de = Deserializer::with_options(input.as_bytes(), options);
        let out: Vec<Province> = Vec::deserialize(&mut de).unwrap();
        de.end().unwrap();
        assert_eq!(out[0].capital, None);

        let options = ReaderOptions::new().with_keep_empty(true);
        let mut de = Deserializer::with_options(input.as_bytes(), options);
        let records: Vec<Record> = Vec::deserialize(&mut de).unwrap();
        assert_eq!(records[0].get("capital"), Some(""));
    }
}
