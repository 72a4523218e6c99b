//! # serde_stanza
//!
//! A reader and writer for record-jar / stanza files, with Serde support.
//!
//! ## What is a stanza file?
//!
//! A stanza (or record-jar) file is a flat, line-oriented text database. Each
//! record is a block of `name: value` lines, and records are separated by a
//! `%%` line. Comments start with `#`, blank lines are ignored, and long
//! values fold onto indented continuation lines. See [`format`] for the full
//! grammar.
//!
//! ```text
//! ISO3166-2: AR-C
//! Name:      Ciudad Autónoma de Buenos Aires
//! Category:  City
//! %%
//! ISO3166-2: AR-B
//! Name:      Buenos Aires
//! Category:  Province
//! %%
//! ```
//!
//! ## Key Features
//!
//! - **Streaming**: [`Reader`] decodes one record at a time from any `Read`
//! - **Faithful round trips**: [`Writer`] emits exactly the grammar the reader
//!   accepts, including folded multi-line values
//! - **Strict where it matters**: duplicate fields are errors carrying the
//!   line number, and output field names must be normalized
//! - **Serde Compatible**: decode straight into `Vec<YourStruct>` and back
//!
//! ## Quick Start
//!
//! ### Reading and Writing Records
//!
//! ```rust
//! use serde_stanza::{Reader, Writer};
//!
//! let mut reader = Reader::new("name: Arg\ncapital: BA\n%%\n".as_bytes());
//! let record = reader.decode_next().unwrap().unwrap();
//! assert_eq!(record.get("capital"), Some("BA"));
//!
//! let mut writer = Writer::new(Vec::new());
//! writer.set_output_fields(["capital", "name"]).unwrap();
//! writer.write(&record).unwrap();
//! let out = writer.into_inner().unwrap();
//! assert_eq!(out, b"capital: BA\nname: Arg\n%%\n");
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_stanza::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Country {
//!     name: String,
//!     capital: String,
//! }
//!
//! let countries = vec![Country {
//!     name: "Argentina".to_string(),
//!     capital: "Buenos Aires".to_string(),
//! }];
//!
//! let text = to_string(&countries).unwrap();
//! assert_eq!(text, "capital: Buenos Aires\nname: Argentina\n%%\n");
//!
//! let back: Vec<Country> = from_str(&text).unwrap();
//! assert_eq!(back, countries);
//! ```
//!
//! ## Concurrency
//!
//! Readers and writers are plain blocking objects over their source or sink.
//! An instance is meant for one thread at a time; independent instances over
//! independent streams share no state.

pub mod de;
pub mod error;
pub mod format;
mod lexer;
pub mod macros;
pub mod options;
pub mod reader;
pub mod record;
pub mod ser;
mod source;
pub mod writer;

pub use de::Deserializer;
pub use error::{Error, Result};
pub use options::{Indent, ReaderOptions, WriterOptions};
pub use reader::Reader;
pub use record::{normalize_field_name, Record};
pub use ser::Serializer;
pub use writer::Writer;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Maps any `T: Serialize` onto records without writing them.
///
/// # Errors
///
/// Returns an error if `T` is not a record or a sequence of records.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_records<T>(value: &T) -> Result<Vec<Record>>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new();
    value.serialize(&mut serializer)?;
    Ok(serializer.into_records())
}

/// Serialize any `T: Serialize` to a stanza string.
///
/// `T` is either a sequence of structs/maps (one record each) or a single
/// struct/map. Fields are written in sorted order.
///
/// # Examples
///
/// ```rust
/// use serde_stanza::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let text = to_string(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(text, "x: 1\ny: 2\n%%\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value does not map onto records.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, WriterOptions::default())
}

/// Serialize any `T: Serialize` to a stanza string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_stanza::{to_string_with_options, WriterOptions};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32, label: Option<String> }
///
/// let options = WriterOptions::new()
///     .with_fields(["y", "x", "label"])
///     .with_force_empty(true);
/// let text = to_string_with_options(&Point { x: 1, y: 2, label: None }, options).unwrap();
/// assert_eq!(text, "y: 2\nx: 1\nlabel\n%%\n");
/// ```
///
/// # Errors
///
/// Returns an error if the options name an invalid field or the value does
/// not map onto records.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: WriterOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buffer = Vec::with_capacity(256);
    to_writer_with_options(&mut buffer, value, options)?;
    String::from_utf8(buffer).map_err(Error::custom)
}

/// Serialize any `T: Serialize` to a writer in stanza format.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, WriterOptions::default())
}

/// Serialize any `T: Serialize` to a writer in stanza format with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(writer: W, value: &T, options: WriterOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let records = to_records(value)?;
    let mut writer = Writer::with_options(writer, options)?;
    writer.write_all(&records)?;
    writer.flush()
}

/// Deserialize an instance of type `T` from a string of stanza text.
///
/// # Examples
///
/// ```rust
/// use serde_stanza::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let points: Vec<Point> = from_str("x: 1\ny: 2\n%%\nx: 3\ny: 4\n").unwrap();
/// assert_eq!(points, vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }]);
/// ```
///
/// # Errors
///
/// Returns an error if the input is malformed (see [`Reader::decode_next`])
/// or cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_reader(s.as_bytes())
}

/// Deserialize an instance of type `T` from bytes of stanza text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not well-formed, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_reader(v)
}

/// Deserialize an instance of type `T` from an I/O stream of stanza text.
///
/// # Examples
///
/// ```rust
/// use serde_stanza::{from_reader, Record};
/// use std::io::Cursor;
///
/// let cursor = Cursor::new(b"name: Formosa\n%%\nname: Misiones\n%%\n");
/// let records: Vec<Record> = from_reader(cursor).unwrap();
/// assert_eq!(records.len(), 2);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is
/// malformed, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut deserializer = Deserializer::new(reader);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}
