//! Error types for stanza reading and writing.
//!
//! Every fallible operation in this crate returns [`Result`], whose error side
//! is the single [`Error`] enum below.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: the underlying source or sink failed; carries the
//!   operation that was running and, when decoding, the line number
//! - **Duplicate Fields**: the same (normalized) field name appeared twice in
//!   one record
//! - **Invalid Field Names**: a writer was configured with a name that is
//!   empty or not in normalized form
//! - **Encoding Errors**: the input was not valid UTF-8
//! - **Serde Errors**: a value could not be mapped onto a record
//!
//! Reaching the end of the stream is not an error: [`Reader::decode_next`]
//! returns `Ok(None)`.
//!
//! [`Reader::decode_next`]: crate::Reader::decode_next
//!
//! ## Examples
//!
//! ```rust
//! use serde_stanza::{Error, Reader};
//!
//! let mut reader = Reader::new("name: Arg\nNAME: Bra\n%%\n".as_bytes());
//! match reader.decode_next() {
//!     Err(Error::DuplicateField { line, field }) => {
//!         assert_eq!(line, 2);
//!         assert_eq!(field, "name");
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur while reading or writing stanza data.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying source or sink failed
    #[error("{context}{}: {source}", line_suffix(*.line))]
    Io {
        context: &'static str,
        line: Option<usize>,
        #[source]
        source: io::Error,
    },

    /// The same field name appears twice in one record
    #[error("line {line}: duplicate field {field:?} in record")]
    DuplicateField { line: usize, field: String },

    /// A writer was given a field name it cannot emit
    #[error("invalid output field {name:?}: {reason}")]
    InvalidFieldName { name: String, reason: &'static str },

    /// The input is not valid UTF-8
    #[error("line {line}: input is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    /// A value cannot be represented as a record field
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

fn line_suffix(line: Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

impl Error {
    /// Wraps an I/O failure with the operation that was running.
    pub fn io(context: &'static str, source: io::Error) -> Self {
        Error::Io {
            context,
            line: None,
            source,
        }
    }

    /// Wraps an I/O failure that happened while decoding the given line.
    pub fn io_at(context: &'static str, line: usize, source: io::Error) -> Self {
        Error::Io {
            context,
            line: Some(line),
            source,
        }
    }

    /// Creates a duplicate field error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_stanza::Error;
    ///
    /// let err = Error::duplicate_field(7, "name");
    /// assert_eq!(err.to_string(), "line 7: duplicate field \"name\" in record");
    /// ```
    pub fn duplicate_field(line: usize, field: &str) -> Self {
        Error::DuplicateField {
            line,
            field: field.to_string(),
        }
    }

    /// Creates an error for a rejected output field name.
    pub fn invalid_field_name(name: &str, reason: &'static str) -> Self {
        Error::InvalidFieldName {
            name: name.to_string(),
            reason,
        }
    }

    /// Creates an unsupported type error for values that do not fit in a record.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the 1-based line number the error was detected at, if known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Io { line, .. } => *line,
            Error::DuplicateField { line, .. } | Error::InvalidUtf8 { line } => Some(*line),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
