//! Record decoding.
//!
//! [`Reader`] pulls one record at a time out of any [`std::io::Read`]
//! source. Records that would come out empty (runs of blank lines, comments,
//! or a delimiter with no fields before it) are skipped transparently.
//!
//! ## Examples
//!
//! ```rust
//! use serde_stanza::Reader;
//!
//! let input = "\
//! # provinces
//! ISO3166-2: AR-K
//! Name:      Catamarca
//! %%
//! ISO3166-2: AR-H
//! Name:      Chaco
//! Category:  Province
//! ";
//!
//! let mut reader = Reader::new(input.as_bytes());
//! let first = reader.decode_next().unwrap().unwrap();
//! assert_eq!(first.get("name"), Some("Catamarca"));
//!
//! let second = reader.decode_next().unwrap().unwrap();
//! assert_eq!(second.get("category"), Some("Province"));
//!
//! assert!(reader.decode_next().unwrap().is_none());
//! assert_eq!(reader.field_registry(), ["iso3166-2", "name", "category"]);
//! ```

use crate::lexer::{Lexer, NameToken, ValueEnd};
use crate::{Error, Record, ReaderOptions, Result};
use log::{debug, trace};
use std::collections::HashSet;
use std::io::{BufReader, Read};

/// Reads records from a record-jar/stanza encoded stream.
///
/// The reader owns a registry of every field name it has stored, in the order
/// the names were first seen. The registry only grows and belongs to this
/// reader alone.
pub struct Reader<R> {
    lexer: Lexer<BufReader<R>>,
    options: ReaderOptions,
    registry: Vec<String>,
    seen: HashSet<String>,
    record_open: bool,
    finished: bool,
    failed: bool,
}

impl<R: Read> Reader<R> {
    /// Creates a reader with default options.
    pub fn new(source: R) -> Self {
        Self::with_options(source, ReaderOptions::default())
    }

    /// Creates a reader with the given options.
    pub fn with_options(source: R, options: ReaderOptions) -> Self {
        Reader {
            lexer: Lexer::new(BufReader::new(source)),
            options,
            registry: Vec::new(),
            seen: HashSet::new(),
            record_open: false,
            finished: false,
            failed: false,
        }
    }

    /// Reads the next non-empty record.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. A record cut short by
    /// the end of the stream is still returned, and the following call
    /// returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DuplicateField`] when a record names the same
    /// field twice, and with [`Error::Io`] or [`Error::InvalidUtf8`] when the
    /// source cannot be read. The reader does not resynchronize by itself;
    /// call [`skip_record`](Self::skip_record) to move past the bad record.
    pub fn decode_next(&mut self) -> Result<Option<Record>> {
        loop {
            if self.finished {
                return Ok(None);
            }
            let record = self.parse_record()?;
            if !record.is_empty() {
                debug!(
                    "decoded record with {} fields ending at line {}",
                    record.len(),
                    self.lexer.line()
                );
                return Ok(Some(record));
            }
            trace!("skipped empty record at line {}", self.lexer.line());
        }
    }

    /// Every field name stored so far, in order of first appearance.
    #[must_use]
    pub fn field_registry(&self) -> &[String] {
        &self.registry
    }

    /// The 1-based line number the reader is positioned at.
    #[must_use]
    pub fn line(&self) -> usize {
        self.lexer.line()
    }

    /// Discards the rest of the record that was being read when an error
    /// occurred, up to and including its delimiter line.
    ///
    /// Between records this does nothing. Returns `false` if the stream
    /// ended without another delimiter.
    pub fn skip_record(&mut self) -> Result<bool> {
        self.failed = false;
        if !self.record_open {
            return Ok(!self.finished);
        }
        let found = self.lexer.skip_record()?;
        debug!("skipped to line {} after a bad record", self.lexer.line());
        self.record_open = false;
        if !found {
            self.finished = true;
        }
        Ok(found)
    }

    /// Reads every remaining record.
    pub fn into_records(self) -> Result<Vec<Record>> {
        self.collect()
    }

    fn parse_record(&mut self) -> Result<Record> {
        let mut record = Record::new();
        self.record_open = true;
        loop {
            let line = self.lexer.line();
            let (name, has_value) = match self.lexer.parse_name()? {
                NameToken::Eof => {
                    self.finished = true;
                    break;
                }
                NameToken::Blank => continue,
                NameToken::Delimiter => break,
                NameToken::Field { name, has_value } => (name, has_value),
            };

            let (value, end) = if has_value {
                self.lexer.parse_value()?
            } else {
                (String::new(), ValueEnd::Next)
            };
            if end != ValueEnd::Next {
                self.record_open = false;
            }
            self.store(&mut record, line, name, value)?;

            match end {
                ValueEnd::Next => {}
                ValueEnd::Delimiter => break,
                ValueEnd::Eof => {
                    self.finished = true;
                    break;
                }
            }
        }
        self.record_open = false;
        Ok(record)
    }

    fn store(&mut self, record: &mut Record, line: usize, name: String, value: String) -> Result<()> {
        if name.is_empty() || (value.is_empty() && !self.options.keep_empty) {
            return Ok(());
        }
        if record.contains(&name) {
            return Err(Error::duplicate_field(line, &name));
        }
        if self.seen.insert(name.clone()) {
            self.registry.push(name.clone());
        }
        record.insert_normalized(name, value);
        Ok(())
    }
}

impl<R: Read> Iterator for Reader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.decode_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
