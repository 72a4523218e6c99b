//! Record encoding.
//!
//! [`Writer`] serializes records back into the textual format. Output always
//! uses `\n` line endings and `%%` delimiter lines. A value containing
//! embedded newlines is folded: each line after the first is written on its
//! own line, prefixed with one [`Indent`] character. On reading, such
//! continuation lines join with a single space, so a newline inside a value
//! does not survive a round trip; the folded value does.
//!
//! ## Examples
//!
//! ```rust
//! use serde_stanza::{record, Writer};
//!
//! let mut writer = Writer::new(Vec::new());
//! writer.set_output_fields(["capital", "name"]).unwrap();
//! writer.write(&record! { "name" => "Arg", "capital" => "BA" }).unwrap();
//!
//! let out = writer.into_inner().unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "capital: BA\nname: Arg\n%%\n");
//! ```

use crate::record::is_normalized;
use crate::{Error, Indent, Record, Result, WriterOptions};
use log::{debug, trace};
use std::io::{BufWriter, Write};

const DELIMITER: &str = "%%";

/// Writes records to a record-jar/stanza encoded sink.
///
/// Output is buffered; call [`flush`](Self::flush) or
/// [`into_inner`](Self::into_inner) when done.
pub struct Writer<W: Write> {
    inner: BufWriter<W>,
    fields: Vec<String>,
    indent: Indent,
    /// Emit empty fields as bare name lines instead of skipping them.
    pub force_empty: bool,
}

impl<W: Write> Writer<W> {
    /// Creates a writer with default options.
    pub fn new(sink: W) -> Self {
        Writer {
            inner: BufWriter::new(sink),
            fields: Vec::new(),
            indent: Indent::default(),
            force_empty: false,
        }
    }

    /// Creates a writer with the given options.
    ///
    /// # Errors
    ///
    /// Fails like [`set_output_fields`](Self::set_output_fields) when
    /// `options.fields` holds an invalid name.
    pub fn with_options(sink: W, options: WriterOptions) -> Result<Self> {
        let mut writer = Writer::new(sink);
        writer.force_empty = options.force_empty;
        writer.indent = options.indent;
        writer.set_output_fields(options.fields)?;
        Ok(writer)
    }

    /// Fixes the order in which fields are emitted by every later write.
    ///
    /// Names must already be normalized: non-empty, lower-case, with no
    /// whitespace (use `-` instead). Repeated names are dropped, keeping the
    /// first occurrence. An empty list restores the default, which writes
    /// each record's own fields in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFieldName`] and leaves the current order
    /// untouched if any name is empty, not normalized, or starts with `#` or
    /// `%` (it would read back as a comment or delimiter line).
    pub fn set_output_fields<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for field in fields {
            let field = field.as_ref();
            check_output_name(field)?;
            if !ordered.iter().any(|f| f == field) {
                ordered.push(field.to_string());
            }
        }
        debug!("output fields set to {:?}", ordered);
        self.fields = ordered;
        Ok(())
    }

    /// The configured field order; empty when records are written sorted.
    #[must_use]
    pub fn output_fields(&self) -> &[String] {
        &self.fields
    }

    /// Writes one record followed by a delimiter line.
    ///
    /// Values are trimmed; empty ones are skipped unless
    /// [`force_empty`](Self::force_empty) is set, in which case the field
    /// name is written alone. A record with nothing to write produces no
    /// output at all.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFieldName`], writing nothing, if a field of the
    /// record would be emitted under a name that [`set_output_fields`]
    /// rejects, and [`Error::Io`] if the sink fails.
    ///
    /// [`set_output_fields`]: Self::set_output_fields
    pub fn write(&mut self, record: &Record) -> Result<()> {
        let mut out = String::with_capacity(128);
        let mut written = 0;

        let names: Vec<&str> = if self.fields.is_empty() {
            let keys = record.sorted_keys();
            for name in &keys {
                check_output_name(name)?;
            }
            keys
        } else {
            self.fields.iter().map(String::as_str).collect()
        };

        for name in &names {
            let value = record.get_normalized(name).unwrap_or("").trim();
            if value.is_empty() {
                if self.force_empty {
                    trace!("writing empty field {:?}", name);
                    out.push_str(name);
                    out.push('\n');
                    written += 1;
                }
                continue;
            }
            out.push_str(name);
            out.push_str(": ");
            fold_value(value, self.indent, &mut out);
            out.push('\n');
            written += 1;
        }

        if written == 0 {
            trace!("record has no fields to write");
            return Ok(());
        }
        out.push_str(DELIMITER);
        out.push('\n');
        self.inner
            .write_all(out.as_bytes())
            .map_err(|e| Error::io("writing record", e))?;
        debug!("wrote record with {} fields", written);
        Ok(())
    }

    /// Writes every record of an iterator.
    pub fn write_all<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Pushes buffered output to the sink. Safe to call repeatedly.
    pub fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .map_err(|e| Error::io("flushing writer", e))
    }

    /// Flushes and returns the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| Error::io("flushing writer", e.into_error()))
    }
}

/// Accepts names that are written verbatim and read back unchanged.
fn check_output_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_field_name(name, "field names must not be empty"));
    }
    if !is_normalized(name) {
        return Err(Error::invalid_field_name(
            name,
            "field names must be lower-case with whitespace replaced by '-'",
        ));
    }
    if name.starts_with(|c| c == '#' || c == '%') {
        return Err(Error::invalid_field_name(
            name,
            "field names must not start with '#' or '%'",
        ));
    }
    Ok(())
}

/// Appends `value` with whitespace runs collapsed to one space and every run
/// of line breaks replaced by a line end plus one indent character.
fn fold_value(value: &str, indent: Indent, out: &mut String) {
    let mut space = false;
    let mut line = false;
    for ch in value.chars() {
        if ch == '\n' {
            line = true;
            continue;
        }
        if ch.is_whitespace() {
            space = true;
            continue;
        }
        if line {
            out.push('\n');
            out.push(indent.as_char());
        } else if space {
            out.push(' ');
        }
        line = false;
        space = false;
        out.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    fn write_one(mut writer: Writer<Vec<u8>>, record: &Record) -> String {
        writer.write(record).unwrap();
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_default_order_is_sorted() {
        let record = record! { "name" => "Arg", "capital" => "BA", "area" => "2780400" };
        assert_eq!(
            write_one(Writer::new(Vec::new()), &record),
            "area: 2780400\ncapital: BA\nname: Arg\n%%\n"
        );
    }

    #[test]
    fn test_configured_order_and_missing_fields() {
        let mut writer = Writer::new(Vec::new());
        writer
            .set_output_fields(["name", "anthem", "name", "capital"])
            .unwrap();
        assert_eq!(writer.output_fields(), ["name", "anthem", "capital"]);
        let record = record! { "name" => "Arg", "capital" => "BA", "area" => "2780400" };
        assert_eq!(write_one(writer, &record), "name: Arg\ncapital: BA\n%%\n");
    }

    #[test]
    fn test_rejects_unnormalized_names() {
        let mut writer = Writer::new(Vec::new());
        writer.set_output_fields(["name"]).unwrap();
        assert!(matches!(
            writer.set_output_fields(["name", "ISO 3166"]),
            Err(Error::InvalidFieldName { .. })
        ));
        assert!(writer.set_output_fields(["Name"]).is_err());
        assert!(writer.set_output_fields([""]).is_err());
        assert!(writer.set_output_fields(["  "]).is_err());
        assert_eq!(writer.output_fields(), ["name"]);
    }

    #[test]
    fn test_rejects_comment_and_delimiter_names() {
        let mut writer = Writer::new(Vec::new());
        for bad in ["#tag", "%x", "%%"] {
            assert!(matches!(
                writer.set_output_fields([bad]),
                Err(Error::InvalidFieldName { .. })
            ));
        }
        writer.set_output_fields(["tag#", "x%"]).unwrap();
    }

    #[test]
    fn test_record_keys_checked_in_sorted_order() {
        let mut writer = Writer::new(Vec::new());
        let bad = record! { "#tag" => "x", "name" => "Arg" };
        assert!(matches!(
            writer.write(&bad),
            Err(Error::InvalidFieldName { .. })
        ));
        writer.write(&record! { "name" => "Arg" }).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "name: Arg\n%%\n");
    }

    #[test]
    fn test_empty_values_skipped_without_force() {
        let record = record! { "name" => "Arg", "capital" => "   " };
        assert_eq!(write_one(Writer::new(Vec::new()), &record), "name: Arg\n%%\n");

        let empty = record! { "capital" => "" };
        assert_eq!(write_one(Writer::new(Vec::new()), &empty), "");
    }

    #[test]
    fn test_force_empty_writes_bare_names() {
        let mut writer = Writer::new(Vec::new());
        writer.force_empty = true;
        writer.set_output_fields(["name", "capital"]).unwrap();
        let record = record! { "name" => "Arg" };
        assert_eq!(write_one(writer, &record), "name: Arg\ncapital\n%%\n");
    }

    #[test]
    fn test_multiline_values_are_folded() {
        let record = record! { "anthem" => "Llanura, sierra y camino\nhicieron  de ti\n\nel destino" };
        assert_eq!(
            write_one(Writer::new(Vec::new()), &record),
            "anthem: Llanura, sierra y camino\n\thicieron de ti\n\tel destino\n%%\n"
        );
    }

    #[test]
    fn test_space_indent() {
        let options = WriterOptions::new().with_indent(Indent::Space);
        let writer = Writer::with_options(Vec::new(), options).unwrap();
        let record = record! { "a" => "x\ny" };
        assert_eq!(write_one(writer, &record), "a: x\n y\n%%\n");
    }

    #[test]
    fn test_flush_is_repeatable() {
        let mut writer = Writer::new(Vec::new());
        writer.write(&record! { "a" => "1" }).unwrap();
        writer.flush().unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner().unwrap(), b"a: 1\n%%\n");
    }

    #[test]
    fn test_sink_errors_are_wrapped() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "sink closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "sink closed"))
            }
        }

        let mut writer = Writer::new(Broken);
        writer.write(&record! { "a" => "1" }).unwrap();
        let err = writer.flush().unwrap_err();
        assert_eq!(err.to_string(), "flushing writer: sink closed");
    }
}
