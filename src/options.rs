//! Configuration options for reading and writing stanza files.
//!
//! - [`ReaderOptions`]: how the reader treats fields with empty values
//! - [`WriterOptions`]: field order, empty-field policy and fold indentation
//! - [`Indent`]: the character that starts a continuation line on output
//!
//! ## Examples
//!
//! ```rust
//! use serde_stanza::{record, Indent, Writer, WriterOptions};
//!
//! let options = WriterOptions::new()
//!     .with_fields(["capital", "name"])
//!     .with_indent(Indent::Space);
//!
//! let mut writer = Writer::with_options(Vec::new(), options).unwrap();
//! writer.write(&record! { "name" => "Arg", "capital" => "BA" }).unwrap();
//! let out = writer.into_inner().unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "capital: BA\nname: Arg\n%%\n");
//! ```

/// Leading character of a folded continuation line.
///
/// A value containing embedded newlines is written as one line per segment,
/// every segment after the first starting with this character.
///
/// # Examples
///
/// ```rust
/// use serde_stanza::Indent;
///
/// assert_eq!(Indent::Tab.as_char(), '\t');
/// assert_eq!(Indent::Space.as_char(), ' ');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tab,
    Space,
}

impl Indent {
    /// Returns the character written at the start of a continuation line.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Indent::Tab => '\t',
            Indent::Space => ' ',
        }
    }
}

/// Options controlling how a [`Reader`](crate::Reader) builds records.
///
/// # Examples
///
/// ```rust
/// use serde_stanza::{Reader, ReaderOptions};
///
/// let input = "name: Arg\nflag\n%%\n";
/// let options = ReaderOptions::new().with_keep_empty(true);
/// let mut reader = Reader::with_options(input.as_bytes(), options);
///
/// let record = reader.decode_next().unwrap().unwrap();
/// assert_eq!(record.get("flag"), Some(""));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReaderOptions {
    /// Store fields whose value is empty instead of dropping them.
    pub keep_empty: bool,
}

impl ReaderOptions {
    /// Creates default options: empty fields are dropped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps (or drops) fields with empty values.
    #[must_use]
    pub fn with_keep_empty(mut self, keep_empty: bool) -> Self {
        self.keep_empty = keep_empty;
        self
    }
}

/// Options controlling how a [`Writer`](crate::Writer) emits records.
///
/// # Examples
///
/// ```rust
/// use serde_stanza::{Indent, WriterOptions};
///
/// let options = WriterOptions::new();
/// assert!(!options.force_empty);
/// assert!(options.fields.is_empty());
/// assert_eq!(options.indent, Indent::Tab);
/// ```
#[derive(Clone, Debug, Default)]
pub struct WriterOptions {
    /// Emit empty fields as bare name lines instead of skipping them.
    pub force_empty: bool,
    /// Field emission order. Empty means each record's own names, sorted.
    pub fields: Vec<String>,
    /// Leading character of continuation lines.
    pub indent: Indent,
}

impl WriterOptions {
    /// Creates default options: sorted field order, empty fields skipped,
    /// tab-indented continuation lines.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits empty fields as presence markers.
    #[must_use]
    pub fn with_force_empty(mut self, force_empty: bool) -> Self {
        self.force_empty = force_empty;
        self
    }

    /// Fixes the field emission order.
    ///
    /// The names are validated when the writer is built, see
    /// [`Writer::set_output_fields`](crate::Writer::set_output_fields).
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the continuation line indentation.
    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }
}
