//! Record-jar / stanza format reference
//!
//! This module documents the text format read and written by this library.
//!
//! # Overview
//!
//! A stanza file is a flat sequence of records. Each record is a set of
//! `name: value` fields, one per line, and records are separated by a
//! delimiter line. The format is meant to be edited by hand and to produce
//! small, readable diffs, which makes it a good fit for little databases such
//! as country and region tables:
//!
//! ```text
//! # Argentine provinces
//! ISO3166-2: AR-C
//! Name:      Ciudad Autónoma de Buenos Aires
//! Category:  City
//! %%
//! ISO3166-2: AR-B
//! Name:      Buenos Aires
//! Category:  Province
//! Anthem:
//!     Llanura, sierra y camino
//!     hicieron de ti el destino
//! %%
//! ```
//!
//! # Grammar
//!
//! Input is UTF-8. `\n` and `\r\n` both end a line; a lone `\r` is an
//! ordinary character.
//!
//! ```text
//! stream         := record*
//! record         := (comment_line | blank_line)* field* delimiter_line
//! field          := ws* field_name ':' field_value line_end
//!                 | ws* field_name line_end              (empty field)
//! field_name     := (any_char_except(':', line_end))+
//! comment_line   := ws* '#' any_chars line_end
//! blank_line     := ws* line_end
//! delimiter_line := ws* '%' any_chars line_end
//! continuation   := ws+ any_chars line_end               (part of a field_value)
//! ```
//!
//! The last record of a stream may omit its delimiter line. Where a field
//! name may begin, leading whitespace is skipped, so an indented `#` or `%`
//! line is still a comment or a delimiter. After a value line, an indented
//! line is a continuation instead (see below).
//!
//! # Field Names
//!
//! Names are case-insensitive. On reading, a name is trimmed, every interior
//! whitespace run becomes a single `-`, and the result is lower-cased:
//!
//! | Input         | Name          |
//! |---------------|---------------|
//! | `Name`        | `name`        |
//! | `ISO 3166`    | `iso-3166`    |
//! | `Postal  Code`| `postal-code` |
//!
//! A name may appear at most once per record. A second occurrence (in any
//! spelling that normalizes the same way) is a
//! [`DuplicateField`](crate::Error::DuplicateField) error.
//!
//! # Field Values
//!
//! Everything after the `:` up to the end of the line, with whitespace runs
//! collapsed to one space and leading/trailing whitespace removed.
//!
//! A value continues on following lines that start with whitespace:
//!
//! | Following line        | Effect on the value                          |
//! |-----------------------|----------------------------------------------|
//! | starts with whitespace| continuation, joined with one space          |
//! | blank                 | a continuation after it is joined with `\n`  |
//! | starts with `#`       | comment, ignored                             |
//! | starts with `%`       | ends the value and the record                |
//! | anything else         | ends the value; starts the next field        |
//!
//! A field whose value is empty is dropped, unless the reader was built with
//! [`ReaderOptions::keep_empty`](crate::ReaderOptions::keep_empty).
//!
//! # Output
//!
//! The writer always produces:
//!
//! - `\n` line endings
//! - `name: value` with exactly one space after the colon
//! - `%%` as the delimiter line after every record that wrote a field
//! - embedded newlines folded as a line end plus one indent character
//!   (tab by default, see [`Indent`](crate::Indent))
//!
//! Without an explicit field order, fields are written sorted by name so
//! that output is reproducible.
//!
//! A name starting with `#` or `%` would read back as a comment or a
//! delimiter, so the writer rejects it with
//! [`InvalidFieldName`](crate::Error::InvalidFieldName). The reader never
//! produces such names.
//!
//! Because a continuation line reads back joined with a space, a newline
//! inside a value becomes a space after one round trip. From then on the
//! value is stable. Writing paragraph breaks as blank lines is not
//! supported.
//!
//! # Edge Cases
//!
//! Runs of blank lines, comments, and delimiters with no fields before them
//! never produce a record:
//!
//! ```text
//! %%
//! # nothing here
//!
//! %%
//! ```
//!
//! A bare name with no colon marks an intentionally empty field:
//!
//! ```text
//! Name: Chubut
//! Anthem
//! %%
//! ```

// This module contains only documentation; no implementation code
