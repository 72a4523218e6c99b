//! Field-level tokenizer.
//!
//! The lexer turns runes into field names and folded field values. It knows
//! about comment lines (`#`), delimiter lines (`%`), blank lines and
//! continuation lines, but nothing about records; assembling fields into
//! records is the reader's job.

use crate::record::normalize_field_name;
use crate::source::{Rune, RuneSource};
use crate::Result;
use log::trace;
use std::io::BufRead;

/// What was found at the position where a field name may begin.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum NameToken {
    /// A field name. `has_value` is `false` when the line ended before any `:`.
    Field { name: String, has_value: bool },
    /// A blank, whitespace-only or comment line.
    Blank,
    /// A delimiter line; the rest of the line has been consumed.
    Delimiter,
    /// End of stream.
    Eof,
}

/// How a field value was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueEnd {
    /// The next line starts another field; its first rune was pushed back.
    Next,
    /// A delimiter line closed the record.
    Delimiter,
    /// The stream ended.
    Eof,
}

/// Classification of the line that follows a value line.
enum LineStart {
    Continuation,
    Field,
    Delimiter,
    Eof,
}

/// Separator owed before the next content character of a folded value.
#[derive(Clone, Copy)]
enum Join {
    Space,
    Newline,
}

pub(crate) struct Lexer<R> {
    source: RuneSource<R>,
    scratch: String,
}

impl<R: BufRead> Lexer<R> {
    pub(crate) fn new(inner: R) -> Self {
        Lexer {
            source: RuneSource::new(inner),
            scratch: String::with_capacity(64),
        }
    }

    pub(crate) fn line(&self) -> usize {
        self.source.line()
    }

    /// Reads a field name, or reports the blank, comment or delimiter line
    /// found in its place.
    ///
    /// Leading whitespace is skipped first, so an indented `#` or `%` line
    /// is still a comment or a delimiter.
    pub(crate) fn parse_name(&mut self) -> Result<NameToken> {
        let first = loop {
            match self.source.next()? {
                Some(rune) if rune.is_space() => continue,
                Some(rune) => break rune,
                None => return Ok(NameToken::Eof),
            }
        };
        match first {
            Rune::LineEnd => return Ok(NameToken::Blank),
            Rune::Char('#') => {
                self.source.skip_until(Rune::LineEnd)?;
                return Ok(NameToken::Blank);
            }
            Rune::Char('%') => {
                self.source.skip_until(Rune::LineEnd)?;
                return Ok(NameToken::Delimiter);
            }
            Rune::Char(_) => self.source.pushback(first),
        }

        self.scratch.clear();
        let has_value = loop {
            match self.source.next()? {
                None | Some(Rune::LineEnd) => break false,
                Some(Rune::Char(':')) => break true,
                Some(Rune::Char(c)) => self.scratch.push(c),
            }
        };

        let name = normalize_field_name(&self.scratch);
        if name.is_empty() && !has_value {
            return Ok(NameToken::Blank);
        }
        trace!("field name {:?} (value marker: {})", name, has_value);
        Ok(NameToken::Field { name, has_value })
    }

    /// Reads a field value that starts right after the `:` separator.
    ///
    /// Whitespace runs collapse to one space and never lead or trail the
    /// value. Continuation lines are joined with a space, or with a newline
    /// when a blank line came before them. Comment lines inside the value are
    /// dropped.
    pub(crate) fn parse_value(&mut self) -> Result<(String, ValueEnd)> {
        self.scratch.clear();
        let mut space = false;
        let mut join: Option<Join> = None;

        loop {
            match self.source.next()? {
                None => return Ok(self.finish_value(ValueEnd::Eof)),
                Some(Rune::Char(c)) if c.is_whitespace() => {
                    if join.is_none() && !self.scratch.is_empty() {
                        space = true;
                    }
                }
                Some(Rune::Char(c)) => {
                    if let Some(sep) = join.take() {
                        if !self.scratch.is_empty() {
                            self.scratch.push(match sep {
                                Join::Space => ' ',
                                Join::Newline => '\n',
                            });
                        }
                    } else if space {
                        self.scratch.push(' ');
                    }
                    space = false;
                    self.scratch.push(c);
                }
                Some(Rune::LineEnd) => {
                    space = false;
                    // A pending join means the line held only whitespace.
                    let mut paragraph = join.is_some();
                    match self.next_line(&mut paragraph)? {
                        LineStart::Continuation => {
                            join = Some(if paragraph {
                                Join::Newline
                            } else {
                                Join::Space
                            });
                        }
                        LineStart::Field => return Ok(self.finish_value(ValueEnd::Next)),
                        LineStart::Delimiter => {
                            return Ok(self.finish_value(ValueEnd::Delimiter))
                        }
                        LineStart::Eof => return Ok(self.finish_value(ValueEnd::Eof)),
                    }
                }
            }
        }
    }

    /// Discards input up to and including the next delimiter line.
    ///
    /// A partly read line is dropped first, so its remainder is never taken
    /// for a delimiter. Returns `false` if the stream ended before a
    /// delimiter was found.
    pub(crate) fn skip_record(&mut self) -> Result<bool> {
        if !self.source.at_line_start() && !self.source.skip_until(Rune::LineEnd)? {
            return Ok(false);
        }
        loop {
            match self.source.next()? {
                None => return Ok(false),
                Some(Rune::LineEnd) => continue,
                Some(Rune::Char('%')) => {
                    self.source.skip_until(Rune::LineEnd)?;
                    return Ok(true);
                }
                Some(Rune::Char(_)) => {
                    if !self.source.skip_until(Rune::LineEnd)? {
                        return Ok(false);
                    }
                }
            }
        }
    }

    /// Looks at the lines following a value line, consuming blank and comment
    /// lines, until one decides how the value continues.
    fn next_line(&mut self, paragraph: &mut bool) -> Result<LineStart> {
        loop {
            match self.source.next()? {
                None => return Ok(LineStart::Eof),
                Some(Rune::LineEnd) => *paragraph = true,
                Some(Rune::Char('#')) => {
                    if !self.source.skip_until(Rune::LineEnd)? {
                        return Ok(LineStart::Eof);
                    }
                }
                Some(Rune::Char('%')) => {
                    self.source.skip_until(Rune::LineEnd)?;
                    return Ok(LineStart::Delimiter);
                }
                Some(rune) if rune.is_space() => return Ok(LineStart::Continuation),
                Some(rune) => {
                    self.source.pushback(rune);
                    return Ok(LineStart::Field);
                }
            }
        }
    }

    fn finish_value(&mut self, end: ValueEnd) -> (String, ValueEnd) {
        trace!("field value of {} chars, ended by {:?}", self.scratch.len(), end);
        (std::mem::take(&mut self.scratch), end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexer(input: &str) -> Lexer<&[u8]> {
        Lexer::new(input.as_bytes())
    }

    fn field(name: &str, has_value: bool) -> NameToken {
        NameToken::Field {
            name: name.to_string(),
            has_value,
        }
    }

    #[test]
    fn test_name_is_lowercased_and_collapsed() {
        let mut lx = lexer("ISO  3166-2: AR-C\n");
        assert_eq!(lx.parse_name().unwrap(), field("iso-3166-2", true));
    }

    #[test]
    fn test_name_without_colon_has_no_value() {
        let mut lx = lexer("Flag\nname: x\n");
        assert_eq!(lx.parse_name().unwrap(), field("flag", false));
        assert_eq!(lx.parse_name().unwrap(), field("name", true));
    }

    #[test]
    fn test_comment_blank_and_delimiter_lines() {
        let mut lx = lexer("# comment\n\n   \n%% trailing junk\n");
        assert_eq!(lx.parse_name().unwrap(), NameToken::Blank);
        assert_eq!(lx.parse_name().unwrap(), NameToken::Blank);
        assert_eq!(lx.parse_name().unwrap(), NameToken::Blank);
        assert_eq!(lx.parse_name().unwrap(), NameToken::Delimiter);
        assert_eq!(lx.parse_name().unwrap(), NameToken::Eof);
    }

    #[test]
    fn test_indented_comment_and_delimiter_lines() {
        let mut lx = lexer("  #tag: x\n\t% x: 1\n  # just a note\n  name: Arg\n");
        assert_eq!(lx.parse_name().unwrap(), NameToken::Blank);
        assert_eq!(lx.parse_name().unwrap(), NameToken::Delimiter);
        assert_eq!(lx.parse_name().unwrap(), NameToken::Blank);
        assert_eq!(lx.parse_name().unwrap(), field("name", true));
    }

    #[test]
    fn test_whitespace_before_end_of_stream() {
        let mut lx = lexer("   ");
        assert_eq!(lx.parse_name().unwrap(), NameToken::Eof);
    }

    #[test]
    fn test_value_collapses_inner_whitespace() {
        let mut lx = lexer("   Ciudad    Autónoma \t de   Buenos Aires   \n");
        let (value, end) = lx.parse_value().unwrap();
        assert_eq!(value, "Ciudad Autónoma de Buenos Aires");
        assert_eq!(end, ValueEnd::Eof);
    }

    #[test]
    fn test_value_pushes_back_next_field() {
        let mut lx = lexer(" Arg\ncapital: BA\n");
        assert_eq!(lx.parse_value().unwrap(), ("Arg".to_string(), ValueEnd::Next));
        assert_eq!(lx.parse_name().unwrap(), field("capital", true));
        assert_eq!(lx.line(), 2);
    }

    #[test]
    fn test_continuation_lines_join_with_space() {
        let mut lx = lexer("\n\tone\n\ttwo\n  three\n%%\n");
        let (value, end) = lx.parse_value().unwrap();
        assert_eq!(value, "one two three");
        assert_eq!(end, ValueEnd::Delimiter);
        assert_eq!(lx.parse_name().unwrap(), NameToken::Eof);
    }

    #[test]
    fn test_blank_line_before_continuation_keeps_newline() {
        let mut lx = lexer(" first\n\n\tsecond\nnext: x\n");
        let (value, end) = lx.parse_value().unwrap();
        assert_eq!(value, "first\nsecond");
        assert_eq!(end, ValueEnd::Next);
    }

    #[test]
    fn test_whitespace_only_line_counts_as_blank() {
        let mut lx = lexer(" first\n   \n\tsecond\n");
        assert_eq!(lx.parse_value().unwrap().0, "first\nsecond");
    }

    #[test]
    fn test_comment_inside_value_is_skipped() {
        let mut lx = lexer(" a\n# note\n\tb\n");
        assert_eq!(lx.parse_value().unwrap().0, "a b");
    }

    #[test]
    fn test_trailing_blank_line_does_not_enter_value() {
        let mut lx = lexer(" tu alma con libertad.\n\n%%\n");
        let (value, end) = lx.parse_value().unwrap();
        assert_eq!(value, "tu alma con libertad.");
        assert_eq!(end, ValueEnd::Delimiter);
    }

    #[test]
    fn test_crlf_input() {
        let mut lx = lexer("Name: Chaco\r\n\tProvince\r\n%%\r\n");
        assert_eq!(lx.parse_name().unwrap(), field("name", true));
        assert_eq!(
            lx.parse_value().unwrap(),
            ("Chaco Province".to_string(), ValueEnd::Delimiter)
        );
    }

    #[test]
    fn test_skip_record() {
        let mut lx = lexer("a: 1\nb: 2\n%%\nc: 3\n");
        assert!(lx.skip_record().unwrap());
        assert_eq!(lx.parse_name().unwrap(), field("c", true));
        let mut lx = lexer("a: 1\n");
        assert!(!lx.skip_record().unwrap());
    }

    #[test]
    fn test_skip_record_drops_rest_of_current_line() {
        let mut lx = lexer("b: x%% not a delimiter\nc: 3\n%%\nd: 4\n");
        assert_eq!(lx.parse_name().unwrap(), field("b", true));
        assert!(lx.skip_record().unwrap());
        assert_eq!(lx.parse_name().unwrap(), field("d", true));
    }
}
