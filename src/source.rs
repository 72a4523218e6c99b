//! Character source with line-end normalization and one-rune pushback.

use crate::{Error, Result};
use log::trace;
use std::io::{self, BufRead};

/// A unit of input: a character, or one logical line end (`\n` or `\r\n`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rune {
    Char(char),
    LineEnd,
}

impl Rune {
    pub(crate) fn is_space(self) -> bool {
        matches!(self, Rune::Char(c) if c.is_whitespace())
    }
}

/// Reads UTF-8 characters from a buffered byte stream.
///
/// A `\r` directly followed by `\n` is folded into a single [`Rune::LineEnd`];
/// a lone `\r` is an ordinary character. The line counter is 1-based and
/// advances each time a line end is handed out.
pub(crate) struct RuneSource<R> {
    inner: R,
    pushback: Option<Rune>,
    line: usize,
    line_start: bool,
    // `line_start` as it was before the last rune, restored on pushback.
    prev_line_start: bool,
}

impl<R: BufRead> RuneSource<R> {
    pub(crate) fn new(inner: R) -> Self {
        RuneSource {
            inner,
            pushback: None,
            line: 1,
            line_start: true,
            prev_line_start: true,
        }
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }

    /// Whether the next rune is the first of a line. Cleared by a failed
    /// read, since the rest of that line is then in an unknown state.
    pub(crate) fn at_line_start(&self) -> bool {
        self.line_start
    }

    /// Returns the next rune, or `None` at end of stream.
    pub(crate) fn next(&mut self) -> Result<Option<Rune>> {
        let rune = match self.pushback.take() {
            Some(rune) => Some(rune),
            None => match self.read_rune() {
                Ok(rune) => rune,
                Err(e) => {
                    self.line_start = false;
                    return Err(e);
                }
            },
        };
        self.prev_line_start = self.line_start;
        match rune {
            Some(Rune::LineEnd) => {
                self.line += 1;
                self.line_start = true;
            }
            Some(Rune::Char(_)) => self.line_start = false,
            None => {}
        }
        Ok(rune)
    }

    /// Returns a rune to the source so the next call to [`next`](Self::next)
    /// yields it again. Only one rune can be pending.
    pub(crate) fn pushback(&mut self, rune: Rune) {
        debug_assert!(self.pushback.is_none(), "pushback slot already in use");
        if rune == Rune::LineEnd {
            self.line -= 1;
        }
        self.line_start = self.prev_line_start;
        self.pushback = Some(rune);
    }

    /// Discards runes up to and including `delim`.
    ///
    /// Returns `false` if the stream ended first.
    pub(crate) fn skip_until(&mut self, delim: Rune) -> Result<bool> {
        while let Some(rune) = self.next()? {
            if rune == delim {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let byte = loop {
            match self.inner.fill_buf() {
                Ok(buf) => break buf.first().copied(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io_at("reading record", self.line, e)),
            }
        };
        if byte.is_some() {
            self.inner.consume(1);
        }
        Ok(byte)
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io_at("reading record", self.line, e)),
            }
        }
    }

    fn read_rune(&mut self) -> Result<Option<Rune>> {
        let lead = match self.read_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        match lead {
            b'\n' => return Ok(Some(Rune::LineEnd)),
            b'\r' => {
                if self.peek_byte()? == Some(b'\n') {
                    self.inner.consume(1);
                    return Ok(Some(Rune::LineEnd));
                }
                return Ok(Some(Rune::Char('\r')));
            }
            0x00..=0x7F => return Ok(Some(Rune::Char(lead as char))),
            _ => {}
        }

        let width = match lead {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(Error::InvalidUtf8 { line: self.line }),
        };
        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            match self.read_byte()? {
                Some(b) => *slot = b,
                None => return Err(Error::InvalidUtf8 { line: self.line }),
            }
        }
        match std::str::from_utf8(&bytes[..width]) {
            Ok(s) => Ok(s.chars().next().map(Rune::Char)),
            Err(_) => {
                trace!("invalid {}-byte sequence at line {}", width, self.line);
                Err(Error::InvalidUtf8 { line: self.line })
            }
        }
    }
}
