//!
//! The character cursor over an input source.
//!

use std::io::{self, Read};

use super::Pos;

///
/// A forward-only character cursor with single-character lookahead.
///
/// Tracks index/line/column as characters are consumed, normalizing
/// `\r\n`, `\r` and `\n` to a single line increment each, and supports
/// "chunk" marking so a contiguous run of characters can be extracted
/// without per-character buffering.
///
/// The scanner performs no semantic validation; deciding what a
/// character *means* is entirely the tokenizer's job.
///
#[derive(Debug)]
pub struct TextScanner {
    chars: Vec<char>,
    cursor: usize,
    pos: Pos,
    last_was_cr: bool,
    chunk_start: Option<usize>,
}

impl TextScanner {
    ///
    /// Create a scanner over a string of source text.
    ///
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            cursor: 0,
            pos: Pos::start(),
            last_was_cr: false,
            chunk_start: None,
        }
    }

    ///
    /// Create a scanner by draining a pull-based reader.
    ///
    /// The reader is released as soon as this returns; the scanner
    /// itself owns no handle afterwards (dropping the scanner is the
    /// release on every other path).
    ///
    pub fn from_reader(mut reader: impl Read) -> io::Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::new(&text))
    }

    ///
    /// The position of the next unread character.
    ///
    pub fn position(&self) -> Pos {
        self.pos
    }

    ///
    /// Peek at the next character without consuming it.
    ///
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    ///
    /// Consume one character, advancing index/line/column.
    ///
    pub fn pop(&mut self) -> Option<char> {
        let ch = self.chars.get(self.cursor).copied()?;
        self.cursor += 1;
        self.pos.index += 1;

        match ch {
            // A <LF> directly after a <CR> belongs to the same break.
            '\n' if self.last_was_cr => {
                self.last_was_cr = false;
            }
            '\n' | '\r' => {
                self.pos.line += 1;
                self.pos.column = 1;
                self.last_was_cr = ch == '\r';
            }
            _ => {
                self.pos.column += 1;
                self.last_was_cr = false;
            }
        }

        Some(ch)
    }

    ///
    /// True once the input is exhausted.
    ///
    pub fn is_completed(&self) -> bool {
        self.cursor >= self.chars.len()
    }

    ///
    /// Mark the start of a chunk at the next unread character.
    ///
    /// Any chunk already in progress is abandoned.
    ///
    pub fn begin_chunk(&mut self) {
        self.chunk_start = Some(self.cursor);
    }

    ///
    /// Close the current chunk and return everything consumed since
    /// [`begin_chunk`](Self::begin_chunk), excluding the next unread
    /// character. May immediately be followed by another `begin_chunk`,
    /// which is how escape sequences interrupt an otherwise-contiguous
    /// string run.
    ///
    pub fn end_chunk(&mut self) -> String {
        let start = self.chunk_start.take().unwrap_or(self.cursor);
        self.chars[start..self.cursor].iter().collect()
    }
}
