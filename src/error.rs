//!
//! The single error family for everything that can go wrong between
//! raw text and a finished value tree.
//!

use thiserror::Error;

use crate::common::Pos;

///
/// What went wrong.
///
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    ///
    /// The current character or identifier does not start any valid token.
    ///
    #[error("unrecognized token")]
    UnrecognizedToken,

    ///
    /// A control character, raw line break, or end of input was found
    /// before the closing string delimiter.
    ///
    #[error("unterminated string literal")]
    UnterminatedString,

    ///
    /// End of input before the closing `*/` of a block comment.
    ///
    #[error("unterminated block comment")]
    UnterminatedComment,

    ///
    /// Malformed integer, fraction or exponent digits, or a letter
    /// directly after a well-formed number.
    ///
    #[error("illegal number")]
    IllegalNumber,

    ///
    /// A structural error: the reader saw a token it could not use where
    /// a value, member or delimiter was expected.
    ///
    #[error("unexpected token: expected {0}")]
    UnexpectedToken(String),

    ///
    /// The nesting guard tripped.
    ///
    #[error("maximum nesting depth exceeded")]
    MaxDepthExceeded,
}

///
/// An error raised at the exact point of detection, carrying the
/// character index, line, and column of the offending input.
///
/// Positions are captured when the error is constructed, never
/// retrofitted: an unterminated string reports its *opening* delimiter,
/// an unterminated block comment reports the comment's start, and the
/// reader's structural errors report the offending token's own scan
/// position.
///
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {pos}")]
pub struct DeserializeError {
    kind: ErrorKind,
    pos: Pos,
}

impl DeserializeError {
    pub(crate) fn new(kind: ErrorKind, pos: Pos) -> Self {
        Self { kind, pos }
    }

    pub(crate) fn unexpected(expected: impl Into<String>, pos: Pos) -> Self {
        Self::new(ErrorKind::UnexpectedToken(expected.into()), pos)
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn position(&self) -> Pos {
        self.pos
    }

    pub fn index(&self) -> u64 {
        self.pos.index
    }

    pub fn line(&self) -> u32 {
        self.pos.line
    }

    pub fn column(&self) -> u32 {
        self.pos.column
    }
}
