//!
//! Things that help trace errors and tokens: [Pos].
//!

use std::fmt::{self, Display, Formatter};

///
/// Represents a character's location in source text.
///
/// All three fields are 1-based: `index` is the absolute character
/// offset into the input, while `line` and `column` follow normalized
/// line breaks (`\r\n`, `\r` and `\n` each count as one line).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub index: u64,
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub(crate) fn start() -> Self {
        Self {
            index: 1,
            line: 1,
            column: 1,
        }
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {} (index {})",
            self.line, self.column, self.index
        )
    }
}
