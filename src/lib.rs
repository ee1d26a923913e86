//!
//! ## laxjson
//!
//! A tokenizer and value reader for an extended JSON grammar:
//! `/* block */` and `// line` comments, single- *or* double-quoted
//! strings, unquoted object keys, `NaN`, `undefined` and signed
//! `Infinity` literals, all in a single forward pass with zero
//! backtracking.
//!
//! ```
//! use laxjson::{parse, Value};
//!
//! let value = parse("{ answer: /* bare key */ 42, label: 'x' }").unwrap();
//! assert_eq!(value.get("answer").and_then(Value::as_i64), Some(42));
//! assert_eq!(value.get("label").and_then(Value::as_str), Some("x"));
//! ```
//!
//! Input flows one way: text, to the [TextScanner] cursor, to the
//! [Tokenizer]'s lazy token sequence, to the [ValueReader]'s value
//! tree. Every failure anywhere along that path is a
//! [DeserializeError] carrying the exact index, line and column of the
//! offending input.
//!

pub mod common;
pub mod error;
pub mod lex;
pub mod syntax;

pub use common::{Pos, TextScanner};
pub use error::{DeserializeError, ErrorKind};
pub use lex::{Number, Token, Tokenizer};
pub use syntax::{NoResolver, Shape, ShapeResolver, Value, ValueReader, DEFAULT_MAX_DEPTH};

///
/// Tokenize `text` as a lazy sequence of `(position, token)` pairs.
///
pub fn tokenize(text: &str) -> Tokenizer {
    Tokenizer::from_text(text)
}

///
/// Read a single value from `text` with the default configuration.
///
pub fn parse(text: &str) -> Result<Value, DeserializeError> {
    ValueReader::new().read(text)
}
