//!
//! Lexical analysis: tokens, and the tokenizer that produces them.
//!

pub mod number;
pub mod strings;
pub mod token;
pub mod tokenizer;

pub use self::{number::Number, token::Token, tokenizer::Tokenizer};
