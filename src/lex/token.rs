//!
//! The token model, plus the shared keyword table.
//!

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::number::Number;

///
/// A single lexical token of the extended JSON grammar.
///
/// Tokens are value objects: once yielded by the tokenizer they are
/// immutable and owned by the consumer. `End` is the terminal token at
/// exhaustion of the input.
///
/// A quoted string or bare identifier that is followed (past any
/// whitespace or comments) by a `:` is yielded as [`PropertyName`]
/// rather than [`String`], which is how object keys are told apart from
/// string values without a separate grammar state.
///
/// [`PropertyName`]: Token::PropertyName
/// [`String`]: Token::String
///
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    ArrayBegin,
    ArrayEnd,
    ObjectBegin,
    ObjectEnd,
    ValueDelim,
    PairDelim,
    PropertyName(String),
    String(String),
    Number(Number),
    True,
    False,
    Null,
    NaN,
    PositiveInfinity,
    NegativeInfinity,
    Undefined,
    End,
}

impl Token {
    ///
    /// A short description for structural error messages.
    ///
    pub fn describe(&self) -> &'static str {
        match self {
            Token::ArrayBegin => "`[`",
            Token::ArrayEnd => "`]`",
            Token::ObjectBegin => "`{`",
            Token::ObjectEnd => "`}`",
            Token::ValueDelim => "`,`",
            Token::PairDelim => "`:`",
            Token::PropertyName(_) => "property name",
            Token::String(_) => "string",
            Token::Number(_) => "number",
            Token::True => "`true`",
            Token::False => "`false`",
            Token::Null => "`null`",
            Token::NaN => "`NaN`",
            Token::PositiveInfinity => "`Infinity`",
            Token::NegativeInfinity => "`-Infinity`",
            Token::Undefined => "`undefined`",
            Token::End => "end of input",
        }
    }
}

lazy_static! {
    ///
    /// Keyword text to token, shared read-only process-wide.
    ///
    /// A leading unary sign is handled by the tokenizer and is only
    /// legal in front of `Infinity`.
    ///
    pub(crate) static ref KEYWORDS: HashMap<&'static str, Token> = {
        let mut table = HashMap::new();
        table.insert("true", Token::True);
        table.insert("false", Token::False);
        table.insert("null", Token::Null);
        table.insert("NaN", Token::NaN);
        table.insert("Infinity", Token::PositiveInfinity);
        table.insert("undefined", Token::Undefined);
        table
    };
}
