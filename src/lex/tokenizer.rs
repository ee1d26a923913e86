//!
//! The tokenizer: one forward pass from characters to [Token]s.
//!

use crate::common::{Pos, TextScanner};
use crate::error::{DeserializeError, ErrorKind};

use super::number::{self, NumberScan};
use super::strings;
use super::token::{Token, KEYWORDS};

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

///
/// A lazy, forward-only token sequence over a single [TextScanner].
///
/// Each call to [`next_token`](Self::next_token) performs a single
/// forward pass with no backtracking and O(1) extra memory beyond the
/// token's own text payload. The scanner is owned by the tokenizer and
/// released when the tokenizer is dropped, whether tokenization
/// completed, failed, or was abandoned mid-stream.
///
/// The same sequence is available through [Iterator], which ends at the
/// terminal [`Token::End`] and is fused after the end or after an
/// error.
///
#[derive(Debug)]
pub struct Tokenizer {
    scanner: TextScanner,
    done: bool,
}

impl Tokenizer {
    pub fn new(scanner: TextScanner) -> Self {
        Self {
            scanner,
            done: false,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(TextScanner::new(text))
    }

    ///
    /// The live scanner position, readable at any point for host-side
    /// diagnostics.
    ///
    pub fn position(&self) -> Pos {
        self.scanner.position()
    }

    ///
    /// Produce the next token and the position it was scanned at.
    ///
    /// At exhaustion this yields the terminal [`Token::End`], and will
    /// keep yielding it if called again.
    ///
    pub fn next_token(&mut self) -> Result<(Pos, Token), DeserializeError> {
        self.skip_comments_and_whitespace()?;

        let start = self.scanner.position();
        let Some(ch) = self.scanner.peek() else {
            self.done = true;
            return Ok((start, Token::End));
        };

        let token = match ch {
            '[' => {
                self.scanner.pop();
                Token::ArrayBegin
            }
            ']' => {
                self.scanner.pop();
                Token::ArrayEnd
            }
            '{' => {
                self.scanner.pop();
                Token::ObjectBegin
            }
            '}' => {
                self.scanner.pop();
                Token::ObjectEnd
            }
            ',' => {
                self.scanner.pop();
                Token::ValueDelim
            }
            ':' => {
                self.scanner.pop();
                Token::PairDelim
            }
            '"' | '\'' => {
                let text = strings::scan_string(&mut self.scanner, start)?;
                self.classify_text(text)?
            }
            '+' | '-' | '.' | '0'..='9' => {
                match number::scan_number(&mut self.scanner, start)? {
                    NumberScan::Number(n) => Token::Number(n),
                    // The sign was consumed; only `Infinity` may follow it.
                    NumberScan::NotANumber { sign } => self.scan_keyword(start, sign)?,
                }
            }
            ch if is_identifier_start(ch) => self.scan_keyword(start, None)?,
            _ => return Err(DeserializeError::new(ErrorKind::UnrecognizedToken, start)),
        };

        Ok((start, token))
    }

    ///
    /// Decide whether a just-closed string literal is a value or an
    /// object key: if the next token-significant character is a `:`,
    /// the string was a property name.
    ///
    fn classify_text(&mut self, text: String) -> Result<Token, DeserializeError> {
        self.skip_comments_and_whitespace()?;
        if self.scanner.peek() == Some(':') {
            Ok(Token::PropertyName(text))
        } else {
            Ok(Token::String(text))
        }
    }

    ///
    /// Scan an identifier and resolve it against the keyword table.
    ///
    /// An identifier that is no keyword is accepted only as an unquoted
    /// object key (followed by `:`); anywhere else it is unrecognized.
    ///
    fn scan_keyword(&mut self, start: Pos, sign: Option<char>) -> Result<Token, DeserializeError> {
        let name = self.scan_identifier();
        if name.is_empty() {
            return Err(DeserializeError::new(ErrorKind::UnrecognizedToken, start));
        }

        if let Some(keyword) = KEYWORDS.get(name.as_str()) {
            return match (sign, keyword) {
                (None, token) => Ok(token.clone()),
                (Some('-'), Token::PositiveInfinity) => Ok(Token::NegativeInfinity),
                (Some('+'), Token::PositiveInfinity) => Ok(Token::PositiveInfinity),
                // A sign in front of any other keyword matches nothing.
                _ => Err(DeserializeError::new(ErrorKind::UnrecognizedToken, start)),
            };
        }

        if sign.is_some() {
            return Err(DeserializeError::new(ErrorKind::UnrecognizedToken, start));
        }

        match self.classify_text(name)? {
            token @ Token::PropertyName(_) => Ok(token),
            _ => Err(DeserializeError::new(ErrorKind::UnrecognizedToken, start)),
        }
    }

    fn scan_identifier(&mut self) -> String {
        if !matches!(self.scanner.peek(), Some(ch) if is_identifier_start(ch)) {
            return String::new();
        }

        self.scanner.begin_chunk();
        while let Some(ch) = self.scanner.peek() {
            if !is_identifier_part(ch) {
                break;
            }
            self.scanner.pop();
        }
        self.scanner.end_chunk()
    }

    ///
    /// Skip insignificant whitespace, `/* ... */` and `// ...` runs.
    ///
    /// An unterminated block comment fails at the comment's *start*,
    /// not at the point of exhaustion.
    ///
    fn skip_comments_and_whitespace(&mut self) -> Result<(), DeserializeError> {
        loop {
            while let Some(' ' | '\t' | '\r' | '\n') = self.scanner.peek() {
                self.scanner.pop();
            }

            if self.scanner.peek() != Some('/') {
                return Ok(());
            }

            let start = self.scanner.position();
            self.scanner.pop();
            match self.scanner.peek() {
                Some('*') => {
                    self.scanner.pop();
                    self.skip_block_comment(start)?;
                }
                Some('/') => {
                    self.scanner.pop();
                    // Line comments end at EOL or EOF, both fine.
                    while let Some(ch) = self.scanner.peek() {
                        if ch == '\r' || ch == '\n' {
                            break;
                        }
                        self.scanner.pop();
                    }
                }
                _ => return Err(DeserializeError::new(ErrorKind::UnrecognizedToken, start)),
            }
        }
    }

    fn skip_block_comment(&mut self, start: Pos) -> Result<(), DeserializeError> {
        let mut star = false;
        while let Some(ch) = self.scanner.pop() {
            if star && ch == '/' {
                return Ok(());
            }
            star = ch == '*';
        }
        Err(DeserializeError::new(ErrorKind::UnterminatedComment, start))
    }
}

impl Iterator for Tokenizer {
    type Item = Result<(Pos, Token), DeserializeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_token() {
            Ok((_, Token::End)) => None,
            Ok(scanned) => Some(Ok(scanned)),
            Err(errant) => {
                self.done = true;
                Some(Err(errant))
            }
        }
    }
}
