//!
//! String literals and escape decoding.
//!

use crate::common::{Pos, TextScanner};
use crate::error::{DeserializeError, ErrorKind};

///
/// Scan a string literal delimited by `"` or `'`, starting at the
/// opening quote, and return its decoded contents.
///
/// Content is captured in chunks that are interrupted only at escape
/// sequences, so an escape-free string is a single chunk copy. Every
/// failure here is `UnterminatedString` pinned to `open`, the position
/// of the opening delimiter, not of the point of exhaustion.
///
/// Two lenient recoveries are deliberate and preserved from the
/// original grammar:
/// * `\0` is dropped entirely, so an embedded NUL can never truncate a
///   downstream consumer;
/// * a `\u` with fewer than four hex digits (or an unmappable code
///   point) decodes to a literal `u` plus whatever digits were
///   collected, instead of failing.
///
pub(crate) fn scan_string(
    scanner: &mut TextScanner,
    open: Pos,
) -> Result<String, DeserializeError> {
    let delim = match scanner.pop() {
        Some(ch) => ch,
        None => return Err(unterminated(open)),
    };

    let mut decoded = String::new();
    scanner.begin_chunk();

    loop {
        match scanner.peek() {
            None => return Err(unterminated(open)),
            Some(ch) if ch == delim => {
                decoded.push_str(&scanner.end_chunk());
                scanner.pop();
                return Ok(decoded);
            }
            Some('\\') => {
                decoded.push_str(&scanner.end_chunk());
                scanner.pop();
                decode_escape(scanner, &mut decoded, open)?;
                scanner.begin_chunk();
            }
            // Raw control characters (tab excepted) end the literal early.
            Some(ch) if ch <= '\u{1f}' && ch != '\t' => return Err(unterminated(open)),
            Some(_) => {
                scanner.pop();
            }
        }
    }
}

fn unterminated(open: Pos) -> DeserializeError {
    DeserializeError::new(ErrorKind::UnterminatedString, open)
}

///
/// Decode the single escape sequence following a consumed backslash.
///
fn decode_escape(
    scanner: &mut TextScanner,
    decoded: &mut String,
    open: Pos,
) -> Result<(), DeserializeError> {
    let escaped = match scanner.pop() {
        Some(ch) => ch,
        None => return Err(unterminated(open)),
    };

    match escaped {
        'b' => decoded.push('\u{8}'),
        'f' => decoded.push('\u{c}'),
        'n' => decoded.push('\n'),
        'r' => decoded.push('\r'),
        't' => decoded.push('\t'),
        '0' => {} // dropped
        'u' => {
            let mut digits = String::new();
            let mut code_point = 0u32;
            for _ in 0..4 {
                match scanner.peek() {
                    Some(ch) if ch.is_ascii_hexdigit() => {
                        // to_digit(16) cannot fail for an ASCII hex digit.
                        code_point = code_point * 16 + ch.to_digit(16).unwrap_or(0);
                        digits.push(ch);
                        scanner.pop();
                    }
                    _ => break,
                }
            }

            match char::from_u32(code_point) {
                Some(ch) if digits.len() == 4 => decoded.push(ch),
                _ => {
                    // Firefox-style recovery: emit the escape body verbatim.
                    decoded.push('u');
                    decoded.push_str(&digits);
                }
            }
        }
        other => decoded.push(other),
    }

    Ok(())
}
