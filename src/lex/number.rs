//!
//! Number scanning, and the choice of numeric representation.
//!

use std::fmt::{self, Display, Formatter};

use crate::common::{Pos, TextScanner};
use crate::error::{DeserializeError, ErrorKind};

///
/// A scanned number, in the smallest representation that holds it
/// without loss.
///
/// Integers with fewer than 19 significant digits and no fraction or
/// exponent take the `Int32 -> Int64` path; everything else is an
/// IEEE-754 `Double`.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int32(i32),
    Int64(i64),
    Double(f64),
}

impl Number {
    ///
    /// The value widened to a double.
    ///
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int32(v) => f64::from(v),
            Number::Int64(v) => v as f64,
            Number::Double(v) => v,
        }
    }

    ///
    /// The value as an `i64`, if it is an integer.
    ///
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Int32(v) => Some(i64::from(v)),
            Number::Int64(v) => Some(v),
            Number::Double(_) => None,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int32(v) => write!(f, "{v}"),
            Number::Int64(v) => write!(f, "{v}"),
            Number::Double(v) if v.is_nan() => write!(f, "NaN"),
            Number::Double(v) if v.is_infinite() && v > 0.0 => write!(f, "Infinity"),
            Number::Double(v) if v.is_infinite() => write!(f, "-Infinity"),
            // Keep a fraction on integral doubles so they re-read as doubles.
            Number::Double(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            Number::Double(v) => write!(f, "{v}"),
        }
    }
}

///
/// Outcome of a number scan.
///
/// `NotANumber` is not an error: a unary sign followed by something
/// that is not a digit or `.` hands control back to the tokenizer so
/// the `Infinity` keyword path can claim the sign.
///
pub(crate) enum NumberScan {
    Number(Number),
    NotANumber { sign: Option<char> },
}

///
/// Scan a numeric literal: optional sign, integer digits, optional `.`
/// plus mandatory fraction digits, optional exponent with mandatory
/// digits. A letter directly after a well-formed number (`0x1`, `1f`)
/// is illegal.
///
/// `start` is the position of the first character, used for every
/// failure raised here.
///
pub(crate) fn scan_number(
    scanner: &mut TextScanner,
    start: Pos,
) -> Result<NumberScan, DeserializeError> {
    scanner.begin_chunk();

    let mut sign = None;
    if let Some(ch @ ('+' | '-')) = scanner.peek() {
        sign = Some(ch);
        scanner.pop();
    }

    // Integer digits, counting significant digits past leading zeros.
    let mut precision = 0usize;
    let mut significant = false;
    let mut has_digits = false;
    while let Some(ch) = scanner.peek() {
        if !ch.is_ascii_digit() {
            break;
        }
        has_digits = true;
        if ch != '0' {
            significant = true;
        }
        if significant {
            precision += 1;
        }
        scanner.pop();
    }

    // A bare sign is no number at all; let the keyword path try.
    if !has_digits && scanner.peek() != Some('.') {
        scanner.end_chunk();
        return Ok(NumberScan::NotANumber { sign });
    }

    let mut has_decimal = false;
    if scanner.peek() == Some('.') {
        has_decimal = true;
        scanner.pop();

        let mut fraction_digits = false;
        while let Some(ch) = scanner.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            fraction_digits = true;
            precision += 1;
            scanner.pop();
        }

        // `1.` and a lone `.` are both malformed.
        if !fraction_digits {
            return Err(DeserializeError::new(ErrorKind::IllegalNumber, start));
        }
    }

    let mut has_exponent = false;
    if let Some('e' | 'E') = scanner.peek() {
        has_exponent = true;
        scanner.pop();

        if let Some('+' | '-') = scanner.peek() {
            scanner.pop();
        }

        let mut exponent_digits = false;
        while let Some(ch) = scanner.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            exponent_digits = true;
            scanner.pop();
        }

        if !exponent_digits {
            return Err(DeserializeError::new(ErrorKind::IllegalNumber, start));
        }
    }

    // `0x1`, `1f`, `3.14pi`. Non-ASCII letters count too.
    if let Some(ch) = scanner.peek() {
        if ch.is_alphanumeric() || ch == '_' || ch == '$' {
            return Err(DeserializeError::new(ErrorKind::IllegalNumber, start));
        }
    }

    let text = scanner.end_chunk();

    // Fewer than 19 significant digits always fits an i64 exactly.
    let number = if !has_decimal && !has_exponent && precision < 19 {
        let parsed: i64 = text
            .parse()
            .map_err(|_| DeserializeError::new(ErrorKind::IllegalNumber, start))?;
        match i32::try_from(parsed) {
            Ok(narrow) => Number::Int32(narrow),
            Err(_) => Number::Int64(parsed),
        }
    } else {
        let parsed: f64 = text
            .parse()
            .map_err(|_| DeserializeError::new(ErrorKind::IllegalNumber, start))?;
        Number::Double(parsed)
    };

    Ok(NumberScan::Number(number))
}
