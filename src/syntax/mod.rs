//!
//! Syntax: the value tree, and the recursive-descent reader that
//! builds it from a token sequence.
//!

pub mod shape;
pub mod value;

use indexmap::IndexMap;

use crate::common::Pos;
use crate::error::{DeserializeError, ErrorKind};
use crate::lex::{Number, Token, Tokenizer};

pub use self::shape::{coerce, NoResolver, Shape, ShapeResolver};
pub use self::value::Value;

///
/// Default limit on object/array nesting.
///
pub const DEFAULT_MAX_DEPTH: usize = 100;

///
/// Reads one value from a token sequence by recursive descent.
///
/// The reader holds no state beyond its configuration; each call to
/// [`read`](Self::read) drains a fresh [Tokenizer]. A nesting guard
/// (default [DEFAULT_MAX_DEPTH]) bounds the recursion on every object
/// or array entry, so pathological input fails with a reported error
/// instead of exhausting the stack.
///
#[derive(Debug, Clone)]
pub struct ValueReader {
    max_depth: usize,
}

impl Default for ValueReader {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValueReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    ///
    /// Read a single untyped value, requiring nothing but insignificant
    /// trivia after it.
    ///
    pub fn read(&self, text: &str) -> Result<Value, DeserializeError> {
        self.read_tokens(Tokenizer::from_text(text), &Shape::Any, &NoResolver)
    }

    ///
    /// Read a single value coerced toward `shape`, resolving member
    /// names and enum variants through `resolver`.
    ///
    pub fn read_with_shape(
        &self,
        text: &str,
        shape: &Shape,
        resolver: &dyn ShapeResolver,
    ) -> Result<Value, DeserializeError> {
        self.read_tokens(Tokenizer::from_text(text), shape, resolver)
    }

    fn read_tokens(
        &self,
        mut tokens: Tokenizer,
        shape: &Shape,
        resolver: &dyn ShapeResolver,
    ) -> Result<Value, DeserializeError> {
        let first = tokens.next_token()?;
        let value = self.read_value(&mut tokens, first, 0, shape, resolver)?;

        let (pos, token) = tokens.next_token()?;
        if token != Token::End {
            return Err(DeserializeError::unexpected("end of input", pos));
        }

        Ok(value)
    }

    ///
    /// Dispatch on one already-pulled token. `depth` is the nesting
    /// level this value sits at (0 for the top level).
    ///
    fn read_value(
        &self,
        tokens: &mut Tokenizer,
        scanned: (Pos, Token),
        depth: usize,
        shape: &Shape,
        resolver: &dyn ShapeResolver,
    ) -> Result<Value, DeserializeError> {
        let (pos, token) = scanned;
        match token {
            Token::ObjectBegin => self.read_object(tokens, pos, depth, shape, resolver),
            Token::ArrayBegin => self.read_array(tokens, pos, depth, shape, resolver),
            Token::String(s) => shape::coerce(Value::String(s), shape, resolver, pos),
            Token::Number(n) => shape::coerce(Value::Number(n), shape, resolver, pos),
            Token::True => shape::coerce(Value::Bool(true), shape, resolver, pos),
            Token::False => shape::coerce(Value::Bool(false), shape, resolver, pos),
            Token::Null | Token::Undefined => shape::coerce(Value::Null, shape, resolver, pos),
            Token::NaN => {
                shape::coerce(Value::Number(Number::Double(f64::NAN)), shape, resolver, pos)
            }
            Token::PositiveInfinity => shape::coerce(
                Value::Number(Number::Double(f64::INFINITY)),
                shape,
                resolver,
                pos,
            ),
            Token::NegativeInfinity => shape::coerce(
                Value::Number(Number::Double(f64::NEG_INFINITY)),
                shape,
                resolver,
                pos,
            ),
            other => Err(DeserializeError::unexpected(
                format!("a value, found {}", other.describe()),
                pos,
            )),
        }
    }

    ///
    /// `ObjectBegin` is already consumed; `open` is its position.
    ///
    fn read_object(
        &self,
        tokens: &mut Tokenizer,
        open: Pos,
        depth: usize,
        shape: &Shape,
        resolver: &dyn ShapeResolver,
    ) -> Result<Value, DeserializeError> {
        let level = depth + 1;
        if level > self.max_depth {
            return Err(DeserializeError::new(ErrorKind::MaxDepthExceeded, open));
        }

        let mut members: IndexMap<String, Value> = IndexMap::new();

        let mut pending = tokens.next_token()?;
        if pending.1 == Token::ObjectEnd {
            return Ok(Value::Object(members));
        }

        loop {
            let (pos, token) = pending;
            let Token::PropertyName(name) = token else {
                return Err(DeserializeError::unexpected(
                    format!("a property name, found {}", token.describe()),
                    pos,
                ));
            };

            let (pos, token) = tokens.next_token()?;
            if token != Token::PairDelim {
                return Err(DeserializeError::unexpected(
                    format!("`:`, found {}", token.describe()),
                    pos,
                ));
            }

            // Slot lookup through the injected resolver; an unknown
            // member is still parsed, then discarded.
            let (slot, keep) = match shape {
                Shape::Record(record) => match resolver.member(record, &name) {
                    Some(slot) => (slot, true),
                    None => (Shape::Any, false),
                },
                _ => (Shape::Any, true),
            };

            let first = tokens.next_token()?;
            let value = self.read_value(tokens, first, level, &slot, resolver)?;

            if keep {
                // Last occurrence wins, and takes the last slot in
                // iteration order.
                if members.contains_key(&name) {
                    members.shift_remove(&name);
                }
                members.insert(name, value);
            }

            let (pos, token) = tokens.next_token()?;
            match token {
                Token::ObjectEnd => break,
                Token::ValueDelim => pending = tokens.next_token()?,
                other => {
                    return Err(DeserializeError::unexpected(
                        format!("`,` or `}}`, found {}", other.describe()),
                        pos,
                    ))
                }
            }
        }

        Ok(Value::Object(members))
    }

    ///
    /// `ArrayBegin` is already consumed; `open` is its position.
    ///
    fn read_array(
        &self,
        tokens: &mut Tokenizer,
        open: Pos,
        depth: usize,
        shape: &Shape,
        resolver: &dyn ShapeResolver,
    ) -> Result<Value, DeserializeError> {
        let level = depth + 1;
        if level > self.max_depth {
            return Err(DeserializeError::new(ErrorKind::MaxDepthExceeded, open));
        }

        let mut elements = Vec::new();

        let mut pending = tokens.next_token()?;
        if pending.1 == Token::ArrayEnd {
            return Ok(Value::Array(elements));
        }

        loop {
            let value = self.read_value(tokens, pending, level, &Shape::Any, resolver)?;
            elements.push(value);

            let (pos, token) = tokens.next_token()?;
            match token {
                Token::ArrayEnd => break,
                Token::ValueDelim => pending = tokens.next_token()?,
                other => {
                    return Err(DeserializeError::unexpected(
                        format!("`,` or `]`, found {}", other.describe()),
                        pos,
                    ))
                }
            }
        }

        // With an element hint, coerce after the fact so disagreeing
        // elements degrade to the untyped array instead of failing.
        if let Shape::Array(element) = shape {
            return Ok(Value::Array(shape::coerce_elements(
                elements, element, resolver, open,
            )));
        }

        Ok(Value::Array(elements))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::error::ErrorKind;
    use crate::lex::Number;

    use super::{Shape, ShapeResolver, Value, ValueReader};

    fn read(text: &str) -> Value {
        ValueReader::new().read(text).expect("valid input")
    }

    fn read_err(text: &str) -> crate::error::DeserializeError {
        ValueReader::new().read(text).expect_err("invalid input")
    }

    #[test]
    fn scalars() {
        assert_eq!(read("null"), Value::Null);
        assert_eq!(read("undefined"), Value::Null);
        assert_eq!(read("true"), Value::Bool(true));
        assert_eq!(read("42"), Value::Number(Number::Int32(42)));
        assert_eq!(read("3.14"), Value::Number(Number::Double(3.14)));
        assert_eq!(read("'hi'"), Value::String("hi".into()));
    }

    #[test]
    fn non_finite_numbers() {
        assert_eq!(
            read("Infinity"),
            Value::Number(Number::Double(f64::INFINITY))
        );
        assert_eq!(
            read("-Infinity"),
            Value::Number(Number::Double(f64::NEG_INFINITY))
        );
        assert!(read("NaN").as_f64().map(f64::is_nan).unwrap_or(false));
    }

    #[test]
    fn nested_graphs() {
        let value = read(r#"{"a": [1, {"b": null}], c: 'text'}"#);

        let a = value.get("a").unwrap().as_array().unwrap();
        assert_eq!(a[0], Value::Number(Number::Int32(1)));
        assert_eq!(a[1].get("b"), Some(&Value::Null));
        assert_eq!(value.get("c").unwrap().as_str(), Some("text"));
    }

    #[test]
    fn empty_containers() {
        assert_eq!(read("[]"), Value::Array(vec![]));
        assert_eq!(read("{}"), Value::Object(indexmap::IndexMap::new()));
    }

    #[test]
    fn comments_ignored() {
        assert_eq!(
            read("/* c */ 1 // trailing"),
            Value::Number(Number::Int32(1))
        );
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let value = read(r#"{"a":1,"b":2,"a":3}"#);
        let members = value.as_object().unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members.get("a"), Some(&Value::Number(Number::Int32(3))));
        // The first occurrence's iteration slot is lost.
        let order: Vec<&str> = members.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn trailing_comma_is_rejected() {
        assert!(ValueReader::new().read("[1,]").is_err());
        assert!(ValueReader::new().read(r#"{"a":1,}"#).is_err());
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = read_err("1 2");
        assert!(matches!(err.kind(), ErrorKind::UnexpectedToken(_)));
        assert_eq!(err.column(), 3);
    }

    #[test]
    fn missing_member_value_points_at_close_brace() {
        let err = read_err(r#"{"a": }"#);
        assert!(matches!(err.kind(), ErrorKind::UnexpectedToken(_)));
        assert_eq!(err.line(), 1);
        assert_eq!(err.column(), 7);
        assert_eq!(err.index(), 7);
    }

    #[test]
    fn depth_guard() {
        let limit = 8;
        let reader = ValueReader::with_max_depth(limit);

        let at_limit = format!("{}1{}", "[".repeat(limit), "]".repeat(limit));
        assert!(reader.read(&at_limit).is_ok());

        let beyond = format!("{}1{}", "[".repeat(limit + 1), "]".repeat(limit + 1));
        let err = reader.read(&beyond).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::MaxDepthExceeded);
        // The guard trips at the entry that crossed the limit.
        assert_eq!(err.column() as usize, limit + 1);
    }

    #[test]
    fn depth_guard_covers_objects() {
        let reader = ValueReader::with_max_depth(3);

        let nested = r#"{"a":{"b":{"c":1}}}"#;
        assert!(reader.read(nested).is_ok());

        let too_deep = r#"{"a":{"b":{"c":{"d":1}}}}"#;
        let err = reader.read(too_deep).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::MaxDepthExceeded);
    }

    #[test]
    fn default_depth_guard() {
        let deep = format!("{}{}", "[".repeat(101), "]".repeat(101));
        let err = ValueReader::new().read(&deep).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::MaxDepthExceeded);
    }

    #[test]
    fn round_trip() {
        let text = r#"{"b":[1,2.5,"x\n"],"a":{"inner":null},"c":true}"#;
        let value = read(text);

        let reprinted = value.to_string();
        assert_eq!(read(&reprinted), value);
        assert_eq!(reprinted, text);
    }

    #[test]
    fn round_trip_keeps_large_integral_doubles_double() {
        let value = read("1e16");
        assert_eq!(value, Value::Number(Number::Double(1e16)));
        assert_eq!(read(&value.to_string()), value);
    }

    #[test]
    fn round_trip_preserves_duplicate_policy() {
        let value = read(r#"{"a":1,"b":2,"a":3}"#);
        assert_eq!(value.to_string(), r#"{"b":2,"a":3}"#);
        assert_eq!(read(&value.to_string()), value);
    }

    struct Fixture;

    impl ShapeResolver for Fixture {
        fn member(&self, record: &str, name: &str) -> Option<Shape> {
            match (record, name) {
                ("Order", "qty") => Some(Shape::Int32),
                ("Order", "price") => Some(Shape::Double),
                ("Order", "tags") => Some(Shape::Array(Box::new(Shape::String))),
                _ => None,
            }
        }

        fn enum_value(&self, _: &str, _: &str) -> Option<i64> {
            None
        }
    }

    #[test]
    fn shape_binding() {
        let reader = ValueReader::new();
        let bound = reader
            .read_with_shape(
                r#"{qty: 2, price: 9, note: "ignored", tags: ["a", "b"]}"#,
                &Shape::Record("Order".to_string()),
                &Fixture,
            )
            .unwrap();

        let members = bound.as_object().unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(members.get("qty"), Some(&Value::Number(Number::Int32(2))));
        // Widened by the slot hint.
        assert_eq!(
            members.get("price"),
            Some(&Value::Number(Number::Double(9.0)))
        );
        assert_eq!(members.get("note"), None);
    }

    #[test]
    fn non_finite_values_respect_slot_shapes() {
        let reader = ValueReader::new();

        // A double slot accepts NaN like any other double.
        let bound = reader
            .read_with_shape(
                "{price: NaN}",
                &Shape::Record("Order".to_string()),
                &Fixture,
            )
            .unwrap();
        assert!(bound
            .get("price")
            .and_then(Value::as_f64)
            .map(f64::is_nan)
            .unwrap_or(false));

        // An integer slot rejects it just as it rejects a finite double.
        let err = reader
            .read_with_shape(
                "{qty: NaN}",
                &Shape::Record("Order".to_string()),
                &Fixture,
            )
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnexpectedToken(_)));

        let err = reader
            .read_with_shape("Infinity", &Shape::Int32, &Fixture)
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnexpectedToken(_)));
    }

    #[test]
    fn element_hint_degrades_on_mixed_arrays() {
        let reader = ValueReader::new();
        let mixed = reader
            .read_with_shape(
                r#"[1, "two"]"#,
                &Shape::Array(Box::new(Shape::Int32)),
                &Fixture,
            )
            .unwrap();

        assert_eq!(
            mixed,
            Value::Array(vec![
                Value::Number(Number::Int32(1)),
                Value::String("two".into()),
            ])
        );
    }
}
