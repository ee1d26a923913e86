//!
//! Target shape hints and the injectable name/type resolver.
//!

use indexmap::IndexMap;

use crate::common::Pos;
use crate::error::DeserializeError;
use crate::lex::Number;

use super::Value;

///
/// The expected shape of a slot when binding input to a known target.
///
/// The reader never introspects targets itself: it only ever asks a
/// [ShapeResolver] "does this name map to a known slot, and what shape
/// does that slot expect", then coerces the value it read.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    ///
    /// No expectation; the value is kept as read.
    ///
    Any,
    Bool,
    Int32,
    Int64,
    Double,
    String,
    Array(Box<Shape>),

    ///
    /// A named record whose members are resolved one name at a time.
    ///
    Record(String),

    ///
    /// A named enumeration, bindable from a variant name or alias.
    ///
    Enum(String),
}

impl Shape {
    fn describe(&self) -> String {
        match self {
            Shape::Any => "any value".to_string(),
            Shape::Bool => "a boolean".to_string(),
            Shape::Int32 => "a 32-bit integer".to_string(),
            Shape::Int64 => "a 64-bit integer".to_string(),
            Shape::Double => "a double".to_string(),
            Shape::String => "a string".to_string(),
            Shape::Array(element) => format!("an array of {}", element.describe()),
            Shape::Record(name) => format!("a `{name}` record"),
            Shape::Enum(name) => format!("a `{name}` enumeration value"),
        }
    }
}

///
/// Name and type resolution for shape binding, injected by the host.
///
/// A host backs this with whatever metadata it has, typically a
/// generated table or an explicit schema. The reader only performs the
/// coercion; it hard-codes no knowledge of any target.
///
pub trait ShapeResolver {
    ///
    /// The shape of the member `name` of record `record`, or `None`
    /// when the name maps to no known slot (the member is then parsed
    /// and discarded).
    ///
    fn member(&self, record: &str, name: &str) -> Option<Shape>;

    ///
    /// The ordinal for a variant name or alias of `enumeration`, or
    /// `None` when the name is unknown.
    ///
    fn enum_value(&self, enumeration: &str, name: &str) -> Option<i64>;
}

///
/// A resolver that knows nothing; used for untyped reads.
///
pub struct NoResolver;

impl ShapeResolver for NoResolver {
    fn member(&self, _: &str, _: &str) -> Option<Shape> {
        None
    }

    fn enum_value(&self, _: &str, _: &str) -> Option<i64> {
        None
    }
}

///
/// Coerce `value` into `shape`.
///
/// Numeric coercion widens (`Int32 -> Int64 -> Double`) and narrows to
/// `Int32` only when the value fits exactly. Arrays degrade rather than
/// fail: when any element refuses the element shape, the original
/// untyped elements are kept. Everything else that cannot coerce is a
/// structural error at `pos`.
///
pub fn coerce(
    value: Value,
    shape: &Shape,
    resolver: &dyn ShapeResolver,
    pos: Pos,
) -> Result<Value, DeserializeError> {
    match (value, shape) {
        (value, Shape::Any) => Ok(value),

        // Null satisfies every slot.
        (Value::Null, _) => Ok(Value::Null),

        (value @ Value::Bool(_), Shape::Bool) => Ok(value),
        (value @ Value::String(_), Shape::String) => Ok(value),

        (Value::Number(n), Shape::Int32) => match n {
            Number::Int32(_) => Ok(Value::Number(n)),
            Number::Int64(wide) => i32::try_from(wide)
                .map(|narrow| Value::Number(Number::Int32(narrow)))
                .map_err(|_| DeserializeError::unexpected(shape.describe(), pos)),
            Number::Double(_) => Err(DeserializeError::unexpected(shape.describe(), pos)),
        },
        (Value::Number(n), Shape::Int64) => match n {
            Number::Int32(narrow) => Ok(Value::Number(Number::Int64(i64::from(narrow)))),
            Number::Int64(_) => Ok(Value::Number(n)),
            Number::Double(_) => Err(DeserializeError::unexpected(shape.describe(), pos)),
        },
        (Value::Number(n), Shape::Double) => Ok(Value::Number(Number::Double(n.as_f64()))),

        (Value::String(name), Shape::Enum(enumeration)) => resolver
            .enum_value(enumeration, &name)
            .map(|ordinal| Value::Number(Number::Int64(ordinal)))
            .ok_or_else(|| DeserializeError::unexpected(shape.describe(), pos)),
        // A numeric ordinal passes an enum slot through unchanged.
        (value @ Value::Number(_), Shape::Enum(_)) => Ok(value),

        (Value::Array(elements), Shape::Array(element)) => {
            Ok(Value::Array(coerce_elements(elements, element, resolver, pos)))
        }

        (Value::Object(members), Shape::Record(record)) => {
            let mut bound = IndexMap::new();
            for (name, member) in members {
                if let Some(slot) = resolver.member(record, &name) {
                    bound.insert(name, coerce(member, &slot, resolver, pos)?);
                }
            }
            Ok(Value::Object(bound))
        }

        (_, shape) => Err(DeserializeError::unexpected(shape.describe(), pos)),
    }
}

///
/// Coerce every element to the element shape, falling back to the
/// untyped originals when any element disagrees with it.
///
pub(crate) fn coerce_elements(
    elements: Vec<Value>,
    element: &Shape,
    resolver: &dyn ShapeResolver,
    pos: Pos,
) -> Vec<Value> {
    let coerced: Result<Vec<Value>, DeserializeError> = elements
        .iter()
        .cloned()
        .map(|value| coerce(value, element, resolver, pos))
        .collect();

    match coerced {
        Ok(typed) => typed,
        Err(_) => elements,
    }
}

#[cfg(test)]
mod tests {
    use crate::common::Pos;
    use crate::lex::Number;
    use crate::syntax::Value;

    use super::{coerce, NoResolver, Shape, ShapeResolver};

    struct Fixture;

    impl ShapeResolver for Fixture {
        fn member(&self, record: &str, name: &str) -> Option<Shape> {
            match (record, name) {
                ("Order", "qty") => Some(Shape::Int32),
                ("Order", "price") => Some(Shape::Double),
                ("Order", "status") => Some(Shape::Enum("Status".to_string())),
                _ => None,
            }
        }

        fn enum_value(&self, enumeration: &str, name: &str) -> Option<i64> {
            match (enumeration, name) {
                ("Status", "Open") | ("Status", "open") => Some(0),
                ("Status", "Closed") => Some(1),
                _ => None,
            }
        }
    }

    fn at() -> Pos {
        Pos::start()
    }

    #[test]
    fn widening() {
        let widened = coerce(
            Value::Number(Number::Int32(3)),
            &Shape::Double,
            &NoResolver,
            at(),
        )
        .unwrap();
        assert_eq!(widened, Value::Number(Number::Double(3.0)));

        let widened = coerce(
            Value::Number(Number::Int32(3)),
            &Shape::Int64,
            &NoResolver,
            at(),
        )
        .unwrap();
        assert_eq!(widened, Value::Number(Number::Int64(3)));
    }

    #[test]
    fn narrowing_only_when_exact() {
        let narrowed = coerce(
            Value::Number(Number::Int64(40)),
            &Shape::Int32,
            &NoResolver,
            at(),
        )
        .unwrap();
        assert_eq!(narrowed, Value::Number(Number::Int32(40)));

        let too_wide = coerce(
            Value::Number(Number::Int64(i64::MAX)),
            &Shape::Int32,
            &NoResolver,
            at(),
        );
        assert!(too_wide.is_err());
    }

    #[test]
    fn null_satisfies_any_slot() {
        assert_eq!(
            coerce(Value::Null, &Shape::Int32, &NoResolver, at()).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn enum_by_name_or_alias() {
        let by_name = coerce(
            Value::String("Closed".into()),
            &Shape::Enum("Status".to_string()),
            &Fixture,
            at(),
        )
        .unwrap();
        assert_eq!(by_name, Value::Number(Number::Int64(1)));

        let by_alias = coerce(
            Value::String("open".into()),
            &Shape::Enum("Status".to_string()),
            &Fixture,
            at(),
        )
        .unwrap();
        assert_eq!(by_alias, Value::Number(Number::Int64(0)));

        let unknown = coerce(
            Value::String("Pending".into()),
            &Shape::Enum("Status".to_string()),
            &Fixture,
            at(),
        );
        assert!(unknown.is_err());
    }

    #[test]
    fn array_degrades_on_disagreement() {
        let mixed = Value::Array(vec![
            Value::Number(Number::Int32(1)),
            Value::String("two".into()),
        ]);

        let degraded = coerce(
            mixed.clone(),
            &Shape::Array(Box::new(Shape::Int32)),
            &NoResolver,
            at(),
        )
        .unwrap();
        assert_eq!(degraded, mixed);
    }

    #[test]
    fn array_coerces_when_elements_agree() {
        let ints = Value::Array(vec![
            Value::Number(Number::Int32(1)),
            Value::Number(Number::Int32(2)),
        ]);

        let typed = coerce(
            ints,
            &Shape::Array(Box::new(Shape::Double)),
            &NoResolver,
            at(),
        )
        .unwrap();
        assert_eq!(
            typed,
            Value::Array(vec![
                Value::Number(Number::Double(1.0)),
                Value::Number(Number::Double(2.0)),
            ])
        );
    }

    #[test]
    fn record_drops_unknown_members() {
        let mut members = indexmap::IndexMap::new();
        members.insert("qty".to_string(), Value::Number(Number::Int32(2)));
        members.insert("note".to_string(), Value::String("gift".into()));

        let bound = coerce(
            Value::Object(members),
            &Shape::Record("Order".to_string()),
            &Fixture,
            at(),
        )
        .unwrap();

        let bound = bound.as_object().unwrap();
        assert_eq!(bound.len(), 1);
        assert_eq!(bound.get("qty"), Some(&Value::Number(Number::Int32(2))));
    }

    #[test]
    fn mismatches_are_errors() {
        assert!(coerce(Value::Bool(true), &Shape::String, &NoResolver, at()).is_err());
        assert!(coerce(
            Value::Number(Number::Double(1.5)),
            &Shape::Int32,
            &NoResolver,
            at()
        )
        .is_err());
    }
}
