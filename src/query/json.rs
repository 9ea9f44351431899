//! Dynamically typed queries over `serde_json::Value`.
//!
//! JSON documents only reveal their shape at run time, so this is where the
//! shape errors of the query engine actually occur:
//!
//! - a scalar used as a source is not iterable
//! - a collector result that is not a key/value pair cannot become a map
//!   entry
//! - a non-number cannot be summed
//!
//! As a source, an array yields its elements, an object yields one
//! `{"key": k, "value": v}` object per entry, and `null` is rejected like a
//! missing source.
//!
//! # Examples
//!
//! ```rust
//! use quarry::Query;
//! use serde_json::json;
//!
//! let people = json!([
//!     {"name": "Freud", "born": 1856},
//!     {"name": "Jung", "born": 1875},
//! ]);
//! let names = Query::from_json(people)
//!     .unwrap()
//!     .filter(|person| person["born"].as_i64() > Some(1860))
//!     .map(|person| person["name"].clone())
//!     .to_list();
//! assert_eq!(names, Ok(vec![json!("Jung")]));
//! ```

use std::iter;

use serde_json::{Map, Value};

use super::{FromQuery, IntoEntry, Leaves, Nested, Numeric, Query, Source, SourceShape, Truthy};
use crate::container::DictItem;
use crate::error::QueryError;

const NULL_SOURCE: QueryError = QueryError::NilInput("Cannot create Query from None");

/// Returns the JSON name of the value's type, as used in error messages.
const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn entry_object(key: String, value: Value) -> Value {
    let mut entry = Map::with_capacity(2);
    entry.insert("key".to_string(), Value::String(key));
    entry.insert("value".to_string(), value);
    Value::Object(entry)
}

impl<'a> Source<'a> for Value {
    type Item = Self;
    const SHAPE: SourceShape = SourceShape::Dynamic;

    fn into_query(self) -> Query<'a, Self> {
        match self {
            Self::Array(elements) => Query::from_iterator(elements),
            Self::Object(entries) => {
                Query::from_iterator(entries.into_iter().map(|(key, value)| entry_object(key, value)))
            }
            Self::Null => Query::faulted(NULL_SOURCE),
            scalar => Query::faulted(QueryError::not_iterable(type_name(&scalar))),
        }
    }
}

impl<'a> Source<'a> for Map<String, Value> {
    type Item = DictItem<String, Value>;
    const SHAPE: SourceShape = SourceShape::Mapping;

    fn into_query(self) -> Query<'a, DictItem<String, Value>> {
        Query::from_iterator(self.into_iter().map(DictItem::from))
    }
}

impl Query<'_, Value> {
    /// Creates a query from a JSON array or object, checking the shape up
    /// front.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NilInput`] for `null` and
    /// [`QueryError::TypeMismatch`] for any other scalar.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quarry::{ErrorKind, Query};
    /// use serde_json::json;
    ///
    /// assert_eq!(Query::from_json(json!([1, 2])).unwrap().count(), Ok(2));
    ///
    /// let error = Query::from_json(json!(7)).unwrap_err();
    /// assert_eq!(error.kind(), ErrorKind::TypeMismatch);
    /// assert_eq!(error.to_string(), "'number' object is not iterable");
    /// ```
    pub fn from_json(value: Value) -> Result<Self, QueryError> {
        match value {
            Value::Null => Err(NULL_SOURCE),
            Value::Array(_) | Value::Object(_) => Ok(Self::new(value)),
            scalar => Err(QueryError::not_iterable(type_name(&scalar))),
        }
    }
}

impl From<DictItem<String, Value>> for Value {
    fn from(item: DictItem<String, Value>) -> Self {
        let (key, value) = item.into_pair();
        entry_object(key, value)
    }
}

impl Nested for Value {
    type Leaf = Self;

    fn leaves<'a>(self) -> Leaves<'a, Self>
    where
        Self: 'a,
    {
        match self {
            Self::Array(children) => Box::new(children.into_iter().flat_map(|child| child.leaves())),
            leaf => Box::new(iter::once(leaf)),
        }
    }
}

impl Numeric for Value {
    fn zero() -> Self {
        Self::from(0)
    }

    /// Integers stay integers while both sides fit in `i64`; anything else
    /// numeric is added as `f64`.
    fn try_add(self, other: Self) -> Option<Self> {
        if let (Some(left), Some(right)) = (self.as_i64(), other.as_i64()) {
            if let Some(total) = left.checked_add(right) {
                return Some(Self::from(total));
            }
        }
        let total = self.as_f64()? + other.as_f64()?;
        Some(Self::from(total))
    }

    fn to_f64(&self) -> Option<f64> {
        self.as_f64()
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(flag) => *flag,
            Self::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
            Self::String(text) => !text.is_empty(),
            Self::Array(elements) => !elements.is_empty(),
            Self::Object(entries) => !entries.is_empty(),
        }
    }
}

/// Accepts `[key, value]` arrays and `{"key": ..., "value": ...}` objects.
/// String keys are used as they are; number and boolean keys are rendered as
/// JSON text.
impl IntoEntry<String, Value> for Value {
    fn into_entry(self) -> Result<DictItem<String, Value>, QueryError> {
        let shape_error = |value: &Self| QueryError::UnsupportedShape {
            type_name: type_name(value).to_string(),
        };
        let (key, value) = match self {
            Self::Array(mut pair) if pair.len() == 2 => {
                let value = pair.pop().unwrap_or(Self::Null);
                let key = pair.pop().unwrap_or(Self::Null);
                (key, value)
            }
            Self::Object(mut entry) if entry.len() == 2 => {
                match (entry.remove("key"), entry.remove("value")) {
                    (Some(key), Some(value)) => (key, value),
                    _ => return Err(shape_error(&Self::Object(entry))),
                }
            }
            other => return Err(shape_error(&other)),
        };
        let key = match key {
            Self::String(text) => text,
            Self::Number(_) | Self::Bool(_) => key.to_string(),
            other => return Err(shape_error(&other)),
        };
        Ok(DictItem::new(key, value))
    }
}

impl FromQuery<Value> for Value {
    fn from_elements<I>(elements: I) -> Result<Self, QueryError>
    where
        I: Iterator<Item = Value>,
    {
        Ok(Self::Array(elements.collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(true), "boolean")]
    #[case(json!(1.5), "number")]
    #[case(json!("text"), "string")]
    fn test_scalars_are_not_iterable(#[case] scalar: Value, #[case] name: &str) {
        let error = Query::new(scalar).to_list().unwrap_err();
        assert_eq!(error, QueryError::not_iterable(name));
    }

    #[rstest]
    fn test_null_source_is_rejected() {
        assert_eq!(Query::from_json(Value::Null).err(), Some(NULL_SOURCE));
        assert_eq!(Query::new(Value::Null).count(), Err(NULL_SOURCE));
    }

    #[rstest]
    fn test_mixed_sum_widens_to_float() {
        let total = Query::new(json!([1, 2.5, 3])).sum();
        assert_eq!(total, Ok(json!(6.5)));
    }

    #[rstest]
    fn test_sum_of_strings_is_rejected() {
        let total = Query::new(json!([1, "2"])).sum();
        assert_eq!(
            total.unwrap_err().to_string(),
            "Cannot apply sum on non-number elements"
        );
    }

    #[rstest]
    #[case(json!(["a", 1]), Ok(("a".to_string(), json!(1))))]
    #[case(json!({"key": "a", "value": 1}), Ok(("a".to_string(), json!(1))))]
    #[case(json!([3, null]), Ok(("3".to_string(), Value::Null)))]
    #[case(json!(42), Err("number"))]
    #[case(json!([1, 2, 3]), Err("array"))]
    #[case(json!({"k": 1, "v": 2}), Err("object"))]
    fn test_into_entry(
        #[case] value: Value,
        #[case] expected: Result<(String, Value), &str>,
    ) {
        let entry = value.into_entry().map(DictItem::into_pair);
        let expected = expected.map_err(|name| QueryError::UnsupportedShape {
            type_name: name.to_string(),
        });
        assert_eq!(entry, expected);
    }

    #[rstest]
    fn test_flat_map_over_scalar_faults() {
        let result = Query::new(json!([[1], 2, [3]]))
            .flat_map(|element| element)
            .to_list();
        assert_eq!(result, Err(QueryError::not_iterable("number")));
    }
}
