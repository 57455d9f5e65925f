//! Conversion of raw string tokens into typed values.

use crate::schema::{TargetType, Value};

use super::duration;
use super::InvalidValue;

/// Coerces `raw` into a value of `target`.
///
/// Returns `Ok(None)` when an enumeration or duration fails to parse; those
/// failures carry no error here and each binder decides what they mean.
/// Booleans and numbers that fail to parse are an [`InvalidValue`].
/// Strings are taken verbatim, every other type ignores surrounding
/// whitespace.
///
/// ## Example
///
/// ```
/// use argbind::{coerce, TargetType, Value};
///
/// assert_eq!(coerce("3", &TargetType::Int32)?, Some(Value::Int32(3)));
/// assert_eq!(coerce("TRUE", &TargetType::Bool)?, Some(Value::Bool(true)));
/// assert_eq!(coerce("later", &TargetType::Duration)?, None);
/// assert!(coerce("three", &TargetType::Int32).is_err());
/// # Ok::<(), argbind::InvalidValue>(())
/// ```
pub fn coerce(raw: &str, target: &TargetType) -> Result<Option<Value>, InvalidValue> {
    let invalid = || InvalidValue {
        value: raw.to_string(),
        expected: *target,
    };
    let trimmed = raw.trim();

    let value = match target {
        TargetType::String => Value::String(raw.to_string()),
        TargetType::Bool => Value::Bool(parse_bool(trimmed).ok_or_else(invalid)?),
        TargetType::Int32 => Value::Int32(trimmed.parse().map_err(|_| invalid())?),
        TargetType::Float32 => Value::Float32(trimmed.parse().map_err(|_| invalid())?),
        TargetType::Float64 => Value::Float64(trimmed.parse().map_err(|_| invalid())?),
        TargetType::Enum(names) => match names.iter().position(|n| *n == trimmed) {
            Some(index) => Value::Enum {
                index,
                name: names[index],
            },
            None => return Ok(None),
        },
        TargetType::Duration => match duration::parse(trimmed) {
            Some(d) => Value::Duration(d),
            None => return Ok(None),
        },
    };

    Ok(Some(value))
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
