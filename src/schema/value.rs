//! Target types and the typed values coercion produces for them.

use std::fmt;
use std::time::Duration;

use crate::binding::duration;

/// The declared type of a bindable field.
///
/// Enumerations carry their variant names so coercion can match raw strings
/// without knowing the concrete Rust enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TargetType {
    Bool,
    String,
    Enum(&'static [&'static str]),
    Int32,
    Float32,
    Float64,
    Duration,
}

impl TargetType {
    /// Number of tokens a flag of this type consumes after itself.
    pub fn arity(&self) -> usize {
        match self {
            TargetType::Bool => 0,
            _ => 1,
        }
    }

    /// Returns true if `value` is of the kind this type coerces to.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (TargetType::Bool, Value::Bool(_))
            | (TargetType::String, Value::String(_))
            | (TargetType::Int32, Value::Int32(_))
            | (TargetType::Float32, Value::Float32(_))
            | (TargetType::Float64, Value::Float64(_))
            | (TargetType::Duration, Value::Duration(_)) => true,
            (TargetType::Enum(names), Value::Enum { index, name }) => {
                names.get(*index) == Some(name)
            }
            _ => false,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Bool => f.write_str("bool"),
            TargetType::String => f.write_str("string"),
            TargetType::Enum(names) => write!(f, "enum {{{}}}", names.join(", ")),
            TargetType::Int32 => f.write_str("int32"),
            TargetType::Float32 => f.write_str("float32"),
            TargetType::Float64 => f.write_str("float64"),
            TargetType::Duration => f.write_str("duration"),
        }
    }
}

/// A typed value ready to be assigned to a field.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    Bool(bool),
    String(String),
    Enum { index: usize, name: &'static str },
    Int32(i32),
    Float32(f32),
    Float64(f64),
    Duration(Duration),
}

impl Value {
    /// Wraps an enumeration variant.
    pub fn variant<E: Variants>(variant: E) -> Self {
        let index = variant.index();
        Value::Enum {
            index,
            name: E::NAMES.get(index).copied().unwrap_or_default(),
        }
    }
}

/// Renders the canonical string form that [`coerce`](crate::binding::coerce)
/// parses back into the same value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => f.write_str(s),
            Value::Enum { name, .. } => f.write_str(name),
            Value::Int32(i) => write!(f, "{i}"),
            Value::Float32(x) => write!(f, "{x}"),
            Value::Float64(x) => write!(f, "{x}"),
            Value::Duration(d) => f.write_str(&duration::format(*d)),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Value::Duration(value)
    }
}

/// A fieldless enum whose variants can be bound by name.
///
/// Usually implemented with [`variants!`](crate::variants).
pub trait Variants: Sized + 'static {
    /// Variant names in declaration order.
    const NAMES: &'static [&'static str];

    /// Returns the variant at `index` in [`NAMES`](Self::NAMES).
    fn from_index(index: usize) -> Option<Self>;

    /// Position of this variant in [`NAMES`](Self::NAMES).
    fn index(&self) -> usize;
}

/// Implements [`Variants`] for a fieldless enum.
///
/// Every variant must be listed, in declaration order.
///
/// ```
/// #[derive(Debug, PartialEq)]
/// enum Discraft {
///     Buzzz,
///     Meteor,
///     Mantis,
/// }
///
/// argbind::variants!(Discraft { Buzzz, Meteor, Mantis });
///
/// use argbind::Variants;
/// assert_eq!(Discraft::NAMES, &["Buzzz", "Meteor", "Mantis"]);
/// assert_eq!(Discraft::from_index(1), Some(Discraft::Meteor));
/// ```
#[macro_export]
macro_rules! variants {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::Variants for $ty {
            const NAMES: &'static [&'static str] = &[$(stringify!($variant)),+];

            fn from_index(index: usize) -> Option<Self> {
                [$($ty::$variant),+].into_iter().nth(index)
            }

            fn index(&self) -> usize {
                let name = match self {
                    $($ty::$variant => stringify!($variant),)+
                };
                <Self as $crate::Variants>::NAMES
                    .iter()
                    .position(|n| *n == name)
                    .unwrap_or_default()
            }
        }
    };
}
