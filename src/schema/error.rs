use thiserror::Error;

use super::TargetType;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("field '{0}' has an empty external name")]
    EmptyName(&'static str),

    #[error("field '{field}' is required and cannot declare a default")]
    RequiredWithDefault { field: &'static str },

    #[error("external name '{name}' is declared by both '{first}' and '{second}'")]
    DuplicateName {
        name: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("field '{0}' has more than one descriptor")]
    DuplicateField(&'static str),

    #[error("default for field '{field}' is not a {expected} value")]
    DefaultTypeMismatch {
        field: &'static str,
        expected: TargetType,
    },
}
