use std::path::PathBuf;
use thiserror::Error;

use crate::schema::TargetType;

/// A raw string that does not parse as the declared type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("'{value}' is not a valid {expected}")]
pub struct InvalidValue {
    pub value: String,
    pub expected: TargetType,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindError {
    #[error("required argument missing: {0}")]
    MissingRequiredArgument(String),

    #[error("malformed syntax: {0}")]
    MalformedSyntax(String),

    #[error("unsupported option type {target_type} for '{name}'")]
    UnsupportedType {
        name: String,
        target_type: TargetType,
    },

    #[error("invalid value for '{name}': {source}")]
    InvalidValueFormat {
        name: String,
        source: InvalidValue,
    },

    #[error("required parameter file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read parameter file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse parameter file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}
