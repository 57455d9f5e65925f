use crate::binding::BindError;
use crate::schema::SchemaError;
use thiserror::Error;

/// Top-level error type for the argbind library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid binding schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("binding failed: {0}")]
    Bind(#[from] BindError),
}
