//! Declarative binding of command-line tokens and key/value parameters onto
//! the typed fields of a configuration struct.
//!
//! A [`Schema`] lists a type's bindable fields as [`Descriptor`]s. Two binders
//! consume it:
//!
//! - [`bind_args`] matches flags such as `-name value` in a token sequence.
//! - [`ParameterBinder`] reads `name=value` tokens, ordered pairs,
//!   dictionaries, [`Element`] trees, or [`TomlFile`]s.
//!
//! Raw strings are converted by [`coerce`].

pub mod binding;
pub mod schema;
pub mod target;
mod error;

pub use binding::{
    bind_args, coerce, Assignments, BindError, Element, InvalidValue, ParameterBinder,
    ParameterMap, ParameterSource, TomlFile,
};
pub use error::Error;
pub use schema::{
    DefaultValue, Descriptor, Schema, SchemaBuilder, SchemaError, TargetType, Value, Variants,
};
pub use target::Bindable;
