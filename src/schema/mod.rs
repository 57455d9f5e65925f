//! Binding descriptors: which fields of a target are bindable, under what
//! name, with what default and type.

mod descriptor;
mod error;
mod value;

pub use descriptor::{DefaultValue, Descriptor, Schema, SchemaBuilder};
pub use error::SchemaError;
pub use value::{TargetType, Value, Variants};

pub(crate) use descriptor::fold_name;
