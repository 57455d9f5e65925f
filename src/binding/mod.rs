//! Binders, value coercion, and raw parameter sources.

mod args;
mod coerce;
pub(crate) mod duration;
mod error;
mod file;
mod params;
mod source;

pub use args::bind_args;
pub use coerce::coerce;
pub use error::{BindError, InvalidValue};
pub use file::{table_to_element, TomlFile};
pub use params::ParameterBinder;
pub use source::{Assignments, Element, ParameterMap, ParameterSource};
