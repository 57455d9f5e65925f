//! Target types that carry their own schema.

use crate::binding::{bind_args, ParameterBinder, ParameterSource};
use crate::schema::{Schema, SchemaError};
use crate::Error;

/// A configuration type that declares its bindable fields.
///
/// The schema is rebuilt on each call; hold on to the result of
/// [`schema`](Self::schema) and use the binders directly to bind repeatedly.
///
/// ## Example
///
/// ```
/// use argbind::{Bindable, Descriptor, Schema, SchemaError};
///
/// #[derive(Debug, Default, Clone, Copy, PartialEq)]
/// enum Discraft {
///     #[default]
///     Buzzz,
///     Meteor,
///     Mantis,
/// }
///
/// argbind::variants!(Discraft { Buzzz, Meteor, Mantis });
///
/// #[derive(Default)]
/// struct Settings {
///     foo: String,
///     foobar: bool,
///     barfoo: Discraft,
/// }
///
/// impl Bindable for Settings {
///     fn schema() -> Result<Schema<Self>, SchemaError> {
///         Schema::builder()
///             .field(
///                 Descriptor::string("foo", |s: &mut Self, v| s.foo = v)
///                     .named("-foo")
///                     .default_raw("foo_default"),
///             )
///             .field(
///                 Descriptor::flag("foobar", |s: &mut Self, v| s.foobar = v)
///                     .named("-foobar")
///                     .default_value(false),
///             )
///             .field(
///                 Descriptor::enumeration("barfoo", |s: &mut Self, v| s.barfoo = v)
///                     .named("-barfoo")
///                     .required(),
///             )
///             .build()
///     }
/// }
///
/// let settings = Settings::from_args(&["-barfoo", "Meteor"])?;
/// assert_eq!(settings.foo, "foo_default");
/// assert!(!settings.foobar);
/// assert_eq!(settings.barfoo, Discraft::Meteor);
/// # Ok::<(), argbind::Error>(())
/// ```
pub trait Bindable: Default + 'static {
    fn schema() -> Result<Schema<Self>, SchemaError>;

    /// Builds a default instance and binds command-line tokens onto it.
    fn from_args<S: AsRef<str>>(tokens: &[S]) -> Result<Self, Error> {
        let schema = Self::schema()?;
        let mut target = Self::default();
        bind_args(&mut target, &schema, tokens)?;
        Ok(target)
    }

    /// Builds a default instance and binds a parameter source onto it.
    fn from_parameters<S: ParameterSource + ?Sized>(source: &S) -> Result<Self, Error> {
        Self::from_parameters_with(ParameterBinder::new(), source)
    }

    /// Like [`from_parameters`](Self::from_parameters) with a configured binder.
    fn from_parameters_with<S: ParameterSource + ?Sized>(
        binder: ParameterBinder,
        source: &S,
    ) -> Result<Self, Error> {
        let schema = Self::schema()?;
        let mut target = Self::default();
        binder.bind(&mut target, &schema, source)?;
        Ok(target)
    }
}
