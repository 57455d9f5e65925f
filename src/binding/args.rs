//! Binding of flag-style command-line tokens.

use tracing::{debug, trace};

use crate::schema::{DefaultValue, Descriptor, Schema, TargetType, Value};

use super::{coerce, BindError, InvalidValue};

/// Binds command-line tokens onto `target`.
///
/// Descriptors are processed in declaration order. For each, the first token
/// equal to its external name (ignoring case) is the flag:
///
/// - `bool` fields are set to `true` by the flag alone.
/// - `string` and `enum` fields take the token after the flag. Strings are
///   taken verbatim, enums must name a variant exactly.
/// - Other types cannot be supplied on the command line.
///
/// A missing flag fails if the field is required, otherwise the field gets its
/// default, or keeps its current value if it has none. Unrecognized tokens
/// are ignored. The first error aborts the call; fields bound before it keep
/// their new values.
///
/// ## Example
///
/// ```
/// use argbind::{bind_args, Descriptor, Schema};
///
/// #[derive(Default)]
/// struct Settings {
///     name: String,
///     verbose: bool,
/// }
///
/// let schema = Schema::builder()
///     .field(Descriptor::string("name", |s: &mut Settings, v| s.name = v).named("-name"))
///     .field(Descriptor::flag("verbose", |s: &mut Settings, v| s.verbose = v).named("-v"))
///     .build()?;
///
/// let mut settings = Settings::default();
/// bind_args(&mut settings, &schema, &["-V", "-NAME", "demo"])?;
///
/// assert_eq!(settings.name, "demo");
/// assert!(settings.verbose);
/// # Ok::<(), argbind::Error>(())
/// ```
pub fn bind_args<T, S: AsRef<str>>(
    target: &mut T,
    schema: &Schema<T>,
    tokens: &[S],
) -> Result<(), BindError> {
    for descriptor in schema {
        match find_flag(tokens, descriptor) {
            Some(index) => bind_flag(target, descriptor, tokens, index)?,
            None => bind_missing(target, descriptor)?,
        }
    }
    Ok(())
}

fn find_flag<T, S: AsRef<str>>(tokens: &[S], descriptor: &Descriptor<T>) -> Option<usize> {
    tokens.iter().position(|t| descriptor.matches(t.as_ref()))
}

fn bind_flag<T, S: AsRef<str>>(
    target: &mut T,
    descriptor: &Descriptor<T>,
    tokens: &[S],
    index: usize,
) -> Result<(), BindError> {
    let flag = tokens[index].as_ref();
    trace!(field = descriptor.field(), flag, index, "flag found");

    let value = match descriptor.target_type() {
        TargetType::Bool => Value::Bool(true),
        TargetType::String => Value::String(flag_argument(tokens, index)?.to_string()),
        target_type @ TargetType::Enum(_) => {
            let raw = flag_argument(tokens, index)?;
            coerce_strict(descriptor, raw, &target_type)?
        }
        target_type => {
            return Err(BindError::UnsupportedType {
                name: descriptor.name().to_string(),
                target_type,
            });
        }
    };

    assign(target, descriptor, value)
}

/// The token following the flag at `index`.
fn flag_argument<S: AsRef<str>>(tokens: &[S], index: usize) -> Result<&str, BindError> {
    match tokens.get(index + 1) {
        Some(token) => Ok(token.as_ref()),
        None => Err(BindError::MalformedSyntax(format!(
            "{} has no argument",
            tokens[index].as_ref()
        ))),
    }
}

fn bind_missing<T>(target: &mut T, descriptor: &Descriptor<T>) -> Result<(), BindError> {
    if descriptor.is_required() {
        return Err(BindError::MissingRequiredArgument(
            descriptor.name().to_string(),
        ));
    }

    let value = match descriptor.default() {
        Some(DefaultValue::Typed(value)) => value.clone(),
        Some(DefaultValue::Raw(raw)) => coerce_strict(descriptor, raw, &descriptor.target_type())?,
        None => {
            trace!(field = descriptor.field(), "flag absent, no default");
            return Ok(());
        }
    };

    debug!(field = descriptor.field(), %value, "applying default");
    assign(target, descriptor, value)
}

/// Coerces `raw`, treating an unparsable enum or duration as invalid.
fn coerce_strict<T>(
    descriptor: &Descriptor<T>,
    raw: &str,
    target_type: &TargetType,
) -> Result<Value, BindError> {
    let invalid = |source: InvalidValue| BindError::InvalidValueFormat {
        name: descriptor.name().to_string(),
        source,
    };

    coerce(raw, target_type).map_err(invalid)?.ok_or_else(|| {
        invalid(InvalidValue {
            value: raw.to_string(),
            expected: *target_type,
        })
    })
}

fn assign<T>(target: &mut T, descriptor: &Descriptor<T>, value: Value) -> Result<(), BindError> {
    if descriptor.assign(target, value) {
        Ok(())
    } else {
        Err(BindError::UnsupportedType {
            name: descriptor.name().to_string(),
            target_type: descriptor.target_type(),
        })
    }
}
