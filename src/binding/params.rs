//! Binding of named parameters from key/value sources.

use tracing::{debug, trace};

use crate::schema::{DefaultValue, Descriptor, Schema, Value};

use super::source::{ParameterMap, ParameterSource};
use super::{coerce, BindError, InvalidValue};

/// Binds named parameters from any [`ParameterSource`] onto a target.
///
/// Each descriptor's external name is looked up in the normalized source,
/// ignoring case. A supplied value beats the default; a field with neither
/// keeps its current value. Values are coerced with [`coerce`]: malformed
/// booleans and numbers abort the call with
/// [`InvalidValueFormat`](BindError::InvalidValueFormat), while an unknown
/// enum variant or unparsable duration leaves the field untouched.
///
/// Required fields are not enforced by default. Both lenient behaviors can be
/// switched off with [`enforce_required`](Self::enforce_required) and
/// [`strict_values`](Self::strict_values).
///
/// ## Example
///
/// ```
/// use std::collections::HashMap;
/// use argbind::{Descriptor, ParameterBinder, Schema};
///
/// #[derive(Default)]
/// struct Limits {
///     retries: i32,
/// }
///
/// let schema = Schema::builder()
///     .field(Descriptor::int32("retries", |l: &mut Limits, v| l.retries = v).default_raw("0"))
///     .build()?;
///
/// let mut limits = Limits::default();
/// let params = HashMap::from([("Retries", "3")]);
/// ParameterBinder::new().bind(&mut limits, &schema, &params)?;
/// assert_eq!(limits.retries, 3);
/// # Ok::<(), argbind::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct ParameterBinder {
    enforce_required: bool,
    strict_values: bool,
}

impl ParameterBinder {
    /// Creates a binder with lenient defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`MissingRequiredArgument`](BindError::MissingRequiredArgument)
    /// when a required field has no supplied value.
    pub fn enforce_required(mut self, enforce: bool) -> Self {
        self.enforce_required = enforce;
        self
    }

    /// Fail with [`InvalidValueFormat`](BindError::InvalidValueFormat) when an
    /// enum or duration value does not parse, instead of skipping the field.
    pub fn strict_values(mut self, strict: bool) -> Self {
        self.strict_values = strict;
        self
    }

    /// Normalizes `source` and binds it onto `target`.
    pub fn bind<T, S: ParameterSource + ?Sized>(
        &self,
        target: &mut T,
        schema: &Schema<T>,
        source: &S,
    ) -> Result<(), BindError> {
        let params = source.parameters()?;
        self.bind_map(target, schema, &params)
    }

    /// Gives every field that declares a default its default value.
    pub fn apply_defaults<T>(&self, target: &mut T, schema: &Schema<T>) -> Result<(), BindError> {
        self.bind_map(target, schema, &ParameterMap::new())
    }

    /// Binds an already normalized map onto `target`.
    pub fn bind_map<T>(
        &self,
        target: &mut T,
        schema: &Schema<T>,
        params: &ParameterMap,
    ) -> Result<(), BindError> {
        for descriptor in schema {
            let value = match params.get(descriptor.name()) {
                Some(raw) => {
                    trace!(field = descriptor.field(), raw, "parameter supplied");
                    self.coerce(descriptor, raw)?
                }
                None => self.resolve_default(descriptor)?,
            };

            if let Some(value) = value {
                if !descriptor.assign(target, value) {
                    return Err(BindError::UnsupportedType {
                        name: descriptor.name().to_string(),
                        target_type: descriptor.target_type(),
                    });
                }
            }
        }
        Ok(())
    }

    fn resolve_default<T>(&self, descriptor: &Descriptor<T>) -> Result<Option<Value>, BindError> {
        if self.enforce_required && descriptor.is_required() {
            return Err(BindError::MissingRequiredArgument(
                descriptor.name().to_string(),
            ));
        }

        match descriptor.default() {
            Some(DefaultValue::Raw(raw)) => {
                debug!(field = descriptor.field(), raw = raw.as_str(), "applying default");
                self.coerce(descriptor, raw)
            }
            Some(DefaultValue::Typed(value)) => {
                debug!(field = descriptor.field(), %value, "applying default");
                Ok(Some(value.clone()))
            }
            None => Ok(None),
        }
    }

    fn coerce<T>(&self, descriptor: &Descriptor<T>, raw: &str) -> Result<Option<Value>, BindError> {
        let target_type = descriptor.target_type();
        let invalid = |source: InvalidValue| BindError::InvalidValueFormat {
            name: descriptor.name().to_string(),
            source,
        };

        match coerce(raw, &target_type).map_err(invalid)? {
            Some(value) => Ok(Some(value)),
            None if self.strict_values => Err(invalid(InvalidValue {
                value: raw.to_string(),
                expected: target_type,
            })),
            None => {
                debug!(field = descriptor.field(), raw, "value did not parse, field left unset");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Assignments, Element};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Mode {
        A,
        B,
    }

    crate::variants!(Mode { A, B });

    #[derive(Debug, Default, PartialEq)]
    struct Job {
        retries: i32,
        ratio: f64,
        scale: f32,
        verbose: bool,
        label: String,
        mode: Option<Mode>,
        timeout: Duration,
    }

    fn schema() -> Schema<Job> {
        Schema::builder()
            .field(Descriptor::int32("retries", |j: &mut Job, v| j.retries = v).default_raw("0"))
            .field(Descriptor::float64("ratio", |j: &mut Job, v| j.ratio = v))
            .field(Descriptor::float32("scale", |j: &mut Job, v| j.scale = v).default_value(1.5f32))
            .field(Descriptor::flag("verbose", |j: &mut Job, v| j.verbose = v))
            .field(Descriptor::string("label", |j: &mut Job, v| j.label = v).named("name"))
            .field(Descriptor::enumeration("mode", |j: &mut Job, v| j.mode = Some(v)))
            .field(Descriptor::duration("timeout", |j: &mut Job, v| j.timeout = v))
            .build()
            .unwrap()
    }

    fn bind<S: ParameterSource + ?Sized>(source: &S) -> Result<Job, BindError> {
        let mut job = Job::default();
        ParameterBinder::new().bind(&mut job, &schema(), source)?;
        Ok(job)
    }

    #[test]
    fn test_supplied_value_from_dictionary() {
        let job = bind(&HashMap::from([("retries", "3")])).unwrap();

        assert_eq!(job.retries, 3);
    }

    #[test]
    fn test_empty_dictionary_uses_default() {
        let job = bind(&HashMap::<String, String>::new()).unwrap();

        assert_eq!(job.retries, 0);
        assert_eq!(job.scale, 1.5);
    }

    #[test]
    fn test_unknown_enum_is_swallowed() {
        let job = bind(&HashMap::from([("mode", "Unknown")])).unwrap();

        assert_eq!(job.mode, None);
    }

    #[test]
    fn test_bad_duration_is_swallowed() {
        let job = bind(&[("timeout", "a while")]).unwrap();

        assert_eq!(job.timeout, Duration::ZERO);
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let result = bind(&[("ratio", "lots")]);

        assert!(matches!(
            result,
            Err(BindError::InvalidValueFormat { name, .. }) if name == "ratio"
        ));
    }

    #[test]
    fn test_bad_bool_is_an_error() {
        let result = bind(&[("verbose", "maybe")]);

        assert!(matches!(result, Err(BindError::InvalidValueFormat { .. })));
    }

    #[test]
    fn test_every_type_from_assignments() {
        let tokens = [
            "RETRIES=7",
            "ratio=0.25",
            "scale=2",
            "verbose=True",
            "name=first=second",
            "mode=B",
            "timeout=00:01:30",
        ];
        let job = bind(&Assignments::new(&tokens)).unwrap();

        assert_eq!(
            job,
            Job {
                retries: 7,
                ratio: 0.25,
                scale: 2.0,
                verbose: true,
                label: "first=second".into(),
                mode: Some(Mode::B),
                timeout: Duration::from_secs(90),
            }
        );
    }

    #[test]
    fn test_external_name_replaces_field_name() {
        let job = bind(&[("label", "ignored"), ("name", "used")]).unwrap();

        assert_eq!(job.label, "used");
    }

    #[test]
    fn test_hash_map_case_collision_is_rejected() {
        let result = bind(&HashMap::from([("retries", "1"), ("RETRIES", "2")]));

        assert!(matches!(result, Err(BindError::MalformedSyntax(_))));
    }

    #[test]
    fn test_last_pair_wins() {
        let job = bind(&vec![("retries", "1"), ("Retries", "2")]).unwrap();

        assert_eq!(job.retries, 2);
    }

    #[test]
    fn test_element_source() {
        let root = Element::new("job")
            .with_child(Element::new("retries").with_text("4"))
            .with_child(Element::new("mode").with_text("A"));
        let job = bind(&root).unwrap();

        assert_eq!(job.retries, 4);
        assert_eq!(job.mode, Some(Mode::A));
    }

    #[test]
    fn test_malformed_assignment() {
        let result = bind(&Assignments::new(&["retries"]));

        assert!(matches!(result, Err(BindError::MalformedSyntax(_))));
    }

    #[test]
    fn test_required_not_enforced_by_default() {
        let schema = Schema::builder()
            .field(Descriptor::int32("retries", |j: &mut Job, v| j.retries = v).required())
            .build()
            .unwrap();
        let mut job = Job::default();

        ParameterBinder::new()
            .apply_defaults(&mut job, &schema)
            .unwrap();
        assert_eq!(job.retries, 0);

        let result = ParameterBinder::new()
            .enforce_required(true)
            .apply_defaults(&mut job, &schema);
        assert!(matches!(
            result,
            Err(BindError::MissingRequiredArgument(name)) if name == "retries"
        ));
    }

    #[test]
    fn test_strict_values() {
        let mut job = Job::default();
        let result = ParameterBinder::new().strict_values(true).bind(
            &mut job,
            &schema(),
            &[("mode", "C")],
        );

        assert!(matches!(
            result,
            Err(BindError::InvalidValueFormat { name, source })
                if name == "mode" && source.value == "C"
        ));
    }

    #[test]
    fn test_apply_defaults() {
        let mut job = Job {
            retries: 9,
            ratio: 0.5,
            ..Job::default()
        };

        ParameterBinder::new()
            .apply_defaults(&mut job, &schema())
            .unwrap();

        assert_eq!(job.retries, 0);
        assert_eq!(job.scale, 1.5);
        assert_eq!(job.ratio, 0.5);
    }

    #[test]
    fn test_error_aborts_after_earlier_fields() {
        let mut job = Job::default();
        let result = ParameterBinder::new().bind(
            &mut job,
            &schema(),
            &[("retries", "5"), ("verbose", "nope"), ("name", "late")],
        );

        assert!(result.is_err());
        assert_eq!(job.retries, 5);
        assert_eq!(job.label, "");
    }
}
