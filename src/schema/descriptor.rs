use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use super::{SchemaError, TargetType, Value, Variants};

type Assign<T> = Box<dyn Fn(&mut T, Value) -> bool + Send + Sync>;

/// Folds an external name for case-insensitive comparison.
pub(crate) fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// The value a field receives when no value is supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Coerced to the field's type at bind time.
    Raw(String),
    /// Assigned as-is; checked against the field's type when the schema is built.
    Typed(Value),
}

/// Metadata for one bindable field of `T`.
///
/// The setter passed to the typed constructor is the field's identity: the
/// binders never touch `T` except through it.
///
/// ## Example
///
/// ```
/// use argbind::Descriptor;
///
/// #[derive(Default)]
/// struct Settings {
///     retries: i32,
/// }
///
/// let retries = Descriptor::int32("retries", |s: &mut Settings, v| s.retries = v)
///     .named("-retries")
///     .default_raw("0");
///
/// assert_eq!(retries.name(), "-retries");
/// assert_eq!(retries.arity(), 1);
/// ```
pub struct Descriptor<T> {
    field: &'static str,
    external_name: Option<String>,
    required: bool,
    default: Option<DefaultValue>,
    target_type: TargetType,
    assign: Assign<T>,
}

impl<T: 'static> Descriptor<T> {
    fn typed(field: &'static str, target_type: TargetType, assign: Assign<T>) -> Self {
        Self {
            field,
            external_name: None,
            required: false,
            default: None,
            target_type,
            assign,
        }
    }

    /// A boolean field. On the command line its presence is its value.
    pub fn flag(field: &'static str, set: fn(&mut T, bool)) -> Self {
        Self::typed(
            field,
            TargetType::Bool,
            Box::new(move |target: &mut T, value: Value| match value {
                Value::Bool(b) => {
                    set(target, b);
                    true
                }
                _ => false,
            }),
        )
    }

    pub fn string(field: &'static str, set: fn(&mut T, String)) -> Self {
        Self::typed(
            field,
            TargetType::String,
            Box::new(move |target: &mut T, value: Value| match value {
                Value::String(s) => {
                    set(target, s);
                    true
                }
                _ => false,
            }),
        )
    }

    pub fn int32(field: &'static str, set: fn(&mut T, i32)) -> Self {
        Self::typed(
            field,
            TargetType::Int32,
            Box::new(move |target: &mut T, value: Value| match value {
                Value::Int32(i) => {
                    set(target, i);
                    true
                }
                _ => false,
            }),
        )
    }

    pub fn float32(field: &'static str, set: fn(&mut T, f32)) -> Self {
        Self::typed(
            field,
            TargetType::Float32,
            Box::new(move |target: &mut T, value: Value| match value {
                Value::Float32(x) => {
                    set(target, x);
                    true
                }
                _ => false,
            }),
        )
    }

    pub fn float64(field: &'static str, set: fn(&mut T, f64)) -> Self {
        Self::typed(
            field,
            TargetType::Float64,
            Box::new(move |target: &mut T, value: Value| match value {
                Value::Float64(x) => {
                    set(target, x);
                    true
                }
                _ => false,
            }),
        )
    }

    pub fn duration(field: &'static str, set: fn(&mut T, Duration)) -> Self {
        Self::typed(
            field,
            TargetType::Duration,
            Box::new(move |target: &mut T, value: Value| match value {
                Value::Duration(d) => {
                    set(target, d);
                    true
                }
                _ => false,
            }),
        )
    }

    /// An enumeration field matched against the variant names of `E`.
    pub fn enumeration<E: Variants>(field: &'static str, set: fn(&mut T, E)) -> Self {
        Self::typed(
            field,
            TargetType::Enum(E::NAMES),
            Box::new(move |target: &mut T, value: Value| match value {
                Value::Enum { index, .. } => match E::from_index(index) {
                    Some(variant) => {
                        set(target, variant);
                        true
                    }
                    None => false,
                },
                _ => false,
            }),
        )
    }
}

impl<T> Descriptor<T> {
    /// Sets the external name. Without one the field identifier is used.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.external_name = Some(name.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Default given as a raw string, coerced like a supplied value.
    pub fn default_raw(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(DefaultValue::Raw(raw.into()));
        self
    }

    /// Default given as a typed value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Typed(value.into()));
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The name a supplied value is looked up by.
    pub fn name(&self) -> &str {
        self.external_name.as_deref().unwrap_or(self.field)
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    pub fn arity(&self) -> usize {
        self.target_type.arity()
    }

    /// Case-insensitive comparison against the external name.
    pub fn matches(&self, name: &str) -> bool {
        fold_name(self.name()) == fold_name(name)
    }

    /// Hands `value` to the field setter. Returns false if the value is not
    /// of this field's type.
    pub(crate) fn assign(&self, target: &mut T, value: Value) -> bool {
        (self.assign)(target, value)
    }
}

impl<T> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("field", &self.field)
            .field("external_name", &self.external_name)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("target_type", &self.target_type)
            .finish_non_exhaustive()
    }
}

/// The ordered descriptors of a target type.
///
/// Built once per type through [`Schema::builder`], which rejects
/// structurally invalid metadata, then passed to the binders by reference.
#[derive(Debug)]
pub struct Schema<T> {
    descriptors: Vec<Descriptor<T>>,
}

impl<T> Schema<T> {
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder {
            descriptors: Vec::new(),
        }
    }

    /// Descriptors in declaration order.
    pub fn descriptors(&self) -> &[Descriptor<T>] {
        &self.descriptors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Descriptor<T>> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Looks up a descriptor by external name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Descriptor<T>> {
        self.descriptors.iter().find(|d| d.matches(name))
    }
}

impl<'a, T> IntoIterator for &'a Schema<T> {
    type Item = &'a Descriptor<T>;
    type IntoIter = std::slice::Iter<'a, Descriptor<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder for a [`Schema`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct SchemaBuilder<T> {
    descriptors: Vec<Descriptor<T>>,
}

impl<T> SchemaBuilder<T> {
    /// Adds a field. Declaration order is binding order.
    pub fn field(mut self, descriptor: Descriptor<T>) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Validates the descriptors and builds the schema.
    pub fn build(self) -> Result<Schema<T>, SchemaError> {
        let mut names: HashMap<String, &'static str> = HashMap::new();
        let mut fields: Vec<&'static str> = Vec::with_capacity(self.descriptors.len());

        for descriptor in &self.descriptors {
            let field = descriptor.field;

            if descriptor.name().is_empty() {
                return Err(SchemaError::EmptyName(field));
            }

            if fields.contains(&field) {
                return Err(SchemaError::DuplicateField(field));
            }
            fields.push(field);

            if let Some(first) = names.insert(fold_name(descriptor.name()), field) {
                return Err(SchemaError::DuplicateName {
                    name: descriptor.name().to_string(),
                    first,
                    second: field,
                });
            }

            match &descriptor.default {
                Some(_) if descriptor.required => {
                    return Err(SchemaError::RequiredWithDefault { field });
                }
                Some(DefaultValue::Typed(value)) if !descriptor.target_type.accepts(value) => {
                    return Err(SchemaError::DefaultTypeMismatch {
                        field,
                        expected: descriptor.target_type,
                    });
                }
                _ => {}
            }
        }

        Ok(Schema {
            descriptors: self.descriptors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Settings {
        foo: String,
        verbose: bool,
        retries: i32,
    }

    fn foo() -> Descriptor<Settings> {
        Descriptor::string("foo", |s: &mut Settings, v| s.foo = v)
    }

    #[test]
    fn test_name_falls_back_to_field() {
        assert_eq!(foo().name(), "foo");
        assert_eq!(foo().named("-foo").name(), "-foo");
    }

    #[test]
    fn test_matches_ignores_case() {
        let d = foo().named("-foo");
        assert!(d.matches("-Foo"));
        assert!(d.matches("-FOO"));
        assert!(d.matches("-foo"));
        assert!(!d.matches("-fo"));
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let schema = Schema::builder()
            .field(Descriptor::flag("verbose", |s: &mut Settings, v| {
                s.verbose = v
            }))
            .field(foo())
            .field(Descriptor::int32("retries", |s: &mut Settings, v| {
                s.retries = v
            }))
            .build()
            .unwrap();

        let fields: Vec<_> = schema.iter().map(Descriptor::field).collect();
        assert_eq!(fields, ["verbose", "foo", "retries"]);
        assert_eq!(schema.find("RETRIES").map(Descriptor::field), Some("retries"));
    }

    #[test]
    fn test_required_with_default_rejected() {
        let result = Schema::builder()
            .field(foo().required().default_raw("x"))
            .build();

        assert!(matches!(
            result,
            Err(SchemaError::RequiredWithDefault { field: "foo" })
        ));
    }

    #[test]
    fn test_duplicate_name_rejected_case_insensitively() {
        let result = Schema::builder()
            .field(foo().named("-x"))
            .field(
                Descriptor::flag("verbose", |s: &mut Settings, v| s.verbose = v).named("-X"),
            )
            .build();

        assert!(matches!(
            result,
            Err(SchemaError::DuplicateName {
                first: "foo",
                second: "verbose",
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = Schema::builder()
            .field(foo().named("-a"))
            .field(foo().named("-b"))
            .build();

        assert!(matches!(result, Err(SchemaError::DuplicateField("foo"))));
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Schema::builder().field(foo().named("")).build();

        assert!(matches!(result, Err(SchemaError::EmptyName("foo"))));
    }

    #[test]
    fn test_typed_default_must_match() {
        let result = Schema::builder()
            .field(
                Descriptor::int32("retries", |s: &mut Settings, v| s.retries = v)
                    .default_value(true),
            )
            .build();

        assert!(matches!(
            result,
            Err(SchemaError::DefaultTypeMismatch {
                field: "retries",
                expected: TargetType::Int32,
            })
        ));
    }

    #[test]
    fn test_assign_checks_kind() {
        let d = foo();
        let mut settings = Settings::default();

        assert!(d.assign(&mut settings, Value::from("hello")));
        assert_eq!(settings.foo, "hello");
        assert!(!d.assign(&mut settings, Value::Int32(1)));
        assert_eq!(settings.foo, "hello");
    }
}
