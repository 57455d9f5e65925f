//! TOML file parameter source.

use std::path::{Path, PathBuf};

use toml::{Table, Value};

use super::source::{Element, ParameterMap, ParameterSource};
use super::BindError;

/// A parameter source that loads a TOML document into an [`Element`] tree.
///
/// Top-level keys become the parameters. Tables become nested elements and
/// arrays become one element per item, so a non-scalar parameter's value is
/// the concatenated content of its scalars.
///
/// Files can be marked as required or optional. Required files that don't
/// exist cause an error; optional files that don't exist contribute nothing.
#[derive(Debug, Clone)]
pub struct TomlFile {
    path: PathBuf,
    required: bool,
}

impl TomlFile {
    /// Creates a new file source.
    ///
    /// If `required` is true, normalization fails if the file doesn't exist.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }

    /// Loads the document as an element tree. The root element is named
    /// after the file stem.
    ///
    /// Returns `Ok(None)` if the file is optional and missing.
    pub fn load(&self) -> Result<Option<Element>, BindError> {
        let Some(contents) = self.read()? else {
            return Ok(None);
        };
        let table: Table = toml::from_str(&contents).map_err(|source| BindError::ParseError {
            path: self.path.clone(),
            source,
        })?;

        let root = self
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();
        Ok(Some(table_to_element(&root, &table)))
    }

    fn read(&self) -> Result<Option<String>, BindError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !self.required => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BindError::FileNotFound(self.path.clone()))
            }
            Err(source) => Err(BindError::ReadError {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl ParameterSource for TomlFile {
    fn parameters(&self) -> Result<ParameterMap, BindError> {
        match self.load()? {
            Some(root) => root.parameters(),
            None => Ok(ParameterMap::new()),
        }
    }
}

/// Converts a TOML table into an element named `name`.
pub fn table_to_element(name: &str, table: &Table) -> Element {
    let mut element = Element::new(name);
    for (key, value) in table {
        push_value(&mut element, key, value);
    }
    element
}

fn push_value(parent: &mut Element, key: &str, value: &Value) {
    match value {
        Value::Table(t) => parent.push(table_to_element(key, t)),
        Value::Array(items) => {
            let mut element = Element::new(key);
            for item in items {
                push_value(&mut element, key, item);
            }
            parent.push(element);
        }
        Value::String(s) => parent.push(Element::new(key).with_text(s.as_str())),
        Value::Integer(i) => parent.push(Element::new(key).with_text(i.to_string())),
        // Debug keeps the fraction ("3.0"), so integer fields reject it.
        Value::Float(f) => parent.push(Element::new(key).with_text(format!("{f:?}"))),
        Value::Boolean(b) => parent.push(Element::new(key).with_text(b.to_string())),
        Value::Datetime(dt) => parent.push(Element::new(key).with_text(dt.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_toml_file_loads_top_level_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "retries = 3").unwrap();
        writeln!(file, "mode = \"Fast\"").unwrap();
        writeln!(file, "verbose = true").unwrap();
        writeln!(file, "[server]").unwrap();
        writeln!(file, "host = \"example.com\"").unwrap();

        let params = TomlFile::new(file.path(), true).parameters().unwrap();

        assert_eq!(params.get("retries"), Some("3"));
        assert_eq!(params.get("mode"), Some("Fast"));
        assert_eq!(params.get("verbose"), Some("true"));
        assert_eq!(params.get("server"), Some("example.com"));
        assert_eq!(params.get("host"), None);
    }

    #[test]
    fn test_toml_file_required_missing() {
        let source = TomlFile::new("/nonexistent/path/params.toml", true);
        let result = source.parameters();

        assert!(matches!(result, Err(BindError::FileNotFound(_))));
    }

    #[test]
    fn test_toml_file_optional_missing() {
        let source = TomlFile::new("/nonexistent/path/params.toml", false);

        assert!(source.parameters().unwrap().is_empty());
        assert!(source.load().unwrap().is_none());
    }

    #[test]
    fn test_toml_file_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "retries = ").unwrap();

        let result = TomlFile::new(file.path(), true).parameters();

        assert!(matches!(result, Err(BindError::ParseError { .. })));
    }

    #[test]
    fn test_root_named_after_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worker.toml");
        std::fs::write(&path, "threads = 2\n").unwrap();

        let root = TomlFile::new(&path, true).load().unwrap().unwrap();

        assert_eq!(root.name(), "worker");
        assert_eq!(root.children()[0].content(), "2");
    }

    #[test]
    fn test_float_keeps_fraction() {
        let table: Table = toml::from_str("ratio = 3.0\nscale = 0.25").unwrap();
        let params = table_to_element("root", &table).parameters().unwrap();

        assert_eq!(params.get("ratio"), Some("3.0"));
        assert_eq!(params.get("scale"), Some("0.25"));
    }

    #[test]
    fn test_whole_float_rejected_by_integer_field() {
        #[derive(Default)]
        struct Limits {
            retries: i32,
        }

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "retries = 3.0").unwrap();
        let schema = crate::Schema::builder()
            .field(crate::Descriptor::int32("retries", |l: &mut Limits, v| {
                l.retries = v
            }))
            .build()
            .unwrap();

        let mut limits = Limits::default();
        let result = crate::ParameterBinder::new().bind(
            &mut limits,
            &schema,
            &TomlFile::new(file.path(), true),
        );

        assert!(matches!(
            result,
            Err(BindError::InvalidValueFormat { name, .. }) if name == "retries"
        ));
        assert_eq!(limits.retries, 0);
    }

    #[test]
    fn test_arrays_become_repeated_children() {
        let table: Table = toml::from_str("tags = [\"a\", \"b\"]").unwrap();
        let root = table_to_element("root", &table);

        let tags = &root.children()[0];
        assert_eq!(tags.name(), "tags");
        assert_eq!(tags.children().len(), 2);
        assert_eq!(tags.content(), "ab");
    }
}
