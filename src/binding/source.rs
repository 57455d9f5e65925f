//! Raw parameter sources and the canonical name -> value map they normalize to.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;

use crate::schema::fold_name;

use super::BindError;

/// Case-insensitive name -> raw value mapping.
///
/// Inserting a name that is already present (in any case) replaces its
/// value, so the last occurrence in a source wins. Iteration follows first
/// insertion order and yields names as last supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap {
    entries: IndexMap<String, (String, String)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries.insert(fold_name(&name), (name, value.into()));
    }

    /// Inserts a name that must not already be present in any case.
    ///
    /// Used for unordered sources, where "last occurrence" has no meaning.
    fn insert_unique(&mut self, name: &str, value: &str) -> Result<(), BindError> {
        if let Some((existing, _)) = self.entries.get(&fold_name(name)) {
            return Err(BindError::MalformedSyntax(format!(
                "parameter names '{existing}' and '{name}' differ only in case"
            )));
        }
        self.insert(name, value);
        Ok(())
    }

    /// Looks up a value by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&fold_name(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&fold_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for ParameterMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// Something that can be normalized into a [`ParameterMap`].
pub trait ParameterSource {
    fn parameters(&self) -> Result<ParameterMap, BindError>;
}

impl ParameterSource for ParameterMap {
    fn parameters(&self) -> Result<ParameterMap, BindError> {
        Ok(self.clone())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> ParameterSource for [(K, V)] {
    fn parameters(&self) -> Result<ParameterMap, BindError> {
        Ok(self
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect())
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> ParameterSource for [(K, V); N] {
    fn parameters(&self) -> Result<ParameterMap, BindError> {
        self.as_slice().parameters()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> ParameterSource for Vec<(K, V)> {
    fn parameters(&self) -> Result<ParameterMap, BindError> {
        self.as_slice().parameters()
    }
}

/// A `HashMap` has no iteration order to pick a winner by, so names that
/// differ only in case are rejected with
/// [`MalformedSyntax`](BindError::MalformedSyntax).
impl<K: AsRef<str>, V: AsRef<str>, S: BuildHasher> ParameterSource for HashMap<K, V, S> {
    fn parameters(&self) -> Result<ParameterMap, BindError> {
        let mut map = ParameterMap::new();
        for (name, value) in self {
            map.insert_unique(name.as_ref(), value.as_ref())?;
        }
        Ok(map)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> ParameterSource for BTreeMap<K, V> {
    fn parameters(&self) -> Result<ParameterMap, BindError> {
        Ok(self.iter().map(|(k, v)| (k.as_ref(), v.as_ref())).collect())
    }
}

impl<K: AsRef<str>, V: AsRef<str>, S: BuildHasher> ParameterSource for IndexMap<K, V, S> {
    fn parameters(&self) -> Result<ParameterMap, BindError> {
        Ok(self.iter().map(|(k, v)| (k.as_ref(), v.as_ref())).collect())
    }
}

/// Tokens of the form `name=value`, split on the first `=`.
///
/// ```
/// use argbind::{Assignments, ParameterSource};
///
/// let params = Assignments::new(&["retries=3", "filter=a=b"]).parameters()?;
/// assert_eq!(params.get("retries"), Some("3"));
/// assert_eq!(params.get("filter"), Some("a=b"));
/// # Ok::<(), argbind::BindError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Assignments<'a, S> {
    tokens: &'a [S],
}

impl<'a, S: AsRef<str>> Assignments<'a, S> {
    pub fn new(tokens: &'a [S]) -> Self {
        Self { tokens }
    }
}

impl<S: AsRef<str>> ParameterSource for Assignments<'_, S> {
    fn parameters(&self) -> Result<ParameterMap, BindError> {
        let mut map = ParameterMap::new();
        for token in self.tokens {
            let token = token.as_ref();
            let (name, value) = token.split_once('=').ok_or_else(|| {
                BindError::MalformedSyntax(format!("'{token}' is not of the form name=value"))
            })?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

/// A named node with text content and child nodes.
///
/// As a source, each immediate child contributes its name and
/// [`content`](Self::content); the root's own name and text are ignored.
///
/// A node holds one run of text, placed before its children. Mixed content
/// with text between or after child nodes (`<a>x<b>y</b>z</a>`) cannot be
/// represented; put all of a node's text in children if order matters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's own text, excluding children.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Own text followed by the content of every descendant, depth first.
    pub fn content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.content());
        }
        out
    }
}

impl ParameterSource for Element {
    fn parameters(&self) -> Result<ParameterMap, BindError> {
        Ok(self
            .children
            .iter()
            .map(|child| (child.name.as_str(), child.content()))
            .collect())
    }
}

impl<S: ParameterSource + ?Sized> ParameterSource for &S {
    fn parameters(&self) -> Result<ParameterMap, BindError> {
        (**self).parameters()
    }
}
