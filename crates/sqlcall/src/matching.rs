//! Matching argument values to call parameters.
//!
//! Values come from a [`ParameterSource`]: a map of named values, or a
//! struct deriving `ParameterSource` whose field names act as property
//! names. A parameter is matched by normalized name first, then by
//! property-style name so that `user_name` finds `userName`.

use std::collections::HashMap;
use std::hash::BuildHasher;

use indexmap::IndexMap;
use sqlcall_metadata::CallMetaDataProvider;
use sqlcall_types::{SqlValue, ToSql, TypeError};

use crate::error::Result;
use crate::instrumentation;
use crate::naming::{normalize_name, property_names_match};
use crate::reconcile::ReconciledParameterList;

/// A source of named argument values.
pub trait ParameterSource {
    /// Get the names of all values this source can provide.
    fn parameter_names(&self) -> Vec<String>;

    /// Check if a value is registered under `name`.
    fn has_value(&self, name: &str) -> bool;

    /// Get the value registered under `name`.
    ///
    /// Returns `Ok(None)` when no value is registered.
    fn value(&self, name: &str) -> std::result::Result<Option<SqlValue>, TypeError>;
}

impl<T: ParameterSource + ?Sized> ParameterSource for &T {
    fn parameter_names(&self) -> Vec<String> {
        (**self).parameter_names()
    }

    fn has_value(&self, name: &str) -> bool {
        (**self).has_value(name)
    }

    fn value(&self, name: &str) -> std::result::Result<Option<SqlValue>, TypeError> {
        (**self).value(name)
    }
}

impl<S: BuildHasher> ParameterSource for HashMap<String, SqlValue, S> {
    fn parameter_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn has_value(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn value(&self, name: &str) -> std::result::Result<Option<SqlValue>, TypeError> {
        Ok(self.get(name).cloned())
    }
}

impl<S: BuildHasher> ParameterSource for IndexMap<String, SqlValue, S> {
    fn parameter_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn has_value(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn value(&self, name: &str) -> std::result::Result<Option<SqlValue>, TypeError> {
        Ok(self.get(name).cloned())
    }
}

/// An insertion-ordered map of argument values.
///
/// ```rust
/// use sqlcall::MapParameterSource;
/// use sqlcall::ParameterSource;
///
/// let source = MapParameterSource::new()
///     .add_value("user_name", "Bob")
///     .add_value("age", 42);
///
/// assert_eq!(source.parameter_names(), ["user_name", "age"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapParameterSource {
    values: IndexMap<String, SqlValue>,
}

impl MapParameterSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value.
    #[must_use]
    pub fn add_value(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Add a value converted through [`ToSql`].
    pub fn add_sql_value<T: ToSql + ?Sized>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> std::result::Result<Self, TypeError> {
        self.values.insert(name.into(), value.to_sql()?);
        Ok(self)
    }

    /// Insert or replace a value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the source holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParameterSource for MapParameterSource {
    fn parameter_names(&self) -> Vec<String> {
        self.values.parameter_names()
    }

    fn has_value(&self, name: &str) -> bool {
        self.values.has_value(name)
    }

    fn value(&self, name: &str) -> std::result::Result<Option<SqlValue>, TypeError> {
        self.values.value(name)
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for MapParameterSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<IndexMap<String, SqlValue>> for MapParameterSource {
    fn from(values: IndexMap<String, SqlValue>) -> Self {
        Self { values }
    }
}

/// Argument values keyed by call parameter name, in call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedArguments {
    values: IndexMap<String, SqlValue>,
}

impl MatchedArguments {
    /// Get the value matched to a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.values.get(name)
    }

    /// Check if a parameter received a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Get the number of matched values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(parameter name, value)` pairs in call order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, SqlValue> {
        self.values.iter()
    }

    /// Get the matched parameter names in call order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Take the underlying map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, SqlValue> {
        self.values
    }
}

impl IntoIterator for MatchedArguments {
    type Item = (String, SqlValue);
    type IntoIter = indexmap::map::IntoIter<String, SqlValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a MatchedArguments {
    type Item = (&'a String, &'a SqlValue);
    type IntoIter = indexmap::map::Iter<'a, String, SqlValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Match the values of `source` to the named parameters of a call.
///
/// Parameters without a matching value are left out. Values that match no
/// parameter are logged and dropped.
pub fn match_arguments_to_parameters(
    parameters: &ReconciledParameterList,
    source: &dyn ParameterSource,
    provider: &dyn CallMetaDataProvider,
) -> Result<MatchedArguments> {
    let span = instrumentation::match_span(parameters.len());
    let _guard = span.enter();

    let names = source.parameter_names();
    let normalized: Vec<String> = names.iter().map(|n| normalize_name(provider, n)).collect();
    let mut consumed = vec![false; names.len()];
    let mut values = IndexMap::with_capacity(parameters.len());

    for param in parameters {
        if param.is_results_parameter() {
            continue;
        }
        let Some(param_name) = param.name() else {
            continue;
        };

        let key = normalize_name(provider, param_name);
        let property_name = provider.parameter_name_to_use(param_name);
        let found = normalized
            .iter()
            .position(|n| *n == key)
            .or_else(|| {
                names
                    .iter()
                    .position(|n| property_names_match(n, &property_name))
            });

        let Some(index) = found else {
            continue;
        };
        consumed[index] = true;
        if let Some(value) = source.value(&names[index])? {
            values.insert(param_name.to_owned(), value);
        }
    }

    for (name, consumed) in names.iter().zip(&consumed) {
        if !*consumed {
            tracing::warn!(
                argument = %name,
                "unable to locate the corresponding parameter for argument value; dropping it"
            );
        }
    }

    Ok(MatchedArguments { values })
}
