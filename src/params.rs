// ABOUTME: Ordered parameter sets keyed by placeholder name or position
// ABOUTME: Normalizes ':name' keys and reports when a set mixes naming schemes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use bound_sql_core::{PlaceholderStyle, SqlValue, StatementError};
use std::fmt;

/// Key a parameter value is supplied under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// Named placeholder, stored without the leading colon
    Named(String),
    /// 1-based position among the positional parameters
    Position(usize),
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, ":{name}"),
            Self::Position(position) => write!(f, "#{position}"),
        }
    }
}

/// Ordered `(key, value)` pairs supplied for one statement
///
/// ```
/// use bound_sql::params::ParameterSet;
///
/// let params = ParameterSet::named([(":id", 7)]).with_named("name", "Ann");
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    entries: Vec<(ParamKey, SqlValue)>,
    positional: usize,
}

impl ParameterSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a named set; keys may carry a leading `:`
    pub fn named<K, V, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        V: Into<SqlValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .fold(Self::new(), |set, (key, value)| set.with_named(key, value))
    }

    /// Build a positional set, numbered in iteration order
    pub fn positional<V, I>(values: I) -> Self
    where
        V: Into<SqlValue>,
        I: IntoIterator<Item = V>,
    {
        values
            .into_iter()
            .fold(Self::new(), |set, value| set.with_positional(value))
    }

    /// Add a named value
    #[must_use]
    pub fn with_named(mut self, key: impl AsRef<str>, value: impl Into<SqlValue>) -> Self {
        self.push_named(key, value);
        self
    }

    /// Add the next positional value
    #[must_use]
    pub fn with_positional(mut self, value: impl Into<SqlValue>) -> Self {
        self.push_positional(value);
        self
    }

    /// Add a named value in place
    pub fn push_named(&mut self, key: impl AsRef<str>, value: impl Into<SqlValue>) {
        let key = key.as_ref();
        let name = key.strip_prefix(':').unwrap_or(key);
        self.entries
            .push((ParamKey::Named(name.to_owned()), value.into()));
    }

    /// Add the next positional value in place
    pub fn push_positional(&mut self, value: impl Into<SqlValue>) {
        self.positional += 1;
        self.entries
            .push((ParamKey::Position(self.positional), value.into()));
    }

    /// Number of values
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no values were supplied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&ParamKey, &SqlValue)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    /// Value supplied for a named placeholder
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&SqlValue> {
        let name = name.strip_prefix(':').unwrap_or(name);
        self.entries.iter().find_map(|(key, value)| match key {
            ParamKey::Named(n) if n == name => Some(value),
            _ => None,
        })
    }

    /// Naming scheme of the set; `None` when empty.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::InvalidArgument` when named and positional values are mixed
    pub fn style(&self) -> Result<Option<PlaceholderStyle>, StatementError> {
        let positional = self.positional;
        let named = self.entries.len() - positional;
        match (named, positional) {
            (0, 0) => Ok(None),
            (_, 0) => Ok(Some(PlaceholderStyle::Named)),
            (0, _) => Ok(Some(PlaceholderStyle::Positional)),
            _ => Err(StatementError::invalid_argument(format!(
                "parameter set mixes {named} named and {positional} positional values"
            ))),
        }
    }
}
