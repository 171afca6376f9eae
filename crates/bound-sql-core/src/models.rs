// ABOUTME: Operation kinds, result rows, and per-operation result records
// ABOUTME: Shapes what select, insert, update, and delete return to callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::keywords;
use crate::values::SqlValue;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Statement kind an executor call performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Read rows
    Select,
    /// Insert rows
    Insert,
    /// Update rows
    Update,
    /// Delete rows
    Delete,
}

impl OperationKind {
    /// Keyword a statement of this kind is expected to contain
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Select => keywords::SELECT,
            Self::Insert => keywords::INSERT,
            Self::Update => keywords::UPDATE,
            Self::Delete => keywords::DELETE,
        }
    }

    /// Lower-case operation name for logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Whether the statement mutates rows
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        !matches!(self, Self::Select)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many rows a select fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Every matching row
    #[default]
    All,
    /// At most one row
    One,
}

/// A result row: column names in select order, each with its value
///
/// Names need not be unique (`SELECT a.id, b.id ...`). Every column is kept;
/// as a JSON object a repeated name gets a `:2`, `:3`, ... suffix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    /// Create an empty row
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row with room for `capacity` columns
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Append a column
    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        self.columns.push((name.into(), value));
    }

    /// Value of the first column called `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Values of every column called `name`, in select order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SqlValue> + 'a {
        self.columns
            .iter()
            .filter(move |(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Unique object keys in column order
    fn json_keys(&self) -> Vec<Cow<'_, str>> {
        let mut taken: HashSet<Cow<'_, str>> = self
            .columns
            .iter()
            .map(|(name, _)| Cow::Borrowed(name.as_str()))
            .collect();
        let mut occurrences: HashMap<&str, usize> = HashMap::new();

        self.columns
            .iter()
            .map(|(name, _)| {
                let seen = occurrences.entry(name.as_str()).or_insert(0);
                *seen += 1;
                if *seen == 1 {
                    return Cow::Borrowed(name.as_str());
                }
                let mut suffix = *seen;
                loop {
                    let label = format!("{name}:{suffix}");
                    if !taken.contains(label.as_str()) {
                        taken.insert(Cow::Owned(label.clone()));
                        return Cow::Owned(label);
                    }
                    suffix += 1;
                }
            })
            .collect()
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SqlValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, SqlValue)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (key, (_, value)) in self.json_keys().iter().zip(&self.columns) {
            map.serialize_entry(key.as_ref(), value)?;
        }
        map.end()
    }
}

/// Rows returned by a select, by fetch mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SelectedRows {
    /// Fetch-all mode
    All(Vec<Row>),
    /// Single-row mode; `None` when nothing matched
    One(Option<Row>),
}

impl SelectedRows {
    /// Number of rows held
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::All(rows) => rows.len(),
            Self::One(row) => usize::from(row.is_some()),
        }
    }

    /// Whether no rows are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First row, if any
    #[must_use]
    pub fn first(&self) -> Option<&Row> {
        match self {
            Self::All(rows) => rows.first(),
            Self::One(row) => row.as_ref(),
        }
    }

    /// Flatten into a vector regardless of mode
    #[must_use]
    pub fn into_vec(self) -> Vec<Row> {
        match self {
            Self::All(rows) => rows,
            Self::One(row) => row.into_iter().collect(),
        }
    }
}

/// Result of a select
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectResult {
    /// Fetched rows
    pub rows: SelectedRows,
    /// Number of rows fetched
    pub row_count: u64,
}

impl SelectResult {
    /// Build from fetched rows, deriving `row_count`
    #[must_use]
    pub fn new(rows: SelectedRows) -> Self {
        let row_count = rows.len() as u64;
        Self { rows, row_count }
    }
}

/// Result of an insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertResult {
    /// At least one row was inserted
    pub succeeded: bool,
    /// Rows inserted
    pub affected_count: u64,
    /// Auto-generated id of the last inserted row
    pub last_insert_id: Option<i64>,
    /// Database message when the statement was rejected
    pub error: Option<String>,
}

/// Result of an update or delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationResult {
    /// At least one row was affected
    pub succeeded: bool,
    /// Rows affected
    pub affected_count: u64,
    /// Database message when the statement was rejected
    pub error: Option<String>,
}

impl MutationResult {
    /// Result for an executed statement
    #[must_use]
    pub const fn executed(affected_count: u64) -> Self {
        Self {
            succeeded: affected_count > 0,
            affected_count,
            error: None,
        }
    }

    /// Result for a statement the database rejected
    #[must_use]
    pub const fn rejected(message: String) -> Self {
        Self {
            succeeded: false,
            affected_count: 0,
            error: Some(message),
        }
    }
}

/// Result of any operation, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum OperationResult {
    /// Select result
    Select(SelectResult),
    /// Insert result
    Insert(InsertResult),
    /// Update result
    Update(MutationResult),
    /// Delete result
    Delete(MutationResult),
}

impl OperationResult {
    /// Operation kind of this result
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Select(_) => OperationKind::Select,
            Self::Insert(_) => OperationKind::Insert,
            Self::Update(_) => OperationKind::Update,
            Self::Delete(_) => OperationKind::Delete,
        }
    }

    /// Database message, if a mutation was rejected
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Select(_) => None,
            Self::Insert(result) => result.error.as_deref(),
            Self::Update(result) | Self::Delete(result) => result.error.as_deref(),
        }
    }
}
