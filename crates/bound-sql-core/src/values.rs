// ABOUTME: SQL value sum type and bind-type tags for parameter binding
// ABOUTME: Maps each value kind to the tag a backend uses to encode it on the wire
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # SQL Values
//!
//! `SqlValue` is the closed set of values that can be bound to a placeholder
//! or read back from a row. The caller picks the variant through its static
//! type (`From` impls), so no runtime type reflection is needed when binding.

use crate::errors::{AppError, StatementError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A value bound to a placeholder or read from a result column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// Double precision float
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Binary string
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Name of the value kind, used in diagnostics
    #[must_use]
    pub const fn value_type(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
        }
    }

    /// Check for SQL NULL
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text payload, if this is a text value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer value
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Float payload; integers widen, text is parsed
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            Self::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Boolean payload; integers 0 and 1 are accepted
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Integer(0) => Some(false),
            Self::Integer(1) => Some(true),
            _ => None,
        }
    }

    /// Render as JSON (bytes become an array of numbers)
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s.clone()),
            Self::Bytes(b) => Value::Array(b.iter().map(|byte| Value::from(*byte)).collect()),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for SqlValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl<T: Into<Self>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl TryFrom<Value> for SqlValue {
    type Error = StatementError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => n.as_i64().map_or_else(
                || {
                    n.as_f64()
                        .map(Self::Float)
                        .ok_or_else(|| StatementError::type_binding("<json>", "number"))
                },
                |i| Ok(Self::Integer(i)),
            ),
            Value::String(s) => Ok(Self::Text(s)),
            Value::Array(_) => Err(StatementError::type_binding("<json>", "array")),
            Value::Object(_) => Err(StatementError::type_binding("<json>", "object")),
        }
    }
}

/// Placeholder naming scheme understood by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `:name` tokens
    #[default]
    Named,
    /// `?` markers
    Positional,
}

impl fmt::Display for PlaceholderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named => write!(f, "named"),
            Self::Positional => write!(f, "positional"),
        }
    }
}

impl FromStr for PlaceholderStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "named" => Ok(Self::Named),
            "positional" => Ok(Self::Positional),
            other => Err(AppError::invalid_input(format!(
                "Unknown placeholder style '{other}' (expected 'named' or 'positional')"
            ))),
        }
    }
}

/// Tag telling the driver how to encode a bound value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindType {
    /// Text (strings, and floats on the named backend)
    Text,
    /// Integer
    Integer,
    /// Double precision float
    Double,
    /// Boolean
    Boolean,
    /// Null
    Null,
    /// Binary large object
    Blob,
}

impl BindType {
    /// Single-character code, as written to logs
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Text => 's',
            Self::Integer => 'i',
            Self::Double => 'd',
            Self::Boolean => 'b',
            Self::Null => 'n',
            Self::Blob => 'l',
        }
    }

    /// Infer the tag for `value` on a backend using `style` placeholders.
    ///
    /// The named backend binds floats as text and has no binary tag, so bytes
    /// must be valid UTF-8 there. The positional backend has dedicated double
    /// and blob tags.
    ///
    /// # Errors
    ///
    /// Returns `StatementError::TypeBinding` when the backend has no tag for the value
    pub fn infer(
        style: PlaceholderStyle,
        placeholder: &str,
        value: &SqlValue,
    ) -> Result<Self, StatementError> {
        let tag = match (style, value) {
            (_, SqlValue::Null) => Self::Null,
            (_, SqlValue::Bool(_)) => Self::Boolean,
            (_, SqlValue::Integer(_)) => Self::Integer,
            (_, SqlValue::Text(_)) | (PlaceholderStyle::Named, SqlValue::Float(_)) => Self::Text,
            (PlaceholderStyle::Positional, SqlValue::Float(_)) => Self::Double,
            (PlaceholderStyle::Positional, SqlValue::Bytes(_)) => Self::Blob,
            (PlaceholderStyle::Named, SqlValue::Bytes(bytes)) => {
                if std::str::from_utf8(bytes).is_ok() {
                    Self::Text
                } else {
                    return Err(StatementError::type_binding(placeholder, "non-utf8 bytes"));
                }
            }
        };
        Ok(tag)
    }
}

impl fmt::Display for BindType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Blob => "blob",
        };
        write!(f, "{name}")
    }
}
