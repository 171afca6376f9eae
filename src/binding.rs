// ABOUTME: Validates SQL text against a parameter set and produces a driver-ready statement
// ABOUTME: Checks placeholder identity and arity, infers bind-type tags, and rewrites named markers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Statement Binding
//!
//! `prepare` is the single validation step shared by every operation. It
//! never touches the driver: any problem with the SQL text or the parameter
//! set comes back as `StatementError::InvalidArgument` (or `TypeBinding`),
//! so a rejected call leaves the backend untouched for the next one.

use crate::params::{ParamKey, ParameterSet};
use crate::placeholders::{self, Dialect, ScannedSql};
use bound_sql_core::{BindType, OperationKind, PlaceholderStyle, SqlValue, StatementError};

/// A value ready to bind, coerced to match its tag
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    /// Placeholder label used in diagnostics (`:name` or the 1-based position)
    pub placeholder: String,
    /// Inferred bind-type tag
    pub bind_type: BindType,
    /// Value, already converted to the representation `bind_type` calls for
    pub value: SqlValue,
}

/// Driver-ready SQL with its ordered bind list
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    /// Operation the statement performs
    pub kind: OperationKind,
    /// SQL as handed to the driver (named markers rewritten to `?N`)
    pub sql: String,
    /// Values in driver bind order
    pub params: Vec<BoundParam>,
}

impl BoundStatement {
    /// Bind-type codes in bind order, e.g. `"isd"`
    #[must_use]
    pub fn bind_codes(&self) -> String {
        self.params.iter().map(|p| p.bind_type.code()).collect()
    }
}

/// Whether `sql` contains the keyword expected for `kind` (case-insensitive)
#[must_use]
pub fn has_expected_keyword(kind: OperationKind, sql: &str) -> bool {
    sql.to_ascii_uppercase().contains(kind.keyword())
}

/// Validate `sql` and `params` for a backend using `style` placeholders.
///
/// With `use_placeholders` false the SQL must contain no placeholders and
/// `params` must be empty; the SQL is then passed through unchanged.
///
/// # Errors
///
/// Returns `StatementError::InvalidArgument` when:
/// - the SQL is empty
/// - placeholders are required but no parameters were supplied
/// - the parameter set mixes named and positional values, or uses the other scheme
/// - a named parameter does not appear in the SQL, or a placeholder has no parameter
/// - the positional placeholder count differs from the number of values
///
/// Returns `StatementError::TypeBinding` when a value has no tag on this backend.
pub fn prepare(
    kind: OperationKind,
    style: PlaceholderStyle,
    sql: &str,
    params: &ParameterSet,
    use_placeholders: bool,
) -> Result<BoundStatement, StatementError> {
    prepare_dialect(Dialect::Standard, kind, style, sql, params, use_placeholders)
}

/// Same as [`prepare`], scanning the SQL with the quoting and comment rules of `dialect`
///
/// # Errors
///
/// See [`prepare`].
pub fn prepare_dialect(
    dialect: Dialect,
    kind: OperationKind,
    style: PlaceholderStyle,
    sql: &str,
    params: &ParameterSet,
    use_placeholders: bool,
) -> Result<BoundStatement, StatementError> {
    if sql.trim().is_empty() {
        return Err(StatementError::invalid_argument("SQL statement is empty"));
    }

    let scanned = placeholders::scan_dialect(sql, dialect)?;

    if !use_placeholders {
        if !params.is_empty() {
            return Err(StatementError::invalid_argument(format!(
                "{} parameters supplied but placeholders are disabled",
                params.len()
            )));
        }
        if !scanned.is_empty() {
            return Err(StatementError::invalid_argument(
                "SQL contains placeholders but placeholders are disabled",
            ));
        }
        return Ok(BoundStatement {
            kind,
            sql: sql.to_owned(),
            params: Vec::new(),
        });
    }

    let Some(param_style) = params.style()? else {
        return Err(StatementError::invalid_argument(format!(
            "no parameters supplied for a parameterized {kind} statement"
        )));
    };
    if param_style != style {
        return Err(StatementError::invalid_argument(format!(
            "{param_style} parameters supplied to a backend using {style} placeholders"
        )));
    }

    match style {
        PlaceholderStyle::Named => bind_named(kind, &scanned, params),
        PlaceholderStyle::Positional => bind_positional(kind, &scanned, params),
    }
}

fn bind_named(
    kind: OperationKind,
    scanned: &ScannedSql<'_>,
    params: &ParameterSet,
) -> Result<BoundStatement, StatementError> {
    if scanned.positional_count() > 0 {
        return Err(StatementError::invalid_argument(
            "positional '?' placeholder in a statement using named placeholders",
        ));
    }

    let names = scanned.named();
    let mut seen: Vec<&str> = Vec::with_capacity(params.len());
    for (key, _) in params.iter() {
        let ParamKey::Named(name) = key else {
            continue;
        };
        if seen.contains(&name.as_str()) {
            return Err(StatementError::invalid_argument(format!(
                "parameter {key} supplied more than once"
            )));
        }
        if !names.contains(&name.as_str()) {
            return Err(StatementError::invalid_argument(format!(
                "parameter {key} does not appear in the SQL"
            )));
        }
        seen.push(name);
    }

    let mut bound = Vec::with_capacity(names.len());
    for name in &names {
        let label = format!(":{name}");
        let value = params.get_named(name).ok_or_else(|| {
            StatementError::invalid_argument(format!("placeholder {label} has no parameter"))
        })?;
        bound.push(bind_value(PlaceholderStyle::Named, label, value)?);
    }

    let sql = scanned.rewrite_named(|name| {
        names
            .iter()
            .position(|candidate| *candidate == name)
            .map_or(0, |index| index + 1)
    });

    Ok(BoundStatement {
        kind,
        sql,
        params: bound,
    })
}

fn bind_positional(
    kind: OperationKind,
    scanned: &ScannedSql<'_>,
    params: &ParameterSet,
) -> Result<BoundStatement, StatementError> {
    if let Some(name) = scanned.named().first() {
        return Err(StatementError::invalid_argument(format!(
            "named placeholder :{name} in a statement using positional placeholders"
        )));
    }

    let expected = scanned.positional_count();
    if expected != params.len() {
        return Err(StatementError::invalid_argument(format!(
            "statement has {expected} placeholders but {} parameters were supplied",
            params.len()
        )));
    }

    let bound = params
        .iter()
        .map(|(key, value)| {
            let label = match key {
                ParamKey::Position(position) => position.to_string(),
                ParamKey::Named(name) => format!(":{name}"),
            };
            bind_value(PlaceholderStyle::Positional, label, value)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BoundStatement {
        kind,
        sql: scanned.sql().to_owned(),
        params: bound,
    })
}

fn bind_value(
    style: PlaceholderStyle,
    placeholder: String,
    value: &SqlValue,
) -> Result<BoundParam, StatementError> {
    let bind_type = BindType::infer(style, &placeholder, value)?;
    let value = coerce(bind_type, &placeholder, value)?;
    Ok(BoundParam {
        placeholder,
        bind_type,
        value,
    })
}

// Text-tagged floats are stringified; text-tagged bytes are decoded as UTF-8.
fn coerce(
    bind_type: BindType,
    placeholder: &str,
    value: &SqlValue,
) -> Result<SqlValue, StatementError> {
    match (bind_type, value) {
        (BindType::Text, SqlValue::Float(f)) => Ok(SqlValue::Text(f.to_string())),
        (BindType::Text, SqlValue::Bytes(bytes)) => String::from_utf8(bytes.clone())
            .map(SqlValue::Text)
            .map_err(|_| StatementError::type_binding(placeholder, "non-utf8 bytes")),
        _ => Ok(value.clone()),
    }
}
