// ABOUTME: Statement executor for parameterized select, insert, update, and delete calls
// ABOUTME: Validates input, binds typed parameters, runs the statement, and shapes the result record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Statement Executor
//!
//! Free functions that take the backend explicitly. Each call is one
//! prepare, bind, execute, fetch, release sequence with no state carried
//! between calls, so a failed call never affects the next one.
//!
//! Validation failures come back as `StatementError::InvalidArgument` before
//! the driver is touched. A mutation the database itself rejects is reported
//! in the result's `error` field; anything else the driver reports is a
//! `StatementError::Driver`.

use crate::backends::{ExecOutcome, StatementBackend};
use crate::binding::{self, BoundStatement};
use crate::logging::StatementLogger;
use crate::params::ParameterSet;
use bound_sql_core::{
    FetchMode, InsertResult, MutationResult, OperationKind, OperationResult, SelectResult,
    SelectedRows, StatementError,
};
use std::time::Instant;

/// Options for [`select`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOptions {
    /// Fetch every row or at most one
    pub fetch: FetchMode,
    /// Whether the SQL is parameterized; when false it must carry no placeholders
    pub use_placeholders: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            fetch: FetchMode::All,
            use_placeholders: true,
        }
    }
}

impl SelectOptions {
    /// Fetch at most one row
    #[must_use]
    pub const fn one(mut self) -> Self {
        self.fetch = FetchMode::One;
        self
    }

    /// Run the SQL as-is, without parameters
    #[must_use]
    pub const fn without_placeholders(mut self) -> Self {
        self.use_placeholders = false;
        self
    }
}

/// Run a select and return its rows
///
/// # Errors
///
/// Returns `StatementError::InvalidArgument` for unusable SQL or parameters,
/// `StatementError::TypeBinding` for a value the backend cannot bind, and
/// `StatementError::Driver` for any failure reported by the driver.
pub async fn select<B>(
    backend: &B,
    sql: &str,
    params: &ParameterSet,
    options: SelectOptions,
) -> Result<SelectResult, StatementError>
where
    B: StatementBackend + ?Sized,
{
    let kind = OperationKind::Select;
    let statement = prepare_logged(backend, kind, sql, params, options.use_placeholders)?;

    let started = Instant::now();
    let rows = backend
        .fetch(&statement, options.fetch)
        .await
        .map_err(|e| driver_failure(backend, kind, &e))?;

    let rows = match options.fetch {
        FetchMode::All => SelectedRows::All(rows),
        FetchMode::One => SelectedRows::One(rows.into_iter().next()),
    };
    let result = SelectResult::new(rows);
    StatementLogger::log_statement_complete(
        kind,
        backend.name(),
        result.row_count,
        elapsed_ms(started),
    );
    Ok(result)
}

/// Run an insert
///
/// `last_insert_id` is reported only when a row was inserted and the backend
/// produced a non-zero id.
///
/// # Errors
///
/// Returns `StatementError::InvalidArgument` for unusable SQL or parameters
/// (inserts always require parameters), `StatementError::TypeBinding` for a
/// value the backend cannot bind, and `StatementError::Driver` when the
/// database could not be reached.
pub async fn insert<B>(
    backend: &B,
    sql: &str,
    params: &ParameterSet,
) -> Result<InsertResult, StatementError>
where
    B: StatementBackend + ?Sized,
{
    let result = match execute_mutation(backend, OperationKind::Insert, sql, params).await? {
        MutationOutcome::Executed(outcome) => {
            let succeeded = outcome.rows_affected > 0;
            InsertResult {
                succeeded,
                affected_count: outcome.rows_affected,
                last_insert_id: outcome.last_insert_id.filter(|_| succeeded),
                error: None,
            }
        }
        MutationOutcome::Rejected(message) => InsertResult {
            succeeded: false,
            affected_count: 0,
            last_insert_id: None,
            error: Some(message),
        },
    };
    Ok(result)
}

/// Run an update
///
/// # Errors
///
/// Same conditions as [`insert`].
pub async fn update<B>(
    backend: &B,
    sql: &str,
    params: &ParameterSet,
) -> Result<MutationResult, StatementError>
where
    B: StatementBackend + ?Sized,
{
    execute_mutation(backend, OperationKind::Update, sql, params)
        .await
        .map(MutationOutcome::into_result)
}

/// Run a delete
///
/// # Errors
///
/// Same conditions as [`insert`].
pub async fn delete<B>(
    backend: &B,
    sql: &str,
    params: &ParameterSet,
) -> Result<MutationResult, StatementError>
where
    B: StatementBackend + ?Sized,
{
    execute_mutation(backend, OperationKind::Delete, sql, params)
        .await
        .map(MutationOutcome::into_result)
}

/// Dispatch on `kind`; selects use [`SelectOptions::default`]
///
/// # Errors
///
/// Whatever the dispatched operation returns.
pub async fn execute<B>(
    backend: &B,
    kind: OperationKind,
    sql: &str,
    params: &ParameterSet,
) -> Result<OperationResult, StatementError>
where
    B: StatementBackend + ?Sized,
{
    Ok(match kind {
        OperationKind::Select => OperationResult::Select(
            select(backend, sql, params, SelectOptions::default()).await?,
        ),
        OperationKind::Insert => OperationResult::Insert(insert(backend, sql, params).await?),
        OperationKind::Update => OperationResult::Update(update(backend, sql, params).await?),
        OperationKind::Delete => OperationResult::Delete(delete(backend, sql, params).await?),
    })
}

enum MutationOutcome {
    Executed(ExecOutcome),
    Rejected(String),
}

impl MutationOutcome {
    fn into_result(self) -> MutationResult {
        match self {
            Self::Executed(outcome) => MutationResult::executed(outcome.rows_affected),
            Self::Rejected(message) => MutationResult::rejected(message),
        }
    }
}

async fn execute_mutation<B>(
    backend: &B,
    kind: OperationKind,
    sql: &str,
    params: &ParameterSet,
) -> Result<MutationOutcome, StatementError>
where
    B: StatementBackend + ?Sized,
{
    let statement = prepare_logged(backend, kind, sql, params, true)?;

    let started = Instant::now();
    match backend.execute(&statement).await {
        Ok(outcome) => {
            StatementLogger::log_statement_complete(
                kind,
                backend.name(),
                outcome.rows_affected,
                elapsed_ms(started),
            );
            Ok(MutationOutcome::Executed(outcome))
        }
        Err(sqlx::Error::Database(db_error)) => {
            let message = db_error.message().to_owned();
            StatementLogger::log_statement_rejected(kind, backend.name(), &message);
            Ok(MutationOutcome::Rejected(message))
        }
        Err(e) => Err(driver_failure(backend, kind, &e)),
    }
}

fn prepare_logged<B>(
    backend: &B,
    kind: OperationKind,
    sql: &str,
    params: &ParameterSet,
    use_placeholders: bool,
) -> Result<BoundStatement, StatementError>
where
    B: StatementBackend + ?Sized,
{
    if !sql.trim().is_empty() && !binding::has_expected_keyword(kind, sql) {
        StatementLogger::log_keyword_mismatch(kind, sql);
    }

    let statement = binding::prepare_dialect(
        backend.dialect(),
        kind,
        backend.placeholder_style(),
        sql,
        params,
        use_placeholders,
    )
    .inspect_err(|e| StatementLogger::log_usage_error(kind, e))?;

    StatementLogger::log_statement_start(
        kind,
        backend.name(),
        &statement.sql,
        &statement.bind_codes(),
    );
    Ok(statement)
}

fn driver_failure<B>(backend: &B, kind: OperationKind, err: &sqlx::Error) -> StatementError
where
    B: StatementBackend + ?Sized,
{
    let message = err.to_string();
    StatementLogger::log_driver_failure(kind, backend.name(), &message);
    StatementError::driver(message)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
