// ABOUTME: Driver backend abstraction for bound statement execution
// ABOUTME: Plugin architecture with a SQLite backend and an optional MySQL backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Statement backends
//!
//! A backend owns a driver connection pool and knows its placeholder style.
//! It receives statements that `binding::prepare` has already validated and
//! only prepares, binds, executes, and decodes. Each call prepares a
//! non-persistent statement, so the statement, its cursor, and the pooled
//! connection are all released when the call returns.

use crate::binding::BoundStatement;
use crate::placeholders::Dialect;
use async_trait::async_trait;
use bound_sql_core::{FetchMode, PlaceholderStyle, Row};

pub mod factory;
pub mod sqlite;

#[cfg(feature = "mysql")]
pub mod mysql;

/// What the driver reported for an executed statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecOutcome {
    /// Rows the driver reports as affected
    pub rows_affected: u64,
    /// Last auto-generated id, when the driver reports a non-zero one
    pub last_insert_id: Option<i64>,
}

/// Core backend abstraction trait
///
/// Implementations must release every driver resource they acquire before
/// returning, on success and on error.
#[async_trait]
pub trait StatementBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Placeholder scheme this backend accepts
    fn placeholder_style(&self) -> PlaceholderStyle;

    /// Quoting and comment rules used when scanning SQL for placeholders
    fn dialect(&self) -> Dialect {
        Dialect::Standard
    }

    /// Prepare, bind, execute, and fetch rows
    async fn fetch(
        &self,
        statement: &BoundStatement,
        mode: FetchMode,
    ) -> Result<Vec<Row>, sqlx::Error>;

    /// Prepare, bind, and execute a statement that returns no rows
    async fn execute(&self, statement: &BoundStatement) -> Result<ExecOutcome, sqlx::Error>;
}
