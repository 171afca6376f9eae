// ABOUTME: Logging configuration and structured statement events for observability and debugging
// ABOUTME: Configures log levels and formatters, and records statement lifecycle events with tracing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Logging configuration with structured output

use anyhow::Result;
use bound_sql_core::constants::logging::{MAX_LOGGED_SQL_LEN, SERVICE_NAME};
use bound_sql_core::{OperationKind, StatementError};
use serde_json::json;
use std::env;
use std::io;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for terminals
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            service_name: SERVICE_NAME.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.into()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment,
        }
    }

    /// Build the filter: `RUST_LOG` (or the configured level) plus noise reduction
    fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").map_or_else(
            |_| EnvFilter::new(&self.level),
            |env_directive| EnvFilter::new(&env_directive),
        );
        // sqlx logs every statement at info; keep those out of the default output
        base.add_directive(
            "sqlx=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "sqlx::query=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            format!("bound_sql={}", self.level)
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        )
    }

    /// Initialize the global tracing subscriber
    ///
    /// Logs go to stderr so command output on stdout stays machine-readable.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .json();
                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stderr);
                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_target(false)
                    .with_writer(io::stderr);
                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        debug!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Logging initialized"
        );

        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "features": {
                    "location": self.include_location,
                    "thread": self.include_thread
                }
            }
        });
        debug!("Logging configuration: {}", config_summary);
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Shorten SQL for log output without splitting a character
#[must_use]
pub fn truncate_sql(sql: &str) -> &str {
    match sql.char_indices().nth(MAX_LOGGED_SQL_LEN) {
        Some((end, _)) => &sql[..end],
        None => sql,
    }
}

/// Structured events for the statement lifecycle
///
/// Parameter values never reach the log; only their bind-type codes do.
pub struct StatementLogger;

impl StatementLogger {
    /// Statement validated and about to run
    pub fn log_statement_start(kind: OperationKind, backend: &str, sql: &str, bind_codes: &str) {
        debug!(
            db.operation = %kind,
            db.backend = %backend,
            db.statement = %truncate_sql(sql),
            db.bind_types = %bind_codes,
            "Executing statement"
        );
    }

    /// Statement finished
    pub fn log_statement_complete(kind: OperationKind, backend: &str, rows: u64, duration_ms: u64) {
        info!(
            db.operation = %kind,
            db.backend = %backend,
            db.rows = rows,
            db.duration_ms = duration_ms,
            "Statement completed"
        );
    }

    /// Caller error caught before the driver was touched
    pub fn log_usage_error(kind: OperationKind, err: &StatementError) {
        warn!(
            db.operation = %kind,
            error = %err,
            "Statement rejected before execution"
        );
    }

    /// SQL text lacks the keyword its operation expects
    pub fn log_keyword_mismatch(kind: OperationKind, sql: &str) {
        warn!(
            db.operation = %kind,
            db.expected_keyword = %kind.keyword().trim_end(),
            db.statement = %truncate_sql(sql),
            "Statement does not contain the expected keyword"
        );
    }

    /// Database refused the statement itself
    pub fn log_statement_rejected(kind: OperationKind, backend: &str, message: &str) {
        error!(
            db.operation = %kind,
            db.backend = %backend,
            error = %message,
            "Database rejected statement"
        );
    }

    /// Driver failure unrelated to the statement text
    pub fn log_driver_failure(kind: OperationKind, backend: &str, message: &str) {
        error!(
            db.operation = %kind,
            db.backend = %backend,
            error = %message,
            "Driver failure"
        );
    }
}
