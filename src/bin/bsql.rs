// ABOUTME: bsql - command-line front end for parameterized statement execution
// ABOUTME: Runs one select, insert, update, or delete and prints the result record as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Select one row with a named parameter
//! bsql --database-url sqlite:app.db select "SELECT name FROM users WHERE id = :id" --param id=7 --one
//!
//! # Insert with JSON-typed values (non-JSON text is taken as a string)
//! bsql insert "INSERT INTO users (name, active) VALUES (:name, :active)" --param name=Ann --param active=true
//!
//! # Positional placeholders
//! bsql --positional delete "DELETE FROM messages WHERE source = ?" --arg '"import"'
//!
//! # Unparameterized select
//! bsql select "SELECT COUNT(*) AS n FROM users" --raw
//! ```

use bound_sql::backends::factory::Database;
use bound_sql::config::DatabaseConfig;
use bound_sql::executor::{self, SelectOptions};
use bound_sql::logging::{LogFormat, LoggingConfig};
use bound_sql::params::ParameterSet;
use bound_sql::placeholders;
use bound_sql::{AppError, AppResult, OperationKind, OperationResult, PlaceholderStyle, SqlValue};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "bsql",
    version,
    about = "Run parameterized SQL statements",
    long_about = "Validates placeholders against the supplied parameters, binds each value with its inferred type, and prints the result record as JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override (defaults to DATABASE_URL, then sqlite::memory:)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Use positional `?` placeholders on SQLite
    #[arg(long, global = true)]
    positional: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run a SELECT and print the rows
    Select {
        /// SQL text
        sql: String,

        /// Fetch at most one row
        #[arg(long)]
        one: bool,

        /// Run the SQL without parameters
        #[arg(long)]
        raw: bool,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Run an INSERT
    Insert {
        /// SQL text
        sql: String,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Run an UPDATE
    Update {
        /// SQL text
        sql: String,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Run a DELETE
    Delete {
        /// SQL text
        sql: String,

        #[command(flatten)]
        params: ParamArgs,
    },
}

#[derive(Args)]
struct ParamArgs {
    /// Named parameter as KEY=VALUE; VALUE is parsed as JSON when possible
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_named, conflicts_with = "args")]
    params: Vec<(String, SqlValue)>,

    /// Positional parameter; parsed as JSON when possible
    #[arg(long = "arg", value_name = "VALUE", value_parser = parse_positional)]
    args: Vec<SqlValue>,
}

impl ParamArgs {
    fn into_parameter_set(self) -> ParameterSet {
        if self.args.is_empty() {
            ParameterSet::named(self.params)
        } else {
            ParameterSet::positional(self.args)
        }
    }
}

fn parse_value(raw: &str) -> Result<SqlValue, String> {
    serde_json::from_str::<Value>(raw).map_or_else(
        |_| Ok(SqlValue::Text(raw.to_owned())),
        |json| SqlValue::try_from(json).map_err(|e| e.to_string()),
    )
}

fn parse_named(raw: &str) -> Result<(String, SqlValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if !placeholders::is_valid_name(key.strip_prefix(':').unwrap_or(key)) {
        return Err(format!("invalid parameter name in '{raw}'"));
    }
    Ok((key.to_owned(), parse_value(value)?))
}

fn parse_positional(raw: &str) -> Result<SqlValue, String> {
    parse_value(raw)
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: (if cli.verbose { "debug" } else { "warn" }).into(),
        format: LogFormat::Compact,
        ..LoggingConfig::from_env()
    };
    logging
        .init()
        .map_err(|e| AppError::internal(format!("Failed to initialize logging: {e}")))?;

    let mut config = match cli.database_url.as_deref() {
        Some(url) => DatabaseConfig::for_url(url)?,
        None => DatabaseConfig::from_env()?,
    };
    if cli.positional {
        config = config.with_placeholder_style(PlaceholderStyle::Positional);
    }

    debug!("Connecting to database: {}", config.url);
    let database = Database::connect(&config).await?;
    debug!("Using backend: {}", database.backend_info());

    let result = match cli.command {
        Command::Select {
            sql,
            one,
            raw,
            params,
        } => {
            let mut options = SelectOptions::default();
            if one {
                options = options.one();
            }
            if raw {
                options = options.without_placeholders();
            }
            let params = params.into_parameter_set();
            OperationResult::Select(executor::select(&database, &sql, &params, options).await?)
        }
        Command::Insert { sql, params } => {
            run(&database, OperationKind::Insert, &sql, params).await?
        }
        Command::Update { sql, params } => {
            run(&database, OperationKind::Update, &sql, params).await?
        }
        Command::Delete { sql, params } => {
            run(&database, OperationKind::Delete, &sql, params).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(message) = result.error() {
        return Err(AppError::database(message));
    }
    Ok(())
}

async fn run(
    database: &Database,
    kind: OperationKind,
    sql: &str,
    params: ParamArgs,
) -> AppResult<OperationResult> {
    let params = params.into_parameter_set();
    Ok(executor::execute(database, kind, sql, &params).await?)
}
