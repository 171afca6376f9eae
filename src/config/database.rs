// ABOUTME: Database configuration types for SQLite and MySQL connections
// ABOUTME: Handles connection URLs, pool sizing, and the SQLite placeholder style
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use bound_sql_core::constants::database;
use bound_sql_core::{AppError, AppResult, PlaceholderStyle};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Type-safe database location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// `MySQL` connection
    MySql {
        /// `MySQL` connection string
        connection_string: String,
    },
    /// In-memory `SQLite`
    #[default]
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::invalid_input("Database URL cannot be empty"));
        }
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else if s.starts_with("mysql://") || s.starts_with("mariadb://") {
            Ok(Self::MySql {
                connection_string: s.to_owned(),
            })
        } else {
            // Fallback: treat as SQLite file path
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::MySql { connection_string } => connection_string.clone(),
            Self::Memory => database::DEFAULT_DATABASE_URL.into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }

    /// Check if this is a `SQLite` database
    #[must_use]
    pub const fn is_sqlite(&self) -> bool {
        matches!(self, Self::SQLite { .. } | Self::Memory)
    }

    /// Check if this is a `MySQL` database
    #[must_use]
    pub const fn is_mysql(&self) -> bool {
        matches!(self, Self::MySql { .. })
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // Never print MySQL credentials
        match self {
            Self::MySql { connection_string } => match connection_string.rsplit_once('@') {
                Some((_, host)) => write!(f, "mysql://***@{host}"),
                None => write!(f, "{connection_string}"),
            },
            _ => write!(f, "{}", self.to_connection_string()),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Where the database lives
    pub url: DatabaseUrl,
    /// Maximum pooled connections (always 1 for in-memory `SQLite`)
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,
    /// Placeholder style for `SQLite`; `None` keeps the backend default
    pub placeholder_style: Option<PlaceholderStyle>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DatabaseUrl::default(),
            max_connections: 1,
            acquire_timeout_secs: database::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            placeholder_style: None,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a given URL with default pool settings
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed
    pub fn for_url(url: &str) -> AppResult<Self> {
        let url = DatabaseUrl::parse_url(url)?;
        let max_connections = if url.is_memory() {
            1
        } else {
            database::DEFAULT_MAX_CONNECTIONS
        };
        Ok(Self {
            url,
            max_connections,
            ..Self::default()
        })
    }

    /// Use a specific placeholder style
    #[must_use]
    pub const fn with_placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder_style = Some(style);
        self
    }

    /// Load database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if database environment variables are invalid
    pub fn from_env() -> AppResult<Self> {
        let url = DatabaseUrl::parse_url(&env_var_or(
            "DATABASE_URL",
            database::DEFAULT_DATABASE_URL,
        ))?;

        let max_connections: u32 = env_var_or(
            "DB_MAX_CONNECTIONS",
            &database::DEFAULT_MAX_CONNECTIONS.to_string(),
        )
        .parse()
        .map_err(|e| AppError::invalid_input(format!("Invalid DB_MAX_CONNECTIONS value: {e}")))?;
        if max_connections == 0 {
            return Err(AppError::invalid_input(
                "DB_MAX_CONNECTIONS must be at least 1",
            ));
        }

        let acquire_timeout_secs = env_var_or(
            "DB_ACQUIRE_TIMEOUT_SECS",
            &database::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string(),
        )
        .parse()
        .map_err(|e| {
            AppError::invalid_input(format!("Invalid DB_ACQUIRE_TIMEOUT_SECS value: {e}"))
        })?;

        let placeholder_style = env::var("SQLITE_PLACEHOLDER_STYLE")
            .ok()
            .map(|value| value.parse::<PlaceholderStyle>())
            .transpose()?;

        Ok(Self {
            // A second in-memory connection would open a second, empty database
            max_connections: if url.is_memory() { 1 } else { max_connections },
            url,
            acquire_timeout_secs,
            placeholder_style,
        })
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
