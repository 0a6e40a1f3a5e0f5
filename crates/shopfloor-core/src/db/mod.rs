//! Database operations and SQLite management for the planning engine.
//!
//! This module provides the blocking storage layer: SQLite connection
//! handling, schema management, and the query interfaces for
//! templates, plans, stages, tasks and the status log.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod log_queries;
pub mod migrations;
pub mod plan_queries;
pub mod stage_queries;
pub mod task_queries;
pub mod template_queries;
pub mod transitions;

pub use transitions::{CompletionPolicy, Subject};

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

/// Parse a stored RFC3339 timestamp column.
pub(crate) fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<jiff::Timestamp> {
    value.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse an optional stored RFC3339 timestamp column.
pub(crate) fn parse_opt_timestamp(
    idx: usize,
    value: Option<String>,
) -> rusqlite::Result<Option<jiff::Timestamp>> {
    value.map(|v| parse_timestamp(idx, v)).transpose()
}

/// Parse a stored enum column via its FromStr implementation.
pub(crate) fn parse_enum<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}
