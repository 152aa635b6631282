//! Host engine seam.
//!
//! The crate generates statement text; a host engine executes it. Everything
//! the generator needs from the host fits behind one call: run a single
//! read-only statement, get typed rows back. The host is expected to provide
//! `PIVOT`, `ROLLUP`/`GROUPING SETS` with `GROUPING()`, `UNION ALL BY NAME`,
//! `EXCLUDE`/`REPLACE` projection rewriting, and `ORDER BY ALL` - the
//! generated text leans on all of them.
//!
//! Concurrency and timeouts are the host's business; the generator is a pure
//! synchronous computation and imposes nothing of its own beyond propagating
//! the host's failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a host engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The host rejected or failed to execute a statement.
    #[error("query execution failed: {0}")]
    Execution(String),

    /// The host was unreachable.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// A materialized result set: column names plus rows of JSON-typed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl QueryResult {
    /// Values of the first column, stringified.
    ///
    /// Used to collect the enumerated pivot keys; the enumeration query casts
    /// its key to text, so non-string values only appear if the host widens
    /// types on its own, in which case their JSON rendering is used as-is.
    pub fn first_column_strings(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.first())
            .map(|value| match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

/// A host capable of executing one read-only statement.
pub trait Engine {
    /// Execute `sql` and return the full result set.
    fn query(&self, sql: &str) -> Result<QueryResult, EngineError>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn query(&self, sql: &str) -> Result<QueryResult, EngineError> {
        (**self).query(sql)
    }
}
