//! Error types for request validation and generation.

use thiserror::Error;

use crate::engine::EngineError;

/// Result type for pivot generation and execution.
pub type PivotResult<T> = Result<T, PivotError>;

/// Errors surfaced by the pivot entry points.
///
/// Validation errors are raised before any statement text is generated and
/// before any host call is made. Host failures are surfaced verbatim; since
/// generation is deterministic, a host failure indicates a request error or a
/// host-side data problem, and retrying would not help.
#[derive(Error, Debug)]
pub enum PivotError {
    /// The request named no source tables.
    #[error("pivot request requires at least one source table")]
    MissingSources,

    /// The request had nothing to compute: no rows, no values, no columns.
    #[error("pivot request requires at least one of rows, values, or columns")]
    EmptyRequest,

    /// The host engine failed to execute a generated statement.
    #[error("host engine error: {0}")]
    Engine(#[from] EngineError),
}
