//! # Crosstab
//!
//! Compiles declarative pivot-table requests into single-statement SQL for a
//! DuckDB-style host engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 PivotRequest (declarative)               │
//! │   sources, rows, columns, values, filters, totals        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [generate: dispatch]
//! ┌───────────────┬─────────────────────┬───────────────────┐
//! │  aggregate    │  pivot, metrics as  │ pivot, metrics as │
//! │  (no columns) │  columns            │ rows              │
//! └───────────────┴─────────────────────┴───────────────────┘
//!                          │                    │
//!                          │    key enumeration query (host)
//!                          ▼                    ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │          Generated statement (explain / execute)         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Generation is a pure, synchronous computation: a request maps
//! deterministically to statement text with no shared state across calls.
//! The only host round-trips are the key enumeration query (pivoted paths
//! need the target columns before the statement can be written) and the
//! execution of the final statement itself, both behind the [`Engine`]
//! trait.
//!
//! ## Example
//!
//! ```no_run
//! use crosstab::{execute, explain, Engine, PivotRequest};
//!
//! fn run(engine: &impl Engine) -> crosstab::PivotResult<()> {
//!     let request = PivotRequest::table("sales")
//!         .rows(["region"])
//!         .columns(["quarter"])
//!         .values(["sum(amount)"])
//!         .with_grand_totals(true);
//!
//!     let sql = explain(engine, &request)?;
//!     println!("{sql}");
//!
//!     let result = execute(engine, &request)?;
//!     println!("{} rows", result.rows.len());
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod generate;
pub mod request;
pub mod sql;

mod sentinel;
mod totals;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::engine::{Engine, EngineError, QueryResult};
    pub use crate::error::{PivotError, PivotResult};
    pub use crate::generate::{execute, explain};
    pub use crate::request::{PivotRequest, ValuesAxis};
}

// Also export at crate root for convenience
pub use engine::{Engine, EngineError, QueryResult};
pub use error::{PivotError, PivotResult};
pub use generate::{execute, explain};
pub use request::{PivotRequest, ValuesAxis};
