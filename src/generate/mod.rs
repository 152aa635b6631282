//! Statement generation: path dispatch and the public entry points.
//!
//! Control flow: a validated [`PivotRequest`] is dispatched to one of three
//! generation paths - plain aggregation when no column dimensions are
//! requested, metrics-as-columns pivoting, or metrics-as-rows pivoting. The
//! pivoted paths first run the key enumeration query against the host, since
//! the pivot's target columns are fixed at statement-construction time.
//!
//! [`explain`] and [`execute`] share one generation function, so explain
//! output is always a faithful, executable rendition of what execute runs.

mod aggregate;
mod keyspace;
mod pivot_columns;
mod pivot_rows;

use crate::engine::{Engine, QueryResult};
use crate::error::PivotResult;
use crate::request::{PivotRequest, ValuesAxis};
use crate::sentinel::{Sentinel, DUMMY_COLUMN};
use crate::sql::fragment::Statement;
use crate::sql::{double_quote, join, plain, single_quote, single_quote_list};
use crate::totals::totals_levels;

/// Generation path for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Path {
    Aggregate,
    PivotColumns,
    PivotRows,
}

fn dispatch(request: &PivotRequest) -> Path {
    if request.columns.is_empty() {
        Path::Aggregate
    } else if request.values_axis == ValuesAxis::Columns || request.values.is_empty() {
        Path::PivotColumns
    } else {
        Path::PivotRows
    }
}

fn generate<E: Engine>(engine: &E, request: &PivotRequest) -> PivotResult<String> {
    request.validate()?;
    let sql = match dispatch(request) {
        Path::Aggregate => aggregate::build(request),
        Path::PivotColumns => {
            let keys = keyspace::enumerate(engine, request)?;
            pivot_columns::build(request, &keys)
        }
        Path::PivotRows => {
            let keys = keyspace::enumerate(engine, request)?;
            pivot_rows::build(request, &keys)
        }
    };
    log::debug!("generated pivot statement:\n{sql}");
    Ok(sql)
}

/// Generate the pivot statement and return its text without executing it.
///
/// The pivoted paths still run the key enumeration query against `engine`;
/// the returned statement embeds the enumerated keys and is exactly what
/// [`execute`] would run.
pub fn explain<E: Engine>(engine: &E, request: &PivotRequest) -> PivotResult<String> {
    generate(engine, request)
}

/// Generate the pivot statement and hand it to the host for execution.
pub fn execute<E: Engine>(engine: &E, request: &PivotRequest) -> PivotResult<QueryResult> {
    let sql = generate(engine, request)?;
    Ok(engine.query(&sql)?)
}

// =============================================================================
// Stage builders shared across paths
// =============================================================================

/// Source tables unioned by name into one row set.
pub(crate) fn union_sources(request: &PivotRequest) -> String {
    let selects: Vec<String> = request
        .sources
        .iter()
        .map(|source| format!("SELECT * FROM {}", plain(source)))
        .collect();
    selects.join(" UNION ALL BY NAME ")
}

/// ` WHERE (f) AND (g)` from the request filters, or nothing.
pub(crate) fn where_clause(request: &PivotRequest) -> String {
    let predicates: Vec<String> = request
        .filters
        .iter()
        .map(|filter| format!("({})", plain(filter)))
        .collect();
    match join(&predicates, " AND ") {
        Some(predicate) => format!(" WHERE {predicate}"),
        None => String::new(),
    }
}

/// Build the pivot input stages: `base`, `filtered` (filters applied, dummy
/// grouping column attached) and, when totals are requested, `totaled` - the
/// filtered rows unioned by name with one sentinel-overridden copy per totals
/// level. The statement's head stage is the pivot source.
pub(crate) fn pivot_source(request: &PivotRequest) -> Statement {
    let levels = totals_levels(&request.rows, request.subtotals, request.grand_totals);
    let stmt = Statement::new()
        .stage("base", union_sources(request))
        .stage(
            "filtered",
            format!(
                "SELECT *, 0 AS {} FROM base{}",
                double_quote(DUMMY_COLUMN),
                where_clause(request)
            ),
        );
    if levels.is_empty() {
        return stmt;
    }
    let mut branches = vec!["SELECT * FROM filtered".to_string()];
    for level in &levels {
        let overrides: Vec<String> = level
            .columns
            .iter()
            .map(|column| {
                format!(
                    "{} AS {}",
                    single_quote(level.sentinel.marker()),
                    double_quote(column)
                )
            })
            .collect();
        branches.push(format!(
            "SELECT * REPLACE ({}) FROM filtered",
            overrides.join(", ")
        ));
    }
    stmt.stage("totaled", branches.join(" UNION ALL BY NAME "))
}

/// One pivot stage over `source`, spreading on the composite key.
///
/// The `IN` list pins the target columns to the enumerated key space; it is
/// omitted when no keys were observed (an empty `IN ()` is malformed, and the
/// host enumerates the same empty space on its own). `USING` is omitted when
/// no metrics were supplied, deferring to the host's default aggregate.
pub(crate) fn pivot_stage(
    source: &str,
    on: &str,
    keys: &[String],
    using: Option<String>,
    group_columns: &[String],
) -> String {
    let mut sql = format!("SELECT * FROM (PIVOT {source} ON {on}");
    if let Some(targets) = join(&single_quote_list(keys), ", ") {
        sql.push_str(&format!(" IN ({targets})"));
    }
    if let Some(using) = using {
        sql.push_str(&format!(" USING {using}"));
    }
    sql.push_str(&format!(" GROUP BY {})", group_columns.join(", ")));
    sql
}

/// Relabeling expression for one output column: sentinel markers become their
/// display labels, everything else passes through.
pub(crate) fn sentinel_case(column: &str) -> String {
    let ident = double_quote(column);
    format!(
        "CASE {ident} WHEN {} THEN {} WHEN {} THEN {} ELSE {ident} END AS {ident}",
        single_quote(Sentinel::Subtotal.marker()),
        single_quote(Sentinel::Subtotal.label()),
        single_quote(Sentinel::GrandTotal.marker()),
        single_quote(Sentinel::GrandTotal.label()),
    )
}
