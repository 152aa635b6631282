//! Column-key enumeration: the distinct composite keys a pivot spreads over.
//!
//! A pivot's target columns are fixed when the statement is constructed, not
//! when it runs, so the key space has to be discovered up front with an
//! independent preparatory query. Each column dimension is coalesced to a
//! placeholder when null, cast to text, and concatenated with a fixed
//! separator; the distinct values of that composite expression, in sorted
//! order, become the pivot targets.

use crate::engine::Engine;
use crate::error::PivotResult;
use crate::request::PivotRequest;
use crate::sentinel::{KEY_SEPARATOR, NULL_PLACEHOLDER};
use crate::sql::fragment::Statement;
use crate::sql::{double_quote, single_quote};

use super::{union_sources, where_clause};

/// Output column of the enumeration query.
const KEY_COLUMN: &str = "pivot_key";

/// The composite key expression over the column dimensions.
pub(crate) fn key_expr(columns: &[String]) -> String {
    let parts: Vec<String> = columns
        .iter()
        .map(|column| {
            format!(
                "coalesce({}::VARCHAR, {})",
                double_quote(column),
                single_quote(NULL_PLACEHOLDER)
            )
        })
        .collect();
    parts.join(&format!(" || {} || ", single_quote(KEY_SEPARATOR)))
}

/// The preparatory query enumerating the distinct composite keys, with the
/// request filters applied.
pub(crate) fn enumeration_sql(request: &PivotRequest) -> String {
    Statement::new()
        .stage("base", union_sources(request))
        .render(format!(
            "SELECT DISTINCT {} AS {} FROM base{} ORDER BY {}",
            key_expr(&request.columns),
            double_quote(KEY_COLUMN),
            where_clause(request),
            double_quote(KEY_COLUMN)
        ))
}

/// Run the enumeration query and collect the keys in order.
pub(crate) fn enumerate<E: Engine>(
    engine: &E,
    request: &PivotRequest,
) -> PivotResult<Vec<String>> {
    let sql = enumeration_sql(request);
    log::debug!("enumerating pivot keys:\n{sql}");
    let keys = engine.query(&sql)?.first_column_strings();
    log::debug!("enumerated {} pivot key(s)", keys.len());
    Ok(keys)
}
