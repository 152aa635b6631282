//! Pivoted path, metrics as rows: one pivot per metric, unioned by name.
//!
//! Each metric gets its own tagged copy of the pivot source with the metric's
//! text attached as the metric-name column, runs through the same pivot as
//! the metrics-as-columns path, and the per-metric results are unioned by
//! name. Cleanup strips sentinel markers from the row dimensions and the
//! metric-name column alike, after ordering.

use crate::request::PivotRequest;
use crate::sentinel::{DUMMY_COLUMN, VALUE_NAME_COLUMN};
use crate::sql::{double_quote, plain_list, single_quote};
use crate::totals::totals_levels;

use super::keyspace::key_expr;
use super::{pivot_source, pivot_stage, sentinel_case};

pub(crate) fn build(request: &PivotRequest, keys: &[String]) -> String {
    let levels = totals_levels(&request.rows, request.subtotals, request.grand_totals);
    let metrics = plain_list(&request.values);
    debug_assert!(!metrics.is_empty(), "dispatch requires metrics on this path");

    let mut stmt = pivot_source(request);
    let source = stmt.head().to_string();
    let on = key_expr(&request.columns);

    let mut group_columns: Vec<String> =
        request.rows.iter().map(|row| double_quote(row)).collect();
    group_columns.push(double_quote(VALUE_NAME_COLUMN));
    group_columns.push(double_quote(DUMMY_COLUMN));

    let mut branches = Vec::new();
    for (index, metric) in metrics.iter().enumerate() {
        let tagged = format!("tagged_{index}");
        stmt = stmt.stage(
            &tagged,
            format!(
                "SELECT *, {} AS {} FROM {}",
                single_quote(metric),
                double_quote(VALUE_NAME_COLUMN),
                source
            ),
        );
        let pivot = format!("pivot_{index}");
        stmt = stmt.stage(
            &pivot,
            pivot_stage(&tagged, &on, keys, Some(metric.clone()), &group_columns),
        );
        branches.push(format!("SELECT * FROM {pivot}"));
    }

    stmt = stmt
        .stage("unioned", branches.join(" UNION ALL BY NAME "))
        .stage("ordered", "SELECT * FROM unioned ORDER BY ALL NULLS FIRST");

    let replace = if levels.is_empty() {
        String::new()
    } else {
        let mut cases: Vec<String> = request
            .rows
            .iter()
            .map(|row| sentinel_case(row))
            .collect();
        cases.push(sentinel_case(VALUE_NAME_COLUMN));
        format!(" REPLACE ({})", cases.join(", "))
    };
    stmt.render(format!(
        "SELECT * EXCLUDE ({}){} FROM ordered",
        double_quote(DUMMY_COLUMN),
        replace
    ))
}
