//! Pivoted path, metrics as columns: one output column per metric and
//! enumerated key.
//!
//! Totals rows come from sentinel duplication in the pivot source (see
//! [`super::pivot_source`]): each totals level contributes a copy of the
//! filtered rows with its trailing row dimensions overridden by a marker, so
//! the pivot's own grouping buckets them without any rollup support. Markers
//! are swapped for display labels only after ordering, so they decide where
//! the totals rows land.

use crate::request::PivotRequest;
use crate::sentinel::DUMMY_COLUMN;
use crate::sql::{double_quote, plain_list};
use crate::totals::totals_levels;

use super::keyspace::key_expr;
use super::{pivot_source, pivot_stage, sentinel_case};

pub(crate) fn build(request: &PivotRequest, keys: &[String]) -> String {
    let levels = totals_levels(&request.rows, request.subtotals, request.grand_totals);
    let metrics = plain_list(&request.values);

    let stmt = pivot_source(request);
    let source = stmt.head().to_string();

    // A single metric stays bare so the pivot names its output columns by key
    // alone; several metrics are aliased by their text so the host appends a
    // distinguishable suffix per metric.
    let using = match metrics.len() {
        0 => None,
        1 => Some(metrics[0].clone()),
        _ => Some(
            metrics
                .iter()
                .map(|metric| format!("{} AS {}", metric, double_quote(metric)))
                .collect::<Vec<_>>()
                .join(", "),
        ),
    };

    let mut group_columns: Vec<String> =
        request.rows.iter().map(|row| double_quote(row)).collect();
    group_columns.push(double_quote(DUMMY_COLUMN));

    let stmt = stmt
        .stage(
            "pivoted",
            pivot_stage(
                &source,
                &key_expr(&request.columns),
                keys,
                using,
                &group_columns,
            ),
        )
        .stage("ordered", "SELECT * FROM pivoted ORDER BY ALL NULLS FIRST");

    let replace = if levels.is_empty() {
        String::new()
    } else {
        let cases: Vec<String> = request
            .rows
            .iter()
            .map(|row| sentinel_case(row))
            .collect();
        format!(" REPLACE ({})", cases.join(", "))
    };
    stmt.render(format!(
        "SELECT * EXCLUDE ({}){} FROM ordered",
        double_quote(DUMMY_COLUMN),
        replace
    ))
}
