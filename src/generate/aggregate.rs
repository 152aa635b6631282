//! Plain aggregation path: group-by statement synthesis when no column
//! dimensions are requested.
//!
//! Totals ride on the host's native grouping machinery instead of sentinel
//! duplication: `ROLLUP` (or a two-level `GROUPING SETS` when only the grand
//! total is wanted) produces the collapsed rows, and per-column `GROUPING()`
//! indicators classify, order, and relabel them.

use crate::request::{PivotRequest, ValuesAxis};
use crate::sentinel::{Sentinel, DUMMY_COLUMN, VALUE_COLUMN, VALUE_NAME_COLUMN};
use crate::sql::fragment::Statement;
use crate::sql::{double_quote, plain, single_quote};
use crate::totals::totals_levels;

use super::{union_sources, where_clause};

/// Name of the projected `GROUPING()` indicator for a row dimension.
fn indicator_column(row: &str) -> String {
    format!("__grouping_{row}__")
}

/// Sum of the projected indicator columns.
fn indicator_sum(rows: &[String]) -> String {
    let terms: Vec<String> = rows
        .iter()
        .map(|row| double_quote(&indicator_column(row)))
        .collect();
    terms.join(" + ")
}

/// Sum of raw `GROUPING()` calls, for use where the indicator aliases are not
/// yet in scope (the `HAVING` clause of the grouping stage).
fn grouping_sum(rows: &[String]) -> String {
    let terms: Vec<String> = rows
        .iter()
        .map(|row| format!("GROUPING({})", double_quote(row)))
        .collect();
    terms.join(" + ")
}

pub(crate) fn build(request: &PivotRequest) -> String {
    let levels = totals_levels(&request.rows, request.subtotals, request.grand_totals);
    let totals_active = !levels.is_empty();
    let metrics: Vec<String> = request.values.iter().map(|value| plain(value)).collect();
    let as_rows = request.values_axis == ValuesAxis::Rows && !metrics.is_empty();

    // Grouping stage. The dummy column keeps grouping non-vacuous when no row
    // dimensions are requested; metrics are aliased by their own text so later
    // stages can reference them by name.
    let mut select = vec![format!("0 AS {}", double_quote(DUMMY_COLUMN))];
    if totals_active {
        for row in &request.rows {
            select.push(format!(
                "GROUPING({}) AS {}",
                double_quote(row),
                double_quote(&indicator_column(row))
            ));
        }
    }
    select.extend(request.rows.iter().map(|row| double_quote(row)));
    select.extend(
        metrics
            .iter()
            .map(|metric| format!("{} AS {}", metric, double_quote(metric))),
    );

    let row_idents: Vec<String> = request.rows.iter().map(|row| double_quote(row)).collect();
    let group_by = if !totals_active {
        "GROUP BY ALL".to_string()
    } else if request.subtotals {
        format!("GROUP BY ROLLUP ({})", row_idents.join(", "))
    } else {
        format!("GROUP BY GROUPING SETS (({}), ())", row_idents.join(", "))
    };

    // Subtotals without grand totals: drop the fully-collapsed row.
    let having = if totals_active && levels.iter().all(|level| !level.is_grand_total()) {
        format!(
            " HAVING {} != {}",
            grouping_sum(&request.rows),
            request.rows.len()
        )
    } else {
        String::new()
    };

    let mut stmt = Statement::new().stage("base", union_sources(request)).stage(
        "grouped",
        format!(
            "SELECT {} FROM base{} {}{}",
            select.join(", "),
            where_clause(request),
            group_by,
            having
        ),
    );

    // Metrics-as-rows: replace the per-metric columns with a metric-name /
    // metric-value pair, replicating each grouped row once per metric.
    if as_rows {
        let metric_idents: Vec<String> =
            metrics.iter().map(|metric| double_quote(metric)).collect();
        let metric_names: Vec<String> =
            metrics.iter().map(|metric| single_quote(metric)).collect();
        stmt = stmt.stage(
            "tagged",
            format!(
                "SELECT * EXCLUDE ({}), unnest([{}]) AS {}, unnest([{}]) AS {} FROM grouped",
                metric_idents.join(", "),
                metric_names.join(", "),
                double_quote(VALUE_NAME_COLUMN),
                metric_idents.join(", "),
                double_quote(VALUE_COLUMN)
            ),
        );
    }

    // Ordering runs before the final projection relabels anything. With
    // totals, each dimension orders by its indicator first so real rows land
    // above the totals that summarize them.
    let order_by = if totals_active {
        let mut keys: Vec<String> = request
            .rows
            .iter()
            .map(|row| {
                format!(
                    "{}, {} NULLS FIRST",
                    double_quote(&indicator_column(row)),
                    double_quote(row)
                )
            })
            .collect();
        if as_rows {
            keys.push(format!("{} NULLS FIRST", double_quote(VALUE_NAME_COLUMN)));
        }
        keys.join(", ")
    } else {
        "ALL NULLS FIRST".to_string()
    };
    let previous = stmt.head().to_string();
    stmt = stmt.stage(
        "ordered",
        format!("SELECT * FROM {previous} ORDER BY {order_by}"),
    );

    // Final projection: drop the dummy and indicator columns, relabel the row
    // dimensions on totals rows.
    let mut exclude = vec![double_quote(DUMMY_COLUMN)];
    if totals_active {
        exclude.extend(
            request
                .rows
                .iter()
                .map(|row| double_quote(&indicator_column(row))),
        );
    }
    let replace = if totals_active {
        let cases: Vec<String> = request
            .rows
            .iter()
            .map(|row| {
                format!(
                    "CASE WHEN {} = {} THEN {} WHEN {} = 1 THEN {} ELSE {}::VARCHAR END AS {}",
                    indicator_sum(&request.rows),
                    request.rows.len(),
                    single_quote(Sentinel::GrandTotal.label()),
                    double_quote(&indicator_column(row)),
                    single_quote(Sentinel::Subtotal.label()),
                    double_quote(row),
                    double_quote(row)
                )
            })
            .collect();
        format!(" REPLACE ({})", cases.join(", "))
    } else {
        String::new()
    };

    stmt.render(format!(
        "SELECT * EXCLUDE ({}){} FROM ordered",
        exclude.join(", "),
        replace
    ))
}
