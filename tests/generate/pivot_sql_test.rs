//! Explain-mode tests: the generated statement text over the public API.

use std::cell::RefCell;

use crosstab::{explain, Engine, EngineError, PivotRequest, QueryResult, ValuesAxis};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Scripted host: hands out canned results in order and records every
/// statement it was asked to run.
#[derive(Default)]
struct StubEngine {
    responses: RefCell<Vec<QueryResult>>,
    statements: RefCell<Vec<String>>,
}

impl StubEngine {
    /// A host whose key enumeration query returns the given keys.
    fn with_keys(keys: &[&str]) -> Self {
        let result = QueryResult {
            columns: vec!["pivot_key".into()],
            rows: keys.iter().map(|key| vec![json!(key)]).collect(),
        };
        Self {
            responses: RefCell::new(vec![result]),
            statements: RefCell::new(Vec::new()),
        }
    }

    fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }
}

impl Engine for StubEngine {
    fn query(&self, sql: &str) -> Result<QueryResult, EngineError> {
        self.statements.borrow_mut().push(sql.to_string());
        let mut responses = self.responses.borrow_mut();
        if responses.is_empty() {
            Ok(QueryResult::default())
        } else {
            Ok(responses.remove(0))
        }
    }
}

/// Host that must never be reached; the aggregate path generates without it.
struct UnreachableEngine;

impl Engine for UnreachableEngine {
    fn query(&self, sql: &str) -> Result<QueryResult, EngineError> {
        panic!("no host call expected, got: {sql}");
    }
}

#[test]
fn scenario_a_rollup_over_one_dimension() {
    let request = PivotRequest::table("sales")
        .rows(["region"])
        .values(["sum(sales)"])
        .with_subtotals(true)
        .with_grand_totals(true);
    let sql = explain(&UnreachableEngine, &request).unwrap();
    insta::assert_snapshot!(sql, @r#"
WITH base AS (SELECT * FROM sales),
grouped AS (SELECT 0 AS "__dummy_group__", GROUPING("region") AS "__grouping_region__", "region", sum(sales) AS "sum(sales)" FROM base GROUP BY ROLLUP ("region")),
ordered AS (SELECT * FROM grouped ORDER BY "__grouping_region__", "region" NULLS FIRST)
SELECT * EXCLUDE ("__dummy_group__", "__grouping_region__") REPLACE (CASE WHEN "__grouping_region__" = 1 THEN 'Grand Total' WHEN "__grouping_region__" = 1 THEN 'Subtotal' ELSE "region"::VARCHAR END AS "region") FROM ordered
"#);
}

#[test]
fn scenario_b_pivot_without_row_dimensions() {
    let engine = StubEngine::with_keys(&["Q1", "Q2"]);
    let request = PivotRequest::table("sales")
        .columns(["quarter"])
        .values(["sum(sales)"]);
    let sql = explain(&engine, &request).unwrap();
    insta::assert_snapshot!(sql, @r#"
WITH base AS (SELECT * FROM sales),
filtered AS (SELECT *, 0 AS "__dummy_group__" FROM base),
pivoted AS (SELECT * FROM (PIVOT filtered ON coalesce("quarter"::VARCHAR, 'NULL') IN ('Q1', 'Q2') USING sum(sales) GROUP BY "__dummy_group__")),
ordered AS (SELECT * FROM pivoted ORDER BY ALL NULLS FIRST)
SELECT * EXCLUDE ("__dummy_group__") FROM ordered
"#);

    // The preparatory enumeration query ran first.
    let statements = engine.statements();
    assert_eq!(statements.len(), 1);
    assert!(statements[0].contains("SELECT DISTINCT"));
    assert!(statements[0].contains("ORDER BY \"pivot_key\""));
}

#[test]
fn scenario_c_statement_separators_never_survive() {
    let request = PivotRequest::table("sales; DROP TABLE sales")
        .rows(["region"])
        .values(["sum(sales); SELECT 1"])
        .filters(["region = 'East'; --"]);
    let sql = explain(&UnreachableEngine, &request).unwrap();
    assert!(!sql.contains(';'), "scrubbed statement:\n{sql}");
    assert!(sql.contains("SEMICOLON_REMOVED"));
}

#[test]
fn enumeration_query_is_scrubbed_too() {
    let engine = StubEngine::with_keys(&[]);
    let request = PivotRequest::table("sales; DROP TABLE sales")
        .columns(["quarter"])
        .filters(["x > 0; --"]);
    explain(&engine, &request).unwrap();
    let statements = engine.statements();
    assert_eq!(statements.len(), 1);
    assert!(!statements[0].contains(';'));
}

#[test]
fn explain_is_deterministic() {
    let request = PivotRequest::tables(["sales_2023", "sales_2024"])
        .rows(["region", "product"])
        .columns(["quarter"])
        .values(["sum(amount)"])
        .with_subtotals(true)
        .with_grand_totals(true);
    let first = explain(&StubEngine::with_keys(&["Q1", "Q2"]), &request).unwrap();
    let second = explain(&StubEngine::with_keys(&["Q1", "Q2"]), &request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn every_path_excludes_the_dummy_column_from_final_output() {
    let aggregate = PivotRequest::table("t").rows(["r"]).values(["sum(x)"]);
    let pivot_columns = PivotRequest::table("t").columns(["c"]).values(["sum(x)"]);
    let pivot_rows = PivotRequest::table("t")
        .columns(["c"])
        .values(["sum(x)", "count(*)"])
        .with_values_axis(ValuesAxis::Rows);

    for (request, engine) in [
        (aggregate, StubEngine::default()),
        (pivot_columns, StubEngine::with_keys(&["k"])),
        (pivot_rows, StubEngine::with_keys(&["k"])),
    ] {
        let sql = explain(&engine, &request).unwrap();
        let final_projection = sql.rsplit('\n').next().unwrap();
        assert!(
            final_projection.contains("EXCLUDE (\"__dummy_group__\""),
            "missing exclusion in: {final_projection}"
        );
    }
}

#[test]
fn metrics_as_rows_unions_one_pivot_per_metric() {
    let engine = StubEngine::with_keys(&["Q1"]);
    let request = PivotRequest::table("sales")
        .rows(["region"])
        .columns(["quarter"])
        .values(["sum(amount)", "count(*)"])
        .with_values_axis(ValuesAxis::Rows);
    let sql = explain(&engine, &request).unwrap();
    assert!(sql.contains("pivot_0"));
    assert!(sql.contains("pivot_1"));
    assert!(sql.contains("'sum(amount)' AS \"value_names\""));
    assert!(sql.contains("'count(*)' AS \"value_names\""));
    assert!(sql.contains("SELECT * FROM pivot_0 UNION ALL BY NAME SELECT * FROM pivot_1"));
}

#[test]
fn totals_copies_override_trailing_dimensions_innermost_first() {
    let engine = StubEngine::with_keys(&["k"]);
    let request = PivotRequest::table("t")
        .rows(["outer", "middle", "inner"])
        .columns(["c"])
        .values(["sum(x)"])
        .with_subtotals(true)
        .with_grand_totals(true);
    let sql = explain(&engine, &request).unwrap();
    let first_subtotal = sql.find("REPLACE ('__SUBTOTAL__' AS \"inner\")").unwrap();
    let second_subtotal = sql
        .find("REPLACE ('__SUBTOTAL__' AS \"middle\", '__SUBTOTAL__' AS \"inner\")")
        .unwrap();
    let grand = sql
        .find("REPLACE ('__GRANDTOTAL__' AS \"outer\", '__GRANDTOTAL__' AS \"middle\", '__GRANDTOTAL__' AS \"inner\")")
        .unwrap();
    assert!(first_subtotal < second_subtotal && second_subtotal < grand);
}

#[test]
fn empty_key_space_leaves_enumeration_to_the_host() {
    let engine = StubEngine::with_keys(&[]);
    let request = PivotRequest::table("t").columns(["c"]).values(["sum(x)"]);
    let sql = explain(&engine, &request).unwrap();
    assert!(!sql.contains(" IN ("));
    assert!(sql.contains("PIVOT filtered ON"));
}
