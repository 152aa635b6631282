//! Pivot request model.

use serde::{Deserialize, Serialize};

use crate::error::{PivotError, PivotResult};

/// Layout for multiple metrics: one output column per metric, or one output
/// row per metric (a metric-name column plus a metric-value column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuesAxis {
    #[default]
    Columns,
    Rows,
}

/// A declarative pivot-table request.
///
/// `values` entries are pre-formed aggregate expressions (`"sum(sales)"`),
/// `filters` are boolean predicates ANDed together, and `sources` are table
/// references unioned by name into one source row set. Requests are built per
/// call, never mutated afterwards, and carry no state across calls.
///
/// # Example
///
/// ```
/// use crosstab::PivotRequest;
///
/// let request = PivotRequest::table("sales")
///     .rows(["region"])
///     .values(["sum(amount)"])
///     .with_grand_totals(true);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct PivotRequest {
    /// Source tables, unioned by name. Must be non-empty.
    pub sources: Vec<String>,
    /// Aggregate expressions to compute per group.
    #[serde(default)]
    pub values: Vec<String>,
    /// Row-dimension column references.
    #[serde(default)]
    pub rows: Vec<String>,
    /// Column-dimension column references (pivot targets).
    #[serde(default)]
    pub columns: Vec<String>,
    /// Boolean predicates, ANDed.
    #[serde(default)]
    pub filters: Vec<String>,
    /// Metric layout when several metrics are present.
    #[serde(default)]
    pub values_axis: ValuesAxis,
    /// Emit intermediate subtotal rows.
    #[serde(default)]
    pub subtotals: bool,
    /// Emit the fully-collapsed grand-total row.
    #[serde(default)]
    pub grand_totals: bool,
}

impl PivotRequest {
    /// A request over a single source table.
    pub fn table(source: impl Into<String>) -> Self {
        Self {
            sources: vec![source.into()],
            ..Self::default()
        }
    }

    /// A request over several source tables, unioned by name.
    pub fn tables(sources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the aggregate expressions.
    pub fn values(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set the row dimensions.
    pub fn rows(mut self, rows: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.rows = rows.into_iter().map(Into::into).collect();
        self
    }

    /// Set the column dimensions.
    pub fn columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the filter predicates.
    pub fn filters(mut self, filters: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.filters = filters.into_iter().map(Into::into).collect();
        self
    }

    /// Set the metric layout.
    pub fn with_values_axis(mut self, axis: ValuesAxis) -> Self {
        self.values_axis = axis;
        self
    }

    /// Enable or disable subtotal rows.
    pub fn with_subtotals(mut self, subtotals: bool) -> Self {
        self.subtotals = subtotals;
        self
    }

    /// Enable or disable the grand-total row.
    pub fn with_grand_totals(mut self, grand_totals: bool) -> Self {
        self.grand_totals = grand_totals;
        self
    }

    /// Reject malformed requests before any text is generated.
    pub fn validate(&self) -> PivotResult<()> {
        if self.sources.is_empty() {
            return Err(PivotError::MissingSources);
        }
        if self.rows.is_empty() && self.values.is_empty() && self.columns.is_empty() {
            return Err(PivotError::EmptyRequest);
        }
        Ok(())
    }
}
