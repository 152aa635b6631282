//! Totals expression generation.
//!
//! A totals level names the trailing row dimensions that one duplicated copy
//! of the source rows overrides with a sentinel marker. Levels run from the
//! most granular subtotal (only the innermost dimension collapsed) up to the
//! fully collapsed grand total, matching how `ROLLUP` collapses its column
//! list from the right.

use crate::sentinel::Sentinel;

/// One rollup level: the trailing row dimensions overridden by `sentinel`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TotalsLevel {
    /// Overridden columns, in row-dimension order (a suffix of `rows`).
    pub columns: Vec<String>,
    pub sentinel: Sentinel,
}

impl TotalsLevel {
    /// Whether every row dimension is collapsed at this level.
    pub(crate) fn is_grand_total(&self) -> bool {
        self.sentinel == Sentinel::GrandTotal
    }
}

/// Compute the ordered totals levels for a request.
///
/// Level `i` overrides the last `i + 1` entries of `rows`. Disabling
/// subtotals skips every intermediate level; disabling grand totals skips the
/// fully collapsed one. Empty `rows` yields no levels: there is nothing to
/// collapse, the plain aggregate row is already the grand total.
pub(crate) fn totals_levels(
    rows: &[String],
    subtotals: bool,
    grand_totals: bool,
) -> Vec<TotalsLevel> {
    if rows.is_empty() {
        return Vec::new();
    }
    let lower = if subtotals { 0 } else { rows.len() - 1 };
    let upper = if grand_totals {
        rows.len()
    } else {
        rows.len() - 1
    };
    (lower..upper)
        .map(|i| {
            let sentinel = if i == rows.len() - 1 {
                Sentinel::GrandTotal
            } else {
                Sentinel::Subtotal
            };
            TotalsLevel {
                columns: rows[rows.len() - 1 - i..].to_vec(),
                sentinel,
            }
        })
        .collect()
}
