use super::clause::FilterClause;
use super::error::FilterError;
use super::expr::build_mask;
use crate::data::model::Table;

/// Rows kept by a filter run, plus the error that emptied them if any.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub table: Table,
    pub error: Option<FilterError>,
}

impl FilterOutcome {
    pub fn row_count(&self) -> usize {
        self.table.len()
    }
}

/// Select the rows of `table` matching `clauses`.
/// An empty clause list keeps every row.
pub fn apply_filter(table: &Table, clauses: &[FilterClause]) -> FilterOutcome {
    if clauses.is_empty() {
        return FilterOutcome {
            table: table.clone(),
            error: None,
        };
    }

    let outcome = build_mask(table, clauses);
    let selected = table.select(&outcome.mask);
    log::info!(
        "Filter kept {} of {} rows ({} clauses)",
        selected.len(),
        table.len(),
        clauses.len()
    );

    FilterOutcome {
        table: selected,
        error: outcome.error,
    }
}
