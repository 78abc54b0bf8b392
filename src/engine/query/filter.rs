use chrono::NaiveDate;

use crate::engine::store::memory::{ColumnarTable, FilteredView};
use crate::engine::types::{CategoryFilter, QueryPredicate, SalesRecord};
use crate::shared::category::canonicalize;

/// A [`QueryPredicate`] normalized for execution.
///
/// A reversed date range binds to a filter that selects nothing, and the
/// category label is canonical so matching is plain equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    range: Option<(NaiveDate, NaiveDate)>,
    category: Option<String>,
}

impl QueryFilter {
    pub fn bind(predicate: &QueryPredicate) -> Self {
        let range = if predicate.is_reversed() {
            None
        } else {
            Some((predicate.start_date, predicate.end_date))
        };
        let category = match &predicate.category {
            CategoryFilter::All => None,
            CategoryFilter::Only(label) => Some(canonicalize(label)),
        };
        Self { range, category }
    }

    /// True when no row can match, whatever the data.
    pub fn selects_nothing(&self) -> bool {
        self.range.is_none()
    }

    /// Inclusive bounds, `None` for a reversed predicate.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.range
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn matches(&self, order_date: NaiveDate, category: &str) -> bool {
        let Some((start, end)) = self.range else {
            return false;
        };
        start <= order_date
            && order_date <= end
            && self.category.as_deref().is_none_or(|c| c == category)
    }

    pub fn matches_record(&self, record: &SalesRecord) -> bool {
        self.matches(record.order_date, &record.category)
    }

    /// Selects the matching rows of a columnar table.
    pub fn apply<'a>(&self, table: &'a ColumnarTable) -> FilteredView<'a> {
        let Some((start, end)) = self.range else {
            return FilteredView::empty(table);
        };
        // Resolve the label to its dictionary code once; unknown labels match nothing.
        let code = match self.category.as_deref() {
            None => None,
            Some(label) => match table.category_code(label) {
                Some(code) => Some(code),
                None => return FilteredView::empty(table),
            },
        };

        let dates = table.order_dates();
        let codes = table.category_codes();
        let rows = (0..table.len())
            .filter(|&row| {
                let date = dates[row];
                start <= date && date <= end && code.is_none_or(|c| codes[row] == c)
            })
            .collect();
        FilteredView::new(table, rows)
    }
}
