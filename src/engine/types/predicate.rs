use chrono::NaiveDate;
use std::fmt;

use crate::shared::category::{ALL_CATEGORIES, canonicalize, is_all_categories};

/// Category constraint of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    All,
    /// Canonical category label.
    Only(String),
}

impl CategoryFilter {
    /// Builds a filter from a caller's selection.
    ///
    /// The label is canonicalized; `All Categories` in any casing means no
    /// filter, so that label is reserved here. Use [`CategoryFilter::exact`]
    /// to select a data category that happens to carry it.
    pub fn from_selection(selection: &str) -> Self {
        if is_all_categories(selection) {
            CategoryFilter::All
        } else {
            CategoryFilter::exact(selection)
        }
    }

    /// Filters on `label` after canonicalization, never widening to all categories.
    pub fn exact(label: &str) -> Self {
        CategoryFilter::Only(canonicalize(label))
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(label) => Some(label),
        }
    }
}

impl From<Option<&str>> for CategoryFilter {
    fn from(selection: Option<&str>) -> Self {
        selection.map_or(CategoryFilter::All, CategoryFilter::from_selection)
    }
}

impl From<&str> for CategoryFilter {
    fn from(selection: &str) -> Self {
        CategoryFilter::from_selection(selection)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Only(label) => f.write_str(label),
        }
    }
}

/// Inclusive date range plus category constraint, built per call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryPredicate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category: CategoryFilter,
}

impl QueryPredicate {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, category: CategoryFilter) -> Self {
        Self {
            start_date,
            end_date,
            category,
        }
    }

    pub fn all_categories(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(start_date, end_date, CategoryFilter::All)
    }

    pub fn with_category(mut self, selection: &str) -> Self {
        self.category = CategoryFilter::from_selection(selection);
        self
    }

    /// `start_date > end_date`; such a predicate selects nothing.
    pub fn is_reversed(&self) -> bool {
        self.start_date > self.end_date
    }
}

impl fmt::Display for QueryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} ..= {}] category={}",
            self.start_date, self.end_date, self.category
        )
    }
}
