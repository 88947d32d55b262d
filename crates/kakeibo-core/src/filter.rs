//! Filter, sort, and pagination over the in-memory record set
//!
//! Everything here borrows the records and returns new vectors; the input is
//! never reordered or mutated.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

use crate::models::{FilterState, Page, SortColumn, SortDirection, SortState, Transaction};

/// Narrow the records to those matching the filter
///
/// Year is always applied. Month, category and institution are skipped when
/// set to `All`, and an empty search query matches everything.
pub fn apply_filters(records: &[Transaction], filter: &FilterState) -> Vec<Transaction> {
    let query = filter.search_query.to_lowercase();

    let filtered: Vec<Transaction> = records
        .iter()
        .filter(|t| t.date.year() == filter.year)
        .filter(|t| filter.month.as_option().map_or(true, |m| t.date.month() == *m))
        .filter(|t| filter.category.as_option().map_or(true, |c| &t.category == c))
        .filter(|t| {
            filter
                .institution
                .as_option()
                .map_or(true, |i| &t.institution == i)
        })
        .filter(|t| query.is_empty() || t.description.to_lowercase().contains(&query))
        .cloned()
        .collect();

    tracing::debug!(
        total = records.len(),
        matched = filtered.len(),
        year = filter.year,
        month = %filter.month,
        "Applied filters"
    );

    filtered
}

/// Stable sort by the chosen column
pub fn apply_sort(records: &[Transaction], sort: SortState) -> Vec<Transaction> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_by(a, b, sort.column);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare_by(a: &Transaction, b: &Transaction, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Date => a.date.cmp(&b.date),
        SortColumn::Amount => a.amount.cmp(&b.amount),
        SortColumn::Category => a.category.cmp(&b.category),
    }
}

/// Zero-based page slice
///
/// `total_pages` is at least 1 so an empty list still renders one page.
/// A page size of 0 is treated as 1.
pub fn apply_pagination<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);

    let start = page.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        total_pages,
    }
}

pub fn filter_by_year(records: &[Transaction], year: i32) -> Vec<Transaction> {
    records
        .iter()
        .filter(|t| t.date.year() == year)
        .cloned()
        .collect()
}

pub fn filter_by_month(records: &[Transaction], year: i32, month: u32) -> Vec<Transaction> {
    records
        .iter()
        .filter(|t| t.date.year() == year && t.date.month() == month)
        .cloned()
        .collect()
}

/// Inclusive on both ends
pub fn filter_by_date_range(
    records: &[Transaction],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Transaction> {
    records
        .iter()
        .filter(|t| t.date >= start && t.date <= end)
        .cloned()
        .collect()
}

/// Signed amount bounds, inclusive; `None` leaves that side open
pub fn filter_by_amount_range(
    records: &[Transaction],
    min: Option<i64>,
    max: Option<i64>,
) -> Vec<Transaction> {
    records
        .iter()
        .filter(|t| min.map_or(true, |min| t.amount >= min))
        .filter(|t| max.map_or(true, |max| t.amount <= max))
        .cloned()
        .collect()
}

pub fn filter_by_subcategory(records: &[Transaction], subcategory: &str) -> Vec<Transaction> {
    records
        .iter()
        .filter(|t| t.subcategory == subcategory)
        .cloned()
        .collect()
}

pub fn expenses(records: &[Transaction]) -> Vec<Transaction> {
    records.iter().filter(|t| t.is_expense()).cloned().collect()
}

pub fn incomes(records: &[Transaction]) -> Vec<Transaction> {
    records.iter().filter(|t| t.is_income()).cloned().collect()
}

/// The month before `(year, month)`, wrapping January to December
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// A selected month and the month before it, both cut from the full record set
#[derive(Debug, Clone)]
pub struct PeriodComparison {
    pub year: i32,
    pub month: u32,
    pub current: Vec<Transaction>,
    pub previous: Vec<Transaction>,
}

impl PeriodComparison {
    pub fn for_month(records: &[Transaction], year: i32, month: u32) -> Self {
        let (prev_year, prev_month) = previous_month(year, month);
        Self {
            year,
            month,
            current: filter_by_month(records, year, month),
            previous: filter_by_month(records, prev_year, prev_month),
        }
    }

    /// Build the comparison for a filter; `None` when the filter spans every month
    pub fn for_filter(records: &[Transaction], filter: &FilterState) -> Option<Self> {
        filter
            .month
            .as_option()
            .map(|month| Self::for_month(records, filter.year, *month))
    }

    pub fn has_previous_data(&self) -> bool {
        !self.previous.is_empty()
    }
}
