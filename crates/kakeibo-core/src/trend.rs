//! Month-over-month trend calculation
//!
//! A change rate is only reported when there is something meaningful to
//! compare against. Growth from zero has no finite rate and is reported as
//! `None`, the same as a missing previous period.

use crate::filter::PeriodComparison;
use crate::models::{Transaction, TrendData};
use crate::reports;

/// Relative change from `previous` to `current` (0.05 = +5%)
///
/// Returns `None` when there is no previous data, or when `previous` is zero
/// and `current` is not. Two zeros compare as no change.
pub fn month_over_month(current: i64, previous: i64, has_previous_data: bool) -> Option<f64> {
    if !has_previous_data {
        return None;
    }
    if previous == 0 {
        return if current == 0 { Some(0.0) } else { None };
    }
    Some((current - previous) as f64 / previous.abs() as f64)
}

/// Change rates for income, expense and balance (income - expense)
pub fn trend(
    current_income: i64,
    current_expense: i64,
    previous_income: i64,
    previous_expense: i64,
    has_previous_data: bool,
) -> TrendData {
    let current_balance = current_income - current_expense;
    let previous_balance = previous_income - previous_expense;

    TrendData {
        income: month_over_month(current_income, previous_income, has_previous_data),
        expense: month_over_month(current_expense, previous_expense, has_previous_data),
        balance: month_over_month(current_balance, previous_balance, has_previous_data),
    }
}

/// Trend of a selected month against the month before it
pub fn trend_for_period(comparison: &PeriodComparison) -> TrendData {
    trend(
        reports::income(&comparison.current),
        reports::expense(&comparison.current),
        reports::income(&comparison.previous),
        reports::expense(&comparison.previous),
        comparison.has_previous_data(),
    )
}

/// Trend for `(year, month)` cut from the full record set
pub fn trend_for_month(records: &[Transaction], year: i32, month: u32) -> TrendData {
    trend_for_period(&PeriodComparison::for_month(records, year, month))
}

/// Change from the first to the last value; 0 with fewer than two values
/// or a zero starting point
pub fn growth_rate(values: &[i64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if values.len() >= 2 && first != 0 => {
            (last - first) as f64 / first.abs() as f64
        }
        _ => 0.0,
    }
}

pub fn average(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<i64>() as f64 / values.len() as f64
}
