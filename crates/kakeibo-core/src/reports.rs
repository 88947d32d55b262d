//! Spending reports and analytics
//!
//! Pure reducers over a record subset. Callers decide which subset (filtered
//! view, single month, full ledger); nothing here looks at filter state.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Datelike;

use crate::catalog;
use crate::models::{
    BudgetStatus, CategoryMonthlyPoint, CategoryMonthlyResult, CategorySummary,
    DailySpending, DailySpendingResult, InstitutionSummary, MonthlySummary, PeakDay, RankingItem,
    Transaction,
};

/// Sum of signed amounts
pub fn total(records: &[Transaction]) -> i64 {
    records.iter().map(|t| t.amount).sum()
}

/// Sum of positive amounts
pub fn income(records: &[Transaction]) -> i64 {
    records.iter().filter(|t| t.is_income()).map(|t| t.amount).sum()
}

/// Absolute sum of negative amounts (never negative)
pub fn expense(records: &[Transaction]) -> i64 {
    records
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount)
        .sum::<i64>()
        .abs()
}

/// Records that count toward ledger totals (calculated, not transfers)
///
/// The reducers in this module take whatever subset they are given; hosts
/// narrow to this one before computing totals and summaries.
pub fn eligible(records: &[Transaction]) -> Vec<Transaction> {
    records
        .iter()
        .filter(|t| t.counts_toward_totals())
        .cloned()
        .collect()
}

fn ratio(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64
    } else {
        0.0
    }
}

/// Sum absolute expense amounts per key, keeping keys in first-seen order
fn expense_by<'a, F>(records: &'a [Transaction], key: F) -> Vec<(String, i64)>
where
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, i64)> = Vec::new();

    for t in records.iter().filter(|t| t.is_expense()) {
        let k = key(t);
        match index.get(k) {
            Some(&i) => groups[i].1 += t.abs_amount(),
            None => {
                index.insert(k, groups.len());
                groups.push((k.to_string(), t.abs_amount()));
            }
        }
    }

    groups
}

/// Income, expense and balance per calendar month, ascending by month
///
/// Months with no records are omitted.
pub fn monthly_summary(records: &[Transaction]) -> Vec<MonthlySummary> {
    let mut by_month: BTreeMap<u32, Vec<Transaction>> = BTreeMap::new();
    for t in records {
        by_month.entry(t.date.month()).or_default().push(t.clone());
    }

    by_month
        .into_iter()
        .map(|(month, txs)| MonthlySummary {
            month,
            income: income(&txs),
            expense: expense(&txs),
            balance: total(&txs),
        })
        .collect()
}

/// Expense per category, largest first
pub fn category_summary(records: &[Transaction]) -> Vec<CategorySummary> {
    let total_expense = expense(records);

    let mut summary: Vec<CategorySummary> = expense_by(records, |t| t.category.as_str())
        .into_iter()
        .map(|(category, amount)| CategorySummary {
            color: catalog::category_color(&category).to_string(),
            percentage: ratio(amount, total_expense),
            category,
            amount,
        })
        .collect();

    summary.sort_by(|a, b| b.amount.cmp(&a.amount));
    summary
}

/// Expense per institution, largest first
pub fn institution_summary(records: &[Transaction]) -> Vec<InstitutionSummary> {
    let total_expense = expense(records);

    let mut summary: Vec<InstitutionSummary> = expense_by(records, |t| t.institution.as_str())
        .into_iter()
        .map(|(institution, amount)| InstitutionSummary {
            percentage: ratio(amount, total_expense),
            institution,
            amount,
        })
        .collect();

    summary.sort_by(|a, b| b.amount.cmp(&a.amount));
    summary
}

/// Top `limit` subcategories by expense
///
/// Records with an empty subcategory are grouped under their category. Ranks
/// are assigned after truncation, starting at 1.
pub fn subcategory_ranking(records: &[Transaction], limit: usize) -> Vec<RankingItem> {
    let total_expense = expense(records);

    let keyed: Vec<(&str, &Transaction)> = records
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| {
            let k = if t.subcategory.is_empty() {
                t.category.as_str()
            } else {
                t.subcategory.as_str()
            };
            (k, t)
        })
        .collect();

    let mut parent: HashMap<&str, &str> = HashMap::new();
    for &(k, t) in &keyed {
        parent.entry(k).or_insert(t.category.as_str());
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, i64)> = Vec::new();
    for &(k, t) in &keyed {
        match index.get(k) {
            Some(&i) => groups[i].1 += t.abs_amount(),
            None => {
                index.insert(k, groups.len());
                groups.push((k, t.abs_amount()));
            }
        }
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (subcategory, amount))| RankingItem {
            rank: i + 1,
            subcategory: subcategory.to_string(),
            category: parent.get(subcategory).copied().unwrap_or_default().to_string(),
            amount,
            percentage: ratio(amount, total_expense),
        })
        .collect()
}

/// Day-by-day spending broken down by category
///
/// Only calculation-eligible expenses count. Days without spending are absent.
pub fn daily_spending(records: &[Transaction]) -> DailySpendingResult {
    let mut by_day: BTreeMap<chrono::NaiveDate, BTreeMap<String, i64>> = BTreeMap::new();
    let mut categories: BTreeSet<String> = BTreeSet::new();

    for t in records
        .iter()
        .filter(|t| t.is_expense() && t.counts_toward_totals())
    {
        categories.insert(t.category.clone());
        *by_day
            .entry(t.date)
            .or_default()
            .entry(t.category.clone())
            .or_insert(0) += t.abs_amount();
    }

    if by_day.is_empty() {
        return DailySpendingResult::default();
    }

    let days: Vec<DailySpending> = by_day
        .into_iter()
        .map(|(date, category_amounts)| DailySpending {
            date,
            weekday: date.weekday(),
            total: category_amounts.values().sum(),
            category_amounts,
        })
        .collect();

    let total_spending: i64 = days.iter().map(|d| d.total).sum();
    let average_daily = total_spending as f64 / days.len() as f64;

    let mut peak_day: Option<PeakDay> = None;
    for d in &days {
        if peak_day.map_or(true, |p| d.total > p.amount) {
            peak_day = Some(PeakDay {
                date: d.date,
                amount: d.total,
            });
        }
    }

    tracing::debug!(
        days = days.len(),
        categories = categories.len(),
        total_spending,
        "Computed daily spending"
    );

    DailySpendingResult {
        days,
        categories: categories.into_iter().collect(),
        total_spending,
        average_daily,
        peak_day,
    }
}

/// Expense matrix of month × category, for stacked views
///
/// Categories are ordered by their total over all months, largest first.
pub fn category_monthly(records: &[Transaction]) -> CategoryMonthlyResult {
    let mut values: BTreeMap<u32, BTreeMap<String, i64>> = BTreeMap::new();
    let mut total_expense = 0;

    for t in records.iter().filter(|t| t.is_expense()) {
        *values
            .entry(t.date.month())
            .or_default()
            .entry(t.category.clone())
            .or_insert(0) += t.abs_amount();
        total_expense += t.abs_amount();
    }

    let mut categories = expense_by(records, |t| t.category.as_str());
    categories.sort_by(|a, b| b.1.cmp(&a.1));

    let points = values
        .into_iter()
        .map(|(month, category_amounts)| CategoryMonthlyPoint {
            month,
            total: category_amounts.values().sum(),
            category_amounts,
        })
        .collect();

    CategoryMonthlyResult {
        points,
        categories: categories.into_iter().map(|(c, _)| c).collect(),
        total_expense,
    }
}

/// Expenses larger than `threshold`, biggest first
pub fn high_expenses(records: &[Transaction], threshold: i64, limit: usize) -> Vec<Transaction> {
    let mut found: Vec<Transaction> = records
        .iter()
        .filter(|t| t.amount < -threshold)
        .cloned()
        .collect();
    found.sort_by_key(|t| t.amount);
    found.truncate(limit);
    found
}

/// Largest expenses within one category
pub fn top_expenses_by_category(
    records: &[Transaction],
    category: &str,
    limit: usize,
) -> Vec<Transaction> {
    let mut found: Vec<Transaction> = records
        .iter()
        .filter(|t| t.category == category && t.is_expense())
        .cloned()
        .collect();
    found.sort_by_key(|t| t.amount);
    found.truncate(limit);
    found
}

/// Compare spending against a budget target
pub fn budget_status(spent: i64, budget: i64) -> BudgetStatus {
    BudgetStatus {
        budget,
        spent,
        remaining: budget - spent,
        ratio: ratio(spent, budget),
        over_budget: spent > budget,
    }
}
