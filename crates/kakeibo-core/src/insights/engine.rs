//! Insight Engine - orchestrates insight generation and ranking

use std::collections::HashMap;

use crate::catalog::INCOME_CATEGORY;
use crate::filter::PeriodComparison;
use crate::models::Transaction;
use crate::reports;

use super::types::{CategoryExpense, Insight};
use super::{CategoryChangeInsight, TopCategoryInsight};

/// Thresholds for insight generation
#[derive(Debug, Clone, PartialEq)]
pub struct InsightConfig {
    /// Relative change that counts as significant (0.10 = 10%)
    pub min_change_rate: f64,
    /// Absolute change in yen that counts as significant
    pub min_difference: i64,
    /// Share of monthly expense a category needs to be called out as the top one
    pub top_category_share: f64,
    /// Multiplier turning a rate or share into priority points
    pub priority_rate_weight: f64,
    /// Number of insights returned when the caller does not ask for a limit
    pub default_limit: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            min_change_rate: 0.10,
            min_difference: 5000,
            top_category_share: 0.25,
            priority_rate_weight: 10000.0,
            default_limit: 5,
        }
    }
}

/// Context provided to insight analyzers
///
/// Per-category amounts are computed once here and shared by every analyzer.
pub struct AnalysisContext<'a> {
    /// Records of the month being analyzed
    pub current: &'a [Transaction],
    /// Records of the month before it
    pub previous: &'a [Transaction],
    pub config: &'a InsightConfig,
    categories: Vec<CategoryExpense>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        current: &'a [Transaction],
        previous: &'a [Transaction],
        config: &'a InsightConfig,
    ) -> Self {
        Self {
            current,
            previous,
            config,
            categories: category_expenses(current, previous),
        }
    }

    /// Total expense of the current month
    pub fn total_current_expense(&self) -> i64 {
        reports::expense(self.current)
    }

    /// Per-category expense for both months
    ///
    /// Income-category records are left out. Categories keep the order they
    /// are first seen, current month first.
    pub fn category_expenses(&self) -> &[CategoryExpense] {
        &self.categories
    }
}

fn category_expenses(current: &[Transaction], previous: &[Transaction]) -> Vec<CategoryExpense> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<CategoryExpense> = Vec::new();

    for (t, is_current) in spending(current)
        .map(|t| (t, true))
        .chain(spending(previous).map(|t| (t, false)))
    {
        let i = *index.entry(t.category.as_str()).or_insert_with(|| {
            out.push(CategoryExpense {
                category: t.category.clone(),
                current_amount: 0,
                previous_amount: 0,
            });
            out.len() - 1
        });
        if is_current {
            out[i].current_amount += t.abs_amount();
        } else {
            out[i].previous_amount += t.abs_amount();
        }
    }

    out
}

fn spending(records: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    records
        .iter()
        .filter(|t| t.is_expense() && t.category != INCOME_CATEGORY)
}

/// Trait for insight analyzers
pub trait InsightAnalyzer: Send + Sync {
    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Analyze both months and produce insights
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight>;
}

/// The main insight engine that orchestrates analysis
pub struct InsightEngine {
    analyzers: Vec<Box<dyn InsightAnalyzer>>,
    config: InsightConfig,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create a new insight engine with built-in analyzers
    pub fn new() -> Self {
        Self::with_config(InsightConfig::default())
    }

    /// Create an engine with custom thresholds
    pub fn with_config(config: InsightConfig) -> Self {
        let mut engine = Self {
            analyzers: vec![],
            config,
        };

        // Register built-in analyzers
        engine.register(Box::new(CategoryChangeInsight::new()));
        engine.register(Box::new(TopCategoryInsight::new()));

        engine
    }

    /// Register an insight analyzer
    pub fn register(&mut self, analyzer: Box<dyn InsightAnalyzer>) {
        self.analyzers.push(analyzer);
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Names of registered analyzers, in run order
    pub fn analyzer_names(&self) -> Vec<&'static str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    /// Run all analyzers and return the top `limit` insights
    ///
    /// Returns nothing when there is no previous month to compare against.
    /// Ties in priority keep analyzer order.
    pub fn analyze_all(
        &self,
        current: &[Transaction],
        previous: &[Transaction],
        limit: usize,
    ) -> Vec<Insight> {
        if previous.is_empty() {
            tracing::debug!("No previous-month records, skipping insights");
            return Vec::new();
        }

        let ctx = AnalysisContext::new(current, previous, &self.config);
        let mut all_insights = vec![];

        for analyzer in &self.analyzers {
            let insights = analyzer.analyze(&ctx);
            tracing::debug!(
                analyzer = analyzer.name(),
                count = insights.len(),
                "Insight analysis complete"
            );
            all_insights.extend(insights);
        }

        // Highest priority first
        all_insights.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        all_insights.truncate(limit);
        all_insights
    }

    /// Insights for a selected month against the month before it
    pub fn analyze_period(&self, comparison: &PeriodComparison, limit: usize) -> Vec<Insight> {
        self.analyze_all(&comparison.current, &comparison.previous, limit)
    }
}

/// Insights with default thresholds
pub fn calc_insights(
    current: &[Transaction],
    previous: &[Transaction],
    limit: usize,
) -> Vec<Insight> {
    InsightEngine::new().analyze_all(current, previous, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::InsightType;
    use crate::test_utils::TransactionBuilder;

    fn expense(id: &str, day: u32, month: u32, category: &str, amount: i64) -> Transaction {
        TransactionBuilder::new(id)
            .date(2025, month, day)
            .category(category)
            .amount(amount)
            .build()
    }

    #[test]
    fn test_engine_creation() {
        let engine = InsightEngine::new();
        assert_eq!(engine.analyzer_names(), vec!["Category Change", "Top Category"]);
        assert_eq!(engine.config().default_limit, 5);
    }

    #[test]
    fn test_no_previous_month() {
        let current = vec![expense("1", 5, 2, "食費", -50000)];
        assert!(calc_insights(&current, &[], 5).is_empty());
    }

    #[test]
    fn test_category_expenses_union_excludes_income() {
        let current = vec![
            expense("1", 1, 2, "食費", -3000),
            expense("2", 2, 2, "収入", -100),
            expense("3", 3, 2, "食費", -2000),
        ];
        let previous = vec![
            expense("4", 1, 1, "交通費", -1000),
            expense("5", 2, 1, "食費", -4000),
        ];
        let config = InsightConfig::default();
        let ctx = AnalysisContext::new(&current, &previous, &config);
        let expenses = ctx.category_expenses();

        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].category, "食費");
        assert_eq!(expenses[0].current_amount, 5000);
        assert_eq!(expenses[0].previous_amount, 4000);
        assert_eq!(expenses[1].category, "交通費");
        assert_eq!(expenses[1].current_amount, 0);
    }

    #[test]
    fn test_category_expenses_first_seen_order() {
        let current = vec![
            expense("1", 1, 2, "日用品", -500),
            expense("2", 2, 2, "食費", -1000),
            expense("3", 3, 2, "日用品", -700),
        ];
        let previous = vec![
            expense("4", 1, 1, "交通費", -300),
            expense("5", 2, 1, "日用品", -900),
            expense("6", 3, 1, "交通費", -200),
        ];
        let config = InsightConfig::default();
        let ctx = AnalysisContext::new(&current, &previous, &config);

        let summary: Vec<(&str, i64, i64)> = ctx
            .category_expenses()
            .iter()
            .map(|c| (c.category.as_str(), c.current_amount, c.previous_amount))
            .collect();
        assert_eq!(
            summary,
            vec![("日用品", 1200, 900), ("食費", 1000, 0), ("交通費", 0, 500)]
        );
    }

    #[test]
    fn test_sorted_by_priority_and_truncated() {
        let current = vec![
            expense("1", 5, 2, "食費", -30000),
            expense("2", 6, 2, "交通費", -12000),
            expense("3", 7, 2, "日用品", -2000),
        ];
        let previous = vec![
            expense("4", 5, 1, "食費", -20000),
            expense("5", 6, 1, "交通費", -20000),
            expense("6", 7, 1, "日用品", -1000),
        ];

        let all = calc_insights(&current, &previous, 10);
        assert!(all.windows(2).all(|w| w[0].priority >= w[1].priority));
        assert_eq!(all.len(), 4);

        let limited = calc_insights(&current, &previous, 2);
        assert_eq!(limited.len(), 2);
        assert_eq!(limited, all[..2].to_vec());
    }

    #[test]
    fn test_custom_thresholds() {
        let current = vec![expense("1", 5, 2, "食費", -10500)];
        let previous = vec![expense("2", 5, 1, "食費", -10000)];

        // +5% and +500 is not significant by default
        let default = calc_insights(&current, &previous, 5);
        assert!(default
            .iter()
            .all(|i| i.insight_type == InsightType::TopCategory));

        let engine = InsightEngine::with_config(InsightConfig {
            min_change_rate: 0.05,
            ..Default::default()
        });
        let tuned = engine.analyze_all(&current, &previous, 5);
        assert!(tuned
            .iter()
            .any(|i| i.insight_type == InsightType::CategoryIncrease));
    }
}
