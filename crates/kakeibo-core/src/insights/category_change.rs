//! Category Change Insight
//!
//! Surfaces categories whose spending moved materially against the previous
//! month, either by rate or by absolute yen.

use super::engine::{AnalysisContext, InsightAnalyzer};
use super::types::{Insight, InsightType};

/// Insight that reports category increases and decreases
pub struct CategoryChangeInsight;

impl CategoryChangeInsight {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CategoryChangeInsight {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightAnalyzer for CategoryChangeInsight {
    fn name(&self) -> &'static str {
        "Category Change"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let config = ctx.config;
        let total = ctx.total_current_expense();
        let mut insights = Vec::new();

        for expense in ctx.category_expenses() {
            let difference = expense.difference();
            let change_rate = expense.change_rate();

            let significant = change_rate.abs() >= config.min_change_rate
                || difference.abs() >= config.min_difference;
            // A category that vanished this month is not worth mentioning
            if !significant || expense.current_amount <= 0 {
                continue;
            }

            let insight_type = match difference.signum() {
                1 => InsightType::CategoryIncrease,
                -1 => InsightType::CategoryDecrease,
                _ => continue,
            };

            let percentage = if total > 0 {
                expense.current_amount as f64 / total as f64
            } else {
                0.0
            };

            insights.push(Insight {
                insight_type,
                category: Some(expense.category.clone()),
                amount: expense.current_amount,
                difference: Some(difference),
                change_rate: Some(change_rate),
                percentage: Some(percentage),
                priority: difference.abs() as f64
                    + change_rate.abs() * config.priority_rate_weight,
            });
        }

        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::InsightConfig;
    use crate::models::Transaction;
    use crate::test_utils::TransactionBuilder;

    fn expense(id: &str, month: u32, category: &str, amount: i64) -> Transaction {
        TransactionBuilder::new(id)
            .date(2025, month, 10)
            .category(category)
            .amount(amount)
            .build()
    }

    fn analyze(current: &[Transaction], previous: &[Transaction]) -> Vec<Insight> {
        let config = InsightConfig::default();
        CategoryChangeInsight::new().analyze(&AnalysisContext::new(current, previous, &config))
    }

    #[test]
    fn test_increase_priority() {
        let insights = analyze(
            &[expense("1", 2, "食費", -33000)],
            &[expense("2", 1, "食費", -30000)],
        );
        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert_eq!(insight.insight_type, InsightType::CategoryIncrease);
        assert_eq!(insight.difference, Some(3000));
        assert!((insight.priority - 4000.0).abs() < 1e-6);
        assert_eq!(insight.percentage, Some(1.0));
    }

    #[test]
    fn test_decrease_by_absolute_yen() {
        // -6000 on 100000 is only 6% but clears the yen threshold
        let insights = analyze(
            &[expense("1", 2, "住居", -94000)],
            &[expense("2", 1, "住居", -100000)],
        );
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].insight_type, InsightType::CategoryDecrease);
        assert_eq!(insights[0].difference, Some(-6000));
    }

    #[test]
    fn test_new_category_counts_as_full_increase() {
        let insights = analyze(
            &[expense("1", 2, "交際費", -3000)],
            &[expense("2", 1, "食費", -3000)],
        );
        let social = insights
            .iter()
            .find(|i| i.category.as_deref() == Some("交際費"))
            .unwrap();
        assert_eq!(social.change_rate, Some(1.0));
        assert!((social.priority - 13000.0).abs() < 1e-6);
    }

    #[test]
    fn test_vanished_category_skipped() {
        let insights = analyze(
            &[expense("1", 2, "食費", -3000)],
            &[expense("2", 1, "食費", -3000), expense("3", 1, "趣味・娯楽", -20000)],
        );
        assert!(insights.is_empty());
    }
}
