//! Top Category Insight

use super::engine::{AnalysisContext, InsightAnalyzer};
use super::types::{CategoryExpense, Insight, InsightType};

/// Insight that calls out a category dominating the month's spending
pub struct TopCategoryInsight;

impl TopCategoryInsight {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TopCategoryInsight {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightAnalyzer for TopCategoryInsight {
    fn name(&self) -> &'static str {
        "Top Category"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let total = ctx.total_current_expense();
        if total <= 0 {
            return Vec::new();
        }

        // First category wins ties
        let top = ctx
            .category_expenses()
            .iter()
            .filter(|c| c.current_amount > 0)
            .fold(None::<&CategoryExpense>, |best, c| match best {
                Some(b) if b.current_amount >= c.current_amount => Some(b),
                _ => Some(c),
            });

        let Some(top) = top else {
            return Vec::new();
        };

        let percentage = top.current_amount as f64 / total as f64;
        if percentage < ctx.config.top_category_share {
            return Vec::new();
        }

        vec![Insight {
            insight_type: InsightType::TopCategory,
            category: Some(top.category.clone()),
            amount: top.current_amount,
            difference: None,
            change_rate: None,
            percentage: Some(percentage),
            priority: percentage * ctx.config.priority_rate_weight,
        }]
    }
}
