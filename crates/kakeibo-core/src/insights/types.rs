//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::format::{format_amount, format_currency, format_percentage, format_percentage_int};

/// Types of insights that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// A category grew materially against the previous month
    CategoryIncrease,
    /// A category shrank materially against the previous month
    CategoryDecrease,
    /// One category dominates this month's spending
    TopCategory,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::CategoryIncrease => "category_increase",
            InsightType::CategoryDecrease => "category_decrease",
            InsightType::TopCategory => "top_category",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category_increase" => Ok(InsightType::CategoryIncrease),
            "category_decrease" => Ok(InsightType::CategoryDecrease),
            "top_category" => Ok(InsightType::TopCategory),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// A ranked observation about the current period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Current-period amount (absolute yen)
    pub amount: i64,
    /// Current minus previous
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<i64>,
    /// 0.05 = +5%
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_rate: Option<f64>,
    /// Share of current-period expense (0-1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    /// Higher is more important
    pub priority: f64,
}

impl Insight {
    /// One-line display message
    pub fn message(&self) -> String {
        let category = self.category.as_deref().unwrap_or("Spending");
        match self.insight_type {
            InsightType::CategoryIncrease => format!(
                "{} up {} ({}) from last month",
                category,
                format_currency(self.difference.unwrap_or(0)),
                format_percentage(self.change_rate.unwrap_or(0.0))
            ),
            InsightType::CategoryDecrease => format!(
                "{} down {} ({}) from last month",
                category,
                format_amount(self.difference.unwrap_or(0)),
                format_percentage(self.change_rate.unwrap_or(0.0).abs())
            ),
            InsightType::TopCategory => format!(
                "{} is the largest category at {} of spending",
                category,
                format_percentage_int(self.percentage.unwrap_or(0.0))
            ),
        }
    }
}

/// Expense for one category in both periods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryExpense {
    pub category: String,
    pub current_amount: i64,
    pub previous_amount: i64,
}

impl CategoryExpense {
    pub fn difference(&self) -> i64 {
        self.current_amount - self.previous_amount
    }

    /// Relative change; a category appearing from nothing counts as +100%
    ///
    /// Unlike the trend calculation, growth from zero is kept as a number so
    /// it can still be ranked.
    pub fn change_rate(&self) -> f64 {
        if self.previous_amount > 0 {
            self.difference() as f64 / self.previous_amount as f64
        } else if self.current_amount > 0 {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(insight_type: InsightType) -> Insight {
        Insight {
            insight_type,
            category: Some("食費".to_string()),
            amount: 30000,
            difference: Some(if insight_type == InsightType::CategoryDecrease {
                -6000
            } else {
                6000
            }),
            change_rate: Some(if insight_type == InsightType::CategoryDecrease {
                -0.2
            } else {
                0.25
            }),
            percentage: Some(0.42),
            priority: 0.0,
        }
    }

    #[test]
    fn test_insight_type_serialization() {
        assert_eq!(InsightType::TopCategory.as_str(), "top_category");
        assert_eq!(
            InsightType::from_str("category_decrease").unwrap(),
            InsightType::CategoryDecrease
        );
        assert!(InsightType::from_str("trend_up").is_err());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            insight(InsightType::CategoryIncrease).message(),
            "食費 up +¥6,000 (25.0%) from last month"
        );
        assert_eq!(
            insight(InsightType::CategoryDecrease).message(),
            "食費 down ¥6,000 (20.0%) from last month"
        );
        assert_eq!(
            insight(InsightType::TopCategory).message(),
            "食費 is the largest category at 42% of spending"
        );
    }

    #[test]
    fn test_change_rate_from_zero() {
        let appeared = CategoryExpense {
            category: "交際費".into(),
            current_amount: 8000,
            previous_amount: 0,
        };
        assert_eq!(appeared.change_rate(), 1.0);

        let gone = CategoryExpense {
            category: "交際費".into(),
            current_amount: 0,
            previous_amount: 0,
        };
        assert_eq!(gone.change_rate(), 0.0);
    }

    #[test]
    fn test_json_shape_omits_missing_fields() {
        let top = Insight {
            insight_type: InsightType::TopCategory,
            category: Some("食費".into()),
            amount: 1000,
            difference: None,
            change_rate: None,
            percentage: Some(0.5),
            priority: 5000.0,
        };
        let value = serde_json::to_value(&top).unwrap();
        assert_eq!(value["type"], "top_category");
        assert!(value.get("difference").is_none());
        assert_eq!(value["percentage"], 0.5);
    }
}
