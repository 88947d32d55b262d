//! Insight Engine - month-over-month observations
//!
//! Compares a month's category spending with the month before it and
//! surfaces the changes worth reading. Analyzers are pluggable; each one
//! looks at the same [`AnalysisContext`] and the engine ranks everything
//! they produce by priority.
//!
//! ## Built-in Analyzers
//!
//! - **Category Change** - categories that grew or shrank materially
//! - **Top Category** - a single category taking a large share of spending
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kakeibo_core::insights::InsightEngine;
//!
//! let engine = InsightEngine::new();
//! let insights = engine.analyze_all(&current, &previous, 5);
//! for insight in &insights {
//!     println!("{}", insight.message());
//! }
//! ```

pub mod category_change;
pub mod engine;
pub mod top_category;
pub mod types;

pub use category_change::CategoryChangeInsight;
pub use engine::{calc_insights, AnalysisContext, InsightAnalyzer, InsightConfig, InsightEngine};
pub use top_category::TopCategoryInsight;
pub use types::{CategoryExpense, Insight, InsightType};
