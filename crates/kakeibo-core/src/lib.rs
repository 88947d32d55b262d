//! Kakeibo Core Library
//!
//! Analytics for a household ledger of canonical transactions:
//! - Filtering, sorting and pagination of the record set
//! - Aggregate reports (monthly, category, institution, ranking, daily)
//! - Month-over-month trends and ranked spending insights
//! - Anomaly detection over the full ledger
//! - Engine configuration, saved filters and budgets, CSV export

pub mod catalog;
pub mod config;
pub mod detect;
pub mod error;
pub mod export;
pub mod filter;
pub mod format;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod preferences;
pub mod reports;
pub mod trend;

/// Test utilities including a transaction builder
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{DisplayConfig, EngineConfig};
pub use detect::{
    detect_anomalies, AnomalyDetector, AnomalyMap, DetectionConfig, DetectionResults,
};
pub use error::{Error, Result};
pub use filter::{apply_filters, apply_pagination, apply_sort, PeriodComparison};
pub use insights::{calc_insights, Insight, InsightConfig, InsightEngine, InsightType};
pub use ledger::load_ledger;
pub use models::{
    Anomaly, AnomalyType, BudgetStatus, CategoryMonthlyPoint, CategoryMonthlyResult,
    CategorySummary, DailySpending, DailySpendingResult, FilterState, InstitutionSummary,
    MonthlySummary, Page, PeakDay, RankingItem, Selection, SortColumn, SortDirection, SortState,
    Transaction, TransactionType, TrendData,
};
pub use preferences::{
    BudgetSettings, InMemoryStore, JsonFileStore, PreferenceStore, SavedFilter,
    SavedFilterCriteria,
};
