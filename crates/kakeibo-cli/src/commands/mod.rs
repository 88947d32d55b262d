//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Session loading (ledger, config, filter) and shared output helpers
//! - `reports` - Report commands (summary, monthly, categories, ranking, trend, insights)
//! - `anomalies` - Anomaly detection command
//! - `transactions` - Transaction listing and CSV export
//! - `preferences` - Saved filter and budget commands

pub mod anomalies;
pub mod core;
pub mod preferences;
pub mod reports;
pub mod transactions;

// Re-export command functions for main.rs
pub use anomalies::*;
pub use core::*;
pub use preferences::*;
pub use reports::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
