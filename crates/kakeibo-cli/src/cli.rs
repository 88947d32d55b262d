//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use kakeibo_core::{FilterState, Selection};

/// Kakeibo - household ledger analytics
#[derive(Parser)]
#[command(name = "kakeibo")]
#[command(about = "Reports, trends and anomaly checks for a household ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger file (JSON array of transactions)
    #[arg(long, default_value = "ledger.json", global = true)]
    pub ledger: PathBuf,

    /// Year to report on (defaults to the current year)
    #[arg(long, global = true)]
    pub year: Option<i32>,

    /// Month 1-12, or "all"
    #[arg(long, default_value = "all", value_parser = parse_month, global = true)]
    pub month: Selection<u32>,

    /// Category name, or "all"
    #[arg(long, default_value = "all", global = true)]
    pub category: Selection<String>,

    /// Institution name, or "all"
    #[arg(long, default_value = "all", global = true)]
    pub institution: Selection<String>,

    /// Case-insensitive text to look for in descriptions
    #[arg(long, default_value = "", global = true)]
    pub search: String,

    /// Apply a saved filter (id or name) over the flags above
    #[arg(long, global = true)]
    pub saved: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Engine config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Preference file for saved filters and budgets
    ///
    /// Defaults to the platform data directory
    /// (e.g. ~/.local/share/kakeibo/preferences.json).
    #[arg(long, global = true)]
    pub preferences: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Filter state described by the global flags
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            year: self
                .year
                .unwrap_or_else(|| chrono::Local::now().year()),
            month: self.month.clone(),
            category: self.category.clone(),
            institution: self.institution.clone(),
            search_query: self.search.clone(),
        }
    }
}

/// Parse a month flag: "all" or 1-12
pub fn parse_month(s: &str) -> Result<Selection<u32>, String> {
    match s.parse::<Selection<u32>>()? {
        Selection::Only(m) if !(1..=12).contains(&m) => {
            Err(format!("Month must be 1-12 or \"all\", got {}", m))
        }
        selection => Ok(selection),
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Income, expense and balance for the current filter
    Summary,

    /// Per-month income, expense and balance
    Monthly {
        /// Break expense down by category for each month
        #[arg(long)]
        by_category: bool,
    },

    /// Expense by category
    Categories,

    /// Expense by institution
    Institutions,

    /// Top subcategories by expense
    Ranking {
        /// Number of entries (defaults to the display config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Day-by-day spending
    Daily,

    /// Month-over-month change rates
    Trend,

    /// Notable category changes against the previous month
    Insights {
        /// Number of insights (defaults to the insight config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Unusual transactions (detected over the whole ledger)
    Anomalies {
        /// Only this type: high_amount, frequent, new_high, duplicate
        #[arg(long)]
        kind: Option<String>,

        /// Minimum severity (1-5)
        #[arg(long, default_value = "1")]
        min_severity: u8,
    },

    /// List transactions
    Transactions {
        /// Sort column: date, amount, category
        #[arg(long, default_value = "date")]
        sort: String,

        /// Sort direction: asc, desc
        #[arg(long, default_value = "desc")]
        direction: String,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Rows per page (defaults to the display config)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Export the filtered transactions as CSV
    Export {
        /// Output file (defaults to a name based on year and month)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage saved filters (list, save, show, delete)
    Filters {
        #[command(subcommand)]
        action: Option<FiltersAction>,
    },

    /// Manage budgets (show, set, clear)
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },
}

#[derive(Subcommand)]
pub enum FiltersAction {
    /// List saved filters
    List,

    /// Save the current filter flags under a name
    Save {
        /// Name for the saved filter
        name: String,
    },

    /// Show a saved filter and how many transactions it matches
    Show {
        /// Saved filter id or name
        filter: String,
    },

    /// Delete a saved filter
    Delete {
        /// Saved filter id or name
        filter: String,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Show budget progress for the selected month
    Show,

    /// Set the monthly budget, or a category budget when a category is given
    Set {
        /// Amount in yen
        amount: i64,

        /// Category the budget applies to
        target: Option<String>,
    },

    /// Clear a category budget, or every budget when no category is given
    Clear {
        /// Category whose budget is removed
        target: Option<String>,
    },
}
