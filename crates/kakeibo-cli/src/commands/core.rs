//! Session loading and shared output helpers
//!
//! This module contains:
//! - `Session` - the loaded ledger with the active filter and engine config
//! - `load_session` - read ledger and config from disk
//! - `open_store` - open the preference store
//! - `summary_budget` - budget for the summary, tolerating an unreadable store
//! - `print_json` - JSON output for `--json`

use std::path::Path;

use anyhow::{Context, Result};
use kakeibo_core::config::load_config;
use kakeibo_core::filter::PeriodComparison;
use kakeibo_core::ledger::load_ledger;
use kakeibo_core::preferences::{BudgetSettings, JsonFileStore, PreferenceStore};
use kakeibo_core::{apply_filters, reports, EngineConfig, FilterState, Selection, Transaction};
use serde::Serialize;

/// Everything a report command needs
pub struct Session {
    /// The full ledger
    pub records: Vec<Transaction>,
    pub filter: FilterState,
    pub config: EngineConfig,
    /// Print JSON instead of tables
    pub json: bool,
}

impl Session {
    pub fn new(
        records: Vec<Transaction>,
        filter: FilterState,
        config: EngineConfig,
        json: bool,
    ) -> Self {
        Self {
            records,
            filter,
            config,
            json,
        }
    }

    /// Records matching the active filter
    pub fn view(&self) -> Vec<Transaction> {
        apply_filters(&self.records, &self.filter)
    }

    /// Filtered records that count toward totals (no transfers, no uncalculated rows)
    pub fn eligible_view(&self) -> Vec<Transaction> {
        reports::eligible(&self.view())
    }

    /// The selected month and the month before it; `None` when every month is selected
    pub fn comparison(&self) -> Option<PeriodComparison> {
        PeriodComparison::for_filter(&self.records, &self.filter)
    }

    /// Like `comparison`, restricted to records that count toward totals
    pub fn eligible_comparison(&self) -> Option<PeriodComparison> {
        PeriodComparison::for_filter(&reports::eligible(&self.records), &self.filter)
    }

    /// "2025" or "2025-03"
    pub fn period_label(&self) -> String {
        match self.filter.month {
            Selection::All => self.filter.year.to_string(),
            Selection::Only(m) => format!("{}-{:02}", self.filter.year, m),
        }
    }
}

/// Load the ledger and config for a command run
pub fn load_session(
    ledger: &Path,
    filter: FilterState,
    config_path: Option<&Path>,
    json: bool,
) -> Result<Session> {
    let records = load_ledger(ledger)
        .with_context(|| format!("Failed to load ledger {}", ledger.display()))?;
    let config = load_config(config_path).context("Failed to load config")?;

    tracing::debug!(
        records = records.len(),
        year = filter.year,
        month = %filter.month,
        "Session loaded"
    );
    Ok(Session::new(records, filter, config, json))
}

/// Open the preference store at `path`, or the default location
pub fn open_store(path: Option<&Path>) -> Result<JsonFileStore> {
    match path {
        Some(p) => JsonFileStore::open(p)
            .with_context(|| format!("Failed to open preferences {}", p.display())),
        None => JsonFileStore::open_default().context("Failed to open preferences"),
    }
}

/// Budget settings for the summary report
///
/// Budget progress is optional there, so an unreadable store is logged and
/// the summary runs without it.
pub fn summary_budget(path: Option<&Path>) -> Option<BudgetSettings> {
    match open_store(path).and_then(|store| store.budget().context("Failed to read budget")) {
        Ok(budget) => Some(budget),
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "Ignoring unreadable preferences");
            None
        }
    }
}

/// Overlay a saved filter (by id or name) on `filter`
pub fn apply_saved_filter(
    store: &dyn PreferenceStore,
    key: &str,
    filter: &FilterState,
) -> Result<FilterState> {
    let saved = store
        .find_filter(key)?
        .with_context(|| format!("Saved filter not found: {}", key))?;
    tracing::debug!(id = %saved.id, name = %saved.name, "Applying saved filter");
    Ok(saved.apply(filter))
}

/// Pretty-print a value as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
