//! Ledger loading
//!
//! A ledger is the JSON array of canonical records handed over by the
//! ingestion side. Records are trusted as-is.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::Transaction;

/// Parse a ledger document
pub fn parse_ledger(content: &str) -> Result<Vec<Transaction>> {
    let records: Vec<Transaction> = serde_json::from_str(content)?;
    Ok(records)
}

/// Load a ledger file from disk
pub fn load_ledger(path: &Path) -> Result<Vec<Transaction>> {
    if !path.exists() {
        return Err(Error::NotFound(format!("Ledger file {}", path.display())));
    }

    let content = fs::read_to_string(path)?;
    let records = parse_ledger(&content)?;

    tracing::info!(
        path = %path.display(),
        count = records.len(),
        "Loaded ledger"
    );
    Ok(records)
}

/// Years present in the ledger, newest first
pub fn available_years(records: &[Transaction]) -> Vec<i32> {
    let mut years: Vec<i32> = records.iter().map(|t| t.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Distinct categories, sorted
pub fn available_categories(records: &[Transaction]) -> Vec<String> {
    distinct(records.iter().map(|t| t.category.as_str()))
}

/// Distinct institutions, sorted
pub fn available_institutions(records: &[Transaction]) -> Vec<String> {
    distinct(records.iter().map(|t| t.institution.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = values.map(str::to_string).collect();
    out.sort();
    out.dedup();
    out
}
