//! Transaction command implementations

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use kakeibo_core::export::{export_filename, export_to_file};
use kakeibo_core::format::format_currency;
use kakeibo_core::{apply_pagination, apply_sort, SortColumn, SortDirection, SortState};
use serde_json::json;

use super::{truncate, Session};

pub fn cmd_transactions(
    session: &Session,
    sort: &str,
    direction: &str,
    page: usize,
    page_size: Option<usize>,
) -> Result<()> {
    let column: SortColumn = sort.parse().map_err(|e: String| anyhow!(e))?;
    let direction: SortDirection = direction.parse().map_err(|e: String| anyhow!(e))?;
    let page_size = page_size.unwrap_or(session.config.display.page_size);
    // Pages are 1-based on the command line
    let page_index = page.saturating_sub(1);

    let view = session.view();
    let sorted = apply_sort(&view, SortState::new(column, direction));
    let result = apply_pagination(&sorted, page_index, page_size);

    if session.json {
        return super::print_json(&json!({
            "page": page_index + 1,
            "totalPages": result.total_pages,
            "totalCount": view.len(),
            "items": result.items,
        }));
    }

    if view.is_empty() {
        println!("No transactions match the current filter.");
        return Ok(());
    }

    println!();
    println!(
        "📝 Transactions ({}) - page {} of {}",
        session.period_label(),
        page_index + 1,
        result.total_pages
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for t in &result.items {
        let amount_str = if t.is_expense() {
            format!("\x1b[31m{:>11}\x1b[0m", format_currency(t.amount)) // Red for expenses
        } else {
            format!("\x1b[32m{:>11}\x1b[0m", format_currency(t.amount)) // Green for income
        };
        let marker = if t.counts_toward_totals() { " " } else { "~" };

        println!(
            "   {} │ {} │{}{:10} │ {}",
            t.date,
            amount_str,
            marker,
            truncate(&t.category, 10),
            truncate(&t.description, 32)
        );
    }

    if result.items.is_empty() {
        println!("   Page {} is past the end.", page_index + 1);
    }

    Ok(())
}

pub fn cmd_export(session: &Session, output: Option<&Path>) -> Result<()> {
    let view = session.view();
    let path = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(export_filename(session.filter.year, &session.filter.month)),
    };

    export_to_file(&path, &view)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "✅ Exported {} transactions to {}",
        view.len(),
        path.display()
    );
    Ok(())
}
