//! Saved filter and budget command implementations

use anyhow::{bail, Context, Result};
use kakeibo_core::format::{format_amount, format_percentage};
use kakeibo_core::preferences::{PreferenceStore, SavedFilter};
use kakeibo_core::{apply_filters, reports, FilterState, Selection, Transaction};
use serde_json::json;

use super::Session;

fn describe(filter: &SavedFilter) -> String {
    let mut parts = vec![format!("month={}", filter.filter.month)];
    if let Selection::Only(c) = &filter.filter.category {
        parts.push(format!("category={}", c));
    }
    if let Selection::Only(i) = &filter.filter.institution {
        parts.push(format!("institution={}", i));
    }
    if !filter.filter.search_query.is_empty() {
        parts.push(format!("search=\"{}\"", filter.filter.search_query));
    }
    parts.join(" ")
}

fn find(store: &dyn PreferenceStore, key: &str) -> Result<SavedFilter> {
    store
        .find_filter(key)?
        .with_context(|| format!("Saved filter not found: {}", key))
}

pub fn cmd_filters_list(store: &dyn PreferenceStore, json_output: bool) -> Result<()> {
    let filters = store.list_filters()?;
    if json_output {
        return super::print_json(&filters);
    }

    if filters.is_empty() {
        println!("No saved filters. Save one with:");
        println!("  kakeibo --month 3 --category 食費 filters save \"March food\"");
        return Ok(());
    }

    println!();
    println!("🔖 Saved Filters");
    println!("   ─────────────────────────────────────────────────────────────");
    for f in &filters {
        println!("   {} │ {:20} │ {}", f.id, f.name, describe(f));
    }

    Ok(())
}

pub fn cmd_filters_save(
    store: &mut dyn PreferenceStore,
    name: &str,
    filter: &FilterState,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Filter name cannot be empty");
    }
    let saved = store.save_filter(name, filter)?;
    println!("✅ Saved filter \"{}\" ({})", saved.name, saved.id);
    Ok(())
}

pub fn cmd_filters_show(
    store: &dyn PreferenceStore,
    key: &str,
    records: &[Transaction],
    current: &FilterState,
    json_output: bool,
) -> Result<()> {
    let saved = find(store, key)?;
    let applied = saved.apply(current);
    let matching = apply_filters(records, &applied);

    if json_output {
        return super::print_json(&json!({
            "filter": saved,
            "applied": applied,
            "matchingCount": matching.len(),
        }));
    }

    println!();
    println!("🔖 {}", saved.name);
    println!("   Id:      {}", saved.id);
    println!("   Created: {}", saved.created_at.format("%Y-%m-%d %H:%M"));
    println!("   Filter:  {}", describe(&saved));
    println!(
        "   Matches {} transactions in {} ({} expense)",
        matching.len(),
        applied.year,
        format_amount(reports::expense(&reports::eligible(&matching)))
    );

    Ok(())
}

pub fn cmd_filters_delete(store: &mut dyn PreferenceStore, key: &str) -> Result<()> {
    let saved = find(store, key)?;
    store.delete_filter(saved.id)?;
    println!("🗑  Deleted saved filter \"{}\"", saved.name);
    Ok(())
}

pub fn cmd_budget_show(session: &Session, store: &dyn PreferenceStore) -> Result<()> {
    let budget = store.budget()?;
    let month_selected = !session.filter.month.is_all();
    let view = session.eligible_view();

    let overall = budget
        .monthly_budget
        .filter(|_| month_selected)
        .map(|amount| reports::budget_status(reports::expense(&view), amount));
    let spent_by_category = reports::category_summary(&view);
    let per_category: Vec<_> = budget
        .category_budgets
        .iter()
        .filter(|_| month_selected)
        .map(|(category, &amount)| {
            let spent = spent_by_category
                .iter()
                .find(|c| &c.category == category)
                .map_or(0, |c| c.amount);
            (category.clone(), reports::budget_status(spent, amount))
        })
        .collect();

    if session.json {
        let categories: serde_json::Map<String, serde_json::Value> = per_category
            .iter()
            .map(|(c, s)| (c.clone(), json!(s)))
            .collect();
        return super::print_json(&json!({
            "settings": budget,
            "period": session.period_label(),
            "overall": overall,
            "categories": categories,
        }));
    }

    println!();
    println!("💰 Budget ({})", session.period_label());
    println!("   ─────────────────────────────────────────────────────────────");

    if budget.is_empty() {
        println!("   No budget set. Set one with:");
        println!("     kakeibo budget set 200000");
        return Ok(());
    }

    if !month_selected {
        if let Some(amount) = budget.monthly_budget {
            println!("   Monthly budget: {}", format_amount(amount));
        }
        for (category, amount) in &budget.category_budgets {
            println!("   {:16} {}", category, format_amount(*amount));
        }
        println!();
        println!("   Pick a month with --month to see progress.");
        return Ok(());
    }

    if let Some(status) = overall {
        print_status("Overall", &status);
    }
    for (category, status) in &per_category {
        print_status(category, status);
    }

    Ok(())
}

fn print_status(label: &str, status: &kakeibo_core::BudgetStatus) {
    let state = if status.over_budget {
        format!("\x1b[31mover by {}\x1b[0m", format_amount(-status.remaining))
    } else {
        format!("{} left", format_amount(status.remaining))
    };
    println!(
        "   {:16} {:>10} / {:>10} ({:>6}) {}",
        label,
        format_amount(status.spent),
        format_amount(status.budget),
        format_percentage(status.ratio),
        state
    );
}

pub fn cmd_budget_set(
    store: &mut dyn PreferenceStore,
    amount: i64,
    category: Option<&str>,
) -> Result<()> {
    if amount <= 0 {
        bail!("Budget must be a positive amount, got {}", amount);
    }

    let mut budget = store.budget()?;
    match category {
        Some(c) => budget.set_category_budget(c, Some(amount)),
        None => budget.set_monthly_budget(Some(amount)),
    }
    store.save_budget(&budget)?;

    println!(
        "✅ {} budget set to {}",
        category.unwrap_or("Monthly"),
        format_amount(amount)
    );
    Ok(())
}

pub fn cmd_budget_clear(store: &mut dyn PreferenceStore, category: Option<&str>) -> Result<()> {
    let mut budget = store.budget()?;
    match category {
        Some(c) => {
            if budget.category_budget(c).is_none() {
                bail!("No budget set for {}", c);
            }
            budget.set_category_budget(c, None);
        }
        None => budget.clear(),
    }
    store.save_budget(&budget)?;

    println!("🗑  Cleared {} budget", category.unwrap_or("every"));
    Ok(())
}
