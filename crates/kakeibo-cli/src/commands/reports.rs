//! Report command implementations

use anyhow::Result;
use kakeibo_core::format::{
    format_amount, format_amount_f64, format_change, format_currency, format_percentage,
};
use kakeibo_core::insights::InsightEngine;
use kakeibo_core::preferences::BudgetSettings;
use kakeibo_core::{catalog, reports, trend, Selection};
use serde_json::json;

use super::{truncate, Session};

const RULE: &str = "   ─────────────────────────────────────────────────────────────";

pub fn cmd_summary(session: &Session, budget: Option<&BudgetSettings>) -> Result<()> {
    let view = session.view();
    let counted = session.eligible_view();
    let income = reports::income(&counted);
    let expense = reports::expense(&counted);
    let balance = reports::total(&counted);
    let trend = session
        .eligible_comparison()
        .map(|c| trend::trend_for_period(&c));
    let budget_status = match (budget.and_then(|b| b.monthly_budget), &session.filter.month) {
        (Some(amount), Selection::Only(_)) => Some(reports::budget_status(expense, amount)),
        _ => None,
    };
    let display = &session.config.display;
    let largest = reports::high_expenses(
        &counted,
        display.high_expense_threshold,
        display.high_expense_limit,
    );

    if session.json {
        return super::print_json(&json!({
            "period": session.period_label(),
            "count": view.len(),
            "excluded": view.len() - counted.len(),
            "income": income,
            "expense": expense,
            "balance": balance,
            "trend": trend,
            "budget": budget_status,
            "highExpenses": largest,
        }));
    }

    println!();
    println!("📊 Summary ({})", session.period_label());
    println!("{}", RULE);
    println!("   Transactions: {}", view.len());
    if counted.len() < view.len() {
        println!(
            "   ({} transfers or uncalculated rows not counted)",
            view.len() - counted.len()
        );
    }
    println!(
        "   Income:       {:>14}  {}",
        format_amount(income),
        trend.map(|t| format_change(t.income)).unwrap_or_default()
    );
    println!(
        "   Expense:      {:>14}  {}",
        format_amount(expense),
        trend.map(|t| format_change(t.expense)).unwrap_or_default()
    );
    println!(
        "   Balance:      {:>14}  {}",
        format_currency(balance),
        trend.map(|t| format_change(t.balance)).unwrap_or_default()
    );

    if let Some(status) = budget_status {
        println!();
        let marker = if status.over_budget { "⚠️ " } else { "" };
        println!(
            "   {}Budget: {} of {} used ({})",
            marker,
            format_amount(status.spent),
            format_amount(status.budget),
            format_percentage(status.ratio)
        );
    }

    if !largest.is_empty() {
        println!();
        println!(
            "   Expenses over {}:",
            format_amount(display.high_expense_threshold)
        );
        for t in &largest {
            println!(
                "   {} │ {:>10} │ {}",
                t.date,
                format_amount(t.amount),
                truncate(&t.description, 30)
            );
        }
    }

    Ok(())
}

pub fn cmd_monthly(session: &Session, by_category: bool) -> Result<()> {
    let view = session.eligible_view();

    if by_category {
        let result = reports::category_monthly(&view);
        if session.json {
            return super::print_json(&result);
        }

        println!();
        println!("📅 Monthly Expense by Category ({})", session.filter.year);
        println!("{}", RULE);
        if result.points.is_empty() {
            println!("   No expenses found.");
            return Ok(());
        }
        for point in &result.points {
            println!("   {:>2}月  {:>12}", point.month, format_amount(point.total));
            for category in &result.categories {
                if let Some(&amount) = point.category_amounts.get(category) {
                    println!("         {:16} {:>12}", category, format_amount(amount));
                }
            }
        }
        println!("{}", RULE);
        println!("   Total {:>16}", format_amount(result.total_expense));
        return Ok(());
    }

    let summary = reports::monthly_summary(&view);
    if session.json {
        return super::print_json(&summary);
    }

    println!();
    println!("📅 Monthly Summary ({})", session.filter.year);
    println!("{}", RULE);
    if summary.is_empty() {
        println!("   No transactions found.");
        return Ok(());
    }
    println!(
        "   {:>5} │ {:>12} │ {:>12} │ {:>13}",
        "Month", "Income", "Expense", "Balance"
    );
    println!("   ──────┼──────────────┼──────────────┼──────────────");
    for m in &summary {
        println!(
            "   {:>5} │ {:>12} │ {:>12} │ {:>13}",
            m.label(),
            format_amount(m.income),
            format_amount(m.expense),
            format_currency(m.balance)
        );
    }

    Ok(())
}

pub fn cmd_categories(session: &Session) -> Result<()> {
    let summary = reports::category_summary(&session.eligible_view());
    if session.json {
        return super::print_json(&summary);
    }

    println!();
    println!("🗂  Expense by Category ({})", session.period_label());
    println!("{}", RULE);
    if summary.is_empty() {
        println!("   No expenses found.");
        return Ok(());
    }
    println!("   {:20} │ {:>12} │ {:>6}", "Category", "Amount", "%");
    println!("   ─────────────────────┼──────────────┼───────");
    for c in &summary {
        println!(
            "   {:20} │ {:>12} │ {:>6}",
            truncate(&c.category, 20),
            format_amount(c.amount),
            format_percentage(c.percentage)
        );
    }

    Ok(())
}

pub fn cmd_institutions(session: &Session) -> Result<()> {
    let summary = reports::institution_summary(&session.eligible_view());
    if session.json {
        return super::print_json(&summary);
    }

    println!();
    println!("🏦 Expense by Institution ({})", session.period_label());
    println!("{}", RULE);
    if summary.is_empty() {
        println!("   No expenses found.");
        return Ok(());
    }
    for i in &summary {
        println!(
            "   {:20} │ {:8} │ {:>12} │ {:>6}",
            truncate(catalog::institution_short_name(&i.institution), 20),
            catalog::institution_kind(&i.institution).as_str(),
            format_amount(i.amount),
            format_percentage(i.percentage)
        );
    }

    Ok(())
}

pub fn cmd_ranking(session: &Session, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(session.config.display.ranking_limit);
    let ranking = reports::subcategory_ranking(&session.eligible_view(), limit);
    if session.json {
        return super::print_json(&ranking);
    }

    println!();
    println!("🏆 Top Subcategories ({})", session.period_label());
    println!("{}", RULE);
    if ranking.is_empty() {
        println!("   No expenses found.");
        return Ok(());
    }
    for item in &ranking {
        println!(
            "   {:>2}. {:18} {:10} │ {:>12} │ {:>6}",
            item.rank,
            truncate(&item.subcategory, 18),
            truncate(&item.category, 10),
            format_amount(item.amount),
            format_percentage(item.percentage)
        );
    }

    Ok(())
}

pub fn cmd_daily(session: &Session) -> Result<()> {
    let daily = reports::daily_spending(&session.view());
    if session.json {
        return super::print_json(&daily);
    }

    println!();
    println!("🗓  Daily Spending ({})", session.period_label());
    println!("{}", RULE);
    if daily.days.is_empty() {
        println!("   No spending found.");
        return Ok(());
    }
    for day in &daily.days {
        let peak = daily
            .peak_day
            .filter(|p| p.date == day.date)
            .map(|_| " ◀ peak")
            .unwrap_or("");
        println!(
            "   {} {} │ {:>10}{}",
            day.date,
            day.weekday,
            format_amount(day.total),
            peak
        );
    }
    println!("{}", RULE);
    println!("   Total:   {}", format_amount(daily.total_spending));
    println!("   Average: {} / day", format_amount_f64(daily.average_daily));

    Ok(())
}

pub fn cmd_trend(session: &Session) -> Result<()> {
    if let Some(comparison) = session.eligible_comparison() {
        let data = trend::trend_for_period(&comparison);
        if session.json {
            return super::print_json(&data);
        }

        println!();
        println!("📈 Month-over-month ({})", session.period_label());
        println!("{}", RULE);
        if !comparison.has_previous_data() {
            println!("   No data for the previous month.");
        }
        println!("   Income:  {}", format_change(data.income));
        println!("   Expense: {}", format_change(data.expense));
        println!("   Balance: {}", format_change(data.balance));
        return Ok(());
    }

    // Every month selected: show each month of the year against the one before it
    let counted = reports::eligible(&session.records);
    let months: Vec<u32> = reports::monthly_summary(&kakeibo_core::filter::filter_by_year(
        &counted,
        session.filter.year,
    ))
    .iter()
    .map(|m| m.month)
    .collect();
    let rows: Vec<_> = months
        .iter()
        .map(|&m| (m, trend::trend_for_month(&counted, session.filter.year, m)))
        .collect();

    if session.json {
        let value: Vec<_> = rows
            .iter()
            .map(|(month, data)| json!({ "month": month, "trend": data }))
            .collect();
        return super::print_json(&value);
    }

    println!();
    println!("📈 Month-over-month ({})", session.filter.year);
    println!("{}", RULE);
    if rows.is_empty() {
        println!("   No transactions found.");
        return Ok(());
    }
    println!(
        "   {:>5} │ {:>9} │ {:>9} │ {:>9}",
        "Month", "Income", "Expense", "Balance"
    );
    println!("   ──────┼───────────┼───────────┼──────────");
    for (month, data) in &rows {
        println!(
            "   {:>5} │ {:>9} │ {:>9} │ {:>9}",
            month,
            format_change(data.income),
            format_change(data.expense),
            format_change(data.balance)
        );
    }

    Ok(())
}

pub fn cmd_insights(session: &Session, limit: Option<usize>) -> Result<()> {
    let engine = InsightEngine::with_config(session.config.insights.clone());
    let limit = limit.unwrap_or(session.config.display.insight_limit);
    let insights = session
        .comparison()
        .map(|c| engine.analyze_period(&c, limit))
        .unwrap_or_default();

    if session.json {
        return super::print_json(&insights);
    }

    println!();
    println!("💡 Insights ({})", session.period_label());
    println!("{}", RULE);
    if session.filter.month.is_all() {
        println!("   Pick a month with --month to compare against the month before.");
        return Ok(());
    }
    if insights.is_empty() {
        println!("   Nothing notable this month.");
        return Ok(());
    }
    for insight in &insights {
        println!("   • {}", insight.message());
    }

    Ok(())
}
