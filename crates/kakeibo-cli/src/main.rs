//! Kakeibo CLI - household ledger analytics
//!
//! Usage:
//!   kakeibo --ledger ledger.json summary --month 3     Totals for March
//!   kakeibo insights --month 3                         Changes against February
//!   kakeibo anomalies --kind duplicate                 Same-day duplicate charges
//!   kakeibo --category 食費 export                     Export food expenses as CSV

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let preferences = cli.preferences.as_deref();

    // Preference-only commands don't need a ledger
    match &cli.command {
        Commands::Filters {
            action: None | Some(FiltersAction::List),
        } => {
            let store = commands::open_store(preferences)?;
            return commands::cmd_filters_list(&store, cli.json);
        }
        Commands::Filters {
            action: Some(FiltersAction::Save { name }),
        } => {
            let mut store = commands::open_store(preferences)?;
            return commands::cmd_filters_save(&mut store, name, &cli.filter_state());
        }
        Commands::Filters {
            action: Some(FiltersAction::Delete { filter }),
        } => {
            let mut store = commands::open_store(preferences)?;
            return commands::cmd_filters_delete(&mut store, filter);
        }
        Commands::Budget {
            action: Some(BudgetAction::Set { amount, target }),
        } => {
            let mut store = commands::open_store(preferences)?;
            return commands::cmd_budget_set(&mut store, *amount, target.as_deref());
        }
        Commands::Budget {
            action: Some(BudgetAction::Clear { target }),
        } => {
            let mut store = commands::open_store(preferences)?;
            return commands::cmd_budget_clear(&mut store, target.as_deref());
        }
        _ => {}
    }

    let mut filter = cli.filter_state();
    if let Some(key) = &cli.saved {
        let store = commands::open_store(preferences)?;
        filter = commands::apply_saved_filter(&store, key, &filter)?;
    }
    let session = commands::load_session(&cli.ledger, filter, cli.config.as_deref(), cli.json)?;

    match cli.command {
        Commands::Summary => {
            let budget = commands::summary_budget(preferences);
            commands::cmd_summary(&session, budget.as_ref())
        }
        Commands::Monthly { by_category } => commands::cmd_monthly(&session, by_category),
        Commands::Categories => commands::cmd_categories(&session),
        Commands::Institutions => commands::cmd_institutions(&session),
        Commands::Ranking { limit } => commands::cmd_ranking(&session, limit),
        Commands::Daily => commands::cmd_daily(&session),
        Commands::Trend => commands::cmd_trend(&session),
        Commands::Insights { limit } => commands::cmd_insights(&session, limit),
        Commands::Anomalies { kind, min_severity } => {
            commands::cmd_anomalies(&session, kind.as_deref(), min_severity)
        }
        Commands::Transactions {
            sort,
            direction,
            page,
            page_size,
        } => commands::cmd_transactions(&session, &sort, &direction, page, page_size),
        Commands::Export { output } => commands::cmd_export(&session, output.as_deref()),
        Commands::Filters {
            action: Some(FiltersAction::Show { filter }),
        } => {
            let store = commands::open_store(preferences)?;
            commands::cmd_filters_show(
                &store,
                &filter,
                &session.records,
                &session.filter,
                session.json,
            )
        }
        Commands::Budget { action: None }
        | Commands::Budget {
            action: Some(BudgetAction::Show),
        } => {
            let store = commands::open_store(preferences)?;
            commands::cmd_budget_show(&session, &store)
        }
        // Handled above without loading the ledger
        Commands::Filters { .. } | Commands::Budget { .. } => Ok(()),
    }
}
