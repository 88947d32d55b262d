//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use clap::Parser;
use kakeibo_core::preferences::{InMemoryStore, JsonFileStore, PreferenceStore};
use kakeibo_core::test_utils::TransactionBuilder;
use kakeibo_core::{EngineConfig, FilterState, Selection, Transaction};
use tempfile::TempDir;

use crate::cli::{parse_month, BudgetAction, Cli, Commands, FiltersAction};
use crate::commands::{self, truncate, Session};

fn sample_records() -> Vec<Transaction> {
    vec![
        TransactionBuilder::new("1")
            .date(2025, 2, 25)
            .description("給与")
            .amount(300000)
            .category("収入")
            .subcategory("給与")
            .build(),
        TransactionBuilder::new("2")
            .date(2025, 2, 3)
            .description("スーパー")
            .amount(-12000)
            .build(),
        TransactionBuilder::new("3")
            .date(2025, 3, 3)
            .description("スーパー")
            .amount(-20000)
            .build(),
        TransactionBuilder::new("4")
            .date(2025, 3, 8)
            .description("電車")
            .amount(-1500)
            .category("交通費")
            .subcategory("電車")
            .build(),
        TransactionBuilder::new("5")
            .date(2025, 3, 8)
            .description("カフェ")
            .amount(-1500)
            .category("食費")
            .subcategory("カフェ")
            .build(),
    ]
}

fn session(filter: FilterState, json: bool) -> Session {
    Session::new(sample_records(), filter, EngineConfig::default(), json)
}

fn march() -> FilterState {
    FilterState::for_year(2025).with_month(3)
}

fn write_ledger(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("ledger.json");
    std::fs::write(&path, serde_json::to_string(&sample_records()).unwrap()).unwrap();
    path
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_global_filters() {
    let cli = Cli::try_parse_from([
        "kakeibo",
        "--year",
        "2025",
        "--month",
        "3",
        "--category",
        "食費",
        "summary",
    ])
    .unwrap();

    let filter = cli.filter_state();
    assert_eq!(filter.year, 2025);
    assert_eq!(filter.month, Selection::Only(3));
    assert_eq!(filter.category, Selection::Only("食費".to_string()));
    assert_eq!(filter.institution, Selection::All);
    assert!(matches!(cli.command, Commands::Summary));
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["kakeibo", "ranking", "--limit", "3", "--month", "all", "--json"])
        .unwrap();
    assert!(cli.json);
    assert_eq!(cli.month, Selection::All);
    assert!(matches!(cli.command, Commands::Ranking { limit: Some(3) }));
}

#[test]
fn test_parse_month_bounds() {
    assert_eq!(parse_month("12").unwrap(), Selection::Only(12));
    assert_eq!(parse_month("ALL").unwrap(), Selection::All);
    assert!(parse_month("0").is_err());
    assert!(parse_month("13").is_err());
    assert!(parse_month("march").is_err());
    assert!(Cli::try_parse_from(["kakeibo", "--month", "13", "summary"]).is_err());
}

#[test]
fn test_parse_subcommand_actions() {
    let cli = Cli::try_parse_from(["kakeibo", "budget", "set", "50000", "食費"]).unwrap();
    match cli.command {
        Commands::Budget {
            action: Some(BudgetAction::Set { amount, target }),
        } => {
            assert_eq!(amount, 50000);
            assert_eq!(target.as_deref(), Some("食費"));
        }
        _ => panic!("expected budget set"),
    }

    let cli = Cli::try_parse_from(["kakeibo", "filters", "save", "March food"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Filters {
            action: Some(FiltersAction::Save { .. })
        }
    ));
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a long description", 10), "a long ...");
    // counts characters, not bytes
    assert_eq!(truncate("セブンイレブン渋谷店", 8), "セブンイレ...");
}

#[test]
fn test_session_view_and_label() {
    let s = session(march(), false);
    assert_eq!(s.view().len(), 3);
    assert_eq!(s.period_label(), "2025-03");
    assert!(s.comparison().unwrap().has_previous_data());

    let whole_year = session(FilterState::for_year(2025), false);
    assert_eq!(whole_year.period_label(), "2025");
    assert!(whole_year.comparison().is_none());
}

#[test]
fn test_load_session_from_files() {
    let dir = TempDir::new().unwrap();
    let ledger = write_ledger(&dir);
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[display]\npage_size = 2\n").unwrap();

    let s = commands::load_session(&ledger, march(), Some(config.as_path()), false).unwrap();
    assert_eq!(s.records.len(), 5);
    assert_eq!(s.config.display.page_size, 2);
}

#[test]
fn test_load_session_missing_ledger() {
    let dir = TempDir::new().unwrap();
    let result = commands::load_session(&dir.path().join("missing.json"), march(), None, false);
    assert!(result.is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_report_commands_run() {
    for json in [false, true] {
        let s = session(march(), json);
        assert!(commands::cmd_summary(&s, None).is_ok());
        assert!(commands::cmd_monthly(&s, false).is_ok());
        assert!(commands::cmd_monthly(&s, true).is_ok());
        assert!(commands::cmd_categories(&s).is_ok());
        assert!(commands::cmd_institutions(&s).is_ok());
        assert!(commands::cmd_ranking(&s, Some(2)).is_ok());
        assert!(commands::cmd_daily(&s).is_ok());
        assert!(commands::cmd_trend(&s).is_ok());
        assert!(commands::cmd_insights(&s, None).is_ok());
    }
}

#[test]
fn test_reports_on_whole_year_and_empty_view() {
    let year = session(FilterState::for_year(2025), false);
    assert!(commands::cmd_trend(&year).is_ok());
    assert!(commands::cmd_insights(&year, Some(3)).is_ok());

    let empty = session(FilterState::for_year(2019), false);
    assert!(commands::cmd_summary(&empty, None).is_ok());
    assert!(commands::cmd_categories(&empty).is_ok());
    assert!(commands::cmd_daily(&empty).is_ok());
}

#[test]
fn test_totals_skip_transfers_and_uncalculated() {
    let records = vec![
        TransactionBuilder::new("salary")
            .date(2025, 3, 25)
            .amount(300000)
            .category("収入")
            .build(),
        TransactionBuilder::new("move-out")
            .date(2025, 3, 10)
            .amount(-100000)
            .transfer(true)
            .build(),
        TransactionBuilder::new("move-in")
            .date(2025, 3, 10)
            .amount(100000)
            .transfer(true)
            .build(),
        TransactionBuilder::new("reimbursed")
            .date(2025, 3, 12)
            .amount(-50000)
            .calculated(false)
            .build(),
        TransactionBuilder::new("groceries")
            .date(2025, 3, 14)
            .amount(-20000)
            .build(),
    ];
    let s = Session::new(records, march(), EngineConfig::default(), true);

    assert_eq!(s.view().len(), 5);
    let counted = s.eligible_view();
    assert_eq!(kakeibo_core::reports::income(&counted), 300000);
    assert_eq!(kakeibo_core::reports::expense(&counted), 20000);

    let categories: Vec<i64> = kakeibo_core::reports::category_summary(&counted)
        .iter()
        .map(|c| c.amount)
        .collect();
    assert_eq!(categories, vec![20000]);

    let comparison = s.eligible_comparison().unwrap();
    assert_eq!(comparison.current.len(), 2);

    assert!(commands::cmd_summary(&s, None).is_ok());
    assert!(commands::cmd_categories(&s).is_ok());
}

#[test]
fn test_summary_budget_tolerates_corrupt_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(commands::open_store(Some(path.as_path())).is_err());
    assert!(commands::summary_budget(Some(path.as_path())).is_none());

    let good = dir.path().join("good.json");
    let mut store = commands::open_store(Some(good.as_path())).unwrap();
    commands::cmd_budget_set(&mut store, 80000, None).unwrap();
    let budget = commands::summary_budget(Some(good.as_path())).unwrap();
    assert_eq!(budget.monthly_budget, Some(80000));
}

#[test]
fn test_summary_with_budget() {
    let mut store = InMemoryStore::new();
    commands::cmd_budget_set(&mut store, 20000, None).unwrap();
    let budget = store.budget().unwrap();

    assert!(commands::cmd_summary(&session(march(), false), Some(&budget)).is_ok());
}

// ========== Anomaly Command Tests ==========

#[test]
fn test_cmd_anomalies() {
    let s = session(march(), false);
    assert!(commands::cmd_anomalies(&s, None, 1).is_ok());
    assert!(commands::cmd_anomalies(&s, Some("duplicate"), 4).is_ok());
    assert!(commands::cmd_anomalies(&s, Some("bogus"), 1).is_err());
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_transactions() {
    let s = session(march(), false);
    assert!(commands::cmd_transactions(&s, "amount", "asc", 1, Some(2)).is_ok());
    assert!(commands::cmd_transactions(&s, "date", "desc", 9, None).is_ok());
    assert!(commands::cmd_transactions(&s, "merchant", "desc", 1, None).is_err());
    assert!(commands::cmd_transactions(&s, "date", "up", 1, None).is_err());
}

#[test]
fn test_cmd_export() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("march.csv");

    commands::cmd_export(&session(march(), false), Some(output.as_path())).unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    // header plus three March rows
    assert_eq!(content.lines().count(), 4);
    assert!(content.contains("2025/03/03,スーパー,-20000"));
}

// ========== Preference Command Tests ==========

#[test]
fn test_filters_commands() {
    let mut store = InMemoryStore::new();
    let filter = march().with_category("食費");

    commands::cmd_filters_save(&mut store, "March food", &filter).unwrap();
    assert!(commands::cmd_filters_save(&mut store, "  ", &filter).is_err());
    assert!(commands::cmd_filters_list(&store, false).is_ok());

    let records = sample_records();
    assert!(commands::cmd_filters_show(
        &store,
        "March food",
        &records,
        &FilterState::for_year(2025),
        false
    )
    .is_ok());
    assert!(commands::cmd_filters_show(&store, "nope", &records, &march(), false).is_err());

    commands::cmd_filters_delete(&mut store, "March food").unwrap();
    assert!(store.list_filters().unwrap().is_empty());
    assert!(commands::cmd_filters_delete(&mut store, "March food").is_err());
}

#[test]
fn test_apply_saved_filter() {
    let mut store = InMemoryStore::new();
    let saved = store
        .save_filter("transport", &march().with_category("交通費"))
        .unwrap();

    let applied =
        commands::apply_saved_filter(&store, &saved.id.to_string(), &FilterState::for_year(2024))
            .unwrap();
    assert_eq!(applied.year, 2024);
    assert_eq!(applied.category, Selection::Only("交通費".to_string()));

    assert!(commands::apply_saved_filter(&store, "missing", &march()).is_err());
}

#[test]
fn test_budget_commands() {
    let mut store = InMemoryStore::new();

    assert!(commands::cmd_budget_set(&mut store, 0, None).is_err());
    commands::cmd_budget_set(&mut store, 200000, None).unwrap();
    commands::cmd_budget_set(&mut store, 15000, Some("食費")).unwrap();

    let budget = store.budget().unwrap();
    assert_eq!(budget.monthly_budget, Some(200000));
    assert_eq!(budget.category_budget("食費"), Some(15000));

    assert!(commands::cmd_budget_show(&session(march(), false), &store).is_ok());
    assert!(commands::cmd_budget_show(&session(march(), true), &store).is_ok());
    assert!(commands::cmd_budget_show(&session(FilterState::for_year(2025), false), &store).is_ok());

    assert!(commands::cmd_budget_clear(&mut store, Some("交通費")).is_err());
    commands::cmd_budget_clear(&mut store, Some("食費")).unwrap();
    assert_eq!(store.budget().unwrap().category_budget("食費"), None);

    commands::cmd_budget_clear(&mut store, None).unwrap();
    assert!(store.budget().unwrap().is_empty());
}

#[test]
fn test_open_store_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");

    let mut store = commands::open_store(Some(path.as_path())).unwrap();
    commands::cmd_budget_set(&mut store, 100000, None).unwrap();

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.budget().unwrap().monthly_budget, Some(100000));
}
