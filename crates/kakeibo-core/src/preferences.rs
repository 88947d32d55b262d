//! Saved filters and budget targets
//!
//! Persistence sits behind [`PreferenceStore`] so hosts can pick where
//! preferences live. Two implementations ship here: [`InMemoryStore`] for
//! tests and embedding, and [`JsonFileStore`] which keeps everything in a
//! single JSON document on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{FilterState, Selection};

/// The filter dimensions a saved filter remembers (everything but the year)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilterCriteria {
    pub month: Selection<u32>,
    pub category: Selection<String>,
    pub institution: Selection<String>,
    #[serde(default)]
    pub search_query: String,
}

impl From<&FilterState> for SavedFilterCriteria {
    fn from(filter: &FilterState) -> Self {
        Self {
            month: filter.month.clone(),
            category: filter.category.clone(),
            institution: filter.institution.clone(),
            search_query: filter.search_query.clone(),
        }
    }
}

/// A named filter the user can re-apply later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilter {
    pub id: Uuid,
    pub name: String,
    pub filter: SavedFilterCriteria,
    pub created_at: DateTime<Utc>,
}

impl SavedFilter {
    pub fn new(name: impl Into<String>, filter: &FilterState) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            filter: filter.into(),
            created_at: Utc::now(),
        }
    }

    /// Overlay the saved dimensions on `current`, keeping its year
    pub fn apply(&self, current: &FilterState) -> FilterState {
        FilterState {
            year: current.year,
            month: self.filter.month.clone(),
            category: self.filter.category.clone(),
            institution: self.filter.institution.clone(),
            search_query: self.filter.search_query.clone(),
        }
    }
}

/// Monthly budget targets in yen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetSettings {
    pub monthly_budget: Option<i64>,
    pub category_budgets: BTreeMap<String, i64>,
}

impl BudgetSettings {
    pub fn set_monthly_budget(&mut self, amount: Option<i64>) {
        self.monthly_budget = amount;
    }

    /// `None` removes the category's budget
    pub fn set_category_budget(&mut self, category: &str, amount: Option<i64>) {
        match amount {
            Some(amount) => {
                self.category_budgets.insert(category.to_string(), amount);
            }
            None => {
                self.category_budgets.remove(category);
            }
        }
    }

    pub fn category_budget(&self, category: &str) -> Option<i64> {
        self.category_budgets.get(category).copied()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.monthly_budget.is_none() && self.category_budgets.is_empty()
    }
}

/// Everything a store persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub saved_filters: Vec<SavedFilter>,
    pub budget: BudgetSettings,
}

/// Repository for user preferences
pub trait PreferenceStore {
    /// Saved filters in creation order
    fn list_filters(&self) -> Result<Vec<SavedFilter>>;

    /// Save the current filter under `name`
    fn save_filter(&mut self, name: &str, filter: &FilterState) -> Result<SavedFilter>;

    /// Remove a saved filter; `NotFound` if the id is unknown
    fn delete_filter(&mut self, id: Uuid) -> Result<()>;

    fn budget(&self) -> Result<BudgetSettings>;

    fn save_budget(&mut self, budget: &BudgetSettings) -> Result<()>;

    /// Look a saved filter up by id or, failing that, by exact name
    fn find_filter(&self, key: &str) -> Result<Option<SavedFilter>> {
        let filters = self.list_filters()?;
        let by_id = Uuid::parse_str(key)
            .ok()
            .and_then(|id| filters.iter().find(|f| f.id == id).cloned());
        Ok(by_id.or_else(|| filters.into_iter().find(|f| f.name == key)))
    }
}

fn remove_filter(filters: &mut Vec<SavedFilter>, id: Uuid) -> Result<()> {
    let before = filters.len();
    filters.retain(|f| f.id != id);
    if filters.len() == before {
        return Err(Error::NotFound(format!("Saved filter {}", id)));
    }
    Ok(())
}

/// Preferences held in memory only
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    prefs: Preferences,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryStore {
    fn list_filters(&self) -> Result<Vec<SavedFilter>> {
        Ok(self.prefs.saved_filters.clone())
    }

    fn save_filter(&mut self, name: &str, filter: &FilterState) -> Result<SavedFilter> {
        let saved = SavedFilter::new(name, filter);
        self.prefs.saved_filters.push(saved.clone());
        Ok(saved)
    }

    fn delete_filter(&mut self, id: Uuid) -> Result<()> {
        remove_filter(&mut self.prefs.saved_filters, id)
    }

    fn budget(&self) -> Result<BudgetSettings> {
        Ok(self.prefs.budget.clone())
    }

    fn save_budget(&mut self, budget: &BudgetSettings) -> Result<()> {
        self.prefs.budget = budget.clone();
        Ok(())
    }
}

/// Default preference file location
pub fn default_preferences_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("kakeibo").join("preferences.json"))
}

/// Preferences persisted as one JSON document
///
/// Every mutation rewrites the whole file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    prefs: Preferences,
}

impl JsonFileStore {
    /// Open a store, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let prefs = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Preferences::default()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            Preferences::default()
        };

        tracing::debug!(
            path = %path.display(),
            filters = prefs.saved_filters.len(),
            "Opened preference store"
        );
        Ok(Self { path, prefs })
    }

    /// Open the store at the platform data directory
    pub fn open_default() -> Result<Self> {
        let path = default_preferences_path()
            .ok_or_else(|| Error::Config("No data directory for preferences".to_string()))?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `prefs` to disk, then make it the in-memory state
    ///
    /// On a failed write the store keeps its previous state.
    fn commit(&mut self, prefs: Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&prefs)?;
        fs::write(&self.path, json)?;
        self.prefs = prefs;
        tracing::debug!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    fn list_filters(&self) -> Result<Vec<SavedFilter>> {
        Ok(self.prefs.saved_filters.clone())
    }

    fn save_filter(&mut self, name: &str, filter: &FilterState) -> Result<SavedFilter> {
        let saved = SavedFilter::new(name, filter);
        let mut next = self.prefs.clone();
        next.saved_filters.push(saved.clone());
        self.commit(next)?;
        tracing::info!(id = %saved.id, name = %saved.name, "Saved filter");
        Ok(saved)
    }

    fn delete_filter(&mut self, id: Uuid) -> Result<()> {
        let mut next = self.prefs.clone();
        remove_filter(&mut next.saved_filters, id)?;
        self.commit(next)
    }

    fn budget(&self) -> Result<BudgetSettings> {
        Ok(self.prefs.budget.clone())
    }

    fn save_budget(&mut self, budget: &BudgetSettings) -> Result<()> {
        let next = Preferences {
            budget: budget.clone(),
            ..self.prefs.clone()
        };
        self.commit(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn march_food() -> FilterState {
        FilterState::for_year(2025)
            .with_month(3)
            .with_category("食費")
            .with_search("スーパー")
    }

    #[test]
    fn test_saved_filter_apply_keeps_year() {
        let saved = SavedFilter::new("March food", &march_food());
        let applied = saved.apply(&FilterState::for_year(2024));

        assert_eq!(applied.year, 2024);
        assert_eq!(applied.month, Selection::Only(3));
        assert_eq!(applied.category, Selection::Only("食費".to_string()));
        assert_eq!(applied.institution, Selection::All);
        assert_eq!(applied.search_query, "スーパー");
    }

    #[test]
    fn test_in_memory_filters() {
        let mut store = InMemoryStore::new();
        let first = store.save_filter("first", &march_food()).unwrap();
        store
            .save_filter("second", &FilterState::for_year(2025))
            .unwrap();

        let names: Vec<_> = store
            .list_filters()
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);

        store.delete_filter(first.id).unwrap();
        assert_eq!(store.list_filters().unwrap().len(), 1);

        let err = store.delete_filter(first.id).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_find_filter_by_id_or_name() {
        let mut store = InMemoryStore::new();
        let saved = store.save_filter("groceries", &march_food()).unwrap();

        let by_id = store.find_filter(&saved.id.to_string()).unwrap();
        assert_eq!(by_id.map(|f| f.id), Some(saved.id));

        let by_name = store.find_filter("groceries").unwrap();
        assert_eq!(by_name.map(|f| f.id), Some(saved.id));

        assert!(store.find_filter("missing").unwrap().is_none());
    }

    #[test]
    fn test_budget_settings() {
        let mut budget = BudgetSettings::default();
        assert!(budget.is_empty());

        budget.set_monthly_budget(Some(200000));
        budget.set_category_budget("食費", Some(50000));
        assert_eq!(budget.category_budget("食費"), Some(50000));

        budget.set_category_budget("食費", None);
        assert_eq!(budget.category_budget("食費"), None);
        assert_eq!(budget.monthly_budget, Some(200000));

        budget.clear();
        assert!(budget.is_empty());
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        let saved = store.save_filter("March food", &march_food()).unwrap();
        let mut budget = BudgetSettings::default();
        budget.set_monthly_budget(Some(180000));
        store.save_budget(&budget).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        let filters = reopened.list_filters().unwrap();
        assert_eq!(filters, vec![saved]);
        assert_eq!(reopened.budget().unwrap().monthly_budget, Some(180000));
    }

    #[test]
    fn test_json_store_file_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store
            .save_filter("all months", &FilterState::for_year(2025))
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let filter = &value["savedFilters"][0]["filter"];
        assert_eq!(filter["month"], "all");
        assert_eq!(filter["searchQuery"], "");
        assert!(value["budget"]["monthlyBudget"].is_null());
    }

    #[test]
    fn test_json_store_failed_write_keeps_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        let mut budget = BudgetSettings::default();
        budget.set_monthly_budget(Some(150000));
        store.save_budget(&budget).unwrap();

        // a directory in place of the file makes every write fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.save_filter("March food", &march_food()).is_err());
        assert!(store.list_filters().unwrap().is_empty());

        budget.set_monthly_budget(Some(90000));
        assert!(store.save_budget(&budget).is_err());
        assert_eq!(store.budget().unwrap().monthly_budget, Some(150000));
    }

    #[test]
    fn test_json_store_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
