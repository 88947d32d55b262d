//! Domain models for Kakeibo

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel used by filter fields that do not restrict their dimension
pub const ALL: &str = "all";

/// One ledger line, as handed over by the ingestion side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    /// Merchant or purpose label; anomaly detection groups on this exact string
    pub description: String,
    /// Signed minor units: positive is income, negative is expense
    pub amount: i64,
    pub institution: String,
    pub category: String,
    pub subcategory: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub is_transfer: bool,
    #[serde(default = "default_true")]
    pub is_calculated: bool,
}

fn default_true() -> bool {
    true
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.amount > 0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0
    }

    /// Zero amounts count as income
    pub fn transaction_type(&self) -> TransactionType {
        TransactionType::from_amount(self.amount)
    }

    /// Whether this record is counted toward ledger totals
    pub fn counts_toward_totals(&self) -> bool {
        self.is_calculated && !self.is_transfer
    }

    /// Absolute amount in minor units
    pub fn abs_amount(&self) -> i64 {
        self.amount.abs()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn from_amount(amount: i64) -> Self {
        if amount >= 0 {
            Self::Income
        } else {
            Self::Expense
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A filter dimension that is either unrestricted or pinned to one value
///
/// Serialized as the string `"all"` or as the value itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{}", ALL),
            Self::Only(value) => write!(f, "{}", value),
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(ALL) {
            return Ok(Self::All);
        }
        s.parse()
            .map(Self::Only)
            .map_err(|_| format!("Invalid filter value: {}", s))
    }
}

impl<T: Serialize> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str(ALL),
            Self::Only(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T> Deserialize<'de> for Selection<T>
where
    T: Deserialize<'de> + FromStr,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<T> {
            Text(String),
            Value(T),
        }

        match Raw::<T>::deserialize(deserializer)? {
            Raw::Text(s) if s == ALL => Ok(Self::All),
            Raw::Text(s) => s
                .parse()
                .map(Self::Only)
                .map_err(|_| D::Error::custom(format!("invalid filter value: {}", s))),
            Raw::Value(value) => Ok(Self::Only(value)),
        }
    }
}

/// Active narrowing of the record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Always applied
    pub year: i32,
    /// 1-12
    #[serde(default)]
    pub month: Selection<u32>,
    #[serde(default)]
    pub category: Selection<String>,
    #[serde(default)]
    pub institution: Selection<String>,
    /// Case-insensitive substring match against the description
    #[serde(default)]
    pub search_query: String,
}

impl FilterState {
    /// A filter for a whole year with every other dimension open
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            month: Selection::All,
            category: Selection::All,
            institution: Selection::All,
            search_query: String::new(),
        }
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Selection::Only(month);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Selection::Only(category.into());
        self
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Selection::Only(institution.into());
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::for_year(chrono::Local::now().year())
    }
}

/// Columns the transaction list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    #[default]
    Date,
    Amount,
    Category,
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Category => "category",
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "category" => Ok(Self::Category),
            _ => Err(format!("Unknown sort column: {}", s)),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }
}

/// One page of a larger list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Never less than 1, even for an empty list
    pub total_pages: usize,
}

/// Income and expense for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// 1-12
    pub month: u32,
    pub income: i64,
    /// Always non-negative
    pub expense: i64,
    pub balance: i64,
}

impl MonthlySummary {
    /// Display label ("1".."12")
    pub fn label(&self) -> String {
        self.month.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub amount: i64,
    /// Share of total expense (0-1)
    pub percentage: f64,
    /// Chart color (hex)
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionSummary {
    pub institution: String,
    pub amount: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingItem {
    /// 1-based position after truncation
    pub rank: usize,
    pub subcategory: String,
    /// Parent category of the first record seen for this subcategory
    pub category: String,
    pub amount: i64,
    pub percentage: f64,
}

/// Month-over-month change rates; `None` means there is nothing to compare against
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendData {
    pub income: Option<f64>,
    pub expense: Option<f64>,
    pub balance: Option<f64>,
}

/// Spending on a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySpending {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub total: i64,
    /// Only categories seen on this day; see `DailySpendingResult::amount_for`
    pub category_amounts: BTreeMap<String, i64>,
}

impl DailySpending {
    /// Amount for a category, 0 when nothing was spent on it that day
    pub fn amount_for(&self, category: &str) -> i64 {
        self.category_amounts.get(category).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakDay {
    pub date: NaiveDate,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySpendingResult {
    /// Ascending by date, days without spending are absent
    pub days: Vec<DailySpending>,
    /// Distinct categories observed, sorted
    pub categories: Vec<String>,
    pub total_spending: i64,
    pub average_daily: f64,
    pub peak_day: Option<PeakDay>,
}

/// Expense per category within one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMonthlyPoint {
    pub month: u32,
    pub total: i64,
    pub category_amounts: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMonthlyResult {
    pub points: Vec<CategoryMonthlyPoint>,
    /// Ordered by total expense, largest first
    pub categories: Vec<String>,
    pub total_expense: i64,
}

/// Spending measured against a monthly budget target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub budget: i64,
    pub spent: i64,
    /// Negative when over budget
    pub remaining: i64,
    /// spent / budget, 0 for a zero budget
    pub ratio: f64,
    pub over_budget: bool,
}

/// Kinds of anomaly the detector can flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    /// Far above the merchant's usual amount
    HighAmount,
    /// Many visits to one merchant within a short window
    Frequent,
    /// Large first-ever purchase at a merchant
    NewHigh,
    /// Same day, same amount
    Duplicate,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighAmount => "high_amount",
            Self::Frequent => "frequent",
            Self::NewHigh => "new_high",
            Self::Duplicate => "duplicate",
        }
    }

    /// Short badge label
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighAmount => "High",
            Self::Frequent => "Frequent",
            Self::NewHigh => "New",
            Self::Duplicate => "Duplicate",
        }
    }

    pub fn all() -> &'static [AnomalyType] {
        &[
            Self::HighAmount,
            Self::Frequent,
            Self::NewHigh,
            Self::Duplicate,
        ]
    }
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnomalyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "high_amount" => Ok(Self::HighAmount),
            "frequent" => Ok(Self::Frequent),
            "new_high" => Ok(Self::NewHigh),
            "duplicate" => Ok(Self::Duplicate),
            _ => Err(format!("Unknown anomaly type: {}", s)),
        }
    }
}

/// A flag raised against a single transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub reason: String,
    /// 1-5
    pub severity: u8,
}
