//! Anomaly detection algorithms
//!
//! Detects:
//! - High amounts: far above what a merchant usually charges
//! - Frequent use: many visits to the same merchant within a week
//! - New highs: a large first-ever purchase at a merchant
//! - Duplicates: the same amount charged twice on the same day
//!
//! Detection always runs over the whole ledger, independent of any active
//! filter. Only calculation-eligible expenses are considered. Merchants are
//! identified by their exact description string.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::format::{format_amount, format_amount_f64};
use crate::models::{Anomaly, AnomalyType, Transaction};

/// Per-transaction anomaly flags; ids without anomalies are absent
pub type AnomalyMap = BTreeMap<String, Vec<Anomaly>>;

const MAX_SEVERITY: u8 = 5;

/// Detection configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Multiple of the merchant average that counts as a high amount
    pub high_amount_multiplier: f64,
    /// Minimum history points at a merchant before high amounts are judged
    pub high_amount_min_history: usize,
    /// Half-width of the frequency window, in days (inclusive)
    pub frequency_window_days: i64,
    /// Visits within the window that count as frequent
    pub frequency_threshold: usize,
    /// First-purchase amount (yen) that counts as a new high
    pub new_high_threshold: i64,
    /// Fixed severity for same-day same-amount duplicates
    pub duplicate_severity: u8,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            high_amount_multiplier: 3.0,
            high_amount_min_history: 3,
            frequency_window_days: 7,
            frequency_threshold: 3,
            new_high_threshold: 10000,
            duplicate_severity: 4,
        }
    }
}

/// Results summary of a detection run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DetectionResults {
    pub scanned: usize,
    pub high_amounts_detected: usize,
    pub frequent_detected: usize,
    pub new_highs_detected: usize,
    pub duplicates_detected: usize,
    pub flagged_transactions: usize,
}

/// Main detector that runs all heuristics
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: DetectionConfig,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run all heuristics and merge the flags per transaction id
    pub fn detect_all(&self, records: &[Transaction]) -> AnomalyMap {
        self.detect_all_with_results(records).0
    }

    /// Run all heuristics, also returning per-heuristic counts
    pub fn detect_all_with_results(
        &self,
        records: &[Transaction],
    ) -> (AnomalyMap, DetectionResults) {
        let expenses: Vec<&Transaction> = records
            .iter()
            .filter(|t| t.is_expense() && t.counts_toward_totals())
            .collect();

        let mut results = DetectionResults {
            scanned: expenses.len(),
            ..Default::default()
        };

        if expenses.is_empty() {
            return (AnomalyMap::new(), results);
        }

        let high = self.detect_high_amount(&expenses);
        let frequent = self.detect_frequent(&expenses);
        let new_high = self.detect_new_high(&expenses);
        let duplicate = self.detect_duplicate(&expenses);

        results.high_amounts_detected = high.len();
        results.frequent_detected = frequent.len();
        results.new_highs_detected = new_high.len();
        results.duplicates_detected = duplicate.len();

        let map = merge_anomalies(
            high.into_iter()
                .chain(frequent)
                .chain(new_high)
                .chain(duplicate),
        );
        results.flagged_transactions = map.len();

        debug!(
            scanned = results.scanned,
            high_amount = results.high_amounts_detected,
            frequent = results.frequent_detected,
            new_high = results.new_highs_detected,
            duplicate = results.duplicates_detected,
            flagged = results.flagged_transactions,
            "Anomaly detection complete"
        );

        (map, results)
    }

    /// Amounts at least `high_amount_multiplier` times the merchant's average
    ///
    /// Each transaction is judged against the earlier purchases at the same
    /// merchant (ascending date order), never against itself.
    fn detect_high_amount(&self, expenses: &[&Transaction]) -> Vec<Anomaly> {
        let mut sorted: Vec<&Transaction> = expenses.to_vec();
        sorted.sort_by_key(|t| t.date);

        // description -> (sum, count) of purchases seen so far
        let mut history: HashMap<&str, (i64, usize)> = HashMap::new();
        let mut anomalies = Vec::new();

        for t in sorted {
            let amount = t.abs_amount();
            let entry = history.entry(t.description.as_str()).or_insert((0, 0));
            let (sum, count) = *entry;
            entry.0 += amount;
            entry.1 += 1;

            if count < self.config.high_amount_min_history.max(1) || sum <= 0 {
                continue;
            }
            let average = sum as f64 / count as f64;
            if (amount as f64) < average * self.config.high_amount_multiplier {
                continue;
            }

            let times = amount as f64 / average;
            anomalies.push(Anomaly {
                transaction_id: t.id.clone(),
                anomaly_type: AnomalyType::HighAmount,
                reason: format!(
                    "About {}x the usual amount (average {})",
                    times.round() as i64,
                    format_amount_f64(average)
                ),
                severity: clamp_severity(times.ceil() as i64),
            });
        }
        anomalies
    }

    /// Merchants visited `frequency_threshold` or more times within the window
    ///
    /// Each transaction is the center of its own window and is flagged when
    /// its window holds enough visits (itself included). Quadratic within a
    /// merchant group, which stays small for household ledgers.
    fn detect_frequent(&self, expenses: &[&Transaction]) -> Vec<Anomaly> {
        let window = self.config.frequency_window_days;

        let mut sorted: Vec<&Transaction> = expenses.to_vec();
        sorted.sort_by_key(|t| t.date);

        let mut groups: Vec<(&str, Vec<&Transaction>)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for t in sorted {
            let key = t.description.as_str();
            match index.get(key) {
                Some(&i) => groups[i].1.push(t),
                None => {
                    index.insert(key, groups.len());
                    groups.push((key, vec![t]));
                }
            }
        }

        let mut anomalies = Vec::new();
        for (_, list) in groups {
            if list.len() < self.config.frequency_threshold {
                continue;
            }
            for current in &list {
                let count = list
                    .iter()
                    .filter(|other| (current.date - other.date).num_days().abs() <= window)
                    .count();
                if count >= self.config.frequency_threshold {
                    anomalies.push(Anomaly {
                        transaction_id: current.id.clone(),
                        anomaly_type: AnomalyType::Frequent,
                        reason: format!(
                            "{} uses within {} days",
                            count, self.config.frequency_window_days
                        ),
                        severity: clamp_severity(count as i64 - 1),
                    });
                }
            }
        }
        anomalies
    }

    /// Large amounts on the first-ever visit to a merchant
    fn detect_new_high(&self, expenses: &[&Transaction]) -> Vec<Anomaly> {
        let mut sorted: Vec<&Transaction> = expenses.to_vec();
        sorted.sort_by_key(|t| t.date);

        let threshold = self.config.new_high_threshold.max(1);
        let mut seen: HashSet<&str> = HashSet::new();
        let mut anomalies = Vec::new();

        for t in sorted {
            let amount = t.abs_amount();
            if seen.insert(t.description.as_str()) && amount >= threshold {
                anomalies.push(Anomaly {
                    transaction_id: t.id.clone(),
                    anomaly_type: AnomalyType::NewHigh,
                    reason: format!(
                        "First purchase at this merchant: {}",
                        format_amount(amount)
                    ),
                    severity: clamp_severity((amount + threshold - 1) / threshold),
                });
            }
        }
        anomalies
    }

    /// Two or more charges with the same signed amount on the same day
    fn detect_duplicate(&self, expenses: &[&Transaction]) -> Vec<Anomaly> {
        let mut groups: Vec<Vec<&Transaction>> = Vec::new();
        let mut index: HashMap<(chrono::NaiveDate, i64), usize> = HashMap::new();
        for &t in expenses {
            match index.get(&(t.date, t.amount)) {
                Some(&i) => groups[i].push(t),
                None => {
                    index.insert((t.date, t.amount), groups.len());
                    groups.push(vec![t]);
                }
            }
        }

        groups
            .into_iter()
            .filter(|list| list.len() >= 2)
            .flat_map(|list| {
                let size = list.len();
                list.into_iter().map(move |t| Anomaly {
                    transaction_id: t.id.clone(),
                    anomaly_type: AnomalyType::Duplicate,
                    reason: format!(
                        "{} transactions of {} on the same day",
                        size,
                        format_amount(t.amount)
                    ),
                    severity: self.config.duplicate_severity.clamp(1, MAX_SEVERITY),
                })
            })
            .collect()
    }
}

/// Detect anomalies with the default configuration
pub fn detect_anomalies(records: &[Transaction]) -> AnomalyMap {
    AnomalyDetector::new().detect_all(records)
}

fn clamp_severity(raw: i64) -> u8 {
    raw.clamp(1, MAX_SEVERITY as i64) as u8
}

/// Group anomalies by transaction id, keeping the first of each type
fn merge_anomalies(anomalies: impl IntoIterator<Item = Anomaly>) -> AnomalyMap {
    let mut seen: HashSet<(String, AnomalyType)> = HashSet::new();
    let mut map = AnomalyMap::new();

    for anomaly in anomalies {
        if seen.insert((anomaly.transaction_id.clone(), anomaly.anomaly_type)) {
            map.entry(anomaly.transaction_id.clone())
                .or_default()
                .push(anomaly);
        }
    }
    map
}
