//! Anomaly command implementation

use anyhow::{anyhow, Result};
use kakeibo_core::format::format_amount;
use kakeibo_core::{Anomaly, AnomalyDetector, AnomalyType, Transaction};
use serde::Serialize;

use super::{truncate, Session};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlaggedTransaction<'a> {
    transaction: &'a Transaction,
    anomalies: Vec<&'a Anomaly>,
}

/// Detect over the whole ledger, then show flags for transactions in the current view
pub fn cmd_anomalies(session: &Session, kind: Option<&str>, min_severity: u8) -> Result<()> {
    let kind = kind
        .map(|k| k.parse::<AnomalyType>().map_err(|e| anyhow!(e)))
        .transpose()?;

    let detector = AnomalyDetector::with_config(session.config.detection.clone());
    let (anomalies, results) = detector.detect_all_with_results(&session.records);
    let view = session.view();

    let mut flagged: Vec<FlaggedTransaction> = view
        .iter()
        .filter_map(|t| {
            let matching: Vec<&Anomaly> = anomalies
                .get(&t.id)?
                .iter()
                .filter(|a| a.severity >= min_severity)
                .filter(|a| kind.map_or(true, |k| a.anomaly_type == k))
                .collect();
            (!matching.is_empty()).then_some(FlaggedTransaction {
                transaction: t,
                anomalies: matching,
            })
        })
        .collect();

    // Most severe first, then newest
    flagged.sort_by(|a, b| {
        let sa = a.anomalies.iter().map(|x| x.severity).max();
        let sb = b.anomalies.iter().map(|x| x.severity).max();
        sb.cmp(&sa)
            .then_with(|| b.transaction.date.cmp(&a.transaction.date))
    });

    tracing::debug!(
        scanned = results.scanned,
        flagged = results.flagged_transactions,
        shown = flagged.len(),
        "Anomaly detection complete"
    );

    if session.json {
        return super::print_json(&flagged);
    }

    println!();
    println!("🔍 Anomalies ({})", session.period_label());
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Scanned {} expenses: {} high, {} frequent, {} new, {} duplicate",
        results.scanned,
        results.high_amounts_detected,
        results.frequent_detected,
        results.new_highs_detected,
        results.duplicates_detected
    );

    if flagged.is_empty() {
        println!("   No anomalies in this view. ✓");
        return Ok(());
    }

    for entry in &flagged {
        let t = entry.transaction;
        println!();
        println!(
            "   {} │ {:>10} │ {}",
            t.date,
            format_amount(t.amount),
            truncate(&t.description, 36)
        );
        for a in &entry.anomalies {
            println!(
                "      [{}] {} {}",
                a.anomaly_type.label(),
                "●".repeat(a.severity as usize),
                a.reason
            );
        }
    }

    Ok(())
}
