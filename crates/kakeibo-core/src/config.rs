//! Engine configuration
//!
//! Thresholds for insights and anomaly detection plus CLI display limits.
//!
//! ## Configuration Resolution
//!
//! 1. Explicit path (`--config`), when the file exists
//! 2. Override in the config dir (~/.config/kakeibo/config.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Override files only need the keys they change.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::detect::DetectionConfig;
use crate::error::{Error, Result};
use crate::insights::InsightConfig;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/kakeibo.toml");

/// Limits for listings and reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Rows per page in transaction listings
    pub page_size: usize,
    pub ranking_limit: usize,
    pub insight_limit: usize,
    /// Expenses larger than this amount are listed as high expenses
    pub high_expense_threshold: i64,
    pub high_expense_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            ranking_limit: 10,
            insight_limit: 5,
            high_expense_threshold: 10000,
            high_expense_limit: 10,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub insights: InsightConfig,
    pub detection: DetectionConfig,
    pub display: DisplayConfig,
}

impl EngineConfig {
    /// Load using the standard resolution order
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        load_config(explicit_path)
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kakeibo").join("config.toml"))
}

/// Load configuration (explicit path, then override, then embedded default)
pub fn load_config(explicit_path: Option<&Path>) -> Result<EngineConfig> {
    if let Some(path) = explicit_path {
        if path.exists() {
            tracing::debug!(path = %path.display(), "Loading config");
            return parse_config(&read_config(path)?);
        }
        tracing::warn!(path = %path.display(), "Config file not found, using defaults");
    }

    // Check default override location
    if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            tracing::debug!(path = %default_path.display(), "Loading config override");
            return parse_config(&read_config(&default_path)?);
        }
    }

    parse_config(DEFAULT_CONFIG)
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    insights: Option<RawInsights>,
    detection: Option<RawDetection>,
    display: Option<RawDisplay>,
}

#[derive(Debug, Deserialize)]
struct RawInsights {
    min_change_rate: Option<f64>,
    min_difference: Option<i64>,
    top_category_share: Option<f64>,
    priority_rate_weight: Option<f64>,
    default_limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawDetection {
    high_amount_multiplier: Option<f64>,
    high_amount_min_history: Option<usize>,
    frequency_window_days: Option<i64>,
    frequency_threshold: Option<usize>,
    new_high_threshold: Option<i64>,
    duplicate_severity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    page_size: Option<usize>,
    ranking_limit: Option<usize>,
    insight_limit: Option<usize>,
    high_expense_threshold: Option<i64>,
    high_expense_limit: Option<usize>,
}

/// Parse config from TOML content, keeping defaults for missing keys
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(insights) = raw.insights {
        let target = &mut config.insights;
        if let Some(v) = insights.min_change_rate {
            target.min_change_rate = v;
        }
        if let Some(v) = insights.min_difference {
            target.min_difference = v;
        }
        if let Some(v) = insights.top_category_share {
            target.top_category_share = v;
        }
        if let Some(v) = insights.priority_rate_weight {
            target.priority_rate_weight = v;
        }
        if let Some(v) = insights.default_limit {
            target.default_limit = v;
        }
    }

    if let Some(detection) = raw.detection {
        let target = &mut config.detection;
        if let Some(v) = detection.high_amount_multiplier {
            target.high_amount_multiplier = v;
        }
        if let Some(v) = detection.high_amount_min_history {
            target.high_amount_min_history = v;
        }
        if let Some(v) = detection.frequency_window_days {
            target.frequency_window_days = v;
        }
        if let Some(v) = detection.frequency_threshold {
            target.frequency_threshold = v;
        }
        if let Some(v) = detection.new_high_threshold {
            target.new_high_threshold = v;
        }
        if let Some(v) = detection.duplicate_severity {
            target.duplicate_severity = v;
        }
    }

    if let Some(display) = raw.display {
        let target = &mut config.display;
        if let Some(v) = display.page_size {
            target.page_size = v.max(1);
        }
        if let Some(v) = display.ranking_limit {
            target.ranking_limit = v;
        }
        if let Some(v) = display.insight_limit {
            target.insight_limit = v;
        }
        if let Some(v) = display.high_expense_threshold {
            target.high_expense_threshold = v;
        }
        if let Some(v) = display.high_expense_limit {
            target.high_expense_limit = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
            [detection]
            frequency_window_days = 3

            [display]
            page_size = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.detection.frequency_window_days, 3);
        assert_eq!(config.detection.frequency_threshold, 3);
        assert_eq!(config.display.page_size, 50);
        assert_eq!(config.insights, InsightConfig::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse_config("[insights]\nmood = \"sunny\"\n[extras]\nx = 1\n").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse_config("[insights\nmin_difference = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = parse_config("[insights]\nmin_difference = \"lots\"").unwrap_err();
        assert!(err.to_string().contains("Invalid config TOML"));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[insights]\nmin_difference = 8000").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.insights.min_difference, 8000);
    }

    #[test]
    fn test_page_size_never_zero() {
        let config = parse_config("[display]\npage_size = 0").unwrap();
        assert_eq!(config.display.page_size, 1);
    }
}
