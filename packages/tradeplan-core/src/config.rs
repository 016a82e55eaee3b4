//! Planner configuration and first-run defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::RiskParameters;
use crate::{ensure_positive, Result};

/// Persisted planner settings.
///
/// Every field falls back to its default when absent from the file, so a
/// partial config only overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Candidate list used when no file is given explicitly
    pub candidates_file: PathBuf,
    /// Symbols screened when refreshing the candidate list
    pub watchlist: Vec<String>,
    /// Highest last close a screened symbol may have
    pub max_close_price: f64,
    /// Starting risk parameters
    pub risk: RiskParameters,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            candidates_file: PathBuf::from("companies_to_trade.csv"),
            watchlist: ["AMZN", "TGT", "NVDA", "GOOGL", "MSFT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_close_price: 200.0,
            risk: RiskParameters::default(),
        }
    }
}

impl PlannerConfig {
    /// Get the default config file path.
    ///
    /// Default path: `~/.tradeplan/config.toml`
    /// Can be overridden with `TRADEPLAN_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("TRADEPLAN_CONFIG") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".tradeplan/config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, self.to_toml()?)?;
        tracing::info!(path = %path.display(), "saved planner config");
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.risk.validate()?;
        ensure_positive("max close price", self.max_close_price)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.risk, RiskParameters::default());
        assert_eq!(config.candidates_file, PathBuf::from("companies_to_trade.csv"));
        assert_eq!(config.watchlist.len(), 5);
        assert_eq!(config.max_close_price, 200.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PlannerConfig::from_toml(
            r#"
            max_close_price = 150.0

            [risk]
            starting_balance = 50000.0
            reward_to_risk_ratio = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.max_close_price, 150.0);
        assert_eq!(config.risk.starting_balance, 50_000.0);
        assert_eq!(config.risk.reward_to_risk_ratio, 2.0);
        assert_eq!(config.risk.monthly_bills, 3_500.0);
        assert_eq!(config.risk.estimated_trades_per_month, 50);
        assert_eq!(config.watchlist, PlannerConfig::default().watchlist);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = PlannerConfig::from_toml("[risk]\nrisk_per_trade_pct = 0.0\n");
        assert!(matches!(result, Err(Error::InvalidParameter(_))));

        let result = PlannerConfig::from_toml("max_close_price = -1.0\n");
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = PlannerConfig::from_toml("risk = [");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = PlannerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = PlannerConfig::default();
        config.risk.monthly_bills = 4200.0;
        config.watchlist = vec!["AAPL".to_string()];
        config.save(&path).unwrap();

        let loaded = PlannerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
