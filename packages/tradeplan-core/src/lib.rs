//! Tradeplan Core - Risk budgeting and trade planning library.
//!
//! This crate turns a watchlist with reference prices and a handful of risk
//! parameters into a concrete per-trade plan:
//!
//! - **Risk model**: risk per trade, required win rate, trade projections, reward tiers
//! - **Plan builder**: uniform risk allocation, position sizing, sell targets, profit
//! - **Candidates**: `ticker,buy_price` files and price-source screening
//! - **Config**: TOML-backed first-run defaults
//!
//! # Example
//!
//! ```rust
//! use tradeplan_core::{plan_portfolio, RiskParameters, TradeCandidate};
//!
//! let params = RiskParameters::default();
//! let candidates = vec![
//!     TradeCandidate::new("AMZN", 215.0).unwrap(),
//!     TradeCandidate::new("TGT", 139.0).unwrap(),
//! ];
//!
//! let summary = plan_portfolio(&params, &candidates).unwrap();
//! println!("Required win rate: {:.2}%", summary.figures.required_win_rate * 100.0);
//! for row in &summary.plan.rows {
//!     println!("{}: {} shares, sell at ${:.2}", row.ticker, row.position_size, row.sell_price);
//! }
//! ```

pub mod candidates;
pub mod config;
pub mod plan;
pub mod report;
pub mod risk;
pub mod types;

// Re-export commonly used types
pub use types::{
    ApiResponse, DerivedRiskFigures, RewardTier, RiskParameters, TradeCandidate, TradePlan,
    TradePlanRow, WinRateFeasibility,
};

// Re-export main functionality
pub use candidates::{
    filter_by_close, read_candidates, write_candidates, PriceSource, StaticPriceSource,
};
pub use config::PlannerConfig;
pub use plan::{
    allocate_risk_per_company, build_plan, plan_portfolio, position_size, round_cents,
    sell_target, CompanyAllocation, PlanSummary,
};
pub use risk::{
    derive_risk_figures, projected_max_loss, projected_trade_counts, required_win_rate,
    reward_for_multiplier, reward_tiers, TradeProjection,
};

/// Error types for tradeplan-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid record on line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("Price source error for {symbol}: {message}")]
    PriceSource { symbol: String, message: String },
}

/// Result type for tradeplan-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reject NaN and infinities, which would otherwise leak through comparisons.
pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "{} must be a finite number, got {}",
            name, value
        )))
    }
}

pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{} must be positive and non-zero, got {}",
            name, value
        )));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(name: &str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{} must not be negative, got {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_wrapped_errors_keep_cause_out_of_message() {
        let parse = toml::from_str::<toml::Value>("risk = [").unwrap_err();
        let err = Error::from(parse);

        assert_eq!(err.to_string(), "Config parse error");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_domain_errors_carry_their_message() {
        let err = Error::InvalidRecord {
            line: 3,
            message: "missing buy_price".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid record on line 3: missing buy_price");
    }
}
