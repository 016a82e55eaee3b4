//! Core data types for the trade planning system.

use serde::{Deserialize, Serialize};

use crate::{ensure_finite, ensure_non_negative, ensure_positive, Error, Result};

/// A tradable company with the price a plan is built against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeCandidate {
    /// Ticker symbol as supplied by the watchlist
    pub ticker: String,
    /// Reference (buy) price per share
    #[serde(rename = "buy_price")]
    pub reference_price: f64,
}

impl TradeCandidate {
    /// Create a candidate, rejecting empty tickers and non-positive prices.
    pub fn new(ticker: &str, reference_price: f64) -> Result<Self> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(Error::InvalidParameter(
                "ticker must not be empty".to_string(),
            ));
        }
        ensure_positive("reference price", reference_price)?;

        Ok(Self {
            ticker: ticker.to_string(),
            reference_price,
        })
    }
}

/// Top-level parameters for a single planning run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskParameters {
    /// Account balance the plan starts from
    pub starting_balance: f64,
    /// Recurring monthly expenses to be covered by trading profit
    pub monthly_bills: f64,
    /// Estimated number of trades per month
    pub estimated_trades_per_month: u32,
    /// Share of the balance put at risk across the portfolio (0.25 = 25%)
    pub max_portfolio_risk_pct: f64,
    /// Share of the max portfolio risk risked on one trade (0.02 = 2%)
    pub risk_per_trade_pct: f64,
    /// Target reward per unit of risk (3.0 = 3:1)
    pub reward_to_risk_ratio: f64,
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            starting_balance: 35_000.0,
            monthly_bills: 3_500.0,
            estimated_trades_per_month: 50,
            max_portfolio_risk_pct: 0.25,
            risk_per_trade_pct: 0.02,
            reward_to_risk_ratio: 3.0,
        }
    }
}

impl RiskParameters {
    /// Check every field against its documented domain.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("starting balance", self.starting_balance)?;
        ensure_non_negative("monthly bills", self.monthly_bills)?;
        if self.estimated_trades_per_month == 0 {
            return Err(Error::InvalidParameter(
                "estimated trades per month must be positive and non-zero".to_string(),
            ));
        }
        ensure_fraction("max portfolio risk", self.max_portfolio_risk_pct)?;
        ensure_fraction("risk per trade", self.risk_per_trade_pct)?;
        ensure_positive("reward to risk ratio", self.reward_to_risk_ratio)?;
        Ok(())
    }

    /// Money at risk across the whole portfolio.
    pub fn max_portfolio_risk(&self) -> f64 {
        self.starting_balance * self.max_portfolio_risk_pct
    }

    /// Money at risk on a single trade.
    pub fn risk_per_trade(&self) -> f64 {
        self.max_portfolio_risk() * self.risk_per_trade_pct
    }
}

fn ensure_fraction(name: &str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value <= 0.0 || value > 1.0 {
        return Err(Error::InvalidParameter(format!(
            "{} must be a fraction in (0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Figures derived once from [`RiskParameters`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedRiskFigures {
    /// starting_balance * max_portfolio_risk_pct
    pub max_portfolio_risk: f64,
    /// max_portfolio_risk * risk_per_trade_pct
    pub risk_per_trade: f64,
    /// Win rate needed to cover monthly bills (not clamped)
    pub required_win_rate: f64,
    /// Trades the max portfolio risk budget covers
    pub projected_trades_needed: f64,
    /// Expected winners among those trades
    pub projected_winning_trades: f64,
    /// Loss if every projected losing trade hits its stop
    pub projected_max_loss: f64,
}

impl DerivedRiskFigures {
    /// Classify the required win rate.
    pub fn feasibility(&self) -> WinRateFeasibility {
        WinRateFeasibility::classify(self.required_win_rate)
    }
}

/// Whether a required win rate is achievable as a probability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WinRateFeasibility {
    /// Within 0% to 100%
    Feasible,
    /// Above 100%: the plan cannot cover the bills as stated
    ExceedsCertainty,
    /// Below 0%: the inputs are inconsistent
    Negative,
}

impl WinRateFeasibility {
    pub fn classify(win_rate: f64) -> Self {
        if win_rate > 1.0 {
            Self::ExceedsCertainty
        } else if win_rate < 0.0 {
            Self::Negative
        } else {
            Self::Feasible
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible)
    }
}

/// Potential reward at a fixed reward:risk multiple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardTier {
    /// Ratio label, e.g. "3:1"
    pub label: String,
    /// Reward multiple of the risked amount
    pub multiplier: u32,
    /// risk_amount * multiplier
    pub reward: f64,
}

/// One planned trade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradePlanRow {
    pub ticker: String,
    pub buy_price: f64,
    /// Whole shares only
    pub position_size: u64,
    /// Sell target rounded to cents
    pub sell_price: f64,
    /// Projected profit rounded to cents
    #[serde(rename = "profit")]
    pub projected_profit: f64,
}

impl TradePlanRow {
    /// Create a row from already-rounded figures.
    ///
    /// An unfunded row (zero shares) must carry zero profit.
    pub fn new(
        ticker: &str,
        buy_price: f64,
        position_size: u64,
        sell_price: f64,
        projected_profit: f64,
    ) -> Result<Self> {
        if ticker.trim().is_empty() {
            return Err(Error::InvalidParameter(
                "ticker must not be empty".to_string(),
            ));
        }
        ensure_positive("buy price", buy_price)?;
        ensure_finite("sell price", sell_price)?;
        ensure_finite("projected profit", projected_profit)?;
        if position_size == 0 && projected_profit != 0.0 {
            return Err(Error::InvalidParameter(format!(
                "row for {} has no shares but a profit of {}",
                ticker, projected_profit
            )));
        }

        Ok(Self {
            ticker: ticker.to_string(),
            buy_price,
            position_size,
            sell_price,
            projected_profit,
        })
    }
}

/// Ordered plan rows plus their aggregate profit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradePlan {
    /// Rows in candidate input order
    pub rows: Vec<TradePlanRow>,
    /// Sum of row profits, rounded to cents
    pub total_projected_profit: f64,
}

impl TradePlan {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that end up with at least one share.
    pub fn funded_rows(&self) -> impl Iterator<Item = &TradePlanRow> {
        self.rows.iter().filter(|r| r.position_size > 0)
    }
}

/// API response wrapper for success cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
