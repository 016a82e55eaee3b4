//! Required win rate and trade projections.

use serde::{Deserialize, Serialize};

use crate::types::{DerivedRiskFigures, RiskParameters};
use crate::{ensure_finite, ensure_non_negative, ensure_positive, Error, Result};

/// Continuous trade-count projection over a risk budget.
///
/// Values are not rounded; rounding is a presentation concern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TradeProjection {
    /// risk_budget / risk_per_trade
    pub trades_needed: f64,
    /// trades_needed * win_rate
    pub winning_trades: f64,
}

impl TradeProjection {
    pub fn losing_trades(&self) -> f64 {
        self.trades_needed - self.winning_trades
    }
}

/// Solve for the win rate whose profits cover the monthly bills.
///
/// `((monthly_bills / (trades_per_month * risk_per_trade)) + 1) / (reward_to_risk_ratio + 1)`
///
/// The result is deliberately not clamped: values above 1.0 or below 0.0 mean the
/// plan is infeasible as stated and must be surfaced by the caller.
///
/// # Errors
///
/// `InvalidParameter` if `trades_per_month`, `risk_per_trade` or
/// `reward_to_risk_ratio` is zero or negative, or any input is not finite.
pub fn required_win_rate(
    monthly_bills: f64,
    trades_per_month: u32,
    risk_per_trade: f64,
    reward_to_risk_ratio: f64,
) -> Result<f64> {
    ensure_finite("monthly bills", monthly_bills)?;
    if trades_per_month == 0 {
        return Err(Error::InvalidParameter(
            "trades per month must be positive and non-zero".to_string(),
        ));
    }
    ensure_positive("risk per trade", risk_per_trade)?;
    ensure_positive("reward to risk ratio", reward_to_risk_ratio)?;

    let monthly_risk = f64::from(trades_per_month) * risk_per_trade;
    let rate = ((monthly_bills / monthly_risk) + 1.0) / (reward_to_risk_ratio + 1.0);

    // Huge-but-finite inputs can still overflow the intermediate terms.
    if !rate.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "required win rate is not representable for bills {} over {} trades",
            monthly_bills, trades_per_month
        )));
    }

    Ok(rate)
}

/// Project how many trades a risk budget covers and how many of them win.
pub fn projected_trade_counts(
    risk_budget: f64,
    risk_per_trade: f64,
    win_rate: f64,
) -> Result<TradeProjection> {
    ensure_non_negative("risk budget", risk_budget)?;
    ensure_positive("risk per trade", risk_per_trade)?;
    ensure_finite("win rate", win_rate)?;

    let trades_needed = risk_budget / risk_per_trade;
    Ok(TradeProjection {
        trades_needed,
        winning_trades: trades_needed * win_rate,
    })
}

/// Loss if every projected losing trade loses its full risk.
pub fn projected_max_loss(projection: &TradeProjection, risk_per_trade: f64) -> f64 {
    projection.losing_trades() * risk_per_trade
}

/// Derive every risk figure for a planning run.
pub fn derive_risk_figures(params: &RiskParameters) -> Result<DerivedRiskFigures> {
    params.validate()?;

    let max_portfolio_risk = params.max_portfolio_risk();
    let risk_per_trade = params.risk_per_trade();

    let win_rate = required_win_rate(
        params.monthly_bills,
        params.estimated_trades_per_month,
        risk_per_trade,
        params.reward_to_risk_ratio,
    )?;

    let projection = projected_trade_counts(max_portfolio_risk, risk_per_trade, win_rate)?;
    let max_loss = projected_max_loss(&projection, risk_per_trade);

    tracing::debug!(
        max_portfolio_risk,
        risk_per_trade,
        required_win_rate = win_rate,
        "derived risk figures"
    );

    Ok(DerivedRiskFigures {
        max_portfolio_risk,
        risk_per_trade,
        required_win_rate: win_rate,
        projected_trades_needed: projection.trades_needed,
        projected_winning_trades: projection.winning_trades,
        projected_max_loss: max_loss,
    })
}
