//! Per-company sizing and pricing.

use crate::types::{TradeCandidate, TradePlan, TradePlanRow};
use crate::{ensure_finite, ensure_non_negative, ensure_positive, Error, Result};

/// Split a risk budget evenly across `company_count` companies.
///
/// # Errors
///
/// `InvalidParameter` when there are no companies or the budget is negative.
pub fn allocate_risk_per_company(total_risk_budget: f64, company_count: usize) -> Result<f64> {
    if company_count == 0 {
        return Err(Error::InvalidParameter(
            "company count must be positive and non-zero".to_string(),
        ));
    }
    ensure_non_negative("total risk budget", total_risk_budget)?;

    Ok(total_risk_budget / company_count as f64)
}

/// Sell target for a buy price.
///
/// The win rate is applied directly as a price-appreciation factor:
/// `buy_price * (1 + win_rate)`.
pub fn sell_target(buy_price: f64, win_rate: f64) -> Result<f64> {
    ensure_positive("buy price", buy_price)?;
    ensure_finite("win rate", win_rate)?;

    Ok(buy_price + buy_price * win_rate)
}

/// Whole shares affordable with the allocated risk, truncated toward zero.
pub fn position_size(risk_per_company: f64, buy_price: f64) -> Result<u64> {
    ensure_non_negative("risk per company", risk_per_company)?;
    ensure_positive("buy price", buy_price)?;

    // Both operands are non-negative, so the cast only saturates on overflow.
    Ok((risk_per_company / buy_price).floor() as u64)
}

/// Round a monetary figure to cents.
///
/// Rounds the exact binary value, with exact ties going to the even cent, so
/// `1.115` (stored just below the tie) becomes `1.11` and `1.125` becomes `1.12`.
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Build one plan row per candidate, in input order.
///
/// Sell price and profit are rounded to cents per row; the profit itself is
/// computed from the unrounded sell target. The total is the sum of the
/// rounded row profits.
///
/// # Errors
///
/// `EmptyInput` when `candidates` is empty, `InvalidParameter` for a negative
/// allocation, a non-finite win rate, or a non-positive candidate price.
pub fn build_plan(
    candidates: &[TradeCandidate],
    risk_per_company: f64,
    win_rate: f64,
) -> Result<TradePlan> {
    if candidates.is_empty() {
        return Err(Error::EmptyInput(
            "no companies to build a trade plan for".to_string(),
        ));
    }
    ensure_non_negative("risk per company", risk_per_company)?;
    ensure_finite("win rate", win_rate)?;

    let mut rows = Vec::with_capacity(candidates.len());
    let mut total = 0.0;

    for candidate in candidates {
        let buy_price = candidate.reference_price;
        let shares = position_size(risk_per_company, buy_price)?;
        let sell_price = sell_target(buy_price, win_rate)?;
        let profit = if shares == 0 {
            0.0
        } else {
            (sell_price - buy_price) * shares as f64
        };

        let row = TradePlanRow::new(
            &candidate.ticker,
            buy_price,
            shares,
            round_cents(sell_price),
            round_cents(profit),
        )?;

        tracing::trace!(
            ticker = %row.ticker,
            shares = row.position_size,
            sell_price = row.sell_price,
            profit = row.projected_profit,
            "planned trade"
        );

        total += row.projected_profit;
        rows.push(row);
    }

    Ok(TradePlan {
        rows,
        total_projected_profit: round_cents(total),
    })
}
