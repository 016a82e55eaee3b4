//! Plain-text rendering of a planning run.
//!
//! Only formats figures already held by [`PlanSummary`]; no arithmetic beyond
//! unit conversion for display happens here.

use crate::plan::PlanSummary;
use crate::types::WinRateFeasibility;

/// Render the full sectioned report for a planning run.
pub fn render_text(summary: &PlanSummary) -> String {
    let params = &summary.parameters;
    let figures = &summary.figures;
    let allocation = &summary.allocation;
    let plan = &summary.plan;

    let mut lines = Vec::new();

    lines.push("=== Target Goals Calculation ===".to_string());
    lines.push(format!(
        "Distributed ${:.2} to cover ${:.2} in bills",
        figures.max_portfolio_risk, params.monthly_bills
    ));
    lines.push(format!(
        "Trades Needed to Reach Goal: {:.2}",
        figures.projected_trades_needed
    ));
    lines.push(format!(
        "Expected Winning Trades:      {:.2}",
        figures.projected_winning_trades
    ));
    lines.push(format!(
        "Max Possible Loss:            ${:.2}",
        figures.projected_max_loss
    ));
    lines.push(String::new());

    lines.push("=== Risk to Reward Summary for a Single Trade ===".to_string());
    for tier in &summary.reward_tiers {
        lines.push(format!("{} => ${:.2}", tier.label, tier.reward));
    }
    lines.push(String::new());

    lines.push("=== Portfolio Risk Management ===".to_string());
    lines.push(format!(
        "Max Portfolio Risk ({:.0}%): ${:.2}",
        params.max_portfolio_risk_pct * 100.0,
        figures.max_portfolio_risk
    ));
    lines.push(format!(
        "Risk per Trade ({:.0}%):      ${:.2}",
        params.risk_per_trade_pct * 100.0,
        figures.risk_per_trade
    ));
    lines.push(String::new());

    lines.push("=== Dynamic Allocation Across Companies ===".to_string());
    lines.push(format!("Number of Companies:   {}", allocation.company_count));
    lines.push(format!(
        "Risk per Company:      ${:.2}",
        allocation.risk_per_company
    ));
    lines.push(format!(
        "Forecasted Win Rate:   {:.2} (per-company calc)",
        allocation.per_company_win_rate
    ));
    lines.push(format!(
        "Matches {:.2} total win rate across ${:.2} allocated to cover ${:.2} bills",
        figures.required_win_rate, figures.max_portfolio_risk, params.monthly_bills
    ));
    lines.push(String::new());

    lines.push("=== Proposed Trade Plan ===".to_string());
    for row in &plan.rows {
        lines.push(format!(
            "Ticker: {} | Buy Price: ${:.2} | Shares: {} | Sell Price: ${:.2} | Potential Profit: ${:.2}",
            row.ticker, row.buy_price, row.position_size, row.sell_price, row.projected_profit
        ));
    }
    lines.push(String::new());

    lines.push("=== Summary ===".to_string());
    lines.push(format!(
        "Starting Balance:           ${:.2}",
        params.starting_balance
    ));
    lines.push(format!(
        "Trades Needed (Estimate):   {:.0}",
        figures.projected_trades_needed
    ));
    lines.push(format!(
        "Expected Winning Trades:    {:.1}",
        figures.projected_winning_trades
    ));
    lines.push(format!(
        "Max Portfolio Risk ({:.0}%):   ${:.2}",
        params.max_portfolio_risk_pct * 100.0,
        figures.max_portfolio_risk
    ));
    lines.push(format!(
        "Total Potential Profit:     ${:.2}",
        plan.total_projected_profit
    ));
    lines.push(String::new());

    lines.push(format!(
        "To cover ${:.2} in bills with {:.0} trades/month, risking ${:.2} each, at {:.1}:1 R:R, \
         you need a win rate of at least {:.2}%.",
        params.monthly_bills,
        figures.projected_trades_needed,
        figures.risk_per_trade,
        params.reward_to_risk_ratio,
        figures.required_win_rate * 100.0
    ));
    lines.push(String::new());
    lines.push(feasibility_message(figures.feasibility()).to_string());

    lines.join("\n")
}

/// User-facing sentence for a win-rate classification.
pub fn feasibility_message(feasibility: WinRateFeasibility) -> &'static str {
    match feasibility {
        WinRateFeasibility::Feasible => {
            "This required win rate is within a feasible 0% to 100% range."
        }
        WinRateFeasibility::ExceedsCertainty => {
            "Warning: Required win rate is over 100%. This plan is not realistic."
        }
        WinRateFeasibility::Negative => {
            "Warning: Calculated win rate is negative. Check input assumptions."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::plan_portfolio;
    use crate::types::{RiskParameters, TradeCandidate};

    fn summary(params: &RiskParameters) -> PlanSummary {
        let candidates = vec![
            TradeCandidate::new("AMZN", 215.0).unwrap(),
            TradeCandidate::new("TGT", 139.0).unwrap(),
        ];
        plan_portfolio(params, &candidates).unwrap()
    }

    #[test]
    fn test_render_sections() {
        let text = render_text(&summary(&RiskParameters::default()));

        assert!(text.contains("=== Target Goals Calculation ==="));
        assert!(text.contains("Distributed $8750.00 to cover $3500.00 in bills"));
        assert!(text.contains("3:1 => $525.00"));
        assert!(text.contains("Max Portfolio Risk (25%): $8750.00"));
        assert!(text.contains("Risk per Trade (2%):      $175.00"));
        assert!(text.contains("Number of Companies:   2"));
        assert!(text.contains("Risk per Company:      $4375.00"));
        assert!(text.contains("Ticker: AMZN | Buy Price: $215.00 | Shares: 20"));
        assert!(text.contains("you need a win rate of at least 35.00%."));
        assert!(text.ends_with(feasibility_message(WinRateFeasibility::Feasible)));
    }

    #[test]
    fn test_render_rows_in_plan_order() {
        let text = render_text(&summary(&RiskParameters::default()));
        let amzn = text.find("Ticker: AMZN").unwrap();
        let tgt = text.find("Ticker: TGT").unwrap();
        assert!(amzn < tgt);
    }

    #[test]
    fn test_render_break_even_uses_projected_trades() {
        // 8750 / 175 = 50 trades fit the budget regardless of the estimate.
        let params = RiskParameters {
            estimated_trades_per_month: 20,
            ..Default::default()
        };
        let text = render_text(&summary(&params));
        assert!(text.contains("To cover $3500.00 in bills with 50 trades/month, risking $175.00 each"));
    }

    #[test]
    fn test_render_infeasible_warning() {
        let params = RiskParameters {
            monthly_bills: 50_000.0,
            ..Default::default()
        };
        let text = render_text(&summary(&params));
        assert!(text.contains("Warning: Required win rate is over 100%"));
    }
}
