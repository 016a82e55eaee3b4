//! End-to-end planning run.

use serde::{Deserialize, Serialize};

use super::builder::{allocate_risk_per_company, build_plan};
use crate::risk::{derive_risk_figures, reward_tiers};
use crate::types::{
    DerivedRiskFigures, RewardTier, RiskParameters, TradeCandidate, TradePlan,
};
use crate::{Error, Result};

/// How the portfolio risk budget was split across companies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyAllocation {
    /// Number of companies sharing the budget
    pub company_count: usize,
    /// max_portfolio_risk / company_count
    pub risk_per_company: f64,
    /// required_win_rate / (company_count / 100)
    pub per_company_win_rate: f64,
}

/// Everything a presentation layer needs to render one planning run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    pub parameters: RiskParameters,
    pub figures: DerivedRiskFigures,
    /// Reward tiers for a single trade at the derived risk per trade
    pub reward_tiers: Vec<RewardTier>,
    pub allocation: CompanyAllocation,
    pub plan: TradePlan,
}

/// Run the full planning flow for a set of parameters and candidates.
///
/// Parameters are validated and the risk figures derived first, then the max
/// portfolio risk is split evenly across the candidates and the required win
/// rate is used as the sell-target multiplier for every row.
pub fn plan_portfolio(
    params: &RiskParameters,
    candidates: &[TradeCandidate],
) -> Result<PlanSummary> {
    let figures = derive_risk_figures(params)?;

    if candidates.is_empty() {
        return Err(Error::EmptyInput("no companies found to plan for".to_string()));
    }

    let company_count = candidates.len();
    let risk_per_company = allocate_risk_per_company(figures.max_portfolio_risk, company_count)?;
    let per_company_win_rate = figures.required_win_rate / (company_count as f64 / 100.0);

    let plan = build_plan(candidates, risk_per_company, figures.required_win_rate)?;

    tracing::debug!(
        company_count,
        risk_per_company,
        total_projected_profit = plan.total_projected_profit,
        "built trade plan"
    );

    Ok(PlanSummary {
        parameters: params.clone(),
        reward_tiers: reward_tiers(figures.risk_per_trade),
        figures,
        allocation: CompanyAllocation {
            company_count,
            risk_per_company,
            per_company_win_rate,
        },
        plan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn watchlist() -> Vec<TradeCandidate> {
        vec![
            TradeCandidate::new("AMZN", 215.0).unwrap(),
            TradeCandidate::new("TGT", 139.0).unwrap(),
            TradeCandidate::new("NVDA", 135.5).unwrap(),
            TradeCandidate::new("GOOGL", 190.25).unwrap(),
            TradeCandidate::new("MSFT", 198.75).unwrap(),
        ]
    }

    #[test]
    fn test_plan_portfolio_defaults() {
        let summary = plan_portfolio(&RiskParameters::default(), &watchlist()).unwrap();

        assert_relative_eq!(summary.figures.required_win_rate, 0.35, epsilon = 1e-12);
        assert_eq!(summary.allocation.company_count, 5);
        assert_relative_eq!(summary.allocation.risk_per_company, 1750.0);
        // 0.35 / (5 / 100)
        assert_relative_eq!(summary.allocation.per_company_win_rate, 7.0, epsilon = 1e-9);

        assert_eq!(summary.reward_tiers.len(), 4);
        assert_relative_eq!(summary.reward_tiers[2].reward, 525.0);

        assert_eq!(summary.plan.len(), 5);
        assert_eq!(summary.plan.rows[0].ticker, "AMZN");
        // floor(1750 / 215) = 8
        assert_eq!(summary.plan.rows[0].position_size, 8);
        // floor(1750 / 139) = 12
        assert_eq!(summary.plan.rows[1].position_size, 12);
    }

    #[test]
    fn test_plan_portfolio_uniform_allocation_covers_budget() {
        let summary = plan_portfolio(&RiskParameters::default(), &watchlist()).unwrap();
        let allocated =
            summary.allocation.risk_per_company * summary.allocation.company_count as f64;
        assert_relative_eq!(allocated, summary.figures.max_portfolio_risk, epsilon = 1e-9);
    }

    #[test]
    fn test_plan_portfolio_total_matches_rows() {
        let summary = plan_portfolio(&RiskParameters::default(), &watchlist()).unwrap();
        let sum: f64 = summary.plan.rows.iter().map(|r| r.projected_profit).sum();
        assert_relative_eq!(summary.plan.total_projected_profit, sum, epsilon = 1e-6);
    }

    #[test]
    fn test_plan_portfolio_empty_candidates() {
        let result = plan_portfolio(&RiskParameters::default(), &[]);
        assert!(matches!(result, Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_plan_portfolio_invalid_parameters_win_over_empty_input() {
        let params = RiskParameters {
            reward_to_risk_ratio: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            plan_portfolio(&params, &[]),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_plan_portfolio_infeasible_win_rate_still_plans() {
        let params = RiskParameters {
            monthly_bills: 50_000.0,
            ..Default::default()
        };
        let summary = plan_portfolio(&params, &watchlist()).unwrap();
        assert!(summary.figures.required_win_rate > 1.0);
        assert!(!summary.figures.feasibility().is_feasible());
        assert_eq!(summary.plan.len(), 5);
    }
}
