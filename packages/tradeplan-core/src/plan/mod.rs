//! Trade plan builder.
//!
//! Splits the portfolio risk budget evenly across the candidate companies and
//! emits one sized, priced row per company.

mod builder;
mod summary;

pub use builder::{
    allocate_risk_per_company, build_plan, position_size, round_cents, sell_target,
};
pub use summary::{plan_portfolio, CompanyAllocation, PlanSummary};
