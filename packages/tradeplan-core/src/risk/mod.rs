//! Risk model.
//!
//! Converts a risk budget and reward:risk target into a required win rate,
//! trade-count projections, and reward tiers. Everything here is a pure function.

mod rewards;
mod win_rate;

pub use rewards::{reward_for_multiplier, reward_tiers, REWARD_MULTIPLIERS};
pub use win_rate::{
    derive_risk_figures, projected_max_loss, projected_trade_counts, required_win_rate,
    TradeProjection,
};
