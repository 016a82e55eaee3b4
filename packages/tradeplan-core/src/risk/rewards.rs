//! Reward tiers for a single trade.

use crate::types::RewardTier;

/// Reward multiples previewed for every trade (1:1 through 4:1).
pub const REWARD_MULTIPLIERS: [u32; 4] = [1, 2, 3, 4];

/// Potential reward for each fixed reward:risk tier, lowest first.
pub fn reward_tiers(risk_amount: f64) -> Vec<RewardTier> {
    REWARD_MULTIPLIERS
        .iter()
        .map(|&multiplier| RewardTier {
            label: format!("{}:1", multiplier),
            multiplier,
            reward: reward_for_multiplier(risk_amount, f64::from(multiplier)),
        })
        .collect()
}

/// Reward for an arbitrary multiple of the risked amount.
pub fn reward_for_multiplier(risk_amount: f64, multiplier: f64) -> f64 {
    risk_amount * multiplier
}
