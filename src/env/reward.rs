use serde::{Deserialize, Serialize};

use super::{env::TradingEnv, portfolio::PortfolioState};

/// How a step's reward is derived from the portfolio value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum RewardKind {
    /// Portfolio value itself, every step
    #[default]
    PortfolioValue,
    /// Value change since the previous decision point
    ValueDelta,
}

/// Cash plus every position marked at `prices`.
///
/// This is both the reward under [`RewardKind::PortfolioValue`] and the
/// reportable portfolio value.
pub fn calculate_value(state: &PortfolioState, prices: &[f64]) -> f64 {
    state.value(prices)
}

impl TradingEnv {
    /// Reward for arriving at `value`, remembering it for the next delta.
    pub(super) fn get_reward(&mut self, value: f64) -> f64 {
        let reward = match self.config.reward {
            RewardKind::PortfolioValue => value,
            RewardKind::ValueDelta => value - self.last_value,
        };
        self.last_value = value;
        reward
    }
}
