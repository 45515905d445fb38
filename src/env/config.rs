use serde::{Deserialize, Serialize};

use crate::{
    constants::portfolio::WEIGHT_TOLERANCE,
    error::{EnvError, EnvResult},
};

use super::reward::RewardKind;

/// Everything an environment needs besides its price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    pub tickers: Vec<String>,
    /// Fraction of the initial investment per ticker, aligned with `tickers`
    pub initial_weights: Vec<f64>,
    pub initial_investment: f64,
    #[serde(default)]
    pub reward: RewardKind,
    #[serde(default)]
    pub record_history: bool,
}

impl EnvConfig {
    pub fn new(tickers: Vec<String>, initial_weights: Vec<f64>, initial_investment: f64) -> Self {
        Self {
            tickers,
            initial_weights,
            initial_investment,
            reward: RewardKind::default(),
            record_history: false,
        }
    }

    /// The same share of `initial_investment` in every ticker.
    pub fn equal_weights(tickers: Vec<String>, initial_investment: f64) -> Self {
        let weight = 1. / tickers.len().max(1) as f64;
        let initial_weights = vec![weight; tickers.len()];
        Self::new(tickers, initial_weights, initial_investment)
    }

    pub fn with_reward(mut self, reward: RewardKind) -> Self {
        self.reward = reward;
        self
    }

    pub fn with_history(mut self, record_history: bool) -> Self {
        self.record_history = record_history;
        self
    }

    pub fn n_assets(&self) -> usize {
        self.tickers.len()
    }

    pub fn validate(&self) -> EnvResult<()> {
        if self.tickers.is_empty() {
            return Err(EnvError::InvalidConfiguration(
                "ticker list is empty".to_string(),
            ));
        }
        for (index, ticker) in self.tickers.iter().enumerate() {
            if self.tickers[..index].contains(ticker) {
                return Err(EnvError::InvalidConfiguration(format!(
                    "{ticker} is listed twice"
                )));
            }
        }

        if self.initial_weights.len() != self.tickers.len() {
            return Err(EnvError::InvalidConfiguration(format!(
                "{} weights for {} tickers",
                self.initial_weights.len(),
                self.tickers.len()
            )));
        }
        if let Some(weight) = self
            .initial_weights
            .iter()
            .find(|weight| !weight.is_finite() || **weight < 0.)
        {
            return Err(EnvError::InvalidConfiguration(format!(
                "weight {weight} is negative or not finite"
            )));
        }
        let total: f64 = self.initial_weights.iter().sum();
        if (total - 1.).abs() > WEIGHT_TOLERANCE {
            return Err(EnvError::InvalidConfiguration(format!(
                "weights sum to {total}, not 1"
            )));
        }

        if !self.initial_investment.is_finite() || self.initial_investment < 0. {
            return Err(EnvError::InvalidConfiguration(format!(
                "initial investment {} is negative or not finite",
                self.initial_investment
            )));
        }

        Ok(())
    }
}
