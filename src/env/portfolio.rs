use serde::{Deserialize, Serialize};

use crate::{
    error::{EnvError, EnvResult},
    types::Info,
};

/// Share holdings per ticker plus uninvested cash.
///
/// Shares and cash are never negative. Only [`PortfolioState::rebalance`]
/// mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub(super) tickers: Vec<String>,
    pub(super) shares: Vec<f64>,
    pub(super) cash: f64,
}

impl PortfolioState {
    /// Splits `investment` across tickers by weight at the start prices.
    ///
    /// Weights are assumed validated by the caller's config.
    pub fn initialize(
        tickers: &[String],
        weights: &[f64],
        investment: f64,
        start_prices: &[f64],
    ) -> EnvResult<Self> {
        if weights.len() != tickers.len() {
            return Err(EnvError::InvalidConfiguration(format!(
                "{} weights for {} tickers",
                weights.len(),
                tickers.len()
            )));
        }
        if start_prices.len() != tickers.len() {
            return Err(EnvError::MissingPriceData(format!(
                "{} start prices for {} tickers",
                start_prices.len(),
                tickers.len()
            )));
        }

        let shares = tickers
            .iter()
            .zip(weights.iter().zip(start_prices))
            .map(|(ticker, (weight, price))| {
                if !price.is_finite() || *price <= 0. {
                    return Err(EnvError::InvalidPrice {
                        ticker: ticker.clone(),
                        price: *price,
                    });
                }
                Ok(weight * investment / price)
            })
            .collect::<EnvResult<Vec<f64>>>()?;

        Ok(Self {
            tickers: tickers.to_vec(),
            shares,
            cash: 0.,
        })
    }

    /// A state with explicit holdings, for restoring snapshots.
    pub fn from_parts(tickers: Vec<String>, shares: Vec<f64>, cash: f64) -> EnvResult<Self> {
        if shares.len() != tickers.len() {
            return Err(EnvError::InvalidConfiguration(format!(
                "{} share counts for {} tickers",
                shares.len(),
                tickers.len()
            )));
        }
        if shares.iter().chain([&cash]).any(|amount| !amount.is_finite() || *amount < 0.) {
            return Err(EnvError::InvalidConfiguration(
                "shares and cash must be finite and non-negative".to_string(),
            ));
        }

        Ok(Self {
            tickers,
            shares,
            cash,
        })
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn shares(&self) -> &[f64] {
        &self.shares
    }

    pub fn shares_of(&self, ticker: &str) -> Option<f64> {
        self.tickers
            .iter()
            .position(|candidate| candidate == ticker)
            .map(|index| self.shares[index])
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Cash plus every position marked at `prices`
    pub fn value(&self, prices: &[f64]) -> f64 {
        self.cash
            + self
                .shares
                .iter()
                .zip(prices)
                .map(|(shares, price)| shares * price)
                .sum::<f64>()
    }

    pub fn holdings(&self) -> Info {
        self.tickers
            .iter()
            .cloned()
            .zip(self.shares.iter().copied())
            .collect()
    }
}
