use tracing::trace;

use crate::{
    error::{EnvError, EnvResult},
    types::{Action, Directive},
};

use super::portfolio::PortfolioState;

/// What one rebalance did, by asset index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebalanceSummary {
    pub sold: Vec<usize>,
    pub bought: Vec<usize>,
    /// Cash raised by the sell pass
    pub proceeds: f64,
    /// Cash spent by the buy pass
    pub invested: f64,
}

impl PortfolioState {
    /// Sells every SELL position in full, then splits all cash evenly over
    /// the BUY assets.
    ///
    /// Sell proceeds of one asset fund buys of another in the same call. With
    /// no BUY directives the cash stays uninvested. Every price the call will
    /// touch is checked before anything changes, so an error leaves the state
    /// as it was. A BUY at a price of zero or below is an error even when there
    /// is no cash to spend on it.
    pub fn rebalance(&mut self, action: &Action, prices: &[f64]) -> EnvResult<RebalanceSummary> {
        let n_assets = self.shares.len();
        if action.len() != n_assets {
            return Err(EnvError::InvalidAction(format!(
                "expected {n_assets} directives, got {}",
                action.len()
            )));
        }
        if prices.len() != n_assets {
            return Err(EnvError::MissingPriceData(format!(
                "{} prices for {n_assets} assets",
                prices.len()
            )));
        }

        let mut sells = Vec::new();
        let mut buys = Vec::new();

        for (index, directive) in action.0.iter().enumerate() {
            let price = prices[index];
            match directive {
                Directive::Sell if self.shares[index] > 0. => {
                    if !price.is_finite() || price < 0. {
                        return Err(self.invalid_price(index, price));
                    }
                    sells.push(index);
                }
                Directive::Buy => {
                    if !price.is_finite() || price <= 0. {
                        return Err(self.invalid_price(index, price));
                    }
                    buys.push(index);
                }
                Directive::Sell | Directive::Hold => {}
            }
        }

        // === PASS 1: liquidate every SELL position ===
        let mut proceeds = 0.;
        for &index in &sells {
            let value = self.shares[index] * prices[index];
            trace!(ticker = %self.tickers[index], shares = self.shares[index], value, "sell");

            proceeds += value;
            self.cash += value;
            self.shares[index] = 0.;
        }

        // === PASS 2: split all cash evenly over the BUY assets ===
        let mut invested = 0.;
        if !buys.is_empty() {
            let per_asset_cash = self.cash / buys.len() as f64;

            for &index in &buys {
                let quantity = per_asset_cash / prices[index];
                trace!(ticker = %self.tickers[index], quantity, per_asset_cash, "buy");

                self.shares[index] += quantity;
            }

            invested = self.cash;
            self.cash = 0.;
        }

        Ok(RebalanceSummary {
            sold: sells,
            bought: buys,
            proceeds,
            invested,
        })
    }

    fn invalid_price(&self, index: usize, price: f64) -> EnvError {
        EnvError::InvalidPrice {
            ticker: self.tickers[index].clone(),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::utils::approx_eq;

    fn tickers(n: usize) -> Vec<String> {
        (0..n).map(|index| format!("T{index}")).collect()
    }

    fn action(directives: &[Directive]) -> Action {
        Action(directives.to_vec())
    }

    #[test]
    fn sell_funds_buy_in_the_same_step() {
        let mut state =
            PortfolioState::initialize(&tickers(2), &[0.5, 0.5], 100., &[10., 20.]).unwrap();

        let summary = state
            .rebalance(&action(&[Directive::Sell, Directive::Buy]), &[10., 20.])
            .unwrap();

        assert_eq!(state.shares(), &[0., 5.]);
        assert_eq!(state.cash(), 0.);
        assert_eq!(summary.sold, vec![0]);
        assert_eq!(summary.bought, vec![1]);
        assert_eq!(summary.proceeds, 50.);
        assert_eq!(summary.invested, 50.);
    }

    #[test]
    fn sells_without_buys_keep_cash() {
        let mut state = PortfolioState::from_parts(tickers(2), vec![5., 2.5], 0.).unwrap();

        state
            .rebalance(&action(&[Directive::Sell, Directive::Hold]), &[10., 20.])
            .unwrap();

        assert_eq!(state.shares(), &[0., 2.5]);
        assert_eq!(state.cash(), 50.);
    }

    #[test]
    fn cash_is_split_evenly_across_buys() {
        let mut state = PortfolioState::from_parts(tickers(3), vec![1., 0., 0.], 30.).unwrap();

        state
            .rebalance(
                &action(&[Directive::Sell, Directive::Buy, Directive::Buy]),
                &[10., 4., 8.],
            )
            .unwrap();

        // 30 cash + 10 proceeds, 20 per buy
        assert_eq!(state.shares(), &[0., 5., 2.5]);
        assert_eq!(state.cash(), 0.);
    }

    #[test]
    fn selling_nothing_is_a_no_op() {
        let mut state = PortfolioState::from_parts(tickers(2), vec![0., 3.], 0.).unwrap();
        let before = state.clone();

        let summary = state
            .rebalance(&action(&[Directive::Sell, Directive::Hold]), &[10., 20.])
            .unwrap();

        assert_eq!(state, before);
        assert!(summary.sold.is_empty());
    }

    #[test]
    fn buying_without_cash_adds_no_shares() {
        let mut state = PortfolioState::from_parts(tickers(2), vec![1., 3.], 0.).unwrap();

        state
            .rebalance(&action(&[Directive::Buy, Directive::Buy]), &[10., 20.])
            .unwrap();

        assert_eq!(state.shares(), &[1., 3.]);
        assert_eq!(state.cash(), 0.);
    }

    #[test]
    fn zero_buy_price_fails_without_selling() {
        let mut state = PortfolioState::from_parts(tickers(2), vec![5., 1.], 0.).unwrap();
        let before = state.clone();

        let result = state.rebalance(&action(&[Directive::Sell, Directive::Buy]), &[10., 0.]);

        assert!(matches!(
            result,
            Err(EnvError::InvalidPrice { ref ticker, price }) if ticker == "T1" && price == 0.
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn zero_buy_price_fails_even_without_cash() {
        let mut state = PortfolioState::from_parts(tickers(2), vec![1., 3.], 0.).unwrap();

        let result = state.rebalance(&action(&[Directive::Hold, Directive::Buy]), &[10., 0.]);

        assert!(matches!(result, Err(EnvError::InvalidPrice { .. })));
        assert_eq!(state.shares(), &[1., 3.]);
    }

    #[test]
    fn negative_sell_price_fails() {
        let mut state = PortfolioState::from_parts(tickers(1), vec![5.], 0.).unwrap();
        let result = state.rebalance(&action(&[Directive::Sell]), &[-1.]);
        assert!(matches!(result, Err(EnvError::InvalidPrice { .. })));
        assert_eq!(state.shares(), &[5.]);
    }

    #[test]
    fn shape_mismatches_fail() {
        let mut state = PortfolioState::from_parts(tickers(2), vec![1., 1.], 0.).unwrap();

        assert!(matches!(
            state.rebalance(&action(&[Directive::Hold]), &[1., 1.]),
            Err(EnvError::InvalidAction(_))
        ));
        assert!(matches!(
            state.rebalance(&action(&[Directive::Hold, Directive::Hold]), &[1.]),
            Err(EnvError::MissingPriceData(_))
        ));
    }

    #[test]
    fn rebalancing_conserves_value() {
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..1_000 {
            let n = rng.gen_range(1..8);
            let shares = (0..n)
                .map(|_| if rng.gen_bool(0.3) { 0. } else { rng.gen_range(0.0..50.0) })
                .collect();
            let cash = if rng.gen_bool(0.5) { 0. } else { rng.gen_range(0.0..1_000.0) };
            let prices: Vec<f64> = (0..n).map(|_| rng.gen_range(0.5..400.0)).collect();
            let directives = (0..n)
                .map(|_| match rng.gen_range(0..3) {
                    0 => Directive::Sell,
                    1 => Directive::Hold,
                    _ => Directive::Buy,
                })
                .collect();

            let mut state = PortfolioState::from_parts(tickers(n), shares, cash).unwrap();
            let before = state.value(&prices);
            state.rebalance(&Action(directives), &prices).unwrap();

            assert!(approx_eq(before, state.value(&prices)));
            assert!(state.cash() >= 0.);
            assert!(state.shares().iter().all(|shares| *shares >= 0.));
        }
    }
}
