use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};

use crate::{
    calendar::next_period,
    constants::calendar::STEP_DAYS,
    data::PriceTable,
    error::{EnvError, EnvResult},
    gym::{ActionSpace, EnvStatus, Environment, ObservationSpace, Step},
    history::{EpisodeHistory, Transition},
    types::{Action, Date, Info, Observation},
    utils::percent_change,
};

use super::{config::EnvConfig, portfolio::PortfolioState, reward::calculate_value};

/// Weekly rebalancing over a fixed price table.
///
/// An episode runs from the table's first date to its last. Each step applies
/// one SELL/HOLD/BUY directive per ticker at the current date's closes, moves
/// a week ahead and pays out the portfolio value there.
pub struct TradingEnv {
    pub env_id: usize,
    /// Completed episodes
    pub episode: usize,
    pub(super) prices: Arc<PriceTable>,
    pub(super) config: EnvConfig,
    /// Price table column of each configured ticker
    pub(super) columns: Vec<usize>,
    start_date: Date,
    end_date: Date,
    current_date: Date,
    portfolio: PortfolioState,
    status: EnvStatus,
    rng: StdRng,
    pub(super) last_value: f64,
    episode_history: EpisodeHistory,
}

impl TradingEnv {
    pub fn new(prices: Arc<PriceTable>, config: EnvConfig) -> EnvResult<Self> {
        config.validate()?;
        let columns = prices.columns(&config.tickers)?;

        // every step reads closes for every ticker, find gaps now
        for date in prices.dates() {
            prices.prices_on(*date, &columns)?;
        }

        let start_date = prices.first_date();
        let end_date = prices.last_date();
        let start_prices = prices.prices_on(start_date, &columns)?;
        let portfolio = PortfolioState::initialize(
            &config.tickers,
            &config.initial_weights,
            config.initial_investment,
            &start_prices,
        )?;
        let last_value = portfolio.value(&start_prices);

        debug!(
            tickers = ?config.tickers,
            %start_date,
            %end_date,
            trading_days = prices.len(),
            "created trading environment"
        );

        Ok(Self {
            env_id: 0,
            episode: 0,
            current_date: next_period(prices.dates(), start_date)?,
            episode_history: EpisodeHistory::new(config.n_assets()),
            prices,
            config,
            columns,
            start_date,
            end_date,
            portfolio,
            status: EnvStatus::Uninitialized,
            rng: StdRng::from_entropy(),
            last_value,
        })
    }

    /// Starts a new episode at the first date of the table.
    ///
    /// Reseeds the environment's RNG when `seed` is given. Two resets in a row
    /// give the same portfolio and observation.
    pub fn reset(&mut self, seed: Option<u64>) -> EnvResult<(Observation, Info)> {
        let current_date = next_period(self.prices.dates(), self.start_date)?;
        let start_prices = self.prices.prices_on(self.start_date, &self.columns)?;
        let portfolio = PortfolioState::initialize(
            &self.config.tickers,
            &self.config.initial_weights,
            self.config.initial_investment,
            &start_prices,
        )?;
        let observation = self.get_obs(self.start_date, current_date)?;

        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.last_value = portfolio.value(&start_prices);
        self.portfolio = portfolio;
        self.current_date = current_date;
        self.status = EnvStatus::Ready;
        self.episode_history = EpisodeHistory::new(self.config.n_assets());

        info!(
            env_id = self.env_id,
            episode = self.episode,
            seed,
            start_date = %self.start_date,
            %current_date,
            "reset"
        );
        Ok((observation, Info::new()))
    }

    /// Applies a raw multi-discrete action, `0 => Sell`, `1 => Hold`, `2 => Buy`.
    pub fn step(&mut self, action: &[u32]) -> EnvResult<Step<Observation, Info>> {
        self.check_can_step()?;
        let action = Action::decode(action, self.config.n_assets())?;
        self.step_action(&action)
    }

    /// One decision point: rebalance at today's closes, move a week ahead,
    /// observe the move and reward the value there.
    ///
    /// Everything the step reads is looked up before the portfolio changes,
    /// so a failing step leaves the environment as it was.
    pub fn step_action(&mut self, action: &Action) -> EnvResult<Step<Observation, Info>> {
        self.check_can_step()?;

        let prices_now = self.prices.prices_on(self.current_date, &self.columns)?;
        let next_date = next_period(self.prices.dates(), self.current_date)?;
        let observation = self.get_obs(self.current_date, next_date)?;
        let prices_next = self.prices.prices_on(next_date, &self.columns)?;

        let summary = self.portfolio.rebalance(action, &prices_now)?;

        if (next_date - self.current_date).num_days() < STEP_DAYS {
            warn!(
                from = %self.current_date,
                to = %next_date,
                "final step is shorter than a week"
            );
        }
        self.current_date = next_date;

        let value = calculate_value(&self.portfolio, &prices_next);
        let reward = self.get_reward(value);
        let terminated = self.current_date >= self.end_date;
        self.status = if terminated {
            EnvStatus::Terminated
        } else {
            EnvStatus::Stepping
        };

        debug!(
            env_id = self.env_id,
            date = %self.current_date,
            sold = summary.sold.len(),
            bought = summary.bought.len(),
            proceeds = summary.proceeds,
            %observation,
            cash = self.portfolio.cash(),
            value,
            reward,
            "step"
        );

        if self.config.record_history {
            self.episode_history.record(Transition {
                date: self.current_date,
                action: action.clone(),
                observation: observation.clone(),
                reward,
                value,
                shares: self.portfolio.shares().to_vec(),
                cash: self.portfolio.cash(),
            });
        }

        if terminated {
            self.handle_episode_end(value);
        }

        Ok(Step {
            observation,
            reward,
            terminated,
            truncated: false,
            info: self.portfolio.holdings(),
        })
    }

    /// Fails exactly when [`TradingEnv::step_action`] would, without changing anything.
    pub(super) fn check_step(&self, action: &Action) -> EnvResult<()> {
        self.check_can_step()?;

        let prices_now = self.prices.prices_on(self.current_date, &self.columns)?;
        let next_date = next_period(self.prices.dates(), self.current_date)?;
        self.get_obs(self.current_date, next_date)?;
        self.prices.prices_on(next_date, &self.columns)?;

        self.portfolio.clone().rebalance(action, &prices_now)?;
        Ok(())
    }

    fn check_can_step(&self) -> EnvResult<()> {
        if self.status.can_step() {
            Ok(())
        } else {
            Err(EnvError::InvalidState {
                operation: "step",
                status: self.status,
            })
        }
    }

    fn handle_episode_end(&mut self, value: f64) {
        info!(
            env_id = self.env_id,
            episode = self.episode,
            final_value = value,
            return_pct = percent_change(self.config.initial_investment, value),
            "episode terminated"
        );
        self.episode += 1;
    }

    /// A uniformly random action from this environment's own RNG
    pub fn sample_action(&mut self) -> Vec<u32> {
        self.action_space().sample(&mut self.rng)
    }

    /// Portfolio value at the current date's closes
    pub fn portfolio_value(&self) -> EnvResult<f64> {
        let prices = self.prices.prices_on(self.current_date, &self.columns)?;
        Ok(calculate_value(&self.portfolio, &prices))
    }

    pub fn info(&self) -> Info {
        self.portfolio.holdings()
    }

    pub fn portfolio(&self) -> &PortfolioState {
        &self.portfolio
    }

    pub fn status(&self) -> EnvStatus {
        self.status
    }

    pub fn current_date(&self) -> Date {
        self.current_date
    }

    pub fn start_date(&self) -> Date {
        self.start_date
    }

    pub fn end_date(&self) -> Date {
        self.end_date
    }

    pub fn tickers(&self) -> &[String] {
        &self.config.tickers
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn price_table(&self) -> &Arc<PriceTable> {
        &self.prices
    }

    pub fn history(&self) -> &EpisodeHistory {
        &self.episode_history
    }

    pub fn observation_space(&self) -> ObservationSpace {
        ObservationSpace::new(self.config.n_assets())
    }

    pub fn action_space(&self) -> ActionSpace {
        ActionSpace::new(self.config.n_assets())
    }
}

impl Environment for TradingEnv {
    type Observation = Observation;
    type Info = Info;

    fn reset(&mut self, seed: Option<u64>) -> EnvResult<(Observation, Info)> {
        TradingEnv::reset(self, seed)
    }

    fn step(&mut self, action: &[u32]) -> EnvResult<Step<Observation, Info>> {
        TradingEnv::step(self, action)
    }

    fn observation_space(&self) -> ObservationSpace {
        TradingEnv::observation_space(self)
    }

    fn action_space(&self) -> ActionSpace {
        TradingEnv::action_space(self)
    }
}
