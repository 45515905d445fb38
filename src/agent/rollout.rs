use tracing::debug;

use crate::{
    env::TradingEnv,
    error::EnvResult,
    utils::percent_change,
};

use super::Policy;

/// How one episode went
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub steps: usize,
    pub initial_value: f64,
    pub final_value: f64,
    pub total_reward: f64,
}

impl EpisodeSummary {
    pub fn return_pct(&self) -> f64 {
        percent_change(self.initial_value, self.final_value)
    }
}

/// Resets `env` and lets `policy` act until the episode ends.
pub fn run_episode<P: Policy + ?Sized>(
    env: &mut TradingEnv,
    policy: &mut P,
    seed: Option<u64>,
) -> EnvResult<EpisodeSummary> {
    let (mut observation, _) = env.reset(seed)?;
    let initial_value = env.config().initial_investment;
    let space = env.action_space();

    let mut steps = 0;
    let mut total_reward = 0.;
    loop {
        let action = policy.act(&observation, &space);
        let step = env.step(&action)?;

        steps += 1;
        total_reward += step.reward;
        let done = step.is_done();
        observation = step.observation;

        if done {
            break;
        }
    }

    let final_value = env.portfolio_value()?;
    debug!(env_id = env.env_id, steps, final_value, "rollout finished");

    Ok(EpisodeSummary {
        steps,
        initial_value,
        final_value,
        total_reward,
    })
}
