use std::sync::Arc;

use ndarray::Array2;

use crate::{
    data::PriceTable,
    error::{EnvError, EnvResult},
    gym::Step,
    types::{Action, Info, Observation},
};

use super::{config::EnvConfig, env::TradingEnv};

/// Result of stepping every member once
pub struct VecStep {
    pub steps: Vec<Step<Observation, Info>>,
    /// First observation of the new episode for members that terminated and
    /// were reset, `None` for the rest
    pub reset_observations: Vec<Option<Observation>>,
}

/// Several independent environments over one shared price table, stepped in
/// turn on the calling thread.
pub struct VecEnv {
    pub envs: Vec<TradingEnv>,
    seed: Option<u64>,
}

impl VecEnv {
    pub fn new(prices: Arc<PriceTable>, config: EnvConfig, count: usize) -> EnvResult<Self> {
        if count == 0 {
            return Err(EnvError::InvalidConfiguration(
                "a vectorized environment needs at least one member".to_string(),
            ));
        }

        let mut envs = Vec::with_capacity(count);
        for env_id in 0..count {
            let mut env = TradingEnv::new(Arc::clone(&prices), config.clone())?;
            env.env_id = env_id;
            envs.push(env);
        }

        Ok(Self { envs, seed: None })
    }

    pub fn len(&self) -> usize {
        self.envs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    /// Resets every member, seeding member `i` with `seed + i`.
    pub fn reset(&mut self, seed: Option<u64>) -> EnvResult<Vec<Observation>> {
        self.seed = seed;
        self.envs
            .iter_mut()
            .enumerate()
            .map(|(index, env)| {
                let member_seed = seed.map(|seed| seed.wrapping_add(index as u64));
                env.reset(member_seed).map(|(observation, _)| observation)
            })
            .collect()
    }

    /// Steps member `i` with `actions[i]`, resetting members whose episode ended.
    ///
    /// Every member's action is checked before any member moves, so an error
    /// leaves the whole batch where it was.
    pub fn step(&mut self, actions: &[Vec<u32>]) -> EnvResult<VecStep> {
        if actions.len() != self.envs.len() {
            return Err(EnvError::InvalidAction(format!(
                "{} actions for {} environments",
                actions.len(),
                self.envs.len()
            )));
        }

        let mut decoded = Vec::with_capacity(actions.len());
        for (env, action) in self.envs.iter().zip(actions) {
            let action = Action::decode(action, env.config.n_assets())?;
            env.check_step(&action)?;
            decoded.push(action);
        }

        let mut steps = Vec::with_capacity(self.envs.len());
        let mut reset_observations = Vec::with_capacity(self.envs.len());

        for (env, action) in self.envs.iter_mut().zip(&decoded) {
            let step = env.step_action(action)?;

            let reset_observation = if step.is_done() {
                // no reseed, the member's RNG stream carries on
                let (observation, _) = env.reset(None)?;
                Some(observation)
            } else {
                None
            };

            steps.push(step);
            reset_observations.push(reset_observation);
        }

        Ok(VecStep {
            steps,
            reset_observations,
        })
    }

    /// The observation each member acts on next, as a `[members, assets]` batch.
    pub fn observation_batch(&self, step: &VecStep) -> Array2<f32> {
        let observations: Vec<Observation> = step
            .steps
            .iter()
            .zip(&step.reset_observations)
            .map(|(step, reset)| reset.clone().unwrap_or_else(|| step.observation.clone()))
            .collect();

        match self.envs.first() {
            Some(env) => env.observation_space().stack(&observations),
            None => Array2::zeros((0, 0)),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
