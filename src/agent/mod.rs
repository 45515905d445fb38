use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    gym::ActionSpace,
    types::{Directive, Observation, Signal},
};

pub mod rollout;

pub use rollout::{run_episode, EpisodeSummary};

/// Anything that turns an observation into a raw multi-discrete action.
///
/// A trained network plugs in here. The policies below are baselines.
pub trait Policy {
    fn act(&mut self, observation: &Observation, space: &ActionSpace) -> Vec<u32>;
}

/// Uniformly random directives
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation, space: &ActionSpace) -> Vec<u32> {
        space.sample(&mut self.rng)
    }
}

/// The same directive for every asset, every step
pub struct ConstantPolicy(pub Directive);

impl Policy for ConstantPolicy {
    fn act(&mut self, _observation: &Observation, space: &ActionSpace) -> Vec<u32> {
        vec![u32::from(self.0); space.n]
    }
}

/// Buys whatever went up last week and sells whatever did not
pub struct MomentumPolicy;

impl Policy for MomentumPolicy {
    fn act(&mut self, observation: &Observation, _space: &ActionSpace) -> Vec<u32> {
        observation
            .0
            .iter()
            .map(|signal| match signal {
                Signal::Up => u32::from(Directive::Buy),
                Signal::Down => u32::from(Directive::Sell),
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum PolicyKind {
    #[default]
    Random,
    Hold,
    Momentum,
}

impl PolicyKind {
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Hold => Box::new(ConstantPolicy(Directive::Hold)),
            PolicyKind::Momentum => Box::new(MomentumPolicy),
        }
    }
}
