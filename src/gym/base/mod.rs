mod spaces;

pub use spaces::{ActionSpace, ObservationSpace};

use serde::{Deserialize, Serialize};

use crate::error::EnvResult;

/// Lifecycle of an environment instance.
///
/// `Uninitialized -> Ready` on reset, `Ready | Stepping -> Stepping` per
/// step, `-> Terminated` on the step that reaches the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvStatus {
    Uninitialized,
    Ready,
    Stepping,
    Terminated,
}

impl EnvStatus {
    pub fn can_step(self) -> bool {
        matches!(self, EnvStatus::Ready | EnvStatus::Stepping)
    }
}

/// The return value for a step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<O, I> {
    pub observation: O,
    pub reward: f64,
    pub terminated: bool,
    /// Nothing truncates an episode early, this is always false
    pub truncated: bool,
    pub info: I,
}

impl<O, I> Step<O, I> {
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// The reset/step contract an external training loop drives.
///
/// Actions are the raw multi-discrete encoding, one index per asset.
pub trait Environment {
    type Observation;
    type Info;

    fn reset(&mut self, seed: Option<u64>) -> EnvResult<(Self::Observation, Self::Info)>;

    fn step(&mut self, action: &[u32]) -> EnvResult<Step<Self::Observation, Self::Info>>;

    fn observation_space(&self) -> ObservationSpace;

    fn action_space(&self) -> ActionSpace;
}
