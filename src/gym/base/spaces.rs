use ndarray::Array2;
use rand::Rng;

use crate::types::{Directive, Observation};

/// `{-1, 1}^n`: one up/down signal per asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationSpace {
    pub n: usize,
}

impl ObservationSpace {
    pub const LOW: i8 = -1;
    pub const HIGH: i8 = 1;

    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn shape(&self) -> [usize; 1] {
        [self.n]
    }

    pub fn contains(&self, observation: &Observation) -> bool {
        observation.len() == self.n
    }

    /// Stacks observations into a `[batch, n]` float matrix.
    pub fn stack(&self, observations: &[Observation]) -> Array2<f32> {
        let mut batch = Array2::zeros((observations.len(), self.n));
        for (mut row, observation) in batch.rows_mut().into_iter().zip(observations) {
            for (cell, value) in row.iter_mut().zip(observation.values()) {
                *cell = value as f32;
            }
        }
        batch
    }
}

/// `{0, 1, 2}^n`: sell, hold or buy per asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpace {
    pub n: usize,
}

impl ActionSpace {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn nvec(&self) -> Vec<u32> {
        vec![Directive::COUNT; self.n]
    }

    pub fn contains(&self, action: &[u32]) -> bool {
        action.len() == self.n && action.iter().all(|index| *index < Directive::COUNT)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u32> {
        (0..self.n)
            .map(|_| rng.gen_range(0..Directive::COUNT))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::types::Signal;

    #[test]
    fn samples_stay_in_the_action_space() {
        let space = ActionSpace::new(4);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(space.nvec(), vec![3, 3, 3, 3]);
        for _ in 0..100 {
            assert!(space.contains(&space.sample(&mut rng)));
        }
        assert!(!space.contains(&[0, 1, 2]));
        assert!(!space.contains(&[0, 1, 2, 3]));
    }

    #[test]
    fn stacks_observations_row_major() {
        let space = ObservationSpace::new(2);
        let batch = space.stack(&[
            Observation(vec![Signal::Up, Signal::Down]),
            Observation(vec![Signal::Down, Signal::Down]),
        ]);

        assert_eq!(batch.shape(), &[2, 2]);
        assert_eq!(batch[[0, 0]], 1.);
        assert_eq!(batch[[0, 1]], -1.);
        assert_eq!(batch[[1, 0]], -1.);
        assert!(space.contains(&Observation(vec![Signal::Up, Signal::Up])));
    }
}
