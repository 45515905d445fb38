use enum_map::EnumMap;
use serde::{Deserialize, Serialize};

use crate::types::{Action, Date, Directive, Observation};

/// The state an environment reached after one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub date: Date,
    pub action: Action,
    pub observation: Observation,
    pub reward: f64,
    pub value: f64,
    pub shares: Vec<f64>,
    pub cash: f64,
}

/// Trajectory of one episode, from the first step to termination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeHistory {
    pub transitions: Vec<Transition>,
    /// How often each ticker was sold, held and bought
    pub action_counts: Vec<EnumMap<Directive, usize>>,
}

impl EpisodeHistory {
    pub fn new(ticker_count: usize) -> Self {
        Self {
            transitions: Vec::new(),
            action_counts: vec![EnumMap::default(); ticker_count],
        }
    }

    pub fn record(&mut self, transition: Transition) {
        for (counts, directive) in self.action_counts.iter_mut().zip(transition.action.0.iter()) {
            counts[*directive] += 1;
        }
        self.transitions.push(transition);
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.transitions.iter().map(|t| t.value).collect()
    }

    pub fn rewards(&self) -> Vec<f64> {
        self.transitions.iter().map(|t| t.reward).collect()
    }

    pub fn final_value(&self) -> Option<f64> {
        self.transitions.last().map(|t| t.value)
    }

    pub fn count(&self, ticker_index: usize, directive: Directive) -> usize {
        self.action_counts
            .get(ticker_index)
            .map_or(0, |counts| counts[directive])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Signal;

    fn transition(day: &str, directives: Vec<Directive>, value: f64) -> Transition {
        Transition {
            date: day.parse().unwrap(),
            action: Action(directives),
            observation: Observation(vec![Signal::Up, Signal::Down]),
            reward: value,
            value,
            shares: vec![1., 1.],
            cash: 0.,
        }
    }

    #[test]
    fn counts_directives_per_ticker() {
        let mut history = EpisodeHistory::new(2);
        history.record(transition("2024-01-08", vec![Directive::Sell, Directive::Buy], 101.));
        history.record(transition("2024-01-15", vec![Directive::Sell, Directive::Hold], 99.));

        assert_eq!(history.len(), 2);
        assert_eq!(history.count(0, Directive::Sell), 2);
        assert_eq!(history.count(1, Directive::Buy), 1);
        assert_eq!(history.count(1, Directive::Hold), 1);
        assert_eq!(history.count(1, Directive::Sell), 0);
        assert_eq!(history.count(5, Directive::Sell), 0);
        assert_eq!(history.values(), vec![101., 99.]);
        assert_eq!(history.final_value(), Some(99.));
    }
}
