use std::fmt;

use enum_map::Enum;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{EnvError, EnvResult};

/// Trading days are plain calendar dates, no time zone
pub type Date = chrono::NaiveDate;

/// Share count per ticker, keyed by ticker symbol
pub type Info = hashbrown::HashMap<String, f64>;

/// What to do with one asset at a decision point.
///
/// The external encoding is the multi-discrete index `0 => Sell`, `1 => Hold`,
/// `2 => Buy`, so `index - 1` gives the signed directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, Serialize, Deserialize)]
pub enum Directive {
    Sell,
    Hold,
    Buy,
}

impl Directive {
    pub const COUNT: u32 = 3;

    pub fn signed(self) -> i8 {
        match self {
            Directive::Sell => -1,
            Directive::Hold => 0,
            Directive::Buy => 1,
        }
    }
}

impl TryFrom<u32> for Directive {
    type Error = EnvError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Directive::Sell),
            1 => Ok(Directive::Hold),
            2 => Ok(Directive::Buy),
            _ => Err(EnvError::InvalidAction(format!(
                "index {value} is outside 0..{}",
                Self::COUNT
            ))),
        }
    }
}

impl From<Directive> for u32 {
    fn from(directive: Directive) -> Self {
        match directive {
            Directive::Sell => 0,
            Directive::Hold => 1,
            Directive::Buy => 2,
        }
    }
}

/// One directive per asset, aligned with the environment's ticker list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action(pub Vec<Directive>);

impl Action {
    /// Decodes the raw multi-discrete action an external learner emits.
    pub fn decode(raw: &[u32], n_assets: usize) -> EnvResult<Self> {
        if raw.len() != n_assets {
            return Err(EnvError::InvalidAction(format!(
                "expected {n_assets} directives, got {}",
                raw.len()
            )));
        }

        let directives = raw
            .iter()
            .map(|index| Directive::try_from(*index))
            .collect::<EnvResult<Vec<_>>>()?;
        Ok(Action(directives))
    }

    pub fn encode(&self) -> Vec<u32> {
        self.0.iter().map(|directive| u32::from(*directive)).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Direction of a price between two dates. Equal prices count as `Down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Up,
    Down,
}

impl Signal {
    pub fn between(before: f64, after: f64) -> Self {
        if after > before {
            Signal::Up
        } else {
            Signal::Down
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Signal::Up => 1,
            Signal::Down => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation(pub Vec<Signal>);

impl Observation {
    pub fn values(&self) -> Vec<i8> {
        self.0.iter().map(|signal| signal.value()).collect()
    }

    /// The float vector a policy network consumes
    pub fn to_array(&self) -> Array1<f32> {
        self.0.iter().map(|signal| signal.value() as f32).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_multi_discrete_indices() {
        let action = Action::decode(&[0, 1, 2], 3).unwrap();
        assert_eq!(
            action.0,
            vec![Directive::Sell, Directive::Hold, Directive::Buy]
        );
        assert_eq!(
            action.0.iter().map(|d| d.signed()).collect::<Vec<_>>(),
            vec![-1, 0, 1]
        );
        assert_eq!(action.encode(), vec![0, 1, 2]);
    }

    #[test]
    fn rejects_bad_actions() {
        assert!(matches!(
            Action::decode(&[0, 3], 2),
            Err(EnvError::InvalidAction(_))
        ));
        assert!(matches!(
            Action::decode(&[0, 1, 2], 2),
            Err(EnvError::InvalidAction(_))
        ));
    }

    #[test]
    fn equal_prices_signal_down() {
        assert_eq!(Signal::between(10., 10.), Signal::Down);
        assert_eq!(Signal::between(10., 10.5), Signal::Up);
        assert_eq!(Signal::between(10., 9.), Signal::Down);
    }

    #[test]
    fn observation_encodes_plus_minus_one() {
        let obs = Observation(vec![Signal::Up, Signal::Down]);
        assert_eq!(obs.values(), vec![1, -1]);
        assert_eq!(obs.to_array().to_vec(), vec![1.0, -1.0]);
    }
}
