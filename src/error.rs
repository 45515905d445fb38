use chrono::NaiveDate;
use thiserror::Error;

use crate::gym::EnvStatus;

pub type EnvResult<T> = Result<T, EnvError>;

/// Everything that can go wrong while building or stepping an environment.
///
/// None of these are retried. Whatever call reports them has not mutated the
/// environment.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("missing price data: {0}")]
    MissingPriceData(String),

    #[error("invalid price {price} for {ticker}")]
    InvalidPrice { ticker: String, price: f64 },

    #[error("cannot {operation} while the environment is {status:?}")]
    InvalidState {
        operation: &'static str,
        status: EnvStatus,
    },

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("no trading day within {max_days} days of {date}")]
    NoTradingDay { date: NaiveDate, max_days: i64 },

    #[error("price cache io: {0}")]
    Io(#[from] std::io::Error),

    #[error("price cache decode: {0}")]
    Decode(#[from] postcard::Error),
}
