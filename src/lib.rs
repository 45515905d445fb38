pub mod agent;
pub mod calendar;
pub mod constants;
pub mod data;
pub mod env;
pub mod error;
pub mod gym;
pub mod history;
pub mod types;
pub mod utils;

pub use env::{EnvConfig, TradingEnv};
pub use error::{EnvError, EnvResult};
