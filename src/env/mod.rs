mod config;
mod env;
mod obs;
mod portfolio;
mod reward;
mod trade;
mod vec_env;


pub use config::EnvConfig;
pub use env::TradingEnv;
pub use obs::observe;
pub use portfolio::PortfolioState;
pub use reward::{calculate_value, RewardKind};
pub use trade::RebalanceSummary;
pub use vec_env::{VecEnv, VecStep};
