pub mod episode_tickers_combined;

pub use episode_tickers_combined::{EpisodeHistory, Transition};
