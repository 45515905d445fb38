pub const TICKERS: [&str; 5] = ["TSLA", "GOOGL", "MELI", "MSI", "NVDA"];
// pub const TICKERS: [&str; 3] = ["AAPL", "MSFT", "GOOGL"];

pub const START_DATE: &str = "2024-01-01";
pub const END_DATE: &str = "2024-06-01";

pub mod calendar {
    /// Calendar days between two decision points
    pub const STEP_DAYS: i64 = 7;
    /// How far ahead to look for an open market day before giving up
    pub const MAX_TRADING_DAY_SEARCH: i64 = 10;
    /// Longest closed stretch allowed between a window's last close and its end, a long weekend
    pub const MAX_TRAILING_GAP_DAYS: i64 = 4;
}

pub mod portfolio {
    pub const INITIAL_INVESTMENT: f64 = 100.;
    /// Allowed drift of the initial weights away from a sum of 1
    pub const WEIGHT_TOLERANCE: f64 = 1e-6;
}

pub mod files {
    pub const DATA_PATH: &str = "data";
    pub const PRICES_FILE: &str = "data/prices.bin";
}

pub mod synthetic {
    pub const MIN_START_PRICE: f64 = 20.;
    pub const MAX_START_PRICE: f64 = 500.;
    /// Largest relative move of a synthetic close from one trading day to the next
    pub const MAX_DAILY_MOVE: f64 = 0.03;
}
