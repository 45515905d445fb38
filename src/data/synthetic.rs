use chrono::Datelike;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    constants::synthetic::{MAX_DAILY_MOVE, MAX_START_PRICE, MIN_START_PRICE},
    data::PriceTable,
    error::{EnvError, EnvResult},
    types::Date,
};

/// A seeded random walk of daily closes on every weekday in `[start, end)`.
///
/// Same seed, same table. Stands in for a market-data download in offline
/// runs and tests.
pub fn random_walk(tickers: &[String], start: Date, end: Date, seed: u64) -> EnvResult<PriceTable> {
    if tickers.is_empty() {
        return Err(EnvError::InvalidConfiguration(
            "no tickers to generate".to_string(),
        ));
    }

    let dates: Vec<Date> = start
        .iter_days()
        .take_while(|date| *date < end)
        .filter(|date| date.weekday().number_from_monday() <= 5)
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let closes = tickers
        .iter()
        .map(|_| {
            let mut price = rng.gen_range(MIN_START_PRICE..MAX_START_PRICE);
            dates
                .iter()
                .map(|_| {
                    let close = price;
                    price *= 1. + rng.gen_range(-MAX_DAILY_MOVE..MAX_DAILY_MOVE);
                    Some(close)
                })
                .collect()
        })
        .collect();

    PriceTable::new(dates, tickers.to_vec(), closes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tickers() -> Vec<String> {
        vec!["AAA".to_string(), "BBB".to_string()]
    }

    #[test]
    fn generates_weekdays_only() {
        let table = random_walk(
            &tickers(),
            "2024-01-01".parse().unwrap(),
            "2024-01-15".parse().unwrap(),
            1,
        )
        .unwrap();

        assert_eq!(table.len(), 10);
        assert!(table
            .dates()
            .iter()
            .all(|date| date.weekday().number_from_monday() <= 5));
        for date in table.dates() {
            for close in table.prices_on(*date, &[0, 1]).unwrap() {
                assert!(close > 0.);
            }
        }
    }

    #[test]
    fn same_seed_same_table() {
        let start = "2024-02-01".parse().unwrap();
        let end = "2024-04-01".parse().unwrap();

        let a = random_walk(&tickers(), start, end, 42).unwrap();
        let b = random_walk(&tickers(), start, end, 42).unwrap();
        let c = random_walk(&tickers(), start, end, 43).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn empty_window_is_rejected() {
        let day = "2024-01-01".parse().unwrap();
        assert!(random_walk(&tickers(), day, day, 0).is_err());
    }
}
