use crate::{
    data::PriceTable,
    error::EnvResult,
    types::{Date, Observation, Signal},
};

use super::env::TradingEnv;

/// Up/down per tracked column between the closes on `from` and `to`.
///
/// A flat price counts as `Down`.
pub fn observe(table: &PriceTable, columns: &[usize], from: Date, to: Date) -> EnvResult<Observation> {
    let before = table.prices_on(from, columns)?;
    let after = table.prices_on(to, columns)?;

    Ok(Observation(
        before
            .iter()
            .zip(after.iter())
            .map(|(before, after)| Signal::between(*before, *after))
            .collect(),
    ))
}

impl TradingEnv {
    pub(super) fn get_obs(&self, from: Date, to: Date) -> EnvResult<Observation> {
        observe(&self.prices, &self.columns, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnvError;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn table() -> PriceTable {
        PriceTable::from_rows(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            vec![
                (date("2024-01-02"), vec![Some(10.), Some(20.), Some(5.)]),
                (date("2024-01-09"), vec![Some(10.), Some(25.), Some(4.)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn signals_follow_price_direction() {
        let obs = observe(&table(), &[0, 1, 2], date("2024-01-02"), date("2024-01-09")).unwrap();
        assert_eq!(obs.0, vec![Signal::Down, Signal::Up, Signal::Down]);
    }

    #[test]
    fn same_date_is_all_down() {
        let obs = observe(&table(), &[1, 2], date("2024-01-09"), date("2024-01-09")).unwrap();
        assert_eq!(obs.values(), vec![-1, -1]);
    }

    #[test]
    fn unknown_date_fails() {
        let result = observe(&table(), &[0], date("2024-01-02"), date("2024-01-03"));
        assert!(matches!(result, Err(EnvError::MissingPriceData(_))));
    }
}
