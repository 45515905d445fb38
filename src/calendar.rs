use chrono::Duration;

use crate::{
    constants::calendar::STEP_DAYS,
    error::{EnvError, EnvResult},
    types::Date,
};

/// The first trading date at least a week after `reference`.
///
/// Saturates to the last available date when the week runs past the end of
/// the data, so the final step of an episode lands on the terminal date.
/// `dates` must be strictly increasing. `reference` need not be one of them.
pub fn next_period(dates: &[Date], reference: Date) -> EnvResult<Date> {
    let Some(last) = dates.last() else {
        return Err(EnvError::InvalidConfiguration(
            "no trading dates to step through".to_string(),
        ));
    };

    let threshold = reference + Duration::days(STEP_DAYS);
    let index = dates.partition_point(|date| *date < threshold);

    Ok(dates.get(index).copied().unwrap_or(*last))
}

/// The trading date on or after `date`, looking at most `max_days` calendar days ahead.
pub fn next_trading_day(dates: &[Date], date: Date, max_days: i64) -> EnvResult<Date> {
    let index = dates.partition_point(|candidate| *candidate < date);

    match dates.get(index) {
        Some(found) if (*found - date).num_days() < max_days => Ok(*found),
        _ => Err(EnvError::NoTradingDay { date, max_days }),
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn weekdays(from: &str, count: usize) -> Vec<Date> {
        date(from)
            .iter_days()
            .filter(|d| chrono::Datelike::weekday(d).number_from_monday() <= 5)
            .take(count)
            .collect()
    }

    #[test]
    fn finds_first_date_a_week_later() {
        let dates = weekdays("2024-01-01", 30);

        // Monday -> following Monday
        assert_eq!(next_period(&dates, date("2024-01-01")).unwrap(), date("2024-01-08"));
        // Saturday is not a trading date but is a valid reference
        assert_eq!(next_period(&dates, date("2024-01-06")).unwrap(), date("2024-01-15"));
    }

    #[test]
    fn skips_gaps_after_threshold() {
        let dates = vec![date("2024-01-01"), date("2024-01-05"), date("2024-01-10")];
        assert_eq!(next_period(&dates, date("2024-01-01")).unwrap(), date("2024-01-10"));
    }

    #[test]
    fn saturates_to_last_date() {
        let dates = vec![date("2024-01-01"), date("2024-01-03"), date("2024-01-05")];
        assert_eq!(next_period(&dates, date("2024-01-01")).unwrap(), date("2024-01-05"));
        assert_eq!(next_period(&dates, date("2024-01-05")).unwrap(), date("2024-01-05"));
    }

    #[test]
    fn empty_dates_are_rejected() {
        assert!(matches!(
            next_period(&[], date("2024-01-01")),
            Err(EnvError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn result_is_a_member_and_respects_the_week() {
        let mut rng = StdRng::seed_from_u64(7);
        let dates = weekdays("2023-06-01", 120);
        let week = Duration::days(STEP_DAYS);

        for _ in 0..500 {
            let reference = date("2023-05-15") + Duration::days(rng.gen_range(0..220));
            let next = next_period(&dates, reference).unwrap();

            assert!(dates.contains(&next));
            if next != *dates.last().unwrap() {
                assert!(next >= reference + week);
                // nothing earlier also qualifies
                assert!(dates.iter().filter(|d| **d < next).all(|d| *d < reference + week));
            }
        }
    }

    #[test]
    fn trading_day_search_is_bounded() {
        let dates = vec![date("2024-01-02"), date("2024-01-20")];
        assert_eq!(
            next_trading_day(&dates, date("2024-01-01"), 10).unwrap(),
            date("2024-01-02")
        );
        assert_eq!(
            next_trading_day(&dates, date("2024-01-02"), 10).unwrap(),
            date("2024-01-02")
        );
        assert!(matches!(
            next_trading_day(&dates, date("2024-01-05"), 10),
            Err(EnvError::NoTradingDay { max_days: 10, .. })
        ));
        assert!(next_trading_day(&dates, date("2024-02-01"), 10).is_err());
    }
}
