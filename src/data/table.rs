use serde::{Deserialize, Serialize};

use crate::{
    calendar::next_trading_day,
    constants::calendar::MAX_TRADING_DAY_SEARCH,
    error::{EnvError, EnvResult},
    types::Date,
};

/// Adjusted daily closes for a set of tickers, fully materialized.
///
/// Closes are stored ticker-major, `closes[ticker][date]`, with `None` where
/// the provider had nothing for that ticker on that day. Dates are strictly
/// increasing and never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    dates: Vec<Date>,
    tickers: Vec<String>,
    closes: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    pub fn new(
        dates: Vec<Date>,
        tickers: Vec<String>,
        closes: Vec<Vec<Option<f64>>>,
    ) -> EnvResult<Self> {
        if dates.is_empty() {
            return Err(EnvError::InvalidConfiguration(
                "price table has no dates".to_string(),
            ));
        }
        if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(EnvError::InvalidConfiguration(format!(
                "price table dates are not strictly increasing at {} -> {}",
                pair[0], pair[1]
            )));
        }
        if closes.len() != tickers.len() {
            return Err(EnvError::InvalidConfiguration(format!(
                "{} tickers but {} close series",
                tickers.len(),
                closes.len()
            )));
        }
        for (ticker, series) in tickers.iter().zip(closes.iter()) {
            if series.len() != dates.len() {
                return Err(EnvError::InvalidConfiguration(format!(
                    "{ticker} has {} closes for {} dates",
                    series.len(),
                    dates.len()
                )));
            }
            if let Some(price) = series
                .iter()
                .flatten()
                .find(|price| !price.is_finite() || **price < 0.)
            {
                return Err(EnvError::InvalidPrice {
                    ticker: ticker.clone(),
                    price: *price,
                });
            }
        }

        Ok(Self {
            dates,
            tickers,
            closes,
        })
    }

    /// Re-checks a table that did not come through [`PriceTable::new`], e.g. a decoded cache file.
    pub fn validated(self) -> EnvResult<Self> {
        Self::new(self.dates, self.tickers, self.closes)
    }

    /// Builds a table from date-major rows, each row aligned with `tickers`.
    pub fn from_rows(tickers: Vec<String>, rows: Vec<(Date, Vec<Option<f64>>)>) -> EnvResult<Self> {
        let mut dates = Vec::with_capacity(rows.len());
        let mut closes = vec![Vec::with_capacity(rows.len()); tickers.len()];

        for (date, row) in rows {
            if row.len() != tickers.len() {
                return Err(EnvError::InvalidConfiguration(format!(
                    "row for {date} has {} closes for {} tickers",
                    row.len(),
                    tickers.len()
                )));
            }
            dates.push(date);
            for (series, close) in closes.iter_mut().zip(row) {
                series.push(close);
            }
        }

        Self::new(dates, tickers, closes)
    }

    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn first_date(&self) -> Date {
        self.dates[0]
    }

    pub fn last_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn date_index(&self, date: Date) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    pub fn ticker_index(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|candidate| candidate == ticker)
    }

    /// Column indices for `tickers`, in the order given.
    pub fn columns(&self, tickers: &[String]) -> EnvResult<Vec<usize>> {
        tickers
            .iter()
            .map(|ticker| {
                self.ticker_index(ticker).ok_or_else(|| {
                    EnvError::MissingPriceData(format!("{ticker} is not in the price table"))
                })
            })
            .collect()
    }

    pub fn price(&self, date: Date, column: usize) -> EnvResult<f64> {
        let Some(ticker) = self.tickers.get(column) else {
            return Err(EnvError::MissingPriceData(format!(
                "no ticker in column {column}"
            )));
        };
        let row = self
            .date_index(date)
            .ok_or_else(|| EnvError::MissingPriceData(format!("{date} is not a trading date")))?;

        self.closes[column][row]
            .ok_or_else(|| EnvError::MissingPriceData(format!("{ticker} has no close on {date}")))
    }

    /// Closes on `date` for each of `columns`, in the same order.
    pub fn prices_on(&self, date: Date, columns: &[usize]) -> EnvResult<Vec<f64>> {
        columns
            .iter()
            .map(|column| self.price(date, *column))
            .collect()
    }

    /// Closes on the first trading day at or after `date`.
    pub fn prices_on_or_after(&self, date: Date, columns: &[usize]) -> EnvResult<(Date, Vec<f64>)> {
        let trading_day = next_trading_day(&self.dates, date, MAX_TRADING_DAY_SEARCH)?;
        Ok((trading_day, self.prices_on(trading_day, columns)?))
    }

    /// A dense sub-table of `tickers` over `[start, end)`.
    ///
    /// The window has to open within a few days of `start` and every selected
    /// close has to be present.
    pub fn select(&self, tickers: &[String], start: Date, end: Date) -> EnvResult<Self> {
        if tickers.is_empty() {
            return Err(EnvError::InvalidConfiguration(
                "no tickers selected".to_string(),
            ));
        }
        let columns = self.columns(tickers)?;

        let first = next_trading_day(&self.dates, start, MAX_TRADING_DAY_SEARCH)?;
        let from = self.dates.partition_point(|date| *date < first);
        let to = self.dates.partition_point(|date| *date < end);
        if from >= to {
            return Err(EnvError::MissingPriceData(format!(
                "no trading dates between {start} and {end}"
            )));
        }

        let dates = self.dates[from..to].to_vec();
        let mut closes = Vec::with_capacity(columns.len());
        for (ticker, column) in tickers.iter().zip(columns) {
            let series = self.closes[column][from..to].to_vec();
            if let Some(offset) = series.iter().position(|close| close.is_none()) {
                return Err(EnvError::MissingPriceData(format!(
                    "{ticker} has no close on {}",
                    dates[offset]
                )));
            }
            closes.push(series);
        }

        Self::new(dates, tickers.to_vec(), closes)
    }
}
