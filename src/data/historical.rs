use std::{fs, path::Path};

use chrono::Duration;

use tracing::{debug, info};

use crate::{
    constants::{
        calendar::{MAX_TRADING_DAY_SEARCH, MAX_TRAILING_GAP_DAYS},
        files,
    },
    data::{synthetic, PriceTable},
    error::EnvResult,
    types::Date,
    utils::create_folder_if_not_exists,
};

/// Reads a postcard-encoded price table.
pub fn load_price_table(path: impl AsRef<Path>) -> EnvResult<PriceTable> {
    let path = path.as_ref();
    let file = fs::read(path)?;
    let table = postcard::from_bytes::<PriceTable>(&file)?.validated()?;

    debug!(
        path = %path.display(),
        dates = table.len(),
        tickers = table.tickers().len(),
        "loaded price table"
    );
    Ok(table)
}

/// Writes a price table, creating its parent folder if needed.
pub fn save_price_table(path: impl AsRef<Path>, table: &PriceTable) -> EnvResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        create_folder_if_not_exists(parent)?;
    }

    let encoded = postcard::to_allocvec(table)?;
    fs::write(path, encoded.as_slice())?;

    info!(path = %path.display(), dates = table.len(), "saved price table");
    Ok(())
}

/// `tickers` over `[start, end)`, from the cached table if it covers them.
///
/// Without a covering cache a seeded synthetic table is generated and written
/// to [`files::PRICES_FILE`] so later runs see the same prices.
pub fn get_stocks(tickers: &[String], start: Date, end: Date, seed: u64) -> EnvResult<PriceTable> {
    get_stocks_cached(files::PRICES_FILE, tickers, start, end, seed)
}

/// [`get_stocks`] against the cache file at `path`.
///
/// A cached table is used whatever seed produced it, as long as it has every
/// ticker and spans the whole window. Otherwise it is replaced.
pub fn get_stocks_cached(
    path: impl AsRef<Path>,
    tickers: &[String],
    start: Date,
    end: Date,
    seed: u64,
) -> EnvResult<PriceTable> {
    let path = path.as_ref();

    if path.exists() {
        let cached = load_price_table(path)?;
        if covers(&cached, tickers, start, end) {
            return cached.select(tickers, start, end);
        }
        info!(
            path = %path.display(),
            cached_from = %cached.first_date(),
            cached_to = %cached.last_date(),
            %start,
            %end,
            "cached prices do not cover the request, regenerating"
        );
    } else {
        info!("no cached prices, generating a synthetic table");
    }

    // pad the front so the window always finds an open day
    let padded_start = start - Duration::days(MAX_TRADING_DAY_SEARCH);
    let table = synthetic::random_walk(tickers, padded_start, end, seed)?;
    save_price_table(path, &table)?;

    table.select(tickers, start, end)
}

/// Whether `table` has every ticker and runs from `start` up to `end`.
fn covers(table: &PriceTable, tickers: &[String], start: Date, end: Date) -> bool {
    tickers
        .iter()
        .all(|ticker| table.ticker_index(ticker).is_some())
        && table.first_date() <= start
        && (end - table.last_date()).num_days() <= MAX_TRAILING_GAP_DAYS
}
