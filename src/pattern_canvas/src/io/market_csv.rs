//! Loader for the market-data CSV (`datetime,open,high,low,close,volume`).
//!
//! Columns are located by name, so their order may vary and extra columns are
//! ignored. Any malformed row aborts the load.

use std::str::FromStr;

use tracing::debug;

use super::{csv_reader, field};
use crate::datetime::parse_datetime;
use crate::errors::{PatternError, Result};
use crate::models::market::{MarketRecord, MarketSeries};

/// Columns every market-data file must carry.
pub const MARKET_COLUMNS: [&str; 6] = ["datetime", "open", "high", "low", "close", "volume"];

struct ColumnIndex {
    datetime: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

/// Parse market-data CSV text into a [`MarketSeries`].
///
/// Errors:
/// - [`PatternError::Parse`] without a row for a missing column or an empty file
/// - [`PatternError::Parse`] with the 1-based data row for an unreadable value
pub fn load_series(csv_text: &str) -> Result<MarketSeries> {
    let mut reader = csv_reader(csv_text);
    let headers = reader.headers().map_err(|e| PatternError::Parse {
        row: None,
        reason: format!("unreadable header: {e}"),
    })?;

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PatternError::Parse {
                row: None,
                reason: format!("missing column `{name}`"),
            })
    };
    let cols = ColumnIndex {
        datetime: find("datetime")?,
        open: find("open")?,
        high: find("high")?,
        low: find("low")?,
        close: find("close")?,
        volume: find("volume")?,
    };

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let rec = result.map_err(|e| PatternError::Parse {
            row: Some(row),
            reason: e.to_string(),
        })?;

        let raw_dt = field(&rec, cols.datetime);
        let datetime = parse_datetime(raw_dt)
            .map_err(|e| PatternError::Parse {
                row: Some(row),
                reason: e.to_string(),
            })?
            .value;

        records.push(MarketRecord {
            datetime,
            open: number(&rec, cols.open, "open", row)?,
            high: number(&rec, cols.high, "high", row)?,
            low: number(&rec, cols.low, "low", row)?,
            close: number(&rec, cols.close, "close", row)?,
            volume: number(&rec, cols.volume, "volume", row)?,
        });
    }

    let series = MarketSeries::new(records)?;
    let b = series.bounds();
    debug!(
        records = series.len(),
        start = %b.start,
        end = %b.end,
        min_price = b.min_price,
        max_price = b.max_price,
        "market series loaded"
    );
    Ok(series)
}

fn number<T>(rec: &csv::StringRecord, idx: usize, column: &str, row: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field(rec, idx);
    raw.parse().map_err(|e| PatternError::Parse {
        row: Some(row),
        reason: format!("{column} `{raw}`: {e}"),
    })
}
