//! Canonical in-memory representation of the loaded market data.
//!
//! A [`MarketSeries`] fixes the data-space extent that pixel coordinates are
//! mapped onto. It is immutable once built and replaced wholesale on reload.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::datetime::format_datetime;
use crate::errors::{PatternError, Result};

/// A single OHLCV record from the market-data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    /// Bar timestamp (naive wall-clock time as written in the file).
    pub datetime: NaiveDateTime,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval.
    pub volume: u64,
}

/// The data-space extent derived from a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesBounds {
    /// Earliest record datetime.
    pub start: NaiveDateTime,
    /// Latest record datetime.
    pub end: NaiveDateTime,
    /// Minimum over all `low` values.
    pub min_price: f64,
    /// Maximum over all `high` values.
    pub max_price: f64,
}

impl SeriesBounds {
    /// Widen the price range by `fraction` of its span on both sides.
    ///
    /// A flat range stays flat; the mapper applies its own fallback span.
    pub fn padded(self, fraction: f64) -> Self {
        let pad = (self.max_price - self.min_price) * fraction.max(0.0);
        Self {
            min_price: self.min_price - pad,
            max_price: self.max_price + pad,
            ..self
        }
    }
}

/// An ordered, non-empty sequence of [`MarketRecord`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSeries {
    records: Vec<MarketRecord>,
    bounds: SeriesBounds,
}

impl MarketSeries {
    /// Build a series, sorting records by datetime (stable, so duplicate
    /// timestamps keep their file order).
    pub fn new(mut records: Vec<MarketRecord>) -> Result<Self> {
        let Some(first) = records.first() else {
            return Err(PatternError::Parse {
                row: None,
                reason: "market data contains no records".into(),
            });
        };

        let mut bounds = SeriesBounds {
            start: first.datetime,
            end: first.datetime,
            min_price: first.low,
            max_price: first.high,
        };
        for r in &records {
            bounds.start = bounds.start.min(r.datetime);
            bounds.end = bounds.end.max(r.datetime);
            bounds.min_price = bounds.min_price.min(r.low);
            bounds.max_price = bounds.max_price.max(r.high);
        }

        records.sort_by_key(|r| r.datetime);
        Ok(Self { records, bounds })
    }

    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }

    pub fn bounds(&self) -> SeriesBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summarise the series the way the status bar of a drawing tool shows it.
    pub fn summary(&self, pattern_strokes: usize) -> SeriesSummary {
        let closes = self.records.iter().map(|r| r.close);
        let min_close = closes.clone().fold(f64::INFINITY, f64::min);
        let max_close = closes.fold(f64::NEG_INFINITY, f64::max);
        SeriesSummary {
            data_points: self.records.len(),
            first: self.bounds.start,
            last: self.bounds.end,
            min_close,
            max_close,
            pattern_strokes,
        }
    }
}

/// Human-facing overview of the loaded data and the current pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub data_points: usize,
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
    pub min_close: f64,
    pub max_close: f64,
    pub pattern_strokes: usize,
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} data points, {} to {}, ${:.2} to ${:.2}, {} pattern strokes",
            self.data_points,
            format_datetime(&self.first),
            format_datetime(&self.last),
            self.min_close,
            self.max_close,
            self.pattern_strokes
        )
    }
}
