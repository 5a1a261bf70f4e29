//! Pattern CSV codec.
//!
//! Export writes one row per point under the header
//! `stroke_id,datetime,open,high,low,close,volume`, with the point's price
//! repeated across the OHLC columns and volume 0. Import reverses it:
//!
//! - the header must match exactly (case-sensitive), otherwise
//!   [`PatternError::Schema`];
//! - rows are grouped by `stroke_id` in order of first appearance, row order
//!   preserved inside each group;
//! - `close` is the authoritative price; `open`, `high`, `low` and `volume`
//!   are not read;
//! - the first bad row aborts the whole import.
//!
//! [`decode_legacy_patterns`] reads older exports that used the plain market
//! schema without a `stroke_id` column and splits strokes on time gaps.

use chrono::TimeDelta;
use csv::{Terminator, WriterBuilder};
use indexmap::IndexMap;
use tracing::debug;

use super::market_csv::MARKET_COLUMNS;
use super::{csv_reader, field};
use crate::datetime::{format_datetime, parse_datetime};
use crate::errors::{PatternError, Result};
use crate::models::stroke::{PatternPoint, Stroke, StrokeId};

pub const PATTERN_COLUMNS: [&str; 7] = [
    "stroke_id", "datetime", "open", "high", "low", "close", "volume",
];

const COL_STROKE_ID: usize = 0;
const COL_DATETIME: usize = 1;
const COL_CLOSE: usize = 5;

const LEGACY_COL_DATETIME: usize = 0;
const LEGACY_COL_CLOSE: usize = 4;

/// Serialise strokes to pattern CSV text.
pub fn encode_patterns(strokes: &[Stroke]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(PATTERN_COLUMNS)?;

    let mut rows = 0usize;
    for stroke in strokes {
        let id = stroke.id.to_string();
        for point in &stroke.points {
            let price = format!("{:.1}", point.price);
            writer.write_record([
                id.as_str(),
                format_datetime(&point.datetime).as_str(),
                price.as_str(),
                price.as_str(),
                price.as_str(),
                price.as_str(),
                "0",
            ])?;
            rows += 1;
        }
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    debug!(strokes = strokes.len(), rows, "patterns encoded");
    String::from_utf8(bytes)
        .map_err(|e| PatternError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Parse pattern CSV text into strokes.
pub fn decode_patterns(csv_text: &str) -> Result<Vec<Stroke>> {
    let mut reader = csv_reader(csv_text);
    check_header(&mut reader, &PATTERN_COLUMNS)?;

    let mut groups: IndexMap<StrokeId, Vec<PatternPoint>> = IndexMap::new();
    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let rec = result.map_err(|e| PatternError::MalformedRow {
            row,
            reason: e.to_string(),
        })?;

        let raw_id = field(&rec, COL_STROKE_ID);
        let id: StrokeId = raw_id.parse().map_err(|e| PatternError::MalformedRow {
            row,
            reason: format!("stroke_id `{raw_id}`: {e}"),
        })?;
        let point = read_point(&rec, COL_DATETIME, COL_CLOSE, row)?;
        groups.entry(id).or_default().push(point);
    }

    let strokes: Vec<Stroke> = groups
        .into_iter()
        .map(|(id, points)| Stroke::with_points(id, points))
        .collect();
    debug!(strokes = strokes.len(), "patterns decoded");
    Ok(strokes)
}

/// Parse a pattern file written in the plain market schema.
///
/// A new stroke starts whenever a row is more than `gap` later than the
/// previous row. Moving backwards in time never splits. Ids are assigned
/// from 0 in file order.
pub fn decode_legacy_patterns(csv_text: &str, gap: TimeDelta) -> Result<Vec<Stroke>> {
    let mut reader = csv_reader(csv_text);
    check_header(&mut reader, &MARKET_COLUMNS)?;

    let mut strokes: Vec<Stroke> = Vec::new();
    let mut current: Vec<PatternPoint> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let rec = result.map_err(|e| PatternError::MalformedRow {
            row,
            reason: e.to_string(),
        })?;
        let point = read_point(&rec, LEGACY_COL_DATETIME, LEGACY_COL_CLOSE, row)?;

        if let Some(prev) = current.last() {
            if point.datetime - prev.datetime > gap {
                let id = strokes.len() as StrokeId;
                strokes.push(Stroke::with_points(id, std::mem::take(&mut current)));
            }
        }
        current.push(point);
    }
    if !current.is_empty() {
        let id = strokes.len() as StrokeId;
        strokes.push(Stroke::with_points(id, current));
    }

    debug!(strokes = strokes.len(), "legacy patterns decoded");
    Ok(strokes)
}

fn check_header(reader: &mut csv::Reader<&[u8]>, expected: &[&str]) -> Result<()> {
    let headers = reader.headers().map_err(|e| PatternError::Schema {
        expected: expected.join(","),
        found: format!("<unreadable: {e}>"),
    })?;
    if !headers.iter().eq(expected.iter().copied()) {
        return Err(PatternError::Schema {
            expected: expected.join(","),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }
    Ok(())
}

fn read_point(
    rec: &csv::StringRecord,
    datetime_col: usize,
    close_col: usize,
    row: usize,
) -> Result<PatternPoint> {
    let datetime = parse_datetime(field(rec, datetime_col))
        .map_err(|e| PatternError::DateParse { row, raw: e.0 })?
        .value;

    let raw_close = field(rec, close_col);
    let price: f64 = raw_close
        .parse()
        .map_err(|e| PatternError::MalformedRow {
            row,
            reason: format!("close `{raw_close}`: {e}"),
        })?;
    if !price.is_finite() {
        return Err(PatternError::MalformedRow {
            row,
            reason: format!("close `{raw_close}` is not a finite number"),
        });
    }

    Ok(PatternPoint::new(datetime, price))
}
