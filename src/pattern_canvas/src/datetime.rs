//! Datetime parsing and formatting for market and pattern CSV files.
//!
//! What this module provides:
//! - [`DateTimeFormat`]: every textual layout the CSV readers accept.
//! - [`DateTimeFormat::PRIORITY`]: the fixed order in which layouts are tried.
//! - [`parse_datetime`]: first-success-wins parsing with a typed result that
//!   records which layout matched.
//! - [`format_datetime`]: the canonical `MM/DD/YYYY HH:MM` rendering used on export.
//!
//! Notes:
//! - All values are naive wall-clock times. Market files carry no zone, so
//!   nothing here converts between zones, except that RFC 3339 input with an
//!   explicit offset is shifted to UTC wall time before dropping the offset.
//! - Month, day and hour accept a single digit (`3/12/2025 9:30`).
//!
//! Examples
//! - "01/05/2025 12:00"          -> [`DateTimeFormat::UsMinutes`]
//! - "2025-01-05T12:00:00.250"   -> [`DateTimeFormat::IsoT`]
//! - "2025-01-05T17:00:00+05:00" -> [`DateTimeFormat::Rfc3339`], 12:00 wall time

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// The export layout, identical to the market-data input layout.
pub const CANONICAL_FORMAT: &str = "%m/%d/%Y %H:%M";

/// A textual datetime layout accepted on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeFormat {
    /// `MM/DD/YYYY HH:MM`
    UsMinutes,
    /// `MM/DD/YYYY HH:MM:SS`
    UsSeconds,
    /// `YYYY-MM-DDTHH:MM:SS[.fff]`
    IsoT,
    /// `YYYY-MM-DD HH:MM:SS[.fff]`
    IsoSpace,
    /// `YYYY-MM-DDTHH:MM`
    IsoTMinutes,
    /// `YYYY-MM-DD HH:MM`
    IsoSpaceMinutes,
    /// RFC 3339 with an explicit offset, e.g. `2025-01-05T12:00:00Z`.
    Rfc3339,
    /// `MM/DD/YYYY`, midnight.
    UsDate,
    /// `YYYY-MM-DD`, midnight.
    IsoDate,
}

impl DateTimeFormat {
    /// Order in which [`parse_datetime`] attempts layouts.
    pub const PRIORITY: [DateTimeFormat; 9] = [
        DateTimeFormat::UsMinutes,
        DateTimeFormat::UsSeconds,
        DateTimeFormat::IsoT,
        DateTimeFormat::IsoSpace,
        DateTimeFormat::IsoTMinutes,
        DateTimeFormat::IsoSpaceMinutes,
        DateTimeFormat::Rfc3339,
        DateTimeFormat::UsDate,
        DateTimeFormat::IsoDate,
    ];

    /// Try to parse `raw` with this single layout.
    pub fn parse(self, raw: &str) -> Option<NaiveDateTime> {
        match self {
            DateTimeFormat::UsMinutes => parse_with(raw, "%m/%d/%Y %H:%M"),
            DateTimeFormat::UsSeconds => parse_with(raw, "%m/%d/%Y %H:%M:%S"),
            DateTimeFormat::IsoT => parse_with(raw, "%Y-%m-%dT%H:%M:%S%.f"),
            DateTimeFormat::IsoSpace => parse_with(raw, "%Y-%m-%d %H:%M:%S%.f"),
            DateTimeFormat::IsoTMinutes => parse_with(raw, "%Y-%m-%dT%H:%M"),
            DateTimeFormat::IsoSpaceMinutes => parse_with(raw, "%Y-%m-%d %H:%M"),
            DateTimeFormat::Rfc3339 => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc()),
            DateTimeFormat::UsDate => date_only(raw, "%m/%d/%Y"),
            DateTimeFormat::IsoDate => date_only(raw, "%Y-%m-%d"),
        }
    }
}

impl fmt::Display for DateTimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = match self {
            DateTimeFormat::UsMinutes => "MM/DD/YYYY HH:MM",
            DateTimeFormat::UsSeconds => "MM/DD/YYYY HH:MM:SS",
            DateTimeFormat::IsoT => "YYYY-MM-DDTHH:MM:SS",
            DateTimeFormat::IsoSpace => "YYYY-MM-DD HH:MM:SS",
            DateTimeFormat::IsoTMinutes => "YYYY-MM-DDTHH:MM",
            DateTimeFormat::IsoSpaceMinutes => "YYYY-MM-DD HH:MM",
            DateTimeFormat::Rfc3339 => "RFC 3339",
            DateTimeFormat::UsDate => "MM/DD/YYYY",
            DateTimeFormat::IsoDate => "YYYY-MM-DD",
        };
        f.write_str(layout)
    }
}

/// A successfully parsed datetime together with the layout that matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDateTime {
    pub value: NaiveDateTime,
    pub format: DateTimeFormat,
}

/// No layout in [`DateTimeFormat::PRIORITY`] matched the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized datetime `{0}`")]
pub struct UnrecognizedDateTime(pub String);

/// Parse `raw` with each layout in [`DateTimeFormat::PRIORITY`]; the first match wins.
///
/// Surrounding whitespace is ignored.
pub fn parse_datetime(raw: &str) -> Result<ParsedDateTime, UnrecognizedDateTime> {
    let trimmed = raw.trim();
    DateTimeFormat::PRIORITY
        .iter()
        .find_map(|&format| {
            format
                .parse(trimmed)
                .map(|value| ParsedDateTime { value, format })
        })
        .ok_or_else(|| UnrecognizedDateTime(raw.to_string()))
}

/// Render `dt` as `MM/DD/YYYY HH:MM`. Seconds are truncated.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(CANONICAL_FORMAT).to_string()
}

fn parse_with(raw: &str, layout: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, layout).ok()
}

fn date_only(raw: &str, layout: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(raw, layout)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}
