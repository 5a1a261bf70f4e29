use thiserror::Error;

use crate::models::stroke::StrokeId;

/// The unified error type for the `pattern_canvas` crate.
///
/// Row numbers count data rows from 1 (the first row after the header is row 1).
#[derive(Debug, Error)]
pub enum PatternError {
    /// The market-data CSV is malformed, empty, or misses a required column.
    #[error("Market data parse error{}: {reason}", fmt_row(.row))]
    Parse { row: Option<usize>, reason: String },

    /// The pattern CSV header does not match the expected columns.
    #[error("Pattern schema mismatch: expected `{expected}`, found `{found}`")]
    Schema { expected: String, found: String },

    /// A pattern row carries a datetime none of the accepted formats recognise.
    #[error("Unrecognized datetime `{raw}` in row {row}")]
    DateParse { row: usize, raw: String },

    /// A pattern row could not be read for a reason other than its datetime.
    #[error("Malformed pattern row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    /// A stroke operation referenced a stroke that is not open, or a
    /// replacement set was inconsistent. Indicates a caller bug.
    #[error("Invalid stroke {id}")]
    InvalidStroke { id: StrokeId },

    /// Coordinate mapping was requested before any market data was loaded.
    #[error("No market series loaded")]
    SeriesNotLoaded,

    /// Writing CSV output failed.
    #[error("CSV write failed")]
    Csv(#[from] csv::Error),

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

fn fmt_row(row: &Option<usize>) -> String {
    row.map(|r| format!(" in row {r}")).unwrap_or_default()
}

pub type Result<T, E = PatternError> = std::result::Result<T, E>;
