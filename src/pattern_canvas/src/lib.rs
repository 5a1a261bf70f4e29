//! Freehand chart-pattern drawing core.
//!
//! Maps pointer positions on a rendered chart into (datetime, price) data
//! space, records them as strokes, and saves/loads those strokes as CSV in the
//! same shape as the underlying market-data file. UI toolkits and web
//! frameworks sit outside this crate and drive a [`PatternEditor`].

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod datetime;
pub mod editor;
pub mod errors;
pub mod io;
pub mod mapper;
pub mod models;
pub mod session;
pub mod store;

pub use editor::PatternEditor;
pub use errors::{PatternError, Result};
