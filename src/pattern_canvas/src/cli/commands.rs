use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Chart pattern drawing toolkit")]
pub struct Cli {
    /// Path to the config file (pattern_canvas.toml). Falls back to
    /// $PATTERN_CANVAS_CONFIG, then to built-in defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print an overview of a market-data file
    Summary {
        /// Market-data CSV (datetime,open,high,low,close,volume)
        #[arg(long)]
        data: PathBuf,

        /// Optional pattern CSV to count strokes from
        #[arg(long)]
        patterns: Option<PathBuf>,

        /// Emit JSON instead of a status line
        #[arg(long)]
        json: bool,
    },

    /// Map a pixel position to (datetime, price)
    ToData {
        #[arg(long)]
        data: PathBuf,

        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },

    /// Map a (datetime, price) pair to a pixel position
    ToPixel {
        #[arg(long)]
        data: PathBuf,

        /// Any accepted datetime layout, e.g. "01/05/2025 12:00"
        #[arg(long)]
        datetime: String,

        #[arg(long, allow_negative_numbers = true)]
        price: f64,
    },

    /// Re-read a pattern file and write it back in canonical form
    Normalize {
        #[arg(long)]
        input: PathBuf,

        /// Input uses the market schema without a stroke_id column
        #[arg(long)]
        legacy: bool,

        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Drive a drawing session from a pointer-event script
    Replay {
        #[arg(long)]
        data: PathBuf,

        /// One event per line: enable | disable | down X Y | move X Y | up [X Y] | resize W H
        #[arg(long)]
        events: PathBuf,

        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
