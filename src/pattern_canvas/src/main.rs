use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pattern_canvas::PatternEditor;
use pattern_canvas::cli::commands::{Cli, Commands};
use pattern_canvas::cli::params::{apply_events, parse_event_script};
use pattern_canvas::config::{EditorConfig, load_config_from_env, load_config_path};
use pattern_canvas::datetime::{format_datetime, parse_datetime};
use pattern_canvas::models::stroke::PatternPoint;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => load_config_from_env()?,
    };

    match cli.command {
        Commands::Summary {
            data,
            patterns,
            json,
        } => {
            let mut editor = editor_with_data(config, &data)?;
            if let Some(patterns) = patterns {
                editor
                    .import_patterns_from_path(&patterns)
                    .with_context(|| format!("reading patterns from {}", patterns.display()))?;
            }
            let summary = editor
                .summary()
                .context("market data did not produce a summary")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }
        }

        Commands::ToData { data, x, y } => {
            let editor = editor_with_data(config, &data)?;
            let point = editor.mapper()?.to_data(x, y);
            println!("{},{}", format_datetime(&point.datetime), point.price);
        }

        Commands::ToPixel {
            data,
            datetime,
            price,
        } => {
            let editor = editor_with_data(config, &data)?;
            let parsed = parse_datetime(&datetime)?;
            let (x, y) = editor
                .mapper()?
                .to_pixel(&PatternPoint::new(parsed.value, price));
            println!("{x},{y}");
        }

        Commands::Normalize {
            input,
            legacy,
            output,
        } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let mut editor = PatternEditor::new(config);
            if legacy {
                editor.import_legacy_patterns(&text)?;
            } else {
                editor.import_patterns(&text)?;
            }
            emit(&editor, output.as_deref())?;
        }

        Commands::Replay {
            data,
            events,
            output,
        } => {
            let mut editor = editor_with_data(config, &data)?;
            let script = std::fs::read_to_string(&events)
                .with_context(|| format!("reading {}", events.display()))?;
            let events = parse_event_script(&script)?;
            apply_events(&mut editor, &events)?;
            // a script may end mid-gesture
            editor.pointer_up()?;
            info!(strokes = editor.strokes().len(), "replay finished");
            emit(&editor, output.as_deref())?;
        }
    }

    Ok(())
}

fn editor_with_data(config: EditorConfig, data: &Path) -> Result<PatternEditor> {
    let mut editor = PatternEditor::new(config);
    editor
        .load_series_path(data)
        .with_context(|| format!("loading market data from {}", data.display()))?;
    Ok(editor)
}

fn emit(editor: &PatternEditor, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            editor.export_patterns_to_path(path)?;
            info!(path = %path.display(), "patterns written");
        }
        None => print!("{}", editor.export_patterns()?),
    }
    Ok(())
}
