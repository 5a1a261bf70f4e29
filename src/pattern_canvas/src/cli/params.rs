use thiserror::Error;

use crate::PatternEditor;
use crate::errors::PatternError;
use crate::models::viewport::Viewport;

#[derive(Debug, Error)]
#[error("event script line {line}: {message}")]
pub struct EventScriptError {
    pub line: usize,
    pub message: String,
}

/// One step of a pointer-event script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReplayEvent {
    Enable,
    Disable,
    Down(f64, f64),
    Move(f64, f64),
    Up,
    Resize(f64, f64),
}

/// Parse an event script. Blank lines and `#` comments are skipped.
pub fn parse_event_script(text: &str) -> Result<Vec<ReplayEvent>, EventScriptError> {
    let mut events = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let mut parts = content.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();
        let event = match verb.as_str() {
            "enable" => no_args(&args, line).map(|_| ReplayEvent::Enable)?,
            "disable" => no_args(&args, line).map(|_| ReplayEvent::Disable)?,
            "down" => pair(&args, line).map(|(x, y)| ReplayEvent::Down(x, y))?,
            "move" => pair(&args, line).map(|(x, y)| ReplayEvent::Move(x, y))?,
            // release coordinates are accepted but not recorded
            "up" if args.is_empty() => ReplayEvent::Up,
            "up" => pair(&args, line).map(|_| ReplayEvent::Up)?,
            "resize" => pair(&args, line).map(|(w, h)| ReplayEvent::Resize(w, h))?,
            other => {
                return Err(EventScriptError {
                    line,
                    message: format!("unknown event `{other}`"),
                });
            }
        };
        events.push(event);
    }
    Ok(events)
}

/// Feed events to an editor in order. A resize keeps the configured margins.
pub fn apply_events(editor: &mut PatternEditor, events: &[ReplayEvent]) -> Result<(), PatternError> {
    for event in events {
        match *event {
            ReplayEvent::Enable => editor.set_drawing_enabled(true)?,
            ReplayEvent::Disable => editor.set_drawing_enabled(false)?,
            ReplayEvent::Down(x, y) => {
                editor.pointer_down(x, y)?;
            }
            ReplayEvent::Move(x, y) => {
                editor.pointer_move(x, y)?;
            }
            ReplayEvent::Up => {
                editor.pointer_up()?;
            }
            ReplayEvent::Resize(width, height) => {
                let margins = editor.viewport().margins;
                editor.set_viewport(Viewport::new(width, height).with_margins(margins));
            }
        }
    }
    Ok(())
}

fn no_args(args: &[&str], line: usize) -> Result<(), EventScriptError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(EventScriptError {
            line,
            message: "expected no arguments".into(),
        })
    }
}

fn pair(args: &[&str], line: usize) -> Result<(f64, f64), EventScriptError> {
    let [a, b] = args else {
        return Err(EventScriptError {
            line,
            message: format!("expected two numbers, got {}", args.len()),
        });
    };
    let num = |s: &str| {
        s.parse::<f64>().map_err(|e| EventScriptError {
            line,
            message: format!("`{s}`: {e}"),
        })
    };
    Ok((num(a)?, num(b)?))
}
