#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use pattern_canvas::PatternEditor;
use pattern_canvas::models::viewport::Viewport;
use std::path::PathBuf;
use tempfile::TempDir;

/// Ten daily bars from 01/01/2025 to 01/10/2025 spanning 100..200.
pub const MARKET_CSV: &str = "\
datetime,open,high,low,close,volume
01/01/2025 00:00,120,130,100,125,1000
01/02/2025 00:00,125,140,118,138,1100
01/03/2025 00:00,138,150,130,145,900
01/04/2025 00:00,145,160,140,155,1200
01/05/2025 00:00,155,170,150,165,1300
01/06/2025 00:00,165,180,160,175,1250
01/07/2025 00:00,175,200,170,190,1400
01/08/2025 00:00,190,195,180,182,1000
01/09/2025 00:00,182,188,170,172,950
01/10/2025 00:00,172,178,160,170,800
";

pub fn dt(month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, month, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

/// 1000x500 canvas with the whole area drawable.
pub fn viewport() -> Viewport {
    Viewport::new(1000.0, 500.0)
}

/// An editor with the fixture series loaded, zero margins and drawing on.
pub fn editor() -> PatternEditor {
    let mut editor = PatternEditor::default();
    editor.load_series(MARKET_CSV).expect("fixture series");
    editor.set_viewport(viewport());
    editor.set_drawing_enabled(true).expect("enable drawing");
    editor
}

/// Press at the first pixel, drag through the rest, release.
pub fn draw(editor: &mut PatternEditor, pixels: &[(f64, f64)]) {
    let ((x0, y0), rest) = pixels.split_first().expect("at least one pixel");
    editor.pointer_down(*x0, *y0).expect("pointer down");
    for (x, y) in rest {
        editor.pointer_move(*x, *y).expect("pointer move");
    }
    editor.pointer_up().expect("pointer up");
}

pub struct TestDir {
    pub dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
