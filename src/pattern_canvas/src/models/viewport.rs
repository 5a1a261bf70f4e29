//! Canvas geometry supplied by the UI shell at mapping time.

use serde::{Deserialize, Serialize};

/// Empty space around the drawable chart area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    pub const ZERO: Margins = Margins {
        left: 0.0,
        right: 0.0,
        top: 0.0,
        bottom: 0.0,
    };
}

impl Default for Margins {
    /// Axis-label room of a classic desktop chart.
    fn default() -> Self {
        Self {
            left: 60.0,
            right: 20.0,
            top: 20.0,
            bottom: 60.0,
        }
    }
}

/// Canvas size and margins. Transient: owned by the shell, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl Viewport {
    /// A viewport whose whole canvas is drawable.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margins: Margins::ZERO,
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Left edge of the drawable area.
    pub fn left(&self) -> f64 {
        self.margins.left
    }

    /// Right edge of the drawable area.
    pub fn right(&self) -> f64 {
        self.width - self.margins.right
    }

    /// Top edge of the drawable area.
    pub fn top(&self) -> f64 {
        self.margins.top
    }

    /// Bottom edge of the drawable area.
    pub fn bottom(&self) -> f64 {
        self.height - self.margins.bottom
    }

    pub fn drawable_width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn drawable_height(&self) -> f64 {
        self.bottom() - self.top()
    }

    /// Whether `(x, y)` lies inside the drawable area (edges included).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.left()..=self.right()).contains(&x) && (self.top()..=self.bottom()).contains(&y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margins: Margins::default(),
        }
    }
}
