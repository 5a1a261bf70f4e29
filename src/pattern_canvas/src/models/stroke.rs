//! Drawn pattern geometry in data space.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identifier of a stroke within one [`StrokeStore`](crate::store::StrokeStore).
pub type StrokeId = u32;

/// A single drawn point: one price level at one instant.
///
/// On export the price is replicated into open/high/low/close with volume 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternPoint {
    pub datetime: NaiveDateTime,
    pub price: f64,
}

impl PatternPoint {
    pub fn new(datetime: NaiveDateTime, price: f64) -> Self {
        Self { datetime, price }
    }
}

/// One continuous pointer-drag gesture.
///
/// Points keep the order they were drawn in; datetimes may go backwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: StrokeId,
    pub points: Vec<PatternPoint>,
}

impl Stroke {
    pub fn new(id: StrokeId) -> Self {
        Self {
            id,
            points: Vec::new(),
        }
    }

    pub fn with_points(id: StrokeId, points: Vec<PatternPoint>) -> Self {
        Self { id, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_point(&self) -> Option<&PatternPoint> {
        self.points.last()
    }
}
