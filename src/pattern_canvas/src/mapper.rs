//! Bidirectional affine mapping between pixel space and data space.
//!
//! Pixel space has its origin at the top-left of the canvas with y growing
//! downwards; data space is (datetime, price) with price growing upwards. The
//! mapper interpolates linearly on both axes across the drawable area of a
//! [`Viewport`], so `to_pixel(to_data(x, y)) == (x, y)` up to rounding for any
//! pixel inside that area.
//!
//! A mapper holds nothing but bounds and viewport. Rebuild it whenever either
//! changes; construction is cheap.

use chrono::{NaiveDateTime, TimeDelta};

use crate::models::market::SeriesBounds;
use crate::models::stroke::{PatternPoint, Stroke};
use crate::models::viewport::Viewport;

/// Tunables applied when deriving axis ranges from series bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingOptions {
    /// Fraction of the price range added above and below the data.
    pub price_padding: f64,
    /// Price span used when the series is flat.
    pub fallback_price_span: f64,
    /// Time span used when the series covers a single instant.
    pub fallback_time_span: TimeDelta,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            price_padding: 0.0,
            fallback_price_span: 1.0,
            fallback_time_span: TimeDelta::days(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    viewport: Viewport,
    time_origin: NaiveDateTime,
    time_span_ms: f64,
    price_origin: f64,
    price_span: f64,
    pixel_width: f64,
    pixel_height: f64,
}

impl CoordinateMapper {
    pub fn new(bounds: SeriesBounds, viewport: Viewport, options: MappingOptions) -> Self {
        let bounds = bounds.padded(options.price_padding);

        let raw_ms = (bounds.end - bounds.start).num_milliseconds();
        let (time_origin, time_span_ms) = if raw_ms > 0 {
            (bounds.start, raw_ms as f64)
        } else {
            let span = options.fallback_time_span.num_milliseconds().max(1);
            let origin = bounds
                .start
                .checked_sub_signed(TimeDelta::milliseconds(span / 2))
                .unwrap_or(bounds.start);
            (origin, span as f64)
        };

        let raw_price = bounds.max_price - bounds.min_price;
        let (price_origin, price_span) = if raw_price > 0.0 && raw_price.is_finite() {
            (bounds.min_price, raw_price)
        } else {
            let span = if options.fallback_price_span > 0.0 {
                options.fallback_price_span
            } else {
                1.0
            };
            (bounds.min_price - span / 2.0, span)
        };

        Self {
            viewport,
            time_origin,
            time_span_ms,
            price_origin,
            price_span,
            pixel_width: viewport.drawable_width().max(1.0),
            pixel_height: viewport.drawable_height().max(1.0),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Pixel -> data. Pixels outside the drawable area are clamped to its edge.
    pub fn to_data(&self, x: f64, y: f64) -> PatternPoint {
        PatternPoint::new(self.x_to_time(x), self.y_to_price(y))
    }

    /// Data -> pixel. Not clamped: points outside the series extent land
    /// outside the drawable area.
    pub fn to_pixel(&self, point: &PatternPoint) -> (f64, f64) {
        (self.time_to_x(point.datetime), self.price_to_y(point.price))
    }

    pub fn x_to_time(&self, x: f64) -> NaiveDateTime {
        let left = self.viewport.left();
        let ratio = (x.clamp(left, left + self.pixel_width) - left) / self.pixel_width;
        let offset = TimeDelta::milliseconds((ratio * self.time_span_ms).round() as i64);
        self.time_origin
            .checked_add_signed(offset)
            .unwrap_or(self.time_origin)
    }

    pub fn y_to_price(&self, y: f64) -> f64 {
        let top = self.viewport.top();
        let bottom = top + self.pixel_height;
        let rel = (bottom - y.clamp(top, bottom)) / self.pixel_height;
        self.price_origin + rel * self.price_span
    }

    pub fn time_to_x(&self, dt: NaiveDateTime) -> f64 {
        let offset_ms = (dt - self.time_origin).num_milliseconds() as f64;
        self.viewport.left() + offset_ms / self.time_span_ms * self.pixel_width
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        let norm = (price - self.price_origin) / self.price_span;
        self.viewport.top() + self.pixel_height - norm * self.pixel_height
    }

    /// Pixel polyline for rendering a stroke.
    pub fn stroke_to_pixels(&self, stroke: &Stroke) -> Vec<(f64, f64)> {
        stroke.points.iter().map(|p| self.to_pixel(p)).collect()
    }
}
