//! Pointer-event state machine that turns gestures into strokes.
//!
//! ```text
//!            pointer_down (enabled)
//!   Idle ───────────────────────────▶ Drawing ──┐ pointer_move
//!    ▲                                   │  ◀───┘
//!    └──── pointer_up / disable ─────────┘
//! ```
//!
//! The session records whatever samples it is given; throttling is the
//! shell's business. Pointer-down and pointer-move record samples, pointer-up
//! only seals. A gesture that ends holding nothing but its pointer-down sample
//! is a click and leaves no stroke behind. Non-finite pointer coordinates are
//! ignored. The session borrows the store and mapper per call and owns
//! nothing but its state.

use tracing::trace;

use crate::errors::Result;
use crate::mapper::CoordinateMapper;
use crate::models::stroke::StrokeId;
use crate::store::StrokeStore;

/// Fewer samples than this and a finished gesture is discarded.
pub const MIN_GESTURE_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Drawing { stroke: StrokeId },
}

#[derive(Debug, Clone, Default)]
pub struct DrawingSession {
    state: SessionState,
    drawing_enabled: bool,
    keep_duplicates: bool,
}

impl DrawingSession {
    /// A session with drawing disabled that skips repeated points.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a point equal to the previous one is recorded again.
    pub fn with_duplicate_points(mut self, keep: bool) -> Self {
        self.keep_duplicates = keep;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, SessionState::Drawing { .. })
    }

    pub fn drawing_enabled(&self) -> bool {
        self.drawing_enabled
    }

    /// Toggle drawing mode. Disabling mid-gesture ends the current stroke.
    pub fn set_drawing_enabled(&mut self, enabled: bool, store: &mut StrokeStore) -> Result<()> {
        self.drawing_enabled = enabled;
        if !enabled {
            self.finish(store)?;
        }
        Ok(())
    }

    /// Start a stroke at `(x, y)`. Ignored while drawing is disabled.
    ///
    /// A pointer-down while a stroke is still open means the shell lost the
    /// matching pointer-up; the open stroke is ended first.
    pub fn pointer_down(
        &mut self,
        store: &mut StrokeStore,
        mapper: &CoordinateMapper,
        x: f64,
        y: f64,
    ) -> Result<Option<StrokeId>> {
        if !self.drawing_enabled {
            return Ok(None);
        }
        self.finish(store)?;
        if !(x.is_finite() && y.is_finite()) {
            trace!(x, y, "non-finite pointer-down ignored");
            return Ok(None);
        }

        let stroke = store.begin_stroke()?;
        self.state = SessionState::Drawing { stroke };
        store.append_point(stroke, mapper.to_data(x, y))?;
        Ok(Some(stroke))
    }

    /// Extend the open stroke. Returns whether a point was recorded.
    pub fn pointer_move(
        &mut self,
        store: &mut StrokeStore,
        mapper: &CoordinateMapper,
        x: f64,
        y: f64,
    ) -> Result<bool> {
        let SessionState::Drawing { stroke } = self.state else {
            return Ok(false);
        };
        self.record(store, stroke, mapper, x, y)
    }

    /// Seal the stroke. The release position is not recorded.
    ///
    /// Returns the sealed stroke id, or `None` when idle or when the gesture
    /// was a click.
    pub fn pointer_up(&mut self, store: &mut StrokeStore) -> Result<Option<StrokeId>> {
        self.finish(store)
    }

    /// End the open gesture, if any. Strokes shorter than
    /// [`MIN_GESTURE_POINTS`] are discarded and their id given back.
    pub fn finish(&mut self, store: &mut StrokeStore) -> Result<Option<StrokeId>> {
        let SessionState::Drawing { stroke } = std::mem::take(&mut self.state) else {
            return Ok(None);
        };
        if store.open_point_count(stroke).unwrap_or(0) < MIN_GESTURE_POINTS {
            store.discard_stroke(stroke)?;
            return Ok(None);
        }
        let kept = store.end_stroke(stroke)?;
        Ok(kept.then_some(stroke))
    }

    /// Forget the current gesture without touching the store.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }

    fn record(
        &mut self,
        store: &mut StrokeStore,
        stroke: StrokeId,
        mapper: &CoordinateMapper,
        x: f64,
        y: f64,
    ) -> Result<bool> {
        if !(x.is_finite() && y.is_finite()) {
            trace!(stroke, x, y, "non-finite sample skipped");
            return Ok(false);
        }
        let point = mapper.to_data(x, y);
        if !self.keep_duplicates && store.last_open_point(stroke) == Some(&point) {
            trace!(stroke, x, y, "duplicate sample skipped");
            return Ok(false);
        }
        store.append_point(stroke, point)?;
        Ok(true)
    }
}
