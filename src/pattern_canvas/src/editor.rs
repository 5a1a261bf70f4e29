//! The per-window drawing core that a UI shell talks to.
//!
//! A [`PatternEditor`] owns one market series, one stroke store and one
//! drawing session. Construct one per user or window; a server hosting several
//! clients keeps one editor per client.

use std::path::Path;

use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::errors::{PatternError, Result};
use crate::io::{market_csv, pattern_csv};
use crate::mapper::CoordinateMapper;
use crate::models::market::{MarketSeries, SeriesSummary};
use crate::models::stroke::{Stroke, StrokeId};
use crate::models::viewport::Viewport;
use crate::session::DrawingSession;
use crate::store::StrokeStore;

#[derive(Debug, Clone)]
pub struct PatternEditor {
    config: EditorConfig,
    series: Option<MarketSeries>,
    viewport: Viewport,
    store: StrokeStore,
    session: DrawingSession,
}

impl Default for PatternEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl PatternEditor {
    pub fn new(config: EditorConfig) -> Self {
        let session =
            DrawingSession::new().with_duplicate_points(!config.session.skip_duplicate_points);
        Self {
            viewport: config.viewport,
            config,
            series: None,
            store: StrokeStore::new(),
            session,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // --- market data ------------------------------------------------------

    /// Parse and install market data, replacing any previous series.
    ///
    /// Drawn patterns are kept; they live in data space.
    pub fn load_series(&mut self, csv_text: &str) -> Result<&MarketSeries> {
        let series = market_csv::load_series(csv_text)?;
        info!(records = series.len(), "market data loaded");
        Ok(self.series.insert(series))
    }

    pub fn load_series_path(&mut self, path: impl AsRef<Path>) -> Result<&MarketSeries> {
        let text = std::fs::read_to_string(path)?;
        self.load_series(&text)
    }

    pub fn series(&self) -> Option<&MarketSeries> {
        self.series.as_ref()
    }

    /// Status overview, or `None` before any data is loaded.
    pub fn summary(&self) -> Option<SeriesSummary> {
        self.series.as_ref().map(|s| s.summary(self.store.len()))
    }

    // --- mapping ----------------------------------------------------------

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Record a new canvas size; subsequent pointer events map against it.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// A mapper for an arbitrary viewport over the loaded series.
    pub fn mapper_for(&self, viewport: Viewport) -> Result<CoordinateMapper> {
        let series = self.series.as_ref().ok_or(PatternError::SeriesNotLoaded)?;
        Ok(CoordinateMapper::new(
            series.bounds(),
            viewport,
            self.config.mapping_options(),
        ))
    }

    /// A mapper for the current viewport.
    pub fn mapper(&self) -> Result<CoordinateMapper> {
        self.mapper_for(self.viewport)
    }

    // --- drawing ----------------------------------------------------------

    pub fn drawing_enabled(&self) -> bool {
        self.session.drawing_enabled()
    }

    pub fn set_drawing_enabled(&mut self, enabled: bool) -> Result<()> {
        self.session.set_drawing_enabled(enabled, &mut self.store)
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<Option<StrokeId>> {
        if !self.session.drawing_enabled() {
            return Ok(None);
        }
        let mapper = self.mapper()?;
        self.session.pointer_down(&mut self.store, &mapper, x, y)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<bool> {
        if !self.session.is_drawing() {
            return Ok(false);
        }
        let mapper = self.mapper()?;
        self.session.pointer_move(&mut self.store, &mapper, x, y)
    }

    /// End the gesture. A click without drag leaves no stroke.
    pub fn pointer_up(&mut self) -> Result<Option<StrokeId>> {
        self.session.pointer_up(&mut self.store)
    }

    // --- patterns ---------------------------------------------------------

    pub fn strokes(&self) -> &[Stroke] {
        self.store.all_strokes()
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    /// Pattern CSV for every sealed stroke.
    pub fn export_patterns(&self) -> Result<String> {
        pattern_csv::encode_patterns(self.store.all_strokes())
    }

    /// Replace all strokes with the contents of a pattern CSV.
    ///
    /// On error nothing changes. On success any gesture in progress is dropped.
    pub fn import_patterns(&mut self, csv_text: &str) -> Result<()> {
        let strokes = pattern_csv::decode_patterns(csv_text)?;
        self.install(strokes)
    }

    /// Like [`import_patterns`](Self::import_patterns) for files without a
    /// `stroke_id` column.
    pub fn import_legacy_patterns(&mut self, csv_text: &str) -> Result<()> {
        let strokes = pattern_csv::decode_legacy_patterns(csv_text, self.config.legacy_gap())?;
        self.install(strokes)
    }

    pub fn clear_patterns(&mut self) {
        self.session.reset();
        self.store.clear();
        debug!("patterns cleared");
    }

    pub fn export_patterns_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = self.export_patterns()?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn import_patterns_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        self.import_patterns(&text)
    }

    fn install(&mut self, strokes: Vec<Stroke>) -> Result<()> {
        self.store.replace_all(strokes)?;
        self.session.reset();
        info!(
            strokes = self.store.len(),
            points = self.store.point_count(),
            "patterns imported"
        );
        Ok(())
    }
}
