//! In-memory stroke collection with identifier allocation.
//!
//! Identifier policy: ids start at 0 and grow by one per `begin_stroke`. When
//! a stroke is discarded and it was the most recently allocated id, that id
//! is handed out again, so exported ids stay dense. `clear` resets allocation
//! to 0; `replace_all` resumes it above the largest installed id. `u32::MAX`
//! is never allocated or installed, so the next id always fits.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::errors::{PatternError, Result};
use crate::models::stroke::{PatternPoint, Stroke, StrokeId};

#[derive(Debug, Default, Clone)]
pub struct StrokeStore {
    sealed: Vec<Stroke>,
    open: IndexMap<StrokeId, Stroke>,
    next_id: StrokeId,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new, empty, open stroke.
    ///
    /// Fails with [`PatternError::InvalidStroke`] once the id space is used up.
    pub fn begin_stroke(&mut self) -> Result<StrokeId> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(PatternError::InvalidStroke { id })?;
        self.open.insert(id, Stroke::new(id));
        trace!(stroke = id, "stroke opened");
        Ok(id)
    }

    /// Append a point to an open stroke.
    pub fn append_point(&mut self, id: StrokeId, point: PatternPoint) -> Result<()> {
        let stroke = self
            .open
            .get_mut(&id)
            .ok_or(PatternError::InvalidStroke { id })?;
        stroke.points.push(point);
        Ok(())
    }

    /// Last point of an open stroke, if any.
    pub fn last_open_point(&self, id: StrokeId) -> Option<&PatternPoint> {
        self.open.get(&id).and_then(Stroke::last_point)
    }

    /// Points recorded so far in an open stroke, or `None` if it is not open.
    pub fn open_point_count(&self, id: StrokeId) -> Option<usize> {
        self.open.get(&id).map(Stroke::len)
    }

    /// Seal an open stroke. Returns `false` when it had no points and was discarded.
    pub fn end_stroke(&mut self, id: StrokeId) -> Result<bool> {
        let stroke = self
            .open
            .shift_remove(&id)
            .ok_or(PatternError::InvalidStroke { id })?;

        if stroke.is_empty() {
            self.release_id(id);
            trace!(stroke = id, "empty stroke discarded");
            return Ok(false);
        }

        debug!(stroke = id, points = stroke.len(), "stroke sealed");
        self.sealed.push(stroke);
        Ok(true)
    }

    /// Drop an open stroke whatever it holds, giving its id back like an
    /// empty [`end_stroke`](Self::end_stroke).
    pub fn discard_stroke(&mut self, id: StrokeId) -> Result<()> {
        let stroke = self
            .open
            .shift_remove(&id)
            .ok_or(PatternError::InvalidStroke { id })?;
        self.release_id(id);
        trace!(stroke = id, points = stroke.len(), "stroke discarded");
        Ok(())
    }

    fn release_id(&mut self, id: StrokeId) {
        if self.next_id.checked_sub(1) == Some(id) {
            self.next_id = id;
        }
    }

    /// Drop every stroke, open or sealed, and restart ids at 0.
    pub fn clear(&mut self) {
        self.sealed.clear();
        self.open.clear();
        self.next_id = 0;
    }

    /// Sealed strokes: creation order for drawn strokes, file order for imported ones.
    pub fn all_strokes(&self) -> &[Stroke] {
        &self.sealed
    }

    pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
        self.sealed.iter().find(|s| s.id == id)
    }

    /// Install a complete replacement set. Open strokes are dropped.
    ///
    /// Errors:
    /// - [`PatternError::InvalidStroke`] for an empty stroke, a repeated id or
    ///   the id `u32::MAX`; the store is left untouched.
    pub fn replace_all(&mut self, strokes: Vec<Stroke>) -> Result<()> {
        let mut seen = HashSet::with_capacity(strokes.len());
        let mut next_id: StrokeId = 0;
        for s in &strokes {
            if s.is_empty() || !seen.insert(s.id) {
                return Err(PatternError::InvalidStroke { id: s.id });
            }
            let after = s
                .id
                .checked_add(1)
                .ok_or(PatternError::InvalidStroke { id: s.id })?;
            next_id = next_id.max(after);
        }

        self.next_id = next_id;
        self.sealed = strokes;
        self.open.clear();
        Ok(())
    }

    /// Number of sealed strokes.
    pub fn len(&self) -> usize {
        self.sealed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sealed.is_empty()
    }

    /// Total points across sealed strokes.
    pub fn point_count(&self) -> usize {
        self.sealed.iter().map(Stroke::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn pt(h: u32, price: f64) -> PatternPoint {
        PatternPoint::new(
            NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            price,
        )
    }

    #[test]
    fn ids_increase_from_zero() {
        let mut store = StrokeStore::new();
        for expected in 0..3 {
            let id = store.begin_stroke().unwrap();
            assert_eq!(id, expected);
            store.append_point(id, pt(1, 100.0)).unwrap();
            assert!(store.end_stroke(id).unwrap());
        }
        let ids: Vec<_> = store.all_strokes().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(store.point_count(), 3);
    }

    #[test]
    fn empty_stroke_is_discarded_and_id_reused() {
        let mut store = StrokeStore::new();
        let id = store.begin_stroke().unwrap();
        assert!(!store.end_stroke(id).unwrap());
        assert!(store.all_strokes().is_empty());

        assert_eq!(store.begin_stroke().unwrap(), id);
    }

    #[test]
    fn append_to_sealed_or_unknown_stroke_fails() {
        let mut store = StrokeStore::new();
        let id = store.begin_stroke().unwrap();
        store.append_point(id, pt(1, 1.0)).unwrap();
        store.end_stroke(id).unwrap();

        let err = store.append_point(id, pt(2, 2.0)).unwrap_err();
        assert!(matches!(err, PatternError::InvalidStroke { id: 0 }));
        assert!(matches!(
            store.append_point(99, pt(2, 2.0)),
            Err(PatternError::InvalidStroke { id: 99 })
        ));
        assert!(matches!(
            store.end_stroke(id),
            Err(PatternError::InvalidStroke { id: 0 })
        ));
    }

    #[test]
    fn points_keep_drawing_order() {
        let mut store = StrokeStore::new();
        let id = store.begin_stroke().unwrap();
        // drawn backwards in time
        store.append_point(id, pt(5, 1.0)).unwrap();
        store.append_point(id, pt(3, 2.0)).unwrap();
        store.append_point(id, pt(4, 3.0)).unwrap();
        store.end_stroke(id).unwrap();

        let prices: Vec<_> = store.get(id).unwrap().points.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn clear_resets_ids() {
        let mut store = StrokeStore::new();
        let id = store.begin_stroke().unwrap();
        store.append_point(id, pt(1, 1.0)).unwrap();
        store.end_stroke(id).unwrap();
        store.begin_stroke().unwrap();

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.begin_stroke().unwrap(), 0);
    }

    #[test]
    fn replace_all_resumes_above_max_id() {
        let mut store = StrokeStore::new();
        store
            .replace_all(vec![
                Stroke::with_points(4, vec![pt(1, 1.0)]),
                Stroke::with_points(2, vec![pt(2, 2.0), pt(3, 3.0)]),
            ])
            .unwrap();

        let ids: Vec<_> = store.all_strokes().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![4, 2]);
        assert_eq!(store.begin_stroke().unwrap(), 5);
    }

    #[test]
    fn replace_all_rejects_bad_sets_without_touching_store() {
        let mut store = StrokeStore::new();
        let id = store.begin_stroke().unwrap();
        store.append_point(id, pt(1, 1.0)).unwrap();
        store.end_stroke(id).unwrap();

        let dup = vec![
            Stroke::with_points(1, vec![pt(1, 1.0)]),
            Stroke::with_points(1, vec![pt(2, 1.0)]),
        ];
        assert!(matches!(
            store.replace_all(dup),
            Err(PatternError::InvalidStroke { id: 1 })
        ));
        assert!(matches!(
            store.replace_all(vec![Stroke::new(7)]),
            Err(PatternError::InvalidStroke { id: 7 })
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.begin_stroke().unwrap(), 1);
    }

    #[test]
    fn replace_with_nothing_restarts_at_zero() {
        let mut store = StrokeStore::new();
        store.begin_stroke().unwrap();
        store.replace_all(Vec::new()).unwrap();
        assert_eq!(store.begin_stroke().unwrap(), 0);
    }

    #[test]
    fn discarded_stroke_gives_its_id_back() {
        let mut store = StrokeStore::new();
        let id = store.begin_stroke().unwrap();
        store.append_point(id, pt(1, 1.0)).unwrap();
        assert_eq!(store.open_point_count(id), Some(1));

        store.discard_stroke(id).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.open_point_count(id), None);
        assert_eq!(store.begin_stroke().unwrap(), id);
        assert!(matches!(
            store.discard_stroke(42),
            Err(PatternError::InvalidStroke { id: 42 })
        ));
    }

    #[test]
    fn largest_ids_do_not_overflow() {
        let mut store = StrokeStore::new();
        assert!(matches!(
            store.replace_all(vec![Stroke::with_points(u32::MAX, vec![pt(1, 1.0)])]),
            Err(PatternError::InvalidStroke { id: u32::MAX })
        ));
        assert!(store.is_empty());

        store
            .replace_all(vec![Stroke::with_points(u32::MAX - 1, vec![pt(1, 1.0)])])
            .unwrap();
        assert!(matches!(
            store.begin_stroke(),
            Err(PatternError::InvalidStroke { id: u32::MAX })
        ));
        assert_eq!(store.len(), 1);
    }
}
