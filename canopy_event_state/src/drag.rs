// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag helpers: click-versus-drag thresholds and drift-free group moves.
//!
//! ## Usage
//!
//! 1) On pointer down, call [`DragState::start`] with the pointer position.
//! 2) On each move, call [`DragState::update`]; it reports the delta since the
//!    previous move and, once the pointer has travelled past the threshold,
//!    [`DragState::is_dragging`] turns `true` and stays `true`.
//! 3) On release, [`DragState::end`] tells whether the press was a drag; a
//!    press that never crossed the threshold is a click.
//!
//! To move several items together, capture a [`GroupDrag`] once, when the
//! drag begins, and ask it for positions on every move. Offsets are measured
//! from the grab point and never accumulated, so rounding cannot drift.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use canopy_event_state::drag::DragState;
//!
//! let mut drag = DragState::with_threshold(4.0);
//! drag.start(Point::new(10.0, 20.0));
//!
//! // 3px: still a click.
//! drag.update(Point::new(13.0, 20.0));
//! assert!(!drag.is_dragging());
//!
//! // 6px from the start: now a drag.
//! drag.update(Point::new(16.0, 20.0));
//! assert!(drag.is_dragging());
//! assert!(drag.end());
//! ```

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

/// Tracks one press from pointer down to pointer up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    /// Where the press started, while one is active.
    pub start_pos: Option<Point>,
    /// Last recorded pointer position.
    pub last_pos: Option<Point>,
    /// Distance the pointer must travel from the start before the press counts as a drag.
    pub threshold: f64,
    exceeded: bool,
}

impl DragState {
    /// Creates an idle state that turns presses into drags after `threshold` units of travel.
    ///
    /// Negative or non-finite thresholds count as zero.
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: if threshold.is_finite() { threshold.max(0.0) } else { 0.0 },
            ..Self::default()
        }
    }

    /// Starts tracking a new press at `pos`, discarding any previous one.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.exceeded = false;
    }

    /// Records a move, returning the delta since the previous position.
    ///
    /// Returns `None` when no press is active.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        let start = self.start_pos?;
        let delta = self.last_pos.map_or(Vec2::ZERO, |last| pos - last);
        self.last_pos = Some(pos);
        if !self.exceeded && (pos - start).hypot2() > self.threshold * self.threshold {
            self.exceeded = true;
        }
        Some(delta)
    }

    /// Returns the offset of `current_pos` from the start of the press.
    #[must_use]
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// Returns `true` while a press is being tracked.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.start_pos.is_some()
    }

    /// Returns `true` once the active press has moved past the threshold.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some() && self.exceeded
    }

    /// Ends the press and resets state. Returns whether it had become a drag.
    pub fn end(&mut self) -> bool {
        let was_drag = self.is_dragging();
        self.start_pos = None;
        self.last_pos = None;
        self.exceeded = false;
        was_drag
    }
}

/// Offsets of a group of items from the point where they were grabbed.
///
/// Items keep the order they were captured in.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupDrag<K> {
    grab: Point,
    offsets: Vec<(K, Vec2)>,
}

impl<K> GroupDrag<K> {
    /// Captures each item's offset from `grab`.
    pub fn new(grab: Point, items: impl IntoIterator<Item = (K, Point)>) -> Self {
        let offsets = items.into_iter().map(|(k, origin)| (k, origin - grab)).collect();
        Self { grab, offsets }
    }

    /// Returns the grab point.
    #[must_use]
    pub fn grab_point(&self) -> Point {
        self.grab
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns `true` if no items are being dragged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Iterates over the dragged keys in capture order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.offsets.iter().map(|(k, _)| k)
    }

    /// Returns every item's position with the pointer at `pointer`.
    pub fn positions_at(&self, pointer: Point) -> impl Iterator<Item = (&K, Point)> + '_ {
        self.offsets.iter().map(move |(k, off)| (k, pointer + *off))
    }

    /// Returns one item's position with the pointer at `pointer`.
    #[must_use]
    pub fn position_of(&self, key: &K, pointer: Point) -> Option<Point>
    where
        K: PartialEq,
    {
        self.offsets
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, off)| pointer + *off)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn idle_state_reports_nothing() {
        let mut drag = DragState::default();
        assert_eq!(drag.update(Point::new(1.0, 1.0)), None);
        assert_eq!(drag.total_offset(Point::new(1.0, 1.0)), None);
        assert!(!drag.is_pressed());
        assert!(!drag.end());
    }

    #[test]
    fn deltas_are_incremental() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0));
        assert_eq!(drag.update(Point::new(5.0, 3.0)), Some(Vec2::new(5.0, 3.0)));
        assert_eq!(drag.update(Point::new(8.0, 7.0)), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(drag.total_offset(Point::new(8.0, 7.0)), Some(Vec2::new(8.0, 7.0)));
    }

    #[test]
    fn threshold_separates_clicks_from_drags() {
        let mut drag = DragState::with_threshold(5.0);
        drag.start(Point::new(100.0, 100.0));
        drag.update(Point::new(103.0, 104.0));
        assert!(!drag.is_dragging(), "exactly on the threshold is still a click");
        assert!(!drag.end());

        drag.start(Point::new(100.0, 100.0));
        drag.update(Point::new(110.0, 100.0));
        // Coming back does not undo the drag.
        drag.update(Point::new(100.0, 100.0));
        assert!(drag.is_dragging());
        assert!(drag.end());
        assert!(!drag.is_pressed());
    }

    #[test]
    fn bad_thresholds_become_zero() {
        assert_eq!(DragState::with_threshold(-3.0).threshold, 0.0);
        assert_eq!(DragState::with_threshold(f64::NAN).threshold, 0.0);
    }

    #[test]
    fn restart_discards_previous_press() {
        let mut drag = DragState::with_threshold(1.0);
        drag.start(Point::new(0.0, 0.0));
        drag.update(Point::new(50.0, 0.0));
        drag.start(Point::new(50.0, 60.0));
        assert!(!drag.is_dragging());
        assert_eq!(drag.total_offset(Point::new(55.0, 65.0)), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn group_offsets_do_not_drift() {
        let group = GroupDrag::new(
            Point::new(0.5, 0.25),
            [(1_u32, Point::new(10.0, 10.0)), (2, Point::new(-40.5, 7.25))],
        );
        assert_eq!(group.len(), 2);
        assert_eq!(group.keys().copied().collect::<Vec<_>>(), [1, 2]);

        // Many small moves, then back to the grab point.
        for i in 0..1000 {
            let step = f64::from(i) * 0.013;
            let _ = group.positions_at(Point::new(0.5 + step, 0.25 - step)).count();
        }
        let back: Vec<_> = group.positions_at(group.grab_point()).collect();
        assert_eq!(back, [(&1, Point::new(10.0, 10.0)), (&2, Point::new(-40.5, 7.25))]);
        assert_eq!(group.position_of(&3, Point::ZERO), None);
    }
}
