// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport culling: keep only the node boxes that reach the screen.
//!
//! The culler is a pure filter. It runs on every camera change, so it maps
//! each world box to screen space with the current transform and tests it
//! against `[0, width] × [0, height]` (optionally grown by a margin) without
//! touching layout state.

use alloc::vec::Vec;

use kurbo::{Rect, Size};

use crate::CameraTransform;
use crate::geometry::rects_intersect;

/// Returns the screen-space rectangle that counts as visible.
///
/// `margin_px` grows the viewport on every side; negative margins are
/// treated as zero.
#[must_use]
pub fn screen_bounds(viewport: Size, margin_px: f64) -> Rect {
    let m = if margin_px.is_finite() { margin_px.max(0.0) } else { 0.0 };
    Rect::new(-m, -m, viewport.width + m, viewport.height + m)
}

/// Returns `true` if a world-space box is visible through the camera.
#[must_use]
pub fn is_visible(transform: &CameraTransform, viewport: Size, world_box: Rect, margin_px: f64) -> bool {
    rects_intersect(
        transform.world_to_screen_rect(world_box),
        screen_bounds(viewport, margin_px),
    )
}

/// Filters `(key, world_box)` pairs down to the keys visible through the camera.
///
/// Input order is preserved, so callers that pass boxes in paint order get
/// visible keys in paint order.
pub fn visible_keys<K, I>(
    transform: &CameraTransform,
    viewport: Size,
    boxes: I,
    margin_px: f64,
) -> Vec<K>
where
    I: IntoIterator<Item = (K, Rect)>,
{
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Vec::new();
    }
    let screen = screen_bounds(viewport, margin_px);
    boxes
        .into_iter()
        .filter(|(_, world_box)| rects_intersect(transform.world_to_screen_rect(*world_box), screen))
        .map(|(key, _)| key)
        .collect()
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Size};

    use super::{is_visible, visible_keys};
    use crate::CameraTransform;

    #[test]
    fn culls_boxes_outside_viewport() {
        let t = CameraTransform::IDENTITY;
        let boxes = [
            (1, Rect::new(-50.0, -50.0, -10.0, -10.0)),
            (2, Rect::new(-20.0, -20.0, 5.0, 5.0)),
            (3, Rect::new(790.0, 590.0, 900.0, 700.0)),
            (4, Rect::new(801.0, 0.0, 900.0, 10.0)),
        ];
        let visible = visible_keys(&t, Size::new(800.0, 600.0), boxes, 0.0);
        assert_eq!(visible, [2, 3]);
    }

    #[test]
    fn zoom_and_pan_move_boxes_into_view() {
        let far = Rect::new(1_000.0, 1_000.0, 1_010.0, 1_010.0);
        let viewport = Size::new(100.0, 100.0);
        assert!(!is_visible(&CameraTransform::IDENTITY, viewport, far, 0.0));

        let t = CameraTransform::new(-950.0, -950.0, 1.0);
        assert!(is_visible(&t, viewport, far, 0.0));

        let zoomed_out = CameraTransform::new(0.0, 0.0, 0.05);
        assert!(is_visible(&zoomed_out, viewport, far, 0.0));
    }

    #[test]
    fn margin_preloads_nearby_boxes() {
        let t = CameraTransform::IDENTITY;
        let near = Rect::new(820.0, 10.0, 840.0, 20.0);
        assert!(!is_visible(&t, Size::new(800.0, 600.0), near, 0.0));
        assert!(is_visible(&t, Size::new(800.0, 600.0), near, 32.0));
    }

    #[test]
    fn empty_viewport_sees_nothing() {
        let boxes = [(1, Rect::new(0.0, 0.0, 1.0, 1.0))];
        assert!(visible_keys(&CameraTransform::IDENTITY, Size::ZERO, boxes, 0.0).is_empty());
    }
}
