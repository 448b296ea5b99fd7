// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure geometry helpers: node boxes, point-in-box tests and bounds unions.
//!
//! A node's stored or computed position is the **top-left** corner of its
//! box. All tests here use closed intervals, so a point on a box edge counts
//! as inside; box selection relies on that when a rectangle is drawn exactly
//! around a node's position.

use kurbo::{Point, Rect, Size};

/// Returns the box of a node positioned at `position` (top-left) with `size`.
#[must_use]
pub fn node_box(position: Point, size: Size) -> Rect {
    Rect::from_origin_size(position, size)
}

/// Returns `true` if `pt` lies inside `rect`, edges included.
///
/// `rect` may be unordered (negative width or height).
#[must_use]
pub fn contains(rect: Rect, pt: Point) -> bool {
    let r = rect.abs();
    pt.x >= r.x0 && pt.x <= r.x1 && pt.y >= r.y0 && pt.y <= r.y1
}

/// Returns the rectangle spanned by two corner points dragged in any direction.
///
/// The result always has non-negative width and height.
#[must_use]
pub fn normalized_rect(a: Point, b: Point) -> Rect {
    Rect::from_points(a, b)
}

/// Returns `true` if the two rectangles overlap or touch.
#[must_use]
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    let (a, b) = (a.abs(), b.abs());
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Returns the smallest rectangle containing every input rectangle.
///
/// Returns `None` for an empty input.
pub fn union_bounds<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects
        .into_iter()
        .map(|r| r.abs())
        .reduce(|acc, r| acc.union(r))
}
