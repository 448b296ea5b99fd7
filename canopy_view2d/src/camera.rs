// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Smallest scale a [`Camera`] allows unless configured otherwise.
pub const DEFAULT_MIN_SCALE: f64 = 0.1;
/// Largest scale a [`Camera`] allows unless configured otherwise.
pub const DEFAULT_MAX_SCALE: f64 = 4.0;
/// Factor applied by [`Camera::zoom_in`] and divided out by [`Camera::zoom_out`].
pub const DEFAULT_ZOOM_STEP: f64 = 1.2;

/// Pan/zoom transform mapping world coordinates onto the viewport.
///
/// `screen = world * scale + (translate_x, translate_y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    /// Horizontal translation in screen pixels.
    pub translate_x: f64,
    /// Vertical translation in screen pixels.
    pub translate_y: f64,
    /// Uniform zoom factor.
    pub scale: f64,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CameraTransform {
    /// No pan, scale `1.0`.
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Creates a transform from a translation and scale.
    #[must_use]
    pub const fn new(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            scale,
        }
    }

    /// Returns the translation as a vector.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.translate_x, self.translate_y)
    }

    /// Returns the world → screen affine transform.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translation()) * Affine::scale(self.scale)
    }

    /// Maps a world point to screen space.
    #[must_use]
    pub fn world_to_screen(&self, pt: Point) -> Point {
        Point::new(
            pt.x * self.scale + self.translate_x,
            pt.y * self.scale + self.translate_y,
        )
    }

    /// Maps a screen point to world space.
    ///
    /// Callers must keep `scale` non-zero; [`Camera`] guarantees this.
    #[must_use]
    pub fn screen_to_world(&self, pt: Point) -> Point {
        Point::new(
            (pt.x - self.translate_x) / self.scale,
            (pt.y - self.translate_y) / self.scale,
        )
    }

    /// Maps a world rectangle to screen space.
    #[must_use]
    pub fn world_to_screen_rect(&self, rect: Rect) -> Rect {
        // Positive uniform scale keeps the rectangle axis-aligned and ordered.
        Rect::from_points(
            self.world_to_screen(rect.origin()),
            self.world_to_screen(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Interpolates toward `to`, clamping the sampled scale into `[min_scale, max_scale]`.
    ///
    /// Translation interpolates linearly. Scale interpolates linearly as
    /// well, which keeps samples between two in-range endpoints in range; the
    /// clamp covers endpoints that were produced under different limits.
    /// `t` is clamped into `[0, 1]`.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64, min_scale: f64, max_scale: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            translate_x: mix(self.translate_x, to.translate_x),
            translate_y: mix(self.translate_y, to.translate_y),
            scale: mix(self.scale, to.scale).clamp(min_scale, max_scale),
        }
    }
}

/// The camera of one canvas: a [`CameraTransform`], the viewport size and zoom limits.
///
/// Every mutating operation returns `true` if the transform changed, and
/// bumps [`Camera::revision`] in that case so a host can forward a
/// "transform changed" notification only for real changes.
#[derive(Clone, Debug)]
pub struct Camera {
    transform: CameraTransform,
    viewport: Size,
    min_scale: f64,
    max_scale: f64,
    zoom_step: f64,
    revision: u64,
}

impl Camera {
    /// Creates a camera for a viewport of `viewport` pixels.
    ///
    /// - Initial transform is [`CameraTransform::IDENTITY`].
    /// - Scale is clamped to [`DEFAULT_MIN_SCALE`]..=[`DEFAULT_MAX_SCALE`].
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            transform: CameraTransform::IDENTITY,
            viewport,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_step: DEFAULT_ZOOM_STEP,
            revision: 0,
        }
    }

    /// Returns the current transform.
    #[must_use]
    pub fn transform(&self) -> &CameraTransform {
        &self.transform
    }

    /// Returns the current scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    /// Returns the scale limits as `(min, max)`.
    #[must_use]
    pub fn scale_limits(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    /// Returns the revision counter, bumped on every transform change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the viewport size in pixels.
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// Sets the viewport size in pixels. The transform is left unchanged.
    pub fn set_viewport_size(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Sets the minimum and maximum scale, normalizing the order.
    ///
    /// Non-positive or non-finite limits are ignored. The current scale is
    /// clamped into the new range.
    pub fn set_scale_limits(&mut self, min_scale: f64, max_scale: f64) -> bool {
        if !valid_scale(min_scale) || !valid_scale(max_scale) {
            return false;
        }
        let (min_scale, max_scale) = if min_scale <= max_scale {
            (min_scale, max_scale)
        } else {
            (max_scale, min_scale)
        };
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        let mut next = self.transform;
        next.scale = self.clamp_scale(next.scale);
        self.apply(next)
    }

    /// Sets the factor used by [`Camera::zoom_in`] / [`Camera::zoom_out`].
    ///
    /// Factors of `1.0` or below are ignored.
    pub fn set_zoom_step(&mut self, step: f64) {
        if step.is_finite() && step > 1.0 {
            self.zoom_step = step;
        }
    }

    /// Replaces the transform, clamping its scale.
    ///
    /// Used when a document is opened with an externally chosen default view
    /// and when a host restores a saved view.
    pub fn set_transform(&mut self, transform: CameraTransform) -> bool {
        if !transform.translate_x.is_finite()
            || !transform.translate_y.is_finite()
            || !valid_scale(transform.scale)
        {
            return false;
        }
        let mut next = transform;
        next.scale = self.clamp_scale(next.scale);
        self.apply(next)
    }

    /// Multiplies the scale by `factor`, keeping `anchor` fixed on screen.
    ///
    /// Without an anchor the viewport center stays fixed. Non-positive or
    /// non-finite factors are ignored.
    pub fn zoom_by(&mut self, factor: f64, anchor: Option<Point>) -> bool {
        if !valid_scale(factor) {
            return false;
        }
        let anchor = anchor.unwrap_or_else(|| self.viewport_center());
        let old = self.transform;
        let new_scale = self.clamp_scale(old.scale * factor);
        if (new_scale - old.scale).abs() < f64::EPSILON {
            return false;
        }
        let world_at_anchor = old.screen_to_world(anchor);
        self.apply(CameraTransform {
            translate_x: anchor.x - world_at_anchor.x * new_scale,
            translate_y: anchor.y - world_at_anchor.y * new_scale,
            scale: new_scale,
        })
    }

    /// Zooms in by one step about the viewport center.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(self.zoom_step, None)
    }

    /// Zooms out by one step about the viewport center.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(1.0 / self.zoom_step, None)
    }

    /// Pans by a delta in screen pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        let mut next = self.transform;
        next.translate_x += dx;
        next.translate_y += dy;
        self.apply(next)
    }

    /// Fits world `bounds` into a viewport of `viewport` pixels.
    ///
    /// Chooses `scale = padding_ratio * min(vw / bw, vh / bh)` (then clamps it)
    /// and centers the bounds. The viewport size is remembered. Zero-area
    /// bounds or viewports and non-positive padding ratios are no-ops.
    pub fn zoom_to_fit(&mut self, bounds: Rect, viewport: Size, padding_ratio: f64) -> bool {
        if viewport.width > 0.0 && viewport.height > 0.0 {
            self.viewport = viewport;
        }
        let Some(target) = self.fit_transform(bounds, padding_ratio) else {
            return false;
        };
        self.apply(target)
    }

    /// Computes the transform [`Camera::zoom_to_fit`] would apply, without applying it.
    ///
    /// Hosts that animate camera moves use this as the animation target.
    #[must_use]
    pub fn fit_transform(&self, bounds: Rect, padding_ratio: f64) -> Option<CameraTransform> {
        let bounds = bounds.abs();
        let (bw, bh) = (bounds.width(), bounds.height());
        let (vw, vh) = (self.viewport.width, self.viewport.height);
        if !(bw > 0.0 && bh > 0.0 && vw > 0.0 && vh > 0.0) || !valid_scale(padding_ratio) {
            return None;
        }
        let scale = self.clamp_scale(padding_ratio * (vw / bw).min(vh / bh));
        let center = bounds.center();
        Some(CameraTransform {
            translate_x: vw / 2.0 - center.x * scale,
            translate_y: vh / 2.0 - center.y * scale,
            scale,
        })
    }

    /// Centers the viewport on `world_pt`.
    ///
    /// The scale is preserved unless `target_scale` is given, in which case
    /// it is clamped and applied as well.
    pub fn center_on(&mut self, world_pt: Point, target_scale: Option<f64>) -> bool {
        if !world_pt.x.is_finite() || !world_pt.y.is_finite() {
            return false;
        }
        let scale = match target_scale {
            Some(s) if valid_scale(s) => self.clamp_scale(s),
            _ => self.transform.scale,
        };
        let center = self.viewport_center();
        self.apply(CameraTransform {
            translate_x: center.x - world_pt.x * scale,
            translate_y: center.y - world_pt.y * scale,
            scale,
        })
    }

    /// Converts a screen point into world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, pt: Point) -> Point {
        self.transform.screen_to_world(pt)
    }

    /// Converts a world point into screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, pt: Point) -> Point {
        self.transform.world_to_screen(pt)
    }

    /// Returns the world rectangle currently visible through the viewport.
    #[must_use]
    pub fn visible_world_rect(&self) -> Rect {
        Rect::from_points(
            self.screen_to_world(Point::ZERO),
            self.screen_to_world(Point::new(self.viewport.width, self.viewport.height)),
        )
    }

    /// Interpolated transform between the current one and `target`.
    ///
    /// See [`CameraTransform::lerp`]; the configured scale limits apply.
    #[must_use]
    pub fn sample_toward(&self, target: &CameraTransform, t: f64) -> CameraTransform {
        self.transform
            .lerp(target, t, self.min_scale, self.max_scale)
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    fn apply(&mut self, next: CameraTransform) -> bool {
        if next == self.transform {
            return false;
        }
        self.transform = next;
        self.revision = self.revision.wrapping_add(1);
        true
    }
}

fn valid_scale(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size};

    use super::{Camera, CameraTransform, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE};

    fn camera() -> Camera {
        Camera::new(Size::new(800.0, 600.0))
    }

    #[test]
    fn screen_world_roundtrip() {
        let mut cam = camera();
        cam.set_transform(CameraTransform::new(30.0, -12.0, 1.5));

        let world_pt = Point::new(10.0, -5.0);
        let back = cam.screen_to_world(cam.world_to_screen(world_pt));
        assert!((back.x - world_pt.x).abs() < 1e-9);
        assert!((back.y - world_pt.y).abs() < 1e-9);
    }

    #[test]
    fn affine_matches_manual_mapping() {
        let t = CameraTransform::new(5.0, 7.0, 2.0);
        let p = Point::new(3.0, 4.0);
        let a = t.to_affine() * p;
        let b = t.world_to_screen(p);
        assert!((a - b).hypot() < 1e-9);
    }

    #[test]
    fn zoom_about_anchor_keeps_anchor_fixed() {
        let mut cam = camera();
        let anchor = Point::new(123.0, 456.0);
        let before = cam.screen_to_world(anchor);

        assert!(cam.zoom_by(2.0, Some(anchor)));
        let after = cam.screen_to_world(anchor);
        assert!((after.x - before.x).abs() < 1e-9);
        assert!((after.y - before.y).abs() < 1e-9);
        assert!((cam.scale() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn repeated_zoom_never_exceeds_max() {
        let mut cam = camera();
        for _ in 0..20 {
            cam.zoom_by(10.0, None);
            assert!(cam.scale() <= DEFAULT_MAX_SCALE);
        }
        assert_eq!(cam.scale(), DEFAULT_MAX_SCALE);
        for _ in 0..20 {
            cam.zoom_by(0.01, Some(Point::new(3.0, 3.0)));
            assert!(cam.scale() >= DEFAULT_MIN_SCALE);
        }
    }

    #[test]
    fn invalid_zoom_factors_are_ignored() {
        let mut cam = camera();
        assert!(!cam.zoom_by(0.0, None));
        assert!(!cam.zoom_by(-2.0, None));
        assert!(!cam.zoom_by(f64::NAN, None));
        assert_eq!(cam.revision(), 0);
    }

    #[test]
    fn zoom_to_fit_centers_and_pads() {
        let mut cam = camera();
        let bounds = Rect::new(0.0, 0.0, 400.0, 100.0);
        assert!(cam.zoom_to_fit(bounds, Size::new(800.0, 600.0), 0.5));

        // min(800 / 400, 600 / 100) = 2, padded by 0.5.
        assert!((cam.scale() - 1.0).abs() < 1e-12);
        let center = cam.world_to_screen(bounds.center());
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_to_fit_ignores_degenerate_bounds() {
        let mut cam = camera();
        let before = *cam.transform();
        assert!(!cam.zoom_to_fit(Rect::new(5.0, 5.0, 5.0, 50.0), Size::new(800.0, 600.0), 0.9));
        assert!(!cam.zoom_to_fit(Rect::new(0.0, 0.0, 10.0, 10.0), Size::ZERO, 0.9));
        assert_eq!(*cam.transform(), before);
    }

    #[test]
    fn center_on_preserves_scale_unless_given() {
        let mut cam = camera();
        cam.zoom_by(1.5, None);
        cam.center_on(Point::new(100.0, 100.0), None);
        assert!((cam.scale() - 1.5).abs() < 1e-12);
        let c = cam.world_to_screen(Point::new(100.0, 100.0));
        assert!((c.x - 400.0).abs() < 1e-9 && (c.y - 300.0).abs() < 1e-9);

        cam.center_on(Point::new(-20.0, 40.0), Some(100.0));
        assert_eq!(cam.scale(), DEFAULT_MAX_SCALE);
        let c = cam.world_to_screen(Point::new(-20.0, 40.0));
        assert!((c.x - 400.0).abs() < 1e-9 && (c.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn pan_is_unbounded_and_tracks_revision() {
        let mut cam = camera();
        assert!(cam.pan_by(1e7, -1e7));
        assert_eq!(cam.transform().translate_x, 1e7);
        assert!(!cam.pan_by(0.0, 0.0));
        assert_eq!(cam.revision(), 1);
    }

    #[test]
    fn lerp_samples_stay_in_range() {
        let cam = camera();
        let target = CameraTransform::new(100.0, 50.0, 50.0);
        for step in 0..=10 {
            let sample = cam.sample_toward(&target, f64::from(step) / 10.0);
            assert!(sample.scale >= DEFAULT_MIN_SCALE && sample.scale <= DEFAULT_MAX_SCALE);
        }
        let end = cam.sample_toward(&target, 1.0);
        assert_eq!(end.translate_x, 100.0);
    }

    #[test]
    fn scale_limits_clamp_current_scale() {
        let mut cam = camera();
        cam.zoom_by(3.0, None);
        assert!(cam.set_scale_limits(2.0, 0.5));
        assert_eq!(cam.scale_limits(), (0.5, 2.0));
        assert_eq!(cam.scale(), 2.0);
    }

    #[test]
    fn visible_world_rect_follows_pan_and_zoom() {
        let mut cam = camera();
        cam.set_transform(CameraTransform::new(-100.0, -50.0, 2.0));
        let visible = cam.visible_world_rect();
        assert!((visible.x0 - 50.0).abs() < 1e-9);
        assert!((visible.y0 - 25.0).abs() < 1e-9);
        assert!((visible.width() - 400.0).abs() < 1e-9);
    }
}
