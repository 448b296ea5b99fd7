// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_event_state::long_press::LongPressConfig;
use canopy_layout::LayoutConfig;
use canopy_view2d::{CameraTransform, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, DEFAULT_ZOOM_STEP};

/// How the camera is placed the first time a document arrives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InitialView {
    /// Use this transform.
    Fixed(CameraTransform),
    /// Fit the laid-out document into the viewport.
    FitContent,
}

impl Default for InitialView {
    fn default() -> Self {
        Self::Fixed(CameraTransform::IDENTITY)
    }
}

/// Tunables of a [`CanvasEngine`](crate::CanvasEngine).
///
/// Distances suffixed `_px` are screen pixels and do not change with zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasConfig {
    /// Spacing and default node size for the layout pass.
    pub layout: LayoutConfig,
    /// Smallest camera scale.
    pub min_scale: f64,
    /// Largest camera scale.
    pub max_scale: f64,
    /// Factor of one zoom-in or zoom-out step.
    pub zoom_step: f64,
    /// Share of the viewport a zoom-to-fit fills.
    pub fit_padding: f64,
    /// Pointer travel after which a press on a node becomes a drag.
    pub drag_threshold_px: f64,
    /// Box selections narrower or shorter than this leave the selection alone.
    pub box_select_min_px: f64,
    /// Half-width of the square link connector on a node's right edge.
    pub connector_radius_px: f64,
    /// Touch long-press that arms a box selection.
    pub long_press: LongPressConfig,
    /// Extra screen margin kept around the viewport when culling.
    pub cull_margin_px: f64,
    /// Camera placement for the first document.
    pub initial_view: InitialView,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_step: DEFAULT_ZOOM_STEP,
            fit_padding: 0.9,
            drag_threshold_px: 4.0,
            box_select_min_px: 4.0,
            connector_radius_px: 8.0,
            long_press: LongPressConfig::default(),
            cull_margin_px: 0.0,
            initial_view: InitialView::default(),
        }
    }
}
