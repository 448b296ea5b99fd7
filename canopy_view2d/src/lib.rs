// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy View 2D: the camera of a mind-map canvas.
//!
//! This crate provides a small, headless model of the pan/zoom camera that
//! maps world‑space node positions onto the pixels of a viewport:
//! - [`Camera`]: the current [`CameraTransform`] plus zoom limits, with
//!   zoom/pan/fit/center operations.
//! - [`geometry`]: hit-testing and bounding-box helpers shared by layout and
//!   gesture code.
//! - [`cull`]: the viewport culler that filters node boxes down to the ones
//!   that intersect the screen.
//!
//! It does **not** own the node tree or any rendering backend. Animation of
//! camera moves is a presentation concern: hosts may sample
//! [`CameraTransform::lerp`] between the old and new transform, and every
//! sample stays within the configured scale range.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use canopy_view2d::Camera;
//!
//! let mut camera = Camera::new(Size::new(800.0, 600.0));
//!
//! // Fit a world-space bounding box with 10% breathing room.
//! camera.zoom_to_fit(Rect::new(-100.0, -50.0, 100.0, 50.0), Size::new(800.0, 600.0), 0.9);
//!
//! // Convert a pointer position into world space for hit testing.
//! let world = camera.screen_to_world(Point::new(400.0, 300.0));
//! assert!(world.x.abs() < 1e-9 && world.y.abs() < 1e-9);
//! ```
//!
//! ## Culling example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use canopy_view2d::{Camera, cull};
//!
//! let camera = Camera::new(Size::new(800.0, 600.0));
//! let boxes = [
//!     ("near", Rect::new(10.0, 10.0, 60.0, 30.0)),
//!     ("far", Rect::new(5_000.0, 5_000.0, 5_050.0, 5_020.0)),
//! ];
//! let visible = cull::visible_keys(camera.transform(), camera.viewport_size(), boxes, 0.0);
//! assert_eq!(visible, ["near"]);
//! ```
//!
//! ## Design notes
//!
//! - The camera is axis‑aligned with a **uniform** zoom factor:
//!   `screen = world * scale + translate`.
//! - Scale is always clamped to `[min_scale, max_scale]`; translation is
//!   unbounded.
//! - Degenerate requests (zero-area fit bounds, non-positive zoom factors)
//!   are no-ops and report `false`.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod camera;
pub mod cull;
pub mod geometry;

pub use camera::{Camera, CameraTransform, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, DEFAULT_ZOOM_STEP};
