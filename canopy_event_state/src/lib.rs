// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Event State: pointer state managers for canvas editors.
//!
//! Small, framework-free state machines that track one interaction pattern
//! across several pointer events:
//!
//! - [`drag`]: tells a click from a drag with a movement threshold, and moves
//!   a group of items by fixed offsets from the grab point so they never drift.
//! - [`long_press`]: waits for a stationary touch to be held long enough,
//!   giving up as soon as it moves too far.
//!
//! Timestamps are plain `u64` milliseconds supplied by the caller, so the
//! managers never read a clock and tests stay deterministic.
//!
//! ### Group drags
//!
//! ```rust
//! # #[cfg(feature = "drag")]
//! # fn example() {
//! use kurbo::Point;
//! use canopy_event_state::drag::GroupDrag;
//!
//! // Grab at (10, 10); two items start at (0, 0) and (100, 50).
//! let drag = GroupDrag::new(
//!     Point::new(10.0, 10.0),
//!     [("a", Point::new(0.0, 0.0)), ("b", Point::new(100.0, 50.0))],
//! );
//!
//! let moved: Vec<_> = drag.positions_at(Point::new(30.0, 15.0)).collect();
//! assert_eq!(moved, [(&"a", Point::new(20.0, 5.0)), (&"b", Point::new(120.0, 55.0))]);
//! # }
//! ```
//!
//! ### Long press
//!
//! ```rust
//! # #[cfg(feature = "long_press")]
//! # fn example() {
//! use kurbo::Point;
//! use canopy_event_state::long_press::{LongPressConfig, LongPressState};
//!
//! let mut press = LongPressState::new(LongPressConfig::default());
//! press.start(Point::new(50.0, 50.0), 1_000);
//! assert!(!press.poll(1_200));
//! assert!(press.poll(1_400));
//! // Fires once.
//! assert!(!press.poll(1_500));
//! # }
//! ```
//!
//! ## Features
//!
//! - `drag`: thresholded drags and group offsets (requires `kurbo`)
//! - `long_press`: touch long-press recognition (requires `kurbo`)
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

#[cfg(feature = "drag")]
pub mod drag;

#[cfg(feature = "long_press")]
pub mod long_press;
