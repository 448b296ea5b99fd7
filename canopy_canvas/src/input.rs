// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input types fed to the engine by the host.

use kurbo::Point;

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0001;
        /// Control.
        const CTRL  = 0b0010;
        /// Command on macOS, the Windows key elsewhere.
        const META  = 0b0100;
        /// Alt / Option.
        const ALT   = 0b1000;
    }
}

impl Modifiers {
    /// Returns `true` if Ctrl or Cmd is held; either one toggles membership on click.
    #[must_use]
    pub fn toggles(self) -> bool {
        self.intersects(Self::CTRL | Self::META)
    }
}

/// Which device produced a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// A mouse or trackpad.
    #[default]
    Mouse,
    /// A finger.
    Touch,
    /// A stylus.
    Pen,
}

/// What a pointer-down on empty canvas starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToolMode {
    /// Dragging empty canvas pans the camera.
    Pan,
    /// Dragging empty canvas draws a selection box.
    #[default]
    Select,
}

/// Keys the engine reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Cancels the gesture in progress.
    Escape,
    /// Anything else; ignored.
    Other,
}

/// A pointer event in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Position in viewport pixels.
    pub position: Point,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// Device kind.
    pub kind: PointerKind,
    /// Timestamp in milliseconds; only differences matter.
    pub time_ms: u64,
}

impl PointerEvent {
    /// A mouse event at `(x, y)` with no modifiers, at time zero.
    #[must_use]
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            modifiers: Modifiers::empty(),
            kind: PointerKind::Mouse,
            time_ms: 0,
        }
    }

    /// A touch event at `(x, y)`, at time zero.
    #[must_use]
    pub fn touch(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Touch,
            ..Self::mouse(x, y)
        }
    }

    /// Sets the held modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn at(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }
}
