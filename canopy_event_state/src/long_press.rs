// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long-press recognition for touch input.
//!
//! A press fires once the pointer has been held for [`LongPressConfig::delay_ms`]
//! without travelling farther than [`LongPressConfig::slop`] from where it went
//! down. Moving farther first abandons the press for good; callers usually
//! reinterpret such a touch as a pan.
//!
//! The state never reads a clock. Feed it timestamps from pointer events and
//! call [`LongPressState::poll`] from a periodic tick.

use kurbo::Point;

/// Thresholds for long-press recognition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LongPressConfig {
    /// How long the pointer must be held, in milliseconds (default: 400).
    pub delay_ms: u64,
    /// How far the pointer may wander before the press is abandoned (default: 10).
    pub slop: f64,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            delay_ms: 400,
            slop: 10.0,
        }
    }
}

/// What a move did to a pending long press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressMove {
    /// Nothing was pending.
    Idle,
    /// Still within the slop; keep waiting.
    Pending,
    /// The pointer left the slop before the press fired.
    Abandoned,
    /// The press already fired; moves no longer matter to it.
    Fired,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Press {
    origin: Point,
    down_ms: u64,
    fired: bool,
}

/// Tracks at most one pending long press.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LongPressState {
    config: LongPressConfig,
    press: Option<Press>,
}

impl LongPressState {
    /// Creates an idle recognizer.
    #[must_use]
    pub fn new(config: LongPressConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LongPressConfig {
        &self.config
    }

    /// Starts waiting on a press at `pos`, made at `now_ms`.
    pub fn start(&mut self, pos: Point, now_ms: u64) {
        self.press = Some(Press {
            origin: pos,
            down_ms: now_ms,
            fired: false,
        });
    }

    /// Returns where the current press went down.
    #[must_use]
    pub fn origin(&self) -> Option<Point> {
        self.press.map(|p| p.origin)
    }

    /// Returns `true` while a press is waiting to fire.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.press.is_some_and(|p| !p.fired)
    }

    /// Returns `true` once the current press has fired.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.press.is_some_and(|p| p.fired)
    }

    /// Records a pointer move.
    ///
    /// Leaving the slop before the press fires abandons it; the state becomes idle.
    pub fn on_move(&mut self, pos: Point) -> PressMove {
        let Some(press) = self.press else {
            return PressMove::Idle;
        };
        if press.fired {
            return PressMove::Fired;
        }
        let slop = self.config.slop;
        if (pos - press.origin).hypot2() > slop * slop {
            self.press = None;
            PressMove::Abandoned
        } else {
            PressMove::Pending
        }
    }

    /// Returns `true` exactly once, on the first call at or after the delay.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match &mut self.press {
            Some(press) if !press.fired => {
                if now_ms.saturating_sub(press.down_ms) >= self.config.delay_ms {
                    press.fired = true;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Forgets any press.
    pub fn cancel(&mut self) {
        self.press = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_delay() {
        let mut press = LongPressState::new(LongPressConfig::default());
        press.start(Point::new(0.0, 0.0), 1_000);
        assert!(press.is_pending());
        assert!(!press.poll(1_399));
        assert!(press.poll(1_400));
        assert!(press.has_fired());
        assert!(!press.poll(2_000));
        assert_eq!(press.on_move(Point::new(500.0, 0.0)), PressMove::Fired);
    }

    #[test]
    fn small_moves_keep_waiting() {
        let mut press = LongPressState::new(LongPressConfig::default());
        press.start(Point::new(10.0, 10.0), 0);
        assert_eq!(press.on_move(Point::new(16.0, 18.0)), PressMove::Pending);
        assert!(press.poll(400));
    }

    #[test]
    fn leaving_slop_abandons() {
        let mut press = LongPressState::new(LongPressConfig::default());
        press.start(Point::new(10.0, 10.0), 0);
        assert_eq!(press.on_move(Point::new(21.0, 10.0)), PressMove::Abandoned);
        assert!(!press.is_pending());
        assert!(!press.poll(10_000));
        assert_eq!(press.on_move(Point::new(10.0, 10.0)), PressMove::Idle);
    }

    #[test]
    fn clock_going_backwards_does_not_fire() {
        let mut press = LongPressState::new(LongPressConfig::default());
        press.start(Point::ZERO, 5_000);
        assert!(!press.poll(100));
        press.cancel();
        assert_eq!(press.origin(), None);
    }
}
