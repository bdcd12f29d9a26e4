//! Raw pointer input to tap/drag gestures.
//!
//! A press becomes a tap when released within [`TAP_MAX_MS`] without moving
//! more than [`DRAG_THRESHOLD`] pixels on either axis; moving further turns it
//! into a drag for the rest of the press.

use glam::Vec2;

use super::queue::InputEvent;

/// Longest press that still counts as a tap.
pub const TAP_MAX_MS: f64 = 300.0;
/// Per-axis movement in pixels that turns a press into a drag.
pub const DRAG_THRESHOLD: f32 = 10.0;

/// Raw pointer input as the host receives it. Positions are screen pixels,
/// times are host milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32, time_ms: f64 },
    Move { x: f32, y: f32 },
    Up { time_ms: f64 },
    /// Pointer left the window or the press was interrupted.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    at: Vec2,
    time_ms: f64,
}

#[derive(Debug, Clone)]
pub struct GestureTracker {
    press: Option<Press>,
    dragging: bool,
    tap_max_ms: f64,
    drag_threshold: f32,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::with_thresholds(TAP_MAX_MS, DRAG_THRESHOLD)
    }

    pub fn with_thresholds(tap_max_ms: f64, drag_threshold: f32) -> Self {
        Self {
            press: None,
            dragging: false,
            tap_max_ms,
            drag_threshold,
        }
    }

    /// Feed one raw event; returns the gesture it completes, if any.
    pub fn handle(&mut self, event: PointerEvent) -> Option<InputEvent> {
        match event {
            PointerEvent::Down { x, y, time_ms } => {
                self.pointer_down(Vec2::new(x, y), time_ms);
                None
            }
            PointerEvent::Move { x, y } => self.pointer_move(Vec2::new(x, y)),
            PointerEvent::Up { time_ms } => self.pointer_up(time_ms),
            PointerEvent::Cancel => self.cancel(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn pointer_down(&mut self, at: Vec2, now_ms: f64) {
        self.press = Some(Press { at, time_ms: now_ms });
        self.dragging = false;
    }

    pub fn pointer_move(&mut self, at: Vec2) -> Option<InputEvent> {
        let press = self.press?;
        let pull = press.at - at;
        if self.dragging {
            return Some(InputEvent::DragMove { dx: pull.x, dy: pull.y });
        }
        if pull.x.abs() > self.drag_threshold || pull.y.abs() > self.drag_threshold {
            self.dragging = true;
            return Some(InputEvent::DragStart);
        }
        None
    }

    /// Finish the press. A zero-length press is ignored: some browsers send a
    /// synthetic mouse release right after the touch release.
    pub fn pointer_up(&mut self, now_ms: f64) -> Option<InputEvent> {
        let press = self.press.take()?;
        if std::mem::take(&mut self.dragging) {
            return Some(InputEvent::DragEnd);
        }
        let held = now_ms - press.time_ms;
        if held > 0.0 && held < self.tap_max_ms {
            Some(InputEvent::Tap {
                x: press.at.x,
                y: press.at.y,
            })
        } else {
            None
        }
    }

    pub fn cancel(&mut self) -> Option<InputEvent> {
        self.press = None;
        if std::mem::take(&mut self.dragging) {
            Some(InputEvent::DragEnd)
        } else {
            None
        }
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_press_is_a_tap_at_press_point() {
        let mut g = GestureTracker::new();
        g.pointer_down(Vec2::new(100.0, 50.0), 1000.0);
        assert_eq!(g.pointer_move(Vec2::new(104.0, 47.0)), None);
        assert_eq!(
            g.pointer_up(1120.0),
            Some(InputEvent::Tap { x: 100.0, y: 50.0 })
        );
    }

    #[test]
    fn long_or_instant_press_is_ignored() {
        let mut g = GestureTracker::new();
        g.pointer_down(Vec2::ZERO, 1000.0);
        assert_eq!(g.pointer_up(1300.0), None);

        g.pointer_down(Vec2::ZERO, 1000.0);
        assert_eq!(g.pointer_up(1000.0), None);
    }

    #[test]
    fn movement_past_threshold_starts_drag() {
        let mut g = GestureTracker::new();
        g.pointer_down(Vec2::new(100.0, 100.0), 0.0);
        assert_eq!(g.pointer_move(Vec2::new(110.0, 100.0)), None);
        assert_eq!(g.pointer_move(Vec2::new(111.0, 100.0)), Some(InputEvent::DragStart));
        assert!(g.is_dragging());
        assert_eq!(
            g.pointer_move(Vec2::new(130.0, 90.0)),
            Some(InputEvent::DragMove { dx: -30.0, dy: 10.0 })
        );
        // A drag never ends in a tap, however short.
        assert_eq!(g.pointer_up(50.0), Some(InputEvent::DragEnd));
        assert!(!g.is_dragging());
    }

    #[test]
    fn move_without_press_does_nothing() {
        let mut g = GestureTracker::new();
        assert_eq!(g.pointer_move(Vec2::new(500.0, 500.0)), None);
        assert_eq!(g.pointer_up(10.0), None);
    }

    #[test]
    fn raw_events_through_handle() {
        let mut g = GestureTracker::with_thresholds(100.0, 4.0);
        assert_eq!(g.handle(PointerEvent::Down { x: 1.0, y: 1.0, time_ms: 0.0 }), None);
        assert_eq!(g.handle(PointerEvent::Up { time_ms: 150.0 }), None);

        g.handle(PointerEvent::Down { x: 1.0, y: 1.0, time_ms: 0.0 });
        assert_eq!(g.handle(PointerEvent::Move { x: 6.0, y: 1.0 }), Some(InputEvent::DragStart));
        assert_eq!(g.handle(PointerEvent::Cancel), Some(InputEvent::DragEnd));
    }

    #[test]
    fn cancel_ends_drag_and_drops_press() {
        let mut g = GestureTracker::new();
        g.pointer_down(Vec2::ZERO, 0.0);
        g.pointer_move(Vec2::new(50.0, 0.0));
        assert_eq!(g.cancel(), Some(InputEvent::DragEnd));
        assert_eq!(g.pointer_up(100.0), None);
        assert_eq!(g.cancel(), None);
    }
}
