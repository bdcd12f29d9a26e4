use glam::Vec2;

use super::queue::InputEvent;
use crate::components::color::Rgb;
use crate::core::session::Session;
use crate::systems::lighting::{is_illuminated, TAP_THRESHOLD};

/// What applying one input event changed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputOutcome {
    /// Indices of lights whose state was toggled.
    pub toggled: Vec<usize>,
    /// This tap handed control of the level to the player.
    pub handed_off: bool,
}

/// Per-level input state: drag panning and the first-interaction hand-off.
///
/// Reset whenever a level is prepared.
#[derive(Debug, Clone)]
pub struct Controls {
    drag_anchor: Option<Vec2>,
    has_interacted: bool,
    /// Minimum packed mask value for a tap to count.
    threshold: u32,
}

impl Controls {
    pub fn new() -> Self {
        Self::with_threshold(TAP_THRESHOLD)
    }

    pub fn with_threshold(threshold: u32) -> Self {
        Self {
            drag_anchor: None,
            has_interacted: false,
            threshold,
        }
    }

    pub fn reset(&mut self) {
        self.drag_anchor = None;
        self.has_interacted = false;
    }

    pub fn has_interacted(&self) -> bool {
        self.has_interacted
    }

    /// Apply one gesture. `mask_sample` reads the last painted light mask at a
    /// screen point; taps in the dark are ignored.
    pub fn apply(
        &mut self,
        event: InputEvent,
        session: &mut Session,
        mask_sample: impl Fn(Vec2) -> Rgb,
    ) -> InputOutcome {
        match event {
            InputEvent::Tap { x, y } => {
                let screen = Vec2::new(x, y);
                self.tap(session, screen, mask_sample(screen))
            }
            InputEvent::DragStart => {
                self.drag_anchor = Some(session.viewport.offset);
                InputOutcome::default()
            }
            InputEvent::DragMove { dx, dy } => {
                if let Some(anchor) = self.drag_anchor {
                    let zoom = session.viewport.zoom;
                    session.viewport.pan_to(anchor + Vec2::new(dx, dy) / zoom);
                }
                InputOutcome::default()
            }
            InputEvent::DragEnd => {
                self.drag_anchor = None;
                InputOutcome::default()
            }
        }
    }

    /// Toggle every interactive light under `screen`.
    ///
    /// The first toggle of a light other than the end light hands the level to
    /// the player: the start light becomes switchable, the end light goes dark
    /// but switchable, and the camera heads for the level's start point.
    pub fn tap(&mut self, session: &mut Session, screen: Vec2, sample: Rgb) -> InputOutcome {
        let mut outcome = InputOutcome::default();
        if !is_illuminated(sample, self.threshold) {
            log::trace!("tap at {:?} in the dark ({})", screen, sample);
            return outcome;
        }

        let point = session.viewport.screen_to_stage(screen);
        let end = session.end_index();
        for i in 0..session.lights.len() {
            let light = &mut session.lights[i];
            if !(light.interactive && light.hit_test(point)) {
                continue;
            }
            light.toggle();
            outcome.toggled.push(i);
            log::debug!("light {} switched {}", i, if light.lit { "on" } else { "off" });

            if Some(i) != end && !self.has_interacted {
                self.has_interacted = true;
                outcome.handed_off = true;
                hand_off(session);
            }
        }
        outcome
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

fn hand_off(session: &mut Session) {
    if let Some(start) = session.start_light_mut() {
        start.interactive = true;
    }
    if let Some(end) = session.end_light_mut() {
        end.lit = false;
        end.interactive = true;
    }
    session.aim_at_start();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::{LevelDescriptor, LightDef};

    const BRIGHT: Rgb = Rgb::WARM_WHITE;

    fn session() -> Session {
        let level = LevelDescriptor::new(400.0, 400.0)
            .with_start(300.0, 200.0, 1.5)
            .with_light(LightDef::new(100.0, 200.0).with_lit(true))
            .with_light(LightDef::new(200.0, 200.0).with_interactive(true))
            .with_light(LightDef::new(300.0, 200.0).with_lit(true));
        let mut s = Session::prepare(1, level, Vec2::new(400.0, 400.0));
        s.viewport.snap_to(1.0, Vec2::ZERO);
        s.viewport.fit(s.window, s.stage);
        s
    }

    #[test]
    fn dark_tap_is_ignored() {
        let mut s = session();
        let mut c = Controls::new();
        let out = c.tap(&mut s, Vec2::new(200.0, 200.0), Rgb::new(0, 0xFD, 0xE7));
        assert!(out.toggled.is_empty());
        assert!(!s.lights[1].lit);
        assert!(!c.has_interacted());
    }

    #[test]
    fn first_tap_hands_off() {
        let mut s = session();
        let mut c = Controls::new();
        let out = c.tap(&mut s, Vec2::new(205.0, 195.0), BRIGHT);
        assert_eq!(out.toggled, vec![1]);
        assert!(out.handed_off);
        assert!(s.lights[1].lit);
        assert!(s.lights[0].interactive);
        assert!(!s.lights[2].lit);
        assert!(s.lights[2].interactive);
        assert_eq!(s.viewport.target_zoom, 1.5);
        assert_eq!(s.viewport.target_offset, Vec2::new(100.0, 0.0));

        // Second tap toggles back without another hand-off.
        let out = c.tap(&mut s, Vec2::new(200.0, 200.0), BRIGHT);
        assert_eq!(out.toggled, vec![1]);
        assert!(!out.handed_off);
        assert!(!s.lights[1].lit);
    }

    #[test]
    fn tap_outside_hit_radius_misses() {
        let mut s = session();
        let mut c = Controls::new();
        let out = c.tap(&mut s, Vec2::new(215.0, 200.0), BRIGHT);
        assert!(out.toggled.is_empty());
        assert!(!c.has_interacted());
    }

    #[test]
    fn non_interactive_lights_ignore_taps() {
        let mut s = session();
        let mut c = Controls::new();
        c.tap(&mut s, Vec2::new(100.0, 200.0), BRIGHT);
        assert!(s.lights[0].lit);
    }

    #[test]
    fn drag_pans_from_anchor_by_zoomed_delta() {
        let mut s = session();
        s.viewport.snap_to(2.0, Vec2::new(10.0, 0.0));
        let mut c = Controls::new();
        let dark = |_: Vec2| Rgb::BLACK;

        c.apply(InputEvent::DragMove { dx: 50.0, dy: 0.0 }, &mut s, dark);
        assert_eq!(s.viewport.offset, Vec2::new(10.0, 0.0));

        c.apply(InputEvent::DragStart, &mut s, dark);
        c.apply(InputEvent::DragMove { dx: 40.0, dy: -20.0 }, &mut s, dark);
        assert_eq!(s.viewport.offset, Vec2::new(30.0, -10.0));
        assert_eq!(s.viewport.target_offset, s.viewport.offset);

        c.apply(InputEvent::DragEnd, &mut s, dark);
        c.apply(InputEvent::DragMove { dx: 400.0, dy: 0.0 }, &mut s, dark);
        assert_eq!(s.viewport.offset, Vec2::new(30.0, -10.0));
    }

    #[test]
    fn custom_threshold() {
        let mut s = session();
        let mut c = Controls::with_threshold(0x010000);
        let out = c.tap(&mut s, Vec2::new(200.0, 200.0), Rgb::new(0, 255, 255));
        assert!(out.toggled.is_empty());
        let out = c.tap(&mut s, Vec2::new(200.0, 200.0), Rgb::new(1, 0, 0));
        assert_eq!(out.toggled, vec![1]);
    }

    #[test]
    fn reset_forgets_interaction() {
        let mut s = session();
        let mut c = Controls::new();
        c.tap(&mut s, Vec2::new(200.0, 200.0), BRIGHT);
        c.reset();
        assert!(!c.has_interacted());
    }
}
