use std::rc::Rc;

use glam::Vec2;

use super::level::{LevelDescriptor, LevelHooks, NoHooks};
use crate::components::light::Light;
use crate::renderer::viewport::{fit_zoom, offset_for, Viewport};

/// Axis-aligned box around a set of points, as (min corner, size).
pub fn bounding_box(points: impl IntoIterator<Item = Vec2>) -> Option<(Vec2, Vec2)> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    Some((min, max - min))
}

/// Mutable state of the level being played.
pub struct Session {
    pub level: usize,
    /// Frames run only while this is set.
    pub in_loop: bool,
    pub descriptor: LevelDescriptor,
    pub hooks: Rc<dyn LevelHooks>,
    /// Stage size in stage units.
    pub stage: Vec2,
    pub viewport: Viewport,
    /// Index 0 is the start light, the last entry the end light.
    pub lights: Vec<Light>,
    /// Lights lit at the last count.
    pub lit_count: usize,
    /// Game-clock time the level started.
    pub started_at_ms: f64,
    pub max_light_radius: f32,
    pub drain: f32,
    /// Window (and both surfaces) size in pixels.
    pub window: Vec2,
}

impl Session {
    /// A session with no level loaded.
    pub fn empty(window: Vec2) -> Self {
        let descriptor = LevelDescriptor::new(window.x, window.y);
        Self {
            level: 0,
            in_loop: false,
            stage: descriptor.stage_size(),
            max_light_radius: descriptor.light_radius,
            drain: descriptor.drain_multiplier,
            descriptor,
            hooks: Rc::new(NoHooks),
            viewport: Viewport::new(),
            lights: Vec::new(),
            lit_count: 0,
            started_at_ms: 0.0,
            window,
        }
    }

    /// Build the runtime state for `descriptor`.
    ///
    /// The entry zoom fits the lights' bounding box into the window. When the
    /// end light starts lit the camera centres between start and end light
    /// so both are visible; otherwise it centres on the stage.
    pub fn prepare(level: usize, descriptor: LevelDescriptor, window: Vec2) -> Self {
        let lights: Vec<Light> = descriptor.lights.iter().map(|def| def.build()).collect();
        let stage = descriptor.stage_size();

        let zoom = bounding_box(lights.iter().map(|l| l.pos))
            .map(|(_, size)| fit_zoom(window, size))
            .unwrap_or(1.0);
        let offset = match (lights.first(), lights.last()) {
            (Some(start), Some(end)) if end.lit => offset_for((start.pos + end.pos) * 0.5, stage),
            _ => Vec2::ZERO,
        };

        let mut viewport = Viewport::new();
        viewport.snap_to(zoom, offset);
        viewport.fit(window, stage);

        let hooks = descriptor.resolve_hooks();
        let lit_count = lights.iter().filter(|l| l.lit).count();

        log::debug!(
            "prepared level {}: {} lights, zoom {:.3}, offset {:?}",
            level,
            lights.len(),
            zoom,
            offset
        );

        Self {
            level,
            in_loop: false,
            stage,
            max_light_radius: descriptor.light_radius,
            drain: descriptor.drain_multiplier,
            descriptor,
            hooks,
            viewport,
            lights,
            lit_count,
            started_at_ms: 0.0,
            window,
        }
    }

    /// Recount lit lights and store the result.
    pub fn count_lit(&mut self) -> usize {
        self.lit_count = self.lights.iter().filter(|l| l.lit).count();
        self.lit_count
    }

    pub fn end_index(&self) -> Option<usize> {
        self.lights.len().checked_sub(1)
    }

    pub fn start_light_mut(&mut self) -> Option<&mut Light> {
        self.lights.first_mut()
    }

    pub fn end_light(&self) -> Option<&Light> {
        self.lights.last()
    }

    pub fn end_light_mut(&mut self) -> Option<&mut Light> {
        self.lights.last_mut()
    }

    /// Milliseconds since the level started.
    pub fn elapsed_ms(&self, now_ms: f64) -> f32 {
        (now_ms - self.started_at_ms).max(0.0) as f32
    }

    /// Camera goal at the level's authored start point and zoom.
    pub fn aim_at_start(&mut self) {
        let d = &self.descriptor;
        self.viewport.focus(d.start_point(), self.stage, d.start_zoom);
    }

    /// Horizontal camera goal centred on stage column `x`.
    pub fn pan_to_x(&mut self, x: f32) {
        self.viewport.target_offset.x = x - self.stage.x * 0.5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::LightDef;

    fn level(end_lit: bool) -> LevelDescriptor {
        LevelDescriptor::new(1000.0, 500.0)
            .with_light(LightDef::new(200.0, 250.0).with_lit(true))
            .with_light(LightDef::new(400.0, 100.0))
            .with_light(LightDef::new(800.0, 250.0).with_lit(end_lit))
    }

    #[test]
    fn bounding_box_is_min_max() {
        let (min, size) = bounding_box([
            Vec2::new(5.0, 1.0),
            Vec2::new(-3.0, 7.0),
            Vec2::new(2.0, -2.0),
        ])
        .unwrap();
        assert_eq!(min, Vec2::new(-3.0, -2.0));
        assert_eq!(size, Vec2::new(8.0, 9.0));
        assert!(bounding_box(std::iter::empty()).is_none());
    }

    #[test]
    fn prepare_fits_zoom_to_lights() {
        let window = Vec2::new(800.0, 600.0);
        let s = Session::prepare(2, level(false), window);
        // box is 600 x 150: min(600/150, 800/600) * 0.8
        let expected = (800.0f32 / 600.0) * 0.8;
        assert!((s.viewport.zoom - expected).abs() < 1e-5);
        assert_eq!(s.viewport.zoom, s.viewport.target_zoom);
        assert_eq!(s.viewport.offset, Vec2::ZERO);
        assert_eq!(s.level, 2);
        assert_eq!(s.lit_count, 1);
        assert!(!s.in_loop);
    }

    #[test]
    fn prepare_centres_between_start_and_lit_end() {
        let s = Session::prepare(1, level(true), Vec2::new(800.0, 600.0));
        // midpoint (500, 250) on a 1000 x 500 stage
        assert_eq!(s.viewport.offset, Vec2::ZERO);

        let shifted = LevelDescriptor::new(1000.0, 500.0)
            .with_light(LightDef::new(100.0, 100.0))
            .with_light(LightDef::new(300.0, 300.0).with_lit(true));
        let s = Session::prepare(1, shifted, Vec2::new(800.0, 600.0));
        assert_eq!(s.viewport.offset, Vec2::new(-300.0, -50.0));
        assert_eq!(s.viewport.target_offset, s.viewport.offset);
    }

    #[test]
    fn zoom_capped_for_collinear_lights() {
        let line = LevelDescriptor::new(1000.0, 500.0)
            .with_light(LightDef::new(100.0, 250.0))
            .with_light(LightDef::new(110.0, 250.0));
        let s = Session::prepare(1, line, Vec2::new(800.0, 600.0));
        assert_eq!(s.viewport.zoom, 2.0);
    }

    #[test]
    fn aim_at_start_targets_authored_point() {
        let mut s = Session::prepare(1, level(false).with_start(700.0, 300.0, 1.5), Vec2::new(800.0, 600.0));
        s.aim_at_start();
        assert_eq!(s.viewport.target_offset, Vec2::new(200.0, 50.0));
        assert_eq!(s.viewport.target_zoom, 1.5);
    }

    #[test]
    fn elapsed_never_negative() {
        let mut s = Session::empty(Vec2::new(10.0, 10.0));
        s.started_at_ms = 500.0;
        assert_eq!(s.elapsed_ms(200.0), 0.0);
        assert_eq!(s.elapsed_ms(750.0), 250.0);
        assert!(s.end_index().is_none());
    }
}
