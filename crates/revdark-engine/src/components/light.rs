use glam::Vec2;

use super::behavior::{Behavior, Signal, TickContext};
use super::color::Rgb;
use super::sprite::{SpriteId, SpriteKind};
use crate::core::rng::FlickerSource;

/// Fraction of the remaining distance `power` covers toward `target_power` per tick.
pub const POWER_SMOOTHING: f32 = 0.10;
/// Half-width of the uniform jitter added to `target_power` per tick.
pub const FLICKER_AMPLITUDE: f32 = 0.05;

/// A toggleable point light on the stage.
///
/// Identity is the index in the session's light list: the first light is the
/// start light, the last is the end light.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Current position in stage units.
    pub pos: Vec2,
    /// Authored position; motion behaviors oscillate around it.
    pub origin: Vec2,
    pub interactive: bool,
    pub lit: bool,
    /// Current brightness in [0, 1].
    pub power: f32,
    /// Brightness `power` eases toward.
    pub target_power: f32,
    pub color: Rgb,
    pub kind: SpriteKind,
    pub behaviors: Vec<Behavior>,
    /// Set by a behavior during the current tick to bypass smoothing.
    pinned_power: Option<f32>,
}

impl Light {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            origin: pos,
            interactive: false,
            lit: false,
            power: 1.0,
            target_power: 1.0,
            color: Rgb::WARM_WHITE,
            kind: SpriteKind::Lamp,
            behaviors: Vec::new(),
            pinned_power: None,
        }
    }

    // -- Builder pattern --

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_lit(mut self, lit: bool) -> Self {
        self.lit = lit;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_kind(mut self, kind: SpriteKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Fix `power` for the current tick, skipping smoothing.
    pub fn pin_power(&mut self, power: f32) {
        self.pinned_power = Some(power);
        self.power = power;
    }

    pub fn toggle(&mut self) {
        self.lit = !self.lit;
    }

    /// Advance one frame: behaviors, then flicker on the target, then
    /// smoothing of `power` unless a behavior pinned it.
    pub fn update_tick(&mut self, ctx: &TickContext, flicker: &mut dyn FlickerSource) -> Signal {
        self.pinned_power = None;

        let mut signal = Signal::Continue;
        for i in 0..self.behaviors.len() {
            let behavior = self.behaviors[i];
            signal = signal.merge(behavior.apply(self, ctx));
        }

        self.target_power = (self.target_power + flicker.jitter(FLICKER_AMPLITUDE)).min(1.0);

        match self.pinned_power {
            Some(power) => self.power = power,
            None => self.power += (self.target_power - self.power) * POWER_SMOOTHING,
        }

        signal
    }

    /// True when `point` lies strictly inside this light's tap radius.
    pub fn hit_test(&self, point: Vec2) -> bool {
        self.pos.distance(point) < self.kind.hit_radius()
    }

    pub fn sprite(&self) -> SpriteId {
        self.kind.sprite(self.lit)
    }
}
