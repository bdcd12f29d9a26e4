//! Scripted per-tick light behaviors.
//!
//! Each variant is a parametrised motion or override evaluated once per frame,
//! before flicker and power smoothing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::Rgb;
use super::light::Light;

/// Power the end light is pinned to every tick.
pub const END_LIGHT_POWER: f32 = 0.25;

/// Per-frame inputs a behavior may read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Index of the active level (0 = tutorial).
    pub level: usize,
    /// Milliseconds since the level started.
    pub elapsed_ms: f32,
}

/// What a behavior asks the frame loop to do after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    #[default]
    Continue,
    /// The end light was reached; the level is won.
    LevelComplete,
}

impl Signal {
    /// Combine two signals; completion wins.
    pub fn merge(self, other: Signal) -> Signal {
        if self == Signal::LevelComplete || other == Signal::LevelComplete {
            Signal::LevelComplete
        } else {
            Signal::Continue
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Behavior {
    #[default]
    None,
    /// `x = origin.x + sin(t / period) * dx`
    HorizontalBounce { dx: f32, period: f32 },
    /// `y = origin.y + sin(t / period + phase) * dy`
    VerticalBounce {
        dy: f32,
        period: f32,
        #[serde(default)]
        phase: f32,
    },
    /// Orbit around the origin. `t / period` is read as degrees, so a negative
    /// period orbits the other way.
    Circle { radius: f32, period: f32 },
    /// Red, fixed-power goal light. Completes the level once lit and
    /// interactive outside the tutorial.
    EndLight,
}

impl Behavior {
    pub fn apply(self, light: &mut Light, ctx: &TickContext) -> Signal {
        match self {
            Behavior::None => Signal::Continue,
            Behavior::HorizontalBounce { dx, period } => {
                let t = ctx.elapsed_ms / period;
                light.pos.x = light.origin.x + t.sin() * dx;
                Signal::Continue
            }
            Behavior::VerticalBounce { dy, period, phase } => {
                let t = ctx.elapsed_ms / period;
                light.pos.y = light.origin.y + (t + phase).sin() * dy;
                Signal::Continue
            }
            Behavior::Circle { radius, period } => {
                let angle = ((ctx.elapsed_ms / period) % 360.0).to_radians();
                light.pos = light.origin + Vec2::new(angle.cos(), angle.sin()) * radius;
                Signal::Continue
            }
            Behavior::EndLight => {
                light.color = Rgb::END_RED;
                light.pin_power(END_LIGHT_POWER);
                if light.lit && light.interactive && ctx.level > 0 {
                    Signal::LevelComplete
                } else {
                    Signal::Continue
                }
            }
        }
    }
}
