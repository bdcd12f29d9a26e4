//! Light simulation and the illumination mask.
//!
//! Every lit light shares a power budget: with `n` lights on, each one's target
//! power is `drain^(n - 1)`, so switching more lights on shrinks every disc.
//! The mask starts black and each lit light adds a radial gradient to it; the
//! mask is later multiplied onto the frame and also decides which taps count.

use glam::Vec2;

use crate::components::behavior::{Signal, TickContext};
use crate::components::color::Rgb;
use crate::core::rng::FlickerSource;
use crate::core::session::Session;
use crate::renderer::surface::{CompositeMode, RadialGradient, Surface};

/// Inner gradient stop, as a fraction of the disc diameter (scaled again by power).
pub const INNER_STOP: f32 = 0.45;
/// Packed `0xRRGGBB` mask value at or above which a tap counts as "in the light".
pub const TAP_THRESHOLD: u32 = 65000;

/// Target power for every light when `lit` lights are on.
///
/// With nothing lit this exceeds 1; flicker clamps the target back to 1.
pub fn drained_power(drain: f32, lit: usize) -> f32 {
    drain.powi(lit as i32 - 1)
}

/// Count lit lights, retarget all of them to the drained power, then run each
/// light's behaviors, flicker and smoothing.
pub fn update_lights(session: &mut Session, flicker: &mut dyn FlickerSource, elapsed_ms: f32) -> Signal {
    let lit = session.count_lit();
    let target = drained_power(session.drain, lit);
    let ctx = TickContext {
        level: session.level,
        elapsed_ms,
    };

    session.lights.iter_mut().fold(Signal::Continue, |signal, light| {
        light.target_power = target;
        signal.merge(light.update_tick(&ctx, flicker))
    })
}

/// Gradient a lit light contributes to the mask, or `None` when it has no
/// visible extent.
pub fn light_gradient(session: &Session, index: usize) -> Option<RadialGradient> {
    let light = session.lights.get(index)?;
    if !light.lit {
        return None;
    }
    let zoom = session.viewport.zoom;
    let diameter = session.max_light_radius * 2.0 * zoom * light.power;
    if diameter <= 0.0 {
        return None;
    }
    Some(RadialGradient {
        center: session.viewport.stage_to_screen(light.pos),
        inner_radius: diameter * INNER_STOP * light.power,
        outer_radius: diameter * 0.5,
        inner: light.color,
        outer: Rgb::BLACK,
    })
}

/// Repaint the mask: black everywhere, plus an additive disc per lit light.
pub fn paint_mask<S: Surface>(session: &Session, mask: &mut S) {
    mask.set_composite(CompositeMode::SourceOver);
    mask.fill_rect(Vec2::ZERO, mask.size(), Rgb::BLACK);

    mask.set_composite(CompositeMode::Lighter);
    for index in 0..session.lights.len() {
        if let Some(gradient) = light_gradient(session, index) {
            mask.fill_radial_gradient(&gradient);
        }
    }
}

/// Whether a mask sample is at or above `threshold` (packed `0xRRGGBB`).
pub fn is_illuminated(sample: Rgb, threshold: u32) -> bool {
    sample.packed() >= threshold
}
