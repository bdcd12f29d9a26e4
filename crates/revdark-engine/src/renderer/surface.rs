//! Drawing-surface contract for rendering backends.
//!
//! The engine paints through two surfaces per frame: the main surface and an
//! off-screen mask. Backends (HTML canvas, the CPU [`PixelSurface`]) implement
//! [`Surface`]; the frame code never talks to a graphics API directly.
//!
//! [`PixelSurface`]: super::software::PixelSurface

use glam::Vec2;

use crate::components::color::Rgb;
use crate::components::sprite::SpriteId;

/// How new pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Overwrite (canvas `source-over` with opaque sources).
    #[default]
    SourceOver,
    /// Saturating add (canvas `lighter`).
    Lighter,
    /// Per-channel product (canvas `multiply`).
    Multiply,
}

impl CompositeMode {
    /// Canvas `globalCompositeOperation` name.
    pub fn css_name(self) -> &'static str {
        match self {
            CompositeMode::SourceOver => "source-over",
            CompositeMode::Lighter => "lighter",
            CompositeMode::Multiply => "multiply",
        }
    }

    /// Combine a source pixel onto a destination pixel.
    pub fn blend(self, dst: Rgb, src: Rgb) -> Rgb {
        match self {
            CompositeMode::SourceOver => src,
            CompositeMode::Lighter => dst.add(src),
            CompositeMode::Multiply => dst.multiply(src),
        }
    }
}

/// Images a backend resolves by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Image {
    /// The tiled stage background, pre-sized to the stage.
    Background,
    Sprite(SpriteId),
}

/// Two-stop radial gradient filling a disc of `outer_radius`.
///
/// Inside `inner_radius` the colour is `inner`; between the radii it blends
/// linearly to `outer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub inner: Rgb,
    pub outer: Rgb,
}

impl RadialGradient {
    /// Colour at distance `d` from the centre, or `None` outside the disc.
    pub fn color_at(&self, d: f32) -> Option<Rgb> {
        if d > self.outer_radius {
            return None;
        }
        if d <= self.inner_radius {
            return Some(self.inner);
        }
        let span = self.outer_radius - self.inner_radius;
        if span <= f32::EPSILON {
            return Some(self.outer);
        }
        Some(self.inner.lerp(self.outer, (d - self.inner_radius) / span))
    }
}

/// A 2D drawing target.
///
/// Coordinates are surface pixels with the origin top-left.
pub trait Surface {
    /// Surface size in pixels.
    fn size(&self) -> Vec2;

    /// Wipe to transparent black and reset the composite mode to
    /// [`CompositeMode::SourceOver`].
    fn clear(&mut self);

    fn set_composite(&mut self, mode: CompositeMode);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb);

    /// Draw `image` stretched to `size` with its top-left at `origin`.
    fn draw_image(&mut self, image: Image, origin: Vec2, size: Vec2);

    /// Fill the gradient's disc.
    fn fill_radial_gradient(&mut self, gradient: &RadialGradient);

    /// Draw another surface of the same backend with its top-left at `origin`.
    fn draw_surface(&mut self, source: &Self, origin: Vec2)
    where
        Self: Sized;

    /// Read back one pixel. Out-of-bounds reads return black.
    fn sample(&self, point: Vec2) -> Rgb;
}
