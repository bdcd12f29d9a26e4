//! CPU rasterizer implementing [`Surface`].
//!
//! Images are drawn as flat swatches (the backend has no decoded artwork), which
//! is enough for headless hosts and for checking what the lighting mask lets
//! through.

use glam::Vec2;

use super::surface::{CompositeMode, Image, RadialGradient, Surface};
use crate::components::color::Rgb;

/// Flat colour used for the stage background.
pub const BACKGROUND_SWATCH: Rgb = Rgb::new(128, 128, 128);
/// Flat colour used for every sprite.
pub const SPRITE_SWATCH: Rgb = Rgb::new(200, 200, 200);

/// An RGB pixel buffer with canvas-like compositing.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
    mode: CompositeMode,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; (width * height) as usize],
            mode: CompositeMode::SourceOver,
        }
    }

    /// Change dimensions; contents are cleared.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Rgb::BLACK; (width * height) as usize];
        self.mode = CompositeMode::SourceOver;
    }

    pub fn composite(&self) -> CompositeMode {
        self.mode
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    fn put(&mut self, x: u32, y: u32, src: Rgb) {
        let idx = (y * self.width + x) as usize;
        self.pixels[idx] = self.mode.blend(self.pixels[idx], src);
    }

    /// Pixel range covered by `[origin, origin + size)`, clipped to the surface.
    fn span(&self, origin: Vec2, size: Vec2) -> (u32, u32, u32, u32) {
        let clip = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as u32;
        let x0 = clip(origin.x, self.width);
        let y0 = clip(origin.y, self.height);
        let x1 = clip(origin.x + size.x, self.width);
        let y1 = clip(origin.y + size.y, self.height);
        (x0, y0, x1, y1)
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
        self.mode = CompositeMode::SourceOver;
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.mode = mode;
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb) {
        let (x0, y0, x1, y1) = self.span(origin, size);
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, color);
            }
        }
    }

    fn draw_image(&mut self, image: Image, origin: Vec2, size: Vec2) {
        let swatch = match image {
            Image::Background => BACKGROUND_SWATCH,
            Image::Sprite(_) => SPRITE_SWATCH,
        };
        self.fill_rect(origin, size, swatch);
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient) {
        let r = gradient.outer_radius;
        if r <= 0.0 {
            return;
        }
        let (x0, y0, x1, y1) = self.span(gradient.center - Vec2::splat(r), Vec2::splat(r * 2.0));
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some(color) = gradient.color_at(p.distance(gradient.center)) {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn draw_surface(&mut self, source: &Self, origin: Vec2) {
        let (x0, y0, x1, y1) = self.span(origin, source.size());
        let dx = origin.x.round() as i64;
        let dy = origin.y.round() as i64;
        for y in y0..y1 {
            for x in x0..x1 {
                let sx = (x as i64 - dx) as u32;
                let sy = (y as i64 - dy) as u32;
                if let Some(src) = source.pixel(sx, sy) {
                    self.put(x, y, src);
                }
            }
        }
    }

    fn sample(&self, point: Vec2) -> Rgb {
        if point.x < 0.0 || point.y < 0.0 {
            return Rgb::BLACK;
        }
        self.pixel(point.x as u32, point.y as u32).unwrap_or(Rgb::BLACK)
    }
}
