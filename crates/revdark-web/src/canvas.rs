//! HTML canvas backend for the engine's [`Surface`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use revdark_engine::{CompositeMode, Image, RadialGradient, Rgb, SpriteId, SpriteSheet, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

/// Create a detached canvas with its 2d context.
pub fn create_canvas(
    document: &Document,
    width: u32,
    height: u32,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = context_2d(&canvas)?;
    Ok((canvas, ctx))
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()
        .map_err(JsValue::from)
}

/// Pre-rendered images the main surface draws from: one canvas per sprite,
/// sliced from the sheet, and the tiled background for the current stage.
#[derive(Default)]
pub struct ImageBank {
    sprites: HashMap<SpriteId, HtmlCanvasElement>,
    background: Option<HtmlCanvasElement>,
}

impl ImageBank {
    /// Slice every sprite the sheet describes out of the loaded sheet image.
    pub fn slice_sheet(
        &mut self,
        document: &Document,
        sheet: &SpriteSheet,
        image: &HtmlImageElement,
    ) -> Result<(), JsValue> {
        for id in SpriteId::ALL {
            let Some(rect) = sheet.rect(id) else {
                log::warn!("sprite sheet has no '{}'", id.name());
                continue;
            };
            let (canvas, ctx) = create_canvas(document, rect.w, rect.h)?;
            ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                rect.x as f64,
                rect.y as f64,
                rect.w as f64,
                rect.h as f64,
                0.0,
                0.0,
                rect.w as f64,
                rect.h as f64,
            )?;
            self.sprites.insert(id, canvas);
        }
        log::info!("sliced {} sprites", self.sprites.len());
        Ok(())
    }

    /// Tile `tile` over a canvas the size of the stage.
    pub fn build_background(
        &mut self,
        document: &Document,
        tile: &HtmlImageElement,
        width: u32,
        height: u32,
    ) -> Result<(), JsValue> {
        let (canvas, ctx) = create_canvas(document, width, height)?;
        let pattern = ctx
            .create_pattern_with_html_image_element(tile, "repeat")?
            .ok_or_else(|| JsValue::from_str("background pattern unavailable"))?;
        ctx.set_fill_style_canvas_pattern(&pattern);
        ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
        self.background = Some(canvas);
        Ok(())
    }

    fn get(&self, image: Image) -> Option<&HtmlCanvasElement> {
        match image {
            Image::Background => self.background.as_ref(),
            Image::Sprite(id) => self.sprites.get(&id),
        }
    }
}

/// A canvas element as an engine drawing surface.
///
/// Canvas calls that fail are logged and skipped; a frame is redrawn from
/// scratch on the next tick anyway.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: Rc<RefCell<ImageBank>>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, images: Rc<RefCell<ImageBank>>) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx, images })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

fn css(color: Rgb) -> String {
    color.to_string()
}

fn report(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::error!("canvas {} failed: {:?}", what, e);
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self) {
        self.set_composite(CompositeMode::SourceOver);
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        report("composite", self.ctx.set_global_composite_operation(mode.css_name()));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb) {
        self.ctx.set_fill_style_str(&css(color));
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn draw_image(&mut self, image: Image, origin: Vec2, size: Vec2) {
        let images = self.images.borrow();
        let Some(source) = images.get(image) else {
            log::trace!("{:?} not loaded yet", image);
            return;
        };
        report(
            "draw_image",
            self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                source,
                origin.x as f64,
                origin.y as f64,
                size.x as f64,
                size.y as f64,
            ),
        );
    }

    fn fill_radial_gradient(&mut self, g: &RadialGradient) {
        let (x, y) = (g.center.x as f64, g.center.y as f64);
        let gradient = match self.ctx.create_radial_gradient(
            x,
            y,
            g.inner_radius.max(0.0) as f64,
            x,
            y,
            g.outer_radius.max(0.0) as f64,
        ) {
            Ok(gradient) => gradient,
            Err(e) => {
                log::error!("canvas gradient failed: {:?}", e);
                return;
            }
        };
        report("gradient stop", gradient.add_color_stop(0.0, &css(g.inner)));
        report("gradient stop", gradient.add_color_stop(1.0, &css(g.outer)));

        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        report("arc", self.ctx.arc(x, y, g.outer_radius as f64, 0.0, TAU));
        self.ctx.fill();
    }

    fn draw_surface(&mut self, source: &Self, origin: Vec2) {
        report(
            "draw_surface",
            self.ctx
                .draw_image_with_html_canvas_element(&source.canvas, origin.x as f64, origin.y as f64),
        );
    }

    fn sample(&self, point: Vec2) -> Rgb {
        let size = self.size();
        if point.x < 0.0 || point.y < 0.0 || point.x >= size.x || point.y >= size.y {
            return Rgb::BLACK;
        }
        match self
            .ctx
            .get_image_data(point.x.floor() as f64, point.y.floor() as f64, 1.0, 1.0)
        {
            Ok(data) => match data.data().0.as_slice() {
                [r, g, b, ..] => Rgb::new(*r, *g, *b),
                _ => Rgb::BLACK,
            },
            Err(e) => {
                log::error!("mask sample failed: {:?}", e);
                Rgb::BLACK
            }
        }
    }
}
