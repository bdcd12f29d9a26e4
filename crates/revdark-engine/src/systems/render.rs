use glam::Vec2;

use super::lighting::paint_mask;
use crate::assets::manifest::SpriteSheet;
use crate::core::session::Session;
use crate::renderer::surface::{CompositeMode, Image, Surface};

/// Draw the stage background scaled and offset by the viewport.
pub fn draw_stage<S: Surface>(session: &Session, main: &mut S) {
    let vp = &session.viewport;
    main.draw_image(Image::Background, -vp.origin * vp.zoom, session.stage * vp.zoom);
}

/// Draw one sprite per light, scaled by zoom and anchored per sprite kind.
pub fn draw_sprites<S: Surface>(session: &Session, sheet: &SpriteSheet, main: &mut S) {
    let zoom = session.viewport.zoom;
    for light in &session.lights {
        let id = light.sprite();
        let size = sheet.size(id);
        if size == Vec2::ZERO {
            continue;
        }
        let at = session.viewport.stage_to_screen(light.pos) + light.kind.anchor(size) * zoom;
        main.draw_image(Image::Sprite(id), at, size * zoom);
    }
}

/// Render a full frame: stage, sprites, then the light mask multiplied on top.
/// Leaves `main` in source-over mode.
pub fn render_frame<S: Surface>(session: &Session, sheet: &SpriteSheet, main: &mut S, mask: &mut S) {
    main.clear();
    draw_stage(session, main);
    draw_sprites(session, sheet, main);

    paint_mask(session, mask);
    main.set_composite(CompositeMode::Multiply);
    main.draw_surface(mask, Vec2::ZERO);
    main.set_composite(CompositeMode::SourceOver);
}
