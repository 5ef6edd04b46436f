//! Per-frame scene drawing
//!
//! Layer order: camera background, dim overlay, entities, catcher, HUD.

use glam::Vec2;

use super::{Renderer, Rgba, TextAlign};
use crate::platform::Frame;
use crate::sim::{AspectFit, EntityKind, GameState};
use crate::tuning::Tuning;

const DIM_OVERLAY: Rgba = [0.0, 0.0, 0.0, 0.15];
const GOOD_BACKDROP: Rgba = [1.0, 1.0, 1.0, 0.55];
const BAD_BACKDROP: Rgba = [0.7, 0.0, 0.0, 0.55];
const CATCHER_RING: Rgba = [1.0, 1.0, 1.0, 0.6];
const HUD_BAR: Rgba = [0.0, 0.0, 0.0, 0.55];
const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

const SYMBOL_SIZE: f32 = 40.0;
const CATCHER_GLYPH: &str = "😋";
const CATCHER_GLYPH_SIZE: f32 = 44.0;
const CATCHER_RING_WIDTH: f32 = 3.0;
const HUD_HEIGHT: f32 = 52.0;
const HUD_TEXT_SIZE: f32 = 22.0;
const HEART: &str = "❤️";

/// Mirrored camera frame covering the field, then a light dim
pub fn draw_background(renderer: &mut dyn Renderer, frame: &Frame, tuning: &Tuning) {
    let field = tuning.field_size();
    if let Some(fit) = AspectFit::compute(frame.width, frame.height, field) {
        let size = fit.scaled_size(frame.width, frame.height);
        // Mirroring about the field center lands the image on the same offset
        renderer.draw_image(frame, fit.offset, size, true);
    }
    renderer.fill_rect(Vec2::ZERO, field, DIM_OVERLAY);
}

pub fn draw_entities(renderer: &mut dyn Renderer, state: &GameState) {
    for entity in &state.entities {
        let backdrop = match entity.kind {
            EntityKind::Good => GOOD_BACKDROP,
            EntityKind::Bad => BAD_BACKDROP,
        };
        renderer.fill_circle(entity.pos, entity.radius, backdrop);
        renderer.text(entity.glyph(), entity.pos, SYMBOL_SIZE, TextAlign::Center, WHITE);
    }
}

pub fn draw_catcher(renderer: &mut dyn Renderer, catcher: Vec2, tuning: &Tuning) {
    renderer.stroke_circle(catcher, tuning.catch_radius, CATCHER_RING_WIDTH, CATCHER_RING);
    renderer.text(
        CATCHER_GLYPH,
        catcher,
        CATCHER_GLYPH_SIZE,
        TextAlign::Center,
        WHITE,
    );
}

pub fn draw_hud(renderer: &mut dyn Renderer, state: &GameState, tuning: &Tuning) {
    let y = HUD_HEIGHT / 2.0;
    renderer.fill_rect(Vec2::ZERO, Vec2::new(tuning.field_width, HUD_HEIGHT), HUD_BAR);
    renderer.text(
        &format!("Score: {}", state.score),
        Vec2::new(14.0, y),
        HUD_TEXT_SIZE,
        TextAlign::Left,
        WHITE,
    );
    renderer.text(
        &HEART.repeat(usize::from(state.lives)),
        Vec2::new(tuning.field_width - 12.0, y),
        HUD_TEXT_SIZE,
        TextAlign::Right,
        WHITE,
    );
}
