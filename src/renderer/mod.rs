//! Rendering interface
//!
//! The core only needs a handful of 2D primitives on a fixed-size surface.
//! Coordinates are in field space.

pub mod scene;

use glam::Vec2;

use crate::platform::Frame;

/// Linear RGBA, each channel in `[0, 1]`
pub type Rgba = [f32; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

pub trait Renderer {
    /// Draw a camera frame into `origin..origin + size`, optionally mirrored
    fn draw_image(&mut self, frame: &Frame, origin: Vec2, size: Vec2, mirrored: bool);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);
    /// Text vertically centered on `pos.y`
    fn text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Rgba);
}

pub use scene::{draw_background, draw_catcher, draw_entities, draw_hud};
