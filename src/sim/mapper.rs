//! Source image to play field mapping
//!
//! The camera is front-facing and shown as a mirror, scaled to cover the whole
//! field (no letterboxing) and centered.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Cover scale and centering offset of a source image inside the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectFit {
    pub scale: f32,
    pub offset: Vec2,
}

impl AspectFit {
    /// Returns `None` when the source size is unknown (zero)
    pub fn compute(src_w: u32, src_h: u32, field: Vec2) -> Option<Self> {
        if src_w == 0 || src_h == 0 {
            return None;
        }
        let src = Vec2::new(src_w as f32, src_h as f32);
        let scale = (field.x / src.x).max(field.y / src.y);
        let offset = (field - src * scale) * 0.5;
        Some(Self { scale, offset })
    }

    /// Size of the scaled source image
    pub fn scaled_size(&self, src_w: u32, src_h: u32) -> Vec2 {
        Vec2::new(src_w as f32, src_h as f32) * self.scale
    }

    /// Map a raw source pixel to field space, mirrored horizontally
    pub fn map(&self, raw: Vec2, field: Vec2) -> Vec2 {
        Vec2::new(
            field.x - (raw.x * self.scale + self.offset.x),
            raw.y * self.scale + self.offset.y,
        )
    }
}

/// Remembers the last mapped point so unknown source sizes keep it in place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    field: Vec2,
    last: Vec2,
}

impl CoordinateMapper {
    pub fn new(field: Vec2) -> Self {
        Self {
            field,
            last: field * 0.5,
        }
    }

    pub fn field(&self) -> Vec2 {
        self.field
    }

    pub fn last(&self) -> Vec2 {
        self.last
    }

    pub fn map(&mut self, raw: Vec2, src_w: u32, src_h: u32) -> Vec2 {
        if let Some(fit) = AspectFit::compute(src_w, src_h, self.field) {
            self.last = fit.map(raw, self.field);
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: Vec2 = Vec2::new(640.0, 360.0);

    #[test]
    fn test_same_size_is_pure_mirror() {
        let mut mapper = CoordinateMapper::new(FIELD);
        assert_eq!(mapper.map(Vec2::new(100.0, 50.0), 640, 360), Vec2::new(540.0, 50.0));
        assert_eq!(mapper.map(Vec2::new(0.0, 0.0), 640, 360), Vec2::new(640.0, 0.0));
    }

    #[test]
    fn test_taller_source_is_cropped_vertically() {
        // 4:3 source covers a 16:9 field: scale 1, 60px cropped top and bottom
        let fit = AspectFit::compute(640, 480, FIELD).unwrap();
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.offset, Vec2::new(0.0, -60.0));
        assert_eq!(fit.map(Vec2::new(100.0, 100.0), FIELD), Vec2::new(540.0, 40.0));
    }

    #[test]
    fn test_small_source_scales_up() {
        let fit = AspectFit::compute(320, 180, FIELD).unwrap();
        assert_eq!(fit.scale, 2.0);
        assert_eq!(fit.offset, Vec2::ZERO);
        assert_eq!(fit.map(Vec2::new(160.0, 90.0), FIELD), Vec2::new(320.0, 180.0));
        assert_eq!(fit.scaled_size(320, 180), FIELD);
    }

    #[test]
    fn test_unknown_source_keeps_previous_point() {
        let mut mapper = CoordinateMapper::new(FIELD);
        assert_eq!(mapper.map(Vec2::new(5.0, 5.0), 0, 0), Vec2::new(320.0, 180.0));

        let mapped = mapper.map(Vec2::new(100.0, 50.0), 640, 360);
        assert_eq!(mapper.map(Vec2::new(300.0, 300.0), 0, 360), mapped);
        assert_eq!(mapper.map(Vec2::new(300.0, 300.0), 640, 0), mapped);
        assert_eq!(mapper.last(), mapped);
    }
}
