//! Catcher-vs-entity contact test
//!
//! Only the catcher radius counts; an entity's own radius is visual.

use glam::Vec2;

/// Strictly inside the catch circle (the boundary itself is a miss)
#[inline]
pub fn within_catch_radius(distance_sq: f32, catch_radius: f32) -> bool {
    distance_sq < catch_radius * catch_radius
}

#[inline]
pub fn is_caught(entity_pos: Vec2, catcher: Vec2, catch_radius: f32) -> bool {
    within_catch_radius(entity_pos.distance_squared(catcher), catch_radius)
}
