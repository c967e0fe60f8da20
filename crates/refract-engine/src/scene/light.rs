use glam::Vec3;

use crate::paint::Color;

/// Point light with linear distance falloff.
#[derive(Debug, Copy, Clone)]
pub struct Light {
    pub position: Vec3,
    pub colour: Color,
    pub strength: f32,
}

impl Light {
    pub fn new(position: Vec3, colour: Color, strength: f32) -> Self {
        Self {
            position,
            colour,
            strength,
        }
    }

    /// Colour premultiplied by strength, as the lighting shader expects it.
    pub fn radiance(&self) -> Color {
        self.colour.scaled(self.strength)
    }
}
