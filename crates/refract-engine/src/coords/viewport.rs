use glam::Vec2;

/// Viewport size in physical pixels.
///
/// Placement math divides pixel coordinates by these dimensions to obtain
/// normalized `[0, 1]` screen coordinates.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_physical(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        if self.height > 0.0 { self.width / self.height } else { 1.0 }
    }

    /// Converts a pixel coordinate or extent to normalized `[0, 1]` space.
    #[inline]
    pub fn normalize(self, pixels: Vec2) -> Vec2 {
        pixels / self.size()
    }
}
