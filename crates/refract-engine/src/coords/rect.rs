use glam::Vec2;

/// Axis-aligned rectangle (top-left origin).
///
/// Used both in pixels and in normalized screen space; the caller decides which.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// The whole screen in normalized coordinates.
    pub const UNIT: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle of `size` centred on `centre`.
    #[inline]
    pub fn from_centre_size(centre: Vec2, size: Vec2) -> Self {
        Self {
            origin: centre - 0.5 * size,
            size,
        }
    }

    #[inline]
    pub fn centre(self) -> Vec2 {
        self.origin + 0.5 * self.size
    }
}
