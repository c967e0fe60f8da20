/// Straight-alpha RGBA colour.
///
/// Values are expected in linear space. sRGB conversion is handled by render
/// targets whose format carries the `Srgb` suffix.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from RGB components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Opaque colour from hue (degrees, any range), saturation and lightness in `[0, 1]`.
    ///
    /// Hue wraps, so `from_hsl(h + 360.0, s, l)` equals `from_hsl(h, s, l)`.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0);
        let t = h / 60.0;
        let sector = (t as u32) % 6;
        let f = t.fract();

        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let m = lightness - c * 0.5;
        let x = if sector % 2 == 0 { c * f } else { c * (1.0 - f) };

        let (r, g, b) = match sector {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::rgb(r + m, g + m, b + m)
    }

    /// Scales the RGB channels, leaving alpha untouched.
    #[inline]
    pub fn scaled(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k, self.a)
    }

    #[inline]
    pub fn rgb_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < 1e-5 && (a.g - b.g).abs() < 1e-5 && (a.b - b.b).abs() < 1e-5
    }

    #[test]
    fn hsl_primary_hues() {
        assert!(close(Color::from_hsl(0.0, 1.0, 0.5), Color::rgb(1.0, 0.0, 0.0)));
        assert!(close(Color::from_hsl(120.0, 1.0, 0.5), Color::rgb(0.0, 1.0, 0.0)));
        assert!(close(Color::from_hsl(240.0, 1.0, 0.5), Color::rgb(0.0, 0.0, 1.0)));
    }

    #[test]
    fn hsl_secondary_hues() {
        assert!(close(Color::from_hsl(60.0, 1.0, 0.5), Color::rgb(1.0, 1.0, 0.0)));
        assert!(close(Color::from_hsl(180.0, 1.0, 0.5), Color::rgb(0.0, 1.0, 1.0)));
        assert!(close(Color::from_hsl(300.0, 1.0, 0.5), Color::rgb(1.0, 0.0, 1.0)));
    }

    #[test]
    fn hsl_hue_wraps_both_ways() {
        assert!(close(Color::from_hsl(420.0, 1.0, 0.5), Color::from_hsl(60.0, 1.0, 0.5)));
        assert!(close(Color::from_hsl(-120.0, 1.0, 0.5), Color::from_hsl(240.0, 1.0, 0.5)));
    }

    #[test]
    fn hsl_zero_saturation_is_grey() {
        assert!(close(Color::from_hsl(77.0, 0.0, 0.25), Color::rgb(0.25, 0.25, 0.25)));
    }

    #[test]
    fn scaled_keeps_alpha() {
        let c = Color::new(0.5, 0.25, 1.0, 0.5).scaled(2.0);
        assert_eq!(c, Color::new(1.0, 0.5, 2.0, 0.5));
    }
}
