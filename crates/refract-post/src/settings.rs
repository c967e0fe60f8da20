//! Post-process settings payload and the animation state that feeds it.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use refract_engine::coords::{Rect, Viewport};
use refract_engine::paint::Color;

/// Uniform block read by every post-process program.
///
/// Laid out in 16-byte rows to match `PostSettings` in `post.wgsl`. Updated
/// piecewise (animation each frame, effect constants when an effect is
/// selected, placement for every invocation) and uploaded before each draw.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PostSettings {
    // placement
    pub area_top_left: [f32; 2],
    pub area_size: [f32; 2],
    pub area_depth: f32,
    /// 1 fades the draw's alpha towards its edges, 0 writes opaque alpha.
    pub edge_fade: f32,
    pub _pad0: [f32; 2],
    /// Clip-space polygon corners, not divided by w.
    pub polygon_points: [[f32; 4]; 4],

    pub tint_colour: [f32; 3],
    pub burn_height: f32,

    pub noise_scale: [f32; 2],
    pub noise_offset: [f32; 2],

    pub distort_level: f32,
    pub spiral_level: f32,
    pub heat_haze_timer: f32,
    pub underwater_timer: f32,

    pub top_colour: [f32; 3],
    pub blur_strength: f32,

    pub bottom_colour: [f32; 3],
    pub feedback_amount: f32,

    pub texel_size: [f32; 2],
    pub frequency: f32,
    pub amplitude: f32,

    pub pixel_size: f32,
    pub palette_size: f32,
    pub _pad1: [f32; 2],
}

const _: () = assert!(std::mem::size_of::<PostSettings>() == 208);

impl Default for PostSettings {
    fn default() -> Self {
        let mut s = Self::zeroed();
        s.set_quad(Rect::UNIT, 0.0);
        s
    }
}

impl PostSettings {
    /// Placement for full-screen and area draws; clears the polygon corners.
    pub fn set_quad(&mut self, rect: Rect, depth: f32) {
        self.area_top_left = rect.origin.to_array();
        self.area_size = rect.size.to_array();
        self.area_depth = depth;
        self.polygon_points = [[0.0; 4]; 4];
    }

    /// Placement for polygon draws; resets the quad to the whole screen.
    pub fn set_polygon(&mut self, points: [Vec4; 4]) {
        self.area_top_left = [0.0, 0.0];
        self.area_size = [1.0, 1.0];
        self.area_depth = 0.0;
        self.polygon_points = points.map(|p| p.to_array());
    }

    pub fn set_edge_fade(&mut self, fade: bool) {
        self.edge_fade = if fade { 1.0 } else { 0.0 };
    }

    pub fn area_rect(&self) -> Rect {
        Rect::from_origin_size(Vec2::from_array(self.area_top_left), Vec2::from_array(self.area_size))
    }

    pub fn set_gradient(&mut self, top: Color, bottom: Color) {
        self.top_colour = top.rgb_array();
        self.bottom_colour = bottom.rgb_array();
    }
}

/// Per-invocation inputs to an effect's settings.
#[derive(Debug, Copy, Clone)]
pub struct EffectFrame {
    pub viewport: Viewport,
    /// Last frame's delta, seconds.
    pub dt: f32,
}

const NOISE_GRAIN: f32 = 140.0;
const BURN_SPEED: f32 = 0.2;
const WIGGLE_SPEED: f32 = 1.0;
const HUE_SPEED: f32 = 30.0; // degrees per second

/// Animated state behind the time-varying effects.
///
/// `advance` runs once per frame and writes the animated fields into the
/// settings. The underwater timer and the gradient hue step every time their
/// effect is selected instead, so repeated entries animate faster. `reset`
/// returns everything to its starting point.
#[derive(Debug, Clone)]
pub struct EffectAnimation {
    hue: f32,
    wiggle: f32,
    burn_height: f32,
    heat_haze_timer: f32,
    underwater_timer: f32,
    palette_size: Option<u32>,

    seed: u64,
    rng: StdRng,
}

impl EffectAnimation {
    pub fn new(seed: u64) -> Self {
        Self {
            hue: 0.0,
            wiggle: 0.0,
            burn_height: 0.0,
            heat_haze_timer: 0.0,
            underwater_timer: 0.0,
            palette_size: None,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.seed);
    }

    /// Steps every animation by `dt` seconds and refreshes the per-frame
    /// settings (tint, noise, burn, distort, spiral, heat haze).
    pub fn advance(&mut self, dt: f32, viewport: Viewport, settings: &mut PostSettings) {
        settings.tint_colour = [1.0, 0.0, 0.0];

        settings.noise_scale = [viewport.width / NOISE_GRAIN, viewport.height / NOISE_GRAIN];
        settings.noise_offset = [self.rng.random_range(0.0..1.0), self.rng.random_range(0.0..1.0)];

        self.burn_height = (self.burn_height + BURN_SPEED * dt) % 1.0;
        settings.burn_height = self.burn_height;

        settings.distort_level = 0.03;

        settings.spiral_level = (1.0 - self.wiggle.cos()) * 4.0;
        self.wiggle += WIGGLE_SPEED * dt;

        self.heat_haze_timer += dt;
        settings.heat_haze_timer = self.heat_haze_timer;
    }

    /// Moves the gradient hue on by `dt`, restarting at 0 past 360 degrees.
    pub fn step_hue(&mut self, dt: f32) -> f32 {
        self.hue += HUE_SPEED * dt;
        if self.hue > 360.0 {
            self.hue = 0.0;
        }
        self.hue
    }

    pub fn step_underwater(&mut self, dt: f32) -> f32 {
        self.underwater_timer += dt;
        self.underwater_timer
    }

    /// Retro palette size, drawn from `[8, 25]` on first use.
    pub fn palette_size(&mut self) -> u32 {
        let rng = &mut self.rng;
        *self.palette_size.get_or_insert_with(|| rng.random_range(8..=25))
    }
}
