use glam::{Vec2, Vec3};

use refract_engine::paint::Color;

use crate::chain::EffectChain;
use crate::effect::{ChainEntry, PlacementMode};

/// Startup configuration of the post pipeline.
#[derive(Debug, Clone)]
pub struct PostConfig {
    /// Entries the chain starts with and resets to; never popped.
    pub chain_seed: Vec<ChainEntry>,

    /// Mode used for newly appended effects until changed.
    pub initial_mode: PlacementMode,

    /// World-space size of area effects.
    pub area_size: Vec2,

    /// Demo polygon corners (strip order) and where it spins.
    pub polygon_points: [Vec3; 4],
    pub polygon_origin: Vec3,
    /// Degrees per second about the polygon's local Y axis.
    pub polygon_spin_speed: f32,

    /// Start with presentation locked to the display refresh.
    pub lock_fps: bool,

    /// Seed for noise offsets and the retro palette size.
    pub rng_seed: u64,

    /// Drawn when nothing else has been rendered yet (first frame, resize).
    pub clear_colour: Color,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            chain_seed: EffectChain::default_seed(),
            initial_mode: PlacementMode::Fullscreen,
            area_size: Vec2::new(10.0, 10.0),
            polygon_points: [
                Vec3::new(-3.0, 5.0, 0.0),
                Vec3::new(-5.0, -5.0, 0.0),
                Vec3::new(3.0, 5.0, 0.0),
                Vec3::new(5.0, -5.0, 0.0),
            ],
            polygon_origin: Vec3::new(20.0, 15.0, 0.0),
            polygon_spin_speed: 12.0,
            lock_fps: true,
            rng_seed: 0x5eed,
            clear_colour: Color::rgb(0.3, 0.3, 0.4),
        }
    }
}
