//! Static table describing how each effect is drawn.

use refract_engine::paint::Color;

use crate::effect::{EffectKind, PlacementMode};
use crate::settings::{EffectAnimation, EffectFrame, PostSettings};

/// Fragment program of a post-process draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ProgramId {
    Copy,
    Tint,
    GreyNoise,
    Burn,
    Distort,
    Spiral,
    HeatHaze,
    VerticalGradient,
    Underwater,
    GaussianBlurHorizontal,
    GaussianBlurVertical,
    RetroGame,
}

impl ProgramId {
    pub const ALL: [ProgramId; 12] = [
        ProgramId::Copy,
        ProgramId::Tint,
        ProgramId::GreyNoise,
        ProgramId::Burn,
        ProgramId::Distort,
        ProgramId::Spiral,
        ProgramId::HeatHaze,
        ProgramId::VerticalGradient,
        ProgramId::Underwater,
        ProgramId::GaussianBlurHorizontal,
        ProgramId::GaussianBlurVertical,
        ProgramId::RetroGame,
    ];

    /// Fragment entry point in `post.wgsl`.
    pub fn entry_point(self) -> &'static str {
        match self {
            ProgramId::Copy => "fs_copy",
            ProgramId::Tint => "fs_tint",
            ProgramId::GreyNoise => "fs_grey_noise",
            ProgramId::Burn => "fs_burn",
            ProgramId::Distort => "fs_distort",
            ProgramId::Spiral => "fs_spiral",
            ProgramId::HeatHaze => "fs_heat_haze",
            ProgramId::VerticalGradient => "fs_vertical_gradient",
            ProgramId::Underwater => "fs_underwater",
            ProgramId::GaussianBlurHorizontal => "fs_gaussian_h",
            ProgramId::GaussianBlurVertical => "fs_gaussian_v",
            ProgramId::RetroGame => "fs_retro_game",
        }
    }
}

/// Extra texture a program samples besides the source surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AuxTexture {
    Noise,
    Burn,
    Distort,
    /// Previous frame's final image.
    Feedback,
}

type Populate = fn(&mut PostSettings, &mut EffectAnimation, &EffectFrame);

/// How to draw one `EffectKind`.
#[derive(Clone, Copy)]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    pub program: ProgramId,
    pub textures: &'static [AuxTexture],
    pub modes: &'static [PlacementMode],
    /// Writes the effect's constants into the settings just before its draw.
    pub populate: Populate,
}

impl std::fmt::Debug for EffectDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectDescriptor")
            .field("kind", &self.kind)
            .field("program", &self.program)
            .field("textures", &self.textures)
            .field("modes", &self.modes)
            .finish_non_exhaustive()
    }
}

const ALL_MODES: &[PlacementMode] = &PlacementMode::ALL;

fn no_settings(_: &mut PostSettings, _: &mut EffectAnimation, _: &EffectFrame) {}

fn vertical_gradient(s: &mut PostSettings, _: &mut EffectAnimation, _: &EffectFrame) {
    s.set_gradient(Color::rgb(0.0, 0.0, 1.0), Color::rgb(1.0, 1.0, 0.0));
}

fn hue_vertical_gradient(s: &mut PostSettings, anim: &mut EffectAnimation, frame: &EffectFrame) {
    let hue = anim.step_hue(frame.dt);
    s.set_gradient(Color::from_hsl(hue, 1.0, 0.5), Color::from_hsl(hue + 180.0, 1.0, 0.5));
}

fn gaussian_blur(s: &mut PostSettings, _: &mut EffectAnimation, frame: &EffectFrame) {
    s.texel_size = [2.0 / frame.viewport.width, 2.0 / frame.viewport.height];
    s.blur_strength = 1.5;
    s.feedback_amount = 1.0;
}

fn underwater(s: &mut PostSettings, anim: &mut EffectAnimation, frame: &EffectFrame) {
    s.underwater_timer = anim.step_underwater(frame.dt);
    s.frequency = 2.0;
    s.amplitude = 0.005;
}

fn retro_game(s: &mut PostSettings, anim: &mut EffectAnimation, _: &EffectFrame) {
    s.pixel_size = 200.0;
    s.palette_size = anim.palette_size() as f32;
}

const fn row(
    kind: EffectKind,
    program: ProgramId,
    textures: &'static [AuxTexture],
    populate: Populate,
) -> EffectDescriptor {
    EffectDescriptor {
        kind,
        program,
        textures,
        modes: ALL_MODES,
        populate,
    }
}

// Indexed by `EffectKind` declaration order.
static TABLE: [EffectDescriptor; 14] = [
    EffectDescriptor {
        kind: EffectKind::None,
        program: ProgramId::Copy,
        textures: &[],
        modes: &[],
        populate: no_settings,
    },
    row(EffectKind::Copy, ProgramId::Copy, &[], no_settings),
    row(EffectKind::Tint, ProgramId::Tint, &[], no_settings),
    row(EffectKind::GreyNoise, ProgramId::GreyNoise, &[AuxTexture::Noise], no_settings),
    row(EffectKind::Burn, ProgramId::Burn, &[AuxTexture::Burn], no_settings),
    row(EffectKind::Distort, ProgramId::Distort, &[AuxTexture::Distort], no_settings),
    row(EffectKind::Spiral, ProgramId::Spiral, &[], no_settings),
    row(EffectKind::HeatHaze, ProgramId::HeatHaze, &[], no_settings),
    row(EffectKind::VerticalGradient, ProgramId::VerticalGradient, &[], vertical_gradient),
    row(EffectKind::Underwater, ProgramId::Underwater, &[], underwater),
    row(
        EffectKind::HueVerticalGradient,
        ProgramId::VerticalGradient,
        &[],
        hue_vertical_gradient,
    ),
    row(
        EffectKind::GaussianBlurHorizontal,
        ProgramId::GaussianBlurHorizontal,
        &[AuxTexture::Feedback],
        gaussian_blur,
    ),
    row(
        EffectKind::GaussianBlurVertical,
        ProgramId::GaussianBlurVertical,
        &[AuxTexture::Feedback],
        gaussian_blur,
    ),
    row(EffectKind::RetroGame, ProgramId::RetroGame, &[], retro_game),
];

/// Lookup from effect kind to program, textures, supported modes and
/// settings writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct EffectRegistry;

impl EffectRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn descriptor(&self, kind: EffectKind) -> &'static EffectDescriptor {
        &TABLE[kind as usize]
    }

    pub fn supports(&self, kind: EffectKind, mode: PlacementMode) -> bool {
        self.descriptor(kind).modes.contains(&mode)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static EffectDescriptor> {
        TABLE.iter()
    }

    /// Selects nothing on the device; only writes `kind`'s constants.
    pub fn populate(
        &self,
        kind: EffectKind,
        settings: &mut PostSettings,
        anim: &mut EffectAnimation,
        frame: &EffectFrame,
    ) {
        (self.descriptor(kind).populate)(settings, anim, frame);
    }
}

#[cfg(test)]
mod tests {
    use refract_engine::coords::Viewport;

    use super::*;

    fn frame() -> EffectFrame {
        EffectFrame { viewport: Viewport::new(800.0, 400.0), dt: 0.0 }
    }

    #[test]
    fn table_is_in_declaration_order() {
        let registry = EffectRegistry::new();
        for kind in EffectKind::ALL {
            assert_eq!(registry.descriptor(kind).kind, kind);
        }
        assert_eq!(registry.iter().count(), EffectKind::ALL.len());
    }

    #[test]
    fn none_is_pass_through_and_unplaceable() {
        let registry = EffectRegistry::new();
        let d = registry.descriptor(EffectKind::None);
        assert_eq!(d.program, ProgramId::Copy);
        for mode in PlacementMode::ALL {
            assert!(!registry.supports(EffectKind::None, mode));
        }
    }

    #[test]
    fn every_real_effect_supports_every_mode() {
        let registry = EffectRegistry::new();
        for kind in EffectKind::ALL.into_iter().filter(|k| *k != EffectKind::None) {
            for mode in PlacementMode::ALL {
                assert!(registry.supports(kind, mode), "{kind} / {mode}");
            }
        }
    }

    #[test]
    fn textured_effects_bind_their_maps() {
        let registry = EffectRegistry::new();
        assert_eq!(registry.descriptor(EffectKind::GreyNoise).textures, &[AuxTexture::Noise]);
        assert_eq!(registry.descriptor(EffectKind::Burn).textures, &[AuxTexture::Burn]);
        assert_eq!(registry.descriptor(EffectKind::Distort).textures, &[AuxTexture::Distort]);
        assert_eq!(
            registry.descriptor(EffectKind::GaussianBlurVertical).textures,
            &[AuxTexture::Feedback]
        );
        assert!(registry.descriptor(EffectKind::Tint).textures.is_empty());
    }

    #[test]
    fn both_gradients_share_a_program() {
        let registry = EffectRegistry::new();
        assert_eq!(
            registry.descriptor(EffectKind::VerticalGradient).program,
            registry.descriptor(EffectKind::HueVerticalGradient).program
        );
    }

    #[test]
    fn vertical_gradient_is_blue_to_yellow() {
        let registry = EffectRegistry::new();
        let mut s = PostSettings::default();
        let mut anim = EffectAnimation::new(0);
        registry.populate(EffectKind::VerticalGradient, &mut s, &mut anim, &frame());
        assert_eq!(s.top_colour, [0.0, 0.0, 1.0]);
        assert_eq!(s.bottom_colour, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn hue_gradient_uses_opposite_hues() {
        let registry = EffectRegistry::new();
        let mut s = PostSettings::default();
        let mut anim = EffectAnimation::new(0);
        // hue 0: red over cyan
        registry.populate(EffectKind::HueVerticalGradient, &mut s, &mut anim, &frame());
        let close = |a: [f32; 3], b: [f32; 3]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5);
        assert!(close(s.top_colour, [1.0, 0.0, 0.0]));
        assert!(close(s.bottom_colour, [0.0, 1.0, 1.0]));
    }

    #[test]
    fn blur_texel_size_is_two_pixels() {
        let registry = EffectRegistry::new();
        let mut s = PostSettings::default();
        let mut anim = EffectAnimation::new(0);
        registry.populate(EffectKind::GaussianBlurHorizontal, &mut s, &mut anim, &frame());
        assert_eq!(s.texel_size, [2.0 / 800.0, 2.0 / 400.0]);
        assert_eq!(s.blur_strength, 1.5);
        assert_eq!(s.feedback_amount, 1.0);
    }

    #[test]
    fn underwater_constants() {
        let registry = EffectRegistry::new();
        let mut s = PostSettings::default();
        let mut anim = EffectAnimation::new(0);
        registry.populate(EffectKind::Underwater, &mut s, &mut anim, &frame());
        assert_eq!(s.frequency, 2.0);
        assert_eq!(s.amplitude, 0.005);
        assert_eq!(s.underwater_timer, 0.0);
    }

    #[test]
    fn underwater_timer_advances_every_selection() {
        let registry = EffectRegistry::new();
        let mut s = PostSettings::default();
        let mut anim = EffectAnimation::new(0);
        let frame = EffectFrame { dt: 0.5, ..frame() };
        for _ in 0..3 {
            registry.populate(EffectKind::Underwater, &mut s, &mut anim, &frame);
        }
        assert!((s.underwater_timer - 1.5).abs() < 1e-6);
    }

    #[test]
    fn hue_gradient_steps_before_writing() {
        let registry = EffectRegistry::new();
        let mut s = PostSettings::default();
        let mut anim = EffectAnimation::new(0);
        // 4 s at 30 degrees/s: hue 120, green over magenta
        let frame = EffectFrame { dt: 4.0, ..frame() };
        registry.populate(EffectKind::HueVerticalGradient, &mut s, &mut anim, &frame);
        let close = |a: [f32; 3], b: [f32; 3]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5);
        assert!(close(s.top_colour, [0.0, 1.0, 0.0]));
        assert!(close(s.bottom_colour, [1.0, 0.0, 1.0]));
    }

    #[test]
    fn retro_game_palette_in_range() {
        let registry = EffectRegistry::new();
        let mut s = PostSettings::default();
        let mut anim = EffectAnimation::new(42);
        registry.populate(EffectKind::RetroGame, &mut s, &mut anim, &frame());
        assert_eq!(s.pixel_size, 200.0);
        assert!((8.0..=25.0).contains(&s.palette_size));
        assert_eq!(s.palette_size.fract(), 0.0);
    }
}
