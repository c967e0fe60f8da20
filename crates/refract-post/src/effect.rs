use std::fmt;

/// Every post-process the pipeline knows how to run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EffectKind {
    /// Pass-through; never appended by the chain controls.
    None,
    Copy,
    Tint,
    GreyNoise,
    Burn,
    Distort,
    Spiral,
    HeatHaze,
    VerticalGradient,
    Underwater,
    HueVerticalGradient,
    GaussianBlurHorizontal,
    GaussianBlurVertical,
    RetroGame,
}

impl EffectKind {
    pub const ALL: [EffectKind; 14] = [
        EffectKind::None,
        EffectKind::Copy,
        EffectKind::Tint,
        EffectKind::GreyNoise,
        EffectKind::Burn,
        EffectKind::Distort,
        EffectKind::Spiral,
        EffectKind::HeatHaze,
        EffectKind::VerticalGradient,
        EffectKind::Underwater,
        EffectKind::HueVerticalGradient,
        EffectKind::GaussianBlurHorizontal,
        EffectKind::GaussianBlurVertical,
        EffectKind::RetroGame,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::None => "none",
            EffectKind::Copy => "copy",
            EffectKind::Tint => "tint",
            EffectKind::GreyNoise => "grey noise",
            EffectKind::Burn => "burn",
            EffectKind::Distort => "distort",
            EffectKind::Spiral => "spiral",
            EffectKind::HeatHaze => "heat haze",
            EffectKind::VerticalGradient => "vertical gradient",
            EffectKind::Underwater => "underwater",
            EffectKind::HueVerticalGradient => "hue vertical gradient",
            EffectKind::GaussianBlurHorizontal => "gaussian blur (horizontal)",
            EffectKind::GaussianBlurVertical => "gaussian blur (vertical)",
            EffectKind::RetroGame => "retro game",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where on screen an effect is applied.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum PlacementMode {
    #[default]
    Fullscreen,
    /// Rectangle sized in world units around a 3D anchor point.
    Area,
    /// Four world-space points through a per-frame world matrix.
    Polygon,
    /// One of the fixed wall openings.
    WindowPolygon,
}

impl PlacementMode {
    pub const ALL: [PlacementMode; 4] = [
        PlacementMode::Fullscreen,
        PlacementMode::Area,
        PlacementMode::Polygon,
        PlacementMode::WindowPolygon,
    ];

    /// Area and polygon modes draw a full-screen copy before the effect itself.
    #[inline]
    pub fn needs_copy_pass(self) -> bool {
        !matches!(self, PlacementMode::Fullscreen)
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlacementMode::Fullscreen => "fullscreen",
            PlacementMode::Area => "area",
            PlacementMode::Polygon => "polygon",
            PlacementMode::WindowPolygon => "window polygon",
        };
        f.write_str(s)
    }
}

/// One step of the effect chain.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ChainEntry {
    pub effect: EffectKind,
    pub mode: PlacementMode,
}

impl ChainEntry {
    #[inline]
    pub const fn new(effect: EffectKind, mode: PlacementMode) -> Self {
        Self { effect, mode }
    }
}

impl fmt::Display for ChainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.effect, self.mode)
    }
}
