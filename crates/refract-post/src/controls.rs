//! Keyboard bindings for editing the chain at runtime.

use refract_engine::input::{InputFrame, Key};

use crate::conductor::ChainCommand;
use crate::effect::{EffectKind, PlacementMode};

/// Key to command map. Bindings are checked in order, so one frame with
/// several hits yields commands in binding order.
#[derive(Debug, Clone)]
pub struct ControlsConfig {
    pub bindings: Vec<(Key, ChainCommand)>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        use ChainCommand::*;
        use EffectKind as E;

        Self {
            bindings: vec![
                // Mode first, so "F2 + 1" in one frame appends as an area effect.
                (Key::F1, SelectMode(PlacementMode::Fullscreen)),
                (Key::F2, SelectMode(PlacementMode::Area)),
                (Key::F3, SelectMode(PlacementMode::Polygon)),
                (Key::F4, SelectMode(PlacementMode::WindowPolygon)),
                (Key::Digit1, Append(E::VerticalGradient)),
                (Key::Digit2, AppendBlurPair),
                (Key::Digit3, Append(E::Underwater)),
                (Key::Digit4, Append(E::Tint)),
                (Key::Digit5, Append(E::HueVerticalGradient)),
                (Key::Digit6, Append(E::RetroGame)),
                (Key::Digit7, Append(E::GreyNoise)),
                (Key::Digit8, Append(E::Burn)),
                (Key::Digit9, Append(E::Distort)),
                (Key::Y, Append(E::Spiral)),
                (Key::U, Append(E::HeatHaze)),
                (Key::Backspace, PopLast),
                (Key::Digit0, Reset),
                (Key::P, ToggleFrameLock),
            ],
        }
    }
}

/// Turns this frame's key hits into chain commands.
#[derive(Debug, Clone, Default)]
pub struct ChainControls {
    config: ControlsConfig,
}

impl ChainControls {
    pub fn new(config: ControlsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub fn commands(&self, frame: &InputFrame) -> Vec<ChainCommand> {
        if frame.keys_pressed.is_empty() {
            return Vec::new();
        }

        self.config
            .bindings
            .iter()
            .filter(|(key, _)| frame.key_hit(*key))
            .map(|&(_, command)| command)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(keys: &[Key]) -> InputFrame {
        let mut frame = InputFrame::default();
        frame.keys_pressed.extend(keys.iter().copied());
        frame
    }

    #[test]
    fn no_hits_no_commands() {
        let controls = ChainControls::default();
        assert!(controls.commands(&InputFrame::default()).is_empty());
    }

    #[test]
    fn digits_append_effects() {
        let controls = ChainControls::default();
        assert_eq!(
            controls.commands(&hits(&[Key::Digit1])),
            vec![ChainCommand::Append(EffectKind::VerticalGradient)]
        );
        assert_eq!(controls.commands(&hits(&[Key::Digit2])), vec![ChainCommand::AppendBlurPair]);
        assert_eq!(controls.commands(&hits(&[Key::Backspace])), vec![ChainCommand::PopLast]);
    }

    #[test]
    fn mode_keys_come_before_appends() {
        let controls = ChainControls::default();
        let cmds = controls.commands(&hits(&[Key::Digit8, Key::F2]));
        assert_eq!(
            cmds,
            vec![
                ChainCommand::SelectMode(PlacementMode::Area),
                ChainCommand::Append(EffectKind::Burn),
            ]
        );
    }

    #[test]
    fn default_map_never_appends_none() {
        let config = ControlsConfig::default();
        assert!(!config
            .bindings
            .iter()
            .any(|(_, c)| *c == ChainCommand::Append(EffectKind::None)));
    }

    #[test]
    fn custom_bindings() {
        let controls = ChainControls::new(ControlsConfig {
            bindings: vec![(Key::Space, ChainCommand::Reset)],
        });
        assert_eq!(controls.commands(&hits(&[Key::Space, Key::Digit1])), vec![ChainCommand::Reset]);
    }
}
