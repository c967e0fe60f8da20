//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform events into `InputEvent`s.
//!
//! Two views of the keyboard are provided:
//! - `InputState`: keys currently held (camera movement)
//! - `InputFrame`: keys pressed this frame, consumed once (chain edits, toggles)

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, Modifiers};
