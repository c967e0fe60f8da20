//! Colour model shared by the scene renderer and post-process settings.
//!
//! Scope:
//! - straight-alpha linear colour
//! - HSL construction for animated effect colours

pub mod color;

pub use color::Color;
