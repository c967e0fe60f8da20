//! Refract engine crate.
//!
//! This crate owns the platform + GPU runtime pieces and the 3D scene that the
//! post-processing layer (`refract-post`) composes on top of.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod camera;
pub mod scene;
pub mod render;
