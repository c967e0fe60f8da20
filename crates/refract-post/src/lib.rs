//! Post-process orchestration for the refract renderer.
//!
//! The scene is rendered into an offscreen surface, then each entry of the
//! [`EffectChain`] is applied in order, ping-ponging between two offscreen
//! surfaces and presenting the running result to the display after every pass.
//!
//! Everything above [`PostDevice`] is plain data and bookkeeping; [`gpu`]
//! provides the wgpu implementation.

pub mod chain;
pub mod conductor;
pub mod config;
pub mod controls;
pub mod device;
pub mod effect;
pub mod gpu;
pub mod placement;
pub mod registry;
pub mod settings;
pub mod surfaces;

pub use chain::EffectChain;
pub use conductor::{ChainCommand, FrameConductor, FrameInputs, FrameStats, PolygonInput};
pub use config::PostConfig;
pub use controls::{ChainControls, ControlsConfig};
pub use device::{Blend, Geometry, PostDevice};
pub use effect::{ChainEntry, EffectKind, PlacementMode};
pub use gpu::{PostRenderer, WgpuPostDevice};
pub use placement::{PlacementError, PlacementGeometry, PlacementRequest, PlacementResolver, WindowOpenings};
pub use registry::{AuxTexture, EffectDescriptor, EffectRegistry, ProgramId};
pub use settings::{EffectAnimation, EffectFrame, PostSettings};
pub use surfaces::{PingPong, SurfaceId, SurfaceRing};
