//! Per-frame orchestration of the scene pass and the effect chain.

use glam::{Mat4, Vec2, Vec3};

use refract_engine::camera::CameraView;
use refract_engine::coords::Viewport;

use crate::chain::EffectChain;
use crate::config::PostConfig;
use crate::device::{Blend, Geometry, PostDevice};
use crate::effect::{ChainEntry, EffectKind, PlacementMode};
use crate::placement::{PlacementRequest, PlacementResolver, WindowOpenings};
use crate::registry::EffectRegistry;
use crate::settings::{EffectAnimation, EffectFrame, PostSettings};
use crate::surfaces::{SurfaceId, SurfaceRing};

/// Edits requested by the user between frames.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ChainCommand {
    /// Append `kind` with the currently selected mode.
    Append(EffectKind),
    AppendBlurPair,
    PopLast,
    Reset,
    SelectMode(PlacementMode),
    ToggleFrameLock,
}

/// A polygon placement supplied by the caller.
#[derive(Debug, Copy, Clone)]
pub struct PolygonInput {
    pub points: [Vec3; 4],
    pub world: Mat4,
}

/// World-space inputs of one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameInputs {
    /// Centre of area-mode effects.
    pub area_anchor: Vec3,
    pub area_size: Vec2,
    /// `None` uses the conductor's spinning demo polygon.
    pub polygon: Option<PolygonInput>,
}

/// What one `render` call did.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    /// Effect invocations, including the fallback copy of an empty chain.
    pub invocations: usize,
    /// Draw calls, copy passes and display presents included.
    pub draws: usize,
    /// Area effects not drawn because the anchor was behind the near plane.
    pub culled: usize,
    /// Effects not drawn because their placement could not be resolved.
    pub skipped: usize,
}

/// Mutable pipeline state carried across frames.
#[derive(Debug, Clone)]
pub struct RenderPipelineState {
    pub chain: EffectChain,
    pub settings: PostSettings,
    pub animation: EffectAnimation,
    pub ring: SurfaceRing,
    pub selected_mode: PlacementMode,
    pub lock_fps: bool,
    /// Demo polygon rotation, radians.
    pub polygon_spin: f32,
    /// Delta of the last `update`, seconds.
    pub frame_dt: f32,
}

/// Runs the frame: scene pass, every chain entry in order, feedback capture,
/// present.
pub struct FrameConductor {
    state: RenderPipelineState,
    registry: EffectRegistry,
    resolver: PlacementResolver,
    config: PostConfig,
}

impl FrameConductor {
    pub fn new(config: PostConfig) -> Self {
        Self::with_openings(config, WindowOpenings::default())
    }

    pub fn with_openings(config: PostConfig, openings: WindowOpenings) -> Self {
        let state = RenderPipelineState {
            chain: EffectChain::new(config.chain_seed.clone()),
            settings: PostSettings::default(),
            animation: EffectAnimation::new(config.rng_seed),
            ring: SurfaceRing::new(),
            selected_mode: config.initial_mode,
            lock_fps: config.lock_fps,
            polygon_spin: 0.0,
            frame_dt: 0.0,
        };

        Self {
            state,
            registry: EffectRegistry::new(),
            resolver: PlacementResolver::new(openings),
            config,
        }
    }

    #[inline]
    pub fn state(&self) -> &RenderPipelineState {
        &self.state
    }

    #[inline]
    pub fn chain(&self) -> &EffectChain {
        &self.state.chain
    }

    #[inline]
    pub fn settings(&self) -> &PostSettings {
        &self.state.settings
    }

    #[inline]
    pub fn selected_mode(&self) -> PlacementMode {
        self.state.selected_mode
    }

    #[inline]
    pub fn lock_fps(&self) -> bool {
        self.state.lock_fps
    }

    #[inline]
    pub fn config(&self) -> &PostConfig {
        &self.config
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.resolver.set_viewport(viewport);
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.resolver.viewport()
    }

    /// Advances animations by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.state.frame_dt = dt;
        let viewport = self.resolver.viewport();
        self.state
            .animation
            .advance(dt, viewport, &mut self.state.settings);

        let spin = self.config.polygon_spin_speed.to_radians() * dt;
        self.state.polygon_spin = (self.state.polygon_spin + spin) % std::f32::consts::TAU;
    }

    /// World matrix of the demo polygon: spin about its own Y axis, then move
    /// to its origin.
    pub fn polygon_world(&self) -> Mat4 {
        Mat4::from_translation(self.config.polygon_origin)
            * Mat4::from_rotation_y(self.state.polygon_spin)
    }

    /// Applies one edit. Returns whether anything changed.
    pub fn apply(&mut self, command: ChainCommand) -> bool {
        let state = &mut self.state;
        match command {
            ChainCommand::Append(kind) => {
                let mode = state.selected_mode;
                if !self.registry.supports(kind, mode) {
                    log::debug!("{kind} cannot be placed in {mode} mode; ignored");
                    return false;
                }
                state.chain.append(kind, mode);
                log::debug!("chain += {} ({} entries)", ChainEntry::new(kind, mode), state.chain.len());
                true
            }
            ChainCommand::AppendBlurPair => {
                state.chain.append_blur_pair(state.selected_mode);
                log::debug!("chain += blur pair ({} entries)", state.chain.len());
                true
            }
            ChainCommand::PopLast => {
                let removed = state.chain.pop_last();
                for entry in &removed {
                    log::debug!("chain -= {entry}");
                }
                !removed.is_empty()
            }
            ChainCommand::Reset => {
                state.chain.reset();
                state.animation.reset();
                log::debug!("chain reset ({} entries)", state.chain.len());
                true
            }
            ChainCommand::SelectMode(mode) => {
                let changed = state.selected_mode != mode;
                state.selected_mode = mode;
                log::debug!("placement mode: {mode}");
                changed
            }
            ChainCommand::ToggleFrameLock => {
                state.lock_fps = !state.lock_fps;
                log::debug!("frame-rate lock: {}", state.lock_fps);
                true
            }
        }
    }

    /// Issues one frame to `device`.
    pub fn render<D>(&mut self, device: &mut D, camera: &dyn CameraView, inputs: &FrameInputs) -> FrameStats
    where
        D: PostDevice + ?Sized,
    {
        let mut stats = FrameStats::default();

        self.state.ring.begin_frame();
        device.render_scene(SurfaceId::Primary);

        if self.state.chain.is_empty() {
            stats.invocations += 1;
            self.fullscreen_pass(device, camera, EffectKind::Copy, 0, &mut stats);
        } else {
            for index in 0..self.state.chain.len() {
                let entry = self.state.chain.entries()[index];
                stats.invocations += 1;

                match entry.mode {
                    PlacementMode::Fullscreen => {
                        self.fullscreen_pass(device, camera, entry.effect, index, &mut stats);
                    }
                    PlacementMode::Area => {
                        self.area_pass(device, camera, entry.effect, index, inputs, &mut stats);
                    }
                    PlacementMode::Polygon => {
                        let polygon = inputs.polygon.unwrap_or(PolygonInput {
                            points: self.config.polygon_points,
                            world: self.polygon_world(),
                        });
                        let request = PlacementRequest::Polygon {
                            points: &polygon.points,
                            world: polygon.world,
                        };
                        self.polygon_pass(device, camera, entry.effect, index, request, &mut stats);
                    }
                    PlacementMode::WindowPolygon => {
                        // Openings are indexed by chain position.
                        let request = PlacementRequest::WindowPolygon { index };
                        self.polygon_pass(device, camera, entry.effect, index, request, &mut stats);
                    }
                }

                device.unbind_source();
            }
        }

        let last = self.state.ring.last_written();
        self.state.ring.capture_feedback(device, last);
        device.request_present(self.state.lock_fps);

        stats
    }

    /// Selects `kind`'s program and textures and writes its constants.
    fn select_effect<D>(&mut self, device: &mut D, kind: EffectKind)
    where
        D: PostDevice + ?Sized,
    {
        let descriptor = self.registry.descriptor(kind);
        device.select_program(descriptor.program, descriptor.textures);

        let frame = EffectFrame {
            viewport: self.resolver.viewport(),
            dt: self.state.frame_dt,
        };
        self.registry
            .populate(kind, &mut self.state.settings, &mut self.state.animation, &frame);
    }

    fn fullscreen_pass<D>(
        &mut self,
        device: &mut D,
        camera: &dyn CameraView,
        kind: EffectKind,
        index: usize,
        stats: &mut FrameStats,
    ) where
        D: PostDevice + ?Sized,
    {
        let pair = self.state.ring.acquire(index);
        self.state.ring.bind(device, pair);

        device.set_geometry(Geometry::Quad);
        device.set_blend(Blend::Opaque);
        self.select_effect(device, kind);

        // Fullscreen placement cannot fail or cull.
        if let Ok(Some(_)) =
            self.resolver
                .resolve(PlacementRequest::Fullscreen, camera, &mut self.state.settings)
        {
            device.upload_settings(&self.state.settings);
            device.draw_quad();
            self.state.ring.present(device);
            stats.draws += 2;
        }

        device.unbind_source();
    }

    fn area_pass<D>(
        &mut self,
        device: &mut D,
        camera: &dyn CameraView,
        kind: EffectKind,
        index: usize,
        inputs: &FrameInputs,
        stats: &mut FrameStats,
    ) where
        D: PostDevice + ?Sized,
    {
        self.fullscreen_pass(device, camera, EffectKind::Copy, index, stats);

        let pair = self.state.ring.acquire(index);
        self.state.ring.bind(device, pair);
        self.select_effect(device, kind);
        device.set_blend(Blend::Alpha);

        let request = PlacementRequest::Area {
            anchor: inputs.area_anchor,
            size: inputs.area_size,
        };
        match self.resolver.resolve(request, camera, &mut self.state.settings) {
            Ok(Some(geometry)) => {
                device.set_geometry(geometry.geometry());
                device.upload_settings(&self.state.settings);
                device.draw_quad();
                self.state.ring.present(device);
                stats.draws += 2;
            }
            Ok(None) => {
                log::trace!("{kind} area anchor behind the camera; culled");
                stats.culled += 1;
            }
            Err(err) => {
                log::warn!("{kind}: {err}; skipped");
                stats.skipped += 1;
            }
        }
    }

    fn polygon_pass<D>(
        &mut self,
        device: &mut D,
        camera: &dyn CameraView,
        kind: EffectKind,
        index: usize,
        request: PlacementRequest<'_>,
        stats: &mut FrameStats,
    ) where
        D: PostDevice + ?Sized,
    {
        self.fullscreen_pass(device, camera, EffectKind::Copy, index, stats);

        let pair = self.state.ring.acquire(index);
        self.state.ring.bind(device, pair);
        self.select_effect(device, kind);
        device.set_blend(Blend::Opaque);

        match self.resolver.resolve(request, camera, &mut self.state.settings) {
            Ok(Some(geometry)) => {
                device.upload_settings(&self.state.settings);
                device.set_geometry(geometry.geometry());
                device.draw_quad();
                self.state.ring.present(device);
                stats.draws += 2;
            }
            Ok(None) => stats.culled += 1,
            Err(err) => {
                log::warn!("{kind}: {err}; skipped");
                stats.skipped += 1;
            }
        }
    }
}
