//! wgpu implementation of the post pipeline.
//!
//! [`WgpuPostDevice`] records a frame on the CPU; [`PostRenderer`] owns the
//! GPU resources and encodes a recorded frame into a command encoder.

mod device;
mod programs;
mod targets;
mod textures;

use std::collections::HashMap;

use anyhow::Context;

use refract_engine::camera::Camera;
use refract_engine::paint::Color;
use refract_engine::render::{RenderCtx, RenderTarget, SceneRenderer, UniformArena};
use refract_engine::scene::Scene;

use crate::config::PostConfig;
use crate::registry::AuxTexture;
use crate::settings::PostSettings;
use crate::surfaces::SurfaceId;

pub use device::{DrawCall, PostOp, WgpuPostDevice};
pub use programs::{PipelineKey, PostPrograms};
pub use targets::{OFFSCREEN_FORMAT, OffscreenTargets, TargetError};
pub use textures::AuxTextures;

type TextureKey = (Option<SurfaceId>, Option<AuxTexture>);

pub struct PostRenderer {
    targets: OffscreenTargets,
    programs: PostPrograms,
    aux: AuxTextures,
    source_sampler: wgpu::Sampler,

    settings: UniformArena,
    settings_bind_group: Option<wgpu::BindGroup>,
    texture_groups: HashMap<TextureKey, wgpu::BindGroup>,

    scene: SceneRenderer,
    clear_colour: Color,
}

impl PostRenderer {
    pub fn new(ctx: &RenderCtx<'_>, config: &PostConfig) -> anyhow::Result<Self> {
        let width = ctx.viewport.width as u32;
        let height = ctx.viewport.height as u32;
        let targets = OffscreenTargets::new(ctx.device, width, height)
            .context("failed to create offscreen surfaces")?;

        let source_sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("refract post source sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            targets,
            programs: PostPrograms::new(ctx.device),
            aux: AuxTextures::new(ctx.device, ctx.queue, config.rng_seed),
            source_sampler,
            settings: UniformArena::new(
                "refract post settings ubo",
                std::mem::size_of::<PostSettings>() as u64,
                ctx.device.limits().min_uniform_buffer_offset_alignment,
            ),
            settings_bind_group: None,
            texture_groups: HashMap::new(),
            scene: SceneRenderer::new(),
            clear_colour: config.clear_colour,
        })
    }

    /// Recreates the offscreen surfaces when the size changed.
    ///
    /// Zero sizes (minimized window) keep the current surfaces.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> Result<(), TargetError> {
        if width == 0 || height == 0 || self.targets.size() == (width, height) {
            return Ok(());
        }
        self.targets = OffscreenTargets::new(device, width, height)?;
        self.texture_groups.clear();
        Ok(())
    }

    /// Encodes a recorded frame. Scene passes draw `scene` from `camera`;
    /// draws into `SurfaceId::Display` go to `display`.
    pub fn encode(
        &mut self,
        ctx: &RenderCtx<'_>,
        display: &mut RenderTarget<'_>,
        frame: &WgpuPostDevice,
        scene: &Scene,
        camera: &Camera,
    ) -> anyhow::Result<()> {
        self.resize(ctx.device, ctx.viewport.width as u32, ctx.viewport.height as u32)
            .context("failed to resize offscreen surfaces")?;

        self.targets
            .clear_if_new(display.encoder, self.clear_colour.to_wgpu());

        let offsets = self.upload_settings(ctx, frame);
        self.prepare(ctx, display.color_format, frame);

        for op in frame.ops() {
            match *op {
                PostOp::Scene(id) => {
                    let Some(view) = self.targets.view(id) else {
                        log::warn!("scene pass into {id} ignored");
                        continue;
                    };
                    let mut target = RenderTarget::new(&mut *display.encoder, view, OFFSCREEN_FORMAT)
                        .with_depth(self.targets.depth_view());
                    self.scene.render(ctx, &mut target, scene, camera)?;
                }
                PostOp::Copy { from, to } => self.targets.copy(display.encoder, from, to),
                PostOp::Draw(call) => {
                    let offset = call.settings.map_or(offsets[0], |i| offsets[i + 1]);
                    self.draw(display, call, offset);
                }
            }
        }

        Ok(())
    }

    /// Stages a default slot followed by every recorded upload.
    fn upload_settings(&mut self, ctx: &RenderCtx<'_>, frame: &WgpuPostDevice) -> Vec<u32> {
        self.settings.clear();

        let mut offsets = Vec::with_capacity(frame.uploads().len() + 1);
        offsets.push(self.settings.push(&PostSettings::default()));
        for s in frame.uploads() {
            offsets.push(self.settings.push(s));
        }

        let recreated = self.settings.upload(ctx.device, ctx.queue);
        if recreated || self.settings_bind_group.is_none() {
            if let Some(resource) = self.settings.binding() {
                self.settings_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("refract post settings bind group"),
                    layout: &self.programs.settings_bgl,
                    entries: &[wgpu::BindGroupEntry { binding: 0, resource }],
                }));
            }
        }

        offsets
    }

    /// Builds the pipelines and texture bind groups this frame's draws need.
    fn prepare(&mut self, ctx: &RenderCtx<'_>, display_format: wgpu::TextureFormat, frame: &WgpuPostDevice) {
        let keys = frame.draws().map(|c| pipeline_key(c, display_format));
        self.programs.prepare(ctx.device, keys);

        for call in frame.draws() {
            let key = (call.source, call.aux);
            if self.texture_groups.contains_key(&key) {
                continue;
            }

            let white = self.aux.white();
            let source = call.source.and_then(|id| self.targets.view(id)).unwrap_or(white);
            let aux = call.aux.and_then(|a| self.aux.view(a)).unwrap_or(white);
            let feedback = self.targets.view(SurfaceId::Feedback).unwrap_or(white);

            let group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("refract post textures bind group"),
                layout: &self.programs.textures_bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(source),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.source_sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(aux),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(self.aux.sampler()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: wgpu::BindingResource::TextureView(feedback),
                    },
                ],
            });
            self.texture_groups.insert(key, group);
        }
    }

    fn draw(&self, display: &mut RenderTarget<'_>, call: DrawCall, offset: u32) {
        let view = match call.target {
            SurfaceId::Display => Some(display.color_view),
            id => self.targets.view(id),
        };
        let Some(view) = view else { return };

        let Some(pipeline) = self.programs.get(&pipeline_key(&call, display.color_format)) else {
            return;
        };
        let Some(textures) = self.texture_groups.get(&(call.source, call.aux)) else { return };
        let Some(settings) = self.settings_bind_group.as_ref() else { return };

        let mut rpass = display.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("refract post pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            // Read-only: the scene depth stays intact for later passes.
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.targets.depth_view(),
                depth_ops: None,
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, textures, &[]);
        rpass.set_bind_group(1, settings, &[offset]);
        rpass.draw(0..4, 0..1);
    }
}

fn pipeline_key(call: &DrawCall, display_format: wgpu::TextureFormat) -> PipelineKey {
    let format = match call.target {
        SurfaceId::Display => display_format,
        _ => OFFSCREEN_FORMAT,
    };
    PipelineKey {
        program: call.program,
        geometry: call.geometry,
        blend: call.blend,
        format,
    }
}
