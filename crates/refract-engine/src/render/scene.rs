use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::camera::{Camera, CameraView};
use crate::scene::{MeshVertex, Scene};

use super::{RenderCtx, RenderTarget, UniformArena};

/// Depth format shared by the scene pass and every post-process pass that
/// tests against it.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Lights beyond this count are ignored by the scene shader.
const MAX_LIGHTS: usize = 2;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4], // w = specular power
    ambient: [f32; 4],
    light_pos: [[f32; 4]; MAX_LIGHTS],
    light_colour: [[f32; 4]; MAX_LIGHTS],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ModelUniform {
    world: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    colour: [f32; 4], // w = 1 for emissive
}

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

/// Forward renderer for `Scene` content: per-pixel diffuse + specular from up
/// to two point lights over an ambient term.
#[derive(Default)]
pub struct SceneRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    frame_bgl: Option<wgpu::BindGroupLayout>,
    model_bgl: Option<wgpu::BindGroupLayout>,

    frame_ubo: Option<wgpu::Buffer>,
    frame_bind_group: Option<wgpu::BindGroup>,

    model_uniforms: Option<UniformArena>,
    model_bind_group: Option<wgpu::BindGroup>,

    meshes: Vec<GpuMesh>,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears `target` (colour to the scene background, depth to 1) and draws
    /// every model.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &Scene,
        camera: &Camera,
    ) -> anyhow::Result<()> {
        let Some(depth_view) = target.depth_view else {
            anyhow::bail!("scene pass requires a depth attachment");
        };

        self.ensure_pipeline(ctx, target.color_format);
        self.ensure_frame_bindings(ctx);
        self.ensure_meshes(ctx, scene);

        self.write_frame_uniform(ctx, scene, camera);
        self.write_model_uniforms(ctx, scene);

        let Some(pipeline) = self.pipeline.as_ref() else { return Ok(()) };
        let Some(frame_bg) = self.frame_bind_group.as_ref() else { return Ok(()) };
        let Some(model_bg) = self.model_bind_group.as_ref() else { return Ok(()) };
        let Some(arena) = self.model_uniforms.as_ref() else { return Ok(()) };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("refract scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(scene.background.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, frame_bg, &[]);

        for (i, model) in scene.models.iter().enumerate() {
            let Some(mesh) = self.meshes.get(model.mesh.0) else { continue };
            let offset = (i as u64 * arena.stride()) as u32;

            rpass.set_bind_group(1, model_bg, &[offset]);
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.set_index_buffer(mesh.ibo.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }

        Ok(())
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("refract scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let frame_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("refract scene frame bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<FrameUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let model_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("refract scene model bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ModelUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("refract scene pipeline layout"),
            bind_group_layouts: &[&frame_bgl, &model_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("refract scene pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[MeshVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(format);
        self.pipeline = Some(pipeline);
        self.frame_bgl = Some(frame_bgl);
        self.model_bgl = Some(model_bgl);

        // Bind groups belong to the old layouts.
        self.frame_bind_group = None;
        self.frame_ubo = None;
        self.model_bind_group = None;
    }

    fn ensure_frame_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.frame_bind_group.is_some() && self.frame_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.frame_bgl.as_ref() else { return };

        let frame_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("refract scene frame ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("refract scene frame bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_ubo.as_entire_binding(),
            }],
        });

        self.frame_ubo = Some(frame_ubo);
        self.frame_bind_group = Some(bind_group);
    }

    /// Uploads meshes added to the scene since the last frame.
    fn ensure_meshes(&mut self, ctx: &RenderCtx<'_>, scene: &Scene) {
        for mesh in scene.meshes().iter().skip(self.meshes.len()) {
            let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("refract mesh vbo"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("refract mesh ibo"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            self.meshes.push(GpuMesh {
                vbo,
                ibo,
                index_count: mesh.indices.len() as u32,
            });
        }
    }

    fn write_frame_uniform(&self, ctx: &RenderCtx<'_>, scene: &Scene, camera: &Camera) {
        let Some(ubo) = self.frame_ubo.as_ref() else { return };

        let mut uniform = FrameUniform {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.position.extend(scene.specular_power).to_array(),
            ambient: [scene.ambient.r, scene.ambient.g, scene.ambient.b, 0.0],
            light_pos: [[0.0; 4]; MAX_LIGHTS],
            light_colour: [[0.0; 4]; MAX_LIGHTS],
        };
        for (i, light) in scene.lights.iter().take(MAX_LIGHTS).enumerate() {
            let c = light.radiance();
            uniform.light_pos[i] = light.position.extend(1.0).to_array();
            uniform.light_colour[i] = [c.r, c.g, c.b, 0.0];
        }

        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));
    }

    fn write_model_uniforms(&mut self, ctx: &RenderCtx<'_>, scene: &Scene) {
        let arena = self.model_uniforms.get_or_insert_with(|| {
            UniformArena::new(
                "refract scene model ubo",
                std::mem::size_of::<ModelUniform>() as u64,
                ctx.device.limits().min_uniform_buffer_offset_alignment,
            )
        });

        arena.clear();
        for model in &scene.models {
            let world = model.world_matrix();
            let c = model.colour;
            arena.push(&ModelUniform {
                world: world.to_cols_array_2d(),
                normal_matrix: world.inverse().transpose().to_cols_array_2d(),
                colour: [c.r, c.g, c.b, if model.emissive { 1.0 } else { 0.0 }],
            });
        }

        let recreated = arena.upload(ctx.device, ctx.queue);
        if recreated || self.model_bind_group.is_none() {
            let Some(bgl) = self.model_bgl.as_ref() else { return };
            let Some(resource) = arena.binding() else { return };
            self.model_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("refract scene model bind group"),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry { binding: 0, resource }],
            }));
        }
    }
}
