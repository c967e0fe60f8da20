use std::collections::HashMap;

use refract_engine::render::DEPTH_FORMAT;

use crate::device::{Blend, Geometry};
use crate::registry::ProgramId;
use crate::settings::PostSettings;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PipelineKey {
    pub program: ProgramId,
    pub geometry: Geometry,
    pub blend: Blend,
    pub format: wgpu::TextureFormat,
}

impl Geometry {
    fn entry_point(self) -> &'static str {
        match self {
            Geometry::Quad => "vs_quad",
            Geometry::Polygon => "vs_polygon",
        }
    }
}

impl Blend {
    fn state(self) -> Option<wgpu::BlendState> {
        match self {
            Blend::Opaque => None,
            Blend::Alpha => Some(wgpu::BlendState::ALPHA_BLENDING),
        }
    }
}

/// The post shader module, its bind group layouts and every pipeline built
/// from it so far.
pub struct PostPrograms {
    shader: wgpu::ShaderModule,
    layout: wgpu::PipelineLayout,
    pub(crate) textures_bgl: wgpu::BindGroupLayout,
    pub(crate) settings_bgl: wgpu::BindGroupLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl PostPrograms {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("refract post shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/post.wgsl").into()),
        });

        let texture = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        // 0 source, 1 source sampler, 2 aux, 3 aux sampler, 4 feedback
        let textures_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("refract post textures bgl"),
            entries: &[texture(0), sampler(1), texture(2), sampler(3), texture(4)],
        });

        let settings_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("refract post settings bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<PostSettings>() as u64),
                },
                count: None,
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("refract post pipeline layout"),
            bind_group_layouts: &[&textures_bgl, &settings_bgl],
            immediate_size: 0,
        });

        Self {
            shader,
            layout,
            textures_bgl,
            settings_bgl,
            pipelines: HashMap::new(),
        }
    }

    /// Builds every pipeline `keys` needs that is not cached yet.
    pub fn prepare(&mut self, device: &wgpu::Device, keys: impl IntoIterator<Item = PipelineKey>) {
        for key in keys {
            if self.pipelines.contains_key(&key) {
                continue;
            }
            log::debug!(
                "post pipeline: {} / {:?} / {:?} / {:?}",
                key.program.entry_point(),
                key.geometry,
                key.blend,
                key.format
            );
            let pipeline = self.build(device, key);
            self.pipelines.insert(key, pipeline);
        }
    }

    pub fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(key)
    }

    #[inline]
    pub fn cached(&self) -> usize {
        self.pipelines.len()
    }

    fn build(&self, device: &wgpu::Device, key: PipelineKey) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("refract post pipeline"),
            layout: Some(&self.layout),

            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some(key.geometry.entry_point()),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some(key.program.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: key.format,
                    blend: key.blend.state(),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Four-corner strip; polygons may face either way.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            // Tested against the scene depth, never written.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        })
    }
}
