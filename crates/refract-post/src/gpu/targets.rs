use thiserror::Error;

use refract_engine::render::DEPTH_FORMAT;

use crate::surfaces::SurfaceId;

/// Format of every offscreen colour surface.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("offscreen surfaces need a non-zero size (got {width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("offscreen size {width}x{height} exceeds the device limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// Checks `width`x`height` against the device's 2D texture limit.
pub fn validate_size(width: u32, height: u32, max: u32) -> Result<(), TargetError> {
    if width == 0 || height == 0 {
        return Err(TargetError::ZeroSize { width, height });
    }
    if width > max || height > max {
        return Err(TargetError::TooLarge { width, height, max });
    }
    Ok(())
}

struct Surface {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Surfaces A and B, the feedback surface and the shared scene depth buffer.
pub struct OffscreenTargets {
    width: u32,
    height: u32,

    primary: Surface,
    secondary: Surface,
    feedback: Surface,

    depth_view: wgpu::TextureView,

    /// Set on creation; the feedback surface holds garbage until cleared.
    needs_clear: bool,
}

impl OffscreenTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self, TargetError> {
        validate_size(width, height, device.limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let colour = |label: &str| {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: OFFSCREEN_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            Surface { texture, view }
        };

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("refract post depth"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        log::debug!("offscreen targets {width}x{height}");

        Ok(Self {
            width,
            height,
            primary: colour("refract post surface A"),
            secondary: colour("refract post surface B"),
            feedback: colour("refract post feedback"),
            depth_view: depth.create_view(&wgpu::TextureViewDescriptor::default()),
            needs_clear: true,
        })
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Texture behind an offscreen surface; `None` for the display.
    pub fn texture(&self, id: SurfaceId) -> Option<&wgpu::Texture> {
        self.surface(id).map(|s| &s.texture)
    }

    /// Shader-readable view of an offscreen surface; `None` for the display.
    pub fn view(&self, id: SurfaceId) -> Option<&wgpu::TextureView> {
        self.surface(id).map(|s| &s.view)
    }

    fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        match id {
            SurfaceId::Primary => Some(&self.primary),
            SurfaceId::Secondary => Some(&self.secondary),
            SurfaceId::Feedback => Some(&self.feedback),
            SurfaceId::Display => None,
        }
    }

    /// Clears every colour surface once after creation.
    pub fn clear_if_new(&mut self, encoder: &mut wgpu::CommandEncoder, colour: wgpu::Color) {
        if !self.needs_clear {
            return;
        }
        self.needs_clear = false;

        for surface in [&self.primary, &self.secondary, &self.feedback] {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("refract post clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
    }

    /// Copies one whole surface into another of the same size and format.
    pub fn copy(&self, encoder: &mut wgpu::CommandEncoder, from: SurfaceId, to: SurfaceId) {
        let (Some(src), Some(dst)) = (self.texture(from), self.texture(to)) else {
            log::warn!("cannot copy {from} -> {to}: not an offscreen surface");
            return;
        };

        encoder.copy_texture_to_texture(
            wgpu::TexelCopyTextureInfo {
                texture: src,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyTextureInfo {
                texture: dst,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }
}
