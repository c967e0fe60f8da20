use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::registry::AuxTexture;

/// Edge length of the generated maps, in texels.
pub const MAP_SIZE: u32 = 256;

/// Lattice cells per edge for the burn height field.
const BURN_CELLS: u32 = 8;

/// Per-texel grey noise, RGBA8.
pub fn noise_pixels(size: u32, rng: &mut impl Rng) -> Vec<u8> {
    let mut out = Vec::with_capacity((size * size * 4) as usize);
    for _ in 0..size * size {
        let v: u8 = rng.random();
        out.extend_from_slice(&[v, v, v, 255]);
    }
    out
}

/// Smooth, tileable height field for the burn edge, RGBA8 grey.
///
/// Value noise: random heights on a `BURN_CELLS` lattice, smoothstep-blended.
pub fn burn_pixels(size: u32, rng: &mut impl Rng) -> Vec<u8> {
    let cells = BURN_CELLS as usize;
    let lattice: Vec<f32> = (0..cells * cells).map(|_| rng.random_range(0.0..1.0)).collect();
    let at = |x: usize, y: usize| lattice[(y % cells) * cells + (x % cells)];

    let mut out = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let fx = x as f32 / size as f32 * BURN_CELLS as f32;
            let fy = y as f32 / size as f32 * BURN_CELLS as f32;
            let (cx, cy) = (fx as usize, fy as usize);
            let tx = smoothstep(fx.fract());
            let ty = smoothstep(fy.fract());

            let top = lerp(at(cx, cy), at(cx + 1, cy), tx);
            let bottom = lerp(at(cx, cy + 1), at(cx + 1, cy + 1), tx);
            let v = (lerp(top, bottom, ty) * 255.0).round() as u8;
            out.extend_from_slice(&[v, v, v, 255]);
        }
    }
    out
}

/// Tileable offset map for the distort effect; red and green hold signed
/// offsets around 0.5.
pub fn distort_pixels(size: u32) -> Vec<u8> {
    use std::f32::consts::TAU;

    let mut out = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let u = x as f32 / size as f32;
            let v = y as f32 / size as f32;
            let dx = 0.5 + 0.5 * (TAU * (3.0 * u + v)).sin();
            let dy = 0.5 + 0.5 * (TAU * (2.0 * v - u)).cos();
            out.extend_from_slice(&[(dx * 255.0).round() as u8, (dy * 255.0).round() as u8, 128, 255]);
        }
    }
    out
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

struct Map {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Procedural auxiliary textures plus a 1x1 white stand-in for unbound slots.
pub struct AuxTextures {
    noise: Map,
    burn: Map,
    distort: Map,
    white: Map,
    sampler: wgpu::Sampler,
}

impl AuxTextures {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let noise = upload(device, queue, "refract noise map", MAP_SIZE, &noise_pixels(MAP_SIZE, &mut rng));
        let burn = upload(device, queue, "refract burn map", MAP_SIZE, &burn_pixels(MAP_SIZE, &mut rng));
        let distort = upload(device, queue, "refract distort map", MAP_SIZE, &distort_pixels(MAP_SIZE));
        let white = upload(device, queue, "refract white", 1, &[255, 255, 255, 255]);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("refract aux sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            noise,
            burn,
            distort,
            white,
            sampler,
        }
    }

    /// View for a procedural map. `Feedback` lives with the offscreen
    /// surfaces, so it yields `None` here.
    pub fn view(&self, aux: AuxTexture) -> Option<&wgpu::TextureView> {
        match aux {
            AuxTexture::Noise => Some(&self.noise.view),
            AuxTexture::Burn => Some(&self.burn.view),
            AuxTexture::Distort => Some(&self.distort.view),
            AuxTexture::Feedback => None,
        }
    }

    #[inline]
    pub fn white(&self) -> &wgpu::TextureView {
        &self.white.view
    }

    #[inline]
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

fn upload(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, size: u32, pixels: &[u8]) -> Map {
    let extent = wgpu::Extent3d {
        width: size,
        height: size,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(size * 4),
            rows_per_image: Some(size),
        },
        extent,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Map { _texture: texture, view }
}
