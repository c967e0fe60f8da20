use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// Picks the display format. With `prefer_srgb`, the 8-bit sRGB formats the
/// offscreen surfaces use come first, then any sRGB format.
pub(crate) fn pick_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        let exact = preferred.into_iter().find(|f| formats.contains(f));
        let any_srgb = || formats.iter().copied().find(|f| f.is_srgb());
        if let Some(f) = exact.or_else(any_srgb) {
            return Some(f);
        }
    }
    formats.first().copied()
}

pub(crate) fn pick_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// `requested` when supported, otherwise FIFO (always available).
pub(crate) fn pick_present_mode(
    supported: &[wgpu::PresentMode],
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    match requested {
        // resolved by wgpu
        wgpu::PresentMode::AutoVsync | wgpu::PresentMode::AutoNoVsync => requested,
        mode if supported.contains(&mode) => mode,
        _ => wgpu::PresentMode::Fifo,
    }
}

/// Records the new size and reconfigures unless minimized.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use wgpu::{CompositeAlphaMode as Alpha, PresentMode, TextureFormat as F};

    use super::*;

    #[test]
    fn srgb_display_preferred() {
        let formats = [F::Bgra8Unorm, F::Rgba8UnormSrgb, F::Bgra8UnormSrgb];
        assert_eq!(pick_format(&formats, true), Some(F::Bgra8UnormSrgb));
        assert_eq!(pick_format(&formats, false), Some(F::Bgra8Unorm));
    }

    #[test]
    fn any_srgb_before_linear() {
        let formats = [F::Rgba16Float, F::Rgb10a2Unorm, F::Bc1RgbaUnormSrgb];
        assert_eq!(pick_format(&formats, true), Some(F::Bc1RgbaUnormSrgb));
    }

    #[test]
    fn no_formats_no_surface() {
        assert_eq!(pick_format(&[], true), None);
    }

    #[test]
    fn unsupported_present_mode_falls_back_to_fifo() {
        let supported = [PresentMode::Fifo, PresentMode::Mailbox];
        assert_eq!(pick_present_mode(&supported, PresentMode::Immediate), PresentMode::Fifo);
        assert_eq!(pick_present_mode(&supported, PresentMode::Mailbox), PresentMode::Mailbox);
        assert_eq!(pick_present_mode(&supported, PresentMode::AutoNoVsync), PresentMode::AutoNoVsync);
    }

    #[test]
    fn alpha_mode_falls_back_to_first_supported() {
        let supported = [Alpha::Opaque, Alpha::PreMultiplied];
        assert_eq!(pick_alpha_mode(&supported, Some(Alpha::PreMultiplied)), Alpha::PreMultiplied);
        assert_eq!(pick_alpha_mode(&supported, Some(Alpha::PostMultiplied)), Alpha::Opaque);
        assert_eq!(pick_alpha_mode(&[], None), Alpha::Auto);
    }
}
