use crate::gpu::RenderError;

/// A color render target.
///
/// Single-sample targets are also sampleable so they can be presented
/// through the blit pass. There is no depth attachment.
pub struct Framebuffer {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
    sample_count: u32,
}

impl Framebuffer {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Result<Self, RenderError> {
        validate(width, height, sample_count, device.limits().max_texture_dimension_2d)?;

        let usage = if sample_count > 1 {
            wgpu::TextureUsages::RENDER_ATTACHMENT
        } else {
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("{label}: {width}x{height} @ {sample_count}x");
        Ok(Self { texture, view, width, height, sample_count })
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn destroy(self) {
        self.texture.destroy();
    }
}

fn validate(width: u32, height: u32, sample_count: u32, max_dim: u32) -> Result<(), RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::FramebufferIncomplete(format!("zero-sized target {width}x{height}")));
    }
    if width > max_dim || height > max_dim {
        return Err(RenderError::FramebufferIncomplete(format!(
            "{width}x{height} exceeds max texture dimension {max_dim}"
        )));
    }
    if !sample_count.is_power_of_two() || sample_count > 16 {
        return Err(RenderError::FramebufferIncomplete(format!("invalid sample count {sample_count}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_incomplete_targets() {
        assert!(validate(0, 10, 1, 8192).is_err());
        assert!(validate(10, 9000, 1, 8192).is_err());
        assert!(validate(10, 10, 3, 8192).is_err());
        assert!(validate(10, 10, 0, 8192).is_err());
        assert!(validate(1920, 1080, 4, 8192).is_ok());
    }
}
