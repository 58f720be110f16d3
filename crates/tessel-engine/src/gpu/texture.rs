use std::borrow::Cow;

use super::RenderError;

/// A sampled 2D texture with its default view.
///
/// Destroying consumes the value, so a destroyed texture cannot be bound.
pub struct Texture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl Texture {
    /// Uploads tightly packed 8-bit pixels with 1, 3 or 4 channels.
    ///
    /// Grey and RGB sources are expanded to RGBA; the result is always
    /// `Rgba8UnormSrgb` with straight alpha.
    pub fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        channels: u8,
        pixels: &[u8],
    ) -> Result<Self, RenderError> {
        let rgba = expand_to_rgba(width, height, channels, pixels)?;
        let max = device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(RenderError::InvalidTexture(format!(
                "{width}x{height} exceeds the device limit of {max}"
            )));
        }

        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let texture = create_sampled(device, label, width, height, format);
        write_pixels(queue, &texture, width, height, width * 4, &rgba);

        Ok(Self::wrap(texture, width, height))
    }

    /// Uploads a single-channel coverage bitmap as `R8Unorm`.
    pub fn glyph(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        coverage: &[u8],
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidTexture("empty glyph bitmap".into()));
        }
        if coverage.len() != (width * height) as usize {
            return Err(RenderError::InvalidTexture(format!(
                "glyph bitmap has {} bytes, expected {}",
                coverage.len(),
                width * height
            )));
        }

        let format = wgpu::TextureFormat::R8Unorm;
        let texture = create_sampled(device, "tessel glyph", width, height, format);
        write_pixels(queue, &texture, width, height, width, coverage);

        Ok(Self::wrap(texture, width, height))
    }

    fn wrap(texture: wgpu::Texture, width: u32, height: u32) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view, width, height }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Creates a bind group for the texture group layout (view + sampler).
    pub fn bind(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessel texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Releases the texture. Draws already recorded with it hold their own
    /// reference, so the GPU copy lives until that frame is submitted.
    pub fn destroy(self) {
        drop(self);
    }
}

/// Linear-filtered, edge-clamped sampler shared by sprites and glyphs.
pub fn linear_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("tessel linear sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

fn create_sampled(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn write_pixels(queue: &wgpu::Queue, texture: &wgpu::Texture, width: u32, height: u32, row_bytes: u32, data: &[u8]) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(row_bytes),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
    );
}

/// Validates packed pixel data and widens it to RGBA8.
pub(crate) fn expand_to_rgba(
    width: u32,
    height: u32,
    channels: u8,
    pixels: &[u8],
) -> Result<Cow<'_, [u8]>, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidTexture(format!("zero-sized texture {width}x{height}")));
    }
    if !matches!(channels, 1 | 3 | 4) {
        return Err(RenderError::InvalidTexture(format!("unsupported channel count {channels}")));
    }
    let expected = width as usize * height as usize * channels as usize;
    if pixels.len() != expected {
        return Err(RenderError::InvalidTexture(format!(
            "pixel data has {} bytes, expected {expected}",
            pixels.len()
        )));
    }

    Ok(match channels {
        4 => Cow::Borrowed(pixels),
        3 => Cow::Owned(
            pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
        ),
        _ => Cow::Owned(pixels.iter().flat_map(|&g| [g, g, g, 255]).collect()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_is_borrowed_unchanged() {
        let px = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let out = expand_to_rgba(2, 1, 4, &px).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, &px);
    }

    #[test]
    fn rgb_and_grey_are_widened() {
        let rgb = expand_to_rgba(1, 1, 3, &[10, 20, 30]).unwrap();
        assert_eq!(&*rgb, &[10, 20, 30, 255]);

        let grey = expand_to_rgba(2, 1, 1, &[7, 9]).unwrap();
        assert_eq!(&*grey, &[7, 7, 7, 255, 9, 9, 9, 255]);
    }

    #[test]
    fn bad_inputs_are_rejected() {
        assert!(expand_to_rgba(0, 4, 4, &[]).is_err());
        assert!(expand_to_rgba(1, 1, 2, &[0, 0]).is_err());
        assert!(expand_to_rgba(2, 2, 4, &[0; 15]).is_err());
    }

    // ── device ──

    #[test]
    fn destroyed_texture_stays_valid_for_recorded_bindings() {
        let (device, queue) = wgpu::Device::noop(&wgpu::DeviceDescriptor::default());
        let layouts = crate::gpu::BindLayouts::new(&device);
        let sampler = linear_sampler(&device);

        let texture = Texture::from_pixels(&device, &queue, "sprite", 2, 2, 3, &[200; 12]).unwrap();
        let recorded_view = texture.view().clone();
        texture.destroy();

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let _bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &layouts.texture,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&recorded_view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        });
        assert!(pollster::block_on(scope.pop()).is_none());
    }
}
