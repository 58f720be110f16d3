use crate::geometry::WindowDimensions;

/// Renderer-facing context (device/queue, surface format, window dimensions
/// and device capabilities).
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub dimensions: WindowDimensions,
    /// Highest MSAA sample count the surface format supports.
    pub max_sample_count: u32,
    pub features: wgpu::Features,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        dimensions: WindowDimensions,
        max_sample_count: u32,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            dimensions,
            max_sample_count,
            features: device.features(),
        }
    }
}

/// Target for presenting (encoder + surface color view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
