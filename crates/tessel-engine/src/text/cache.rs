use std::collections::HashMap;

use crate::gpu::Texture;

use super::{FontId, GlyphSource};

/// Cache key: font identity, pixel size and code point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GlyphKey {
    pub font: FontId,
    pixel_bits: u32,
    pub ch: char,
}

impl GlyphKey {
    pub fn new(font: FontId, pixel_size: f32, ch: char) -> Self {
        Self { font, pixel_bits: pixel_size.to_bits(), ch }
    }

    #[inline]
    pub fn pixel_size(&self) -> f32 {
        f32::from_bits(self.pixel_bits)
    }
}

struct CachedGlyph {
    /// `None` for glyphs that have no bitmap.
    gpu: Option<(Texture, wgpu::BindGroup)>,
    last_used: u64,
}

/// GPU bind state the cache needs to create glyph textures.
pub struct GlyphUpload<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub layout: &'a wgpu::BindGroupLayout,
    pub sampler: &'a wgpu::Sampler,
}

/// One R8 texture per rasterized glyph, created on first draw.
///
/// Glyphs that cannot be rasterized are remembered as blank so they are
/// not retried every frame. Entries not drawn for `max_idle_frames` frames
/// are evicted by [`GlyphCache::next_frame`].
pub struct GlyphCache {
    entries: HashMap<GlyphKey, CachedGlyph>,
    frame: u64,
    max_idle_frames: u64,
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphCache {
    pub const DEFAULT_MAX_IDLE_FRAMES: u64 = 300;

    pub fn new() -> Self {
        Self::with_max_idle_frames(Self::DEFAULT_MAX_IDLE_FRAMES)
    }

    pub fn with_max_idle_frames(max_idle_frames: u64) -> Self {
        Self { entries: HashMap::new(), frame: 0, max_idle_frames }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the glyph's texture bind group, rasterizing it if needed.
    pub fn get_or_rasterize(
        &mut self,
        gpu: &GlyphUpload<'_>,
        source: &impl GlyphSource,
        key: GlyphKey,
    ) -> Option<&wgpu::BindGroup> {
        let frame = self.frame;
        let entry = self.entries.entry(key).or_insert_with(|| CachedGlyph {
            gpu: upload_glyph(gpu, source, key),
            last_used: frame,
        });
        entry.last_used = frame;
        entry.gpu.as_ref().map(|(_, bind_group)| bind_group)
    }

    /// Advances the frame counter and destroys glyphs left idle too long.
    pub fn next_frame(&mut self) {
        self.frame += 1;
        let (frame, max_idle) = (self.frame, self.max_idle_frames);
        let before = self.entries.len();
        self.entries.retain(|_, glyph| {
            let keep = frame - glyph.last_used <= max_idle;
            if !keep && let Some((texture, _)) = glyph.gpu.take() {
                texture.destroy();
            }
            keep
        });
        let evicted = before - self.len();
        if evicted > 0 {
            log::trace!("glyph cache: evicted {evicted}, {} resident", self.len());
        }
    }

    /// Destroys every glyph texture.
    pub fn clear(&mut self) {
        for (_, glyph) in self.entries.drain() {
            if let Some((texture, _)) = glyph.gpu {
                texture.destroy();
            }
        }
    }
}

fn upload_glyph(gpu: &GlyphUpload<'_>, source: &impl GlyphSource, key: GlyphKey) -> Option<(Texture, wgpu::BindGroup)> {
    let glyph = source.rasterize(key.font, key.pixel_size(), key.ch);
    let m = glyph.metrics;
    if !m.is_visible() {
        return None;
    }
    match Texture::glyph(gpu.device, gpu.queue, m.width, m.height, &glyph.bitmap) {
        Ok(texture) => {
            let bind_group = texture.bind(gpu.device, gpu.layout, gpu.sampler);
            Some((texture, bind_group))
        }
        Err(e) => {
            log::warn!("glyph {:?} at {}px: {e}", key.ch, key.pixel_size());
            None
        }
    }
}
