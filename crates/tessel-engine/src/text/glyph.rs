use super::FontId;

/// Metrics of one glyph at one pixel size.
///
/// `bearing_x` is the offset from the pen to the bitmap's left edge;
/// `bearing_y` is the height of the bitmap's top edge above the baseline.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct GlyphMetrics {
    pub width: u32,
    pub height: u32,
    pub bearing_x: f32,
    pub bearing_y: f32,
    pub advance_x: f32,
    pub advance_y: f32,
}

impl GlyphMetrics {
    /// Stand-in for a code point the font cannot produce: invisible, no advance.
    pub const MISSING: Self = Self {
        width: 0,
        height: 0,
        bearing_x: 0.0,
        bearing_y: 0.0,
        advance_x: 0.0,
        advance_y: 0.0,
    };

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Vertical font metrics at one pixel size. Both values are positive.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl LineMetrics {
    #[inline]
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// 8-bit coverage bitmap, row-major with no row padding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RasterizedGlyph {
    pub metrics: GlyphMetrics,
    pub bitmap: Vec<u8>,
}

/// Anything that can answer glyph metrics and produce coverage bitmaps.
///
/// Layout only needs metrics; rasterization happens when a glyph is first
/// drawn at a given size.
pub trait GlyphSource {
    fn glyph_metrics(&self, font: FontId, pixel_size: f32, ch: char) -> GlyphMetrics;

    fn line_metrics(&self, font: FontId, pixel_size: f32) -> LineMetrics;

    fn rasterize(&self, font: FontId, pixel_size: f32, ch: char) -> RasterizedGlyph;
}
