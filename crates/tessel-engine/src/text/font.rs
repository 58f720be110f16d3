use std::fmt;
use std::path::Path;

use super::{GlyphMetrics, GlyphSource, LineMetrics, RasterizedGlyph};

/// Error returned by [`FontEngine::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontEngine`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns every loaded font face.
///
/// Faces are immutable after loading and every query takes the pixel size as
/// an argument, so one face serves all sizes and nested layouts cannot
/// disturb each other.
#[derive(Default)]
pub struct FontEngine {
    fonts: Vec<fontdue::Font>,
}

impl FontEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses a TrueType or OpenType file.
    pub fn load_font(&mut self, path: impl AsRef<Path>) -> Result<FontId, FontLoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| FontLoadError(format!("{}: {e}", path.display())))?;
        let id = self.load_font_bytes(&bytes)?;
        log::info!("loaded font {} as {:?}", path.display(), id);
        Ok(id)
    }

    /// Parses a TrueType or OpenType font from raw bytes.
    pub fn load_font_bytes(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    fn face(&self, id: FontId) -> Option<&fontdue::Font> {
        let face = self.fonts.get(id.0);
        if face.is_none() {
            log::warn!("unknown {id:?}");
        }
        face
    }
}

fn convert(m: &fontdue::Metrics) -> GlyphMetrics {
    GlyphMetrics {
        width: m.width as u32,
        height: m.height as u32,
        bearing_x: m.xmin as f32,
        bearing_y: (m.ymin + m.height as i32) as f32,
        advance_x: m.advance_width,
        advance_y: m.advance_height,
    }
}

impl GlyphSource for FontEngine {
    fn glyph_metrics(&self, font: FontId, pixel_size: f32, ch: char) -> GlyphMetrics {
        match self.face(font) {
            Some(face) if face.lookup_glyph_index(ch) != 0 => convert(&face.metrics(ch, pixel_size)),
            _ => GlyphMetrics::MISSING,
        }
    }

    fn line_metrics(&self, font: FontId, pixel_size: f32) -> LineMetrics {
        self.face(font)
            .and_then(|face| face.horizontal_line_metrics(pixel_size))
            .map(|m| LineMetrics { ascent: m.ascent, descent: -m.descent })
            .unwrap_or(LineMetrics { ascent: pixel_size, descent: 0.0 })
    }

    fn rasterize(&self, font: FontId, pixel_size: f32, ch: char) -> RasterizedGlyph {
        let Some(face) = self.face(font) else { return RasterizedGlyph::default() };
        if face.lookup_glyph_index(ch) == 0 {
            log::debug!("no glyph for {ch:?} in {font:?}");
            return RasterizedGlyph::default();
        }
        let (metrics, bitmap) = face.rasterize(ch, pixel_size);
        RasterizedGlyph { metrics: convert(&metrics), bitmap }
    }
}
