use crate::gpu::DrawUniforms;
use crate::paint::Color;
use crate::text::{layout, FontId, GlyphKey, GlyphSource, PlacedGlyph, Text, TextArea, TextScratch};

use super::transform::model_matrix;
use super::{Primitive, Renderer};

impl Renderer {
    /// Draws `text` unbounded from its origin. `'\n'` starts a new line.
    pub fn draw_text(&mut self, source: &impl GlyphSource, text: &Text<'_>) {
        if !self.recording() {
            return;
        }
        // Own the scratch for the duration of the call; it holds no state
        // between draws.
        let mut scratch = std::mem::take(&mut self.text_scratch);
        scratch.reset();
        let out = layout(source, &TextArea::unbounded(*text), &mut scratch);
        self.draw_glyphs(source, text.font, out.pixel_size, text.color, out.glyphs);
        self.text_scratch = scratch;
    }

    /// Lays out `area` in `scratch` and draws the result. Returns the pixel
    /// size used, which is smaller than requested when SHRINK_TO_FIT kicked
    /// in.
    pub fn draw_text_area(&mut self, source: &impl GlyphSource, area: &TextArea<'_>, scratch: &mut TextScratch) -> f32 {
        if !self.recording() {
            return area.text.pixel_size;
        }
        let out = layout(source, area, scratch);
        self.draw_glyphs(source, area.text.font, out.pixel_size, area.text.color, out.glyphs);
        out.pixel_size
    }

    fn draw_glyphs(
        &mut self,
        source: &impl GlyphSource,
        font: FontId,
        pixel_size: f32,
        color: Color,
        glyphs: &[PlacedGlyph],
    ) {
        for glyph in glyphs {
            let key = GlyphKey::new(font, pixel_size, glyph.ch);
            let Some(bind) = self.glyph_bind(source, key) else {
                continue;
            };
            let uniforms = DrawUniforms::solid(model_matrix(glyph.rect.origin, glyph.rect.size, 0.0), color);
            self.record(Primitive::Glyph, uniforms, Some(bind));
        }
    }
}
