//! Fonts, glyph rasterization and text layout.
//!
//! Layout is pure CPU work over a [`GlyphSource`] and a caller-owned
//! [`TextScratch`]; it never touches the GPU. The renderer turns placed
//! glyphs into textured quads through the [`GlyphCache`].

mod cache;
mod font;
mod glyph;
mod layout;
mod scratch;
mod style;

pub use cache::{GlyphCache, GlyphKey, GlyphUpload};
pub use font::{FontEngine, FontId, FontLoadError};
pub use glyph::{GlyphMetrics, GlyphSource, LineMetrics, RasterizedGlyph};
pub use layout::{layout, measure, TextLayout};
pub use scratch::{PlacedGlyph, TextScratch};
pub use style::{HAlign, Text, TextArea, TextStyle, VAlign};
