use std::ops::Range;

use crate::geometry::Rect;

/// A word: a maximal run of non-whitespace bytes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Word {
    pub bytes: (usize, usize),
    pub width: f32,
    /// Summed advance of the whitespace preceding this word.
    pub gap_before: f32,
    /// Number of `'\n'` between the previous word and this one.
    pub breaks_before: u32,
}

/// A laid-out line referencing a range of words.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Line {
    pub first_word: usize,
    pub word_count: usize,
    /// Leading whitespace kept at the start of a paragraph.
    pub indent: f32,
    /// Advance width from the line start to the last word's end, indent included.
    pub width: f32,
    /// The line ends its paragraph (hard break or end of text).
    pub ends_paragraph: bool,
}

/// A glyph positioned in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    pub rect: Rect,
}

/// Caller-owned working memory for text layout.
///
/// Layout only ever appends. Call [`TextScratch::reset`] once per frame; the
/// results of [`crate::text::layout`] borrow the scratch, so none can be held
/// across a reset.
#[derive(Debug, Default)]
pub struct TextScratch {
    pub(crate) words: Vec<Word>,
    pub(crate) lines: Vec<Line>,
    pub(crate) glyphs: Vec<PlacedGlyph>,
}

/// High-water marks used to roll back a layout attempt.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Marks {
    pub words: usize,
    pub lines: usize,
    pub glyphs: usize,
}

impl TextScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases everything laid out since the last reset. Keeps capacity.
    pub fn reset(&mut self) {
        self.words.clear();
        self.lines.clear();
        self.glyphs.clear();
    }

    /// Glyphs placed since the last reset.
    #[inline]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub(crate) fn marks(&self) -> Marks {
        Marks {
            words: self.words.len(),
            lines: self.lines.len(),
            glyphs: self.glyphs.len(),
        }
    }

    pub(crate) fn rollback(&mut self, marks: Marks) {
        self.words.truncate(marks.words);
        self.lines.truncate(marks.lines);
        self.glyphs.truncate(marks.glyphs);
    }

    pub(crate) fn line_words(&self, line: &Line) -> Range<usize> {
        line.first_word..line.first_word + line.word_count
    }
}
