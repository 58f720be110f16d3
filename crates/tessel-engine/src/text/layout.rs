use crate::geometry::{Rect, Vec2};

use super::scratch::{Line, Word};
use super::{FontId, GlyphSource, HAlign, PlacedGlyph, Text, TextArea, TextScratch, TextStyle, VAlign};

// Width comparisons tolerate accumulated float error from summed advances.
const FIT_EPSILON: f32 = 1e-3;

/// A tab advances this many spaces. Fonts rarely carry a tab glyph.
const TAB_WIDTH_IN_SPACES: f32 = 4.0;

/// Horizontal advance of `ch`, with tabs expanded to spaces.
fn char_advance(source: &impl GlyphSource, font: FontId, pixel_size: f32, ch: char) -> f32 {
    match ch {
        '\t' => TAB_WIDTH_IN_SPACES * source.glyph_metrics(font, pixel_size, ' ').advance_x,
        _ => source.glyph_metrics(font, pixel_size, ch).advance_x,
    }
}

/// Whitespace that separates words. No-break spaces stay inside their word.
fn is_word_break(ch: char) -> bool {
    ch.is_whitespace() && !matches!(ch, '\u{a0}' | '\u{2007}' | '\u{202f}')
}

/// Result of [`layout`]. Borrows the scratch it was laid out in.
#[derive(Debug, Clone, Copy)]
pub struct TextLayout<'s> {
    pub glyphs: &'s [PlacedGlyph],
    /// Size actually used; smaller than requested after shrink-to-fit.
    pub pixel_size: f32,
    pub line_count: usize,
    pub line_height: f32,
    /// Widest line by block height.
    pub block_size: Vec2,
}

/// Summed horizontal advance of the widest `'\n'`-separated line. No kerning.
pub fn measure(source: &impl GlyphSource, text: &Text<'_>) -> f32 {
    text.content
        .split('\n')
        .map(|line| line.chars().map(|ch| char_advance(source, text.font, text.pixel_size, ch)).sum::<f32>())
        .fold(0.0, f32::max)
}

/// Breaks, aligns and positions the glyphs of `area`.
///
/// Working buffers are appended to `scratch` and never released here.
pub fn layout<'s>(source: &impl GlyphSource, area: &TextArea<'_>, scratch: &'s mut TextScratch) -> TextLayout<'s> {
    let marks = scratch.marks();
    let text = &area.text;

    if !(text.pixel_size.is_finite() && text.pixel_size > 0.0) {
        log::warn!("text pixel size {} is not drawable", text.pixel_size);
        return TextLayout {
            glyphs: &scratch.glyphs[marks.glyphs..],
            pixel_size: text.pixel_size,
            line_count: 0,
            line_height: 0.0,
            block_size: Vec2::zero(),
        };
    }

    let wrap = area.style.contains(TextStyle::WRAP);
    let shrink = area.style.contains(TextStyle::SHRINK_TO_FIT);
    let max_width = if wrap { area.bounds.size.x } else { f32::INFINITY };

    let mut pixel_size = text.pixel_size;
    let (line_height, block_width) = loop {
        scratch.rollback(marks);
        let trailing = tokenize(source, text, pixel_size, &mut scratch.words);
        break_lines(&scratch.words, marks.words, trailing, max_width, &mut scratch.lines);

        let lines = &scratch.lines[marks.lines..];
        let line_height = source.line_metrics(text.font, pixel_size).line_height();
        let block_width = lines.iter().map(|l| l.width).fold(0.0, f32::max);
        let block_height = lines.len() as f32 * line_height;

        let fits = block_height <= area.bounds.size.y + FIT_EPSILON
            && (wrap || block_width <= area.bounds.size.x + FIT_EPSILON);
        if !shrink || fits || pixel_size <= area.min_pixel_size {
            break (line_height, block_width);
        }

        // Metrics scale linearly with size, so nothing above `ceiling` can fit.
        // Wrapping may reduce the line count down to one.
        let ceiling = if wrap {
            pixel_size * area.bounds.size.y / line_height
        } else {
            pixel_size * (area.bounds.size.y / block_height).min(area.bounds.size.x / block_width)
        };
        let next = (pixel_size - 1.0)
            .min((ceiling + FIT_EPSILON).floor())
            .max(area.min_pixel_size);
        if next >= pixel_size {
            break (line_height, block_width);
        }
        pixel_size = next;
    };

    place(source, area, pixel_size, marks.lines, scratch);

    let line_count = scratch.lines.len() - marks.lines;
    TextLayout {
        glyphs: &scratch.glyphs[marks.glyphs..],
        pixel_size,
        line_count,
        line_height,
        block_size: Vec2::new(block_width, line_count as f32 * line_height),
    }
}

/// Splits `text` into words. Returns the number of trailing `'\n'`.
fn tokenize(source: &impl GlyphSource, text: &Text<'_>, pixel_size: f32, words: &mut Vec<Word>) -> u32 {
    let advance = |ch| char_advance(source, text.font, pixel_size, ch);

    let mut start = None;
    let mut width = 0.0;
    let mut gap = 0.0;
    let mut breaks = 0;

    for (i, ch) in text.content.char_indices() {
        if is_word_break(ch) {
            if let Some(s) = start.take() {
                words.push(Word { bytes: (s, i), width, gap_before: gap, breaks_before: breaks });
                width = 0.0;
                gap = 0.0;
                breaks = 0;
            }
            if ch == '\n' {
                breaks += 1;
                gap = 0.0;
            } else {
                gap += advance(ch);
            }
        } else {
            start.get_or_insert(i);
            width += advance(ch);
        }
    }

    if let Some(s) = start {
        words.push(Word { bytes: (s, text.content.len()), width, gap_before: gap, breaks_before: breaks });
        breaks = 0;
    }
    breaks
}

/// Greedy line breaking over `words[first..]`.
///
/// A word wider than `max_width` is placed alone on its own line.
fn break_lines(words: &[Word], first: usize, trailing_breaks: u32, max_width: f32, lines: &mut Vec<Line>) {
    let empty = |at| Line { first_word: at, word_count: 0, indent: 0.0, width: 0.0, ends_paragraph: true };

    let mut line = Line { ends_paragraph: false, ..empty(first) };
    let mut paragraph_start = true;

    for (idx, word) in words.iter().enumerate().skip(first) {
        if word.breaks_before > 0 {
            lines.push(Line { ends_paragraph: true, ..line });
            lines.extend((1..word.breaks_before).map(|_| empty(idx)));
            line = Line { ends_paragraph: false, ..empty(idx) };
            paragraph_start = true;
        }

        if line.word_count == 0 {
            let indent = if paragraph_start { word.gap_before } else { 0.0 };
            line = Line { first_word: idx, word_count: 1, indent, width: indent + word.width, ends_paragraph: false };
            paragraph_start = false;
            continue;
        }

        let candidate = line.width + word.gap_before + word.width;
        if candidate > max_width + FIT_EPSILON {
            lines.push(line);
            line = Line { first_word: idx, word_count: 1, indent: 0.0, width: word.width, ends_paragraph: false };
        } else {
            line.word_count += 1;
            line.width = candidate;
        }
    }

    lines.push(Line { ends_paragraph: true, ..line });
    let end = words.len();
    lines.extend((0..trailing_breaks).map(|_| empty(end)));
}

/// Positions glyphs for `scratch.lines[first_line..]`.
fn place(source: &impl GlyphSource, area: &TextArea<'_>, pixel_size: f32, first_line: usize, scratch: &mut TextScratch) {
    let text = &area.text;
    let bounds = area.bounds;
    let metrics = source.line_metrics(text.font, pixel_size);
    let line_height = metrics.line_height();

    let line_count = scratch.lines.len() - first_line;
    let block_height = line_count as f32 * line_height;
    let top = match area.v_align {
        VAlign::Top => bounds.origin.y,
        VAlign::Bottom => bounds.origin.y + bounds.size.y - block_height,
        VAlign::Center => bounds.origin.y + (bounds.size.y - block_height) * 0.5,
    };

    for (row, line) in scratch.lines[first_line..].iter().enumerate() {
        let line_top = top + row as f32 * line_height;
        let slack = bounds.size.x - line.width;

        let (start, extra_gap) = match area.h_align {
            HAlign::Left => (bounds.origin.x, 0.0),
            HAlign::Right => (bounds.origin.x + slack, 0.0),
            HAlign::Center => (bounds.origin.x + slack * 0.5, 0.0),
            HAlign::Justified => {
                let gaps = line.word_count.saturating_sub(1);
                if line.ends_paragraph || gaps == 0 || slack <= 0.0 {
                    (bounds.origin.x, 0.0)
                } else {
                    (bounds.origin.x, slack / gaps as f32)
                }
            }
        };

        let mut pen = start + line.indent;
        for (n, word) in scratch.words[scratch.line_words(line)].iter().enumerate() {
            if n > 0 {
                pen += word.gap_before + extra_gap;
            }
            for ch in text.content[word.bytes.0..word.bytes.1].chars() {
                let m = source.glyph_metrics(text.font, pixel_size, ch);
                if m.is_visible() {
                    scratch.glyphs.push(PlacedGlyph {
                        ch,
                        rect: Rect::new(
                            pen + m.bearing_x,
                            line_top + metrics.ascent - m.bearing_y,
                            m.width as f32,
                            m.height as f32,
                        ),
                    });
                }
                pen += m.advance_x;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::text::{FontId, GlyphMetrics, LineMetrics, RasterizedGlyph};

    /// Monospace stand-in: advance 0.78125·px, ascent 19/24·px, descent 5/24·px.
    struct FakeFont;

    impl GlyphSource for FakeFont {
        fn glyph_metrics(&self, _font: FontId, px: f32, ch: char) -> GlyphMetrics {
            if ch == '\u{fffe}' || ch == '\t' {
                return GlyphMetrics::MISSING;
            }
            let advance_x = px * 0.78125;
            if ch.is_whitespace() {
                return GlyphMetrics { advance_x, ..GlyphMetrics::MISSING };
            }
            let height = (px * 0.7).round();
            let descender = if "gjpqy".contains(ch) { (px * 0.2).round() } else { 0.0 };
            GlyphMetrics {
                width: (px * 0.5).round() as u32,
                height: height as u32,
                bearing_x: (px * 0.05).round(),
                bearing_y: height - descender,
                advance_x,
                advance_y: 0.0,
            }
        }

        fn line_metrics(&self, _font: FontId, px: f32) -> LineMetrics {
            LineMetrics { ascent: px * 19.0 / 24.0, descent: px * 5.0 / 24.0 }
        }

        fn rasterize(&self, font: FontId, px: f32, ch: char) -> RasterizedGlyph {
            let metrics = self.glyph_metrics(font, px, ch);
            RasterizedGlyph { metrics, bitmap: vec![255; (metrics.width * metrics.height) as usize] }
        }
    }

    const FONT: FontId = FontId(0);

    fn area(content: &str, px: f32, bounds: Rect) -> TextArea<'_> {
        TextArea::new(Text::new(content, FONT, px), bounds)
    }

    fn line_tops(layout: &TextLayout<'_>) -> Vec<f32> {
        let mut tops: Vec<f32> = layout.glyphs.iter().map(|g| g.rect.origin.y).collect();
        tops.dedup();
        tops
    }

    // ── measure ──

    #[test]
    fn measure_is_additive() {
        let a = "Hello, ";
        let b = "world";
        let ab = format!("{a}{b}");
        for px in [12.0, 17.0, 24.0] {
            let m = |s: &str| measure(&FakeFont, &Text::new(s, FONT, px));
            assert_relative_eq!(m(&ab), m(a) + m(b), epsilon = 1e-3);
        }
    }

    #[test]
    fn measure_takes_widest_line() {
        let w = measure(&FakeFont, &Text::new("ab\nabcd\nc", FONT, 24.0));
        assert_relative_eq!(w, 4.0 * 18.75);
    }

    #[test]
    fn tabs_advance_four_spaces() {
        let w = measure(&FakeFont, &Text::new("a\tb", FONT, 24.0));
        assert_relative_eq!(w, 6.0 * 18.75);

        let mut scratch = TextScratch::new();
        let out = layout(&FakeFont, &area("a\tb", 24.0, Rect::new(0.0, 0.0, 500.0, 100.0)), &mut scratch);
        assert_eq!(out.glyphs.len(), 2);
        assert_relative_eq!(out.glyphs[1].rect.origin.x - out.glyphs[0].rect.origin.x, 5.0 * 18.75);
    }

    // ── wrapping ──

    #[test]
    fn no_break_space_keeps_words_together() {
        let mut scratch = TextScratch::new();
        let a = area("a\u{a0}b c", 24.0, Rect::new(0.0, 0.0, 40.0, 500.0)).styled(TextStyle::WRAP);
        let out = layout(&FakeFont, &a, &mut scratch);
        assert_eq!(out.line_count, 2);
        assert_eq!(scratch.lines[0].word_count, 1);
        assert_relative_eq!(scratch.lines[0].width, 3.0 * 18.75);
    }

    #[test]
    fn wraps_greedily_and_never_splits_words() {
        let mut scratch = TextScratch::new();
        // 18.75 px per char; the box fits six characters.
        let a = area("aa bb incomprehensible cc", 24.0, Rect::new(0.0, 0.0, 112.5, 500.0)).styled(TextStyle::WRAP);
        let out = layout(&FakeFont, &a, &mut scratch);

        assert_eq!(out.line_count, 3);
        let lines = &scratch.lines;
        let words: Vec<usize> = lines.iter().map(|l| l.word_count).collect();
        assert_eq!(words, vec![2, 1, 1]);
        assert_relative_eq!(lines[1].width, 16.0 * 18.75);
    }

    #[test]
    fn without_wrap_lines_only_break_on_newline() {
        let mut scratch = TextScratch::new();
        let a = area("one two three\nfour", 24.0, Rect::new(0.0, 0.0, 10.0, 10.0));
        let out = layout(&FakeFont, &a, &mut scratch);
        assert_eq!(out.line_count, 2);
        assert_eq!(line_tops(&out).len(), 2);
    }

    #[test]
    fn blank_lines_are_kept() {
        let mut scratch = TextScratch::new();
        let out = layout(&FakeFont, &area("a\n\nb", 24.0, Rect::new(0.0, 0.0, 500.0, 500.0)), &mut scratch);
        assert_eq!(out.line_count, 3);
        assert_eq!(line_tops(&out), vec![2.0, 50.0]);
    }

    // ── alignment ──

    #[test]
    fn horizontal_alignment_anchors_lines() {
        let bounds = Rect::new(10.0, 0.0, 200.0, 100.0);
        let bearing = 1.0;
        for (align, expect_x) in [
            (HAlign::Left, 10.0),
            (HAlign::Right, 10.0 + 200.0 - 37.5),
            (HAlign::Center, 10.0 + (200.0 - 37.5) * 0.5),
        ] {
            let mut scratch = TextScratch::new();
            let a = area("ab", 24.0, bounds).aligned(align, VAlign::Top);
            let out = layout(&FakeFont, &a, &mut scratch);
            assert_relative_eq!(out.glyphs[0].rect.origin.x, expect_x + bearing);
        }
    }

    #[test]
    fn vertical_alignment_positions_block() {
        let bounds = Rect::new(0.0, 100.0, 200.0, 100.0);
        // Block of two 24px lines; 'a' sits ascent - bearing_y = 2 below the line top.
        for (align, block_top) in [(VAlign::Top, 100.0), (VAlign::Bottom, 152.0), (VAlign::Center, 126.0)] {
            let mut scratch = TextScratch::new();
            let a = area("a\na", 24.0, bounds).aligned(HAlign::Left, align);
            let out = layout(&FakeFont, &a, &mut scratch);
            assert_relative_eq!(out.glyphs[0].rect.origin.y, block_top + 2.0);
            assert_relative_eq!(out.glyphs[1].rect.origin.y, block_top + 26.0);
        }
    }

    #[test]
    fn descenders_hang_below_the_baseline() {
        let mut scratch = TextScratch::new();
        let out = layout(&FakeFont, &area("ap", 24.0, Rect::new(0.0, 0.0, 100.0, 100.0)), &mut scratch);
        let (a, p) = (out.glyphs[0].rect, out.glyphs[1].rect);
        let baseline = 19.0;
        assert_relative_eq!(a.origin.y + a.size.y, baseline);
        assert_relative_eq!(p.origin.y + p.size.y, baseline + 5.0);
        assert_relative_eq!(p.origin.y, a.origin.y + 5.0);
    }

    // ── justification ──

    #[test]
    fn justified_gaps_absorb_all_slack() {
        let mut scratch = TextScratch::new();
        let bounds = Rect::new(0.0, 0.0, 250.0, 500.0);
        let a = area("aa b cc dd ee ff gg", 24.0, bounds)
            .aligned(HAlign::Justified, VAlign::Top)
            .styled(TextStyle::WRAP);
        let out = layout(&FakeFont, &a, &mut scratch);
        assert_eq!(out.line_count, 2);
        let glyphs = out.glyphs.to_vec();

        let first = scratch.lines[0];
        let gaps = (first.word_count - 1) as f32;
        let slack = bounds.size.x - first.width;
        assert!(slack > 0.0);
        let added: f32 = (0..first.word_count - 1).map(|_| slack / gaps).sum();
        assert_relative_eq!(first.width + added, bounds.size.x, epsilon = 1e-3);

        // The first line's last glyph ends on the box edge.
        let on_first: Vec<_> = glyphs.iter().filter(|g| g.rect.origin.y < 24.0).collect();
        let last = on_first[on_first.len() - 1];
        assert_relative_eq!(last.rect.origin.x - 1.0 + 18.75, 250.0, epsilon = 1e-3);

        // The last line is left-aligned.
        let f = glyphs.iter().find(|g| g.ch == 'f').map(|g| g.rect.origin.x);
        assert_eq!(f, Some(1.0));
    }

    #[test]
    fn hard_break_and_single_word_lines_stay_left() {
        let mut scratch = TextScratch::new();
        let a = area("ab cd\nlonely\nx y", 24.0, Rect::new(0.0, 0.0, 300.0, 300.0))
            .aligned(HAlign::Justified, VAlign::Top)
            .styled(TextStyle::WRAP);
        let out = layout(&FakeFont, &a, &mut scratch);
        assert_eq!(out.line_count, 3);
        // 'c' follows "ab" and one space, unstretched.
        let c = out.glyphs.iter().find(|g| g.ch == 'c').map(|g| g.rect.origin.x);
        assert_eq!(c, Some(3.0 * 18.75 + 1.0));
    }

    // ── shrink to fit ──

    #[test]
    fn shrink_reduces_size_until_block_fits() {
        let mut scratch = TextScratch::new();
        let text = "the quick brown fox jumps over the lazy dog";
        let bounds = Rect::new(0.0, 0.0, 200.0, 60.0);
        let a = area(text, 24.0, bounds).styled(TextStyle::WRAP | TextStyle::SHRINK_TO_FIT);
        let out = layout(&FakeFont, &a, &mut scratch);

        assert!(out.pixel_size < 24.0);
        assert!(out.block_size.y <= bounds.size.y + 1e-3);
        assert_eq!(out.pixel_size.fract(), 0.0);

        // One pixel larger would not have fit.
        let mut probe = TextScratch::new();
        let bigger = area(text, out.pixel_size + 1.0, bounds).styled(TextStyle::WRAP);
        assert!(layout(&FakeFont, &bigger, &mut probe).block_size.y > bounds.size.y);
    }

    #[test]
    fn shrink_stops_at_minimum_size() {
        let mut scratch = TextScratch::new();
        let a = area("a\nb\nc\nd\ne\nf", 24.0, Rect::new(0.0, 0.0, 100.0, 10.0))
            .styled(TextStyle::SHRINK_TO_FIT);
        let out = layout(&FakeFont, &a, &mut scratch);
        assert_eq!(out.pixel_size, TextArea::DEFAULT_MIN_PIXEL_SIZE);
        assert!(out.block_size.y > 10.0);
    }

    #[test]
    fn shrink_without_wrap_also_fits_width() {
        let mut scratch = TextScratch::new();
        let a = area("abcdefghij", 24.0, Rect::new(0.0, 0.0, 100.0, 100.0)).styled(TextStyle::SHRINK_TO_FIT);
        let out = layout(&FakeFont, &a, &mut scratch);
        assert!(out.block_size.x <= 100.0 + 1e-3);
        assert_eq!(out.pixel_size, 12.0);
    }

    #[test]
    fn shrink_terminates_from_huge_sizes() {
        // 3e7 - 1.0 == 3e7 in f32, a plain 1px walk never moves.
        let mut scratch = TextScratch::new();
        let a = area("ab", 3.0e7, Rect::new(0.0, 0.0, 100.0, 20.0)).styled(TextStyle::SHRINK_TO_FIT);
        let out = layout(&FakeFont, &a, &mut scratch);
        assert_eq!(out.pixel_size, 20.0);
        assert_eq!(out.line_count, 1);
    }

    #[test]
    fn shrink_with_wrap_from_huge_size_finds_largest_fit() {
        // Three lines until "a b" fits on one row at 42px (3 × 32.8125 ≤ 100).
        let mut scratch = TextScratch::new();
        let a = area("a b c", 1.0e9, Rect::new(0.0, 0.0, 100.0, 100.0))
            .styled(TextStyle::WRAP | TextStyle::SHRINK_TO_FIT);
        let out = layout(&FakeFont, &a, &mut scratch);
        assert_eq!(out.pixel_size, 42.0);
        assert_eq!(out.line_count, 2);
    }

    // ── scratch ──

    #[test]
    fn layouts_append_until_reset() {
        let mut scratch = TextScratch::new();
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(layout(&FakeFont, &area("abc", 24.0, bounds), &mut scratch).glyphs.len(), 3);
        assert_eq!(layout(&FakeFont, &area("de", 24.0, bounds), &mut scratch).glyphs.len(), 2);
        assert_eq!(scratch.glyph_count(), 5);

        scratch.reset();
        assert_eq!(scratch.glyph_count(), 0);
    }

    #[test]
    fn missing_glyphs_are_invisible_and_do_not_advance() {
        let mut scratch = TextScratch::new();
        let out = layout(&FakeFont, &area("a\u{fffe}b", 24.0, Rect::new(0.0, 0.0, 100.0, 100.0)), &mut scratch);
        assert_eq!(out.glyphs.len(), 2);
        assert_relative_eq!(out.glyphs[1].rect.origin.x - out.glyphs[0].rect.origin.x, 18.75);
    }

    // ── end to end ──

    #[test]
    fn two_words_scenario() {
        let content = "If you have two words";
        let line_one = measure(&FakeFont, &Text::new("If you have two", FONT, 24.0));
        let space = measure(&FakeFont, &Text::new(" ", FONT, 24.0));
        assert_relative_eq!(line_one + space, 300.0);

        let mut scratch = TextScratch::new();
        let a = area(content, 24.0, Rect::new(0.0, 0.0, line_one + space, 150.0))
            .aligned(HAlign::Justified, VAlign::Top)
            .styled(TextStyle::WRAP);
        let out = layout(&FakeFont, &a, &mut scratch);

        assert_eq!(out.line_count, 2);
        assert_eq!(out.pixel_size, 24.0);
        assert_eq!(out.line_height, 24.0);

        // Line 1: "Ifyouhavetwo" is 12 glyphs, its three gaps grow by 6.25 each.
        let first: Vec<_> = out.glyphs[..12].iter().map(|g| g.ch).collect();
        assert_eq!(first.into_iter().collect::<String>(), "Ifyouhavetwo");
        let last = out.glyphs[11].rect;
        assert_relative_eq!(last.origin.x - 1.0 + 18.75, 300.0, epsilon = 1e-3);
        let y = out.glyphs[2].rect.origin.x - 1.0;
        assert_relative_eq!(y, 2.0 * 18.75 + 18.75 + 6.25, epsilon = 1e-3);

        // Line 2: "words" alone, left-aligned.
        let second: String = out.glyphs[12..].iter().map(|g| g.ch).collect();
        assert_eq!(second, "words");
        assert_relative_eq!(out.glyphs[12].rect.origin.x, 1.0);
        assert_relative_eq!(out.glyphs[12].rect.origin.y, 24.0 + 19.0 - 17.0);
    }
}
