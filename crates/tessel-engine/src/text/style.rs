use bitflags::bitflags;

use crate::geometry::{Rect, Vec2};
use crate::paint::Color;

use super::FontId;

/// A run of text drawn from `origin` (top-left of the first line).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Text<'a> {
    pub content: &'a str,
    pub font: FontId,
    pub pixel_size: f32,
    pub origin: Vec2,
    pub color: Color,
}

impl<'a> Text<'a> {
    pub fn new(content: &'a str, font: FontId, pixel_size: f32) -> Self {
        Self {
            content,
            font,
            pixel_size,
            origin: Vec2::zero(),
            color: Color::WHITE,
        }
    }

    pub fn at(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum HAlign {
    #[default]
    Left,
    Right,
    Center,
    /// Stretches inter-word gaps to the box width. The last line of a
    /// paragraph and single-word lines stay left-aligned.
    Justified,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum VAlign {
    #[default]
    Top,
    Bottom,
    Center,
}

bitflags! {
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct TextStyle: u32 {
        /// Break lines at word boundaries to fit the box width.
        const WRAP = 1 << 0;
        /// Reduce the pixel size until the block fits the box.
        const SHRINK_TO_FIT = 1 << 1;
    }
}

/// Text placed inside a bounding box. `text.origin` is ignored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextArea<'a> {
    pub text: Text<'a>,
    pub bounds: Rect,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub style: TextStyle,
    /// Floor for [`TextStyle::SHRINK_TO_FIT`].
    pub min_pixel_size: f32,
}

impl<'a> TextArea<'a> {
    pub const DEFAULT_MIN_PIXEL_SIZE: f32 = 6.0;

    pub fn new(text: Text<'a>, bounds: Rect) -> Self {
        Self {
            text,
            bounds,
            h_align: HAlign::default(),
            v_align: VAlign::default(),
            style: TextStyle::empty(),
            min_pixel_size: Self::DEFAULT_MIN_PIXEL_SIZE,
        }
    }

    pub fn aligned(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn styled(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Unbounded, unwrapped, top-left area at `text.origin`.
    pub(crate) fn unbounded(text: Text<'a>) -> Self {
        let bounds = Rect::from_min_size(text.origin, Vec2::splat(f32::INFINITY));
        Self::new(text, bounds)
    }
}
