use super::Vec2;

/// Viewport size in logical pixels.
///
/// Renderers build their orthographic projection from this.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// Window size as reported by the platform layer for the current frame.
///
/// `logical` drives layout and projection, `physical` sizes render targets.
/// Their ratio converts logical clip rects into device scissor rects.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct WindowDimensions {
    pub logical: Viewport,
    pub physical: (u32, u32),
}

impl WindowDimensions {
    #[inline]
    pub const fn new(logical: Viewport, physical: (u32, u32)) -> Self {
        Self { logical, physical }
    }

    /// Dimensions for a window whose logical and physical sizes coincide.
    #[inline]
    pub fn unscaled(width: u32, height: u32) -> Self {
        Self::new(Viewport::new(width as f32, height as f32), (width, height))
    }

    /// Physical pixels per logical pixel on each axis.
    pub fn scale(self) -> Vec2 {
        if !self.logical.is_valid() {
            return Vec2::splat(1.0);
        }
        Vec2::new(
            self.physical.0 as f32 / self.logical.width,
            self.physical.1 as f32 / self.logical.height,
        )
    }
}
