use crate::geometry::{Rect, WindowDimensions};

/// Where the backend's scissor rectangle has its origin.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ClipOrigin {
    /// wgpu, Metal, D3D.
    #[default]
    TopLeft,
    /// GL-style; Y is flipped against the top-left logical layout.
    BottomLeft,
}

/// Scissor rectangle in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    #[inline]
    pub fn full(physical: (u32, u32)) -> Self {
        Self { x: 0, y: 0, width: physical.0.max(1), height: physical.1.max(1) }
    }
}

/// Converts a logical clip rect into a physical scissor rect.
///
/// Scales by the physical/logical ratio of `dims` and clamps to the physical
/// target. Returns `None` for a zero-area result, which means the draw is
/// fully clipped.
pub fn logical_clip_to_scissor(clip: Rect, dims: WindowDimensions, origin: ClipOrigin) -> Option<ScissorRect> {
    let scale = dims.scale();
    let (pw, ph) = (dims.physical.0 as f32, dims.physical.1 as f32);
    let r = clip.normalized();

    let x0 = (r.origin.x * scale.x).clamp(0.0, pw).floor();
    let y0 = (r.origin.y * scale.y).clamp(0.0, ph).floor();
    let x1 = ((r.origin.x + r.size.x) * scale.x).clamp(0.0, pw).ceil();
    let y1 = ((r.origin.y + r.size.y) * scale.y).clamp(0.0, ph).ceil();

    let width = (x1 - x0) as u32;
    let height = (y1 - y0) as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let y = match origin {
        ClipOrigin::TopLeft => y0 as u32,
        ClipOrigin::BottomLeft => (ph - y1) as u32,
    };
    Some(ScissorRect { x: x0 as u32, y, width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Viewport;

    fn hidpi() -> WindowDimensions {
        WindowDimensions::new(Viewport::new(400.0, 300.0), (800, 600))
    }

    #[test]
    fn scales_logical_to_physical() {
        let s = logical_clip_to_scissor(Rect::new(10.0, 20.0, 100.0, 50.0), hidpi(), ClipOrigin::TopLeft);
        assert_eq!(s, Some(ScissorRect { x: 20, y: 40, width: 200, height: 100 }));
    }

    #[test]
    fn bottom_left_origin_flips_y() {
        let s = logical_clip_to_scissor(Rect::new(10.0, 20.0, 100.0, 50.0), hidpi(), ClipOrigin::BottomLeft);
        // top edge at 40, bottom edge at 140 → 600 - 140 from the bottom
        assert_eq!(s, Some(ScissorRect { x: 20, y: 460, width: 200, height: 100 }));
    }

    #[test]
    fn clamps_to_target_and_drops_empty() {
        let dims = WindowDimensions::unscaled(100, 100);
        let s = logical_clip_to_scissor(Rect::new(-10.0, 90.0, 50.0, 50.0), dims, ClipOrigin::TopLeft);
        assert_eq!(s, Some(ScissorRect { x: 0, y: 90, width: 40, height: 10 }));

        assert_eq!(logical_clip_to_scissor(Rect::new(10.0, 10.0, 0.0, 5.0), dims, ClipOrigin::TopLeft), None);
        assert_eq!(logical_clip_to_scissor(Rect::new(200.0, 0.0, 5.0, 5.0), dims, ClipOrigin::TopLeft), None);
    }
}
