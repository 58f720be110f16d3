use crate::geometry::Rect;
use crate::gpu::IndexRange;

use super::{Primitive, ScissorRect};

/// One recorded draw, replayed in the scene pass.
#[derive(Debug, Clone)]
pub struct DrawOp {
    pub primitive: Primitive,
    pub range: IndexRange,
    /// Dynamic offset into the per-draw uniform arena.
    pub uniform_offset: u32,
    pub texture: Option<wgpu::BindGroup>,
    pub scissor: ScissorRect,
}

/// Draws recorded for the current frame, in paint order.
///
/// `clear()` keeps allocated capacity, so steady-state frames do not allocate.
#[derive(Debug, Default)]
pub struct DrawList {
    ops: Vec<DrawOp>,

    /// Active clip rects (logical pixels). The top is already intersected
    /// with every parent.
    clip_stack: Vec<Rect>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded draws and the clip stack.
    #[inline]
    pub fn clear(&mut self) {
        self.ops.clear();
        self.clip_stack.clear();
    }

    #[inline]
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    #[inline]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Effective clip for the next draw, `None` when unclipped.
    #[inline]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Begins a clip region, intersected with the enclosing one. Disjoint
    /// clips produce a zero-area rect so the enclosed draws are skipped.
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect.normalized(),
            Some(&parent) => parent.intersect(rect).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        };
        self.clip_stack.push(effective);
    }

    /// Ends the most recent clip region.
    ///
    /// # Panics
    /// Panics (debug only) if called without a matching `push_clip`.
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_clips_intersect() {
        let mut list = DrawList::new();
        assert_eq!(list.current_clip(), None);

        list.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        list.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(list.current_clip(), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        list.pop_clip();
        assert_eq!(list.current_clip(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn disjoint_clip_is_empty() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        list.push_clip(Rect::new(20.0, 20.0, 10.0, 10.0));
        assert!(list.current_clip().is_some_and(|r| r.is_empty()));
    }

    #[test]
    fn clear_drops_clips() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        list.clear();
        assert_eq!(list.current_clip(), None);
        assert!(list.is_empty());
    }
}
