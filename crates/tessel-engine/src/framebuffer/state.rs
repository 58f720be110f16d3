use crate::gpu::RenderError;

/// Where the frame pipeline is in its clear, draw, resolve, present cycle.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FrameState {
    /// No frame in flight. Resizes and config changes are legal.
    #[default]
    Idle,
    /// `new_frame` ran; draws are being recorded.
    Recording,
    /// The scene was resolved; only presentation remains.
    Resolved,
}

impl FrameState {
    #[inline]
    pub fn require(self, expected: FrameState, op: &'static str) -> Result<(), RenderError> {
        if self == expected { Ok(()) } else { Err(RenderError::InvalidState(op)) }
    }

    /// Idle → Recording.
    pub fn begin(&mut self) -> Result<(), RenderError> {
        self.advance(FrameState::Idle, FrameState::Recording, "new_frame called while a frame is in flight")
    }

    /// Recording → Resolved.
    pub fn resolve(&mut self) -> Result<(), RenderError> {
        self.advance(FrameState::Recording, FrameState::Resolved, "render called without new_frame")
    }

    /// Resolved → Idle.
    pub fn finish(&mut self) -> Result<(), RenderError> {
        self.advance(FrameState::Resolved, FrameState::Idle, "present called before resolve")
    }

    fn advance(&mut self, from: FrameState, to: FrameState, op: &'static str) -> Result<(), RenderError> {
        self.require(from, op)?;
        *self = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_returns_to_idle() {
        let mut s = FrameState::default();
        s.begin().unwrap();
        assert_eq!(s, FrameState::Recording);
        s.resolve().unwrap();
        assert_eq!(s, FrameState::Resolved);
        s.finish().unwrap();
        assert_eq!(s, FrameState::Idle);
    }

    #[test]
    fn double_new_frame_is_rejected_without_state_change() {
        let mut s = FrameState::default();
        s.begin().unwrap();
        assert!(matches!(s.begin(), Err(RenderError::InvalidState(_))));
        assert_eq!(s, FrameState::Recording);
    }

    #[test]
    fn render_without_new_frame_is_rejected() {
        let mut s = FrameState::Idle;
        assert!(s.resolve().is_err());
        assert!(s.finish().is_err());
        assert_eq!(s, FrameState::Idle);
    }
}
