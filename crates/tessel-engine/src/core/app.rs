use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`crate::window::Runtime`].
///
/// A typical `on_frame`: `renderer.new_frame(ctx.dimensions())`, a run of
/// `draw_*` calls, then `ctx.present(&mut renderer)`.
pub trait App {
    /// Raw platform events. Key and pointer decoding is left to the app.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before the event loop shuts down. Release GPU resources
    /// here.
    fn on_exit(&mut self) {}
}
