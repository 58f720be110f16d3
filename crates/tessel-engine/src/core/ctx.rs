use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::geometry::{Viewport, WindowDimensions};
use crate::render::{RenderCtx, RenderTarget, Renderer};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size in logical pixels.
    pub fn logical_size(&self) -> Viewport {
        let logical: winit::dpi::LogicalSize<f64> = self.window.inner_size().to_logical(self.window.scale_factor());
        Viewport::new(logical.width as f32, logical.height as f32)
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Logical and physical window size for `Renderer::new_frame`.
    pub fn dimensions(&self) -> WindowDimensions {
        let physical = self.gpu.size();
        WindowDimensions::new(self.window.logical_size(), (physical.width, physical.height))
    }

    /// Device context for creating a [`Renderer`] and uploading textures.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.dimensions(),
            self.gpu.max_sample_count(),
        )
    }

    /// Acquires the surface, lets `renderer` resolve and blit the recorded
    /// frame into it, then presents.
    ///
    /// When no surface texture is available the recorded frame is dropped and
    /// the renderer returns to idle.
    pub fn present(&mut self, renderer: &mut Renderer) -> AppControl {
        let (w, h) = self.dimensions().physical;
        if w == 0 || h == 0 {
            renderer.abandon_frame();
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                renderer.abandon_frame();
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface out of memory; exiting");
                        AppControl::Exit
                    }
                    _ => AppControl::Continue,
                };
            }
        };

        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            renderer.render(&mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
