//! Primitive draw engine.
//!
//! [`Renderer`] records draw calls between `new_frame` and `render`, then
//! encodes them into one scene pass and presents through the framebuffer
//! pipeline.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Every mesh lives in the unit square; the model matrix places it.
//! - The projection is bound once per frame.

mod clip;
mod config;
mod ctx;
mod draw_list;
mod primitive;
mod renderer;
mod shapes;
mod text;
mod transform;

pub use clip::{logical_clip_to_scissor, ClipOrigin, ScissorRect};
pub use config::RendererConfig;
pub use ctx::{RenderCtx, RenderTarget};
pub use draw_list::{DrawList, DrawOp};
pub use primitive::{Primitive, MAX_DYNAMIC_INDICES, MAX_DYNAMIC_VERTICES};
pub use renderer::Renderer;
pub use transform::{circle_bounds, model_matrix, projection, unit_circle_to_mesh};
