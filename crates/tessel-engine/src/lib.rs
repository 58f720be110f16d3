//! Tessel engine crate.
//!
//! Real-time 2D rendering and text layout on wgpu: procedural primitives,
//! sprites, multisampled scene targets and box-fitted text.

pub mod geometry;
pub mod paint;

pub mod gpu;
pub mod framebuffer;
pub mod render;
pub mod text;

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
