//! Color model shared by every draw call.
//!
//! Colors are linear, premultiplied alpha. Per-vertex gradients are plain
//! arrays of [`Color`], one entry per corner of the mesh.

pub mod color;

pub use color::Color;
