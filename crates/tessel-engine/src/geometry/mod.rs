//! Geometry primitives shared by the renderer and the text layout engine.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Angles cross the public boundary in degrees; conversion to radians happens
//! inside [`Mat4::rotation_z`] and the tessellators.

mod mat4;
mod rect;
mod tessellate;
mod vec2;
mod vec3;
mod vec4;
mod viewport;

pub use mat4::Mat4;
pub use rect::Rect;
pub use tessellate::{
    circle_fan, circle_outline, clamp_segments, ring_outline, ring_strip, sector_fan,
    MAX_CIRCLE_SEGMENTS, MIN_CIRCLE_SEGMENTS,
};
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
pub use viewport::{Viewport, WindowDimensions};
