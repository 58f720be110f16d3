//! GPU resource management.
//!
//! Owns shader programs, pipelines, mesh templates, textures and the
//! per-draw uniform arena. Everything here is created at renderer
//! initialization and released at `Renderer::delete`.

mod error;
mod mesh;
mod pipelines;
mod texture;
mod uniforms;
mod vertex;

pub use error::RenderError;
pub use mesh::{IndexRange, MeshDesc, MeshStream, RenderObject};
pub use pipelines::{BindLayouts, BlitPipeline, Pipelines, ShaderFamily, ShaderLibrary, Topology};
pub use texture::{linear_sampler, Texture};
pub use uniforms::{DrawUniforms, FrameUniforms, UniformArena, DRAW_UNIFORM_SIZE};
pub use vertex::{PosUvVertex, PosVertex, VertexLayout};
