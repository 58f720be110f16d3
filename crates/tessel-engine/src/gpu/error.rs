use std::fmt;

/// Errors raised by GPU resource management and frame orchestration.
///
/// At initialization these abort setup. During a frame they are logged and
/// the offending draw is skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A WGSL module reported compilation errors.
    ShaderCompile { label: &'static str, message: String },
    /// A render target could not be created with the requested parameters.
    FramebufferIncomplete(String),
    /// Pixel data does not describe a valid texture.
    InvalidTexture(String),
    /// A single upload exceeded the mesh's per-draw bound.
    CapacityExceeded { what: &'static str, requested: usize, max: usize },
    /// An operation was issued in the wrong frame state.
    InvalidState(&'static str),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ShaderCompile { label, message } => {
                write!(f, "shader `{label}` failed to compile: {message}")
            }
            RenderError::FramebufferIncomplete(msg) => write!(f, "framebuffer incomplete: {msg}"),
            RenderError::InvalidTexture(msg) => write!(f, "invalid texture: {msg}"),
            RenderError::CapacityExceeded { what, requested, max } => {
                write!(f, "{what} capacity exceeded: requested {requested}, max {max}")
            }
            RenderError::InvalidState(msg) => write!(f, "invalid renderer state: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}
