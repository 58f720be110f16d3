//! Off-screen scene targets and the frame state machine.

mod pipeline;
mod state;
mod target;

pub use pipeline::{effective_sample_count, AttachmentPlan, FramePipeline, SceneTarget};
pub use state::FrameState;
pub use target::Framebuffer;
