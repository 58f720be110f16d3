use crate::gpu::{BindLayouts, BlitPipeline, RenderError, ShaderLibrary};
use crate::paint::Color;

use super::{FrameState, Framebuffer};

/// Sample count actually used for a requested MSAA level.
///
/// `0` and `1` disable multisampling. Otherwise the request is clamped to the
/// largest power of two not above the device maximum.
pub fn effective_sample_count(requested: u32, device_max: u32) -> u32 {
    let cap = requested.min(device_max.max(1));
    if cap <= 1 {
        return 1;
    }
    1 << (31 - cap.leading_zeros())
}

/// One of the two off-screen targets a frame touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTarget {
    Multisample,
    Intermediate,
}

/// Which targets the scene pass writes and the present pass reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentPlan {
    pub color: SceneTarget,
    pub resolve: Option<SceneTarget>,
    /// Whether the color attachment is stored after the scene pass.
    pub store_color: bool,
    pub blit_source: SceneTarget,
}

impl AttachmentPlan {
    pub fn for_samples(sample_count: u32) -> Self {
        if sample_count > 1 {
            // Samples are not needed once resolved.
            Self {
                color: SceneTarget::Multisample,
                resolve: Some(SceneTarget::Intermediate),
                store_color: false,
                blit_source: SceneTarget::Intermediate,
            }
        } else {
            Self {
                color: SceneTarget::Intermediate,
                resolve: None,
                store_color: true,
                blit_source: SceneTarget::Intermediate,
            }
        }
    }

    /// Target holding the finished single-sample image after the scene pass.
    pub fn scene_output(&self) -> SceneTarget {
        self.resolve.unwrap_or(self.color)
    }
}

/// Owns the scene targets and drives clear, draw, resolve and present.
///
/// With MSAA the scene pass renders into the multisample target and resolves
/// into the intermediate target. Without it the scene renders into the
/// intermediate directly. Either way the intermediate is what gets blitted to
/// the surface, so both paths present through identical final passes.
pub struct FramePipeline {
    format: wgpu::TextureFormat,
    size: (u32, u32),
    device_max_samples: u32,
    sample_count: u32,

    multisample: Option<Framebuffer>,
    intermediate: Framebuffer,

    plan: AttachmentPlan,
    blit: BlitPipeline,
    blit_source: wgpu::BindGroup,
    sampler: wgpu::Sampler,

    state: FrameState,
}

impl FramePipeline {
    pub fn new(
        device: &wgpu::Device,
        shaders: &ShaderLibrary,
        layouts: &BindLayouts,
        format: wgpu::TextureFormat,
        size: (u32, u32),
        requested_samples: u32,
        device_max_samples: u32,
    ) -> Result<Self, RenderError> {
        let sample_count = effective_sample_count(requested_samples, device_max_samples);
        if sample_count != requested_samples.max(1) {
            log::info!("msaa: requested {requested_samples}x, using {sample_count}x");
        }

        let size = (size.0.max(1), size.1.max(1));
        let plan = AttachmentPlan::for_samples(sample_count);
        let (multisample, intermediate) = create_targets(device, format, size, sample_count, plan)?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tessel blit sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let source = pick(plan.blit_source, &multisample, &intermediate);
        let blit_source = bind_source(device, layouts, source, &sampler);
        let blit = BlitPipeline::new(device, shaders, layouts, format);

        Ok(Self {
            format,
            size,
            device_max_samples,
            sample_count,
            multisample,
            intermediate,
            plan,
            blit,
            blit_source,
            sampler,
            state: FrameState::Idle,
        })
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[inline]
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Reallocates both targets. Legal only while Idle.
    pub fn resize(&mut self, device: &wgpu::Device, layouts: &BindLayouts, size: (u32, u32)) -> Result<(), RenderError> {
        self.state.require(FrameState::Idle, "resize during a frame")?;
        let size = (size.0.max(1), size.1.max(1));
        if size == self.size {
            return Ok(());
        }
        self.rebuild(device, layouts, size, self.sample_count)
    }

    /// Changes the MSAA level. Legal only while Idle.
    pub fn set_sample_count(
        &mut self,
        device: &wgpu::Device,
        layouts: &BindLayouts,
        requested: u32,
    ) -> Result<(), RenderError> {
        self.state.require(FrameState::Idle, "sample count change during a frame")?;
        let sample_count = effective_sample_count(requested, self.device_max_samples);
        if sample_count == self.sample_count {
            return Ok(());
        }
        log::info!("msaa: {}x -> {sample_count}x", self.sample_count);
        self.rebuild(device, layouts, self.size, sample_count)
    }

    fn rebuild(
        &mut self,
        device: &wgpu::Device,
        layouts: &BindLayouts,
        size: (u32, u32),
        sample_count: u32,
    ) -> Result<(), RenderError> {
        let plan = AttachmentPlan::for_samples(sample_count);
        let (multisample, intermediate) = create_targets(device, self.format, size, sample_count, plan)?;
        let source = pick(plan.blit_source, &multisample, &intermediate);
        let blit_source = bind_source(device, layouts, source, &self.sampler);

        if let Some(old) = std::mem::replace(&mut self.multisample, multisample) {
            old.destroy();
        }
        std::mem::replace(&mut self.intermediate, intermediate).destroy();

        self.plan = plan;
        self.blit_source = blit_source;
        self.size = size;
        self.sample_count = sample_count;
        Ok(())
    }

    /// Idle → Recording.
    pub fn begin(&mut self) -> Result<(), RenderError> {
        self.state.begin()
    }

    /// Opens the scene pass: clears and binds the multisample target (with the
    /// intermediate as resolve destination) or the intermediate alone.
    pub fn scene_pass<'e>(&self, encoder: &'e mut wgpu::CommandEncoder, clear: Color) -> wgpu::RenderPass<'e> {
        let view = self.target(self.plan.color).view();
        let resolve_target = self.plan.resolve.map(|t| self.target(t).view());

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessel scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                    store: if self.plan.store_color { wgpu::StoreOp::Store } else { wgpu::StoreOp::Discard },
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }

    fn target(&self, which: SceneTarget) -> &Framebuffer {
        pick(which, &self.multisample, &self.intermediate)
    }

    /// Recording → Resolved. The resolve itself is performed by the scene pass
    /// ending; this only advances the state.
    pub fn resolve(&mut self) -> Result<(), RenderError> {
        self.state.resolve()
    }

    /// Resolved → Idle: draws the intermediate full-screen into `surface`.
    pub fn present(&mut self, encoder: &mut wgpu::CommandEncoder, surface: &wgpu::TextureView) -> Result<(), RenderError> {
        self.state.require(FrameState::Resolved, "present called before resolve")?;
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tessel present pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            self.blit.draw(&mut pass, &self.blit_source);
        }
        self.state.finish()
    }

    /// Drops a half-finished frame, returning to Idle.
    pub fn abandon(&mut self) {
        self.state = FrameState::Idle;
    }

    pub fn destroy(self) {
        if let Some(ms) = self.multisample {
            ms.destroy();
        }
        self.intermediate.destroy();
    }
}

fn create_targets(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    size: (u32, u32),
    sample_count: u32,
    plan: AttachmentPlan,
) -> Result<(Option<Framebuffer>, Framebuffer), RenderError> {
    let intermediate = Framebuffer::new(device, "tessel intermediate target", size, format, 1)?;
    let multisample = if plan.color == SceneTarget::Multisample {
        Some(Framebuffer::new(device, "tessel multisample target", size, format, sample_count)?)
    } else {
        None
    };
    Ok((multisample, intermediate))
}

fn pick<'a>(
    which: SceneTarget,
    multisample: &'a Option<Framebuffer>,
    intermediate: &'a Framebuffer,
) -> &'a Framebuffer {
    match (which, multisample) {
        (SceneTarget::Multisample, Some(ms)) => ms,
        _ => intermediate,
    }
}

fn bind_source(
    device: &wgpu::Device,
    layouts: &BindLayouts,
    source: &Framebuffer,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("tessel blit source"),
        layout: &layouts.texture,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(source.view()),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_one_disable_msaa() {
        assert_eq!(effective_sample_count(0, 8), 1);
        assert_eq!(effective_sample_count(1, 8), 1);
    }

    #[test]
    fn request_is_clamped_to_device_max() {
        assert_eq!(effective_sample_count(4, 8), 4);
        assert_eq!(effective_sample_count(16, 4), 4);
        assert_eq!(effective_sample_count(8, 1), 1);
        assert_eq!(effective_sample_count(4, 0), 1);
    }

    #[test]
    fn non_power_of_two_rounds_down() {
        assert_eq!(effective_sample_count(6, 8), 4);
        assert_eq!(effective_sample_count(3, 8), 2);
    }

    // ── attachments ──

    #[test]
    fn multisampled_scene_resolves_into_intermediate() {
        let plan = AttachmentPlan::for_samples(4);
        assert_eq!(plan.color, SceneTarget::Multisample);
        assert_eq!(plan.resolve, Some(SceneTarget::Intermediate));
        assert!(!plan.store_color);
    }

    #[test]
    fn single_sample_scene_draws_into_intermediate() {
        let plan = AttachmentPlan::for_samples(1);
        assert_eq!(plan.color, SceneTarget::Intermediate);
        assert_eq!(plan.resolve, None);
        assert!(plan.store_color);
    }

    #[test]
    fn msaa_off_and_on_present_the_same_target() {
        let off = AttachmentPlan::for_samples(effective_sample_count(0, 8));
        let on = AttachmentPlan::for_samples(effective_sample_count(4, 8));
        assert_eq!(off.scene_output(), SceneTarget::Intermediate);
        assert_eq!(on.scene_output(), SceneTarget::Intermediate);
        assert_eq!(off.blit_source, on.blit_source);
        assert_eq!(on.blit_source, on.scene_output());
    }
}
