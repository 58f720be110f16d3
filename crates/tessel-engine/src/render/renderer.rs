use anyhow::{Context, Result};

use crate::framebuffer::{FramePipeline, FrameState};
use crate::geometry::{Vec2, WindowDimensions};
use crate::gpu::{
    linear_sampler, BindLayouts, DrawUniforms, FrameUniforms, Pipelines, PosVertex, RenderError, RenderObject,
    ShaderLibrary, UniformArena, DRAW_UNIFORM_SIZE,
};
use crate::text::{GlyphCache, GlyphKey, GlyphSource, GlyphUpload, TextScratch};

use super::clip::{logical_clip_to_scissor, ClipOrigin, ScissorRect};
use super::transform::projection;
use super::{DrawList, DrawOp, Primitive, RenderCtx, RenderTarget, RendererConfig};

/// wgpu scissor rects are top-left based.
const SCISSOR_ORIGIN: ClipOrigin = ClipOrigin::TopLeft;

/// Explicitly owned 2D renderer.
///
/// Per frame: [`Renderer::new_frame`], any number of `draw_*` calls, then
/// [`Renderer::render`]. Calls out of that order are caller errors: they
/// panic in debug builds and are ignored in release builds.
pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,

    config: RendererConfig,
    dims: WindowDimensions,
    wireframe_supported: bool,

    layouts: BindLayouts,
    shaders: ShaderLibrary,
    pipelines: Pipelines,
    frame: FramePipeline,

    meshes: Vec<RenderObject>,
    uniforms: UniformArena,
    frame_uniforms: wgpu::Buffer,
    frame_bind: wgpu::BindGroup,
    draw_bind: wgpu::BindGroup,
    draw_bind_generation: u64,
    pub(super) sampler: wgpu::Sampler,
    glyphs: GlyphCache,

    list: DrawList,
    pub(super) tess: Tessellation,
    pub(super) text_scratch: TextScratch,
    warned: Warnings,
}

/// Reusable buffers for circle-family tessellation.
#[derive(Debug, Default)]
pub(super) struct Tessellation {
    pub points: Vec<Vec2>,
    pub indices: Vec<u16>,
    pub vertices: Vec<PosVertex>,
}

/// One-time warning latches.
#[derive(Debug, Default)]
struct Warnings {
    wireframe: bool,
    capacity: bool,
}

impl Renderer {
    /// Compiles shaders, builds pipelines and mesh templates and allocates
    /// the scene framebuffers. Any failure aborts setup.
    pub fn new(ctx: &RenderCtx<'_>, config: RendererConfig) -> Result<Self> {
        let config = config.sanitized();
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();

        let layouts = BindLayouts::new(&device);
        let shaders = ShaderLibrary::load(&device).context("failed to compile renderer shaders")?;
        let wireframe_supported = ctx.features.contains(wgpu::Features::POLYGON_MODE_LINE);

        let frame = FramePipeline::new(
            &device,
            &shaders,
            &layouts,
            ctx.surface_format,
            ctx.dimensions.physical,
            config.msaa_samples,
            ctx.max_sample_count,
        )
        .context("failed to create scene framebuffers")?;

        let pipelines = Pipelines::new(
            &device,
            &shaders,
            &layouts,
            frame.format(),
            frame.sample_count(),
            wireframe_supported,
        );

        let meshes = Primitive::MESHES
            .iter()
            .map(|p| RenderObject::create(&device, &p.mesh_desc()))
            .collect();

        let uniforms = UniformArena::new(&device);
        let frame_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessel frame uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessel frame bind group"),
            layout: &layouts.frame,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniforms.as_entire_binding(),
            }],
        });
        let draw_bind = bind_draw_uniforms(&device, &layouts, &uniforms);
        let draw_bind_generation = uniforms.generation();

        log::info!(
            "renderer ready: {}x{} physical, {}x msaa, wireframe {}",
            frame.size().0,
            frame.size().1,
            frame.sample_count(),
            if wireframe_supported { "available" } else { "unavailable" },
        );

        let mut renderer = Self {
            sampler: linear_sampler(&device),
            device,
            queue,
            config,
            dims: ctx.dimensions,
            wireframe_supported,
            layouts,
            shaders,
            pipelines,
            frame,
            meshes,
            uniforms,
            frame_uniforms,
            frame_bind,
            draw_bind,
            draw_bind_generation,
            glyphs: GlyphCache::new(),
            list: DrawList::new(),
            tess: Tessellation::default(),
            text_scratch: TextScratch::new(),
            warned: Warnings::default(),
        };
        renderer.warn_unsupported_wireframe();
        Ok(renderer)
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.frame.state()
    }

    /// MSAA sample count in effect (1 when disabled).
    #[inline]
    pub fn sample_count(&self) -> u32 {
        self.frame.sample_count()
    }

    #[inline]
    pub fn dimensions(&self) -> WindowDimensions {
        self.dims
    }

    /// Draws recorded so far in the current frame.
    #[inline]
    pub fn draw_count(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Replaces the configuration. Legal only between frames; segment and
    /// MSAA changes apply at the next [`Renderer::new_frame`].
    pub fn set_config(&mut self, config: RendererConfig) {
        if !contract(self.frame.state().require(FrameState::Idle, "set_config during a frame")) {
            return;
        }
        self.config = config.sanitized();
        self.warn_unsupported_wireframe();
    }

    /// Idle → Recording: applies pending resize/MSAA changes, uploads the
    /// projection and clears last frame's draws.
    pub fn new_frame(&mut self, dims: WindowDimensions) {
        if !contract(self.frame.state().require(FrameState::Idle, "new_frame called while a frame is in flight")) {
            return;
        }

        self.dims = dims;
        if let Err(e) = self.sync_targets() {
            log::error!("keeping previous render targets: {e}");
        }

        let uniforms = FrameUniforms::new(projection(dims.logical));
        self.queue.write_buffer(&self.frame_uniforms, 0, bytemuck::bytes_of(&uniforms));

        for mesh in &mut self.meshes {
            mesh.reset();
        }
        self.uniforms.clear();
        self.list.clear();
        self.text_scratch.reset();
        self.glyphs.next_frame();

        contract(self.frame.begin());
    }

    fn sync_targets(&mut self) -> Result<(), RenderError> {
        self.frame.resize(&self.device, &self.layouts, self.dims.physical)?;
        self.frame.set_sample_count(&self.device, &self.layouts, self.config.msaa_samples)?;

        if !self.pipelines.matches(self.frame.format(), self.frame.sample_count()) {
            self.pipelines = Pipelines::new(
                &self.device,
                &self.shaders,
                &self.layouts,
                self.frame.format(),
                self.frame.sample_count(),
                self.wireframe_supported,
            );
        }
        Ok(())
    }

    /// Recording → Resolved → Idle: encodes every recorded draw into the
    /// scene pass, resolves it and blits the result to `target`.
    pub fn render(&mut self, target: &mut RenderTarget<'_>) {
        if !contract(self.frame.state().require(FrameState::Recording, "render called without new_frame")) {
            return;
        }

        for mesh in &mut self.meshes {
            mesh.flush(&self.device, &self.queue);
        }
        self.uniforms.flush(&self.device, &self.queue);
        if self.uniforms.generation() != self.draw_bind_generation {
            self.draw_bind = bind_draw_uniforms(&self.device, &self.layouts, &self.uniforms);
            self.draw_bind_generation = self.uniforms.generation();
        }

        // Wireframe only ever applies to the scene pass.
        let wireframe = self.config.wireframe && self.pipelines.supports_wireframe();
        {
            let mut pass = self.frame.scene_pass(target.encoder, self.config.clear_color);
            pass.set_bind_group(0, &self.frame_bind, &[]);

            let mut bound = None;
            for op in self.list.ops() {
                let key = (op.primitive.shader(), op.primitive.topology());
                if bound != Some(key) {
                    pass.set_pipeline(self.pipelines.select(key.0, key.1, wireframe));
                    bound = Some(key);
                }
                pass.set_bind_group(1, &self.draw_bind, &[op.uniform_offset]);
                if let Some(texture) = &op.texture {
                    pass.set_bind_group(2, texture, &[]);
                }
                let s = op.scissor;
                pass.set_scissor_rect(s.x, s.y, s.width, s.height);
                self.meshes[op.primitive.index()].draw(&mut pass, op.range);
            }
        }

        if contract(self.frame.resolve()) {
            contract(self.frame.present(target.encoder, target.color_view));
        }
    }

    /// Drops a frame that cannot be presented (e.g. the surface was lost).
    pub fn abandon_frame(&mut self) {
        if self.frame.state() != FrameState::Idle {
            log::debug!("abandoning frame with {} draws", self.list.len());
            self.frame.abandon();
            self.list.clear();
        }
    }

    /// Releases every GPU resource the renderer owns. Caller-owned sprite
    /// textures are not touched.
    pub fn delete(mut self) {
        self.glyphs.clear();
        for mesh in self.meshes.drain(..) {
            mesh.destroy();
        }
        self.uniforms.destroy();
        self.frame_uniforms.destroy();
        self.frame.destroy();
        log::debug!("renderer deleted");
    }

    // ── recording ──

    /// Whether draws may be recorded now. Reports the contract violation
    /// otherwise.
    pub(super) fn recording(&self) -> bool {
        contract(self.frame.state().require(FrameState::Recording, "draw outside new_frame/render"))
    }

    #[inline]
    pub(super) fn circle_segments(&self) -> usize {
        self.config.circle_segments
    }

    #[inline]
    pub(super) fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layouts.texture
    }

    /// Cached texture bind group for a glyph, rasterized on first use.
    pub(super) fn glyph_bind(&mut self, source: &impl GlyphSource, key: GlyphKey) -> Option<wgpu::BindGroup> {
        let upload = GlyphUpload {
            device: &self.device,
            queue: &self.queue,
            layout: &self.layouts.texture,
            sampler: &self.sampler,
        };
        self.glyphs.get_or_rasterize(&upload, source, key).cloned()
    }

    /// Appends a draw. Dynamic kinds upload `self.tess.vertices/indices`.
    pub(super) fn record(&mut self, primitive: Primitive, uniforms: DrawUniforms, texture: Option<wgpu::BindGroup>) {
        if primitive.shader().is_textured() != texture.is_some() {
            log::warn!("{}: texture binding does not match the shader, draw skipped", primitive.label());
            return;
        }
        let Some(scissor) = self.current_scissor() else { return };

        let mesh = &mut self.meshes[primitive.index()];
        let range = if primitive.is_dynamic() {
            match mesh.upload(&self.tess.vertices, &self.tess.indices) {
                Ok(range) => range,
                Err(e) => {
                    if !self.warned.capacity {
                        log::warn!("{}: draw skipped: {e}", primitive.label());
                        self.warned.capacity = true;
                    }
                    return;
                }
            }
        } else {
            mesh.static_range()
        };
        if range.is_empty() {
            return;
        }

        let uniform_offset = self.uniforms.push(&uniforms);
        self.list.push(DrawOp { primitive, range, uniform_offset, texture, scissor });
    }

    fn current_scissor(&self) -> Option<ScissorRect> {
        let target = WindowDimensions::new(self.dims.logical, self.frame.size());
        match self.list.current_clip() {
            None => Some(ScissorRect::full(self.frame.size())),
            Some(clip) => logical_clip_to_scissor(clip, target, SCISSOR_ORIGIN),
        }
    }

    /// Clips subsequent draws to `rect` (logical pixels), intersected with
    /// any enclosing clip.
    pub fn push_clip(&mut self, rect: crate::geometry::Rect) {
        self.list.push_clip(rect);
    }

    pub fn pop_clip(&mut self) {
        self.list.pop_clip();
    }

    fn warn_unsupported_wireframe(&mut self) {
        if self.config.wireframe && !self.wireframe_supported && !self.warned.wireframe {
            log::warn!("wireframe requested but the device lacks POLYGON_MODE_LINE; ignoring");
            self.warned.wireframe = true;
        }
    }
}

fn bind_draw_uniforms(device: &wgpu::Device, layouts: &BindLayouts, uniforms: &UniformArena) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("tessel draw bind group"),
        layout: &layouts.draw,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: uniforms.buffer(),
                offset: 0,
                size: wgpu::BufferSize::new(DRAW_UNIFORM_SIZE),
            }),
        }],
    })
}

/// Checks a frame-order contract: panics in debug builds, logs and reports
/// `false` in release builds.
fn contract(result: Result<(), RenderError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            if cfg!(debug_assertions) {
                panic!("{e}");
            }
            log::error!("{e}");
            false
        }
    }
}
