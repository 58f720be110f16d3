use super::uniforms::{DRAW_UNIFORM_SIZE, FrameUniforms};
use super::{RenderError, VertexLayout};

/// Shader program a mesh is drawn with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderFamily {
    /// Untextured fill or outline.
    Shape,
    /// Straight-alpha RGBA texture, tinted.
    Sprite,
    /// R8 coverage texture, colored.
    Glyph,
}

impl ShaderFamily {
    pub fn vertex_layout(self) -> VertexLayout {
        match self {
            ShaderFamily::Shape => VertexLayout::Position,
            ShaderFamily::Sprite | ShaderFamily::Glyph => VertexLayout::PositionUv,
        }
    }

    #[inline]
    pub fn is_textured(self) -> bool {
        !matches!(self, ShaderFamily::Shape)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    Triangles,
    Lines,
}

// ── blend ─────────────────────────────────────────────────────────────────

pub(crate) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── bind group layouts ────────────────────────────────────────────────────

/// Group 0 frame uniforms, group 1 per-draw uniforms, group 2 texture.
pub struct BindLayouts {
    pub frame: wgpu::BindGroupLayout,
    pub draw: wgpu::BindGroupLayout,
    pub texture: wgpu::BindGroupLayout,
}

impl BindLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_entry = |dynamic: bool, size: u64| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: wgpu::BufferSize::new(size),
            },
            count: None,
        };

        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessel frame bgl"),
            entries: &[uniform_entry(false, std::mem::size_of::<FrameUniforms>() as u64)],
        });
        let draw = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessel draw bgl"),
            entries: &[uniform_entry(true, DRAW_UNIFORM_SIZE)],
        });
        let texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessel texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self { frame, draw, texture }
    }
}

// ── shader modules ────────────────────────────────────────────────────────

pub struct ShaderLibrary {
    shape: wgpu::ShaderModule,
    textured: wgpu::ShaderModule,
    blit: wgpu::ShaderModule,
}

impl ShaderLibrary {
    pub fn load(device: &wgpu::Device) -> Result<Self, RenderError> {
        Ok(Self {
            shape: compile(device, "shape", include_str!("shaders/shape.wgsl"))?,
            textured: compile(device, "textured", include_str!("shaders/textured.wgsl"))?,
            blit: compile(device, "blit", include_str!("shaders/blit.wgsl"))?,
        })
    }
}

fn compile(device: &wgpu::Device, label: &'static str, source: &str) -> Result<wgpu::ShaderModule, RenderError> {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let info = pollster::block_on(module.get_compilation_info());
    let errors: Vec<String> = info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
        .map(|m| m.message.clone())
        .collect();

    if !errors.is_empty() {
        return Err(RenderError::ShaderCompile { label, message: errors.join("\n") });
    }
    for message in &info.messages {
        log::debug!("shader `{label}`: {}", message.message);
    }
    Ok(module)
}

// ── scene pipelines ───────────────────────────────────────────────────────

/// Every scene pipeline for one (target format, sample count) pair.
///
/// Wireframe variants exist only for triangle pipelines and only when the
/// device supports `POLYGON_MODE_LINE`.
pub struct Pipelines {
    format: wgpu::TextureFormat,
    sample_count: u32,

    shape_fill: wgpu::RenderPipeline,
    shape_lines: wgpu::RenderPipeline,
    sprite: wgpu::RenderPipeline,
    glyph: wgpu::RenderPipeline,

    wireframe: Option<WireframeSet>,
}

struct WireframeSet {
    shape: wgpu::RenderPipeline,
    sprite: wgpu::RenderPipeline,
    glyph: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        shaders: &ShaderLibrary,
        layouts: &BindLayouts,
        format: wgpu::TextureFormat,
        sample_count: u32,
        wireframe_supported: bool,
    ) -> Self {
        let untextured = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessel shape pipeline layout"),
            bind_group_layouts: &[&layouts.frame, &layouts.draw],
            immediate_size: 0,
        });
        let textured = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessel textured pipeline layout"),
            bind_group_layouts: &[&layouts.frame, &layouts.draw, &layouts.texture],
            immediate_size: 0,
        });

        let build = |label: &'static str,
                     layout: &wgpu::PipelineLayout,
                     module: &wgpu::ShaderModule,
                     fs: &'static str,
                     vertex: VertexLayout,
                     topology: wgpu::PrimitiveTopology,
                     polygon_mode: wgpu::PolygonMode| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[vertex.buffer_layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some(fs),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(premul_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview_mask: None,
                cache: None,
            })
        };

        use wgpu::PolygonMode::{Fill, Line};
        use wgpu::PrimitiveTopology::{LineList, TriangleList};
        let pos = VertexLayout::Position;
        let pos_uv = VertexLayout::PositionUv;

        let wireframe = wireframe_supported.then(|| WireframeSet {
            shape: build("tessel shape wire", &untextured, &shaders.shape, "fs_main", pos, TriangleList, Line),
            sprite: build("tessel sprite wire", &textured, &shaders.textured, "fs_sprite", pos_uv, TriangleList, Line),
            glyph: build("tessel glyph wire", &textured, &shaders.textured, "fs_glyph", pos_uv, TriangleList, Line),
        });

        Self {
            format,
            sample_count,
            shape_fill: build("tessel shape fill", &untextured, &shaders.shape, "fs_main", pos, TriangleList, Fill),
            shape_lines: build("tessel shape lines", &untextured, &shaders.shape, "fs_main", pos, LineList, Fill),
            sprite: build("tessel sprite", &textured, &shaders.textured, "fs_sprite", pos_uv, TriangleList, Fill),
            glyph: build("tessel glyph", &textured, &shaders.textured, "fs_glyph", pos_uv, TriangleList, Fill),
            wireframe,
        }
    }

    #[inline]
    pub fn matches(&self, format: wgpu::TextureFormat, sample_count: u32) -> bool {
        self.format == format && self.sample_count == sample_count
    }

    #[inline]
    pub fn supports_wireframe(&self) -> bool {
        self.wireframe.is_some()
    }

    /// Picks the pipeline for a draw. Line topologies ignore `wireframe`.
    pub fn select(&self, family: ShaderFamily, topology: Topology, wireframe: bool) -> &wgpu::RenderPipeline {
        let wire = if wireframe { self.wireframe.as_ref() } else { None };
        match (family, topology, wire) {
            (ShaderFamily::Shape, Topology::Lines, _) => &self.shape_lines,
            (ShaderFamily::Shape, Topology::Triangles, Some(w)) => &w.shape,
            (ShaderFamily::Shape, Topology::Triangles, None) => &self.shape_fill,
            (ShaderFamily::Sprite, _, Some(w)) => &w.sprite,
            (ShaderFamily::Sprite, _, None) => &self.sprite,
            (ShaderFamily::Glyph, _, Some(w)) => &w.glyph,
            (ShaderFamily::Glyph, _, None) => &self.glyph,
        }
    }
}

// ── blit ──────────────────────────────────────────────────────────────────

/// Copies the single-sample scene texture to the surface.
pub struct BlitPipeline {
    pipeline: wgpu::RenderPipeline,
}

impl BlitPipeline {
    pub fn new(
        device: &wgpu::Device,
        shaders: &ShaderLibrary,
        layouts: &BindLayouts,
        format: wgpu::TextureFormat,
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessel blit pipeline layout"),
            bind_group_layouts: &[&layouts.texture],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessel blit"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shaders.blit,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shaders.blit,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self { pipeline }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, source: &wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, source, &[]);
        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_use_matching_vertex_layouts() {
        assert_eq!(ShaderFamily::Shape.vertex_layout(), VertexLayout::Position);
        assert_eq!(ShaderFamily::Sprite.vertex_layout(), VertexLayout::PositionUv);
        assert_eq!(ShaderFamily::Glyph.vertex_layout(), VertexLayout::PositionUv);
        assert!(!ShaderFamily::Shape.is_textured());
    }

    #[test]
    fn blend_is_premultiplied_over() {
        let b = premul_alpha_blend();
        assert_eq!(b.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(b.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
        assert_eq!(b.alpha, b.color);
    }
}
