use bytemuck::{Pod, Zeroable};

/// Vertex formats understood by the mesh templates.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VertexLayout {
    /// `pos: vec2<f32>` at location 0.
    Position,
    /// `pos: vec2<f32>` at location 0, `uv: vec2<f32>` at location 1.
    PositionUv,
}

impl VertexLayout {
    #[inline]
    pub fn stride(self) -> usize {
        match self {
            VertexLayout::Position => std::mem::size_of::<PosVertex>(),
            VertexLayout::PositionUv => std::mem::size_of::<PosUvVertex>(),
        }
    }

    pub fn buffer_layout(self) -> wgpu::VertexBufferLayout<'static> {
        match self {
            VertexLayout::Position => wgpu::VertexBufferLayout {
                array_stride: self.stride() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &PosVertex::ATTRS,
            },
            VertexLayout::PositionUv => wgpu::VertexBufferLayout {
                array_stride: self.stride() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &PosUvVertex::ATTRS,
            },
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PosVertex {
    pub pos: [f32; 2],
}

impl PosVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { pos: [x, y] }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PosUvVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

impl PosUvVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    #[inline]
    pub const fn new(pos: [f32; 2], uv: [f32; 2]) -> Self {
        Self { pos, uv }
    }
}
