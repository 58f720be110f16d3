use bytemuck::Pod;
use wgpu::util::DeviceExt;

use super::{RenderError, ShaderFamily, VertexLayout};

/// Parameters for [`RenderObject::create`].
///
/// Static meshes pass both `vertices` and `indices`; their contents never
/// change. Dynamic meshes pass `None` and receive geometry through
/// [`RenderObject::upload`], bounded per call by `max_vertices`/`max_indices`.
#[derive(Debug, Clone)]
pub struct MeshDesc<'a> {
    pub label: &'static str,
    pub shader: ShaderFamily,
    pub layout: VertexLayout,
    pub vertices: Option<&'a [u8]>,
    pub indices: Option<&'a [u16]>,
    pub max_vertices: usize,
    pub max_indices: usize,
}

/// Slice of a mesh's index buffer to draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IndexRange {
    pub first_index: u32,
    pub index_count: u32,
    pub base_vertex: i32,
}

impl IndexRange {
    #[inline]
    pub fn is_empty(self) -> bool {
        self.index_count == 0
    }
}

/// CPU staging for one dynamic mesh over one frame.
///
/// Every upload is appended, so draws recorded earlier in the frame keep their
/// geometry when the stream is flushed to the GPU in one write at present time.
#[derive(Debug)]
pub struct MeshStream {
    layout: VertexLayout,
    max_vertices: usize,
    max_indices: usize,
    vertices: Vec<u8>,
    indices: Vec<u16>,
    vertex_count: usize,
}

impl MeshStream {
    pub fn new(layout: VertexLayout, max_vertices: usize, max_indices: usize) -> Self {
        Self {
            layout,
            max_vertices,
            max_indices,
            vertices: Vec::new(),
            indices: Vec::new(),
            vertex_count: 0,
        }
    }

    /// Appends one draw's geometry. Indices are local to `vertices`.
    pub fn push<V: Pod>(&mut self, vertices: &[V], indices: &[u16]) -> Result<IndexRange, RenderError> {
        if std::mem::size_of::<V>() != self.layout.stride() {
            return Err(RenderError::InvalidState("vertex type does not match mesh layout"));
        }
        if vertices.len() > self.max_vertices {
            return Err(RenderError::CapacityExceeded {
                what: "vertex",
                requested: vertices.len(),
                max: self.max_vertices,
            });
        }
        if indices.len() > self.max_indices {
            return Err(RenderError::CapacityExceeded {
                what: "index",
                requested: indices.len(),
                max: self.max_indices,
            });
        }
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));

        let range = IndexRange {
            first_index: self.indices.len() as u32,
            index_count: indices.len() as u32,
            base_vertex: self.vertex_count as i32,
        };

        self.vertices.extend_from_slice(bytemuck::cast_slice(vertices));
        self.indices.extend_from_slice(indices);
        self.vertex_count += vertices.len();

        Ok(range)
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.vertex_count = 0;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        &self.vertices
    }

    /// Index data padded to the 4-byte copy alignment `wgpu` requires.
    ///
    /// Must be the last call on the stream before [`MeshStream::clear`].
    fn aligned_indices(&mut self) -> &[u16] {
        if self.indices.len() % 2 == 1 {
            self.indices.push(0);
        }
        &self.indices
    }
}

/// Mesh template: a pipeline family plus GPU vertex/index buffers.
///
/// One instance exists per primitive kind for the lifetime of the renderer.
pub struct RenderObject {
    label: &'static str,
    shader: ShaderFamily,
    layout: VertexLayout,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: u64, // bytes
    index_capacity: u64,  // bytes

    static_range: IndexRange,
    stream: Option<MeshStream>,
}

impl RenderObject {
    pub fn create(device: &wgpu::Device, desc: &MeshDesc<'_>) -> Self {
        match (desc.vertices, desc.indices) {
            (Some(vertices), Some(indices)) => {
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(desc.label),
                    contents: vertices,
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(desc.label),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                Self {
                    label: desc.label,
                    shader: desc.shader,
                    layout: desc.layout,
                    vertex_capacity: vertex_buffer.size(),
                    index_capacity: index_buffer.size(),
                    vertex_buffer,
                    index_buffer,
                    static_range: IndexRange {
                        first_index: 0,
                        index_count: indices.len() as u32,
                        base_vertex: 0,
                    },
                    stream: None,
                }
            }
            _ => {
                let vertex_capacity = align4((desc.max_vertices * desc.layout.stride()) as u64);
                let index_capacity = align4((desc.max_indices * 2) as u64);
                Self {
                    label: desc.label,
                    shader: desc.shader,
                    layout: desc.layout,
                    vertex_buffer: dynamic_buffer(device, desc.label, vertex_capacity, wgpu::BufferUsages::VERTEX),
                    index_buffer: dynamic_buffer(device, desc.label, index_capacity, wgpu::BufferUsages::INDEX),
                    vertex_capacity,
                    index_capacity,
                    static_range: IndexRange { first_index: 0, index_count: 0, base_vertex: 0 },
                    stream: Some(MeshStream::new(desc.layout, desc.max_vertices, desc.max_indices)),
                }
            }
        }
    }

    #[inline]
    pub fn shader(&self) -> ShaderFamily {
        self.shader
    }

    #[inline]
    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.stream.is_some()
    }

    /// Full index range of a static mesh.
    #[inline]
    pub fn static_range(&self) -> IndexRange {
        self.static_range
    }

    /// Stages freshly tessellated geometry for this frame.
    pub fn upload<V: Pod>(&mut self, vertices: &[V], indices: &[u16]) -> Result<IndexRange, RenderError> {
        match self.stream.as_mut() {
            Some(stream) => stream.push(vertices, indices),
            None => Err(RenderError::InvalidState("upload to a static mesh")),
        }
    }

    /// Drops geometry staged during the previous frame.
    pub fn reset(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            stream.clear();
        }
    }

    /// Writes staged geometry to the GPU, growing buffers when needed.
    pub fn flush(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let Some(stream) = self.stream.as_mut() else { return };
        if stream.is_empty() {
            return;
        }

        let vertex_bytes = align4(stream.vertex_bytes().len() as u64);
        if vertex_bytes > self.vertex_capacity {
            self.vertex_capacity = vertex_bytes.next_power_of_two();
            self.vertex_buffer =
                dynamic_buffer(device, self.label, self.vertex_capacity, wgpu::BufferUsages::VERTEX);
            log::debug!("{}: vertex buffer grown to {} bytes", self.label, self.vertex_capacity);
        }
        queue.write_buffer(&self.vertex_buffer, 0, stream.vertex_bytes());

        let indices = stream.aligned_indices();
        let index_bytes = (indices.len() * 2) as u64;
        if index_bytes > self.index_capacity {
            self.index_capacity = index_bytes.next_power_of_two();
            self.index_buffer =
                dynamic_buffer(device, self.label, self.index_capacity, wgpu::BufferUsages::INDEX);
            log::debug!("{}: index buffer grown to {} bytes", self.label, self.index_capacity);
        }
        queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(indices));
    }

    /// Issues an indexed draw. The caller has already set a pipeline whose
    /// topology and vertex layout match this mesh.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, range: IndexRange) {
        if range.is_empty() {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        let first = range.first_index;
        pass.draw_indexed(first..first + range.index_count, range.base_vertex, 0..1);
    }

    pub fn destroy(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

#[inline]
fn align4(bytes: u64) -> u64 {
    (bytes + 3) & !3
}

fn dynamic_buffer(
    device: &wgpu::Device,
    label: &'static str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: size.max(4),
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{PosUvVertex, PosVertex};

    fn tri() -> ([PosVertex; 3], [u16; 3]) {
        (
            [PosVertex::new(0.0, 0.0), PosVertex::new(1.0, 0.0), PosVertex::new(0.0, 1.0)],
            [0, 1, 2],
        )
    }

    #[test]
    fn uploads_append_with_base_vertex() {
        let mut stream = MeshStream::new(VertexLayout::Position, 16, 16);
        let (v, i) = tri();

        let a = stream.push(&v, &i).unwrap();
        let b = stream.push(&v, &i).unwrap();

        assert_eq!(a, IndexRange { first_index: 0, index_count: 3, base_vertex: 0 });
        assert_eq!(b, IndexRange { first_index: 3, index_count: 3, base_vertex: 3 });
        assert_eq!(stream.vertex_bytes().len(), 6 * std::mem::size_of::<PosVertex>());
    }

    #[test]
    fn per_upload_bound_is_enforced() {
        let mut stream = MeshStream::new(VertexLayout::Position, 2, 16);
        let (v, i) = tri();
        assert_eq!(
            stream.push(&v, &i),
            Err(RenderError::CapacityExceeded { what: "vertex", requested: 3, max: 2 })
        );
        assert!(stream.is_empty());
    }

    #[test]
    fn layout_mismatch_is_rejected() {
        let mut stream = MeshStream::new(VertexLayout::Position, 16, 16);
        let v = [PosUvVertex::new([0.0; 2], [0.0; 2])];
        assert!(matches!(stream.push(&v, &[0]), Err(RenderError::InvalidState(_))));
    }

    #[test]
    fn odd_index_count_is_padded_for_copy() {
        let mut stream = MeshStream::new(VertexLayout::Position, 16, 16);
        let (v, i) = tri();
        stream.push(&v, &i).unwrap();
        assert_eq!(stream.aligned_indices().len(), 4);

        stream.clear();
        assert!(stream.is_empty());
        assert!(stream.vertex_bytes().is_empty());
    }
}
