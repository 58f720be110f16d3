use bytemuck::{Pod, Zeroable};

use crate::geometry::Mat4;
use crate::paint::Color;

/// Group 0: once per frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct FrameUniforms {
    pub projection: [[f32; 4]; 4],
}

impl FrameUniforms {
    pub fn new(projection: Mat4) -> Self {
        Self { projection: projection.to_cols_array() }
    }
}

/// Group 1: once per draw, bound with a dynamic offset.
///
/// `colors` holds the four corner colors of a gradient quad, or the solid
/// color repeated. `params.x` is 1.0 when the colors vary per vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub colors: [[f32; 4]; 4],
    pub params: [f32; 4],
}

impl DrawUniforms {
    pub fn solid(model: Mat4, color: Color) -> Self {
        let c = color.to_array();
        Self {
            model: model.to_cols_array(),
            colors: [c; 4],
            params: [0.0; 4],
        }
    }

    /// Corner order matches the unit quad: top-left, top-right, bottom-right, bottom-left.
    pub fn gradient(model: Mat4, corners: [Color; 4]) -> Self {
        Self {
            model: model.to_cols_array(),
            colors: corners.map(Color::to_array),
            params: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

pub const DRAW_UNIFORM_SIZE: u64 = std::mem::size_of::<DrawUniforms>() as u64;

/// Per-frame bump allocator for [`DrawUniforms`] inside one uniform buffer.
///
/// Entries are spaced by the device's dynamic offset alignment. The buffer is
/// recreated when a frame outgrows it; `generation` changes when that happens
/// so bind groups referencing the old buffer can be rebuilt.
pub struct UniformArena {
    stride: u64,
    bytes: Vec<u8>,
    buffer: wgpu::Buffer,
    capacity: u64, // entries
    generation: u64,
}

impl UniformArena {
    const INITIAL_ENTRIES: u64 = 256;

    pub fn new(device: &wgpu::Device) -> Self {
        let stride = aligned_stride(DRAW_UNIFORM_SIZE, device.limits().min_uniform_buffer_offset_alignment as u64);
        let capacity = Self::INITIAL_ENTRIES;
        Self {
            stride,
            bytes: Vec::new(),
            buffer: create_buffer(device, stride * capacity),
            capacity,
            generation: 0,
        }
    }

    /// Stages one entry and returns its dynamic offset.
    pub fn push(&mut self, uniforms: &DrawUniforms) -> u32 {
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(bytemuck::bytes_of(uniforms));
        self.bytes.resize(offset + self.stride as usize, 0);
        offset as u32
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / self.stride as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn flush(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.bytes.is_empty() {
            return;
        }
        let needed = self.len() as u64;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.buffer = create_buffer(device, self.stride * self.capacity);
            self.generation += 1;
            log::debug!("uniform arena grown to {} entries", self.capacity);
        }
        queue.write_buffer(&self.buffer, 0, &self.bytes);
    }

    pub fn destroy(self) {
        self.buffer.destroy();
    }
}

#[inline]
fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let a = alignment.max(1);
    size.div_ceil(a) * a
}

fn create_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("tessel draw uniforms"),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_uniforms_layout_matches_wgsl() {
        // mat4x4 + 4 x vec4 + vec4
        assert_eq!(DRAW_UNIFORM_SIZE, 144);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 64);
    }

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(144, 256), 256);
        assert_eq!(aligned_stride(144, 16), 144);
        assert_eq!(aligned_stride(300, 256), 512);
    }

    #[test]
    fn solid_repeats_color_and_clears_flag() {
        let u = DrawUniforms::solid(Mat4::IDENTITY, Color::RED);
        assert!(u.colors.iter().all(|c| *c == Color::RED.to_array()));
        assert_eq!(u.params[0], 0.0);

        let g = DrawUniforms::gradient(Mat4::IDENTITY, [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE]);
        assert_eq!(g.colors[2], Color::BLUE.to_array());
        assert_eq!(g.params[0], 1.0);
    }
}
