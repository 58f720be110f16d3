use crate::geometry::MAX_CIRCLE_SEGMENTS;
use crate::gpu::{MeshDesc, PosUvVertex, PosVertex, ShaderFamily, Topology, VertexLayout};

/// Every drawable kind. Each has exactly one mesh template in the renderer,
/// except [`Primitive::BlitQuad`], whose full-screen triangle is generated in
/// the blit vertex shader and owned by the frame pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Primitive {
    Line,
    Triangle,
    TriangleOutline,
    TriangleGradient,
    Quad,
    QuadOutline,
    QuadGradient,
    Circle,
    CircleOutline,
    CircleSector,
    Ring,
    RingOutline,
    Sprite,
    Glyph,
    BlitQuad,
}

impl Primitive {
    /// Kinds backed by a [`crate::gpu::RenderObject`] owned by the renderer.
    pub const MESHES: [Primitive; 14] = [
        Primitive::Line,
        Primitive::Triangle,
        Primitive::TriangleOutline,
        Primitive::TriangleGradient,
        Primitive::Quad,
        Primitive::QuadOutline,
        Primitive::QuadGradient,
        Primitive::Circle,
        Primitive::CircleOutline,
        Primitive::CircleSector,
        Primitive::Ring,
        Primitive::RingOutline,
        Primitive::Sprite,
        Primitive::Glyph,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Primitive::Line => "tessel line",
            Primitive::Triangle => "tessel triangle",
            Primitive::TriangleOutline => "tessel triangle outline",
            Primitive::TriangleGradient => "tessel triangle gradient",
            Primitive::Quad => "tessel quad",
            Primitive::QuadOutline => "tessel quad outline",
            Primitive::QuadGradient => "tessel quad gradient",
            Primitive::Circle => "tessel circle",
            Primitive::CircleOutline => "tessel circle outline",
            Primitive::CircleSector => "tessel circle sector",
            Primitive::Ring => "tessel ring",
            Primitive::RingOutline => "tessel ring outline",
            Primitive::Sprite => "tessel sprite",
            Primitive::Glyph => "tessel glyph",
            Primitive::BlitQuad => "tessel blit",
        }
    }

    pub fn shader(self) -> ShaderFamily {
        match self {
            Primitive::Sprite | Primitive::BlitQuad => ShaderFamily::Sprite,
            Primitive::Glyph => ShaderFamily::Glyph,
            _ => ShaderFamily::Shape,
        }
    }

    pub fn topology(self) -> Topology {
        match self {
            Primitive::Line
            | Primitive::TriangleOutline
            | Primitive::QuadOutline
            | Primitive::CircleOutline
            | Primitive::RingOutline => Topology::Lines,
            _ => Topology::Triangles,
        }
    }

    /// Circle-family kinds are re-tessellated on every draw.
    #[inline]
    pub fn is_dynamic(self) -> bool {
        matches!(
            self,
            Primitive::Circle
                | Primitive::CircleOutline
                | Primitive::CircleSector
                | Primitive::Ring
                | Primitive::RingOutline
        )
    }

    /// Mesh template parameters. Static kinds carry their unit geometry.
    pub fn mesh_desc(self) -> MeshDesc<'static> {
        let shader = self.shader();
        let layout = shader.vertex_layout();
        let (vertices, indices): (Option<&'static [u8]>, Option<&'static [u16]>) = match self {
            Primitive::Line => (Some(bytemuck::cast_slice(&LINE_VERTICES)), Some(&LINE_INDICES[..])),
            Primitive::Triangle | Primitive::TriangleGradient => {
                (Some(bytemuck::cast_slice(&TRIANGLE_VERTICES)), Some(&TRIANGLE_INDICES[..]))
            }
            Primitive::TriangleOutline => {
                (Some(bytemuck::cast_slice(&TRIANGLE_VERTICES)), Some(&TRIANGLE_OUTLINE_INDICES[..]))
            }
            Primitive::Quad | Primitive::QuadGradient => {
                (Some(bytemuck::cast_slice(&QUAD_VERTICES)), Some(&QUAD_INDICES[..]))
            }
            Primitive::QuadOutline => (Some(bytemuck::cast_slice(&QUAD_VERTICES)), Some(&QUAD_OUTLINE_INDICES[..])),
            Primitive::Sprite | Primitive::Glyph | Primitive::BlitQuad => {
                (Some(bytemuck::cast_slice(&TEXTURED_QUAD_VERTICES)), Some(&QUAD_INDICES[..]))
            }
            _ => (None, None),
        };

        MeshDesc {
            label: self.label(),
            shader,
            layout,
            vertices,
            indices,
            max_vertices: if self.is_dynamic() { MAX_DYNAMIC_VERTICES } else { 0 },
            max_indices: if self.is_dynamic() { MAX_DYNAMIC_INDICES } else { 0 },
        }
    }
}

/// Upper bound of one circle-family tessellation (ring strip at max segments).
pub const MAX_DYNAMIC_VERTICES: usize = 2 * MAX_CIRCLE_SEGMENTS + 2;
pub const MAX_DYNAMIC_INDICES: usize = 6 * MAX_CIRCLE_SEGMENTS;

// ── unit meshes ───────────────────────────────────────────────────────────
//
// All static meshes live in [0, 1]²; the model matrix places and sizes them.

static LINE_VERTICES: [PosVertex; 2] = [PosVertex::new(0.0, 0.0), PosVertex::new(1.0, 1.0)];
static LINE_INDICES: [u16; 2] = [0, 1];

static TRIANGLE_VERTICES: [PosVertex; 3] = [
    PosVertex::new(0.5, 0.0),
    PosVertex::new(1.0, 1.0),
    PosVertex::new(0.0, 1.0),
];
static TRIANGLE_INDICES: [u16; 3] = [0, 1, 2];
static TRIANGLE_OUTLINE_INDICES: [u16; 6] = [0, 1, 1, 2, 2, 0];

static QUAD_VERTICES: [PosVertex; 4] = [
    PosVertex::new(0.0, 0.0),
    PosVertex::new(1.0, 0.0),
    PosVertex::new(1.0, 1.0),
    PosVertex::new(0.0, 1.0),
];
static QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];
static QUAD_OUTLINE_INDICES: [u16; 8] = [0, 1, 1, 2, 2, 3, 3, 0];

static TEXTURED_QUAD_VERTICES: [PosUvVertex; 4] = [
    PosUvVertex::new([0.0, 0.0], [0.0, 0.0]),
    PosUvVertex::new([1.0, 0.0], [1.0, 0.0]),
    PosUvVertex::new([1.0, 1.0], [1.0, 1.0]),
    PosUvVertex::new([0.0, 1.0], [0.0, 1.0]),
];

const _: () = assert!(MAX_DYNAMIC_VERTICES <= u16::MAX as usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_kinds_are_indexed_densely() {
        for (i, p) in Primitive::MESHES.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
        assert_eq!(Primitive::BlitQuad.index(), Primitive::MESHES.len());
    }

    #[test]
    fn static_kinds_carry_geometry_and_dynamic_kinds_do_not() {
        for p in Primitive::MESHES {
            let desc = p.mesh_desc();
            assert_eq!(desc.vertices.is_none(), p.is_dynamic(), "{p:?}");
            assert_eq!(desc.layout, p.shader().vertex_layout());
            if let Some(v) = desc.vertices {
                assert_eq!(v.len() % desc.layout.stride(), 0);
            }
        }
    }

    #[test]
    fn outline_indices_form_closed_loops() {
        assert_eq!(Primitive::QuadOutline.topology(), Topology::Lines);
        let idx = QUAD_OUTLINE_INDICES;
        for pair in idx.chunks(2).zip(idx.chunks(2).skip(1)) {
            assert_eq!(pair.0[1], pair.1[0]);
        }
        assert_eq!(idx[idx.len() - 1], idx[0]);
    }

    #[test]
    fn dynamic_bound_covers_largest_tessellation() {
        let mut v = Vec::new();
        let mut i = Vec::new();
        crate::geometry::ring_strip(MAX_CIRCLE_SEGMENTS, 0.5, &mut v, &mut i);
        assert!(v.len() <= MAX_DYNAMIC_VERTICES && i.len() <= MAX_DYNAMIC_INDICES);
        crate::geometry::sector_fan(MAX_CIRCLE_SEGMENTS, 0.0, 360.0, &mut v, &mut i);
        assert!(v.len() <= MAX_DYNAMIC_VERTICES && i.len() <= MAX_DYNAMIC_INDICES);
        assert_eq!(VertexLayout::Position, Primitive::Ring.shader().vertex_layout());
    }
}
