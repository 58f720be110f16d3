//! Procedural tessellation of circle-family shapes.
//!
//! Every generator writes unit-radius geometry centred on the origin into
//! caller-owned buffers. Buffers are cleared, never shrunk, so a renderer can
//! keep one pair alive and tessellate without allocating once warmed.

use super::Vec2;

pub const MIN_CIRCLE_SEGMENTS: usize = 3;
pub const MAX_CIRCLE_SEGMENTS: usize = 512;

#[inline]
pub fn clamp_segments(segments: usize) -> usize {
    segments.clamp(MIN_CIRCLE_SEGMENTS, MAX_CIRCLE_SEGMENTS)
}

#[inline]
fn unit_point(degrees: f32) -> Vec2 {
    let (s, c) = degrees.to_radians().sin_cos();
    Vec2::new(c, s)
}

fn push_ring_points(vertices: &mut Vec<Vec2>, n: usize, radius: f32) {
    let step = 360.0 / n as f32;
    vertices.extend((0..n).map(|k| unit_point(k as f32 * step) * radius));
}

/// Filled circle as a triangle fan: `n` rim vertices, `n - 2` triangles, all
/// sharing vertex 0.
pub fn circle_fan(segments: usize, vertices: &mut Vec<Vec2>, indices: &mut Vec<u16>) {
    let n = clamp_segments(segments);
    vertices.clear();
    indices.clear();

    push_ring_points(vertices, n, 1.0);
    for k in 0..(n - 2) as u16 {
        indices.extend_from_slice(&[0, k + 1, k + 2]);
    }
}

/// Circle rim as a line list closing back on vertex 0.
pub fn circle_outline(segments: usize, vertices: &mut Vec<Vec2>, indices: &mut Vec<u16>) {
    let n = clamp_segments(segments);
    vertices.clear();
    indices.clear();

    push_ring_points(vertices, n, 1.0);
    for k in 0..n as u16 {
        indices.extend_from_slice(&[k, (k + 1) % n as u16]);
    }
}

/// Pie slice starting at `start_degrees` and sweeping `sweep_degrees`.
///
/// The arc gets a share of `segments` proportional to the sweep (at least one).
/// Vertex 0 is the centre. A zero sweep produces no geometry.
pub fn sector_fan(
    segments: usize,
    start_degrees: f32,
    sweep_degrees: f32,
    vertices: &mut Vec<Vec2>,
    indices: &mut Vec<u16>,
) {
    vertices.clear();
    indices.clear();

    let sweep = sweep_degrees.clamp(-360.0, 360.0);
    if sweep == 0.0 || !sweep.is_finite() || !start_degrees.is_finite() {
        return;
    }

    let n = clamp_segments(segments);
    let arc_steps = ((n as f32 * sweep.abs() / 360.0).ceil() as usize).clamp(1, n);
    let step = sweep / arc_steps as f32;

    vertices.push(Vec2::zero());
    vertices.extend((0..=arc_steps).map(|i| unit_point(start_degrees + step * i as f32)));
    for i in 0..arc_steps as u16 {
        indices.extend_from_slice(&[0, i + 1, i + 2]);
    }
}

/// Annulus between `inner_ratio` (0..1 of the outer radius) and 1.
///
/// Vertices interleave outer/inner: `2k` outer, `2k + 1` inner. Two triangles
/// per segment.
pub fn ring_strip(
    segments: usize,
    inner_ratio: f32,
    vertices: &mut Vec<Vec2>,
    indices: &mut Vec<u16>,
) {
    let n = clamp_segments(segments);
    let inner = inner_ratio.clamp(0.0, 1.0);
    vertices.clear();
    indices.clear();

    let step = 360.0 / n as f32;
    for k in 0..n {
        let p = unit_point(k as f32 * step);
        vertices.push(p);
        vertices.push(p * inner);
    }

    let count = (2 * n) as u16;
    for k in 0..n as u16 {
        let o0 = 2 * k;
        let i0 = o0 + 1;
        let o1 = (o0 + 2) % count;
        let i1 = (o0 + 3) % count;
        indices.extend_from_slice(&[o0, i0, o1, i0, i1, o1]);
    }
}

/// Outer and inner rims of an annulus as two closed line loops.
pub fn ring_outline(
    segments: usize,
    inner_ratio: f32,
    vertices: &mut Vec<Vec2>,
    indices: &mut Vec<u16>,
) {
    let n = clamp_segments(segments);
    let inner = inner_ratio.clamp(0.0, 1.0);
    vertices.clear();
    indices.clear();

    push_ring_points(vertices, n, 1.0);
    push_ring_points(vertices, n, inner);

    let n16 = n as u16;
    for base in [0, n16] {
        for k in 0..n16 {
            indices.extend_from_slice(&[base + k, base + (k + 1) % n16]);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_relative_eq;

    use super::*;

    fn angle_of(p: Vec2) -> f32 {
        p.y.atan2(p.x).to_degrees().rem_euclid(360.0)
    }

    fn tri_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
        ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() * 0.5
    }

    // ── circle_fan ────────────────────────────────────────────────────────

    #[test]
    fn fan_counts_for_every_segment_count() {
        let (mut v, mut i) = (Vec::new(), Vec::new());
        for n in MIN_CIRCLE_SEGMENTS..=96 {
            circle_fan(n, &mut v, &mut i);
            assert_eq!(v.len(), n);
            assert_eq!(i.len() / 3, n - 2);
            assert!(i.chunks(3).all(|t| t[0] == 0));
        }
    }

    #[test]
    fn fan_vertices_sit_at_even_angles() {
        let (mut v, mut i) = (Vec::new(), Vec::new());
        circle_fan(8, &mut v, &mut i);
        for (k, p) in v.iter().enumerate() {
            assert_relative_eq!(p.length(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(angle_of(*p), k as f32 * 45.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn fan_boundary_covers_full_turn() {
        let (mut v, mut i) = (Vec::new(), Vec::new());
        for n in [3usize, 4, 7, 32, 100] {
            circle_fan(n, &mut v, &mut i);

            // Boundary edges appear in exactly one triangle.
            let mut edges: HashMap<(u16, u16), u32> = HashMap::new();
            for t in i.chunks(3) {
                for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                    *edges.entry((a.min(b), a.max(b))).or_default() += 1;
                }
            }
            let arcs: f32 = edges
                .iter()
                .filter(|(_, count)| **count == 1)
                .map(|((a, b), _)| {
                    let da = (angle_of(v[*b as usize]) - angle_of(v[*a as usize])).rem_euclid(360.0);
                    da.min(360.0 - da)
                })
                .sum();
            assert_relative_eq!(arcs, 360.0, epsilon = 1e-2);

            let area: f32 = i
                .chunks(3)
                .map(|t| tri_area(v[t[0] as usize], v[t[1] as usize], v[t[2] as usize]))
                .sum();
            let expected = 0.5 * n as f32 * (360.0 / n as f32).to_radians().sin();
            assert_relative_eq!(area, expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn segment_count_is_clamped() {
        let (mut v, mut i) = (Vec::new(), Vec::new());
        circle_fan(1, &mut v, &mut i);
        assert_eq!(v.len(), MIN_CIRCLE_SEGMENTS);
        circle_fan(100_000, &mut v, &mut i);
        assert_eq!(v.len(), MAX_CIRCLE_SEGMENTS);
    }

    // ── outlines ──────────────────────────────────────────────────────────

    #[test]
    fn outline_closes_the_loop() {
        let (mut v, mut i) = (Vec::new(), Vec::new());
        circle_outline(6, &mut v, &mut i);
        assert_eq!(i.len(), 12);
        assert_eq!(&i[10..], &[5, 0]);
    }

    #[test]
    fn ring_outline_has_two_loops() {
        let (mut v, mut i) = (Vec::new(), Vec::new());
        ring_outline(10, 0.5, &mut v, &mut i);
        assert_eq!(v.len(), 20);
        assert_eq!(i.len(), 40);
        assert_relative_eq!(v[10].length(), 0.5, epsilon = 1e-6);
    }

    // ── sector / ring ─────────────────────────────────────────────────────

    #[test]
    fn quarter_sector_uses_proportional_segments() {
        let (mut v, mut i) = (Vec::new(), Vec::new());
        sector_fan(32, 0.0, 90.0, &mut v, &mut i);
        assert_eq!(v.len(), 1 + 8 + 1);
        assert_eq!(i.len() / 3, 8);
        assert_relative_eq!(angle_of(v[v.len() - 1]), 90.0, epsilon = 1e-3);
    }

    #[test]
    fn zero_sweep_is_empty() {
        let (mut v, mut i) = (vec![Vec2::zero()], vec![0]);
        sector_fan(32, 10.0, 0.0, &mut v, &mut i);
        assert!(v.is_empty() && i.is_empty());
    }

    #[test]
    fn ring_area_matches_annulus() {
        let (mut v, mut i) = (Vec::new(), Vec::new());
        let n = 64;
        ring_strip(n, 0.5, &mut v, &mut i);
        assert_eq!(v.len(), 2 * n);
        assert_eq!(i.len() / 3, 2 * n);

        let area: f32 = i
            .chunks(3)
            .map(|t| tri_area(v[t[0] as usize], v[t[1] as usize], v[t[2] as usize]))
            .sum();
        let polygon = |r: f32| 0.5 * n as f32 * r * r * (360.0 / n as f32).to_radians().sin();
        assert_relative_eq!(area, polygon(1.0) - polygon(0.5), epsilon = 1e-4);
    }
}
