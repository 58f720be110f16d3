use crate::geometry::{Mat4, Vec2, Viewport};
use crate::gpu::PosVertex;

/// Model matrix for a unit-space mesh.
///
/// `translate(position) · translate(half) · rotate(angle) · translate(-half) · scale(size)`,
/// so rotation is always about the shape's own centre. The product is grouped
/// right to left, which keeps a 0° rotation bit-exact.
pub fn model_matrix(position: Vec2, size: Vec2, angle_degrees: f32) -> Mat4 {
    let half = size * 0.5;
    let local = Mat4::translation_2d(-half) * Mat4::scale_2d(size);
    let rotated = Mat4::rotation_z(angle_degrees) * local;
    let centred = Mat4::translation_2d(half) * rotated;
    Mat4::translation_2d(position) * centred
}

/// Position/size of the bounding square of a circle.
#[inline]
pub fn circle_bounds(center: Vec2, radius: f32) -> (Vec2, Vec2) {
    (center - Vec2::splat(radius), Vec2::splat(2.0 * radius))
}

/// Logical pixels to clip space, top-left origin, +Y down.
pub fn projection(viewport: Viewport) -> Mat4 {
    Mat4::orthographic(0.0, viewport.width.max(1.0), viewport.height.max(1.0), 0.0, -1.0, 1.0)
}

/// Maps unit-circle points (`[-1, 1]²`) into the unit mesh square (`[0, 1]²`).
pub fn unit_circle_to_mesh(points: &[Vec2], out: &mut Vec<PosVertex>) {
    out.clear();
    out.extend(points.iter().map(|p| PosVertex::new(0.5 + 0.5 * p.x, 0.5 + 0.5 * p.y)));
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const UNIT_QUAD: [Vec2; 4] = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    #[test]
    fn zero_rotation_reproduces_corners_exactly() {
        for &(x, y, w, h) in &[(10.0f32, 20.0, 30.0, 40.0), (0.1, 0.7, 123.45, 0.3), (-5.5, 3.25, 7.0, 9.0)] {
            let m = model_matrix(Vec2::new(x, y), Vec2::new(w, h), 0.0);
            let got: Vec<Vec2> = UNIT_QUAD.iter().map(|&p| m.transform_point(p)).collect();
            assert_eq!(
                got,
                vec![Vec2::new(x, y), Vec2::new(x + w, y), Vec2::new(x + w, y + h), Vec2::new(x, y + h)]
            );
        }
    }

    #[test]
    fn rotation_is_about_the_centre() {
        let pos = Vec2::new(100.0, 50.0);
        let size = Vec2::new(40.0, 20.0);
        let m = model_matrix(pos, size, 90.0);

        let centre = m.transform_point(Vec2::new(0.5, 0.5));
        assert_relative_eq!(centre.x, 120.0, epsilon = 1e-4);
        assert_relative_eq!(centre.y, 60.0, epsilon = 1e-4);

        // A 90° turn swaps the extents around the centre.
        let a = m.transform_point(Vec2::new(0.0, 0.0));
        let c = m.transform_point(Vec2::new(1.0, 1.0));
        assert_relative_eq!((c.x - a.x).abs(), 20.0, epsilon = 1e-4);
        assert_relative_eq!((c.y - a.y).abs(), 40.0, epsilon = 1e-4);
    }

    #[test]
    fn circle_mesh_fills_its_bounds() {
        let (pos, size) = circle_bounds(Vec2::new(50.0, 50.0), 10.0);
        assert_eq!(pos, Vec2::new(40.0, 40.0));
        assert_eq!(size, Vec2::new(20.0, 20.0));

        let mut out = Vec::new();
        unit_circle_to_mesh(&[Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), Vec2::zero()], &mut out);
        assert_eq!(out[0], PosVertex::new(0.0, 0.5));
        assert_eq!(out[1], PosVertex::new(1.0, 0.5));
        assert_eq!(out[2], PosVertex::new(0.5, 0.5));

        let m = model_matrix(pos, size, 0.0);
        let right = m.transform_point(Vec2::new(out[1].pos[0], out[1].pos[1]));
        assert_eq!(right, Vec2::new(60.0, 50.0));
    }

    #[test]
    fn projection_maps_viewport_corners() {
        let p = projection(Viewport::new(800.0, 600.0));
        let tl = p.transform_point(Vec2::new(0.0, 0.0));
        let br = p.transform_point(Vec2::new(800.0, 600.0));
        assert_relative_eq!(tl.x, -1.0);
        assert_relative_eq!(tl.y, 1.0);
        assert_relative_eq!(br.x, 1.0);
        assert_relative_eq!(br.y, -1.0);
    }
}
