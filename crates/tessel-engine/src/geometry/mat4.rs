use core::ops::Mul;

use super::{Vec2, Vec3, Vec4};

/// 4x4 column-major matrix.
///
/// Layout matches WGSL `mat4x4<f32>` so [`Mat4::to_cols_array`] can be copied
/// straight into a uniform block.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };

    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self { cols: [c0, c1, c2, c3] }
    }

    /// Orthographic projection with a `[0, 1]` depth range.
    ///
    /// For top-left-origin logical pixels use
    /// `orthographic(0.0, width, height, 0.0, -1.0, 1.0)`.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rml = right - left;
        let tmb = top - bottom;
        let fmn = far - near;

        Self::from_cols(
            Vec4::new(2.0 / rml, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / tmb, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -1.0 / fmn, 0.0),
            Vec4::new(-(right + left) / rml, -(top + bottom) / tmb, -near / fmn, 1.0),
        )
    }

    #[inline]
    pub fn translation(offset: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = Vec4::new(offset.x, offset.y, offset.z, 1.0);
        m
    }

    #[inline]
    pub fn translation_2d(offset: Vec2) -> Self {
        Self::translation(Vec3::new(offset.x, offset.y, 0.0))
    }

    #[inline]
    pub fn scale(factors: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(factors.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, factors.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, factors.z, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    #[inline]
    pub fn scale_2d(factors: Vec2) -> Self {
        Self::scale(Vec3::new(factors.x, factors.y, 1.0))
    }

    /// Rotation about +Z. `degrees` is converted to radians here.
    ///
    /// In the y-down logical space a positive angle turns clockwise on screen.
    pub fn rotation_z(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::from_cols(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    #[inline]
    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z + self.cols[3] * v.w
    }

    /// Transforms a point on the z = 0 plane.
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let v = self.mul_vec4(Vec4::new(p.x, p.y, 0.0, 1.0));
        Vec2::new(v.x, v.y)
    }

    #[inline]
    pub fn to_cols_array(&self) -> [[f32; 4]; 4] {
        [
            self.cols[0].to_array(),
            self.cols[1].to_array(),
            self.cols[2].to_array(),
            self.cols[3].to_array(),
        ]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4::from_cols(
            self.mul_vec4(rhs.cols[0]),
            self.mul_vec4(rhs.cols[1]),
            self.mul_vec4(rhs.cols[2]),
            self.mul_vec4(rhs.cols[3]),
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn identity_is_neutral() {
        let t = Mat4::translation_2d(Vec2::new(3.0, 4.0));
        assert_eq!(Mat4::IDENTITY * t, t);
        assert_eq!(t * Mat4::IDENTITY, t);
    }

    #[test]
    fn translate_then_scale_order() {
        // T * S scales first, then translates.
        let m = Mat4::translation_2d(Vec2::new(10.0, 20.0)) * Mat4::scale_2d(Vec2::new(2.0, 3.0));
        assert_eq!(m.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 23.0));
    }

    #[test]
    fn rotation_quarter_turn_is_clockwise_in_y_down_space() {
        let p = Mat4::rotation_z(90.0).transform_point(Vec2::new(1.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn rotation_zero_is_exact_identity() {
        assert_eq!(Mat4::rotation_z(0.0), Mat4::IDENTITY);
    }

    #[test]
    fn orthographic_maps_logical_corners_to_ndc() {
        let proj = Mat4::orthographic(0.0, 800.0, 600.0, 0.0, -1.0, 1.0);
        let tl = proj.mul_vec4(Vec4::new(0.0, 0.0, 0.0, 1.0));
        let br = proj.mul_vec4(Vec4::new(800.0, 600.0, 0.0, 1.0));
        assert_relative_eq!(tl.x, -1.0);
        assert_relative_eq!(tl.y, 1.0);
        assert_relative_eq!(br.x, 1.0);
        assert_relative_eq!(br.y, -1.0);
        assert!((0.0..=1.0).contains(&tl.z));
    }
}
