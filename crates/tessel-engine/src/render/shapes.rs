//! Shape and sprite draw calls.
//!
//! Fixed-shape kinds reuse their static unit mesh and are placed entirely by
//! the model matrix. Circle-family kinds are tessellated per draw with the
//! configured segment count.

use crate::geometry::{self, Mat4, Vec2};
use crate::gpu::{DrawUniforms, Texture};
use crate::paint::Color;

use super::transform::{circle_bounds, model_matrix, unit_circle_to_mesh};
use super::{Primitive, Renderer};

impl Renderer {
    /// Line segment from `start` to `end`.
    pub fn draw_line(&mut self, start: Vec2, end: Vec2, color: Color) {
        if !self.recording() {
            return;
        }
        let model = Mat4::translation_2d(start) * Mat4::scale_2d(end - start);
        self.record(Primitive::Line, DrawUniforms::solid(model, color), None);
    }

    // ── triangles ──

    /// Isosceles triangle with its apex at the top centre of the box.
    pub fn draw_triangle(&mut self, position: Vec2, size: Vec2, angle_degrees: f32, color: Color) {
        self.draw_unit(Primitive::Triangle, position, size, angle_degrees, color);
    }

    pub fn draw_triangle_outline(&mut self, position: Vec2, size: Vec2, angle_degrees: f32, color: Color) {
        self.draw_unit(Primitive::TriangleOutline, position, size, angle_degrees, color);
    }

    /// Per-vertex colors: apex, bottom-right, bottom-left.
    pub fn draw_triangle_gradient(&mut self, position: Vec2, size: Vec2, angle_degrees: f32, colors: [Color; 3]) {
        if !self.recording() {
            return;
        }
        let [apex, right, left] = colors;
        let uniforms = DrawUniforms::gradient(model_matrix(position, size, angle_degrees), [apex, right, left, left]);
        self.record(Primitive::TriangleGradient, uniforms, None);
    }

    // ── quads ──

    pub fn draw_quad(&mut self, position: Vec2, size: Vec2, angle_degrees: f32, color: Color) {
        self.draw_unit(Primitive::Quad, position, size, angle_degrees, color);
    }

    pub fn draw_quad_outline(&mut self, position: Vec2, size: Vec2, angle_degrees: f32, color: Color) {
        self.draw_unit(Primitive::QuadOutline, position, size, angle_degrees, color);
    }

    /// Per-corner colors: top-left, top-right, bottom-right, bottom-left.
    pub fn draw_quad_gradient(&mut self, position: Vec2, size: Vec2, angle_degrees: f32, colors: [Color; 4]) {
        if !self.recording() {
            return;
        }
        let uniforms = DrawUniforms::gradient(model_matrix(position, size, angle_degrees), colors);
        self.record(Primitive::QuadGradient, uniforms, None);
    }

    fn draw_unit(&mut self, primitive: Primitive, position: Vec2, size: Vec2, angle_degrees: f32, color: Color) {
        if !self.recording() {
            return;
        }
        let uniforms = DrawUniforms::solid(model_matrix(position, size, angle_degrees), color);
        self.record(primitive, uniforms, None);
    }

    // ── circle family ──

    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !self.recording() {
            return;
        }
        let segments = self.circle_segments();
        geometry::circle_fan(segments, &mut self.tess.points, &mut self.tess.indices);
        self.draw_tessellated(Primitive::Circle, center, radius, color);
    }

    pub fn draw_circle_outline(&mut self, center: Vec2, radius: f32, color: Color) {
        if !self.recording() {
            return;
        }
        let segments = self.circle_segments();
        geometry::circle_outline(segments, &mut self.tess.points, &mut self.tess.indices);
        self.draw_tessellated(Primitive::CircleOutline, center, radius, color);
    }

    /// Pie slice from `start_degrees`, sweeping `sweep_degrees` (clockwise on
    /// screen for positive sweeps, since +Y points down).
    pub fn draw_circle_sector(
        &mut self,
        center: Vec2,
        radius: f32,
        start_degrees: f32,
        sweep_degrees: f32,
        color: Color,
    ) {
        if !self.recording() {
            return;
        }
        let segments = self.circle_segments();
        geometry::sector_fan(segments, start_degrees, sweep_degrees, &mut self.tess.points, &mut self.tess.indices);
        self.draw_tessellated(Primitive::CircleSector, center, radius, color);
    }

    pub fn draw_ring(&mut self, center: Vec2, inner_radius: f32, outer_radius: f32, color: Color) {
        if !self.recording() {
            return;
        }
        let segments = self.circle_segments();
        let ratio = ring_ratio(inner_radius, outer_radius);
        geometry::ring_strip(segments, ratio, &mut self.tess.points, &mut self.tess.indices);
        self.draw_tessellated(Primitive::Ring, center, outer_radius, color);
    }

    pub fn draw_ring_outline(&mut self, center: Vec2, inner_radius: f32, outer_radius: f32, color: Color) {
        if !self.recording() {
            return;
        }
        let segments = self.circle_segments();
        let ratio = ring_ratio(inner_radius, outer_radius);
        geometry::ring_outline(segments, ratio, &mut self.tess.points, &mut self.tess.indices);
        self.draw_tessellated(Primitive::RingOutline, center, outer_radius, color);
    }

    fn draw_tessellated(&mut self, primitive: Primitive, center: Vec2, radius: f32, color: Color) {
        if !radius.is_finite() || radius <= 0.0 || self.tess.indices.is_empty() {
            return;
        }
        unit_circle_to_mesh(&self.tess.points, &mut self.tess.vertices);
        let (position, size) = circle_bounds(center, radius);
        self.record(primitive, DrawUniforms::solid(model_matrix(position, size, 0.0), color), None);
    }

    // ── sprites ──

    /// Textured quad tinted by `tint` (white leaves the texture unchanged).
    pub fn draw_sprite(&mut self, texture: &Texture, position: Vec2, size: Vec2, angle_degrees: f32, tint: Color) {
        if !self.recording() {
            return;
        }
        let bind = texture.bind(self.device(), self.texture_layout(), &self.sampler);
        let uniforms = DrawUniforms::solid(model_matrix(position, size, angle_degrees), tint);
        self.record(Primitive::Sprite, uniforms, Some(bind));
    }
}

/// Inner radius as a fraction of the outer one, clamped to `[0, 1]`.
fn ring_ratio(inner_radius: f32, outer_radius: f32) -> f32 {
    if outer_radius > 0.0 && inner_radius.is_finite() {
        (inner_radius / outer_radius).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_ratio_is_clamped() {
        assert_eq!(ring_ratio(25.0, 100.0), 0.25);
        assert_eq!(ring_ratio(150.0, 100.0), 1.0);
        assert_eq!(ring_ratio(-5.0, 100.0), 0.0);
        assert_eq!(ring_ratio(5.0, 0.0), 0.0);
        assert_eq!(ring_ratio(f32::NAN, 10.0), 0.0);
    }
}
