use crate::geometry::{clamp_segments, MAX_CIRCLE_SEGMENTS, MIN_CIRCLE_SEGMENTS};
use crate::paint::Color;

/// Caller-tunable renderer settings.
///
/// Changed between frames through `Renderer::set_config`; read-only while a
/// frame is being recorded.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererConfig {
    /// Draw triangle geometry as edges. Ignored when the device lacks
    /// line polygon mode. Never applies to presentation.
    pub wireframe: bool,

    /// Segments used to tessellate circles, rings and sectors.
    pub circle_segments: usize,

    /// Requested MSAA sample count. `0` or `1` disables multisampling.
    pub msaa_samples: u32,

    /// Clear color of the scene target.
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            wireframe: false,
            circle_segments: 64,
            msaa_samples: 4,
            clear_color: Color::BLACK,
        }
    }
}

impl RendererConfig {
    /// Returns a copy with out-of-range values brought into range.
    pub fn sanitized(self) -> Self {
        if self.circle_segments < MIN_CIRCLE_SEGMENTS || self.circle_segments > MAX_CIRCLE_SEGMENTS {
            log::warn!(
                "circle_segments {} out of range, clamped to [{MIN_CIRCLE_SEGMENTS}, {MAX_CIRCLE_SEGMENTS}]",
                self.circle_segments
            );
        }
        let clear_color = if self.clear_color.is_finite() { self.clear_color } else { Color::BLACK };
        Self {
            circle_segments: clamp_segments(self.circle_segments),
            clear_color,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_segments() {
        let c = RendererConfig { circle_segments: 1, ..Default::default() }.sanitized();
        assert_eq!(c.circle_segments, MIN_CIRCLE_SEGMENTS);

        let c = RendererConfig { circle_segments: 100_000, ..Default::default() }.sanitized();
        assert_eq!(c.circle_segments, MAX_CIRCLE_SEGMENTS);

        let d = RendererConfig::default();
        assert_eq!(d.sanitized(), d);
    }
}
