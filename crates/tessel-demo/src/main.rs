use anyhow::{Context, Result};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use tessel_engine::core::{App, AppControl, FrameCtx};
use tessel_engine::device::GpuInit;
use tessel_engine::geometry::{Rect, Vec2};
use tessel_engine::gpu::Texture;
use tessel_engine::logging::{init_logging, LoggingConfig};
use tessel_engine::paint::Color;
use tessel_engine::render::{Renderer, RendererConfig};
use tessel_engine::text::{FontEngine, FontId, HAlign, Text, TextArea, TextScratch, TextStyle, VAlign};
use tessel_engine::window::{Runtime, RuntimeConfig};

const FALLBACK_FONTS: [&str; 5] = [
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

const MSAA_STEPS: [u32; 4] = [1, 2, 4, 8];

const PARAGRAPH: &str = "Glyph runs are broken greedily at spaces, then every gap on a wrapped line \
    is widened until the line meets the right edge.\nHard breaks end a paragraph.";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut fonts = FontEngine::new();
    let font = load_font(&mut fonts, std::env::args().nth(1));

    let app = Demo {
        fonts,
        font,
        config: RendererConfig::default(),
        renderer: None,
        checker: None,
        scratch: TextScratch::new(),
        angle: 0.0,
    };

    Runtime::run(
        RuntimeConfig { title: "tessel demo".to_string(), ..Default::default() },
        GpuInit { present_mode: wgpu::PresentMode::AutoVsync, ..Default::default() },
        app,
    )
}

fn load_font(fonts: &mut FontEngine, explicit: Option<String>) -> Option<FontId> {
    if let Some(path) = explicit {
        return match fonts.load_font(&path) {
            Ok(id) => Some(id),
            Err(e) => {
                log::error!("{e}");
                None
            }
        };
    }
    let found = FALLBACK_FONTS.iter().find_map(|p| fonts.load_font(p).ok());
    match found {
        Some(_) => log::info!("{} font(s) loaded", fonts.len()),
        None => log::warn!("no system font found; pass a .ttf path as the first argument to see text"),
    }
    found
}

struct Demo {
    fonts: FontEngine,
    font: Option<FontId>,
    config: RendererConfig,
    renderer: Option<Renderer>,
    checker: Option<Texture>,
    scratch: TextScratch,
    angle: f32,
}

impl Demo {
    fn init(&mut self, ctx: &FrameCtx<'_, '_>) -> Result<()> {
        let rctx = ctx.render_ctx();
        let renderer = Renderer::new(&rctx, self.config)?;

        // 8x8 RGB checkerboard, widened to RGBA on upload.
        let pixels: Vec<u8> = (0..64u32)
            .flat_map(|i| if (i % 8 + i / 8) % 2 == 0 { [240, 240, 240] } else { [40, 90, 200] })
            .collect();
        let checker = Texture::from_pixels(rctx.device, rctx.queue, "checker", 8, 8, 3, &pixels)
            .context("failed to upload checker texture")?;

        self.renderer = Some(renderer);
        self.checker = Some(checker);
        Ok(())
    }

    fn cycle_msaa(&mut self) {
        let next = MSAA_STEPS
            .iter()
            .position(|&s| s == self.config.msaa_samples.max(1))
            .map_or(0, |i| (i + 1) % MSAA_STEPS.len());
        self.config.msaa_samples = MSAA_STEPS[next];
        log::info!("msaa requested: {}x", self.config.msaa_samples);
    }
}

impl App for Demo {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed || event.repeat {
            return AppControl::Continue;
        }

        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
            PhysicalKey::Code(KeyCode::KeyW) => self.config.wireframe = !self.config.wireframe,
            PhysicalKey::Code(KeyCode::KeyM) => self.cycle_msaa(),
            PhysicalKey::Code(KeyCode::Equal) => self.config.circle_segments *= 2,
            PhysicalKey::Code(KeyCode::Minus) => self.config.circle_segments /= 2,
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.renderer.is_none() {
            if let Err(e) = self.init(ctx) {
                log::error!("renderer setup failed: {e:#}");
                return AppControl::Exit;
            }
        }
        let (Some(renderer), Some(checker)) = (self.renderer.as_mut(), self.checker.as_ref()) else {
            return AppControl::Exit;
        };

        if *renderer.config() != self.config {
            renderer.set_config(self.config);
            self.config = *renderer.config();
        }

        self.angle = (self.angle + 45.0 * ctx.time.dt) % 360.0;
        let angle = self.angle;

        self.scratch.reset();
        renderer.new_frame(ctx.dimensions());

        // Row 1: lines, triangles and quads.
        renderer.draw_line(Vec2::new(20.0, 20.0), Vec2::new(140.0, 120.0), Color::WHITE);
        renderer.draw_triangle(Vec2::new(160.0, 20.0), Vec2::new(100.0, 100.0), angle, Color::RED);
        renderer.draw_triangle_outline(Vec2::new(280.0, 20.0), Vec2::new(100.0, 100.0), 0.0, Color::GREEN);
        renderer.draw_triangle_gradient(
            Vec2::new(400.0, 20.0),
            Vec2::new(100.0, 100.0),
            0.0,
            [Color::RED, Color::GREEN, Color::BLUE],
        );
        renderer.draw_quad(Vec2::new(520.0, 20.0), Vec2::new(100.0, 60.0), -angle, Color::BLUE);
        renderer.draw_quad_outline(Vec2::new(640.0, 20.0), Vec2::new(100.0, 100.0), 0.0, Color::WHITE);
        renderer.draw_quad_gradient(
            Vec2::new(760.0, 20.0),
            Vec2::new(100.0, 100.0),
            0.0,
            [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE],
        );

        // Row 2: circle family and a sprite.
        renderer.draw_circle(Vec2::new(70.0, 200.0), 50.0, Color::from_srgb_u8(250, 180, 40, 255));
        renderer.draw_circle_outline(Vec2::new(190.0, 200.0), 50.0, Color::WHITE);
        renderer.draw_circle_sector(Vec2::new(310.0, 200.0), 50.0, angle, 270.0, Color::GREEN);
        renderer.draw_ring(Vec2::new(430.0, 200.0), 30.0, 50.0, Color::from_srgb_u8(200, 60, 160, 255));
        renderer.draw_ring_outline(Vec2::new(550.0, 200.0), 30.0, 50.0, Color::WHITE);
        renderer.draw_sprite(checker, Vec2::new(620.0, 150.0), Vec2::new(100.0, 100.0), angle, Color::WHITE);

        // Row 3: text, clipped to its panel.
        if let Some(font) = self.font {
            renderer.draw_text(
                &self.fonts,
                &Text::new("tessel: W wireframe, M msaa, +/- segments", font, 18.0)
                    .at(Vec2::new(20.0, 280.0))
                    .with_color(Color::WHITE),
            );

            let panel = Rect::from_min_size(Vec2::new(20.0, 320.0), Vec2::new(380.0, 180.0));
            renderer.draw_quad_outline(panel.origin, panel.size, 0.0, Color::from_srgb_u8(90, 90, 90, 255));
            renderer.push_clip(panel);
            let area = TextArea::new(Text::new(PARAGRAPH, font, 20.0).with_color(Color::WHITE), panel)
                .aligned(HAlign::Justified, VAlign::Center)
                .styled(TextStyle::WRAP | TextStyle::SHRINK_TO_FIT);
            renderer.draw_text_area(&self.fonts, &area, &mut self.scratch);
            renderer.pop_clip();

            let title = Rect::from_min_size(Vec2::new(420.0, 320.0), Vec2::new(200.0, 40.0));
            renderer.draw_quad(title.origin, title.size, 0.0, Color::from_srgb_u8(30, 30, 60, 255));
            let area = TextArea::new(Text::new("Shrink to fit me", font, 40.0), title)
                .aligned(HAlign::Center, VAlign::Center)
                .styled(TextStyle::SHRINK_TO_FIT);
            renderer.draw_text_area(&self.fonts, &area, &mut self.scratch);
        }

        ctx.present(renderer)
    }

    fn on_exit(&mut self) {
        if let Some(checker) = self.checker.take() {
            checker.destroy();
        }
        if let Some(renderer) = self.renderer.take() {
            renderer.delete();
        }
    }
}
