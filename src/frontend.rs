//! macroquad glue: window setup, keyboard input, framebuffer presentation

use macroquad::input::{is_key_down, is_key_pressed, is_quit_requested, KeyCode};
use macroquad::math::Vec2;
use macroquad::texture::{draw_texture_ex, DrawTextureParams, FilterMode, Texture2D};
use macroquad::window::{screen_height, screen_width, Conf};
use tracing::{info, warn};

use crate::app::{Direction, DisplaySurface, InputSource};
use crate::config::ViewerConfig;
use crate::rasterizer::{Color, FillSink, Framebuffer, ScreenPoint, Viewport};
use crate::VERSION;

pub fn window_conf(config: &ViewerConfig) -> Conf {
    Conf {
        window_title: format!("Helix Viewer v{}", VERSION),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: false,
        high_dpi: true,
        ..Default::default()
    }
}

/// Software framebuffer shown through a single GPU texture
pub struct Screen {
    fb: Framebuffer,
    texture: Texture2D,
}

impl Screen {
    pub fn new(viewport: Viewport) -> Self {
        let fb = Framebuffer::new(viewport.width, viewport.height);
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);
        Self { fb, texture }
    }

    /// Save the last drawn frame as a PNG
    pub fn save_screenshot(&self, frame: u64) {
        let path = format!("screenshot-{:06}.png", frame);
        match self.fb.save_png(&path) {
            Ok(()) => info!(path = %path, "saved screenshot"),
            Err(e) => warn!(path = %path, error = %e, "screenshot failed"),
        }
    }
}

impl FillSink for Screen {
    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Color) {
        self.fb.fill_polygon(points, color);
    }
}

impl DisplaySurface for Screen {
    fn clear(&mut self, color: Color) {
        self.fb.clear(color);
    }

    /// Upload the framebuffer and stretch it over the window
    fn present(&mut self) {
        self.texture
            .update_from_bytes(self.fb.width as u32, self.fb.height as u32, &self.fb.pixels);
        draw_texture_ex(
            &self.texture,
            0.0,
            0.0,
            macroquad::color::WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(screen_width(), screen_height())),
                ..Default::default()
            },
        );
    }

    fn viewport(&self) -> Viewport {
        self.fb.viewport()
    }
}

/// Arrow keys and the window close button
pub struct MacroquadInput;

impl MacroquadInput {
    pub fn screenshot_requested(&self) -> bool {
        is_key_pressed(KeyCode::F12)
    }
}

impl InputSource for MacroquadInput {
    fn quit_requested(&mut self) -> bool {
        is_quit_requested()
    }

    fn is_down(&self, key: Direction) -> bool {
        let code = match key {
            Direction::Left => KeyCode::Left,
            Direction::Right => KeyCode::Right,
            Direction::Up => KeyCode::Up,
            Direction::Down => KeyCode::Down,
        };
        is_key_down(code)
    }
}
