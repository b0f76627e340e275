//! Core rendering functions
//! Model transform, perspective projection and painter's-order submission

use std::path::Path;

use super::math::{Mat4, Vec3};
use super::types::{Color, ScreenPoint, Triangle, Viewport};
use crate::error::Result;

/// Anything that can fill a solid polygon given in screen coordinates.
///
/// Points are not clamped to the viewport; implementors handle any
/// clipping themselves.
pub trait FillSink {
    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Color);
}

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    #[cfg(test)]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let p = &self.pixels[idx..idx + 4];
            Some(Color { r: p[0], g: p[1], b: p[2], a: p[3] })
        } else {
            None
        }
    }

    /// Fill the inclusive span [x0, x1] on row y, clipped to the buffer
    fn hline(&mut self, x0: i64, x1: i64, y: usize, color: Color) {
        let start = x0.max(0);
        let end = x1.min(self.width as i64 - 1);
        if start > end {
            return;
        }
        let bytes = color.to_bytes();
        let row = y * self.width;
        for x in start as usize..=end as usize {
            let idx = (row + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&bytes);
        }
    }

    /// Write the framebuffer to a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }
}

impl FillSink for Framebuffer {
    /// Even-odd scanline fill, sampling pixel centers
    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Color) {
        if points.len() < 3 || self.width == 0 || self.height == 0 {
            return;
        }

        let mut min_y = i64::MAX;
        let mut max_y = i64::MIN;
        for p in points {
            min_y = min_y.min(p.y as i64);
            max_y = max_y.max(p.y as i64);
        }
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        let n = points.len();
        let mut crossings: Vec<i64> = Vec::with_capacity(n);

        for y in min_y..=max_y {
            crossings.clear();
            let yf = y as f64 + 0.5;

            for i in 0..n {
                let (x1, y1) = (points[i].x as f64, points[i].y as f64);
                let (x2, y2) = (points[(i + 1) % n].x as f64, points[(i + 1) % n].y as f64);
                if (y1 <= yf && y2 > yf) || (y2 <= yf && y1 > yf) {
                    let x = x1 + (yf - y1) / (y2 - y1) * (x2 - x1);
                    crossings.push(x.round() as i64);
                }
            }

            crossings.sort_unstable();
            for pair in crossings.chunks_exact(2) {
                self.hline(pair[0], pair[1] - 1, y as usize, color);
            }
        }
    }
}

/// Apply a model transform, dropping w (no perspective divide)
pub fn transform_point(p: Vec3, m: Mat4) -> Vec3 {
    m.apply(p).truncate()
}

/// Project a view-space point to pixel coordinates.
///
/// When the projected w is exactly zero (the point lies in the camera plane)
/// the divide is skipped and the raw coordinates are mapped as-is. The
/// resulting position is unclamped and effectively arbitrary.
pub fn project_point(p: Vec3, proj: Mat4, viewport: Viewport) -> ScreenPoint {
    let ndc = proj.apply(p).perspective_divide();
    let x = (ndc.x + 1.0) * viewport.width as f32 / 2.0;
    let y = (1.0 - ndc.y) * viewport.height as f32 / 2.0;
    ScreenPoint::new(x as i32, y as i32)
}

/// Average view-space z of a triangle's vertices
pub fn depth_key(tri: &Triangle, transform: Mat4) -> f32 {
    tri.vertices
        .iter()
        .map(|v| transform_point(*v, transform).z)
        .sum::<f32>()
        / 3.0
}

/// Render triangles with the painter's algorithm.
///
/// Triangles are ordered by descending average transformed z and submitted
/// one by one. This is an approximation: interpenetrating or cyclically
/// overlapping triangles are not resolved.
pub fn render<S: FillSink>(
    sink: &mut S,
    triangles: &[Triangle],
    proj: Mat4,
    transform: Mat4,
    viewport: Viewport,
    color: Color,
) {
    let mut order: Vec<(f32, &Triangle)> = triangles
        .iter()
        .map(|tri| (depth_key(tri, transform), tri))
        .collect();

    // Stable: equal depths keep their input order
    order.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (_, tri) in order {
        let screen = tri
            .vertices
            .map(|v| project_point(transform_point(v, transform), proj, viewport));
        sink.fill_polygon(&screen, color);
    }
}
