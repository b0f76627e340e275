//! Software rasterizer
//!
//! Features:
//! - Homogeneous 4x4 transforms with an OpenGL-style perspective projection
//! - Painter's algorithm (no z-buffer, no clipping)
//! - Solid-color polygon fill into an RGBA framebuffer

mod math;
mod types;
mod render;

pub use math::*;
pub use types::*;
pub use render::*;
