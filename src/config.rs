//! Viewer configuration
//!
//! Uses RON (Rusty Object Notation) for a human-readable config file.
//! Every field is optional; missing ones take the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::rasterizer::{Color, Mat4, Viewport};
use crate::surface::SurfaceParams;

/// Config file looked up when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "assets/viewer.ron";

/// Largest window side; the framebuffer texture takes `u16` dimensions
pub const MAX_DIMENSION: usize = u16::MAX as usize;

/// Distance the surface is pushed down -z, in model units
pub const CAMERA_DISTANCE: f32 = 30.0;

/// Startup configuration, fixed for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: usize,
    pub height: usize,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub surface: SurfaceParams,
    /// Radians added per tick while an arrow key is held
    pub rotation_step: f32,
    pub ticks_per_second: u32,
    pub background: Color,
    pub surface_color: Color,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fov_degrees: 90.0,
            near: 0.1,
            far: 1000.0,
            surface: SurfaceParams::default(),
            rotation_step: 0.05,
            ticks_per_second: 30,
            background: Color::new(10, 10, 10),
            surface_color: Color::new(0, 200, 255),
        }
    }
}

impl ViewerConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Check every startup constant. Projection parameters are checked by
    /// building the matrix, so there is a single source of truth for them.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DIMENSION).contains(&self.width) {
            return Err(ViewerError::invalid("width", self.width as f64, "1 to 65535 pixels"));
        }
        if !(1..=MAX_DIMENSION).contains(&self.height) {
            return Err(ViewerError::invalid("height", self.height as f64, "1 to 65535 pixels"));
        }
        if self.ticks_per_second == 0 {
            return Err(ViewerError::invalid("ticks_per_second", self.ticks_per_second, "at least 1"));
        }
        if !self.rotation_step.is_finite() {
            return Err(ViewerError::invalid("rotation_step", self.rotation_step, "a finite value"));
        }
        self.surface.validate()?;
        self.projection()?;
        Ok(())
    }

    pub fn projection(&self) -> Result<Mat4> {
        Mat4::perspective(self.fov_degrees, self.viewport().aspect(), self.near, self.far)
    }

    /// Parse a config from a RON string
    pub fn from_ron_str(s: &str, origin: &Path) -> Result<Self> {
        ron::from_str(s).map_err(|source| ViewerError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load a config from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ViewerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents, path)
    }

    /// Resolve the config source: an explicit path must exist, the default
    /// path is optional. Returns the path actually read, if any.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
        match explicit {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Ok((Self::load(&default)?, Some(default)))
                } else {
                    Ok((Self::default(), None))
                }
            }
        }
    }

    /// Serialize to pretty RON (used to write a starter config)
    pub fn to_ron_string(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, config)?)
    }
}
