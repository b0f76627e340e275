//! Error types for startup and frame export

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the viewer.
///
/// Everything except [`ViewerError::Screenshot`] is raised during startup and
/// aborts before the window opens.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid configuration: {parameter} = {value}, expected {expected}")]
    InvalidConfiguration {
        parameter: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] ron::Error),

    #[error("failed to save screenshot: {0}")]
    Screenshot(#[from] image::ImageError),
}

impl ViewerError {
    pub fn invalid(parameter: &'static str, value: impl Into<f64>, expected: &'static str) -> Self {
        ViewerError::InvalidConfiguration {
            parameter,
            value: value.into(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
