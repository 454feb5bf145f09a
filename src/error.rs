//! Error types for the viewer

use thiserror::Error;

/// Result type for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Errors that can occur while setting up or driving the viewer
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("window error: {0}")]
    Window(String),

    #[error("invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),

    #[error("invalid subdivision count {value}: expected {min}..={max}")]
    InvalidSubdivision { value: u32, min: u32, max: u32 },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JS error: {0}")]
    Js(String),
}

impl From<three_d::WindowError> for ViewerError {
    fn from(err: three_d::WindowError) -> Self {
        ViewerError::Window(err.to_string())
    }
}
