//! Error types for rendering operations.

use thiserror::Error;

pub type RenderResult<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("invalid color scale: {0}")]
    InvalidScale(String),

    #[error("invalid mesh geometry: {0}")]
    InvalidGeometry(String),

    #[error("PNG encoding failed: {0}")]
    PngEncode(String),

    #[error("font error: {0}")]
    Font(String),
}
