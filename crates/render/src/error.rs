//! Render error types

use thiserror::Error;

/// Render operation result type
pub type RenderResult<T> = Result<T, RenderError>;

/// Render errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("Invalid pixel format: {0} bits per pixel (expected 8, 16, 24 or 32)")]
    InvalidFormat(u32),

    #[error("Buffer is {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Unknown surface: {0}")]
    UnknownSurface(u32),

    #[error("Unknown texture: {0}")]
    UnknownTexture(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<String> for RenderError {
    fn from(err: String) -> Self {
        RenderError::Sdl(err)
    }
}
