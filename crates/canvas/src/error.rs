//! Canvas error types

use std::path::PathBuf;

use sdlcanvas_render::RenderError;
use thiserror::Error;

/// Canvas operation result type
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Canvas errors
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("The buffer must be the same size as the canvas resolution times the number of bytes per pixel ({expected}), got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("The bit per pixel must be 8, 16, 24 or 32, got {0}")]
    InvalidFormat(u32),

    #[error("Mode conflict: {0}")]
    ModeConflict(&'static str),

    #[error("Unknown {kind}: {id}")]
    UnknownResource { kind: ResourceKind, id: String },

    #[error("{kind} already exists: {id}")]
    DuplicateResource { kind: ResourceKind, id: String },

    #[error("Cannot find the file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("The canvas has been closed")]
    Closed,

    #[error("Render error: {0}")]
    Render(RenderError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Kinds of named resources a canvas keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Layer,
    Font,
    Texture,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Layer => write!(f, "layer"),
            ResourceKind::Font => write!(f, "font"),
            ResourceKind::Texture => write!(f, "texture"),
        }
    }
}

impl CanvasError {
    pub fn unknown(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self::UnknownResource {
            kind,
            id: id.into(),
        }
    }

    pub fn duplicate(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self::DuplicateResource {
            kind,
            id: id.into(),
        }
    }
}

impl From<RenderError> for CanvasError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::InvalidFormat(bits) => CanvasError::InvalidFormat(bits),
            RenderError::BufferSize { expected, actual } => {
                CanvasError::SizeMismatch { expected, actual }
            }
            RenderError::UnknownTexture(id) => CanvasError::unknown(ResourceKind::Texture, id),
            other => CanvasError::Render(other),
        }
    }
}
