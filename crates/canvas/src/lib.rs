//! sdlcanvas
//!
//! A 2D drawing canvas on top of SDL2: primitives, text, images and raw
//! pixel buffers, composited from named layers and driven by a frame loop.

mod attach;
mod canvas;
mod error;
mod event;
mod frame;
mod image_io;
mod layer;
mod options;
mod path;
mod registry;

pub use canvas::{convert_polar_coords, Anchors, Canvas};
pub use error::{CanvasError, CanvasResult, ResourceKind};
pub use frame::{FrameCallback, ModeKind};
pub use layer::{Direction, LayerInfo};
pub use options::{CanvasOptions, WindowMode, WindowPosition};
pub use path::{Path, PathBuilder, Waypoint};

pub use sdlcanvas_render::{
    InputEvent, PixelFormat, Position, RecordingBackend, RenderBackend, Resolution, RgbaColor, SdlBackend,
};
