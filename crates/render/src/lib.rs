//! sdlcanvas render layer
//!
//! Paint commands, render targets and the backends that execute them.

mod display_list;
mod error;
mod event;
mod font;
mod paint;
mod recording;
mod sdl_backend;

pub use display_list::{DisplayList, PaintCommand, SurfaceId, Target};
pub use error::{RenderError, RenderResult};
pub use event::{InputEvent, PressedKeys};
pub use font::{FontCache, GlyphData, TextBitmap};
pub use paint::{arc_points, from_angle, ImagePixels, PixelFormat, Position, Resolution, RgbaColor, ARC_PRECISION};
pub use recording::{Presented, RecordingBackend};
pub use sdl_backend::{SdlBackend, WindowSettings, WindowState};

/// Trait for render backends.
///
/// All coordinates and sizes are device pixels. Surfaces (the main one and
/// every layer) are `width() x height()` and keep their content until they
/// are cleared or destroyed.
pub trait RenderBackend {
    /// Device width of every surface
    fn width(&self) -> u32;

    /// Device height of every surface
    fn height(&self) -> u32;

    /// Allocate an off-screen surface
    fn create_surface(&mut self, format: PixelFormat) -> RenderResult<SurfaceId>;

    /// Release an off-screen surface
    fn destroy_surface(&mut self, id: SurfaceId) -> RenderResult<()>;

    /// Execute one paint command against a target
    fn execute(&mut self, target: Target, command: &PaintCommand) -> RenderResult<()>;

    /// Execute a display list in order
    fn render(&mut self, target: Target, display_list: &DisplayList) -> RenderResult<()> {
        for command in &display_list.commands {
            self.execute(target, command)?;
        }
        Ok(())
    }

    /// Replace a target's content with a raw `width x height` buffer, stretched to fit
    fn write_pixels(
        &mut self,
        target: Target,
        pixels: &[u8],
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> RenderResult<()>;

    /// Keep decoded pixels under an id for later `PaintCommand::Texture` blits
    fn upload_texture(&mut self, id: &str, image: ImagePixels) -> RenderResult<()>;

    /// Blend the main surface and then `layers`, bottom first, into the frame
    fn compose(&mut self, layers: &[SurfaceId]) -> RenderResult<()>;

    /// Read the last composed frame as a `width x height` buffer
    fn read_pixels(&mut self, format: PixelFormat, width: u32, height: u32) -> RenderResult<Vec<u8>>;

    /// Show the last composed frame
    fn present(&mut self) -> RenderResult<()>;

    /// Toggle smoothing when scaling and blitting
    fn set_anti_aliasing(&mut self, enabled: bool);

    /// Show or hide the window
    fn set_visible(&mut self, visible: bool);

    /// Drain pending input events
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Mouse cursor position in device coordinates
    fn mouse_position(&self) -> (i32, i32);

    /// Resolution of the primary display
    fn screen_resolution(&self) -> RenderResult<Resolution>;
}
