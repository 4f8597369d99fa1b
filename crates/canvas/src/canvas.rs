//! Canvas façade
//!
//! Owns the backend, the layer registry and the resource tables, and routes
//! every draw call to the currently selected layer or the main surface.

use std::path::Path;
use std::rc::Rc;

use image::ImageFormat;
use log::{debug, info, warn};

use sdlcanvas_render::{
    DisplayList, PaintCommand, PixelFormat, Position, RenderBackend, Resolution, RgbaColor, SdlBackend,
    Target, WindowSettings,
};

use crate::error::{CanvasError, CanvasResult, ResourceKind};
use crate::event::EventHandlers;
use crate::frame::Mode;
use crate::image_io::{load_image, save_rgba};
use crate::layer::{Direction, LayerInfo, LayerRegistry};
use crate::options::{CanvasOptions, WindowPosition};
use crate::path::Path as DrawPath;
use crate::registry::{FontRegistry, TextureEntry, TextureRegistry};

/// Nine fixed reference positions, computed from the size at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchors {
    pub top_left: Position,
    pub top_center: Position,
    pub top_right: Position,
    pub center_left: Position,
    pub center: Position,
    pub center_right: Position,
    pub bottom_left: Position,
    pub bottom_center: Position,
    pub bottom_right: Position,
}

impl Anchors {
    fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            top_left: Position::new(0.0, 0.0),
            top_center: Position::new(w / 2.0, 0.0),
            top_right: Position::new(w, 0.0),
            center_left: Position::new(0.0, h / 2.0),
            center: Position::new(w / 2.0, h / 2.0),
            center_right: Position::new(w, h / 2.0),
            bottom_left: Position::new(0.0, h),
            bottom_center: Position::new(w / 2.0, h),
            bottom_right: Position::new(w, h),
        }
    }
}

/// Convert polar coordinates around `center` into a position
pub fn convert_polar_coords(center: Position, angle: f32, radius: f32) -> Position {
    Position::new(
        center.x + angle.cos() * radius,
        center.y + angle.sin() * radius,
    )
}

/// A drawing canvas over a render backend
pub struct Canvas<B: RenderBackend = SdlBackend> {
    pub(crate) backend: Option<B>,
    width: u32,
    height: u32,
    scale: u32,
    pub(crate) bit_per_pixel: PixelFormat,
    anti_aliasing: bool,
    pub(crate) layers: LayerRegistry,
    fonts: FontRegistry,
    textures: TextureRegistry,
    pub(crate) events: EventHandlers,
    pub(crate) mode: Mode<B>,
    pub(crate) quit_requested: bool,
    anchors: Anchors,
}

impl Canvas<SdlBackend> {
    /// Open a window and create a canvas of `width x height` logical pixels
    pub fn new(
        title: &str,
        width: u32,
        height: u32,
        position: WindowPosition,
        options: CanvasOptions,
    ) -> CanvasResult<Self> {
        let options = options.normalized();
        let settings = WindowSettings {
            title: title.to_string(),
            width,
            height,
            scale: options.scale,
            position: position.coordinates(),
            state: options.mode.into(),
            resizable: options.resizable,
            borderless: options.remove_window_decoration,
            anti_aliasing: options.anti_aliasing,
        };
        let backend = SdlBackend::new(&settings)?;
        Ok(Self::with_backend(backend, width, height, options))
    }
}

impl<B: RenderBackend> Canvas<B> {
    /// Create a canvas over an existing backend
    pub fn with_backend(mut backend: B, width: u32, height: u32, options: CanvasOptions) -> Self {
        let options = options.normalized();
        backend.set_anti_aliasing(options.anti_aliasing);
        debug!(
            "Canvas {}x{} (scale {}, anti-aliasing {})",
            width, height, options.scale, options.anti_aliasing
        );
        Self {
            backend: Some(backend),
            width,
            height,
            scale: options.scale,
            bit_per_pixel: PixelFormat::Rgba8888,
            anti_aliasing: options.anti_aliasing,
            layers: LayerRegistry::new(),
            fonts: FontRegistry::default(),
            textures: TextureRegistry::default(),
            events: EventHandlers::default(),
            mode: Mode::Idle,
            quit_requested: false,
            anchors: Anchors::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Bit depth of the last raw buffer loaded or attached (32 until then)
    pub fn bit_per_pixel(&self) -> u32 {
        self.bit_per_pixel.bits_per_pixel()
    }

    pub fn anchors(&self) -> &Anchors {
        &self.anchors
    }

    pub fn anti_aliasing(&self) -> bool {
        self.anti_aliasing
    }

    pub fn set_anti_aliasing(&mut self, enabled: bool) -> CanvasResult<()> {
        self.backend_mut()?.set_anti_aliasing(enabled);
        self.anti_aliasing = enabled;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.backend.is_none()
    }

    /// The backend, until the canvas is closed
    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub(crate) fn backend_mut(&mut self) -> CanvasResult<&mut B> {
        self.backend.as_mut().ok_or(CanvasError::Closed)
    }

    /// Backend for a normal draw call; drawing is refused while a buffer is attached
    fn drawing_backend(&mut self) -> CanvasResult<&mut B> {
        if self.backend.is_some() && self.mode.is_attached() {
            return Err(CanvasError::ModeConflict(
                "video buffer is attached, use detach to free the video buffer",
            ));
        }
        self.backend_mut()
    }

    fn draw(&mut self, command: PaintCommand) -> CanvasResult<()> {
        let target = self.layers.target();
        self.drawing_backend()?.execute(target, &command)?;
        Ok(())
    }

    fn device(&self, position: Position) -> (i32, i32) {
        position.to_device(self.scale)
    }

    fn device_len(&self, len: f32) -> f32 {
        len * self.scale as f32
    }

    pub fn show(&mut self) -> CanvasResult<()> {
        self.backend_mut()?.set_visible(true);
        Ok(())
    }

    pub fn hide(&mut self) -> CanvasResult<()> {
        self.backend_mut()?.set_visible(false);
        Ok(())
    }

    /// Fill the current layer with a color
    pub fn set_background_color(&mut self, color: RgbaColor) -> CanvasResult<()> {
        self.draw(PaintCommand::Clear { color })
    }

    /// Fill the current layer with opaque black
    pub fn clear(&mut self) -> CanvasResult<()> {
        self.set_background_color(RgbaColor::BLACK)
    }

    /// Clear the main surface and every layer
    pub fn clear_all(&mut self) -> CanvasResult<()> {
        let targets: Vec<Target> = std::iter::once(Target::Main)
            .chain(self.layers.surfaces().map(Target::Surface))
            .collect();
        let backend = self.drawing_backend()?;
        let clear = PaintCommand::Clear {
            color: RgbaColor::BLACK,
        };
        for target in targets {
            backend.execute(target, &clear)?;
        }
        Ok(())
    }

    pub fn draw_point(&mut self, color: RgbaColor, position: Position) -> CanvasResult<()> {
        let (x, y) = self.device(position);
        self.draw(PaintCommand::Point { x, y, color })
    }

    pub fn draw_line(&mut self, color: RgbaColor, from: Position, to: Position) -> CanvasResult<()> {
        let (x1, y1) = self.device(from);
        let (x2, y2) = self.device(to);
        self.draw(PaintCommand::Line {
            x1,
            y1,
            x2,
            y2,
            color,
        })
    }

    /// Draw a rectangle with its top left corner at `position`
    pub fn draw_rectangle(
        &mut self,
        color: RgbaColor,
        position: Position,
        width: f32,
        height: f32,
        fill: bool,
    ) -> CanvasResult<()> {
        let (x, y) = self.device(position);
        let w = self.device_len(width).max(0.0) as u32;
        let h = self.device_len(height).max(0.0) as u32;
        self.draw(PaintCommand::Rect {
            x,
            y,
            w,
            h,
            color,
            fill,
        })
    }

    /// Draw an arc from `start` to `end` (radians)
    pub fn draw_arc(
        &mut self,
        color: RgbaColor,
        center: Position,
        radius: f32,
        start: f32,
        end: f32,
    ) -> CanvasResult<()> {
        let (cx, cy) = self.device(center);
        let radius = self.device_len(radius) as i32;
        self.draw(PaintCommand::Arc {
            cx,
            cy,
            radius,
            start,
            end,
            color,
        })
    }

    /// Draw a line of text with a font registered through `load_font`
    pub fn draw_text(
        &mut self,
        text: &str,
        font_name: &str,
        size: f32,
        color: RgbaColor,
        start: Position,
    ) -> CanvasResult<()> {
        let font = self.fonts.lookup(font_name)?.to_path_buf();
        let (x, y) = self.device(start);
        let size = self.device_len(size);
        self.draw(PaintCommand::Text {
            text: text.to_string(),
            font,
            size,
            x,
            y,
            color,
        })
    }

    /// Draw a texture with its top left corner at `position`
    pub fn draw_texture(&mut self, id: &str, position: Position) -> CanvasResult<()> {
        let resolution = self.textures.lookup(id)?.resolution;
        let (x, y) = self.device(position);
        self.draw(PaintCommand::Texture {
            id: id.to_string(),
            x,
            y,
            w: resolution.w * self.scale,
            h: resolution.h * self.scale,
        })
    }

    /// Stroke a path shifted by `offset`. Without `color`, each segment takes
    /// the color of its end waypoint.
    pub fn draw_path(
        &mut self,
        path: &DrawPath,
        offset: Position,
        color: Option<RgbaColor>,
    ) -> CanvasResult<()> {
        let mut list = DisplayList::new();
        for (from, to) in path.segments() {
            let (x1, y1) = self.device(from.position.offset(offset));
            let (x2, y2) = self.device(to.position.offset(offset));
            list.push(PaintCommand::Line {
                x1,
                y1,
                x2,
                y2,
                color: color.unwrap_or(to.color),
            });
        }
        let target = self.layers.target();
        self.drawing_backend()?.render(target, &list)?;
        Ok(())
    }

    /// Expected byte length of a raw buffer in `format`
    pub(crate) fn raw_len(&self, format: PixelFormat) -> usize {
        format.buffer_len(self.width, self.height)
    }

    /// Validate a raw buffer against the canvas size
    pub(crate) fn check_raw(&self, len: usize, bit_per_pixel: u32) -> CanvasResult<PixelFormat> {
        let format = PixelFormat::try_from(bit_per_pixel)?;
        let expected = self.raw_len(format);
        if len != expected {
            return Err(CanvasError::SizeMismatch {
                expected,
                actual: len,
            });
        }
        Ok(format)
    }

    /// Replace the current layer's content with a raw buffer.
    ///
    /// Consider `attach` to stream raw data every frame.
    pub fn load_raw_data(&mut self, pixels: &[u8], bit_per_pixel: u32) -> CanvasResult<()> {
        let format = self.check_raw(pixels.len(), bit_per_pixel)?;
        let (width, height) = (self.width, self.height);
        let target = self.layers.target();
        self.drawing_backend()?
            .write_pixels(target, pixels, format, width, height)?;
        self.bit_per_pixel = format;
        Ok(())
    }

    /// The composited frame in the current pixel format
    pub fn get_raw_data(&mut self) -> CanvasResult<Vec<u8>> {
        let format = self.bit_per_pixel;
        self.frame_pixels(format)
    }

    fn frame_pixels(&mut self, format: PixelFormat) -> CanvasResult<Vec<u8>> {
        let layers = self.layers.active_surfaces();
        let (width, height) = (self.width, self.height);
        let backend = self.backend_mut()?;
        backend.compose(&layers)?;
        Ok(backend.read_pixels(format, width, height)?)
    }

    /// Composite every active layer over the main surface and show the result
    pub fn present(&mut self) -> CanvasResult<()> {
        let layers = self.layers.active_surfaces();
        let backend = self.backend_mut()?;
        backend.compose(&layers)?;
        backend.present()?;
        Ok(())
    }

    /// Draw a PNG image over the whole current layer
    pub fn load_png(&mut self, path: impl AsRef<Path>) -> CanvasResult<()> {
        self.load_picture(path.as_ref())
    }

    /// Draw a JPEG image over the whole current layer
    pub fn load_jpg(&mut self, path: impl AsRef<Path>) -> CanvasResult<()> {
        self.load_picture(path.as_ref())
    }

    fn load_picture(&mut self, path: &Path) -> CanvasResult<()> {
        let pixels = load_image(path)?;
        self.draw(PaintCommand::Image {
            pixels: Rc::new(pixels),
            x: 0,
            y: 0,
            w: self.width * self.scale,
            h: self.height * self.scale,
        })
    }

    /// Save the composited frame as PNG
    pub fn dump_png(&mut self, path: impl AsRef<Path>) -> CanvasResult<()> {
        self.dump(path.as_ref(), ImageFormat::Png)
    }

    /// Save the composited frame as JPEG
    pub fn dump_jpg(&mut self, path: impl AsRef<Path>) -> CanvasResult<()> {
        self.dump(path.as_ref(), ImageFormat::Jpeg)
    }

    fn dump(&mut self, path: &Path, format: ImageFormat) -> CanvasResult<()> {
        let rgba = self.frame_pixels(PixelFormat::Rgba8888)?;
        save_rgba(path, &rgba, self.width, self.height, format)
    }

    /// Register a TrueType font under a name
    pub fn load_font(&mut self, name: &str, path: impl AsRef<Path>) -> CanvasResult<()> {
        if self.is_closed() {
            return Err(CanvasError::Closed);
        }
        let path = path.as_ref();
        self.fonts.register(name, path)?;
        debug!("Registered font '{}' from {}", name, path.display());
        Ok(())
    }

    /// Decode an image file and keep it as a texture
    pub fn load_texture(&mut self, id: &str, path: impl AsRef<Path>) -> CanvasResult<()> {
        let path = path.as_ref();
        if self.textures.contains(id) {
            return Err(CanvasError::duplicate(ResourceKind::Texture, id));
        }
        let pixels = load_image(path)?;
        let resolution = pixels.resolution();
        self.backend_mut()?.upload_texture(id, pixels)?;
        self.textures.insert(
            id,
            TextureEntry {
                path: path.to_path_buf(),
                resolution,
            },
        )?;
        debug!(
            "Loaded texture '{}' ({}x{}) from {}",
            id,
            resolution.w,
            resolution.h,
            path.display()
        );
        Ok(())
    }

    pub fn texture_resolution(&self, id: &str) -> CanvasResult<Resolution> {
        Ok(self.textures.lookup(id)?.resolution)
    }

    pub fn screen_resolution(&self) -> CanvasResult<Resolution> {
        let backend = self.backend.as_ref().ok_or(CanvasError::Closed)?;
        Ok(backend.screen_resolution()?)
    }

    /// Mouse position in logical coordinates
    pub fn mouse_position(&self) -> CanvasResult<Position> {
        let backend = self.backend.as_ref().ok_or(CanvasError::Closed)?;
        let (x, y) = backend.mouse_position();
        let s = self.scale as f32;
        Ok(Position::new(x as f32 / s, y as f32 / s))
    }

    /// Add a layer on top of the stack, filled with `background`.
    ///
    /// Drawing continues on the main surface. Fails while a buffer is attached.
    pub fn add_layer(&mut self, id: &str, bit_per_pixel: u32, background: RgbaColor) -> CanvasResult<()> {
        let format = PixelFormat::try_from(bit_per_pixel)?;
        if self.layers.contains(id) {
            return Err(CanvasError::duplicate(ResourceKind::Layer, id));
        }
        let backend = self.drawing_backend()?;
        let surface = backend.create_surface(format)?;
        let clear = PaintCommand::Clear { color: background };
        if let Err(e) = backend.execute(Target::Surface(surface), &clear) {
            if let Err(release) = backend.destroy_surface(surface) {
                warn!("Failed to release surface for layer '{}': {}", id, release);
            }
            return Err(e.into());
        }
        self.layers.insert(id, format, surface)?;
        self.use_main_layer();
        debug!("Added layer '{}' ({} bpp, {} layers)", id, bit_per_pixel, self.layers.len());
        Ok(())
    }

    /// Send subsequent draw calls to a layer
    pub fn change_layer(&mut self, id: &str) -> CanvasResult<()> {
        self.layers.select(id)
    }

    /// Send subsequent draw calls to the main surface
    pub fn use_main_layer(&mut self) {
        self.layers.select_main();
    }

    /// Id of the layer receiving draw calls, `None` for the main surface
    pub fn current_layer(&self) -> Option<&str> {
        self.layers.current()
    }

    pub fn remove_layer(&mut self, id: &str) -> CanvasResult<()> {
        if self.is_closed() {
            return Err(CanvasError::Closed);
        }
        let layer = self.layers.remove(id)?;
        self.backend_mut()?.destroy_surface(layer.surface)?;
        debug!("Removed layer '{}'", id);
        Ok(())
    }

    /// Render the layer again when presenting
    pub fn activate_layer(&mut self, id: &str) -> CanvasResult<()> {
        self.layers.set_active(id, true)
    }

    /// Skip the layer when presenting; its pixels are kept
    pub fn deactivate_layer(&mut self, id: &str) -> CanvasResult<()> {
        self.layers.set_active(id, false)
    }

    /// Change a layer's drawing priority by `steps` positions
    pub fn move_layer(&mut self, id: &str, direction: Direction, steps: usize) -> CanvasResult<()> {
        self.layers.move_layer(id, direction, steps)
    }

    /// Every layer, back to front (the first entry is drawn right above the main surface)
    pub fn layers(&self) -> Vec<LayerInfo> {
        self.layers.snapshot()
    }

    pub fn on_click(&mut self, handler: impl FnMut(f32, f32) + 'static) {
        self.events.on_click(handler);
    }

    pub fn on_key_down(&mut self, handler: impl FnMut(&str) + 'static) {
        self.events.on_key_down(handler);
    }

    pub fn on_key_up(&mut self, handler: impl FnMut(&str) + 'static) {
        self.events.on_key_up(handler);
    }

    pub fn on_keys_down(&mut self, handler: impl FnMut(&[String]) + 'static) {
        self.events.on_keys_down(handler);
    }

    pub fn on_keys_up(&mut self, handler: impl FnMut(&[String]) + 'static) {
        self.events.on_keys_up(handler);
    }

    /// Stop any loop or attachment and release the window and every layer
    pub fn close(&mut self) {
        self.end_loop();
        self.detach();
        if let Some(mut backend) = self.backend.take() {
            for layer in self.layers.drain() {
                if let Err(e) = backend.destroy_surface(layer.surface) {
                    warn!("Failed to release layer '{}': {}", layer.id, e);
                }
            }
            info!("Canvas closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path as DrawPath;
    use sdlcanvas_render::{RecordingBackend, SurfaceId};
    use std::f32::consts::PI;

    fn canvas(width: u32, height: u32, scale: u32) -> Canvas<RecordingBackend> {
        let options = CanvasOptions {
            scale,
            ..CanvasOptions::default()
        };
        Canvas::with_backend(
            RecordingBackend::new(width * scale, height * scale),
            width,
            height,
            options,
        )
    }

    fn commands(canvas: &Canvas<RecordingBackend>) -> Vec<(Target, PaintCommand)> {
        canvas.backend().unwrap().commands.clone()
    }

    fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_draw_rectangle_unscaled() {
        let mut canvas = canvas(900, 800, 1);
        canvas
            .draw_rectangle(RgbaColor::WHITE, Position::new(450.0, 400.0), 20.0, 30.0, false)
            .unwrap();
        assert_eq!(
            commands(&canvas),
            vec![(
                Target::Main,
                PaintCommand::Rect {
                    x: 450,
                    y: 400,
                    w: 20,
                    h: 30,
                    color: RgbaColor::WHITE,
                    fill: false,
                }
            )]
        );
    }

    #[test]
    fn test_draw_rectangle_scaled() {
        let mut canvas = canvas(900, 800, 2);
        canvas
            .draw_rectangle(RgbaColor::WHITE, Position::new(450.0, 400.0), 20.0, 30.0, true)
            .unwrap();
        assert_eq!(
            commands(&canvas)[0].1,
            PaintCommand::Rect {
                x: 900,
                y: 800,
                w: 40,
                h: 60,
                color: RgbaColor::WHITE,
                fill: true,
            }
        );
    }

    #[test]
    fn test_point_line_arc_scaled() {
        let mut canvas = canvas(100, 100, 3);
        canvas.draw_point(RgbaColor::RED, Position::new(1.0, 2.0)).unwrap();
        canvas
            .draw_line(RgbaColor::GREEN, Position::new(0.0, 0.0), Position::new(10.0, 5.0))
            .unwrap();
        canvas
            .draw_arc(RgbaColor::BLUE, Position::new(50.0, 50.0), 10.0, 0.0, PI)
            .unwrap();
        let recorded = commands(&canvas);
        assert_eq!(
            recorded[0].1,
            PaintCommand::Point {
                x: 3,
                y: 6,
                color: RgbaColor::RED
            }
        );
        assert_eq!(
            recorded[1].1,
            PaintCommand::Line {
                x1: 0,
                y1: 0,
                x2: 30,
                y2: 15,
                color: RgbaColor::GREEN
            }
        );
        assert_eq!(
            recorded[2].1,
            PaintCommand::Arc {
                cx: 150,
                cy: 150,
                radius: 30,
                start: 0.0,
                end: PI,
                color: RgbaColor::BLUE
            }
        );
    }

    #[test]
    fn test_anchors() {
        let canvas = canvas(900, 800, 2);
        let anchors = canvas.anchors();
        assert_eq!(anchors.top_left, Position::new(0.0, 0.0));
        assert_eq!(anchors.center, Position::new(450.0, 400.0));
        assert_eq!(anchors.bottom_right, Position::new(900.0, 800.0));
        assert_eq!(anchors.center_right, Position::new(900.0, 400.0));
        assert_eq!(anchors.bottom_center, Position::new(450.0, 800.0));
    }

    #[test]
    fn test_polar_coords() {
        let p = convert_polar_coords(Position::new(10.0, 10.0), 0.0, 5.0);
        assert_eq!(p, Position::new(15.0, 10.0));
        let q = convert_polar_coords(Position::new(0.0, 0.0), PI / 2.0, 2.0);
        assert!(q.x.abs() < 1e-5);
        assert!((q.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_raw_data_roundtrip_all_formats() {
        for bits in [8u32, 16, 24, 32] {
            let mut canvas = canvas(4, 3, 1);
            let len = 4 * 3 * (bits as usize / 8);
            let pixels: Vec<u8> = (0..len).map(|i| i as u8).collect();
            canvas.load_raw_data(&pixels, bits).unwrap();
            assert_eq!(canvas.bit_per_pixel(), bits);
            let frame = canvas.get_raw_data().unwrap();
            assert_eq!(frame.len(), len);
            assert_eq!(frame, pixels);
        }
    }

    #[test]
    fn test_raw_data_size_mismatch_leaves_state() {
        let mut canvas = canvas(4, 3, 1);
        let result = canvas.load_raw_data(&[0; 47], 32);
        assert!(matches!(
            result,
            Err(CanvasError::SizeMismatch {
                expected: 48,
                actual: 47
            })
        ));
        assert_eq!(canvas.bit_per_pixel(), 32);
        assert!(canvas.backend().unwrap().raw_writes.is_empty());
    }

    #[test]
    fn test_raw_data_invalid_format() {
        let mut canvas = canvas(4, 3, 1);
        let result = canvas.load_raw_data(&[0; 12], 12);
        assert!(matches!(result, Err(CanvasError::InvalidFormat(12))));
    }

    #[test]
    fn test_add_layer_clears_and_returns_to_main() {
        let mut canvas = canvas(10, 10, 1);
        canvas.add_layer("hud", 32, RgbaColor::BLUE).unwrap();
        assert_eq!(canvas.current_layer(), None);
        let recorded = commands(&canvas);
        assert_eq!(recorded.len(), 1);
        assert!(matches!(recorded[0].0, Target::Surface(_)));
        assert_eq!(
            recorded[0].1,
            PaintCommand::Clear {
                color: RgbaColor::BLUE
            }
        );

        canvas.draw_point(RgbaColor::RED, Position::new(1.0, 1.0)).unwrap();
        assert_eq!(commands(&canvas)[1].0, Target::Main);
    }

    #[test]
    fn test_layer_dispatch() {
        let mut canvas = canvas(10, 10, 1);
        canvas.add_layer("a", 16, RgbaColor::BLACK).unwrap();
        canvas.change_layer("a").unwrap();
        canvas.draw_point(RgbaColor::RED, Position::new(1.0, 1.0)).unwrap();
        let layer_target = commands(&canvas)[0].0;
        assert_eq!(commands(&canvas)[1].0, layer_target);
        canvas.use_main_layer();
        canvas.draw_point(RgbaColor::RED, Position::new(1.0, 1.0)).unwrap();
        assert_eq!(commands(&canvas)[2].0, Target::Main);
        assert!(matches!(
            canvas.change_layer("missing"),
            Err(CanvasError::UnknownResource {
                kind: ResourceKind::Layer,
                ..
            })
        ));
    }

    #[test]
    fn test_add_remove_add_layer() {
        let mut canvas = canvas(10, 10, 1);
        canvas.add_layer("a", 32, RgbaColor::BLACK).unwrap();
        assert!(canvas.add_layer("a", 32, RgbaColor::BLACK).is_err());
        canvas.remove_layer("a").unwrap();
        assert!(canvas.layers().is_empty());
        assert!(canvas.backend().unwrap().surfaces.is_empty());
        canvas.add_layer("a", 8, RgbaColor::BLACK).unwrap();
        assert_eq!(canvas.layers().len(), 1);
        assert_eq!(canvas.layers()[0].format, PixelFormat::Rgb332);
    }

    #[test]
    fn test_add_layer_refused_while_attached() {
        let mut canvas = canvas(4, 2, 1);
        canvas.attach(vec![0; 32], 32).unwrap();
        assert!(matches!(
            canvas.add_layer("hud", 32, RgbaColor::BLUE),
            Err(CanvasError::ModeConflict(_))
        ));
        assert!(canvas.layers().is_empty());
        assert_eq!(canvas.current_layer(), None);
        assert!(canvas.backend().unwrap().surfaces.is_empty());

        canvas.detach();
        canvas.draw_point(RgbaColor::RED, Position::default()).unwrap();
        assert_eq!(commands(&canvas)[0].0, Target::Main);
    }

    #[test]
    fn test_add_layer_from_another_layer_returns_to_main() {
        let mut canvas = canvas(10, 10, 1);
        canvas.add_layer("a", 32, RgbaColor::BLACK).unwrap();
        canvas.change_layer("a").unwrap();
        canvas.add_layer("b", 32, RgbaColor::BLACK).unwrap();
        assert_eq!(canvas.current_layer(), None);
    }

    #[test]
    fn test_add_layer_invalid_format() {
        let mut canvas = canvas(10, 10, 1);
        assert!(matches!(
            canvas.add_layer("a", 4, RgbaColor::BLACK),
            Err(CanvasError::InvalidFormat(4))
        ));
        assert!(canvas.layers().is_empty());
    }

    #[test]
    fn test_present_composes_active_layers_in_order() {
        let mut canvas = canvas(10, 10, 1);
        canvas.add_layer("a", 32, RgbaColor::BLACK).unwrap();
        canvas.add_layer("b", 32, RgbaColor::BLACK).unwrap();
        canvas.add_layer("c", 32, RgbaColor::BLACK).unwrap();
        canvas.deactivate_layer("b").unwrap();
        canvas.move_layer("a", Direction::Up, 5).unwrap();
        canvas.present().unwrap();

        let ids: Vec<_> = canvas.layers().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        let presented = &canvas.backend().unwrap().presented;
        assert_eq!(presented.len(), 1);
        assert_eq!(presented[0].layers, vec![SurfaceId(3), SurfaceId(1)]);

        canvas.activate_layer("b").unwrap();
        canvas.present().unwrap();
        let presented = &canvas.backend().unwrap().presented;
        assert_eq!(
            presented[1].layers,
            vec![SurfaceId(2), SurfaceId(3), SurfaceId(1)]
        );
    }

    #[test]
    fn test_fonts() {
        let mut canvas = canvas(10, 10, 1);
        assert!(matches!(
            canvas.load_font("Body", "nonexistent.ttf"),
            Err(CanvasError::MissingFile(_))
        ));
        let font = temp_file("sdlcanvas-canvas-font.ttf", b"ttf");
        canvas.load_font("Body", &font).unwrap();
        canvas
            .draw_text("hello", "Body", 12.0, RgbaColor::WHITE, Position::new(2.0, 3.0))
            .unwrap();
        assert_eq!(
            commands(&canvas)[0].1,
            PaintCommand::Text {
                text: "hello".to_string(),
                font: font.clone(),
                size: 12.0,
                x: 2,
                y: 3,
                color: RgbaColor::WHITE,
            }
        );
        assert!(matches!(
            canvas.draw_text("x", "Unknown", 12.0, RgbaColor::WHITE, Position::default()),
            Err(CanvasError::UnknownResource {
                kind: ResourceKind::Font,
                ..
            })
        ));
        let _ = std::fs::remove_file(&font);
    }

    #[test]
    fn test_textures() {
        let path = std::env::temp_dir().join("sdlcanvas-canvas-texture.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let mut canvas = canvas(10, 10, 2);
        canvas.load_texture("sprite", &path).unwrap();
        assert_eq!(canvas.texture_resolution("sprite").unwrap(), Resolution::new(3, 2));
        canvas.draw_texture("sprite", Position::new(1.0, 1.0)).unwrap();
        assert_eq!(
            commands(&canvas)[0].1,
            PaintCommand::Texture {
                id: "sprite".to_string(),
                x: 2,
                y: 2,
                w: 6,
                h: 4,
            }
        );
        assert!(canvas.draw_texture("ghost", Position::default()).is_err());
        assert!(canvas.texture_resolution("ghost").is_err());
        assert!(matches!(
            canvas.load_texture("other", "/nonexistent/sprite.png"),
            Err(CanvasError::MissingFile(_))
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_draw_path_colors() {
        let mut canvas = canvas(100, 100, 1);
        let path = DrawPath::builder(Position::new(0.0, 0.0), RgbaColor::RED)
            .line_to(Position::new(10.0, 0.0), RgbaColor::GREEN)
            .line_to(Position::new(10.0, 10.0), RgbaColor::BLUE)
            .build();
        canvas.draw_path(&path, Position::new(5.0, 5.0), None).unwrap();
        canvas
            .draw_path(&path, Position::default(), Some(RgbaColor::WHITE))
            .unwrap();
        let recorded = commands(&canvas);
        assert_eq!(recorded.len(), 4);
        assert_eq!(
            recorded[0].1,
            PaintCommand::Line {
                x1: 5,
                y1: 5,
                x2: 15,
                y2: 5,
                color: RgbaColor::GREEN
            }
        );
        assert_eq!(
            recorded[1].1,
            PaintCommand::Line {
                x1: 15,
                y1: 5,
                x2: 15,
                y2: 15,
                color: RgbaColor::BLUE
            }
        );
        assert!(recorded[2..]
            .iter()
            .all(|(_, c)| matches!(c, PaintCommand::Line { color, .. } if *color == RgbaColor::WHITE)));
    }

    #[test]
    fn test_clear_all_and_background() {
        let mut canvas = canvas(10, 10, 1);
        canvas.add_layer("a", 32, RgbaColor::RED).unwrap();
        canvas.backend.as_mut().unwrap().clear_log();
        canvas.set_background_color(RgbaColor::GREEN).unwrap();
        canvas.clear_all().unwrap();
        let recorded = commands(&canvas);
        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[1].0, Target::Main);
        assert!(matches!(recorded[2].0, Target::Surface(_)));
    }

    #[test]
    fn test_window_and_mouse() {
        let mut canvas = canvas(10, 10, 2);
        canvas.hide().unwrap();
        assert!(!canvas.backend().unwrap().visible);
        canvas.show().unwrap();
        assert!(canvas.backend().unwrap().visible);
        canvas.backend.as_mut().unwrap().mouse = (8, 6);
        assert_eq!(canvas.mouse_position().unwrap(), Position::new(4.0, 3.0));
        canvas.set_anti_aliasing(false).unwrap();
        assert!(!canvas.anti_aliasing());
        assert!(!canvas.backend().unwrap().anti_aliasing);
    }

    #[test]
    fn test_dump_png() {
        let mut canvas = canvas(4, 2, 1);
        let path = std::env::temp_dir().join("sdlcanvas-canvas-dump.png");
        canvas.dump_png(&path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 2));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_closed_canvas_fails() {
        let mut canvas = canvas(10, 10, 1);
        canvas.add_layer("a", 32, RgbaColor::BLACK).unwrap();
        canvas.close();
        assert!(canvas.is_closed());
        assert!(canvas.layers().is_empty());
        assert!(matches!(
            canvas.draw_point(RgbaColor::RED, Position::default()),
            Err(CanvasError::Closed)
        ));
        assert!(matches!(canvas.present(), Err(CanvasError::Closed)));
        assert!(matches!(canvas.get_raw_data(), Err(CanvasError::Closed)));
        assert!(matches!(
            canvas.add_layer("b", 32, RgbaColor::BLACK),
            Err(CanvasError::Closed)
        ));
        // closing twice is harmless
        canvas.close();
    }
}
