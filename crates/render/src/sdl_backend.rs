//! SDL2 Render Backend
//!
//! Every surface (main, layers, composed frame) is a software canvas over an
//! SDL surface. Presenting uploads the composed frame to the window renderer.

use sdl2::event::Event;
use sdl2::pixels::{Color as SdlColor, PixelFormatEnum};
use sdl2::rect::{Point as SdlPoint, Rect as SdlRect};
use sdl2::render::{BlendMode, Canvas, TextureCreator};
use sdl2::surface::Surface;
use sdl2::video::{Window, WindowContext};
use sdl2::{EventPump, Sdl, VideoSubsystem};

use rustc_hash::FxHashMap;

use crate::display_list::{PaintCommand, SurfaceId, Target};
use crate::error::{RenderError, RenderResult};
use crate::event::{InputEvent, PressedKeys};
use crate::font::FontCache;
use crate::paint::{arc_points, ImagePixels, PixelFormat, Resolution, RgbaColor};
use crate::RenderBackend;

type SurfaceCanvas = Canvas<Surface<'static>>;

/// Initial window state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowState {
    #[default]
    Shown,
    Hidden,
    Fullscreen,
    Maximized,
    Minimized,
}

/// Everything needed to open the window
#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub title: String,
    /// Logical width; the window is `width * scale` pixels wide
    pub width: u32,
    /// Logical height; the window is `height * scale` pixels high
    pub height: u32,
    pub scale: u32,
    /// `None` centers the window
    pub position: Option<(i32, i32)>,
    pub state: WindowState,
    pub resizable: bool,
    pub borderless: bool,
    pub anti_aliasing: bool,
}

/// SDL2-based render backend
pub struct SdlBackend {
    _sdl_context: Sdl,
    video: VideoSubsystem,
    event_pump: EventPump,
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
    main: SurfaceCanvas,
    frame: SurfaceCanvas,
    surfaces: FxHashMap<SurfaceId, SurfaceCanvas>,
    next_surface: u32,
    textures: FxHashMap<String, ImagePixels>,
    font_cache: FontCache,
    width: u32,
    height: u32,
}

impl SdlBackend {
    /// Create a new SDL backend with a window
    pub fn new(settings: &WindowSettings) -> RenderResult<Self> {
        let sdl_context = sdl2::init()?;
        let video = sdl_context.video()?;
        set_scale_quality(settings.anti_aliasing);

        let scale = settings.scale.max(1);
        let width = settings.width * scale;
        let height = settings.height * scale;

        let mut builder = video.window(&settings.title, width, height);
        match settings.position {
            Some((x, y)) => builder.position(x, y),
            None => builder.position_centered(),
        };
        match settings.state {
            WindowState::Shown => {}
            WindowState::Hidden => {
                builder.hidden();
            }
            WindowState::Fullscreen => {
                builder.fullscreen();
            }
            WindowState::Maximized => {
                builder.maximized();
            }
            WindowState::Minimized => {
                builder.minimized();
            }
        }
        if settings.resizable {
            builder.resizable();
        }
        if settings.borderless {
            builder.borderless();
        }
        let window = builder.build().map_err(|e| RenderError::Sdl(e.to_string()))?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| RenderError::Sdl(e.to_string()))?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        let main = surface_canvas(width, height, PixelFormatEnum::RGBA32)?;
        let frame = surface_canvas(width, height, PixelFormatEnum::RGBA32)?;

        log::debug!(
            "Opened '{}' at {}x{} device pixels (scale {})",
            settings.title,
            width,
            height,
            scale
        );

        Ok(Self {
            _sdl_context: sdl_context,
            video,
            event_pump,
            canvas,
            texture_creator,
            main,
            frame,
            surfaces: FxHashMap::default(),
            next_surface: 1,
            textures: FxHashMap::default(),
            font_cache: FontCache::new(),
            width,
            height,
        })
    }

    fn pressed_keys(&self) -> PressedKeys {
        self.event_pump
            .keyboard_state()
            .pressed_scancodes()
            .map(|scancode| scancode.name().to_string())
            .collect()
    }
}

impl RenderBackend for SdlBackend {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn create_surface(&mut self, format: PixelFormat) -> RenderResult<SurfaceId> {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        let surface = surface_canvas(self.width, self.height, sdl_format(format))?;
        self.surfaces.insert(id, surface);
        Ok(id)
    }

    fn destroy_surface(&mut self, id: SurfaceId) -> RenderResult<()> {
        self.surfaces
            .remove(&id)
            .map(|_| ())
            .ok_or(RenderError::UnknownSurface(id.0))
    }

    fn execute(&mut self, target: Target, command: &PaintCommand) -> RenderResult<()> {
        // Text is rasterized before the target is borrowed
        let text = match command {
            PaintCommand::Text {
                text, font, size, color, ..
            } => {
                let bitmap = self.font_cache.render_line(font, text, *size)?;
                Some((
                    bitmap.width,
                    bitmap.height,
                    bitmap.to_rgba(color.r, color.g, color.b, color.a),
                ))
            }
            _ => None,
        };

        let canvas = surface_for(&mut self.main, &mut self.surfaces, target)?;
        match command {
            PaintCommand::Clear { color } => {
                canvas.set_draw_color(sdl_color(*color));
                canvas.clear();
            }
            PaintCommand::Point { x, y, color } => {
                canvas.set_draw_color(sdl_color(*color));
                canvas.draw_point(SdlPoint::new(*x, *y))?;
            }
            PaintCommand::Line {
                x1,
                y1,
                x2,
                y2,
                color,
            } => {
                canvas.set_draw_color(sdl_color(*color));
                canvas.draw_line(SdlPoint::new(*x1, *y1), SdlPoint::new(*x2, *y2))?;
            }
            PaintCommand::Rect {
                x,
                y,
                w,
                h,
                color,
                fill,
            } => {
                canvas.set_draw_color(sdl_color(*color));
                let rect = SdlRect::new(*x, *y, *w, *h);
                if *fill {
                    canvas.fill_rect(rect)?;
                } else {
                    canvas.draw_rect(rect)?;
                }
            }
            PaintCommand::Arc {
                cx,
                cy,
                radius,
                start,
                end,
                color,
            } => {
                let points: Vec<SdlPoint> = arc_points(*cx, *cy, *radius, *start, *end)
                    .into_iter()
                    .map(|(x, y)| SdlPoint::new(x, y))
                    .collect();
                canvas.set_draw_color(sdl_color(*color));
                canvas.draw_lines(points.as_slice())?;
            }
            PaintCommand::Text { x, y, .. } => {
                if let Some((w, h, rgba)) = text {
                    if w > 0 && h > 0 {
                        blit_rgba(canvas, &rgba, w, h, SdlRect::new(*x, *y, w, h))?;
                    }
                }
            }
            PaintCommand::Texture { id, x, y, w, h } => {
                let image = self
                    .textures
                    .get(id)
                    .ok_or_else(|| RenderError::UnknownTexture(id.clone()))?;
                blit_rgba(
                    canvas,
                    &image.data,
                    image.width,
                    image.height,
                    SdlRect::new(*x, *y, *w, *h),
                )?;
            }
            PaintCommand::Image { pixels, x, y, w, h } => {
                blit_rgba(
                    canvas,
                    &pixels.data,
                    pixels.width,
                    pixels.height,
                    SdlRect::new(*x, *y, *w, *h),
                )?;
            }
        }
        Ok(())
    }

    fn write_pixels(
        &mut self,
        target: Target,
        pixels: &[u8],
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> RenderResult<()> {
        let expected = format.buffer_len(width, height);
        if pixels.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }

        let mut data = pixels.to_vec();
        let pitch = width * format.bytes_per_pixel() as u32;
        let source = Surface::from_data(&mut data, width, height, pitch, sdl_format(format))?;

        let canvas = surface_for(&mut self.main, &mut self.surfaces, target)?;
        let creator = canvas.texture_creator();
        let mut texture = creator
            .create_texture_from_surface(&source)
            .map_err(|e| RenderError::Sdl(e.to_string()))?;
        texture.set_blend_mode(BlendMode::None);
        canvas.copy(&texture, None, None)?;
        Ok(())
    }

    fn upload_texture(&mut self, id: &str, image: ImagePixels) -> RenderResult<()> {
        self.textures.insert(id.to_string(), image);
        Ok(())
    }

    fn compose(&mut self, layers: &[SurfaceId]) -> RenderResult<()> {
        self.frame.set_draw_color(SdlColor::RGBA(0, 0, 0, 255));
        self.frame.clear();
        blend_onto(&mut self.frame, &self.main)?;
        for id in layers {
            let layer = self
                .surfaces
                .get(id)
                .ok_or(RenderError::UnknownSurface(id.0))?;
            blend_onto(&mut self.frame, layer)?;
        }
        flush(&self.frame);
        Ok(())
    }

    fn read_pixels(&mut self, format: PixelFormat, width: u32, height: u32) -> RenderResult<Vec<u8>> {
        let mut device = self.frame.read_pixels(None, PixelFormatEnum::RGBA32)?;
        let mut device_surface = Surface::from_data(
            &mut device,
            self.width,
            self.height,
            self.width * 4,
            PixelFormatEnum::RGBA32,
        )?;
        device_surface.set_blend_mode(BlendMode::None)?;

        let mut logical = Surface::new(width, height, PixelFormatEnum::RGBA32)?;
        device_surface.blit_scaled(None, &mut logical, None)?;
        let converted = logical.convert_format(sdl_format(format))?;

        let row = format.bytes_per_pixel() * width as usize;
        let pitch = converted.pitch() as usize;
        let bytes = converted
            .without_lock()
            .ok_or_else(|| RenderError::Sdl("converted surface requires locking".to_string()))?;
        let mut out = Vec::with_capacity(row * height as usize);
        for y in 0..height as usize {
            out.extend_from_slice(&bytes[y * pitch..y * pitch + row]);
        }
        Ok(out)
    }

    fn present(&mut self) -> RenderResult<()> {
        let mut texture = self
            .texture_creator
            .create_texture_from_surface(self.frame.surface())
            .map_err(|e| RenderError::Sdl(e.to_string()))?;
        texture.set_blend_mode(BlendMode::None);
        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    fn set_anti_aliasing(&mut self, enabled: bool) {
        set_scale_quality(enabled);
    }

    fn set_visible(&mut self, visible: bool) {
        let window = self.canvas.window_mut();
        if visible {
            window.show();
        } else {
            window.hide();
        }
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let raw: Vec<Event> = self.event_pump.poll_iter().collect();
        let mut events = Vec::new();

        for event in raw {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::MouseButtonDown { x, y, .. } => {
                    events.push(InputEvent::MouseDown { x, y });
                }
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => {
                    events.push(InputEvent::KeyDown {
                        key: keycode.name(),
                        pressed: self.pressed_keys(),
                    });
                }
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    events.push(InputEvent::KeyUp {
                        key: keycode.name(),
                        pressed: self.pressed_keys(),
                    });
                }
                _ => {
                    // Ignore unknown events
                }
            }
        }

        events
    }

    fn mouse_position(&self) -> (i32, i32) {
        let state = self.event_pump.mouse_state();
        (state.x(), state.y())
    }

    fn screen_resolution(&self) -> RenderResult<Resolution> {
        let mode = self.video.desktop_display_mode(0)?;
        Ok(Resolution::new(mode.w.max(0) as u32, mode.h.max(0) as u32))
    }
}

fn sdl_format(format: PixelFormat) -> PixelFormatEnum {
    match format {
        PixelFormat::Rgb332 => PixelFormatEnum::RGB332,
        PixelFormat::Rgb565 => PixelFormatEnum::RGB565,
        PixelFormat::Rgb888 => PixelFormatEnum::RGB24,
        PixelFormat::Rgba8888 => PixelFormatEnum::RGBA32,
    }
}

fn sdl_color(color: RgbaColor) -> SdlColor {
    SdlColor::RGBA(color.r, color.g, color.b, color.a)
}

fn set_scale_quality(smooth: bool) {
    sdl2::hint::set("SDL_RENDER_SCALE_QUALITY", if smooth { "1" } else { "0" });
}

fn surface_canvas(width: u32, height: u32, format: PixelFormatEnum) -> RenderResult<SurfaceCanvas> {
    let surface = Surface::new(width, height, format)?;
    let mut canvas = surface.into_canvas()?;
    canvas.set_blend_mode(BlendMode::Blend);
    Ok(canvas)
}

fn surface_for<'a>(
    main: &'a mut SurfaceCanvas,
    surfaces: &'a mut FxHashMap<SurfaceId, SurfaceCanvas>,
    target: Target,
) -> RenderResult<&'a mut SurfaceCanvas> {
    match target {
        Target::Main => Ok(main),
        Target::Surface(id) => surfaces
            .get_mut(&id)
            .ok_or(RenderError::UnknownSurface(id.0)),
    }
}

/// Make queued render commands land in the surface pixels
fn flush(canvas: &SurfaceCanvas) {
    unsafe {
        sdl2::sys::SDL_RenderFlush(canvas.raw());
    }
}

/// Copy RGBA pixels onto a canvas with alpha blending, stretched to `dst`
fn blit_rgba(canvas: &mut SurfaceCanvas, rgba: &[u8], width: u32, height: u32, dst: SdlRect) -> RenderResult<()> {
    let creator = canvas.texture_creator();
    let mut texture = creator
        .create_texture_streaming(PixelFormatEnum::RGBA32, width, height)
        .map_err(|e| RenderError::Sdl(e.to_string()))?;
    texture.set_blend_mode(BlendMode::Blend);
    texture
        .update(None, rgba, (width * 4) as usize)
        .map_err(|e| RenderError::Sdl(e.to_string()))?;
    canvas.copy(&texture, None, dst)?;
    Ok(())
}

/// Alpha-blend a whole surface over the frame
fn blend_onto(frame: &mut SurfaceCanvas, source: &SurfaceCanvas) -> RenderResult<()> {
    flush(source);
    let creator = frame.texture_creator();
    let mut texture = creator
        .create_texture_from_surface(source.surface())
        .map_err(|e| RenderError::Sdl(e.to_string()))?;
    texture.set_blend_mode(BlendMode::Blend);
    frame.copy(&texture, None, None)?;
    Ok(())
}
