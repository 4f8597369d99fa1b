//! Recording backend
//!
//! A headless backend that keeps every command it receives. Used to drive a
//! canvas without a display and to inspect what reached the renderer.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::display_list::{PaintCommand, SurfaceId, Target};
use crate::error::{RenderError, RenderResult};
use crate::event::InputEvent;
use crate::paint::{ImagePixels, PixelFormat, Resolution};
use crate::RenderBackend;

/// A frame handed to `present`, with the layers it was composed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presented {
    pub layers: Vec<SurfaceId>,
}

/// Raw pixels last written to a target
#[derive(Debug, Clone)]
struct RawWrite {
    pixels: Vec<u8>,
    format: PixelFormat,
}

/// Headless backend recording all calls
#[derive(Debug, Default)]
pub struct RecordingBackend {
    width: u32,
    height: u32,
    /// Commands in issue order with their targets
    pub commands: Vec<(Target, PaintCommand)>,
    /// Live surfaces and their formats
    pub surfaces: FxHashMap<SurfaceId, PixelFormat>,
    /// Uploaded texture ids
    pub textures: FxHashMap<String, Resolution>,
    /// Every presented frame
    pub presented: Vec<Presented>,
    /// Raw buffer writes, in order
    pub raw_writes: Vec<(Target, PixelFormat, usize)>,
    pub anti_aliasing: bool,
    pub visible: bool,
    pub mouse: (i32, i32),
    /// Make `present` fail, to exercise error paths
    pub fail_present: bool,
    composed: Vec<SurfaceId>,
    last_raw: FxHashMap<Target, RawWrite>,
    pending_events: VecDeque<InputEvent>,
    next_surface: u32,
}

impl RecordingBackend {
    /// Create a backend with device-sized surfaces
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            visible: true,
            next_surface: 1,
            ..Self::default()
        }
    }

    /// Queue an event for the next `poll_events`
    pub fn push_event(&mut self, event: InputEvent) {
        self.pending_events.push_back(event);
    }

    /// Commands issued against one target
    pub fn commands_for(&self, target: Target) -> Vec<&PaintCommand> {
        self.commands
            .iter()
            .filter(|(t, _)| *t == target)
            .map(|(_, c)| c)
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.commands.clear();
        self.presented.clear();
        self.raw_writes.clear();
    }

    fn check_target(&self, target: Target) -> RenderResult<()> {
        match target {
            Target::Main => Ok(()),
            Target::Surface(id) if self.surfaces.contains_key(&id) => Ok(()),
            Target::Surface(id) => Err(RenderError::UnknownSurface(id.0)),
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn create_surface(&mut self, format: PixelFormat) -> RenderResult<SurfaceId> {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.surfaces.insert(id, format);
        Ok(id)
    }

    fn destroy_surface(&mut self, id: SurfaceId) -> RenderResult<()> {
        self.last_raw.remove(&Target::Surface(id));
        self.surfaces
            .remove(&id)
            .map(|_| ())
            .ok_or(RenderError::UnknownSurface(id.0))
    }

    fn execute(&mut self, target: Target, command: &PaintCommand) -> RenderResult<()> {
        self.check_target(target)?;
        if let PaintCommand::Texture { id, .. } = command {
            if !self.textures.contains_key(id) {
                return Err(RenderError::UnknownTexture(id.clone()));
            }
        }
        if let PaintCommand::Clear { .. } = command {
            self.last_raw.remove(&target);
        }
        self.commands.push((target, command.clone()));
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
        self.check_target(target)?;
        let expected = format.buffer_len(width, height);
        if pixels.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        self.raw_writes.push((target, format, pixels.len()));
        self.last_raw.insert(
            target,
            RawWrite {
                pixels: pixels.to_vec(),
                format,
            },
        );
        Ok(())
    }

    fn upload_texture(&mut self, id: &str, image: ImagePixels) -> RenderResult<()> {
        self.textures.insert(id.to_string(), image.resolution());
        Ok(())
    }

    fn compose(&mut self, layers: &[SurfaceId]) -> RenderResult<()> {
        for id in layers {
            if !self.surfaces.contains_key(id) {
                return Err(RenderError::UnknownSurface(id.0));
            }
        }
        self.composed = layers.to_vec();
        Ok(())
    }

    /// Returns the last raw buffer written to the main surface when its
    /// format matches and no layer sits on top; zeros otherwise.
    fn read_pixels(&mut self, format: PixelFormat, width: u32, height: u32) -> RenderResult<Vec<u8>> {
        let len = format.buffer_len(width, height);
        match self.last_raw.get(&Target::Main) {
            Some(raw) if raw.format == format && raw.pixels.len() == len && self.composed.is_empty() => {
                Ok(raw.pixels.clone())
            }
            _ => Ok(vec![0; len]),
        }
    }

    fn present(&mut self) -> RenderResult<()> {
        if self.fail_present {
            return Err(RenderError::Sdl("present failed".to_string()));
        }
        self.presented.push(Presented {
            layers: self.composed.clone(),
        });
        Ok(())
    }

    fn set_anti_aliasing(&mut self, enabled: bool) {
        self.anti_aliasing = enabled;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.pending_events.drain(..).collect()
    }

    fn mouse_position(&self) -> (i32, i32) {
        self.mouse
    }

    fn screen_resolution(&self) -> RenderResult<Resolution> {
        Ok(Resolution::new(self.width, self.height))
    }
}
