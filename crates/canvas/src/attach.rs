//! Attached video buffers
//!
//! While a buffer is attached it replaces the main surface: each tick uploads
//! its current bytes and presents them, and normal draw calls are refused.

use log::{debug, info};

use sdlcanvas_render::{RenderBackend, Target};

use crate::canvas::Canvas;
use crate::error::{CanvasError, CanvasResult};
use crate::frame::Mode;

impl<B: RenderBackend> Canvas<B> {
    /// Attach a caller-owned buffer as the video memory.
    ///
    /// Stops a running frame loop. The buffer must hold exactly
    /// `width * height * bit_per_pixel / 8` bytes.
    pub fn attach(&mut self, buffer: Vec<u8>, bit_per_pixel: u32) -> CanvasResult<()> {
        self.backend_mut()?;
        let format = self.check_raw(buffer.len(), bit_per_pixel)?;
        self.end_loop();
        if self.mode.is_attached() {
            debug!("Replacing the attached buffer");
        }
        self.bit_per_pixel = format;
        self.mode = Mode::Attached { buffer, format };
        info!("Attached a {} bpp video buffer", bit_per_pixel);
        Ok(())
    }

    /// Release the attached buffer and hand it back
    pub fn detach(&mut self) -> Option<Vec<u8>> {
        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Attached { buffer, .. } => {
                info!("Detached the video buffer");
                Some(buffer)
            }
            other => {
                self.mode = other;
                None
            }
        }
    }

    pub fn attached_buffer(&self) -> Option<&[u8]> {
        match &self.mode {
            Mode::Attached { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    /// Mutable access to the attached bytes; changes show up on the next tick
    pub fn attached_buffer_mut(&mut self) -> Option<&mut [u8]> {
        match &mut self.mode {
            Mode::Attached { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    /// Upload the attached buffer to the main surface and present it
    pub(crate) fn push_attached(&mut self) -> CanvasResult<()> {
        let (width, height) = (self.width(), self.height());
        let Some(backend) = self.backend.as_mut() else {
            return Err(CanvasError::Closed);
        };
        if let Mode::Attached { buffer, format } = &self.mode {
            backend.write_pixels(Target::Main, buffer, *format, width, height)?;
            backend.compose(&[])?;
            backend.present()?;
        }
        Ok(())
    }

    /// The main surface alone, in the current pixel format
    fn main_pixels(&mut self) -> CanvasResult<Vec<u8>> {
        let format = self.bit_per_pixel;
        let (width, height) = (self.width(), self.height());
        let backend = self.backend_mut()?;
        backend.compose(&[])?;
        Ok(backend.read_pixels(format, width, height)?)
    }

    /// Rewrite every byte of the main surface.
    ///
    /// `filter` receives the byte, its index and the whole main surface as it
    /// was before filtering, and returns the new byte. Layers are neither
    /// filtered nor merged into the result. The result is shown once and
    /// stays on the main surface.
    pub fn apply_filter(&mut self, mut filter: impl FnMut(u8, usize, &[u8]) -> u8) -> CanvasResult<()> {
        if self.mode.is_attached() {
            return Err(CanvasError::ModeConflict(
                "video buffer is attached, use detach to free the video buffer",
            ));
        }
        let source = self.main_pixels()?;
        let filtered: Vec<u8> = source
            .iter()
            .enumerate()
            .map(|(i, &byte)| filter(byte, i, &source))
            .collect();
        let bit_per_pixel = self.bit_per_pixel();
        self.attach(filtered, bit_per_pixel)?;
        let pushed = self.push_attached();
        self.detach();
        pushed
    }
}
