//! Frame loop
//!
//! A canvas is either idle, running a per-frame callback, or streaming an
//! attached buffer. `tick` advances whichever of the two is running by one
//! frame; `run` ticks until the canvas goes back to idle.

use std::time::{Duration, Instant};

use log::{debug, info};

use sdlcanvas_render::{PaintCommand, PixelFormat, RenderBackend, RgbaColor, Target};

use crate::canvas::Canvas;
use crate::error::{CanvasError, CanvasResult};
use crate::event::Dispatch;

/// Per-frame callback
pub type FrameCallback<B> = dyn FnMut(&mut Canvas<B>) -> CanvasResult<()>;

/// What the canvas is currently doing
pub(crate) enum Mode<B: RenderBackend> {
    Idle,
    Looping {
        /// Taken out while the callback runs
        callback: Option<Box<FrameCallback<B>>>,
        frame_time: Option<Duration>,
    },
    Attached {
        buffer: Vec<u8>,
        format: PixelFormat,
    },
}

impl<B: RenderBackend> Mode<B> {
    pub fn is_attached(&self) -> bool {
        matches!(self, Mode::Attached { .. })
    }

    fn kind(&self) -> ModeKind {
        match self {
            Mode::Idle => ModeKind::Idle,
            Mode::Looping { .. } => ModeKind::Looping,
            Mode::Attached { .. } => ModeKind::Attached,
        }
    }
}

/// Public view of the canvas mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Idle,
    Looping,
    Attached,
}

impl<B: RenderBackend> Canvas<B> {
    pub fn mode(&self) -> ModeKind {
        self.mode.kind()
    }

    /// Whether a quit event (window closed) was received
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Call `callback` once per frame until `end_loop`.
    ///
    /// Before each call the main surface is cleared to black; afterwards
    /// drawing returns to the main surface and the frame is presented.
    /// Replaces a running loop.
    pub fn loop_with(
        &mut self,
        callback: impl FnMut(&mut Canvas<B>) -> CanvasResult<()> + 'static,
    ) -> CanvasResult<()> {
        self.backend_mut()?;
        if self.mode.is_attached() {
            return Err(CanvasError::ModeConflict(
                "video buffer is attached, use detach to free the video buffer",
            ));
        }
        self.mode = Mode::Looping {
            callback: Some(Box::new(callback)),
            frame_time: None,
        };
        info!("Frame loop started");
        Ok(())
    }

    /// Stop the frame loop. Does nothing if no loop is running.
    pub fn end_loop(&mut self) {
        if let Mode::Looping { .. } = self.mode {
            self.mode = Mode::Idle;
            info!("Frame loop ended");
        }
    }

    /// Duration of the last completed loop iteration, zero before the first one
    pub fn frame_time(&self) -> CanvasResult<Duration> {
        match &self.mode {
            Mode::Looping { frame_time, .. } => Ok(frame_time.unwrap_or_default()),
            _ => Err(CanvasError::ModeConflict("no frame loop is running")),
        }
    }

    /// Frames per second derived from the last frame time.
    ///
    /// Infinite until a frame has taken measurable time.
    pub fn fps(&self) -> CanvasResult<f64> {
        Ok(1.0 / self.frame_time()?.as_secs_f64())
    }

    /// Pump events and run one frame of the current mode
    pub fn tick(&mut self) -> CanvasResult<()> {
        self.pump_events()?;
        match self.mode() {
            ModeKind::Idle => Ok(()),
            ModeKind::Looping => self.loop_tick(),
            ModeKind::Attached => self.push_attached(),
        }
    }

    /// Tick until the canvas is idle, closed, or asked to quit
    pub fn run(&mut self) -> CanvasResult<()> {
        while !self.is_closed() && !self.quit_requested {
            if self.mode() == ModeKind::Idle {
                break;
            }
            self.tick()?;
        }
        debug!("Run finished");
        Ok(())
    }

    fn loop_tick(&mut self) -> CanvasResult<()> {
        let start = Instant::now();
        let mut callback = match &mut self.mode {
            Mode::Looping { callback, .. } => callback.take(),
            _ => return Ok(()),
        };

        let cleared = match self.backend_mut() {
            Ok(backend) => backend
                .execute(
                    Target::Main,
                    &PaintCommand::Clear {
                        color: RgbaColor::BLACK,
                    },
                )
                .map_err(CanvasError::from),
            Err(e) => Err(e),
        };
        let result = match (cleared, callback.as_mut()) {
            (Err(e), _) => Err(e),
            (Ok(()), Some(callback)) => callback(self),
            (Ok(()), None) => Ok(()),
        };
        self.use_main_layer();
        let presented = if self.is_closed() {
            Ok(())
        } else {
            self.present()
        };

        // The callback may have ended or replaced the loop
        if let Mode::Looping {
            callback: slot,
            frame_time,
        } = &mut self.mode
        {
            if slot.is_none() {
                *slot = callback;
            }
            *frame_time = Some(start.elapsed());
        }
        result.and(presented)
    }

    /// Block for `ms` milliseconds, then process pending events
    pub fn sleep(&mut self, ms: u64) -> CanvasResult<()> {
        std::thread::sleep(Duration::from_millis(ms));
        self.pump_events()
    }

    /// Dispatch pending input events to the registered handlers.
    ///
    /// A quit event ends the loop or attachment and makes `run` return.
    pub fn pump_events(&mut self) -> CanvasResult<()> {
        let events = self.backend_mut()?.poll_events();
        let scale = self.scale();
        for event in &events {
            if self.events.dispatch(event, scale) == Dispatch::Quit {
                info!("Quit requested");
                self.quit_requested = true;
                self.end_loop();
                self.detach();
            }
        }
        Ok(())
    }
}
