//! Input event handlers
//!
//! Registration table mapping each event kind to an ordered list of handlers.
//! Handlers run synchronously on the thread pumping events.

use sdlcanvas_render::InputEvent;

type ClickHandler = Box<dyn FnMut(f32, f32)>;
type KeyHandler = Box<dyn FnMut(&str)>;
type KeysHandler = Box<dyn FnMut(&[String])>;

/// Registered event handlers, kept in registration order
#[derive(Default)]
pub(crate) struct EventHandlers {
    click: Vec<ClickHandler>,
    key_down: Vec<KeyHandler>,
    key_up: Vec<KeyHandler>,
    keys_down: Vec<KeysHandler>,
    keys_up: Vec<KeysHandler>,
}

/// What the canvas has to do after dispatching an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dispatch {
    Continue,
    Quit,
}

impl EventHandlers {
    pub fn on_click(&mut self, handler: impl FnMut(f32, f32) + 'static) {
        self.click.push(Box::new(handler));
    }

    pub fn on_key_down(&mut self, handler: impl FnMut(&str) + 'static) {
        self.key_down.push(Box::new(handler));
    }

    pub fn on_key_up(&mut self, handler: impl FnMut(&str) + 'static) {
        self.key_up.push(Box::new(handler));
    }

    pub fn on_keys_down(&mut self, handler: impl FnMut(&[String]) + 'static) {
        self.keys_down.push(Box::new(handler));
    }

    pub fn on_keys_up(&mut self, handler: impl FnMut(&[String]) + 'static) {
        self.keys_up.push(Box::new(handler));
    }

    /// Run the handlers for one event. Click positions are divided by `scale`
    /// so handlers see logical coordinates.
    pub fn dispatch(&mut self, event: &InputEvent, scale: u32) -> Dispatch {
        match event {
            InputEvent::Quit => return Dispatch::Quit,
            InputEvent::MouseDown { x, y } => {
                let s = scale.max(1) as f32;
                for handler in &mut self.click {
                    handler(*x as f32 / s, *y as f32 / s);
                }
            }
            InputEvent::KeyDown { key, pressed } => {
                for handler in &mut self.key_down {
                    handler(key.as_str());
                }
                for handler in &mut self.keys_down {
                    handler(pressed.as_slice());
                }
            }
            InputEvent::KeyUp { key, pressed } => {
                for handler in &mut self.key_up {
                    handler(key.as_str());
                }
                for handler in &mut self.keys_up {
                    handler(pressed.as_slice());
                }
            }
        }
        Dispatch::Continue
    }
}
