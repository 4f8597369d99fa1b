//! Canvas configuration

use serde::Deserialize;

use sdlcanvas_render::WindowState;

use crate::error::CanvasResult;

/// Initial window visibility/state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    #[default]
    Shown,
    Hidden,
    Fullscreen,
    Maximized,
    Minimized,
}

impl From<WindowMode> for WindowState {
    fn from(mode: WindowMode) -> Self {
        match mode {
            WindowMode::Shown => WindowState::Shown,
            WindowMode::Hidden => WindowState::Hidden,
            WindowMode::Fullscreen => WindowState::Fullscreen,
            WindowMode::Maximized => WindowState::Maximized,
            WindowMode::Minimized => WindowState::Minimized,
        }
    }
}

/// Where the window opens on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPosition {
    #[default]
    Centered,
    At { x: i32, y: i32 },
}

impl WindowPosition {
    pub(crate) fn coordinates(self) -> Option<(i32, i32)> {
        match self {
            WindowPosition::Centered => None,
            WindowPosition::At { x, y } => Some((x, y)),
        }
    }
}

/// Canvas configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasOptions {
    pub mode: WindowMode,
    pub resizable: bool,
    /// Pixel magnification applied to every coordinate
    pub scale: u32,
    pub anti_aliasing: bool,
    pub remove_window_decoration: bool,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            mode: WindowMode::Shown,
            resizable: false,
            scale: 1,
            anti_aliasing: true,
            remove_window_decoration: false,
        }
    }
}

impl CanvasOptions {
    /// Parse options from a JSON object; missing keys keep their defaults
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let options: CanvasOptions = serde_json::from_str(json)?;
        Ok(options.normalized())
    }

    /// Scale below 1 is treated as 1
    pub fn normalized(mut self) -> Self {
        self.scale = self.scale.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CanvasOptions::default();
        assert_eq!(options.mode, WindowMode::Shown);
        assert_eq!(options.scale, 1);
        assert!(options.anti_aliasing);
        assert!(!options.resizable);
        assert!(!options.remove_window_decoration);
    }

    #[test]
    fn test_from_json_partial() {
        let options = CanvasOptions::from_json(r#"{ "mode": "fullscreen", "scale": 3 }"#).unwrap();
        assert_eq!(options.mode, WindowMode::Fullscreen);
        assert_eq!(options.scale, 3);
        assert!(options.anti_aliasing);
    }

    #[test]
    fn test_from_json_camel_case_keys() {
        let options = CanvasOptions::from_json(
            r#"{ "antiAliasing": false, "removeWindowDecoration": true, "resizable": true }"#,
        )
        .unwrap();
        assert!(!options.anti_aliasing);
        assert!(options.remove_window_decoration);
        assert!(options.resizable);
    }

    #[test]
    fn test_zero_scale_normalized() {
        let options = CanvasOptions::from_json(r#"{ "scale": 0 }"#).unwrap();
        assert_eq!(options.scale, 1);
    }

    #[test]
    fn test_invalid_mode_rejected() {
        assert!(CanvasOptions::from_json(r#"{ "mode": "sideways" }"#).is_err());
    }

    #[test]
    fn test_window_position() {
        assert_eq!(WindowPosition::default().coordinates(), None);
        assert_eq!(WindowPosition::At { x: 4, y: 2 }.coordinates(), Some((4, 2)));
    }
}
