//! Display List
//!
//! Paint commands in device coordinates, issued against a render target.

use std::path::PathBuf;
use std::rc::Rc;

use crate::paint::{ImagePixels, RgbaColor};

/// Handle of an off-screen surface owned by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// Where a paint command lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Target {
    /// The main surface, always composited first
    #[default]
    Main,
    /// An off-screen layer surface
    Surface(SurfaceId),
}

/// A display list of paint commands
#[derive(Debug, Default, Clone)]
pub struct DisplayList {
    pub commands: Vec<PaintCommand>,
}

/// A paint command
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Fill the whole target with a color
    Clear { color: RgbaColor },
    /// Plot a single pixel
    Point { x: i32, y: i32, color: RgbaColor },
    /// Stroke a line segment
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: RgbaColor,
    },
    /// Outline or fill a rectangle
    Rect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: RgbaColor,
        fill: bool,
    },
    /// Stroke an arc between two angles (radians)
    Arc {
        cx: i32,
        cy: i32,
        radius: i32,
        start: f32,
        end: f32,
        color: RgbaColor,
    },
    /// Draw a line of text with a font file
    Text {
        text: String,
        font: PathBuf,
        size: f32,
        x: i32,
        y: i32,
        color: RgbaColor,
    },
    /// Blit a previously uploaded texture
    Texture {
        id: String,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    },
    /// Blit decoded pixels, stretched to the destination
    Image {
        pixels: Rc<ImagePixels>,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    },
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: PaintCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_list_new() {
        let list = DisplayList::new();
        assert!(list.is_empty());
    }

    #[test]
    fn test_display_list_push() {
        let mut list = DisplayList::new();
        list.push(PaintCommand::Rect {
            x: 0,
            y: 0,
            w: 100,
            h: 100,
            color: RgbaColor::BLACK,
            fill: true,
        });
        list.push(PaintCommand::Clear {
            color: RgbaColor::WHITE,
        });
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_default_target_is_main() {
        assert_eq!(Target::default(), Target::Main);
    }
}
