//! Paint primitives
//!
//! Basic value types shared by the canvas and the backends.

use crate::error::RenderError;

/// A position in logical canvas space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Multiply both coordinates by an integer scale factor, truncating to device pixels
    pub fn to_device(self, scale: u32) -> (i32, i32) {
        let s = scale as f32;
        ((self.x * s) as i32, (self.y * s) as i32)
    }

    /// Offset by another position
    pub fn offset(self, by: Position) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

/// Color for rendering (RGBA)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const BLACK: RgbaColor = RgbaColor::new(0, 0, 0, 255);
    pub const WHITE: RgbaColor = RgbaColor::new(255, 255, 255, 255);
    pub const RED: RgbaColor = RgbaColor::new(255, 0, 0, 255);
    pub const GREEN: RgbaColor = RgbaColor::new(0, 255, 0, 255);
    pub const BLUE: RgbaColor = RgbaColor::new(0, 0, 255, 255);
    pub const YELLOW: RgbaColor = RgbaColor::new(255, 255, 0, 255);
    pub const CYAN: RgbaColor = RgbaColor::new(0, 255, 255, 255);
    pub const MAGENTA: RgbaColor = RgbaColor::new(255, 0, 255, 255);
    pub const GRAY: RgbaColor = RgbaColor::new(128, 128, 128, 255);
    pub const TRANSPARENT: RgbaColor = RgbaColor::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Check if color is fully transparent
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl Default for RgbaColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub w: u32,
    pub h: u32,
}

impl Resolution {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// Bit depth of a raw pixel buffer.
///
/// Channel packing per depth:
/// - 8: 3 bit red, 3 bit green, 2 bit blue
/// - 16: 5 bit red, 6 bit green, 5 bit blue
/// - 24: 8 bit red, green and blue
/// - 32: 8 bit red, green, blue and alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    Rgb332,
    Rgb565,
    Rgb888,
    #[default]
    Rgba8888,
}

impl PixelFormat {
    pub fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Rgb332 => 8,
            PixelFormat::Rgb565 => 16,
            PixelFormat::Rgb888 => 24,
            PixelFormat::Rgba8888 => 32,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        (self.bits_per_pixel() / 8) as usize
    }

    /// Byte length of a buffer holding `width * height` pixels in this format
    pub fn buffer_len(self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }
}

impl TryFrom<u32> for PixelFormat {
    type Error = RenderError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(PixelFormat::Rgb332),
            16 => Ok(PixelFormat::Rgb565),
            24 => Ok(PixelFormat::Rgb888),
            32 => Ok(PixelFormat::Rgba8888),
            other => Err(RenderError::InvalidFormat(other)),
        }
    }
}

/// Decoded image pixel data
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePixels {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel
    pub data: Vec<u8>,
}

impl ImagePixels {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }
}

/// Angular step used when tessellating arcs into line segments (radians)
pub const ARC_PRECISION: f32 = 0.1;

/// Point on a circle of `radius` around `(cx, cy)` at `angle` radians
pub fn from_angle(cx: i32, cy: i32, angle: f32, radius: i32) -> (i32, i32) {
    point_at(cx, cy, angle as f64, radius)
}

fn point_at(cx: i32, cy: i32, angle: f64, radius: i32) -> (i32, i32) {
    let r = radius as f64;
    (
        (cx as f64 + angle.cos() * r) as i32,
        (cy as f64 + angle.sin() * r) as i32,
    )
}

/// Polyline approximating an arc from `start` to `end` (radians).
///
/// Steps of `ARC_PRECISION` are taken until the angle reaches `end`. An
/// empty or non-finite range yields the single starting point, and a range
/// longer than a full turn is drawn as one full turn.
pub fn arc_points(cx: i32, cy: i32, radius: i32, start: f32, end: f32) -> Vec<(i32, i32)> {
    let first = from_angle(cx, cy, start, radius);
    let span = end as f64 - start as f64;
    if !span.is_finite() || span <= 0.0 {
        return vec![first];
    }

    let step = ARC_PRECISION as f64;
    let full_turn = (std::f64::consts::TAU / step).ceil();
    let steps = (span / step).ceil().min(full_turn) as usize;

    let mut points = Vec::with_capacity(steps + 1);
    points.push(first);
    for i in 1..=steps {
        points.push(point_at(cx, cy, start as f64 + i as f64 * step, radius));
    }
    points
}
