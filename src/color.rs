//! 3-bit display palette.
//!
//! The VGA output drives one pin per channel, so every pixel is one of eight
//! colors. The bit assigned to each channel depends on how the board is
//! wired; enable the `bgr` feature when blue sits on the lowest bit.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

/// One of the eight colors the display can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

#[cfg(not(feature = "bgr"))]
const RED_BIT: u8 = 0b001;
#[cfg(not(feature = "bgr"))]
const BLUE_BIT: u8 = 0b100;
#[cfg(feature = "bgr")]
const RED_BIT: u8 = 0b100;
#[cfg(feature = "bgr")]
const BLUE_BIT: u8 = 0b001;
const GREEN_BIT: u8 = 0b010;

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    /// Channel on/off triple.
    pub const fn channels(self) -> (bool, bool, bool) {
        match self {
            Color::Black => (false, false, false),
            Color::Red => (true, false, false),
            Color::Green => (false, true, false),
            Color::Yellow => (true, true, false),
            Color::Blue => (false, false, true),
            Color::Magenta => (true, false, true),
            Color::Cyan => (false, true, true),
            Color::White => (true, true, true),
        }
    }

    /// Color with the given channels switched on.
    pub const fn from_channels(r: bool, g: bool, b: bool) -> Self {
        match (r, g, b) {
            (false, false, false) => Color::Black,
            (true, false, false) => Color::Red,
            (false, true, false) => Color::Green,
            (true, true, false) => Color::Yellow,
            (false, false, true) => Color::Blue,
            (true, false, true) => Color::Magenta,
            (false, true, true) => Color::Cyan,
            (true, true, true) => Color::White,
        }
    }

    /// Hardware pixel code as stored in the framebuffer nibble.
    pub const fn bits(self) -> u8 {
        let (r, g, b) = self.channels();
        let mut bits = 0;
        if r {
            bits |= RED_BIT;
        }
        if g {
            bits |= GREEN_BIT;
        }
        if b {
            bits |= BLUE_BIT;
        }
        bits
    }

    /// Decode a hardware pixel code. Bits above the low three are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        Color::from_channels(bits & RED_BIT != 0, bits & GREEN_BIT != 0, bits & BLUE_BIT != 0)
    }
}

impl From<Color> for Rgb888 {
    fn from(color: Color) -> Self {
        let level = |on: bool| if on { 255 } else { 0 };
        let (r, g, b) = color.channels();
        Rgb888::new(level(r), level(g), level(b))
    }
}

impl From<Rgb888> for Color {
    /// Nearest palette entry: each channel is on from half intensity up.
    fn from(color: Rgb888) -> Self {
        Color::from_channels(color.r() >= 128, color.g() >= 128, color.b() >= 128)
    }
}
