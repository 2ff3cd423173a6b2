//! Driver adapter contracts.
//!
//! The window core only talks to the display and the keyboard through the
//! traits in this module, so it never depends on the physical pixel
//! encoding or on how scancodes are decoded.

#[path = "../../drivers/framebuffer.rs"]
pub mod framebuffer;

#[path = "../../drivers/ps2.rs"]
pub mod ps2;

#[path = "../../drivers/scripted.rs"]
pub mod scripted;

use crate::color::Color;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// First column past the right edge.
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// First row past the bottom edge.
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Text and graphics primitives of the display.
///
/// Row operations address the packed framebuffer (two pixels per byte) by
/// absolute pixel row and horizontal byte offset. Callers hold the display
/// lock for the whole call, so a row copy or fill never interleaves with
/// another one.
pub trait PixelDriver: Send {
    /// Screen width in pixels.
    fn width(&self) -> u32;

    /// Screen height in pixels.
    fn height(&self) -> u32;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// One-pixel outline.
    fn draw_rect(&mut self, rect: Rect, color: Color);

    fn fill_circle(&mut self, cx: u32, cy: u32, radius: u32, color: Color);

    /// Move the glyph cursor to a pixel position.
    fn set_cursor(&mut self, x: u32, y: u32);

    /// Glyph colors. The background fills the whole glyph cell.
    fn set_text_color(&mut self, fg: Color, bg: Color);

    /// Integer glyph magnification.
    fn set_text_size(&mut self, scale: u32);

    /// Draw one glyph at the cursor and advance it. `\n` moves the cursor to
    /// the start of the next text line.
    fn write(&mut self, glyph: u8);

    /// Copy `width_bytes` bytes of pixel row `src_row` onto `dst_row`,
    /// starting at `byte_offset` in both rows.
    fn row_copy(&mut self, dst_row: u32, src_row: u32, byte_offset: u32, width_bytes: u32);

    /// Fill `width_bytes` bytes of pixel row `row` with `color`.
    fn row_fill(&mut self, row: u32, byte_offset: u32, width_bytes: u32, color: Color);

    /// Write every byte of `s` through [`PixelDriver::write`].
    fn print(&mut self, s: &str) {
        for glyph in s.bytes() {
            self.write(glyph);
        }
    }
}

/// Raw key event source.
pub trait KeySource: Send {
    type Error: core::fmt::Debug;

    /// `true` when [`KeySource::read_key`] would return a key.
    fn key_available(&mut self) -> bool;

    /// Next raw key code, or `WouldBlock` when none is pending.
    fn read_key(&mut self) -> nb::Result<u8, Self::Error>;
}
