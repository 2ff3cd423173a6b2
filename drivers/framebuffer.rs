//! Packed framebuffer driver
//!
//! Keeps the picture in memory the way the VGA scan-out reads it: one
//! 3-bit pixel per nibble, two pixels per byte, rows laid out back to back.
//! Shapes go through embedded-graphics, glyphs come from the 8x8 font.

use alloc::vec;
use alloc::vec::Vec;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment};
use font8x8::{UnicodeFonts, BASIC_FONTS};

use crate::color::Color;
use crate::drivers::{PixelDriver, Rect};

/// Glyph cell width in pixels at text size 1.
pub const GLYPH_WIDTH: u32 = 8;
/// Glyph cell height in pixels at text size 1.
pub const GLYPH_HEIGHT: u32 = 8;

/// In-memory 2-pixels-per-byte framebuffer.
pub struct PackedFramebuffer {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
    cursor_x: u32,
    cursor_y: u32,
    text_fg: Color,
    text_bg: Color,
    text_size: u32,
}

impl PackedFramebuffer {
    /// Create a black framebuffer. Odd widths are padded to the next even
    /// pixel so every row is a whole number of bytes.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width + width % 2;
        let stride = (width / 2) as usize;
        Self {
            buffer: vec![0; stride * height as usize],
            width,
            height,
            stride,
            cursor_x: 0,
            cursor_y: 0,
            text_fg: Color::White,
            text_bg: Color::Black,
            text_size: 1,
        }
    }

    /// Bytes per pixel row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw packed pixel data.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Current glyph cursor position.
    pub fn cursor(&self) -> (u32, u32) {
        (self.cursor_x, self.cursor_y)
    }

    /// Color of one pixel. Out-of-range reads return black.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        if x >= self.width || y >= self.height {
            return Color::Black;
        }
        let byte = self.buffer[self.byte_index(x, y)];
        let bits = if x % 2 == 0 { byte & 0x0f } else { byte >> 4 };
        Color::from_bits(bits)
    }

    /// Set one pixel. Out-of-range writes are clipped.
    pub fn draw_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = self.byte_index(x, y);
        let bits = color.bits();
        let byte = &mut self.buffer[index];
        if x % 2 == 0 {
            *byte = (*byte & 0xf0) | bits;
        } else {
            *byte = (*byte & 0x0f) | (bits << 4);
        }
    }

    /// `true` if every pixel of `rect` has `color`.
    pub fn is_filled(&self, rect: Rect, color: Color) -> bool {
        (rect.y..rect.bottom()).all(|y| (rect.x..rect.right()).all(|x| self.pixel(x, y) == color))
    }

    /// Fill the whole screen.
    pub fn clear(&mut self, color: Color) {
        self.buffer.fill(packed(color));
    }

    fn byte_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride + (x / 2) as usize
    }

    fn draw_glyph(&mut self, glyph: u8, x: u32, y: u32) {
        let ch = if glyph.is_ascii() { glyph as char } else { '?' };
        let bitmap = BASIC_FONTS.get(ch).unwrap_or([0; 8]);

        let scale = self.text_size;
        for (dy, row) in bitmap.iter().enumerate() {
            for dx in 0..GLYPH_WIDTH {
                let color = if row & (1 << dx) != 0 { self.text_fg } else { self.text_bg };
                let px = x + dx * scale;
                let py = y + dy as u32 * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        self.draw_pixel(px + sx, py + sy, color);
                    }
                }
            }
        }
    }

    fn clamp_span(&self, byte_offset: u32, width_bytes: u32) -> Option<(usize, usize)> {
        let start = byte_offset as usize;
        if start >= self.stride {
            return None;
        }
        let len = (width_bytes as usize).min(self.stride - start);
        Some((start, len))
    }
}

fn packed(color: Color) -> u8 {
    let bits = color.bits();
    bits | (bits << 4)
}

fn to_point(x: u32, y: u32) -> Point {
    Point::new(x as i32, y as i32)
}

impl OriginDimensions for PackedFramebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PackedFramebuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0 && coord.y >= 0 {
                self.draw_pixel(coord.x as u32, coord.y as u32, Color::from(color));
            }
        }
        Ok(())
    }
}

impl PixelDriver for PackedFramebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let _ = Rectangle::new(to_point(rect.x, rect.y), Size::new(rect.width, rect.height))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::from(color)))
            .draw(self);
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(Rgb888::from(color))
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        let _ = Rectangle::new(to_point(rect.x, rect.y), Size::new(rect.width, rect.height))
            .into_styled(style)
            .draw(self);
    }

    fn fill_circle(&mut self, cx: u32, cy: u32, radius: u32, color: Color) {
        let _ = Circle::with_center(to_point(cx, cy), 2 * radius + 1)
            .into_styled(PrimitiveStyle::with_fill(Rgb888::from(color)))
            .draw(self);
    }

    fn set_cursor(&mut self, x: u32, y: u32) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    fn set_text_color(&mut self, fg: Color, bg: Color) {
        self.text_fg = fg;
        self.text_bg = bg;
    }

    fn set_text_size(&mut self, scale: u32) {
        self.text_size = scale.max(1);
    }

    fn write(&mut self, glyph: u8) {
        match glyph {
            b'\n' => {
                self.cursor_x = 0;
                self.cursor_y += GLYPH_HEIGHT * self.text_size;
            }
            b'\r' => self.cursor_x = 0,
            _ => {
                self.draw_glyph(glyph, self.cursor_x, self.cursor_y);
                self.cursor_x += GLYPH_WIDTH * self.text_size;
            }
        }
    }

    fn row_copy(&mut self, dst_row: u32, src_row: u32, byte_offset: u32, width_bytes: u32) {
        if dst_row >= self.height || src_row >= self.height {
            return;
        }
        if let Some((start, len)) = self.clamp_span(byte_offset, width_bytes) {
            let src = src_row as usize * self.stride + start;
            let dst = dst_row as usize * self.stride + start;
            self.buffer.copy_within(src..src + len, dst);
        }
    }

    fn row_fill(&mut self, row: u32, byte_offset: u32, width_bytes: u32, color: Color) {
        if row >= self.height {
            return;
        }
        if let Some((start, len)) = self.clamp_span(byte_offset, width_bytes) {
            let from = row as usize * self.stride + start;
            self.buffer[from..from + len].fill(packed(color));
        }
    }
}
