//! Text grid state machine.
//!
//! A [`Console`] tracks the cursor, text scale and colors of one window and
//! turns characters into driver calls inside that window's interior. It
//! never touches pixels outside the interior rectangle.

use crate::color::Color;
use crate::drivers::framebuffer::{GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::drivers::PixelDriver;
use crate::keys;
use crate::window::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Console {
    rows: u32,
    cols: u32,
    row: u32,
    col: u32,
    text_size: u32,
    fg: Color,
    bg: Color,
}

impl Console {
    /// White on black, text size 1, cursor at the origin.
    pub fn new(frame: &Frame) -> Self {
        let mut console = Self {
            rows: 1,
            cols: 1,
            row: 0,
            col: 0,
            text_size: 1,
            fg: Color::White,
            bg: Color::Black,
        };
        console.set_text_size(frame, 1);
        console
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Cursor as `(row, col)`.
    pub fn cursor(&self) -> (u32, u32) {
        (self.row, self.col)
    }

    pub fn text_size(&self) -> u32 {
        self.text_size
    }

    pub fn text_color(&self) -> Color {
        self.fg
    }

    pub fn background_color(&self) -> Color {
        self.bg
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.fg = color;
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.bg = color;
    }

    /// Change the glyph scale and recompute the grid. The cursor is pulled
    /// back inside the new grid if it no longer fits.
    pub fn set_text_size(&mut self, frame: &Frame, size: u32) {
        let size = size.max(1);
        self.text_size = size;
        self.rows = (frame.interior.height / (GLYPH_HEIGHT * size)).max(1);
        self.cols = (frame.interior.width / (GLYPH_WIDTH * size)).max(1);
        self.row = self.row.min(self.rows - 1);
        self.col = self.col.min(self.cols - 1);
    }

    /// Move the cursor, clamped to the grid.
    pub fn set_cursor(&mut self, col: u32, row: u32) {
        self.col = col.min(self.cols - 1);
        self.row = row.min(self.rows - 1);
    }

    /// Apply one character: line feed, carriage return, backspace or glyph.
    /// Navigation keys draw nothing.
    /// The cursor is on the grid again when this returns.
    pub fn write<D: PixelDriver + ?Sized>(&mut self, frame: &Frame, display: &mut D, c: u8) {
        match c {
            b'\n' => {
                self.col = 0;
                self.row += 1;
            }
            b'\r' => self.col = 0,
            c if keys::is_backspace(c) => self.backspace(frame, display),
            c if keys::is_navigation(c) => {}
            c => {
                self.draw_cell(frame, display, c);
                self.col += 1;
            }
        }

        if self.col >= self.cols {
            self.col = 0;
            self.row += 1;
        }

        if self.row >= self.rows {
            self.scroll(frame, display, 1);
            self.row = self.rows - 1;
            self.col = 0;
        }
    }

    fn backspace<D: PixelDriver + ?Sized>(&mut self, frame: &Frame, display: &mut D) {
        if self.row == 0 && self.col == 0 {
            return;
        }
        if self.col > 0 {
            self.col -= 1;
        } else {
            self.col = self.cols - 1;
            self.row -= 1;
        }
        self.draw_cell(frame, display, b' ');
    }

    fn draw_cell<D: PixelDriver + ?Sized>(&self, frame: &Frame, display: &mut D, c: u8) {
        let x = frame.interior.x + self.col * GLYPH_WIDTH * self.text_size;
        let y = frame.interior.y + self.row * GLYPH_HEIGHT * self.text_size;
        display.set_text_size(self.text_size);
        display.set_text_color(self.fg, self.bg);
        display.set_cursor(x, y);
        display.write(c);
    }

    /// Shift the text up by `lines` text lines and blank the exposed rows.
    /// Rows are copied top to bottom so the overlapping move is safe.
    pub fn scroll<D: PixelDriver + ?Sized>(&mut self, frame: &Frame, display: &mut D, lines: u32) {
        if lines == 0 {
            return;
        }
        let line_px = GLYPH_HEIGHT * self.text_size * lines;
        let text_px = self.rows * GLYPH_HEIGHT * self.text_size;
        let kept = text_px.saturating_sub(line_px);
        let top = frame.interior.y;
        let offset = frame.byte_offset();
        let width = frame.width_bytes();

        for i in 0..kept {
            display.row_copy(top + i, top + i + line_px, offset, width);
        }
        for i in kept..frame.interior.height {
            display.row_fill(top + i, offset, width, self.bg);
        }
    }

    /// Blank the interior, home the cursor and reset the text size to 1.
    pub fn clear<D: PixelDriver + ?Sized>(&mut self, frame: &Frame, display: &mut D) {
        let offset = frame.byte_offset();
        let width = frame.width_bytes();
        for row in frame.interior.y..frame.interior.bottom() {
            display.row_fill(row, offset, width, self.bg);
        }
        self.row = 0;
        self.col = 0;
        self.set_text_size(frame, 1);
    }
}
