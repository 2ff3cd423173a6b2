//! Text windows.
//!
//! A [`Window`] is a bordered rectangle on the shared display with its own
//! text grid, colors and input buffer. Windows are created and owned by the
//! [`crate::carousel::Carousel`]; tasks receive them as `Arc<Window<D>>`.

pub mod console;
pub mod input;
pub mod keybuf;

use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use core::sync::atomic::{AtomicIsize, Ordering};

use spin::{Mutex, MutexGuard};

use crate::carousel::Focus;
use crate::color::Color;
use crate::drivers::framebuffer::GLYPH_WIDTH;
use crate::drivers::{PixelDriver, Rect};
use crate::rtos::{self, Scheduler};

use self::console::Console;
use self::keybuf::KeyBuffer;

/// Border thickness in pixels.
pub const BORDER: u32 = 2;
/// Title bar height in pixels.
pub const TITLE_HEIGHT: u32 = 10;
const MARKER_RADIUS: u32 = 3;

/// Carousel-unique window identifier. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub(crate) usize);

impl WindowId {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Pixel geometry of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Title bar, border and interior together.
    pub outer: Rect,
    /// Drawable text area.
    pub interior: Rect,
}

impl Frame {
    /// Lay out a window whose interior is `width` x `height` pixels.
    ///
    /// Origin x and width are rounded up to even values because the
    /// framebuffer packs two pixels per byte and scrolling moves whole
    /// bytes. Empty sizes grow to the smallest usable interior.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        let x = x + x % 2;
        let width = (width + width % 2).max(2);
        let height = height.max(1);
        Self {
            outer: Rect::new(x, y, width + 2 * BORDER, TITLE_HEIGHT + height + 2 * BORDER),
            interior: Rect::new(x + BORDER, y + TITLE_HEIGHT + BORDER, width, height),
        }
    }

    pub fn title_bar(&self) -> Rect {
        Rect::new(self.outer.x, self.outer.y, self.outer.width, TITLE_HEIGHT)
    }

    pub fn border(&self) -> Rect {
        Rect::new(
            self.outer.x,
            self.outer.y + TITLE_HEIGHT,
            self.outer.width,
            self.outer.height - TITLE_HEIGHT,
        )
    }

    /// Center of the focus marker in the title bar.
    pub fn marker_center(&self) -> (u32, u32) {
        (self.outer.right() - 2 * MARKER_RADIUS - 1, self.outer.y + TITLE_HEIGHT / 2)
    }

    /// Horizontal offset of the interior in framebuffer bytes.
    pub fn byte_offset(&self) -> u32 {
        self.interior.x / 2
    }

    /// Interior width in framebuffer bytes.
    pub fn width_bytes(&self) -> u32 {
        self.interior.width / 2
    }
}

pub struct Window<D> {
    id: WindowId,
    title: String,
    frame: Frame,
    border: Mutex<Color>,
    display: Arc<Mutex<D>>,
    focus: Arc<Focus>,
    scheduler: Arc<dyn Scheduler>,
    console: Mutex<Console>,
    keys: Mutex<KeyBuffer>,
    user_index: AtomicIsize,
    user_data: Mutex<Option<Arc<dyn Any + Send + Sync>>>,
}

impl<D: PixelDriver> Window<D> {
    pub(crate) fn new(
        id: WindowId,
        frame: Frame,
        title: &str,
        border: Color,
        display: Arc<Mutex<D>>,
        focus: Arc<Focus>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            frame,
            border: Mutex::new(border),
            display,
            focus,
            scheduler,
            console: Mutex::new(Console::new(&frame)),
            keys: Mutex::new(KeyBuffer::new()),
            user_index: AtomicIsize::new(0),
            user_data: Mutex::new(None),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// `true` while this window holds input focus.
    pub fn is_focused(&self) -> bool {
        self.focus.is(self.id)
    }

    /// Text rows at the current text size.
    pub fn rows(&self) -> u32 {
        self.lock(&self.console).rows()
    }

    /// Text columns at the current text size.
    pub fn cols(&self) -> u32 {
        self.lock(&self.console).cols()
    }

    /// Cursor as `(row, col)`.
    pub fn cursor(&self) -> (u32, u32) {
        self.lock(&self.console).cursor()
    }

    pub fn text_size(&self) -> u32 {
        self.lock(&self.console).text_size()
    }

    /// Change the glyph scale. Must not race with output or input on
    /// another task.
    pub fn set_text_size(&self, size: u32) {
        self.lock(&self.console).set_text_size(&self.frame, size);
    }

    pub fn set_cursor(&self, col: u32, row: u32) {
        self.lock(&self.console).set_cursor(col, row);
    }

    pub fn text_color(&self) -> Color {
        self.lock(&self.console).text_color()
    }

    pub fn set_text_color(&self, color: Color) {
        self.lock(&self.console).set_text_color(color);
    }

    pub fn background_color(&self) -> Color {
        self.lock(&self.console).background_color()
    }

    /// Used by later clears, scrolls and erases.
    pub fn set_background_color(&self, color: Color) {
        self.lock(&self.console).set_background_color(color);
    }

    pub fn border_color(&self) -> Color {
        *self.lock(&self.border)
    }

    /// Change the border color and repaint the border.
    pub fn set_border_color(&self, color: Color) {
        *self.lock(&self.border) = color;
        let mut display = self.lock(&*self.display);
        self.paint_border(&mut *display, color);
    }

    pub fn user_index(&self) -> isize {
        self.user_index.load(Ordering::Relaxed)
    }

    pub fn set_user_index(&self, index: isize) {
        self.user_index.store(index, Ordering::Relaxed);
    }

    /// Context attached by the creator, if it has type `T`.
    pub fn user_data<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let data = self.lock(&self.user_data).clone()?;
        data.downcast::<T>().ok()
    }

    pub fn set_user_data(&self, data: Arc<dyn Any + Send + Sync>) {
        *self.lock(&self.user_data) = Some(data);
    }

    /// Blank the interior, home the cursor and reset the text size.
    pub fn clear(&self) {
        let mut console = self.lock(&self.console);
        let mut display = self.lock(&*self.display);
        console.clear(&self.frame, &mut *display);
    }

    /// Scroll the text up by `lines` lines. The cursor does not move.
    pub fn scroll_lines(&self, lines: u32) {
        let mut console = self.lock(&self.console);
        let mut display = self.lock(&*self.display);
        console.scroll(&self.frame, &mut *display, lines);
    }

    /// Write one character at the cursor.
    pub fn write(&self, c: u8) {
        let mut console = self.lock(&self.console);
        let mut display = self.lock(&*self.display);
        console.write(&self.frame, &mut *display, c);
    }

    /// Write every byte of `s`. Other tasks may interleave between bytes.
    pub fn print_str(&self, s: &str) {
        for c in s.bytes() {
            self.write(c);
        }
    }

    /// Formatted output; see [`crate::wprint!`].
    pub fn print(&self, args: fmt::Arguments<'_>) {
        let _ = fmt::write(&mut Printer(self), args);
    }

    /// Draw border, title bar and focus marker.
    pub(crate) fn paint_frame(&self, focused: bool) {
        let border = self.border_color();
        let background = self.background_color();
        let mut display = self.lock(&*self.display);
        self.paint_border(&mut *display, border);

        let bar = self.frame.title_bar();
        display.fill_rect(bar, Color::White);
        let room = bar.width.saturating_sub(4 * MARKER_RADIUS + 4) / GLYPH_WIDTH;
        let end = self
            .title
            .char_indices()
            .nth(room as usize)
            .map_or(self.title.len(), |(i, _)| i);
        display.set_text_size(1);
        display.set_text_color(Color::Black, Color::White);
        display.set_cursor(bar.x + 2, bar.y + 1);
        display.print(&self.title[..end]);

        self.paint_marker(&mut *display, focused);

        let (offset, width) = (self.frame.byte_offset(), self.frame.width_bytes());
        for row in self.frame.interior.y..self.frame.interior.bottom() {
            display.row_fill(row, offset, width, background);
        }
    }

    /// Filled green when focused, hollow otherwise.
    pub(crate) fn paint_focus(&self, focused: bool) {
        let mut display = self.lock(&*self.display);
        self.paint_marker(&mut *display, focused);
    }

    /// Black out everything the window covers.
    pub(crate) fn erase(&self) {
        self.lock(&*self.display).fill_rect(self.frame.outer, Color::Black);
    }

    fn paint_border(&self, display: &mut D, color: Color) {
        let rect = self.frame.border();
        display.draw_rect(rect, color);
        display.draw_rect(Rect::new(rect.x + 1, rect.y + 1, rect.width - 2, rect.height - 2), color);
    }

    fn paint_marker(&self, display: &mut D, focused: bool) {
        let (cx, cy) = self.frame.marker_center();
        if focused {
            display.fill_circle(cx, cy, MARKER_RADIUS, Color::Green);
        } else {
            display.fill_circle(cx, cy, MARKER_RADIUS, Color::Black);
            display.fill_circle(cx, cy, MARKER_RADIUS - 1, Color::White);
        }
    }

    /// Input buffer, locked.
    pub(crate) fn keys(&self) -> MutexGuard<'_, KeyBuffer> {
        self.lock(&self.keys)
    }

    fn lock<'a, T: ?Sized>(&'a self, mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
        rtos::lock(mutex, &*self.scheduler)
    }

    pub(crate) fn scheduler(&self) -> &dyn Scheduler {
        &*self.scheduler
    }
}

struct Printer<'a, D>(&'a Window<D>);

impl<D: PixelDriver> fmt::Write for Printer<'_, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.print_str(s);
        Ok(())
    }
}

impl<D> fmt::Debug for Window<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("frame", &self.frame)
            .finish()
    }
}
