//! Status strip along the top edge of the screen.

use alloc::sync::Arc;
use core::fmt::Write;

use spin::Mutex;

use crate::color::Color;
use crate::drivers::{PixelDriver, Rect};
use crate::rtos::{self, Scheduler};

/// Height of the strip in pixels. Windows should start below it.
pub const HEIGHT: u32 = 11;
/// Width repainted on every refresh.
const TEXT_WIDTH: u32 = 160;

pub struct InfoBar<D> {
    display: Arc<Mutex<D>>,
    scheduler: Arc<dyn Scheduler>,
    period_ms: u32,
}

impl<D: PixelDriver> InfoBar<D> {
    pub fn new(display: Arc<Mutex<D>>, scheduler: Arc<dyn Scheduler>, period_ms: u32) -> Self {
        Self {
            display,
            scheduler,
            period_ms,
        }
    }

    /// Status line for the current heap state.
    pub fn status(&self) -> heapless::String<32> {
        let mut line = heapless::String::new();
        // 32 bytes fit any heap size shown in kB with two decimals.
        let _ = match self.scheduler.free_heap_bytes() {
            Some(bytes) => write!(line, "Free memory: {:.2} kB", bytes as f32 / 1000.0),
            None => write!(line, "Free memory: n/a"),
        };
        line
    }

    /// Paint the empty strip across the whole screen.
    pub fn paint_background(&self) {
        let mut display = rtos::lock(&*self.display, &*self.scheduler);
        let width = display.width();
        display.fill_rect(Rect::new(0, 0, width, HEIGHT), Color::White);
    }

    /// Redraw the status text.
    pub fn refresh(&self) {
        let status = self.status();
        let mut display = rtos::lock(&*self.display, &*self.scheduler);
        display.fill_rect(Rect::new(0, 0, TEXT_WIDTH, HEIGHT), Color::White);
        display.set_text_size(1);
        display.set_text_color(Color::Black, Color::White);
        display.set_cursor(3, 2);
        display.print(&status);
    }

    /// Task body.
    pub fn run(self) -> ! {
        self.paint_background();
        loop {
            self.refresh();
            self.scheduler.delay_ms(self.period_ms);
        }
    }
}
