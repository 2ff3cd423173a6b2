//! Test doubles shared by the unit tests.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use spin::Mutex;

use crate::carousel::Carousel;
use crate::color::Color;
use crate::drivers::framebuffer::PackedFramebuffer;
use crate::drivers::{PixelDriver, Rect};
use crate::error::Error;
use crate::rtos::{Scheduler, TaskEntry, TaskHandle, TaskSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    FillRect(Rect, Color),
    DrawRect(Rect, Color),
    FillCircle(u32, u32, u32, Color),
    SetCursor(u32, u32),
    SetTextColor(Color, Color),
    SetTextSize(u32),
    Write(u8),
    RowCopy { dst: u32, src: u32 },
    RowFill { row: u32, color: Color },
}

/// Display that only records what it was asked to do.
#[derive(Default)]
pub struct RecordingDriver {
    pub calls: Vec<DriverCall>,
}

impl PixelDriver for RecordingDriver {
    fn width(&self) -> u32 {
        640
    }

    fn height(&self) -> u32 {
        480
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DriverCall::FillRect(rect, color));
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DriverCall::DrawRect(rect, color));
    }

    fn fill_circle(&mut self, cx: u32, cy: u32, radius: u32, color: Color) {
        self.calls.push(DriverCall::FillCircle(cx, cy, radius, color));
    }

    fn set_cursor(&mut self, x: u32, y: u32) {
        self.calls.push(DriverCall::SetCursor(x, y));
    }

    fn set_text_color(&mut self, fg: Color, bg: Color) {
        self.calls.push(DriverCall::SetTextColor(fg, bg));
    }

    fn set_text_size(&mut self, scale: u32) {
        self.calls.push(DriverCall::SetTextSize(scale));
    }

    fn write(&mut self, glyph: u8) {
        self.calls.push(DriverCall::Write(glyph));
    }

    fn row_copy(&mut self, dst_row: u32, src_row: u32, _byte_offset: u32, _width_bytes: u32) {
        self.calls.push(DriverCall::RowCopy { dst: dst_row, src: src_row });
    }

    fn row_fill(&mut self, row: u32, _byte_offset: u32, _width_bytes: u32, color: Color) {
        self.calls.push(DriverCall::RowFill { row, color });
    }
}

/// Host-thread scheduler.
#[derive(Default)]
pub struct ThreadScheduler {
    spawned: AtomicUsize,
    pub yields: AtomicUsize,
    pub back_offs: AtomicUsize,
}

impl Scheduler for ThreadScheduler {
    fn spawn(&self, spec: TaskSpec<'_>, entry: TaskEntry) -> Result<TaskHandle, Error> {
        std::thread::Builder::new()
            .name(spec.name.into())
            .spawn(entry)
            .map_err(|_| Error::SpawnFailed)?;
        Ok(TaskHandle(self.spawned.fetch_add(1, Ordering::SeqCst)))
    }

    fn yield_now(&self) {
        self.yields.fetch_add(1, Ordering::Relaxed);
        std::thread::yield_now();
    }

    fn delay_ms(&self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }

    fn start(&self) {}

    fn back_off(&self) {
        self.back_offs.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(1));
    }
}

pub fn framebuffer() -> Arc<Mutex<PackedFramebuffer>> {
    Arc::new(Mutex::new(PackedFramebuffer::new(640, 480)))
}

pub fn carousel() -> Carousel<PackedFramebuffer> {
    let scheduler: Arc<dyn Scheduler> = Arc::new(ThreadScheduler::default());
    Carousel::new(framebuffer(), scheduler)
}
