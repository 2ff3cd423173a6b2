//! Boot splash screen.

use core::fmt::Write;

use spin::Mutex;

use crate::color::Color;
use crate::config::VERSION;
use crate::drivers::{KeySource, PixelDriver};
use crate::rtos::{self, Scheduler};

/// Paint the welcome screen.
pub fn draw<D: PixelDriver>(display: &mut D, kernel: &str) {
    display.set_cursor(10, 170);
    display.set_text_size(3);
    display.set_text_color(Color::White, Color::Black);
    display.print("Welcome to the");

    display.set_text_size(4);
    display.set_text_color(Color::Red, Color::Black);
    display.print("\n   Pico ");
    display.set_text_color(Color::Green, Color::Black);
    display.print("Windowing ");
    display.set_text_color(Color::Blue, Color::Black);
    display.print("System");

    display.set_text_size(2);
    display.set_cursor(0, 237);
    display.set_text_color(Color::Yellow, Color::Black);
    let mut line: heapless::String<64> = heapless::String::new();
    let _ = write!(line, "\n\n\n\n\n\nver. {}\n", VERSION);
    display.print(&line);

    line.clear();
    let _ = write!(line, "Based on {}\n", kernel);
    display.set_text_color(Color::White, Color::Black);
    display.print(&line);
}

/// Paint the welcome screen and wait for any key. The key is consumed.
pub fn show<D: PixelDriver, K: KeySource>(
    display: &Mutex<D>,
    keyboard: &mut K,
    scheduler: &dyn Scheduler,
    poll_ms: u32,
) {
    draw(&mut *rtos::lock(display, scheduler), scheduler.kernel_name());
    log::info!("splash shown, waiting for a key");

    while !keyboard.key_available() {
        scheduler.delay_ms(poll_ms);
    }
    match keyboard.read_key() {
        Ok(key) => log::debug!("splash dismissed with {:#04x}", key),
        Err(e) => log::warn!("splash key read failed: {:?}", e),
    }
}
