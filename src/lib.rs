//! Multi-window text terminal core for small RTOS targets.
//!
//! Windows share one packed-pixel display and one keyboard. A router task
//! sends every key to the focused window; Shift+Tab moves focus around the
//! carousel. Each window has its own text grid, colors and input buffer,
//! and the task owning it reads with blocking `getchar`, `read_string` and
//! `scanf`.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod carousel;
pub mod color;
pub mod config;
pub mod drivers;
pub mod error;
pub mod infobar;
pub mod keys;
pub mod logger;
pub mod router;
pub mod rtos;
pub mod scan;
pub mod splash;
pub mod system;
pub mod window;

#[cfg(test)]
mod testing;

pub use carousel::Carousel;
pub use color::Color;
pub use config::SystemConfig;
pub use error::Error;
pub use router::{KeyRouter, Routed};
pub use rtos::Scheduler;
pub use scan::ScanValue;
pub use system::WindowSystem;
pub use window::{Window, WindowId};

/// Formatted output into a window.
#[macro_export]
macro_rules! wprint {
    ($w:expr, $($arg:tt)*) => {
        $w.print(format_args!($($arg)*))
    };
}

/// Formatted output into a window, followed by a line break.
#[macro_export]
macro_rules! wprintln {
    ($w:expr) => {
        $w.write(b'\n')
    };
    ($w:expr, $($arg:tt)*) => {{
        $w.print(format_args!($($arg)*));
        $w.write(b'\n');
    }};
}
