//! Build-time limits and runtime tuning.

/// Carousel capacity.
pub const MAX_WINDOWS: usize = 10;

/// Per-window input buffer capacity in characters.
pub const KEY_BUF_LEN: usize = 25;

/// Version shown on the splash screen.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runtime settings of a [`crate::system::WindowSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemConfig {
    /// Sleep between keyboard polls when no key is pending.
    pub router_poll_ms: u32,
    /// Info bar refresh period.
    pub infobar_period_ms: u32,
    /// Spawn the info bar task on start.
    pub infobar: bool,
    /// Show the splash screen during I/O init.
    pub splash: bool,
    /// Stack budget of tasks created with a window, in words.
    pub window_task_stack: usize,
    pub window_task_priority: u8,
    pub router_stack: usize,
    pub infobar_stack: usize,
    /// Priority of the router and info bar tasks.
    pub service_priority: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            router_poll_ms: 10,
            infobar_period_ms: 1000,
            infobar: true,
            splash: true,
            window_task_stack: 512,
            window_task_priority: 1,
            router_stack: 128,
            infobar_stack: 256,
            service_priority: 2,
        }
    }
}
