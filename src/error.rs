use core::fmt;

/// Window system errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Every carousel slot is taken.
    CarouselFull,
    /// The window is not registered in this carousel.
    UnknownWindow,
    /// The scheduler refused to create a task.
    SpawnFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CarouselFull => write!(f, "window carousel is full"),
            Error::UnknownWindow => write!(f, "unknown window"),
            Error::SpawnFailed => write!(f, "task creation failed"),
        }
    }
}
