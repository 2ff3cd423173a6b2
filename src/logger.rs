//! `log` backend.
//!
//! Records are formatted as `[LEVEL target] message` and handed to a sink
//! function, typically a UART writer on the firmware side.

use core::fmt;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Once;

/// Receives one formatted log line, without a trailing newline.
pub type Sink = fn(fmt::Arguments<'_>);

struct SinkLogger {
    sink: Once<Sink>,
}

static LOGGER: SinkLogger = SinkLogger { sink: Once::new() };

impl Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(sink) = self.sink.get() {
            sink(format_args!("[{} {}] {}", label(record.level()), record.target(), record.args()));
        }
    }

    fn flush(&self) {}
}

fn label(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN ",
        Level::Info => "INFO ",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Install the logger. Fails if another logger is already installed; the
/// first sink stays in place.
pub fn init(sink: Sink, level: LevelFilter) -> Result<(), SetLoggerError> {
    LOGGER.sink.call_once(|| sink);
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
