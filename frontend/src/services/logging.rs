use std::cell::Cell;
use std::fmt;

use shared::LogLevel;

thread_local! {
    static MIN_LEVEL: Cell<LogLevel> = Cell::new(LogLevel::Info);
}

/// One console line: level, emitting component and message
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord<'a> {
    pub level: LogLevel,
    pub component: &'a str,
    pub message: &'a str,
}

impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{}] {}",
            self.level.as_str().to_uppercase(),
            self.component,
            self.message
        )
    }
}

pub struct Logger;

impl Logger {
    pub fn set_min_level(level: LogLevel) {
        MIN_LEVEL.with(|min| min.set(level));
    }

    pub fn min_level() -> LogLevel {
        MIN_LEVEL.with(|min| min.get())
    }

    pub fn enabled(level: LogLevel) -> bool {
        level >= Self::min_level()
    }

    pub fn debug_with_component(component: &str, message: &str) {
        Self::log(LogLevel::Debug, message, component);
    }

    pub fn info_with_component(component: &str, message: &str) {
        Self::log(LogLevel::Info, message, component);
    }

    pub fn warn_with_component(component: &str, message: &str) {
        Self::log(LogLevel::Warn, message, component);
    }

    pub fn error_with_component(component: &str, message: &str) {
        Self::log(LogLevel::Error, message, component);
    }

    fn log(level: LogLevel, message: &str, component: &str) {
        if !Self::enabled(level) {
            return;
        }

        let line = LogRecord {
            level,
            component,
            message,
        }
        .to_string();

        match level {
            LogLevel::Debug => gloo::console::debug!(line),
            LogLevel::Info => gloo::console::info!(line),
            LogLevel::Warn => gloo::console::warn!(line),
            LogLevel::Error => gloo::console::error!(line),
        }
    }
}
