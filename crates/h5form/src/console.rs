//! Console output with history
//!
//! Host-facing log lines go through [`Console`]: every entry is kept in a
//! history, and written to an optional [`LogSink`]. Without a sink logging is
//! a no-op that reports `false`. The console also owns the debug flag shared
//! by every form bound through the same [`H5Form`](crate::H5Form).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::PLUGIN_NAME;

/// Console entry level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Log,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a level name. Unknown names fall back to [`LogLevel::Log`].
    pub fn parse(name: &str) -> Self {
        match name {
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Log,
        }
    }
}

/// One logged entry, as recorded in the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Destination for console lines.
pub trait LogSink: Send + Sync {
    fn write(&self, level: LogLevel, line: &str);
}

/// Forwards console lines to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, level: LogLevel, line: &str) {
        match level {
            LogLevel::Log => tracing::info!("{}", line),
            LogLevel::Warn => tracing::warn!("{}", line),
            LogLevel::Error => tracing::error!("{}", line),
        }
    }
}

pub struct Console {
    sink: Option<Arc<dyn LogSink>>,
    debug: AtomicBool,
    history: Mutex<Vec<LogEntry>>,
}

impl Console {
    pub fn new(sink: Option<Arc<dyn LogSink>>) -> Self {
        Self {
            sink,
            debug: AtomicBool::new(false),
            history: Mutex::new(Vec::new()),
        }
    }

    /// A console that only keeps history.
    pub fn silent() -> Self {
        Self::new(None)
    }

    pub fn set_debug(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    /// Records `message` and writes it to the sink with the plugin prefix.
    ///
    /// Returns `true` if a sink received the line.
    pub fn log(&self, message: impl Into<String>, level: LogLevel) -> bool {
        let message = message.into();

        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry {
                level,
                message: message.clone(),
            });

        match &self.sink {
            Some(sink) => {
                sink.write(level, &format!("{}: {}", PLUGIN_NAME, message));
                true
            }
            None => false,
        }
    }

    /// Logs only while debug is on.
    pub fn debug(&self, message: impl Into<String>) -> bool {
        if !self.debug_enabled() {
            return false;
        }
        self.log(message, LogLevel::Log)
    }

    pub fn history(&self) -> Vec<LogEntry> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(Some(Arc::new(TracingSink)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CaptureSink(Mutex<Vec<(LogLevel, String)>>);

    impl LogSink for CaptureSink {
        fn write(&self, level: LogLevel, line: &str) {
            self.0.lock().unwrap().push((level, line.to_string()));
        }
    }

    #[test]
    fn test_log_levels() {
        let sink = Arc::new(CaptureSink::default());
        let console = Console::new(Some(sink.clone()));

        assert!(console.log("test", LogLevel::Log));
        assert!(console.log("test", LogLevel::Warn));
        assert!(console.log("test", LogLevel::Error));

        let lines = sink.0.lock().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], (LogLevel::Warn, "H5Form: test".to_string()));
    }

    #[test]
    fn test_unknown_level_is_log() {
        assert_eq!(LogLevel::parse("warn"), LogLevel::Warn);
        assert_eq!(LogLevel::parse("error"), LogLevel::Error);
        assert_eq!(LogLevel::parse("shout"), LogLevel::Log);
    }

    #[test]
    fn test_without_sink_logging_reports_false() {
        let console = Console::silent();
        assert!(!console.log("nobody listens", LogLevel::Warn));
        // Still recorded for later reference
        assert_eq!(
            console.history(),
            vec![LogEntry {
                level: LogLevel::Warn,
                message: "nobody listens".to_string()
            }]
        );
    }

    #[test]
    fn test_debug_gating() {
        let console = Console::new(Some(Arc::new(CaptureSink::default())));
        assert!(!console.debug("hidden"));
        assert!(console.history().is_empty());

        console.set_debug(true);
        assert!(console.debug("shown"));
        assert_eq!(console.history().len(), 1);
    }
}
