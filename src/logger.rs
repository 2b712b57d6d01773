//! Structured logging system with visual formatting.
//!
//! This module provides a logging system designed for goldenhour's visual output style.
//! It includes different log levels and special formatting functions for creating
//! structured reports with Unicode box drawing characters.
//!
//! Logging can be switched off at runtime (JSON output, tests), and debug
//! messages are only shown once debug output has been enabled.

use std::sync::atomic::{AtomicBool, Ordering};

// Use an AtomicBool instead of thread_local for thread safety
static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

// Width of the label column in field lines
const FIELD_LABEL_WIDTH: usize = 22;

/// Log level enumeration for categorizing message importance.
#[derive(Debug)]
pub enum LogLevel {
    Log,  // Normal operational logs
    Warn, // Warning messages (non-fatal issues)
    Err,  // Error messages (recoverable failures)
    Crit, // Critical errors (may require user intervention)
    Info, // Informational messages (status updates)
}

/// Main logging interface providing structured output formatting.
pub struct Log;

impl Log {
    /// Enable or disable logging.
    ///
    /// Machine-readable output turns this off so nothing but JSON reaches
    /// stdout.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable `[LOG]` debug messages.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Main log function with level-based prefixes.
    ///
    /// # Arguments
    /// * `level` - LogLevel indicating message importance
    /// * `message` - Text content to log
    pub fn log(level: LogLevel, message: &str) {
        // Skip logging if disabled
        if !Self::is_enabled() {
            return;
        }

        match level {
            LogLevel::Log => print!("[LOG] "),
            LogLevel::Warn => print!("[WARN] "),
            LogLevel::Err => print!("[ERR] "),
            LogLevel::Crit => print!("[CRIT] "),
            LogLevel::Info => print!("[INFO] "),
        }

        println!("{}", message);
    }

    // ═══ Convenience Methods for Common Log Levels ═══

    /// Log an error message.
    pub fn log_error(message: &str) {
        Self::log(LogLevel::Err, message);
    }

    /// Log a warning message.
    pub fn log_warning(message: &str) {
        Self::log(LogLevel::Warn, message);
    }

    /// Log an informational message.
    pub fn log_info(message: &str) {
        Self::log(LogLevel::Info, message);
    }

    /// Log a debug message. Silent unless debug output is enabled.
    pub fn log_debug(message: &str) {
        if Self::is_debug() {
            Self::log(LogLevel::Log, message);
        }
    }

    /// Log a critical error message.
    pub fn log_critical(message: &str) {
        Self::log(LogLevel::Crit, message);
    }

    // ═══ Visual Formatting Functions ═══

    /// Log a decorated message with visual branching indicator.
    ///
    /// Used for main status messages and important information.
    pub fn log_decorated(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┣ {}", message);
    }

    /// Log an indented message for sub-items or details.
    pub fn log_indented(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃   {}", message);
    }

    /// Log an indented `label value` line with the values aligned.
    pub fn log_field(label: &str, value: &str) {
        Self::log_indented(&format_field(label, value));
    }

    /// Log a visual pipe separator.
    pub fn log_pipe() {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
    }

    /// Log a block start message with visual separation.
    ///
    /// Used for report sections and window changes in watch mode.
    pub fn log_block_start(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
        println!("┣ {}", message);
    }

    /// Log the application version header.
    pub fn log_version() {
        if !Self::is_enabled() {
            return;
        }
        println!("┏ goldenhour v{} ━━╸", env!("CARGO_PKG_VERSION"));
        println!("┃");
    }

    /// Log the final termination marker.
    pub fn log_end() {
        if !Self::is_enabled() {
            return;
        }
        println!("╹");
    }
}

/// Pad `label` so values line up in a column.
fn format_field(label: &str, value: &str) -> String {
    format!("{:<width$}{}", format!("{label}:"), value, width = FIELD_LABEL_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_aligns_values() {
        let a = format_field("Sunrise", "05:25:12");
        let b = format_field("Evening golden hour", "19:50 - 21:02");

        assert!(a.starts_with("Sunrise:"));
        assert_eq!(a.find("05:25"), Some(FIELD_LABEL_WIDTH));
        assert_eq!(b.find("19:50"), Some(FIELD_LABEL_WIDTH));
    }

    #[test]
    fn test_format_field_long_label_still_separated() {
        let long = "A label that is much longer than the column";
        let line = format_field(long, "value");
        assert_eq!(line, format!("{long}:value"));
    }
}
