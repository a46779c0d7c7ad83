//! Append-only run log mirrored to the console.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::Result;
use crate::ui::SetupTheme;

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

/// A single line of the run log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// When the entry was emitted.
    pub timestamp: DateTime<Utc>,
    /// Info or error.
    pub level: LogLevel,
    /// The message without timestamp or level prefix.
    pub message: String,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }

    /// Render the line as written to the log file.
    ///
    /// `[2024-01-13T10:00:00.000Z] message` or
    /// `[2024-01-13T10:00:00.000Z] ERROR: message`.
    pub fn format_line(&self) -> String {
        let ts = self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        match self.level {
            LogLevel::Info => format!("[{}] {}", ts, self.message),
            LogLevel::Error => format!("[{}] ERROR: {}", ts, self.message),
        }
    }
}

/// Process-wide run log.
///
/// Every entry is appended to the sink file (when one is open), mirrored to
/// stdout or stderr (when console output is enabled), and kept in memory in
/// emission order. The file is flushed after each write and again on drop.
pub struct Logger {
    sink: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    console: bool,
    theme: SetupTheme,
    entries: Vec<LogEntry>,
}

impl Logger {
    /// Open (or create) the log file in append mode and mirror to the console.
    pub fn open(path: &Path, theme: SetupTheme) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!("Appending run log to {}", path.display());
        Ok(Self {
            sink: Some(BufWriter::new(file)),
            path: Some(path.to_path_buf()),
            console: true,
            theme,
            entries: Vec::new(),
        })
    }

    /// Console-only logger with no file sink.
    pub fn console(theme: SetupTheme) -> Self {
        Self {
            sink: None,
            path: None,
            console: true,
            theme,
            entries: Vec::new(),
        }
    }

    /// Logger that only records entries in memory (for tests).
    pub fn in_memory() -> Self {
        Self {
            sink: None,
            path: None,
            console: false,
            theme: SetupTheme::plain(),
            entries: Vec::new(),
        }
    }

    /// Disable or enable console mirroring.
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Path of the log file, if one is open.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Log an informational line.
    pub fn info(&mut self, message: impl Into<String>) {
        self.append(LogEntry::now(LogLevel::Info, message));
    }

    /// Log an error line.
    pub fn error(&mut self, message: impl Into<String>) {
        self.append(LogEntry::now(LogLevel::Error, message));
    }

    /// All entries emitted so far, in order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Messages of all entries, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }

    /// Messages of error entries only.
    pub fn errors(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.level == LogLevel::Error)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Flush the file sink.
    pub fn flush(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.flush() {
                tracing::warn!("Failed to flush run log: {}", e);
            }
        }
    }

    fn append(&mut self, entry: LogEntry) {
        if let Some(sink) = self.sink.as_mut() {
            // A broken log file must not abort provisioning.
            if let Err(e) = writeln!(sink, "{}", entry.format_line()).and_then(|_| sink.flush()) {
                tracing::warn!("Failed to write run log: {}", e);
            }
        }

        if self.console {
            match entry.level {
                LogLevel::Info => println!("{}", entry.message),
                LogLevel::Error => eprintln!("{}", self.theme.format_error(&entry.message)),
            }
        }

        self.entries.push(entry);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("path", &self.path)
            .field("console", &self.console)
            .field("entries", &self.entries.len())
            .finish()
    }
}
