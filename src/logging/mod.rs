//! Logging and output control
//!
//! This module provides the [`Logger`] for controlling output verbosity and formatting
//! log lines. Every message can additionally be captured by a [`LogRecorder`], which
//! lets callers inspect what a run reported after the fact.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Severity attached to every emitted message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Shared in-memory sink for log records
#[derive(Debug, Clone, Default)]
pub struct LogRecorder {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl LogRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: LogLevel, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push(LogRecord {
                level,
                message: message.to_string(),
            });
        }
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at exactly `level`
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|record| record.level == level)
            .map(|record| record.message)
            .collect()
    }

    pub fn count_at(&self, level: LogLevel) -> usize {
        self.messages_at(level).len()
    }
}

/// Logger responsible for all user-visible output
#[derive(Debug, Clone)]
pub struct Logger {
    pub verbose: bool,
    pub quiet: bool,
    start_time: Instant,
    recorder: Option<LogRecorder>,
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            quiet: false,
            start_time: Instant::now(),
            recorder: None,
        }
    }

    pub fn new_quiet() -> Self {
        Self {
            verbose: false,
            quiet: true,
            start_time: Instant::now(),
            recorder: None,
        }
    }

    /// Attach a recorder that receives every message regardless of verbosity
    pub fn with_recorder(mut self, recorder: LogRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    fn record(&self, level: LogLevel, message: &str) {
        if let Some(recorder) = &self.recorder {
            recorder.push(level, message);
        }
    }

    /// Main section heading
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n=== {} ===", title);
        }
    }

    // Structured logging levels
    pub fn trace(&self, message: &str) {
        self.record(LogLevel::Trace, message);
        if self.verbose && !self.quiet {
            println!("{} 🔍 TRACE: {}", self.timestamp(), message);
        }
    }

    pub fn debug(&self, message: &str) {
        self.record(LogLevel::Debug, message);
        if self.verbose && !self.quiet {
            println!("{} 🐛 DEBUG: {}", self.timestamp(), message);
        }
    }

    /// Information message
    pub fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
        if !self.quiet {
            println!("ℹ️  {}", message);
        }
    }

    /// Success message
    pub fn success(&self, message: &str) {
        self.record(LogLevel::Success, message);
        if !self.quiet {
            println!("✅ {}", message);
        }
    }

    /// Warning message
    pub fn warning(&self, message: &str) {
        self.record(LogLevel::Warning, message);
        if !self.quiet {
            println!("⚠️  WARNING: {}", message);
        }
    }

    /// Error message, shown even in quiet mode
    pub fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
        eprintln!("❌ ERROR: {}", message);
    }

    /// Progress information
    pub fn progress(&self, message: &str) {
        if !self.quiet {
            print!("⏳ {}...", message);
            let _ = io::stdout().flush();
        }
    }

    /// Progress completion
    pub fn progress_done(&self) {
        if !self.quiet {
            println!(" Done");
        }
    }

    /// Detailed information (only shown in verbose mode)
    pub fn detail(&self, message: &str) {
        self.record(LogLevel::Debug, message);
        if self.verbose && !self.quiet {
            println!("   {}", message);
        }
    }

    /// Key-value pair summary display
    pub fn summary_kv(&self, title: &str, items: &[(&str, String)]) {
        if !self.quiet {
            println!("\n📋 {}", title);
            println!("{}", "─".repeat(title.len() + 3));
            for (key, value) in items {
                println!("  • {}: {}", key, value);
            }
        }
    }

    /// Format file size in human-readable units
    pub fn format_size(&self, bytes: u64) -> String {
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else if bytes < 1024 * 1024 * 1024 {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        } else {
            format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
        }
    }

    /// Format duration in human-readable format
    pub fn format_duration(&self, duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs < 60 {
            format!("{:.1}s", duration.as_secs_f64())
        } else if secs < 3600 {
            format!("{}m{:02}s", secs / 60, secs % 60)
        } else {
            format!("{}h{:02}m{:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }

    /// Format transfer speed in human-readable format
    pub fn format_speed(&self, bytes_per_sec: u64) -> String {
        format!("{}/s", self.format_size(bytes_per_sec))
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn timestamp(&self) -> String {
        format!("[{:8.3}s]", self.start_time.elapsed().as_secs_f64())
    }
}
