//! Structured logging for the sea level dashboard.
//!
//! Provides context-rich logging tagged with the pipeline stage and, where
//! relevant, the region being processed. Supports console output with or
//! without timestamps and optional file-based logging.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Filter,
    Aggregate,
    Rank,
    Render,
    Verify,
    Config,
    System,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => write!(f, "LOAD"),
            Stage::Filter => write!(f, "FILTER"),
            Stage::Aggregate => write!(f, "AGG"),
            Stage::Rank => write!(f, "RANK"),
            Stage::Render => write!(f, "RENDER"),
            Stage::Verify => write!(f, "VERIFY"),
            Stage::Config => write!(f, "CONFIG"),
            Stage::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn format_entry(level: LogLevel, stage: Stage, region: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let region_part = region.map(|r| format!(" [{}]", r)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, stage, region_part, message)
    }

    fn log(&self, level: LogLevel, stage: Stage, region: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, stage, region, message);
        let region_part = region.map(|r| format!(" [{}]", r)).unwrap_or_default();

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", stage, region_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", stage, region_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}{}: {}", stage, region_part, message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn dispatch(level: LogLevel, stage: Stage, region: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, stage, region, message);
        }
    }
}

/// Log a general informational message
pub fn info(stage: Stage, region: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, stage, region, message);
}

/// Log a warning message
pub fn warn(stage: Stage, region: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, stage, region, message);
}

/// Log an error message
pub fn error(stage: Stage, region: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, stage, region, message);
}

/// Log a debug message
pub fn debug(stage: Stage, region: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, stage, region, message);
}

// ---------------------------------------------------------------------------
// Load Logging
// ---------------------------------------------------------------------------

/// Log a row isolated by the loader.
pub fn log_rejected_row(row: usize, reason: &str) {
    warn(Stage::Load, None, &format!("row {} rejected: {}", row, reason));
}

/// Picks the level for a load summary: clean loads are informational, loads
/// that kept nothing are errors, anything in between is a warning.
pub fn load_summary_level(total: usize, accepted: usize, rejected: usize) -> LogLevel {
    if rejected == 0 {
        LogLevel::Info
    } else if accepted == 0 || total == 0 {
        LogLevel::Error
    } else {
        LogLevel::Warning
    }
}

/// Log a summary of a dataset load
pub fn log_load_summary(total: usize, accepted: usize, rejected: usize) {
    let message = format!(
        "Load complete: {}/{} rows accepted, {} rejected",
        accepted, total, rejected
    );

    dispatch(
        load_summary_level(total, accepted, rejected),
        Stage::Load,
        None,
        &message,
    );
}
