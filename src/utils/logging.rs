//! Structured Logging with Sensitive Data Redaction
//!
//! Conversion and signing code logs through [`LogEntry`] so that key
//! material never reaches stderr in the clear. Each field is redacted
//! according to its key name (see [`Redaction::for_key`]).
//!
//! Output goes to stderr, one line per entry:
//!
//! ```text
//! [2026-01-01T00:00:00.000Z] WARN [signer] rejected signature recovery id | v=29
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

static MIN_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// Emit entries at `level` and above
pub fn set_level(level: LogLevel) {
    MIN_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn level() -> LogLevel {
    LogLevel::from_u8(MIN_LEVEL.load(Ordering::Relaxed))
}

pub fn enable_debug() {
    set_level(LogLevel::Debug);
}

pub fn disable_debug() {
    set_level(LogLevel::Info);
}

pub fn is_debug_enabled() -> bool {
    level() == LogLevel::Debug
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// MARK: - Redaction

const SECRET_KEYS: &[&str] = &["private", "privkey", "priv_key", "secret", "scalar", "seed"];
const IDENTITY_KEYS: &[&str] = &["address", "pubkey", "pub_key", "signer", "expected", "recovered"];
const BLOB_KEYS: &[&str] = &["digest", "hash", "signature", "sig"];

/// How much of a field value survives into the log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redaction {
    /// Only the length is kept
    Full,
    /// The first `head` and last `tail` characters are kept; a leading
    /// `0x` does not count towards `head`
    Edges { head: usize, tail: usize },
    None,
}

impl Redaction {
    /// Addresses and public keys
    pub const IDENTITY: Redaction = Redaction::Edges { head: 6, tail: 4 };
    /// Digests and signatures
    pub const BLOB: Redaction = Redaction::Edges { head: 10, tail: 6 };

    /// Pick a redaction from the field name. Secret-looking names win over
    /// everything else.
    pub fn for_key(key: &str) -> Self {
        let key = key.to_ascii_lowercase();
        let matches = |names: &[&str]| names.iter().any(|n| key.contains(n));

        if matches(SECRET_KEYS) {
            Redaction::Full
        } else if matches(IDENTITY_KEYS) {
            Redaction::IDENTITY
        } else if matches(BLOB_KEYS) {
            Redaction::BLOB
        } else {
            Redaction::None
        }
    }

    pub fn apply(self, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            return "[EMPTY]".to_string();
        }

        match self {
            Redaction::None => value.to_string(),
            Redaction::Full => format!("[REDACTED:{}chars]", value.len()),
            Redaction::Edges { head, tail } => {
                let marker = if value.starts_with("0x") { 2 } else { 0 };
                let head = marker + head;
                if !value.is_ascii() || value.len() <= head + tail + 3 {
                    return value.to_string();
                }
                format!("{}...{}", &value[..head], &value[value.len() - tail..])
            }
        }
    }
}

// MARK: - Entries

/// Structured log entry
#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field, redacted by its name
    pub fn field(self, key: &'static str, value: impl fmt::Display) -> Self {
        self.with_redaction(key, value, Redaction::for_key(key))
    }

    /// Add a field that is always fully redacted
    pub fn redacted_field(self, key: &'static str, value: impl fmt::Display) -> Self {
        self.with_redaction(key, value, Redaction::Full)
    }

    /// Add an address or public key field
    pub fn address_field(self, key: &'static str, address: &str) -> Self {
        self.with_redaction(key, address, Redaction::IDENTITY)
    }

    fn with_redaction(mut self, key: &'static str, value: impl fmt::Display, redaction: Redaction) -> Self {
        self.fields.push((key, redaction.apply(&value.to_string())));
        self
    }

    fn render(&self) -> String {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let mut line = format!("[{}] {} [{}] {}", timestamp, self.level, self.module, self.message);

        for (i, (key, value)) in self.fields.iter().enumerate() {
            line.push_str(if i == 0 { " | " } else { " " });
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }
        line
    }

    /// Whether the current level lets this entry through
    pub fn enabled(&self) -> bool {
        self.level >= level()
    }

    pub fn log(self) {
        if !self.enabled() {
            return;
        }
        eprintln!("{}", self.render());
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __k1_log {
    ($level:ident, $module:expr, $msg:expr) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::$level,
            $module,
            $msg
        )
        .log()
    };
    ($level:ident, $module:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::$level,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

/// `log_debug!(module, message, key = value, ...)`
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => { $crate::__k1_log!(Debug, $($arg)+) };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => { $crate::__k1_log!(Info, $($arg)+) };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)+) => { $crate::__k1_log!(Warn, $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => { $crate::__k1_log!(Error, $($arg)+) };
}
