/// Severity model for diagnostic entries
///
/// This module defines the fixed, totally ordered set of severity levels
/// reported by the Zonemaster engine:
/// `info < notice < warning < error < critical`.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a single diagnostic entry.
///
/// The derived `Ord` follows declaration order, so `Level::Critical` is the
/// greatest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Notice,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// All levels in ascending order.
    pub const ALL: [Level; 5] = [Level::Info, Level::Notice, Level::Warning, Level::Error, Level::Critical];

    /// Canonical lowercase key ("info", "notice", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Notice => "notice",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
        }
    }

    /// Numeric rank, 0 for `info` up to 4 for `critical`.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Levels from most to least severe.
    pub fn descending() -> impl Iterator<Item = Level> {
        Self::ALL.into_iter().rev()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not part of the severity model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown severity level '{}'", self.0)
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for Level {
    type Err = UnknownLevel;

    /// Case-insensitive parse; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "notice" => Ok(Level::Notice),
            "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "critical" => Ok(Level::Critical),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}
