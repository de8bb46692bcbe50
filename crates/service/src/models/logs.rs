use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_text, RecordId};
use crate::errors::ServiceError;

/// Filter value meaning "every service".
pub const ALL_SERVICES: &str = "All Services";
/// Filter value meaning "every level".
pub const ALL_LEVELS: &str = "All Levels";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: RecordId,
    pub service: String,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewLogEntry {
    pub service: String,
    pub level: LogLevel,
    pub message: String,
}

impl NewLogEntry {
    pub fn info(service: &str, message: impl Into<String>) -> Self {
        Self { service: service.to_string(), level: LogLevel::Info, message: message.into() }
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text("service", &self.service)?;
        require_text("message", &self.message)?;
        Ok(())
    }
}

/// Query over the log collection. Absent fields and the `All ...` sentinels
/// both mean "no filter"; a `limit` of zero means no cap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogFilter {
    pub service: Option<String>,
    pub level: Option<String>,
    pub limit: Option<usize>,
}

impl LogFilter {
    fn active<'a>(value: &'a Option<String>, sentinel: &str) -> Option<&'a str> {
        value.as_deref().filter(|v| !v.is_empty() && *v != sentinel)
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(service) = Self::active(&self.service, ALL_SERVICES) {
            if entry.service != service {
                return false;
            }
        }
        if let Some(level) = Self::active(&self.level, ALL_LEVELS) {
            if entry.level.as_str() != level {
                return false;
            }
        }
        true
    }

    /// Filter, then newest first (ties by id), then cap.
    pub fn apply<'a, I>(&self, entries: I) -> Vec<LogEntry>
    where
        I: IntoIterator<Item = &'a LogEntry>,
    {
        let mut out: Vec<LogEntry> =
            entries.into_iter().filter(|e| self.matches(e)).cloned().collect();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            out.truncate(limit);
        }
        out
    }
}
