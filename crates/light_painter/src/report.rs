//! User-facing messages produced while commands run
//!
//! Every recoverable problem turns into a [`Report`] instead of being swallowed.
//! Reports are logged as they are created.

use std::fmt;

use crate::error::PaintError;

/// Severity of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportLevel {
    /// Informational
    Info,
    /// A fallback was used
    Warning,
    /// Part of the operation failed
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Severity
    pub level: ReportLevel,
    /// Message text
    pub message: String,
}

impl Report {
    /// Create a report and log it at the matching level
    pub fn new(level: ReportLevel, message: impl Into<String>) -> Self {
        let message = message.into();
        match level {
            ReportLevel::Info => log::info!("{message}"),
            ReportLevel::Warning => log::warn!("{message}"),
            ReportLevel::Error => log::error!("{message}"),
        }
        Self { level, message }
    }

    /// Informational report
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ReportLevel::Info, message)
    }

    /// Warning report
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ReportLevel::Warning, message)
    }

    /// Error report
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ReportLevel::Error, message)
    }
}

impl From<&PaintError> for Report {
    fn from(err: &PaintError) -> Self {
        Self::error(err.to_string())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.level, self.message)
    }
}
