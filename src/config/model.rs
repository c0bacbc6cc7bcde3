// src/config/model.rs

use serde::Deserialize;

use crate::types::LogLevel;

/// Configuration as read from a TOML document, before validation.
///
/// ```toml
/// [schedule]
/// checked_updates = true
///
/// [logging]
/// level = "debug"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub schedule: ScheduleSection,

    #[serde(default)]
    pub logging: RawLoggingSection,
}

/// `[schedule]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSection {
    /// Whether `Schedule::complete` / `Schedule::execute` check the
    /// preconditions of `update_after_execution`.
    #[serde(default = "default_true")]
    pub checked_updates: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            checked_updates: true,
        }
    }
}

/// `[logging]` section as written in the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLoggingSection {
    /// "error", "warn", "info", "debug" or "trace". Unset means "let the
    /// environment decide".
    #[serde(default)]
    pub level: Option<String>,
}

/// Validated configuration.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)` or the
/// loader functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub schedule: ScheduleSection,
    pub log_level: Option<LogLevel>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(schedule: ScheduleSection, log_level: Option<LogLevel>) -> Self {
        Self {
            schedule,
            log_level,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(ScheduleSection::default(), None)
    }
}
