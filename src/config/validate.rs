// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile, RawLoggingSection};
use crate::errors::{Result, TableschedError};
use crate::types::LogLevel;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TableschedError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let log_level = validate_logging(&raw.logging)?;
        Ok(ConfigFile::new_unchecked(raw.schedule, log_level))
    }
}

fn validate_logging(section: &RawLoggingSection) -> Result<Option<LogLevel>> {
    match section.level.as_deref() {
        None => Ok(None),
        Some(s) => s
            .parse::<LogLevel>()
            .map(Some)
            .map_err(|e| TableschedError::ConfigError(format!("[logging].level: {e}"))),
    }
}
