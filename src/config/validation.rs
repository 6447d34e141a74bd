//! Configuration validation logic
//!
//! Load-time checks cover value formats only. Credentials and channel names
//! are checked by each sink when it writes, so a half-configured sink does
//! not stop the process from starting.

use crate::config::error::ConfigError;
use crate::config::settings::{ConsoleSettings, HttpSettings, LoggerSettings, Settings, SinksSettings};
use crate::external::client::parse_base_url;
use crate::sinks::{ChatSinkConfig, PushSinkConfig};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "warning", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

fn validate_level(field: &str, value: &str) -> Result<(), ConfigError> {
    if VALID_LOG_LEVELS.contains(&value.to_lowercase().as_str()) {
        return Ok(());
    }

    Err(ConfigError::Invalid {
        field: field.to_string(),
        message: format!(
            "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
            value
        ),
    })
}

fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    parse_base_url(value)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid {
            field: field.to_string(),
            message: e.to_string(),
        })
}

impl ConsoleSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "logger.console.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - `level` and `notify_level` must be valid level names
    /// - Console format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_level("logger.level", &self.level)?;
        validate_level("logger.notify_level", &self.notify_level)?;
        self.console.validate()
    }
}

impl HttpSettings {
    /// Validate HTTP settings
    ///
    /// # Validation Rules
    /// - Both timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "http.timeout_seconds",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "http.connect_timeout_seconds",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl ChatSinkConfig {
    fn validate_format(&self) -> Result<(), ConfigError> {
        match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => validate_base_url("sinks.chat.base_url", url),
            _ => Ok(()),
        }
    }
}

impl PushSinkConfig {
    fn validate_format(&self) -> Result<(), ConfigError> {
        validate_base_url("sinks.push.base_url", &self.base_url)
    }
}

impl SinksSettings {
    /// Validate the format of every configured sink
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(chat) = &self.chat {
            chat.validate_format()?;
        }
        if let Some(push) = &self.push {
            push.validate_format()?;
        }
        Ok(())
    }
}

impl Settings {
    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.http.validate()?;
        self.sinks.validate()?;
        Ok(())
    }
}
