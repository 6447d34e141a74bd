//! Configuration settings structures for notify-sinks
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::external::HttpClientConfig;
use crate::external::client::{DEFAULT_CONNECT_TIMEOUT_SECONDS, DEFAULT_TIMEOUT_SECONDS};
use crate::logger::{ConsoleConfig, LogFormat, LoggerConfig};
use crate::sinks::{ChatNotifierSink, ChatSinkConfig, PushNotifierSink, PushSinkConfig, Sink};

// ============================================================================
// Default value functions
// ============================================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_notify_level() -> String {
    "error".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_connect_timeout_seconds() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECONDS
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
            format: default_log_format(),
        }
    }
}

impl ConsoleSettings {
    /// Convert ConsoleSettings to ConsoleConfig
    pub fn into_console_config(self) -> Result<ConsoleConfig, ConfigError> {
        let format: LogFormat = self.format.parse().map_err(|e: crate::logger::LoggerError| {
            ConfigError::Invalid {
                field: "logger.console.format".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(ConsoleConfig::new(self.enabled, self.colored, format))
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Minimum level forwarded to the notification sinks
    #[serde(default = "default_notify_level")]
    pub notify_level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            notify_level: default_notify_level(),
            console: ConsoleSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to LoggerConfig
    ///
    /// This method transforms the configuration file representation into
    /// the runtime LoggerConfig used by the logger module.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = self.console.into_console_config()?;

        LoggerConfig::new(console_config, self.level, self.notify_level).map_err(|e| {
            ConfigError::Invalid {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings shared by every sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
        }
    }
}

impl HttpSettings {
    pub fn to_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: Duration::from_secs(self.timeout_seconds),
            connect_timeout: Duration::from_secs(self.connect_timeout_seconds),
        }
    }
}

// ============================================================================
// Sink Settings
// ============================================================================

/// Configured notification sinks; a missing table disables that sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SinksSettings {
    #[serde(default)]
    pub chat: Option<ChatSinkConfig>,

    #[serde(default)]
    pub push: Option<PushSinkConfig>,
}

impl SinksSettings {
    pub fn is_empty(&self) -> bool {
        self.chat.is_none() && self.push.is_none()
    }

    /// Build the configured sinks, each with its own lazily created client
    pub fn build(&self, http: &HttpSettings) -> Vec<Arc<dyn Sink>> {
        let client_config = http.to_client_config();
        let mut sinks: Vec<Arc<dyn Sink>> = Vec::new();

        if let Some(chat) = &self.chat {
            sinks.push(Arc::new(
                ChatNotifierSink::new(chat.clone()).with_http_config(client_config),
            ));
        }

        if let Some(push) = &self.push {
            sinks.push(Arc::new(
                PushNotifierSink::new(push.clone()).with_http_config(client_config),
            ));
        }

        sinks
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpSettings,

    /// Notification sinks
    #[serde(default)]
    pub sinks: SinksSettings,
}
