//! Errors raised while loading settings

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `default.toml` or the file named by `--config` is missing
    #[error("required configuration file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("NOTIFY_CONFIG_DIR and NOTIFY_CONFIG_FILE are both set; pick the directory or the single file")]
    ConflictingSources,

    /// `NOTIFY_APP_ENV` names no known profile
    #[error("unknown profile '{value}' in NOTIFY_APP_ENV: {reason}")]
    UnknownProfile { value: String, reason: String },

    /// A loaded value has the wrong format
    #[error("invalid setting {field}: {message}")]
    Invalid { field: String, message: String },

    /// The merged sources do not fit the settings layout
    #[error("settings do not match the expected layout: {0}")]
    Layout(#[source] config::ConfigError),

    /// Reading or merging a source failed
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}
