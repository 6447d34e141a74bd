//! Configuration loader for notify-sinks
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "NOTIFY_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "NOTIFY_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "NOTIFY";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Deployment profile selecting the optional `{profile}.toml` layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Profile {
    #[default]
    #[value(alias = "dev")]
    Development,
    Test,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl Profile {
    pub const ENV_VAR: &'static str = "NOTIFY_APP_ENV";

    /// Unset means development; anything unrecognised is an error
    fn from_env() -> Result<Self, ConfigError> {
        let Ok(raw) = std::env::var(Self::ENV_VAR) else {
            return Ok(Self::default());
        };

        <Self as ValueEnum>::from_str(raw.trim(), true)
            .map_err(|reason| ConfigError::UnknownProfile { value: raw, reason })
    }

    fn layer_file(self) -> Option<String> {
        self.to_possible_value()
            .map(|value| format!("{}.toml", value.get_name()))
    }
}

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration (required)
/// 2. `{profile}.toml` - Profile-specific configuration (optional)
/// 3. `local.toml` - Local overrides (optional)
/// 4. `NOTIFY_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    profile: Profile,
}

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// This reads environment variables to determine:
    /// - Configuration directory (`NOTIFY_CONFIG_DIR`)
    /// - Specific configuration file (`NOTIFY_CONFIG_FILE`)
    /// - Deployment profile (`NOTIFY_APP_ENV`)
    ///
    /// # Errors
    ///
    /// Returns an error if both `NOTIFY_CONFIG_DIR` and `NOTIFY_CONFIG_FILE` are set,
    /// or if `NOTIFY_APP_ENV` names no known profile.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir_var = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && config_dir_var.is_some() {
            return Err(ConfigError::ConflictingSources);
        }

        Ok(Self {
            config_dir: config_dir_var
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            profile: Profile::from_env()?,
        })
    }

    /// Load a single file instead of the layered directory
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Override the profile read from `NOTIFY_APP_ENV`
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Load configuration from all sources
    ///
    /// If a single configuration file is set, loads only that file.
    /// Otherwise, performs layered loading from the configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` is not found (when using layered loading)
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(ConfigError::Layout)?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        // NOTIFY_SINKS__PUSH__API_TOKEN -> sinks.push.api_token
        let builder = Self::add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let builder = match self.profile.layer_file() {
            Some(name) => Self::add_file_source(builder, &self.config_dir.join(name), false)?,
            None => builder,
        };

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.is_file() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
    }

    /// Environment variables with prefix `NOTIFY_` are mapped to configuration keys.
    /// Double underscores (`__`) separate nested keys.
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests touching process environment run one at a time
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Sets environment variables for one test and restores them on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            let mut guard = Self {
                vars_to_restore: Vec::new(),
            };
            guard.remove(CONFIG_DIR_ENV);
            guard.remove(CONFIG_FILE_ENV);
            guard.remove(Profile::ENV_VAR);
            guard
        }

        fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore.push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.vars_to_restore.push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_CONFIG: &str = r#"
[logger]
level = "info"
notify_level = "error"

[logger.console]
enabled = true
colored = false

[http]
timeout_seconds = 30

[sinks.push]
api_token = "default-token"
messages_title = "Default title"
"#;

    #[test]
    fn test_config_loader_new_default() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir(), Path::new("config"));
        assert!(loader.config_file().is_none());
        assert_eq!(loader.profile(), Profile::Development);
    }

    #[test]
    fn test_config_dir_and_file_conflict() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(err @ ConfigError::ConflictingSources) => {
                let msg = err.to_string();
                assert!(msg.contains("NOTIFY_CONFIG_DIR"));
                assert!(msg.contains("NOTIFY_CONFIG_FILE"));
            }
            other => panic!("Expected ConflictingSources, got {other:?}"),
        }
    }

    #[test]
    fn test_config_loader_profile_from_env() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        env.set(Profile::ENV_VAR, "production");

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.profile(), Profile::Production);

        let loader = loader.with_profile(Profile::Test);
        assert_eq!(loader.profile(), Profile::Test);
    }

    #[test]
    fn test_profile_aliases_and_case() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        for (raw, expected) in [
            ("dev", Profile::Development),
            ("stage", Profile::Staging),
            ("PROD", Profile::Production),
            (" test ", Profile::Test),
        ] {
            env.set(Profile::ENV_VAR, raw);
            assert_eq!(ConfigLoader::new().unwrap().profile(), expected, "{raw:?}");
        }
    }

    #[test]
    fn test_unknown_profile_is_rejected() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        env.set(Profile::ENV_VAR, "qa");

        match ConfigLoader::new() {
            Err(ConfigError::UnknownProfile { value, .. }) => assert_eq!(value, "qa"),
            other => panic!("Expected UnknownProfile, got {other:?}"),
        }
    }

    #[test]
    fn test_profile_layer_file_names() {
        assert_eq!(Profile::Production.layer_file().as_deref(), Some("production.toml"));
        assert_eq!(Profile::default().layer_file().as_deref(), Some("development.toml"));
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        match ConfigLoader::new().unwrap().load() {
            Err(ConfigError::MissingFile { path }) => assert!(path.ends_with("default.toml")),
            other => panic!("Expected MissingFile error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_full_precedence_chain() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        let staging_config = r#"
[logger]
level = "debug"

[sinks.push]
messages_title = "Staging alert"
channel_tag = "staging"
"#;

        let local_config = r#"
[sinks.push]
channel_tag = "local"
"#;

        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_CONFIG),
            ("staging.toml", staging_config),
            ("local.toml", local_config),
        ]);

        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(Profile::ENV_VAR, "staging");
        env.set("NOTIFY_SINKS__PUSH__API_TOKEN", "env-token");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");
        let push = settings.sinks.push.expect("push sink configured");

        // Environment variables win over every file
        assert_eq!(push.api_token, "env-token");
        // local.toml overrides staging.toml
        assert_eq!(push.channel_tag.as_deref(), Some("local"));
        // staging.toml overrides default.toml
        assert_eq!(push.messages_title, "Staging alert");
        assert_eq!(settings.logger.level, "debug");
        // default.toml provides the rest
        assert_eq!(settings.logger.notify_level, "error");
        assert!(settings.sinks.chat.is_none());
    }

    #[test]
    fn test_optional_files_not_required() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_CONFIG)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(Profile::ENV_VAR, "production");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");
        assert_eq!(settings.sinks.push.unwrap().api_token, "default-token");
    }

    #[test]
    fn test_load_single_file_mode() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        let single_config = r#"
[sinks.chat]
domain = "myteam"
api_key = "xoxb-1"
channel = "alerts"
"#;

        let temp_dir = setup_config_dir(&[("single.toml", single_config)]);
        let config_file_path = temp_dir.path().join("single.toml");
        env.set(CONFIG_FILE_ENV, config_file_path.to_str().unwrap());

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");
        let chat = settings.sinks.chat.expect("chat sink configured");
        assert_eq!(chat.channel, "alerts");
        assert!(settings.sinks.push.is_none());
        assert_eq!(settings.logger.level, "info");
    }

    #[test]
    fn test_with_config_file_skips_layers() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();

        let temp_dir = setup_config_dir(&[("custom.toml", "[http]\ntimeout_seconds = 5\n")]);

        let settings = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("custom.toml"))
            .load()
            .expect("Should load settings");
        assert_eq!(settings.http.timeout_seconds, 5);
    }

    #[test]
    fn test_load_rejects_mistyped_values() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();

        let temp_dir = setup_config_dir(&[("typo.toml", "[http]\ntimeout_seconds = \"soon\"\n")]);

        let result = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("typo.toml"))
            .load();
        assert!(matches!(result, Err(ConfigError::Layout(_))));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();

        let temp_dir = setup_config_dir(&[("bad.toml", "[logger]\nnotify_level = \"loud\"\n")]);

        let result = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("bad.toml"))
            .load();
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { ref field, .. }) if field == "logger.notify_level"
        ));
    }
}
