//! Configuration management module for notify-sinks
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Deployment profiles (development, test, staging, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{profile}.toml` - Profile-specific configuration
//! 3. `local.toml` - Local overrides (not committed to version control)
//! 4. `NOTIFY_*` environment variables

pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use error::ConfigError;
pub use loader::{ConfigLoader, Profile};
pub use settings::{ConsoleSettings, HttpSettings, LoggerSettings, Settings, SinksSettings};
