//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::build;
use crate::config::Profile;

/// Send log events to team chat and push notification services
#[derive(Parser, Debug)]
#[command(name = "notify-sinks")]
#[command(about = "Send log events to team chat and push notification services")]
#[command(long_about = "
notify-sinks forwards log events to a Slack-style chat channel and to
Pushbullet-style push notifications. Sinks are configured in TOML files
layered by deployment profile and overridable with NOTIFY_* variables.

EXAMPLES:
    # Send a message to every configured sink
    notify-sinks send \"Backup finished\"

    # Send an error to the push sink only
    notify-sinks send --level error --sink push \"Disk full on db-1\"

    # Emit a message through the logging pipeline
    notify-sinks log --level error \"Payment failed\"

    # Check which sinks are ready to deliver
    notify-sinks --config /etc/notify-sinks.toml check
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered configuration
    /// directory. Environment variable overrides still apply.
    #[arg(short, long, global = true, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override the profile read from NOTIFY_APP_ENV
    ///
    /// Selects which `{profile}.toml` layer is loaded.
    #[arg(short, long, global = true, value_enum, value_name = "PROFILE")]
    pub env: Option<Profile>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deliver one message directly to the selected sinks
    ///
    /// Each sink reports its outcome. The command fails if any sink returns
    /// an error that its configuration does not suppress.
    Send {
        /// Severity attached to the message
        #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
        level: LogLevel,

        /// Which configured sink to use
        #[arg(short, long, value_enum, default_value_t = SinkSelector::All)]
        sink: SinkSelector,

        /// Message text
        #[arg(value_parser = super::validation::validate_message)]
        message: String,
    },
    /// Emit a message through the logging pipeline
    ///
    /// The message reaches the sinks only when its level is at or above the
    /// configured `logger.notify_level`.
    Log {
        #[arg(short, long, value_enum, default_value_t = LogLevel::Error)]
        level: LogLevel,

        #[arg(value_parser = super::validation::validate_message)]
        message: String,
    },
    /// Validate configuration and report which sinks are ready
    Check,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

/// Sink selection for `send`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkSelector {
    Chat,
    Push,
    All,
}

impl SinkSelector {
    /// Whether the sink with the given provider name is selected
    pub fn matches(&self, sink_name: &str) -> bool {
        match self {
            SinkSelector::All => true,
            SinkSelector::Chat => sink_name == crate::sinks::CHAT_PROVIDER,
            SinkSelector::Push => sink_name == crate::sinks::PUSH_PROVIDER,
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl Cli {
    /// Console filter implied by the global flags, if any
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["notify-sinks", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["notify-sinks"]).is_err());
    }

    #[test]
    fn test_send_defaults() {
        let cli = Cli::try_parse_from(["notify-sinks", "send", "Backup finished"]).unwrap();
        match cli.command {
            Commands::Send { level, sink, message } => {
                assert_eq!(level, LogLevel::Info);
                assert_eq!(sink, SinkSelector::All);
                assert_eq!(message, "Backup finished");
            }
            other => panic!("Expected Send command, got {other:?}"),
        }
    }

    #[test]
    fn test_send_with_options() {
        let cli = Cli::try_parse_from([
            "notify-sinks",
            "send",
            "--level",
            "warning",
            "--sink",
            "push",
            "Disk full",
        ])
        .unwrap();
        match cli.command {
            Commands::Send { level, sink, .. } => {
                assert_eq!(level, LogLevel::Warn);
                assert_eq!(sink, SinkSelector::Push);
            }
            other => panic!("Expected Send command, got {other:?}"),
        }
    }

    #[test]
    fn test_log_defaults_to_error() {
        let cli = Cli::try_parse_from(["notify-sinks", "log", "Payment failed"]).unwrap();
        assert!(matches!(cli.command, Commands::Log { level: LogLevel::Error, .. }));
    }

    #[test]
    fn test_blank_message_rejected() {
        assert!(Cli::try_parse_from(["notify-sinks", "send", "   "]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["notify-sinks", "check", "--env", "prod", "--verbose"]).unwrap();
        assert!(matches!(cli.command, Commands::Check));
        assert_eq!(cli.env, Some(Profile::Production));
        assert_eq!(cli.log_level_override(), Some("debug"));
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["notify-sinks", "--verbose", "--quiet", "check"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_sink_selector_matches() {
        assert!(SinkSelector::All.matches("slack"));
        assert!(SinkSelector::Chat.matches("slack"));
        assert!(!SinkSelector::Chat.matches("pushbullet"));
        assert!(SinkSelector::Push.matches("pushbullet"));
    }
}
