//! CLI module for notify-sinks
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration loading with CLI overrides
//! - Command execution

pub mod executor;
pub mod parser;
pub mod validation;

pub use executor::execute_command;
pub use parser::{Cli, Commands, LogLevel, SinkSelector};

use std::sync::Arc;

use crate::config::{ConfigLoader, Settings};
use crate::logger::init_logger;
use crate::sinks::Sink;

/// Load configuration, applying `--config` and `--env`
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut loader = ConfigLoader::new()?;

    if let Some(path) = &cli.config {
        loader = loader.with_config_file(path);
    }
    if let Some(profile) = cli.env {
        loader = loader.with_profile(profile);
    }

    Ok(loader.load()?)
}

/// Initialize the global logger, attaching `sinks` as notification outputs
pub fn init_logger_from_settings(
    settings: &Settings,
    cli: &Cli,
    sinks: Vec<Arc<dyn Sink>>,
) -> anyhow::Result<()> {
    let mut logger = settings.logger.clone();
    if let Some(level) = cli.log_level_override() {
        logger.level = level.to_string();
    }

    init_logger(logger.into_logger_config()?, sinks)
}

/// Run a parsed command line to completion
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(&cli)?;
    let sinks = settings.sinks.build(&settings.http);

    // Only `log` routes events through the notifier layer; the other
    // commands talk to the sinks directly.
    let layer_sinks = match cli.command {
        Commands::Log { .. } => sinks.clone(),
        _ => Vec::new(),
    };
    init_logger_from_settings(&settings, &cli, layer_sinks)?;

    tracing::debug!(sinks = sinks.len(), "Configuration loaded");

    execute_command(&cli, &sinks, &mut std::io::stdout().lock())
}
