//! Logger Module
//!
//! A logging system based on `tracing-subscriber` with support for:
//! - Console output with color control and full, compact, or JSON format
//! - Forwarding of high-severity events to notification sinks

pub mod config;
pub mod error;
pub mod layer;


// Re-export main types
pub use config::*;
pub use error::LoggerError;
pub use layer::{ErrorCallback, NotifierLayer};

use std::io::IsTerminal;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::sinks::Sink;

/// Initialize the global logger with the given configuration and sinks
pub fn init_logger(config: LoggerConfig, sinks: Vec<Arc<dyn Sink>>) -> anyhow::Result<()> {
    config.validate()?;

    if !config.console.enabled && sinks.is_empty() {
        anyhow::bail!("At least one output (console or notification sink) must be enabled");
    }

    // Create filter from level string
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let console = config.console.enabled.then(|| {
        let use_ansi = config.console.colored && std::io::stdout().is_terminal();
        match config.console.format {
            LogFormat::Full => fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true)
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .compact()
                .boxed(),
            LogFormat::Json => fmt::layer().with_ansi(false).json().boxed(),
        }
    });

    let notifier = if sinks.is_empty() {
        None
    } else {
        Some(NotifierLayer::new(sinks).with_min_level(config.parse_notify_level()?))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(notifier)
        .try_init()
        .map_err(LoggerError::from)?;

    Ok(())
}
