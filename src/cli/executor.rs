//! Command executor for dispatching CLI commands
//!
//! Handlers write their report to the given output so they can be driven
//! from tests without a terminal.

use std::io::Write;
use std::sync::Arc;

use anyhow::bail;

use super::parser::{Cli, Commands, LogLevel, SinkSelector};
use crate::sinks::{LogEvent, Outcome, Sink};

/// Target of events created by the CLI
pub const CLI_TARGET: &str = "notify";

/// Execute a CLI command against the configured sinks
pub fn execute_command(cli: &Cli, sinks: &[Arc<dyn Sink>], out: &mut impl Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Send { level, sink, message } => send_message(sinks, *sink, *level, message, out),
        Commands::Log { level, message } => {
            log_message(*level, message);
            Ok(())
        }
        Commands::Check => check_sinks(sinks, out),
    }
}

/// Write one event to every selected sink and report each outcome
pub fn send_message(
    sinks: &[Arc<dyn Sink>],
    selector: SinkSelector,
    level: LogLevel,
    message: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let selected: Vec<_> = sinks.iter().filter(|s| selector.matches(s.name())).collect();
    if selected.is_empty() {
        bail!("No configured sink matches '{:?}'", selector);
    }

    let event = LogEvent::new(level.into(), CLI_TARGET, message);
    let mut failures = 0;

    for sink in selected {
        match sink.write(Some(&event)) {
            Ok(Outcome::Delivered) => writeln!(out, "{}: delivered", sink.name())?,
            Ok(Outcome::Skipped) => writeln!(out, "{}: skipped", sink.name())?,
            Ok(Outcome::Failed(err)) => writeln!(out, "{}: failed (suppressed): {}", sink.name(), err)?,
            Err(err) => {
                failures += 1;
                writeln!(out, "{}: error: {}", sink.name(), err)?;
            }
        }
    }

    if failures > 0 {
        bail!("{} sink(s) failed to deliver the message", failures);
    }

    Ok(())
}

/// Emit the message through `tracing`, where the notifier layer picks it up
pub fn log_message(level: LogLevel, message: &str) {
    match level {
        LogLevel::Error => tracing::error!(target: CLI_TARGET, "{}", message),
        LogLevel::Warn => tracing::warn!(target: CLI_TARGET, "{}", message),
        LogLevel::Info => tracing::info!(target: CLI_TARGET, "{}", message),
        LogLevel::Debug => tracing::debug!(target: CLI_TARGET, "{}", message),
        LogLevel::Trace => tracing::trace!(target: CLI_TARGET, "{}", message),
    }
}

/// Report whether each configured sink has its required settings
pub fn check_sinks(sinks: &[Arc<dyn Sink>], out: &mut impl Write) -> anyhow::Result<()> {
    if sinks.is_empty() {
        writeln!(out, "configuration ok, no sinks configured")?;
        return Ok(());
    }

    let mut not_ready = Vec::new();
    for sink in sinks {
        match sink.validate_config() {
            Ok(()) => writeln!(out, "{}: ready", sink.name())?,
            Err(err) => {
                writeln!(out, "{}: not ready: {}", sink.name(), err)?;
                not_ready.push(sink.name());
            }
        }
    }

    if !not_ready.is_empty() {
        bail!("configuration check failed, sinks not ready: {}", not_ready.join(", "));
    }

    Ok(())
}
