//! Tracing layer that forwards events to the notification sinks.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::error::SinkError;
use crate::sinks::{LogEvent, Sink};

/// Callback receiving errors a sink did not suppress
pub type ErrorCallback = Arc<dyn Fn(&str, &SinkError) + Send + Sync>;

/// Targets whose events are never forwarded: the sinks' own diagnostics and
/// the HTTP stack they drive.
const DEFAULT_IGNORED_TARGETS: &[&str] = &[
    "notify_sinks::sinks",
    "notify_sinks::external",
    "notify_sinks::logger",
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
];

thread_local! {
    static FORWARDING: Cell<bool> = const { Cell::new(false) };
}

/// Clears the re-entrancy flag when forwarding ends, even on unwind
struct ForwardingGuard;

impl ForwardingGuard {
    fn enter() -> Option<Self> {
        if FORWARDING.with(|flag| flag.replace(true)) {
            None
        } else {
            Some(ForwardingGuard)
        }
    }
}

impl Drop for ForwardingGuard {
    fn drop(&mut self) {
        FORWARDING.with(|flag| flag.set(false));
    }
}

/// Layer turning `tracing` events into [`LogEvent`]s for every configured sink.
///
/// Each qualifying event is written synchronously to each sink in turn.
pub struct NotifierLayer {
    sinks: Vec<Arc<dyn Sink>>,
    min_level: Level,
    ignored_targets: Vec<String>,
    error_callback: ErrorCallback,
}

impl NotifierLayer {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            sinks,
            min_level: Level::ERROR,
            ignored_targets: DEFAULT_IGNORED_TARGETS.iter().map(|t| t.to_string()).collect(),
            error_callback: Arc::new(report_to_stderr),
        }
    }

    /// Set the minimum level forwarded to the sinks
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Replace the handler for errors the sinks return
    pub fn with_error_callback(mut self, callback: ErrorCallback) -> Self {
        self.error_callback = callback;
        self
    }

    /// Never forward events from the module path `prefix` or below it
    pub fn ignore_target(mut self, prefix: impl Into<String>) -> Self {
        self.ignored_targets.push(prefix.into());
        self
    }

    fn should_forward(&self, metadata: &Metadata<'_>) -> bool {
        if metadata.level() > &self.min_level {
            return false;
        }

        let target = metadata.target();
        !self
            .ignored_targets
            .iter()
            .any(|prefix| is_within(target, prefix))
    }

    /// Writes one event to every sink, reporting the errors they return
    pub fn forward(&self, event: &LogEvent) {
        for sink in &self.sinks {
            if let Err(err) = sink.write(Some(event)) {
                (self.error_callback)(sink.name(), &err);
            }
        }
    }
}

impl fmt::Debug for NotifierLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierLayer")
            .field("sinks", &self.sinks)
            .field("min_level", &self.min_level)
            .field("ignored_targets", &self.ignored_targets)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for NotifierLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if self.sinks.is_empty() || !self.should_forward(metadata) {
            return;
        }

        // Events emitted while a sink is writing must not loop back into it
        let Some(_guard) = ForwardingGuard::enter() else {
            return;
        };

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let log_event = LogEvent::new(
            *metadata.level(),
            metadata.target(),
            visitor.message.unwrap_or_default(),
        )
        .with_fields(visitor.fields);

        self.forward(&log_event);
    }
}

/// Whether `target` is the module path `prefix` or one nested below it
fn is_within(target: &str, prefix: &str) -> bool {
    match target.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}

fn report_to_stderr(sink: &str, err: &SinkError) {
    eprintln!("notification sink '{sink}' failed: {err}");
}

/// Collects the message and structured fields of an event
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl EventVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let formatted = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(formatted);
        } else {
            self.insert(field, Value::String(formatted));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.insert(field, Value::Number(n));
        }
    }
}
