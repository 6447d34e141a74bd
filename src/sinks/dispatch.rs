//! Shared dispatch contract for notification sinks.
//!
//! Every provider goes through the same sequence: check the inputs, validate
//! the sink configuration, build one request, execute it once, classify the
//! response, and finally apply the sink's failure policy.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::event::LogEvent;
use super::request::{OutboundRequest, ProviderResponse, RequestExecutor};
use crate::error::{SinkError, SinkResult};

/// Result of dispatching one log event to one sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The provider accepted the message
    Delivered,
    /// There was no event to send
    Skipped,
    /// Dispatch failed and the sink's policy swallowed the error
    Failed(SinkError),
}

impl Outcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Outcome::Delivered)
    }
}

/// Provider-specific half of the dispatch contract.
pub trait Notifier: Send + Sync {
    /// Provider name used in errors and log fields
    fn name(&self) -> &'static str;

    /// Checks the settings a request cannot be built without
    fn validate_config(&self) -> SinkResult<()>;

    /// Builds the provider request for one event
    fn build_request(&self, event: &LogEvent) -> OutboundRequest;

    /// Whether operational errors are swallowed instead of returned
    fn suppress_errors(&self) -> bool;
}

/// Dispatches one event through `executor` on behalf of `notifier`.
///
/// A missing event is a silent skip. A missing executor is always an
/// [`SinkError::InvalidArgument`]; all other errors are returned or converted
/// into [`Outcome::Failed`] depending on [`Notifier::suppress_errors`].
pub fn dispatch<N>(
    notifier: &N,
    event: Option<&LogEvent>,
    executor: Option<&dyn RequestExecutor>,
) -> SinkResult<Outcome>
where
    N: Notifier + ?Sized,
{
    let Some(event) = event else {
        return Ok(Outcome::Skipped);
    };
    let executor = executor.ok_or(SinkError::invalid_argument("executor"))?;

    match deliver(notifier, event, executor) {
        Ok(()) => Ok(Outcome::Delivered),
        Err(err) => apply_policy(notifier, err),
    }
}

/// Applies the sink's failure policy to an error produced while dispatching.
pub(crate) fn apply_policy<N>(notifier: &N, err: SinkError) -> SinkResult<Outcome>
where
    N: Notifier + ?Sized,
{
    if notifier.suppress_errors() && err.is_suppressible() {
        warn!(provider = notifier.name(), error = %err, "Notification dispatch failed");
        Ok(Outcome::Failed(err))
    } else {
        Err(err)
    }
}

fn deliver<N>(notifier: &N, event: &LogEvent, executor: &dyn RequestExecutor) -> SinkResult<()>
where
    N: Notifier + ?Sized,
{
    notifier.validate_config()?;

    let request = notifier.build_request(event);
    debug!(
        provider = notifier.name(),
        method = %request.method(),
        path = request.path(),
        "Sending notification"
    );

    let response = executor
        .execute(&request)
        .map_err(|e| SinkError::request(notifier.name(), e.message))?;

    classify_response(notifier.name(), &response)
}

/// Body shared by both providers: `{"ok": bool, "error": "..."}`.
#[derive(Debug, Deserialize)]
struct ProviderReply {
    ok: Option<bool>,
    error: Option<Value>,
}

/// Maps a provider response onto success or a tagged error.
pub fn classify_response(provider: &'static str, response: &ProviderResponse) -> SinkResult<()> {
    if !response.is_ok() {
        return Err(SinkError::Transport {
            provider,
            status: response.status,
        });
    }

    let reply: ProviderReply = serde_json::from_str(&response.body)
        .map_err(|e| SinkError::provider(provider, format!("malformed response body: {e}")))?;

    match reply.ok {
        Some(false) => {
            let message = match reply.error {
                Some(Value::String(text)) => text,
                Some(other) => other.to_string(),
                None => "unknown error".to_string(),
            };
            Err(SinkError::provider(provider, message))
        }
        _ => Ok(()),
    }
}
