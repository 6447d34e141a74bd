//! Notification sinks with a shared dispatch contract.
//!
//! A sink turns one [`LogEvent`] into one HTTP request to its provider,
//! sends it synchronously, and classifies the response. The
//! [`dispatch`] function holds the parts every provider shares; the
//! [`Notifier`] trait supplies the provider-specific request.

mod chat;
mod dispatch;
mod event;
mod lazy;
mod push;
mod request;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;

pub use chat::{ChatNotifierSink, ChatSinkConfig, PROVIDER as CHAT_PROVIDER};
pub use dispatch::{Notifier, Outcome, classify_response, dispatch};
pub use event::LogEvent;
pub use push::{DEFAULT_PUSH_BASE_URL, PROVIDER as PUSH_PROVIDER, PushNotifierSink, PushSinkConfig};
pub use request::{ExecutorError, OutboundRequest, ProviderResponse, RequestExecutor};

use crate::error::SinkResult;

/// A notification sink the host can write log events to.
///
/// Implementations are `Send + Sync` so one instance can be shared by every
/// thread that logs.
pub trait Sink: Notifier + std::fmt::Debug {
    /// Writes through the sink's own HTTP client, created on first use
    fn write(&self, event: Option<&LogEvent>) -> SinkResult<Outcome>;

    /// Writes through an injected executor
    fn write_with(
        &self,
        event: Option<&LogEvent>,
        executor: Option<&dyn RequestExecutor>,
    ) -> SinkResult<Outcome> {
        dispatch(self, event, executor)
    }
}

pub(crate) fn default_suppress_errors() -> bool {
    true
}

/// Treats blank optional settings as absent
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
