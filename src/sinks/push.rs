//! Push-notification sink sending "note" pushes through the Pushbullet API.
//!
//! Pushbullet API Reference: https://docs.pushbullet.com/#create-push

use serde::{Deserialize, Serialize};

use super::dispatch::{Notifier, Outcome, apply_policy, dispatch};
use super::event::LogEvent;
use super::lazy::LazyExecutor;
use super::request::OutboundRequest;
use super::{Sink, non_blank};
use crate::error::{SinkError, SinkResult};
use crate::external::HttpClientConfig;

/// Provider name reported by [`PushNotifierSink`]
pub const PROVIDER: &str = "pushbullet";

/// Default Pushbullet API base address
pub const DEFAULT_PUSH_BASE_URL: &str = "https://api.pushbullet.com/v2/";

fn default_base_url() -> String {
    DEFAULT_PUSH_BASE_URL.to_string()
}

/// Settings of a [`PushNotifierSink`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSinkConfig {
    /// Access token from the account settings page
    #[serde(default)]
    pub api_token: String,

    /// Title of every pushed note
    #[serde(default)]
    pub messages_title: String,

    /// Channel tag without the leading '@'. When absent the push goes to all
    /// of the account's devices.
    #[serde(default)]
    pub channel_tag: Option<String>,

    /// API base address
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Swallow operational errors instead of returning them
    #[serde(default = "super::default_suppress_errors")]
    pub suppress_errors: bool,
}

impl Default for PushSinkConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            messages_title: String::new(),
            channel_tag: None,
            base_url: default_base_url(),
            suppress_errors: super::default_suppress_errors(),
        }
    }
}

/// Pushes each log event as a note to a Pushbullet user or channel.
#[derive(Debug)]
pub struct PushNotifierSink {
    config: PushSinkConfig,
    http: HttpClientConfig,
    client: LazyExecutor,
}

impl PushNotifierSink {
    pub fn new(config: PushSinkConfig) -> Self {
        Self {
            config,
            http: HttpClientConfig::default(),
            client: LazyExecutor::new(),
        }
    }

    pub fn with_http_config(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self.client.reset();
        self
    }

    pub fn config(&self) -> &PushSinkConfig {
        &self.config
    }

    /// Changes the API base address; the cached client is rebuilt on next write
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.config.base_url = base_url.into();
        self.client.reset();
    }

    pub fn set_api_token(&mut self, api_token: impl Into<String>) {
        self.config.api_token = api_token.into();
    }

    pub fn set_messages_title(&mut self, messages_title: impl Into<String>) {
        self.config.messages_title = messages_title.into();
    }

    pub fn set_channel_tag(&mut self, channel_tag: Option<String>) {
        self.config.channel_tag = channel_tag;
    }

    pub fn set_suppress_errors(&mut self, suppress_errors: bool) {
        self.config.suppress_errors = suppress_errors;
    }
}

impl Notifier for PushNotifierSink {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn validate_config(&self) -> SinkResult<()> {
        if self.config.api_token.trim().is_empty() {
            return Err(SinkError::configuration(PROVIDER, "api_token", "access token is required"));
        }

        if self.config.messages_title.trim().is_empty() {
            return Err(SinkError::configuration(
                PROVIDER,
                "messages_title",
                "message title is required",
            ));
        }

        Ok(())
    }

    fn build_request(&self, event: &LogEvent) -> OutboundRequest {
        let mut request = OutboundRequest::post("pushes");
        request
            .add_header("Access-Token", self.config.api_token.as_str())
            .add_param("type", "note")
            .add_param("title", self.config.messages_title.as_str())
            .add_param("body", event.message());

        // Omitting the tag addresses every device of the account
        if let Some(tag) = non_blank(&self.config.channel_tag) {
            request.add_param("channel_tag", tag);
        }

        request
    }

    fn suppress_errors(&self) -> bool {
        self.config.suppress_errors
    }
}

impl Sink for PushNotifierSink {
    fn write(&self, event: Option<&LogEvent>) -> SinkResult<Outcome> {
        if event.is_none() {
            return Ok(Outcome::Skipped);
        }

        let base_url = || Ok(self.config.base_url.clone());
        match self.client.get_or_build(PROVIDER, self.http, base_url) {
            Ok(executor) => dispatch(self, event, Some(executor)),
            Err(err) => apply_policy(self, err),
        }
    }
}
