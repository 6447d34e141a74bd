//! Team-chat sink posting messages through the Slack Web API.
//!
//! Slack API Reference: https://api.slack.com/methods/chat.postMessage

use serde::{Deserialize, Serialize};

use super::dispatch::{Notifier, Outcome, apply_policy, dispatch};
use super::event::LogEvent;
use super::lazy::LazyExecutor;
use super::request::OutboundRequest;
use super::{Sink, non_blank};
use crate::error::{SinkError, SinkResult};
use crate::external::HttpClientConfig;

/// Provider name reported by [`ChatNotifierSink`]
pub const PROVIDER: &str = "slack";

/// Settings of a [`ChatNotifierSink`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSinkConfig {
    /// Workspace domain, the part before ".slack.com"
    #[serde(default)]
    pub domain: Option<String>,

    /// Explicit API base address; takes precedence over `domain`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bot token
    #[serde(default)]
    pub api_key: String,

    /// Channel name without the leading '#', or channel id
    #[serde(default)]
    pub channel: String,

    /// Display name override
    #[serde(default)]
    pub username: Option<String>,

    /// Icon emoji override, e.g. ":rotating_light:"
    #[serde(default)]
    pub icon_emoji: Option<String>,

    /// Icon image override, used only when no emoji is set
    #[serde(default)]
    pub icon_url: Option<String>,

    /// Swallow operational errors instead of returning them
    #[serde(default = "super::default_suppress_errors")]
    pub suppress_errors: bool,
}

impl Default for ChatSinkConfig {
    fn default() -> Self {
        Self {
            domain: None,
            base_url: None,
            api_key: String::new(),
            channel: String::new(),
            username: None,
            icon_emoji: None,
            icon_url: None,
            suppress_errors: super::default_suppress_errors(),
        }
    }
}

impl ChatSinkConfig {
    /// API base address derived from `base_url` or `domain`
    pub fn api_base_url(&self) -> SinkResult<String> {
        if let Some(url) = non_blank(&self.base_url) {
            return Ok(url.to_string());
        }

        match non_blank(&self.domain) {
            Some(domain) => Ok(format!("https://{domain}.slack.com/api/")),
            None => Err(SinkError::configuration(
                PROVIDER,
                "domain",
                "either domain or base_url is required",
            )),
        }
    }
}

/// Sends each log event as a chat message to a Slack channel.
#[derive(Debug)]
pub struct ChatNotifierSink {
    config: ChatSinkConfig,
    http: HttpClientConfig,
    client: LazyExecutor,
}

impl ChatNotifierSink {
    pub fn new(config: ChatSinkConfig) -> Self {
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

    pub fn config(&self) -> &ChatSinkConfig {
        &self.config
    }

    /// Changes the workspace domain; the cached client is rebuilt on next write
    pub fn set_domain(&mut self, domain: impl Into<String>) {
        self.config.domain = Some(domain.into());
        self.client.reset();
    }

    /// Changes the explicit base address; the cached client is rebuilt on next write
    pub fn set_base_url(&mut self, base_url: Option<String>) {
        self.config.base_url = base_url;
        self.client.reset();
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.api_key = api_key.into();
    }

    pub fn set_channel(&mut self, channel: impl Into<String>) {
        self.config.channel = channel.into();
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.config.username = username;
    }

    pub fn set_icon_emoji(&mut self, icon_emoji: Option<String>) {
        self.config.icon_emoji = icon_emoji;
    }

    pub fn set_icon_url(&mut self, icon_url: Option<String>) {
        self.config.icon_url = icon_url;
    }

    pub fn set_suppress_errors(&mut self, suppress_errors: bool) {
        self.config.suppress_errors = suppress_errors;
    }
}

impl Notifier for ChatNotifierSink {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn validate_config(&self) -> SinkResult<()> {
        if self.config.api_key.trim().is_empty() {
            return Err(SinkError::configuration(PROVIDER, "api_key", "API key is required"));
        }

        if self.config.channel.trim().is_empty() {
            return Err(SinkError::configuration(PROVIDER, "channel", "channel is required"));
        }

        Ok(())
    }

    fn build_request(&self, event: &LogEvent) -> OutboundRequest {
        let mut request = OutboundRequest::get("chat.postMessage");
        request
            .add_param("token", self.config.api_key.as_str())
            .add_param("channel", self.config.channel.as_str())
            .add_param("text", event.message());

        if let Some(username) = non_blank(&self.config.username) {
            request.add_param("username", username);
        }

        // Emoji wins; the URL is dropped entirely when both are configured
        if let Some(emoji) = non_blank(&self.config.icon_emoji) {
            request.add_param("icon_emoji", emoji);
        } else if let Some(icon_url) = non_blank(&self.config.icon_url) {
            request.add_param("icon_url", icon_url);
        }

        request
    }

    fn suppress_errors(&self) -> bool {
        self.config.suppress_errors
    }
}

impl Sink for ChatNotifierSink {
    fn write(&self, event: Option<&LogEvent>) -> SinkResult<Outcome> {
        if event.is_none() {
            return Ok(Outcome::Skipped);
        }

        match self
            .client
            .get_or_build(PROVIDER, self.http, || self.config.api_base_url())
        {
            Ok(executor) => dispatch(self, event, Some(executor)),
            Err(err) => apply_policy(self, err),
        }
    }
}
