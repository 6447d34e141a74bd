//! Property tests for the dispatch contract across both sinks.

use super::testing::RecordingExecutor;
use super::*;
use crate::error::{SinkError, SinkErrorKind};
use proptest::prelude::*;
use tracing::Level;

fn arb_optional_text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[a-zA-Z0-9:_]{1,12}".prop_map(Some),
    ]
}

fn arb_chat_config() -> impl Strategy<Value = ChatSinkConfig> {
    (
        "[a-zA-Z0-9]{0,12}",
        "[a-zA-Z0-9]{0,12}",
        arb_optional_text(),
        arb_optional_text(),
        arb_optional_text(),
        any::<bool>(),
    )
        .prop_map(
            |(api_key, channel, username, icon_emoji, icon_url, suppress_errors)| ChatSinkConfig {
                api_key,
                channel,
                username,
                icon_emoji,
                icon_url,
                suppress_errors,
                ..Default::default()
            },
        )
}

fn arb_push_config() -> impl Strategy<Value = PushSinkConfig> {
    (
        "[a-zA-Z0-9.]{0,12}",
        "[a-zA-Z ]{0,12}",
        arb_optional_text(),
        any::<bool>(),
    )
        .prop_map(|(api_token, messages_title, channel_tag, suppress_errors)| PushSinkConfig {
            api_token,
            messages_title,
            channel_tag,
            suppress_errors,
            ..Default::default()
        })
}

fn arb_sink() -> impl Strategy<Value = Box<dyn Sink>> {
    prop_oneof![
        arb_chat_config().prop_map(|c| Box::new(ChatNotifierSink::new(c)) as Box<dyn Sink>),
        arb_push_config().prop_map(|c| Box::new(PushNotifierSink::new(c)) as Box<dyn Sink>),
    ]
}

fn event(message: &str) -> LogEvent {
    LogEvent::new(Level::ERROR, "props", message)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A missing executor is reported whatever the configuration and policy
    #[test]
    fn property_missing_executor_always_invalid_argument(sink in arb_sink(), message in ".{0,20}") {
        let err = sink.write_with(Some(&event(&message)), None).unwrap_err();
        prop_assert_eq!(err.kind(), SinkErrorKind::InvalidArgument);
    }

    /// Suppressing sinks never return an error for broken configurations
    #[test]
    fn property_suppressed_bad_config_never_raises(
        channel_tag in arb_optional_text(),
        username in arb_optional_text(),
        status in 100u16..600u16,
    ) {
        let executor = RecordingExecutor::replying(status, r#"{"ok":true}"#);

        let push = PushNotifierSink::new(PushSinkConfig {
            channel_tag,
            ..Default::default()
        });
        let outcome = push.write_with(Some(&event("x")), Some(&executor));
        let push_failed = matches!(outcome, Ok(Outcome::Failed(SinkError::Configuration { .. })));
        prop_assert!(push_failed, "push outcome was {:?}", outcome);

        let chat = ChatNotifierSink::new(ChatSinkConfig {
            username,
            ..Default::default()
        });
        let outcome = chat.write_with(Some(&event("x")), Some(&executor));
        let chat_failed = matches!(outcome, Ok(Outcome::Failed(SinkError::Configuration { .. })));
        prop_assert!(chat_failed, "chat outcome was {:?}", outcome);

        prop_assert!(executor.requests().is_empty());
    }

    /// Any status other than 200 surfaces as a transport error carrying it
    #[test]
    fn property_non_ok_status_is_transport_error(status in (100u16..600u16).prop_filter("not OK", |s| *s != 200)) {
        let executor = RecordingExecutor::replying(status, r#"{"ok":true}"#);
        let sink = PushNotifierSink::new(PushSinkConfig {
            api_token: "t".to_string(),
            messages_title: "Title".to_string(),
            suppress_errors: false,
            ..Default::default()
        });

        let err = sink.write_with(Some(&event("x")), Some(&executor)).unwrap_err();
        prop_assert_eq!(err, SinkError::Transport { provider: "pushbullet", status });
    }

    /// Provider error text is echoed verbatim
    #[test]
    fn property_provider_error_echoed(code in "[a-z_]{1,24}") {
        let body = serde_json::json!({ "ok": false, "error": code.clone() }).to_string();
        let executor = RecordingExecutor::replying(200, &body);
        let sink = ChatNotifierSink::new(ChatSinkConfig {
            api_key: "k".to_string(),
            channel: "c".to_string(),
            suppress_errors: false,
            ..Default::default()
        });

        let err = sink.write_with(Some(&event("x")), Some(&executor)).unwrap_err();
        prop_assert!(err.to_string().contains(&code));
    }

    /// The chat request never carries both icon overrides
    #[test]
    fn property_chat_icons_mutually_exclusive(config in arb_chat_config()) {
        let mut config = config;
        config.api_key = "k".to_string();
        config.channel = "c".to_string();
        let sink = ChatNotifierSink::new(config.clone());
        let executor = RecordingExecutor::ok();

        sink.write_with(Some(&event("x")), Some(&executor)).unwrap();
        let request = executor.last_request();

        let emoji = request.param_count("icon_emoji");
        let url = request.param_count("icon_url");
        prop_assert!(emoji + url <= 1);
        if non_blank(&config.icon_emoji).is_some() {
            prop_assert_eq!(emoji, 1);
            prop_assert_eq!(url, 0);
        }
    }

    /// Exactly one request is executed per event
    #[test]
    fn property_one_request_per_event(config in arb_push_config(), message in ".{0,40}") {
        let mut config = config;
        config.api_token = "t".to_string();
        config.messages_title = "Title".to_string();
        let sink = PushNotifierSink::new(config);
        let executor = RecordingExecutor::ok();

        sink.write_with(Some(&event(&message)), Some(&executor)).unwrap();

        let requests = executor.requests();
        prop_assert_eq!(requests.len(), 1);
        prop_assert_eq!(requests[0].param("body"), Some(message.as_str()));
        prop_assert!(requests[0].param("channel_tag").is_none_or(|tag| !tag.is_empty()));
    }
}
