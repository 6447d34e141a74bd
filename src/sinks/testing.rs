//! In-memory executor used by the unit tests.

use std::sync::Mutex;

use super::request::{ExecutorError, OutboundRequest, ProviderResponse, RequestExecutor};

/// Records every request and answers with a canned result.
pub(crate) struct RecordingExecutor {
    reply: Result<ProviderResponse, ExecutorError>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl RecordingExecutor {
    pub(crate) fn replying(status: u16, body: &str) -> Self {
        Self {
            reply: Ok(ProviderResponse::new(status, body)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn ok() -> Self {
        Self::replying(200, r#"{"ok":true}"#)
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            reply: Err(ExecutorError::new(message)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> OutboundRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was executed")
    }
}

impl RequestExecutor for RecordingExecutor {
    fn execute(&self, request: &OutboundRequest) -> Result<ProviderResponse, ExecutorError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}
