//! Provider-neutral request/response values and the executor capability.

use reqwest::Method;

/// HTTP request built by a sink for a single log event.
///
/// The path is relative to the provider base address held by the executor.
/// Parameters keep insertion order; for GET they become the query string,
/// for POST the form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    method: Method,
    path: String,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl OutboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn add_param(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of the named parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Number of parameters with the given name
    pub fn param_count(&self, name: &str) -> usize {
        self.params.iter().filter(|(key, _)| key == name).count()
    }

    /// First value of the named header, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status code and raw body returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: String,
}

impl ProviderResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Failure to obtain any response from the provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ExecutorError {
    pub message: String,
}

impl ExecutorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Capability that performs one blocking HTTP exchange.
///
/// The production implementation is [`crate::external::client::HttpExecutor`];
/// tests substitute a recording fake.
pub trait RequestExecutor: Send + Sync {
    fn execute(&self, request: &OutboundRequest) -> Result<ProviderResponse, ExecutorError>;
}

impl<T: RequestExecutor + ?Sized> RequestExecutor for &T {
    fn execute(&self, request: &OutboundRequest) -> Result<ProviderResponse, ExecutorError> {
        (**self).execute(request)
    }
}

impl<T: RequestExecutor + ?Sized> RequestExecutor for std::sync::Arc<T> {
    fn execute(&self, request: &OutboundRequest) -> Result<ProviderResponse, ExecutorError> {
        (**self).execute(request)
    }
}
