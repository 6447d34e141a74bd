use std::time::Duration;

use reqwest::{Method, Url};
use tracing::debug;

use crate::sinks::{ExecutorError, OutboundRequest, ProviderResponse, RequestExecutor};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 10;

/// Tunables for the blocking HTTP client owned by each sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECONDS),
        }
    }
}

/// Blocking [`RequestExecutor`] bound to one provider base address.
///
/// The client pools connections, so a sink builds it once and reuses it for
/// every event.
///
/// # Example
/// ```no_run
/// use notify_sinks::external::client::{HttpClientConfig, HttpExecutor};
/// use notify_sinks::sinks::{OutboundRequest, RequestExecutor};
///
/// let executor = HttpExecutor::new("https://api.pushbullet.com/v2/", HttpClientConfig::default())?;
/// let mut request = OutboundRequest::post("pushes");
/// request.add_header("Access-Token", "o.token");
/// request.add_param("type", "note");
/// let response = executor.execute(&request)?;
/// println!("{}", response.status);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    base_url: Url,
    client: reqwest::blocking::Client,
}

impl HttpExecutor {
    pub fn new(base_url: &str, config: HttpClientConfig) -> Result<Self, ExecutorError> {
        let base_url = parse_base_url(base_url)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(2)
            .gzip(true)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExecutorError::new(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request path against the base address
    pub fn resolve(&self, path: &str) -> Result<Url, ExecutorError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ExecutorError::new(format!("invalid request path '{path}': {e}")))
    }
}

impl RequestExecutor for HttpExecutor {
    fn execute(&self, request: &OutboundRequest) -> Result<ProviderResponse, ExecutorError> {
        let url = self.resolve(request.path())?;
        let mut builder = self.client.request(request.method().clone(), url);

        builder = if *request.method() == Method::GET {
            builder.query(request.params())
        } else {
            builder.form(request.params())
        };

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .map_err(|e| ExecutorError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ExecutorError::new(format!("failed to read response body: {e}")))?;

        debug!(status, path = request.path(), "Provider responded");

        Ok(ProviderResponse { status, body })
    }
}

/// Parses a provider base address, making sure relative joins keep its path
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ExecutorError> {
    let mut url = Url::parse(raw).map_err(|e| ExecutorError::new(format!("invalid base URL '{raw}': {e}")))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ExecutorError::new(format!(
            "base URL '{raw}' must use http or https"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
