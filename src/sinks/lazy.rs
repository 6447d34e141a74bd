use std::sync::OnceLock;

use crate::error::{SinkError, SinkResult};
use crate::external::{HttpClientConfig, HttpExecutor};

/// Per-sink HTTP client, built on first use and reused afterwards.
///
/// Initialisation runs exactly once even when several threads write through
/// the same sink concurrently. A failed build is cached as well, until the
/// owning sink changes its address and calls [`LazyExecutor::reset`].
#[derive(Debug, Default)]
pub(crate) struct LazyExecutor {
    cell: OnceLock<SinkResult<HttpExecutor>>,
}

impl LazyExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get_or_build<F>(
        &self,
        sink: &'static str,
        http: HttpClientConfig,
        base_url: F,
    ) -> SinkResult<&HttpExecutor>
    where
        F: FnOnce() -> SinkResult<String>,
    {
        self.cell
            .get_or_init(|| {
                let url = base_url()?;
                HttpExecutor::new(&url, http)
                    .map_err(|e| SinkError::configuration(sink, "base_url", e.message))
            })
            .as_ref()
            .map_err(|e| e.clone())
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub(crate) fn reset(&mut self) {
        self.cell = OnceLock::new();
    }
}
