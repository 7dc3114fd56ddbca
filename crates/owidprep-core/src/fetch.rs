//! HTTP fetch for upstream grapher CSV exports.
//!
//! Uses async reqwest behind a shared runtime but presents a sync
//! interface; response bodies are small enough to buffer whole before
//! parsing, so there is no streaming path.

use std::sync::LazyLock;
use std::time::Duration;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// The upstream rejects default client identifiers, so every request
/// carries a browser-like User-Agent.
const USER_AGENT: &str = "Mozilla/5.0";

/// Error from fetching an upstream dataset.
///
/// Any non-success status is fatal for the whole run; there is no retry
/// and no partial output.
#[derive(Debug)]
pub struct FetchError {
    pub status: Option<u16>,
    message: String,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(s) => write!(f, "HTTP {s}: {}", self.message),
            None => write!(f, "HTTP error: {}", self.message),
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    fn from_reqwest(e: &reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

/// Shared async HTTP client.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .expect("failed to build HTTP client")
});

/// Shared tokio runtime backing the sync facade.
static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// HTTP GET → whole response body as text.
pub fn fetch_text(url: &str) -> Result<String, FetchError> {
    SHARED_RUNTIME.block_on(async {
        let response = SHARED_CLIENT
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::from_reqwest(&e))?;

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))
    })
}
