use std::time::Duration;

use crpt_ratelimit::FixedWindow;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use tracing::error;

use crate::client::HttpClient;
use crate::client::HttpClientConfig;
use crate::documents::Document;
use crate::documents::SubmissionRequest;
use crate::errors::CrptError;
use crate::errors::Result;

const ISMP_BASE_URL: &str = "https://ismp.crpt.ru";
const DOCUMENTS_CREATE_PATH: &str = "/api/v3/lk/documents/create";
const SIMULATED_RESPONSE: &str = "Document created successfully";

/// Client for registering goods-introduction documents with the ISMP service
///
/// Every submission first takes a permit from the fixed window limiter, so
/// concurrent callers never push more than the configured number of requests
/// per window onto the wire. Exhaustion is absorbed as delay, never surfaced
/// as an error.
pub struct CrptApi {
    client: HttpClient,
    limiter: FixedWindow,
    documents_url: String,
    simulate: bool,
}

impl CrptApi {
    /// Create a new client builder
    pub fn builder() -> CrptApiBuilder {
        CrptApiBuilder::default()
    }

    /// Submit a document with its detached signature
    ///
    /// Blocks on the rate limiter until a permit is available, then performs
    /// exactly one POST to the documents/create endpoint. Success is strictly
    /// HTTP 200; any other status is returned as
    /// [`Rejected`](CrptError::Rejected) carrying the response body verbatim.
    /// In simulated mode the permit is still consumed but no network call is
    /// made.
    pub async fn create_document(&self, document: &Document, signature: &str) -> Result<String> {
        self.limiter.acquire().await;

        if self.simulate {
            debug!(doc_id = %document.doc_id, "simulated submission accepted");
            return Ok(SIMULATED_RESPONSE.to_string());
        }

        let payload = serde_json::to_string(&SubmissionRequest { description: document, signature })?;

        let response =
            self.client.post(&self.documents_url).header(CONTENT_TYPE, "application/json").body(payload).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            error!(%status, doc_id = %document.doc_id, "document submission rejected");
            return Err(CrptError::Rejected { status, body });
        }

        debug!(doc_id = %document.doc_id, "document submitted");
        Ok(body)
    }

    /// Get the rate limiter gating submissions
    pub fn limiter(&self) -> &FixedWindow {
        &self.limiter
    }
}

/// Builder for configuring a [`CrptApi`] client
pub struct CrptApiBuilder {
    capacity: u32,
    window: Duration,
    simulate: bool,
    base_url: String,
    http_config: HttpClientConfig,
}

impl Default for CrptApiBuilder {
    fn default() -> Self {
        Self {
            capacity: 5,
            window: Duration::from_secs(1),
            simulate: false,
            base_url: ISMP_BASE_URL.to_string(),
            http_config: HttpClientConfig::default(),
        }
    }
}

impl CrptApiBuilder {
    /// Set the maximum submissions per window
    pub fn requests_per_window(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the window duration
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Skip the network call and report success, still consuming permits
    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Override the service base URL (tests point this at a local stub)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP client configuration
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Build the client
    ///
    /// Spawns the limiter's replenishment task, so this must be called from
    /// within a Tokio runtime.
    pub fn build(self) -> Result<CrptApi> {
        let client = HttpClient::with_config(self.http_config)?;
        let limiter = FixedWindow::new(self.capacity, self.window);
        let documents_url = format!("{}{}", self.base_url.trim_end_matches('/'), DOCUMENTS_CREATE_PATH);

        Ok(CrptApi { client, limiter, documents_url, simulate: self.simulate })
    }
}
