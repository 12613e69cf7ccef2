//! # HTTP Backend
//!
//! reqwest implementation of [`ProductBackend`].
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  {base}/item/{code}                                                │
//! │       200 {prd_id, code, name, price}  → Ok(Product)                    │
//! │       200 null / empty                 → NotFound                       │
//! │       404                              → NotFound                       │
//! │       other                            → Status { status, body }        │
//! │                                                                         │
//! │  POST {base}/purchase   {emp_cd, items[]}                               │
//! │       200 {success, total, total_ex_tax} → Ok(PurchaseResult)           │
//! │       other                              → Status { status, body }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use scanpos_core::{Product, PurchaseRequest, PurchaseResult};
use tracing::{debug, info, warn};

use crate::backend::ProductBackend;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the HTTP backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, e.g. `http://localhost:8000`.
    pub base_url: String,

    /// Whole-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a config with the default 10 second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// HttpBackend
// =============================================================================

/// Backend client over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a client for the configured backend.
    ///
    /// ## Errors
    /// - `InvalidUrl` if the base URL does not parse or is not http(s)
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let parsed = Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;

        Ok(HttpBackend { client, base_url })
    }

    /// Returns the normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, code: &str) -> String {
        format!("{}/item/{}", self.base_url, code)
    }

    fn purchase_url(&self) -> String {
        format!("{}/purchase", self.base_url)
    }
}

#[async_trait]
impl ProductBackend for HttpBackend {
    async fn lookup_item(&self, code: &str) -> ClientResult<Product> {
        let start = Instant::now();
        let url = self.item_url(code);
        debug!(%url, "GET item");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(code, "item not found");
            return Err(ClientError::not_found(code));
        }

        let body = response.text().await?;
        if !status.is_success() {
            warn!(code, status = status.as_u16(), "item lookup failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Err(ClientError::not_found(code));
        }
        let product: Option<Product> = serde_json::from_str(&body)?;
        let product = product.ok_or_else(|| ClientError::not_found(code))?;

        info!(
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            code,
            prd_id = product.prd_id,
            "item lookup complete"
        );
        Ok(product)
    }

    async fn purchase(&self, request: &PurchaseRequest) -> ClientResult<PurchaseResult> {
        let start = Instant::now();
        let url = self.purchase_url();
        debug!(%url, items = request.items.len(), emp_cd = %request.emp_cd, "POST purchase");

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "purchase failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: PurchaseResult = serde_json::from_str(&body)?;
        info!(
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            success = result.success,
            total = result.total.yen(),
            "purchase complete"
        );
        Ok(result)
    }
}
