//! Page fetching
//!
//! The pipeline only needs "URL in, document out or fetch error". The
//! [`PageFetcher`] trait is that seam; [`HttpFetcher`] is the production
//! implementation and tests substitute their own.

use crate::config::IngestConfig;
use crate::{IngestError, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::debug;

/// A fetched page: its final URL and markup
///
/// Parsing is deferred to [`Document::parse`] so that the parsed tree, which
/// is not `Send`, never lives across an await point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    url: String,
    body: String,
}

impl Document {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// URL the document was served from (after redirects)
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn parse(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Capability to load a document by URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`, failing with a fetch-class [`IngestError`] on network
    /// errors, non-success statuses, or timeouts. No retries.
    async fn fetch(&self, url: &str) -> Result<Document>;
}

/// HTTP implementation backed by `reqwest`
pub struct HttpFetcher {
    client: Client,
    load_timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.load_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| IngestError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            load_timeout_secs: config.load_timeout_secs,
        })
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> IngestError {
        if err.is_timeout() {
            IngestError::Timeout {
                url: url.to_string(),
                secs: self.load_timeout_secs,
            }
        } else {
            IngestError::Fetch {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Document> {
        debug!(url, "Fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| self.classify(url, e))?;

        debug!(url = %final_url, bytes = body.len(), "Fetched page");

        Ok(Document::new(final_url, body))
    }
}
