//! HTTP dataset fetcher backed by `reqwest`.

use super::{ByteStream, ResourceFetcher};
use crate::model::{LoadError, SourceId};
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tracing::info;

/// Fetches `{base_url}/{source}.json`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Build a fetcher with a whole-request timeout.
    ///
    /// # Errors
    /// `NetworkFailure` (with an empty source id) if the TLS backend cannot be
    /// initialised.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("versepad/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LoadError::NetworkFailure {
                source_id: String::new(),
                reason: describe_reqwest_error(&e),
            })?;
        Ok(Self::with_client(client, base_url))
    }

    /// Fetcher using an already configured client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// URL of the document for `source`.
    pub fn url_for(&self, source: &SourceId) -> String {
        format!("{}/{}.json", self.base_url.trim_end_matches('/'), source)
    }
}

/// Turn a transport error into a short, user-facing reason.
pub fn describe_reqwest_error(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_status() {
        "server returned an error status"
    } else if err.is_body() || err.is_decode() {
        "response body could not be read"
    } else if err.is_request() {
        "request could not be sent"
    } else {
        "network error"
    };
    format!("{kind}: {err}")
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn open(&self, source: &SourceId) -> Result<ByteStream, LoadError> {
        let url = self.url_for(source);
        let network_failure = |reason: String| LoadError::NetworkFailure {
            source_id: source.to_string(),
            reason,
        };

        info!(%url, "Requesting dataset");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| network_failure(describe_reqwest_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(network_failure(format!("HTTP {status}")));
        }

        let content_length = response.content_length().filter(|len| *len > 0);
        let source_id = source.to_string();
        let chunks = response
            .bytes_stream()
            .map(move |chunk| {
                chunk.map_err(|e| LoadError::NetworkFailure {
                    source_id: source_id.clone(),
                    reason: describe_reqwest_error(&e),
                })
            })
            .boxed();

        Ok(ByteStream {
            content_length,
            chunks,
        })
    }
}
