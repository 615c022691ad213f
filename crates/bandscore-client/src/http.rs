//! HTTP implementation of the record transport.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, instrument};

use bandscore_core::model::{RecordId, ScorePayload, ScoreRecord};
use bandscore_core::traits::RecordTransport;
use bandscore_core::TransportError;

/// Talks to `{base}/` and `{base}/{id}` with JSON bodies.
pub struct HttpTransport {
    base_url: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl HttpTransport {
    /// `base_url` is the score-records resource root; a trailing `/` is ignored.
    ///
    /// Without a timeout, requests run until the connection settles them.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        anyhow::ensure!(!base_url.trim().is_empty(), "base URL must not be empty");

        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    fn item_url(&self, id: &RecordId) -> anyhow::Result<String> {
        anyhow::ensure!(!id.is_blank(), "record id must not be blank");
        Ok(format!("{}/{}", self.base_url, id))
    }

    fn classify(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(self.timeout.map(|t| t.as_secs()).unwrap_or_default())
        } else if e.is_connect() {
            TransportError::Network(format!("backend not reachable at {}", self.base_url))
        } else {
            TransportError::Network(e.to_string())
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, TransportError> {
        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, message });
        }
        Ok(response)
    }
}

#[async_trait]
impl RecordTransport for HttpTransport {
    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn list(&self) -> anyhow::Result<Vec<ScoreRecord>> {
        let url = self.collection_url();
        debug!(%url, "GET");
        let response = self.send(self.client.get(&url)).await?;

        let records: Vec<ScoreRecord> = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(records)
    }

    #[instrument(skip(self, payload), fields(base = %self.base_url))]
    async fn create(&self, payload: &ScorePayload) -> anyhow::Result<()> {
        let url = self.collection_url();
        debug!(%url, "POST");
        self.send(self.client.post(&url).json(payload)).await?;
        Ok(())
    }

    #[instrument(skip(self, payload), fields(base = %self.base_url))]
    async fn update(&self, id: &RecordId, payload: &ScorePayload) -> anyhow::Result<()> {
        let url = self.item_url(id)?;
        debug!(%url, "PUT");
        self.send(self.client.put(&url).json(payload)).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn delete(&self, id: &RecordId) -> anyhow::Result<()> {
        let url = self.item_url(id)?;
        debug!(%url, "DELETE");
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }
}
