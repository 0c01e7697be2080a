use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::{debug, info};

use super::messages::{AnalyzeRequest, FinalReport, FinalResultsRequest, NormalizedMetrics};
use crate::error::BackendError;

/// The scoring capability the practice flow talks to
///
/// Implementations: `HttpBackend` for the real service; tests supply fakes.
#[async_trait]
pub trait ScoringBackend: Send + Sync {
    /// `POST /analyze`; the acknowledgement body is not consumed
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<(), BackendError>;

    /// `GET /results/{session_id}`
    async fn results(&self, session_id: &str) -> Result<NormalizedMetrics, BackendError>;

    /// `POST /final_results`
    async fn final_results(&self, request: &FinalResultsRequest) -> Result<FinalReport, BackendError>;
}

/// JSON-over-HTTP client for the scoring service
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Base URL plus path segments, each percent-encoded as one segment
    fn segment_url(&self, endpoint: &str, segments: &[&str]) -> Result<Url, BackendError> {
        let invalid = |reason: String| BackendError::InvalidUrl {
            endpoint: endpoint.to_string(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Map transport and non-2xx failures to `BackendError`
    async fn check_status(endpoint: &str, sent: Result<Response, reqwest::Error>) -> Result<Response, BackendError> {
        let response = sent.map_err(|source| BackendError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// `check_status`, then decode the body as JSON
    async fn read_json(endpoint: &str, sent: Result<Response, reqwest::Error>) -> Result<Value, BackendError> {
        let response = Self::check_status(endpoint, sent).await?;

        let bytes = response.bytes().await.map_err(|source| BackendError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ScoringBackend for HttpBackend {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<(), BackendError> {
        let endpoint = "/analyze";
        info!(
            "Submitting attempt {} for session {} ({} chars, {:.2}s)",
            request.index,
            request.session_id,
            request.speech.len(),
            request.duration
        );

        let sent = self.client.post(self.url(endpoint)).json(request).send().await;
        let response = Self::check_status(endpoint, sent).await?;
        let status = response.status();
        let ack = response.text().await.unwrap_or_default();
        debug!("Analyze acknowledged ({}): {}", status, ack);

        Ok(())
    }

    async fn results(&self, session_id: &str) -> Result<NormalizedMetrics, BackendError> {
        let endpoint = format!("/results/{}", session_id);
        info!("Fetching normalized metrics for session {}", session_id);

        let url = self.segment_url(&endpoint, &["results", session_id])?;
        let sent = self.client.get(url).send().await;
        let body = Self::read_json(&endpoint, sent).await?;

        NormalizedMetrics::from_value(&body).ok_or_else(|| BackendError::Decode {
            endpoint,
            reason: "expected an object of metric levels".to_string(),
        })
    }

    async fn final_results(&self, request: &FinalResultsRequest) -> Result<FinalReport, BackendError> {
        let endpoint = "/final_results";
        info!("Requesting final report for {:?}", request);

        let sent = self.client.post(self.url(endpoint)).json(request).send().await;
        let body = Self::read_json(endpoint, sent).await?;

        Ok(FinalReport::from_value(&body))
    }
}
