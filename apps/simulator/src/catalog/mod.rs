//! Simulation catalog client: the single point of entry for every call the
//! session makes to the Pathway backend.
//!
//! No retries. A failed call is surfaced to the caller, which decides whether
//! to re-issue the same transition.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod auth;
pub mod models;

pub use auth::Credential;
pub use models::{
    Attempt, Recommendation, SimulationDetail, SimulationResult, SimulationSummary, Submission,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx with the backend's `error` string, surfaced verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Cannot build endpoint URL from base '{0}'")]
    InvalidEndpoint(String),
}

impl ApiError {
    /// Status code reported by the backend, when there was a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// The four backend operations the simulation flow depends on.
///
/// `SimulationSession` holds an `Arc<dyn SimulationApi>` so tests can drive
/// the state machine without a network.
#[async_trait]
pub trait SimulationApi: Send + Sync {
    async fn recommendation(&self) -> Result<Recommendation, ApiError>;

    async fn simulation(&self, simulation_id: &str) -> Result<SimulationDetail, ApiError>;

    async fn start_attempt(&self, simulation_id: &str) -> Result<Attempt, ApiError>;

    async fn submit_attempt(
        &self,
        attempt_id: &str,
        submission: &Submission,
    ) -> Result<SimulationResult, ApiError>;
}

/// reqwest-backed client for the `/api/simulations` endpoints.
#[derive(Clone)]
pub struct HttpSimulationApi {
    client: Client,
    base_url: Url,
    credential: Credential,
}

impl HttpSimulationApi {
    pub fn new(base_url: Url, credential: Credential, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            credential,
        })
    }

    /// `<base>/api/simulations/<segments...>`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "simulations"])
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .bearer_auth(self.credential.bearer_token())
            .send()
            .await?;
        read_json(response).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: Option<&Submission>,
    ) -> Result<T, ApiError> {
        debug!(%url, "POST");
        let mut request = self
            .client
            .post(url)
            .bearer_auth(self.credential.bearer_token());
        if let Some(body) = body {
            request = request.json(body);
        }
        read_json(request.send().await?).await
    }
}

/// Reads the whole body once, then either parses `T` or maps the failure to
/// `ApiError::Api` carrying the backend's own `error` string.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.error,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
            Err(_) => body,
        };
        warn!(status = status.as_u16(), %message, "Backend returned an error");
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(ApiError::Parse)
}

#[async_trait]
impl SimulationApi for HttpSimulationApi {
    async fn recommendation(&self) -> Result<Recommendation, ApiError> {
        self.get(self.endpoint(&["recommendation"])?).await
    }

    async fn simulation(&self, simulation_id: &str) -> Result<SimulationDetail, ApiError> {
        self.get(self.endpoint(&[simulation_id])?).await
    }

    async fn start_attempt(&self, simulation_id: &str) -> Result<Attempt, ApiError> {
        self.post(self.endpoint(&[simulation_id, "start"])?, None)
            .await
    }

    async fn submit_attempt(
        &self,
        attempt_id: &str,
        submission: &Submission,
    ) -> Result<SimulationResult, ApiError> {
        self.post(self.endpoint(&[attempt_id, "submit"])?, Some(submission))
            .await
    }
}
