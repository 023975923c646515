use crate::config::BackendConfig;
use crate::records::{PredictResponse, PredictionPage, PredictionResult};
use async_trait::async_trait;
use reqwest::{multipart, StatusCode};
use thiserror::Error;
use tokio::time::Duration;
use tracing::instrument;

/// Closed failure taxonomy for every backend round trip.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed before a response was received: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server responded with status {status}: {body}")]
    Server { status: StatusCode, body: String },
    #[error("response body did not match the expected shape: {0}")]
    Decode(#[source] serde_json::Error),
}

/// The seam between the store and the network. The concrete
/// implementation is [`PredictionClient`]; tests substitute mocks.
#[async_trait]
pub trait PredictionApi: Send + Sync + 'static {
    async fn analyze(&self, image: Vec<u8>) -> Result<PredictionResult, ApiError>;
    async fn list_all(&self) -> Result<PredictionPage, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(backend: &BackendConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(backend.connect_timeout_secs))
            .timeout(Duration::from_secs(backend.request_timeout_secs))
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            http,
            base_url: backend.get_base_url(),
        })
    }

    pub fn with_base_url(base_url: String) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self { http, base_url })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            // Non-2xx bodies are plain diagnostic text, never parsed.
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "backend returned an error response");
            return Err(ApiError::Server { status, body });
        }
        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let body = response.text().await.map_err(ApiError::Transport)?;
        serde_json::from_str(&body).map_err(ApiError::Decode)
    }
}

#[async_trait]
impl PredictionApi for PredictionClient {
    #[instrument(skip(self, image))]
    async fn analyze(&self, image: Vec<u8>) -> Result<PredictionResult, ApiError> {
        let url = format!("{}/predict", self.base_url);
        tracing::debug!(%url, bytes = image.len(), "uploading image for analysis");

        let part = multipart::Part::bytes(image)
            .file_name("image.jpg")
            .mime_str("image/jpeg")
            .map_err(ApiError::Transport)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let response = Self::check_status(response).await?;
        let decoded: PredictResponse = Self::decode(response).await?;

        tracing::debug!(
            label = %decoded.prediction.label,
            probability = decoded.prediction.probability,
            "received prediction"
        );
        Ok(decoded.prediction)
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<PredictionPage, ApiError> {
        let url = format!("{}/predictions", self.base_url);
        tracing::debug!(%url, "fetching prediction history");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let response = Self::check_status(response).await?;
        let page: PredictionPage = Self::decode(response).await?;

        tracing::debug!(
            fetched = page.predictions.len(),
            total = page.total_count,
            "received prediction history"
        );
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/predictions/{}", self.base_url, id);
        tracing::debug!(%url, "deleting prediction");

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        // Success is determined by status alone; the body is ignored.
        Self::check_status(response).await?;
        Ok(())
    }
}
