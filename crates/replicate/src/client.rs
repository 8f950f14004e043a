//! REST client for the Replicate predictions endpoints.
//!
//! Wraps prediction creation, status polling, and output download using
//! [`reqwest`].

use std::time::Duration;

use crate::prediction::{Prediction, PredictionStatus};

/// Interval between prediction status polls.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Give up on a prediction that has not reached a terminal status after
/// this long. Keeps a hung remote call from leaving a generation pending
/// forever.
const POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// HTTP client for the Replicate API.
pub struct ReplicateClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

/// Errors from the Replicate API layer.
#[derive(Debug, thiserror::Error)]
pub enum ReplicateError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Replicate returned a non-2xx status code.
    #[error("Replicate API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The prediction reached a terminal failure status.
    #[error("Prediction {id} {status}: {detail}")]
    PredictionFailed {
        id: String,
        status: &'static str,
        detail: String,
    },

    /// The prediction did not reach a terminal status before the poll
    /// timeout elapsed.
    #[error("Prediction {id} timed out after {elapsed_secs}s")]
    Timeout { id: String, elapsed_secs: u64 },

    /// The prediction succeeded but its output carried no image URL.
    #[error("Prediction {id} produced no output URL")]
    MissingOutput { id: String },
}

impl ReplicateClient {
    /// Create a new client.
    ///
    /// * `base_url`  - API root, e.g. `https://api.replicate.com`.
    /// * `api_token` - Replicate API token, sent as a bearer credential.
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    /// Create a prediction for a hosted model.
    ///
    /// Sends `POST /v1/models/{model}/predictions` with the given input
    /// payload. Returns the server-assigned prediction, usually still in
    /// `starting` status.
    pub async fn create_prediction(
        &self,
        model: &str,
        input: &serde_json::Value,
    ) -> Result<Prediction, ReplicateError> {
        let body = serde_json::json!({ "input": input });

        let response = self
            .client
            .post(format!("{}/v1/models/{}/predictions", self.base_url, model))
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current state of a prediction.
    pub async fn get_prediction(&self, id: &str) -> Result<Prediction, ReplicateError> {
        let response = self
            .client
            .get(format!("{}/v1/predictions/{}", self.base_url, id))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Run a model to completion and return the first output image URL.
    ///
    /// Creates the prediction, then polls until it reaches a terminal
    /// status or the poll timeout elapses. No retries: any failure is
    /// surfaced to the caller.
    pub async fn generate_image_url(
        &self,
        model: &str,
        input: &serde_json::Value,
    ) -> Result<String, ReplicateError> {
        let mut prediction = self.create_prediction(model, input).await?;
        tracing::debug!(prediction_id = %prediction.id, model, "Prediction created");
        let started = tokio::time::Instant::now();

        while !prediction.status.is_terminal() {
            if started.elapsed() >= POLL_TIMEOUT {
                return Err(ReplicateError::Timeout {
                    id: prediction.id,
                    elapsed_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
            prediction = self.get_prediction(&prediction.id).await?;
        }

        match prediction.status {
            PredictionStatus::Succeeded => {
                let url = prediction
                    .first_output_url()
                    .ok_or_else(|| ReplicateError::MissingOutput {
                        id: prediction.id.clone(),
                    })?;
                tracing::info!(
                    prediction_id = %prediction.id,
                    elapsed_secs = started.elapsed().as_secs(),
                    "Prediction succeeded",
                );
                Ok(url.to_string())
            }
            PredictionStatus::Failed => Err(ReplicateError::PredictionFailed {
                id: prediction.id.clone(),
                status: "failed",
                detail: prediction.error.unwrap_or_else(|| "unknown error".to_string()),
            }),
            PredictionStatus::Canceled => Err(ReplicateError::PredictionFailed {
                id: prediction.id.clone(),
                status: "canceled",
                detail: "prediction was canceled".to_string(),
            }),
            // is_terminal() above rules these out.
            PredictionStatus::Starting | PredictionStatus::Processing => unreachable!(),
        }
    }

    /// Download the raw bytes of an output image.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ReplicateError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ReplicateError::ApiError { status, body });
        }

        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Check for a 2xx status and deserialize the JSON body.
    async fn parse_response(response: reqwest::Response) -> Result<Prediction, ReplicateError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ReplicateError::ApiError { status, body });
        }

        Ok(response.json::<Prediction>().await?)
    }
}
