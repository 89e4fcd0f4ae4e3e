//! HTTP classifier backend.
//!
//! Posts `{"text": ...}` to a configured endpoint and expects
//! `{"prediction": "authentic" | "fake", "confidence": <percent>}` back.

use super::{ClassifyError, Classifier};
use crate::models::{Prediction, Verdict};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    prediction: String,
    confidence: f64,
}

/// Classifier that delegates to an inference service over HTTP.
pub struct RemoteClassifier {
    url: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl RemoteClassifier {
    pub fn new(url: &str, timeout: Duration) -> reqwest::Result<Self> {
        info!("Using remote classifier at {} (timeout {:?})", url, timeout);

        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            url: url.to_string(),
            timeout,
            http_client,
        })
    }

    fn parse_response(response: ClassifyResponse) -> Result<Verdict, ClassifyError> {
        let prediction: Prediction =
            response
                .prediction
                .parse()
                .map_err(|reason| ClassifyError::InvalidResponse { reason })?;

        if !response.confidence.is_finite() {
            return Err(ClassifyError::InvalidResponse {
                reason: "confidence is not a number".to_string(),
            });
        }

        // Fractions in [0, 1] are read as probabilities.
        let percent = if response.confidence <= 1.0 {
            response.confidence * 100.0
        } else {
            response.confidence
        };
        let confidence = percent.round().clamp(0.0, 100.0) as u8;

        Ok(Verdict::new(prediction, confidence))
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    fn name(&self) -> &str {
        "remote"
    }

    async fn classify(&self, text: &str) -> Result<Verdict, ClassifyError> {
        debug!("POST {} ({} chars)", self.url, text.chars().count());

        let response = self
            .http_client
            .post(&self.url)
            .json(&ClassifyRequest { text })
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request timed out after {}s", self.timeout.as_secs())
                } else if e.is_connect() {
                    format!("cannot connect to {}", self.url)
                } else {
                    format!("failed to send request: {}", e)
                };
                ClassifyError::Unavailable { reason }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Unavailable {
                reason: format!("classifier returned {}: {}", status, body),
            });
        }

        let body: ClassifyResponse =
            response
                .json()
                .await
                .map_err(|e| ClassifyError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        Self::parse_response(body)
    }
}
