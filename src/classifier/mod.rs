//! Article classifiers.
//!
//! A classifier turns article text into a [`Verdict`]. The history store
//! only sees the [`Classifier`] trait, so the random stub and the HTTP
//! backend are interchangeable.

pub mod random;
pub mod remote;

pub use random::RandomClassifier;
pub use remote::RemoteClassifier;

use crate::config::{ClassifierBackend, ClassifierConfig};
use crate::models::Verdict;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Labels attached to every record, in display order.
pub const KEY_FACTORS: [&str; 5] = [
    "Source credibility analysis",
    "Language pattern recognition",
    "Fact-checking cross-reference",
    "Sentiment analysis",
    "Writing style verification",
];

/// Owned copy of [`KEY_FACTORS`].
pub fn key_factors() -> Vec<String> {
    KEY_FACTORS.iter().map(|f| f.to_string()).collect()
}

/// Errors a classifier can report.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The backend could not be reached or did not answer in time.
    #[error("Classifier unavailable: {reason}")]
    Unavailable { reason: String },

    /// The backend answered with something we cannot interpret.
    #[error("Invalid classifier response: {reason}")]
    InvalidResponse { reason: String },
}

/// Capability that produces a verdict for a piece of text.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Classify already-trimmed, non-empty text.
    async fn classify(&self, text: &str) -> std::result::Result<Verdict, ClassifyError>;
}

/// Build the classifier selected by the configuration.
pub fn from_config(config: &ClassifierConfig) -> Result<Arc<dyn Classifier>> {
    let delay = Duration::from_millis(config.delay_ms);

    match config.backend {
        ClassifierBackend::Random => {
            let classifier = match config.seed {
                Some(seed) => RandomClassifier::seeded(seed, delay),
                None => RandomClassifier::new(delay),
            };
            Ok(Arc::new(classifier))
        }
        ClassifierBackend::Remote => {
            let url = config
                .url
                .as_deref()
                .context("The remote classifier backend requires a URL")?;
            let classifier = RemoteClassifier::new(
                url,
                Duration::from_secs(config.timeout_seconds),
            )
            .context("Failed to create remote classifier")?;
            Ok(Arc::new(classifier))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_factors_are_fixed() {
        let factors = key_factors();
        assert_eq!(factors.len(), 5);
        assert_eq!(factors[0], "Source credibility analysis");
        assert_eq!(factors[4], "Writing style verification");
    }

    #[test]
    fn test_from_config_random() {
        let config = ClassifierConfig {
            delay_ms: 0,
            seed: Some(11),
            ..ClassifierConfig::default()
        };
        let classifier = from_config(&config).unwrap();
        assert_eq!(classifier.name(), "random");

        let verdict = tokio_test::block_on(classifier.classify("text")).unwrap();
        assert!((70..=99).contains(&verdict.confidence));
    }

    #[test]
    fn test_from_config_remote_requires_url() {
        let config = ClassifierConfig {
            backend: ClassifierBackend::Remote,
            url: None,
            ..ClassifierConfig::default()
        };
        assert!(from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_remote() {
        let config = ClassifierConfig {
            backend: ClassifierBackend::Remote,
            url: Some("http://localhost:8000/classify".to_string()),
            ..ClassifierConfig::default()
        };
        let classifier = from_config(&config).unwrap();
        assert_eq!(classifier.name(), "remote");
    }
}
