//! Random stand-in classifier.
//!
//! Picks a label uniformly and a confidence uniformly in `[70, 99]` after a
//! fixed artificial latency. No text features are looked at.

use super::{ClassifyError, Classifier};
use crate::models::{Prediction, Verdict, MAX_CONFIDENCE, MIN_CONFIDENCE};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Delay that mimics a remote inference round trip.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

pub struct RandomClassifier {
    rng: Mutex<StdRng>,
    delay: Duration,
}

impl RandomClassifier {
    /// Classifier seeded from OS entropy.
    pub fn new(delay: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            delay,
        }
    }

    /// Deterministic classifier, handy for demos and tests.
    pub fn seeded(seed: u64, delay: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            delay,
        }
    }

    fn draw(&self) -> Verdict {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let prediction = if rng.gen_bool(0.5) {
            Prediction::Authentic
        } else {
            Prediction::Fake
        };
        let confidence = rng.gen_range(MIN_CONFIDENCE..=MAX_CONFIDENCE);
        Verdict::new(prediction, confidence)
    }
}

impl Default for RandomClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[async_trait]
impl Classifier for RandomClassifier {
    fn name(&self) -> &str {
        "random"
    }

    async fn classify(&self, text: &str) -> Result<Verdict, ClassifyError> {
        debug!(
            "Random classifier: {} chars, waiting {:?}",
            text.chars().count(),
            self.delay
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.draw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_confidence_in_range() {
        let classifier = RandomClassifier::new(Duration::ZERO);
        for _ in 0..500 {
            let verdict = classifier.classify("text").await.unwrap();
            assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&verdict.confidence));
        }
    }

    #[tokio::test]
    async fn test_both_labels_occur() {
        let classifier = RandomClassifier::seeded(7, Duration::ZERO);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(classifier.classify("text").await.unwrap().prediction);
        }
        assert_eq!(seen.len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_is_deterministic() {
        let a = RandomClassifier::seeded(42, Duration::ZERO);
        let b = RandomClassifier::seeded(42, Duration::ZERO);
        for _ in 0..20 {
            assert_eq!(
                a.classify("x").await.unwrap(),
                b.classify("x").await.unwrap()
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_delay() {
        let classifier = RandomClassifier::default();
        let start = tokio::time::Instant::now();
        classifier.classify("text").await.unwrap();
        assert!(start.elapsed() >= DEFAULT_DELAY);
    }
}
