//! The analysis history store.
//!
//! Keeps every analysis record, newest first, and mirrors the whole
//! collection into a single key-value slot after each mutation. The
//! in-memory collection is authoritative: a failed write is logged and
//! retried on the next mutation or an explicit [`HistoryStore::flush`].

use super::codec;
use crate::classifier::{key_factors, Classifier, ClassifyError};
use crate::models::{AnalysisRecord, Feedback, HistorySummary, RecordId};
use crate::storage::{KeyValueStore, StorageError};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Errors surfaced by history operations.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The classifier failed; no record was inserted.
    #[error("Classification unavailable: {0}")]
    ClassificationUnavailable(#[from] ClassifyError),

    /// The collection could not be written back. In-memory state is intact.
    #[error("Failed to persist analysis history: {reason}")]
    PersistenceWriteFailed { reason: String },
}

impl From<StorageError> for HistoryError {
    fn from(e: StorageError) -> Self {
        HistoryError::PersistenceWriteFailed {
            reason: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;

struct State {
    /// Newest first.
    records: VecDeque<AnalysisRecord>,
    last_id: u64,
    dirty: bool,
}

/// Ordered, persisted collection of analysis records.
pub struct HistoryStore {
    state: Mutex<State>,
    classifier: Arc<dyn Classifier>,
    storage: Box<dyn KeyValueStore>,
    key: String,
    max_records: Option<usize>,
}

impl HistoryStore {
    /// Open the store, loading whatever the slot at `key` holds.
    ///
    /// An absent, unreadable or invalid slot yields an empty history.
    pub fn open(
        storage: Box<dyn KeyValueStore>,
        key: impl Into<String>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        let key = key.into();
        let records = load_records(storage.as_ref(), &key);
        let last_id = records.iter().map(|r| r.id.0).max().unwrap_or(0);

        info!(
            "Loaded {} analysis records from slot '{}' (classifier: {})",
            records.len(),
            key,
            classifier.name()
        );

        Self {
            state: Mutex::new(State {
                records: records.into(),
                last_id,
                dirty: false,
            }),
            classifier,
            storage,
            key,
            max_records: None,
        }
    }

    /// Bound the history to `max` records, evicting the oldest on insert.
    ///
    /// Without a bound the history grows forever, and records are never
    /// removed.
    pub fn with_max_records(mut self, max: Option<usize>) -> Self {
        self.max_records = max.map(|m| m.max(1));
        self
    }

    /// Classify `text` and record the outcome at the head of the history.
    ///
    /// Blank input (after trimming) is ignored and returns `Ok(None)`.
    /// The classifier runs without holding the store lock, so `list` and
    /// `annotate` stay responsive and concurrent calls each insert their
    /// own record once their classifier call completes.
    pub async fn classify(&self, text: &str) -> Result<Option<AnalysisRecord>> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank classification request");
            return Ok(None);
        }

        let verdict = self.classifier.classify(text).await.map_err(|e| {
            warn!("Classifier '{}' failed: {}", self.classifier.name(), e);
            HistoryError::from(e)
        })?;

        let mut state = self.state.lock().await;

        let now = Utc::now().timestamp_millis();
        let id = next_id(state.last_id, now);
        state.last_id = id;

        let record = AnalysisRecord {
            id: RecordId(id),
            text: text.to_string(),
            prediction: verdict.prediction,
            confidence: verdict.confidence,
            key_factors: key_factors(),
            timestamp: now,
            user_feedback: None,
        };
        state.records.push_front(record.clone());

        if let Some(max) = self.max_records {
            while state.records.len() > max {
                if let Some(evicted) = state.records.pop_back() {
                    debug!("Evicted record {} (history bound {})", evicted.id, max);
                }
            }
        }

        info!(
            "Recorded analysis {}: {} ({}%)",
            record.id, record.prediction, record.confidence
        );
        self.persist_or_warn(&mut state);

        Ok(Some(record))
    }

    /// Set the user's feedback on record `id`.
    ///
    /// Returns `false` and changes nothing when the id is unknown. Existing
    /// feedback is overwritten.
    pub async fn annotate(&self, id: RecordId, feedback: Feedback) -> bool {
        let mut state = self.state.lock().await;

        let Some(record) = state.records.iter_mut().find(|r| r.id == id) else {
            debug!("No record {} to annotate", id);
            return false;
        };

        if let Some(previous) = record.user_feedback {
            debug!("Overwriting feedback {} on record {}", previous, id);
        }
        record.user_feedback = Some(feedback);
        info!("Marked record {} as {}", id, feedback);

        self.persist_or_warn(&mut state);
        true
    }

    /// Snapshot of all records, newest first.
    pub async fn list(&self) -> Vec<AnalysisRecord> {
        self.state.lock().await.records.iter().cloned().collect()
    }

    /// Look up a single record.
    pub async fn get(&self, id: RecordId) -> Option<AnalysisRecord> {
        self.state
            .lock()
            .await
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Statistics over the whole history.
    pub async fn summary(&self) -> HistorySummary {
        let state = self.state.lock().await;
        let records: Vec<AnalysisRecord> = state.records.iter().cloned().collect();
        HistorySummary::from_records(&records)
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    /// Whether the last write back to storage failed.
    pub async fn is_dirty(&self) -> bool {
        self.state.lock().await.dirty
    }

    /// Write the collection back if a previous write failed.
    pub async fn flush(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.dirty {
            return Ok(());
        }
        self.persist(&mut state)
    }

    fn persist(&self, state: &mut State) -> Result<()> {
        let records: Vec<AnalysisRecord> = state.records.iter().cloned().collect();
        let result = codec::encode(&records)
            .map_err(|e| HistoryError::PersistenceWriteFailed {
                reason: e.to_string(),
            })
            .and_then(|raw| {
                self.storage
                    .set(&self.key, &raw)
                    .map_err(HistoryError::from)
            });
        state.dirty = result.is_err();
        if result.is_ok() {
            debug!("Persisted {} records to slot '{}'", records.len(), self.key);
        }
        result
    }

    fn persist_or_warn(&self, state: &mut State) {
        if let Err(e) = self.persist(state) {
            warn!("{} (keeping {} records in memory)", e, state.records.len());
        }
    }
}

/// Time-derived id, strictly greater than anything issued before.
///
/// Loaded ids are capped at [`codec::MAX_RECORD_ID`], so the increment
/// cannot saturate in practice.
fn next_id(last_id: u64, now_millis: i64) -> u64 {
    let now = u64::try_from(now_millis).unwrap_or(0);
    now.max(last_id.saturating_add(1))
}

fn load_records(storage: &dyn KeyValueStore, key: &str) -> Vec<AnalysisRecord> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("History slot '{}' is empty", key);
            return Vec::new();
        }
        Err(e) => {
            warn!("Could not read history slot '{}': {}", key, e);
            return Vec::new();
        }
    };

    match codec::decode(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!("Discarding unreadable history in slot '{}': {}", key, e);
            Vec::new()
        }
    }
}
