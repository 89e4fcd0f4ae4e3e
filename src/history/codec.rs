//! Persisted form of the history collection.
//!
//! Current writes use a versioned envelope:
//!
//! ```json
//! { "version": 1, "records": [ ... newest first ... ] }
//! ```
//!
//! A bare JSON array of records is accepted on read as well.

use crate::models::{AnalysisRecord, MAX_CONFIDENCE, MIN_CONFIDENCE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Largest id accepted on load. Ids are epoch milliseconds, so anything
/// above `i64::MAX` cannot have been issued by a store.
pub const MAX_RECORD_ID: u64 = i64::MAX as u64;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    records: &'a [AnalysisRecord],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Persisted {
    Envelope {
        version: u32,
        records: Vec<AnalysisRecord>,
    },
    Bare(Vec<AnalysisRecord>),
}

/// Reasons a persisted blob is rejected.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed history data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported history schema version {0}")]
    UnsupportedVersion(u32),

    #[error("duplicate record id {0}")]
    DuplicateId(u64),

    #[error("record id {0} is out of range")]
    IdOutOfRange(u64),

    #[error("record {id} has confidence {confidence} outside the allowed range")]
    ConfidenceOutOfRange { id: u64, confidence: u8 },
}

/// Serialize records, newest first.
pub fn encode(records: &[AnalysisRecord]) -> serde_json::Result<String> {
    serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        records,
    })
}

/// Parse a persisted blob back into records, newest first.
pub fn decode(raw: &str) -> Result<Vec<AnalysisRecord>, DecodeError> {
    let records = match serde_json::from_str::<Persisted>(raw)? {
        Persisted::Envelope { version, records } => {
            if version > SCHEMA_VERSION {
                return Err(DecodeError::UnsupportedVersion(version));
            }
            records
        }
        Persisted::Bare(records) => records,
    };

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if record.id.0 > MAX_RECORD_ID {
            return Err(DecodeError::IdOutOfRange(record.id.0));
        }
        if !seen.insert(record.id) {
            return Err(DecodeError::DuplicateId(record.id.0));
        }
        if !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&record.confidence) {
            return Err(DecodeError::ConfidenceOutOfRange {
                id: record.id.0,
                confidence: record.confidence,
            });
        }
    }

    Ok(records)
}
