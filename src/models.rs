//! Data models for the news analyzer.
//!
//! This module contains the core data structures used throughout
//! the application for representing analysis records, verdicts and
//! history statistics.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest confidence a record may carry.
pub const MIN_CONFIDENCE: u8 = 70;

/// Highest confidence a record may carry.
pub const MAX_CONFIDENCE: u8 = 99;

/// Outcome of classifying an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    /// The article reads as genuine reporting.
    Authentic,
    /// The article reads as fabricated or misleading.
    Fake,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Authentic => write!(f, "Authentic"),
            Prediction::Fake => write!(f, "Fake"),
        }
    }
}

impl Prediction {
    /// Returns an emoji representation of the prediction.
    pub fn emoji(&self) -> &'static str {
        match self {
            Prediction::Authentic => "✅",
            Prediction::Fake => "⚠️",
        }
    }

    /// Headline shown on a result card, e.g. "Authentic News".
    pub fn headline(&self) -> String {
        format!("{} News", self)
    }
}

impl FromStr for Prediction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "authentic" | "real" | "genuine" => Ok(Prediction::Authentic),
            "fake" => Ok(Prediction::Fake),
            other => Err(format!("unknown prediction '{}'", other)),
        }
    }
}

/// User judgement on a past analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    /// The prediction matched the user's assessment.
    Correct,
    /// The prediction was wrong.
    Incorrect,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Correct => write!(f, "correct"),
            Feedback::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// Unique identifier of an analysis record.
///
/// Ids are derived from the creation time in epoch milliseconds and bumped
/// past the last issued id, so they increase monotonically and are never
/// reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(RecordId)
    }
}

/// Result of a classifier run, before it becomes a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Predicted label.
    pub prediction: Prediction,
    /// Confidence percentage in `[MIN_CONFIDENCE, MAX_CONFIDENCE]`.
    pub confidence: u8,
}

impl Verdict {
    /// Creates a verdict, clamping the confidence into the allowed range.
    pub fn new(prediction: Prediction, confidence: u8) -> Self {
        Self {
            prediction,
            confidence: confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
        }
    }
}

/// One stored outcome of a classification action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    /// Unique, never reused identifier.
    pub id: RecordId,
    /// Submitted article text, trimmed.
    pub text: String,
    /// Predicted label.
    pub prediction: Prediction,
    /// Confidence percentage.
    pub confidence: u8,
    /// Descriptive labels shown alongside the verdict.
    pub key_factors: Vec<String>,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
    /// User feedback, absent until annotated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_feedback: Option<Feedback>,
}

impl AnalysisRecord {
    /// Creation time as a UTC datetime.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Shortened single-line preview of the text.
    pub fn preview(&self, max_chars: usize) -> String {
        let flat: String = self
            .text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if flat.chars().count() <= max_chars {
            flat
        } else {
            let cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
            format!("{}…", cut.trim_end())
        }
    }
}

/// Aggregate statistics over the stored history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    /// Total number of records.
    pub total: usize,
    /// Records predicted authentic.
    pub authentic: usize,
    /// Records predicted fake.
    pub fake: usize,
    /// Records the user marked correct.
    pub marked_correct: usize,
    /// Records the user marked incorrect.
    pub marked_incorrect: usize,
    /// Records without feedback.
    pub pending_feedback: usize,
    /// Mean confidence across all records (0 when empty).
    pub average_confidence: f64,
}

impl HistorySummary {
    /// Creates a summary from a list of records.
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        let mut confidence_sum: u64 = 0;

        for record in records {
            match record.prediction {
                Prediction::Authentic => summary.authentic += 1,
                Prediction::Fake => summary.fake += 1,
            }
            match record.user_feedback {
                Some(Feedback::Correct) => summary.marked_correct += 1,
                Some(Feedback::Incorrect) => summary.marked_incorrect += 1,
                None => summary.pending_feedback += 1,
            }
            confidence_sum += u64::from(record.confidence);
        }

        if summary.total > 0 {
            summary.average_confidence = confidence_sum as f64 / summary.total as f64;
        }

        summary
    }

    /// Share of annotated records the user agreed with, if any were annotated.
    pub fn agreement_rate(&self) -> Option<f64> {
        let annotated = self.marked_correct + self.marked_incorrect;
        if annotated == 0 {
            None
        } else {
            Some(self.marked_correct as f64 / annotated as f64)
        }
    }
}
