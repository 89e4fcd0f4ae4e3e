//! Text and JSON rendering.
//!
//! This module turns records and history statistics into the result cards
//! and listings printed by the CLI.

use crate::models::{AnalysisRecord, HistorySummary};
use crate::samples::SampleArticle;
use anyhow::Result;
use serde::Serialize;

/// Characters of article text shown in history listings.
const PREVIEW_CHARS: usize = 72;

/// Render the result card for a single analysis.
pub fn render_result_card(record: &AnalysisRecord) -> String {
    let mut card = String::new();

    card.push_str(&format!(
        "{} {}\n",
        record.prediction.emoji(),
        record.prediction.headline()
    ));
    card.push_str(&format!("   Confidence: {}%\n", record.confidence));
    card.push_str("   Analysis Factors:\n");
    for factor in &record.key_factors {
        card.push_str(&format!("     • {}\n", factor));
    }
    card.push_str(&format!("   Analysis ID: {}\n", record.id));

    card
}

/// Render one line of the history listing.
fn render_history_line(record: &AnalysisRecord) -> String {
    let when = record
        .created_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown time".to_string());
    let feedback = match record.user_feedback {
        Some(feedback) => feedback.to_string(),
        None => "-".to_string(),
    };

    format!(
        "{} {:<10} {:>3}%  {:<9}  {}  {}  \"{}\"\n",
        record.prediction.emoji(),
        record.prediction.to_string(),
        record.confidence,
        feedback,
        record.id,
        when,
        record.preview(PREVIEW_CHARS)
    )
}

/// Render the history listing followed by its summary.
pub fn render_history(records: &[AnalysisRecord], summary: &HistorySummary) -> String {
    let mut output = String::new();

    if records.is_empty() {
        output.push_str("No analyses recorded yet.\n");
        return output;
    }

    output.push_str("📚 Analysis History (newest first)\n\n");
    for record in records {
        output.push_str(&render_history_line(record));
    }
    output.push('\n');
    output.push_str(&render_summary(summary));

    output
}

/// Render aggregate statistics.
pub fn render_summary(summary: &HistorySummary) -> String {
    let mut section = String::new();

    section.push_str("📊 Summary:\n");
    section.push_str(&format!("   Total analyses: {}\n", summary.total));
    section.push_str(&format!(
        "   - ✅ Authentic: {} | ⚠️ Fake: {}\n",
        summary.authentic, summary.fake
    ));
    section.push_str(&format!(
        "   Feedback: {} correct | {} incorrect | {} pending\n",
        summary.marked_correct, summary.marked_incorrect, summary.pending_feedback
    ));
    section.push_str(&format!(
        "   Average confidence: {:.1}%\n",
        summary.average_confidence
    ));
    if let Some(rate) = summary.agreement_rate() {
        section.push_str(&format!("   User agreement: {:.0}%\n", rate * 100.0));
    }

    section
}

/// Render the list of built-in sample articles.
pub fn render_samples(samples: &[SampleArticle]) -> String {
    let mut output = String::new();

    for (i, sample) in samples.iter().enumerate() {
        output.push_str(&format!(
            "[{}] {} ({}, source: {})\n    {}\n\n",
            i + 1,
            sample.title,
            sample.expected,
            sample.source,
            sample.content
        ));
    }
    output.push_str("Run `newsprobe analyze --sample <N>` to analyze one of them.\n");

    output
}

/// Serialize any report payload as pretty JSON.
pub fn generate_json_report<T: Serialize + ?Sized>(payload: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(payload)?)
}
