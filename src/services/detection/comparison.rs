// Draft/Final Comparison
// Word-level delta between a student's draft and the submitted final text

use crate::models::ComparisonResult;
use crate::services::config_store::DetectionConfig;
use crate::services::text_processor::{normalized_tokens, split_words};
use std::collections::HashMap;

fn token_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in normalized_tokens(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Multiset difference of normalized tokens: `(added, removed)`.
/// A word repeated more often in the final counts as added once per extra occurrence.
pub fn word_delta(draft_text: &str, final_text: &str) -> (usize, usize) {
    let draft = token_counts(draft_text);
    let final_counts = token_counts(final_text);

    let added = final_counts
        .iter()
        .map(|(token, &n)| n.saturating_sub(draft.get(token).copied().unwrap_or(0)))
        .sum();
    let removed = draft
        .iter()
        .map(|(token, &n)| n.saturating_sub(final_counts.get(token).copied().unwrap_or(0)))
        .sum();

    (added, removed)
}

/// Signed word-count change relative to the draft, in percent, two decimals.
/// An empty draft counts as a 100% change unless the final is empty too.
pub fn percentage_change(draft_words: usize, final_words: usize) -> f64 {
    if draft_words == 0 {
        return if final_words == 0 { 0.0 } else { 100.0 };
    }
    let pct = (final_words as f64 - draft_words as f64) / draft_words as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

pub fn compare_drafts(
    draft_text: &str,
    final_text: &str,
    draft_ai_likelihood: u8,
    final_ai_likelihood: u8,
    config: &DetectionConfig,
) -> ComparisonResult {
    let (words_added, words_removed) = word_delta(draft_text, final_text);
    let percentage_change =
        percentage_change(split_words(draft_text).len(), split_words(final_text).len());
    let ai_likelihood_delta = final_ai_likelihood as i32 - draft_ai_likelihood as i32;

    // Only a rise in AI likelihood flags the final; a student removing AI text is fine
    let significantly_modified = percentage_change.abs() > config.significant_change_percent
        || ai_likelihood_delta > config.significant_ai_delta;

    ComparisonResult {
        words_added,
        words_removed,
        percentage_change,
        significantly_modified,
        draft_ai_likelihood,
        ai_likelihood_delta,
    }
}
