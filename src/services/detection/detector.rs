// Detector
// Orchestrates the scanners into a DetectionResult, with soft failure and batch support

use super::comparison::compare_drafts;
use super::entropy::estimate_entropy;
use super::error::{DetectError, DetectResult};
use super::patterns::{scan_patterns, Polarity};
use super::scoring::aggregate_score;
use super::verdict::{confidence_for, formality_for, verdict_for};
use crate::models::{AnalysisInput, Confidence, DetectionResult, RawMetrics, TextMetrics};
use crate::services::config_store::DetectionConfig;
use crate::services::text_processor::{
    clean_submission_text, compute_lexical_metrics, normalize_punctuation, normalized_tokens,
};
use tracing::{debug, warn};

pub const METHOD: &str = "Heuristic Analysis";
pub const FALLBACK_METHOD: &str = "Error Fallback";
pub const NEUTRAL_VERDICT: &str = "Analysis failed - using neutral score";
pub const TOO_SHORT_VERDICT: &str = "Text too short for analysis";

/// Reject texts that are empty or shorter than `min_text_chars` once trimmed.
pub fn validate_text(text: &str, config: &DetectionConfig) -> DetectResult<()> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DetectError::Validation("Text is required".to_string()));
    }
    if trimmed.chars().count() < config.min_text_chars {
        return Err(DetectError::Validation(format!(
            "Text must be at least {} characters long",
            config.min_text_chars
        )));
    }
    Ok(())
}

/// Reject prepared text with nothing left to score, such as bare markup, links or punctuation.
pub fn validate_prepared(text: &str) -> DetectResult<()> {
    if normalized_tokens(text).is_empty() {
        return Err(DetectError::Validation(
            "Text contains no analyzable words".to_string(),
        ));
    }
    Ok(())
}

pub fn prepare_text(text: &str, config: &DetectionConfig) -> String {
    if config.strip_markup {
        clean_submission_text(text)
    } else {
        normalize_punctuation(text)
    }
}

/// Score already-prepared text. No length validation; the only error is a non-finite score.
pub fn analyze(text: &str) -> DetectResult<DetectionResult> {
    let lexical = compute_lexical_metrics(text);
    let entropy = estimate_entropy(text);
    let scan = scan_patterns(text, lexical.word_count);
    let breakdown = aggregate_score(&lexical, &entropy, &scan)?;

    let ai_likelihood = breakdown.ai_likelihood;
    let ai_marker_count = scan.ai_marker_count();

    let metrics = TextMetrics {
        word_count: lexical.word_count,
        sentence_count: lexical.sentence_count,
        avg_words_per_sentence: round_to(lexical.avg_words_per_sentence, 2),
        vocabulary_richness: round_to(lexical.vocabulary_richness, 3),
        sentence_variation: round_to(lexical.sentence_variation, 3),
        formality_level: formality_for(&scan),
        has_ai_markers: ai_marker_count > 0,
        has_personal_touch: scan.personal_voice_matches() > 0,
    };

    let raw_metrics = RawMetrics {
        perplexity_score: round_to(entropy.perplexity_score, 2),
        entropy: round_to(entropy.entropy, 3),
        normalized_entropy: round_to(entropy.normalized_entropy, 3),
        ai_patterns: scan.matches_with_polarity(Polarity::Ai),
        human_patterns: scan.matches_with_polarity(Polarity::Human),
        structure_consistency: round_to(lexical.consistency, 3),
        structure_variation: round_to(lexical.sentence_variation, 3),
        word_count: lexical.word_count,
        sentence_count: lexical.sentence_count,
        avg_words_per_sentence: round_to(lexical.avg_words_per_sentence, 2),
        pattern_counts: scan.counts(),
        active_categories: scan.active_categories(),
        adjustments: breakdown.adjustments,
        error: None,
    };

    debug!(
        words = lexical.word_count,
        ai_likelihood,
        raw_score = breakdown.raw_score,
        "detector.analyzed"
    );

    Ok(DetectionResult {
        ai_likelihood,
        human_likelihood: 100 - ai_likelihood,
        confidence: confidence_for(ai_likelihood, lexical.word_count),
        verdict: verdict_for(ai_likelihood).to_string(),
        score: ai_likelihood as f64 / 100.0,
        metrics,
        ai_marker_count,
        raw_metrics,
        method: METHOD.to_string(),
        comparison: None,
    })
}

/// Full detection for one submission.
///
/// Only validation problems surface as `Err`; analysis failures on either the final text
/// or the draft are logged and replaced by the neutral result.
pub fn detect(input: &AnalysisInput, config: &DetectionConfig) -> DetectResult<DetectionResult> {
    validate_text(&input.text, config)?;

    let final_text = prepare_text(&input.text, config);
    validate_prepared(&final_text)?;
    let mut result = analyze_or_neutral(&final_text, "final");

    // A draft with no words left after cleaning is treated as absent
    let draft_text = input
        .previous_text
        .as_deref()
        .map(|t| prepare_text(t, config))
        .filter(|t| validate_prepared(t).is_ok());

    if let Some(draft_text) = draft_text {
        let draft_result = analyze_or_neutral(&draft_text, "draft");
        let comparison = compare_drafts(
            &draft_text,
            &final_text,
            draft_result.ai_likelihood,
            result.ai_likelihood,
            config,
        );
        debug!(
            words_added = comparison.words_added,
            words_removed = comparison.words_removed,
            significantly_modified = comparison.significantly_modified,
            "detector.compared"
        );
        result.comparison = Some(comparison);
    }

    Ok(result)
}

fn analyze_or_neutral(text: &str, role: &str) -> DetectionResult {
    match analyze(text) {
        Ok(result) => result,
        Err(e) => {
            warn!(role, chars = text.len(), error = %e, "detector.analysis_failed");
            neutral_result(&e.to_string())
        }
    }
}

/// Score of 50 with low confidence, returned whenever analysis cannot complete.
pub fn neutral_result(reason: &str) -> DetectionResult {
    DetectionResult {
        ai_likelihood: 50,
        human_likelihood: 50,
        confidence: Confidence::Low,
        verdict: NEUTRAL_VERDICT.to_string(),
        score: 0.5,
        metrics: TextMetrics::default(),
        ai_marker_count: 0,
        raw_metrics: RawMetrics {
            error: Some(reason.to_string()),
            ..RawMetrics::default()
        },
        method: FALLBACK_METHOD.to_string(),
        comparison: None,
    }
}

/// Placeholder for batch items that fail validation.
pub fn too_short_result(reason: &str) -> DetectionResult {
    DetectionResult {
        verdict: TOO_SHORT_VERDICT.to_string(),
        method: METHOD.to_string(),
        ..neutral_result(reason)
    }
}

/// Independent detection per text; results keep the input order.
pub fn detect_batch(texts: &[String], config: &DetectionConfig) -> Vec<DetectionResult> {
    texts
        .iter()
        .map(|text| match detect(&AnalysisInput::new(text.as_str()), config) {
            Ok(result) => result,
            Err(e) => too_short_result(&e.to_string()),
        })
        .collect()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
