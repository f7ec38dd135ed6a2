// Score Aggregation
// Folds entropy, pattern and structure signals into a 0-100 AI likelihood

use super::entropy::EntropyEstimate;
use super::error::{DetectError, DetectResult};
use super::patterns::PatternScan;
use crate::services::text_processor::LexicalMetrics;

/// Starting point before any evidence is applied.
pub const BASELINE_SCORE: f64 = 30.0;

const PERPLEXITY_HIGH: f64 = 60.0;
const PERPLEXITY_LOW: f64 = 30.0;
const PERPLEXITY_CAP: f64 = 30.0;

const CONSISTENCY_THRESHOLD: f64 = 0.7;

const LONG_SENTENCE_WORDS: f64 = 20.0;
const SHORT_SENTENCE_WORDS: f64 = 8.0;
const SENTENCE_LENGTH_CAP: f64 = 20.0;

const LOW_RICHNESS: f64 = 0.5;
const RICHNESS_MIN_WORDS: usize = 30;
const RICHNESS_CAP: f64 = 25.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// Unclamped sum of baseline and adjustments.
    pub raw_score: f64,
    pub ai_likelihood: u8,
    /// Human-readable trace of every non-zero adjustment, in application order.
    pub adjustments: Vec<String>,
}

pub fn aggregate_score(
    metrics: &LexicalMetrics,
    entropy: &EntropyEstimate,
    scan: &PatternScan,
) -> DetectResult<ScoreBreakdown> {
    let mut score = BASELINE_SCORE;
    let mut adjustments = Vec::new();

    let mut apply = |label: String, delta: f64| {
        if delta != 0.0 {
            score += delta;
            adjustments.push(format!("{} -> {:+.1}", label, delta));
        }
    };

    // Predictable vocabulary reads as generated; a varied one as human
    let p = entropy.perplexity_score;
    let perplexity_delta = if p > PERPLEXITY_HIGH {
        ((p - PERPLEXITY_HIGH) * 0.8).min(PERPLEXITY_CAP)
    } else if p < PERPLEXITY_LOW {
        -((PERPLEXITY_LOW - p) * 0.5).min(PERPLEXITY_CAP)
    } else {
        0.0
    };
    apply(format!("perplexity={:.2}", p), perplexity_delta);

    for tally in scan.tallies.iter().filter(|t| t.active) {
        apply(
            format!("{} x{}", tally.category.name(), tally.matches),
            tally.contribution,
        );
    }

    if metrics.consistency > CONSISTENCY_THRESHOLD && metrics.sentence_count > 2 {
        apply(
            format!("consistency={:.3}", metrics.consistency),
            (metrics.consistency - CONSISTENCY_THRESHOLD) * 100.0,
        );
    }

    let avg = metrics.avg_words_per_sentence;
    if avg > LONG_SENTENCE_WORDS {
        apply(
            format!("avg_sentence={:.1}", avg),
            ((avg - LONG_SENTENCE_WORDS) * 2.0).min(SENTENCE_LENGTH_CAP),
        );
    } else if avg < SHORT_SENTENCE_WORDS && metrics.word_count > 0 {
        apply(
            format!("avg_sentence={:.1}", avg),
            -((SHORT_SENTENCE_WORDS - avg) * 3.0).min(SENTENCE_LENGTH_CAP),
        );
    }

    if metrics.vocabulary_richness < LOW_RICHNESS && metrics.word_count > RICHNESS_MIN_WORDS {
        apply(
            format!("ttr={:.3}", metrics.vocabulary_richness),
            ((LOW_RICHNESS - metrics.vocabulary_richness) * 80.0).min(RICHNESS_CAP),
        );
    }

    if !score.is_finite() {
        return Err(DetectError::Analysis(format!(
            "score is not finite after {} adjustments",
            adjustments.len()
        )));
    }

    Ok(ScoreBreakdown {
        raw_score: score,
        ai_likelihood: score.clamp(0.0, 100.0).round() as u8,
        adjustments,
    })
}
