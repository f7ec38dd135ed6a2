// Detection Module
// Heuristic AI-authorship detection organized into specialized submodules:
// - patterns: declarative category table and the pattern scanner
// - entropy: word-frequency entropy and the perplexity proxy
// - scoring: folds every signal into the 0-100 AI likelihood
// - verdict: confidence, verdict ladder and formality
// - comparison: draft/final word delta
// - sentence_classifier: per-sentence labels
// - detector: orchestration, soft failure and batch

pub mod comparison;
pub mod detector;
pub mod entropy;
pub mod error;
pub mod patterns;
pub mod scoring;
pub mod sentence_classifier;
pub mod verdict;

// Re-export commonly used functions
pub use comparison::{compare_drafts, percentage_change, word_delta};
pub use detector::{
    analyze,
    detect,
    detect_batch,
    neutral_result,
    prepare_text,
    too_short_result,
    validate_prepared,
    validate_text,
    METHOD,
};
pub use entropy::{estimate_entropy, EntropyEstimate};
pub use error::{DetectError, DetectResult};
pub use patterns::{scan_patterns, CategorySpec, PatternScan, CATEGORY_TABLE};
pub use scoring::{aggregate_score, ScoreBreakdown};
pub use sentence_classifier::{classify_sentence, classify_sentences};
pub use verdict::{confidence_for, confidence_for_score, formality_for, verdict_for};
