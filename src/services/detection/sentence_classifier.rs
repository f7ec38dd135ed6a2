// Sentence Classification
// Lightweight per-sentence pass reusing the pattern table

use super::patterns::scan_patterns;
use super::verdict::confidence_for_score;
use crate::models::{Confidence, SentenceAnalysis, SentenceDetectionResponse, SentenceType};
use crate::services::config_store::DetectionConfig;
use crate::services::text_processor::{segment_sentences, split_words};
use regex::Regex;
use std::sync::OnceLock;

const SENTENCE_BASELINE: f64 = 40.0;
/// Pattern contributions are damped on single sentences.
const PATTERN_SCALE: f64 = 0.6;
const UNSCORED_LIKELIHOOD: u8 = 50;

fn first_person_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:i|me|my|we|us|our)\b").expect("first person regex"))
}

fn casual_filler_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:like|kinda|sorta|lol|tbh|imo|actually|basically)\b")
            .expect("casual filler regex")
    })
}

pub fn sentence_likelihood(sentence: &str, word_count: usize) -> u8 {
    let mut score = SENTENCE_BASELINE;

    let scan = scan_patterns(sentence, word_count);
    score += scan.tallies.iter().map(|t| t.contribution).sum::<f64>() * PATTERN_SCALE;

    if word_count > 20 {
        score += 8.0;
    }
    if word_count > 30 {
        score += 12.0;
    }
    if !first_person_re().is_match(sentence) {
        score += 10.0;
    }
    if word_count > 15 && !casual_filler_re().is_match(sentence) {
        score += 8.0;
    }

    score.clamp(0.0, 100.0).round() as u8
}

pub fn classify_sentence(sentence: &str, config: &DetectionConfig) -> SentenceAnalysis {
    let word_count = split_words(sentence).len();

    if word_count < config.sentence_min_words {
        return SentenceAnalysis {
            text: sentence.to_string(),
            ai_likelihood: UNSCORED_LIKELIHOOD,
            sentence_type: SentenceType::Unknown,
            confidence: Confidence::Low,
        };
    }

    let ai_likelihood = sentence_likelihood(sentence, word_count);
    let sentence_type = if ai_likelihood > config.sentence_ai_threshold {
        SentenceType::Ai
    } else if ai_likelihood < config.sentence_human_threshold {
        SentenceType::Human
    } else {
        SentenceType::Unknown
    };

    SentenceAnalysis {
        text: sentence.to_string(),
        ai_likelihood,
        sentence_type,
        confidence: confidence_for_score(ai_likelihood),
    }
}

/// Segment `text` and label every sentence, preserving order.
pub fn classify_sentences(text: &str, config: &DetectionConfig) -> SentenceDetectionResponse {
    let sentences: Vec<SentenceAnalysis> = segment_sentences(text)
        .iter()
        .map(|s| classify_sentence(s, config))
        .collect();

    let count_of = |kind: SentenceType| sentences.iter().filter(|s| s.sentence_type == kind).count();
    let ai_sentences = count_of(SentenceType::Ai);
    let human_sentences = count_of(SentenceType::Human);
    let unknown_sentences = count_of(SentenceType::Unknown);

    SentenceDetectionResponse {
        total_sentences: sentences.len(),
        sentences,
        ai_sentences,
        human_sentences,
        unknown_sentences,
    }
}
