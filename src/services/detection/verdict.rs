// Verdict Classification
// Confidence buckets, the verdict ladder and the formality bucket

use super::patterns::PatternScan;
use crate::models::{Confidence, FormalityLevel, PatternCategory};

pub const VERDICT_HIGHLY_AI: &str = "Highly likely AI-generated content";
pub const VERDICT_LIKELY_AI: &str = "Likely AI-generated content";
pub const VERDICT_MIXED: &str = "Mixed or uncertain - may contain AI assistance";
pub const VERDICT_LIKELY_HUMAN: &str = "Likely human-written content";
pub const VERDICT_HIGHLY_HUMAN: &str = "Highly likely human-written content";

/// Ladder of (lower bound, message), highest first.
const VERDICT_LADDER: [(u8, &str); 4] = [
    (85, VERDICT_HIGHLY_AI),
    (70, VERDICT_LIKELY_AI),
    (30, VERDICT_MIXED),
    (15, VERDICT_LIKELY_HUMAN),
];

pub fn verdict_for(ai_likelihood: u8) -> &'static str {
    VERDICT_LADDER
        .iter()
        .find(|(min, _)| ai_likelihood >= *min)
        .map_or(VERDICT_HIGHLY_HUMAN, |&(_, msg)| msg)
}

fn is_outer_decile(ai_likelihood: u8) -> bool {
    ai_likelihood < 15 || ai_likelihood > 85
}

fn is_outer_quartile(ai_likelihood: u8) -> bool {
    ai_likelihood < 25 || ai_likelihood > 75
}

/// Confidence from text length and score extremity. Short texts are never better than low.
pub fn confidence_for(ai_likelihood: u8, word_count: usize) -> Confidence {
    if word_count < 100 {
        Confidence::Low
    } else if word_count > 300 && is_outer_decile(ai_likelihood) {
        Confidence::High
    } else if word_count > 150 && is_outer_quartile(ai_likelihood) {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Confidence when only the score is known (stored results without a word count).
pub fn confidence_for_score(ai_likelihood: u8) -> Confidence {
    if is_outer_decile(ai_likelihood) {
        Confidence::High
    } else if is_outer_quartile(ai_likelihood) {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

pub fn formality_for(scan: &PatternScan) -> FormalityLevel {
    if scan.is_active(PatternCategory::ResearchContext) {
        return FormalityLevel::Academic;
    }

    let formal = scan.ai_marker_count()
        + scan.count(PatternCategory::FormalConnectives)
        + scan.count(PatternCategory::AcademicJargon);
    let informal = scan.count(PatternCategory::InformalContractions)
        + scan.count(PatternCategory::PersonalEmotional)
        + scan.count(PatternCategory::EmotiveHedging);

    if formal > informal && formal > 2 {
        FormalityLevel::Formal
    } else if informal > formal {
        FormalityLevel::Informal
    } else {
        FormalityLevel::Moderate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::detection::patterns::scan_patterns;
    use crate::services::text_processor::split_words;

    #[test]
    fn test_verdict_ladder_boundaries() {
        assert_eq!(verdict_for(0), VERDICT_HIGHLY_HUMAN);
        assert_eq!(verdict_for(14), VERDICT_HIGHLY_HUMAN);
        assert_eq!(verdict_for(15), VERDICT_LIKELY_HUMAN);
        assert_eq!(verdict_for(29), VERDICT_LIKELY_HUMAN);
        assert_eq!(verdict_for(30), VERDICT_MIXED);
        assert_eq!(verdict_for(69), VERDICT_MIXED);
        assert_eq!(verdict_for(70), VERDICT_LIKELY_AI);
        assert_eq!(verdict_for(84), VERDICT_LIKELY_AI);
        assert_eq!(verdict_for(85), VERDICT_HIGHLY_AI);
        assert_eq!(verdict_for(100), VERDICT_HIGHLY_AI);
    }

    #[test]
    fn test_short_texts_are_low_confidence() {
        for score in [0, 10, 50, 90, 100] {
            assert_eq!(confidence_for(score, 99), Confidence::Low);
        }
    }

    #[test]
    fn test_confidence_grows_with_length_and_extremity() {
        assert_eq!(confidence_for(5, 301), Confidence::High);
        assert_eq!(confidence_for(5, 200), Confidence::Medium);
        assert_eq!(confidence_for(20, 400), Confidence::Medium);
        assert_eq!(confidence_for(50, 400), Confidence::Low);
        assert_eq!(confidence_for(85, 400), Confidence::Medium);
        assert_eq!(confidence_for(5, 120), Confidence::Low);
    }

    #[test]
    fn test_confidence_from_score_alone() {
        assert_eq!(confidence_for_score(3), Confidence::High);
        assert_eq!(confidence_for_score(80), Confidence::Medium);
        assert_eq!(confidence_for_score(50), Confidence::Low);
    }

    #[test]
    fn test_formality_buckets() {
        let scan_of = |text: &str| scan_patterns(text, split_words(text).len());

        let academic = scan_of("The research study uses analysis and assessment of faculty feedback.");
        assert_eq!(formality_for(&academic), FormalityLevel::Academic);

        let formal = scan_of("Furthermore the plan is comprehensive. Moreover, it is therefore sound.");
        assert_eq!(formality_for(&formal), FormalityLevel::Formal);

        let informal = scan_of("Honestly I don't know, maybe we'll see.");
        assert_eq!(formality_for(&informal), FormalityLevel::Informal);

        let moderate = scan_of("The bus arrived late on Tuesday.");
        assert_eq!(formality_for(&moderate), FormalityLevel::Moderate);
    }
}
