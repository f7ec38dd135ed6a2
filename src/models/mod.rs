// DraftScope Data Models
// Request/response shapes shared by the detector, the HTTP API and the CLI

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============ Requests ============

/// Body of `POST /detect`: the submission text and an optional earlier draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    pub text: String,
    #[serde(default)]
    pub previous_text: Option<String>,
}

impl AnalysisInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            previous_text: None,
        }
    }

    pub fn with_previous(text: impl Into<String>, previous_text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            previous_text: Some(previous_text.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceDetectRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDetectRequest {
    pub texts: Vec<String>,
}

// ============ Enumerations ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormalityLevel {
    Informal,
    #[default]
    Moderate,
    Formal,
    Academic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentenceType {
    Ai,
    Human,
    Unknown,
}

/// Named pattern families counted by the scanner. Polarity and weight live in the
/// category table in `services::detection::patterns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    AiTransitionMarkers,
    GenericTemplate,
    EncyclopedicPhrasing,
    ExplanatoryProductDescription,
    CorporateFactual,
    AcademicJargon,
    FormalConnectives,
    RepetitiveOpenings,
    ListStructure,
    ResearchContext,
    AcademicStructure,
    PersonalEmotional,
    InformalContractions,
    FirstPersonVoice,
    EmotiveHedging,
}

impl PatternCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AiTransitionMarkers => "ai_transition_markers",
            Self::GenericTemplate => "generic_template",
            Self::EncyclopedicPhrasing => "encyclopedic_phrasing",
            Self::ExplanatoryProductDescription => "explanatory_product_description",
            Self::CorporateFactual => "corporate_factual",
            Self::AcademicJargon => "academic_jargon",
            Self::FormalConnectives => "formal_connectives",
            Self::RepetitiveOpenings => "repetitive_openings",
            Self::ListStructure => "list_structure",
            Self::ResearchContext => "research_context",
            Self::AcademicStructure => "academic_structure",
            Self::PersonalEmotional => "personal_emotional",
            Self::InformalContractions => "informal_contractions",
            Self::FirstPersonVoice => "first_person_voice",
            Self::EmotiveHedging => "emotive_hedging",
        }
    }

    /// Categories that indicate the writer's own voice.
    pub fn is_personal_voice(&self) -> bool {
        matches!(
            self,
            Self::PersonalEmotional
                | Self::InformalContractions
                | Self::FirstPersonVoice
                | Self::EmotiveHedging
        )
    }
}

// ============ Detection Result ============

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f64,
    /// Unique-word ratio, 0-1.
    pub vocabulary_richness: f64,
    /// Coefficient of variation of sentence lengths, clamped to 0-1.
    pub sentence_variation: f64,
    pub formality_level: FormalityLevel,
    #[serde(rename = "hasAIMarkers")]
    pub has_ai_markers: bool,
    pub has_personal_touch: bool,
}

/// Intermediate values kept for transparency; snake_case on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RawMetrics {
    /// Frequency-entropy proxy, not a language-model perplexity.
    pub perplexity_score: f64,
    pub entropy: f64,
    pub normalized_entropy: f64,
    pub ai_patterns: usize,
    pub human_patterns: usize,
    pub structure_consistency: f64,
    pub structure_variation: f64,
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f64,
    #[serde(default)]
    pub pattern_counts: BTreeMap<PatternCategory, usize>,
    #[serde(default)]
    pub active_categories: Vec<PatternCategory>,
    #[serde(default)]
    pub adjustments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub words_added: usize,
    pub words_removed: usize,
    /// Signed change in word count relative to the draft, in percent.
    pub percentage_change: f64,
    pub significantly_modified: bool,
    pub draft_ai_likelihood: u8,
    /// Final minus draft AI likelihood.
    pub ai_likelihood_delta: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub ai_likelihood: u8,
    pub human_likelihood: u8,
    pub confidence: Confidence,
    pub verdict: String,
    /// `ai_likelihood / 100`.
    pub score: f64,
    #[serde(flatten)]
    pub metrics: TextMetrics,
    pub ai_marker_count: usize,
    #[serde(rename = "raw_metrics")]
    pub raw_metrics: RawMetrics,
    pub method: String,
    #[serde(flatten)]
    pub comparison: Option<ComparisonResult>,
}

// ============ Sentence Detection ============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentenceAnalysis {
    pub text: String,
    pub ai_likelihood: u8,
    #[serde(rename = "type")]
    pub sentence_type: SentenceType,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentenceDetectionResponse {
    pub sentences: Vec<SentenceAnalysis>,
    pub ai_sentences: usize,
    pub human_sentences: usize,
    pub unknown_sentences: usize,
    pub total_sentences: usize,
}

// ============ Batch & Service ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDetectResponse {
    pub results: Vec<DetectionResult>,
    /// Wall-clock milliseconds spent on the whole batch.
    pub processing_time: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub method: &'static str,
}
