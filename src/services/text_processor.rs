// Text Processing Service
// Submission cleaning, tokenization and lexical metrics

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

fn space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\u{3000}\u{00A0}\u{2007}\u{202F}]").expect("space regex"))
}

fn horizontal_ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\x0C\x0B]+").expect("whitespace regex"))
}

fn sentence_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence break regex"))
}

fn sentence_boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([.!?。！？]+)\s+").expect("sentence boundary regex"))
}

/// Markup that never carries prose: tags, code, links, addresses, stray symbols.
fn markup_res() -> &'static [Regex; 6] {
    static RES: OnceLock<[Regex; 6]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            Regex::new(r"<[^>]*>").expect("html tag regex"),
            Regex::new(r"```[\s\S]*?```").expect("code fence regex"),
            Regex::new(r"`[^`]+`").expect("inline code regex"),
            Regex::new(r"https?://\S+").expect("url regex"),
            Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("email regex"),
            Regex::new(r"[{}\[\]<>/\\|@#$%^&*=+]").expect("symbol regex"),
        ]
    })
}

/// Normalize quotes, dashes and spacing without touching line structure
pub fn normalize_punctuation(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Smart quotes become ASCII so contraction patterns match
    let s = text
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{2014}', '\u{2013}'], "-");

    let s = space_re().replace_all(&s, " ");
    let s = s.replace("\r\n", "\n").replace('\r', "\n");
    let s = horizontal_ws_re().replace_all(&s, " ");

    s.lines()
        .map(|ln| ln.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Strip HTML, code, URLs and e-mail addresses from a submission, then normalize it.
/// Line breaks survive so list-structure detection still sees one item per line.
pub fn clean_submission_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut cleaned = text.to_string();
    for re in markup_res() {
        cleaned = re.replace_all(&cleaned, " ").into_owned();
    }

    normalize_punctuation(&cleaned)
}

/// Whitespace tokenization; empty tokens never appear.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Split on runs of `.!?`, dropping the punctuation and empty fragments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_break_re()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Display-oriented sentence segmentation: keeps terminal punctuation and only breaks
/// where punctuation is followed by whitespace, so decimals like 3.5 stay intact.
pub fn segment_sentences(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![];
    }

    let marked = sentence_boundary_re().replace_all(text, "$1\x00");
    marked
        .split('\x00')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lowercase a token and drop everything except letters, digits and underscores.
pub fn normalize_token(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalized tokens with punctuation-only tokens removed.
pub fn normalized_tokens(text: &str) -> Vec<String> {
    split_words(text)
        .into_iter()
        .map(normalize_token)
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LexicalMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f64,
    pub vocabulary_richness: f64,
    /// Standard deviation over mean of sentence lengths, clamped to 0-1.
    pub sentence_variation: f64,
    /// `1 - sentence_variation`; zero when there are no sentences.
    pub consistency: f64,
}

pub fn compute_lexical_metrics(text: &str) -> LexicalMetrics {
    let words = split_words(text);
    let sentences = split_sentences(text);
    let word_count = words.len();
    let sentence_count = sentences.len();

    if word_count == 0 {
        return LexicalMetrics {
            sentence_count,
            ..LexicalMetrics::default()
        };
    }

    let unique: HashSet<String> = words
        .iter()
        .map(|w| normalize_token(w))
        .filter(|t| !t.is_empty())
        .collect();

    let lengths: Vec<usize> = sentences.iter().map(|s| split_words(s).len()).collect();
    let sentence_variation = sentence_length_variation(&lengths);

    LexicalMetrics {
        word_count,
        sentence_count,
        avg_words_per_sentence: word_count as f64 / sentence_count.max(1) as f64,
        vocabulary_richness: unique.len() as f64 / word_count as f64,
        sentence_variation,
        consistency: if sentence_count == 0 {
            0.0
        } else {
            1.0 - sentence_variation
        },
    }
}

/// Population coefficient of variation of sentence lengths, clamped to [0, 1].
pub fn sentence_length_variation(lengths: &[usize]) -> f64 {
    if lengths.is_empty() {
        return 0.0;
    }

    let n = lengths.len() as f64;
    let mean = lengths.iter().sum::<usize>() as f64 / n;
    if mean <= 0.0 {
        return 0.0;
    }

    let variance = lengths
        .iter()
        .map(|&l| (l as f64 - mean).powi(2))
        .sum::<f64>()
        / n;

    (variance.sqrt() / mean).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_punctuation() {
        let input = "I don\u{2019}t  know\u{00A0}\u{201c}why\u{201d}\r\nNext";
        let output = normalize_punctuation(input);
        assert_eq!(output, "I don't know \"why\"\nNext");
    }

    #[test]
    fn test_clean_submission_text_strips_markup_but_keeps_lines() {
        let input = "<p>Intro text</p>\n- first item see https://example.com\n- mail me@school.edu\n```let x = 1;```";
        let cleaned = clean_submission_text(input);
        assert!(!cleaned.contains('<'));
        assert!(!cleaned.contains("https"));
        assert!(!cleaned.contains("school.edu"));
        assert!(!cleaned.contains("let x"));
        assert_eq!(cleaned.lines().count(), 3);
        assert!(cleaned.lines().nth(1).unwrap().starts_with("- first item"));
    }

    #[test]
    fn test_split_sentences_drops_punctuation_runs() {
        let sentences = split_sentences("Wait... what?! Fine. ");
        assert_eq!(sentences, vec!["Wait", "what", "Fine"]);
        assert!(split_sentences("?!...").is_empty());
    }

    #[test]
    fn test_segment_sentences_keeps_terminal_punctuation() {
        let sentences = segment_sentences("It costs 3.5 dollars. Really? Yes!");
        assert_eq!(sentences, vec!["It costs 3.5 dollars.", "Really?", "Yes!"]);
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("Don't!"), "dont");
        assert_eq!(normalize_token("(Study)"), "study");
        assert_eq!(normalize_token("..."), "");
    }

    #[test]
    fn test_lexical_metrics_basic_counts() {
        let metrics = compute_lexical_metrics("The cat sat. The cat ran away quickly.");
        assert_eq!(metrics.word_count, 8);
        assert_eq!(metrics.sentence_count, 2);
        assert!((metrics.avg_words_per_sentence - 4.0).abs() < 1e-9);
        // the, cat, sat, ran, away, quickly
        assert!((metrics.vocabulary_richness - 6.0 / 8.0).abs() < 1e-9);
        // lengths 3 and 5: mean 4, std 1
        assert!((metrics.sentence_variation - 0.25).abs() < 1e-9);
        assert!((metrics.consistency - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_lexical_metrics_degenerate_input_is_finite() {
        for text in ["", "   ", "!!! ??? ...", "word"] {
            let m = compute_lexical_metrics(text);
            assert!(m.avg_words_per_sentence.is_finite());
            assert!(m.vocabulary_richness.is_finite());
            assert!(m.sentence_variation.is_finite());
            assert!((0.0..=1.0).contains(&m.vocabulary_richness));
        }
        let punct = compute_lexical_metrics("!!! ??? ...");
        assert_eq!(punct.sentence_count, 0);
        assert_eq!(punct.vocabulary_richness, 0.0);
    }

    #[test]
    fn test_sentence_length_variation_is_clamped() {
        assert_eq!(sentence_length_variation(&[]), 0.0);
        assert_eq!(sentence_length_variation(&[7, 7, 7]), 0.0);
        assert!(sentence_length_variation(&[1, 1, 1, 1, 60]) <= 1.0);
    }
}
