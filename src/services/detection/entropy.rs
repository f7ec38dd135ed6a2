// Information Estimator
// Word-frequency entropy and the perplexity-like proxy derived from it

use crate::services::text_processor::normalized_tokens;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct EntropyEstimate {
    /// Shannon entropy of the token distribution, in bits.
    pub entropy: f64,
    /// `entropy / log2(unique tokens)`, 0-1.
    pub normalized_entropy: f64,
    /// `(1 - normalized_entropy) * 100`. High means repetitive, predictable wording.
    pub perplexity_score: f64,
}

pub fn estimate_entropy(text: &str) -> EntropyEstimate {
    estimate_from_tokens(&normalized_tokens(text))
}

pub fn estimate_from_tokens<S: AsRef<str>>(tokens: &[S]) -> EntropyEstimate {
    if tokens.is_empty() {
        return EntropyEstimate::default();
    }

    let mut freq: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *freq.entry(token.as_ref()).or_insert(0) += 1;
    }

    let total = tokens.len() as f64;
    let entropy: f64 = freq
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    let max_entropy = if freq.len() > 1 {
        (freq.len() as f64).log2()
    } else {
        0.0
    };
    let normalized_entropy = if max_entropy > 0.0 {
        (entropy / max_entropy).clamp(0.0, 1.0)
    } else {
        0.0
    };

    EntropyEstimate {
        entropy,
        normalized_entropy,
        perplexity_score: (1.0 - normalized_entropy) * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_all_zero() {
        let est = estimate_entropy("  ... !!! ");
        assert_eq!(est, EntropyEstimate::default());
    }

    #[test]
    fn test_single_distinct_token() {
        let est = estimate_entropy("echo echo echo");
        assert_eq!(est.entropy, 0.0);
        assert_eq!(est.normalized_entropy, 0.0);
        assert_eq!(est.perplexity_score, 100.0);
    }

    #[test]
    fn test_uniform_distribution_is_maximal() {
        let est = estimate_entropy("alpha beta gamma delta");
        assert!((est.entropy - 2.0).abs() < 1e-9);
        assert!((est.normalized_entropy - 1.0).abs() < 1e-9);
        assert!(est.perplexity_score.abs() < 1e-9);
    }

    #[test]
    fn test_skewed_distribution_is_between_bounds() {
        let est = estimate_entropy("the the the the cat sat");
        assert!(est.normalized_entropy > 0.0 && est.normalized_entropy < 1.0);
        assert!(est.perplexity_score > 0.0 && est.perplexity_score < 100.0);
    }
}
