// Pattern Scanner
// Declarative category table and the scanner that tallies it.
//
// Every stylistic signal the aggregator folds over is one row of CATEGORY_TABLE:
// a matcher, a polarity, a per-match weight and the gates that must hold before
// the category is allowed to move the score.

use crate::models::PatternCategory;
use crate::services::text_processor::{split_sentences, split_words};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// No single category may move the score by more than this many points.
pub const CATEGORY_CAP: f64 = 45.0;

pub type PatternCounts = BTreeMap<PatternCategory, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Pushes the AI likelihood up.
    Ai,
    /// Pushes the AI likelihood down.
    Human,
}

impl Polarity {
    pub fn sign(self) -> f64 {
        match self {
            Self::Ai => 1.0,
            Self::Human => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Case-insensitive whole-word alternatives (regex fragments).
    Phrases(&'static [&'static str]),
    /// Consecutive sentences of more than three words opening with the same word.
    RepeatedOpenings,
    /// Lines starting with a bullet or an ordinal such as `1.`.
    ListItems,
}

/// All gates of a category must hold for it to contribute.
#[derive(Debug, Clone, Copy)]
pub enum Gate {
    /// Matches must exceed this fraction of the word count. Both sides are taken over
    /// impersonal sentences only, so personal-voice sentences neither dilute nor feed it.
    Density(f64),
    MinMatches(usize),
    MinWords(usize),
    /// No personal-voice category matched anywhere in the text.
    NeutralVoice,
    /// The given category matched at least once.
    Requires(PatternCategory),
    /// The given category did not match at all.
    Excludes(PatternCategory),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contribution {
    /// `matches * weight`
    PerMatch,
    /// `weight` once, however many matches.
    Flat,
}

#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub category: PatternCategory,
    pub polarity: Polarity,
    pub weight: f64,
    pub contribution: Contribution,
    pub matcher: Matcher,
    pub gates: &'static [Gate],
}

impl CategorySpec {
    pub fn is_density_gated(&self) -> bool {
        self.gates.iter().any(|gate| matches!(gate, Gate::Density(_)))
    }
}

pub const CATEGORY_TABLE: &[CategorySpec] = &[
    CategorySpec {
        category: PatternCategory::AiTransitionMarkers,
        polarity: Polarity::Ai,
        weight: 15.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "it's important to note",
            "it is important to note",
            "it's worth noting",
            "it is worth noting",
            "it's crucial to understand",
            "in conclusion",
            "to summarize",
            "in summary",
            "furthermore",
            "moreover",
            "additionally",
            "consequently",
            "delve into",
            "dive deep",
            "explore in depth",
            "let's explore",
            "let's examine",
            "let's consider",
            "comprehensive",
            "multifaceted",
            "holistic approach",
            "it's essential to",
            "it's vital to",
            "it's critical to",
        ]),
        gates: &[],
    },
    CategorySpec {
        category: PatternCategory::GenericTemplate,
        polarity: Polarity::Ai,
        weight: 25.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "it is important to note",
            "in conclusion",
            "to summarize",
            "as mentioned",
            "as stated",
            "it should be noted",
            "it can be observed",
            "it is evident",
        ]),
        gates: &[],
    },
    CategorySpec {
        category: PatternCategory::EncyclopedicPhrasing,
        polarity: Polarity::Ai,
        weight: 20.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "founded in",
            "established in",
            "traces its roots",
            "split into",
            "focused on",
            "concentrates on",
            "including both",
            "emerging fields",
            "long-standing",
            "publicly traded",
            "original",
            "current form",
        ]),
        gates: &[],
    },
    CategorySpec {
        category: PatternCategory::ExplanatoryProductDescription,
        polarity: Polarity::Ai,
        weight: 25.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "are (?:compact )?appliances designed to",
            "are designed to",
            "there are several types of",
            r"when choosing an? \w+[, ]+you should consider",
            "look for features like",
            "especially useful during",
            "their main purpose is to",
        ]),
        gates: &[
            Gate::NeutralVoice,
            Gate::Excludes(PatternCategory::ResearchContext),
            Gate::MinWords(150),
        ],
    },
    CategorySpec {
        category: PatternCategory::CorporateFactual,
        polarity: Polarity::Ai,
        weight: 5.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "inc",
            "company",
            "corporation",
            "ltd",
            "american",
            "global",
            "pioneer",
            "decades",
            "enterprise",
            "business",
            "industry",
            "technology",
            "devices",
            "systems",
            "commercial",
        ]),
        gates: &[Gate::Density(0.05)],
    },
    CategorySpec {
        category: PatternCategory::AcademicJargon,
        polarity: Polarity::Ai,
        weight: 6.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "methodology",
            "paradigm",
            "framework",
            "infrastructure",
            "architecture",
            "systematic",
            "empirical",
            "theoretical",
            "conceptual",
            "analytical",
        ]),
        gates: &[Gate::Density(0.05)],
    },
    CategorySpec {
        category: PatternCategory::FormalConnectives,
        polarity: Polarity::Ai,
        weight: 4.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "therefore",
            "thus",
            "consequently",
            "furthermore",
            "moreover",
            "however",
            "nevertheless",
            "nonetheless",
            "comprehensive",
            "multifaceted",
            "holistic",
            "facilitate",
            "optimize",
            "utilize",
            "implement",
            "demonstrate",
            "establish",
            "significant",
            "substantial",
            "considerable",
        ]),
        gates: &[Gate::Density(0.08)],
    },
    CategorySpec {
        category: PatternCategory::RepetitiveOpenings,
        polarity: Polarity::Ai,
        weight: 15.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::RepeatedOpenings,
        gates: &[],
    },
    CategorySpec {
        category: PatternCategory::ListStructure,
        polarity: Polarity::Ai,
        weight: 25.0,
        contribution: Contribution::Flat,
        matcher: Matcher::ListItems,
        gates: &[Gate::MinMatches(3), Gate::NeutralVoice, Gate::MinWords(120)],
    },
    CategorySpec {
        category: PatternCategory::ResearchContext,
        polarity: Polarity::Human,
        weight: 4.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "research",
            "study",
            "analysis",
            "investigation",
            "examination",
            "assessment",
            "evaluation",
            "alignment",
            "governance",
            "management",
            "roles",
            "practices",
            "resources",
            "feedback",
            "guidance",
            "researcher",
            "professional",
            "institutional",
            "strategic",
            "operational",
            "feasible",
            "scholarly",
            "academic",
            "faculty",
            "timeframe",
            "semester",
        ]),
        gates: &[Gate::Density(0.10)],
    },
    CategorySpec {
        category: PatternCategory::AcademicStructure,
        polarity: Polarity::Human,
        weight: 3.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "first",
            "second",
            "third",
            "hence",
            "furthermore",
            "dimensions",
            "principal",
            "collectively",
            "verified",
            "confirmed",
            "accessible",
            "manageable",
            "satisfied",
        ]),
        gates: &[Gate::Requires(PatternCategory::ResearchContext)],
    },
    CategorySpec {
        category: PatternCategory::PersonalEmotional,
        polarity: Polarity::Human,
        weight: 20.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "i feel",
            "i think",
            "i believe",
            "my experience",
            "personally",
            "in my opinion",
            "i was",
            "i am",
            "i will",
            "honestly",
            "frankly",
            "obviously",
            "clearly",
            "definitely",
        ]),
        gates: &[],
    },
    CategorySpec {
        category: PatternCategory::InformalContractions,
        polarity: Polarity::Human,
        weight: 12.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "don't", "won't", "can't", "isn't", "aren't", "wasn't", "weren't", "haven't",
            "hasn't", "hadn't", "wouldn't", "couldn't", "shouldn't", "didn't", "doesn't",
            "i'm", "i've", "i'd", "i'll", "yeah", "yep", "nope", "gonna", "wanna", "gotta",
            "kinda", "sorta",
        ]),
        gates: &[],
    },
    CategorySpec {
        category: PatternCategory::FirstPersonVoice,
        polarity: Polarity::Human,
        weight: 6.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&["i", "me", "my", "mine", "myself", "we", "us", "our", "ours"]),
        gates: &[],
    },
    CategorySpec {
        category: PatternCategory::EmotiveHedging,
        polarity: Polarity::Human,
        weight: 8.0,
        contribution: Contribution::PerMatch,
        matcher: Matcher::Phrases(&[
            "amazing",
            "awesome",
            "terrible",
            "horrible",
            "fantastic",
            "wonderful",
            "awful",
            "maybe",
            "perhaps",
            "possibly",
            "probably",
            "might",
            "could be",
        ]),
        gates: &[],
    },
];

fn phrase_regex(phrases: &[&str]) -> Regex {
    let pattern = format!(r"(?i)\b(?:{})\b", phrases.join("|"));
    Regex::new(&pattern).expect("pattern table regex")
}

/// Phrase regexes compiled once, indexed like CATEGORY_TABLE.
fn compiled_table() -> &'static [Option<Regex>] {
    static RES: OnceLock<Vec<Option<Regex>>> = OnceLock::new();
    RES.get_or_init(|| {
        CATEGORY_TABLE
            .iter()
            .map(|spec| match spec.matcher {
                Matcher::Phrases(phrases) => Some(phrase_regex(phrases)),
                Matcher::RepeatedOpenings | Matcher::ListItems => None,
            })
            .collect()
    })
}

fn list_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(?:\d+[.)]|[-*\u{2022}])[ \t]+").expect("list item regex")
    })
}

/// Count adjacent sentence pairs that open with the same word.
pub fn count_repeated_openings(text: &str) -> usize {
    let sentences = split_sentences(text);
    sentences
        .windows(2)
        .filter(|pair| {
            let a = split_words(pair[0]);
            let b = split_words(pair[1]);
            a.len() > 3 && b.len() > 3 && a[0].to_lowercase() == b[0].to_lowercase()
        })
        .count()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTally {
    pub category: PatternCategory,
    pub polarity: Polarity,
    pub matches: usize,
    pub active: bool,
    /// Signed and capped score contribution; zero when inactive.
    pub contribution: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternScan {
    pub tallies: Vec<CategoryTally>,
}

impl PatternScan {
    fn tally(&self, category: PatternCategory) -> Option<&CategoryTally> {
        self.tallies.iter().find(|t| t.category == category)
    }

    pub fn count(&self, category: PatternCategory) -> usize {
        self.tally(category).map_or(0, |t| t.matches)
    }

    pub fn is_active(&self, category: PatternCategory) -> bool {
        self.tally(category).is_some_and(|t| t.active)
    }

    pub fn counts(&self) -> PatternCounts {
        self.tallies.iter().map(|t| (t.category, t.matches)).collect()
    }

    pub fn active_categories(&self) -> Vec<PatternCategory> {
        self.tallies
            .iter()
            .filter(|t| t.active)
            .map(|t| t.category)
            .collect()
    }

    pub fn matches_with_polarity(&self, polarity: Polarity) -> usize {
        self.tallies
            .iter()
            .filter(|t| t.polarity == polarity)
            .map(|t| t.matches)
            .sum()
    }

    pub fn personal_voice_matches(&self) -> usize {
        self.tallies
            .iter()
            .filter(|t| t.category.is_personal_voice())
            .map(|t| t.matches)
            .sum()
    }

    /// Explicit AI phrasing: transition markers plus template phrases.
    pub fn ai_marker_count(&self) -> usize {
        self.count(PatternCategory::AiTransitionMarkers) + self.count(PatternCategory::GenericTemplate)
    }
}

/// Sentences carrying no personal-voice match. Density-gated categories describe the
/// impersonal register of a text and are measured over these alone.
struct ImpersonalRegister<'a> {
    sentences: Vec<&'a str>,
    word_count: usize,
}

impl<'a> ImpersonalRegister<'a> {
    fn of(text: &'a str, compiled: &[Option<Regex>]) -> Self {
        let voice_res: Vec<&Regex> = CATEGORY_TABLE
            .iter()
            .zip(compiled.iter())
            .filter(|(spec, _)| spec.category.is_personal_voice())
            .filter_map(|(_, re)| re.as_ref())
            .collect();

        let sentences: Vec<&str> = split_sentences(text)
            .into_iter()
            .filter(|sentence| !voice_res.iter().any(|re| re.is_match(sentence)))
            .collect();
        let word_count = sentences.iter().map(|s| split_words(s).len()).sum();

        Self {
            sentences,
            word_count,
        }
    }

    fn count(&self, re: &Regex) -> usize {
        self.sentences.iter().map(|s| re.find_iter(s).count()).sum()
    }
}

/// Scan `text` against every category. `word_count` feeds the minimum-length gates.
pub fn scan_patterns(text: &str, word_count: usize) -> PatternScan {
    let compiled = compiled_table();
    let register = ImpersonalRegister::of(text, compiled);

    // First pass: raw counts, since gates may reference other categories.
    let counts: Vec<usize> = CATEGORY_TABLE
        .iter()
        .zip(compiled.iter())
        .map(|(spec, re)| match (spec.matcher, re) {
            (Matcher::Phrases(_), Some(re)) if spec.is_density_gated() => register.count(re),
            (Matcher::Phrases(_), Some(re)) => re.find_iter(text).count(),
            (Matcher::RepeatedOpenings, _) => count_repeated_openings(text),
            (Matcher::ListItems, _) => list_item_re().find_iter(text).count(),
            (Matcher::Phrases(_), None) => 0,
        })
        .collect();

    let count_of = |category: PatternCategory| {
        CATEGORY_TABLE
            .iter()
            .position(|spec| spec.category == category)
            .map_or(0, |idx| counts[idx])
    };
    let voice_matches: usize = CATEGORY_TABLE
        .iter()
        .zip(counts.iter())
        .filter(|(spec, _)| spec.category.is_personal_voice())
        .map(|(_, n)| *n)
        .sum();

    let tallies = CATEGORY_TABLE
        .iter()
        .zip(counts.iter())
        .map(|(spec, &matches)| {
            let active = matches > 0
                && spec.gates.iter().all(|gate| match *gate {
                    Gate::Density(fraction) => {
                        matches as f64 > register.word_count as f64 * fraction
                    }
                    Gate::MinMatches(min) => matches >= min,
                    Gate::MinWords(min) => word_count >= min,
                    Gate::NeutralVoice => voice_matches == 0,
                    Gate::Requires(other) => count_of(other) > 0,
                    Gate::Excludes(other) => count_of(other) == 0,
                });

            let contribution = if active {
                let raw = match spec.contribution {
                    Contribution::PerMatch => matches as f64 * spec.weight,
                    Contribution::Flat => spec.weight,
                };
                spec.polarity.sign() * raw.min(CATEGORY_CAP)
            } else {
                0.0
            };

            CategoryTally {
                category: spec.category,
                polarity: spec.polarity,
                matches,
                active,
                contribution,
            }
        })
        .collect();

    PatternScan { tallies }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> PatternScan {
        scan_patterns(text, split_words(text).len())
    }

    #[test]
    fn test_table_covers_every_category_once() {
        let mut seen: Vec<PatternCategory> = CATEGORY_TABLE.iter().map(|s| s.category).collect();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total);
        assert_eq!(compiled_table().len(), total);
    }

    #[test]
    fn test_phrases_match_case_insensitively_on_word_boundaries() {
        let result = scan("Moreover, the FURTHERMORE clause matters. Furthermoreish is not a word.");
        assert_eq!(result.count(PatternCategory::AiTransitionMarkers), 2);
    }

    #[test]
    fn test_human_categories_have_negative_contribution() {
        let result = scan("Honestly I think we don't need it, maybe.");
        assert!(result.count(PatternCategory::PersonalEmotional) >= 2);
        assert!(result.count(PatternCategory::InformalContractions) == 1);
        for tally in &result.tallies {
            if tally.polarity == Polarity::Human {
                assert!(tally.contribution <= 0.0);
            }
        }
        assert!(result.personal_voice_matches() > 0);
    }

    #[test]
    fn test_density_gate_blocks_sparse_jargon() {
        // one jargon word in a long text stays below the 5% gate
        let filler = "the students planted tomatoes in the garden ".repeat(5);
        let text = format!("{} using a simple framework", filler);
        let result = scan(&text);
        assert_eq!(result.count(PatternCategory::AcademicJargon), 1);
        assert!(!result.is_active(PatternCategory::AcademicJargon));

        let dense = "methodology framework paradigm empirical analysis of the data";
        let result = scan(dense);
        assert!(result.is_active(PatternCategory::AcademicJargon));
    }

    #[test]
    fn test_density_ignores_personal_voice_sentences() {
        let report = "The study reviews governance and feedback practices.";
        assert!(scan(report).is_active(PatternCategory::ResearchContext));

        let padded = format!(
            "{} I spent the whole weekend reading it on the porch with my dog and a pot of coffee.",
            report
        );
        let result = scan(&padded);
        assert_eq!(result.count(PatternCategory::ResearchContext), 4);
        assert!(result.is_active(PatternCategory::ResearchContext));

        // jargon inside a personal sentence never reaches the density gate
        let voiced = scan("My framework and methodology felt like a paradigm shift to me.");
        assert_eq!(voiced.count(PatternCategory::AcademicJargon), 0);
        assert!(!voiced.is_active(PatternCategory::AcademicJargon));
    }

    #[test]
    fn test_contribution_is_capped() {
        let text = "founded in ".repeat(10);
        let result = scan(&text);
        let tally = result
            .tallies
            .iter()
            .find(|t| t.category == PatternCategory::EncyclopedicPhrasing)
            .unwrap();
        assert_eq!(tally.matches, 10);
        assert_eq!(tally.contribution, CATEGORY_CAP);
    }

    #[test]
    fn test_academic_structure_requires_research_context() {
        let without = scan("First we mixed the paint. Second we waited a day.");
        assert!(!without.is_active(PatternCategory::AcademicStructure));

        let with = scan("First the study reviews the data. Second it compares results.");
        assert!(with.is_active(PatternCategory::AcademicStructure));
    }

    #[test]
    fn test_repeated_openings() {
        let text = "The system loads the data quickly. The system then writes a report. A user reads it later today.";
        assert_eq!(count_repeated_openings(text), 1);
        assert_eq!(count_repeated_openings("Short one. Short two."), 0);
    }

    #[test]
    fn test_list_structure_is_flat_and_voice_gated() {
        let items = "- energy efficient heating element\n- adjustable thermostat control\n- automatic safety shutoff\n- quiet fan operation\n";
        let body = "Portable heaters provide warmth in rooms that central heating misses. ".repeat(12);
        let text = format!("{}\n{}", body, items);
        let result = scan(&text);
        assert_eq!(result.count(PatternCategory::ListStructure), 4);
        let tally = result
            .tallies
            .iter()
            .find(|t| t.category == PatternCategory::ListStructure)
            .unwrap();
        assert!(tally.active);
        assert_eq!(tally.contribution, 25.0);

        let personal = format!("{}I love mine.\n{}", body, items);
        assert!(!scan(&personal).is_active(PatternCategory::ListStructure));
    }
}
