use anyhow::Context;
use draftscope_lib::models::{AnalysisInput, SentenceType};
use draftscope_lib::services::config_store::DetectionConfig;
use draftscope_lib::services::detection::{classify_sentences, detect, prepare_text};

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn read_text(path: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read file failed: {}", path))
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  cargo run --bin analyze_file -- <path.txt> [--draft <draft.txt>] [--sentences] [--out <json_path>]\n\nNotes:\n  - `--draft` adds the draft/final comparison.\n  - `--sentences` prints a label for every sentence."
        );
        return Ok(());
    }

    let path = args[1].clone();
    let draft_path = parse_arg_value(&args, "--draft");
    let show_sentences = has_flag(&args, "--sentences");
    let out_path = parse_arg_value(&args, "--out");

    let config = DetectionConfig::default();
    let text = read_text(&path)?;
    let input = match &draft_path {
        Some(p) => AnalysisInput::with_previous(text, read_text(p)?),
        None => AnalysisInput::new(text),
    };

    let result = detect(&input, &config).context("text rejected")?;

    println!("File: {}", path);
    println!(
        "Words: {}  Sentences: {}",
        result.metrics.word_count, result.metrics.sentence_count
    );
    println!(
        "AI likelihood: {}%  (confidence: {})",
        result.ai_likelihood,
        result.confidence.as_str()
    );
    println!("Verdict: {}", result.verdict);
    for adjustment in &result.raw_metrics.adjustments {
        println!("  {}", adjustment);
    }

    if let Some(cmp) = &result.comparison {
        println!(
            "Draft: +{} / -{} words ({:+.2}%), draft AI {}% (delta {:+}), significantly modified: {}",
            cmp.words_added,
            cmp.words_removed,
            cmp.percentage_change,
            cmp.draft_ai_likelihood,
            cmp.ai_likelihood_delta,
            cmp.significantly_modified
        );
    }

    if show_sentences {
        let prepared = prepare_text(&input.text, &config);
        let sentences = classify_sentences(&prepared, &config);
        println!(
            "Sentences: {} ai / {} human / {} unknown",
            sentences.ai_sentences, sentences.human_sentences, sentences.unknown_sentences
        );
        for (i, s) in sentences.sentences.iter().enumerate() {
            let tag = match s.sentence_type {
                SentenceType::Ai => "AI ",
                SentenceType::Human => "HUM",
                SentenceType::Unknown => "?? ",
            };
            println!("{:>3}. [{}] {:>3}% {}", i + 1, tag, s.ai_likelihood, preview(&s.text, 80));
        }
    }

    if let Some(out) = out_path {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(&out, json).with_context(|| format!("write output failed: {}", out))?;
        println!("Wrote: {}", out);
    }

    Ok(())
}
