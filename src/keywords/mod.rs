//! Keyword analyzer
//!
//! Computes density, critical placements, stuffing risk, a per-section
//! occurrence heatmap, topic clusters, and related-term coverage for a
//! target keyword set. Counting runs over the same tokenizer as the
//! readability analyzer so densities and word counts line up across
//! components. Two analyses of byte-identical input always produce
//! byte-identical profiles.

mod cluster;

pub use cluster::cluster_sections;

use crate::document::Document;
use crate::models::{
    CriticalPlacements, Issue, KeywordProfile, KeywordStats, SectionHeat, Severity, StuffingRisk,
};
use crate::text;
use std::collections::BTreeMap;
use tracing::debug;

/// Stop words excluded from clustering and related-term extraction
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with", "you", "your", "this", "their",
    "but", "or", "not", "can", "have", "all", "when", "there", "been", "if", "more", "so", "about",
    "what", "which", "who", "would", "could",
];

pub(crate) fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Analyze a document against a primary keyword and any secondaries.
pub fn analyze(doc: &Document, primary: &str, secondary: &[String]) -> KeywordProfile {
    let plain = doc.plain_text();
    let structure = doc.structure();

    let tokens: Vec<String> = text::words(&plain)
        .iter()
        .map(|w| text::normalize_token(w))
        .filter(|t| !t.is_empty())
        .collect();
    let word_count = tokens.len();

    let primary_stats = keyword_stats(doc, &plain, &tokens, &structure, primary);
    let secondary_stats: Vec<KeywordStats> = secondary
        .iter()
        .map(|kw| keyword_stats(doc, &plain, &tokens, &structure, kw))
        .collect();

    let stuffing_issues = stuffing_issues(&plain, primary, primary_stats.density);
    let heatmap = heatmap(&structure, primary);
    let clusters = cluster_sections(&structure);
    let related_terms = related_terms(&plain, &tokens, primary);

    debug!(
        keyword = primary,
        occurrences = primary_stats.occurrences,
        density = primary_stats.density,
        clusters = clusters.len(),
        "keyword analysis complete"
    );

    KeywordProfile {
        word_count,
        primary: primary_stats,
        secondary: secondary_stats,
        stuffing_issues,
        clusters,
        heatmap,
        related_terms,
    }
}

/// Count non-overlapping occurrences of a keyword phrase in a token
/// sequence. Case-insensitive, punctuation-stripped on both sides.
pub fn phrase_occurrences(tokens: &[String], keyword: &str) -> usize {
    let phrase: Vec<String> = keyword
        .split_whitespace()
        .map(text::normalize_token)
        .filter(|t| !t.is_empty())
        .collect();
    if phrase.is_empty() || tokens.len() < phrase.len() {
        return 0;
    }

    let mut count = 0;
    let mut i = 0;
    while i + phrase.len() <= tokens.len() {
        if tokens[i..i + phrase.len()] == phrase[..] {
            count += 1;
            i += phrase.len();
        } else {
            i += 1;
        }
    }
    count
}

fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    haystack.to_lowercase().contains(&keyword.to_lowercase())
}

fn keyword_stats(
    doc: &Document,
    plain: &str,
    tokens: &[String],
    structure: &crate::document::Structure,
    keyword: &str,
) -> KeywordStats {
    let occurrences = phrase_occurrences(tokens, keyword);
    let density = if tokens.is_empty() {
        0.0
    } else {
        round2(occurrences as f64 / tokens.len() as f64 * 100.0)
    };

    let first_100 = tokens
        .iter()
        .take(100)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    let closing = text::paragraphs(plain).last().copied().unwrap_or("");

    let placements = CriticalPlacements {
        in_title: doc
            .meta_title
            .as_deref()
            .is_some_and(|t| contains_keyword(t, keyword)),
        in_meta_description: doc
            .meta_description
            .as_deref()
            .is_some_and(|d| contains_keyword(d, keyword)),
        in_first_100_words: contains_keyword(&first_100, keyword),
        in_heading: structure.headings().any(|h| contains_keyword(h, keyword)),
        in_closing: contains_keyword(closing, keyword),
    };

    let heading_matches = structure
        .h2_texts
        .iter()
        .filter(|h| contains_keyword(h, keyword))
        .count();

    KeywordStats {
        keyword: keyword.to_string(),
        occurrences,
        density,
        placements,
        stuffing: StuffingRisk::from_density(density),
        heading_matches,
        heading_count: structure.h2_count(),
    }
}

/// Stuffing escalation beyond the density bands: clustered occurrences
/// in one paragraph and runs of consecutive keyword-bearing sentences.
fn stuffing_issues(plain: &str, keyword: &str, density: f64) -> Vec<Issue> {
    let mut issues = Vec::new();

    if density > 3.0 {
        issues.push(
            Issue::new(
                "keyword-density-high",
                Severity::Warning,
                format!("keyword density {density}% is over the 3% stuffing threshold"),
            )
            .with_fix("remove some occurrences or replace them with variations")
            .with_value(density),
        );
    }

    for (i, para) in text::paragraphs(plain).iter().enumerate() {
        let para_tokens: Vec<String> = text::words(para)
            .iter()
            .map(|w| text::normalize_token(w))
            .filter(|t| !t.is_empty())
            .collect();
        // Heading lines and stub paragraphs are too short for a
        // meaningful density figure
        if para_tokens.len() < 15 {
            continue;
        }
        let para_density = phrase_occurrences(&para_tokens, keyword) as f64
            / para_tokens.len() as f64
            * 100.0;
        if para_density > 5.0 {
            issues.push(
                Issue::new(
                    "keyword-paragraph-density",
                    Severity::Warning,
                    format!(
                        "paragraph {} has very high keyword density ({:.1}%)",
                        i + 1,
                        para_density
                    ),
                )
                .with_fix("spread keyword mentions across more of the document")
                .with_value(round2(para_density)),
            );
        }
    }

    let mut run = 0usize;
    let mut max_run = 0usize;
    for sentence in text::sentences(plain) {
        if contains_keyword(sentence, keyword) {
            run += 1;
            max_run = max_run.max(run);
        } else {
            run = 0;
        }
    }
    if max_run >= 3 {
        let severity = if max_run >= 5 {
            Severity::Warning
        } else {
            Severity::Suggestion
        };
        issues.push(
            Issue::new(
                "keyword-consecutive-sentences",
                severity,
                format!("keyword appears in {max_run} consecutive sentences"),
            )
            .with_fix("vary phrasing so the keyword is not repeated sentence after sentence")
            .with_value(max_run as u64),
        );
    }

    issues
}

/// Per-section keyword occurrence map, for reporting only.
fn heatmap(structure: &crate::document::Structure, keyword: &str) -> Vec<SectionHeat> {
    structure
        .sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let section_text = section.text();
            let tokens: Vec<String> = text::words(&section_text)
                .iter()
                .map(|w| text::normalize_token(w))
                .filter(|t| !t.is_empty())
                .collect();
            let occurrences = phrase_occurrences(&tokens, keyword);
            let density = if tokens.is_empty() {
                0.0
            } else {
                round2(occurrences as f64 / tokens.len() as f64 * 100.0)
            };
            let heat = match density {
                d if d == 0.0 => 0,
                d if d < 0.5 => 1,
                d if d < 1.0 => 2,
                d if d < 2.0 => 3,
                d if d <= 3.0 => 4,
                _ => 5,
            };
            SectionHeat {
                section: i,
                heading: section.heading.chars().take(40).collect(),
                occurrences,
                density,
                heat,
            }
        })
        .collect()
}

/// Frequent terms and phrases that co-occur with the keyword, used as a
/// related-term coverage signal. Deterministic: frequency descending,
/// then lexicographic.
fn related_terms(plain: &str, tokens: &[String], primary: &str) -> Vec<String> {
    let primary_words: Vec<String> = primary
        .split_whitespace()
        .map(text::normalize_token)
        .collect();

    let mut word_freq: BTreeMap<&str, usize> = BTreeMap::new();
    for token in tokens {
        if token.len() >= 4
            && token.chars().all(|c| c.is_ascii_alphabetic())
            && !is_stop_word(token)
            && !primary_words.iter().any(|p| p == token)
        {
            *word_freq.entry(token).or_insert(0) += 1;
        }
    }
    let mut top_words: Vec<(&str, usize)> = word_freq.into_iter().collect();
    top_words.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let mut phrase_freq: BTreeMap<String, usize> = BTreeMap::new();
    let lower = plain.to_lowercase();
    for sentence in text::sentences(&lower) {
        let words: Vec<String> = text::words(sentence)
            .iter()
            .map(|w| text::normalize_token(w))
            .filter(|t| !t.is_empty())
            .collect();
        for window in words.windows(2) {
            let phrase = window.join(" ");
            if phrase.len() > 8 && !window.iter().any(|w| is_stop_word(w)) {
                *phrase_freq.entry(phrase).or_insert(0) += 1;
            }
        }
        for window in words.windows(3) {
            let phrase = window.join(" ");
            if phrase.len() > 12 && !window.iter().any(|w| is_stop_word(w)) {
                *phrase_freq.entry(phrase).or_insert(0) += 1;
            }
        }
    }
    let mut top_phrases: Vec<(String, usize)> = phrase_freq.into_iter().collect();
    top_phrases.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut out: Vec<String> = top_words
        .iter()
        .take(10)
        .map(|(w, _)| w.to_string())
        .collect();
    out.extend(top_phrases.into_iter().take(5).map(|(p, _)| p));
    out.truncate(15);
    out
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
