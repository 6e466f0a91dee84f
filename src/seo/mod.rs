//! SEO rater
//!
//! Rule engine that checks structural and meta conventions against the
//! configured target bands. Each check maps a measured value to a
//! sub-score deduction and, when out of range, an issue record. An
//! inapplicable sub-check (no headings, missing meta field) counts as a
//! failed check against its category; weight is never redistributed.

use crate::config::SeoTargets;
use crate::document::Document;
use crate::models::{
    CategoryScore, Issue, KeywordProfile, MetricBundle, SeoCategory, SeoReport, Severity,
};
use crate::text;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

static MARKDOWN_LINK_RE: OnceLock<Regex> = OnceLock::new();

/// Rate a document against SEO best practices.
pub fn rate(
    doc: &Document,
    bundle: &MetricBundle,
    profile: &KeywordProfile,
    targets: &SeoTargets,
    publish_threshold: f64,
) -> SeoReport {
    let structure = doc.structure();
    let plain = doc.plain_text();

    let categories = vec![
        score_content(&plain, profile.word_count, targets),
        score_keywords(profile, &structure, targets),
        score_meta(doc, &profile.primary.keyword, targets),
        score_structure(&structure, targets),
        score_links(&doc.body, targets),
        score_readability(bundle, &structure, targets),
    ];

    let weights = &targets.category_weights;
    let overall_score = round1(
        categories
            .iter()
            .map(|c| c.score * weights.get(c.category))
            .sum::<f64>()
            / weights.total(),
    );

    let critical = categories
        .iter()
        .flat_map(|c| c.issues.iter())
        .filter(|i| i.severity == Severity::Critical)
        .count();
    let publish_ready = overall_score >= publish_threshold && critical == 0;

    debug!(
        overall = overall_score,
        critical, publish_ready, "seo rating complete"
    );

    SeoReport {
        categories,
        overall_score,
        publish_ready,
    }
}

fn score_content(plain: &str, word_count: usize, targets: &SeoTargets) -> CategoryScore {
    let mut score: f64 = 100.0;
    let mut issues = Vec::new();

    if word_count < targets.min_word_count {
        score -= 30.0;
        issues.push(
            Issue::new(
                "content-length",
                Severity::Critical,
                format!(
                    "content is too short ({word_count} words, minimum {})",
                    targets.min_word_count
                ),
            )
            .with_fix(format!(
                "expand to at least {} words",
                targets.min_word_count
            ))
            .with_value(word_count as u64),
        );
    } else if word_count < targets.optimal_word_count {
        score -= 10.0;
        issues.push(
            Issue::new(
                "content-length",
                Severity::Warning,
                format!(
                    "content could be longer ({word_count} words, optimal {}+)",
                    targets.optimal_word_count
                ),
            )
            .with_value(word_count as u64),
        );
    } else if word_count > targets.max_word_count {
        score -= 5.0;
        issues.push(
            Issue::new(
                "content-length",
                Severity::Suggestion,
                format!(
                    "content is quite long ({word_count} words, over {})",
                    targets.max_word_count
                ),
            )
            .with_fix("consider splitting into multiple pieces")
            .with_value(word_count as u64),
        );
    }

    // Paragraph word counts
    let paragraphs = text::paragraphs(plain);
    if !paragraphs.is_empty() {
        let avg_words = paragraphs
            .iter()
            .map(|p| text::words(p).len())
            .sum::<usize>() as f64
            / paragraphs.len() as f64;
        if avg_words > 150.0 {
            score -= 10.0;
            issues.push(
                Issue::new(
                    "paragraph-length",
                    Severity::Warning,
                    format!("paragraphs are too long (avg {avg_words:.0} words)"),
                )
                .with_fix("break paragraphs into 2-4 sentence chunks")
                .with_value(avg_words.round()),
            );
        } else if avg_words < 30.0 {
            score -= 5.0;
            issues.push(
                Issue::new(
                    "paragraph-length",
                    Severity::Suggestion,
                    format!("paragraphs are very short (avg {avg_words:.0} words)"),
                )
                .with_value(avg_words.round()),
            );
        }
    }

    category(SeoCategory::Content, score, issues)
}

fn score_keywords(
    profile: &KeywordProfile,
    structure: &crate::document::Structure,
    targets: &SeoTargets,
) -> CategoryScore {
    let mut score: f64 = 100.0;
    let mut issues = Vec::new();
    let primary = &profile.primary;
    let kw = &primary.keyword;

    // H1 presence; no H1 at all also fails this check
    let in_h1 = structure
        .h1_texts
        .iter()
        .any(|h| h.to_lowercase().contains(&kw.to_lowercase()));
    if !in_h1 {
        score -= 20.0;
        issues.push(
            Issue::new(
                "keyword-in-h1",
                Severity::Critical,
                format!("primary keyword '{kw}' missing from the H1 heading"),
            )
            .with_fix(format!("include '{kw}' in the headline")),
        );
    }

    if !primary.placements.in_first_100_words {
        score -= 15.0;
        issues.push(
            Issue::new(
                "keyword-in-first-100-words",
                Severity::Warning,
                format!("primary keyword '{kw}' missing from first_100_words"),
            )
            .with_fix(format!("mention '{kw}' in the introduction")),
        );
    }

    if primary.heading_count > 0 {
        let ratio = primary.heading_matches as f64 / primary.heading_count as f64;
        if ratio < targets.h2_keyword_ratio {
            score -= 10.0;
            issues.push(
                Issue::new(
                    "keyword-h2-coverage",
                    Severity::Warning,
                    format!(
                        "keyword appears in only {}/{} H2 headings",
                        primary.heading_matches, primary.heading_count
                    ),
                )
                .with_fix("work keyword variations into 2-3 section headings")
                .with_value(round1(ratio)),
            );
        }
    }

    // Density vs the configured band
    let density = primary.density;
    if density < targets.keyword_density_min {
        score -= 15.0;
        issues.push(
            Issue::new(
                "keyword-density",
                Severity::Warning,
                format!(
                    "keyword density is too low ({density}%, target {}-{}%)",
                    targets.keyword_density_min, targets.keyword_density_max
                ),
            )
            .with_value(density),
        );
    } else if density > targets.keyword_density_max * 1.5 {
        score -= 20.0;
        issues.push(
            Issue::new(
                "keyword-density",
                Severity::Critical,
                format!(
                    "keyword density is far too high ({density}%), stuffing risk"
                ),
            )
            .with_fix("remove occurrences or replace them with variations")
            .with_value(density),
        );
    } else if density > targets.keyword_density_max {
        score -= 10.0;
        issues.push(
            Issue::new(
                "keyword-density",
                Severity::Warning,
                format!(
                    "keyword density is slightly high ({density}%, target {}-{}%)",
                    targets.keyword_density_min, targets.keyword_density_max
                ),
            )
            .with_value(density),
        );
    }

    if !primary.placements.in_closing {
        issues.push(
            Issue::new(
                "keyword-in-closing",
                Severity::Suggestion,
                format!("primary keyword '{kw}' missing from the closing section"),
            )
            .with_fix("mention the keyword once in the conclusion"),
        );
    }

    let missing: Vec<&str> = profile
        .secondary
        .iter()
        .filter(|s| s.occurrences == 0)
        .map(|s| s.keyword.as_str())
        .collect();
    if !missing.is_empty() {
        score -= 5.0;
        issues.push(
            Issue::new(
                "secondary-keywords-missing",
                Severity::Suggestion,
                format!("secondary keywords not found: {}", missing.join(", ")),
            )
            .with_value(missing.len() as u64),
        );
    }

    // Stuffing escalations from the keyword analyzer feed this category
    issues.extend(profile.stuffing_issues.iter().cloned());

    category(SeoCategory::Keywords, score, issues)
}

fn score_meta(doc: &Document, keyword: &str, targets: &SeoTargets) -> CategoryScore {
    let mut score: f64 = 100.0;
    let mut issues = Vec::new();
    let kw_lower = keyword.to_lowercase();

    match doc.meta_title.as_deref() {
        None => {
            score -= 40.0;
            issues.push(
                Issue::new("meta-title", Severity::Critical, "meta title is missing")
                    .with_fix(format!(
                        "add a meta title ({}-{} characters)",
                        targets.meta_title_length_min, targets.meta_title_length_max
                    )),
            );
        }
        Some(title) => {
            let len = title.chars().count();
            if len < targets.meta_title_length_min {
                score -= 15.0;
                issues.push(
                    Issue::new(
                        "meta-title-length",
                        Severity::Warning,
                        format!(
                            "meta title too short ({len} chars, target {}-{})",
                            targets.meta_title_length_min, targets.meta_title_length_max
                        ),
                    )
                    .with_value(len as u64),
                );
            } else if len > targets.meta_title_length_max + 10 {
                score -= 10.0;
                issues.push(
                    Issue::new(
                        "meta-title-length",
                        Severity::Warning,
                        format!(
                            "meta title too long ({len} chars, target {}-{})",
                            targets.meta_title_length_min, targets.meta_title_length_max
                        ),
                    )
                    .with_value(len as u64),
                );
            }
            if !title.to_lowercase().contains(&kw_lower) {
                score -= 15.0;
                issues.push(Issue::new(
                    "keyword-in-meta-title",
                    Severity::Warning,
                    format!("primary keyword '{keyword}' not in meta title"),
                ));
            }
        }
    }

    match doc.meta_description.as_deref() {
        None => {
            score -= 40.0;
            issues.push(
                Issue::new(
                    "meta-description",
                    Severity::Critical,
                    "meta description is missing",
                )
                .with_fix(format!(
                    "add a meta description ({}-{} characters)",
                    targets.meta_description_length_min, targets.meta_description_length_max
                )),
            );
        }
        Some(desc) => {
            let len = desc.chars().count();
            if len < targets.meta_description_length_min {
                score -= 15.0;
                issues.push(
                    Issue::new(
                        "meta-description-length",
                        Severity::Warning,
                        format!(
                            "meta description too short ({len} chars, target {}-{})",
                            targets.meta_description_length_min,
                            targets.meta_description_length_max
                        ),
                    )
                    .with_value(len as u64),
                );
            } else if len > targets.meta_description_length_max + 10 {
                score -= 10.0;
                issues.push(
                    Issue::new(
                        "meta-description-length",
                        Severity::Warning,
                        format!(
                            "meta description too long ({len} chars, target {}-{})",
                            targets.meta_description_length_min,
                            targets.meta_description_length_max
                        ),
                    )
                    .with_value(len as u64),
                );
            }
            if !desc.to_lowercase().contains(&kw_lower) {
                score -= 10.0;
                issues.push(Issue::new(
                    "keyword-in-meta-description",
                    Severity::Suggestion,
                    format!("primary keyword '{keyword}' not in meta description"),
                ));
            }
        }
    }

    category(SeoCategory::Meta, score, issues)
}

fn score_structure(
    structure: &crate::document::Structure,
    targets: &SeoTargets,
) -> CategoryScore {
    let mut score: f64 = 100.0;
    let mut issues = Vec::new();

    match structure.h1_count() {
        0 => {
            score -= 30.0;
            issues.push(
                Issue::new("single-h1", Severity::Critical, "missing H1 heading")
                    .with_fix("add one top-level heading"),
            );
        }
        1 => {}
        n => {
            score -= 20.0;
            issues.push(
                Issue::new(
                    "single-h1",
                    Severity::Critical,
                    format!("multiple H1 headings found ({n}), there should be exactly one"),
                )
                .with_value(n as u64),
            );
        }
    }

    let h2 = structure.h2_count();
    if h2 < targets.min_h2_sections {
        score -= 15.0;
        issues.push(
            Issue::new(
                "h2-count",
                Severity::Warning,
                format!(
                    "too few H2 sections ({h2}, target {})",
                    targets.optimal_h2_sections
                ),
            )
            .with_fix("add more main sections")
            .with_value(h2 as u64),
        );
    } else if h2 < targets.optimal_h2_sections {
        score -= 5.0;
        issues.push(
            Issue::new(
                "h2-count",
                Severity::Suggestion,
                format!(
                    "could use more H2 sections ({h2}, optimal {})",
                    targets.optimal_h2_sections
                ),
            )
            .with_value(h2 as u64),
        );
    }

    category(SeoCategory::Structure, score, issues)
}

fn score_links(body: &str, targets: &SeoTargets) -> CategoryScore {
    let mut score: f64 = 100.0;
    let mut issues = Vec::new();

    let link_re =
        MARKDOWN_LINK_RE.get_or_init(|| Regex::new(r"\[[^\]]+\]\(([^)]*)\)").unwrap());
    let mut internal = 0usize;
    let mut external = 0usize;
    for cap in link_re.captures_iter(body) {
        if cap[1].starts_with("http://") || cap[1].starts_with("https://") {
            external += 1;
        } else {
            internal += 1;
        }
    }

    if internal < targets.min_internal_links {
        score -= 20.0;
        issues.push(
            Issue::new(
                "internal-links",
                Severity::Warning,
                format!(
                    "too few internal links ({internal}, target {})",
                    targets.optimal_internal_links
                ),
            )
            .with_fix("link to related pages on the same site")
            .with_value(internal as u64),
        );
    } else if internal < targets.optimal_internal_links {
        score -= 5.0;
        issues.push(
            Issue::new(
                "internal-links",
                Severity::Suggestion,
                format!(
                    "could add more internal links ({internal}, optimal {})",
                    targets.optimal_internal_links
                ),
            )
            .with_value(internal as u64),
        );
    }

    if external < targets.min_external_links {
        score -= 15.0;
        issues.push(
            Issue::new(
                "external-links",
                Severity::Warning,
                format!(
                    "too few external links ({external}, target {})",
                    targets.optimal_external_links
                ),
            )
            .with_fix("cite authoritative sources")
            .with_value(external as u64),
        );
    } else if external < targets.optimal_external_links {
        score -= 5.0;
        issues.push(
            Issue::new(
                "external-links",
                Severity::Suggestion,
                format!(
                    "could add more external links ({external}, optimal {})",
                    targets.optimal_external_links
                ),
            )
            .with_value(external as u64),
        );
    }

    category(SeoCategory::Links, score, issues)
}

fn score_readability(
    bundle: &MetricBundle,
    structure: &crate::document::Structure,
    targets: &SeoTargets,
) -> CategoryScore {
    let mut score: f64 = 100.0;
    let mut issues = Vec::new();

    let max_len = targets.max_sentence_length as f64;
    if bundle.avg_sentence_length > max_len {
        score -= 10.0;
        issues.push(
            Issue::new(
                "sentence-length",
                Severity::Warning,
                format!(
                    "average sentence length is {} words (target under {})",
                    bundle.avg_sentence_length, targets.max_sentence_length
                ),
            )
            .with_fix("break up long sentences")
            .with_value(bundle.avg_sentence_length),
        );
    }

    if bundle.sentence_count > 0 {
        let very_long_share = bundle.very_long_sentences as f64 / bundle.sentence_count as f64;
        if very_long_share > 0.2 {
            score -= 10.0;
            issues.push(
                Issue::new(
                    "very-long-sentences",
                    Severity::Warning,
                    format!(
                        "{} sentences run over {} words",
                        bundle.very_long_sentences,
                        (max_len * 1.5) as usize
                    ),
                )
                .with_fix("split them into shorter sentences")
                .with_value(bundle.very_long_sentences as u64),
            );
        }
    }

    if structure.bullet_list_lines + structure.numbered_list_lines == 0 {
        score -= 5.0;
        issues.push(
            Issue::new(
                "no-lists",
                Severity::Suggestion,
                "no lists found; bullets improve scannability",
            )
            .with_fix("turn a dense passage into a bulleted list"),
        );
    }

    category(SeoCategory::Readability, score, issues)
}

fn category(cat: SeoCategory, score: f64, issues: Vec<Issue>) -> CategoryScore {
    CategoryScore {
        category: cat,
        score: score.clamp(0.0, 100.0),
        issues,
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
