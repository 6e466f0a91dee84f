//! Five-dimension composite scorer

use crate::document::Document;
use crate::models::{
    grade_from_score, CompositeResult, Dimension, DimensionScore, Issue, KeywordProfile,
    MetricBundle, PriorityFix, SeoReport, Severity,
};
use crate::scoring::rules;
use tracing::debug;

/// Prose-ratio bands: full credit inside [0.50, 0.65], graded penalty
/// out to [0.40, 0.70], steeper beyond.
const PROSE_FULL_BAND: (f64, f64) = (0.50, 0.65);
const PROSE_OUTER_BAND: (f64, f64) = (0.40, 0.70);

/// Score a document across all dimensions.
///
/// Pure function of its inputs; the word count comes from the keyword
/// profile so every density figure shares one tokenizer.
pub fn score(
    doc: &Document,
    bundle: &MetricBundle,
    profile: &KeywordProfile,
    seo: &SeoReport,
    pass_threshold: u32,
) -> CompositeResult {
    let plain = doc.plain_text();
    let word_count = profile.word_count.max(1) as f64;

    let dimensions = vec![
        score_voice(&plain, word_count),
        score_specificity(&plain, word_count),
        score_structure_balance(doc),
        dimension(
            Dimension::Seo,
            seo.overall_score,
            seo.issues().cloned().collect(),
        ),
        score_readability_dimension(bundle),
    ];

    let weighted: f64 = dimensions.iter().map(|d| d.score * d.weight).sum();
    let weighted_total = weighted.round().clamp(0.0, 100.0) as u32;
    let pass = weighted_total >= pass_threshold;

    let mut fixes: Vec<PriorityFix> = dimensions
        .iter()
        .flat_map(|d| {
            let impact = d.weight * (100.0 - d.score);
            d.issues.iter().map(move |issue| PriorityFix {
                dimension: d.dimension,
                impact: round1(impact),
                issue: issue.clone(),
            })
        })
        .collect();
    fixes.sort_by(|a, b| {
        b.impact
            .partial_cmp(&a.impact)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.issue.severity.cmp(&a.issue.severity))
            .then(a.issue.rule.cmp(&b.issue.rule))
    });
    fixes.truncate(5);

    debug!(weighted_total, pass, "composite scoring complete");

    CompositeResult {
        dimensions,
        weighted_total,
        pass,
        grade: grade_from_score(weighted_total as f64),
        priority_fixes: fixes,
    }
}

/// Voice: penalize cataloged filler phrasing and passive constructions,
/// reward conversational devices and contractions.
fn score_voice(plain: &str, word_count: f64) -> DimensionScore {
    let mut issues = Vec::new();
    let lower = plain.to_lowercase();

    let filler = rules::match_count(rules::filler_phrases(), &lower);
    let filler_density = rules::weighted_count(rules::filler_phrases(), &lower) / word_count * 1000.0;

    let conv_density =
        rules::weighted_count(rules::conversational_patterns(), plain) / word_count * 1000.0;

    let passive = rules::passive_re().find_iter(&lower).count();
    let passive_per_100 = passive as f64 / (word_count / 100.0).max(1.0);

    let contractions = rules::contraction_re().find_iter(plain).count();
    let contraction_density = contractions as f64 / word_count * 100.0;

    let mut score: f64 = 100.0;

    if filler_density > 5.0 {
        score -= ((filler_density - 5.0) * 3.0).min(30.0);
        let samples = rules::sample_matches(rules::filler_phrases(), &lower, 3);
        issues.push(
            Issue::new(
                "voice-filler-phrases",
                if filler_density > 10.0 {
                    Severity::Warning
                } else {
                    Severity::Suggestion
                },
                format!("filler phrases detected ({filler} instances)"),
            )
            .with_fix(format!("remove or rephrase: {}", samples.join(", ")))
            .with_value(round1(filler_density)),
        );
    }

    if passive_per_100 > 2.0 {
        score -= ((passive_per_100 - 2.0) * 5.0).min(15.0);
        issues.push(
            Issue::new(
                "voice-passive",
                Severity::Warning,
                "high passive voice usage",
            )
            .with_fix("convert passive sentences to active voice")
            .with_value(round1(passive_per_100)),
        );
    }

    if conv_density > 3.0 {
        score = (score + ((conv_density - 3.0) * 2.0).min(15.0)).min(100.0);
    }

    if contraction_density < 1.0 {
        score -= 10.0;
        issues.push(
            Issue::new(
                "voice-no-contractions",
                Severity::Suggestion,
                "lacks contractions, reads overly formal",
            )
            .with_fix("use contractions like don't, can't, you're, it's")
            .with_value(round1(contraction_density)),
        );
    }

    dimension(Dimension::Voice, score.clamp(0.0, 100.0).round(), issues)
}

/// Specificity: reward figures, dates, and named references; penalize
/// vague quantifiers.
fn score_specificity(plain: &str, word_count: f64) -> DimensionScore {
    let mut issues = Vec::new();
    let lower = plain.to_lowercase();

    let vague = rules::match_count(rules::vague_words(), &lower);
    let vague_density = rules::weighted_count(rules::vague_words(), &lower) / word_count * 1000.0;

    let specific_density =
        rules::weighted_count(rules::specificity_patterns(), plain) / word_count * 1000.0;

    let numbers = rules::number_re().find_iter(plain).count();
    let number_density = numbers as f64 / word_count * 1000.0;

    // Concrete detail has to be earned; the baseline sits below full
    // credit and bonuses raise it.
    let mut score: f64 = 70.0;

    if vague_density > 15.0 {
        score -= ((vague_density - 15.0) * 1.5).min(25.0);
        let samples = rules::sample_matches(rules::vague_words(), &lower, 3);
        issues.push(
            Issue::new(
                "specificity-vague-words",
                if vague_density > 25.0 {
                    Severity::Warning
                } else {
                    Severity::Suggestion
                },
                format!("too many vague words ({vague} instances)"),
            )
            .with_fix(format!("replace vague words with specifics: {}", samples.join(", ")))
            .with_value(round1(vague_density)),
        );
    }

    if specific_density > 2.0 {
        score += (specific_density * 5.0).min(30.0);
    }

    if number_density < 3.0 {
        score -= ((3.0 - number_density) * 5.0).min(15.0);
        issues.push(
            Issue::new(
                "specificity-no-data",
                Severity::Warning,
                "lacks specific numbers and data",
            )
            .with_fix("add percentages, dollar amounts, dates, or counts")
            .with_value(round1(number_density)),
        );
    }

    dimension(
        Dimension::Specificity,
        score.clamp(0.0, 100.0).round(),
        issues,
    )
}

/// Structure balance: ratio of prose characters to list/table
/// characters, against the 50-65% prose sweet spot.
fn score_structure_balance(doc: &Document) -> DimensionScore {
    let s = doc.structure();
    let mut issues = Vec::new();

    let body_chars = s.total_chars.saturating_sub(s.heading_chars).max(1) as f64;
    let structured = (s.list_chars + s.table_chars) as f64;
    let prose_ratio = (body_chars - structured) / body_chars;

    let (full_lo, full_hi) = PROSE_FULL_BAND;
    let (outer_lo, outer_hi) = PROSE_OUTER_BAND;

    let score = if (full_lo..=full_hi).contains(&prose_ratio) {
        100.0
    } else if prose_ratio < full_lo {
        let graded = 100.0 - (full_lo - prose_ratio) * 300.0;
        let score = if prose_ratio >= outer_lo {
            graded
        } else {
            70.0 - (outer_lo - prose_ratio) * 400.0
        };
        issues.push(
            Issue::new(
                "balance-too-structured",
                if prose_ratio < outer_lo {
                    Severity::Warning
                } else {
                    Severity::Suggestion
                },
                format!(
                    "too much structure ({:.0}% prose, target 50-65%)",
                    prose_ratio * 100.0
                ),
            )
            .with_fix("convert some bullet lists or tables into prose paragraphs")
            .with_value(round2(prose_ratio)),
        );
        score
    } else {
        let graded = 100.0 - (prose_ratio - full_hi) * 300.0;
        let score = if prose_ratio <= outer_hi {
            graded
        } else {
            85.0 - (prose_ratio - outer_hi) * 400.0
        };
        issues.push(
            Issue::new(
                "balance-too-prose-heavy",
                if prose_ratio > 0.90 {
                    Severity::Warning
                } else {
                    Severity::Suggestion
                },
                format!(
                    "too much prose ({:.0}% prose, target 50-65%)",
                    prose_ratio * 100.0
                ),
            )
            .with_fix("add tables for comparisons or lists for steps")
            .with_value(round2(prose_ratio)),
        );
        score
    };

    dimension(
        Dimension::StructureBalance,
        score.clamp(0.0, 100.0).round(),
        issues,
    )
}

/// Readability pass-through with issues surfaced from the bundle.
fn score_readability_dimension(bundle: &MetricBundle) -> DimensionScore {
    let mut issues = Vec::new();

    if bundle.reading_ease < 60.0 && bundle.word_count > 0 {
        issues.push(
            Issue::new(
                "readability-difficult",
                if bundle.reading_ease < 50.0 {
                    Severity::Warning
                } else {
                    Severity::Suggestion
                },
                format!("content is difficult to read (ease {})", bundle.reading_ease),
            )
            .with_fix("shorten sentences and prefer plain words")
            .with_value(bundle.reading_ease),
        );
    }

    if bundle.grade_level > 10.0 {
        issues.push(
            Issue::new(
                "readability-grade-high",
                Severity::Warning,
                format!(
                    "reading level is grade {} (target 8-10)",
                    bundle.grade_level
                ),
            )
            .with_value(bundle.grade_level),
        );
    }

    if bundle.long_paragraphs > 0 {
        issues.push(
            Issue::new(
                "readability-long-paragraphs",
                Severity::Warning,
                format!(
                    "{} paragraphs exceed 4 sentences (longest: {})",
                    bundle.long_paragraphs, bundle.longest_paragraph_sentences
                ),
            )
            .with_fix("break long paragraphs into 2-4 sentence chunks")
            .with_value(bundle.long_paragraphs as u64),
        );
    }

    if bundle.rhythm_score < 60.0 && bundle.sentence_count >= 10 {
        issues.push(
            Issue::new(
                "readability-monotonous-rhythm",
                Severity::Suggestion,
                format!(
                    "monotonous sentence rhythm ({} uniform stretches)",
                    bundle.monotonous_windows
                ),
            )
            .with_fix("mix short punchy sentences with longer flowing ones")
            .with_value(bundle.rhythm_score),
        );
    }

    dimension(Dimension::Readability, bundle.overall_score, issues)
}

fn dimension(dim: Dimension, score: f64, issues: Vec<Issue>) -> DimensionScore {
    DimensionScore {
        dimension: dim,
        score,
        weight: dim.weight(),
        issues,
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryScore, SeoCategory};

    fn seo_report(overall: f64) -> SeoReport {
        SeoReport {
            categories: vec![CategoryScore {
                category: SeoCategory::Content,
                score: overall,
                issues: vec![],
            }],
            overall_score: overall,
            publish_ready: overall >= 80.0,
        }
    }

    fn fixed_inputs(doc: &Document) -> (MetricBundle, KeywordProfile) {
        let bundle = crate::readability::analyze(&doc.plain_text());
        let profile = crate::keywords::analyze(doc, "podcast growth", &[]);
        (bundle, profile)
    }

    fn prose_doc(prose_sentences: usize, list_items: usize) -> Document {
        let mut body = String::from("# Podcast Growth\n\n");
        for i in 0..prose_sentences {
            body.push_str(&format!(
                "Sentence number {i} talks about podcast growth in plain prose form here.\n\n"
            ));
        }
        for i in 0..list_items {
            body.push_str(&format!("- list item number {i} with similar length text\n"));
        }
        Document::from_string(body, None, None)
    }

    #[test]
    fn test_composite_purity() {
        let doc = prose_doc(10, 8);
        let (bundle, profile) = fixed_inputs(&doc);
        let seo = seo_report(75.0);

        let a = score(&doc, &bundle, &profile, &seo, 70);
        let b = score(&doc, &bundle, &profile, &seo, 70);
        assert_eq!(a.weighted_total, b.weighted_total);
        assert_eq!(a.pass, b.pass);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_threshold_boundary() {
        // Force exact dimension scores through hand-built inputs: all
        // dimensions at 70 weight to exactly 70.
        let doc = prose_doc(10, 8);
        let (bundle, profile) = fixed_inputs(&doc);
        let seo = seo_report(80.0);
        let result = score(&doc, &bundle, &profile, &seo, 70);

        // Recompute the rounded weighted sum independently
        let expected: f64 = result.dimensions.iter().map(|d| d.score * d.weight).sum();
        assert_eq!(result.weighted_total, expected.round() as u32);
        assert_eq!(result.pass, result.weighted_total >= 70);
    }

    #[test]
    fn test_filler_text_scores_lower_on_voice() {
        let clean = Document::from_string(
            "# T\n\nYou're going to like this. Don't worry, it's short. We tested 12 shows in 2024.\n",
            None,
            None,
        );
        let filler = Document::from_string(
            "# T\n\nIn today's digital landscape, leverage synergy to unlock the potential. \
             When it comes to growth, utilize a robust, seamless, holistic paradigm journey.\n",
            None,
            None,
        );

        let voice = |doc: &Document| {
            let (bundle, profile) = fixed_inputs(doc);
            let seo = seo_report(80.0);
            let result = score(doc, &bundle, &profile, &seo, 70);
            result
                .dimensions
                .iter()
                .find(|d| d.dimension == Dimension::Voice)
                .unwrap()
                .score
        };

        assert!(voice(&filler) < voice(&clean));
    }

    #[test]
    fn test_structure_balance_bands() {
        let balanced = prose_doc(8, 7);
        let all_prose = prose_doc(12, 0);

        let balance = |doc: &Document| {
            score_structure_balance(doc).score
        };

        // All-prose documents sit above the 70% outer band
        assert!(balance(&all_prose) < 100.0);
        assert!(!score_structure_balance(&all_prose).issues.is_empty());
        let b = balance(&balanced);
        assert!(b >= balance(&all_prose), "balanced={b}");
    }

    #[test]
    fn test_priority_fixes_ordered_by_impact() {
        let doc = prose_doc(12, 0);
        let (bundle, profile) = fixed_inputs(&doc);
        let seo = seo_report(40.0);
        let result = score(&doc, &bundle, &profile, &seo, 70);

        assert!(!result.priority_fixes.is_empty());
        for pair in result.priority_fixes.windows(2) {
            assert!(pair[0].impact >= pair[1].impact);
        }
    }
}
