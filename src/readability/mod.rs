//! Readability analyzer
//!
//! Computes formula-based readability metrics from plain prose text:
//! Flesch reading ease, Flesch-Kincaid grade, Gunning fog, SMOG,
//! Coleman-Liau, ARI, plus structural statistics (sentence and
//! paragraph distributions, passive-voice ratio, complex-word ratio,
//! sentence rhythm). Every figure is a closed-form function of the
//! shared tokenizer's counts, so repeated runs are byte-identical.

use crate::models::MetricBundle;
use crate::text;
use regex::Regex;
use std::sync::OnceLock;

/// Target bands for the banded overall score
const TARGET_GRADE: (f64, f64) = (8.0, 10.0);

static PAST_PARTICIPLE_RE: OnceLock<Regex> = OnceLock::new();

const PASSIVE_AUXILIARIES: &[&str] = &["is", "are", "was", "were", "been", "being", "be", "am"];

const TRANSITION_WORDS: &[&str] = &[
    "however",
    "moreover",
    "furthermore",
    "therefore",
    "consequently",
    "additionally",
    "meanwhile",
    "nevertheless",
    "thus",
    "hence",
    "accordingly",
    "subsequently",
    "for example",
    "for instance",
    "in addition",
    "on the other hand",
    "as a result",
    "in contrast",
];

/// Words at or above this syllable count are "complex"
const COMPLEX_SYLLABLES: usize = 3;

/// Analyze plain prose text into a full metric bundle.
///
/// Empty input returns a bundle of zeros, not an error.
pub fn analyze(plain: &str) -> MetricBundle {
    let words = text::words(plain);
    let sentences = text::sentences(plain);
    if words.is_empty() || sentences.is_empty() {
        return MetricBundle::default();
    }

    let word_count = words.len();
    let sentence_count = sentences.len();

    let syllable_count: usize = words.iter().map(|w| text::syllables(w)).sum();
    let letter_count: usize = words.iter().map(|w| text::letters(w)).sum();
    let alnum_count: usize = words
        .iter()
        .map(|w| w.chars().filter(|c| c.is_ascii_alphanumeric()).count())
        .sum();

    let wc = word_count as f64;
    let sc = sentence_count as f64;
    let avg_sentence_length = wc / sc;
    let syllables_per_word = syllable_count as f64 / wc;

    // Sentence-length distribution
    let sentence_lengths: Vec<f64> = sentences
        .iter()
        .map(|s| text::words(s).len() as f64)
        .collect();
    let sentence_length_variance = text::variance(&sentence_lengths);
    let long_sentences = sentence_lengths.iter().filter(|&&l| l > 25.0).count();
    let very_long_sentences = sentence_lengths.iter().filter(|&&l| l > 35.0).count();

    // Paragraph distribution
    let paragraphs = text::paragraphs(plain);
    let para_sentence_counts: Vec<usize> = paragraphs
        .iter()
        .map(|p| substantial_sentences(p))
        .filter(|&n| n > 0)
        .collect();
    let avg_sentences_per_paragraph = if para_sentence_counts.is_empty() {
        0.0
    } else {
        para_sentence_counts.iter().sum::<usize>() as f64 / para_sentence_counts.len() as f64
    };
    let long_paragraphs = para_sentence_counts.iter().filter(|&&n| n > 4).count();
    let longest_paragraph_sentences = para_sentence_counts.iter().copied().max().unwrap_or(0);

    // Complex words and passive voice
    let complex_words = words
        .iter()
        .filter(|w| text::syllables(w) >= COMPLEX_SYLLABLES)
        .count();
    let complex_word_ratio = round1(complex_words as f64 / wc * 100.0);
    let passive_ratio = round1(passive_sentence_ratio(&sentences) * 100.0);

    // Transition words, counted as substrings over the lowercased text
    let lower = plain.to_lowercase();
    let transition_count: usize = TRANSITION_WORDS
        .iter()
        .map(|w| lower.matches(w).count())
        .sum();
    let transition_per_100 = round1(transition_count as f64 / wc * 100.0);

    // Formula metrics
    let reading_ease = round1(206.835 - 1.015 * avg_sentence_length - 84.6 * syllables_per_word);
    let grade_level = round1(0.39 * avg_sentence_length + 11.8 * syllables_per_word - 15.59);
    let fog_index = round1(0.4 * (avg_sentence_length + 100.0 * complex_words as f64 / wc));
    let smog_index = round1(1.0430 * (complex_words as f64 * 30.0 / sc).sqrt() + 3.1291);
    let coleman_liau_index = round1(
        0.0588 * (letter_count as f64 / wc * 100.0) - 0.296 * (sc / wc * 100.0) - 15.8,
    );
    let automated_readability_index =
        round1(4.71 * (alnum_count as f64 / wc) + 0.5 * avg_sentence_length - 21.43);

    let (rhythm_score, monotonous_windows) = sentence_rhythm(&sentence_lengths);

    let mut bundle = MetricBundle {
        word_count,
        sentence_count,
        syllable_count,
        reading_ease,
        grade_level,
        fog_index,
        smog_index,
        coleman_liau_index,
        automated_readability_index,
        avg_sentence_length: round1(avg_sentence_length),
        sentence_length_variance: round1(sentence_length_variance),
        long_sentences,
        very_long_sentences,
        paragraph_count: paragraphs.len(),
        avg_sentences_per_paragraph: round1(avg_sentences_per_paragraph),
        long_paragraphs,
        longest_paragraph_sentences,
        passive_ratio,
        complex_word_ratio,
        transition_per_100,
        rhythm_score,
        monotonous_windows,
        overall_score: 0.0,
    };
    bundle.overall_score = overall_score(&bundle);
    bundle
}

/// Sentences with real content (more than 10 chars), for paragraph
/// length checks.
fn substantial_sentences(paragraph: &str) -> usize {
    text::sentences(paragraph)
        .iter()
        .filter(|s| s.len() > 10)
        .count()
}

/// Fraction of sentences in passive voice: a to-be auxiliary plus an
/// -ed/-en participle in the same sentence.
fn passive_sentence_ratio(sentences: &[&str]) -> f64 {
    let participle =
        PAST_PARTICIPLE_RE.get_or_init(|| Regex::new(r"\b\w+(ed|en)\b").unwrap());

    let passive = sentences
        .iter()
        .filter(|s| {
            let lower = format!(" {} ", s.to_lowercase());
            PASSIVE_AUXILIARIES
                .iter()
                .any(|aux| lower.contains(&format!(" {aux} ")))
                && participle.is_match(&lower)
        })
        .count();

    passive as f64 / sentences.len() as f64
}

/// Sentence-length monotony over sliding 5-sentence windows.
///
/// Returns (rhythm score 0-100, monotonous window count). Higher
/// variance in sentence length reads better; a run of same-length
/// sentences is flagged as monotonous.
pub fn sentence_rhythm(sentence_lengths: &[f64]) -> (f64, usize) {
    const WINDOW: usize = 5;
    if sentence_lengths.len() < 10 {
        return (70.0, 0);
    }

    let mut monotonous = 0;
    for window in sentence_lengths.windows(WINDOW) {
        let avg = window.iter().sum::<f64>() / WINDOW as f64;
        if window.iter().all(|&wc| (wc - avg).abs() <= 5.0) {
            monotonous += 1;
        }
    }

    let std_dev = text::variance(sentence_lengths).sqrt();
    let mut score = if std_dev < 5.0 {
        40.0 + std_dev * 6.0
    } else if std_dev <= 15.0 {
        100.0 - (10.0 - std_dev).abs() * 2.0
    } else {
        80.0
    };
    score -= monotonous as f64 * 3.0;

    (score.clamp(0.0, 100.0).round(), monotonous)
}

/// Map the raw metrics onto the 0-100 band score. Deductions follow
/// fixed bands around the targets (reading ease 60-70, grade 8-10).
fn overall_score(m: &MetricBundle) -> f64 {
    let mut score: f64 = 100.0;

    // Reading ease bands
    if m.reading_ease < 30.0 {
        score -= 30.0;
    } else if m.reading_ease < 50.0 {
        score -= 20.0;
    } else if m.reading_ease < 60.0 {
        score -= 10.0;
    } else if m.reading_ease > 80.0 {
        score -= 5.0;
    }

    // Grade-level bands vs the 8-10 target
    let (gmin, gmax) = TARGET_GRADE;
    if m.grade_level < gmin - 2.0 {
        score -= 10.0;
    } else if m.grade_level > gmax + 4.0 {
        score -= 25.0;
    } else if m.grade_level > gmax + 2.0 {
        score -= 15.0;
    } else if m.grade_level > gmax {
        score -= 5.0;
    }

    // Sentence length
    if m.avg_sentence_length > 30.0 {
        score -= 20.0;
    } else if m.avg_sentence_length > 25.0 {
        score -= 10.0;
    } else if m.avg_sentence_length > 20.0 {
        score -= 5.0;
    }
    if m.very_long_sentences > 0 {
        score -= (m.very_long_sentences as f64 * 3.0).min(15.0);
    }

    // Paragraph structure
    if m.avg_sentences_per_paragraph > 6.0 {
        score -= 10.0;
    } else if m.avg_sentences_per_paragraph > 4.0 {
        score -= 5.0;
    }

    // Passive voice
    if m.passive_ratio > 30.0 {
        score -= 10.0;
    } else if m.passive_ratio > 20.0 {
        score -= 5.0;
    }

    // Transition words: absence costs, good use earns a little back
    if m.transition_per_100 < 0.5 {
        score -= 5.0;
    } else if m.transition_per_100 > 2.0 {
        score += 5.0;
    }

    score.clamp(0.0, 100.0)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_text() -> String {
        let mut out = String::new();
        for i in 0..6 {
            out.push_str(
                "The show grew fast this year. We added new episodes every week. \
                 Listeners told us what they wanted to hear. However, growth takes time.\n\n",
            );
            if i == 3 {
                out.push_str("Short one. ");
            }
        }
        out
    }

    #[test]
    fn test_empty_text_is_zero_bundle() {
        let bundle = analyze("");
        assert_eq!(bundle, MetricBundle::default());
        assert_eq!(bundle.overall_score, 0.0);
    }

    #[test]
    fn test_basic_counts() {
        let bundle = analyze("The cat sat on the mat. The dog ran away fast.");
        assert_eq!(bundle.sentence_count, 2);
        assert_eq!(bundle.word_count, 11);
        assert!(bundle.avg_sentence_length > 5.0 && bundle.avg_sentence_length < 6.0);
    }

    #[test]
    fn test_simple_text_reads_easy() {
        let bundle = analyze(&simple_text());
        assert!(
            bundle.reading_ease > 60.0,
            "reading_ease={}",
            bundle.reading_ease
        );
        assert!(bundle.grade_level < 10.0, "grade={}", bundle.grade_level);
        assert!(bundle.overall_score >= 70.0, "score={}", bundle.overall_score);
    }

    #[test]
    fn test_complex_words_counted() {
        let bundle = analyze("Incomprehensible administrative bureaucracy obfuscates everything.");
        assert!(bundle.complex_word_ratio > 50.0);
        assert!(bundle.fog_index > 10.0);
    }

    #[test]
    fn test_passive_detection() {
        let passive = analyze("The report was finished by the team. The draft was reviewed twice.");
        assert!(passive.passive_ratio > 50.0, "ratio={}", passive.passive_ratio);

        let active = analyze("The team finished the report. Reviewers read the draft twice.");
        assert!(active.passive_ratio < passive.passive_ratio);
    }

    #[test]
    fn test_determinism() {
        let text = simple_text();
        let a = analyze(&text);
        let b = analyze(&text);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rhythm_flags_monotony() {
        // 12 sentences, all exactly 6 words
        let lengths = vec![6.0; 12];
        let (score, monotonous) = sentence_rhythm(&lengths);
        assert!(monotonous > 0);
        assert!(score < 60.0, "score={score}");

        let varied = vec![4.0, 18.0, 7.0, 25.0, 5.0, 15.0, 9.0, 22.0, 6.0, 12.0, 8.0, 20.0];
        let (varied_score, _) = sentence_rhythm(&varied);
        assert!(varied_score > score);
    }
}
