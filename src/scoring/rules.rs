//! Pattern catalogs for the composite scorer
//!
//! Every rule is a data record (id, regex, weight) in a loadable table
//! rather than a code branch, so catalogs can grow without touching the
//! scoring logic. Issues produced from these rules carry the rule id.

use regex::Regex;
use std::sync::OnceLock;

/// One catalog entry
pub struct PatternRule {
    pub id: &'static str,
    pub pattern: Regex,
    pub weight: f64,
}

impl PatternRule {
    fn new(id: &'static str, pattern: &str) -> Self {
        Self {
            id,
            pattern: Regex::new(pattern).unwrap(),
            weight: 1.0,
        }
    }
}

static FILLER_PHRASES: OnceLock<Vec<PatternRule>> = OnceLock::new();
static VAGUE_WORDS: OnceLock<Vec<PatternRule>> = OnceLock::new();
static SPECIFICITY_PATTERNS: OnceLock<Vec<PatternRule>> = OnceLock::new();
static CONVERSATIONAL_PATTERNS: OnceLock<Vec<PatternRule>> = OnceLock::new();
static CONTRACTION_RE: OnceLock<Regex> = OnceLock::new();
static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
static PASSIVE_RE: OnceLock<Regex> = OnceLock::new();

/// Generic filler phrasing that flattens a text's voice. Matched
/// against lowercased prose.
pub fn filler_phrases() -> &'static [PatternRule] {
    FILLER_PHRASES.get_or_init(|| {
        vec![
            PatternRule::new("filler-todays-world", r"\bin today's (?:digital|modern|fast-paced)\b"),
            PatternRule::new("filler-when-it-comes-to", r"\bwhen it comes to\b"),
            PatternRule::new("filler-important-to-note", r"\bit's important to (?:note|remember|understand)\b"),
            PatternRule::new("filler-world-of", r"\bin the world of\b"),
            PatternRule::new("filler-lets-dive", r"\blet's dive (?:in|into)\b"),
            PatternRule::new("filler-furthermore", r"\bfurthermore\b"),
            PatternRule::new("filler-moreover", r"\bmoreover\b"),
            PatternRule::new("filler-additionally", r"\badditionally\b"),
            PatternRule::new("filler-in-order-to", r"\bin order to\b"),
            PatternRule::new("filler-due-to-fact", r"\bdue to the fact that\b"),
            PatternRule::new("filler-end-of-day", r"\bat the end of the day\b"),
            PatternRule::new("filler-going-forward", r"\bgoing forward\b"),
            PatternRule::new("filler-leverage", r"\bleverage\b"),
            PatternRule::new("filler-utilize", r"\butilize\b"),
            PatternRule::new("filler-synergy", r"\bsynergy\b"),
            PatternRule::new("filler-holistic", r"\bholistic\b"),
            PatternRule::new("filler-robust", r"\brobust\b"),
            PatternRule::new("filler-seamless", r"\bseamless(?:ly)?\b"),
            PatternRule::new("filler-game-changer", r"\bgame.?changer\b"),
            PatternRule::new("filler-unlock-potential", r"\bunlock(?:ing)? (?:the )?(?:power|potential)\b"),
            PatternRule::new("filler-next-level", r"\btake (?:your|it) to the next level\b"),
            PatternRule::new("filler-journey", r"\bjourney\b"),
            PatternRule::new("filler-landscape", r"\blandscape\b"),
            PatternRule::new("filler-paradigm", r"\bparadigm\b"),
            PatternRule::new("filler-optimal", r"\boptimal\b"),
            PatternRule::new("filler-facilitate", r"\bfacilitate\b"),
        ]
    })
}

/// Vague quantifiers and intensifiers that displace concrete detail.
pub fn vague_words() -> &'static [PatternRule] {
    VAGUE_WORDS.get_or_init(|| {
        vec![
            PatternRule::new("vague-many", r"\bmany\b"),
            PatternRule::new("vague-some", r"\bsome\b"),
            PatternRule::new("vague-various", r"\bvarious\b"),
            PatternRule::new("vague-numerous", r"\bnumerous\b"),
            PatternRule::new("vague-several", r"\bseveral\b"),
            PatternRule::new("vague-often", r"\boften\b"),
            PatternRule::new("vague-sometimes", r"\bsometimes\b"),
            PatternRule::new("vague-usually", r"\busually\b"),
            PatternRule::new("vague-generally", r"\bgenerally\b"),
            PatternRule::new("vague-typically", r"\btypically\b"),
            PatternRule::new("vague-significant", r"\bsignificant(?:ly)?\b"),
            PatternRule::new("vague-substantial", r"\bsubstantial(?:ly)?\b"),
            PatternRule::new("vague-considerable", r"\bconsiderable\b"),
            PatternRule::new("vague-great", r"\bgreat(?:ly)?\b"),
            PatternRule::new("vague-very", r"\bvery\b"),
            PatternRule::new("vague-really", r"\breally\b"),
            PatternRule::new("vague-quite", r"\bquite\b"),
            PatternRule::new("vague-rather", r"\brather\b"),
            PatternRule::new("vague-relatively", r"\brelatively\b"),
            PatternRule::new("vague-recently", r"\brecently\b"),
            PatternRule::new("vague-currently", r"\bcurrently\b"),
            PatternRule::new("vague-effective", r"\beffective(?:ly)?\b"),
            PatternRule::new("vague-important", r"\bimportant\b"),
            PatternRule::new("vague-essential", r"\bessential\b"),
            PatternRule::new("vague-critical", r"\bcritical\b"),
            PatternRule::new("vague-key", r"\bkey\b"),
            PatternRule::new("vague-crucial", r"\bcrucial\b"),
        ]
    })
}

/// Concrete-detail signals: figures, dates, named attributions, quotes.
/// Matched against the original-case prose.
pub fn specificity_patterns() -> &'static [PatternRule] {
    SPECIFICITY_PATTERNS.get_or_init(|| {
        vec![
            PatternRule::new("specific-percentage", r"\b\d{1,3}%"),
            PatternRule::new("specific-dollar", r"\$[\d,]+(?:\.\d{2})?"),
            PatternRule::new("specific-year", r"\b\d{4}\b"),
            PatternRule::new(
                "specific-date",
                r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}",
            ),
            PatternRule::new(
                "specific-count",
                r"\b\d+(?:,\d{3})*\s*(?:downloads?|listeners?|subscribers?|episodes?|users?|customers?)\b",
            ),
            PatternRule::new(
                "specific-attribution",
                r"[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?\s+(?:said|says|explained|noted|mentioned)",
            ),
            PatternRule::new("specific-quote", r#""[^"]{10,}""#),
        ]
    })
}

/// Conversational devices that read as a human voice: asides,
/// questions, contractions, casual openers.
pub fn conversational_patterns() -> &'static [PatternRule] {
    CONVERSATIONAL_PATTERNS.get_or_init(|| {
        vec![
            PatternRule::new("conv-aside", r"\([^)]{5,50}\)"),
            PatternRule::new("conv-question", r"\?(?:\s|$)"),
            PatternRule::new("conv-dont", r"(?i)\bdon't\b"),
            PatternRule::new("conv-cant", r"(?i)\bcan't\b"),
            PatternRule::new("conv-wont", r"(?i)\bwon't\b"),
            PatternRule::new("conv-youre", r"(?i)\byou're\b"),
            PatternRule::new("conv-youve", r"(?i)\byou've\b"),
            PatternRule::new("conv-its", r"(?i)\bit's\b"),
            PatternRule::new("conv-thats", r"(?i)\bthat's\b"),
            PatternRule::new("conv-heres", r"(?i)\bhere's\b"),
            PatternRule::new("conv-lets", r"(?i)\blet's\b"),
            PatternRule::new("conv-ive", r"(?i)\bI've\b"),
            PatternRule::new("conv-im", r"(?i)\bI'm\b"),
            PatternRule::new("conv-weve", r"(?i)\bwe've\b"),
            PatternRule::new("conv-were-contraction", r"(?i)\bwe're\b"),
            PatternRule::new(
                "conv-casual-opener",
                r"(?:^|\.\s+)(?:Look|Here's the thing|The truth is|Sound familiar|Trust me)",
            ),
        ]
    })
}

/// Any contraction suffix, for the contraction-density tally.
pub fn contraction_re() -> &'static Regex {
    CONTRACTION_RE.get_or_init(|| Regex::new(r"'(?:t|s|re|ve|ll|d|m)\b").unwrap())
}

/// Bare numbers and figures.
pub fn number_re() -> &'static Regex {
    NUMBER_RE.get_or_init(|| Regex::new(r"\b\d+(?:,\d{3})*(?:\.\d+)?\b").unwrap())
}

/// Passive-voice indicator: to-be auxiliary followed by an -ed form.
pub fn passive_re() -> &'static Regex {
    PASSIVE_RE.get_or_init(|| Regex::new(r"\b(?:is|are|was|were|been|being)\s+\w+ed\b").unwrap())
}

/// Total match count of a catalog over a text.
pub fn match_count(rules: &[PatternRule], text: &str) -> usize {
    rules
        .iter()
        .map(|r| r.pattern.find_iter(text).count())
        .sum()
}

/// Weighted match count; rule weights scale each pattern's
/// contribution to the density figures.
pub fn weighted_count(rules: &[PatternRule], text: &str) -> f64 {
    rules
        .iter()
        .map(|r| r.pattern.find_iter(text).count() as f64 * r.weight)
        .sum()
}

/// First few distinct matched strings, for issue messages.
pub fn sample_matches(rules: &[PatternRule], text: &str, limit: usize) -> Vec<String> {
    let mut samples = Vec::new();
    for rule in rules {
        for m in rule.pattern.find_iter(text).take(2) {
            let s = m.as_str().trim().to_string();
            if !samples.contains(&s) {
                samples.push(s);
            }
            if samples.len() >= limit {
                return samples;
            }
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filler_catalog_matches() {
        let text = "when it comes to growth, leverage your synergy going forward";
        assert_eq!(match_count(filler_phrases(), text), 4);
    }

    #[test]
    fn test_vague_catalog_matches() {
        let text = "many people really think this is very important";
        assert_eq!(match_count(vague_words(), text), 4);
    }

    #[test]
    fn test_specificity_patterns() {
        let text = "Revenue grew 42% to $1,200 in 2024 after March 3 according to data.";
        assert!(match_count(specificity_patterns(), text) >= 4);
    }

    #[test]
    fn test_conversational_patterns() {
        let text = "Here's the catch (a big one). Don't skip it. Sound familiar?";
        assert!(match_count(conversational_patterns(), text) >= 3);
    }

    #[test]
    fn test_sample_matches_dedup() {
        let samples = sample_matches(vague_words(), "very very very important", 5);
        assert!(samples.contains(&"very".to_string()));
        assert_eq!(
            samples.iter().filter(|s| s.as_str() == "very").count(),
            1
        );
    }
}
