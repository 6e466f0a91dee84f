//! Unicode scrubber
//!
//! Removes invisible/format-control characters from a fixed catalog and
//! replaces long dashes with contextually appropriate punctuation.
//! Scrubbing never fails: clean input yields a zero report and the
//! unchanged string, and the whole pass is idempotent.

use crate::models::ScrubReport;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Invisible-character categories. Every code point here is removed
/// unconditionally; the category picks the report counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Invisible {
    ZeroWidth,
    ByteOrderMark,
    SpacingVariant,
    SoftHyphen,
    WordJoiner,
    FormatControl,
}

/// Fixed catalog of invisible and format-control code points.
fn classify_invisible(c: char) -> Option<Invisible> {
    match c {
        '\u{200B}' | '\u{200C}' => Some(Invisible::ZeroWidth),
        '\u{FEFF}' => Some(Invisible::ByteOrderMark),
        // Typography spacing variants: narrow no-break space, no-break
        // space, em/three-per-em/four-per-em/thin/hair spaces
        '\u{202F}' | '\u{00A0}' | '\u{2003}' | '\u{2004}' | '\u{2005}' | '\u{2009}'
        | '\u{200A}' => Some(Invisible::SpacingVariant),
        '\u{00AD}' => Some(Invisible::SoftHyphen),
        '\u{2060}' => Some(Invisible::WordJoiner),
        // Remaining format controls: ZWJ, directional marks and
        // embeddings, invisible operators, deprecated format chars
        '\u{200D}' | '\u{200E}' | '\u{200F}' | '\u{061C}' => Some(Invisible::FormatControl),
        '\u{202A}'..='\u{202E}' => Some(Invisible::FormatControl),
        '\u{2061}'..='\u{2064}' => Some(Invisible::FormatControl),
        '\u{206A}'..='\u{206F}' => Some(Invisible::FormatControl),
        _ => None,
    }
}

const EM_DASH: char = '\u{2014}';

/// Window size inspected on each side of a dash
const CONTEXT_WINDOW: usize = 50;

static ATTRIBUTION_BEFORE_RE: OnceLock<Regex> = OnceLock::new();
static ATTRIBUTION_AFTER_RE: OnceLock<Regex> = OnceLock::new();
static FINITE_VERB_RE: OnceLock<Regex> = OnceLock::new();
static MULTI_SPACE_RE: OnceLock<Regex> = OnceLock::new();
static SPACE_BEFORE_PUNCT_RE: OnceLock<Regex> = OnceLock::new();
static EXTRA_NEWLINES_RE: OnceLock<Regex> = OnceLock::new();

const CONJUNCTIVE_ADVERBS: &[&str] = &[
    "however",
    "therefore",
    "moreover",
    "furthermore",
    "nevertheless",
    "consequently",
    "thus",
    "hence",
];

/// Scrub a text body: remove the invisible-character catalog, replace
/// long dashes per the context decision table, then normalize the
/// whitespace disturbed by removals.
pub fn scrub(text: &str) -> (String, ScrubReport) {
    let mut report = ScrubReport::default();

    let stripped = remove_invisible(text, &mut report);
    let replaced = replace_dashes(&stripped, &mut report);
    let cleaned = clean_whitespace(&replaced, &mut report);

    if !report.is_clean() {
        debug!(
            unicode = report.unicode_removed,
            dashes = report.dashes_replaced,
            whitespace = report.whitespace_fixes,
            "scrubbed document"
        );
    }

    (cleaned, report)
}

fn remove_invisible(text: &str, report: &mut ScrubReport) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        let Some(category) = classify_invisible(c) else {
            out.push(c);
            continue;
        };

        report.unicode_removed += 1;
        match category {
            Invisible::ZeroWidth => {
                report.zero_width_removed += 1;
                // A zero-width space squeezed between word characters
                // becomes a real space so the words stay separate.
                let prev_word = i > 0 && chars[i - 1].is_alphanumeric();
                let next_word = chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
                if c == '\u{200B}' && prev_word && next_word {
                    out.push(' ');
                }
            }
            Invisible::ByteOrderMark => report.byte_order_marks_removed += 1,
            Invisible::SpacingVariant => report.spacing_variants_removed += 1,
            Invisible::SoftHyphen => report.soft_hyphens_removed += 1,
            Invisible::WordJoiner => report.word_joiners_removed += 1,
            Invisible::FormatControl => report.format_controls_removed += 1,
        }
    }

    out
}

fn replace_dashes(text: &str, report: &mut ScrubReport) -> String {
    // Normalize two-em and three-em dashes to the canonical long dash
    let normalized: String = text
        .chars()
        .map(|c| match c {
            '\u{2E3A}' | '\u{2E3B}' => EM_DASH,
            other => other,
        })
        .collect();

    if !normalized.contains(EM_DASH) {
        return normalized;
    }

    let chars: Vec<char> = normalized.chars().collect();
    let mut out = String::with_capacity(normalized.len());

    for (i, &c) in chars.iter().enumerate() {
        if c != EM_DASH {
            out.push(c);
            continue;
        }

        // Before-window comes from already-emitted output; after-window
        // stops at the next dash so each decision sees its own clause.
        let before: String = {
            let tail: Vec<char> = out.chars().rev().take(CONTEXT_WINDOW).collect();
            tail.into_iter().rev().collect()
        };
        let after: String = chars[i + 1..]
            .iter()
            .copied()
            .take_while(|&a| a != EM_DASH)
            .take(CONTEXT_WINDOW)
            .collect();

        let replacement = dash_replacement(before.trim(), after.trim());
        report.dashes_replaced += 1;
        match replacement {
            ", " => report.dash_to_comma += 1,
            "; " => report.dash_to_semicolon += 1,
            ". " => report.dash_to_period += 1,
            _ => report.dash_dropped += 1,
        }
        out.push_str(replacement);
    }

    out
}

/// Decision table for one long dash given its surrounding clauses.
fn dash_replacement(before: &str, after: &str) -> &'static str {
    // Dash directly before a sentence terminator: drop it, keep the
    // terminator.
    if matches!(after.chars().next(), Some('.' | '!' | '?')) {
        return "";
    }

    // Attribution or citation
    let attr_before = ATTRIBUTION_BEFORE_RE
        .get_or_init(|| Regex::new(r"(?i)\b(said|wrote|noted|according to|via)\s*$").unwrap());
    let attr_after =
        ATTRIBUTION_AFTER_RE.get_or_init(|| Regex::new(r"^[A-Z][a-z]+ [A-Z]").unwrap());
    if attr_before.is_match(before) || attr_after.is_match(after) {
        return ", ";
    }

    // Independent clauses on both sides
    let verb = FINITE_VERB_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(is|are|was|were|has|have|had|do|does|did|can|could|will|would|should|may|might)\b",
        )
        .unwrap()
    });
    let before_tail = tail_chars(before, 30);
    let after_head = head_chars(after, 30);
    if verb.is_match(&before_tail) && verb.is_match(&after_head) {
        let after_lower = after.to_lowercase();
        if CONJUNCTIVE_ADVERBS
            .iter()
            .any(|adv| after_lower.starts_with(adv))
        {
            return "; ";
        }
        // A capitalized continuation reads as a fresh sentence; a
        // lowercase one stays attached with a semicolon.
        if after.chars().next().is_some_and(|c| c.is_uppercase()) {
            return ". ";
        }
        return "; ";
    }

    // Everything else reads as a list item, parenthetical, or short
    // aside: a comma is the safe default.
    ", "
}

fn tail_chars(s: &str, n: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    let start = chars.len().saturating_sub(n);
    chars[start..].iter().collect()
}

fn head_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn clean_whitespace(text: &str, report: &mut ScrubReport) -> String {
    let multi_space = MULTI_SPACE_RE.get_or_init(|| Regex::new(r" {2,}").unwrap());
    let space_punct =
        SPACE_BEFORE_PUNCT_RE.get_or_init(|| Regex::new(r"[ \t]+([.,;:!?])").unwrap());
    let newlines = EXTRA_NEWLINES_RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap());

    report.whitespace_fixes += multi_space.find_iter(text).count();
    let text = multi_space.replace_all(text, " ");

    report.whitespace_fixes += space_punct.find_iter(&text).count();
    let text = space_punct.replace_all(&text, "$1");

    report.whitespace_fixes += newlines.find_iter(&text).count();
    let text = newlines.replace_all(&text, "\n\n");

    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_input_untouched() {
        let text = "Plain text with normal punctuation. Nothing to do here.";
        let (out, report) = scrub(text);
        assert_eq!(out, text);
        assert!(report.is_clean());
    }

    #[test]
    fn test_invisible_catalog_removed() {
        let text = "be\u{FEFF}fore\u{200B} after\u{00AD} done\u{2060}ok\u{00A0}x";
        let (out, report) = scrub(text);
        assert_eq!(report.byte_order_marks_removed, 1);
        assert_eq!(report.zero_width_removed, 1);
        assert_eq!(report.soft_hyphens_removed, 1);
        assert_eq!(report.word_joiners_removed, 1);
        assert_eq!(report.spacing_variants_removed, 1);
        assert!(!out.contains('\u{FEFF}'));
        assert!(!out.contains('\u{200B}'));
    }

    #[test]
    fn test_zero_width_between_words_becomes_space() {
        let (out, report) = scrub("pod\u{200B}cast");
        assert_eq!(out, "pod cast");
        assert_eq!(report.zero_width_removed, 1);
    }

    #[test]
    fn test_dash_attribution_to_comma() {
        let (out, report) = scrub("That was the point he said\u{2014}nothing more.");
        assert!(out.contains("said, nothing more."), "got: {out}");
        assert_eq!(report.dash_to_comma, 1);
    }

    #[test]
    fn test_dash_independent_clauses() {
        // Verbs on both sides, uppercase continuation: sentence break
        let (out, _) = scrub("The show was fine\u{2014}It was not great though.");
        assert!(out.contains("fine. It was"), "got: {out}");

        // Verbs on both sides, conjunctive adverb: semicolon
        let (out, report) = scrub("The plan is simple\u{2014}however, it will take time.");
        assert!(out.contains("simple; however"), "got: {out}");
        assert_eq!(report.dash_to_semicolon, 1);
    }

    #[test]
    fn test_dash_before_terminator_dropped() {
        let (out, report) = scrub("It just ended\u{2014}.");
        assert_eq!(out, "It just ended.");
        assert_eq!(report.dash_dropped, 1);
    }

    #[test]
    fn test_dash_default_comma() {
        let (out, report) = scrub("One thing\u{2014}a small aside.");
        assert_eq!(out, "One thing, a small aside.");
        assert_eq!(report.dash_to_comma, 1);
    }

    #[test]
    fn test_multi_em_dash_normalized() {
        let (out, report) = scrub("Start\u{2E3A}finish now.");
        assert!(!out.contains('\u{2E3A}'));
        assert_eq!(report.dashes_replaced, 1);
    }

    #[test]
    fn test_idempotence() {
        let dirty =
            "A\u{200B} messy\u{00A0}draft\u{2014}it has watermarks.  Double  spaces too.\n\n\n\nEnd.";
        let (once, first) = scrub(dirty);
        assert!(!first.is_clean());

        let (twice, second) = scrub(&once);
        assert_eq!(once, twice);
        assert!(second.is_clean(), "second report: {second:?}");

        let (thrice, third) = scrub(&twice);
        assert_eq!(twice, thrice);
        assert!(third.is_clean());
    }
}
