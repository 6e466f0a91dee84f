//! Shared text segmentation primitives
//!
//! One tokenizer feeds both the readability analyzer and the keyword
//! analyzer so cross-component figures (word counts, densities) stay
//! consistent. Everything here is deterministic and dependency-free:
//! syllables come from a vowel-group heuristic, not a lookup table.

/// Split text into whitespace-delimited words.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Lowercased token with punctuation trimmed from both ends.
///
/// "Podcasting," -> "podcasting", "(really)" -> "really". Interior
/// apostrophes and hyphens survive so contractions stay one token.
pub fn normalize_token(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Split text into sentences on terminator runs (. ! ?).
///
/// Empty fragments are dropped; no attempt is made to special-case
/// abbreviations, matching the rest of the engine's fixed rules.
pub fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split text into paragraphs on blank lines.
pub fn paragraphs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' {
            // A newline followed by only whitespace up to the next
            // newline ends the paragraph.
            let mut j = i + 1;
            while j < bytes.len() && (bytes[j] == b' ' || bytes[j] == b'\t' || bytes[j] == b'\r') {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'\n' {
                let para = text[start..i].trim();
                if !para.is_empty() {
                    out.push(para);
                }
                while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                    j += 1;
                }
                start = j;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

/// Count syllables in a word via vowel groups (a e i o u y).
///
/// Words with letters always count at least one syllable; tokens with
/// no letters (bare numbers, punctuation) count zero.
pub fn syllables(word: &str) -> usize {
    let clean: String = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_lowercase();
    if clean.is_empty() {
        return 0;
    }

    let mut groups = 0;
    let mut in_group = false;
    for c in clean.chars() {
        let is_vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !in_group {
            groups += 1;
        }
        in_group = is_vowel;
    }
    groups.max(1)
}

/// Count ASCII letters in a word (Coleman-Liau input).
pub fn letters(word: &str) -> usize {
    word.chars().filter(|c| c.is_ascii_alphabetic()).count()
}

/// Population variance of a sample.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}
