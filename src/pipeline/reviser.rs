//! Revision collaborators
//!
//! The fix step of the revise/rescore loop is pluggable: anything that
//! can take the failing composite result and hand back a revised
//! document. The built-in `AutoReviser` applies a bounded, fully
//! deterministic set of text fixes aimed at the weakest dimension's top
//! issues; richer rewriting belongs to external collaborators.

use crate::document::Document;
use crate::models::{CompositeResult, Dimension};
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// A revision collaborator invoked between scoring attempts.
pub trait Reviser {
    /// Produce a revised document from the failing result. The revised
    /// body re-enters the pipeline at the scrub stage.
    fn revise(&self, document: &Document, failing: &CompositeResult) -> Result<Document>;
}

/// Reviser that changes nothing. Useful for dry runs and for tests that
/// need a document to keep failing.
pub struct NoopReviser;

impl Reviser for NoopReviser {
    fn revise(&self, document: &Document, _failing: &CompositeResult) -> Result<Document> {
        Ok(document.clone())
    }
}

/// Plain-language replacements for cataloged filler phrasing
const FILLER_FIXES: &[(&str, &str)] = &[
    (r"(?i)\butilize\b", "use"),
    (r"(?i)\bleverage\b", "use"),
    (r"(?i)\bin order to\b", "to"),
    (r"(?i)\bdue to the fact that\b", "because"),
    (r"(?i)\bfurthermore\b", "also"),
    (r"(?i)\bmoreover\b", "also"),
    (r"(?i)\badditionally\b", "also"),
    (r"(?i)\bfacilitate\b", "help"),
    (r"(?i)\boptimal\b", "best"),
    (r"(?i)\brobust\b", "solid"),
    (r"(?i)\bseamless\b", "smooth"),
    (r"(?i)\bvery\b ", ""),
    (r"(?i)\breally\b ", ""),
];

static FILLER_FIX_RES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn filler_fix_res() -> &'static Vec<(Regex, &'static str)> {
    FILLER_FIX_RES.get_or_init(|| {
        FILLER_FIXES
            .iter()
            .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
            .collect()
    })
}

/// Built-in deterministic reviser.
///
/// Fixes are intentionally narrow: insert the primary keyword at a
/// missing critical placement and swap cataloged filler phrases for
/// plain alternatives. The same failing input always produces the same
/// revised output.
pub struct AutoReviser {
    primary_keyword: String,
}

impl AutoReviser {
    pub fn new(primary_keyword: impl Into<String>) -> Self {
        Self {
            primary_keyword: primary_keyword.into(),
        }
    }

    fn fix_rules<'a>(&self, failing: &'a CompositeResult) -> Vec<&'a str> {
        // Top issues of the weakest dimension first, then the global
        // priority list
        let mut rules: Vec<&str> = Vec::new();
        if let Some(weakest) = failing.weakest_dimension() {
            rules.extend(weakest.issues.iter().map(|i| i.rule.as_str()));
        }
        rules.extend(failing.priority_fixes.iter().map(|f| f.issue.rule.as_str()));
        rules
    }

    fn insert_keyword_in_opening(&self, body: &str) -> String {
        let lead = format!("{} is what this piece is about. ", self.primary_keyword);
        // After the H1 if there is one, otherwise at the very top
        let mut lines: Vec<&str> = body.lines().collect();
        let insert_at = lines
            .iter()
            .position(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
            .unwrap_or(lines.len());
        let owned = format!("{lead}{}", lines.get(insert_at).copied().unwrap_or(""));
        if insert_at < lines.len() {
            lines[insert_at] = &owned;
            lines.join("\n")
        } else {
            format!("{body}\n\n{lead}")
        }
    }

    fn append_keyword_to_closing(&self, body: &str) -> String {
        format!(
            "{}\n\nThat is the case for {}.\n",
            body.trim_end(),
            self.primary_keyword
        )
    }
}

impl Reviser for AutoReviser {
    fn revise(&self, document: &Document, failing: &CompositeResult) -> Result<Document> {
        let rules = self.fix_rules(failing);
        let mut body = document.body.clone();
        let mut applied = 0usize;

        if rules
            .iter()
            .any(|r| *r == "keyword-in-first-100-words" || *r == "keyword-in-h1")
        {
            body = self.insert_keyword_in_opening(&body);
            applied += 1;
        }

        if rules.iter().any(|r| *r == "keyword-in-closing") {
            body = self.append_keyword_to_closing(&body);
            applied += 1;
        }

        let voice_flagged = rules.iter().any(|r| r.starts_with("voice-filler"))
            || failing
                .dimensions
                .iter()
                .any(|d| d.dimension == Dimension::Voice && d.score < 70.0);
        if voice_flagged {
            for (re, replacement) in filler_fix_res() {
                if re.is_match(&body) {
                    body = re.replace_all(&body, *replacement).into_owned();
                    applied += 1;
                }
            }
        }

        debug!(fixes = applied, "auto-revision applied");
        Ok(document.with_body(body))
    }
}
