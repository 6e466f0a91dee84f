//! Text (terminal) reporter with colors and formatting

use crate::models::{GateState, RunRecord, Severity};
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn state_color(state: GateState) -> &'static str {
    match state {
        GateState::Accepted => "\x1b[32m", // Green
        GateState::Escalated => "\x1b[31m", // Red
        _ => "\x1b[33m",
    }
}

fn severity_color(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical => "\x1b[31m", // Red
        Severity::Warning => "\x1b[33m",  // Yellow
        Severity::Suggestion => "\x1b[34m", // Blue
    }
}

fn severity_tag(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical => "[C]",
        Severity::Warning => "[W]",
        Severity::Suggestion => "[S]",
    }
}

fn format_score(score: f64) -> String {
    let color = if score >= 80.0 {
        "\x1b[32m"
    } else if score >= 60.0 {
        "\x1b[33m"
    } else {
        "\x1b[31m"
    };
    format!("{color}{:.0}{RESET}", score)
}

/// Render a run record as formatted terminal output
pub fn render(record: &RunRecord) -> Result<String> {
    let mut out = String::new();
    let composite = &record.composite_result;

    // Header
    let state_c = state_color(record.gate_state);
    out.push_str(&format!("\n{BOLD}Prosegate Quality Report{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {BOLD}{}/100{RESET}  Grade: {BOLD}{}{RESET}  Gate: {state_c}{BOLD}{}{RESET}  Attempts: {}\n\n",
        composite.weighted_total, composite.grade, record.gate_state, record.attempts
    ));

    // Dimension scores
    out.push_str(&format!("{BOLD}DIMENSIONS{RESET}\n"));
    for dim in &composite.dimensions {
        out.push_str(&format!(
            "  {:<18} {}  {DIM}(weight {:.0}%){RESET}\n",
            dim.dimension.name(),
            format_score(dim.score),
            dim.weight * 100.0
        ));
    }
    out.push('\n');

    // Analysis snapshot
    let m = &record.metric_bundle;
    let k = &record.keyword_profile;
    out.push_str(&format!("{BOLD}ANALYSIS{RESET}\n"));
    out.push_str(&format!(
        "  Words: {}  Reading ease: {:.0}  Grade level: {:.1}  Passive: {:.0}%\n",
        m.word_count, m.reading_ease, m.grade_level, m.passive_ratio
    ));
    out.push_str(&format!(
        "  Keyword '{}': {} uses, {:.2}% density ({})\n",
        k.primary.keyword, k.primary.occurrences, k.primary.density, k.primary.stuffing
    ));
    out.push_str(&format!(
        "  SEO: {}  publish-ready: {}\n",
        format_score(record.seo_result.overall_score),
        record.seo_result.publish_ready
    ));
    if !record.scrub_report.is_clean() {
        out.push_str(&format!(
            "  Scrubbed: {} invisible chars, {} dashes replaced\n",
            record.scrub_report.unicode_removed,
            record.scrub_report.dashes_replaced
        ));
    }
    out.push('\n');

    // Priority fixes
    if !composite.priority_fixes.is_empty() {
        out.push_str(&format!("{BOLD}PRIORITY FIXES{RESET}\n"));
        for (i, fix) in composite.priority_fixes.iter().enumerate() {
            let sev_c = severity_color(&fix.issue.severity);
            out.push_str(&format!(
                "  {DIM}{:>2}{RESET}  {sev_c}{}{RESET}  [{}] {}\n",
                i + 1,
                severity_tag(&fix.issue.severity),
                fix.dimension.name(),
                fix.issue.message
            ));
            if let Some(fix_hint) = &fix.issue.fix {
                out.push_str(&format!("      {DIM}fix: {fix_hint}{RESET}\n"));
            }
        }
        out.push('\n');
    }

    // Escalation notes
    if let Some(notes) = &record.escalation {
        out.push_str(&format!("{BOLD}ESCALATION{RESET}\n"));
        out.push_str(&format!(
            "  Score deltas across attempts: {:?}\n",
            notes.score_deltas
        ));
        out.push_str(&format!(
            "  {} unresolved top issues handed to review\n\n",
            notes.top_issues.len()
        ));
    }

    match record.gate_state {
        GateState::Accepted => {
            out.push_str(&format!("{DIM}Document accepted for publication.{RESET}\n"))
        }
        GateState::Escalated => out.push_str(&format!(
            "{DIM}Automatic revision exhausted; route to editorial review.{RESET}\n"
        )),
        _ => {}
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_record;

    #[test]
    fn test_text_render_mentions_dimensions() {
        let record = test_record();
        let out = render(&record).unwrap();
        assert!(out.contains("DIMENSIONS"));
        assert!(out.contains("voice"));
        assert!(out.contains("structure_balance"));
        assert!(out.contains("Attempts:"));
    }

    #[test]
    fn test_text_render_shows_state() {
        let record = test_record();
        let out = render(&record).unwrap();
        assert!(out.contains(&record.gate_state.to_string()));
    }
}
