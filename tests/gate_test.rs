//! Integration tests for the quality gate
//!
//! Exercises the full pipeline against in-memory fixture documents:
//! scrub idempotence, analysis determinism, threshold boundaries,
//! bounded retries with escalation, and the CLI binary's JSON channel.

use prosegate::config::{GateConfig, SeoTargets};
use prosegate::document::Document;
use prosegate::models::{GateState, Severity};
use prosegate::pipeline::{NoopReviser, QualityGate};
use prosegate::{keywords, readability, scoring, scrub, seo};

/// A document built to clear the gate under `relaxed_config`
fn good_document() -> Document {
    let body = "\
# Podcast Growth That You Can Measure

Podcast growth isn't luck. We grew from 900 to 4,200 listeners in 2024, and
you're about to see the exact steps. Here's the thing: it took 14 weeks, and
for example the first six weeks looked like nothing was happening at all.

## What Moved the Needle

Three changes drove 80% of the gains. However, each one is boring on its own,
and none of them cost a dollar to put in place. Don't skip the basics:

- Weekly publishing with no gaps for 14 weeks straight
- Titles rewritten around one clear promise per episode
- A 30-second cold open instead of a long welcome intro
- Show notes trimmed down to a single readable page
- A standing ask at the end of each episode for one referral
- Guest episodes swapped with shows of a matching size
- Old episodes re-titled once their search traffic stalled

## Where Podcast Growth Starts

Pick one show-level change and run it for a month before touching anything
else. See [our checklist](/checklist) and [the full data](https://example.com/data)
if you want the numbers behind this plan.

## What We'd Skip Next Time

Paid promotion cost us $1,400 and brought 85 listeners. That's $16 per
listener, which doesn't work at indie budgets. Organic podcast growth beat
paid channels in every month we measured, and it kept compounding after the
spending stopped.
";
    Document::from_string(
        body,
        Some("Podcast Growth: 14 Weeks of Real Listener Numbers (2024)".to_string()),
        Some(
            "How one indie show grew from 900 to 4,200 listeners in 14 weeks, with the \
             exact podcast growth steps we took, what each change cost, and which \
             tactic failed."
                .to_string(),
        ),
    )
}

/// A document that cannot pass: vague, keyword-free, formal
fn hopeless_document() -> Document {
    Document::from_string(
        "Many things are generally considered very important. Several factors \
         typically matter. It is usually best to be quite careful.",
        None,
        None,
    )
}

fn relaxed_config() -> GateConfig {
    GateConfig {
        primary_keyword: "podcast growth".to_string(),
        targets: Some(SeoTargets {
            min_word_count: 100,
            optimal_word_count: 150,
            max_word_count: 4000,
            min_h2_sections: 2,
            optimal_h2_sections: 3,
            min_internal_links: 1,
            optimal_internal_links: 1,
            min_external_links: 1,
            optimal_external_links: 1,
            ..SeoTargets::article()
        }),
        ..Default::default()
    }
}

#[test]
fn good_document_is_accepted() {
    let outcome = QualityGate::new(relaxed_config())
        .run(good_document())
        .unwrap();
    let record = &outcome.record;

    assert_eq!(record.gate_state, GateState::Accepted, "record: {record:?}");
    assert_eq!(record.attempts, 1);
    assert!(record.composite_result.pass);
    assert!(record.escalation.is_none());
    assert_eq!(outcome.exit_code(), 0);

    let placements = record.keyword_profile.primary.placements;
    assert!(placements.in_title);
    assert!(placements.in_first_100_words);
    assert!(placements.in_heading);
    assert!(placements.in_closing);
}

#[test]
fn failing_document_escalates_after_exactly_two_revisions() {
    let gate = QualityGate::new(GateConfig {
        primary_keyword: "podcast growth".to_string(),
        ..Default::default()
    })
    .with_reviser(Box::new(NoopReviser));

    let outcome = gate.run(hopeless_document()).unwrap();
    let record = &outcome.record;

    assert_eq!(record.gate_state, GateState::Escalated);
    // Initial score plus one rescore per revision: 2 revisions, 3 attempts
    assert_eq!(record.attempts, 3);
    assert_eq!(record.attempt_history.len(), 3);
    assert_eq!(outcome.exit_code(), 2);

    let notes = record.escalation.as_ref().expect("escalation notes");
    assert_eq!(notes.score_deltas.len(), 2);
    assert!(!notes.top_issues.is_empty());
    assert_eq!(
        notes.final_result.weighted_total,
        record.composite_result.weighted_total
    );
}

#[test]
fn auto_reviser_improves_score_across_attempts() {
    // Default reviser, filler-heavy draft: later attempts should not
    // score worse than the first
    let body = "\
# Podcast Growth

In today's digital landscape, we utilize robust tools in order to leverage \
seamless synergy. Furthermore, it is important to note that many various \
things matter. Moreover, the optimal paradigm will facilitate the journey.
";
    let doc = Document::from_string(body, None, None);
    let outcome = QualityGate::new(relaxed_config()).run(doc).unwrap();
    let history = &outcome.record.attempt_history;

    assert!(history.len() > 1, "filler draft should need revision");
    let first = history.first().unwrap().weighted_total;
    let last = history.last().unwrap().weighted_total;
    assert!(last >= first, "first={first} last={last}");
}

#[test]
fn scrub_is_idempotent_over_the_gate_fixtures() {
    for doc in [good_document(), hopeless_document()] {
        let (once, _) = scrub::scrub(&doc.body);
        let (twice, second) = scrub::scrub(&once);
        assert_eq!(once, twice);
        assert!(second.is_clean(), "second pass report: {second:?}");
    }
}

#[test]
fn analysis_is_deterministic_end_to_end() {
    let config = relaxed_config();
    let gate = QualityGate::new(config);
    let a = gate.run(good_document()).unwrap();
    let b = gate.run(good_document()).unwrap();

    // Everything except the timestamp must be byte-identical
    let mut ja = serde_json::to_value(&a.record).unwrap();
    let mut jb = serde_json::to_value(&b.record).unwrap();
    ja.as_object_mut().unwrap().remove("generated_at");
    jb.as_object_mut().unwrap().remove("generated_at");
    assert_eq!(ja, jb);
}

/// Fixture with fully predictable non-SEO dimensions: voice 75 (no
/// contractions, capped passive penalty), specificity 55 (no vague
/// words, no figures), structure balance 100 (prose ratio in band).
fn boundary_document() -> Document {
    let body = "\
The launch plan was prepared by the committee before the season was started
in earnest. Each episode was recorded in the studio after the outline was
reviewed by the editors. The schedule was arranged so that the drafts were
checked before release. The artwork was designed by the staff and the music
was composed for the show.

- The outline template that the editors maintain for the drafts
- The recording checklist that the studio follows between sessions
- The review rotation that the board arranged for the committee
- The archive folder where finished artwork gets stored away
- The shared calendar where the schedule gets posted for the staff

The budget was approved after the proposal was presented to the board, and
the remaining funds were assigned to the archive of the show.
";
    Document::from_string(body, None, None)
}

#[test]
fn threshold_boundary_is_exact() {
    // Pin four dimensions with a fixed document, then steer the fifth
    // (the SEO pass-through) so the weighted sum lands exactly on the
    // boundary.
    let doc = boundary_document();
    let bundle = readability::analyze(&doc.plain_text());
    let profile = keywords::analyze(&doc, "podcast growth", &[]);

    let seo_report = |overall: f64| prosegate::models::SeoReport {
        categories: vec![],
        overall_score: overall,
        publish_ready: false,
    };

    let base = scoring::score(&doc, &bundle, &profile, &seo_report(0.0), 70);
    let dim = |d: prosegate::models::Dimension| {
        base.dimensions
            .iter()
            .find(|s| s.dimension == d)
            .unwrap()
            .score
    };
    assert_eq!(dim(prosegate::models::Dimension::Voice), 75.0);
    assert_eq!(dim(prosegate::models::Dimension::Specificity), 55.0);
    assert_eq!(dim(prosegate::models::Dimension::StructureBalance), 100.0);

    let rest: f64 = base
        .dimensions
        .iter()
        .filter(|d| d.dimension != prosegate::models::Dimension::Seo)
        .map(|d| d.score * d.weight)
        .sum();

    for (target, expect_pass) in [(70u32, true), (69u32, false)] {
        let needed = (target as f64 - rest) / 0.15;
        assert!(
            (0.0..=100.0).contains(&needed),
            "fixture out of range: rest={rest} needed={needed}"
        );
        let result = scoring::score(&doc, &bundle, &profile, &seo_report(needed), 70);
        assert_eq!(result.weighted_total, target);
        assert_eq!(result.pass, expect_pass, "total={}", result.weighted_total);
    }
}

#[test]
fn missing_placement_yields_warning_issue() {
    // Push the keyword's first appearance well past the first 100 words
    let intro = "The opening keeps talking about studio schedules and editing \
                 workflow without naming the subject at any point here. "
        .repeat(8);
    let doc = Document::from_string(
        format!("# Something Else Entirely\n\n{intro}\n\n## Later\n\npodcast growth finally appears here, far past the opening."),
        None,
        None,
    );
    let bundle = readability::analyze(&doc.plain_text());
    let profile = keywords::analyze(&doc, "podcast growth", &[]);
    assert!(!profile.primary.placements.in_first_100_words);

    let report = seo::rate(&doc, &bundle, &profile, &SeoTargets::article(), 80.0);
    let issue = report
        .issues()
        .find(|i| i.rule == "keyword-in-first-100-words")
        .expect("placement issue");
    assert_eq!(issue.severity, Severity::Warning);
    assert!(issue.message.contains("first_100_words"));
}

#[test]
fn cli_json_channel_has_stable_keys() {
    let dir = tempfile::tempdir().unwrap();
    let draft = dir.path().join("draft.md");
    std::fs::write(&draft, good_document().body).unwrap();

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_prosegate"))
        .args([
            "score",
            draft.to_str().unwrap(),
            "--keyword",
            "podcast growth",
            "--format",
            "json",
        ])
        .output()
        .expect("run prosegate binary");

    // 0 (accepted) and 2 (escalated) are both completed runs
    let code = output.status.code().unwrap_or(-1);
    assert!(code == 0 || code == 2, "exit code {code}: {output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("stdout is the JSON record");
    for key in [
        "scrub_report",
        "metric_bundle",
        "keyword_profile",
        "seo_result",
        "composite_result",
        "gate_state",
        "attempts",
    ] {
        assert!(parsed.get(key).is_some(), "missing key {key}");
    }
}

#[test]
fn cli_unreadable_document_is_input_error() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_prosegate"))
        .args(["score", "/nonexistent/draft.md", "--keyword", "x"])
        .output()
        .expect("run prosegate binary");
    assert_eq!(output.status.code(), Some(1));
}
