//! Quality gate pipeline
//!
//! Sequences scrub -> analyze -> score and drives the bounded
//! revise/rescore loop:
//!
//! ```text
//! Draft --scrub--> Scrubbed --score--> Scored
//! Scored --pass--> Accepted
//! Scored --fail, revisions < max--> Revising --revise--> Scrubbed
//! Scored --fail, revisions == max--> Escalated
//! ```
//!
//! The pipeline performs no text analysis itself; it owns the document
//! for the duration of the run and threads the attempt history through
//! each transition as an explicit value. Escalation is a terminal,
//! reportable outcome, never an error.

mod reviser;

pub use reviser::{AutoReviser, NoopReviser, Reviser};

use crate::config::GateConfig;
use crate::document::Document;
use crate::error::GateError;
use crate::models::{
    CompositeResult, EscalationNotes, GateState, Issue, KeywordProfile, MetricBundle, RunRecord,
    ScrubReport, SeoReport,
};
use crate::{keywords, readability, scoring, scrub, seo};
use tracing::{debug, info, warn};

/// Result of a completed gate run: the canonical record plus the final
/// document for downstream hand-off.
#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub record: RunRecord,
    pub document: Document,
}

impl GateOutcome {
    pub fn accepted(&self) -> bool {
        self.record.gate_state == GateState::Accepted
    }

    /// CLI exit code: 0 accepted, 2 escalated.
    pub fn exit_code(&self) -> i32 {
        if self.accepted() {
            0
        } else {
            2
        }
    }
}

/// Latest analysis artifacts, replaced on every scoring pass
struct Analysis {
    bundle: MetricBundle,
    profile: KeywordProfile,
    seo: SeoReport,
}

/// The quality gate state machine
pub struct QualityGate {
    config: GateConfig,
    reviser: Box<dyn Reviser>,
}

impl QualityGate {
    /// Gate with the built-in deterministic reviser.
    pub fn new(config: GateConfig) -> Self {
        let reviser = Box::new(AutoReviser::new(config.primary_keyword.clone()));
        Self { config, reviser }
    }

    /// Swap in an external revision collaborator.
    pub fn with_reviser(mut self, reviser: Box<dyn Reviser>) -> Self {
        self.reviser = reviser;
        self
    }

    /// Run one document through the gate to a terminal state.
    pub fn run(&self, document: Document) -> Result<GateOutcome, GateError> {
        self.config.validate()?;

        let mut doc = document;
        let mut state = GateState::Draft;
        let mut scrub_report = ScrubReport::default();
        let mut history: Vec<CompositeResult> = Vec::new();
        let mut analysis: Option<Analysis> = None;
        let mut revisions = 0usize;

        loop {
            state = match state {
                GateState::Draft | GateState::Revising => {
                    let (cleaned, report) = scrub::scrub(&doc.body);
                    scrub_report.merge(&report);
                    if cleaned.trim().is_empty() {
                        return Err(GateError::EmptyDocument(" after scrubbing"));
                    }
                    doc = doc.with_body(cleaned);
                    GateState::Scrubbed
                }

                GateState::Scrubbed => {
                    let bundle = readability::analyze(&doc.plain_text());
                    let profile = keywords::analyze(
                        &doc,
                        &self.config.primary_keyword,
                        &self.config.secondary_keywords,
                    );
                    let seo_report = seo::rate(
                        &doc,
                        &bundle,
                        &profile,
                        &self.config.targets(),
                        self.config.seo_publish_threshold,
                    );
                    let composite = scoring::score(
                        &doc,
                        &bundle,
                        &profile,
                        &seo_report,
                        self.config.pass_threshold,
                    );
                    debug!(
                        attempt = history.len() + 1,
                        total = composite.weighted_total,
                        pass = composite.pass,
                        "scoring attempt complete"
                    );
                    history.push(composite);
                    analysis = Some(Analysis {
                        bundle,
                        profile,
                        seo: seo_report,
                    });
                    GateState::Scored
                }

                GateState::Scored => {
                    let last = history.last().expect("scored state implies an attempt");
                    if last.pass {
                        GateState::Accepted
                    } else if revisions < self.config.max_revisions {
                        revisions += 1;
                        info!(
                            revision = revisions,
                            total = last.weighted_total,
                            "score below threshold, revising"
                        );
                        match self.reviser.revise(&doc, last) {
                            Ok(revised) => {
                                doc = revised;
                                GateState::Revising
                            }
                            Err(e) => {
                                warn!("reviser failed, escalating: {e}");
                                GateState::Escalated
                            }
                        }
                    } else {
                        GateState::Escalated
                    }
                }

                terminal @ (GateState::Accepted | GateState::Escalated) => {
                    return Ok(self.finish(terminal, doc, scrub_report, history, analysis));
                }
            };
        }
    }

    fn finish(
        &self,
        state: GateState,
        doc: Document,
        scrub_report: ScrubReport,
        history: Vec<CompositeResult>,
        analysis: Option<Analysis>,
    ) -> GateOutcome {
        let analysis = analysis.expect("terminal state implies at least one analysis");
        let final_result = history.last().expect("terminal state implies an attempt");

        let escalation = (state == GateState::Escalated).then(|| {
            let score_deltas: Vec<i64> = history
                .windows(2)
                .map(|w| w[1].weighted_total as i64 - w[0].weighted_total as i64)
                .collect();
            let top_issues: Vec<Issue> = final_result
                .priority_fixes
                .iter()
                .map(|f| f.issue.clone())
                .collect();
            EscalationNotes {
                final_result: final_result.clone(),
                score_deltas,
                top_issues,
            }
        });

        info!(
            state = %state,
            attempts = history.len(),
            total = final_result.weighted_total,
            "gate run finished"
        );

        let record = RunRecord {
            scrub_report,
            metric_bundle: analysis.bundle,
            keyword_profile: analysis.profile,
            seo_result: analysis.seo,
            composite_result: final_result.clone(),
            attempts: history.len(),
            attempt_history: history,
            gate_state: state,
            escalation,
            generated_at: chrono::Utc::now(),
        };

        GateOutcome {
            record,
            document: doc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeoTargets;

    fn config() -> GateConfig {
        GateConfig {
            primary_keyword: "podcast growth".to_string(),
            // Small targets keep the test fixtures short
            targets: Some(SeoTargets {
                min_word_count: 20,
                optimal_word_count: 40,
                max_word_count: 4000,
                min_h2_sections: 1,
                optimal_h2_sections: 2,
                min_internal_links: 0,
                optimal_internal_links: 1,
                min_external_links: 0,
                optimal_external_links: 1,
                ..SeoTargets::article()
            }),
            ..Default::default()
        }
    }

    fn weak_document() -> Document {
        Document::from_string(
            "Generic text that will not pass. It is vague and has no keyword.",
            None,
            None,
        )
    }

    #[test]
    fn test_invalid_config_rejected_before_analysis() {
        let gate = QualityGate::new(GateConfig::default());
        let err = gate.run(weak_document()).unwrap_err();
        assert!(matches!(err, GateError::Config(_)));
    }

    #[test]
    fn test_always_failing_document_escalates_after_two_revisions() {
        let gate = QualityGate::new(config()).with_reviser(Box::new(NoopReviser));
        let outcome = gate.run(weak_document()).unwrap();
        let record = &outcome.record;

        assert_eq!(record.gate_state, GateState::Escalated);
        // Initial attempt plus one rescore per revision
        assert_eq!(record.attempts, 3);
        assert_eq!(record.attempt_history.len(), 3);

        let notes = record.escalation.as_ref().expect("escalation notes");
        assert_eq!(notes.score_deltas.len(), 2);
        assert!(!notes.top_issues.is_empty());
        // Identical document each time: deltas are zero
        assert!(notes.score_deltas.iter().all(|&d| d == 0));
    }

    #[test]
    fn test_escalated_exit_code() {
        let gate = QualityGate::new(config()).with_reviser(Box::new(NoopReviser));
        let outcome = gate.run(weak_document()).unwrap();
        assert!(!outcome.accepted());
        assert_eq!(outcome.exit_code(), 2);
    }

    #[test]
    fn test_empty_after_scrub_is_input_error() {
        let gate = QualityGate::new(config());
        let doc = Document::from_string("\u{200B}\u{FEFF}\u{00AD}", None, None);
        assert!(matches!(
            gate.run(doc),
            Err(GateError::EmptyDocument(_))
        ));
    }

    #[test]
    fn test_failing_reviser_escalates() {
        struct FailingReviser;
        impl Reviser for FailingReviser {
            fn revise(
                &self,
                _document: &Document,
                _failing: &CompositeResult,
            ) -> anyhow::Result<Document> {
                anyhow::bail!("external collaborator unavailable")
            }
        }

        let gate = QualityGate::new(config()).with_reviser(Box::new(FailingReviser));
        let outcome = gate.run(weak_document()).unwrap();
        assert_eq!(outcome.record.gate_state, GateState::Escalated);
        assert_eq!(outcome.record.attempts, 1);
    }
}
