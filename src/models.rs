//! Core data models for Prosegate
//!
//! These models are used throughout the codebase for representing
//! scrub reports, analysis metrics, issues, and gate results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generate a deterministic issue ID based on content hash.
///
/// Stable IDs keep repeated runs on unchanged text byte-identical,
/// enabling:
/// - Diffing gate output across revisions
/// - Suppression/tracking by ID in downstream tooling
/// - The determinism properties the test suite asserts
///
/// The ID is a 16-character hex string derived from hashing the rule
/// identifier and the issue message.
pub fn deterministic_issue_id(rule: &str, message: &str) -> String {
    // md5 is stable across Rust versions; DefaultHasher is not.
    let input = format!("{rule}\n{message}");
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}

/// Convert a 0-100 score to a letter grade.
pub fn grade_from_score(score: f64) -> String {
    match score {
        s if s >= 90.0 => "A".to_string(),
        s if s >= 80.0 => "B".to_string(),
        s if s >= 70.0 => "C".to_string(),
        s if s >= 60.0 => "D".to_string(),
        _ => "F".to_string(),
    }
}

/// Severity levels for issues
///
/// Critical issues block publish-readiness regardless of score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Suggestion,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Suggestion => write!(f, "suggestion"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A single scoring issue
///
/// Issues are keyed by a stable kebab-case rule ID so rule catalogs can
/// grow without touching scoring logic.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Issue {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub rule: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub fix: Option<String>,
    /// The measured value that triggered the rule, when one exists
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl Issue {
    pub fn new(rule: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        let rule = rule.into();
        let message = message.into();
        Self {
            id: deterministic_issue_id(&rule, &message),
            rule,
            severity,
            message,
            fix: None,
            value: None,
        }
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Per-run scrub statistics
///
/// One counter per invisible-character category plus the dash
/// replacements broken down by decision rule. A clean input yields a
/// report with every counter at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubReport {
    /// Total invisible characters removed, all categories
    pub unicode_removed: usize,
    pub zero_width_removed: usize,
    pub byte_order_marks_removed: usize,
    pub spacing_variants_removed: usize,
    pub soft_hyphens_removed: usize,
    pub word_joiners_removed: usize,
    pub format_controls_removed: usize,
    pub dashes_replaced: usize,
    pub dash_to_comma: usize,
    pub dash_to_semicolon: usize,
    pub dash_to_period: usize,
    pub dash_dropped: usize,
    pub whitespace_fixes: usize,
}

impl ScrubReport {
    /// True when the scrub made no change at all
    pub fn is_clean(&self) -> bool {
        self.unicode_removed == 0 && self.dashes_replaced == 0 && self.whitespace_fixes == 0
    }

    /// Fold another scrub pass's counters into this report. The gate
    /// re-scrubs after each revision; the run record carries the totals.
    pub fn merge(&mut self, other: &ScrubReport) {
        self.unicode_removed += other.unicode_removed;
        self.zero_width_removed += other.zero_width_removed;
        self.byte_order_marks_removed += other.byte_order_marks_removed;
        self.spacing_variants_removed += other.spacing_variants_removed;
        self.soft_hyphens_removed += other.soft_hyphens_removed;
        self.word_joiners_removed += other.word_joiners_removed;
        self.format_controls_removed += other.format_controls_removed;
        self.dashes_replaced += other.dashes_replaced;
        self.dash_to_comma += other.dash_to_comma;
        self.dash_to_semicolon += other.dash_to_semicolon;
        self.dash_to_period += other.dash_to_period;
        self.dash_dropped += other.dash_dropped;
        self.whitespace_fixes += other.whitespace_fixes;
    }
}

/// Readability formula outputs plus derived structural statistics
///
/// Created once per scoring pass and read-only afterward. Empty input
/// produces a bundle of zeros, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricBundle {
    pub word_count: usize,
    pub sentence_count: usize,
    pub syllable_count: usize,
    pub reading_ease: f64,
    pub grade_level: f64,
    pub fog_index: f64,
    pub smog_index: f64,
    pub coleman_liau_index: f64,
    pub automated_readability_index: f64,
    pub avg_sentence_length: f64,
    pub sentence_length_variance: f64,
    pub long_sentences: usize,
    pub very_long_sentences: usize,
    pub paragraph_count: usize,
    pub avg_sentences_per_paragraph: f64,
    pub long_paragraphs: usize,
    pub longest_paragraph_sentences: usize,
    pub passive_ratio: f64,
    pub complex_word_ratio: f64,
    pub transition_per_100: f64,
    pub rhythm_score: f64,
    pub monotonous_windows: usize,
    /// Banded 0-100 score derived from the metrics above
    pub overall_score: f64,
}

/// Keyword density classification bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StuffingRisk {
    UnderOptimized,
    Low,
    Optimal,
    Borderline,
    HighRisk,
}

impl StuffingRisk {
    /// Classify a density percentage. Pure function; the band cutoffs
    /// are 0.5 / 1.0 / 2.0 / 3.0 with 3.0 still borderline.
    pub fn from_density(density: f64) -> Self {
        if density < 0.5 {
            StuffingRisk::UnderOptimized
        } else if density < 1.0 {
            StuffingRisk::Low
        } else if density < 2.0 {
            StuffingRisk::Optimal
        } else if density <= 3.0 {
            StuffingRisk::Borderline
        } else {
            StuffingRisk::HighRisk
        }
    }
}

impl std::fmt::Display for StuffingRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StuffingRisk::UnderOptimized => write!(f, "under_optimized"),
            StuffingRisk::Low => write!(f, "low"),
            StuffingRisk::Optimal => write!(f, "optimal"),
            StuffingRisk::Borderline => write!(f, "borderline"),
            StuffingRisk::HighRisk => write!(f, "high_risk"),
        }
    }
}

/// Presence of a keyword at each required location
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalPlacements {
    pub in_title: bool,
    pub in_meta_description: bool,
    pub in_first_100_words: bool,
    pub in_heading: bool,
    pub in_closing: bool,
}

/// Per-keyword analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordStats {
    pub keyword: String,
    pub occurrences: usize,
    pub density: f64,
    pub placements: CriticalPlacements,
    pub stuffing: StuffingRisk,
    /// Secondary headings containing the keyword / total secondary headings
    pub heading_matches: usize,
    pub heading_count: usize,
}

/// A group of co-occurring terms within the document's sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCluster {
    pub id: usize,
    pub terms: Vec<String>,
    pub weight: f64,
    pub sections: Vec<usize>,
}

/// Per-section keyword occurrence, for reporting only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionHeat {
    pub section: usize,
    pub heading: String,
    pub occurrences: usize,
    pub density: f64,
    /// 0-5 heat level
    pub heat: u8,
}

/// Full keyword/topic analysis for one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordProfile {
    pub word_count: usize,
    pub primary: KeywordStats,
    pub secondary: Vec<KeywordStats>,
    pub stuffing_issues: Vec<Issue>,
    pub clusters: Vec<TopicCluster>,
    pub heatmap: Vec<SectionHeat>,
    pub related_terms: Vec<String>,
}

/// SEO rule categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeoCategory {
    Content,
    Keywords,
    Meta,
    Structure,
    Links,
    Readability,
}

impl SeoCategory {
    /// Default category weight in the overall SEO score
    pub fn weight(&self) -> f64 {
        match self {
            SeoCategory::Content => 0.20,
            SeoCategory::Keywords => 0.25,
            SeoCategory::Meta => 0.15,
            SeoCategory::Structure => 0.15,
            SeoCategory::Links => 0.15,
            SeoCategory::Readability => 0.10,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SeoCategory::Content => "content",
            SeoCategory::Keywords => "keywords",
            SeoCategory::Meta => "meta",
            SeoCategory::Structure => "structure",
            SeoCategory::Links => "links",
            SeoCategory::Readability => "readability",
        }
    }
}

/// One rated SEO category with its sub-score and issues
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: SeoCategory,
    pub score: f64,
    pub issues: Vec<Issue>,
}

/// Complete SEO rating result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoReport {
    pub categories: Vec<CategoryScore>,
    pub overall_score: f64,
    pub publish_ready: bool,
}

impl SeoReport {
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.categories.iter().flat_map(|c| c.issues.iter())
    }

    pub fn critical_count(&self) -> usize {
        self.issues()
            .filter(|i| i.severity == Severity::Critical)
            .count()
    }
}

/// Composite scoring dimensions with fixed weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Voice,
    Specificity,
    StructureBalance,
    Seo,
    Readability,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Voice,
        Dimension::Specificity,
        Dimension::StructureBalance,
        Dimension::Seo,
        Dimension::Readability,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            Dimension::Voice => 0.30,
            Dimension::Specificity => 0.25,
            Dimension::StructureBalance => 0.20,
            Dimension::Seo => 0.15,
            Dimension::Readability => 0.10,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Voice => "voice",
            Dimension::Specificity => "specificity",
            Dimension::StructureBalance => "structure_balance",
            Dimension::Seo => "seo",
            Dimension::Readability => "readability",
        }
    }
}

/// One scored dimension within a composite result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    pub score: f64,
    pub weight: f64,
    pub issues: Vec<Issue>,
}

/// A prioritized fix: an issue ranked by how many weighted points its
/// dimension is losing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityFix {
    pub dimension: Dimension,
    pub impact: f64,
    pub issue: Issue,
}

/// The quality-gate result for one scoring attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeResult {
    pub dimensions: Vec<DimensionScore>,
    /// Weighted sum rounded to an integer 0-100
    pub weighted_total: u32,
    pub pass: bool,
    pub grade: String,
    pub priority_fixes: Vec<PriorityFix>,
}

impl CompositeResult {
    /// The dimension currently losing the most weighted points
    pub fn weakest_dimension(&self) -> Option<&DimensionScore> {
        self.dimensions.iter().max_by(|a, b| {
            let da = a.weight * (100.0 - a.score);
            let db = b.weight * (100.0 - b.score);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

/// Pipeline state for one gate run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    Draft,
    Scrubbed,
    Scored,
    Revising,
    Escalated,
    Accepted,
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateState::Draft => write!(f, "Draft"),
            GateState::Scrubbed => write!(f, "Scrubbed"),
            GateState::Scored => write!(f, "Scored"),
            GateState::Revising => write!(f, "Revising"),
            GateState::Escalated => write!(f, "Escalated"),
            GateState::Accepted => write!(f, "Accepted"),
        }
    }
}

/// Structured hand-off record for the external review queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationNotes {
    pub final_result: CompositeResult,
    /// Score change between consecutive attempts
    pub score_deltas: Vec<i64>,
    pub top_issues: Vec<Issue>,
}

/// The canonical per-run output record
///
/// Field names are stable keys; consumers must treat additional keys as
/// forward-compatible additions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub scrub_report: ScrubReport,
    pub metric_bundle: MetricBundle,
    pub keyword_profile: KeywordProfile,
    pub seo_result: SeoReport,
    /// Final attempt's composite result
    pub composite_result: CompositeResult,
    /// Append-only history of every scoring attempt, oldest first
    pub attempt_history: Vec<CompositeResult>,
    pub gate_state: GateState,
    /// Completed score evaluations
    pub attempts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation: Option<EscalationNotes>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_issue_id_stable() {
        let a = deterministic_issue_id("keyword-density", "density too low");
        let b = deterministic_issue_id("keyword-density", "density too low");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);

        let c = deterministic_issue_id("keyword-density", "density too high");
        assert_ne!(a, c);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Suggestion);
    }

    #[test]
    fn test_stuffing_band_boundaries() {
        assert_eq!(
            StuffingRisk::from_density(0.49),
            StuffingRisk::UnderOptimized
        );
        assert_eq!(StuffingRisk::from_density(0.5), StuffingRisk::Low);
        assert_eq!(StuffingRisk::from_density(1.0), StuffingRisk::Optimal);
        assert_eq!(StuffingRisk::from_density(2.0), StuffingRisk::Borderline);
        assert_eq!(StuffingRisk::from_density(3.0), StuffingRisk::Borderline);
        assert_eq!(StuffingRisk::from_density(3.01), StuffingRisk::HighRisk);
    }

    #[test]
    fn test_scrub_report_clean() {
        let report = ScrubReport::default();
        assert!(report.is_clean());

        let dirty = ScrubReport {
            unicode_removed: 1,
            zero_width_removed: 1,
            ..Default::default()
        };
        assert!(!dirty.is_clean());
    }

    #[test]
    fn test_dimension_weights_sum_to_one() {
        let total: f64 = Dimension::ALL.iter().map(|d| d.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(grade_from_score(95.0), "A");
        assert_eq!(grade_from_score(85.0), "B");
        assert_eq!(grade_from_score(70.0), "C");
        assert_eq!(grade_from_score(60.0), "D");
        assert_eq!(grade_from_score(10.0), "F");
    }
}
