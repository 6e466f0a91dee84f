//! Gate configuration
//!
//! Loads per-document configuration from a `prosegate.toml` file and/or
//! CLI flags. All options are plain data handed to the components; the
//! engine keeps no hidden global configuration. Validation runs before
//! any analysis so configuration errors never produce partial scores.

use crate::error::GateError;
use crate::models::SeoCategory;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Page type selects the SEO guideline preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    #[default]
    Article,
    Landing,
}

impl std::str::FromStr for PageType {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "article" => Ok(PageType::Article),
            "landing" => Ok(PageType::Landing),
            other => Err(GateError::config(format!(
                "unknown page type '{other}' (expected: article, landing)"
            ))),
        }
    }
}

/// Per-category weights for the SEO overall score. The weighted sum is
/// normalized by the weight total, so any positive weights work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub content: f64,
    pub keywords: f64,
    pub meta: f64,
    pub structure: f64,
    pub links: f64,
    pub readability: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            content: SeoCategory::Content.weight(),
            keywords: SeoCategory::Keywords.weight(),
            meta: SeoCategory::Meta.weight(),
            structure: SeoCategory::Structure.weight(),
            links: SeoCategory::Links.weight(),
            readability: SeoCategory::Readability.weight(),
        }
    }
}

impl CategoryWeights {
    pub fn get(&self, category: SeoCategory) -> f64 {
        match category {
            SeoCategory::Content => self.content,
            SeoCategory::Keywords => self.keywords,
            SeoCategory::Meta => self.meta,
            SeoCategory::Structure => self.structure,
            SeoCategory::Links => self.links,
            SeoCategory::Readability => self.readability,
        }
    }

    pub fn total(&self) -> f64 {
        self.content + self.keywords + self.meta + self.structure + self.links + self.readability
    }

    fn all(&self) -> [f64; 6] {
        [
            self.content,
            self.keywords,
            self.meta,
            self.structure,
            self.links,
            self.readability,
        ]
    }
}

/// Measured-value target bands for the SEO rater
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoTargets {
    pub min_word_count: usize,
    pub optimal_word_count: usize,
    pub max_word_count: usize,
    pub keyword_density_min: f64,
    pub keyword_density_max: f64,
    pub min_internal_links: usize,
    pub optimal_internal_links: usize,
    pub min_external_links: usize,
    pub optimal_external_links: usize,
    pub meta_title_length_min: usize,
    pub meta_title_length_max: usize,
    pub meta_description_length_min: usize,
    pub meta_description_length_max: usize,
    pub min_h2_sections: usize,
    pub optimal_h2_sections: usize,
    pub h2_keyword_ratio: f64,
    pub max_sentence_length: usize,
    pub category_weights: CategoryWeights,
}

impl Default for SeoTargets {
    fn default() -> Self {
        Self::article()
    }
}

impl SeoTargets {
    /// Long-form article guidelines
    pub fn article() -> Self {
        Self {
            min_word_count: 2000,
            optimal_word_count: 2500,
            max_word_count: 3000,
            keyword_density_min: 1.0,
            keyword_density_max: 2.0,
            min_internal_links: 3,
            optimal_internal_links: 5,
            min_external_links: 2,
            optimal_external_links: 3,
            meta_title_length_min: 50,
            meta_title_length_max: 60,
            meta_description_length_min: 150,
            meta_description_length_max: 160,
            min_h2_sections: 4,
            optimal_h2_sections: 6,
            h2_keyword_ratio: 0.33,
            max_sentence_length: 25,
            category_weights: CategoryWeights::default(),
        }
    }

    /// Landing pages run much shorter; length and section bands relax,
    /// meta and link rules stay.
    pub fn landing() -> Self {
        Self {
            min_word_count: 600,
            optimal_word_count: 900,
            max_word_count: 1500,
            min_h2_sections: 2,
            optimal_h2_sections: 4,
            ..Self::article()
        }
    }

    pub fn for_page_type(page_type: PageType) -> Self {
        match page_type {
            PageType::Article => Self::article(),
            PageType::Landing => Self::landing(),
        }
    }
}

/// Full configuration for one gate run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub primary_keyword: String,
    pub secondary_keywords: Vec<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub page_type: PageType,
    /// Composite score needed to pass the gate
    pub pass_threshold: u32,
    /// SEO overall score needed for publish-readiness
    pub seo_publish_threshold: f64,
    /// Maximum automated revise attempts per run
    pub max_revisions: usize,
    /// Explicit target bands; omitted means the page-type preset
    pub targets: Option<SeoTargets>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            primary_keyword: String::new(),
            secondary_keywords: Vec::new(),
            meta_title: None,
            meta_description: None,
            page_type: PageType::Article,
            pass_threshold: 70,
            seo_publish_threshold: 80.0,
            max_revisions: 2,
            targets: None,
        }
    }
}

impl GateConfig {
    /// Resolved target bands.
    pub fn targets(&self) -> SeoTargets {
        self.targets
            .clone()
            .unwrap_or_else(|| SeoTargets::for_page_type(self.page_type))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, GateError> {
        let raw = std::fs::read_to_string(path).map_err(|source| GateError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GateConfig = toml::from_str(&raw)
            .map_err(|e| GateError::config(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded gate config");
        Ok(config)
    }

    /// Check the configuration before any analysis runs.
    pub fn validate(&self) -> Result<(), GateError> {
        if self.primary_keyword.trim().is_empty() {
            return Err(GateError::config("primary keyword must not be empty"));
        }
        if self.pass_threshold > 100 {
            return Err(GateError::config(format!(
                "pass threshold {} is out of range 0-100",
                self.pass_threshold
            )));
        }
        if !(0.0..=100.0).contains(&self.seo_publish_threshold) {
            return Err(GateError::config(format!(
                "seo publish threshold {} is out of range 0-100",
                self.seo_publish_threshold
            )));
        }

        let t = self.targets();
        if t.min_word_count == 0 || t.min_word_count >= t.max_word_count {
            return Err(GateError::config(format!(
                "word count band {}..{} is invalid",
                t.min_word_count, t.max_word_count
            )));
        }
        if t.keyword_density_min <= 0.0 || t.keyword_density_min >= t.keyword_density_max {
            return Err(GateError::config(format!(
                "keyword density band {}..{} is invalid",
                t.keyword_density_min, t.keyword_density_max
            )));
        }
        if t.meta_title_length_min >= t.meta_title_length_max
            || t.meta_description_length_min >= t.meta_description_length_max
        {
            return Err(GateError::config("meta length bands are invalid"));
        }
        let weights = &t.category_weights;
        if weights.all().iter().any(|w| *w < 0.0) || weights.total() <= 0.0 {
            return Err(GateError::config(
                "seo category weights must be non-negative with a positive total",
            ));
        }
        Ok(())
    }
}

/// Example config written by `prosegate init`.
pub const EXAMPLE_CONFIG: &str = r#"# prosegate.toml - content quality gate configuration

# Target keywords for the document under evaluation.
primary_keyword = "podcast growth"
secondary_keywords = ["podcast audience", "grow a podcast"]

# Meta fields. Omit to recover them from the document's frontmatter.
# meta_title = "Podcast Growth: A Practical Guide"
# meta_description = "..."

# "article" (long form) or "landing" (short, conversion focused)
page_type = "article"

# Composite score needed to pass the quality gate (0-100).
pass_threshold = 70

# SEO overall score needed for publish-readiness.
seo_publish_threshold = 80.0

# Automated revise attempts before escalating to human review.
max_revisions = 2

# Override any guideline band; unset fields keep the page-type preset.
# [targets]
# min_word_count = 1500
# optimal_word_count = 2000
# max_word_count = 2600
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GateConfig {
        GateConfig {
            primary_keyword: "podcast growth".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_primary_keyword_rejected() {
        let config = GateConfig::default();
        assert!(matches!(config.validate(), Err(GateError::Config(_))));
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_bands_rejected() {
        let mut config = valid_config();
        config.targets = Some(SeoTargets {
            min_word_count: 3000,
            max_word_count: 2000,
            ..SeoTargets::article()
        });
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.pass_threshold = 170;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.targets = Some(SeoTargets {
            category_weights: CategoryWeights {
                meta: -0.2,
                ..Default::default()
            },
            ..SeoTargets::article()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_page_type_presets() {
        let landing = SeoTargets::for_page_type(PageType::Landing);
        let article = SeoTargets::for_page_type(PageType::Article);
        assert!(landing.min_word_count < article.min_word_count);
        assert_eq!(landing.meta_title_length_min, article.meta_title_length_min);
    }

    #[test]
    fn test_example_config_parses() {
        let config: GateConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.primary_keyword, "podcast growth");
        assert_eq!(config.max_revisions, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prosegate.toml");
        std::fs::write(&path, "primary_keyword = \"x\"\npage_type = \"landing\"\n").unwrap();
        let config = GateConfig::load(&path).unwrap();
        assert_eq!(config.page_type, PageType::Landing);
        assert_eq!(config.targets().min_word_count, 600);
    }
}
