//! `prosegate score` - run the full quality gate

use crate::config::GateConfig;
use crate::document::Document;
use crate::pipeline::QualityGate;
use crate::reporters::{self, OutputFormat};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

pub struct ScoreArgs {
    pub path: PathBuf,
    pub keyword: Option<String>,
    pub secondary: Vec<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub page_type: Option<String>,
    pub config: Option<PathBuf>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub threshold: Option<u32>,
    pub max_revisions: Option<usize>,
}

pub fn run(args: ScoreArgs) -> Result<i32> {
    let format = OutputFormat::from_str(&args.format)?;
    let mut config = load_config(&args)?;
    let mut doc = Document::from_path(&args.path)?;

    // CLI flags win over the config file; the config file wins over
    // document frontmatter.
    if let Some(keyword) = args.keyword {
        config.primary_keyword = keyword;
    }
    if config.primary_keyword.trim().is_empty() {
        if let Some(kw) = doc.frontmatter_keyword() {
            debug!(keyword = %kw, "primary keyword taken from frontmatter");
            config.primary_keyword = kw;
        }
    }
    if !args.secondary.is_empty() {
        config.secondary_keywords = args.secondary;
    }
    if let Some(page_type) = args.page_type.as_deref() {
        config.page_type = page_type.parse()?;
    }
    if let Some(threshold) = args.threshold {
        config.pass_threshold = threshold;
    }
    if let Some(max_revisions) = args.max_revisions {
        config.max_revisions = max_revisions;
    }
    if let Some(title) = args.meta_title.or_else(|| config.meta_title.clone()) {
        doc.meta_title = Some(title);
    }
    if let Some(desc) = args
        .meta_description
        .or_else(|| config.meta_description.clone())
    {
        doc.meta_description = Some(desc);
    }

    let outcome = QualityGate::new(config).run(doc)?;
    let rendered = reporters::report(&outcome.record, format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("cannot write report to {}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    // The human summary rides the other channel when stdout carries the
    // machine record.
    if format == OutputFormat::Json && args.output.is_none() {
        eprintln!(
            "{}: composite {}/100 after {} attempt(s)",
            outcome.record.gate_state,
            outcome.record.composite_result.weighted_total,
            outcome.record.attempts
        );
    }

    Ok(outcome.exit_code())
}

fn load_config(args: &ScoreArgs) -> Result<GateConfig> {
    if let Some(path) = &args.config {
        return Ok(GateConfig::load(path)?);
    }

    // Look for prosegate.toml next to the document, then in the cwd
    let candidates = [
        args.path.parent().map(|p| p.join("prosegate.toml")),
        Some(PathBuf::from("prosegate.toml")),
    ];
    for candidate in candidates.into_iter().flatten() {
        if candidate.is_file() {
            debug!(path = %candidate.display(), "using discovered config");
            return Ok(GateConfig::load(&candidate)?);
        }
    }
    Ok(GateConfig::default())
}
