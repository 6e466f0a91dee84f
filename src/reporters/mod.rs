//! Output reporters for gate run records
//!
//! Two channels, as the pipeline contract requires:
//! - `text` - human-readable terminal summary with colors
//! - `json` - the machine-readable run record with stable keys

mod json;
mod text;

use crate::models::RunRecord;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a run record in the requested format.
pub fn report(record: &RunRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(record),
        OutputFormat::Json => json::render(record),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::GateConfig;
    use crate::document::Document;
    use crate::pipeline::QualityGate;
    use crate::models::GateState;

    /// Run a small fixture document through the gate for reporter tests
    pub(crate) fn test_record() -> RunRecord {
        let config = GateConfig {
            primary_keyword: "growth".to_string(),
            ..Default::default()
        };
        let doc = Document::from_string(
            "# Growth\n\nShort fixture body about growth for reporter tests.",
            Some("Growth".to_string()),
            None,
        );
        QualityGate::new(config).run(doc).unwrap().record
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_both_formats_render() {
        let record = test_record();
        assert!(matches!(
            record.gate_state,
            GateState::Accepted | GateState::Escalated
        ));
        for format in [OutputFormat::Text, OutputFormat::Json] {
            let out = report(&record, format).unwrap();
            assert!(!out.is_empty());
        }
    }
}
