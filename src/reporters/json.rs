//! JSON reporter
//!
//! Outputs the full run record as pretty-printed JSON with stable keys.
//! Consumers must treat unknown additional keys as forward-compatible
//! additions.

use crate::models::RunRecord;
use anyhow::Result;

/// Render the record as JSON
pub fn render(record: &RunRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_record;

    #[test]
    fn test_json_render_stable_keys() {
        let record = test_record();
        let json_str = render(&record).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");

        // The canonical top-level keys of the pipeline contract
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
        assert!(parsed["composite_result"]["weighted_total"].is_u64());
        assert!(parsed["composite_result"]["pass"].is_boolean());
    }

    #[test]
    fn test_json_round_trips() {
        let record = test_record();
        let json_str = render(&record).unwrap();
        let back: RunRecord = serde_json::from_str(&json_str).expect("deserialize record");
        assert_eq!(back.attempts, record.attempts);
        assert_eq!(
            back.composite_result.weighted_total,
            record.composite_result.weighted_total
        );
    }
}
