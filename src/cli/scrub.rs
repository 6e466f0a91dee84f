//! `prosegate scrub` - clean a document without scoring it

use crate::error::GateError;
use crate::scrub;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run(path: &Path, in_place: bool, format: &str) -> Result<i32> {
    let content = std::fs::read_to_string(path).map_err(|source| GateError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let (cleaned, report) = scrub::scrub(&content);

    if in_place {
        std::fs::write(path, &cleaned)
            .with_context(|| format!("cannot write cleaned text to {}", path.display()))?;
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Unicode removed: {}", report.unicode_removed);
        println!("Dashes replaced: {}", report.dashes_replaced);
        println!(
            "  comma: {}  semicolon: {}  period: {}  dropped: {}",
            report.dash_to_comma,
            report.dash_to_semicolon,
            report.dash_to_period,
            report.dash_dropped
        );
        println!("Whitespace fixes: {}", report.whitespace_fixes);
        if !in_place {
            println!("\nCleaned content:\n{cleaned}");
        }
    }

    Ok(0)
}
