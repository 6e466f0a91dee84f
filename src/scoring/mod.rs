//! Composite quality scoring
//!
//! Aggregates five dimensions into the single gate decision:
//!
//! ```text
//! Composite = Voice x 0.30 + Specificity x 0.25 + Balance x 0.20
//!           + SEO x 0.15 + Readability x 0.10
//!
//! pass = (rounded composite >= threshold)
//! ```
//!
//! Voice and specificity are scored tallies over fixed pattern
//! catalogs, never semantic judgments. The whole scorer is a pure
//! function: identical inputs always produce an identical result.

mod composite;
pub mod rules;

pub use composite::score;
