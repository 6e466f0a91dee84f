//! CLI command definitions and handlers

mod init;
mod score;
mod scrub;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Prosegate - content quality gate
///
/// Deterministic scoring only; no network calls, no accounts.
#[derive(Parser, Debug)]
#[command(name = "prosegate")]
#[command(
    version,
    about = "Content quality gate — deterministic readability, keyword, and SEO scoring with bounded revise-and-rescore",
    long_about = "Prosegate scrubs a prose document, scores it across voice, specificity, \
structure balance, SEO, and readability, then drives a bounded revise/rescore loop. \
A document either passes the gate or escalates to human review; the engine never \
guesses.\n\n\
All analysis is local and reproducible: identical input always yields identical scores.",
    after_help = "\
Examples:
  prosegate score draft.md --keyword \"podcast growth\"   Run the full quality gate
  prosegate score draft.md --format json                Machine-readable run record
  prosegate score draft.md --config prosegate.toml      Use a config file
  prosegate scrub draft.md --in-place                   Clean watermarks in place
  prosegate init                                        Write an example prosegate.toml

Exit codes: 0 accepted, 2 escalated (completed run), 1 input or config error"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full quality gate on a document
    Score {
        /// Path to the markdown document
        path: PathBuf,

        /// Primary keyword (falls back to config file, then frontmatter)
        #[arg(long, short = 'k')]
        keyword: Option<String>,

        /// Secondary keywords, comma separated
        #[arg(long, value_delimiter = ',')]
        secondary: Vec<String>,

        /// Meta title (overrides config and frontmatter)
        #[arg(long)]
        meta_title: Option<String>,

        /// Meta description (overrides config and frontmatter)
        #[arg(long)]
        meta_description: Option<String>,

        /// Page type: article, landing
        #[arg(long, value_parser = ["article", "landing"])]
        page_type: Option<String>,

        /// Path to a prosegate.toml config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Composite score needed to pass (0-100)
        #[arg(long)]
        threshold: Option<u32>,

        /// Maximum automated revise attempts
        #[arg(long)]
        max_revisions: Option<usize>,
    },

    /// Scrub invisible characters and long dashes from a document
    Scrub {
        /// Path to the document
        path: PathBuf,

        /// Overwrite the file with the cleaned text
        #[arg(long)]
        in_place: bool,

        /// Output format for the scrub report: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Write an example prosegate.toml config file
    Init,
}

/// Dispatch a parsed CLI invocation. Returns the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Score {
            path,
            keyword,
            secondary,
            meta_title,
            meta_description,
            page_type,
            config,
            format,
            output,
            threshold,
            max_revisions,
        } => score::run(score::ScoreArgs {
            path,
            keyword,
            secondary,
            meta_title,
            meta_description,
            page_type,
            config,
            format,
            output,
            threshold,
            max_revisions,
        }),
        Commands::Scrub {
            path,
            in_place,
            format,
        } => scrub::run(&path, in_place, &format),
        Commands::Init => init::run(),
    }
}
