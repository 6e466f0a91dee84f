//! Document loading and markdown structure parsing
//!
//! A `Document` is the immutable-until-revised unit of prose: the raw
//! markdown body plus optional meta fields. Structure (headings,
//! sections, list/table layout) is derived on demand so a revised body
//! is always re-parsed fresh.

use crate::error::GateError;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

static FENCED_CODE_RE: OnceLock<Regex> = OnceLock::new();
static INLINE_CODE_RE: OnceLock<Regex> = OnceLock::new();
static LINK_RE: OnceLock<Regex> = OnceLock::new();
static BOLD_RE: OnceLock<Regex> = OnceLock::new();
static ITALIC_RE: OnceLock<Regex> = OnceLock::new();
static META_LINE_RE: OnceLock<Regex> = OnceLock::new();

fn fenced_code_re() -> &'static Regex {
    FENCED_CODE_RE.get_or_init(|| Regex::new(r"```[\s\S]*?```").unwrap())
}

/// A prose document under evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub body: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

impl Document {
    /// Build a document from an in-memory string. Meta fields missing
    /// from the arguments are recovered from YAML frontmatter.
    pub fn from_string(
        body: impl Into<String>,
        meta_title: Option<String>,
        meta_description: Option<String>,
    ) -> Self {
        let body = body.into();
        let fm = frontmatter(&body);
        let meta_title = meta_title.or_else(|| fm.get("Meta Title").cloned());
        let meta_description = meta_description.or_else(|| fm.get("Meta Description").cloned());
        Self {
            body,
            meta_title,
            meta_description,
        }
    }

    /// Load a document from disk.
    pub fn from_path(path: &Path) -> Result<Self, GateError> {
        let body = std::fs::read_to_string(path).map_err(|source| GateError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if body.trim().is_empty() {
            return Err(GateError::EmptyDocument(""));
        }
        Ok(Self::from_string(body, None, None))
    }

    /// Primary keyword recovered from frontmatter, if any.
    pub fn frontmatter_keyword(&self) -> Option<String> {
        let fm = frontmatter(&self.body);
        fm.get("Primary Keyword")
            .or_else(|| fm.get("Target Keyword"))
            .cloned()
    }

    /// Replace the body (revision step). Meta fields are kept; structure
    /// and plain text derive from the new body on the next call.
    pub fn with_body(&self, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            meta_title: self.meta_title.clone(),
            meta_description: self.meta_description.clone(),
        }
    }

    /// Markdown stripped to plain prose for text analysis.
    pub fn plain_text(&self) -> String {
        strip_markdown(&self.body)
    }

    /// Parse heading/section/layout structure from the body.
    pub fn structure(&self) -> Structure {
        Structure::parse(&self.body)
    }
}

/// Heading level of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Text before the first heading
    Intro,
    H1,
    H2,
    H3,
}

/// One heading-delimited slice of the document
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: String,
    pub content: String,
}

impl Section {
    /// Heading and content joined, as clustering and heatmap input.
    pub fn text(&self) -> String {
        if self.heading.is_empty() {
            self.content.clone()
        } else {
            format!("{} {}", self.heading, self.content)
        }
    }
}

/// Derived structural facts about a document body
#[derive(Debug, Clone, Default)]
pub struct Structure {
    pub sections: Vec<Section>,
    pub h1_texts: Vec<String>,
    pub h2_texts: Vec<String>,
    pub h3_texts: Vec<String>,
    pub bullet_list_lines: usize,
    pub numbered_list_lines: usize,
    pub table_lines: usize,
    /// Character tallies over non-blank lines, for prose-ratio scoring
    pub list_chars: usize,
    pub table_chars: usize,
    pub heading_chars: usize,
    pub total_chars: usize,
}

impl Structure {
    pub fn h1_count(&self) -> usize {
        self.h1_texts.len()
    }

    pub fn h2_count(&self) -> usize {
        self.h2_texts.len()
    }

    /// All heading texts, any level.
    pub fn headings(&self) -> impl Iterator<Item = &String> {
        self.h1_texts
            .iter()
            .chain(self.h2_texts.iter())
            .chain(self.h3_texts.iter())
    }

    /// Parse a markdown body into sections and layout tallies.
    ///
    /// Fenced code blocks are stripped first so `# comments` inside
    /// them are not mistaken for headings.
    pub fn parse(body: &str) -> Self {
        let clean = fenced_code_re().replace_all(body, "");
        let mut s = Structure::default();

        let mut current = Section {
            kind: SectionKind::Intro,
            heading: String::new(),
            content: String::new(),
        };

        for line in clean.lines() {
            let trimmed = line.trim();

            // Layout tallies
            if !trimmed.is_empty() {
                let chars = trimmed.chars().count();
                s.total_chars += chars;
                if is_bullet_line(trimmed) {
                    s.bullet_list_lines += 1;
                    s.list_chars += chars;
                } else if is_numbered_line(trimmed) {
                    s.numbered_list_lines += 1;
                    s.list_chars += chars;
                } else if trimmed.contains('|') && trimmed.starts_with('|') {
                    s.table_lines += 1;
                    s.table_chars += chars;
                } else if trimmed.starts_with('#') {
                    s.heading_chars += chars;
                }
            }

            // Section boundaries
            if let Some((kind, heading)) = heading_of(trimmed) {
                if !current.content.trim().is_empty() || !current.heading.is_empty() {
                    s.push_section(std::mem::replace(
                        &mut current,
                        Section {
                            kind,
                            heading: heading.clone(),
                            content: String::new(),
                        },
                    ));
                } else {
                    current = Section {
                        kind,
                        heading: heading.clone(),
                        content: String::new(),
                    };
                }
                match kind {
                    SectionKind::H1 => s.h1_texts.push(heading),
                    SectionKind::H2 => s.h2_texts.push(heading),
                    SectionKind::H3 => s.h3_texts.push(heading),
                    SectionKind::Intro => {}
                }
            } else {
                current.content.push_str(line);
                current.content.push('\n');
            }
        }

        if !current.content.trim().is_empty() || !current.heading.is_empty() {
            s.push_section(current);
        }

        s
    }

    fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }
}

fn heading_of(line: &str) -> Option<(SectionKind, String)> {
    for (prefix, kind) in [
        ("###", SectionKind::H3),
        ("##", SectionKind::H2),
        ("#", SectionKind::H1),
    ] {
        if let Some(rest) = line.strip_prefix(prefix) {
            if let Some(text) = rest.strip_prefix(' ') {
                if !text.trim().is_empty() {
                    return Some((kind, text.trim().to_string()));
                }
            }
        }
    }
    None
}

fn is_bullet_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    matches!(bytes.first(), Some(&(b'-' | b'*' | b'+'))) && bytes.get(1) == Some(&b' ')
}

fn is_numbered_line(line: &str) -> bool {
    let mut chars = line.chars();
    let mut saw_digit = false;
    for c in chars.by_ref() {
        if c.is_ascii_digit() {
            saw_digit = true;
        } else {
            return saw_digit && c == '.' && chars.next() == Some(' ');
        }
    }
    false
}

/// Parse YAML frontmatter between `---` delimiters into a key/value map.
pub fn frontmatter(body: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Some(rest) = body.strip_prefix("---") else {
        return map;
    };
    let Some(end) = rest.find("\n---") else {
        return map;
    };
    for line in rest[..end].lines() {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            let value = value.trim();
            if !key.is_empty() && !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Strip markdown formatting, leaving plain prose for analysis.
///
/// Removes: YAML frontmatter, bold-style metadata lines, horizontal
/// rules, code (fenced and inline), tables, link syntax (text kept),
/// bold/italic markers, and heading markers.
pub fn strip_markdown(content: &str) -> String {
    let mut text = content.to_string();

    // YAML frontmatter
    if text.starts_with("---") {
        if let Some(end) = text[3..].find("\n---") {
            let after = 3 + end + 4;
            let cut = text[after..]
                .find('\n')
                .map(|n| after + n + 1)
                .unwrap_or(text.len());
            text = text[cut..].to_string();
        }
    }

    text = fenced_code_re().replace_all(&text, "").into_owned();

    let inline_code = INLINE_CODE_RE.get_or_init(|| Regex::new(r"`[^`]+`").unwrap());
    text = inline_code.replace_all(&text, "").into_owned();

    let meta_line =
        META_LINE_RE.get_or_init(|| Regex::new(r"(?m)^\*\*[^*]+\*\*:\s*.+$").unwrap());
    text = meta_line.replace_all(&text, "").into_owned();

    let link = LINK_RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
    text = link.replace_all(&text, "$1").into_owned();

    let bold = BOLD_RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
    text = bold.replace_all(&text, "$1").into_owned();

    let italic = ITALIC_RE.get_or_init(|| Regex::new(r"\*([^*]+)\*").unwrap());
    text = italic.replace_all(&text, "$1").into_owned();

    // Tables, horizontal rules, heading markers
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('|') || (trimmed.chars().all(|c| c == '-') && trimmed.len() >= 3) {
            continue;
        }
        let line = trimmed.trim_start_matches('#').trim_start();
        out.push_str(line);
        out.push('\n');
    }

    // Collapse runs of blank lines
    let mut collapsed = String::with_capacity(out.len());
    let mut blank_run = 0;
    for line in out.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        collapsed.push_str(line);
        collapsed.push('\n');
    }

    collapsed.trim().to_string()
}
