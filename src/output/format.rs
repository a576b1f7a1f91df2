//
//  bitbucket-mcp
//  output/format.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Shared Markdown Formatters
//!
//! Consistent formatting used by every domain formatter: labelled bullet
//! lists, numbered item lists, pagination footers, diffs and clean-up of
//! user-authored markdown.
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_mcp::output::format::{format_bullet_list, FieldValue};
//!
//! let list = format_bullet_list(&[
//!     ("State", FieldValue::from("OPEN")),
//!     ("Private", FieldValue::from(true)),
//!     ("Reviewer", FieldValue::Missing),
//! ]);
//! assert_eq!(list, "- **State**: OPEN\n- **Private**: Yes");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::markdown::{md_header, md_link, md_separator};
use crate::api::common::PaginationInfo;
use crate::util::format_date;

/// Files shown in full by [`format_diff`].
pub const DIFF_MAX_FILES: usize = 5;

/// Lines shown per file by [`format_diff`].
pub const DIFF_MAX_LINES_PER_FILE: usize = 100;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").unwrap());

static DIFF_FILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^diff --git a/(.*) b/(.*)$").unwrap());

static EXTRA_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// A value in a labelled bullet list.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text. URLs become links and ISO timestamps are formatted.
    Text(String),
    /// Integer.
    Number(i64),
    /// Rendered as `Yes` / `No`.
    Bool(bool),
    /// Link with an explicit label.
    Link {
        /// Target URL.
        url: String,
        /// Label.
        title: String,
    },
    /// Skipped entirely.
    Missing,
}

impl FieldValue {
    /// Link with an explicit label.
    pub fn link(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self::Link {
            url: url.into(),
            title: title.into(),
        }
    }

    fn render(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::Link { url, title } => Some(md_link(title, url)),
            Self::Text(s) => Some(if s.starts_with("http://") || s.starts_with("https://") {
                md_link(s, s)
            } else if ISO_DATE.is_match(s) {
                format_date(Some(s))
            } else {
                s.clone()
            }),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Number(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Missing)
    }
}

/// Link labelled with `title` (or the URL itself), or `Not available`.
pub fn format_url(url: Option<&str>, title: Option<&str>) -> String {
    match url.filter(|u| !u.is_empty()) {
        Some(url) => md_link(title.unwrap_or(url), url),
        None => "Not available".to_string(),
    }
}

/// `- **Key**: value` lines, skipping [`FieldValue::Missing`].
pub fn format_bullet_list(items: &[(&str, FieldValue)]) -> String {
    items
        .iter()
        .filter_map(|(key, value)| value.render().map(|v| format!("- **{}**: {}", key, v)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats each item and separates them with a horizontal rule.
///
/// Returns `"No items."` for an empty slice.
pub fn format_numbered_list<T, F>(items: &[T], formatter: F) -> String
where
    F: Fn(&T, usize) -> String,
{
    if items.is_empty() {
        return "No items.".to_string();
    }
    let separator = format!("\n\n{}\n\n", md_separator());
    items
        .iter()
        .enumerate()
        .map(|(index, item)| formatter(item, index))
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Footer describing the current page.
pub fn format_pagination(info: &PaginationInfo) -> String {
    let plural = if info.count == 1 { "" } else { "s" };
    let total = info
        .total
        .map(|t| format!(" ({} total)", t))
        .unwrap_or_default();

    match (&info.next_cursor, info.has_more) {
        (Some(next), true) => format!(
            "*Showing {} item{}{}. More results are available.*\n\nTo see more results, request page {}.",
            info.count, plural, total, next
        ),
        _ => format!("*Showing {} item{}{}.*", info.count, plural, total),
    }
}

/// Appends the pagination footer when the page has items or more pages.
pub fn with_pagination(content: String, info: &PaginationInfo) -> String {
    if info.has_more || info.count > 0 {
        format!("{}\n\n{}", content, format_pagination(info))
    } else {
        content
    }
}

/// Footer stamped with the retrieval time.
pub fn format_retrieved_at(now: &chrono::DateTime<chrono::Utc>) -> String {
    format!(
        "\n\n{}\n*Information retrieved at: {}*",
        md_separator(),
        crate::util::format_utc(now)
    )
}

/// Converts a raw unified diff into per-file fenced `diff` blocks.
///
/// At most `max_files` files are shown and each file is cut after
/// `max_lines_per_file` lines.
pub fn format_diff(raw: &str, max_files: usize, max_lines_per_file: usize) -> String {
    if raw.trim().is_empty() {
        return "*No changes found in this pull request.*".to_string();
    }

    let mut out: Vec<String> = Vec::new();
    let mut files = 0usize;
    let mut lines_in_file = 0usize;
    let mut in_file = false;
    let mut truncated = false;

    for line in raw.lines() {
        if line.starts_with("diff --git") {
            if in_file {
                out.push("```".to_string());
                out.push(String::new());
                in_file = false;
            }
            files += 1;
            if files > max_files {
                truncated = true;
                break;
            }
            let name = DIFF_FILE
                .captures(line)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
                .unwrap_or("unknown file");
            out.push(md_header(3, name));
            out.push(String::new());
            out.push("```diff".to_string());
            in_file = true;
            lines_in_file = 0;
        } else if in_file {
            lines_in_file += 1;
            if lines_in_file > max_lines_per_file {
                out.push("// ... more lines omitted for brevity ...".to_string());
                out.push("```".to_string());
                out.push(String::new());
                in_file = false;
                continue;
            }
            out.push(line.to_string());
        }
    }

    if in_file {
        out.push("```".to_string());
    }
    if truncated {
        out.push(String::new());
        out.push(format!(
            "*Output truncated. Only showing the first {} files.*",
            max_files
        ));
    }
    out.join("\n")
}

/// Cleans up markdown authored in Bitbucket before embedding it.
///
/// - Normalizes line endings
/// - Strips trailing whitespace outside code fences
/// - Collapses runs of blank lines
/// - Closes an unterminated code fence
pub fn optimize_markdown(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut in_fence = false;
    let mut lines = Vec::new();
    for line in normalized.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            lines.push(line.trim_end().to_string());
        } else if in_fence {
            lines.push(line.to_string());
        } else {
            lines.push(line.trim_end().to_string());
        }
    }
    if in_fence {
        lines.push("```".to_string());
    }

    EXTRA_BLANK_LINES
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}
