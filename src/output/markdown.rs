//
//  bitbucket-mcp
//  output/markdown.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Markdown Output Formatting
//!
//! Building blocks for the markdown that tools and commands return, and
//! terminal rendering through `termimad`.
//!
//! ## Supported Elements
//!
//! | Function | Element | Output |
//! |----------|---------|--------|
//! | [`md_header`] | Headers (level clamped to 1-6) | `# Title` |
//! | [`md_link`] | Links | `[text](url)` |
//! | [`md_separator`] | Horizontal rule | `---` |
//!
//! Higher-level helpers (bullet lists, pagination footers, diffs) live in
//! [`super::format`].
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_mcp::output::markdown::*;
//!
//! let doc = format!(
//!     "{}\n\n{}",
//!     md_header(1, "Pull Request #42"),
//!     md_link("View in Browser", "https://bitbucket.org/acme/api/pull-requests/42"),
//! );
//! assert!(doc.starts_with("# Pull Request #42"));
//! ```

/// Renders markdown with ANSI styling for terminal display.
pub fn render_markdown(text: &str) -> String {
    termimad::text(text).to_string()
}

/// Markdown header. Levels outside 1-6 are clamped.
pub fn md_header(level: u8, text: &str) -> String {
    let prefix = "#".repeat(level.clamp(1, 6) as usize);
    format!("{} {}", prefix, text)
}

/// Link with `text` as the label.
pub fn md_link(text: &str, url: &str) -> String {
    format!("[{}]({})", text, url)
}

/// Horizontal rule.
pub fn md_separator() -> &'static str {
    "---"
}
