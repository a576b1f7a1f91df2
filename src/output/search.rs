//
//  bitbucket-mcp
//  output/search.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Markdown for code search results.
//!
//! Each file gets a fenced block with its matching lines, prefixed by line
//! number. Matched segments are wrapped in backticks.

use std::path::Path;

use chrono::{DateTime, Utc};

use super::format::format_retrieved_at;
use super::markdown::{md_header, md_link};
use crate::api::cloud::search::{CodeSearchResult, MatchLine};

/// Fence language for a file, guessed from its extension.
pub fn language_hint(path: &str) -> &'static str {
    let path = Path::new(path);
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if file_name == "dockerfile" {
        return "dockerfile";
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "js" => "javascript",
        "jsx" => "jsx",
        "ts" => "typescript",
        "tsx" => "tsx",
        "py" => "python",
        "java" => "java",
        "rb" => "ruby",
        "php" => "php",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "c" | "h" => "c",
        "cpp" | "hpp" => "cpp",
        "tf" => "terraform",
        "hcl" => "hcl",
        "sh" => "bash",
        "zsh" => "zsh",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "xml" => "xml",
        "md" => "markdown",
        "sql" => "sql",
        _ => "",
    }
}

fn format_line(line: &MatchLine) -> String {
    let text: String = line
        .segments
        .iter()
        .map(|segment| {
            if segment.is_match {
                format!("`{}`", segment.text)
            } else {
                segment.text.clone()
            }
        })
        .collect();
    format!("{}: {}", line.line, text)
}

fn format_result(result: &CodeSearchResult) -> String {
    let path = result.file.path.as_deref().unwrap_or("Unknown File");
    let noun = if result.content_match_count == 1 {
        "match"
    } else {
        "matches"
    };

    let title = match result.file.links.href("self") {
        Some(href) => md_link(path, href),
        None => path.to_string(),
    };

    let mut out = format!(
        "{}\n\n{} {} found\n\n```{}\n",
        md_header(2, &title),
        result.content_match_count,
        noun,
        language_hint(path)
    );
    for content_match in &result.content_matches {
        for line in &content_match.lines {
            out.push_str(&format_line(line));
            out.push('\n');
        }
        if content_match.lines.len() > 1 {
            out.push('\n');
        }
    }
    out.push_str("```");
    out
}

/// Formats one page of code search results.
pub fn format_code_search_results(
    results: &[CodeSearchResult],
    total: u32,
    now: &DateTime<Utc>,
) -> String {
    if results.is_empty() {
        return format!("**No code matches found.**{}", format_retrieved_at(now));
    }

    let files = results
        .iter()
        .map(format_result)
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "{}\n\nFound {} matching {} for the code search query.\n\n{}{}",
        md_header(1, "Code Search Results"),
        total,
        if total == 1 { "file" } else { "files" },
        files,
        format_retrieved_at(now)
    )
}
