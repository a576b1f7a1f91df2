//
//  bitbucket-mcp
//  api/cloud/search.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Workspace code search.
//!
//! Code search has to be enabled for the workspace. The query language is
//! plain text plus modifiers; [`build_code_query`] appends the `repo:`,
//! `lang:` and `ext:` modifiers for the optional filters.

use serde::{Deserialize, Serialize};

use super::{page_pairs, path_segment, API_PREFIX};
use crate::api::client::append_query;
use crate::api::common::Links;
use crate::api::{ApiError, BitbucketClient};

/// One page of code search results.
///
/// Unlike the other list endpoints there is no `next` link; more pages
/// exist while `page * pagelen < size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSearchResponse {
    /// Total number of matching files.
    #[serde(default)]
    pub size: u32,

    /// Current page number (1-indexed).
    #[serde(default)]
    pub page: Option<u32>,

    /// Page length.
    #[serde(default)]
    pub pagelen: Option<u32>,

    /// Whether Bitbucket rewrote the query.
    #[serde(default)]
    pub query_substituted: bool,

    /// Matching files.
    #[serde(default)]
    pub values: Vec<CodeSearchResult>,
}

/// A file with matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSearchResult {
    /// Number of matches in the file content.
    #[serde(default)]
    pub content_match_count: u32,

    /// Matching snippets.
    #[serde(default)]
    pub content_matches: Vec<ContentMatch>,

    /// Highlighted segments of the file path.
    #[serde(default)]
    pub path_matches: Vec<Segment>,

    /// The file itself.
    pub file: SearchFile,
}

/// A snippet of consecutive lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentMatch {
    /// Lines of the snippet.
    #[serde(default)]
    pub lines: Vec<MatchLine>,
}

/// One line of a snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchLine {
    /// 1-based line number.
    pub line: u32,
    /// Text split into matched and unmatched segments.
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// A run of text, highlighted when `is_match` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// The text.
    pub text: String,
    /// Whether this run matched the query.
    #[serde(rename = "match", default)]
    pub is_match: bool,
}

/// The file a result belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFile {
    /// Path within the repository.
    #[serde(default)]
    pub path: Option<String>,
    /// Related links (`self`).
    #[serde(default)]
    pub links: Links,
}

/// Filters for [`search_code`].
#[derive(Debug, Clone, Default)]
pub struct CodeSearchParams {
    /// Workspace to search.
    pub workspace: String,
    /// Search text.
    pub query: String,
    /// Restrict to one repository.
    pub repo_slug: Option<String>,
    /// Restrict to a language, e.g. `rust` or `typescript`.
    pub language: Option<String>,
    /// Restrict to a file extension, e.g. `rs`.
    pub extension: Option<String>,
    /// Page length.
    pub pagelen: Option<u32>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
}

/// Maps common language names onto the names code search understands.
pub fn search_language(language: &str) -> String {
    let lower = language.trim().to_ascii_lowercase();
    match lower.as_str() {
        "hcl" | "tf" => "terraform".to_string(),
        "typescript" => "ts".to_string(),
        "javascript" => "js".to_string(),
        "python" => "py".to_string(),
        _ => lower,
    }
}

/// The search query with its `repo:`, `lang:` and `ext:` modifiers.
///
/// ```rust
/// use bitbucket_mcp::api::cloud::search::build_code_query;
///
/// assert_eq!(
///     build_code_query("fn main", Some("api"), Some("Rust"), None),
///     "fn main repo:api lang:rust"
/// );
/// ```
pub fn build_code_query(
    query: &str,
    repo_slug: Option<&str>,
    language: Option<&str>,
    extension: Option<&str>,
) -> String {
    let mut q = query.trim().to_string();
    if let Some(repo) = repo_slug {
        q.push_str(&format!(" repo:{}", repo));
    }
    if let Some(lang) = language {
        q.push_str(&format!(" lang:{}", search_language(lang)));
    }
    if let Some(ext) = extension {
        q.push_str(&format!(" ext:{}", ext.trim_start_matches('.')));
    }
    q
}

/// Searches code across a workspace.
pub async fn search_code(
    client: &BitbucketClient,
    params: &CodeSearchParams,
) -> Result<CodeSearchResponse, ApiError> {
    let workspace = path_segment(&params.workspace, "workspaceSlug")?;
    let query = build_code_query(
        &params.query,
        params.repo_slug.as_deref(),
        params.language.as_deref(),
        params.extension.as_deref(),
    );

    let mut pairs = vec![("search_query", query)];
    pairs.extend(page_pairs(params.pagelen, params.page));
    let path = append_query(
        &format!("{}/workspaces/{}/search/code", API_PREFIX, workspace),
        pairs,
    );
    tracing::debug!("Searching code: {}", path);
    client.get_json(&path).await
}
