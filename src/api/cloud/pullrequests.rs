//
//  bitbucket-mcp
//  api/cloud/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud pull request types and endpoints.
//!
//! # Overview
//!
//! Pull requests propose merging a source branch into a destination
//! branch. Besides the pull request itself this module reads its diffstat
//! (per-file line counts), its raw unified diff and its comments.
//!
//! # Pull Request States
//!
//! | State | Description |
//! |-------|-------------|
//! | `OPEN` | Active and awaiting review/merge |
//! | `MERGED` | Merged into the destination branch |
//! | `DECLINED` | Rejected and closed without merging |
//! | `SUPERSEDED` | Replaced by another pull request |
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_mcp::api::cloud::pullrequests::{get_pull_request, get_raw_diff};
//! # use bitbucket_mcp::api::BitbucketClient;
//!
//! # async fn example(client: &BitbucketClient) -> Result<(), bitbucket_mcp::api::ApiError> {
//! let pr = get_pull_request(client, "acme", "api", 42).await?;
//! let diff = get_raw_diff(client, "acme", "api", 42).await?;
//! println!("#{} {} ({} bytes of diff)", pr.id, pr.title, diff.len());
//! # Ok(())
//! # }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{page_pairs, repository_path};
use crate::api::client::append_query;
use crate::api::common::{Links, PaginatedResponse, RenderedText, UserRef};
use crate::api::{ApiError, BitbucketClient};

/// Pull request state filter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
    /// Active pull requests.
    Open,
    /// Merged pull requests.
    Merged,
    /// Declined pull requests.
    Declined,
    /// Superseded pull requests.
    Superseded,
}

impl PullRequestState {
    /// The value Bitbucket expects in the `state` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
            Self::Declined => "DECLINED",
            Self::Superseded => "SUPERSEDED",
        }
    }
}

/// A pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// Numeric identifier within the repository.
    pub id: u64,

    /// Title.
    pub title: String,

    /// `OPEN`, `MERGED`, `DECLINED` or `SUPERSEDED`.
    #[serde(default)]
    pub state: Option<String>,

    /// Author.
    #[serde(default)]
    pub author: Option<UserRef>,

    /// Description.
    #[serde(default)]
    pub summary: Option<RenderedText>,

    /// Rendered fields, used when `summary` is missing.
    #[serde(default)]
    pub rendered: Option<RenderedFields>,

    /// Source branch and repository.
    #[serde(default)]
    pub source: Option<Endpoint>,

    /// Destination branch and repository.
    #[serde(default)]
    pub destination: Option<Endpoint>,

    /// Reviewers.
    #[serde(default)]
    pub reviewers: Vec<UserRef>,

    /// Number of comments.
    #[serde(default)]
    pub comment_count: Option<u32>,

    /// Number of open tasks.
    #[serde(default)]
    pub task_count: Option<u32>,

    /// Whether the source branch is deleted on merge.
    #[serde(default)]
    pub close_source_branch: Option<bool>,

    /// ISO 8601 creation timestamp.
    #[serde(default)]
    pub created_on: Option<String>,

    /// ISO 8601 last update timestamp.
    #[serde(default)]
    pub updated_on: Option<String>,

    /// Related links (`html`, `commits`, `comments`, `diff`, ...).
    #[serde(default)]
    pub links: Links,
}

impl PullRequest {
    /// Raw description from `summary`, falling back to `rendered.description`.
    pub fn description(&self) -> Option<&str> {
        self.summary
            .as_ref()
            .and_then(RenderedText::non_empty_raw)
            .or_else(|| {
                self.rendered
                    .as_ref()?
                    .description
                    .as_ref()?
                    .non_empty_raw()
            })
    }

    /// Source branch name.
    pub fn source_branch(&self) -> Option<&str> {
        self.source.as_ref()?.branch.as_ref().map(|b| b.name.as_str())
    }

    /// Destination branch name.
    pub fn destination_branch(&self) -> Option<&str> {
        self.destination
            .as_ref()?
            .branch
            .as_ref()
            .map(|b| b.name.as_str())
    }
}

/// Rendered text fields of a pull request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderedFields {
    /// Rendered description.
    #[serde(default)]
    pub description: Option<RenderedText>,
}

/// One side of a pull request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoint {
    /// Branch.
    #[serde(default)]
    pub branch: Option<BranchName>,

    /// Repository.
    #[serde(default)]
    pub repository: Option<RepositoryRef>,
}

/// Branch name wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchName {
    /// Branch name.
    pub name: String,
}

/// Minimal repository reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// `workspace/repo`.
    #[serde(default)]
    pub full_name: Option<String>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Per-file change summary from the diffstat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffStat {
    /// `added`, `removed`, `modified` or `renamed`.
    #[serde(default)]
    pub status: Option<String>,

    /// Lines added.
    #[serde(default)]
    pub lines_added: Option<u32>,

    /// Lines removed.
    #[serde(default)]
    pub lines_removed: Option<u32>,

    /// File before the change.
    #[serde(default)]
    pub old: Option<DiffPath>,

    /// File after the change.
    #[serde(default)]
    pub new: Option<DiffPath>,
}

impl DiffStat {
    /// Old path when present, else the new path.
    pub fn path(&self) -> &str {
        self.old
            .as_ref()
            .or(self.new.as_ref())
            .map(|p| p.path.as_str())
            .unwrap_or("unknown file")
    }
}

/// File path in a diffstat entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffPath {
    /// Repository-relative path.
    pub path: String,
}

/// A comment on a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestComment {
    /// Comment identifier.
    pub id: u64,

    /// Body.
    #[serde(default)]
    pub content: RenderedText,

    /// Author.
    #[serde(default)]
    pub user: Option<UserRef>,

    /// ISO 8601 creation timestamp.
    #[serde(default)]
    pub created_on: Option<String>,

    /// ISO 8601 last update timestamp.
    #[serde(default)]
    pub updated_on: Option<String>,

    /// Whether the comment was deleted.
    #[serde(default)]
    pub deleted: bool,

    /// Location for inline (code) comments.
    #[serde(default)]
    pub inline: Option<InlineLocation>,

    /// Parent comment for replies.
    #[serde(default)]
    pub parent: Option<ParentRef>,

    /// Related links (`html`, `code`).
    #[serde(default)]
    pub links: Links,
}

/// File and line of an inline comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineLocation {
    /// File path.
    pub path: String,

    /// Line in the old version.
    #[serde(default)]
    pub from: Option<u32>,

    /// Line in the new version.
    #[serde(default)]
    pub to: Option<u32>,
}

/// Reference to a parent comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentRef {
    /// Parent comment identifier.
    pub id: u64,
}

/// Filters for [`list_pull_requests`].
#[derive(Debug, Clone, Default)]
pub struct ListPullRequestsParams {
    /// Workspace slug.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// State filter. Bitbucket defaults to `OPEN`.
    pub state: Option<PullRequestState>,
    /// BBQL filter.
    pub query: Option<String>,
    /// Page length.
    pub pagelen: Option<u32>,
    /// Page number.
    pub page: Option<u32>,
}

fn pull_request_path(workspace: &str, repo_slug: &str, id: u64) -> Result<String, ApiError> {
    Ok(format!(
        "{}/pullrequests/{}",
        repository_path(workspace, repo_slug)?,
        id
    ))
}

/// Lists pull requests in a repository.
pub async fn list_pull_requests(
    client: &BitbucketClient,
    params: &ListPullRequestsParams,
) -> Result<PaginatedResponse<PullRequest>, ApiError> {
    let base = format!(
        "{}/pullrequests",
        repository_path(&params.workspace, &params.repo_slug)?
    );

    let mut pairs = Vec::new();
    if let Some(state) = params.state {
        pairs.push(("state", state.as_str().to_string()));
    }
    if let Some(query) = params.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        pairs.push(("q", query.to_string()));
    }
    pairs.extend(page_pairs(params.pagelen, params.page));

    let path = append_query(&base, pairs);
    tracing::debug!("Listing pull requests: {}", path);
    client.get_json(&path).await
}

/// Fetches one pull request.
pub async fn get_pull_request(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    id: u64,
) -> Result<PullRequest, ApiError> {
    client
        .get_json(&pull_request_path(workspace, repo_slug, id)?)
        .await
}

/// Fetches the first page of the diffstat (up to 100 files).
pub async fn get_diffstat(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    id: u64,
) -> Result<PaginatedResponse<DiffStat>, ApiError> {
    let base = format!("{}/diffstat", pull_request_path(workspace, repo_slug, id)?);
    client
        .get_json(&append_query(&base, page_pairs(Some(100), None)))
        .await
}

/// Fetches the raw unified diff.
pub async fn get_raw_diff(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    id: u64,
) -> Result<String, ApiError> {
    let path = format!("{}/diff", pull_request_path(workspace, repo_slug, id)?);
    client.get_text(&path).await
}

/// Lists comments on a pull request.
pub async fn list_pull_request_comments(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    id: u64,
    pagelen: Option<u32>,
    page: Option<u32>,
) -> Result<PaginatedResponse<PullRequestComment>, ApiError> {
    let base = format!("{}/comments", pull_request_path(workspace, repo_slug, id)?);
    client
        .get_json(&append_query(&base, page_pairs(pagelen, page)))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_serialization() {
        assert_eq!(
            serde_json::to_value(PullRequestState::Superseded).unwrap(),
            json!("SUPERSEDED")
        );
        let state: PullRequestState = serde_json::from_value(json!("MERGED")).unwrap();
        assert_eq!(state.as_str(), "MERGED");
    }

    #[test]
    fn test_description_fallback() {
        let pr: PullRequest = serde_json::from_value(json!({
            "id": 1,
            "title": "T",
            "summary": {"raw": "  "},
            "rendered": {"description": {"raw": "From rendered"}}
        }))
        .unwrap();
        assert_eq!(pr.description(), Some("From rendered"));
    }

    #[test]
    fn test_branches() {
        let pr: PullRequest = serde_json::from_value(json!({
            "id": 1,
            "title": "T",
            "source": {"branch": {"name": "feature"}},
            "destination": {"branch": {"name": "main"}, "repository": {"full_name": "acme/api"}}
        }))
        .unwrap();
        assert_eq!(pr.source_branch(), Some("feature"));
        assert_eq!(pr.destination_branch(), Some("main"));
    }

    #[test]
    fn test_diffstat_path() {
        let added: DiffStat =
            serde_json::from_value(json!({"status": "added", "new": {"path": "src/a.rs"}}))
                .unwrap();
        assert_eq!(added.path(), "src/a.rs");
    }
}
