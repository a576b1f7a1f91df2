//
//  bitbucket-mcp
//  api/cloud/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud issue tracker types and endpoints.
//!
//! Bitbucket Cloud provides a lightweight issue tracker per repository. It
//! has to be enabled in the repository settings; otherwise every call here
//! answers 404.
//!
//! # Issue Lifecycle
//!
//! ```text
//! new -> open -> resolved -> closed
//!          |
//!          +-> on hold / invalid / duplicate / wontfix
//! ```
//!
//! # Filtering
//!
//! The list endpoint only filters through BBQL (`q`). The `status`, `kind`
//! and `priority` filters are therefore folded into one BBQL expression by
//! [`build_issue_query`], AND-ed with any free-form query.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_mcp::api::cloud::issues::build_issue_query;
//!
//! let q = build_issue_query(Some("open"), Some("bug"), None, Some("title ~ \"login\""));
//! assert_eq!(
//!     q.as_deref(),
//!     Some("state = \"open\" AND kind = \"bug\" AND (title ~ \"login\")")
//! );
//! ```

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{page_pairs, repository_path};
use crate::api::client::append_query;
use crate::api::common::{Links, PaginatedResponse, RenderedText, UserRef};
use crate::api::{ApiError, BitbucketClient, RequestOptions};

/// An issue in a repository's issue tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Numeric identifier within the repository.
    pub id: u64,

    /// Short summary.
    pub title: String,

    /// Description.
    #[serde(default)]
    pub content: Option<RenderedText>,

    /// `new`, `open`, `resolved`, `on hold`, `invalid`, `duplicate`,
    /// `wontfix` or `closed`.
    #[serde(default)]
    pub state: Option<String>,

    /// `trivial`, `minor`, `major`, `critical` or `blocker`.
    #[serde(default)]
    pub priority: Option<String>,

    /// `bug`, `enhancement`, `proposal` or `task`.
    #[serde(default)]
    pub kind: Option<String>,

    /// Creator of the issue.
    #[serde(default)]
    pub reporter: Option<UserRef>,

    /// Assigned user.
    #[serde(default)]
    pub assignee: Option<UserRef>,

    /// ISO 8601 creation timestamp.
    #[serde(default)]
    pub created_on: Option<String>,

    /// ISO 8601 last update timestamp.
    #[serde(default)]
    pub updated_on: Option<String>,

    /// Vote count.
    #[serde(default)]
    pub votes: Option<u32>,

    /// Watcher count.
    #[serde(default)]
    pub watches: Option<u32>,

    /// Related links.
    #[serde(default)]
    pub links: Links,
}

/// A comment on an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueComment {
    /// Comment identifier.
    pub id: u64,

    /// Comment body.
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

    /// Related links.
    #[serde(default)]
    pub links: Links,
}

/// Markdown content sent when creating or updating.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContentInput {
    /// Raw markdown.
    pub raw: String,
    /// Always `markdown`.
    pub markup: String,
}

impl ContentInput {
    /// Wraps raw markdown.
    pub fn markdown(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            markup: "markdown".to_string(),
        }
    }
}

/// User reference by UUID, used for assignment.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserUuid {
    /// UUID with curly braces.
    pub uuid: String,
}

/// Body of `POST .../issues`.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct CreateIssueRequest {
    /// Title (required).
    pub title: String,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentInput>,

    /// Issue kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// Body of `PUT .../issues/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct UpdateIssueRequest {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentInput>,

    /// New state. Bitbucket calls the status field `state`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// New kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// New priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// New assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserUuid>,
}

impl UpdateIssueRequest {
    /// Returns `true` when no field would be sent.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Filters for [`list_issues`].
#[derive(Debug, Clone, Default)]
pub struct ListIssuesParams {
    /// Workspace slug.
    pub workspace: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Issue state filter.
    pub status: Option<String>,
    /// Issue kind filter.
    pub kind: Option<String>,
    /// Priority filter.
    pub priority: Option<String>,
    /// Free-form BBQL.
    pub query: Option<String>,
    /// Sort field, e.g. `-updated_on`.
    pub sort: Option<String>,
    /// Page length.
    pub pagelen: Option<u32>,
    /// Page number.
    pub page: Option<u32>,
}

/// Combines the structured filters and a free-form BBQL query.
///
/// Returns `None` when nothing is set.
pub fn build_issue_query(
    status: Option<&str>,
    kind: Option<&str>,
    priority: Option<&str>,
    query: Option<&str>,
) -> Option<String> {
    let mut clauses: Vec<String> = [("state", status), ("kind", kind), ("priority", priority)]
        .into_iter()
        .filter_map(|(field, value)| {
            let value = value?.trim();
            (!value.is_empty()).then(|| format!("{} = \"{}\"", field, value.replace('"', "\\\"")))
        })
        .collect();

    if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
        if clauses.is_empty() {
            clauses.push(query.to_string());
        } else {
            clauses.push(format!("({})", query));
        }
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" AND "))
    }
}

fn issue_path(workspace: &str, repo_slug: &str, issue_id: u64) -> Result<String, ApiError> {
    Ok(format!("{}/issues/{}", repository_path(workspace, repo_slug)?, issue_id))
}

/// Lists issues in a repository.
pub async fn list_issues(
    client: &BitbucketClient,
    params: &ListIssuesParams,
) -> Result<PaginatedResponse<Issue>, ApiError> {
    let base = format!("{}/issues", repository_path(&params.workspace, &params.repo_slug)?);

    let mut pairs = Vec::new();
    if let Some(q) = build_issue_query(
        params.status.as_deref(),
        params.kind.as_deref(),
        params.priority.as_deref(),
        params.query.as_deref(),
    ) {
        pairs.push(("q", q));
    }
    if let Some(sort) = &params.sort {
        pairs.push(("sort", sort.clone()));
    }
    pairs.extend(page_pairs(params.pagelen, params.page));

    let path = append_query(&base, pairs);
    tracing::debug!("Listing issues: {}", path);
    client.get_json(&path).await
}

/// Fetches one issue.
pub async fn get_issue(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    issue_id: u64,
) -> Result<Issue, ApiError> {
    client.get_json(&issue_path(workspace, repo_slug, issue_id)?).await
}

/// Creates an issue.
pub async fn create_issue(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    request: &CreateIssueRequest,
) -> Result<Issue, ApiError> {
    let path = format!("{}/issues", repository_path(workspace, repo_slug)?);
    client.send_json(Method::POST, &path, Some(request)).await
}

/// Updates an issue with the fields set in `request`.
pub async fn update_issue(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    issue_id: u64,
    request: &UpdateIssueRequest,
) -> Result<Issue, ApiError> {
    let path = issue_path(workspace, repo_slug, issue_id)?;
    client.send_json(Method::PUT, &path, Some(request)).await
}

/// Deletes an issue.
pub async fn delete_issue(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    issue_id: u64,
) -> Result<(), ApiError> {
    let path = issue_path(workspace, repo_slug, issue_id)?;
    client
        .request(&path, RequestOptions::new(Method::DELETE))
        .await?;
    Ok(())
}

/// Lists comments on an issue.
pub async fn list_issue_comments(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    issue_id: u64,
    pagelen: Option<u32>,
    page: Option<u32>,
) -> Result<PaginatedResponse<IssueComment>, ApiError> {
    let base = format!("{}/comments", issue_path(workspace, repo_slug, issue_id)?);
    client
        .get_json(&append_query(&base, page_pairs(pagelen, page)))
        .await
}

/// Adds a markdown comment to an issue.
pub async fn add_issue_comment(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    issue_id: u64,
    content: &str,
) -> Result<IssueComment, ApiError> {
    #[derive(Serialize)]
    struct Body {
        content: ContentInput,
    }

    let path = format!("{}/comments", issue_path(workspace, repo_slug, issue_id)?);
    let body = Body {
        content: ContentInput::markdown(content),
    };
    client.send_json(Method::POST, &path, Some(&body)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_issue_query() {
        assert_eq!(build_issue_query(None, None, None, None), None);
        assert_eq!(build_issue_query(Some(" "), None, None, Some("")), None);
        assert_eq!(
            build_issue_query(None, None, Some("major"), None).as_deref(),
            Some("priority = \"major\"")
        );
        assert_eq!(
            build_issue_query(None, None, None, Some("title ~ \"x\"")).as_deref(),
            Some("title ~ \"x\"")
        );
        assert_eq!(
            build_issue_query(Some("on hold"), None, None, Some("a OR b")).as_deref(),
            Some("state = \"on hold\" AND (a OR b)")
        );
    }

    #[test]
    fn test_update_body_only_has_set_fields() {
        let request = UpdateIssueRequest {
            state: Some("resolved".into()),
            assignee: Some(UserUuid { uuid: "{u}".into() }),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"state": "resolved", "assignee": {"uuid": "{u}"}})
        );
        assert!(UpdateIssueRequest::default().is_empty());
        assert!(!request.is_empty());
    }

    #[test]
    fn test_create_body_uses_markdown_content() {
        let request = CreateIssueRequest {
            title: "Crash".into(),
            content: Some(ContentInput::markdown("It *crashes*")),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"title": "Crash", "content": {"raw": "It *crashes*", "markup": "markdown"}})
        );
    }

    #[test]
    fn test_deserialize_minimal_issue() {
        let issue: Issue = serde_json::from_value(json!({"id": 3, "title": "T"})).unwrap();
        assert_eq!(issue.id, 3);
        assert!(issue.reporter.is_none());
    }
}
