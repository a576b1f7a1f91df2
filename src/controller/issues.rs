//
//  bitbucket-mcp
//  controller/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue tracker operations.
//!
//! Listing folds the `status`, `kind` and `priority` filters into a BBQL
//! `q` expression together with the free-form query. When Bitbucket
//! rejects that expression the error message is extended with a short
//! BBQL syntax reference.

use super::{non_blank, require_text, ControllerResponse};
use crate::api::cloud::issues::{
    self, ContentInput, CreateIssueRequest, ListIssuesParams, UpdateIssueRequest, UserUuid,
};
use crate::api::ApiError;
use crate::output::format::with_pagination;
use crate::output::issues::{
    format_comment_success, format_issue_comments, format_issue_deleted, format_issue_details,
    format_issue_success, format_issues_list,
};
use crate::AppContext;

/// Page length for issue lists.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page length for comment lists.
pub const DEFAULT_COMMENT_PAGE_SIZE: u32 = 20;

const BBQL_ERROR_MARKER: &str = "Invalid filter query expression";

const BBQL_HINT: &str = "Hint: The 'query' parameter expects BBQL (Bitbucket Query Language).\n\
Examples: title ~ \"bug\", state = \"open\" AND priority >= \"major\"\n\
Operators: ~ (contains), = (equals), !=, >, >=, <, <=, AND, OR";

/// Identifies one repository.
#[derive(Debug, Clone, Default)]
pub struct RepoRef {
    /// Workspace slug.
    pub workspace_slug: String,
    /// Repository slug.
    pub repo_slug: String,
}

/// Options for [`list`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// `new`, `open`, `resolved`, `on hold`, `invalid`, `duplicate`, `wontfix`, `closed`.
    pub status: Option<String>,
    /// `bug`, `enhancement`, `proposal`, `task`.
    pub kind: Option<String>,
    /// `trivial`, `minor`, `major`, `critical`, `blocker`.
    pub priority: Option<String>,
    /// Free-form BBQL.
    pub query: Option<String>,
    /// Sort field, e.g. `-updated_on`.
    pub sort: Option<String>,
    /// Page length.
    pub limit: Option<u32>,
    /// Page number.
    pub page: Option<u32>,
}

/// Options for [`create`].
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Title (required).
    pub title: String,
    /// Markdown description.
    pub content: Option<String>,
    /// Issue kind.
    pub kind: Option<String>,
    /// Priority.
    pub priority: Option<String>,
}

/// Options for [`update`]. Only set fields are sent.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// New title.
    pub title: Option<String>,
    /// New markdown description.
    pub content: Option<String>,
    /// New status.
    pub status: Option<String>,
    /// New kind.
    pub kind: Option<String>,
    /// New priority.
    pub priority: Option<String>,
    /// Assignee UUID.
    pub assignee: Option<String>,
}

fn with_bbql_hint(error: ApiError) -> ApiError {
    match error {
        ApiError::Api {
            message,
            status,
            body,
        } if message.contains(BBQL_ERROR_MARKER) || body.contains(BBQL_ERROR_MARKER) => {
            ApiError::Api {
                message: format!("{}\n\n{}", message, BBQL_HINT),
                status,
                body,
            }
        }
        other => other,
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    non_blank(value).map(str::to_string)
}

/// Lists issues matching the filters.
pub async fn list(
    context: &AppContext,
    repo: &RepoRef,
    options: ListOptions,
) -> Result<ControllerResponse, ApiError> {
    let client = context.require_client()?;
    let params = ListIssuesParams {
        workspace: repo.workspace_slug.clone(),
        repo_slug: repo.repo_slug.clone(),
        status: owned(options.status.as_deref()),
        kind: owned(options.kind.as_deref()),
        priority: owned(options.priority.as_deref()),
        query: owned(options.query.as_deref()),
        sort: owned(options.sort.as_deref()),
        pagelen: Some(options.limit.unwrap_or(DEFAULT_PAGE_SIZE)),
        page: options.page,
    };

    let response = issues::list_issues(client, &params)
        .await
        .map_err(with_bbql_hint)?;
    tracing::debug!("Found {} issues", response.values.len());

    Ok(ControllerResponse::new(with_pagination(
        format_issues_list(&response.values),
        &response.pagination_info(),
    )))
}

/// Shows one issue.
pub async fn get(
    context: &AppContext,
    repo: &RepoRef,
    issue_id: u64,
) -> Result<ControllerResponse, ApiError> {
    let client = context.require_client()?;
    let issue = issues::get_issue(client, &repo.workspace_slug, &repo.repo_slug, issue_id).await?;
    Ok(ControllerResponse::new(format_issue_details(&issue)))
}

/// Creates an issue.
pub async fn create(
    context: &AppContext,
    repo: &RepoRef,
    options: CreateOptions,
) -> Result<ControllerResponse, ApiError> {
    let title = require_text(&options.title, "title")?;
    let client = context.require_client()?;
    let request = CreateIssueRequest {
        title: title.to_string(),
        content: non_blank(options.content.as_deref()).map(ContentInput::markdown),
        kind: owned(options.kind.as_deref()),
        priority: owned(options.priority.as_deref()),
    };

    let issue =
        issues::create_issue(client, &repo.workspace_slug, &repo.repo_slug, &request).await?;
    tracing::info!("Created issue #{}", issue.id);
    Ok(ControllerResponse::new(format_issue_success(&issue, "created")))
}

/// Updates an issue.
///
/// # Errors
///
/// [`ApiError::InvalidRequest`] when no field is set.
pub async fn update(
    context: &AppContext,
    repo: &RepoRef,
    issue_id: u64,
    options: UpdateOptions,
) -> Result<ControllerResponse, ApiError> {
    let request = UpdateIssueRequest {
        title: owned(options.title.as_deref()),
        content: non_blank(options.content.as_deref()).map(ContentInput::markdown),
        state: owned(options.status.as_deref()),
        kind: owned(options.kind.as_deref()),
        priority: owned(options.priority.as_deref()),
        assignee: non_blank(options.assignee.as_deref()).map(|uuid| UserUuid {
            uuid: uuid.to_string(),
        }),
    };
    if request.is_empty() {
        return Err(ApiError::InvalidRequest(
            "At least one field to update must be provided".to_string(),
        ));
    }

    let client = context.require_client()?;
    let issue = issues::update_issue(
        client,
        &repo.workspace_slug,
        &repo.repo_slug,
        issue_id,
        &request,
    )
    .await?;
    Ok(ControllerResponse::new(format_issue_success(&issue, "updated")))
}

/// Deletes an issue.
pub async fn delete(
    context: &AppContext,
    repo: &RepoRef,
    issue_id: u64,
) -> Result<ControllerResponse, ApiError> {
    let client = context.require_client()?;
    issues::delete_issue(client, &repo.workspace_slug, &repo.repo_slug, issue_id).await?;
    tracing::info!("Deleted issue #{}", issue_id);
    Ok(ControllerResponse::new(format_issue_deleted(issue_id)))
}

/// Lists comments on an issue.
pub async fn list_comments(
    context: &AppContext,
    repo: &RepoRef,
    issue_id: u64,
    limit: Option<u32>,
    page: Option<u32>,
) -> Result<ControllerResponse, ApiError> {
    let client = context.require_client()?;
    let response = issues::list_issue_comments(
        client,
        &repo.workspace_slug,
        &repo.repo_slug,
        issue_id,
        Some(limit.unwrap_or(DEFAULT_COMMENT_PAGE_SIZE)),
        page,
    )
    .await?;

    Ok(ControllerResponse::new(with_pagination(
        format_issue_comments(&response.values),
        &response.pagination_info(),
    )))
}

/// Adds a comment to an issue.
pub async fn add_comment(
    context: &AppContext,
    repo: &RepoRef,
    issue_id: u64,
    content: &str,
) -> Result<ControllerResponse, ApiError> {
    let content = require_text(content, "content")?;
    let client = context.require_client()?;
    let comment = issues::add_issue_comment(
        client,
        &repo.workspace_slug,
        &repo.repo_slug,
        issue_id,
        content,
    )
    .await?;
    Ok(ControllerResponse::new(format_comment_success(&comment)))
}
