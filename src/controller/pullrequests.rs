//
//  bitbucket-mcp
//  controller/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pull request operations.
//!
//! Details always include the diffstat summary. The full diff and the
//! comment threads are fetched only when asked for. These extra sections
//! are fetched concurrently and a failure in any of them is logged and
//! leaves the section out instead of failing the whole call.

use super::issues::RepoRef;
use super::{non_blank, ControllerResponse};
use crate::api::cloud::pullrequests::{self, ListPullRequestsParams, PullRequestState};
use crate::api::ApiError;
use crate::output::format::with_pagination;
use crate::output::pullrequests::{
    format_pull_request_comments, format_pull_request_details, format_pull_requests_list,
    DetailSections,
};
use crate::AppContext;

/// Page length for pull request and comment lists.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Comments fetched for the details view.
const DETAIL_COMMENT_PAGE_SIZE: u32 = 100;

/// Options for [`list`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// State filter.
    pub state: Option<PullRequestState>,
    /// BBQL filter.
    pub query: Option<String>,
    /// Page length.
    pub limit: Option<u32>,
    /// Page number.
    pub page: Option<u32>,
}

/// Options for [`get`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GetOptions {
    /// Include the raw diff.
    pub include_full_diff: bool,
    /// Include comment threads.
    pub include_comments: bool,
}

/// Lists pull requests.
pub async fn list(
    context: &AppContext,
    repo: &RepoRef,
    options: ListOptions,
) -> Result<ControllerResponse, ApiError> {
    let client = context.require_client()?;
    let params = ListPullRequestsParams {
        workspace: repo.workspace_slug.clone(),
        repo_slug: repo.repo_slug.clone(),
        state: options.state,
        query: non_blank(options.query.as_deref()).map(str::to_string),
        pagelen: Some(options.limit.unwrap_or(DEFAULT_PAGE_SIZE)),
        page: options.page,
    };

    let response = pullrequests::list_pull_requests(client, &params).await?;
    tracing::debug!("Found {} pull requests", response.values.len());

    let content = format_pull_requests_list(&response.values, &chrono::Utc::now());
    Ok(ControllerResponse::new(with_pagination(
        content,
        &response.pagination_info(),
    )))
}

/// Shows one pull request.
pub async fn get(
    context: &AppContext,
    repo: &RepoRef,
    pr_id: u64,
    options: GetOptions,
) -> Result<ControllerResponse, ApiError> {
    let client = context.require_client()?;
    let (ws, slug) = (repo.workspace_slug.as_str(), repo.repo_slug.as_str());

    let pull_request = pullrequests::get_pull_request(client, ws, slug, pr_id).await?;

    let diffstat_fut = pullrequests::get_diffstat(client, ws, slug, pr_id);
    let diff_fut = async {
        if options.include_full_diff {
            Some(pullrequests::get_raw_diff(client, ws, slug, pr_id).await)
        } else {
            None
        }
    };
    let comments_fut = async {
        if options.include_comments {
            Some(
                pullrequests::list_pull_request_comments(
                    client,
                    ws,
                    slug,
                    pr_id,
                    Some(DETAIL_COMMENT_PAGE_SIZE),
                    None,
                )
                .await,
            )
        } else {
            None
        }
    };
    let (diffstat, raw_diff, comments) = tokio::join!(diffstat_fut, diff_fut, comments_fut);

    let diffstat = diffstat
        .map_err(|e| tracing::warn!("Could not fetch diffstat for PR #{}: {}", pr_id, e))
        .ok();
    let raw_diff = raw_diff.and_then(|r| {
        r.map_err(|e| tracing::warn!("Could not fetch diff for PR #{}: {}", pr_id, e))
            .ok()
    });
    let comments = comments.and_then(|r| {
        r.map_err(|e| tracing::warn!("Could not fetch comments for PR #{}: {}", pr_id, e))
            .ok()
    });

    let sections = DetailSections {
        diffstat: diffstat.as_ref().map(|d| d.values.as_slice()),
        raw_diff: raw_diff.as_deref(),
        comments: comments.as_ref().map(|c| c.values.as_slice()),
    };
    Ok(ControllerResponse::new(format_pull_request_details(
        &pull_request,
        sections,
        &chrono::Utc::now(),
    )))
}

/// Lists comments on a pull request, grouped into threads.
pub async fn list_comments(
    context: &AppContext,
    repo: &RepoRef,
    pr_id: u64,
    limit: Option<u32>,
    page: Option<u32>,
) -> Result<ControllerResponse, ApiError> {
    let client = context.require_client()?;
    let response = pullrequests::list_pull_request_comments(
        client,
        &repo.workspace_slug,
        &repo.repo_slug,
        pr_id,
        Some(limit.unwrap_or(DEFAULT_PAGE_SIZE)),
        page,
    )
    .await?;

    let content = format_pull_request_comments(&response.values, pr_id, &chrono::Utc::now());
    Ok(ControllerResponse::new(with_pagination(
        content,
        &response.pagination_info(),
    )))
}
