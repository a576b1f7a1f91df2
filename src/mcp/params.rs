//
//  bitbucket-mcp
//  mcp/params.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Tool argument schemas. Field docs become the JSON Schema descriptions
//! shown to MCP clients.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Deserialize;

use crate::api::cloud::pullrequests::PullRequestState;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetParams {
    /// API path relative to the API root, e.g. "/workspaces" or
    /// "/repositories/{workspace}/{repo}/pullrequests". "/2.0" is added when missing.
    pub path: String,
    /// Query parameters appended to the path, e.g. {"pagelen": "25", "q": "state=\"OPEN\""}.
    pub query_params: Option<BTreeMap<String, String>>,
    /// JMESPath expression applied to the JSON response, e.g. "values[*].slug".
    pub jq: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BodyParams {
    /// API path relative to the API root. "/2.0" is added when missing.
    pub path: String,
    /// JSON request body.
    pub body: serde_json::Value,
    /// Query parameters appended to the path.
    pub query_params: Option<BTreeMap<String, String>>,
    /// JMESPath expression applied to the JSON response.
    pub jq: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkspacesParams {
    /// Maximum number of workspaces to return (default: 25).
    pub limit: Option<u32>,
    /// Page number for pagination.
    pub page: Option<u32>,
    /// BBQL filter, e.g. workspace.slug ~ "acme".
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetWorkspaceParams {
    /// Workspace slug, e.g. "myteam".
    pub workspace_slug: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListIssuesParams {
    /// Workspace slug.
    pub workspace_slug: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Filter by status: new, open, resolved, on hold, invalid, duplicate, wontfix, closed.
    pub status: Option<String>,
    /// Filter by kind: bug, enhancement, proposal, task.
    pub kind: Option<String>,
    /// Filter by priority: trivial, minor, major, critical, blocker.
    pub priority: Option<String>,
    /// BBQL filter expression. Operators: ~ (contains), = (equals), !=, >, >=, <, <=.
    /// Logical: AND, OR. Examples: title ~ "bug", state="open" AND priority>="major".
    pub query: Option<String>,
    /// Sort field, e.g. "created_on" or "-updated_on" for descending.
    pub sort: Option<String>,
    /// Maximum number of issues to return (default: 10).
    pub limit: Option<u32>,
    /// Page number for pagination.
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueParams {
    /// Workspace slug.
    pub workspace_slug: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Issue ID number.
    pub issue_id: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueParams {
    /// Workspace slug.
    pub workspace_slug: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Issue title.
    pub title: String,
    /// Issue description in markdown.
    pub content: Option<String>,
    /// Issue kind: bug, enhancement, proposal, task.
    pub kind: Option<String>,
    /// Issue priority: trivial, minor, major, critical, blocker.
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueParams {
    /// Workspace slug.
    pub workspace_slug: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Issue ID number.
    pub issue_id: u64,
    /// New title.
    pub title: Option<String>,
    /// New description in markdown.
    pub content: Option<String>,
    /// New status.
    pub status: Option<String>,
    /// New kind.
    pub kind: Option<String>,
    /// New priority.
    pub priority: Option<String>,
    /// UUID of the user to assign.
    pub assignee: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListIssueCommentsParams {
    /// Workspace slug.
    pub workspace_slug: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Issue ID number.
    pub issue_id: u64,
    /// Maximum number of comments (default: 20).
    pub limit: Option<u32>,
    /// Page number for pagination.
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddIssueCommentParams {
    /// Workspace slug.
    pub workspace_slug: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Issue ID number.
    pub issue_id: u64,
    /// Comment content in markdown.
    pub content: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPullRequestsParams {
    /// Workspace slug.
    pub workspace_slug: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Filter by state. Bitbucket returns OPEN pull requests when omitted.
    pub state: Option<PullRequestState>,
    /// BBQL filter, e.g. title ~ "fix" or author.nickname = "ana".
    pub query: Option<String>,
    /// Maximum number of pull requests to return (default: 25).
    pub limit: Option<u32>,
    /// Page number for pagination.
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPullRequestParams {
    /// Workspace slug.
    pub workspace_slug: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Numeric pull request ID as a string, e.g. "42".
    pub pr_id: String,
    /// Include the full unified diff (first 5 files, 100 lines each).
    pub include_full_diff: Option<bool>,
    /// Include comment threads.
    pub include_comments: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPullRequestCommentsParams {
    /// Workspace slug.
    pub workspace_slug: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Numeric pull request ID as a string, e.g. "42".
    pub pr_id: String,
    /// Maximum number of comments (default: 25).
    pub limit: Option<u32>,
    /// Page number for pagination.
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddBranchParams {
    /// Workspace slug.
    pub workspace_slug: String,
    /// Repository slug.
    pub repo_slug: String,
    /// Name of the branch to create, e.g. "feature/login".
    pub new_branch_name: String,
    /// Branch name or commit hash the new branch starts from, e.g. "main".
    pub source_branch_or_commit: String,
}
