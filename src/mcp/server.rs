//
//  bitbucket-mcp
//  mcp/server.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! MCP tool router.
//!
//! Each tool maps its arguments onto a controller call. Controller errors
//! never surface as protocol errors; they become tool results flagged with
//! `is_error` so the model can read the message and the hint.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};

use super::params::{
    AddBranchParams, AddIssueCommentParams, BodyParams, CreateIssueParams, GetParams, GetPullRequestParams,
    GetWorkspaceParams, IssueParams, ListIssueCommentsParams, ListIssuesParams,
    ListPullRequestCommentsParams, ListPullRequestsParams, ListWorkspacesParams,
    UpdateIssueParams,
};
use crate::api::ApiError;
use crate::controller::api::{BodyRequest, GetRequest};
use crate::controller::issues::RepoRef;
use crate::controller::{api, issues, pullrequests, repositories, workspaces, ControllerResponse};
use crate::AppContext;

/// Bitbucket MCP server.
#[derive(Clone)]
pub struct BitbucketMcpServer {
    context: Arc<AppContext>,
    tool_router: ToolRouter<Self>,
}

/// Turns a controller outcome into a tool result.
pub(crate) fn into_tool_result(result: Result<ControllerResponse, ApiError>) -> CallToolResult {
    match result {
        Ok(response) => CallToolResult::success(vec![Content::text(response.content)]),
        Err(e) => {
            tracing::warn!("Tool call failed ({}): {}", e.code(), e);
            let mut text = format!("**Error** ({}): {}", e.code(), e);
            if let Some(hint) = e.hint() {
                text.push_str(&format!("\n\n{}", hint));
            }
            let mut result = CallToolResult::success(vec![Content::text(text)]);
            result.is_error = Some(true);
            result
        }
    }
}

fn parse_pr_id(value: &str) -> Result<u64, ApiError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            ApiError::InvalidRequest(format!("prId must be a positive integer, got '{}'", value))
        })
}

fn repo_ref(workspace_slug: String, repo_slug: String) -> RepoRef {
    RepoRef {
        workspace_slug,
        repo_slug,
    }
}

#[tool_router]
impl BitbucketMcpServer {
    pub fn new(context: Arc<AppContext>) -> Self {
        Self {
            context,
            tool_router: Self::tool_router(),
        }
    }

    // Generic API access

    #[tool(
        name = "bb_get",
        description = "GET any Bitbucket Cloud REST API path. The /2.0 prefix is added automatically. \
                       Returns pretty-printed JSON, optionally filtered with a JMESPath expression (jq).",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn bb_get(&self, params: Parameters<GetParams>) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let request = GetRequest {
            path: p.path,
            query_params: p.query_params,
            jq: p.jq,
        };
        Ok(into_tool_result(api::handle_get(&self.context, request).await))
    }

    #[tool(
        name = "bb_post",
        description = "POST a JSON body to any Bitbucket Cloud REST API path, e.g. create a pull request or comment."
    )]
    async fn bb_post(&self, params: Parameters<BodyParams>) -> Result<CallToolResult, McpError> {
        let p = params.0;
        Ok(into_tool_result(
            api::handle_post(&self.context, body_request(p)).await,
        ))
    }

    #[tool(
        name = "bb_put",
        description = "PUT a JSON body to any Bitbucket Cloud REST API path to replace a resource.",
        annotations(idempotent_hint = true)
    )]
    async fn bb_put(&self, params: Parameters<BodyParams>) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(
            api::handle_put(&self.context, body_request(params.0)).await,
        ))
    }

    #[tool(
        name = "bb_patch",
        description = "PATCH a JSON body to any Bitbucket Cloud REST API path to partially update a resource."
    )]
    async fn bb_patch(&self, params: Parameters<BodyParams>) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(
            api::handle_patch(&self.context, body_request(params.0)).await,
        ))
    }

    #[tool(
        name = "bb_delete",
        description = "DELETE any Bitbucket Cloud REST API path.",
        annotations(destructive_hint = true, idempotent_hint = true)
    )]
    async fn bb_delete(&self, params: Parameters<GetParams>) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let request = GetRequest {
            path: p.path,
            query_params: p.query_params,
            jq: p.jq,
        };
        Ok(into_tool_result(api::handle_delete(&self.context, request).await))
    }

    // Workspaces

    #[tool(
        name = "bb_ls_workspaces",
        description = "List the Bitbucket workspaces the authenticated user belongs to, with permission and access dates.",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn bb_ls_workspaces(
        &self,
        params: Parameters<ListWorkspacesParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let options = workspaces::ListOptions {
            query: p.query,
            limit: p.limit,
            page: p.page,
        };
        Ok(into_tool_result(workspaces::list(&self.context, options).await))
    }

    #[tool(
        name = "bb_get_workspace",
        description = "Show details and links for one Bitbucket workspace.",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn bb_get_workspace(
        &self,
        params: Parameters<GetWorkspaceParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(
            workspaces::get(&self.context, &params.0.workspace_slug).await,
        ))
    }

    // Issues

    #[tool(
        name = "bb_ls_issues",
        description = "List issues in a repository. Supports status, kind and priority filters, BBQL queries and sorting.",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn bb_ls_issues(
        &self,
        params: Parameters<ListIssuesParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let repo = repo_ref(p.workspace_slug, p.repo_slug);
        let options = issues::ListOptions {
            status: p.status,
            kind: p.kind,
            priority: p.priority,
            query: p.query,
            sort: p.sort,
            limit: p.limit,
            page: p.page,
        };
        Ok(into_tool_result(
            issues::list(&self.context, &repo, options).await,
        ))
    }

    #[tool(
        name = "bb_get_issue",
        description = "Show one issue with its description, state, people and dates.",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn bb_get_issue(&self, params: Parameters<IssueParams>) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let repo = repo_ref(p.workspace_slug, p.repo_slug);
        Ok(into_tool_result(
            issues::get(&self.context, &repo, p.issue_id).await,
        ))
    }

    #[tool(
        name = "bb_create_issue",
        description = "Create an issue in a repository. The issue tracker must be enabled."
    )]
    async fn bb_create_issue(
        &self,
        params: Parameters<CreateIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let repo = repo_ref(p.workspace_slug, p.repo_slug);
        let options = issues::CreateOptions {
            title: p.title,
            content: p.content,
            kind: p.kind,
            priority: p.priority,
        };
        Ok(into_tool_result(
            issues::create(&self.context, &repo, options).await,
        ))
    }

    #[tool(
        name = "bb_update_issue",
        description = "Update the title, description, status, kind, priority or assignee of an issue. \
                       Only the given fields change.",
        annotations(idempotent_hint = true)
    )]
    async fn bb_update_issue(
        &self,
        params: Parameters<UpdateIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let repo = repo_ref(p.workspace_slug, p.repo_slug);
        let options = issues::UpdateOptions {
            title: p.title,
            content: p.content,
            status: p.status,
            kind: p.kind,
            priority: p.priority,
            assignee: p.assignee,
        };
        Ok(into_tool_result(
            issues::update(&self.context, &repo, p.issue_id, options).await,
        ))
    }

    #[tool(
        name = "bb_delete_issue",
        description = "Permanently delete an issue.",
        annotations(destructive_hint = true, idempotent_hint = true)
    )]
    async fn bb_delete_issue(
        &self,
        params: Parameters<IssueParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let repo = repo_ref(p.workspace_slug, p.repo_slug);
        Ok(into_tool_result(
            issues::delete(&self.context, &repo, p.issue_id).await,
        ))
    }

    #[tool(
        name = "bb_ls_issue_comments",
        description = "List comments on an issue.",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn bb_ls_issue_comments(
        &self,
        params: Parameters<ListIssueCommentsParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let repo = repo_ref(p.workspace_slug, p.repo_slug);
        Ok(into_tool_result(
            issues::list_comments(&self.context, &repo, p.issue_id, p.limit, p.page).await,
        ))
    }

    #[tool(
        name = "bb_add_issue_comment",
        description = "Add a markdown comment to an issue."
    )]
    async fn bb_add_issue_comment(
        &self,
        params: Parameters<AddIssueCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let repo = repo_ref(p.workspace_slug, p.repo_slug);
        Ok(into_tool_result(
            issues::add_comment(&self.context, &repo, p.issue_id, &p.content).await,
        ))
    }

    // Repositories

    #[tool(
        name = "bb_add_branch",
        description = "Create a branch in a repository from an existing branch or commit. \
                       Requires repository write permission."
    )]
    async fn bb_add_branch(
        &self,
        params: Parameters<AddBranchParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let repo = repo_ref(p.workspace_slug, p.repo_slug);
        Ok(into_tool_result(
            repositories::add_branch(
                &self.context,
                &repo,
                &p.new_branch_name,
                &p.source_branch_or_commit,
            )
            .await,
        ))
    }

    // Pull requests

    #[tool(
        name = "bb_ls_prs",
        description = "List pull requests in a repository, optionally filtered by state or a BBQL query.",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn bb_ls_prs(
        &self,
        params: Parameters<ListPullRequestsParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let repo = repo_ref(p.workspace_slug, p.repo_slug);
        let options = pullrequests::ListOptions {
            state: p.state,
            query: p.query,
            limit: p.limit,
            page: p.page,
        };
        Ok(into_tool_result(
            pullrequests::list(&self.context, &repo, options).await,
        ))
    }

    #[tool(
        name = "bb_get_pr",
        description = "Show a pull request with its reviewers, description and file change summary. \
                       Optionally includes the full diff and comment threads.",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn bb_get_pr(
        &self,
        params: Parameters<GetPullRequestParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let pr_id = match parse_pr_id(&p.pr_id) {
            Ok(id) => id,
            Err(e) => return Ok(into_tool_result(Err(e))),
        };
        let repo = repo_ref(p.workspace_slug, p.repo_slug);
        let options = pullrequests::GetOptions {
            include_full_diff: p.include_full_diff.unwrap_or(false),
            include_comments: p.include_comments.unwrap_or(false),
        };
        Ok(into_tool_result(
            pullrequests::get(&self.context, &repo, pr_id, options).await,
        ))
    }

    #[tool(
        name = "bb_ls_pr_comments",
        description = "List comments on a pull request, grouped into threads with inline file locations.",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn bb_ls_pr_comments(
        &self,
        params: Parameters<ListPullRequestCommentsParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let pr_id = match parse_pr_id(&p.pr_id) {
            Ok(id) => id,
            Err(e) => return Ok(into_tool_result(Err(e))),
        };
        let repo = repo_ref(p.workspace_slug, p.repo_slug);
        Ok(into_tool_result(
            pullrequests::list_comments(&self.context, &repo, pr_id, p.limit, p.page).await,
        ))
    }
}

fn body_request(p: BodyParams) -> BodyRequest {
    BodyRequest {
        path: p.path,
        query_params: p.query_params,
        jq: p.jq,
        body: p.body,
    }
}

#[tool_handler]
impl ServerHandler for BitbucketMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Bitbucket Cloud tools. Use bb_ls_workspaces to discover workspaces, the bb_*_issue \
                 and bb_*_pr tools for formatted issue and pull request views, bb_add_branch to \
                 create branches, and bb_get/bb_post/\
                 bb_put/bb_patch/bb_delete for any other REST endpoint under /2.0."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
