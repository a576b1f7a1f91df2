//
//  bitbucket-mcp
//  controller/workspaces.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Workspace operations.

use super::{non_blank, require_text, ControllerResponse};
use crate::api::cloud::workspaces::{self, ListWorkspacesParams};
use crate::api::ApiError;
use crate::output::format::with_pagination;
use crate::output::workspaces::{format_workspace_details, format_workspaces_list};
use crate::AppContext;

/// Page length used when the caller gives none.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Options for [`list`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// BBQL filter.
    pub query: Option<String>,
    /// Page length.
    pub limit: Option<u32>,
    /// Page number.
    pub page: Option<u32>,
}

/// Lists the workspaces the user belongs to.
pub async fn list(
    context: &AppContext,
    options: ListOptions,
) -> Result<ControllerResponse, ApiError> {
    let client = context.require_client()?;
    let params = ListWorkspacesParams {
        query: non_blank(options.query.as_deref()).map(str::to_string),
        pagelen: Some(options.limit.unwrap_or(DEFAULT_PAGE_SIZE)),
        page: options.page,
    };

    let response = workspaces::list_workspaces(client, &params).await?;
    tracing::debug!("Found {} workspaces", response.values.len());

    let content = format_workspaces_list(&response.values, &chrono::Utc::now());
    Ok(ControllerResponse::new(with_pagination(
        content,
        &response.pagination_info(),
    )))
}

/// Shows one workspace.
pub async fn get(context: &AppContext, workspace_slug: &str) -> Result<ControllerResponse, ApiError> {
    let slug = require_text(workspace_slug, "workspaceSlug")?;
    let client = context.require_client()?;
    let workspace = workspaces::get_workspace(client, slug).await?;
    Ok(ControllerResponse::new(format_workspace_details(
        &workspace,
        &chrono::Utc::now(),
    )))
}
