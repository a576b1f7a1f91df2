//
//  bitbucket-mcp
//  api/cloud/workspaces.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud workspace types and endpoints.
//!
//! Workspaces are the top-level organizational unit in Bitbucket Cloud.
//! Listing goes through the current user's workspace permissions, which
//! also tells us the user's role in each workspace.
//!
//! # Endpoints
//!
//! | Function | Endpoint |
//! |----------|----------|
//! | [`list_workspaces`] | `GET /2.0/user/permissions/workspaces` |
//! | [`get_workspace`] | `GET /2.0/workspaces/{slug}` |
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_mcp::api::cloud::workspaces::{list_workspaces, ListWorkspacesParams};
//! # use bitbucket_mcp::api::BitbucketClient;
//!
//! # async fn example(client: &BitbucketClient) -> Result<(), bitbucket_mcp::api::ApiError> {
//! let page = list_workspaces(client, &ListWorkspacesParams::default()).await?;
//! for membership in &page.values {
//!     println!("{} ({:?})", membership.workspace.slug, membership.permission);
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use super::{page_pairs, path_segment, API_PREFIX};
use crate::api::client::append_query;
use crate::api::common::{Links, PaginatedResponse};
use crate::api::{ApiError, BitbucketClient};

/// A Bitbucket Cloud workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    /// URL-safe identifier used in API paths.
    pub slug: String,

    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,

    /// UUID with curly braces.
    #[serde(default)]
    pub uuid: Option<String>,

    /// Whether the workspace is private.
    #[serde(default)]
    pub is_private: Option<bool>,

    /// ISO 8601 creation timestamp.
    #[serde(default)]
    pub created_on: Option<String>,

    /// ISO 8601 last update timestamp.
    #[serde(default)]
    pub updated_on: Option<String>,

    /// Related links (`html`, `avatar`, `repositories`, `projects`, ...).
    #[serde(default)]
    pub links: Links,
}

/// The current user's membership in a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceMembership {
    /// Role in the workspace (`owner`, `collaborator`, `member`).
    #[serde(default)]
    pub permission: Option<String>,

    /// ISO 8601 timestamp of the user's last access.
    #[serde(default)]
    pub last_accessed: Option<String>,

    /// ISO 8601 timestamp when the user was added.
    #[serde(default)]
    pub added_on: Option<String>,

    /// The workspace itself.
    pub workspace: Workspace,
}

/// Filters for [`list_workspaces`].
#[derive(Debug, Clone, Default)]
pub struct ListWorkspacesParams {
    /// BBQL filter, e.g. `workspace.slug ~ "acme"`.
    pub query: Option<String>,
    /// Page length.
    pub pagelen: Option<u32>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
}

/// Lists the workspaces the authenticated user belongs to.
pub async fn list_workspaces(
    client: &BitbucketClient,
    params: &ListWorkspacesParams,
) -> Result<PaginatedResponse<WorkspaceMembership>, ApiError> {
    let mut pairs = Vec::new();
    if let Some(query) = &params.query {
        pairs.push(("q", query.clone()));
    }
    pairs.extend(page_pairs(params.pagelen, params.page));

    let path = append_query(&format!("{}/user/permissions/workspaces", API_PREFIX), pairs);
    tracing::debug!("Listing workspaces: {}", path);
    client.get_json(&path).await
}

/// Fetches a single workspace by slug.
pub async fn get_workspace(client: &BitbucketClient, slug: &str) -> Result<Workspace, ApiError> {
    let slug = path_segment(slug, "workspaceSlug")?;
    client
        .get_json(&format!("{}/workspaces/{}", API_PREFIX, slug))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_membership() {
        let membership: WorkspaceMembership = serde_json::from_value(serde_json::json!({
            "type": "workspace_membership",
            "permission": "owner",
            "last_accessed": "2024-03-01T10:00:00.000000+00:00",
            "workspace": {
                "slug": "acme",
                "name": "Acme",
                "uuid": "{1}",
                "links": {"html": {"href": "https://bitbucket.org/acme/"}}
            }
        }))
        .unwrap();
        assert_eq!(membership.permission.as_deref(), Some("owner"));
        assert_eq!(membership.workspace.slug, "acme");
        assert_eq!(
            membership.workspace.links.href("html"),
            Some("https://bitbucket.org/acme/")
        );
    }
}
