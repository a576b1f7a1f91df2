//
//  bitbucket-mcp
//  api/cloud/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud repository references.
//!
//! Only branch creation is covered. Repository metadata is reachable
//! through the generic API tools.
//!
//! # Endpoints
//!
//! | Function | Endpoint |
//! |----------|----------|
//! | [`create_branch`] | `POST /2.0/repositories/{workspace}/{repo}/refs/branches` |
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_mcp::api::cloud::repositories::{create_branch, CreateBranchRequest};
//! # use bitbucket_mcp::api::BitbucketClient;
//!
//! # async fn example(client: &BitbucketClient) -> Result<(), bitbucket_mcp::api::ApiError> {
//! let request = CreateBranchRequest::new("feature/login", "main");
//! let branch = create_branch(client, "acme", "api", &request).await?;
//! println!("{} at {:?}", branch.name, branch.target.map(|t| t.hash));
//! # Ok(())
//! # }
//! ```

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::repository_path;
use crate::api::common::Links;
use crate::api::{ApiError, BitbucketClient};

/// A branch within a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name, e.g. `main` or `feature/login`.
    pub name: String,

    /// Type classification (`branch`, `named_branch`).
    #[serde(rename = "type", default)]
    pub branch_type: Option<String>,

    /// Commit the branch points at.
    #[serde(default)]
    pub target: Option<BranchTarget>,

    /// Related links (`html`, `commits`, ...).
    #[serde(default)]
    pub links: Links,
}

/// The commit a branch points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchTarget {
    /// Full commit hash.
    pub hash: String,

    /// ISO 8601 commit timestamp.
    #[serde(default)]
    pub date: Option<String>,

    /// Commit message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of [`create_branch`].
///
/// `target.hash` accepts either a commit hash or a branch name.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBranchRequest {
    /// New branch name.
    pub name: String,
    /// Where the branch starts.
    pub target: TargetRef,
}

/// Source of a new branch.
#[derive(Debug, Clone, Serialize)]
pub struct TargetRef {
    /// Branch name or commit hash.
    pub hash: String,
}

impl CreateBranchRequest {
    /// Request for `name` starting at `source`.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: TargetRef {
                hash: source.into(),
            },
        }
    }
}

/// Creates a branch.
///
/// # Errors
///
/// Bitbucket answers 400 when the branch already exists or the source
/// cannot be resolved; that surfaces as [`ApiError::Api`].
pub async fn create_branch(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    request: &CreateBranchRequest,
) -> Result<Branch, ApiError> {
    let path = format!("{}/refs/branches", repository_path(workspace, repo_slug)?);
    tracing::debug!("Creating branch {} from {}", request.name, request.target.hash);
    client.send_json(Method::POST, &path, Some(request)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_branch_request_shape() {
        let body = serde_json::to_value(CreateBranchRequest::new("feature/x", "main")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"name": "feature/x", "target": {"hash": "main"}})
        );
    }

    #[test]
    fn test_deserialize_branch() {
        let branch: Branch = serde_json::from_value(serde_json::json!({
            "type": "branch",
            "name": "feature/x",
            "target": {"hash": "abc123", "date": "2024-03-01T10:00:00+00:00"},
            "links": {"html": {"href": "https://bitbucket.org/acme/api/branch/feature/x"}}
        }))
        .unwrap();
        assert_eq!(branch.branch_type.as_deref(), Some("branch"));
        assert_eq!(branch.target.unwrap().hash, "abc123");
        assert!(branch.links.href("html").is_some());
    }
}
