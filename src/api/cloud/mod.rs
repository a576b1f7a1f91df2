//
//  bitbucket-mcp
//  api/cloud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bitbucket Cloud API v2.0 resources.
//!
//! Each submodule holds the serde types for one resource family together
//! with async functions that call the endpoints through a
//! [`BitbucketClient`](crate::api::BitbucketClient).
//!
//! # Module Organization
//!
//! - [`workspaces`] - Workspace memberships and details
//! - [`issues`] - Issue tracker (list, CRUD, comments)
//! - [`pullrequests`] - Pull requests, diffstat, raw diff and comments
//! - [`repositories`] - Branch creation
//! - [`search`] - Workspace code search
//!
//! # Notes
//!
//! - All timestamps are ISO 8601 strings
//! - UUIDs are returned with curly braces (e.g., `{123e4567-e89b-...}`)
//! - List endpoints are page-based (`page`, `pagelen`)

pub mod issues;
pub mod pullrequests;
pub mod repositories;
pub mod search;
pub mod workspaces;

use crate::api::ApiError;

/// Version prefix of every Bitbucket Cloud endpoint.
pub const API_PREFIX: &str = "/2.0";

/// Rejects empty identifiers and identifiers that would escape their path
/// segment.
pub(crate) fn path_segment<'a>(value: &'a str, name: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidRequest(format!("{} is required", name)));
    }
    if trimmed.contains(['/', '?', '#']) {
        return Err(ApiError::InvalidRequest(format!(
            "{} must not contain '/', '?' or '#'",
            name
        )));
    }
    Ok(trimmed)
}

/// Base path of a repository: `/2.0/repositories/{workspace}/{repo}`.
pub(crate) fn repository_path(workspace: &str, repo_slug: &str) -> Result<String, ApiError> {
    Ok(format!(
        "{}/repositories/{}/{}",
        API_PREFIX,
        path_segment(workspace, "workspaceSlug")?,
        path_segment(repo_slug, "repoSlug")?
    ))
}

/// Optional page number and length as query pairs.
pub(crate) fn page_pairs(pagelen: Option<u32>, page: Option<u32>) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(pagelen) = pagelen {
        pairs.push(("pagelen", pagelen.to_string()));
    }
    if let Some(page) = page {
        pairs.push(("page", page.to_string()));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_path() {
        assert_eq!(
            repository_path("acme", " api ").unwrap(),
            "/2.0/repositories/acme/api"
        );
        assert!(matches!(
            repository_path("", "api"),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(repository_path("acme", "../x/y").is_err());
    }

    #[test]
    fn test_page_pairs() {
        assert!(page_pairs(None, None).is_empty());
        assert_eq!(
            page_pairs(Some(10), Some(2)),
            vec![("pagelen", "10".to_string()), ("page", "2".to_string())]
        );
    }
}
