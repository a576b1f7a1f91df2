//
//  bitbucket-mcp
//  controller/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository operations.

use super::issues::RepoRef;
use super::{require_text, ControllerResponse};
use crate::api::cloud::repositories::{self, CreateBranchRequest};
use crate::api::ApiError;
use crate::output::repositories::format_branch_created;
use crate::AppContext;

/// Creates `new_branch_name` starting at `source` (a branch or commit).
pub async fn add_branch(
    context: &AppContext,
    repo: &RepoRef,
    new_branch_name: &str,
    source: &str,
) -> Result<ControllerResponse, ApiError> {
    let name = require_text(new_branch_name, "newBranchName")?;
    let source = require_text(source, "sourceBranchOrCommit")?;
    let client = context.require_client()?;

    let request = CreateBranchRequest::new(name, source);
    let branch = repositories::create_branch(
        client,
        &repo.workspace_slug,
        &repo.repo_slug,
        &request,
    )
    .await?;
    tracing::info!("Created branch {} from {}", branch.name, source);
    Ok(ControllerResponse::new(format_branch_created(&branch, source)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::test_support::context;
    use mockito::Matcher;
    use serde_json::json;

    fn repo() -> RepoRef {
        RepoRef {
            workspace_slug: "acme".into(),
            repo_slug: "api".into(),
        }
    }

    #[tokio::test]
    async fn test_add_branch_posts_name_and_target() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/2.0/repositories/acme/api/refs/branches")
            .match_body(Matcher::Json(
                json!({"name": "feature/x", "target": {"hash": "main"}}),
            ))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"feature/x","target":{"hash":"abc123"}}"#)
            .create_async()
            .await;

        let response = add_branch(&context(&server.url()), &repo(), " feature/x ", "main")
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(response
            .content
            .contains("Successfully created branch `feature/x` from `main`"));
        assert!(response.content.contains("abc123"));
    }

    #[tokio::test]
    async fn test_add_branch_requires_names() {
        let ctx = context("http://127.0.0.1:1");
        let err = add_branch(&ctx, &repo(), "  ", "main").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid request: newBranchName must not be empty"
        );
        let err = add_branch(&ctx, &repo(), "x", "").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_existing_branch_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/2.0/repositories/acme/api/refs/branches")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"type":"error","error":{"message":"BRANCH_ALREADY_EXISTS"}}"#)
            .create_async()
            .await;

        let err = add_branch(&context(&server.url()), &repo(), "main", "develop")
            .await
            .unwrap_err();
        match err {
            ApiError::Api { message, status, .. } => {
                assert_eq!(status, 400);
                assert_eq!(message, "BRANCH_ALREADY_EXISTS");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
