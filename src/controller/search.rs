//
//  bitbucket-mcp
//  controller/search.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Code search.

use super::{non_blank, require_text, ControllerResponse};
use crate::api::cloud::search::{self, CodeSearchParams, CodeSearchResponse};
use crate::api::common::PaginationInfo;
use crate::api::ApiError;
use crate::output::format::with_pagination;
use crate::output::search::format_code_search_results;
use crate::AppContext;

/// Page length for code search.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Options for [`search_code`].
#[derive(Debug, Clone, Default)]
pub struct CodeSearchOptions {
    /// Workspace slug (required).
    pub workspace_slug: String,
    /// Search text (required).
    pub query: String,
    /// Restrict to one repository.
    pub repo_slug: Option<String>,
    /// Language filter.
    pub language: Option<String>,
    /// File extension filter.
    pub extension: Option<String>,
    /// Page length.
    pub limit: Option<u32>,
    /// Page number.
    pub page: Option<u32>,
}

/// Page metadata for a code search response, which carries no `next` link.
fn pagination_info(response: &CodeSearchResponse, pagelen: u32) -> PaginationInfo {
    let page = response.page.unwrap_or(1);
    let pagelen = response.pagelen.unwrap_or(pagelen);
    let has_more = u64::from(page) * u64::from(pagelen) < u64::from(response.size);
    PaginationInfo {
        count: response.values.len(),
        has_more,
        next_cursor: has_more.then(|| (page + 1).to_string()),
        total: Some(response.size),
        page: Some(page),
        size: Some(pagelen),
    }
}

/// Searches code across a workspace.
pub async fn search_code(
    context: &AppContext,
    options: CodeSearchOptions,
) -> Result<ControllerResponse, ApiError> {
    let workspace = require_text(&options.workspace_slug, "workspaceSlug")?;
    let query = require_text(&options.query, "query")?;
    let client = context.require_client()?;
    let pagelen = options.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let params = CodeSearchParams {
        workspace: workspace.to_string(),
        query: query.to_string(),
        repo_slug: non_blank(options.repo_slug.as_deref()).map(str::to_string),
        language: non_blank(options.language.as_deref()).map(str::to_string),
        extension: non_blank(options.extension.as_deref()).map(str::to_string),
        pagelen: Some(pagelen),
        page: options.page,
    };
    let response = search::search_code(client, &params).await?;
    tracing::debug!("Code search matched {} files", response.size);

    let content = format_code_search_results(&response.values, response.size, &chrono::Utc::now());
    Ok(ControllerResponse::new(with_pagination(
        content,
        &pagination_info(&response, pagelen),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::test_support::context;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_search_builds_query_with_modifiers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2.0/workspaces/acme/search/code")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "search_query".into(),
                    "token repo:api lang:ts ext:ts".into(),
                ),
                Matcher::UrlEncoded("pagelen".into(), "10".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"size":12,"page":1,"pagelen":10,"values":[{
                    "content_match_count":2,
                    "content_matches":[{"lines":[{"line":7,"segments":[{"text":"const "},{"text":"token","match":true}]}]}],
                    "file":{"path":"src/auth.ts"}}]}"#,
            )
            .create_async()
            .await;

        let response = search_code(
            &context(&server.url()),
            CodeSearchOptions {
                workspace_slug: "acme".into(),
                query: "token".into(),
                repo_slug: Some("api".into()),
                language: Some("typescript".into()),
                extension: Some("ts".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert!(response.content.contains("## src/auth.ts"));
        assert!(response.content.contains("7: const `token`"));
        assert!(response.content.contains("2 matches found"));
        assert!(response.content.contains("request page 2"));
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let err = search_code(
            &context("http://127.0.0.1:1"),
            CodeSearchOptions {
                workspace_slug: "acme".into(),
                query: " ".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: query must not be empty");
    }

    #[test]
    fn test_last_page_has_no_more() {
        let response: CodeSearchResponse =
            serde_json::from_str(r#"{"size":12,"page":2,"pagelen":10,"values":[]}"#).unwrap();
        let info = pagination_info(&response, 10);
        assert!(!info.has_more);
        assert_eq!(info.next_cursor, None);
        assert_eq!(info.total, Some(12));
    }
}
