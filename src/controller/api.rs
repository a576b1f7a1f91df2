//
//  bitbucket-mcp
//  controller/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Generic API access.
//!
//! These handlers back the `bb_get`, `bb_post`, `bb_put`, `bb_patch` and
//! `bb_delete` tools and the matching CLI commands. Paths are relative to
//! the API root; `/2.0` is prepended when missing.
//!
//! ```text
//! "workspaces"            -> /2.0/workspaces
//! "/2.0/repositories/acme" -> /2.0/repositories/acme
//! ```
//!
//! JSON responses are filtered with the optional JMESPath expression and
//! pretty-printed. Plain-text responses (diffs, patches) are returned as-is
//! and the filter is ignored.

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::Value;

use super::ControllerResponse;
use crate::api::client::{append_query_verbatim, normalize_path};
use crate::api::cloud::API_PREFIX;
use crate::api::{ApiError, RequestOptions, ResponseBody};
use crate::output::{apply_jq_filter, to_json_string};
use crate::AppContext;

/// Arguments of a request without a body.
#[derive(Debug, Clone, Default)]
pub struct GetRequest {
    /// API path, e.g. `/workspaces` or `/2.0/repositories/acme/api`.
    pub path: String,
    /// Query parameters appended to the path.
    pub query_params: Option<BTreeMap<String, String>>,
    /// JMESPath expression applied to the JSON response.
    pub jq: Option<String>,
}

/// Arguments of a request with a JSON body.
#[derive(Debug, Clone, Default)]
pub struct BodyRequest {
    /// API path.
    pub path: String,
    /// Query parameters appended to the path.
    pub query_params: Option<BTreeMap<String, String>>,
    /// JMESPath expression applied to the JSON response.
    pub jq: Option<String>,
    /// Request body.
    pub body: Value,
}

/// Builds the request path: leading `/`, `/2.0` prefix, encoded query.
/// Empty query values are sent as `key=`.
pub fn build_api_path(path: &str, query_params: Option<&BTreeMap<String, String>>) -> String {
    let mut normalized = normalize_path(path.trim());
    if normalized != API_PREFIX && !normalized.starts_with(&format!("{}/", API_PREFIX)) {
        normalized = format!("{}{}", API_PREFIX, normalized);
    }
    match query_params {
        Some(params) => append_query_verbatim(
            &normalized,
            params.iter().map(|(k, v)| (k.as_str(), v.clone())),
        ),
        None => normalized,
    }
}

async fn handle_request(
    context: &AppContext,
    method: Method,
    path: &str,
    query_params: Option<&BTreeMap<String, String>>,
    jq: Option<&str>,
    body: Option<Value>,
) -> Result<ControllerResponse, ApiError> {
    let client = context.require_client()?;
    let full_path = build_api_path(path, query_params);
    tracing::debug!("{} {}", method, full_path);

    let mut options = RequestOptions::new(method);
    options.body = body;

    match client.request(&full_path, options).await? {
        ResponseBody::Text(text) => Ok(ControllerResponse::new(text)),
        ResponseBody::Json(value) => {
            let filtered = apply_jq_filter(&value, jq)?;
            Ok(ControllerResponse::new(to_json_string(&filtered)?))
        }
    }
}

/// `GET` any API path.
pub async fn handle_get(
    context: &AppContext,
    request: GetRequest,
) -> Result<ControllerResponse, ApiError> {
    handle_request(
        context,
        Method::GET,
        &request.path,
        request.query_params.as_ref(),
        request.jq.as_deref(),
        None,
    )
    .await
}

/// `DELETE` any API path.
pub async fn handle_delete(
    context: &AppContext,
    request: GetRequest,
) -> Result<ControllerResponse, ApiError> {
    handle_request(
        context,
        Method::DELETE,
        &request.path,
        request.query_params.as_ref(),
        request.jq.as_deref(),
        None,
    )
    .await
}

async fn handle_with_body(
    context: &AppContext,
    method: Method,
    request: BodyRequest,
) -> Result<ControllerResponse, ApiError> {
    handle_request(
        context,
        method,
        &request.path,
        request.query_params.as_ref(),
        request.jq.as_deref(),
        Some(request.body),
    )
    .await
}

/// `POST` a JSON body.
pub async fn handle_post(
    context: &AppContext,
    request: BodyRequest,
) -> Result<ControllerResponse, ApiError> {
    handle_with_body(context, Method::POST, request).await
}

/// `PUT` a JSON body.
pub async fn handle_put(
    context: &AppContext,
    request: BodyRequest,
) -> Result<ControllerResponse, ApiError> {
    handle_with_body(context, Method::PUT, request).await
}

/// `PATCH` a JSON body.
pub async fn handle_patch(
    context: &AppContext,
    request: BodyRequest,
) -> Result<ControllerResponse, ApiError> {
    handle_with_body(context, Method::PATCH, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::controller::test_support::context;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_build_api_path() {
        assert_eq!(build_api_path("workspaces", None), "/2.0/workspaces");
        assert_eq!(build_api_path("/2.0/user", None), "/2.0/user");
        assert_eq!(build_api_path("/2.0", None), "/2.0");
        assert_eq!(build_api_path("/2.0x", None), "/2.0/2.0x");

        let mut params = BTreeMap::new();
        params.insert("pagelen".to_string(), "5".to_string());
        params.insert("q".to_string(), "name ~ \"api\"".to_string());
        assert_eq!(
            build_api_path("/repositories/acme?role=member", Some(&params)),
            "/2.0/repositories/acme?role=member&pagelen=5&q=name+%7E+%22api%22"
        );
    }

    #[test]
    fn test_build_api_path_keeps_empty_query_values() {
        let mut params = BTreeMap::new();
        params.insert("fields".to_string(), String::new());
        params.insert("pagelen".to_string(), "5".to_string());
        assert_eq!(
            build_api_path("/user", Some(&params)),
            "/2.0/user?fields=&pagelen=5"
        );
    }

    #[tokio::test]
    async fn test_get_applies_jq_and_pretty_prints() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2.0/workspaces")
            .match_query(Matcher::UrlEncoded("pagelen".into(), "2".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"values":[{"slug":"acme"},{"slug":"beta"}]}"#)
            .create_async()
            .await;

        let mut params = BTreeMap::new();
        params.insert("pagelen".to_string(), "2".to_string());
        let response = handle_get(
            &context(&server.url()),
            GetRequest {
                path: "workspaces".into(),
                query_params: Some(params),
                jq: Some("values[*].slug".into()),
            },
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(response.content, "[\n  \"acme\",\n  \"beta\"\n]");
    }

    #[tokio::test]
    async fn test_text_response_ignores_jq() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2.0/repositories/acme/api/diff/main")
            .with_status(200)
            .with_header("content-type", "text/plain; charset=utf-8")
            .with_body("diff --git a/x b/x\n")
            .create_async()
            .await;

        let response = handle_get(
            &context(&server.url()),
            GetRequest {
                path: "/repositories/acme/api/diff/main".into(),
                jq: Some("values".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(response.content, "diff --git a/x b/x\n");
    }

    #[tokio::test]
    async fn test_post_sends_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/2.0/repositories/acme/api/issues")
            .match_body(Matcher::Json(json!({"title": "Bug"})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 9, "title": "Bug"}"#)
            .create_async()
            .await;

        let response = handle_post(
            &context(&server.url()),
            BodyRequest {
                path: "/repositories/acme/api/issues".into(),
                jq: Some("id".into()),
                body: json!({"title": "Bug"}),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(response.content, "9");
    }

    #[tokio::test]
    async fn test_delete_empty_body_is_null() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/2.0/repositories/acme/api/issues/9")
            .with_status(204)
            .create_async()
            .await;

        let response = handle_delete(
            &context(&server.url()),
            GetRequest {
                path: "/repositories/acme/api/issues/9".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(response.content, "null");
    }

    #[tokio::test]
    async fn test_put_and_patch_use_their_methods() {
        let mut server = mockito::Server::new_async().await;
        let put = server
            .mock("PUT", "/2.0/x")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;
        let patch = server
            .mock("PATCH", "/2.0/x")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let ctx = context(&server.url());
        let request = BodyRequest {
            path: "x".into(),
            body: json!({}),
            ..Default::default()
        };
        handle_put(&ctx, request.clone()).await.unwrap();
        handle_patch(&ctx, request).await.unwrap();

        put.assert_async().await;
        patch.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let ctx = AppContext::new(Config::default()).unwrap();
        let err = handle_get(&ctx, GetRequest::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::AuthMissing));
    }

    #[tokio::test]
    async fn test_invalid_jq_is_invalid_request() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2.0/user")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let err = handle_get(
            &context(&server.url()),
            GetRequest {
                path: "/user".into(),
                jq: Some("[".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
