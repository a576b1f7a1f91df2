//
//  bitbucket-mcp
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access commands
//!
//! `get`, `post`, `put`, `patch` and `delete` call any Bitbucket Cloud
//! endpoint, similar to `gh api` for GitHub. The `/2.0` prefix is added
//! when missing.
//!
//! ## Examples
//!
//! ```bash
//! # List workspace slugs
//! mcp-atlassian-bitbucket get -p /workspaces --jq 'values[*].slug'
//!
//! # Filter with query parameters
//! mcp-atlassian-bitbucket get -p /repositories/acme -q '{"pagelen": "5", "q": "name ~ \"api\""}'
//!
//! # Create an issue (body inline or from a file with @)
//! mcp-atlassian-bitbucket post -p /repositories/acme/api/issues -b '{"title": "Bug"}'
//! mcp-atlassian-bitbucket post -p /repositories/acme/api/issues -b @issue.json
//! ```

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result};
use clap::Args;
use reqwest::Method;
use serde_json::Value;

use crate::api::ApiError;
use crate::controller::api::{self, BodyRequest, GetRequest};
use crate::output::OutputWriter;
use crate::AppContext;

/// Arguments for `get` and `delete`
#[derive(Args, Debug)]
pub struct PathArgs {
    /// API path (e.g., /workspaces or /repositories/acme/api/pullrequests)
    #[arg(long, short = 'p')]
    pub path: String,

    /// Query parameters as a JSON object (e.g., '{"pagelen": "25"}')
    #[arg(long = "query-params", short = 'q', value_name = "JSON")]
    pub query_params: Option<String>,

    /// JMESPath expression applied to the JSON response
    #[arg(long)]
    pub jq: Option<String>,
}

/// Arguments for `post`, `put` and `patch`
#[derive(Args, Debug)]
pub struct BodyArgs {
    #[command(flatten)]
    pub target: PathArgs,

    /// Request body as JSON, or @FILE to read it from a file
    #[arg(long, short = 'b', value_name = "JSON")]
    pub body: String,
}

impl PathArgs {
    fn to_request(&self) -> Result<GetRequest, ApiError> {
        Ok(GetRequest {
            path: self.path.clone(),
            query_params: self
                .query_params
                .as_deref()
                .map(parse_query_params)
                .transpose()?,
            jq: self.jq.clone(),
        })
    }

    /// Runs the request with `GET` or `DELETE`.
    pub async fn run(&self, method: Method, context: &AppContext, output: &OutputWriter) -> Result<()> {
        let request = self.to_request()?;
        let response = if method == Method::DELETE {
            api::handle_delete(context, request).await?
        } else {
            api::handle_get(context, request).await?
        };
        output.write_plain(&response.content);
        Ok(())
    }
}

impl BodyArgs {
    fn to_request(&self) -> Result<BodyRequest> {
        let target = self.target.to_request()?;
        let raw = match self.body.strip_prefix('@') {
            Some(file) => fs::read_to_string(file)
                .with_context(|| format!("Failed to read request body from {}", file))?,
            None => self.body.clone(),
        };
        Ok(BodyRequest {
            path: target.path,
            query_params: target.query_params,
            jq: target.jq,
            body: parse_body(&raw)?,
        })
    }

    /// Runs the request with `POST`, `PUT` or `PATCH`.
    pub async fn run(&self, method: Method, context: &AppContext, output: &OutputWriter) -> Result<()> {
        let request = self.to_request()?;
        let response = match method {
            Method::PUT => api::handle_put(context, request).await?,
            Method::PATCH => api::handle_patch(context, request).await?,
            _ => api::handle_post(context, request).await?,
        };
        output.write_plain(&response.content);
        Ok(())
    }
}

/// Parses `-q` into a parameter map.
///
/// Values may be strings, numbers or booleans; anything else is rejected.
fn parse_query_params(raw: &str) -> Result<BTreeMap<String, String>, ApiError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ApiError::InvalidRequest(format!("--query-params is not valid JSON: {}", e)))?;
    let Value::Object(map) = value else {
        return Err(ApiError::InvalidRequest(
            "--query-params must be a JSON object".to_string(),
        ));
    };

    map.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(ApiError::InvalidRequest(format!(
                        "query parameter '{}' must be a string, number or boolean, got {}",
                        key, other
                    )))
                }
            };
            Ok((key, text))
        })
        .collect()
}

fn parse_body(raw: &str) -> Result<Value, ApiError> {
    serde_json::from_str(raw)
        .map_err(|e| ApiError::InvalidRequest(format!("--body is not valid JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn path_args(query: Option<&str>) -> PathArgs {
        PathArgs {
            path: "/workspaces".into(),
            query_params: query.map(str::to_string),
            jq: None,
        }
    }

    #[test]
    fn test_parse_query_params() {
        let params = parse_query_params(r#"{"pagelen": 5, "q": "name ~ \"api\"", "all": true}"#).unwrap();
        assert_eq!(params["pagelen"], "5");
        assert_eq!(params["q"], "name ~ \"api\"");
        assert_eq!(params["all"], "true");
    }

    #[test]
    fn test_parse_query_params_rejects_non_objects() {
        assert!(matches!(
            parse_query_params("[1, 2]"),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            parse_query_params(r#"{"a": {"b": 1}}"#),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            parse_query_params("pagelen=5"),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_body_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "Bug"}}"#).unwrap();

        let args = BodyArgs {
            target: path_args(None),
            body: format!("@{}", file.path().display()),
        };
        let request = args.to_request().unwrap();
        assert_eq!(request.body["title"], "Bug");
        assert!(request.query_params.is_none());
    }

    #[test]
    fn test_invalid_body_is_invalid_request() {
        let args = BodyArgs {
            target: path_args(Some(r#"{"pagelen": "5"}"#)),
            body: "notjson".into(),
        };
        let err = args.to_request().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::InvalidRequest(_))
        ));
    }
}
