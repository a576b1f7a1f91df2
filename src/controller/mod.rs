//
//  bitbucket-mcp
//  controller/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Controllers
//!
//! Operations shared by the MCP tools and the CLI commands. Each one
//! validates its input, calls the Bitbucket API through the client held by
//! the [`AppContext`](crate::AppContext) and returns the final text.
//!
//! | Module | Operations |
//! |--------|------------|
//! | [`api`] | Generic GET/POST/PUT/PATCH/DELETE with JMESPath filtering |
//! | [`workspaces`] | List and view workspaces |
//! | [`issues`] | Issue CRUD and comments |
//! | [`pullrequests`] | List, view and read comments on pull requests |
//! | [`repositories`] | Create branches |
//! | [`search`] | Search code across a workspace |

pub mod api;
pub mod issues;
pub mod pullrequests;
pub mod repositories;
pub mod search;
pub mod workspaces;

use crate::api::ApiError;

/// Text returned by every controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerResponse {
    /// Markdown, pretty-printed JSON or raw text.
    pub content: String,
}

impl ControllerResponse {
    /// Wraps already formatted content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Trims `value` and rejects it when empty.
pub(crate) fn require_text<'a>(value: &'a str, field: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}

/// `Some(trimmed)` for non-blank values.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::api::BitbucketClient;
    use crate::auth::Credential;
    use crate::config::HttpConfig;
    use crate::AppContext;

    /// Context whose client talks to a mock server.
    pub fn context(base_url: &str) -> AppContext {
        let credential = Credential::Bitbucket {
            username: "me".into(),
            app_password: "pw".into(),
        };
        let client = BitbucketClient::new(credential, &HttpConfig::default())
            .unwrap()
            .with_base_url(base_url);
        AppContext::with_client(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("  hi ", "title").unwrap(), "hi");
        let err = require_text("   ", "title").unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: title must not be empty");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(" x ")), Some("x"));
        assert_eq!(non_blank(Some(" ")), None);
        assert_eq!(non_blank(None), None);
    }
}
