//
//  bitbucket-mcp
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! This module provides the error taxonomy shared by every API call, plus
//! small data structures that appear across Bitbucket Cloud resources.
//!
//! # Overview
//!
//! - [`ApiError`] - Typed failure of a single request/response cycle
//! - [`Link`] / [`Links`] - HATEOAS-style links attached to resources
//! - [`UserRef`] - Lightweight user reference
//! - [`RenderedText`] - Raw/markup/html text triple used by descriptions and comments
//! - Pagination types (re-exported from [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use bitbucket_mcp::api::common::ApiError;
//!
//! fn describe<T>(result: Result<T, ApiError>) -> String {
//!     match result {
//!         Ok(_) => "ok".to_string(),
//!         Err(ApiError::AuthMissing) => "configure credentials first".to_string(),
//!         Err(ApiError::NotFound(message)) => message,
//!         Err(e) => e.to_string(),
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Unified error type for all Bitbucket API operations.
///
/// Every failed call produces exactly one variant. Nothing is retried;
/// the error is handed back to the caller, which turns it into CLI output
/// or an MCP error result.
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `AuthMissing` | No credentials configured | N/A |
/// | `AuthInvalid` | Credentials rejected or incomplete | 401, 403 |
/// | `NotFound` | Resource does not exist | 404 |
/// | `Api` | Any other non-success response | 4xx, 5xx |
/// | `InvalidRequest` | Caller input rejected before sending | N/A |
/// | `Unexpected` | Network or decoding failure | N/A |
#[derive(Error, Debug)]
pub enum ApiError {
    /// No credentials are configured.
    #[error(
        "Authentication credentials are missing. Set ATLASSIAN_SITE_NAME, ATLASSIAN_USER_EMAIL and \
         ATLASSIAN_API_TOKEN, or ATLASSIAN_BITBUCKET_USERNAME and ATLASSIAN_BITBUCKET_APP_PASSWORD"
    )]
    AuthMissing,

    /// Credentials were rejected by Bitbucket (401/403) or are incomplete.
    #[error("Authentication failed: {0}")]
    AuthInvalid(String),

    /// The requested resource was not found (404).
    ///
    /// The message always contains the phrase "not found".
    #[error("{0}")]
    NotFound(String),

    /// Any other non-success response.
    ///
    /// The raw response body is preserved for diagnostics.
    #[error("Bitbucket API error ({status}): {message}")]
    Api {
        /// Human-readable message extracted from the body when possible.
        message: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The caller's input was rejected before any request was made.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network-level or decoding failure that could not be classified.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Stable machine-readable code for this error class.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthMissing => "auth_missing",
            Self::AuthInvalid(_) => "auth_invalid",
            Self::NotFound(_) => "not_found",
            Self::Api { .. } => "api_error",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Unexpected(_) => "unexpected",
        }
    }

    /// HTTP status associated with the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short remediation hint shown below the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AuthMissing => Some(
                "Export the credential environment variables or add an [atlassian] section to the config file.",
            ),
            Self::AuthInvalid(_) => Some(
                "Check that the API token or app password is valid and has the required scopes.",
            ),
            Self::NotFound(_) => {
                Some("Verify the workspace slug, repository slug and resource id in the path.")
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Unexpected(format!("Request timed out: {}", err))
        } else if err.is_decode() {
            Self::Unexpected(format!("Failed to decode response: {}", err))
        } else {
            Self::Unexpected(format!("Network error: {}", err))
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unexpected(format!("Failed to parse response: {}", err))
    }
}

/// HATEOAS-style link for API resource navigation.
///
/// # Example
///
/// ```rust
/// use bitbucket_mcp::api::common::Link;
///
/// let link = Link {
///     href: "https://bitbucket.org/acme/api".to_string(),
///     name: None,
/// };
/// assert!(link.href.starts_with("https://"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// The URL of the linked resource.
    pub href: String,

    /// Optional descriptive name for the link.
    #[serde(default)]
    pub name: Option<String>,
}

/// Map of link relations (`html`, `self`, `avatar`, `diff`, ...) to links.
///
/// Bitbucket nests each relation as `{"html": {"href": "..."}}`; relations
/// that hold arrays (such as `clone`) are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Links(#[serde(default)] pub HashMap<String, serde_json::Value>);

impl Links {
    /// Returns the `href` for the given relation, if present.
    pub fn href(&self, rel: &str) -> Option<&str> {
        self.0.get(rel)?.get("href")?.as_str()
    }
}

/// Lightweight user reference.
///
/// Bitbucket Cloud returns `display_name` and `nickname`; both are
/// optional here because deleted and team accounts can omit them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRef {
    /// Atlassian account id.
    #[serde(default)]
    pub account_id: Option<String>,

    /// UUID with curly braces.
    #[serde(default)]
    pub uuid: Option<String>,

    /// Display name of the user.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Nickname used in @mentions.
    #[serde(default)]
    pub nickname: Option<String>,
}

impl UserRef {
    /// Display name, then nickname, then the given fallback.
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.display_name
            .as_deref()
            .or(self.nickname.as_deref())
            .unwrap_or(fallback)
    }
}

/// Text field in multiple representations (`raw`, `markup`, `html`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderedText {
    /// The raw content as entered by the user.
    #[serde(default)]
    pub raw: Option<String>,

    /// The markup language of `raw` (usually `markdown`).
    #[serde(default)]
    pub markup: Option<String>,

    /// Pre-rendered HTML.
    #[serde(default)]
    pub html: Option<String>,
}

impl RenderedText {
    /// Raw text when present and not blank.
    pub fn non_empty_raw(&self) -> Option<&str> {
        self.raw.as_deref().filter(|raw| !raw.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::AuthMissing.code(), "auth_missing");
        assert_eq!(ApiError::NotFound("x".into()).code(), "not_found");
        let api = ApiError::Api {
            message: "Bad".into(),
            status: 400,
            body: "{}".into(),
        };
        assert_eq!(api.code(), "api_error");
        assert_eq!(api.status(), Some(400));
        assert!(api.to_string().contains("400"));
    }

    #[test]
    fn test_links_href() {
        let links: Links = serde_json::from_value(serde_json::json!({
            "html": {"href": "https://bitbucket.org/acme"},
            "clone": [{"href": "https://x", "name": "https"}]
        }))
        .unwrap();
        assert_eq!(links.href("html"), Some("https://bitbucket.org/acme"));
        assert_eq!(links.href("clone"), None);
        assert_eq!(links.href("avatar"), None);
    }

    #[test]
    fn test_user_ref_fallback() {
        let user = UserRef {
            nickname: Some("jd".into()),
            ..Default::default()
        };
        assert_eq!(user.name_or("Unknown"), "jd");
        assert_eq!(UserRef::default().name_or("Unknown"), "Unknown");
    }
}
