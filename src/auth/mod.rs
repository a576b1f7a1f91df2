//
//  bitbucket-mcp
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Decides which credential the process talks to Bitbucket with, and how
//! that credential turns into a base URL and an `Authorization` header.
//!
//! ## Supported Credentials
//!
//! - **Standard**: Atlassian site name, account email and API token. Requests
//!   go to `https://{site}.atlassian.net`.
//! - **Bitbucket**: Bitbucket username and app password. Requests go to
//!   `https://api.bitbucket.org`.
//!
//! Both authenticate with HTTP Basic. When both are configured the standard
//! credential wins.
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_mcp::auth::Credential;
//! use bitbucket_mcp::config::AtlassianConfig;
//!
//! let config = AtlassianConfig {
//!     bitbucket_username: Some("me".to_string()),
//!     bitbucket_app_password: Some("app-pass".to_string()),
//!     ..Default::default()
//! };
//!
//! let credential = Credential::resolve(&config).expect("credential");
//! assert_eq!(credential.base_url(), "https://api.bitbucket.org");
//! ```

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::RequestBuilder;

use crate::api::ApiError;
use crate::config::AtlassianConfig;

/// Base URL used with the Bitbucket app-password credential.
pub const BITBUCKET_API_BASE: &str = "https://api.bitbucket.org";

/// The credential used for every outbound request.
///
/// Exactly one variant is active for the lifetime of the process. It is
/// resolved once at start-up and never refreshed.
///
/// # Variants
///
/// - `Standard`: Atlassian site, email and API token
/// - `Bitbucket`: Bitbucket username and app password
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Standard Atlassian credential.
    Standard {
        /// Site name (`acme` for `acme.atlassian.net`).
        site_name: String,
        /// Account email.
        user_email: String,
        /// API token.
        api_token: String,
    },
    /// Bitbucket app-password credential.
    Bitbucket {
        /// Bitbucket username.
        username: String,
        /// App password.
        app_password: String,
    },
}

impl Credential {
    /// Selects a credential from raw configuration.
    ///
    /// # Returns
    ///
    /// - `Some(Standard)` when site, email and token are all non-empty
    /// - otherwise `Some(Bitbucket)` when username and app password are non-empty
    /// - otherwise `None`, after logging a warning
    ///
    /// Callers turn `None` into [`ApiError::AuthMissing`].
    pub fn resolve(config: &AtlassianConfig) -> Option<Self> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }

        if let (Some(site), Some(email), Some(token)) = (
            present(&config.site_name),
            present(&config.user_email),
            present(&config.api_token),
        ) {
            tracing::debug!("Using standard Atlassian credentials");
            return Some(Self::Standard {
                site_name: site.to_string(),
                user_email: email.to_string(),
                api_token: token.to_string(),
            });
        }

        if let (Some(username), Some(app_password)) = (
            present(&config.bitbucket_username),
            present(&config.bitbucket_app_password),
        ) {
            tracing::debug!("Using Bitbucket app password credentials");
            return Some(Self::Bitbucket {
                username: username.to_string(),
                app_password: app_password.to_string(),
            });
        }

        tracing::warn!(
            "Missing Atlassian credentials. Set ATLASSIAN_SITE_NAME, ATLASSIAN_USER_EMAIL and \
             ATLASSIAN_API_TOKEN, or ATLASSIAN_BITBUCKET_USERNAME and \
             ATLASSIAN_BITBUCKET_APP_PASSWORD"
        );
        None
    }

    /// Short label for logs and status output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Standard { .. } => "standard",
            Self::Bitbucket { .. } => "bitbucket",
        }
    }

    /// Base URL that request paths are appended to.
    pub fn base_url(&self) -> String {
        match self {
            Self::Standard { site_name, .. } => format!("https://{}.atlassian.net", site_name),
            Self::Bitbucket { .. } => BITBUCKET_API_BASE.to_string(),
        }
    }

    /// Builds the `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AuthInvalid`] when any sub-field is empty. This
    /// only happens for credentials constructed by hand, since
    /// [`Credential::resolve`] never yields empty fields.
    pub fn authorization_header(&self) -> Result<String, ApiError> {
        let (user, secret) = match self {
            Self::Standard {
                site_name,
                user_email,
                api_token,
            } => {
                if site_name.is_empty() || user_email.is_empty() || api_token.is_empty() {
                    return Err(ApiError::AuthInvalid(
                        "Missing Atlassian credentials".to_string(),
                    ));
                }
                (user_email, api_token)
            }
            Self::Bitbucket {
                username,
                app_password,
            } => {
                if username.is_empty() || app_password.is_empty() {
                    return Err(ApiError::AuthInvalid(
                        "Missing Bitbucket username or app password".to_string(),
                    ));
                }
                (username, app_password)
            }
        };
        Ok(format!("Basic {}", STANDARD.encode(format!("{}:{}", user, secret))))
    }

    /// Applies the `Authorization` header to a request.
    pub fn apply_to_request(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        Ok(request.header(reqwest::header::AUTHORIZATION, self.authorization_header()?))
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard {
                site_name,
                user_email,
                ..
            } => f
                .debug_struct("Standard")
                .field("site_name", site_name)
                .field("user_email", user_email)
                .finish_non_exhaustive(),
            Self::Bitbucket { username, .. } => f
                .debug_struct("Bitbucket")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}
