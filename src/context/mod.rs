//
//  bitbucket-mcp
//  context/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Application Context
//!
//! The [`AppContext`] is built once at start-up and handed to every
//! controller, either directly (CLI) or behind an `Arc` (MCP server). It
//! owns the resolved credential and the HTTP client bound to it. The
//! configuration is only read while building the context.
//!
//! There is no global state: a missing credential is remembered as `None`
//! and reported as [`ApiError::AuthMissing`] the first time an operation
//! needs the client, so the MCP server can still start and list its tools.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_mcp::{AppContext, Config};
//!
//! let context = AppContext::new(Config::load()?)?;
//! match context.require_client() {
//!     Ok(client) => println!("Calling {}", client.base_url()),
//!     Err(e) => eprintln!("{}", e),
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::api::{ApiError, BitbucketClient};
use crate::auth::Credential;
use crate::config::Config;

/// Process-wide state shared by the CLI and the MCP server.
#[derive(Debug, Clone)]
pub struct AppContext {
    client: Option<BitbucketClient>,
}

impl AppContext {
    /// Resolves the credential from `config` and builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Only fails if the HTTP client cannot be constructed. A missing
    /// credential is not an error here.
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let client = match Credential::resolve(&config.atlassian) {
            Some(credential) => {
                tracing::debug!("Resolved {} credential", credential.kind());
                Some(BitbucketClient::new(credential, &config.http)?)
            }
            None => None,
        };
        Ok(Self { client })
    }

    /// Context around an existing client.
    ///
    /// Used by tests that point the client at a mock server.
    pub fn with_client(client: BitbucketClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// The active credential, if any.
    pub fn credential(&self) -> Option<&Credential> {
        self.client.as_ref().map(BitbucketClient::credential)
    }

    /// The HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AuthMissing`] when no credential is configured.
    pub fn require_client(&self) -> Result<&BitbucketClient, ApiError> {
        self.client.as_ref().ok_or(ApiError::AuthMissing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AtlassianConfig;

    #[test]
    fn test_missing_credential_is_reported_lazily() {
        let context = AppContext::new(Config::default()).unwrap();
        assert!(context.credential().is_none());
        assert!(matches!(
            context.require_client(),
            Err(ApiError::AuthMissing)
        ));
    }

    #[test]
    fn test_client_uses_credential_base_url() {
        let config = Config {
            atlassian: AtlassianConfig {
                site_name: Some("acme".into()),
                user_email: Some("me@acme.com".into()),
                api_token: Some("tok".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let context = AppContext::new(config).unwrap();
        assert_eq!(
            context.require_client().unwrap().base_url(),
            "https://acme.atlassian.net"
        );
        assert_eq!(context.credential().unwrap().kind(), "standard");
    }
}
