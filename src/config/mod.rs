//
//  bitbucket-mcp
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads the settings the server and CLI need at start-up: the Atlassian
//! credentials and HTTP options. Values come from an optional TOML file and
//! are then overlaid with environment variables.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. TOML file (see [`default_config_path`])
//! 3. Environment variables (`ATLASSIAN_*`)
//!
//! Empty values are treated as absent in both sources.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [atlassian]
//! site_name = "acme"
//! user_email = "me@acme.com"
//! api_token = "ATATT3x..."
//!
//! [http]
//! timeout_secs = 30
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_mcp::config::Config;
//!
//! let config = Config::load()?;
//! println!("Timeout: {}s", config.http.timeout_secs);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod file;

pub use file::*;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Site name for the standard Atlassian credential.
pub const ENV_SITE_NAME: &str = "ATLASSIAN_SITE_NAME";
/// Account email for the standard Atlassian credential.
pub const ENV_USER_EMAIL: &str = "ATLASSIAN_USER_EMAIL";
/// API token for the standard Atlassian credential.
pub const ENV_API_TOKEN: &str = "ATLASSIAN_API_TOKEN";
/// Username for the Bitbucket app-password credential.
pub const ENV_BITBUCKET_USERNAME: &str = "ATLASSIAN_BITBUCKET_USERNAME";
/// App password for the Bitbucket app-password credential.
pub const ENV_BITBUCKET_APP_PASSWORD: &str = "ATLASSIAN_BITBUCKET_APP_PASSWORD";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Credential material.
    pub atlassian: AtlassianConfig,

    /// HTTP client options.
    pub http: HttpConfig,
}

/// Raw credential fields.
///
/// Nothing here is validated; [`crate::auth::Credential::resolve`] decides
/// which credential, if any, these fields form.
#[derive(Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlassianConfig {
    /// Atlassian site name (`acme` for `acme.atlassian.net`).
    pub site_name: Option<String>,
    /// Atlassian account email.
    pub user_email: Option<String>,
    /// Atlassian API token.
    pub api_token: Option<String>,
    /// Bitbucket username.
    pub bitbucket_username: Option<String>,
    /// Bitbucket app password.
    pub bitbucket_app_password: Option<String>,
}

// Secrets stay out of debug logs.
impl std::fmt::Debug for AtlassianConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("AtlassianConfig")
            .field("site_name", &self.site_name)
            .field("user_email", &self.user_email)
            .field("api_token", &redact(&self.api_token))
            .field("bitbucket_username", &self.bitbucket_username)
            .field("bitbucket_app_password", &redact(&self.bitbucket_app_password))
            .finish()
    }
}

/// HTTP client options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Config {
    /// Loads the configuration file (if any) and applies the process
    /// environment on top.
    ///
    /// A missing file is not an error. A malformed one is.
    pub fn load() -> Result<Self> {
        let path = default_config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Loads a configuration file without applying the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.atlassian.drop_empty();
        Ok(config)
    }

    /// Overlays values returned by `lookup` for the `ATLASSIAN_*` variables.
    ///
    /// Empty values leave the existing field untouched.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bitbucket_mcp::config::Config;
    ///
    /// let mut config = Config::default();
    /// config.apply_env(|key| match key {
    ///     "ATLASSIAN_BITBUCKET_USERNAME" => Some("me".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.atlassian.bitbucket_username.as_deref(), Some("me"));
    /// ```
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let a = &mut self.atlassian;
        for (key, slot) in [
            (ENV_SITE_NAME, &mut a.site_name),
            (ENV_USER_EMAIL, &mut a.user_email),
            (ENV_API_TOKEN, &mut a.api_token),
            (ENV_BITBUCKET_USERNAME, &mut a.bitbucket_username),
            (ENV_BITBUCKET_APP_PASSWORD, &mut a.bitbucket_app_password),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = Some(value);
            }
        }
    }
}

impl AtlassianConfig {
    fn drop_empty(&mut self) {
        for slot in [
            &mut self.site_name,
            &mut self.user_email,
            &mut self.api_token,
            &mut self.bitbucket_username,
            &mut self.bitbucket_app_password,
        ] {
            if slot.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *slot = None;
            }
        }
    }
}
