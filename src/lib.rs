//
//  bitbucket-mcp
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket MCP Library
//!
//! A thin adapter that exposes the Bitbucket Cloud REST API as Model Context
//! Protocol (MCP) tools, with a parallel command-line front end.
//!
//! ## Overview
//!
//! Tool invocations and CLI commands are translated into authenticated HTTP
//! calls against Bitbucket. Responses come back as JSON (optionally reshaped
//! with a JMESPath expression) or as markdown for the workspace, issue and
//! pull request domains.
//!
//! ## Module Structure
//!
//! - [`auth`]: Credential resolution (standard Atlassian token or Bitbucket app password)
//! - [`api`]: Authenticated transport, error taxonomy and Bitbucket Cloud types
//! - [`config`]: Configuration file and environment loading
//! - [`context`]: Process-wide application context (config, credential, client)
//! - [`controller`]: Operations shared by the CLI and the MCP server
//! - [`output`]: Markdown, JSON and JMESPath formatting
//! - [`mcp`]: MCP server and tool definitions
//! - [`cli`]: Command-line interface definitions using clap
//! - [`util`]: Date and string helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bitbucket_mcp::{AppContext, Config};
//! use bitbucket_mcp::controller::api::{handle_get, GetRequest};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let context = AppContext::new(Config::load()?)?;
//! let response = handle_get(
//!     &context,
//!     GetRequest {
//!         path: "/workspaces".to_string(),
//!         query_params: None,
//!         jq: Some("values[*].slug".to_string()),
//!     },
//! )
//! .await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the clap derive API.
pub mod cli;

/// Authenticated transport and Bitbucket Cloud API types.
///
/// The [`api::BitbucketClient`] builds the base URL and Basic-Auth header
/// for the active credential, issues the request, and classifies the
/// response into [`api::ApiError`] variants.
pub mod api;

/// Credential resolution.
///
/// Selects between the standard Atlassian credential (site, email, API
/// token) and the Bitbucket-specific one (username, app password).
pub mod auth;

/// Configuration file and environment management.
pub mod config;

/// Application context shared by the CLI and the MCP server.
pub mod context;

/// Operations shared by the CLI and the MCP server.
///
/// Each controller function takes the [`AppContext`], performs one or more
/// API calls, and returns a [`controller::ControllerResponse`] holding the
/// final text shown to the user.
pub mod controller;

/// Output formatting.
///
/// Provides markdown building blocks, the domain formatters for
/// workspaces, issues and pull requests, and JSON/JMESPath helpers.
pub mod output;

/// Model Context Protocol server.
pub mod mcp;

/// Utility functions and helpers.
pub mod util;

pub use cli::Cli;
pub use config::Config;
pub use context::AppContext;

/// Package name reported to MCP clients.
pub const PACKAGE_NAME: &str = "bitbucket-mcp";

/// CLI binary name, used for help text and completion scripts.
pub const CLI_NAME: &str = "mcp-atlassian-bitbucket";

/// Application version constant.
///
/// Derived from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use bitbucket_mcp::VERSION;
///
/// println!("{} version {}", bitbucket_mcp::CLI_NAME, VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing scripts
/// to programmatically detect the outcome of CLI operations.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    ///
    /// The command was invoked with invalid arguments, for example a
    /// `--body` that is not valid JSON or a malformed `--jq` expression.
    pub const USAGE: i32 = 2;

    /// Authentication missing or rejected.
    ///
    /// Either no credentials are configured, or Bitbucket answered with
    /// 401/403.
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found.
    ///
    /// The requested resource does not exist or the user does not have
    /// permission to see it.
    pub const NOT_FOUND: i32 = 8;
}
