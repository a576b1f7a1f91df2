//
//  bitbucket-mcp
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! HTTP access to the Bitbucket Cloud REST API (v2.0).
//!
//! ## Architecture
//!
//! - [`client`]: Authenticated transport and response classification
//! - [`cloud`]: Typed services for workspaces, issues and pull requests
//! - [`common`]: Error taxonomy, pagination and shared resource types
//!
//! ## Error Handling
//!
//! Every call returns `Result<_, ApiError>`:
//!
//! - `AuthMissing`: no credential configured
//! - `AuthInvalid`: 401 / 403
//! - `NotFound`: 404
//! - `Api`: any other non-success status
//! - `InvalidRequest`: input rejected before sending
//! - `Unexpected`: network or decoding failure

/// Authenticated transport.
///
/// Provides [`BitbucketClient`], [`client::RequestOptions`] and
/// [`client::ResponseBody`].
pub mod client;

/// Bitbucket Cloud API v2.0 resources.
pub mod cloud;

/// Types shared across resources.
pub mod common;

pub use client::{BitbucketClient, RequestOptions, ResponseBody};
pub use common::ApiError;
