//
//  bitbucket-mcp
//  mcp/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # MCP Server
//!
//! Exposes the Bitbucket operations as Model Context Protocol tools over
//! stdio. Stdout carries JSON-RPC only; all logging goes to stderr.

pub mod params;
pub mod server;

use std::sync::Arc;

use anyhow::Result;
use rmcp::ServiceExt;

pub use server::BitbucketMcpServer;

use crate::AppContext;

/// Serves the tools on stdin/stdout until the client disconnects.
pub async fn serve(context: AppContext) -> Result<()> {
    if context.credential().is_none() {
        tracing::warn!("No Bitbucket credentials configured; tool calls will fail until they are set");
    }
    tracing::info!("Starting {} v{} on stdio", crate::PACKAGE_NAME, crate::VERSION);

    let server = BitbucketMcpServer::new(Arc::new(context));
    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    tracing::info!("MCP client disconnected");
    Ok(())
}
