//
//  bitbucket-mcp
//  cli/search.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Code search command
//!
//! Code search must be enabled for the workspace in Bitbucket.

use anyhow::Result;
use clap::Args;

use crate::controller::search::{self, CodeSearchOptions};
use crate::output::OutputWriter;
use crate::AppContext;

/// Search code across a workspace
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Workspace slug
    #[arg(long, short = 'w', env = "BB_WORKSPACE")]
    pub workspace: String,

    /// Restrict the search to one repository
    #[arg(long, short = 'r')]
    pub repo: Option<String>,

    /// Text to search for
    #[arg(long, short = 'q')]
    pub query: String,

    /// Language filter (e.g. rust, typescript, hcl)
    #[arg(long)]
    pub language: Option<String>,

    /// File extension filter (e.g. rs)
    #[arg(long)]
    pub extension: Option<String>,

    /// Maximum number of files to list
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
}

impl SearchCommand {
    pub async fn run(&self, context: &AppContext, output: &OutputWriter) -> Result<()> {
        let options = CodeSearchOptions {
            workspace_slug: self.workspace.clone(),
            query: self.query.clone(),
            repo_slug: self.repo.clone(),
            language: self.language.clone(),
            extension: self.extension.clone(),
            limit: self.limit,
            page: self.page,
        };
        let response = search::search_code(context, options).await?;
        output.write(&response.content);
        Ok(())
    }
}
