//
//  bitbucket-mcp
//  cli/workspace.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Workspace commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::controller::workspaces::{self, ListOptions};
use crate::output::OutputWriter;
use crate::AppContext;

/// Browse workspaces
#[derive(Args, Debug)]
pub struct WorkspaceCommand {
    #[command(subcommand)]
    pub command: WorkspaceSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceSubcommand {
    /// List workspaces you belong to
    #[command(visible_alias = "list")]
    Ls(ListArgs),

    /// Show a workspace
    #[command(visible_alias = "view")]
    Get(GetArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// BBQL filter
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Maximum number of workspaces to list
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Workspace slug
    pub workspace: String,
}

impl WorkspaceCommand {
    pub async fn run(&self, context: &AppContext, output: &OutputWriter) -> Result<()> {
        let response = match &self.command {
            WorkspaceSubcommand::Ls(args) => {
                workspaces::list(
                    context,
                    ListOptions {
                        query: args.query.clone(),
                        limit: args.limit,
                        page: args.page,
                    },
                )
                .await?
            }
            WorkspaceSubcommand::Get(args) => workspaces::get(context, &args.workspace).await?,
        };
        output.write(&response.content);
        Ok(())
    }
}
