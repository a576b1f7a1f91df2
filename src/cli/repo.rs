//
//  bitbucket-mcp
//  cli/repo.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::controller::repositories;
use crate::output::OutputWriter;
use crate::AppContext;

use super::RepoArgs;

/// Work with repositories
#[derive(Args, Debug)]
pub struct RepoCommand {
    #[command(subcommand)]
    pub command: RepoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RepoSubcommand {
    /// Create a branch from an existing branch or commit
    AddBranch(AddBranchArgs),
}

#[derive(Args, Debug)]
pub struct AddBranchArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Name of the new branch
    #[arg(long = "new-branch-name", short = 'n')]
    pub name: String,

    /// Branch name or commit hash to start from
    #[arg(long = "source-branch-or-commit", short = 's')]
    pub source: String,
}

impl RepoCommand {
    pub async fn run(&self, context: &AppContext, output: &OutputWriter) -> Result<()> {
        let response = match &self.command {
            RepoSubcommand::AddBranch(args) => {
                repositories::add_branch(context, &args.repo.to_ref(), &args.name, &args.source)
                    .await?
            }
        };
        output.write(&response.content);
        Ok(())
    }
}
