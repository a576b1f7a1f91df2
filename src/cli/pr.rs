//
//  bitbucket-mcp
//  cli/pr.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pull request commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::cloud::pullrequests::PullRequestState;
use crate::controller::pullrequests::{self, GetOptions, ListOptions};
use crate::output::OutputWriter;
use crate::AppContext;

use super::RepoArgs;

/// Browse pull requests
#[derive(Args, Debug)]
pub struct PrCommand {
    #[command(subcommand)]
    pub command: PrSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PrSubcommand {
    /// List pull requests
    #[command(visible_alias = "list")]
    Ls(ListArgs),

    /// Show a pull request
    #[command(visible_alias = "view")]
    Get(GetArgs),

    /// List comments on a pull request
    Comments(CommentsArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Filter by state
    #[arg(long, short = 's', value_enum, ignore_case = true)]
    pub state: Option<PullRequestState>,

    /// BBQL filter (e.g. 'title ~ "fix"')
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Maximum number of pull requests to list
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Pull request ID
    pub id: u64,

    /// Include the full diff
    #[arg(long)]
    pub diff: bool,

    /// Include comment threads
    #[arg(long, short = 'c')]
    pub comments: bool,
}

#[derive(Args, Debug)]
pub struct CommentsArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Pull request ID
    pub id: u64,

    /// Maximum number of comments to list
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
}

impl PrCommand {
    pub async fn run(&self, context: &AppContext, output: &OutputWriter) -> Result<()> {
        let response = match &self.command {
            PrSubcommand::Ls(args) => {
                let options = ListOptions {
                    state: args.state,
                    query: args.query.clone(),
                    limit: args.limit,
                    page: args.page,
                };
                pullrequests::list(context, &args.repo.to_ref(), options).await?
            }
            PrSubcommand::Get(args) => {
                let options = GetOptions {
                    include_full_diff: args.diff,
                    include_comments: args.comments,
                };
                pullrequests::get(context, &args.repo.to_ref(), args.id, options).await?
            }
            PrSubcommand::Comments(args) => {
                pullrequests::list_comments(
                    context,
                    &args.repo.to_ref(),
                    args.id,
                    args.limit,
                    args.page,
                )
                .await?
            }
        };
        output.write(&response.content);
        Ok(())
    }
}
