//
//  bitbucket-mcp
//  cli/issue.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue commands
//!
//! Issues are only available on repositories with the issue tracker
//! enabled.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::controller::issues::{self, CreateOptions, ListOptions, UpdateOptions};
use crate::output::OutputWriter;
use crate::AppContext;

use super::RepoArgs;

const STATES: [&str; 8] = [
    "new", "open", "resolved", "on hold", "invalid", "duplicate", "wontfix", "closed",
];
const KINDS: [&str; 4] = ["bug", "enhancement", "proposal", "task"];
const PRIORITIES: [&str; 5] = ["trivial", "minor", "major", "critical", "blocker"];

/// Manage repository issues
#[derive(Args, Debug)]
pub struct IssueCommand {
    #[command(subcommand)]
    pub command: IssueSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IssueSubcommand {
    /// List issues
    #[command(visible_alias = "list")]
    Ls(ListArgs),

    /// Show an issue
    #[command(visible_alias = "view")]
    Get(IdArgs),

    /// Create an issue
    Create(CreateArgs),

    /// Update fields of an issue
    #[command(visible_alias = "edit")]
    Update(UpdateArgs),

    /// Delete an issue
    Delete(IdArgs),

    /// List comments on an issue
    Comments(CommentsArgs),

    /// Comment on an issue
    Comment(CommentArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Filter by status
    #[arg(long, short = 's', value_parser = STATES)]
    pub status: Option<String>,

    /// Filter by kind
    #[arg(long, short = 'k', value_parser = KINDS)]
    pub kind: Option<String>,

    /// Filter by priority
    #[arg(long, value_parser = PRIORITIES)]
    pub priority: Option<String>,

    /// BBQL filter (e.g. 'title ~ "crash"')
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Sort field, prefix with - for descending (e.g. -updated_on)
    #[arg(long, allow_hyphen_values = true)]
    pub sort: Option<String>,

    /// Maximum number of issues to list
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Issue ID
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Issue title
    #[arg(long, short = 't')]
    pub title: String,

    /// Issue description (markdown)
    #[arg(long, short = 'b')]
    pub content: Option<String>,

    /// Kind
    #[arg(long, short = 'k', value_parser = KINDS)]
    pub kind: Option<String>,

    /// Priority
    #[arg(long, value_parser = PRIORITIES)]
    pub priority: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Issue ID
    pub id: u64,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description (markdown)
    #[arg(long, short = 'b')]
    pub content: Option<String>,

    /// New status
    #[arg(long, short = 's', value_parser = STATES)]
    pub status: Option<String>,

    /// New kind
    #[arg(long, short = 'k', value_parser = KINDS)]
    pub kind: Option<String>,

    /// New priority
    #[arg(long, value_parser = PRIORITIES)]
    pub priority: Option<String>,

    /// Assignee account UUID
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,
}

#[derive(Args, Debug)]
pub struct CommentsArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Issue ID
    pub id: u64,

    /// Maximum number of comments to list
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
}

#[derive(Args, Debug)]
pub struct CommentArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Issue ID
    pub id: u64,

    /// Comment text (markdown)
    #[arg(long, short = 'b')]
    pub body: String,
}

impl IssueCommand {
    pub async fn run(&self, context: &AppContext, output: &OutputWriter) -> Result<()> {
        let response = match &self.command {
            IssueSubcommand::Ls(args) => {
                let options = ListOptions {
                    status: args.status.clone(),
                    kind: args.kind.clone(),
                    priority: args.priority.clone(),
                    query: args.query.clone(),
                    sort: args.sort.clone(),
                    limit: args.limit,
                    page: args.page,
                };
                issues::list(context, &args.repo.to_ref(), options).await?
            }
            IssueSubcommand::Get(args) => issues::get(context, &args.repo.to_ref(), args.id).await?,
            IssueSubcommand::Create(args) => {
                let options = CreateOptions {
                    title: args.title.clone(),
                    content: args.content.clone(),
                    kind: args.kind.clone(),
                    priority: args.priority.clone(),
                };
                issues::create(context, &args.repo.to_ref(), options).await?
            }
            IssueSubcommand::Update(args) => {
                let options = UpdateOptions {
                    title: args.title.clone(),
                    content: args.content.clone(),
                    status: args.status.clone(),
                    kind: args.kind.clone(),
                    priority: args.priority.clone(),
                    assignee: args.assignee.clone(),
                };
                issues::update(context, &args.repo.to_ref(), args.id, options).await?
            }
            IssueSubcommand::Delete(args) => {
                issues::delete(context, &args.repo.to_ref(), args.id).await?
            }
            IssueSubcommand::Comments(args) => {
                issues::list_comments(context, &args.repo.to_ref(), args.id, args.limit, args.page)
                    .await?
            }
            IssueSubcommand::Comment(args) => {
                issues::add_comment(context, &args.repo.to_ref(), args.id, &args.body).await?
            }
        };
        output.write(&response.content);
        Ok(())
    }
}
