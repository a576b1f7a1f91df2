//
//  bitbucket-mcp
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod completion;
mod issue;
mod pr;
mod repo;
mod search;
mod workspace;

pub use api::{BodyArgs, PathArgs};
pub use completion::CompletionCommand;
pub use issue::IssueCommand;
pub use pr::PrCommand;
pub use repo::RepoCommand;
pub use search::SearchCommand;
pub use workspace::WorkspaceCommand;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Bitbucket MCP server and CLI
#[derive(Parser, Debug)]
#[command(
    name = crate::CLI_NAME,
    version,
    about = "Bitbucket Cloud tools for MCP clients and the command line",
    long_about = "Exposes the Bitbucket Cloud REST API as Model Context Protocol tools.\n\n\
                  Run without a subcommand (or with 'serve') to start the MCP server on stdio. \
                  The other subcommands call the same operations from the terminal.",
    propagate_version = true,
    after_help = "Credentials are read from ATLASSIAN_SITE_NAME, ATLASSIAN_USER_EMAIL and \
                  ATLASSIAN_API_TOKEN, or ATLASSIAN_BITBUCKET_USERNAME and \
                  ATLASSIAN_BITBUCKET_APP_PASSWORD."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print markdown source instead of rendering it
    #[arg(long, global = true)]
    pub raw: bool,

    /// Path to the configuration file
    #[arg(long, global = true, env = crate::config::CONFIG_PATH_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the MCP server on stdio (default)
    Serve,

    /// GET any API path
    Get(PathArgs),

    /// POST a JSON body to any API path
    Post(BodyArgs),

    /// PUT a JSON body to any API path
    Put(BodyArgs),

    /// PATCH a JSON body to any API path
    Patch(BodyArgs),

    /// DELETE any API path
    Delete(PathArgs),

    /// Browse workspaces
    #[command(visible_alias = "ws")]
    Workspaces(WorkspaceCommand),

    /// Manage repository issues
    Issues(IssueCommand),

    /// Browse pull requests
    #[command(visible_alias = "pr")]
    Prs(PrCommand),

    /// Work with repositories
    #[command(visible_alias = "repo")]
    Repos(RepoCommand),

    /// Search code across a workspace
    Search(SearchCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),
}

/// Workspace and repository selection shared by the issue and PR commands
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Workspace slug
    #[arg(long, short = 'w', env = "BB_WORKSPACE")]
    pub workspace: String,

    /// Repository slug
    #[arg(long, short = 'r', env = "BB_REPO")]
    pub repo: String,
}

impl RepoArgs {
    pub fn to_ref(&self) -> crate::controller::issues::RepoRef {
        crate::controller::issues::RepoRef {
            workspace_slug: self.workspace.clone(),
            repo_slug: self.repo.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from([crate::CLI_NAME]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.global.raw);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([crate::CLI_NAME, "get", "-p", "/user", "-vv", "--raw"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.raw);
        match cli.command {
            Some(Commands::Get(args)) => assert_eq!(args.path, "/user"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_post_requires_body() {
        assert!(Cli::try_parse_from([crate::CLI_NAME, "post", "-p", "/x"]).is_err());
    }

    #[test]
    fn test_issue_list_args() {
        let cli = Cli::try_parse_from([
            crate::CLI_NAME,
            "issues",
            "ls",
            "-w",
            "acme",
            "-r",
            "api",
            "--status",
            "open",
            "--limit",
            "5",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Issues(_))));
    }

    #[test]
    fn test_add_branch_args() {
        let cli = Cli::try_parse_from([
            crate::CLI_NAME,
            "repo",
            "add-branch",
            "-w",
            "acme",
            "-r",
            "api",
            "-n",
            "feature/x",
            "-s",
            "main",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Repos(cmd)) => match cmd.command {
                repo::RepoSubcommand::AddBranch(args) => {
                    assert_eq!(args.name, "feature/x");
                    assert_eq!(args.source, "main");
                    assert_eq!(args.repo.workspace, "acme");
                }
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from([crate::CLI_NAME, "search", "-w", "acme"]).is_err());
        let cli =
            Cli::try_parse_from([crate::CLI_NAME, "search", "-w", "acme", "-q", "token"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Search(_))));
    }
}
