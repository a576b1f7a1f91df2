//
//  bitbucket-mcp
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use reqwest::Method;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bitbucket_mcp::api::ApiError;
use bitbucket_mcp::cli::{Cli, Commands, GlobalOptions};
use bitbucket_mcp::config::Config;
use bitbucket_mcp::output::OutputWriter;
use bitbucket_mcp::{exit_codes, mcp, AppContext};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let output = OutputWriter::new(cli.global.raw);
    match run(cli, &output).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            let (code, hint) = match e.downcast_ref::<ApiError>() {
                Some(api_error) => (exit_code_for(api_error), api_error.hint()),
                None => (exit_codes::ERROR, None),
            };
            output.write_error(&format!("{e:#}"), hint);
            std::process::exit(code);
        }
    }
}

/// Initialize logging to stderr.
///
/// `BB_MCP_LOG` takes a full filter directive. Otherwise `DEBUG=true`
/// selects debug, and `-v` raises the level step by step.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env("BB_MCP_LOG").unwrap_or_else(|_| {
        let debug_env = std::env::var("DEBUG")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);
        let level = match verbose {
            _ if debug_env => "debug",
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::new(level)
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code_for(error: &ApiError) -> i32 {
    match error {
        ApiError::InvalidRequest(_) => exit_codes::USAGE,
        ApiError::AuthMissing | ApiError::AuthInvalid(_) => exit_codes::AUTH_ERROR,
        ApiError::NotFound(_) => exit_codes::NOT_FOUND,
        _ => exit_codes::ERROR,
    }
}

fn load_config(global: &GlobalOptions) -> Result<Config> {
    match &global.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            Ok(config)
        }
        None => Config::load(),
    }
}

/// Main command dispatcher
async fn run(cli: Cli, output: &OutputWriter) -> Result<()> {
    if let Some(Commands::Completion(cmd)) = &cli.command {
        return cmd.run();
    }

    let context = AppContext::new(load_config(&cli.global)?)?;

    match cli.command {
        None | Some(Commands::Serve) => mcp::serve(context).await,
        Some(Commands::Get(args)) => args.run(Method::GET, &context, output).await,
        Some(Commands::Delete(args)) => args.run(Method::DELETE, &context, output).await,
        Some(Commands::Post(args)) => args.run(Method::POST, &context, output).await,
        Some(Commands::Put(args)) => args.run(Method::PUT, &context, output).await,
        Some(Commands::Patch(args)) => args.run(Method::PATCH, &context, output).await,
        Some(Commands::Workspaces(cmd)) => cmd.run(&context, output).await,
        Some(Commands::Issues(cmd)) => cmd.run(&context, output).await,
        Some(Commands::Prs(cmd)) => cmd.run(&context, output).await,
        Some(Commands::Repos(cmd)) => cmd.run(&context, output).await,
        Some(Commands::Search(cmd)) => cmd.run(&context, output).await,
        Some(Commands::Completion(cmd)) => cmd.run(),
    }
}
