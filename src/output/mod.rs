//
//  bitbucket-mcp
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Everything the tools and commands return is text: markdown for the
//! domain operations and pretty-printed JSON for the generic API tools.
//!
//! ## Architecture
//!
//! - [`markdown`]: Markdown primitives and terminal rendering using `termimad`
//! - [`format`]: Shared bullet lists, pagination footers and diff blocks
//! - [`json`]: JMESPath filtering and JSON serialization
//! - [`workspaces`], [`issues`], [`pullrequests`], [`repositories`], [`search`]:
//!   Per-domain formatters
//!
//! ## Core Components
//!
//! - [`OutputWriter`]: Writes controller output to the terminal
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_mcp::output::OutputWriter;
//!
//! let writer = OutputWriter::new(false);
//! writer.write("# Workspaces\n\n- acme");
//! writer.write_plain("{\"slug\": \"acme\"}");
//! ```

pub mod format;
pub mod issues;
pub mod json;
pub mod markdown;
pub mod pullrequests;
pub mod repositories;
pub mod search;
pub mod workspaces;

pub use json::{apply_jq_filter, to_json_string};
pub use markdown::*;

/// Writes command output to the terminal.
///
/// Markdown is rendered with ANSI styling when stdout is a terminal and
/// `--raw` was not given. Piped output is always left as plain markdown.
pub struct OutputWriter {
    render: bool,
    color: bool,
}

impl OutputWriter {
    /// Creates a writer. `raw` disables terminal rendering.
    pub fn new(raw: bool) -> Self {
        Self {
            render: !raw && console::Term::stdout().is_term(),
            color: console::colors_enabled(),
        }
    }

    /// Writes markdown to stdout.
    pub fn write(&self, content: &str) {
        if self.render {
            print!("{}", render_markdown(content));
        } else {
            println!("{}", content);
        }
    }

    /// Writes JSON or other preformatted text to stdout unchanged.
    pub fn write_plain(&self, content: &str) {
        println!("{}", content);
    }

    /// Writes an error message (and optional hint) to stderr.
    pub fn write_error(&self, msg: &str, hint: Option<&str>) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
        if let Some(hint) = hint {
            if self.color {
                eprintln!("{} {}", style("hint:").dim(), hint);
            } else {
                eprintln!("hint: {}", hint);
            }
        }
    }
}
