//
//  bitbucket-mcp
//  output/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Markdown for repository reference changes.

use super::format::{format_bullet_list, FieldValue};
use crate::api::cloud::repositories::Branch;

/// Confirmation after creating a branch from `source`.
pub fn format_branch_created(branch: &Branch, source: &str) -> String {
    let mut lines = vec![
        format!(
            "✓ Successfully created branch `{}` from `{}`",
            branch.name, source
        ),
        String::new(),
    ];
    if let Some(href) = branch.links.href("html") {
        lines.push(format!("View at: {}", href));
        lines.push(String::new());
    }
    let target = branch.target.as_ref();
    lines.push(format_bullet_list(&[
        ("Commit", FieldValue::from(target.map(|t| t.hash.clone()))),
        ("Date", FieldValue::from(target.and_then(|t| t.date.clone()))),
    ]));
    lines.join("\n")
}
