//
//  bitbucket-mcp
//  output/workspaces.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Markdown for workspace lists and details.

use chrono::{DateTime, Utc};

use super::format::{format_bullet_list, format_numbered_list, format_retrieved_at, FieldValue};
use super::markdown::{md_header, md_link};
use crate::api::cloud::workspaces::{Workspace, WorkspaceMembership};

/// Lists the workspaces the user belongs to.
pub fn format_workspaces_list(memberships: &[WorkspaceMembership], now: &DateTime<Utc>) -> String {
    if memberships.is_empty() {
        return "No Bitbucket workspaces found.".to_string();
    }

    let items = format_numbered_list(memberships, |membership, _| {
        let ws = &membership.workspace;
        let heading = md_header(2, ws.name.as_deref().unwrap_or(&ws.slug));
        let fields = format_bullet_list(&[
            ("Slug", FieldValue::from(ws.slug.as_str())),
            ("UUID", FieldValue::from(ws.uuid.clone())),
            ("Permission", FieldValue::from(membership.permission.clone())),
            ("Last Accessed", FieldValue::from(membership.last_accessed.clone())),
            ("Added On", FieldValue::from(membership.added_on.clone())),
            (
                "URL",
                ws.links
                    .href("html")
                    .map(|href| FieldValue::link(href, &ws.slug))
                    .unwrap_or(FieldValue::Missing),
            ),
        ]);
        format!("{}\n\n{}", heading, fields)
    });

    format!(
        "{}\n\n{}{}",
        md_header(1, "Bitbucket Workspaces"),
        items,
        format_retrieved_at(now)
    )
}

/// Details of a single workspace.
pub fn format_workspace_details(ws: &Workspace, now: &DateTime<Utc>) -> String {
    let title = ws.name.as_deref().unwrap_or(&ws.slug);
    let mut lines = vec![
        md_header(1, &format!("Workspace: {}", title)),
        String::new(),
        md_header(2, "Basic Information"),
        format_bullet_list(&[
            ("Name", FieldValue::from(ws.name.clone())),
            ("Slug", FieldValue::from(ws.slug.as_str())),
            ("UUID", FieldValue::from(ws.uuid.clone())),
            ("Private", FieldValue::from(ws.is_private)),
            ("Created", FieldValue::from(ws.created_on.clone())),
            ("Updated", FieldValue::from(ws.updated_on.clone())),
        ]),
    ];

    let links: Vec<String> = [
        ("html", "View in Browser"),
        ("repositories", "Repositories"),
        ("projects", "Projects"),
        ("members", "Members"),
    ]
    .iter()
    .filter_map(|(rel, label)| ws.links.href(rel).map(|href| format!("- {}", md_link(label, href))))
    .collect();

    if !links.is_empty() {
        lines.push(String::new());
        lines.push(md_header(2, "Links"));
        lines.extend(links);
    }

    format!("{}{}", lines.join("\n"), format_retrieved_at(now))
}
