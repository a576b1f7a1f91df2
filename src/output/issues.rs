//
//  bitbucket-mcp
//  output/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Markdown for issues and issue comments.

use super::format::{format_bullet_list, format_url, optimize_markdown, FieldValue};
use super::markdown::{md_header, md_separator};
use crate::api::cloud::issues::{Issue, IssueComment};
use crate::api::common::UserRef;
use crate::util::{format_date, truncate};

const LIST_DESCRIPTION_CHARS: usize = 150;
const COMMENT_PREVIEW_CHARS: usize = 100;

fn user_name<'a>(user: Option<&'a UserRef>, fallback: &'a str) -> &'a str {
    user.map(|u| u.name_or(fallback)).unwrap_or(fallback)
}

fn summary_fields(issue: &Issue) -> Vec<(&'static str, FieldValue)> {
    vec![
        ("ID", FieldValue::from(issue.id)),
        ("State", FieldValue::from(issue.state.as_deref().unwrap_or("N/A"))),
        ("Kind", FieldValue::from(issue.kind.as_deref().unwrap_or("N/A"))),
        ("Priority", FieldValue::from(issue.priority.as_deref().unwrap_or("N/A"))),
        ("Reporter", FieldValue::from(user_name(issue.reporter.as_ref(), "Unknown"))),
        ("Assignee", FieldValue::from(user_name(issue.assignee.as_ref(), "Unassigned"))),
        ("Created", FieldValue::from(format_date(issue.created_on.as_deref()))),
        ("Updated", FieldValue::from(format_date(issue.updated_on.as_deref()))),
    ]
}

/// Issue list. Empty input yields a "no issues" message.
pub fn format_issues_list(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "No issues found matching your criteria.".to_string();
    }

    let mut lines = vec![md_header(1, "Issues"), String::new()];
    for issue in issues {
        lines.push(md_header(2, &format!("#{}: {}", issue.id, issue.title)));

        let description = issue
            .content
            .as_ref()
            .and_then(|c| c.non_empty_raw())
            .map(|raw| truncate(raw, LIST_DESCRIPTION_CHARS))
            .unwrap_or_else(|| "No description".to_string());

        let mut fields = summary_fields(issue);
        fields.push(("Description", FieldValue::from(description)));
        if let Some(href) = issue.links.href("html") {
            fields.push(("URL", FieldValue::link(href, format!("Issue #{}", issue.id))));
        }
        fields.push(("Votes", FieldValue::from(issue.votes)));
        fields.push(("Watchers", FieldValue::from(issue.watches)));

        lines.push(format_bullet_list(&fields));
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Full details of one issue.
pub fn format_issue_details(issue: &Issue) -> String {
    let mut lines = vec![
        md_header(1, &format!("Issue #{}: {}", issue.id, issue.title)),
        String::new(),
        md_header(2, "Details"),
    ];

    let mut fields = summary_fields(issue);
    fields.push(("Votes", FieldValue::from(issue.votes)));
    fields.push(("Watchers", FieldValue::from(issue.watches)));
    lines.push(format_bullet_list(&fields));
    lines.push(String::new());

    if let Some(raw) = issue.content.as_ref().and_then(|c| c.non_empty_raw()) {
        lines.push(md_header(2, "Description"));
        lines.push(String::new());
        lines.push(optimize_markdown(raw));
        lines.push(String::new());
    }

    if let Some(href) = issue.links.href("html") {
        lines.push(md_header(2, "Links"));
        lines.push(String::new());
        lines.push(format!("- {}", format_url(Some(href), Some("View in Bitbucket"))));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Comments on an issue, oldest first as returned by Bitbucket.
pub fn format_issue_comments(comments: &[IssueComment]) -> String {
    if comments.is_empty() {
        return "No comments found on this issue.".to_string();
    }

    let mut lines = vec![md_header(1, "Comments"), String::new()];
    for comment in comments {
        lines.push(md_header(2, &format!("Comment #{}", comment.id)));
        lines.push(format!("**Author**: {}", user_name(comment.user.as_ref(), "Unknown")));
        lines.push(format!("**Posted**: {}", format_date(comment.created_on.as_deref())));
        if comment.updated_on.is_some() && comment.updated_on != comment.created_on {
            lines.push(format!(
                "**Updated**: {}",
                format_date(comment.updated_on.as_deref())
            ));
        }
        lines.push(String::new());
        if let Some(raw) = comment.content.non_empty_raw() {
            lines.push(optimize_markdown(raw));
        }
        lines.push(String::new());
        lines.push(md_separator().to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Confirmation after creating or updating an issue.
pub fn format_issue_success(issue: &Issue, action: &str) -> String {
    let mut lines = vec![
        format!("✓ Issue {}: #{} - {}", action, issue.id, issue.title),
        String::new(),
    ];
    if let Some(href) = issue.links.href("html") {
        lines.push(format!("View at: {}", href));
        lines.push(String::new());
    }
    lines.push(format_bullet_list(&[
        ("State", FieldValue::from(issue.state.as_deref().unwrap_or("N/A"))),
        ("Kind", FieldValue::from(issue.kind.as_deref().unwrap_or("N/A"))),
        ("Priority", FieldValue::from(issue.priority.as_deref().unwrap_or("N/A"))),
    ]));
    lines.join("\n")
}

/// Confirmation after adding a comment.
pub fn format_comment_success(comment: &IssueComment) -> String {
    let mut lines = vec![
        format!("✓ Comment #{} added successfully", comment.id),
        String::new(),
    ];
    if let Some(name) = comment.user.as_ref().and_then(|u| u.display_name.as_deref()) {
        lines.push(format!("**Author**: {}", name));
    }
    lines.push(format!("**Posted**: {}", format_date(comment.created_on.as_deref())));
    lines.push(String::new());
    if let Some(raw) = comment.content.non_empty_raw() {
        lines.push(format!("**Content**: {}", truncate(raw, COMMENT_PREVIEW_CHARS)));
    }
    lines.join("\n")
}

/// Confirmation after deleting an issue.
pub fn format_issue_deleted(id: u64) -> String {
    format!("✓ Issue #{} deleted successfully", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue() -> Issue {
        serde_json::from_value(json!({
            "id": 7,
            "title": "Crash on start",
            "state": "open",
            "kind": "bug",
            "content": {"raw": "x".repeat(200), "markup": "markdown"},
            "reporter": {"display_name": "Ana"},
            "created_on": "2024-02-01T09:00:00.000000+00:00",
            "votes": 2,
            "links": {"html": {"href": "https://bitbucket.org/acme/api/issues/7"}}
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_issues_list(&[]), "No issues found matching your criteria.");
    }

    #[test]
    fn test_list_entry() {
        let out = format_issues_list(&[issue()]);
        assert!(out.starts_with("# Issues\n\n## #7: Crash on start\n- **ID**: 7"));
        assert!(out.contains("- **Priority**: N/A"));
        assert!(out.contains("- **Reporter**: Ana"));
        assert!(out.contains("- **Assignee**: Unassigned"));
        assert!(out.contains("- **Updated**: Not available"));
        assert!(out.contains(&format!("- **Description**: {}...", "x".repeat(150))));
        assert!(out.contains("- **URL**: [Issue #7](https://bitbucket.org/acme/api/issues/7)"));
        assert!(out.contains("- **Votes**: 2"));
        assert!(!out.contains("Watchers"));
    }

    #[test]
    fn test_details() {
        let out = format_issue_details(&issue());
        assert!(out.starts_with("# Issue #7: Crash on start\n\n## Details\n"));
        assert!(out.contains("## Description\n\nxxxx"));
        assert!(out.contains("- [View in Bitbucket](https://bitbucket.org/acme/api/issues/7)"));
    }

    #[test]
    fn test_comments() {
        assert_eq!(format_issue_comments(&[]), "No comments found on this issue.");
        let comment: IssueComment = serde_json::from_value(json!({
            "id": 3,
            "content": {"raw": "Same here"},
            "user": {"nickname": "bob"},
            "created_on": "2024-02-01T09:00:00+00:00",
            "updated_on": "2024-02-02T09:00:00+00:00"
        }))
        .unwrap();
        let out = format_issue_comments(&[comment]);
        assert!(out.contains("## Comment #3\n**Author**: bob\n**Posted**: 2024-02-01 09:00:00 UTC"));
        assert!(out.contains("**Updated**: 2024-02-02 09:00:00 UTC"));
        assert!(out.contains("Same here\n\n---"));
    }

    #[test]
    fn test_success_messages() {
        let out = format_issue_success(&issue(), "created");
        assert!(out.starts_with("✓ Issue created: #7 - Crash on start\n\nView at: https://"));
        assert!(out.ends_with("- **Priority**: N/A"));
        assert_eq!(format_issue_deleted(7), "✓ Issue #7 deleted successfully");
    }
}
