//
//  bitbucket-mcp
//  output/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Markdown for pull request lists, details and comment threads.
//!
//! Comments are grouped into threads by their `parent` id. Replies to
//! replies are flattened into the top-level thread. A reply whose parent
//! is not on the same page is shown as a thread of its own.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use super::format::{
    format_bullet_list, format_diff, format_numbered_list, format_retrieved_at, format_url,
    optimize_markdown, FieldValue, DIFF_MAX_FILES, DIFF_MAX_LINES_PER_FILE,
};
use super::markdown::{md_header, md_separator};
use crate::api::cloud::pullrequests::{DiffStat, PullRequest, PullRequestComment};
use crate::util::{format_date, truncate};

const LIST_DESCRIPTION_CHARS: usize = 150;
const DIFFSTAT_MAX_FILES: usize = 10;
const DETAIL_MAX_THREADS: usize = 5;
const DETAIL_MAX_REPLIES: usize = 3;

/// Optional sections of [`format_pull_request_details`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DetailSections<'a> {
    /// Diffstat entries for the "File Changes" summary.
    pub diffstat: Option<&'a [DiffStat]>,
    /// Raw unified diff.
    pub raw_diff: Option<&'a str>,
    /// Comments, when they were requested.
    pub comments: Option<&'a [PullRequestComment]>,
}

struct Thread<'a> {
    root: &'a PullRequestComment,
    replies: Vec<&'a PullRequestComment>,
}

fn group_threads(comments: &[PullRequestComment]) -> Vec<Thread<'_>> {
    let ids: HashSet<u64> = comments.iter().map(|c| c.id).collect();
    let mut children: HashMap<u64, Vec<&PullRequestComment>> = HashMap::new();
    let mut roots = Vec::new();

    for comment in comments {
        match comment.parent.as_ref().filter(|p| ids.contains(&p.id)) {
            Some(parent) => children.entry(parent.id).or_default().push(comment),
            None => roots.push(comment),
        }
    }

    let mut visited: HashSet<u64> = HashSet::new();
    let mut threads: Vec<Thread<'_>> = roots
        .into_iter()
        .map(|root| Thread {
            root,
            replies: descendants(root, &children, &mut visited),
        })
        .collect();

    // Parent cycles leave comments unreachable from any root.
    for comment in comments {
        if !visited.contains(&comment.id) {
            threads.push(Thread {
                root: comment,
                replies: descendants(comment, &children, &mut visited),
            });
        }
    }

    threads
}

/// All replies below `root`, flattened in posting order.
fn descendants<'a>(
    root: &'a PullRequestComment,
    children: &HashMap<u64, Vec<&'a PullRequestComment>>,
    visited: &mut HashSet<u64>,
) -> Vec<&'a PullRequestComment> {
    visited.insert(root.id);
    let mut found = Vec::new();
    let mut stack = vec![root.id];
    while let Some(id) = stack.pop() {
        for child in children.get(&id).into_iter().flatten() {
            if visited.insert(child.id) {
                found.push(*child);
                stack.push(child.id);
            }
        }
    }
    found.sort_by(|a, b| a.created_on.cmp(&b.created_on).then(a.id.cmp(&b.id)));
    found
}

fn author_name(comment: &PullRequestComment) -> &str {
    comment
        .user
        .as_ref()
        .map(|u| u.name_or("Unknown User"))
        .unwrap_or("Unknown User")
}

fn format_comment(comment: &PullRequestComment, lines: &mut Vec<String>) {
    let author = author_name(comment);
    let heading = if comment.deleted {
        format!("[DELETED] Comment by {}", author)
    } else {
        format!("Comment by {}", author)
    };
    lines.push(md_header(3, &heading));
    lines.push(format!("*Posted on {}*", format_date(comment.created_on.as_deref())));
    if comment.updated_on.is_some() && comment.updated_on != comment.created_on {
        lines.push(format!(
            "*Updated on {}*",
            format_date(comment.updated_on.as_deref())
        ));
    }

    if let Some(inline) = &comment.inline {
        let line_info = match (inline.from, inline.to) {
            (Some(from), Some(to)) => format!(" (changed line {} -> {})", from, to),
            (_, Some(to)) => format!(" (line {})", to),
            _ => String::new(),
        };
        lines.push(format!(
            "**Inline Comment: File: `{}`**{}",
            inline.path, line_info
        ));
        if let Some(href) = comment.links.href("code") {
            lines.push(format!("[View code context in browser]({})", href));
        }
    }

    lines.push(String::new());
    if comment.deleted {
        lines.push("*This comment has been deleted.*".to_string());
    } else {
        match comment.content.non_empty_raw() {
            Some(raw) => lines.push(optimize_markdown(raw)),
            None => lines.push("*No content provided.*".to_string()),
        }
    }

    if let Some(href) = comment.links.href("html") {
        lines.push(String::new());
        lines.push(format!("[View full comment thread in browser]({})", href));
    }
}

fn format_reply(reply: &PullRequestComment, lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push(format!(
        "> **{}** ({})",
        author_name(reply),
        format_date(reply.created_on.as_deref())
    ));
    let content = optimize_markdown(reply.content.raw.as_deref().unwrap_or_default());
    lines.push(format!("> {}", content.replace('\n', "\n> ")));
}

/// Appends threads, optionally capped at `max_threads` / `max_replies`.
fn format_threads(
    threads: &[Thread<'_>],
    max_threads: Option<usize>,
    max_replies: Option<usize>,
    lines: &mut Vec<String>,
) {
    let shown = max_threads.map_or(threads.len(), |max| max.min(threads.len()));

    for (index, thread) in threads.iter().take(shown).enumerate() {
        format_comment(thread.root, lines);

        if !thread.replies.is_empty() {
            lines.push(String::new());
            lines.push("**Replies:**".to_string());
            let reply_limit =
                max_replies.map_or(thread.replies.len(), |max| max.min(thread.replies.len()));
            for reply in thread.replies.iter().take(reply_limit) {
                format_reply(reply, lines);
            }
            if thread.replies.len() > reply_limit {
                lines.push(String::new());
                lines.push(format!(
                    "> *...and {} more replies*",
                    thread.replies.len() - reply_limit
                ));
            }
        }

        if index + 1 < shown {
            lines.push(String::new());
            lines.push(md_separator().to_string());
        }
    }

    if threads.len() > shown {
        lines.push(String::new());
        lines.push(format!("*...and {} more comments*", threads.len() - shown));
    }
}

/// Pull request list with a retrieval footer.
pub fn format_pull_requests_list(prs: &[PullRequest], now: &DateTime<Utc>) -> String {
    if prs.is_empty() {
        return "No pull requests found matching your criteria.".to_string();
    }

    let items = format_numbered_list(prs, |pr, _| {
        let description = pr
            .description()
            .map(|d| truncate(d, LIST_DESCRIPTION_CHARS))
            .unwrap_or_else(|| "No description provided".to_string());
        let url = match pr.links.href("html") {
            Some(href) => FieldValue::link(href, format!("PR #{}", pr.id)),
            None => FieldValue::from("N/A"),
        };
        let author = pr.author.as_ref().map(|a| a.name_or("Unknown")).unwrap_or("Unknown");

        format!(
            "{}\n{}",
            md_header(2, &format!("#{}: {}", pr.id, pr.title)),
            format_bullet_list(&[
                ("ID", FieldValue::from(pr.id)),
                ("State", FieldValue::from(pr.state.clone())),
                ("Author", FieldValue::from(author)),
                ("Created", FieldValue::from(format_date(pr.created_on.as_deref()))),
                ("Updated", FieldValue::from(format_date(pr.updated_on.as_deref()))),
                ("Source Branch", FieldValue::from(pr.source_branch().unwrap_or("Unknown"))),
                (
                    "Destination Branch",
                    FieldValue::from(pr.destination_branch().unwrap_or("Unknown")),
                ),
                ("Description", FieldValue::from(description)),
                ("URL", url),
            ])
        )
    });

    format!(
        "{}\n\n{}{}",
        md_header(1, "Bitbucket Pull Requests"),
        items,
        format_retrieved_at(now)
    )
}

fn format_file_changes(diffstat: &[DiffStat], lines: &mut Vec<String>) {
    let files = diffstat.len();
    let added: u32 = diffstat.iter().filter_map(|f| f.lines_added).sum();
    let removed: u32 = diffstat.iter().filter_map(|f| f.lines_removed).sum();
    let plural = |n: u32| if n == 1 { "" } else { "s" };

    lines.push(String::new());
    lines.push(md_header(2, "File Changes"));
    lines.push(format!(
        "{} file{} changed with {} insertion{} and {} deletion{}",
        files,
        if files == 1 { "" } else { "s" },
        added,
        plural(added),
        removed,
        plural(removed)
    ));
    lines.push(String::new());

    for file in diffstat.iter().take(DIFFSTAT_MAX_FILES) {
        let mut changes = Vec::new();
        if let Some(n) = file.lines_added.filter(|n| *n > 0) {
            changes.push(format!("+{}", n));
        }
        if let Some(n) = file.lines_removed.filter(|n| *n > 0) {
            changes.push(format!("-{}", n));
        }
        let suffix = if changes.is_empty() {
            String::new()
        } else {
            format!(" ({})", changes.join(", "))
        };
        lines.push(format!("- `{}`{}", file.path(), suffix));
    }
    if files > DIFFSTAT_MAX_FILES {
        lines.push(format!("- ... and {} more files", files - DIFFSTAT_MAX_FILES));
    }
}

/// Full details of one pull request plus the requested optional sections.
pub fn format_pull_request_details(
    pr: &PullRequest,
    sections: DetailSections<'_>,
    now: &DateTime<Utc>,
) -> String {
    let repository = pr
        .destination
        .as_ref()
        .and_then(|d| d.repository.as_ref())
        .and_then(|r| r.full_name.clone());

    let mut lines = vec![
        md_header(1, &format!("Pull Request #{}: {}", pr.id, pr.title)),
        String::new(),
        md_header(2, "Basic Information"),
        format_bullet_list(&[
            ("State", FieldValue::from(pr.state.clone())),
            ("Repository", FieldValue::from(repository)),
            ("Source", FieldValue::from(pr.source_branch())),
            ("Destination", FieldValue::from(pr.destination_branch())),
            (
                "Author",
                FieldValue::from(pr.author.as_ref().and_then(|a| a.display_name.clone())),
            ),
            ("Created", FieldValue::from(format_date(pr.created_on.as_deref()))),
            ("Updated", FieldValue::from(format_date(pr.updated_on.as_deref()))),
            ("Comment Count", FieldValue::from(pr.comment_count.unwrap_or(0))),
            ("Task Count", FieldValue::from(pr.task_count.unwrap_or(0))),
        ]),
    ];

    if !pr.reviewers.is_empty() {
        lines.push(String::new());
        lines.push(md_header(2, "Reviewers"));
        lines.extend(
            pr.reviewers
                .iter()
                .map(|r| format!("- {}", r.name_or("Unknown User"))),
        );
    }

    if let Some(description) = pr.description() {
        lines.push(String::new());
        lines.push(md_header(2, "Description"));
        lines.push(optimize_markdown(description));
    }

    if let Some(diffstat) = sections.diffstat.filter(|d| !d.is_empty()) {
        format_file_changes(diffstat, &mut lines);
    }

    if let Some(raw_diff) = sections.raw_diff {
        lines.push(String::new());
        lines.push(md_header(2, "Code Changes (Full Diff)"));
        lines.push(format_diff(raw_diff, DIFF_MAX_FILES, DIFF_MAX_LINES_PER_FILE));
    }

    match sections.comments {
        Some([]) => {
            lines.push(String::new());
            lines.push(md_header(2, "Comments"));
            lines.push("*No comments found on this pull request.*".to_string());
        }
        Some(comments) => {
            lines.push(String::new());
            lines.push(md_header(2, "Comments"));
            let threads = group_threads(comments);
            format_threads(
                &threads,
                Some(DETAIL_MAX_THREADS),
                Some(DETAIL_MAX_REPLIES),
                &mut lines,
            );
            if let Some(href) = pr.links.href("comments") {
                lines.push(String::new());
                lines.push(format!("[View all comments in browser]({})", href));
            }
        }
        None => {}
    }

    lines.push(String::new());
    lines.push(md_header(2, "Links"));
    for (rel, label) in [
        ("html", "View in Browser"),
        ("commits", "Commits"),
        ("comments", "Comments"),
        ("diff", "Diff"),
    ] {
        if let Some(href) = pr.links.href(rel) {
            lines.push(format!("- {}", format_url(Some(href), Some(label))));
        }
    }

    format!("{}{}", lines.join("\n"), format_retrieved_at(now))
}

/// Every comment on one page, grouped into threads.
pub fn format_pull_request_comments(
    comments: &[PullRequestComment],
    pr_id: u64,
    now: &DateTime<Utc>,
) -> String {
    let mut lines = vec![
        md_header(1, &format!("Comments on Pull Request #{}", pr_id)),
        String::new(),
    ];

    if comments.is_empty() {
        lines.push("*No comments found on this pull request.*".to_string());
    } else {
        let threads = group_threads(comments);
        format_threads(&threads, None, None, &mut lines);
    }

    format!("{}{}", lines.join("\n"), format_retrieved_at(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::parse_timestamp;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-06-01T12:00:00Z").unwrap()
    }

    fn pull_request() -> PullRequest {
        serde_json::from_value(json!({
            "id": 42,
            "title": "Add retries",
            "state": "OPEN",
            "author": {"display_name": "Ana"},
            "summary": {"raw": "Adds retry logic", "markup": "markdown"},
            "source": {"branch": {"name": "feature/retry"}},
            "destination": {
                "branch": {"name": "main"},
                "repository": {"full_name": "acme/api"}
            },
            "reviewers": [{"display_name": "Bob"}],
            "comment_count": 2,
            "created_on": "2024-05-01T10:00:00.000000+00:00",
            "updated_on": "2024-05-02T10:00:00.000000+00:00",
            "links": {
                "html": {"href": "https://bitbucket.org/acme/api/pull-requests/42"},
                "comments": {"href": "https://api.bitbucket.org/2.0/c"}
            }
        }))
        .unwrap()
    }

    fn comment(id: u64, parent: Option<u64>, raw: &str) -> PullRequestComment {
        let mut value = json!({
            "id": id,
            "content": {"raw": raw},
            "user": {"display_name": format!("user{}", id)},
            "created_on": "2024-05-03T10:00:00+00:00"
        });
        if let Some(parent) = parent {
            value["parent"] = json!({"id": parent});
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_list() {
        assert_eq!(
            format_pull_requests_list(&[], &now()),
            "No pull requests found matching your criteria."
        );
        let out = format_pull_requests_list(&[pull_request()], &now());
        assert!(out.starts_with("# Bitbucket Pull Requests\n\n## #42: Add retries\n- **ID**: 42"));
        assert!(out.contains("- **Source Branch**: feature/retry"));
        assert!(out.contains("- **Description**: Adds retry logic"));
        assert!(out.contains("- **URL**: [PR #42](https://bitbucket.org/acme/api/pull-requests/42)"));
        assert!(out.ends_with("---\n*Information retrieved at: 2024-06-01 12:00:00 UTC*"));
    }

    #[test]
    fn test_details_basic_sections() {
        let out = format_pull_request_details(&pull_request(), DetailSections::default(), &now());
        assert!(out.starts_with("# Pull Request #42: Add retries\n\n## Basic Information\n"));
        assert!(out.contains("- **Repository**: acme/api"));
        assert!(out.contains("- **Task Count**: 0"));
        assert!(out.contains("## Reviewers\n- Bob"));
        assert!(out.contains("## Description\nAdds retry logic"));
        assert!(!out.contains("## Comments"));
        assert!(!out.contains("## File Changes"));
        assert!(out.contains("## Links\n- [View in Browser](https://bitbucket.org/acme/api/pull-requests/42)"));
    }

    #[test]
    fn test_details_file_changes() {
        let diffstat: Vec<DiffStat> = (0..12)
            .map(|i| {
                serde_json::from_value(json!({
                    "lines_added": 1,
                    "lines_removed": 0,
                    "new": {"path": format!("f{}.rs", i)}
                }))
                .unwrap()
            })
            .collect();
        let sections = DetailSections {
            diffstat: Some(diffstat.as_slice()),
            ..Default::default()
        };
        let out = format_pull_request_details(&pull_request(), sections, &now());
        assert!(out.contains("12 files changed with 12 insertions and 0 deletions"));
        assert!(out.contains("- `f0.rs` (+1)"));
        assert!(out.contains("- `f9.rs` (+1)"));
        assert!(!out.contains("`f10.rs`"));
        assert!(out.contains("- ... and 2 more files"));
    }

    #[test]
    fn test_details_comment_caps() {
        let mut comments: Vec<PullRequestComment> =
            (1..=7).map(|i| comment(i, None, "top")).collect();
        comments.extend((100..105).map(|i| comment(i, Some(1), "reply")));
        let sections = DetailSections {
            comments: Some(comments.as_slice()),
            ..Default::default()
        };
        let out = format_pull_request_details(&pull_request(), sections, &now());
        assert!(out.contains("### Comment by user5"));
        assert!(!out.contains("### Comment by user6"));
        assert!(out.contains("> **user102**"));
        assert!(!out.contains("> **user103**"));
        assert!(out.contains("> *...and 2 more replies*"));
        assert!(out.contains("*...and 2 more comments*"));
        assert!(out.contains("[View all comments in browser](https://api.bitbucket.org/2.0/c)"));
    }

    #[test]
    fn test_details_empty_comments() {
        let sections = DetailSections {
            comments: Some(&[][..]),
            ..Default::default()
        };
        let out = format_pull_request_details(&pull_request(), sections, &now());
        assert!(out.contains("## Comments\n*No comments found on this pull request.*"));
    }

    #[test]
    fn test_comments_list_threads() {
        let mut inline = comment(2, None, "nit");
        inline.inline = Some(crate::api::cloud::pullrequests::InlineLocation {
            path: "src/lib.rs".into(),
            from: None,
            to: Some(12),
        });
        let comments = vec![
            comment(1, None, "Looks good\nShip it"),
            comment(3, Some(1), "Thanks\nwill do"),
            inline,
            comment(4, Some(99), "orphan"),
        ];
        let out = format_pull_request_comments(&comments, 42, &now());
        assert!(out.starts_with("# Comments on Pull Request #42\n\n### Comment by user1"));
        assert!(out.contains("**Replies:**\n\n> **user3** (2024-05-03 10:00:00 UTC)\n> Thanks\n> will do"));
        assert!(out.contains("**Inline Comment: File: `src/lib.rs`** (line 12)"));
        assert!(out.contains("### Comment by user4"));
        assert_eq!(out.matches("\n---\n").count(), 3);
    }

    #[test]
    fn test_nested_replies_join_the_root_thread() {
        let comments = vec![
            comment(1, None, "root"),
            comment(2, Some(1), "child"),
            comment(3, Some(2), "grandchild"),
        ];
        let out = format_pull_request_comments(&comments, 42, &now());
        assert!(out.contains("### Comment by user1"));
        assert!(out.contains("> **user2**"));
        assert!(out.contains("> **user3**"));
        assert!(out.contains("> grandchild"));
        assert!(!out.contains("### Comment by user3"));
    }

    #[test]
    fn test_hidden_reply_count_includes_nested_replies() {
        let mut comments = vec![comment(1, None, "root")];
        comments.extend((2..=5).map(|i| comment(i, Some(i - 1), "reply")));
        let sections = DetailSections {
            comments: Some(comments.as_slice()),
            ..Default::default()
        };
        let out = format_pull_request_details(&pull_request(), sections, &now());
        assert!(out.contains("> **user4**"));
        assert!(!out.contains("> **user5**"));
        assert!(out.contains("> *...and 1 more replies*"));
    }

    #[test]
    fn test_replies_sorted_by_posting_time() {
        let mut late = comment(2, Some(1), "late");
        late.created_on = Some("2024-05-04T10:00:00+00:00".into());
        let comments = vec![comment(1, None, "root"), late, comment(3, Some(1), "early")];
        let out = format_pull_request_comments(&comments, 42, &now());
        let early_at = out.find("> early").unwrap();
        let late_at = out.find("> late").unwrap();
        assert!(early_at < late_at);
    }

    #[test]
    fn test_parent_cycle_keeps_every_comment() {
        let comments = vec![comment(1, Some(2), "a"), comment(2, Some(1), "b")];
        let out = format_pull_request_comments(&comments, 42, &now());
        assert!(out.contains("user1"));
        assert!(out.contains("user2"));
    }

    #[test]
    fn test_deleted_comment() {
        let mut deleted = comment(1, None, "secret");
        deleted.deleted = true;
        let out = format_pull_request_comments(&[deleted], 1, &now());
        assert!(out.contains("### [DELETED] Comment by user1"));
        assert!(out.contains("*This comment has been deleted.*"));
        assert!(!out.contains("secret"));
    }
}
