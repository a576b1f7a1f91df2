//
//  bitbucket-mcp
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CREDENTIAL_VARS: [&str; 5] = [
    "ATLASSIAN_SITE_NAME",
    "ATLASSIAN_USER_EMAIL",
    "ATLASSIAN_API_TOKEN",
    "ATLASSIAN_BITBUCKET_USERNAME",
    "ATLASSIAN_BITBUCKET_APP_PASSWORD",
];

/// Command with no credentials and a config path that does not exist.
fn isolated(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("mcp-atlassian-bitbucket");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("BB_MCP_LOG")
        .env_remove("DEBUG")
        .env_remove("BB_WORKSPACE")
        .env_remove("BB_REPO")
        .env("BB_MCP_CONFIG", dir.path().join("missing.toml"));
    cmd
}

#[test]
fn help_lists_commands() {
    cargo_bin_cmd!("mcp-atlassian-bitbucket")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("workspaces"))
        .stdout(predicate::str::contains("ATLASSIAN_BITBUCKET_APP_PASSWORD"));
}

#[test]
fn missing_credentials_exit_with_auth_code() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["get", "-p", "/user"])
        .assert()
        .code(4)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Authentication credentials are missing"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn invalid_body_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["post", "-p", "/x", "-b", "notjson"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--body is not valid JSON"));
}

#[test]
fn invalid_query_params_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["get", "-p", "/workspaces", "-q", "[1]"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("JSON object"));
}

#[test]
fn malformed_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[atlassian").unwrap();

    isolated(&dir)
        .env("BB_MCP_CONFIG", &path)
        .args(["workspaces", "ls"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn issue_commands_require_repository() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["issues", "ls", "-w", "acme"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--repo"));
}

#[test]
fn completion_script_uses_binary_name() {
    cargo_bin_cmd!("mcp-atlassian-bitbucket")
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mcp-atlassian-bitbucket"));
}

#[test]
fn add_branch_without_credentials_exits_with_auth_code() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args([
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
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Authentication credentials are missing"));
}

#[test]
fn add_branch_requires_source() {
    let dir = TempDir::new().unwrap();
    isolated(&dir)
        .args(["repo", "add-branch", "-w", "acme", "-r", "api", "-n", "feature/x"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--source-branch-or-commit"));
}
