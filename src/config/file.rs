//
//  bitbucket-mcp
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration File Operations
//!
//! Low-level helpers for locating and reading the TOML configuration file.
//! Parsing and the environment overlay live in the parent module.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_mcp::config::{config_exists, read_config_file};
//! use std::path::Path;
//!
//! let path = Path::new("/home/me/.config/bitbucket-mcp/config.toml");
//! if config_exists(path) {
//!     let content = read_config_file(path)?;
//!     println!("{}", content);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

/// Environment variable that points at an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "BB_MCP_CONFIG";

/// Reads the configuration file into a string.
///
/// # Errors
///
/// Returns an error naming the path if the file cannot be read.
pub fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))
}

/// Returns `true` if a regular file exists at `path`.
pub fn config_exists(path: &Path) -> bool {
    path.is_file()
}

/// Resolves the configuration file location.
///
/// `BB_MCP_CONFIG` wins when set and non-empty; otherwise the platform
/// configuration directory is used.
///
/// | Platform | Path |
/// |----------|------|
/// | Linux | `~/.config/bitbucket-mcp/config.toml` |
/// | macOS | `~/Library/Application Support/bitbucket-mcp/config.toml` |
/// | Windows | `C:\Users\<User>\AppData\Roaming\bitbucket-mcp\config\config.toml` |
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_PATH_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(explicit));
    }
    let dirs = ProjectDirs::from("", "", crate::PACKAGE_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\ntimeout_secs = 5").unwrap();
        assert!(config_exists(file.path()));
        assert!(read_config_file(file.path()).unwrap().contains("timeout_secs"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(!config_exists(&path));
        let err = read_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_directory_is_not_a_config_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!config_exists(dir.path()));
    }
}
