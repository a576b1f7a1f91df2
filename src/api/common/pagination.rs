//
//  bitbucket-mcp
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for Bitbucket Cloud Responses
//!
//! Bitbucket Cloud list endpoints return a page envelope with `values`,
//! `page`, `pagelen`, `size` and a `next` URL. This module deserializes that
//! envelope and condenses it into [`PaginationInfo`], which the markdown
//! formatters render as a footer.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_mcp::api::common::PaginatedResponse;
//!
//! let json = r#"{
//!     "values": ["a", "b"],
//!     "page": 1,
//!     "pagelen": 2,
//!     "size": 5,
//!     "next": "https://api.bitbucket.org/2.0/workspaces?page=2"
//! }"#;
//!
//! let response: PaginatedResponse<String> = serde_json::from_str(json).unwrap();
//! let info = response.pagination_info();
//!
//! assert!(info.has_more);
//! assert_eq!(info.next_cursor.as_deref(), Some("2"));
//! ```

use serde::{Deserialize, Serialize};

/// One page of results from a Bitbucket Cloud list endpoint.
///
/// # Notes
///
/// - `size` is omitted by some endpoints for performance reasons
/// - Page numbers are 1-indexed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items in the current page.
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,

    /// Current page number (1-indexed).
    #[serde(default)]
    pub page: Option<u32>,

    /// Requested page length.
    #[serde(default)]
    pub pagelen: Option<u32>,

    /// Total number of items across all pages, when reported.
    #[serde(default)]
    pub size: Option<u32>,

    /// URL of the next page.
    #[serde(default)]
    pub next: Option<String>,

    /// URL of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// Returns `true` if another page exists.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Condenses the envelope into [`PaginationInfo`].
    pub fn pagination_info(&self) -> PaginationInfo {
        let has_more = self.has_next();
        PaginationInfo {
            count: self.values.len(),
            has_more,
            next_cursor: if has_more {
                Some((self.page.unwrap_or(1) + 1).to_string())
            } else {
                None
            },
            total: self.size,
            page: self.page,
            size: self.pagelen,
        }
    }
}

/// Page metadata shown below list output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    /// Number of items on this page.
    pub count: usize,
    /// Whether more pages exist.
    pub has_more: bool,
    /// Page number to request next.
    pub next_cursor: Option<String>,
    /// Total number of items, when the endpoint reports it.
    pub total: Option<u32>,
    /// Current page number.
    pub page: Option<u32>,
    /// Page length.
    pub size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_has_no_cursor() {
        let response: PaginatedResponse<u32> =
            serde_json::from_str(r#"{"values": [1, 2, 3], "page": 4, "pagelen": 10, "size": 33}"#)
                .unwrap();
        let info = response.pagination_info();
        assert_eq!(info.count, 3);
        assert!(!info.has_more);
        assert_eq!(info.next_cursor, None);
        assert_eq!(info.total, Some(33));
        assert_eq!(info.size, Some(10));
    }

    #[test]
    fn test_missing_page_defaults_to_first() {
        let response: PaginatedResponse<u32> =
            serde_json::from_str(r#"{"values": [], "next": "https://x/?page=2"}"#).unwrap();
        assert_eq!(response.pagination_info().next_cursor.as_deref(), Some("2"));
    }

    #[test]
    fn test_missing_values_is_empty() {
        let response: PaginatedResponse<u32> = serde_json::from_str(r#"{"page": 1}"#).unwrap();
        assert!(response.values.is_empty());
    }
}
