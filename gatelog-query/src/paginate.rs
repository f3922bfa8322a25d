// Copyright 2025 Gatelog (https://github.com/gatelog)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Pagination
//!
//! A 1-based page number and page size become the LIMIT/OFFSET window of
//! a listing query; the total count plus the actually-returned row count
//! become [`PageMeta`]. `to` reflects the returned rows, not the nominal
//! page size, so the last page reports its true range.

use serde::{Deserialize, Serialize};

/// Default page size for raw log listings
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Default page size for identity listings (developers/brokers)
pub const DEFAULT_IDENTITY_PAGE_SIZE: u64 = 20;

/// Upper bound on any single query window
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Validated pagination window
///
/// The page number is clamped to a minimum of 1 and the page size to
/// `1..=MAX_PAGE_SIZE`, so a window can always be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// Pagination metadata attached to a listing result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
    /// `ceil(total / per_page)`; 0 when the listing is empty
    pub total_pages: u64,
    /// 1-based index of the first row of this window
    pub from: u64,
    /// 1-based index of the last returned row; below `from` on an empty page
    pub to: u64,
    pub has_more: bool,
}

impl PageMeta {
    /// Derive metadata from the total count and the rows actually returned
    pub fn new(total: u64, request: PageRequest, returned: usize) -> Self {
        let per_page = request.per_page();
        let current_page = request.page();
        let total_pages = total.div_ceil(per_page);
        let offset = request.offset();

        Self {
            total,
            per_page,
            current_page,
            total_pages,
            from: offset + 1,
            to: offset + returned as u64,
            has_more: current_page < total_pages,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps_inputs() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), 1);

        let request = PageRequest::new(3, 5000);
        assert_eq!(request.per_page(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(2, 10).offset(), 10);
        assert_eq!(PageRequest::new(7, 25).offset(), 150);
    }

    #[test]
    fn test_meta_for_full_page() {
        let meta = PageMeta::new(45, PageRequest::new(2, 10), 10);
        assert_eq!(meta.total_pages, 5);
        assert_eq!(meta.from, 11);
        assert_eq!(meta.to, 20);
        assert!(meta.has_more);
    }

    #[test]
    fn test_meta_for_last_partial_page() {
        let meta = PageMeta::new(45, PageRequest::new(5, 10), 5);
        assert_eq!(meta.from, 41);
        assert_eq!(meta.to, 45);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_meta_for_empty_listing() {
        let meta = PageMeta::new(0, PageRequest::new(1, 10), 0);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.from, 1);
        assert_eq!(meta.to, 0);
        assert!(meta.to < meta.from);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_meta_beyond_last_page() {
        // Page 4 of a 25-row listing with size 10: window is empty
        let meta = PageMeta::new(25, PageRequest::new(4, 10), 0);
        assert_eq!(meta.from, 31);
        assert_eq!(meta.to, 30);
        assert!(meta.to < meta.from);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_from_to_identities() {
        // to - from + 1 == min(per_page, total - offset) while rows remain
        for (total, per_page, page) in [(100u64, 10u64, 1u64), (95, 10, 10), (7, 3, 3)] {
            let request = PageRequest::new(page, per_page);
            let offset = request.offset();
            let returned = per_page.min(total.saturating_sub(offset));
            let meta = PageMeta::new(total, request, returned as usize);
            assert_eq!(meta.from, offset + 1);
            assert_eq!(meta.to - meta.from + 1, returned);
            assert_eq!(meta.has_more, page < meta.total_pages);
        }
    }
}
