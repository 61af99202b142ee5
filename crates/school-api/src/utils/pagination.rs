//! Page arithmetic shared by every collection endpoint.

use serde::{Deserialize, Serialize};

use crate::utils::error::ApiError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A 1-indexed page of fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    pub fn new(number: u32, size: u32) -> Result<Self, ApiError> {
        if number == 0 {
            return Err(ApiError::BadRequest("page must be 1 or greater".into()));
        }
        Ok(Self {
            number,
            size: size.max(1),
        })
    }

    pub fn offset(&self) -> i64 {
        (self.number as i64 - 1) * self.size as i64
    }

    pub fn limit(&self) -> i64 {
        self.size as i64
    }
}

/// `?page=n` query string.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
}

impl PageParams {
    pub fn into_page(self, size: u32) -> Result<Page, ApiError> {
        Page::new(self.page.unwrap_or(1), size)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Size of the whole (possibly filtered) set, not of this page.
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Paginated<T> {
    /// True when the set has rows but the requested page lies past the end.
    pub fn is_past_end(&self) -> bool {
        self.items.is_empty() && self.total > 0
    }
}

/// Slice `rows[size*(n-1) .. size*n]` out of an already ordered sequence.
pub fn paginate<T: Clone>(rows: &[T], page: Page) -> Paginated<T> {
    let start = (page.offset() as usize).min(rows.len());
    let end = (start + page.size as usize).min(rows.len());
    Paginated {
        items: rows[start..end].to_vec(),
        total: rows.len() as i64,
        page: page.number,
        per_page: page.size,
    }
}
