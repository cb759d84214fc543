//! # Page Store
//!
//! Ordered page buffers of one handwritten note plus the active index.
//!
//! ## Invariants
//!
//! - Never empty, never more than [`MAX_PAGES`]
//! - `current < len`
//!
//! The store never reads the live surface. Whoever owns the surface flushes
//! into it through [`PageStore::flush`] before navigating away.
use tracing::warn;

use crate::{
    error::PageError,
    stroke::{CanvasSize, empty_buffer, optimize},
};

pub const MAX_PAGES: usize = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageStore {
    pages: Vec<String>,
    current: usize,
    dropped: usize,
}

impl PageStore {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            pages: vec![empty_buffer(size)],
            current: 0,
            dropped: 0,
        }
    }

    /// Pages are kept verbatim; normalization happens on [`PageStore::to_array`].
    pub fn from_pages(mut pages: Vec<String>, size: CanvasSize) -> Self {
        if pages.is_empty() {
            return Self::new(size);
        }

        let dropped = pages.len().saturating_sub(MAX_PAGES);
        if dropped > 0 {
            warn!(
                "Note has {} pages, keeping the first {MAX_PAGES}",
                pages.len()
            );
            pages.truncate(MAX_PAGES);
        }

        Self {
            pages,
            current: 0,
            dropped,
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages cut off by [`PageStore::from_pages`]. They are gone from the next save on.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_full(&self) -> bool {
        self.pages.len() >= MAX_PAGES
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &str {
        &self.pages[self.current]
    }

    pub fn page(&self, index: usize) -> Option<&str> {
        self.pages.get(index).map(String::as_str)
    }

    /// Stores the optimized live buffer as the active page.
    pub fn flush(&mut self, live: &str, size: CanvasSize) {
        self.pages[self.current] = optimize(live, size);
    }

    pub fn add_page(&mut self, size: CanvasSize) -> Result<usize, PageError> {
        if self.is_full() {
            return Err(PageError::Capacity { max: MAX_PAGES });
        }

        self.pages.push(empty_buffer(size));
        self.current = self.pages.len() - 1;

        Ok(self.current)
    }

    /// Returns `false` for the active index or anything out of range.
    pub fn go_to_page(&mut self, index: usize) -> bool {
        if index == self.current || index >= self.pages.len() {
            return false;
        }

        self.current = index;
        true
    }

    /// Removes the active page. The next page slides into its index unless the
    /// last page was removed, in which case the index steps back.
    pub fn delete_page(&mut self) -> Result<usize, PageError> {
        if self.pages.len() <= 1 {
            return Err(PageError::LastPage);
        }

        self.pages.remove(self.current);
        if self.current == self.pages.len() {
            self.current -= 1;
        }

        Ok(self.current)
    }

    pub fn to_array(&self, size: CanvasSize) -> Vec<String> {
        self.pages.iter().map(|page| optimize(page, size)).collect()
    }
}
