//! # Persistence Adapter
//!
//! Maps a note's `drawingData` string to a [`PageStore`] and back.
//!
//! ## Formats
//!
//! - Current: JSON array of page buffer strings, `["{\"lines\":...}", ...]`
//! - Legacy: one bare buffer, written before notes had pages
//!
//! Loading never fails. Anything that is not a non-empty array is kept verbatim
//! as a single legacy page, and [`crate::stroke::optimize`] later degrades it to
//! an empty buffer if it is not a buffer at all.
use serde_json::Value;
use tracing::debug;

use crate::{pages::PageStore, stroke::CanvasSize};

/// Placeholder `content` for handwritten notes, so list and search views never parse drawings.
pub const HANDWRITTEN_CONTENT: &str = "Handwritten Note";

pub fn load(drawing_data: Option<&str>, size: CanvasSize) -> PageStore {
    let raw = match drawing_data.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return PageStore::new(size),
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(pages)) if pages.is_empty() => PageStore::new(size),
        Ok(Value::Array(pages)) => {
            PageStore::from_pages(pages.into_iter().map(page_string).collect(), size)
        }
        _ => {
            debug!("drawingData is not a page array, loading as legacy single page");
            PageStore::from_pages(vec![raw.to_string()], size)
        }
    }
}

fn page_string(page: Value) -> String {
    match page {
        Value::String(page) => page,
        other => other.to_string(),
    }
}

pub fn save(pages: &PageStore, size: CanvasSize) -> String {
    Value::from(pages.to_array(size)).to_string()
}

/// Rewrites any stored form into the current one.
pub fn normalize(drawing_data: Option<&str>, size: CanvasSize) -> String {
    save(&load(drawing_data, size), size)
}
