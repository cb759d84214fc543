//! # Frontend Specifications
//!
//! Client logic/relevant payloads.
//!
//! ## Notes
//!
//! ### Note document
//! ```json
//! {
//!   "id": "uuid",
//!   "title": "Groceries",
//!   "content": "milk",
//!   "type": "text",
//!   "folder": "Home",
//!   "tags": ["food"],
//!   "drawingData": "[\"{...}\"]",
//!   "createdAt": "2026-10-16T09:00:00Z",
//!   "updatedAt": "2026-10-16T09:00:00Z"
//! }
//! ```
//! - `type` is `text` or `handwritten`
//! - `folder` and `drawingData` are omitted when absent
//! - Lists and search return the same shape without `drawingData`, newest first
//! - Tags come back trimmed, lowercased and deduplicated
//!
//! ### Errors
//! - 400 malformed payload or search pattern
//! - 401 missing `X-User-Id`
//! - 404 unknown note or drawing session
//! - 409 page limit reached, or deleting the only page
//! - 503 store unreachable, safe to retry
//!
//!
//!
//! ## Drawing
//!
//! ### Stroke
//! ```json
//! { "points": [{ "x": 1.5, "y": 2 }], "brushColor": "#444", "brushRadius": 2 }
//! ```
//! - Send a stroke once the pointer is released, never partial strokes
//! - Strokes without points are rejected
//!
//! ### Session view
//! Every session call answers with
//! ```json
//! { "sessionId": "uuid", "noteId": null, "currentPage": 0, "pageCount": 1, "droppedPages": 0, "page": "{...}" }
//! ```
//! - `page` is the live page buffer, render it as-is
//! - `noteId` becomes set after the first save of a new note
//! - `droppedPages` above zero means the note had more than 50 pages and the rest
//!   will be gone once the session saves
//!
//! ### Saving
//! - `POST /canvas/{id}/save` with optional `title`, `folder`, `tags`
//! - 202 means a save for this session is already running, nothing was done
//! - On failure the session keeps every page, just save again
//! - Leaving without saving: `DELETE /canvas/{id}`, all drawing work is dropped
