//! # Notes Documentation
//!
//! Personal note taking: rich-text notes, multi-page handwritten notes, folders and tags.
//!
//! ## Crates
//!
//! - `backend`: binary, starts the server
//! - `backend/server`: axum REST API over a Redis document store
//! - `backend/ink`: page and canvas-state engine for handwritten notes, no I/O
//! - `backend/migrate`: rewrites legacy single-page drawings into the paged format
//!
//!
//!
//! # General Infrastructure
//! - Reverse proxy authenticates the user and forwards their id as `X-User-Id`
//! - Server trusts that header, so it must never be reachable around the proxy
//! - Notes live in Redis, one hash per user
//! - Drawing sessions live in server memory until saved or discarded
//!
//!
//!
//! # Handwritten Notes
//!
//! ## Storage
//! - `drawingData` holds a JSON array, one serialized buffer string per page
//! - Older notes hold one bare buffer, still loaded as a single page
//! - `content` is always `Handwritten Note` so lists and search never parse drawings
//!
//! ## Pages
//! - At least 1 page, at most 50
//! - Switching pages flushes the live page, clears the surface, then loads the target
//! - Empty strokes are pruned whenever a page is stored
//!
//!
//!
//! # Setup
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
//!
//! Run against a local Redis.
//! ```sh
//! RUST_LOG=info cargo run -p backend
//! ```
//!
//! Run without Redis.
//! ```sh
//! STORE=memory RUST_LOG=debug cargo run -p backend
//! ```
//!
//! Migrate legacy drawings, dry run first.
//! ```sh
//! cargo run -p migrate -- --dry-run
//! cargo run -p migrate
//! ```
//!
//!
//!
//! ## Environment
//!
//! - `RUST_PORT` (1111)
//! - `STORE` (`redis` or `memory`)
//! - `REDIS_URL` (`redis://127.0.0.1:6379`), password read from `/run/secrets/REDIS_PASSWORD`
//! - `CANVAS_WIDTH` (800), `CANVAS_HEIGHT` (600)
//! - `CORS_MAX_AGE` (3600)
//! - `LIST_CACHE_CAPACITY` (10000)
//! - `SESSION_CAPACITY` (10000)
//! - `SESSION_IDLE_SECS` (1800), untouched drawing sessions are dropped after this

pub mod client;
