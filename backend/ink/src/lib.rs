//! # Ink
//!
//! Paging and canvas-state engine for handwritten notes.
//!
//! ## Flow
//!
//! - [`persistence::load`] turns a note's `drawingData` into a [`PageStore`]
//! - [`Notebook`] binds the active page onto a [`DrawingSurface`]
//! - Edits land on the surface, page switches flush them back into the store
//! - [`persistence::save`] serializes every page back into `drawingData`
//!
//! No I/O happens here. Malformed drawing data never surfaces as an error, only
//! page capacity does.

pub mod binding;
pub mod error;
pub mod notebook;
pub mod pages;
pub mod persistence;
pub mod stroke;
pub mod surface;

pub use binding::{CanvasBinding, LoadState, Phase};
pub use error::PageError;
pub use notebook::Notebook;
pub use pages::{MAX_PAGES, PageStore};
pub use stroke::{CanvasSize, Point, Stroke, StrokeBuffer, optimize};
pub use surface::{DrawingSurface, Sketch};
