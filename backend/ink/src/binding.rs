//! # Canvas Binding
//!
//! Sole owner of the live drawing surface. Tracks which page buffer is
//! currently rendered so repeated binds of the same data do not reset the
//! surface under the user.
//!
//! ## Page switch protocol
//!
//! `Idle -> Flushing -> Clearing -> Loading -> Idle`
//!
//! - Flushing: the live buffer is read back into the page store
//! - Clearing: the surface is wiped
//! - Loading: the incoming page is drawn, only if it holds strokes
//!
//! Loading before clearing stacks strokes of two pages on one surface,
//! clearing before flushing loses the outgoing page.
use std::hash::{DefaultHasher, Hash, Hasher};

use tracing::{trace, warn};

use crate::{
    stroke::{CanvasSize, Stroke, optimize_counted},
    surface::DrawingSurface,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded(u64),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Flushing,
    Clearing,
    Loading,
}

impl Phase {
    /// Flushing may end the cycle on its own (save), and a deleted page skips
    /// straight to clearing since there is nothing left to flush.
    pub fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Idle, Phase::Flushing)
                | (Phase::Idle, Phase::Clearing)
                | (Phase::Flushing, Phase::Clearing)
                | (Phase::Flushing, Phase::Idle)
                | (Phase::Clearing, Phase::Loading)
                | (Phase::Loading, Phase::Idle)
        )
    }
}

pub struct CanvasBinding<S> {
    surface: S,
    size: CanvasSize,
    load_state: LoadState,
}

impl<S: DrawingSurface> CanvasBinding<S> {
    pub fn new(surface: S, size: CanvasSize) -> Self {
        Self {
            surface,
            size,
            load_state: LoadState::Unloaded,
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Renders `page_data` unless it is exactly what the surface already shows.
    /// Returns whether the surface was touched.
    pub fn bind_active_page(&mut self, page_data: &str) -> bool {
        let (optimized, strokes) = optimize_counted(page_data, self.size);
        let fingerprint = fingerprint(&optimized);

        if self.load_state == LoadState::Loaded(fingerprint) {
            trace!("Page already bound, skipping reload");
            return false;
        }

        self.clear();
        self.load_optimized(&optimized, strokes, fingerprint);
        true
    }

    pub fn clear(&mut self) {
        self.surface.clear();
        self.load_state = LoadState::Unloaded;
    }

    /// Loads a page onto a surface that has just been cleared.
    pub fn load(&mut self, page_data: &str) {
        let (optimized, strokes) = optimize_counted(page_data, self.size);
        self.load_optimized(&optimized, strokes, fingerprint(&optimized));
    }

    /// A rejected page leaves the binding `Unloaded`, so nothing is flushed over it.
    fn load_optimized(&mut self, optimized: &str, strokes: usize, fingerprint: u64) {
        if strokes > 0 && !self.surface.load_serialized_state(optimized) {
            warn!("Surface rejected a page with {strokes} strokes");
            return;
        }

        self.load_state = LoadState::Loaded(fingerprint);
    }

    /// Raw surface state. Callers optimize before storing.
    pub fn extract_live_buffer(&self) -> String {
        self.surface.serialized_state()
    }

    pub fn commit_stroke(&mut self, stroke: Stroke) {
        self.surface.commit_stroke(stroke);
    }

    pub fn undo_last_stroke(&mut self) -> bool {
        self.surface.undo_last_stroke()
    }
}

fn fingerprint(optimized: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    optimized.hash(&mut hasher);
    hasher.finish()
}
