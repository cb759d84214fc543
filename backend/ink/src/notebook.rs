use tracing::{debug, trace, warn};

use crate::{
    binding::{CanvasBinding, LoadState, Phase},
    error::PageError,
    pages::{MAX_PAGES, PageStore},
    persistence,
    stroke::{CanvasSize, Stroke, optimize},
    surface::DrawingSurface,
};

/// One handwritten note being edited: the page store plus the live surface
/// bound to its active page.
pub struct Notebook<S> {
    pages: PageStore,
    binding: CanvasBinding<S>,
    size: CanvasSize,
    phase: Phase,
}

impl<S: DrawingSurface> Notebook<S> {
    pub fn open(drawing_data: Option<&str>, surface: S, size: CanvasSize) -> Self {
        let pages = persistence::load(drawing_data, size);
        let mut binding = CanvasBinding::new(surface, size);
        binding.bind_active_page(pages.current());

        debug!("Opened notebook with {} pages", pages.len());

        Self {
            pages,
            binding,
            size,
            phase: Phase::Idle,
        }
    }

    pub fn pages(&self) -> &PageStore {
        &self.pages
    }

    pub fn binding(&self) -> &CanvasBinding<S> {
        &self.binding
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_page(&self) -> usize {
        self.pages.current_page()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages beyond the limit that were dropped when the note was opened.
    pub fn dropped_pages(&self) -> usize {
        self.pages.dropped()
    }

    /// Optimized view of what the surface holds right now.
    pub fn live_page(&self) -> String {
        optimize(&self.binding.extract_live_buffer(), self.size)
    }

    pub fn commit_stroke(&mut self, stroke: Stroke) {
        self.binding.commit_stroke(stroke);
    }

    pub fn undo(&mut self) -> bool {
        self.binding.undo_last_stroke()
    }

    pub fn go_to_page(&mut self, index: usize) -> bool {
        if index == self.pages.current_page() || index >= self.pages.len() {
            return false;
        }

        self.flush();
        self.pages.go_to_page(index);
        self.reload();

        true
    }

    pub fn add_page(&mut self) -> Result<usize, PageError> {
        if self.pages.is_full() {
            return Err(PageError::Capacity { max: MAX_PAGES });
        }

        self.flush();
        let index = self.pages.add_page(self.size)?;
        self.reload();

        Ok(index)
    }

    pub fn delete_page(&mut self) -> Result<usize, PageError> {
        let index = self.pages.delete_page()?;
        self.reload();

        Ok(index)
    }

    /// Flushes the live page and serializes every page into `drawingData` form.
    pub fn save(&mut self) -> String {
        self.flush();
        self.advance(Phase::Idle);

        persistence::save(&self.pages, self.size)
    }

    /// Skipped while the binding is `Unloaded`; the surface never got the stored page.
    fn flush(&mut self) {
        self.advance(Phase::Flushing);

        if self.binding.load_state() == LoadState::Unloaded {
            warn!("Page {} was never loaded, keeping stored copy", self.pages.current_page());
            return;
        }

        let live = self.binding.extract_live_buffer();
        self.pages.flush(&live, self.size);
    }

    fn reload(&mut self) {
        self.advance(Phase::Clearing);
        self.binding.clear();

        self.advance(Phase::Loading);
        self.binding.load(self.pages.current());

        self.advance(Phase::Idle);
    }

    fn advance(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal page transition {:?} -> {next:?}",
            self.phase
        );
        trace!("Notebook phase {:?} -> {next:?}", self.phase);

        self.phase = next;
    }
}
