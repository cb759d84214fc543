use tracing::debug;

use crate::stroke::{CanvasSize, Stroke, StrokeBuffer};

/// The live drawing surface a page is projected onto.
///
/// Rasterization is not our concern; a surface only needs to hold strokes and
/// round-trip them through the serialized buffer form.
pub trait DrawingSurface {
    fn clear(&mut self);

    /// Returns `false` when the data was rejected and the surface left as it was.
    fn load_serialized_state(&mut self, data: &str) -> bool;

    fn serialized_state(&self) -> String;

    /// Drops the most recent stroke. Returns `false` when there was nothing to undo.
    fn undo_last_stroke(&mut self) -> bool;

    /// Appends one finished stroke (pointer released).
    fn commit_stroke(&mut self, stroke: Stroke);
}

/// In-memory surface holding the page buffer as loaded.
#[derive(Clone, Debug)]
pub struct Sketch {
    size: CanvasSize,
    buffer: StrokeBuffer,
}

impl Sketch {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            buffer: StrokeBuffer::empty(size),
        }
    }

    pub fn lines(&self) -> &[serde_json::Value] {
        self.buffer.lines()
    }
}

impl DrawingSurface for Sketch {
    fn clear(&mut self) {
        self.buffer = StrokeBuffer::empty(self.size);
    }

    fn load_serialized_state(&mut self, data: &str) -> bool {
        match StrokeBuffer::parse(data) {
            Some(buffer) => {
                self.buffer = buffer;
                true
            }
            None => {
                debug!("Surface rejected unreadable buffer");
                false
            }
        }
    }

    fn serialized_state(&self) -> String {
        self.buffer.to_json()
    }

    fn undo_last_stroke(&mut self) -> bool {
        self.buffer.pop()
    }

    fn commit_stroke(&mut self, stroke: Stroke) {
        self.buffer.push(&stroke);
    }
}
