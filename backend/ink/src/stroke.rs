//! # Stroke Buffer
//!
//! One page worth of freehand strokes, serialized as
//! `{"lines": [...], "width": W, "height": H}`.
//!
//! ## Normalization
//!
//! - Anything that is not an object with a `lines` array degrades to the empty buffer
//! - Strokes with an empty or missing `points` array are pruned
//! - Every other field, known or not, survives untouched
//!
//! [`optimize`] is pure, never fails and is idempotent.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub const LINES: &str = "lines";
pub const POINTS: &str = "points";

pub const DEFAULT_BRUSH_COLOR: &str = "#444";
pub const DEFAULT_BRUSH_RADIUS: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,

    /// Pen data such as pressure, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            extra: Map::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub points: Vec<Point>,

    #[serde(default = "default_brush_color")]
    pub brush_color: String,

    #[serde(default = "default_brush_radius")]
    pub brush_radius: f64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            brush_color: default_brush_color(),
            brush_radius: DEFAULT_BRUSH_RADIUS,
            extra: Map::new(),
        }
    }
}

fn default_brush_color() -> String {
    DEFAULT_BRUSH_COLOR.to_string()
}

fn default_brush_radius() -> f64 {
    DEFAULT_BRUSH_RADIUS
}

/// A parsed buffer. Strokes are held as raw JSON so whatever the client stored,
/// dimensions or pen data included, is written back as it came in.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeBuffer {
    lines: Vec<Value>,
    // Every other member. `lines` keeps its slot here so the field order survives.
    fields: Map<String, Value>,
}

impl StrokeBuffer {
    pub fn empty(size: CanvasSize) -> Self {
        let mut fields = Map::new();
        fields.insert(LINES.to_string(), Value::Array(Vec::new()));
        fields.insert("width".to_string(), size.width.into());
        fields.insert("height".to_string(), size.height.into());

        Self {
            lines: Vec::new(),
            fields,
        }
    }

    /// `None` unless `raw` is an object holding a `lines` array.
    pub fn parse(raw: &str) -> Option<Self> {
        let Ok(Value::Object(mut fields)) = serde_json::from_str::<Value>(raw) else {
            return None;
        };

        let lines = match fields.get_mut(LINES) {
            Some(Value::Array(lines)) => std::mem::take(lines),
            _ => return None,
        };

        Some(Self { lines, fields })
    }

    pub fn lines(&self) -> &[Value] {
        &self.lines
    }

    pub fn push(&mut self, stroke: &Stroke) {
        match serde_json::to_value(stroke) {
            Ok(stroke) => self.lines.push(stroke),
            Err(e) => debug!("Dropping stroke that does not serialize: {e}"),
        }
    }

    pub fn pop(&mut self) -> bool {
        self.lines.pop().is_some()
    }

    /// Drops strokes with an empty or missing `points` array. Returns how many went.
    pub fn prune(&mut self) -> usize {
        let before = self.lines.len();
        self.lines.retain(has_points);

        before - self.lines.len()
    }

    pub fn to_json(&self) -> String {
        let mut fields = self.fields.clone();
        fields.insert(LINES.to_string(), Value::Array(self.lines.clone()));

        Value::Object(fields).to_string()
    }
}

pub fn empty_buffer(size: CanvasSize) -> String {
    StrokeBuffer::empty(size).to_json()
}

pub fn optimize(raw: &str, size: CanvasSize) -> String {
    optimize_counted(raw, size).0
}

/// Same as [`optimize`], also returning how many strokes survived pruning.
pub fn optimize_counted(raw: &str, size: CanvasSize) -> (String, usize) {
    let Some(mut buffer) = StrokeBuffer::parse(raw) else {
        debug!("Not a stroke buffer, using empty page");
        return (empty_buffer(size), 0);
    };

    let pruned = buffer.prune();
    if pruned > 0 {
        debug!("Pruned {pruned} empty strokes");
    }

    (buffer.to_json(), buffer.lines().len())
}

fn has_points(stroke: &Value) -> bool {
    stroke
        .get(POINTS)
        .and_then(Value::as_array)
        .is_some_and(|points| !points.is_empty())
}
