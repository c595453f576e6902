use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: Point },
    /// Quadratic curve from the current point through `control` to `to`.
    QuadTo { control: Point, to: Point },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GesturePath {
    pub commands: Vec<PathCommand>,
}

impl GesturePath {
    pub fn move_to(mut self, to: Point) -> Self {
        self.commands.push(PathCommand::MoveTo { to });
        self
    }

    pub fn quad_to(mut self, control: Point, to: Point) -> Self {
        self.commands.push(PathCommand::QuadTo { control, to });
        self
    }

    pub fn start(&self) -> Option<Point> {
        self.commands.first().map(|c| match c {
            PathCommand::MoveTo { to } | PathCommand::QuadTo { to, .. } => *to,
        })
    }

    pub fn end(&self) -> Option<Point> {
        self.commands.last().map(|c| match c {
            PathCommand::MoveTo { to } | PathCommand::QuadTo { to, .. } => *to,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeDescription {
    pub path: GesturePath,
    pub start_ms: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GestureDescription {
    pub strokes: Vec<StrokeDescription>,
}

impl GestureDescription {
    pub fn single_stroke(path: GesturePath, duration_ms: u64) -> Self {
        Self {
            strokes: vec![StrokeDescription {
                path,
                start_ms: 0,
                duration_ms,
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub width: u32,
    pub height: u32,
}

/// How the platform finished a dispatched gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureCompletion {
    Completed,
    Cancelled,
}

pub type GestureCallback = Box<dyn FnOnce(GestureCompletion) + Send>;

/// Gesture injection into the foreign application.
pub trait GestureSink {
    fn display_metrics(&self) -> DisplayMetrics;

    /// Submit a gesture. When the platform accepts it (returns `true`), it calls
    /// `on_done` exactly once, later, on the event thread. When it refuses it
    /// (returns `false`), `on_done` is dropped without being called.
    fn dispatch_gesture(&self, gesture: GestureDescription, on_done: GestureCallback) -> bool;
}
