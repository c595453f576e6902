use serde::Serialize;

use crate::platform::gesture::{DisplayMetrics, GestureDescription, GesturePath, Point};

pub const DEFAULT_TAP_DURATION_MS: u64 = 100;
pub const DEFAULT_SWIPE_DURATION_MS: u64 = 500;
pub const DEFAULT_SCROLL_AMOUNT: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// Lenient parse: `up`/`올려` and `down`/`내려`, case-insensitive.
    /// Anything else scrolls down.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "up" | "올려" => ScrollDirection::Up,
            _ => ScrollDirection::Down,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
        }
    }
}

/// A press at one point with no movement.
pub fn tap_gesture(x: f32, y: f32, duration_ms: u64) -> GestureDescription {
    let path = GesturePath::default().move_to(Point::new(x, y));
    GestureDescription::single_stroke(path, duration_ms)
}

/// Vertical swipe through the horizontal centre of the screen.
///
/// `Up` travels from 3/4 of the height to 1/4, `Down` the other way, as a
/// quadratic curve whose control point is the midpoint.
pub fn swipe_gesture(
    direction: ScrollDirection,
    metrics: DisplayMetrics,
    duration_ms: u64,
) -> GestureDescription {
    let center_x = (metrics.width / 2) as f32;
    let quarter = (metrics.height / 4) as f32;
    let three_quarters = (metrics.height * 3 / 4) as f32;

    let (start_y, end_y) = match direction {
        ScrollDirection::Up => (three_quarters, quarter),
        ScrollDirection::Down => (quarter, three_quarters),
    };

    let path = GesturePath::default()
        .move_to(Point::new(center_x, start_y))
        .quad_to(
            Point::new(center_x, (start_y + end_y) / 2.0),
            Point::new(center_x, end_y),
        );
    GestureDescription::single_stroke(path, duration_ms)
}
