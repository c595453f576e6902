use serde::Serialize;

use crate::{element::element_model::Bounds, platform::overlay::ViewId};

/// Gap between an element's bottom edge and its hint.
pub const DEFAULT_HINT_OFFSET: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HintAnchor {
    pub x: i32,
    pub y: i32,
}

impl HintAnchor {
    /// Just below the element: bottom-left corner shifted down by `offset`.
    pub fn below(bounds: &Bounds, offset: i32) -> Self {
        Self {
            x: bounds.left(),
            y: bounds.bottom() + offset,
        }
    }
}

/// One displayed hint. Only `HintOverlayManager` creates or holds these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HintEntry {
    pub anchor: HintAnchor,
    /// Element text (or description) the hint was made from.
    pub label: String,
    pub view: ViewId,
}

/// Text rendered in the overlay view: the label in double quotes.
pub fn render_hint_text(label: &str) -> String {
    format!("\"{}\"", label)
}
