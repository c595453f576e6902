use serde::{Deserialize, Serialize};

/// Screen-space rectangle of an element, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Live capability flags of a node. Cheap to read, evaluated before any copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub clickable: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub focusable: bool,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub scrollable: bool,
}

/// Immutable copy of a node's observable attributes.
///
/// Holds no reference to the node it came from, so it stays valid after the
/// node handle has been recycled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub text: String,
    pub description: String,
    pub class_name: String,
    pub resource_id: String,
    pub bounds: Bounds,
    pub capabilities: Capabilities,
}

impl ElementSnapshot {
    /// Text shown for this element in a hint: text, else description.
    pub fn display_text(&self) -> Option<&str> {
        if !self.text.is_empty() {
            Some(&self.text)
        } else if !self.description.is_empty() {
            Some(&self.description)
        } else {
            None
        }
    }

    /// Signature entry: `text_description_left_top_width_height`.
    pub fn signature_key(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}",
            self.text,
            self.description,
            self.bounds.left(),
            self.bounds.top(),
            self.bounds.width,
            self.bounds.height
        )
    }
}

/// Flattened per-node view of the tree, as produced by `describe_tree`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDescriptor {
    pub depth: usize,
    /// Child indices from the root down to this node.
    pub path: Vec<usize>,
    pub snapshot: ElementSnapshot,
}
