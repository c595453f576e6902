//! In-memory platform backed by a recorded screen tree.
//!
//! Used by the CLI to drive the engine against screen dumps, and by the tests
//! to check handle accounting and the actions the engine issues.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    element::element_model::{Bounds, Capabilities, ElementSnapshot},
    platform::{
        error::PlatformError,
        gesture::{DisplayMetrics, GestureCallback, GestureCompletion, GestureDescription, GestureSink},
        node_tree::NodeTree,
        overlay::{OverlayParams, OverlaySurface, ViewId},
    },
};

pub const DEFAULT_DISPLAY: DisplayMetrics = DisplayMetrics {
    width: 1080,
    height: 2340,
};

/// One node of a recorded screen dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedNode {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(flatten)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub children: Vec<RecordedNode>,
}

impl RecordedNode {
    fn at_path(&self, path: &[usize]) -> Option<&RecordedNode> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut RecordedNode> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    fn to_snapshot(&self) -> ElementSnapshot {
        ElementSnapshot {
            text: self.text.clone(),
            description: self.description.clone(),
            class_name: self.class_name.clone(),
            resource_id: self.resource_id.clone(),
            bounds: self.bounds,
            capabilities: self.capabilities,
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(RecordedNode::node_count).sum::<usize>()
    }
}

/// A screen dump as stored on disk (YAML or JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedScreen {
    #[serde(default)]
    pub display: Option<DisplayMetrics>,
    /// `None` models "no active window".
    #[serde(default)]
    pub root: Option<RecordedNode>,
}

/// Handle into the recorded tree. Not `Clone`: it can only be recycled once.
#[derive(Debug)]
pub struct RecordedHandle {
    id: u64,
    path: Vec<usize>,
}

impl RecordedHandle {
    pub fn path(&self) -> &[usize] {
        &self.path
    }
}

/// Something the engine asked the platform to do.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlatformAction {
    Gesture { gesture: GestureDescription },
    SetText { path: Vec<usize>, text: String },
}

pub struct RecordedPlatform {
    root: RefCell<Option<RecordedNode>>,
    metrics: DisplayMetrics,
    next_handle: Cell<u64>,
    live: RefCell<HashSet<u64>>,
    acquired: Cell<usize>,
    released: Cell<usize>,
    peak_live: Cell<usize>,
    actions: RefCell<Vec<PlatformAction>>,
    pending_gestures: RefCell<Vec<GestureCallback>>,
    accept_gestures: Cell<bool>,
}

impl RecordedPlatform {
    pub fn new(root: Option<RecordedNode>, metrics: DisplayMetrics) -> Self {
        Self {
            root: RefCell::new(root),
            metrics,
            next_handle: Cell::new(1),
            live: RefCell::new(HashSet::new()),
            acquired: Cell::new(0),
            released: Cell::new(0),
            peak_live: Cell::new(0),
            actions: RefCell::new(Vec::new()),
            pending_gestures: RefCell::new(Vec::new()),
            accept_gestures: Cell::new(true),
        }
    }

    pub fn from_screen(screen: RecordedScreen, fallback: DisplayMetrics) -> Self {
        Self::new(screen.root, screen.display.unwrap_or(fallback))
    }

    /// Swap the active window content, as if the foreign app navigated.
    pub fn set_root(&self, root: Option<RecordedNode>) {
        *self.root.borrow_mut() = root;
    }

    pub fn root(&self) -> Option<RecordedNode> {
        self.root.borrow().clone()
    }

    pub fn acquired_count(&self) -> usize {
        self.acquired.get()
    }

    pub fn released_count(&self) -> usize {
        self.released.get()
    }

    /// Handles currently held by the engine.
    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    /// Largest number of handles held at the same time.
    pub fn peak_live_count(&self) -> usize {
        self.peak_live.get()
    }

    pub fn actions(&self) -> Vec<PlatformAction> {
        self.actions.borrow().clone()
    }

    pub fn set_accept_gestures(&self, accept: bool) {
        self.accept_gestures.set(accept);
    }

    pub fn pending_gesture_count(&self) -> usize {
        self.pending_gestures.borrow().len()
    }

    /// Finish every dispatched gesture with `completion`. Returns how many.
    pub fn complete_pending(&self, completion: GestureCompletion) -> usize {
        let callbacks = std::mem::take(&mut *self.pending_gestures.borrow_mut());
        let count = callbacks.len();
        for callback in callbacks {
            callback(completion);
        }
        count
    }

    fn acquire(&self, path: Vec<usize>) -> RecordedHandle {
        let id = self.next_handle.get();
        self.next_handle.set(id + 1);
        self.acquired.set(self.acquired.get() + 1);

        let mut live = self.live.borrow_mut();
        live.insert(id);
        if live.len() > self.peak_live.get() {
            self.peak_live.set(live.len());
        }

        RecordedHandle { id, path }
    }

    fn with_node<R>(&self, handle: &RecordedHandle, f: impl FnOnce(&RecordedNode) -> R) -> Option<R> {
        let root = self.root.borrow();
        root.as_ref()
            .and_then(|r| r.at_path(&handle.path))
            .map(f)
    }
}

impl NodeTree for RecordedPlatform {
    type Node = RecordedHandle;

    fn root_in_active_window(&self) -> Option<RecordedHandle> {
        if self.root.borrow().is_none() {
            return None;
        }
        Some(self.acquire(Vec::new()))
    }

    fn child_count(&self, node: &RecordedHandle) -> usize {
        self.with_node(node, |n| n.children.len()).unwrap_or(0)
    }

    fn child(&self, node: &RecordedHandle, index: usize) -> Option<RecordedHandle> {
        if index >= self.child_count(node) {
            return None;
        }
        let mut path = node.path.clone();
        path.push(index);
        Some(self.acquire(path))
    }

    fn capabilities(&self, node: &RecordedHandle) -> Capabilities {
        self.with_node(node, |n| n.capabilities).unwrap_or_default()
    }

    fn snapshot(&self, node: &RecordedHandle) -> ElementSnapshot {
        self.with_node(node, RecordedNode::to_snapshot)
            .unwrap_or_default()
    }

    fn set_text(&self, node: &RecordedHandle, text: &str) -> bool {
        let mut root = self.root.borrow_mut();
        let Some(target) = root.as_mut().and_then(|r| r.at_path_mut(&node.path)) else {
            return false;
        };
        if !target.capabilities.editable {
            return false;
        }
        target.text = text.to_string();

        self.actions.borrow_mut().push(PlatformAction::SetText {
            path: node.path.clone(),
            text: text.to_string(),
        });
        true
    }

    fn recycle(&self, node: RecordedHandle) {
        if self.live.borrow_mut().remove(&node.id) {
            self.released.set(self.released.get() + 1);
        } else {
            warn!(handle = node.id, "recycled a handle that was not live");
        }
    }
}

impl GestureSink for RecordedPlatform {
    fn display_metrics(&self) -> DisplayMetrics {
        self.metrics
    }

    fn dispatch_gesture(&self, gesture: GestureDescription, on_done: GestureCallback) -> bool {
        if !self.accept_gestures.get() {
            debug!("recorded platform refused gesture");
            return false;
        }
        self.actions
            .borrow_mut()
            .push(PlatformAction::Gesture { gesture });
        self.pending_gestures.borrow_mut().push(on_done);
        true
    }
}

/// Display surface that keeps overlay views in a map.
#[derive(Debug, Default)]
pub struct RecordedOverlay {
    views: BTreeMap<ViewId, OverlayParams>,
    next_id: u64,
    rejected_texts: Vec<String>,
    fail_removals: bool,
    added: usize,
    failed_removals: usize,
}

impl RecordedOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to add any view whose text contains `needle`.
    pub fn reject_text_containing(&mut self, needle: impl Into<String>) {
        self.rejected_texts.push(needle.into());
    }

    pub fn set_fail_removals(&mut self, fail: bool) {
        self.fail_removals = fail;
    }

    pub fn views(&self) -> Vec<&OverlayParams> {
        self.views.values().collect()
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn texts(&self) -> Vec<String> {
        self.views.values().map(|v| v.text.clone()).collect()
    }

    /// Total successful additions over the surface's lifetime.
    pub fn added_count(&self) -> usize {
        self.added
    }

    pub fn failed_removal_count(&self) -> usize {
        self.failed_removals
    }
}

impl OverlaySurface for RecordedOverlay {
    fn add_view(&mut self, params: OverlayParams) -> Result<ViewId, PlatformError> {
        if self
            .rejected_texts
            .iter()
            .any(|needle| params.text.contains(needle.as_str()))
        {
            return Err(PlatformError::OverlayRejected(params.text));
        }
        self.next_id += 1;
        let id = ViewId(self.next_id);
        self.views.insert(id, params);
        self.added += 1;
        Ok(id)
    }

    fn remove_view(&mut self, view: ViewId) -> Result<(), PlatformError> {
        if self.fail_removals {
            self.failed_removals += 1;
            return Err(PlatformError::OverlayRemoval {
                view,
                reason: "surface refused removal".into(),
            });
        }
        self.views
            .remove(&view)
            .map(|_| ())
            .ok_or(PlatformError::UnknownView(view))
    }
}
