use crate::element::element_model::{Capabilities, ElementSnapshot};

/// Read access to the platform's current UI tree.
///
/// Node handles are owned by the platform and recycled on read: every handle
/// returned by `root_in_active_window` or `child` must be given back through
/// `recycle` exactly once. `recycle` takes the handle by value, so a handle
/// cannot be used or released again afterwards.
pub trait NodeTree {
    type Node;

    /// Root of the currently active window, or `None` when no window is active.
    fn root_in_active_window(&self) -> Option<Self::Node>;

    fn child_count(&self, node: &Self::Node) -> usize;

    /// The child at `index`. `None` when the platform no longer has it.
    fn child(&self, node: &Self::Node, index: usize) -> Option<Self::Node>;

    fn capabilities(&self, node: &Self::Node) -> Capabilities;

    /// Copy the node's attributes out.
    fn snapshot(&self, node: &Self::Node) -> ElementSnapshot;

    /// Replace the node's text. Returns whether the platform accepted it.
    fn set_text(&self, node: &Self::Node, text: &str) -> bool;

    fn recycle(&self, node: Self::Node);
}

/// Scoped ownership of one node handle. The handle is recycled when the guard
/// drops, on every exit path of the traversal.
pub struct NodeGuard<'t, T: NodeTree + ?Sized> {
    tree: &'t T,
    node: Option<T::Node>,
}

impl<'t, T: NodeTree + ?Sized> NodeGuard<'t, T> {
    pub fn new(tree: &'t T, node: T::Node) -> Self {
        Self {
            tree,
            node: Some(node),
        }
    }

    /// Acquire the active window root, if any.
    pub fn root(tree: &'t T) -> Option<Self> {
        tree.root_in_active_window().map(|node| Self::new(tree, node))
    }

    pub fn node(&self) -> &T::Node {
        // Only `drop` takes the node out.
        match &self.node {
            Some(node) => node,
            None => unreachable!("node guard used after release"),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.tree.capabilities(self.node())
    }

    pub fn snapshot(&self) -> ElementSnapshot {
        self.tree.snapshot(self.node())
    }

    pub fn child_count(&self) -> usize {
        self.tree.child_count(self.node())
    }

    pub fn child(&self, index: usize) -> Option<NodeGuard<'t, T>> {
        self.tree
            .child(self.node(), index)
            .map(|child| NodeGuard::new(self.tree, child))
    }
}

impl<T: NodeTree + ?Sized> Drop for NodeGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(node) = self.node.take() {
            self.tree.recycle(node);
        }
    }
}
