//! Depth-first traversal over the platform's UI tree.
//!
//! Pre-order, children in index order. Each child handle is held by a
//! `NodeGuard` for exactly the duration of its subtree visit, so at any moment
//! the walker holds at most one handle per level of the current root-to-leaf
//! path, and every handle is recycled on every exit path (including the early
//! return of `find_first`).

use crate::{
    element::{
        element_model::{ElementSnapshot, NodeDescriptor},
        predicate::ElementPredicate,
    },
    platform::node_tree::{NodeGuard, NodeTree},
};

/// Snapshots of every node matching `predicate`, in traversal order.
/// Empty when there is no active window.
pub fn snapshot_elements<T: NodeTree + ?Sized>(
    tree: &T,
    predicate: ElementPredicate,
) -> Vec<ElementSnapshot> {
    scan_window(tree, predicate).unwrap_or_default()
}

/// Like `snapshot_elements`, but `None` when there is no active window, so an
/// empty window and a missing one stay distinguishable. The root is acquired
/// once.
pub fn scan_window<T: NodeTree + ?Sized>(
    tree: &T,
    predicate: ElementPredicate,
) -> Option<Vec<ElementSnapshot>> {
    let root = NodeGuard::root(tree)?;
    let mut out = Vec::new();
    collect(&root, predicate, &mut out);
    Some(out)
}

fn collect<T: NodeTree + ?Sized>(
    node: &NodeGuard<'_, T>,
    predicate: ElementPredicate,
    out: &mut Vec<ElementSnapshot>,
) {
    if predicate.matches(&node.capabilities()) {
        out.push(node.snapshot());
    }

    for index in 0..node.child_count() {
        let Some(child) = node.child(index) else {
            continue;
        };
        collect(&child, predicate, out);
        // `child` recycled here, before moving to the next sibling.
    }
}

/// Snapshot of the first node matching `predicate`.
pub fn find_first<T: NodeTree + ?Sized>(
    tree: &T,
    predicate: ElementPredicate,
) -> Option<ElementSnapshot> {
    with_first_match(tree, predicate, |_, guard| guard.snapshot())
}

/// Run `f` on the first node matching `predicate` while its handle is still
/// live, then recycle everything. `None` when nothing matched.
pub fn with_first_match<T, R, F>(tree: &T, predicate: ElementPredicate, f: F) -> Option<R>
where
    T: NodeTree + ?Sized,
    F: FnOnce(&T, &NodeGuard<'_, T>) -> R,
{
    let root = NodeGuard::root(tree)?;
    let mut f = Some(f);
    search(tree, &root, predicate, &mut f)
}

fn search<T, R, F>(
    tree: &T,
    node: &NodeGuard<'_, T>,
    predicate: ElementPredicate,
    f: &mut Option<F>,
) -> Option<R>
where
    T: NodeTree + ?Sized,
    F: FnOnce(&T, &NodeGuard<'_, T>) -> R,
{
    if predicate.matches(&node.capabilities()) {
        return f.take().map(|f| f(tree, node));
    }

    for index in 0..node.child_count() {
        let Some(child) = node.child(index) else {
            continue;
        };
        if let Some(found) = search(tree, &child, predicate, f) {
            return Some(found);
        }
    }
    None
}

/// Every node of the active window, flattened with its depth and path.
pub fn describe_tree<T: NodeTree + ?Sized>(tree: &T) -> Vec<NodeDescriptor> {
    let mut out = Vec::new();
    if let Some(root) = NodeGuard::root(tree) {
        let mut path = Vec::new();
        describe(&root, &mut path, &mut out);
    }
    out
}

fn describe<T: NodeTree + ?Sized>(
    node: &NodeGuard<'_, T>,
    path: &mut Vec<usize>,
    out: &mut Vec<NodeDescriptor>,
) {
    out.push(NodeDescriptor {
        depth: path.len(),
        path: path.clone(),
        snapshot: node.snapshot(),
    });

    for index in 0..node.child_count() {
        let Some(child) = node.child(index) else {
            continue;
        };
        path.push(index);
        describe(&child, path, out);
        path.pop();
    }
}
