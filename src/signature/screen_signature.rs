use std::fmt;

use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::{
    element::{element_model::ElementSnapshot, predicate::ElementPredicate},
    platform::node_tree::NodeTree,
    walker::tree_walker::snapshot_elements,
};

/// Fingerprint of the clickable surface of a screen.
///
/// Hex SHA-1 over the `|`-joined signature keys of every clickable and
/// enabled element, in traversal order. Order-sensitive: the same elements in a
/// different arrangement give a different signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScreenSignature(String);

impl ScreenSignature {
    /// Build from clickable snapshots already in traversal order.
    pub fn from_snapshots(clickable: &[ElementSnapshot]) -> Self {
        let joined = clickable
            .iter()
            .map(ElementSnapshot::signature_key)
            .collect::<Vec<_>>()
            .join("|");

        let mut hasher = Sha1::new();
        hasher.update(joined.as_bytes());
        ScreenSignature(format!("{:x}", hasher.finalize()))
    }

    /// Walk the active window and fingerprint its clickable surface.
    pub fn compute<T: NodeTree + ?Sized>(tree: &T) -> Self {
        Self::from_snapshots(&snapshot_elements(tree, ElementPredicate::ClickableEnabled))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
