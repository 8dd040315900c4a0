#![forbid(unsafe_code)]

use super::{Tree, TreeError};
use crate::ids::NodeId;
use std::collections::BTreeSet;

/// Nodes under `root` (inclusive) that have no children.
pub fn fetch_leaves(tree: &Tree, root: NodeId) -> Result<BTreeSet<NodeId>, TreeError> {
    let children = tree.fetch_children(root)?;
    if children.is_empty() {
        return Ok(BTreeSet::from([root]));
    }
    let mut leaves = BTreeSet::new();
    for child in children {
        leaves.extend(fetch_leaves(tree, child)?);
    }
    Ok(leaves)
}

/// Path from the tree root down to `node`, root first.
pub fn fetch_lineage(tree: &Tree, node: NodeId) -> Result<Vec<NodeId>, TreeError> {
    if !tree.exists(node) {
        return Err(TreeError::InvalidNode);
    }
    let mut lineage = vec![node];
    let mut current = node;
    while let Ok(parent) = tree.fetch_parent(current) {
        lineage.push(parent);
        current = parent;
    }
    lineage.reverse();
    Ok(lineage)
}
