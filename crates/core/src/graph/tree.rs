#![forbid(unsafe_code)]

use crate::ids::NodeId;
use crate::index::PairIndex;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("invalid parent")]
    InvalidParent,
    #[error("child already exists")]
    ChildAlreadyExists,
    #[error("invalid node")]
    InvalidNode,
}

/// Single-parent tree over node ids: a root plus (parent, child) edges.
///
/// The root always exists and never has a parent. Every other node exists
/// iff it appears in some edge.
#[derive(Clone, Debug)]
pub struct Tree {
    root: NodeId,
    edges: PairIndex<NodeId, NodeId>,
}

impl Tree {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            edges: PairIndex::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn exists(&self, node: NodeId) -> bool {
        node == self.root || self.edges.contains_left(&node) || self.edges.contains_right(&node)
    }

    pub fn create_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, TreeError> {
        if !self.exists(parent) {
            return Err(TreeError::InvalidParent);
        }
        if self.exists(child) {
            return Err(TreeError::ChildAlreadyExists);
        }
        self.edges
            .insert(parent, child)
            .map_err(|_| TreeError::ChildAlreadyExists)?;
        Ok(child)
    }

    /// Removes `node` and its whole subtree, children first.
    pub fn delete_node(&mut self, node: NodeId) -> Result<NodeId, TreeError> {
        if node == self.root || !self.exists(node) {
            return Err(TreeError::InvalidNode);
        }
        let parent = self.fetch_parent(node).map_err(|_| TreeError::InvalidNode)?;
        for child in self.fetch_children(node)? {
            self.delete_node(child)?;
        }
        self.edges
            .remove(&parent, &node)
            .map_err(|_| TreeError::InvalidNode)?;
        Ok(node)
    }

    pub fn fetch_children(&self, parent: NodeId) -> Result<BTreeSet<NodeId>, TreeError> {
        if !self.exists(parent) {
            return Err(TreeError::InvalidParent);
        }
        Ok(self.edges.rights_of(&parent).copied().collect())
    }

    pub fn fetch_parent(&self, child: NodeId) -> Result<NodeId, TreeError> {
        self.edges
            .lefts_of(&child)
            .next()
            .copied()
            .ok_or(TreeError::InvalidParent)
    }

    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while let Ok(parent) = self.fetch_parent(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Re-parents `src` (with its subtree) under `dst`.
    ///
    /// Delete-then-recreate, not atomic: an error between the two steps
    /// leaves `src` detached.
    pub fn move_node(&mut self, src: NodeId, dst: NodeId) -> Result<(), TreeError> {
        if !self.exists(src) || !self.exists(dst) || src == dst || src == self.root {
            return Err(TreeError::InvalidNode);
        }
        if self.is_ancestor(src, dst) {
            return Err(TreeError::InvalidNode);
        }
        let mut detached = Tree::new(src);
        detached.copy_descendants(src, self, src)?;
        self.delete_node(src)?;
        self.create_child(dst, src)?;
        self.copy_descendants(src, &detached, src)?;
        Ok(())
    }

    /// Grafts `other_root` and its descendants from `other` beneath `parent`,
    /// keeping the same ids. Nothing is written if any of those ids is
    /// already present here.
    pub fn copy(&mut self, parent: NodeId, other: &Tree, other_root: NodeId) -> Result<NodeId, TreeError> {
        if !self.exists(parent) {
            return Err(TreeError::InvalidParent);
        }
        let incoming = other.subtree_ids(other_root)?;
        if incoming.iter().any(|id| self.exists(*id)) {
            return Err(TreeError::ChildAlreadyExists);
        }
        self.graft(parent, other, other_root)
    }

    /// Grafts only the descendants of `other_root` beneath `parent`, with
    /// the same all-or-nothing collision check as [`Tree::copy`].
    pub fn copy_descendants(&mut self, parent: NodeId, other: &Tree, other_root: NodeId) -> Result<(), TreeError> {
        if !self.exists(parent) {
            return Err(TreeError::InvalidParent);
        }
        let incoming = other.subtree_ids(other_root)?;
        if incoming.iter().skip(1).any(|id| self.exists(*id)) {
            return Err(TreeError::ChildAlreadyExists);
        }
        for child in other.fetch_children(other_root)? {
            self.graft(parent, other, child)?;
        }
        Ok(())
    }

    fn graft(&mut self, parent: NodeId, other: &Tree, other_root: NodeId) -> Result<NodeId, TreeError> {
        let copied = self.create_child(parent, other_root)?;
        for child in other.fetch_children(other_root)? {
            self.graft(copied, other, child)?;
        }
        Ok(copied)
    }

    // `root` first, then its descendants breadth-first.
    fn subtree_ids(&self, root: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut ids = vec![root];
        let mut cursor = 0;
        while cursor < ids.len() {
            ids.extend(self.fetch_children(ids[cursor])?);
            cursor += 1;
        }
        Ok(ids)
    }

    pub fn nodes(&self) -> BTreeSet<NodeId> {
        let mut nodes = self
            .edges
            .iter()
            .map(|(_, child)| *child)
            .collect::<BTreeSet<_>>();
        nodes.insert(self.root);
        nodes
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
