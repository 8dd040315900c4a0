#![forbid(unsafe_code)]

use super::Outline;
use crate::store::StoreError;
use ol_core::NodeId;
use ol_core::graph::{Tree, fetch_leaves};
use ol_core::heading::{format_title, is_valid_heading};
use std::collections::BTreeSet;
use tracing::debug;

impl Outline {
    pub fn create_child(&mut self, parent: NodeId, heading: &str) -> Result<NodeId, StoreError> {
        self.create_child_with_id(parent, NodeId::new(), heading, &format_title(heading))
    }

    pub fn create_child_with_title(&mut self, parent: NodeId, heading: &str, title: &str) -> Result<NodeId, StoreError> {
        self.create_child_with_id(parent, NodeId::new(), heading, title)
    }

    /// Creates `id` under `parent` (an alias placement resolves to its
    /// source), stamps its genesis, appends it to the parent's display order
    /// and places it under every alias of the parent.
    pub fn create_child_with_id(
        &mut self,
        parent: NodeId,
        id: NodeId,
        heading: &str,
        title: &str,
    ) -> Result<NodeId, StoreError> {
        let parent = self.resolve(parent);
        if !self.db.node_exists(parent) || self.db.is_in_attr_tree(parent) {
            return Err(StoreError::InvalidParent);
        }
        if id.is_nil() || self.exists(id) {
            return Err(StoreError::NodeAlreadyExists);
        }
        if !is_valid_heading(heading) {
            return Err(StoreError::InvalidHeading(heading.to_string()));
        }
        if self.heading_taken(parent, heading) {
            return Err(StoreError::DuplicateChildHeading(heading.to_string()));
        }

        self.push_raw_node(parent, id, heading, title, "")?;
        self.stamp_genesis(id)?;
        self.push_order(parent, id)?;
        self.aliases.update_aliases(&self.db, parent, id)?;
        debug!(parent = %parent, node = %id, heading, "outline.create_child");
        Ok(id)
    }

    /// True when a child or an alias placement under `parent` already uses
    /// `heading`.
    pub(crate) fn heading_taken(&self, parent: NodeId, heading: &str) -> bool {
        self.db.fetch_child(parent, heading).is_some()
            || self
                .db
                .fetch_alias_sources(parent)
                .into_iter()
                .any(|src| self.db.fetch_heading(src) == Some(heading))
    }

    /// Sibling uniqueness is not rechecked here.
    pub fn update_heading(&mut self, node: NodeId, heading: &str) -> Result<(), StoreError> {
        let node = self.existing(node)?;
        if !is_valid_heading(heading) {
            return Err(StoreError::InvalidHeading(heading.to_string()));
        }
        self.db.push_heading(node, heading)?;
        Ok(())
    }

    pub fn update_title(&mut self, node: NodeId, title: &str) -> Result<(), StoreError> {
        let node = self.existing(node)?;
        self.db.push_title(node, title)?;
        Ok(())
    }

    pub fn update_body(&mut self, node: NodeId, body: &str) -> Result<(), StoreError> {
        let node = self.existing(node)?;
        self.db.push_body(node, body)?;
        Ok(())
    }

    fn existing(&self, node: NodeId) -> Result<NodeId, StoreError> {
        let node = self.resolve(node);
        if self.db.node_exists(node) {
            Ok(node)
        } else {
            Err(StoreError::InvalidNode)
        }
    }

    pub fn fetch_heading(&self, node: NodeId) -> Option<&str> {
        self.db.fetch_heading(self.resolve(node))
    }

    pub fn fetch_title(&self, node: NodeId) -> Option<&str> {
        self.db.fetch_title(self.resolve(node))
    }

    pub fn fetch_body(&self, node: NodeId) -> Option<&str> {
        self.db.fetch_body(self.resolve(node))
    }

    /// Real parent of a node; overlay parent of an alias placement.
    pub fn fetch_parent(&self, node: NodeId) -> Option<NodeId> {
        if self.aliases.contains(node) {
            return self.aliases.overlay().fetch_parent(node).ok();
        }
        self.db.fetch_parent(node)
    }

    /// Real children only; see [`Outline::fetch_alias_children`] for
    /// placements.
    pub fn fetch_children(&self, node: NodeId) -> BTreeSet<NodeId> {
        self.db.fetch_children(node)
    }

    pub fn fetch_child(&self, parent: NodeId, heading: &str) -> Option<NodeId> {
        self.db.fetch_child(self.resolve(parent), heading)
    }

    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.db.is_ancestor(ancestor, node)
    }

    /// Same node, or one is an ancestor of the other.
    pub fn is_lineal(&self, a: NodeId, b: NodeId) -> bool {
        a == b || self.is_ancestor(a, b) || self.is_ancestor(b, a)
    }

    /// The primary hierarchy as a standalone [`Tree`]. Attribute nodes are
    /// not part of it.
    pub fn hierarchy(&self) -> Result<Tree, StoreError> {
        let mut tree = Tree::new(self.root);
        let mut pending = vec![self.root];
        while let Some(parent) = pending.pop() {
            for child in self.db.fetch_children(parent) {
                tree.create_child(parent, child)?;
                pending.push(child);
            }
        }
        Ok(tree)
    }

    /// Tree rooted at `node` holding its real descendants.
    pub fn subtree(&self, node: NodeId) -> Result<Tree, StoreError> {
        let hierarchy = self.hierarchy()?;
        if !hierarchy.exists(node) {
            return Err(StoreError::InvalidNode);
        }
        let mut subtree = Tree::new(node);
        subtree.copy_descendants(node, &hierarchy, node)?;
        Ok(subtree)
    }

    pub fn fetch_leaves(&self, node: NodeId) -> Result<BTreeSet<NodeId>, StoreError> {
        let hierarchy = self.hierarchy()?;
        if !hierarchy.exists(node) {
            return Err(StoreError::InvalidNode);
        }
        Ok(fetch_leaves(&hierarchy, node)?)
    }
}
