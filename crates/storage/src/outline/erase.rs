#![forbid(unsafe_code)]

use super::Outline;
use crate::store::StoreError;
use ol_core::NodeId;
use tracing::debug;

impl Outline {
    /// Erases a node with its whole subtree, every alias placement of or
    /// under those nodes, their order entries and attribute trees.
    ///
    /// A top-level alias id erases only that placement.
    pub fn erase_node(&mut self, id: NodeId) -> Result<(), StoreError> {
        if id == self.root {
            return Err(StoreError::IsRoot);
        }
        if self.aliases.contains(id) {
            return self.erase_alias(id);
        }
        if !self.db.node_exists(id) {
            return Err(StoreError::InvalidNode);
        }
        self.erase_recursive(id)?;
        debug!(node = %id, "outline.erase");
        Ok(())
    }

    fn erase_recursive(&mut self, id: NodeId) -> Result<(), StoreError> {
        let children = self
            .fetch_ordered_children(id)?
            .into_iter()
            .filter(|child| self.db.child_exists(id, *child))
            .collect::<Vec<_>>();
        for child in children.into_iter().rev() {
            self.erase_recursive(child)?;
        }

        for entry in self.fetch_aliases_to(id) {
            self.erase_top_alias(entry)?;
        }
        for entry in self.fetch_aliases_from(id) {
            self.erase_top_alias(entry)?;
        }
        self.aliases.remove_internal(id)?;

        if let Some(parent) = self.db.fetch_parent(id) {
            self.pop_order(parent, id)?;
        }
        if let Some(attr) = self.db.fetch_attr_node(id) {
            self.erase_attr_tree(attr)?;
        }
        self.db.erase_all(id)?;
        Ok(())
    }

    // Attribute trees carry no order, aliases or nested attributes.
    fn erase_attr_tree(&mut self, id: NodeId) -> Result<(), StoreError> {
        for child in self.db.fetch_children(id) {
            self.erase_attr_tree(child)?;
        }
        self.db.erase_all(id)?;
        Ok(())
    }
}
