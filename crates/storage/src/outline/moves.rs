#![forbid(unsafe_code)]

use super::Outline;
use crate::store::{StoreError, Table};
use ol_core::NodeId;
use ol_core::delta::Rejection;
use tracing::debug;

impl Outline {
    /// Re-parents `src` (with its subtree) under `dst`.
    ///
    /// Every rejection is checked before the first write. The writes
    /// themselves are not atomic: edge erase, edge push, order and alias
    /// maintenance run one after another.
    pub fn move_node(&mut self, src: NodeId, dst: NodeId) -> Result<(), StoreError> {
        if src == self.root {
            return Err(StoreError::IsRoot);
        }
        if self.aliases.contains(src) {
            return Err(StoreError::InvalidNode);
        }
        let dst = self.resolve(dst);
        if !self.db.node_exists(src) || !self.db.node_exists(dst) || src == dst {
            return Err(StoreError::InvalidNode);
        }
        if self.db.is_in_attr_tree(src) || self.db.is_in_attr_tree(dst) {
            return Err(StoreError::InvalidNode);
        }
        if self.db.is_ancestor(src, dst) {
            return Err(StoreError::InvalidNode);
        }
        let old_parent = self.db.fetch_parent(src).ok_or(StoreError::InvalidNode)?;
        if old_parent == dst {
            return Ok(());
        }
        let heading = self.db.fetch_heading(src).unwrap_or_default();
        if self.heading_taken(dst, heading) {
            return Err(StoreError::DuplicateChildHeading(heading.to_string()));
        }
        if self.db.alias_exists(src, dst) {
            return Err(StoreError::AliasAlreadyExists);
        }
        if self.db.cache().children().is_erase_pending(dst, src) {
            return Err(StoreError::Rejected {
                table: Table::Children,
                reason: Rejection::PreviouslyDeleted,
            });
        }
        if self.shows_under(src, dst) {
            return Err(StoreError::AliasSourceIsAncestor);
        }

        self.aliases.remove_under(old_parent, src)?;
        self.db.erase_child(old_parent, src)?;
        self.pop_order(old_parent, src)?;
        self.db.push_child(dst, src)?;
        self.push_order(dst, src)?;
        self.aliases.follow_move(&self.db, src, old_parent, dst)?;
        self.aliases.update_aliases(&self.db, dst, src)?;
        debug!(node = %src, from = %old_parent, to = %dst, "outline.move");
        Ok(())
    }
}
