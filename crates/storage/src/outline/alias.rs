#![forbid(unsafe_code)]

use super::Outline;
use crate::store::{Database, StoreError, Table};
use ol_core::delta::Rejection;
use ol_core::graph::{Tree, fetch_lineage};
use ol_core::index::{AliasEntry, AliasIndex};
use ol_core::{NodeId, alias_id};
use std::collections::BTreeSet;
use tracing::debug;

/// Every live alias placement plus the overlay tree that renders them.
///
/// Top-level placements `(src, dst)` hang under a mirror of `dst`'s real
/// lineage. Everything shown under an aliased node, real children and
/// aliases landing on it alike, gets an internal placement
/// `alias_id(child, parent_alias)` under its parent's placement. Only
/// top-level placements are persisted; internal ones are derived.
#[derive(Clone, Debug)]
pub struct AliasStore {
    index: AliasIndex,
    overlay: Tree,
}

impl AliasStore {
    pub fn new(root: NodeId) -> Self {
        Self {
            index: AliasIndex::new(),
            overlay: Tree::new(root),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get(&self, alias: NodeId) -> Option<&AliasEntry> {
        self.index.get(&alias)
    }

    pub fn contains(&self, alias: NodeId) -> bool {
        self.index.contains(&alias)
    }

    /// Top-level placements have a real destination; internal ones sit
    /// under another placement.
    pub fn is_top(&self, alias: NodeId) -> bool {
        self.index
            .get(&alias)
            .is_some_and(|entry| !self.index.contains(&entry.dst))
    }

    pub fn overlay(&self) -> &Tree {
        &self.overlay
    }

    pub fn index(&self) -> &AliasIndex {
        &self.index
    }

    pub(crate) fn place_top(&mut self, db: &Database, src: NodeId, dst: NodeId) -> Result<NodeId, StoreError> {
        self.mirror_lineage(db, dst)?;
        let alias = self.index.insert(src, dst)?;
        self.overlay.create_child(dst, alias)?;
        self.place_internal(db, src, alias)?;
        debug!(alias = %alias, src = %src, dst = %dst, "outline.alias.place");
        Ok(alias)
    }

    fn place_internal(&mut self, db: &Database, src: NodeId, parent_alias: NodeId) -> Result<(), StoreError> {
        let shown = db.fetch_children(src).into_iter().chain(db.fetch_alias_sources(src));
        for child in shown.collect::<Vec<_>>() {
            let alias = self.index.insert(child, parent_alias)?;
            self.overlay.create_child(parent_alias, alias)?;
            self.place_internal(db, child, alias)?;
        }
        Ok(())
    }

    /// Gives `child` (and everything shown under it) a placement under every
    /// placement of `parent`. `child` is either a new real child of `parent`
    /// or the source of a new alias landing on it.
    pub(crate) fn update_aliases(&mut self, db: &Database, parent: NodeId, child: NodeId) -> Result<(), StoreError> {
        for entry in self.index.from_source(&parent) {
            let parent_alias = entry.alias();
            let alias = self.index.insert(child, parent_alias)?;
            self.overlay.create_child(parent_alias, alias)?;
            self.place_internal(db, child, alias)?;
        }
        Ok(())
    }

    /// Drops the placements of `child` that sit under placements of `parent`.
    pub(crate) fn remove_under(&mut self, parent: NodeId, child: NodeId) -> Result<(), StoreError> {
        for entry in self.index.from_source(&parent) {
            let placement = entry.alias();
            let alias = alias_id(child, placement);
            if self.index.get(&alias) == Some(&AliasEntry { src: child, dst: placement }) {
                self.remove_placement(alias)?;
            }
        }
        Ok(())
    }

    /// Drops every internal placement whose source is `node`.
    pub(crate) fn remove_internal(&mut self, node: NodeId) -> Result<(), StoreError> {
        let internal = self
            .index
            .from_source(&node)
            .into_iter()
            .map(|entry| entry.alias())
            .filter(|alias| !self.is_top(*alias))
            .collect::<Vec<_>>();
        for alias in internal {
            if self.index.contains(&alias) {
                self.remove_placement(alias)?;
            }
        }
        Ok(())
    }

    /// Removes `alias` with its whole overlay subtree, then prunes mirrored
    /// lineage nodes that no longer lead to any placement.
    pub(crate) fn remove_placement(&mut self, alias: NodeId) -> Result<(), StoreError> {
        if !self.index.contains(&alias) {
            return Err(StoreError::InvalidNode);
        }
        let parent = self.overlay.fetch_parent(alias).ok();
        let mut doomed = vec![alias];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let children = self.overlay.fetch_children(doomed[cursor]).unwrap_or_default();
            doomed.extend(children);
            cursor += 1;
        }
        self.overlay.delete_node(alias)?;
        for id in &doomed {
            self.index.remove(id)?;
        }
        if let Some(parent) = parent {
            self.prune(parent)?;
        }
        debug!(alias = %alias, removed = doomed.len(), "outline.alias.remove");
        Ok(())
    }

    fn prune(&mut self, start: NodeId) -> Result<(), StoreError> {
        let mut node = start;
        while node != self.overlay.root() && !self.index.contains(&node) {
            if !self.overlay.fetch_children(node)?.is_empty() {
                break;
            }
            let parent = self.overlay.fetch_parent(node)?;
            self.overlay.delete_node(node)?;
            node = parent;
        }
        Ok(())
    }

    /// Ensures the real lineage of `node` is present in the overlay.
    pub(crate) fn mirror_lineage(&mut self, db: &Database, node: NodeId) -> Result<(), StoreError> {
        let lineage = db.fetch_lineage(node);
        if lineage.first() != Some(&self.overlay.root()) {
            return Err(StoreError::InvalidNode);
        }
        for pair in lineage.windows(2) {
            if !self.overlay.exists(pair[1]) {
                self.overlay.create_child(pair[0], pair[1])?;
            }
        }
        Ok(())
    }

    /// Follows a real node that moved to `dst`, if it is mirrored.
    pub(crate) fn follow_move(&mut self, db: &Database, node: NodeId, old_parent: NodeId, dst: NodeId) -> Result<(), StoreError> {
        if !self.overlay.exists(node) {
            return Ok(());
        }
        self.mirror_lineage(db, dst)?;
        self.overlay.move_node(node, dst)?;
        self.prune(old_parent)
    }
}

impl Outline {
    /// Places `src` beneath `dst` as an additional parent and returns the
    /// alias id.
    pub fn create_alias(&mut self, src: NodeId, dst: NodeId) -> Result<NodeId, StoreError> {
        let src = self.resolve(src);
        let dst = self.resolve(dst);
        if src == self.root {
            return Err(StoreError::IsRoot);
        }
        if !self.db.node_exists(src) || self.db.is_in_attr_tree(src) {
            return Err(StoreError::AliasSourceNotFound);
        }
        if !self.db.node_exists(dst) || self.db.is_in_attr_tree(dst) {
            return Err(StoreError::AliasDestinationNotFound);
        }
        if src == dst {
            return Err(StoreError::AliasSourceEqualsDestination);
        }
        if self.is_lineal(src, dst) || self.shows_under(src, dst) {
            return Err(StoreError::AliasSourceIsAncestor);
        }
        if self.db.alias_exists(src, dst) || self.aliases.contains(alias_id(src, dst)) {
            return Err(StoreError::AliasAlreadyExists);
        }
        let heading = self
            .db
            .fetch_heading(src)
            .ok_or(StoreError::MissingValue(Table::Headings))?
            .to_string();
        if self.heading_taken(dst, &heading) {
            return Err(StoreError::DuplicateChildHeading(heading));
        }
        if self.db.cache().aliases().is_erase_pending(src, dst) {
            return Err(StoreError::Rejected {
                table: Table::Aliases,
                reason: Rejection::PreviouslyDeleted,
            });
        }

        self.db.push_alias(src, dst)?;
        self.push_order(dst, src)?;
        let alias = self.aliases.place_top(&self.db, src, dst)?;
        self.aliases.update_aliases(&self.db, dst, src)?;
        Ok(alias)
    }

    /// True when `target` is reachable from `node` through real children and
    /// aliases landing on them; putting `node` under `target` would then
    /// make the outline contain itself.
    pub(crate) fn shows_under(&self, node: NodeId, target: NodeId) -> bool {
        let mut seen = BTreeSet::from([node]);
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if current == target {
                return true;
            }
            let shown = self
                .db
                .fetch_children(current)
                .into_iter()
                .chain(self.db.fetch_alias_sources(current));
            for next in shown {
                if seen.insert(next) {
                    pending.push(next);
                }
            }
        }
        false
    }

    /// Removes a top-level alias placement.
    pub fn erase_alias(&mut self, alias: NodeId) -> Result<(), StoreError> {
        let entry = *self.aliases.get(alias).ok_or(StoreError::InvalidNode)?;
        if !self.aliases.is_top(alias) {
            return Err(StoreError::NonTopAlias);
        }
        self.erase_top_alias(entry)
    }

    pub(crate) fn erase_top_alias(&mut self, entry: AliasEntry) -> Result<(), StoreError> {
        self.db.erase_alias(entry.src, entry.dst)?;
        self.pop_order(entry.dst, entry.src)?;
        self.aliases.remove_placement(entry.alias())?;
        self.aliases.remove_under(entry.dst, entry.src)
    }

    /// Top-level placements whose source is `src`.
    pub fn fetch_aliases_from(&self, src: NodeId) -> Vec<AliasEntry> {
        self.db
            .fetch_alias_destinations(src)
            .into_iter()
            .map(|dst| AliasEntry { src, dst })
            .collect()
    }

    /// Top-level placements that land on `dst`.
    pub fn fetch_aliases_to(&self, dst: NodeId) -> Vec<AliasEntry> {
        self.db
            .fetch_alias_sources(dst)
            .into_iter()
            .map(|src| AliasEntry { src, dst })
            .collect()
    }

    /// Placements rendered directly under `parent` (a real node or another
    /// placement).
    pub fn fetch_alias_children(&self, parent: NodeId) -> BTreeSet<NodeId> {
        self.aliases
            .overlay
            .fetch_children(parent)
            .unwrap_or_default()
            .into_iter()
            .filter(|id| self.aliases.contains(*id))
            .collect()
    }

    /// Overlay path from the root down to `alias`.
    pub fn fetch_aliased_lineage(&self, alias: NodeId) -> Result<Vec<NodeId>, StoreError> {
        if !self.aliases.contains(alias) {
            return Err(StoreError::InvalidNode);
        }
        Ok(fetch_lineage(&self.aliases.overlay, alias)?)
    }
}
