#![forbid(unsafe_code)]

use super::Outline;
use crate::store::{StoreError, Table, now_unix, rfc3339};
use ol_core::heading::format_title;
use ol_core::{NodeId, alias_id};
use std::collections::BTreeSet;
use time::OffsetDateTime;
use tracing::warn;

pub const GENESIS_HEADING: &str = "genesis";
pub const ORDER_HEADING: &str = "order";

impl Outline {
    /// Writes a node with its companions and the `(parent, id)` edge, with no
    /// heading checks and no bookkeeping.
    pub(crate) fn push_raw_node(
        &mut self,
        parent: NodeId,
        id: NodeId,
        heading: &str,
        title: &str,
        body: &str,
    ) -> Result<(), StoreError> {
        self.db.push_node(id)?;
        self.db.push_heading(id, heading)?;
        self.db.push_title(id, title)?;
        self.db.push_body(id, body)?;
        self.db.push_child(parent, id)?;
        Ok(())
    }

    fn attr_node(&mut self, owner: NodeId) -> Result<NodeId, StoreError> {
        match self.db.fetch_attr_node(owner) {
            Some(attr) => Ok(attr),
            None => self.db.create_attr_node(owner),
        }
    }

    /// Attribute child of `owner` with the given heading, if any.
    pub fn fetch_attr(&self, owner: NodeId, heading: &str) -> Option<NodeId> {
        let attr = self.db.fetch_attr_node(owner)?;
        self.db.fetch_child(attr, heading)
    }

    /// Body of the `heading` attribute of `owner`.
    pub fn fetch_attr_body(&self, owner: NodeId, heading: &str) -> Option<&str> {
        self.fetch_attr(owner, heading).and_then(|id| self.db.fetch_body(id))
    }

    /// Sets the body of the `heading` attribute of `owner`, creating the
    /// attribute node and child on first use.
    pub fn set_attr(&mut self, owner: NodeId, heading: &str, body: &str) -> Result<NodeId, StoreError> {
        if !self.db.node_exists(owner) {
            return Err(StoreError::InvalidNode);
        }
        if let Some(existing) = self.fetch_attr(owner, heading) {
            self.db.push_body(existing, body)?;
            return Ok(existing);
        }
        let attr = self.attr_node(owner)?;
        let id = NodeId::new();
        self.push_raw_node(attr, id, heading, &format_title(heading), body)?;
        Ok(id)
    }

    pub(crate) fn stamp_genesis(&mut self, node: NodeId) -> Result<(), StoreError> {
        self.set_attr(node, GENESIS_HEADING, &now_unix().to_string())?;
        Ok(())
    }

    pub fn fetch_genesis_time(&self, node: NodeId) -> Result<OffsetDateTime, StoreError> {
        let node = self.resolve(node);
        let raw = self
            .fetch_attr_body(node, GENESIS_HEADING)
            .ok_or(StoreError::MissingValue(Table::Bodies))?;
        let seconds = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| StoreError::MissingValue(Table::Bodies))?;
        OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| StoreError::MissingValue(Table::Bodies))
    }

    /// Creation time of `node` as an RFC 3339 string.
    pub fn fetch_genesis_rfc3339(&self, node: NodeId) -> Result<String, StoreError> {
        Ok(rfc3339(self.fetch_genesis_time(node)?))
    }

    /// Raw display order of `parent`: child ids and alias source ids.
    fn fetch_order(&self, parent: NodeId) -> Vec<NodeId> {
        let Some(raw) = self.fetch_attr_body(parent, ORDER_HEADING) else {
            return Vec::new();
        };
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match NodeId::parse(line.trim()) {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(parent = %parent, entry = line, error = %err, "outline.order.unparseable");
                    None
                }
            })
            .collect()
    }

    fn write_order(&mut self, parent: NodeId, order: &[NodeId]) -> Result<(), StoreError> {
        let body = order.iter().map(NodeId::to_string).collect::<Vec<_>>().join("\n");
        self.set_attr(parent, ORDER_HEADING, &body)?;
        Ok(())
    }

    pub(crate) fn push_order(&mut self, parent: NodeId, id: NodeId) -> Result<(), StoreError> {
        let mut order = self.fetch_order(parent);
        if order.contains(&id) {
            return Ok(());
        }
        order.push(id);
        self.write_order(parent, &order)
    }

    pub(crate) fn pop_order(&mut self, parent: NodeId, id: NodeId) -> Result<(), StoreError> {
        let mut order = self.fetch_order(parent);
        let before = order.len();
        order.retain(|entry| *entry != id);
        if order.len() == before {
            return Ok(());
        }
        self.write_order(parent, &order)
    }

    /// Children of `parent` in display order.
    ///
    /// Alias placements appear as their alias id. Stale order entries are
    /// skipped; children missing from the order follow in id order. For an
    /// alias id, returns its placements mirroring the source's order.
    pub fn fetch_ordered_children(&self, parent: NodeId) -> Result<Vec<NodeId>, StoreError> {
        if self.aliases.contains(parent) {
            let src = self.resolve(parent);
            let placed = self.fetch_alias_children(parent);
            return Ok(self
                .fetch_ordered_children(src)?
                .into_iter()
                .map(|child| alias_id(self.resolve(child), parent))
                .filter(|alias| placed.contains(alias))
                .collect());
        }
        if !self.db.node_exists(parent) {
            return Err(StoreError::InvalidParent);
        }

        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        for entry in self.fetch_order(parent) {
            let shown = if self.db.child_exists(parent, entry) {
                entry
            } else if self.db.alias_exists(entry, parent) {
                alias_id(entry, parent)
            } else {
                warn!(parent = %parent, entry = %entry, "outline.order.stale");
                continue;
            };
            if seen.insert(shown) {
                ordered.push(shown);
            }
        }

        let unlisted = self
            .db
            .fetch_children(parent)
            .into_iter()
            .chain(self.db.fetch_alias_sources(parent).into_iter().map(|src| alias_id(src, parent)))
            .collect::<BTreeSet<_>>();
        for id in unlisted {
            if seen.insert(id) {
                ordered.push(id);
            }
        }
        Ok(ordered)
    }

    /// Replaces the display order of `parent`. `ids` must be a permutation
    /// of the current ordered children.
    pub fn reorder_children(&mut self, parent: NodeId, ids: &[NodeId]) -> Result<(), StoreError> {
        if self.aliases.contains(parent) {
            return Err(StoreError::InvalidParent);
        }
        let current = self.fetch_ordered_children(parent)?.into_iter().collect::<BTreeSet<_>>();
        let requested = ids.iter().copied().collect::<BTreeSet<_>>();
        if requested.len() != ids.len() || requested != current {
            return Err(StoreError::InvalidOrdering);
        }
        let resolved = ids.iter().map(|id| self.resolve(*id)).collect::<Vec<_>>();
        self.write_order(parent, &resolved)
    }
}
