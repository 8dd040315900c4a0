#![forbid(unsafe_code)]

use super::cache::{KeyedTable, RelationTable};
use super::{Database, StoreError, Table};
use ol_core::NodeId;
use ol_core::delta::Decision;
use std::collections::{BTreeSet, HashSet};
use tracing::{trace, warn};

pub const ATTR_HEADING: &str = "$";

fn push_keyed<V: Clone + PartialEq>(
    table: Table,
    rows: &mut KeyedTable<V>,
    id: NodeId,
    value: V,
) -> Result<Decision, StoreError> {
    let decision = rows
        .push(id, value)
        .map_err(|reason| StoreError::Rejected { table, reason })?;
    trace!(table = %table, key = %id, %decision, "store.push");
    Ok(decision)
}

fn erase_keyed<V: Clone + PartialEq>(
    table: Table,
    rows: &mut KeyedTable<V>,
    id: NodeId,
) -> Result<Decision, StoreError> {
    let decision = rows
        .erase(&id)
        .map_err(|reason| StoreError::Rejected { table, reason })?;
    trace!(table = %table, key = %id, %decision, "store.erase");
    Ok(decision)
}

fn push_pair(
    table: Table,
    rows: &mut RelationTable,
    left: NodeId,
    right: NodeId,
) -> Result<Decision, StoreError> {
    let decision = rows
        .push(left, right)
        .map_err(|reason| StoreError::Rejected { table, reason })?;
    trace!(table = %table, left = %left, right = %right, %decision, "store.push");
    Ok(decision)
}

fn erase_pair(
    table: Table,
    rows: &mut RelationTable,
    left: NodeId,
    right: NodeId,
) -> Result<Decision, StoreError> {
    let decision = rows
        .erase(left, right)
        .map_err(|reason| StoreError::Rejected { table, reason })?;
    trace!(table = %table, left = %left, right = %right, %decision, "store.erase");
    Ok(decision)
}

impl Database {
    pub fn push_node(&mut self, id: NodeId) -> Result<Decision, StoreError> {
        push_keyed(Table::Nodes, &mut self.cache.nodes, id, ())
    }

    pub fn push_heading(&mut self, id: NodeId, heading: impl Into<String>) -> Result<Decision, StoreError> {
        push_keyed(Table::Headings, &mut self.cache.headings, id, heading.into())
    }

    pub fn push_title(&mut self, id: NodeId, title: impl Into<String>) -> Result<Decision, StoreError> {
        push_keyed(Table::Titles, &mut self.cache.titles, id, title.into())
    }

    pub fn push_body(&mut self, id: NodeId, body: impl Into<String>) -> Result<Decision, StoreError> {
        push_keyed(Table::Bodies, &mut self.cache.bodies, id, body.into())
    }

    pub fn push_resource(&mut self, id: NodeId, resource: Vec<u8>) -> Result<Decision, StoreError> {
        push_keyed(Table::Resources, &mut self.cache.resources, id, resource)
    }

    pub fn push_child(&mut self, parent: NodeId, child: NodeId) -> Result<Decision, StoreError> {
        push_pair(Table::Children, &mut self.cache.children, parent, child)
    }

    pub fn push_alias(&mut self, src: NodeId, dst: NodeId) -> Result<Decision, StoreError> {
        push_pair(Table::Aliases, &mut self.cache.aliases, src, dst)
    }

    pub fn push_attr(&mut self, owner: NodeId, attr: NodeId) -> Result<Decision, StoreError> {
        push_pair(Table::Attributes, &mut self.cache.attributes, owner, attr)
    }

    pub fn erase_node(&mut self, id: NodeId) -> Result<Decision, StoreError> {
        erase_keyed(Table::Nodes, &mut self.cache.nodes, id)
    }

    pub fn erase_heading(&mut self, id: NodeId) -> Result<Decision, StoreError> {
        erase_keyed(Table::Headings, &mut self.cache.headings, id)
    }

    pub fn erase_title(&mut self, id: NodeId) -> Result<Decision, StoreError> {
        erase_keyed(Table::Titles, &mut self.cache.titles, id)
    }

    pub fn erase_body(&mut self, id: NodeId) -> Result<Decision, StoreError> {
        erase_keyed(Table::Bodies, &mut self.cache.bodies, id)
    }

    pub fn erase_resource(&mut self, id: NodeId) -> Result<Decision, StoreError> {
        erase_keyed(Table::Resources, &mut self.cache.resources, id)
    }

    pub fn erase_child(&mut self, parent: NodeId, child: NodeId) -> Result<Decision, StoreError> {
        erase_pair(Table::Children, &mut self.cache.children, parent, child)
    }

    pub fn erase_alias(&mut self, src: NodeId, dst: NodeId) -> Result<Decision, StoreError> {
        erase_pair(Table::Aliases, &mut self.cache.aliases, src, dst)
    }

    pub fn erase_attr(&mut self, owner: NodeId, attr: NodeId) -> Result<Decision, StoreError> {
        erase_pair(Table::Attributes, &mut self.cache.attributes, owner, attr)
    }

    pub fn node_exists(&self, id: NodeId) -> bool {
        self.cache.nodes.contains(&id)
    }

    pub fn fetch_heading(&self, id: NodeId) -> Option<&str> {
        self.cache.headings.effective(&id).map(String::as_str)
    }

    pub fn fetch_title(&self, id: NodeId) -> Option<&str> {
        self.cache.titles.effective(&id).map(String::as_str)
    }

    pub fn fetch_body(&self, id: NodeId) -> Option<&str> {
        self.cache.bodies.effective(&id).map(String::as_str)
    }

    pub fn fetch_resource(&self, id: NodeId) -> Option<&[u8]> {
        self.cache.resources.effective(&id).map(Vec::as_slice)
    }

    pub fn child_exists(&self, parent: NodeId, child: NodeId) -> bool {
        self.cache.children.contains(parent, child)
    }

    pub fn fetch_parent(&self, child: NodeId) -> Option<NodeId> {
        self.cache.children.lefts_of(child).first().copied()
    }

    pub fn fetch_children(&self, parent: NodeId) -> BTreeSet<NodeId> {
        self.cache.children.rights_of(parent).into_iter().collect()
    }

    /// Child of `parent` with the given heading. Sibling headings are only
    /// unique by convention; on a collision the lowest id wins.
    pub fn fetch_child(&self, parent: NodeId, heading: &str) -> Option<NodeId> {
        let matches = self
            .cache
            .children
            .rights_of(parent)
            .into_iter()
            .filter(|child| self.fetch_heading(*child) == Some(heading))
            .collect::<Vec<_>>();
        if matches.len() > 1 {
            warn!(parent = %parent, heading, count = matches.len(), "store.duplicate_child_heading");
        }
        matches.first().copied()
    }

    pub fn fetch_nodes(&self, heading: &str) -> BTreeSet<NodeId> {
        self.cache
            .headings
            .iter()
            .filter(|(_, value)| value.as_str() == heading)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn attr_exists(&self, attr: NodeId) -> bool {
        self.fetch_attr_owner(attr).is_some()
    }

    pub fn fetch_attr_owner(&self, attr: NodeId) -> Option<NodeId> {
        self.cache.attributes.lefts_of(attr).first().copied()
    }

    pub fn fetch_attr_node(&self, owner: NodeId) -> Option<NodeId> {
        self.cache.attributes.rights_of(owner).first().copied()
    }

    /// Parent chain of `node` up to the topmost reachable ancestor, returned
    /// top first and ending with `node`. Stops on a revisited id.
    pub fn fetch_lineage(&self, node: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::from([node]);
        let mut lineage = vec![node];
        let mut current = node;
        while let Some(parent) = self.fetch_parent(current) {
            if !seen.insert(parent) {
                warn!(node = %node, at = %parent, "store.parent_cycle");
                break;
            }
            lineage.push(parent);
            current = parent;
        }
        lineage.reverse();
        lineage
    }

    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor != node && self.fetch_lineage(node).contains(&ancestor)
    }

    /// True when `node` is an attribute node or sits below one.
    pub fn is_in_attr_tree(&self, node: NodeId) -> bool {
        self.fetch_lineage(node).into_iter().any(|id| self.attr_exists(id))
    }

    pub fn alias_exists(&self, src: NodeId, dst: NodeId) -> bool {
        self.cache.aliases.contains(src, dst)
    }

    pub fn fetch_alias_destinations(&self, src: NodeId) -> Vec<NodeId> {
        self.cache.aliases.rights_of(src)
    }

    pub fn fetch_alias_sources(&self, dst: NodeId) -> Vec<NodeId> {
        self.cache.aliases.lefts_of(dst)
    }

    /// Hidden metadata node owned by `owner`, headed and titled `$` with an
    /// empty body.
    pub fn create_attr_node(&mut self, owner: NodeId) -> Result<NodeId, StoreError> {
        if !self.node_exists(owner) {
            return Err(StoreError::InvalidNode);
        }
        if self.fetch_attr_node(owner).is_some() {
            return Err(StoreError::NodeAlreadyExists);
        }
        let attr = NodeId::new();
        self.push_node(attr)?;
        self.push_heading(attr, ATTR_HEADING)?;
        self.push_title(attr, ATTR_HEADING)?;
        self.push_body(attr, "")?;
        self.push_attr(owner, attr)?;
        Ok(attr)
    }
}
