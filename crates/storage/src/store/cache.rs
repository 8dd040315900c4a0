#![forbid(unsafe_code)]

use ol_core::NodeId;
use ol_core::delta::{Decision, Delta, DeltaTable, Rejection};
use ol_core::index::PairIndex;
use tracing::warn;

pub type KeyedTable<V> = DeltaTable<NodeId, V>;

/// Delta cache of a pair relation, plus a pair index over every key the
/// cache knows so lookups by either side stay cheap.
#[derive(Clone, Debug, Default)]
pub struct RelationTable {
    rows: DeltaTable<(NodeId, NodeId), ()>,
    index: PairIndex<NodeId, NodeId>,
}

impl RelationTable {
    pub fn push(&mut self, left: NodeId, right: NodeId) -> Result<Decision, Rejection> {
        let decision = self.rows.push((left, right), ())?;
        self.sync(left, right);
        Ok(decision)
    }

    pub fn erase(&mut self, left: NodeId, right: NodeId) -> Result<Decision, Rejection> {
        let decision = self.rows.erase(&(left, right))?;
        self.sync(left, right);
        Ok(decision)
    }

    pub(crate) fn load_cached(&mut self, left: NodeId, right: NodeId) {
        self.rows.load_cached((left, right), ());
        self.sync(left, right);
    }

    pub(crate) fn fold_all(&mut self) {
        for (left, right) in self.rows.fold_all() {
            self.sync(left, right);
        }
    }

    // index membership mirrors "the cache has an entry for this key"
    fn sync(&mut self, left: NodeId, right: NodeId) {
        let known = self.rows.entry(&(left, right)).is_some();
        let indexed = self.index.contains(&left, &right);
        let synced = if known && !indexed {
            self.index.insert(left, right)
        } else if !known && indexed {
            self.index.remove(&left, &right)
        } else {
            Ok(())
        };
        if let Err(err) = synced {
            warn!(left = %left, right = %right, error = %err, "store.relation_index_out_of_sync");
        }
    }

    pub fn contains(&self, left: NodeId, right: NodeId) -> bool {
        self.rows.contains(&(left, right))
    }

    pub fn is_erase_pending(&self, left: NodeId, right: NodeId) -> bool {
        self.rows.is_erase_pending(&(left, right))
    }

    pub fn deltas(&self, left: NodeId, right: NodeId) -> &[Delta<()>] {
        self.rows.deltas(&(left, right))
    }

    /// Live right elements paired with `left`, in id order.
    pub fn rights_of(&self, left: NodeId) -> Vec<NodeId> {
        let mut out = self
            .index
            .rights_of(&left)
            .copied()
            .filter(|right| self.contains(left, *right))
            .collect::<Vec<_>>();
        out.sort();
        out
    }

    /// Live left elements paired with `right`, in id order.
    pub fn lefts_of(&self, right: NodeId) -> Vec<NodeId> {
        let mut out = self
            .index
            .lefts_of(&right)
            .copied()
            .filter(|left| self.contains(*left, right))
            .collect::<Vec<_>>();
        out.sort();
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.rows.iter().map(|(key, _)| *key)
    }

    pub fn pending(&self) -> impl Iterator<Item = ((NodeId, NodeId), &Delta<()>)> + '_ {
        self.rows.pending().map(|(key, delta)| (*key, delta))
    }

    pub fn has_delta(&self) -> bool {
        self.rows.has_delta()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index_is_consistent(&self) -> bool {
        self.index.is_consistent()
            && self.index.len() == self.rows.keys().count()
            && self.rows.keys().all(|(left, right)| self.index.contains(left, right))
    }
}

/// In-memory state of every table: disk snapshot plus pending deltas.
#[derive(Clone, Debug, Default)]
pub struct Cache {
    pub(crate) nodes: KeyedTable<()>,
    pub(crate) headings: KeyedTable<String>,
    pub(crate) titles: KeyedTable<String>,
    pub(crate) bodies: KeyedTable<String>,
    pub(crate) resources: KeyedTable<Vec<u8>>,
    pub(crate) children: RelationTable,
    pub(crate) aliases: RelationTable,
    pub(crate) attributes: RelationTable,
}

impl Cache {
    pub fn nodes(&self) -> &KeyedTable<()> {
        &self.nodes
    }

    pub fn headings(&self) -> &KeyedTable<String> {
        &self.headings
    }

    pub fn titles(&self) -> &KeyedTable<String> {
        &self.titles
    }

    pub fn bodies(&self) -> &KeyedTable<String> {
        &self.bodies
    }

    pub fn resources(&self) -> &KeyedTable<Vec<u8>> {
        &self.resources
    }

    pub fn children(&self) -> &RelationTable {
        &self.children
    }

    pub fn aliases(&self) -> &RelationTable {
        &self.aliases
    }

    pub fn attributes(&self) -> &RelationTable {
        &self.attributes
    }

    pub fn has_delta(&self) -> bool {
        self.nodes.has_delta()
            || self.headings.has_delta()
            || self.titles.has_delta()
            || self.bodies.has_delta()
            || self.resources.has_delta()
            || self.children.has_delta()
            || self.aliases.has_delta()
            || self.attributes.has_delta()
    }

    pub(crate) fn fold_all(&mut self) {
        self.nodes.fold_all();
        self.headings.fold_all();
        self.titles.fold_all();
        self.bodies.fold_all();
        self.resources.fold_all();
        self.children.fold_all();
        self.aliases.fold_all();
        self.attributes.fold_all();
    }
}
