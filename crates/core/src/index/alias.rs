#![forbid(unsafe_code)]

use super::{IndexError, PairIndex};
use crate::ids::{NodeId, alias_id};
use std::collections::HashMap;

/// One alias placement: `src` also appears beneath `dst`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AliasEntry {
    pub src: NodeId,
    pub dst: NodeId,
}

impl AliasEntry {
    pub fn alias(&self) -> NodeId {
        alias_id(self.src, self.dst)
    }
}

/// Alias placements indexed uniquely by alias id and non-uniquely by
/// source and by destination.
///
/// Because alias ids are symmetric, `(a, b)` and `(b, a)` claim the same
/// alias id; the second one is refused as a duplicate.
#[derive(Clone, Debug, Default)]
pub struct AliasIndex {
    pairs: PairIndex<NodeId, NodeId>,
    by_alias: HashMap<NodeId, AliasEntry>,
}

impl AliasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }

    pub fn insert(&mut self, src: NodeId, dst: NodeId) -> Result<NodeId, IndexError> {
        let entry = AliasEntry { src, dst };
        let alias = entry.alias();
        if self.by_alias.contains_key(&alias) {
            return Err(IndexError::Duplicate);
        }
        self.pairs.insert(src, dst)?;
        self.by_alias.insert(alias, entry);
        Ok(alias)
    }

    pub fn remove(&mut self, alias: &NodeId) -> Result<AliasEntry, IndexError> {
        let entry = self.by_alias.remove(alias).ok_or(IndexError::Missing)?;
        self.pairs.remove(&entry.src, &entry.dst)?;
        Ok(entry)
    }

    pub fn get(&self, alias: &NodeId) -> Option<&AliasEntry> {
        self.by_alias.get(alias)
    }

    pub fn contains(&self, alias: &NodeId) -> bool {
        self.by_alias.contains_key(alias)
    }

    /// Direction-aware lookup: only matches when `src` really is the source.
    pub fn find(&self, src: NodeId, dst: NodeId) -> Option<NodeId> {
        self.pairs.contains(&src, &dst).then(|| alias_id(src, dst))
    }

    pub fn has_source(&self, src: &NodeId) -> bool {
        self.pairs.contains_left(src)
    }

    pub fn has_destination(&self, dst: &NodeId) -> bool {
        self.pairs.contains_right(dst)
    }

    pub fn from_source(&self, src: &NodeId) -> Vec<AliasEntry> {
        let mut out = self
            .pairs
            .rights_of(src)
            .map(|dst| AliasEntry { src: *src, dst: *dst })
            .collect::<Vec<_>>();
        out.sort_by_key(AliasEntry::alias);
        out
    }

    pub fn to_destination(&self, dst: &NodeId) -> Vec<AliasEntry> {
        let mut out = self
            .pairs
            .lefts_of(dst)
            .map(|src| AliasEntry { src: *src, dst: *dst })
            .collect::<Vec<_>>();
        out.sort_by_key(AliasEntry::alias);
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &AliasEntry)> {
        self.by_alias.iter()
    }

    pub fn is_consistent(&self) -> bool {
        self.pairs.is_consistent()
            && self.pairs.len() == self.by_alias.len()
            && self
                .by_alias
                .iter()
                .all(|(alias, entry)| entry.alias() == *alias && self.pairs.contains(&entry.src, &entry.dst))
    }
}
