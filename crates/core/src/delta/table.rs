#![forbid(unsafe_code)]

use super::{Classification, Decision, Delta, Rejection, decide_erase, decide_push};
use std::collections::HashMap;
use std::hash::Hash;

/// Cached snapshot value plus the pending delta log of one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeltaEntry<V> {
    cached: Option<V>,
    deltas: Vec<Delta<V>>,
}

impl<V> DeltaEntry<V> {
    pub fn cached(&self) -> Option<&V> {
        self.cached.as_ref()
    }

    pub fn deltas(&self) -> &[Delta<V>] {
        &self.deltas
    }

    /// Last delta value if a delta exists, else the cached value.
    pub fn effective(&self) -> Option<&V> {
        match self.deltas.last() {
            Some(last) => last.value(),
            None => self.cached.as_ref(),
        }
    }

    fn classify(&self) -> Classification<'_, V> {
        if !self.deltas.is_empty() {
            Classification::DeltaExists(&self.deltas)
        } else if let Some(cached) = self.cached.as_ref() {
            Classification::CachedOnly(cached)
        } else {
            Classification::NoRecord
        }
    }

    fn is_vacant(&self) -> bool {
        self.cached.is_none() && self.deltas.is_empty()
    }
}

/// What happened to a key when the delta log was folded into the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Folded {
    Kept,
    Removed,
}

/// Delta cache of one table: per key, the disk-confirmed value and the
/// pending delta log. Every mutation goes through the decision procedure.
#[derive(Clone, Debug)]
pub struct DeltaTable<K, V> {
    entries: HashMap<K, DeltaEntry<V>>,
}

impl<K, V> Default for DeltaTable<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, V> DeltaTable<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + PartialEq,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&self, key: &K) -> Classification<'_, V> {
        self.entries
            .get(key)
            .map_or(Classification::NoRecord, DeltaEntry::classify)
    }

    pub fn push(&mut self, key: K, value: V) -> Result<Decision, Rejection> {
        let decision = decide_push(&self.classify(&key), &value)?;
        match decision {
            Decision::AppendCreated => self.log(key, Delta::Created(value)),
            Decision::AppendUpdated => self.log(key, Delta::Updated(value)),
            _ => {}
        }
        Ok(decision)
    }

    pub fn erase(&mut self, key: &K) -> Result<Decision, Rejection> {
        let decision = decide_erase(&self.classify(key))?;
        match decision {
            Decision::AppendErased => self.log(key.clone(), Delta::Erased),
            Decision::Retract => {
                if let Some(entry) = self.entries.get_mut(key) {
                    entry.deltas.clear();
                    if entry.is_vacant() {
                        self.entries.remove(key);
                    }
                }
            }
            _ => {}
        }
        Ok(decision)
    }

    fn log(&mut self, key: K, delta: Delta<V>) {
        self.entries
            .entry(key)
            .or_insert_with(|| DeltaEntry {
                cached: None,
                deltas: Vec::new(),
            })
            .deltas
            .push(delta);
    }

    pub fn entry(&self, key: &K) -> Option<&DeltaEntry<V>> {
        self.entries.get(key)
    }

    pub fn deltas(&self, key: &K) -> &[Delta<V>] {
        self.entries.get(key).map(DeltaEntry::deltas).unwrap_or(&[])
    }

    pub fn effective(&self, key: &K) -> Option<&V> {
        self.entries.get(key).and_then(DeltaEntry::effective)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.effective(key).is_some()
    }

    /// True when the last pending action for `key` is an erase.
    pub fn is_erase_pending(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .and_then(|entry| entry.deltas.last())
            .is_some_and(Delta::is_erased)
    }

    pub fn has_delta(&self) -> bool {
        self.entries.values().any(|entry| !entry.deltas.is_empty())
    }

    /// Keys with a non-empty delta log, paired with their last action.
    pub fn pending(&self) -> impl Iterator<Item = (&K, &Delta<V>)> {
        self.entries
            .iter()
            .filter_map(|(key, entry)| entry.deltas.last().map(|last| (key, last)))
    }

    /// Keys whose effective value is present, with that value.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries
            .iter()
            .filter_map(|(key, entry)| entry.effective().map(|value| (key, value)))
    }

    /// Every key the table knows about, including ones pending erase.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records a value confirmed on disk. Pending deltas are left alone.
    pub fn load_cached(&mut self, key: K, value: V) {
        self.entries
            .entry(key)
            .or_insert_with(|| DeltaEntry {
                cached: None,
                deltas: Vec::new(),
            })
            .cached = Some(value);
    }

    /// Makes the last delta of `key` the cached value and clears the log;
    /// an erased key leaves the table.
    pub fn fold(&mut self, key: &K) -> Folded {
        let Some(entry) = self.entries.get_mut(key) else {
            return Folded::Removed;
        };
        if let Some(last) = entry.deltas.pop() {
            entry.cached = match last {
                Delta::Created(value) | Delta::Updated(value) => Some(value),
                Delta::Erased => None,
            };
            entry.deltas.clear();
        }
        if entry.is_vacant() {
            self.entries.remove(key);
            Folded::Removed
        } else {
            Folded::Kept
        }
    }

    /// Folds every pending key; returns the keys that left the table.
    pub fn fold_all(&mut self) -> Vec<K> {
        let keys = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.deltas.is_empty())
            .map(|(key, _)| key.clone())
            .collect::<Vec<_>>();
        keys.into_iter()
            .filter(|key| self.fold(key) == Folded::Removed)
            .collect()
    }
}
