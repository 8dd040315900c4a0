#![forbid(unsafe_code)]

use super::IndexError;
use std::collections::HashMap;
use std::hash::Hash;

/// Set of ordered pairs with three lookup views: by full pair (unique),
/// by left element and by right element (both non-unique).
///
/// Pairs live in a slot arena; the three maps hold slot numbers and are only
/// touched by `insert`/`remove`, which keeps the views in lock-step.
#[derive(Clone, Debug)]
pub struct PairIndex<L, R> {
    slots: Vec<Option<(L, R)>>,
    free: Vec<usize>,
    by_pair: HashMap<(L, R), usize>,
    by_left: HashMap<L, Vec<usize>>,
    by_right: HashMap<R, Vec<usize>>,
}

impl<L, R> Default for PairIndex<L, R> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            by_pair: HashMap::new(),
            by_left: HashMap::new(),
            by_right: HashMap::new(),
        }
    }
}

impl<L, R> PairIndex<L, R>
where
    L: Copy + Eq + Hash,
    R: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }

    pub fn insert(&mut self, left: L, right: R) -> Result<(), IndexError> {
        if self.by_pair.contains_key(&(left, right)) {
            return Err(IndexError::Duplicate);
        }
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some((left, right));
                slot
            }
            None => {
                self.slots.push(Some((left, right)));
                self.slots.len() - 1
            }
        };
        self.by_pair.insert((left, right), slot);
        self.by_left.entry(left).or_default().push(slot);
        self.by_right.entry(right).or_default().push(slot);
        Ok(())
    }

    pub fn remove(&mut self, left: &L, right: &R) -> Result<(), IndexError> {
        let slot = self
            .by_pair
            .remove(&(*left, *right))
            .ok_or(IndexError::Missing)?;
        detach(&mut self.by_left, left, slot);
        detach(&mut self.by_right, right, slot);
        self.slots[slot] = None;
        self.free.push(slot);
        Ok(())
    }

    pub fn contains(&self, left: &L, right: &R) -> bool {
        self.by_pair.contains_key(&(*left, *right))
    }

    pub fn contains_left(&self, left: &L) -> bool {
        self.by_left.contains_key(left)
    }

    pub fn contains_right(&self, right: &R) -> bool {
        self.by_right.contains_key(right)
    }

    /// Right elements paired with `left`.
    pub fn rights_of<'a>(&'a self, left: &L) -> impl Iterator<Item = &'a R> + use<'a, L, R> {
        let slots = self.by_left.get(left).map(Vec::as_slice).unwrap_or(&[]);
        slots
            .iter()
            .filter_map(|slot| self.slots.get(*slot).and_then(Option::as_ref))
            .map(|(_, right)| right)
    }

    /// Left elements paired with `right`.
    pub fn lefts_of<'a>(&'a self, right: &R) -> impl Iterator<Item = &'a L> + use<'a, L, R> {
        let slots = self.by_right.get(right).map(Vec::as_slice).unwrap_or(&[]);
        slots
            .iter()
            .filter_map(|slot| self.slots.get(*slot).and_then(Option::as_ref))
            .map(|(left, _)| left)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&L, &R)> {
        self.slots
            .iter()
            .filter_map(Option::as_ref)
            .map(|(left, right)| (left, right))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Cross-checks the three views against the arena.
    pub fn is_consistent(&self) -> bool {
        let live = self.slots.iter().filter(|slot| slot.is_some()).count();
        if live != self.by_pair.len() {
            return false;
        }
        let left_total: usize = self.by_left.values().map(Vec::len).sum();
        let right_total: usize = self.by_right.values().map(Vec::len).sum();
        if left_total != live || right_total != live {
            return false;
        }
        self.by_pair.iter().all(|((left, right), slot)| {
            self.slots.get(*slot) == Some(&Some((*left, *right)))
                && self.by_left.get(left).is_some_and(|s| s.contains(slot))
                && self.by_right.get(right).is_some_and(|s| s.contains(slot))
        })
    }
}

fn detach<K: Eq + Hash>(view: &mut HashMap<K, Vec<usize>>, key: &K, slot: usize) {
    if let Some(slots) = view.get_mut(key) {
        slots.retain(|s| *s != slot);
        if slots.is_empty() {
            view.remove(key);
        }
    }
}
