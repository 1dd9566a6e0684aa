//! Insertion-ordered handle registry.
//!
//! Handles come from a monotonically increasing counter and are never
//! reused, so a handle can double as the slot index (offset by the first
//! live handle). Push, delete and lookup are O(1); iteration walks slots in
//! insertion order and skips deleted ones.

use std::collections::VecDeque;

/// Opaque identifier for an entry in one [`IdList`].
pub type Handle = u64;

#[derive(Debug, Clone)]
pub struct IdList<T> {
    /// Slot `i` holds the entry with handle `base + i`.
    slots: VecDeque<Option<T>>,
    base: Handle,
    last_id: Handle,
    len: usize,
}

impl<T> IdList<T> {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// An empty list whose first handle will be `first`.
    pub fn starting_at(first: Handle) -> Self {
        Self {
            slots: VecDeque::new(),
            base: first,
            last_id: first,
            len: 0,
        }
    }

    /// Insert a value at the end of the order and return its handle.
    pub fn push(&mut self, value: T) -> Handle {
        let id = self.last_id;
        self.slots.push_back(Some(value));
        self.last_id += 1;
        self.len += 1;
        id
    }

    /// Remove an entry. Deleting an absent handle is a no-op.
    pub fn delete(&mut self, id: Handle) -> Option<T> {
        let idx = self.index_of(id)?;
        let removed = self.slots[idx].take();
        if removed.is_some() {
            self.len -= 1;
        }
        while matches!(self.slots.front(), Some(None)) {
            self.slots.pop_front();
            self.base += 1;
        }
        removed
    }

    pub fn get(&self, id: Handle) -> Option<&T> {
        let idx = self.index_of(id)?;
        self.slots[idx].as_ref()
    }

    pub fn get_mut(&mut self, id: Handle) -> Option<&mut T> {
        let idx = self.index_of(id)?;
        self.slots[idx].as_mut()
    }

    pub fn contains(&self, id: Handle) -> bool {
        self.get(id).is_some()
    }

    /// The handle the next `push` will return.
    pub fn last_id(&self) -> Handle {
        self.last_id
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry. Handles keep counting from where they were.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.base = self.last_id;
        self.len = 0;
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Handle, &T)> + '_ {
        let base = self.base;
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| slot.as_ref().map(|v| (base + i as Handle, v)))
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = (Handle, &mut T)> + '_ {
        let base = self.base;
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(move |(i, slot)| slot.as_mut().map(|v| (base + i as Handle, v)))
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Snapshot of the live handles, in order.
    pub fn handles(&self) -> Vec<Handle> {
        self.iter().map(|(id, _)| id).collect()
    }

    fn index_of(&self, id: Handle) -> Option<usize> {
        if id < self.base || id >= self.last_id {
            return None;
        }
        Some((id - self.base) as usize)
    }
}

impl<T: Clone> IdList<T> {
    /// Cloned snapshot of the values, in order. Dispatch iterates this so
    /// callbacks may freely mutate the list they came from.
    pub fn snapshot(&self) -> Vec<T> {
        self.values().cloned().collect()
    }
}

impl<T> Default for IdList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_increasing_handles() {
        let mut list = IdList::new();
        assert_eq!(list.push("a"), 0);
        assert_eq!(list.push("b"), 1);
        assert_eq!(list.last_id(), 2);
        assert_eq!(list.get(1), Some(&"b"));
    }

    #[test]
    fn delete_keeps_order_and_never_reuses() {
        let mut list = IdList::new();
        let a = list.push('a');
        let b = list.push('b');
        let c = list.push('c');
        assert_eq!(list.delete(b), Some('b'));
        let d = list.push('d');
        assert!(d > c);
        let order: Vec<char> = list.values().copied().collect();
        assert_eq!(order, vec!['a', 'c', 'd']);
        assert_eq!(list.handles(), vec![a, c, d]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn delete_absent_is_noop() {
        let mut list = IdList::new();
        let a = list.push(1);
        assert_eq!(list.delete(a), Some(1));
        assert_eq!(list.delete(a), None);
        assert_eq!(list.delete(99), None);
        assert!(list.is_empty());
    }

    #[test]
    fn front_deletions_compact() {
        let mut list = IdList::new();
        let ids: Vec<_> = (0..5).map(|i| list.push(i)).collect();
        list.delete(ids[0]);
        list.delete(ids[1]);
        assert_eq!(list.get(ids[2]), Some(&2));
        assert_eq!(list.get(ids[0]), None);
        assert_eq!(list.handles(), vec![2, 3, 4]);
    }

    #[test]
    fn interleaved_push_delete_matches_model() {
        let mut list = IdList::new();
        let mut model: Vec<(Handle, u32)> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for step in 0u32..200 {
            if step % 3 == 2 && !model.is_empty() {
                let victim = model.remove((step as usize * 7) % model.len());
                assert_eq!(list.delete(victim.0), Some(victim.1));
            } else {
                let h = list.push(step);
                assert!(seen.insert(h), "handle {} reused", h);
                model.push((h, step));
            }
            let got: Vec<(Handle, u32)> = list.iter().map(|(h, v)| (h, *v)).collect();
            assert_eq!(got, model);
        }
    }

    #[test]
    fn clear_continues_numbering() {
        let mut list = IdList::starting_at(10);
        list.push(());
        list.clear();
        assert_eq!(list.push(()), 11);
    }
}
