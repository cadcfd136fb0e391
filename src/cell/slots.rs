//! Slot table for listener lists.
//!
//! Entries are keyed by a monotonically increasing id, so keys are always
//! sorted and lookup is a binary search. Removal only blanks the slot; the
//! table is compacted once no notification pass is walking it. That gives:
//!
//! - O(1) logical removal that never shifts the keys other code holds
//! - a listener removed mid-pass does not fire later in that pass
//! - survivors keep their registration order

use std::cell::{Cell, RefCell};

pub(crate) type SlotKey = u64;

pub(crate) struct Slots<T: Clone> {
    entries: RefCell<Vec<(SlotKey, Option<T>)>>,
    next_key: Cell<SlotKey>,
    live: Cell<usize>,
    /// Number of passes currently walking this table.
    walking: Cell<u32>,
}

impl<T: Clone> Slots<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_key: Cell::new(0),
            live: Cell::new(0),
            walking: Cell::new(0),
        }
    }

    pub(crate) fn insert(&self, item: T) -> SlotKey {
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        self.entries.borrow_mut().push((key, Some(item)));
        self.live.set(self.live.get() + 1);
        key
    }

    /// Blank the slot for `key`. Returns the removed item, if it was live.
    pub(crate) fn remove(&self, key: SlotKey) -> Option<T> {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            match entries.binary_search_by_key(&key, |(k, _)| *k) {
                Ok(ix) => entries[ix].1.take(),
                Err(_) => None,
            }
        };
        if removed.is_some() {
            self.live.set(self.live.get() - 1);
            self.compact();
        }
        removed
    }

    /// Fetch a clone of the live item for `key`.
    pub(crate) fn get(&self, key: SlotKey) -> Option<T> {
        let entries = self.entries.borrow();
        match entries.binary_search_by_key(&key, |(k, _)| *k) {
            Ok(ix) => entries[ix].1.clone(),
            Err(_) => None,
        }
    }

    /// Number of live entries.
    pub(crate) fn len(&self) -> usize {
        self.live.get()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.live.get() == 0
    }

    /// Snapshot of the keys that are live right now, in registration order.
    pub(crate) fn live_keys(&self) -> Vec<SlotKey> {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, item)| item.is_some())
            .map(|(k, _)| *k)
            .collect()
    }

    /// Visit every item that is live at the start of the pass and still live
    /// when its turn comes. No borrow is held while `f` runs, so `f` may
    /// insert or remove freely.
    pub(crate) fn for_each_live(&self, mut f: impl FnMut(T)) {
        let keys = self.live_keys();
        self.walking.set(self.walking.get() + 1);
        let _guard = WalkGuard(self);
        for key in keys {
            if let Some(item) = self.get(key) {
                f(item);
            }
        }
    }

    fn compact(&self) {
        if self.walking.get() > 0 {
            return;
        }
        let mut entries = self.entries.borrow_mut();
        if entries.len() != self.live.get() {
            entries.retain(|(_, item)| item.is_some());
        }
    }
}

struct WalkGuard<'a, T: Clone>(&'a Slots<T>);

impl<T: Clone> Drop for WalkGuard<'_, T> {
    fn drop(&mut self) {
        let walking = self.0.walking.get() - 1;
        self.0.walking.set(walking);
        if walking == 0 {
            self.0.compact();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_insert_and_remove() {
        let slots: Slots<i32> = Slots::new();
        let a = slots.insert(1);
        let b = slots.insert(2);
        let c = slots.insert(3);
        assert_eq!(slots.len(), 3);

        assert_eq!(slots.remove(b), Some(2));
        assert_eq!(slots.remove(b), None);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.get(a), Some(1));
        assert_eq!(slots.get(c), Some(3));
    }

    #[test]
    fn test_order_preserved_after_compaction() {
        let slots: Slots<i32> = Slots::new();
        let keys: Vec<_> = (0..5).map(|i| slots.insert(i)).collect();
        slots.remove(keys[1]);
        slots.remove(keys[3]);

        let mut seen = Vec::new();
        slots.for_each_live(|v| seen.push(v));
        assert_eq!(seen, vec![0, 2, 4]);
    }

    #[test]
    fn test_removed_during_walk_does_not_fire() {
        let slots: Rc<Slots<i32>> = Rc::new(Slots::new());
        let _a = slots.insert(1);
        let b = slots.insert(2);
        let _c = slots.insert(3);

        let mut seen = Vec::new();
        slots.for_each_live(|v| {
            if v == 1 {
                slots.remove(b);
            }
            seen.push(v);
        });
        assert_eq!(seen, vec![1, 3]);
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn test_inserted_during_walk_waits_for_next_pass() {
        let slots: Slots<i32> = Slots::new();
        slots.insert(1);

        let mut seen = Vec::new();
        slots.for_each_live(|v| {
            if v == 1 {
                slots.insert(2);
            }
            seen.push(v);
        });
        assert_eq!(seen, vec![1]);
        assert_eq!(slots.len(), 2);
    }
}
