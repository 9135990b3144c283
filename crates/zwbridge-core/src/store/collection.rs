// ── Generic ordered entity collection ──
//
// Insertion-ordered storage keyed by a small id, guarded by a short
// mutex, with a `watch` snapshot so observers on other threads see
// every committed change without taking the lock. Entities are held
// behind `Arc`, so a snapshot rebuild copies pointers and an update
// clones only the entity it touches.

use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tokio::sync::watch;

/// An ordered collection for a single entity type.
///
/// Every mutation rebuilds the snapshot that subscribers receive. The
/// lock is never held across a caller-supplied closure that could call
/// back out of the store.
pub(crate) struct Collection<K, T> {
    entries: Mutex<IndexMap<K, Arc<T>>>,
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<K, T> Collection<K, T>
where
    K: Copy + Eq + Hash,
    T: Clone,
{
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            entries: Mutex::new(IndexMap::new()),
            snapshot,
        }
    }

    /// Insert an entity unless the key is taken. Returns `true` if inserted.
    pub(crate) fn insert_new(&self, key: K, entity: T) -> bool {
        let mut entries = self.entries.lock();
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, Arc::new(entity));
        self.publish(&entries);
        true
    }

    /// Remove an entity, keeping the order of the rest.
    pub(crate) fn remove(&self, key: K) -> Option<Arc<T>> {
        let mut entries = self.entries.lock();
        let removed = entries.shift_remove(&key);
        if removed.is_some() {
            self.publish(&entries);
        }
        removed
    }

    pub(crate) fn get(&self, key: K) -> Option<Arc<T>> {
        self.entries.lock().get(&key).map(Arc::clone)
    }

    pub(crate) fn contains(&self, key: K) -> bool {
        self.entries.lock().contains_key(&key)
    }

    /// Mutate one entity in place. `None` if the key is absent.
    ///
    /// Copy-on-write: if a snapshot still shares the entity, only that
    /// entity is cloned.
    pub(crate) fn update<R>(&self, key: K, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut entries = self.entries.lock();
        let entity = entries.get_mut(&key)?;
        let result = f(Arc::make_mut(entity));
        self.publish(&entries);
        Some(result)
    }

    /// Replace the whole content, in iteration order.
    pub(crate) fn replace_all(&self, items: impl IntoIterator<Item = (K, T)>) {
        let mut entries = self.entries.lock();
        *entries = items
            .into_iter()
            .map(|(key, entity)| (key, Arc::new(entity)))
            .collect();
        self.publish(&entries);
    }

    pub(crate) fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.clear();
        self.publish(&entries);
    }

    /// Current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn publish(&self, entries: &IndexMap<K, Arc<T>>) {
        let values: Vec<Arc<T>> = entries.values().map(Arc::clone).collect();
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(Arc::new(values));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn plain<T: Copy>(items: &[Arc<T>]) -> Vec<T> {
        items.iter().map(|item| **item).collect()
    }

    #[test]
    fn insert_new_refuses_duplicates() {
        let col: Collection<u8, &str> = Collection::new();
        assert!(col.insert_new(1, "one"));
        assert!(!col.insert_new(1, "uno"));
        assert_eq!(col.get(1).as_deref(), Some(&"one"));
        assert_eq!(col.len(), 1);
    }

    #[test]
    fn remove_preserves_remaining_order() {
        let col: Collection<u8, u8> = Collection::new();
        for id in [3, 1, 2] {
            col.insert_new(id, id * 10);
        }
        assert_eq!(col.remove(1).as_deref(), Some(&10));
        assert_eq!(col.remove(1), None);
        assert_eq!(plain(&col.snapshot()), vec![30, 20]);
    }

    #[test]
    fn update_reports_missing_keys() {
        let col: Collection<u8, u8> = Collection::new();
        col.insert_new(1, 5);
        assert_eq!(
            col.update(1, |v| {
                *v += 1;
                *v
            }),
            Some(6)
        );
        assert_eq!(col.update(2, |v| *v), None);
    }

    #[test]
    fn update_leaves_earlier_snapshots_and_other_entries_alone() {
        let col: Collection<u8, u8> = Collection::new();
        col.insert_new(1, 10);
        col.insert_new(2, 20);
        let before = col.snapshot();

        col.update(1, |v| *v = 11);
        let after = col.snapshot();

        assert_eq!(plain(&before), vec![10, 20]);
        assert_eq!(plain(&after), vec![11, 20]);
        // The untouched entity is shared, not copied.
        assert!(Arc::ptr_eq(&before[1], &after[1]));
    }

    #[test]
    fn subscribers_see_committed_changes() {
        let col: Collection<u8, u8> = Collection::new();
        let mut rx = col.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        col.insert_new(7, 70);
        assert!(rx.has_changed().unwrap());
        assert_eq!(plain(&rx.borrow_and_update()), vec![70]);

        col.replace_all([(1, 10), (2, 20)]);
        assert_eq!(plain(&rx.borrow_and_update()), vec![10, 20]);

        col.clear();
        assert!(rx.borrow_and_update().is_empty());
    }
}
