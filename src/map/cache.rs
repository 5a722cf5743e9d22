//! Bounded memoization of lookup results.

use indexmap::{Equivalent, IndexMap};
use std::hash::Hash;

/// A bounded cache of lookup results.
///
/// Purely an optimization: entries are evicted oldest first once the
/// capacity is reached, and callers recompute on a miss. A capacity of zero
/// disables caching.
#[derive(Debug)]
pub(crate) struct LookupCache<K, V> {
    entries: IndexMap<K, Vec<V>>,
    capacity: usize,
}

impl<K: Hash + Eq, V: Clone> LookupCache<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            capacity,
        }
    }

    pub(crate) fn check<Q>(&self, key: &Q) -> Option<Vec<V>>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.get(key).cloned()
    }

    pub(crate) fn put(&mut self, key: K, value: Vec<V>) {
        if self.capacity == 0 {
            return;
        }
        self.entries.shift_remove(&key);
        while self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, value);
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q)
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.entries.shift_remove(key);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_check_remove() {
        let mut cache: LookupCache<String, u32> = LookupCache::new(4);
        assert_eq!(cache.check("a"), None);
        cache.put("a".into(), vec![1, 2]);
        assert_eq!(cache.check("a"), Some(vec![1, 2]));
        cache.remove("a");
        assert_eq!(cache.check("a"), None);
    }

    #[test]
    fn test_evicts_oldest() {
        let mut cache: LookupCache<u32, u32> = LookupCache::new(2);
        cache.put(1, vec![1]);
        cache.put(2, vec![2]);
        cache.put(1, vec![10]);
        cache.put(3, vec![3]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.check(&2u32), None);
        assert_eq!(cache.check(&1u32), Some(vec![10]));
        assert_eq!(cache.check(&3u32), Some(vec![3]));
    }

    #[test]
    fn test_zero_capacity_disables() {
        let mut cache: LookupCache<u32, u32> = LookupCache::new(0);
        cache.put(1, vec![1]);
        assert_eq!(cache.check(&1u32), None);
        assert_eq!(cache.len(), 0);
    }
}
