//! Sharded map for aggregating values from many workers at once.
//!
//! Keys are spread over a fixed number of shards by `key mod shard_count`, each
//! shard an ordered map behind its own mutex. Writers to keys in different shards
//! never contend, and a single key only ever has one writer at a time.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// Integer keys that can be assigned to a shard.
pub trait ShardKey: Ord + Copy {
    fn shard_index(self, shard_count: usize) -> usize;
}

macro_rules! impl_shard_key {
    ($($t:ty),*) => {
        $(
            impl ShardKey for $t {
                #[inline]
                fn shard_index(self, shard_count: usize) -> usize {
                    (self as i128).rem_euclid(shard_count as i128) as usize
                }
            }
        )*
    };
}

impl_shard_key!(i32, i64, u32, u64, usize);

pub struct ShardedAccumulator<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

/// Exclusive access to one value; the owning shard stays locked until this is dropped.
pub struct Access<'a, V> {
    guard: MappedMutexGuard<'a, V>,
}

impl<V> Deref for Access<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.guard
    }
}

impl<V> DerefMut for Access<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        &mut self.guard
    }
}

impl<K: ShardKey, V> ShardedAccumulator<K, V> {
    /// A shard count of zero is treated as one.
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        &self.shards[key.shard_index(self.shards.len())]
    }

    /// Lock the key's shard and hand out its value, inserting `V::default()` if absent.
    pub fn access(&self, key: K) -> Access<'_, V>
    where
        V: Default,
    {
        let guard = MutexGuard::map(self.shard(key).lock(), |data| data.entry(key).or_default());
        Access { guard }
    }

    pub fn erase(&self, key: K) -> Option<V> {
        self.shard(key).lock().remove(&key)
    }

    /// Empty every shard into one ordered map.
    ///
    /// Call only after all writers have finished; a concurrent writer may land its
    /// value in a shard that was already drained.
    pub fn drain(&self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for shard in &self.shards {
            result.append(&mut *shard.lock());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn keys_map_to_shards_by_remainder() {
        assert_eq!(7i32.shard_index(5), 2);
        assert_eq!((-1i32).shard_index(5), 4);
        assert_eq!(10u64.shard_index(5), 0);
    }

    #[test]
    fn accumulates_from_many_workers() {
        let acc: ShardedAccumulator<i32, f64> = ShardedAccumulator::new(7);
        (0..8).into_par_iter().for_each(|_| {
            for key in 0..500 {
                *acc.access(key) += 0.5;
            }
        });
        let map = acc.drain();
        assert_eq!(map.len(), 500);
        assert!(map.values().all(|&v| (v - 4.0).abs() < 1e-12));
        assert!(acc.drain().is_empty());
    }

    #[test]
    fn erase_and_ordered_drain() {
        let acc: ShardedAccumulator<i32, u32> = ShardedAccumulator::new(3);
        for key in [9, 1, 4, 12, 2] {
            *acc.access(key) += 1;
        }
        assert_eq!(acc.erase(4), Some(1));
        assert_eq!(acc.erase(100), None);
        let keys: Vec<i32> = acc.drain().into_keys().collect();
        assert_eq!(keys, vec![1, 2, 9, 12]);
    }

    #[test]
    fn zero_shards_clamped() {
        let acc: ShardedAccumulator<u32, f64> = ShardedAccumulator::new(0);
        assert_eq!(acc.shard_count(), 1);
        *acc.access(42) += 1.0;
        assert_eq!(acc.drain().get(&42), Some(&1.0));
    }
}
