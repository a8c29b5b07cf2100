use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// Map split into independently locked shards so that workers touching
/// different keys rarely contend.
pub(crate) struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Ord + Hash,
    V: Default,
{
    pub(crate) fn new(shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        Self { shards: (0..shard_count).map(|_| Mutex::new(BTreeMap::new())).collect() }
    }

    fn shard(&self, key: &K) -> &Mutex<BTreeMap<K, V>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() % self.shards.len() as u64) as usize]
    }

    /// Lock the shard owning `key` and return its value, inserting the
    /// default first if absent. The shard stays locked while the guard lives.
    pub(crate) fn access(&self, key: K) -> MappedMutexGuard<'_, V> {
        let guard = self.shard(&key).lock();
        MutexGuard::map(guard, |shard| shard.entry(key).or_default())
    }

    pub(crate) fn erase(&self, key: &K) {
        self.shard(key).lock().remove(key);
    }

    pub(crate) fn build_ordinary_map(self) -> BTreeMap<K, V> {
        let mut merged = BTreeMap::new();
        for shard in self.shards {
            merged.append(&mut shard.into_inner());
        }
        merged
    }
}
