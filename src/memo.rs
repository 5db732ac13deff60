use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use log::{debug, trace};

/// Storage policy for a [`Memoized`] function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Keep every computed value for the lifetime of the cache.
    #[default]
    Unbounded,
    /// Keep at most `capacity` values, evicting the least recently used one.
    Lru { capacity: NonZeroUsize },
}

impl CachePolicy {
    pub fn max_size(&self) -> Option<usize> {
        match self {
            CachePolicy::Unbounded => None,
            CachePolicy::Lru { capacity } => Some(capacity.get()),
        }
    }
}

/// Snapshot of cache statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CacheInfo {
    pub hits: u64,
    pub misses: u64,
    pub max_size: Option<usize>,
    pub current_size: usize,
}

impl fmt::Display for CacheInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheInfo(hits={}, misses={}, maxsize=", self.hits, self.misses)?;
        match self.max_size {
            Some(max) => write!(f, "{max}")?,
            None => write!(f, "None")?,
        }
        write!(f, ", currsize={})", self.current_size)
    }
}

/// Body of a memoized function. It receives the cache itself so that
/// recursive calls go back through [`Memoized::call`].
pub type MemoBody<K, V> = fn(&mut Memoized<K, V>, K) -> V;

/// Compute-or-fetch wrapper around a pure function.
///
/// Values are looked up by key; on a miss the body runs and its result is
/// stored according to the [`CachePolicy`].
///
/// # Example
/// ```
/// use fibonacci_pi::memo::Memoized;
///
/// fn factorial(cache: &mut Memoized<u64, u64>, n: u64) -> u64 {
///     if n < 2 { 1 } else { n * cache.call(n - 1) }
/// }
///
/// let mut cached = Memoized::unbounded(factorial);
/// assert_eq!(cached.call(10), 3_628_800);
/// assert_eq!(cached.cache_info().misses, 10);
/// ```
pub struct Memoized<K, V> {
    body: MemoBody<K, V>,
    policy: CachePolicy,
    entries: HashMap<K, Slot<V>>,
    // Stamp -> key, oldest first. Only maintained for the LRU policy.
    recency: BTreeMap<u64, K>,
    tick: u64,
    hits: u64,
    misses: u64,
}

struct Slot<V> {
    value: V,
    stamp: u64,
}

impl<K, V> Memoized<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(body: MemoBody<K, V>, policy: CachePolicy) -> Self {
        Memoized {
            body,
            policy,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    pub fn unbounded(body: MemoBody<K, V>) -> Self {
        Self::new(body, CachePolicy::Unbounded)
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Returns the cached value for `key`, computing and storing it first if
    /// it is absent.
    ///
    /// Under the LRU policy a hit refreshes the entry and a store may evict
    /// one, both in O(log capacity).
    pub fn call(&mut self, key: K) -> V {
        let lru = self.policy.max_size().is_some();
        if let Some(slot) = self.entries.get_mut(&key) {
            self.hits += 1;
            if lru {
                self.tick += 1;
                self.recency.remove(&slot.stamp);
                slot.stamp = self.tick;
                self.recency.insert(self.tick, key);
            }
            return slot.value.clone();
        }

        self.misses += 1;
        let body = self.body;
        let value = body(self, key.clone());
        self.store(key, value.clone());
        value
    }

    /// Looks up `key` without computing or updating statistics.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|slot| &slot.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cache_info(&self) -> CacheInfo {
        CacheInfo {
            hits: self.hits,
            misses: self.misses,
            max_size: self.policy.max_size(),
            current_size: self.entries.len(),
        }
    }

    /// Drops every stored value and resets the statistics.
    pub fn cache_clear(&mut self) {
        debug!("clearing memo cache with {} entries", self.entries.len());
        self.entries.clear();
        self.recency.clear();
        self.tick = 0;
        self.hits = 0;
        self.misses = 0;
    }

    fn store(&mut self, key: K, value: V) {
        let Some(capacity) = self.policy.max_size() else {
            self.entries.insert(key, Slot { value, stamp: 0 });
            return;
        };

        self.tick += 1;
        let stamp = self.tick;
        // The body may have re-entered with the same key.
        if let Some(old) = self.entries.insert(key.clone(), Slot { value, stamp }) {
            self.recency.remove(&old.stamp);
        } else {
            while self.entries.len() > capacity {
                match self.recency.pop_first() {
                    Some((_, evicted)) => {
                        trace!("evicting least recently used memo entry");
                        self.entries.remove(&evicted);
                    }
                    None => break,
                }
            }
        }
        self.recency.insert(stamp, key);
    }
}

impl<K, V> fmt::Debug for Memoized<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("policy", &self.policy)
            .field("len", &self.entries.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}
