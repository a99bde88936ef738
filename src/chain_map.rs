//! ChainMap: separately chained hash table with load-driven rehashing.

use crate::bucket::{Bucket, Node, NodeKey, Nodes};
use crate::cursor::{Cursor, CursorMut, Position};
use crate::entry::Entry;
use crate::error::AccessError;
use crate::iter::{IntoIter, Iter, IterMut};
use crate::policy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use core::ops::Index;
use slotmap::SlotMap;
use std::collections::hash_map::RandomState;

/// A hash map using separate chaining.
///
/// Each bucket is a chain of entries whose key hash, taken modulo the bucket
/// count, equals the bucket index. The bucket count follows
/// [`policy`](crate::policy): after every insert or removal the table is
/// rebuilt if it drifted more than a factor of two from `4 * len + 1`
/// buckets. Inserting an existing key keeps the first value.
///
/// Traversal (`iter`, [`begin`](Self::begin)) runs bucket by bucket; the
/// resulting order is unspecified.
///
/// ```
/// use chain_hashmap::{AccessError, ChainMap};
///
/// let mut m = ChainMap::new();
/// assert!(m.insert(1, "a"));
/// assert!(!m.insert(1, "b"));
/// assert_eq!(m.at(&1), Ok(&"a"));
/// assert_eq!(m.at(&2), Err(AccessError::KeyNotFound));
/// assert!(m.find(&2).is_end());
/// ```
#[derive(Clone)]
pub struct ChainMap<K, V, S = RandomState> {
    hasher: S,
    buckets: Vec<Bucket>,
    nodes: Nodes<K, V>, // entry storage; its length is the entry count
}

fn alloc_buckets(n: NonZeroUsize) -> Vec<Bucket> {
    vec![Bucket::default(); n.get()]
}

impl<K, V> ChainMap<K, V> {
    /// Empty map with one bucket and the default `RandomState` hasher.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Empty map with buckets pre-sized for `len` entries.
    pub fn with_expected_len(len: usize) -> Self {
        Self::with_expected_len_and_hasher(len, Default::default())
    }
}

impl<K, V, S> ChainMap<K, V, S> {
    /// Empty map using `hasher` to hash keys.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_expected_len_and_hasher(0, hasher)
    }

    pub fn with_expected_len_and_hasher(len: usize, hasher: S) -> Self {
        Self {
            hasher,
            buckets: alloc_buckets(policy::target_bucket_count(len)),
            nodes: SlotMap::with_capacity_and_key(len),
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current number of buckets; never zero.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// The hasher builder the map was configured with.
    #[inline]
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Drop every entry and shrink back to the minimum bucket array.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets = alloc_buckets(policy::target_bucket_count(0));
        #[cfg(feature = "logging")]
        log::trace!("chain map cleared");
        self.debug_check_invariants();
    }

    /// Cursor at the first entry in bucket order, or the end.
    pub fn begin(&self) -> Cursor<'_, K, V, S> {
        Cursor::new(self, self.first_from(0))
    }

    /// The end sentinel.
    pub fn end(&self) -> Cursor<'_, K, V, S> {
        Cursor::new(self, self.end_position())
    }

    /// Mutable cursor at the first entry in bucket order, or the end.
    pub fn begin_mut(&mut self) -> CursorMut<'_, K, V, S> {
        let pos = self.first_from(0);
        CursorMut::new(self, pos)
    }

    /// Iterate entries in bucket order.
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter::new(self.begin(), self.len())
    }

    /// Iterate entries with mutable values, in unspecified order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.nodes.iter_mut())
    }

    #[inline]
    fn bucket_count_nz(&self) -> NonZeroUsize {
        // Non-empty by construction; see `alloc_buckets` call sites.
        NonZeroUsize::new(self.buckets.len()).unwrap_or(policy::MIN_BUCKETS)
    }

    #[inline]
    fn bucket_index(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    #[inline]
    fn end_position(&self) -> Position {
        Position::end(self.buckets.len())
    }

    /// First live position at or after bucket `from`.
    fn first_from(&self, from: usize) -> Position {
        self.buckets
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(i, b)| b.head().map(|h| Position::at(i, h)))
            .unwrap_or_else(|| self.end_position())
    }

    pub(crate) fn successor(&self, pos: Position) -> Position {
        match pos.node() {
            None => pos,
            Some(k) => match self.nodes.get(k).and_then(|n| n.next) {
                Some(next) => Position::at(pos.bucket(), next),
                None => self.first_from(pos.bucket() + 1),
            },
        }
    }

    pub(crate) fn entry_at(&self, pos: Position) -> Option<&Entry<K, V>> {
        let k = pos.node()?;
        self.nodes.get(k).map(|n| &n.entry)
    }

    pub(crate) fn entry_at_mut(&mut self, pos: Position) -> Option<&mut Entry<K, V>> {
        let k = pos.node()?;
        self.nodes.get_mut(k).map(|n| &mut n.entry)
    }

    fn link_new(&mut self, bucket: usize, node: Node<K, V>) -> NodeKey {
        let k = self.nodes.insert(node);
        self.buckets[bucket].push_front(k, &mut self.nodes[k]);
        k
    }

    /// Rebuild the bucket array if the policy asks for it.
    fn rehash_if_due(&mut self) {
        if let Some(n) = policy::plan_rehash(self.len(), self.bucket_count_nz()) {
            self.rehash(n);
        }
    }

    /// Relink every node into a fresh array of `n` buckets. Uses the cached
    /// hashes, so no user code runs here.
    fn rehash(&mut self, n: NonZeroUsize) {
        let mut buckets = alloc_buckets(n);
        let count = n.get() as u64;
        for (k, node) in self.nodes.iter_mut() {
            let i = (node.hash % count) as usize;
            buckets[i].push_front(k, node);
        }
        #[cfg(feature = "logging")]
        log::debug!(
            "chain map rehash: {} -> {} buckets for {} entries",
            self.buckets.len(),
            n,
            self.nodes.len()
        );
        self.buckets = buckets;
        self.debug_check_invariants();
    }

    #[inline]
    fn debug_check_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            assert!(!self.buckets.is_empty(), "bucket array must never be empty");
            let chained: usize = self.buckets.iter().map(Bucket::len).sum();
            assert_eq!(chained, self.nodes.len(), "chain lengths disagree with entry count");
            for (i, b) in self.buckets.iter().enumerate() {
                for k in b.keys(&self.nodes) {
                    assert_eq!(self.bucket_index(self.nodes[k].hash), i, "entry in wrong bucket");
                }
            }
        }
    }
}

impl<K, V, S> ChainMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Build from `(key, value)` pairs, pre-sizing for the number of pairs.
    /// Later pairs with an already-seen key are ignored.
    pub fn from_iter_with_hasher<I>(iter: I, hasher: S) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs: Vec<(K, V)> = iter.into_iter().collect();
        let mut map = Self::with_expected_len_and_hasher(pairs.len(), hasher);
        for (k, v) in pairs {
            map.insert_unchecked(k, v);
        }
        // Duplicates leave fewer entries than were sized for.
        map.rehash_if_due();
        map
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn locate<Q>(&self, q: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let i = self.bucket_index(hash);
        self.buckets[i]
            .find(&self.nodes, |n| n.hash == hash && n.entry.key().borrow() == q)
            .map(|k| Position::at(i, k))
    }

    /// True if `q` has an entry.
    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate(q).is_some()
    }

    /// Shared reference to `q`'s value, if present.
    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate(q)
            .and_then(|pos| self.entry_at(pos))
            .map(Entry::value)
    }

    /// Mutable reference to `q`'s value, if present.
    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let pos = self.locate(q)?;
        self.entry_at_mut(pos).map(Entry::value_mut)
    }

    /// Value for `q`, or `AccessError::KeyNotFound`.
    pub fn at<Q>(&self, q: &Q) -> Result<&V, AccessError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(AccessError::KeyNotFound)
    }

    /// Cursor at `q`'s entry, or the end sentinel if absent.
    pub fn find<Q>(&self, q: &Q) -> Cursor<'_, K, V, S>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let pos = self.locate(q).unwrap_or_else(|| self.end_position());
        Cursor::new(self, pos)
    }

    /// Mutable cursor at `q`'s entry, or the end sentinel if absent.
    pub fn find_mut<Q>(&mut self, q: &Q) -> CursorMut<'_, K, V, S>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let pos = self.locate(q).unwrap_or_else(|| self.end_position());
        CursorMut::new(self, pos)
    }

    /// Insert `key` unless it is already present. Returns `true` if inserted;
    /// an existing value is never replaced.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let inserted = self.insert_unchecked(key, value);
        self.rehash_if_due();
        inserted
    }

    /// Insert without consulting the resize policy.
    fn insert_unchecked(&mut self, key: K, value: V) -> bool {
        let hash = self.make_hash(&key);
        let i = self.bucket_index(hash);
        let present = self.buckets[i]
            .find(&self.nodes, |n| n.hash == hash && *n.entry.key() == key)
            .is_some();
        if present {
            return false;
        }
        self.link_new(i, Node::new(key, value, hash));
        true
    }

    /// Remove `q`'s entry and return its value. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Remove `q`'s entry and return the owned key and value.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let i = self.bucket_index(hash);
        let removed = self.buckets[i]
            .unlink(&mut self.nodes, |n| {
                n.hash == hash && n.entry.key().borrow() == q
            })
            .and_then(|k| self.nodes.remove(k))
            .map(|n| n.entry.into_parts());
        self.rehash_if_due();
        removed
    }

    /// Value for `key`, inserting `default()` first if absent. `default`
    /// only runs on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        let i = self.bucket_index(hash);
        let found = self.buckets[i].find(&self.nodes, |n| n.hash == hash && *n.entry.key() == key);
        let k = match found {
            Some(k) => k,
            None => {
                let k = self.link_new(i, Node::new(key, default(), hash));
                // Node keys survive a rehash; only the bucket layout moves.
                self.rehash_if_due();
                k
            }
        };
        self.nodes[k].entry.value_mut()
    }

    /// Value for `key`, inserting `V::default()` first if absent.
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }
}

impl<K, V, S> Default for ChainMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> fmt::Debug for ChainMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for ChainMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| v == ov))
    }
}

impl<K, V, S> Eq for ChainMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, Q, V, S> Index<&Q> for ChainMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if the key is absent; use [`ChainMap::at`] to handle that case.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("{}", AccessError::KeyNotFound),
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_iter_with_hasher(iter, S::default())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ChainMap<K, V>
where
    K: Eq + Hash,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from_iter(pairs)
    }
}

/// Inserts each pair in turn; keys already present keep their value.
impl<K, V, S> Extend<(K, V)> for ChainMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for ChainMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.nodes.into_iter())
    }
}
