//! Bucket-order cursors over a `ChainMap`.
//!
//! A cursor is a position in the table (bucket index plus a node in that
//! bucket's chain) together with a borrow of the map. Cursors are always
//! normalized: they either point at a live entry or are the end sentinel,
//! which is the bucket index one past the last bucket with no node. Every end
//! position compares equal to every other end position of a table with the
//! same bucket count.
//!
//! The borrow ties a cursor to its map, so a rehash (which needs `&mut`)
//! cannot happen while a cursor is alive.

use crate::bucket::NodeKey;
use crate::chain_map::ChainMap;
use crate::entry::Entry;
use core::fmt;
use std::collections::hash_map::RandomState;

/// A normalized position: `(bucket index, chain node)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    bucket: usize,
    node: Option<NodeKey>,
}

impl Position {
    pub(crate) fn at(bucket: usize, node: NodeKey) -> Self {
        Self {
            bucket,
            node: Some(node),
        }
    }

    pub(crate) fn end(bucket_count: usize) -> Self {
        Self {
            bucket: bucket_count,
            node: None,
        }
    }

    /// Bucket index; equal to the bucket count for the end sentinel.
    #[inline]
    pub fn bucket(&self) -> usize {
        self.bucket
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    #[inline]
    pub(crate) fn node(&self) -> Option<NodeKey> {
        self.node
    }
}

/// Read-only cursor. Also an `Iterator` over the entries from its current
/// position to the end.
pub struct Cursor<'a, K, V, S = RandomState> {
    map: &'a ChainMap<K, V, S>,
    pos: Position,
}

impl<'a, K, V, S> Cursor<'a, K, V, S> {
    pub(crate) fn new(map: &'a ChainMap<K, V, S>, pos: Position) -> Self {
        Self { map, pos }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos.is_end()
    }

    /// The entry under the cursor, `None` at the end.
    #[inline]
    pub fn entry(&self) -> Option<&'a Entry<K, V>> {
        self.map.entry_at(self.pos)
    }

    #[inline]
    pub fn key(&self) -> Option<&'a K> {
        self.entry().map(Entry::key)
    }

    #[inline]
    pub fn value(&self) -> Option<&'a V> {
        self.entry().map(Entry::value)
    }

    /// Step to the next entry in bucket order. No-op at the end.
    pub fn move_next(&mut self) {
        self.pos = self.map.successor(self.pos);
    }
}

impl<'a, K, V, S> Iterator for Cursor<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.entry()?;
        self.move_next();
        Some((e.key(), e.value()))
    }
}

// Manual impls: a derive would require `K`, `V` and `S` to be `Copy`.
impl<'a, K, V, S> Clone for Cursor<'a, K, V, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V, S> Copy for Cursor<'a, K, V, S> {}

impl<'a, K, V, S> PartialEq for Cursor<'a, K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl<'a, K, V, S> Eq for Cursor<'a, K, V, S> {}

impl<'a, K, V, S> fmt::Debug for Cursor<'a, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("position", &self.pos).finish()
    }
}

/// Mutable cursor: same traversal as [`Cursor`], with in-place access to
/// values. Keys stay read-only.
pub struct CursorMut<'a, K, V, S = RandomState> {
    map: &'a mut ChainMap<K, V, S>,
    pos: Position,
}

impl<'a, K, V, S> CursorMut<'a, K, V, S> {
    pub(crate) fn new(map: &'a mut ChainMap<K, V, S>, pos: Position) -> Self {
        Self { map, pos }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos.is_end()
    }

    #[inline]
    pub fn key(&self) -> Option<&K> {
        self.map.entry_at(self.pos).map(Entry::key)
    }

    #[inline]
    pub fn value(&self) -> Option<&V> {
        self.map.entry_at(self.pos).map(Entry::value)
    }

    #[inline]
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.map.entry_at_mut(self.pos).map(Entry::value_mut)
    }

    #[inline]
    pub fn entry_mut(&mut self) -> Option<&mut Entry<K, V>> {
        self.map.entry_at_mut(self.pos)
    }

    pub fn move_next(&mut self) {
        self.pos = self.map.successor(self.pos);
    }

    /// Read-only view at the same position, borrowing this cursor.
    pub fn as_cursor(&self) -> Cursor<'_, K, V, S> {
        Cursor::new(self.map, self.pos)
    }

    pub fn into_cursor(self) -> Cursor<'a, K, V, S> {
        Cursor::new(self.map, self.pos)
    }

    /// Consume the cursor, keeping the value borrow for the map's lifetime.
    pub fn into_value_mut(self) -> Option<&'a mut V> {
        let CursorMut { map, pos } = self;
        map.entry_at_mut(pos).map(Entry::value_mut)
    }
}

impl<'a, K, V, S> fmt::Debug for CursorMut<'a, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut").field("position", &self.pos).finish()
    }
}
