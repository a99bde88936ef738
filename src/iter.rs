//! Standard iterators over a `ChainMap`.
//!
//! `Iter` walks the buckets through a [`Cursor`]. `IterMut` and `IntoIter`
//! walk the node arena directly; their order is unspecified, like every
//! other traversal order of the map.

use crate::bucket::{Node, NodeKey};
use crate::cursor::Cursor;
use core::iter::FusedIterator;
use std::collections::hash_map::RandomState;

/// Iterator over `(&K, &V)` in bucket order.
pub struct Iter<'a, K, V, S = RandomState> {
    cursor: Cursor<'a, K, V, S>,
    remaining: usize,
}

impl<'a, K, V, S> Iter<'a, K, V, S> {
    pub(crate) fn new(cursor: Cursor<'a, K, V, S>, remaining: usize) -> Self {
        Self { cursor, remaining }
    }
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.next()?;
        self.remaining -= 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, S> ExactSizeIterator for Iter<'a, K, V, S> {}
impl<'a, K, V, S> FusedIterator for Iter<'a, K, V, S> {}

impl<'a, K, V, S> Clone for Iter<'a, K, V, S> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over `(&K, &mut V)`.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, NodeKey, Node<K, V>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(it: slotmap::basic::IterMut<'a, NodeKey, Node<K, V>>) -> Self {
        Self { it }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| n.entry.pair_mut())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Owning iterator over `(K, V)`.
pub struct IntoIter<K, V> {
    it: slotmap::basic::IntoIter<NodeKey, Node<K, V>>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(it: slotmap::basic::IntoIter<NodeKey, Node<K, V>>) -> Self {
        Self { it }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| n.entry.into_parts())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}
