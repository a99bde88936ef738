//! Buckets: singly-linked chains threaded through the table's node arena.
//!
//! Nodes live in a `SlotMap` owned by the table; a bucket only stores the key
//! of its first node and its length, and each node stores the key of the next
//! one. Relinking a node (on insert, removal or rehash) therefore never moves
//! the entry itself, and a stale `NodeKey` can never resolve to a newer entry.
//!
//! New nodes are linked at the front, so a chain is newest-first. Nothing
//! outside this module may rely on that order.

use crate::entry::Entry;
use slotmap::{DefaultKey, SlotMap};

pub(crate) type NodeKey = DefaultKey;
pub(crate) type Nodes<K, V> = SlotMap<NodeKey, Node<K, V>>;

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) entry: Entry<K, V>,
    /// Hash of `entry.key()` under the table's hasher, computed once on insert.
    pub(crate) hash: u64,
    pub(crate) next: Option<NodeKey>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Self {
            entry: Entry::new(key, value),
            hash,
            next: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Bucket {
    head: Option<NodeKey>,
    len: usize,
}

impl Bucket {
    #[inline]
    pub(crate) fn head(&self) -> Option<NodeKey> {
        self.head
    }

    #[inline]
    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Link `key` in front of the chain. `node` must be the arena node for `key`.
    pub(crate) fn push_front<K, V>(&mut self, key: NodeKey, node: &mut Node<K, V>) {
        node.next = self.head;
        self.head = Some(key);
        self.len += 1;
    }

    /// First node in the chain for which `is_match` holds.
    pub(crate) fn find<K, V, F>(&self, nodes: &Nodes<K, V>, mut is_match: F) -> Option<NodeKey>
    where
        F: FnMut(&Node<K, V>) -> bool,
    {
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = &nodes[k];
            if is_match(node) {
                return Some(k);
            }
            cur = node.next;
        }
        None
    }

    /// Unlink the first matching node and return its key. The node stays in
    /// the arena; the caller removes it. Order of the remaining chain is kept.
    pub(crate) fn unlink<K, V, F>(&mut self, nodes: &mut Nodes<K, V>, mut is_match: F) -> Option<NodeKey>
    where
        F: FnMut(&Node<K, V>) -> bool,
    {
        let mut prev: Option<NodeKey> = None;
        let mut cur = self.head;
        while let Some(k) = cur {
            let next = nodes[k].next;
            if is_match(&nodes[k]) {
                match prev {
                    None => self.head = next,
                    Some(p) => nodes[p].next = next,
                }
                nodes[k].next = None;
                self.len -= 1;
                return Some(k);
            }
            prev = Some(k);
            cur = next;
        }
        None
    }

    /// Node keys in chain order.
    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    pub(crate) fn keys<'a, K, V>(&self, nodes: &'a Nodes<K, V>) -> ChainKeys<'a, K, V> {
        ChainKeys {
            nodes,
            cur: self.head,
        }
    }
}

pub(crate) struct ChainKeys<'a, K, V> {
    nodes: &'a Nodes<K, V>,
    cur: Option<NodeKey>,
}

impl<'a, K, V> Iterator for ChainKeys<'a, K, V> {
    type Item = NodeKey;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        self.cur = self.nodes[k].next;
        Some(k)
    }
}
