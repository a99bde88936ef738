//! Stored key/value pairs.

/// A key/value pair owned by a [`ChainMap`](crate::ChainMap).
///
/// The key is fixed once the entry is inserted: it determines which bucket
/// the entry lives in, so only shared access to it is handed out. The value
/// can be read and written in place.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Borrow key and value together; the key stays shared.
    #[inline]
    pub fn pair_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    #[inline]
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}
