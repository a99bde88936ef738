//! chain-hashmap: a single-threaded hash map built on separate chaining,
//! with load-driven rehashing and bucket-order cursors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a self-contained map whose table layout is observable and whose
//!   resize behavior is a small pure function, so each piece can be
//!   reasoned about on its own.
//! - Layers:
//!   - `policy`: target bucket count `4 * len + 1` and the factor-of-two
//!     window that decides when to rehash. Pure, no table access.
//!   - `bucket`: singly-linked chains threaded through a `SlotMap` node
//!     arena by generational keys.
//!   - `ChainMap<K, V, S>`: the table. Owns the arena and the bucket array,
//!     hashes keys with `S: BuildHasher`, consults the policy after every
//!     structural mutation.
//!   - `Cursor` / `CursorMut`: positions `(bucket, node)` that walk the
//!     buckets in order, skipping empty ones, and end at a single canonical
//!     sentinel.
//!
//! Constraints
//! - Single-threaded: no internal synchronization. `&mut self` on every
//!   structural mutation, so the borrow checker rules out cursors that
//!   outlive a rehash.
//! - Unique keys; inserting an existing key keeps the first value.
//! - At least one bucket at all times (`NonZeroUsize` in the policy),
//!   which keeps bucket indexing and cursor normalization total.
//! - No unsafe code.
//!
//! Hashing and rehashing invariants
//! - Each node stores the `u64` hash of its key, computed once on insert.
//!   Rehash relinks nodes from the stored hash and never calls `K: Hash`;
//!   lookups compare stored hashes before calling `K: Eq`.
//! - An entry with hash `h` lives in bucket `h % bucket_count`.
//! - Rehash keeps every node in place in the arena, so node keys (and a
//!   value reference re-resolved through one) survive it.
//!
//! Notes and non-goals
//! - Iteration order is unspecified, both across buckets and within a
//!   chain (chains happen to be newest-first).
//! - No open addressing, no allocator parameter, no thread safety.
//! - With the `logging` feature, rehash and clear emit `log` records.

#![forbid(unsafe_code)]

mod bucket;
mod chain_map;
#[cfg(test)]
mod chain_map_proptest;
pub mod cursor;
mod entry;
mod error;
pub mod iter;
pub mod policy;

// Public surface
pub use chain_map::ChainMap;
pub use cursor::{Cursor, CursorMut, Position};
pub use entry::Entry;
pub use error::AccessError;
pub use iter::{IntoIter, Iter, IterMut};
