//! Resize policy: bucket count as a pure function of the entry count.
//!
//! The ideal bucket count for `len` entries is `4 * len + 1`, which keeps the
//! average chain length around a quarter. The table is only rebuilt when the
//! current bucket count drifts more than a factor of two away from that ideal,
//! in either direction, so a run of inserts or removals pays for a rehash only
//! every doubling or halving.
//!
//! Bucket counts are `NonZeroUsize` so "at least one bucket" is carried by the
//! type rather than by the `+ 1` in the formula. Bucket index computation and
//! cursor normalization both depend on it.

use core::num::NonZeroUsize;

/// Smallest bucket array the table ever holds.
pub const MIN_BUCKETS: NonZeroUsize = NonZeroUsize::MIN;

/// Ideal bucket count for `len` entries: `4 * len + 1`, saturating.
pub const fn target_bucket_count(len: usize) -> NonZeroUsize {
    match NonZeroUsize::new(len.saturating_mul(4).saturating_add(1)) {
        Some(n) => n,
        None => MIN_BUCKETS,
    }
}

/// True when `current` is more than a factor of two away from `target`.
pub const fn rehash_due(target: NonZeroUsize, current: NonZeroUsize) -> bool {
    let (t, c) = (target.get(), current.get());
    t > c.saturating_mul(2) || c > t.saturating_mul(2)
}

/// New bucket count for a table holding `len` entries in `current` buckets,
/// or `None` if the current array is within bounds.
pub const fn plan_rehash(len: usize, current: NonZeroUsize) -> Option<NonZeroUsize> {
    let target = target_bucket_count(len);
    if rehash_due(target, current) {
        Some(target)
    } else {
        None
    }
}
