//! Error type for fallible map accessors.

/// Returned by [`ChainMap::at`](crate::ChainMap::at) when the key is absent.
///
/// Use [`ChainMap::find`](crate::ChainMap::find) or
/// [`ChainMap::get`](crate::ChainMap::get) when absence is an expected case.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AccessError {
    #[error("key not found")]
    KeyNotFound,
}
