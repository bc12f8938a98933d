//! Creation options passed to a storage engine when opening a location.

use serde::{Deserialize, Serialize};

/// Default block cache size: 8 MiB.
pub const DEFAULT_CACHE_SIZE: usize = 8 * 1024 * 1024;

/// Options controlling how a storage engine opens a location.
///
/// All fields have defaults, so a config file only needs to name what it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenOptions {
    /// Create an empty store if none exists at the location (default: true).
    pub create_if_missing: bool,

    /// Fail the open if a store already exists at the location (default: false).
    pub error_if_exists: bool,

    /// Compress stored blocks where the backend supports it (default: true).
    pub compression: bool,

    /// Size in bytes of the backend's block cache (default: 8 MiB).
    pub cache_size: usize,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            error_if_exists: false,
            compression: true,
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl OpenOptions {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to create the store if it doesn't exist.
    #[must_use]
    pub const fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Set whether opening an existing store is an error.
    #[must_use]
    pub const fn error_if_exists(mut self, error: bool) -> Self {
        self.error_if_exists = error;
        self
    }

    /// Set whether stored blocks are compressed.
    #[must_use]
    pub const fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Set the block cache size in bytes.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }
}
