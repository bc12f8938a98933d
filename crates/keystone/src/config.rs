//! Handle configuration.

use keystone_core::EncodingSpec;
use keystone_storage::engine::OpenOptions;

/// Configuration for a [`Handle`](crate::Handle).
///
/// Passed by value to the constructor and never changed afterwards.
#[derive(Debug, Clone)]
pub struct Options {
    /// Create the store if it doesn't exist (default: true).
    pub create_if_missing: bool,
    /// Fail to open if the store already exists (default: false).
    pub error_if_exists: bool,
    /// Compress stored data where the engine supports it (default: true).
    pub compression: bool,
    /// Engine cache size in bytes (default: 8 MiB).
    pub cache_size: usize,
    /// Default key encoding (default: `utf8`). `None` means identity.
    pub key_encoding: Option<EncodingSpec>,
    /// Default value encoding (default: `utf8`). `None` means identity.
    pub value_encoding: Option<EncodingSpec>,
}

impl Default for Options {
    fn default() -> Self {
        let engine = OpenOptions::default();
        Self {
            create_if_missing: engine.create_if_missing,
            error_if_exists: engine.error_if_exists,
            compression: engine.compression,
            cache_size: engine.cache_size,
            key_encoding: Some(EncodingSpec::named("utf8")),
            value_encoding: Some(EncodingSpec::named("utf8")),
        }
    }
}

impl Options {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to create the store if it doesn't exist.
    #[must_use]
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Set whether opening an existing store is an error.
    #[must_use]
    pub fn error_if_exists(mut self, error: bool) -> Self {
        self.error_if_exists = error;
        self
    }

    /// Set whether stored data is compressed.
    #[must_use]
    pub fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Set the engine cache size in bytes.
    #[must_use]
    pub fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Set the default key encoding.
    #[must_use]
    pub fn key_encoding(mut self, spec: impl Into<EncodingSpec>) -> Self {
        self.key_encoding = Some(spec.into());
        self
    }

    /// Set the default value encoding.
    #[must_use]
    pub fn value_encoding(mut self, spec: impl Into<EncodingSpec>) -> Self {
        self.value_encoding = Some(spec.into());
        self
    }

    /// Set both default encodings.
    #[must_use]
    pub fn encoding(self, spec: impl Into<EncodingSpec>) -> Self {
        let spec = spec.into();
        self.key_encoding(spec.clone()).value_encoding(spec)
    }

    /// Clear the default encodings so keys and values pass through unchanged.
    #[must_use]
    pub fn raw(mut self) -> Self {
        self.key_encoding = None;
        self.value_encoding = None;
        self
    }

    /// The creation options handed to the storage engine.
    #[must_use]
    pub const fn open_options(&self) -> OpenOptions {
        OpenOptions {
            create_if_missing: self.create_if_missing,
            error_if_exists: self.error_if_exists,
            compression: self.compression,
            cache_size: self.cache_size,
        }
    }
}
