//! The encoding trait and how callers name an encoding.

use std::fmt;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::types::{Encoded, Value};

/// A named, reversible transformation between a [`Value`] and its stored form.
///
/// For every value `v` an encoding accepts, `decode(encode(v)) == v`.
/// Byte-oriented encodings additionally accept [`Value::Bytes`] unchanged.
///
/// Implement this trait to pass a custom encoding inline through
/// [`EncodingSpec::Inline`].
pub trait Encoding: Send + Sync + fmt::Debug {
    /// The encoding's unique name.
    fn name(&self) -> &str;

    /// Encode a value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Encoding`](crate::CoreError::Encoding) if the
    /// value cannot be represented by this encoding.
    fn encode(&self, value: Value) -> CoreResult<Encoded>;

    /// Decode a stored form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Encoding`](crate::CoreError::Encoding) if the
    /// stored form is malformed for this encoding.
    fn decode(&self, encoded: Encoded) -> CoreResult<Value>;

    /// Whether the encoded form is raw bytes rather than text.
    fn is_byte_oriented(&self) -> bool;
}

/// How a caller selects an encoding.
#[derive(Debug, Clone)]
pub enum EncodingSpec {
    /// Look the encoding up in the registry by name.
    Named(String),
    /// Use this encoding directly.
    Inline(Arc<dyn Encoding>),
}

impl EncodingSpec {
    /// Select a registered encoding by name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Use a custom encoding.
    #[must_use]
    pub fn inline(encoding: impl Encoding + 'static) -> Self {
        Self::Inline(Arc::new(encoding))
    }

    /// The name this spec refers to.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Inline(encoding) => encoding.name(),
        }
    }
}

impl From<&str> for EncodingSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<String> for EncodingSpec {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Arc<dyn Encoding>> for EncodingSpec {
    fn from(encoding: Arc<dyn Encoding>) -> Self {
        Self::Inline(encoding)
    }
}

impl fmt::Display for EncodingSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Inline(encoding) => write!(f, "{} (inline)", encoding.name()),
        }
    }
}
