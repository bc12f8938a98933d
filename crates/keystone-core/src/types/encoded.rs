//! The form a key or value takes on its way to the storage engine.

use crate::error::{CoreError, CoreResult};

/// An encoded key or value.
///
/// Text-oriented encodings produce [`Encoded::Text`] and byte-oriented ones
/// produce [`Encoded::Bytes`]. The engine stores both as bytes; on read the
/// resolved encoding's byte orientation decides which variant is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    /// Text, stored as its UTF-8 bytes.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Encoded {
    /// Rebuild an encoded form from bytes read back from the engine.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Encoding`] if `byte_oriented` is false and the
    /// bytes are not valid UTF-8.
    pub fn from_stored(bytes: Vec<u8>, byte_oriented: bool) -> CoreResult<Self> {
        if byte_oriented {
            return Ok(Self::Bytes(bytes));
        }
        String::from_utf8(bytes)
            .map(Self::Text)
            .map_err(|e| CoreError::Encoding(format!("stored data is not valid UTF-8: {e}")))
    }

    /// Returns the bytes the engine stores for this form.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Bytes(b) => b,
        }
    }

    /// Consumes the form, returning the bytes the engine stores.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(s) => s.into_bytes(),
            Self::Bytes(b) => b,
        }
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns `true` if the encoded form is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `prefix` followed by this form, as bytes.
    #[must_use]
    pub fn prefixed(self, prefix: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(prefix.len() + self.len());
        bytes.extend_from_slice(prefix);
        bytes.extend_from_slice(self.as_bytes());
        Self::Bytes(bytes)
    }
}
