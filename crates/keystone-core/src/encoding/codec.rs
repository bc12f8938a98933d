//! Choosing and applying encodings for keys and values.

use std::sync::Arc;

use crate::error::CoreResult;
use crate::types::{Encoded, Value};

use super::batch::{BatchEntry, BatchKind, EncodedEntry};
use super::registry::resolve_encoding;
use super::{Encoding, EncodingSpec};

/// Key and value encoding overrides.
///
/// Used both per call and per batch entry. Unset fields fall through to the
/// next, less specific, level.
#[derive(Debug, Clone, Default)]
pub struct EncodingSelection {
    /// Encoding for the key.
    pub key_encoding: Option<EncodingSpec>,
    /// Encoding for the value.
    pub value_encoding: Option<EncodingSpec>,
}

impl EncodingSelection {
    /// A selection that overrides nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `spec` for both key and value.
    #[must_use]
    pub fn encoding(self, spec: impl Into<EncodingSpec>) -> Self {
        let spec = spec.into();
        Self { key_encoding: Some(spec.clone()), value_encoding: Some(spec) }
    }

    /// Use `spec` for the key.
    #[must_use]
    pub fn key_encoding(mut self, spec: impl Into<EncodingSpec>) -> Self {
        self.key_encoding = Some(spec.into());
        self
    }

    /// Use `spec` for the value.
    #[must_use]
    pub fn value_encoding(mut self, spec: impl Into<EncodingSpec>) -> Self {
        self.value_encoding = Some(spec.into());
        self
    }

    /// Returns `true` if neither key nor value is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.key_encoding.is_none() && self.value_encoding.is_none()
    }
}

fn key_spec(selection: &EncodingSelection) -> Option<&EncodingSpec> {
    selection.key_encoding.as_ref()
}

fn value_spec(selection: &EncodingSelection) -> Option<&EncodingSpec> {
    selection.value_encoding.as_ref()
}

/// Encodes keys and values for one handle.
///
/// The codec holds the handle-level defaults. Every method also takes the
/// per-call selection and, where it applies, the batch-scoped one; the most
/// specific setting wins, and key and value resolve independently.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    defaults: EncodingSelection,
}

impl Codec {
    /// Create a codec with the given default key and value encodings.
    ///
    /// A `None` default resolves to identity.
    #[must_use]
    pub fn new(key_encoding: Option<EncodingSpec>, value_encoding: Option<EncodingSpec>) -> Self {
        Self { defaults: EncodingSelection { key_encoding, value_encoding } }
    }

    /// The handle-level defaults.
    #[must_use]
    pub const fn defaults(&self) -> &EncodingSelection {
        &self.defaults
    }

    fn pick<'a>(
        &'a self,
        field: fn(&EncodingSelection) -> Option<&EncodingSpec>,
        call: Option<&'a EncodingSelection>,
        batch: Option<&'a EncodingSelection>,
    ) -> Option<&'a EncodingSpec> {
        batch.and_then(field).or_else(|| call.and_then(field)).or_else(|| field(&self.defaults))
    }

    /// Resolve the encoding that applies to a key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`](crate::CoreError::Configuration)
    /// if the chosen name is not registered.
    pub fn key_encoding(
        &self,
        call: Option<&EncodingSelection>,
        batch: Option<&EncodingSelection>,
    ) -> CoreResult<Arc<dyn Encoding>> {
        resolve_encoding(self.pick(key_spec, call, batch))
    }

    /// Resolve the encoding that applies to a value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`](crate::CoreError::Configuration)
    /// if the chosen name is not registered.
    pub fn value_encoding(
        &self,
        call: Option<&EncodingSelection>,
        batch: Option<&EncodingSelection>,
    ) -> CoreResult<Arc<dyn Encoding>> {
        resolve_encoding(self.pick(value_spec, call, batch))
    }

    /// Encode a key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown encoding name, or an
    /// encoding error if the key cannot be represented.
    pub fn encode_key(
        &self,
        key: Value,
        call: Option<&EncodingSelection>,
        batch: Option<&EncodingSelection>,
    ) -> CoreResult<Encoded> {
        self.key_encoding(call, batch)?.encode(key)
    }

    /// Encode a value.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown encoding name, or an
    /// encoding error if the value cannot be represented.
    pub fn encode_value(
        &self,
        value: Value,
        call: Option<&EncodingSelection>,
        batch: Option<&EncodingSelection>,
    ) -> CoreResult<Encoded> {
        self.value_encoding(call, batch)?.encode(value)
    }

    /// Decode a key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown encoding name, or an
    /// encoding error if the stored form is malformed.
    pub fn decode_key(&self, encoded: Encoded, call: Option<&EncodingSelection>) -> CoreResult<Value> {
        self.key_encoding(call, None)?.decode(encoded)
    }

    /// Decode a value.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown encoding name, or an
    /// encoding error if the stored form is malformed.
    pub fn decode_value(
        &self,
        encoded: Encoded,
        call: Option<&EncodingSelection>,
    ) -> CoreResult<Value> {
        self.value_encoding(call, None)?.decode(encoded)
    }

    /// Whether keys are stored as raw bytes under this selection.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown encoding name.
    pub fn key_as_bytes(&self, call: Option<&EncodingSelection>) -> CoreResult<bool> {
        Ok(self.key_encoding(call, None)?.is_byte_oriented())
    }

    /// Whether values are stored as raw bytes under this selection.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown encoding name.
    pub fn value_as_bytes(&self, call: Option<&EncodingSelection>) -> CoreResult<bool> {
        Ok(self.value_encoding(call, None)?.is_byte_oriented())
    }

    /// Encode every entry of a batch.
    ///
    /// Each entry's own selection takes precedence over `call`. An entry with
    /// no type but with both key and value becomes a put. Entries whose type
    /// cannot be inferred keep `kind: None` for the caller to reject. Values
    /// of delete entries are dropped. A prefix is prepended to the encoded key.
    ///
    /// # Errors
    ///
    /// Returns the first configuration or encoding error hit.
    pub fn encode_batch(
        &self,
        entries: Vec<BatchEntry>,
        call: Option<&EncodingSelection>,
    ) -> CoreResult<Vec<EncodedEntry>> {
        entries.into_iter().map(|entry| self.encode_entry(entry, call)).collect()
    }

    fn encode_entry(
        &self,
        entry: BatchEntry,
        call: Option<&EncodingSelection>,
    ) -> CoreResult<EncodedEntry> {
        let kind = entry.resolved_kind();
        let BatchEntry { key, value, encodings, prefix, .. } = entry;
        let batch = Some(&encodings);

        let key = match key.filter(|k| !k.is_null()) {
            Some(key) => {
                let encoded = self.encode_key(key, call, batch)?;
                Some(match &prefix {
                    Some(prefix) => encoded.prefixed(prefix),
                    None => encoded,
                })
            }
            None => None,
        };

        let value = match (kind, value.filter(|v| !v.is_null())) {
            (Some(BatchKind::Del), _) | (_, None) => None,
            (_, Some(value)) => Some(self.encode_value(value, call, batch)?),
        };

        Ok(EncodedEntry { kind, key, value })
    }
}
