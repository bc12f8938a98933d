//! Batch entries before and after encoding.

use serde::{Deserialize, Serialize};

use crate::types::{Encoded, Value};

use super::{EncodingSelection, EncodingSpec};

/// The kind of write a batch entry performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchKind {
    /// Store a value under a key.
    Put,
    /// Remove a key.
    #[serde(alias = "delete")]
    Del,
}

/// One caller-supplied batch entry.
///
/// Fields are optional so that loosely-built entries can be normalized: an
/// entry without a kind but with both key and value is a put. Anything else
/// missing is left for the handle to reject.
#[derive(Debug, Clone, Default)]
pub struct BatchEntry {
    /// Put or delete, if declared.
    pub kind: Option<BatchKind>,
    /// The key.
    pub key: Option<Value>,
    /// The value; ignored for deletes.
    pub value: Option<Value>,
    /// Encodings scoped to this entry.
    pub encodings: EncodingSelection,
    /// Bytes prepended to the encoded key.
    pub prefix: Option<Vec<u8>>,
}

impl BatchEntry {
    /// A put of `value` under `key`.
    #[must_use]
    pub fn put(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self {
            kind: Some(BatchKind::Put),
            key: Some(key.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A delete of `key`.
    #[must_use]
    pub fn del(key: impl Into<Value>) -> Self {
        Self { kind: Some(BatchKind::Del), key: Some(key.into()), ..Self::default() }
    }

    /// An entry with no declared kind.
    #[must_use]
    pub fn untyped(key: Option<Value>, value: Option<Value>) -> Self {
        Self { key, value, ..Self::default() }
    }

    /// Encode this entry's key with `spec`.
    #[must_use]
    pub fn with_key_encoding(mut self, spec: impl Into<EncodingSpec>) -> Self {
        self.encodings.key_encoding = Some(spec.into());
        self
    }

    /// Encode this entry's value with `spec`.
    #[must_use]
    pub fn with_value_encoding(mut self, spec: impl Into<EncodingSpec>) -> Self {
        self.encodings.value_encoding = Some(spec.into());
        self
    }

    /// Scope this entry's key under `prefix`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// The declared kind, or `Put` when key and value are both present.
    #[must_use]
    pub fn resolved_kind(&self) -> Option<BatchKind> {
        let present = |v: &Option<Value>| v.as_ref().is_some_and(|v| !v.is_null());
        self.kind.or_else(|| (present(&self.key) && present(&self.value)).then_some(BatchKind::Put))
    }
}

/// A batch entry after encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedEntry {
    /// Put or delete; `None` if it could not be inferred.
    pub kind: Option<BatchKind>,
    /// The encoded (and prefixed) key, if one was given.
    pub key: Option<Encoded>,
    /// The encoded value, for puts.
    pub value: Option<Encoded>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_kind() {
        assert_eq!(BatchEntry::put("k", "v").resolved_kind(), Some(BatchKind::Put));
        assert_eq!(BatchEntry::del("k").resolved_kind(), Some(BatchKind::Del));
        assert_eq!(
            BatchEntry::untyped(Some("k".into()), Some("v".into())).resolved_kind(),
            Some(BatchKind::Put)
        );
        assert_eq!(BatchEntry::untyped(Some("k".into()), None).resolved_kind(), None);
        assert_eq!(BatchEntry::untyped(None, None).resolved_kind(), None);
    }

    #[test]
    fn test_declared_kind_wins() {
        let mut entry = BatchEntry::put("k", "v");
        entry.kind = Some(BatchKind::Del);
        assert_eq!(entry.resolved_kind(), Some(BatchKind::Del));
    }

    #[test]
    fn test_kind_serde_names() {
        assert_eq!(serde_json::to_string(&BatchKind::Put).expect("ser"), "\"put\"");
        assert_eq!(serde_json::to_string(&BatchKind::Del).expect("ser"), "\"del\"");
        let kind: BatchKind = serde_json::from_str("\"delete\"").expect("de");
        assert_eq!(kind, BatchKind::Del);
    }
}
