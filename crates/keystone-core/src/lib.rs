//! Keystone Core
//!
//! This crate turns caller-facing keys and values into the bytes a storage
//! engine stores, and back.
//!
//! # Overview
//!
//! - **Values**: [`Value`] is what callers read and write (text, raw bytes,
//!   or structured JSON); [`Encoded`] is what the engine sees.
//! - **Encodings**: an [`Encoding`] is a named, reversible transformation
//!   between the two. The process-wide [`EncodingRegistry`] holds the
//!   built-in ones (`utf8`, `json`, `binary`, `id`, `hex`, `base64`, ...).
//! - **Codec**: a [`Codec`] picks the encoding for each key and value from
//!   batch-scoped, per-call and handle-level settings, then applies it.
//!
//! # Example
//!
//! ```
//! use keystone_core::{Codec, EncodingSelection, Value};
//!
//! let codec = Codec::new(Some("utf8".into()), Some("json".into()));
//!
//! let value = Value::from(serde_json::json!({"name": "Alice", "tags": [1, 2]}));
//! let encoded = codec.encode_value(value.clone(), None, None).unwrap();
//! assert_eq!(codec.decode_value(encoded, None).unwrap(), value);
//!
//! // Per-call overrides win over handle defaults
//! let call = EncodingSelection::new().value_encoding("hex");
//! let encoded = codec.encode_value(Value::from("cafe"), Some(&call), None).unwrap();
//! assert_eq!(encoded.as_bytes(), &[0xca, 0xfe]);
//! ```
//!
//! # Modules
//!
//! - [`types`] - [`Value`] and [`Encoded`]
//! - [`encoding`] - Encodings, registry, codec and batch entries
//! - [`error`] - Error types ([`CoreError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod encoding;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use encoding::{
    resolve_encoding, BatchEntry, BatchKind, Codec, EncodedEntry, Encoding, EncodingRegistry,
    EncodingSelection, EncodingSpec,
};
pub use error::{CoreError, CoreResult};
pub use types::{Encoded, Value};
