//! Encodings, the encoding registry, and the codec.
//!
//! # Encodings
//!
//! An [`Encoding`] turns a [`Value`](crate::types::Value) into an
//! [`Encoded`](crate::types::Encoded) form and back. Built-in encodings:
//!
//! | Name | Byte-oriented | Accepts |
//! |------|---------------|---------|
//! | `utf8` | no | text; structured values are stringified; bytes pass through |
//! | `json` | no | structured values and text |
//! | `binary` | yes | bytes; text is stored as its UTF-8 bytes |
//! | `id`, `none` | no | text and bytes unchanged |
//! | `hex`, `base64`, `ascii` | yes | bytes, or their textual form |
//! | `ucs2`, `ucs-2`, `utf16le`, `utf-16le` | yes | bytes, or text stored as UTF-16LE |
//!
//! # Resolution
//!
//! An [`EncodingSpec`] is either a registry name or an inline encoding.
//! [`resolve_encoding`] maps it to an encoding; no spec means identity.
//! The [`Codec`] chooses which spec applies: batch-scoped, then per-call,
//! then the handle default.

mod batch;
mod buffer;
mod codec;
mod registry;
mod text;
mod traits;


pub use batch::{BatchEntry, BatchKind, EncodedEntry};
pub use buffer::{ByteText, ByteTextFormat};
pub use codec::{Codec, EncodingSelection};
pub use registry::{resolve_encoding, EncodingRegistry};
pub use text::{Binary, Identity, Json, Utf8};
pub use traits::{Encoding, EncodingSpec};
