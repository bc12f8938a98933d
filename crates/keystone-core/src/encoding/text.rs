//! Text-oriented encodings and the raw `binary` encoding.

use crate::error::{CoreError, CoreResult};
use crate::types::{Encoded, Value};

use super::Encoding;

/// UTF-8 text.
///
/// Text is stored as-is. Structured values are stringified, so they decode
/// as text. Bytes pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8;

impl Encoding for Utf8 {
    fn name(&self) -> &str {
        "utf8"
    }

    fn encode(&self, value: Value) -> CoreResult<Encoded> {
        Ok(match value {
            Value::Text(s) => Encoded::Text(s),
            Value::Bytes(b) => Encoded::Bytes(b),
            other => Encoded::Text(other.stringify()),
        })
    }

    fn decode(&self, encoded: Encoded) -> CoreResult<Value> {
        match encoded {
            Encoded::Text(s) => Ok(Value::Text(s)),
            Encoded::Bytes(b) => String::from_utf8(b)
                .map(Value::Text)
                .map_err(|e| CoreError::Encoding(format!("utf8: {e}"))),
        }
    }

    fn is_byte_oriented(&self) -> bool {
        false
    }
}

/// JSON text.
///
/// Structured values round-trip exactly. `Value::Text` is normalised: it is
/// stored as a JSON string and decodes as `Value::Json(String)`, whose
/// [`stringify`](Value::stringify) is the original text. Raw bytes have no
/// JSON form.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Encoding for Json {
    fn name(&self) -> &str {
        "json"
    }

    fn encode(&self, value: Value) -> CoreResult<Encoded> {
        let json = match value {
            Value::Json(v) => v,
            Value::Text(s) => serde_json::Value::String(s),
            Value::Bytes(b) => {
                return Err(CoreError::Encoding(format!(
                    "json: cannot represent {} raw bytes",
                    b.len()
                )));
            }
        };
        serde_json::to_string(&json)
            .map(Encoded::Text)
            .map_err(|e| CoreError::Encoding(format!("json: {e}")))
    }

    fn decode(&self, encoded: Encoded) -> CoreResult<Value> {
        let parsed = match &encoded {
            Encoded::Text(s) => serde_json::from_str(s),
            Encoded::Bytes(b) => serde_json::from_slice(b),
        };
        parsed.map(Value::Json).map_err(|e| {
            CoreError::encoding_with_input("json", e, String::from_utf8_lossy(encoded.as_bytes()))
        })
    }

    fn is_byte_oriented(&self) -> bool {
        false
    }
}

/// Raw bytes.
///
/// Bytes pass through. Text is stored as its UTF-8 bytes and structured
/// values as their stringified form; both decode as bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binary;

impl Encoding for Binary {
    fn name(&self) -> &str {
        "binary"
    }

    fn encode(&self, value: Value) -> CoreResult<Encoded> {
        Ok(match value {
            Value::Bytes(b) => Encoded::Bytes(b),
            Value::Text(s) => Encoded::Bytes(s.into_bytes()),
            other => Encoded::Bytes(other.stringify().into_bytes()),
        })
    }

    fn decode(&self, encoded: Encoded) -> CoreResult<Value> {
        Ok(Value::Bytes(encoded.into_bytes()))
    }

    fn is_byte_oriented(&self) -> bool {
        true
    }
}

/// No transformation.
///
/// Text and bytes pass through in both directions. Structured values are
/// stringified, as the engine cannot hold them directly. Registered as both
/// `id` and `none`, and used when no encoding is configured.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    name: &'static str,
}

impl Identity {
    /// Create an identity encoding registered under `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new("id")
    }
}

impl Encoding for Identity {
    fn name(&self) -> &str {
        self.name
    }

    fn encode(&self, value: Value) -> CoreResult<Encoded> {
        Ok(match value {
            Value::Text(s) => Encoded::Text(s),
            Value::Bytes(b) => Encoded::Bytes(b),
            other => Encoded::Text(other.stringify()),
        })
    }

    fn decode(&self, encoded: Encoded) -> CoreResult<Value> {
        Ok(match encoded {
            Encoded::Text(s) => Value::Text(s),
            Encoded::Bytes(b) => Value::Bytes(b),
        })
    }

    fn is_byte_oriented(&self) -> bool {
        false
    }
}
