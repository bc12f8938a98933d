//! Byte-oriented encodings whose caller-facing form is text.
//!
//! These store raw bytes but let callers write and read a textual rendering
//! of them (hex digits, base64, ...). Bytes passed in are stored unchanged.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{CoreError, CoreResult};
use crate::types::{Encoded, Value};

use super::Encoding;

/// How bytes are rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteTextFormat {
    /// Lowercase hexadecimal, two digits per byte.
    Hex,
    /// Padded standard base64.
    Base64,
    /// 7-bit ASCII; the high bit is dropped on decode.
    Ascii,
    /// UTF-16 little-endian code units.
    Utf16Le,
}

impl ByteTextFormat {
    /// Parse the textual form into bytes.
    fn parse(self, name: &str, text: &str) -> CoreResult<Vec<u8>> {
        match self {
            Self::Hex => hex::decode(text).map_err(|e| CoreError::encoding_with_input(name, e, text)),
            Self::Base64 => {
                STANDARD.decode(text).map_err(|e| CoreError::encoding_with_input(name, e, text))
            }
            Self::Ascii => {
                if text.is_ascii() {
                    Ok(text.as_bytes().to_vec())
                } else {
                    Err(CoreError::encoding_with_input(name, "non-ASCII character", text))
                }
            }
            Self::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        }
    }

    /// Render bytes as text.
    fn render(self, name: &str, bytes: &[u8]) -> CoreResult<String> {
        match self {
            Self::Hex => Ok(hex::encode(bytes)),
            Self::Base64 => Ok(STANDARD.encode(bytes)),
            Self::Ascii => Ok(bytes.iter().map(|b| char::from(b & 0x7f)).collect()),
            Self::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(CoreError::Encoding(format!(
                        "{name}: odd byte length {}",
                        bytes.len()
                    )));
                }
                let units: Vec<u16> =
                    bytes.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]])).collect();
                String::from_utf16(&units).map_err(|e| CoreError::Encoding(format!("{name}: {e}")))
            }
        }
    }
}

/// A byte-oriented encoding with a textual caller-facing form.
#[derive(Debug, Clone, Copy)]
pub struct ByteText {
    name: &'static str,
    format: ByteTextFormat,
}

impl ByteText {
    /// Create an encoding registered under `name` using `format`.
    #[must_use]
    pub const fn new(name: &'static str, format: ByteTextFormat) -> Self {
        Self { name, format }
    }
}

impl Encoding for ByteText {
    fn name(&self) -> &str {
        self.name
    }

    fn encode(&self, value: Value) -> CoreResult<Encoded> {
        match value {
            Value::Bytes(b) => Ok(Encoded::Bytes(b)),
            Value::Text(s) => self.format.parse(self.name, &s).map(Encoded::Bytes),
            other => self.format.parse(self.name, &other.stringify()).map(Encoded::Bytes),
        }
    }

    fn decode(&self, encoded: Encoded) -> CoreResult<Value> {
        self.format.render(self.name, encoded.as_bytes()).map(Value::Text)
    }

    fn is_byte_oriented(&self) -> bool {
        true
    }
}
