//! Values that callers read and write.

use serde_json::Value as JsonValue;

/// A key or value as the caller sees it.
///
/// Which variants are valid depends on the encoding in effect: `utf8` works
/// with text, `json` with structured values, the byte-oriented encodings
/// with raw bytes or their textual form.
///
/// # Missing values
///
/// `Value::Json(Null)` stands in for a missing argument; `Value::from(None)`
/// produces it. Data operations reject it as a key, and as a value for `put`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A UTF-8 string.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// A structured value (object, array, number, string, bool or null).
    Json(JsonValue),
}

impl Value {
    /// The value representing a missing argument.
    #[must_use]
    pub const fn null() -> Self {
        Self::Json(JsonValue::Null)
    }

    /// Returns `true` if this is the missing-argument value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Json(JsonValue::Null))
    }

    /// Returns `true` for empty text or empty bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Bytes(b) => b.is_empty(),
            Self::Json(JsonValue::String(s)) => s.is_empty(),
            Self::Json(_) => false,
        }
    }

    /// A short name for the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Json(_) => "json",
        }
    }

    /// Returns the string if this is [`Value::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the bytes if this is [`Value::Bytes`].
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the structured value if this is [`Value::Json`].
    #[must_use]
    pub const fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Render the value as text.
    ///
    /// Text is returned as-is and a JSON string yields its contents. Other
    /// structured values use compact JSON, which is deterministic because
    /// object keys are kept sorted. Bytes are read as UTF-8, replacing
    /// invalid sequences.
    #[must_use]
    pub fn stringify(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Json(JsonValue::String(s)) => s.clone(),
            Self::Json(v) => v.to_string(),
            Self::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(b: &[u8; N]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        Self::Json(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Json(JsonValue::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Json(JsonValue::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Json(JsonValue::from(n))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or_else(Self::null, Into::into)
    }
}
