//! The process-wide table of named encodings.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::error::{CoreError, CoreResult};

use super::buffer::{ByteText, ByteTextFormat};
use super::text::{Binary, Identity, Json, Utf8};
use super::{Encoding, EncodingSpec};

/// Names of the byte-text family and their formats.
const BYTE_TEXT_ENCODINGS: &[(&str, ByteTextFormat)] = &[
    ("hex", ByteTextFormat::Hex),
    ("ascii", ByteTextFormat::Ascii),
    ("base64", ByteTextFormat::Base64),
    ("ucs2", ByteTextFormat::Utf16Le),
    ("ucs-2", ByteTextFormat::Utf16Le),
    ("utf16le", ByteTextFormat::Utf16Le),
    ("utf-16le", ByteTextFormat::Utf16Le),
];

static GLOBAL: OnceLock<EncodingRegistry> = OnceLock::new();

/// A fixed mapping from encoding name to encoding.
///
/// The standard registry is built on first use and never changes afterwards.
#[derive(Debug)]
pub struct EncodingRegistry {
    encodings: HashMap<&'static str, Arc<dyn Encoding>>,
    identity: Arc<dyn Encoding>,
}

impl EncodingRegistry {
    /// The process-wide registry of built-in encodings.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::standard)
    }

    fn standard() -> Self {
        let identity: Arc<dyn Encoding> = Arc::new(Identity::new("id"));

        let mut encodings: HashMap<&'static str, Arc<dyn Encoding>> = HashMap::new();
        for &(name, format) in BYTE_TEXT_ENCODINGS {
            encodings.insert(name, Arc::new(ByteText::new(name, format)));
        }
        encodings.insert("id", Arc::clone(&identity));
        encodings.insert("none", Arc::new(Identity::new("none")));
        encodings.insert("binary", Arc::new(Binary));
        encodings.insert("json", Arc::new(Json));
        encodings.insert("utf8", Arc::new(Utf8));

        Self { encodings, identity }
    }

    /// Look up an encoding by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Encoding>> {
        self.encodings.get(name).cloned()
    }

    /// All registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.encodings.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// The identity encoding used when nothing is configured.
    #[must_use]
    pub fn identity(&self) -> Arc<dyn Encoding> {
        Arc::clone(&self.identity)
    }

    /// Resolve a spec to an encoding.
    ///
    /// A name is looked up exactly, an inline encoding is returned as-is,
    /// and `None` resolves to identity.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if a name is not registered.
    pub fn resolve(&self, spec: Option<&EncodingSpec>) -> CoreResult<Arc<dyn Encoding>> {
        match spec {
            None => Ok(self.identity()),
            Some(EncodingSpec::Inline(encoding)) => Ok(Arc::clone(encoding)),
            Some(EncodingSpec::Named(name)) => {
                self.get(name).ok_or_else(|| CoreError::Configuration(name.clone()))
            }
        }
    }
}

/// Resolve a spec against the global registry.
///
/// # Errors
///
/// Returns [`CoreError::Configuration`] if a name is not registered.
pub fn resolve_encoding(spec: Option<&EncodingSpec>) -> CoreResult<Arc<dyn Encoding>> {
    EncodingRegistry::global().resolve(spec)
}
