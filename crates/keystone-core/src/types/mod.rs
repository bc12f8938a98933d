//! Caller-facing and engine-facing data types.

mod encoded;
mod value;

pub use encoded::Encoded;
pub use value::Value;
