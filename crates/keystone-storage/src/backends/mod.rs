//! Storage backend implementations.
//!
//! This module contains concrete implementations of the storage engine traits.
//!
//! # Available Backends
//!
//! - [`redb`] - Durable, pure-Rust embedded database with ACID transactions
//! - [`memory`] - Ordered in-process store for tests and ephemeral data

pub mod memory;
pub mod redb;

pub use self::memory::{MemoryEngine, MemorySession};
pub use self::redb::{RedbEngine, RedbSession};
