//! String-keyed persisted stores
//!
//! The session store reads from two scopes: a short-lived session scope and a
//! longer-lived persistent scope. Both are reached through [`KeyValueStore`].

pub mod file;
pub mod memory;

use crate::Result;
use std::fmt::Debug;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Lifetime of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// Cleared when the client session ends
    Session,
    /// Survives restarts
    Persistent,
}

/// A string-keyed, string-valued store
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read a value; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing an absent key succeeds
    fn remove(&self, key: &str) -> Result<()>;

    /// Scope this store provides
    fn scope(&self) -> StorageScope;
}
