//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract the scratchpad service depends on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs surface transport failures as `RepoError`, never panics.

pub mod kv_repo;

pub use kv_repo::{KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore};
