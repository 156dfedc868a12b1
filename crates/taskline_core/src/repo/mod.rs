//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value access contract the store persists through.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Repository APIs never interpret stored values; encoding and
//!   decoding belong to the store layer.

pub mod kv_repo;
